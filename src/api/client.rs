use anyhow::Context;
use async_trait::async_trait;

use super::models::TrackReference;

/// Track-sequencing service. The server owns ordering: the play-all queue
/// and the previous-song history live on its side, keyed by the
/// `toPlay=true` flag sent with each detail fetch.
#[async_trait]
pub trait SongIndex {
    async fn next_song(&self) -> anyhow::Result<TrackReference>;
    async fn previous_song(&self) -> anyhow::Result<TrackReference>;
    async fn play_all(
        &self,
        kind: &str,
        value: &str,
    ) -> anyhow::Result<TrackReference>;
    async fn song_details(
        &self,
        id: i64,
        to_play: bool,
    ) -> anyhow::Result<String>;
}

pub struct SongIndexClient {
    base: String,
    http: reqwest::Client,
}

impl SongIndexClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            http: reqwest::Client::new(),
        }
    }

    async fn fetch_track(
        &self,
        url: reqwest::Url,
    ) -> anyhow::Result<TrackReference> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()?;

        response
            .json::<TrackReference>()
            .await
            .with_context(|| format!("bad track payload from {url}"))
    }

    fn url(&self, path: &str) -> anyhow::Result<reqwest::Url> {
        reqwest::Url::parse(&format!("{}{}", self.base, path))
            .with_context(|| format!("invalid server url {}", self.base))
    }
}

#[async_trait]
impl SongIndex for SongIndexClient {
    async fn next_song(&self) -> anyhow::Result<TrackReference> {
        self.fetch_track(self.url("/next-song")?).await
    }

    async fn previous_song(&self) -> anyhow::Result<TrackReference> {
        self.fetch_track(self.url("/previous-song")?).await
    }

    async fn play_all(
        &self,
        kind: &str,
        value: &str,
    ) -> anyhow::Result<TrackReference> {
        let mut url = self.url("/play-all")?;
        url.query_pairs_mut()
            .append_pair("type", kind)
            .append_pair("value", value);

        self.fetch_track(url).await
    }

    async fn song_details(
        &self,
        id: i64,
        to_play: bool,
    ) -> anyhow::Result<String> {
        let mut url = self.url("/song/details")?;
        url.query_pairs_mut()
            .append_pair("id", &id.to_string())
            .append_pair("toPlay", if to_play { "true" } else { "false" });

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()?;

        Ok(response.text().await?)
    }
}

/// Media-source address for a song, `<base>/play?music-path=<encoded>`.
/// The path is percent-encoded wholesale, matching what the server expects
/// for a single query value.
pub fn stream_url(base: &str, music_path: &str) -> String {
    format!("{base}/play?music-path={}", urlencoding::encode(music_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_url_encodes_path() {
        assert_eq!(
            stream_url("http://localhost:6969", "/music/42.mp3"),
            "http://localhost:6969/play?music-path=%2Fmusic%2F42.mp3"
        );
    }

    #[test]
    fn stream_url_encodes_spaces_and_unicode() {
        let url = stream_url("http://h", "/m/Dark Side/01 — Speak.mp3");
        assert!(url.starts_with("http://h/play?music-path=%2Fm%2FDark%20Side"));
        assert!(!url.contains(' '));
    }

    #[test]
    fn play_all_url_carries_both_params() {
        let client = SongIndexClient::new("http://localhost:6969");
        let mut url = client.url("/play-all").unwrap();
        url.query_pairs_mut()
            .append_pair("type", "album")
            .append_pair("value", "Selected Ambient Works");

        assert_eq!(
            url.as_str(),
            "http://localhost:6969/play-all?type=album&value=Selected+Ambient+Works"
        );
    }

    #[test]
    fn details_url_carries_to_play_flag() {
        let client = SongIndexClient::new("http://localhost:6969");
        let mut url = client.url("/song/details").unwrap();
        url.query_pairs_mut()
            .append_pair("id", "42")
            .append_pair("toPlay", "true");

        assert_eq!(
            url.as_str(),
            "http://localhost:6969/song/details?id=42&toPlay=true"
        );
    }
}
