use std::time::Duration;

use tracing::{error, info};

use crate::{
    api::{stream_url, SongIndex, TrackReference},
    audio::element::{MediaElement, MediaEvent, Readiness},
};

use super::view::{format_time, MuteIcon, PlayPauseIcon, PlayerView};

/// Drives a [`MediaElement`] from user intent and keeps the
/// [`PlayerView`] in step. Track ordering comes from the [`SongIndex`]
/// server; the element owns the real playback state, the controller owns
/// only the last explicitly-set volume and the armed one-shot start.
pub struct PlayerController<M, S> {
    media: M,
    index: S,
    server_url: String,
    /// Last explicitly-set volume in [0, 1]; survives mute toggles.
    song_volume: f32,
    /// One-shot start armed by `play_track`, fired on `CanPlay`.
    pending_start: bool,
    view: PlayerView,
}

impl<M: MediaElement, S: SongIndex> PlayerController<M, S> {
    pub fn new(
        media: M,
        index: S,
        server_url: impl Into<String>,
        initial_volume: u8,
    ) -> Self {
        let mut controller = Self {
            media,
            index,
            server_url: server_url.into(),
            song_volume: 1.0,
            pending_start: false,
            view: PlayerView::default(),
        };
        controller.set_volume(initial_volume);
        controller
    }

    pub fn view(&self) -> &PlayerView {
        &self.view
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    /// With a path: repoint the media source at the server's stream URL
    /// and reveal the player. Either way, start playback once the element
    /// has buffered past the readiness threshold; below it, arm the
    /// one-shot start that [`Self::sync_progress`] fires on `CanPlay`.
    pub fn play_track(&mut self, path: Option<&str>) {
        if let Some(path) = path {
            let url = stream_url(&self.server_url, path);
            self.media.set_source(&url);
            self.pending_start = false;
            self.view.visible = true;
        }

        if self.media.readiness() >= Readiness::FutureData {
            self.start_playback();
        } else {
            self.pending_start = true;
        }
    }

    fn start_playback(&mut self) {
        self.pending_start = false;
        match self.media.play() {
            Ok(()) => {
                self.view.play_icon = PlayPauseIcon::Pause;
                info!("playback started");
            }
            Err(err) => error!("playback failed: {err}"),
        }
    }

    /// Fetches the now-playing fragment (marking the track as playing on
    /// the server's history stack), then starts the track.
    pub async fn load_track_and_play(&mut self, track: &TrackReference) {
        match self.index.song_details(track.id, true).await {
            Ok(html) => {
                self.view.details = Some(html);
                self.play_track(Some(&track.path));
            }
            Err(err) => error!("fetching song details failed: {err}"),
        }
    }

    pub async fn play_all(&mut self, kind: &str, value: &str) {
        match self.index.play_all(kind, value).await {
            Ok(track) => self.load_track_and_play(&track).await,
            Err(err) => error!("fetching play-all failed: {err}"),
        }
    }

    pub async fn next(&mut self) {
        match self.index.next_song().await {
            Ok(track) => self.load_track_and_play(&track).await,
            Err(err) => error!("fetching next song failed: {err}"),
        }
    }

    pub async fn previous(&mut self) {
        match self.index.previous_song().await {
            Ok(track) => self.load_track_and_play(&track).await,
            Err(err) => error!("fetching previous song failed: {err}"),
        }
    }

    pub fn toggle_play_pause(&mut self) {
        if self.media.readiness() < Readiness::FutureData {
            error!("no song is loaded to the player");
            return;
        }

        if self.media.paused() {
            self.play_track(None);
        } else {
            self.media.pause();
            self.view.play_icon = PlayPauseIcon::Play;
        }
    }

    pub fn toggle_loop(&mut self) {
        let looping = !self.media.looping();
        self.media.set_looping(looping);
        self.view.loop_active = looping;
    }

    pub fn set_volume(&mut self, percent: u8) {
        let percent = percent.min(100);
        self.view.volume_label = format!("{percent}%");
        self.view.volume_slider = percent;
        self.song_volume = f32::from(percent) / 100.0;
        self.media.set_volume(self.song_volume);
    }

    pub fn volume_percent(&self) -> u8 {
        self.view.volume_slider
    }

    /// Muting zeroes the displayed volume but leaves the element's volume
    /// scalar alone; unmuting restores the display from `song_volume`.
    pub fn toggle_mute(&mut self) {
        let muted = !self.media.muted();
        self.media.set_muted(muted);

        if muted {
            self.view.volume_label = "0%".into();
            self.view.volume_slider = 0;
            self.view.mute_icon = MuteIcon::Muted;
        } else {
            let percent = (self.song_volume * 100.0).round() as u8;
            self.view.volume_label = format!("{percent}%");
            self.view.volume_slider = percent;
            self.view.mute_icon = MuteIcon::Unmuted;
        }
    }

    pub fn seek_by(&mut self, secs: i64) {
        if self.media.readiness() < Readiness::FutureData {
            error!("no song is loaded to the player");
            return;
        }

        let position = self.media.position();
        let mut target = if secs >= 0 {
            position + Duration::from_secs(secs as u64)
        } else {
            position.saturating_sub(Duration::from_secs(secs.unsigned_abs()))
        };
        if let Some(duration) = self.media.duration() {
            target = target.min(duration);
        }

        if let Err(err) = self.media.seek(target) {
            error!("seek failed: {err}");
        }
    }

    fn on_metadata_loaded(&mut self) {
        let duration = self
            .media
            .duration()
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        self.view.progress_max = duration;
        self.view.progress_value = self.media.position().as_secs_f64();
        self.view.duration_label = format_time(duration);
        self.view.elapsed_label = format_time(self.view.progress_value);
    }

    /// Per-tick: dispatch queued element events and refresh the elapsed
    /// side of the progress bar.
    pub fn sync_progress(&mut self) {
        for event in self.media.poll_events() {
            match event {
                MediaEvent::MetadataLoaded(_) => self.on_metadata_loaded(),
                MediaEvent::CanPlay => {
                    if self.pending_start {
                        self.start_playback();
                    }
                }
                MediaEvent::Ended => {
                    self.view.play_icon = PlayPauseIcon::Play;
                }
                MediaEvent::Error(err) => error!("media element: {err}"),
            }
        }

        if self.view.visible {
            self.view.progress_value = self.media.position().as_secs_f64();
            self.view.elapsed_label = format_time(self.view.progress_value);
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::sync::Mutex;

    use super::*;
    use crate::audio::fake::FakeElement;

    struct FakeIndex {
        track: TrackReference,
        details: String,
        calls: Mutex<Vec<String>>,
    }

    impl FakeIndex {
        fn new(track: TrackReference) -> Self {
            Self {
                track,
                details: "<div><h2>Test Song</h2></div>".into(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SongIndex for FakeIndex {
        async fn next_song(&self) -> anyhow::Result<TrackReference> {
            self.calls.lock().unwrap().push("next-song".into());
            Ok(self.track.clone())
        }

        async fn previous_song(&self) -> anyhow::Result<TrackReference> {
            self.calls.lock().unwrap().push("previous-song".into());
            Ok(self.track.clone())
        }

        async fn play_all(
            &self,
            kind: &str,
            value: &str,
        ) -> anyhow::Result<TrackReference> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("play-all {kind}={value}"));
            Ok(self.track.clone())
        }

        async fn song_details(
            &self,
            id: i64,
            to_play: bool,
        ) -> anyhow::Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("details id={id} toPlay={to_play}"));
            Ok(self.details.clone())
        }
    }

    struct BrokenIndex;

    #[async_trait]
    impl SongIndex for BrokenIndex {
        async fn next_song(&self) -> anyhow::Result<TrackReference> {
            anyhow::bail!("connection refused")
        }

        async fn previous_song(&self) -> anyhow::Result<TrackReference> {
            anyhow::bail!("connection refused")
        }

        async fn play_all(
            &self,
            _kind: &str,
            _value: &str,
        ) -> anyhow::Result<TrackReference> {
            anyhow::bail!("connection refused")
        }

        async fn song_details(
            &self,
            _id: i64,
            _to_play: bool,
        ) -> anyhow::Result<String> {
            anyhow::bail!("connection refused")
        }
    }

    fn track() -> TrackReference {
        TrackReference {
            id: 42,
            path: "/music/42.mp3".into(),
        }
    }

    fn controller() -> PlayerController<FakeElement, FakeIndex> {
        PlayerController::new(
            FakeElement::new(),
            FakeIndex::new(track()),
            "http://localhost:6969",
            100,
        )
    }

    #[test]
    fn volume_is_stored_as_fraction_and_displayed_as_percent() {
        let mut player = controller();
        for percent in 0..=100u8 {
            player.set_volume(percent);
            assert_eq!(player.song_volume, f32::from(percent) / 100.0);
            assert_eq!(player.view().volume_label, format!("{percent}%"));
            assert_eq!(player.view().volume_slider, percent);
            assert_eq!(player.media().volume(), f32::from(percent) / 100.0);
        }
    }

    #[test]
    fn volume_is_clamped_to_hundred() {
        let mut player = controller();
        player.set_volume(250);
        assert_eq!(player.view().volume_label, "100%");
        assert_eq!(player.song_volume, 1.0);
    }

    #[test]
    fn mute_round_trip_restores_displayed_volume() {
        let mut player = controller();
        player.set_volume(40);

        player.toggle_mute();
        assert!(player.media().muted());
        assert_eq!(player.view().volume_label, "0%");
        assert_eq!(player.view().volume_slider, 0);
        assert_eq!(player.view().mute_icon, MuteIcon::Muted);
        // The element's volume scalar is untouched while muted.
        assert_eq!(player.media().volume(), 0.4);

        player.toggle_mute();
        assert!(!player.media().muted());
        assert_eq!(player.view().volume_label, "40%");
        assert_eq!(player.view().volume_slider, 40);
        assert_eq!(player.view().mute_icon, MuteIcon::Unmuted);
    }

    #[test]
    fn toggle_before_buffering_is_a_no_op() {
        let mut player = controller();
        player.toggle_play_pause();

        assert_eq!(player.media().play_count, 0);
        assert!(player.media().paused());
        assert_eq!(player.view().play_icon, PlayPauseIcon::Play);
        assert!(!player.pending_start);
    }

    #[test]
    fn play_track_defers_start_until_can_play() {
        let mut player = controller();
        player.play_track(Some("/music/42.mp3"));

        assert_eq!(
            player.media().source.as_deref(),
            Some("http://localhost:6969/play?music-path=%2Fmusic%2F42.mp3")
        );
        assert!(player.view().visible);
        assert!(player.pending_start);
        assert_eq!(player.media().play_count, 0);

        player.media_mut().finish_loading(Some(Duration::from_secs(65)));
        player.sync_progress();

        assert_eq!(player.media().play_count, 1);
        assert!(!player.media().paused());
        assert_eq!(player.view().play_icon, PlayPauseIcon::Pause);
        assert_eq!(player.view().duration_label, "1:05");
        assert_eq!(player.view().progress_max, 65.0);
    }

    #[test]
    fn pending_start_fires_at_most_once() {
        let mut player = controller();
        player.play_track(Some("/music/42.mp3"));
        player.media_mut().finish_loading(None);
        player.sync_progress();
        assert_eq!(player.media().play_count, 1);

        // A stray second CanPlay must not restart playback.
        player.media_mut().finish_loading(None);
        player.sync_progress();
        assert_eq!(player.media().play_count, 1);
    }

    #[test]
    fn resume_does_not_touch_the_source() {
        let mut player = controller();
        player.play_track(Some("/music/42.mp3"));
        player.media_mut().finish_loading(None);
        player.sync_progress();

        player.toggle_play_pause();
        assert!(player.media().paused());
        assert_eq!(player.view().play_icon, PlayPauseIcon::Play);

        player.play_track(None);
        assert!(!player.media().paused());
        assert_eq!(player.media().load_count, 1);
        assert_eq!(player.media().play_count, 2);
    }

    #[test]
    fn failed_start_leaves_playback_paused() {
        let mut player = controller();
        player.play_track(Some("/music/42.mp3"));
        player.media_mut().fail_next_play = true;
        player.media_mut().finish_loading(None);
        player.sync_progress();

        assert!(player.media().paused());
        assert_eq!(player.view().play_icon, PlayPauseIcon::Play);
        assert!(!player.pending_start);
    }

    #[test]
    fn loop_toggle_tracks_the_element_flag() {
        let mut player = controller();
        player.toggle_loop();
        assert!(player.media().looping());
        assert!(player.view().loop_active);
        player.toggle_loop();
        assert!(!player.media().looping());
        assert!(!player.view().loop_active);
    }

    #[test]
    fn ended_reverts_the_play_icon() {
        let mut player = controller();
        player.play_track(Some("/music/42.mp3"));
        player.media_mut().finish_loading(None);
        player.sync_progress();
        assert_eq!(player.view().play_icon, PlayPauseIcon::Pause);

        player.media_mut().finish_playback();
        player.sync_progress();
        assert_eq!(player.view().play_icon, PlayPauseIcon::Play);
    }

    #[tokio::test]
    async fn load_track_and_play_marks_now_playing_then_streams() {
        let mut player = controller();
        player.load_track_and_play(&track()).await;

        assert_eq!(
            player.index.calls(),
            vec!["details id=42 toPlay=true".to_string()]
        );
        assert_eq!(
            player.view().details.as_deref(),
            Some("<div><h2>Test Song</h2></div>")
        );
        assert_eq!(
            player.media().source.as_deref(),
            Some("http://localhost:6969/play?music-path=%2Fmusic%2F42.mp3")
        );
    }

    #[tokio::test]
    async fn next_and_previous_share_the_detail_fetch() {
        let mut player = controller();
        player.next().await;
        player.previous().await;

        assert_eq!(
            player.index.calls(),
            vec![
                "next-song".to_string(),
                "details id=42 toPlay=true".to_string(),
                "previous-song".to_string(),
                "details id=42 toPlay=true".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn index_failures_change_nothing() {
        let mut player = PlayerController::new(
            FakeElement::new(),
            BrokenIndex,
            "http://localhost:6969",
            100,
        );
        player.next().await;
        player.previous().await;
        player.play_all("album", "Meddle").await;

        assert!(player.media().source.is_none());
        assert!(player.view().details.is_none());
        assert!(!player.view().visible);
    }
}
