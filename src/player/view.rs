#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayPauseIcon {
    Play,
    Pause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuteIcon {
    Unmuted,
    Muted,
}

/// Everything the player pane renders. The controller is the only writer;
/// the UI reads it once per frame.
#[derive(Debug, Clone)]
pub struct PlayerView {
    /// The pane stays hidden until the first track is loaded.
    pub visible: bool,
    pub progress_max: f64,
    pub progress_value: f64,
    pub elapsed_label: String,
    pub duration_label: String,
    pub play_icon: PlayPauseIcon,
    pub loop_active: bool,
    pub mute_icon: MuteIcon,
    pub volume_label: String,
    pub volume_slider: u8,
    /// Now-playing fragment from `/song/details`, rendered via
    /// [`strip_tags`].
    pub details: Option<String>,
}

impl Default for PlayerView {
    fn default() -> Self {
        Self {
            visible: false,
            progress_max: 0.0,
            progress_value: 0.0,
            elapsed_label: format_time(0.0),
            duration_label: format_time(0.0),
            play_icon: PlayPauseIcon::Play,
            loop_active: false,
            mute_icon: MuteIcon::Unmuted,
            volume_label: "100%".into(),
            volume_slider: 100,
            details: None,
        }
    }
}

/// `M:SS` with seconds zero-padded; anything unknowable counts as zero.
pub fn format_time(total_seconds: f64) -> String {
    let total_seconds = if total_seconds.is_finite() && total_seconds > 0.0 {
        total_seconds as u64
    } else {
        0
    };
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Flattens the server's HTML detail fragment into text lines for the
/// terminal. Block-level closers and `<br>` become line breaks.
pub fn strip_tags(html: &str) -> Vec<String> {
    let mut text = String::with_capacity(html.len());
    let mut chars = html.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '<' {
            text.push(c);
            continue;
        }
        let mut tag = String::new();
        for t in chars.by_ref() {
            if t == '>' {
                break;
            }
            tag.push(t);
        }
        let name = tag
            .trim_start_matches('/')
            .trim_end_matches('/')
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        let closing = tag.starts_with('/');
        if name == "br"
            || (closing
                && matches!(
                    name.as_str(),
                    "p" | "div" | "li" | "tr" | "h1" | "h2" | "h3" | "h4"
                ))
        {
            text.push('\n');
        }
    }

    let text = text
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
