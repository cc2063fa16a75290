use std::time::Duration;

/// Buffering ladder of a loaded source. `FutureData` is the threshold at
/// which playback can proceed without stalling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Readiness {
    #[default]
    Nothing,
    Metadata,
    CurrentData,
    FutureData,
    EnoughData,
}

/// Lifecycle notifications drained by the controller each tick.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Duration became known (`None` when the codec does not report one).
    MetadataLoaded(Option<Duration>),
    /// Buffered past the readiness threshold; fired once per loaded source.
    CanPlay,
    /// The source ran out without looping.
    Ended,
    Error(String),
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("audio device unavailable: {0}")]
    Device(String),
    #[error("no source is loaded")]
    NoSource,
    #[error("playback could not start: {0}")]
    StartFailed(String),
    #[error("seek failed: {0}")]
    Seek(String),
}

/// Playback primitive the controller drives: one current source, a
/// position/duration clock, volume, and the mute/loop flags. Implemented by
/// the streaming rodio backend and by [`FakeElement`](super::fake) in
/// tests.
pub trait MediaElement {
    /// Points the element at a new source and reloads. Prior buffering
    /// state is discarded; readiness drops back to `Nothing`.
    fn set_source(&mut self, url: &str);

    fn play(&mut self) -> Result<(), MediaError>;
    fn pause(&mut self);
    fn seek(&mut self, position: Duration) -> Result<(), MediaError>;

    fn readiness(&self) -> Readiness;
    fn position(&self) -> Duration;
    fn duration(&self) -> Option<Duration>;
    fn paused(&self) -> bool;

    /// Volume scalar in [0, 1]. Independent of the mute flag: muting
    /// silences output without touching this value.
    fn set_volume(&mut self, volume: f32);
    fn volume(&self) -> f32;

    fn set_muted(&mut self, muted: bool);
    fn muted(&self) -> bool;

    fn set_looping(&mut self, looping: bool);
    fn looping(&self) -> bool;

    /// Drains events queued since the last call.
    fn poll_events(&mut self) -> Vec<MediaEvent>;
}
