use std::{collections::VecDeque, time::Duration};

use super::element::{MediaElement, MediaError, MediaEvent, Readiness};

/// In-memory [`MediaElement`] with scriptable buffering, standing in for
/// the streaming backend in tests.
#[derive(Default)]
pub struct FakeElement {
    pub source: Option<String>,
    pub load_count: u32,
    pub play_count: u32,
    pub fail_next_play: bool,
    readiness: Readiness,
    position: Duration,
    duration: Option<Duration>,
    paused: bool,
    volume: f32,
    muted: bool,
    looping: bool,
    events: VecDeque<MediaEvent>,
}

impl FakeElement {
    pub fn new() -> Self {
        Self {
            paused: true,
            volume: 1.0,
            ..Default::default()
        }
    }

    /// Scripts the loader finishing: metadata arrives, then the buffer
    /// crosses the playback threshold.
    pub fn finish_loading(&mut self, duration: Option<Duration>) {
        self.duration = duration;
        self.readiness = Readiness::FutureData;
        self.events.push_back(MediaEvent::MetadataLoaded(duration));
        self.events.push_back(MediaEvent::CanPlay);
    }

    pub fn set_position(&mut self, position: Duration) {
        self.position = position;
    }

    pub fn finish_playback(&mut self) {
        self.paused = true;
        self.events.push_back(MediaEvent::Ended);
    }
}

impl MediaElement for FakeElement {
    fn set_source(&mut self, url: &str) {
        self.source = Some(url.to_string());
        self.load_count += 1;
        self.readiness = Readiness::Nothing;
        self.position = Duration::ZERO;
        self.duration = None;
        self.paused = true;
        self.events.clear();
    }

    fn play(&mut self) -> Result<(), MediaError> {
        self.play_count += 1;
        if self.fail_next_play {
            self.fail_next_play = false;
            return Err(MediaError::StartFailed("refused by test".into()));
        }
        if self.readiness == Readiness::Nothing {
            return Err(MediaError::NoSource);
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn seek(&mut self, position: Duration) -> Result<(), MediaError> {
        if self.readiness == Readiness::Nothing {
            return Err(MediaError::NoSource);
        }
        self.position = position;
        Ok(())
    }

    fn readiness(&self) -> Readiness {
        self.readiness
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn paused(&self) -> bool {
        self.paused
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn looping(&self) -> bool {
        self.looping
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        self.events.drain(..).collect()
    }
}
