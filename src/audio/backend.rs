use std::{sync::Arc, thread, time::Duration};

use flume::Receiver;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::debug;

use crate::stream::streamer::{HttpAudioStream, StreamProgress};

use super::element::{MediaElement, MediaError, MediaEvent, Readiness};

const PREFETCH_BYTES: u64 = 256 * 1024;
const FETCH_CHUNK: u64 = 128 * 1024;

struct LoadedSource {
    decoder: Decoder<HttpAudioStream>,
    duration: Option<Duration>,
    progress: Arc<StreamProgress>,
}

type LoadResult = anyhow::Result<LoadedSource>;

/// Streaming [`MediaElement`] over a rodio sink. `set_source` hands the URL
/// to a loader thread that opens the range stream and builds the decoder;
/// the decoded source is appended to the sink on the first `play`.
pub struct StreamingElement {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
    source_url: Option<String>,
    loader_rx: Option<Receiver<LoadResult>>,
    pending: Option<Decoder<HttpAudioStream>>,
    progress: Option<Arc<StreamProgress>>,
    duration: Option<Duration>,
    appended: bool,
    resume_on_load: bool,
    announced_can_play: bool,
    volume: f32,
    muted: bool,
    looping: bool,
    events: Vec<MediaEvent>,
}

impl StreamingElement {
    pub fn new() -> Result<Self, MediaError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| MediaError::Device(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            handle,
            sink: None,
            source_url: None,
            loader_rx: None,
            pending: None,
            progress: None,
            duration: None,
            appended: false,
            resume_on_load: false,
            announced_can_play: false,
            volume: 1.0,
            muted: false,
            looping: false,
            events: Vec::new(),
        })
    }

    fn effective_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    fn apply_gain(&self) {
        if let Some(sink) = &self.sink {
            sink.set_volume(self.effective_gain());
        }
    }

    /// Ingests the loader result, if one has arrived since the last tick.
    fn poll_loader(&mut self) {
        let Some(rx) = &self.loader_rx else { return };

        match rx.try_recv() {
            Ok(Ok(loaded)) => {
                debug!(duration = ?loaded.duration, "source loaded");
                self.duration = loaded.duration;
                self.progress = Some(loaded.progress);
                self.pending = Some(loaded.decoder);
                self.loader_rx = None;
                self.events.push(MediaEvent::MetadataLoaded(self.duration));

                if self.resume_on_load {
                    self.resume_on_load = false;
                    if let Err(err) = self.play() {
                        self.events.push(MediaEvent::Error(err.to_string()));
                    }
                }
            }
            Ok(Err(err)) => {
                self.loader_rx = None;
                self.events.push(MediaEvent::Error(err.to_string()));
            }
            Err(flume::TryRecvError::Empty) => {}
            Err(flume::TryRecvError::Disconnected) => {
                self.loader_rx = None;
                self.events
                    .push(MediaEvent::Error("loader thread died".into()));
            }
        }
    }

    fn poll_drained_sink(&mut self) {
        let drained =
            self.appended && self.sink.as_ref().is_some_and(Sink::empty);
        if !drained {
            return;
        }

        self.appended = false;
        // Either way the source is reloaded from the top: looping resumes
        // by itself, a finished track sits rewound waiting for play.
        if let Some(url) = self.source_url.clone() {
            let resume = self.looping;
            self.set_source(&url);
            self.resume_on_load = resume;
            if !resume {
                self.events.push(MediaEvent::Ended);
            }
        }
    }
}

impl MediaElement for StreamingElement {
    fn set_source(&mut self, url: &str) {
        // Dropping the sink stops the old source outright; a still-running
        // loader keeps going but its result lands in a dropped channel.
        self.sink = None;
        self.pending = None;
        self.progress = None;
        self.duration = None;
        self.appended = false;
        self.resume_on_load = false;
        self.announced_can_play = false;
        self.events.clear();
        self.source_url = Some(url.to_string());

        let (tx, rx) = flume::bounded(1);
        self.loader_rx = Some(rx);

        let url = url.to_string();
        thread::spawn(move || {
            let result =
                HttpAudioStream::open(url, PREFETCH_BYTES, FETCH_CHUNK)
                    .and_then(|stream| {
                        let progress = stream.progress();
                        let decoder = Decoder::new(stream)?;
                        let duration = decoder.total_duration();
                        Ok(LoadedSource {
                            decoder,
                            duration,
                            progress,
                        })
                    });
            let _ = tx.send(result);
        });
    }

    fn play(&mut self) -> Result<(), MediaError> {
        if let Some(decoder) = self.pending.take() {
            let sink = Sink::try_new(&self.handle)
                .map_err(|e| MediaError::StartFailed(e.to_string()))?;
            sink.set_volume(self.effective_gain());
            sink.append(decoder);
            sink.play();
            self.sink = Some(sink);
            self.appended = true;
            return Ok(());
        }

        match &self.sink {
            Some(sink) if self.appended => {
                sink.play();
                Ok(())
            }
            _ => Err(MediaError::NoSource),
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn seek(&mut self, position: Duration) -> Result<(), MediaError> {
        match &self.sink {
            Some(sink) if self.appended => sink
                .try_seek(position)
                .map_err(|e| MediaError::Seek(e.to_string())),
            _ => Err(MediaError::NoSource),
        }
    }

    fn readiness(&self) -> Readiness {
        let Some(progress) = &self.progress else {
            return Readiness::Nothing;
        };

        if progress.is_complete() {
            Readiness::EnoughData
        } else if progress.fetched_bytes()
            >= PREFETCH_BYTES.min(progress.total_bytes())
        {
            Readiness::FutureData
        } else {
            Readiness::Metadata
        }
    }

    fn position(&self) -> Duration {
        self.sink
            .as_ref()
            .map(Sink::get_pos)
            .unwrap_or(Duration::ZERO)
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn paused(&self) -> bool {
        self.sink
            .as_ref()
            .map_or(true, |sink| sink.is_paused() || sink.empty())
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.apply_gain();
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.apply_gain();
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
        self.poll_loader();
        self.poll_drained_sink();

        if !self.announced_can_play
            && self.readiness() >= Readiness::FutureData
        {
            self.announced_can_play = true;
            self.events.push(MediaEvent::CanPlay);
        }

        std::mem::take(&mut self.events)
    }
}
