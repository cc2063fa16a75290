use std::{
    collections::VecDeque,
    io::{Read, Seek, SeekFrom},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use anyhow::Context;

/// Byte-level view of how much of the stream has been pulled down, shared
/// with the media element so it can report buffering readiness while the
/// decoder owns the stream.
#[derive(Default)]
pub struct StreamProgress {
    total: AtomicU64,
    fetched: AtomicU64,
}

impl StreamProgress {
    pub fn total_bytes(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn fetched_bytes(&self) -> u64 {
        self.fetched.load(Ordering::Relaxed)
    }

    pub fn is_complete(&self) -> bool {
        let total = self.total_bytes();
        total > 0 && self.fetched_bytes() >= total
    }

    fn record(&self, watermark: u64) {
        self.fetched.fetch_max(watermark, Ordering::Relaxed);
    }
}

/// Blocking `Read + Seek` over HTTP range requests, feeding the audio
/// decoder. Bytes are pulled in `fetch_chunk`-sized ranged GETs; `buffer`
/// holds the window `[position, position + buffer.len())`.
pub struct HttpAudioStream {
    url: String,
    client: reqwest::blocking::Client,
    buffer: VecDeque<u8>,
    position: u64,
    total_bytes: u64,
    fetch_chunk: u64,
    progress: Arc<StreamProgress>,
}

impl HttpAudioStream {
    pub fn open(
        url: String,
        prefetch_bytes: u64,
        fetch_chunk: u64,
    ) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::new();
        let total_bytes = Self::content_length(&client, &url)?;

        let progress = Arc::new(StreamProgress::default());
        progress.total.store(total_bytes, Ordering::Relaxed);

        let mut stream = Self {
            url,
            client,
            buffer: VecDeque::new(),
            position: 0,
            total_bytes,
            fetch_chunk,
            progress,
        };
        stream.fetch(prefetch_bytes)?;

        Ok(stream)
    }

    pub fn progress(&self) -> Arc<StreamProgress> {
        Arc::clone(&self.progress)
    }

    fn buffered_end(&self) -> u64 {
        self.position + self.buffer.len() as u64
    }

    /// Appends up to `amount` more bytes after the current window.
    fn fetch(&mut self, amount: u64) -> anyhow::Result<usize> {
        let start = self.buffered_end();
        if start >= self.total_bytes {
            return Ok(0);
        }
        let end = (start + amount).min(self.total_bytes) - 1;

        let bytes = self
            .client
            .get(&self.url)
            .header("Range", format!("bytes={start}-{end}"))
            .send()?
            .error_for_status()?
            .bytes()?;

        self.buffer.extend(bytes.iter().copied());
        self.progress.record(self.buffered_end());

        Ok(bytes.len())
    }

    fn content_length(
        client: &reqwest::blocking::Client,
        url: &str,
    ) -> anyhow::Result<u64> {
        client
            .head(url)
            .send()?
            .error_for_status()?
            .headers()
            .get(reqwest::header::CONTENT_LENGTH)
            .context("stream has no Content-Length")?
            .to_str()?
            .parse::<u64>()
            .context("bad Content-Length")
    }

    fn seek_to(&mut self, pos: u64) -> std::io::Result<u64> {
        let pos = pos.min(self.total_bytes);

        if pos >= self.position && pos <= self.buffered_end() {
            self.buffer.drain(..(pos - self.position) as usize);
        } else {
            self.buffer.clear();
        }
        self.position = pos;

        Ok(self.position)
    }
}

impl Read for HttpAudioStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.buffer.len() < buf.len() && self.buffered_end() < self.total_bytes
        {
            let want = (buf.len() as u64).max(self.fetch_chunk);
            self.fetch(want).map_err(std::io::Error::other)?;
        }

        let n = self.buffer.len().min(buf.len());
        for (slot, byte) in buf.iter_mut().zip(self.buffer.drain(..n)) {
            *slot = byte;
        }
        self.position += n as u64;

        Ok(n)
    }
}

impl Seek for HttpAudioStream {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        match pos {
            SeekFrom::Start(pos) => self.seek_to(pos),
            SeekFrom::Current(offset) => {
                self.seek_to(self.position.saturating_add_signed(offset))
            }
            SeekFrom::End(offset) => {
                self.seek_to(self.total_bytes.saturating_add_signed(offset))
            }
        }
    }
}
