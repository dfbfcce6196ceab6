use std::io::Cursor;
use std::sync::Arc;

use anyhow::Result;
use reqwest::blocking::Client;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

/// The one audio handle the music player drives.
pub trait AudioOutput {
    fn set_volume(&mut self, volume: f32);
    fn set_source(&mut self, url: &str);
    fn play(&mut self);
    fn pause(&mut self);
    /// Silences output without touching the volume.
    fn set_muted(&mut self, muted: bool);
}

/// Used when no audio device could be opened.
#[derive(Debug, Default)]
pub struct NullOutput;

impl AudioOutput for NullOutput {
    fn set_volume(&mut self, _volume: f32) {}
    fn set_source(&mut self, _url: &str) {}
    fn play(&mut self) {}
    fn pause(&mut self) {}
    fn set_muted(&mut self, _muted: bool) {}
}

/// Device output. Each source swap gets a fresh sink; the track is
/// downloaded and decoded on a loader thread and loops until replaced.
pub struct RodioOutput {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Arc<Sink>>,
    client: Client,
    volume: f32,
    muted: bool,
}

impl RodioOutput {
    pub fn try_new() -> Option<Self> {
        let (stream, handle) = match OutputStream::try_default() {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!(error = %e, "no audio device, music disabled");
                return None;
            }
        };

        Some(Self {
            _stream: stream,
            handle,
            sink: None,
            client: Client::new(),
            volume: 0.0,
            muted: false,
        })
    }

    fn apply_volume(&self) {
        if let Some(sink) = &self.sink {
            sink.set_volume(if self.muted { 0.0 } else { self.volume });
        }
    }
}

impl AudioOutput for RodioOutput {
    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.apply_volume();
    }

    fn set_source(&mut self, url: &str) {
        if let Some(old) = self.sink.take() {
            old.stop();
        }

        let sink = match Sink::try_new(&self.handle) {
            Ok(s) => Arc::new(s),
            Err(e) => {
                tracing::error!(error = %e, "could not open audio sink");
                return;
            }
        };
        sink.pause();
        self.sink = Some(sink.clone());
        self.apply_volume();

        let client = self.client.clone();
        let url = url.to_string();
        std::thread::spawn(move || match fetch_track(&client, &url) {
            Ok(bytes) => match Decoder::new(Cursor::new(bytes)) {
                Ok(source) => sink.append(source.repeat_infinite()),
                Err(e) => tracing::warn!(error = %e, url = %url, "could not decode track"),
            },
            Err(e) => tracing::warn!(error = %e, url = %url, "could not download track"),
        });
    }

    fn play(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.apply_volume();
    }
}

fn fetch_track(client: &Client, url: &str) -> Result<Vec<u8>> {
    let bytes = client.get(url).send()?.error_for_status()?.bytes()?;
    Ok(bytes.to_vec())
}
