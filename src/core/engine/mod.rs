//! core/engine/mod.rs
//! The playback engine boundary.
//!
//! The app never talks to gstreamer or rodio directly. It goes through three
//! handles, in creation order:
//! - `EngineBackend`  -> creates instances (the "library")
//! - `EngineInstance` -> owns the output device, creates players
//! - `MediaPlayer`    -> transport, tracks, subtitles, snapshot
//!
//! Players report asynchronous `EngineEvent`s from their own thread through
//! the channel handed to `attach`.
//!
//! Two real engines exist:
//! - `GstBackend`: gstreamer playbin, audio + video (frames, snapshots)
//! - `RodioBackend`: rodio + symphonia, audio only
//!
//! `backend_for` picks one from the config; `auto` tries gstreamer first.

use std::path::Path;
use std::sync::mpsc::Sender;

use serde::Deserialize;
use thiserror::Error;

use super::subtitles::SubtitleError;
use super::types::{AudioTrack, PlaybackState, VideoFrame};

mod decoder;
pub mod gst_engine;
pub mod rodio_engine;
mod worker;

#[cfg(test)]
pub(crate) mod fake;

pub use gst_engine::GstBackend;
pub use rodio_engine::RodioBackend;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine initialization failed: {0}")]
    Init(String),
    #[error("no media loaded")]
    NoMedia,
    #[error("{0}")]
    Unsupported(&'static str),
    #[error("subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),
    #[error("engine handle already released")]
    Released,
    #[error("{0}")]
    Backend(String),
    #[error("failed to write snapshot: {0}")]
    Snapshot(#[from] image::ImageError),
}

/// Which engine the app asks for (`[playback] engine` in the config).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// gstreamer when it initializes, rodio otherwise.
    #[default]
    Auto,
    Video,
    Audio,
}

pub fn backend_for(kind: EngineKind) -> Box<dyn EngineBackend> {
    match kind {
        EngineKind::Auto => Box::new(FallbackBackend::new(
            Box::new(GstBackend),
            Box::new(RodioBackend),
        )),
        EngineKind::Video => Box::new(GstBackend),
        EngineKind::Audio => Box::new(RodioBackend),
    }
}

/// Uses `primary` unless it fails to create an instance.
pub struct FallbackBackend {
    primary: Box<dyn EngineBackend>,
    fallback: Box<dyn EngineBackend>,
}

impl FallbackBackend {
    pub fn new(primary: Box<dyn EngineBackend>, fallback: Box<dyn EngineBackend>) -> Self {
        Self { primary, fallback }
    }
}

impl EngineBackend for FallbackBackend {
    fn new_instance(&self) -> Result<Box<dyn EngineInstance>, EngineError> {
        match self.primary.new_instance() {
            Ok(instance) => Ok(instance),
            Err(e) => {
                tracing::warn!(error = %e, "primary engine unavailable, falling back");
                self.fallback.new_instance()
            }
        }
    }
}

/// Events raised by a player on the engine's own thread.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    TimeChanged(i64),
    PositionChanged(f32),
    LengthChanged(i64),
    Opening,
    Buffering(f32),
    Playing,
    Paused,
    Stopped,
    EndReached,
    EncounteredError,
}

pub trait EngineBackend {
    fn new_instance(&self) -> Result<Box<dyn EngineInstance>, EngineError>;
}

pub trait EngineInstance {
    fn new_player(&mut self) -> Result<Box<dyn MediaPlayer>, EngineError>;

    /// Human readable engine name + version (for "About").
    fn version(&self) -> String;

    /// Must tolerate being called more than once.
    fn release(&mut self);
}

pub trait MediaPlayer {
    /// Route this player's events into `events`.
    fn attach(&mut self, events: Sender<EngineEvent>);

    /// Replace the active media. The path is known to exist.
    fn set_media(&mut self, path: &Path) -> Result<(), EngineError>;

    /// Start or resume. `Err` means the engine refused immediately.
    fn play(&mut self) -> Result<(), EngineError>;
    fn set_pause(&mut self, pause: bool);
    fn stop(&mut self);

    fn is_seekable(&self) -> bool;
    fn set_position(&mut self, ratio: f32);
    fn time_ms(&self) -> i64;
    fn length_ms(&self) -> i64;
    fn state(&self) -> PlaybackState;

    fn volume(&self) -> i32;
    fn set_volume(&mut self, volume: i32);
    fn rate(&self) -> f32;
    fn set_rate(&mut self, rate: f32);

    fn audio_tracks(&self) -> Result<Vec<AudioTrack>, EngineError>;
    fn audio_track(&self) -> Option<u32>;
    fn set_audio_track(&mut self, id: u32) -> Result<(), EngineError>;

    fn video_track_count(&self) -> usize;

    /// Attach an external subtitle file as a secondary track.
    fn add_subtitle(&mut self, path: &Path) -> Result<(), EngineError>;
    /// Subtitle text showing right now, if any.
    fn subtitle_text(&self) -> Option<String>;

    fn take_snapshot(&mut self, path: &Path) -> Result<(), EngineError>;
    /// `"16:9"` style override; `None` restores the stream's own shape.
    fn set_aspect_ratio(&mut self, ratio: Option<&str>);

    /// Latest decoded picture. Audio-only engines never have one.
    fn video_frame(&self) -> Option<VideoFrame> {
        None
    }

    /// Best effort description of the last failure.
    fn last_error(&self) -> Option<String>;

    /// Must tolerate being called more than once.
    fn release(&mut self);
}
