//! core/playback/mod.rs
//! Playdeck playback core module.
//!
//! `PlaybackAdapter` wraps one engine instance + one player and turns the
//! engine's thread-side events into `Notification`s the UI drains on its own
//! thread.

use std::time::Duration;

use thiserror::Error;

use super::engine::EngineError;
use super::types::PlaybackState;

mod adapter;

pub use adapter::PlaybackAdapter;

/// Outward notifications, in the order the adapter observed them.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Time(i64),
    Position(f32),
    Duration(i64),
    State(PlaybackState),
    Rate(f32),
    Error(String),
}

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("failed to create engine instance: {0}")]
    Instance(#[source] EngineError),
    #[error("failed to create media player: {0}")]
    Player(#[source] EngineError),
}

/// Adapter-side delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterTiming {
    /// Wait between an observed end and the loop restart.
    pub loop_restart_delay: Duration,
    /// Rate drift poll period while playing.
    pub rate_poll_interval: Duration,
}

impl Default for AdapterTiming {
    fn default() -> Self {
        Self {
            loop_restart_delay: Duration::from_millis(50),
            rate_poll_interval: Duration::from_millis(250),
        }
    }
}

pub const MIN_VOLUME: i32 = 0;
pub const MAX_VOLUME: i32 = 100;
pub const MIN_RATE: f32 = 0.25;
pub const MAX_RATE: f32 = 4.0;

/// Base text of every engine error notification.
pub const UNKNOWN_ERROR: &str = "An unknown playback error occurred.";
