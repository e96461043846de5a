//! Core data types shared between core logic and the UI.
//!
//! Rule of thumb:
//! - These are "boring bags of data"
//! - No GUI code
//! - No engine calls

use std::fmt;
use std::sync::Arc;

/// Playback state mirrored from the engine.
///
/// The engine owns it; the adapter only observes and republishes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Opening,
    Buffering,
    Playing,
    Paused,
    Stopped,
    Ended,
    Error,
}

impl PlaybackState {
    /// Playing, paused or buffering: there is a live position to act on.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Playing | Self::Paused | Self::Buffering)
    }

    /// States from which opening new files should start playback right away.
    pub fn is_at_rest(self) -> bool {
        matches!(self, Self::Idle | Self::Stopped | Self::Ended | Self::Error)
    }
}

/// One selectable audio track of the current media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioTrack {
    /// Engine-defined id.
    pub id: u32,
    pub description: String,
}

impl fmt::Display for AudioTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = self.description.trim();
        if description.is_empty() {
            write!(f, "Track {}", self.id)
        } else {
            f.write_str(description)
        }
    }
}

/// Video aspect-ratio override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectRatio {
    /// No override: the engine uses the media's own ratio.
    #[default]
    Default,
    Wide,
    Standard,
    Square,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 4] = [Self::Default, Self::Wide, Self::Standard, Self::Square];

    /// Engine-facing ratio string, `None` clears the override.
    pub fn as_engine_str(self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::Wide => Some("16:9"),
            Self::Standard => Some("4:3"),
            Self::Square => Some("1:1"),
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_engine_str().unwrap_or("Default"))
    }
}

/// One decoded picture, tightly packed RGBA rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    /// Bumped for every new picture; lets the UI skip unchanged frames.
    pub serial: u64,
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<Vec<u8>>,
}
