//! Scripted engine for tests.
//!
//! Every handle shares one `FakeState`; tests keep a `FakeBackend` clone to
//! inspect recorded calls and to push `EngineEvent`s as if the engine thread
//! raised them.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::Sender;

use parking_lot::{Mutex, MutexGuard};

use super::{EngineBackend, EngineError, EngineEvent, EngineInstance, MediaPlayer};
use crate::core::types::{AudioTrack, PlaybackState, VideoFrame};

#[derive(Debug)]
pub(crate) struct FakeState {
    // scripted failures
    pub fail_instance: bool,
    pub fail_player: bool,
    pub fail_play: bool,
    pub fail_tracks: bool,
    pub fail_snapshot: bool,

    // lifecycle
    pub instances_created: usize,
    pub instances_released: usize,
    pub players_released: usize,
    pub events: Option<Sender<EngineEvent>>,

    // recorded commands
    pub media: Option<PathBuf>,
    pub plays: usize,
    pub pauses: Vec<bool>,
    pub stops: usize,
    pub positions: Vec<f32>,
    pub subtitles: Vec<PathBuf>,
    pub snapshots: Vec<PathBuf>,
    pub aspect_ratio: Option<String>,

    // engine-side values
    pub state: PlaybackState,
    pub seekable: bool,
    pub volume: i32,
    pub rate: f32,
    pub time_ms: i64,
    pub length_ms: i64,
    pub tracks: Vec<AudioTrack>,
    pub track: Option<u32>,
    pub video_tracks: usize,
    pub frame: Option<VideoFrame>,
    pub subtitle_text: Option<String>,
    pub last_error: Option<String>,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            fail_instance: false,
            fail_player: false,
            fail_play: false,
            fail_tracks: false,
            fail_snapshot: false,
            instances_created: 0,
            instances_released: 0,
            players_released: 0,
            events: None,
            media: None,
            plays: 0,
            pauses: Vec::new(),
            stops: 0,
            positions: Vec::new(),
            subtitles: Vec::new(),
            snapshots: Vec::new(),
            aspect_ratio: None,
            state: PlaybackState::Idle,
            seekable: true,
            volume: 100,
            rate: 1.0,
            time_ms: 0,
            length_ms: 0,
            tracks: Vec::new(),
            track: None,
            video_tracks: 0,
            frame: None,
            subtitle_text: None,
            last_error: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeBackend {
    shared: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.shared.lock()
    }

    /// Raise an event as the engine thread would.
    pub fn emit(&self, event: EngineEvent) {
        let tx = self.shared.lock().events.clone();
        if let Some(tx) = tx {
            let _ = tx.send(event);
        }
    }
}

impl EngineBackend for FakeBackend {
    fn new_instance(&self) -> Result<Box<dyn EngineInstance>, EngineError> {
        let mut state = self.shared.lock();
        if state.fail_instance {
            return Err(EngineError::Init("scripted instance failure".into()));
        }
        state.instances_created += 1;
        Ok(Box::new(FakeInstance {
            shared: Arc::clone(&self.shared),
            released: false,
        }))
    }
}

struct FakeInstance {
    shared: Arc<Mutex<FakeState>>,
    released: bool,
}

impl EngineInstance for FakeInstance {
    fn new_player(&mut self) -> Result<Box<dyn MediaPlayer>, EngineError> {
        if self.shared.lock().fail_player {
            return Err(EngineError::Init("scripted player failure".into()));
        }
        Ok(Box::new(FakePlayer {
            shared: Arc::clone(&self.shared),
            released: false,
        }))
    }

    fn version(&self) -> String {
        "fake 1.0".into()
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.shared.lock().instances_released += 1;
        }
    }
}

struct FakePlayer {
    shared: Arc<Mutex<FakeState>>,
    released: bool,
}

impl MediaPlayer for FakePlayer {
    fn attach(&mut self, events: Sender<EngineEvent>) {
        self.shared.lock().events = Some(events);
    }

    fn set_media(&mut self, path: &Path) -> Result<(), EngineError> {
        self.shared.lock().media = Some(path.to_path_buf());
        Ok(())
    }

    fn play(&mut self) -> Result<(), EngineError> {
        let mut s = self.shared.lock();
        if s.fail_play {
            s.last_error = Some("scripted play failure".into());
            return Err(EngineError::Unsupported("scripted play failure"));
        }
        s.plays += 1;
        s.state = PlaybackState::Playing;
        Ok(())
    }

    fn set_pause(&mut self, pause: bool) {
        let mut s = self.shared.lock();
        s.pauses.push(pause);
        s.state = if pause {
            PlaybackState::Paused
        } else {
            PlaybackState::Playing
        };
    }

    fn stop(&mut self) {
        let mut s = self.shared.lock();
        s.stops += 1;
        s.state = PlaybackState::Stopped;
    }

    fn is_seekable(&self) -> bool {
        self.shared.lock().seekable
    }

    fn set_position(&mut self, ratio: f32) {
        self.shared.lock().positions.push(ratio);
    }

    fn time_ms(&self) -> i64 {
        self.shared.lock().time_ms
    }

    fn length_ms(&self) -> i64 {
        self.shared.lock().length_ms
    }

    fn state(&self) -> PlaybackState {
        self.shared.lock().state
    }

    fn volume(&self) -> i32 {
        self.shared.lock().volume
    }

    fn set_volume(&mut self, volume: i32) {
        self.shared.lock().volume = volume;
    }

    fn rate(&self) -> f32 {
        self.shared.lock().rate
    }

    fn set_rate(&mut self, rate: f32) {
        self.shared.lock().rate = rate;
    }

    fn audio_tracks(&self) -> Result<Vec<AudioTrack>, EngineError> {
        let s = self.shared.lock();
        if s.fail_tracks {
            return Err(EngineError::NoMedia);
        }
        Ok(s.tracks.clone())
    }

    fn audio_track(&self) -> Option<u32> {
        self.shared.lock().track
    }

    fn set_audio_track(&mut self, id: u32) -> Result<(), EngineError> {
        self.shared.lock().track = Some(id);
        Ok(())
    }

    fn video_track_count(&self) -> usize {
        self.shared.lock().video_tracks
    }

    fn add_subtitle(&mut self, path: &Path) -> Result<(), EngineError> {
        self.shared.lock().subtitles.push(path.to_path_buf());
        Ok(())
    }

    fn subtitle_text(&self) -> Option<String> {
        self.shared.lock().subtitle_text.clone()
    }

    fn take_snapshot(&mut self, path: &Path) -> Result<(), EngineError> {
        let mut s = self.shared.lock();
        if s.fail_snapshot {
            return Err(EngineError::Unsupported("scripted snapshot failure"));
        }
        s.snapshots.push(path.to_path_buf());
        Ok(())
    }

    fn set_aspect_ratio(&mut self, ratio: Option<&str>) {
        self.shared.lock().aspect_ratio = ratio.map(str::to_string);
    }

    fn video_frame(&self) -> Option<VideoFrame> {
        self.shared.lock().frame.clone()
    }

    fn last_error(&self) -> Option<String> {
        self.shared.lock().last_error.clone()
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.shared.lock().players_released += 1;
        }
    }
}
