//! core/engine/worker.rs
//! Engine thread (rodio owner).
//!
//! Owns:
//! - OutputStream (must stay alive)
//! - Sink (per current media, recreated on seek / track switch)
//! - command loop + periodic position ticks
//!
//! Publishes a status snapshot for the player handle's getters and raises
//! `EngineEvent`s on the attached channel. No iced imports.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use parking_lot::Mutex;
use rodio::{OutputStream, OutputStreamBuilder, Sink};

use super::EngineEvent;
use super::decoder;
use crate::core::subtitles::SubtitleTrack;
use crate::core::types::{AudioTrack, PlaybackState};

const TICK_MS: u64 = 100;

#[derive(Debug)]
pub(super) enum Command {
    Attach(Sender<EngineEvent>),
    Open(PathBuf),
    Play,
    Pause(bool),
    Stop,
    Seek(f32),
    SetVolume(i32),
    SetRate(f32),
    SetAudioTrack(u32),
    Shutdown,
}

/// What the player handle can read without a round trip.
#[derive(Debug)]
pub(super) struct Status {
    pub media: Option<PathBuf>,
    pub state: PlaybackState,
    pub time_ms: i64,
    pub length_ms: i64,
    pub seekable: bool,
    pub volume: i32,
    pub rate: f32,
    pub tracks: Vec<AudioTrack>,
    pub track: Option<u32>,
    pub subtitles: Option<SubtitleTrack>,
    pub last_error: Option<String>,
}

impl Default for Status {
    fn default() -> Self {
        Self {
            media: None,
            state: PlaybackState::Idle,
            time_ms: 0,
            length_ms: 0,
            seekable: false,
            volume: 100,
            rate: 1.0,
            tracks: Vec::new(),
            track: None,
            subtitles: None,
            last_error: None,
        }
    }
}

pub(super) type SharedStatus = Arc<Mutex<Status>>;

pub(super) struct EngineWorker {
    // Keep this alive for the lifetime of the engine!
    stream: OutputStream,

    sink: Option<Sink>,
    // Media time at which the current sink's source started.
    base_ms: u64,

    status: SharedStatus,
    events: Option<Sender<EngineEvent>>,
}

impl EngineWorker {
    pub fn new(status: SharedStatus) -> Result<Self, String> {
        // rodio 0.21.x: build/open the default output stream via OutputStreamBuilder
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| format!("failed to open default audio output: {e}"))?;
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            base_ms: 0,
            status,
            events: None,
        })
    }

    pub fn run(&mut self, command_rx: Receiver<Command>) {
        let tick = Duration::from_millis(TICK_MS);

        loop {
            match command_rx.recv_timeout(tick) {
                Ok(cmd) => {
                    if self.handle_command(cmd) {
                        break;
                    }
                    while let Ok(cmd) = command_rx.try_recv() {
                        if self.handle_command(cmd) {
                            self.stop_internal();
                            return;
                        }
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            self.tick();
        }

        self.stop_internal();
    }

    fn emit(&self, event: EngineEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }

    fn set_state(&self, state: PlaybackState) {
        self.status.lock().state = state;
    }

    fn handle_command(&mut self, cmd: Command) -> bool {
        tracing::trace!(?cmd, "engine command");
        match cmd {
            Command::Attach(tx) => self.events = Some(tx),
            Command::Open(path) => self.open(path),
            Command::Play => self.play(),
            Command::Pause(true) => {
                if let Some(sink) = &self.sink {
                    if !sink.is_paused() {
                        sink.pause();
                        self.set_state(PlaybackState::Paused);
                        self.emit(EngineEvent::Paused);
                    }
                }
            }
            Command::Pause(false) => {
                if let Some(sink) = &self.sink {
                    if sink.is_paused() {
                        sink.play();
                        self.set_state(PlaybackState::Playing);
                        self.emit(EngineEvent::Playing);
                    }
                }
            }
            Command::Stop => {
                let had_media = self.status.lock().media.is_some();
                self.stop_internal();
                if had_media {
                    self.set_state(PlaybackState::Stopped);
                    self.emit(EngineEvent::Stopped);
                }
            }
            Command::Seek(ratio) => self.seek(ratio),
            Command::SetVolume(v) => {
                self.status.lock().volume = v;
                if let Some(sink) = &self.sink {
                    sink.set_volume(gain(v));
                }
            }
            Command::SetRate(r) => {
                self.status.lock().rate = r;
                if let Some(sink) = &self.sink {
                    sink.set_speed(r);
                }
            }
            Command::SetAudioTrack(id) => self.switch_track(id),
            Command::Shutdown => return true,
        }

        false
    }

    fn tick(&mut self) {
        let Some(sink) = &self.sink else {
            return;
        };
        if sink.is_paused() {
            return;
        }

        let position_ms = self.base_ms + sink.get_pos().as_millis() as u64;
        let drained = sink.empty();
        let speed = sink.speed();

        let length_ms = {
            let mut status = self.status.lock();
            status.time_ms = position_ms as i64;
            status.rate = speed;
            status.length_ms
        };

        self.emit(EngineEvent::TimeChanged(position_ms as i64));
        if length_ms > 0 {
            let ratio = (position_ms as f64 / length_ms as f64).clamp(0.0, 1.0) as f32;
            self.emit(EngineEvent::PositionChanged(ratio));
        }

        if drained {
            self.sink = None;
            self.base_ms = 0;
            self.set_state(PlaybackState::Ended);
            self.emit(EngineEvent::EndReached);
        }
    }

    fn open(&mut self, path: PathBuf) {
        self.stop_internal();

        let probed = decoder::probe(&path);

        let mut status = self.status.lock();
        status.media = Some(path);
        status.state = PlaybackState::Idle;
        status.time_ms = 0;
        status.subtitles = None;

        match probed {
            Ok(info) => {
                status.length_ms = info.duration_ms.map_or(0, |d| d as i64);
                status.seekable = info.duration_ms.is_some();
                status.track = info.default_track;
                status.tracks = info.tracks;
                status.last_error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "media probe failed");
                status.length_ms = 0;
                status.seekable = false;
                status.track = None;
                status.tracks.clear();
                status.last_error = Some(e);
            }
        }
    }

    fn play(&mut self) {
        if let Some(sink) = &self.sink {
            if sink.is_paused() {
                sink.play();
                self.set_state(PlaybackState::Playing);
                self.emit(EngineEvent::Playing);
            }
            return;
        }

        self.emit(EngineEvent::Opening);
        self.set_state(PlaybackState::Opening);

        match self.start_at(0, false) {
            Ok(()) => {
                let length_ms = self.status.lock().length_ms;
                if length_ms > 0 {
                    self.emit(EngineEvent::LengthChanged(length_ms));
                }
                self.set_state(PlaybackState::Playing);
                self.emit(EngineEvent::Playing);
            }
            Err(e) => self.fail(e),
        }
    }

    fn seek(&mut self, ratio: f32) {
        let (seekable, length_ms) = {
            let status = self.status.lock();
            (status.seekable, status.length_ms)
        };
        if !seekable || length_ms <= 0 {
            return;
        }
        let Some(paused) = self.sink.as_ref().map(Sink::is_paused) else {
            return;
        };

        let target_ms = (f64::from(ratio.clamp(0.0, 1.0)) * length_ms as f64).round() as u64;
        // Seeking to exactly the end tends to produce EOF weirdness; clamp slightly.
        let target_ms = target_ms.min((length_ms as u64).saturating_sub(1));

        match self.start_at(target_ms, paused) {
            Ok(()) => {
                self.status.lock().time_ms = target_ms as i64;
                self.emit(EngineEvent::TimeChanged(target_ms as i64));
                self.emit(EngineEvent::PositionChanged(ratio));
            }
            Err(e) => self.fail(e),
        }
    }

    fn switch_track(&mut self, id: u32) {
        {
            let mut status = self.status.lock();
            if !status.tracks.iter().any(|t| t.id == id) {
                return;
            }
            status.track = Some(id);
        }

        // Restart the live sink on the new track at the same spot.
        let Some(paused) = self.sink.as_ref().map(Sink::is_paused) else {
            return;
        };
        let resume_ms = self.status.lock().time_ms.max(0) as u64;
        if let Err(e) = self.start_at(resume_ms, paused) {
            self.fail(e);
        }
    }

    /// (Re)build the sink with the current media starting at `start_ms`.
    fn start_at(&mut self, start_ms: u64, paused: bool) -> Result<(), String> {
        let (path, track, volume, rate) = {
            let status = self.status.lock();
            let path = status.media.clone().ok_or("no media loaded")?;
            (path, status.track, status.volume, status.rate)
        };

        let source = decoder::open_source_at_ms(&path, track, start_ms)?;

        if let Some(old) = self.sink.take() {
            old.stop();
        }

        // rodio 0.21.x: Sink is created from the stream's mixer
        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(gain(volume));
        sink.set_speed(rate);
        sink.append(source);
        if paused {
            sink.pause();
        } else {
            sink.play();
        }

        self.base_ms = start_ms;
        self.sink = Some(sink);
        Ok(())
    }

    fn fail(&mut self, message: String) {
        tracing::warn!(error = %message, "playback failed");
        self.stop_internal();
        {
            let mut status = self.status.lock();
            status.state = PlaybackState::Error;
            status.last_error = Some(message);
        }
        self.emit(EngineEvent::EncounteredError);
    }

    fn stop_internal(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.base_ms = 0;
        self.status.lock().time_ms = 0;
    }
}

/// Engine volume (0..=100) -> rodio linear gain.
fn gain(volume: i32) -> f32 {
    volume.clamp(0, 100) as f32 / 100.0
}
