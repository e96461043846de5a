//! core/engine/rodio_engine.rs
//! The built-in engine: rodio output + symphonia decoding on a worker thread.
//!
//! Audio only. Video tracks are never rendered, so snapshots are refused and
//! aspect ratio overrides are ignored.

use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

use super::worker::{Command, EngineWorker, SharedStatus, Status};
use super::{EngineBackend, EngineError, EngineEvent, EngineInstance, MediaPlayer};
use crate::core::subtitles;
use crate::core::types::{AudioTrack, PlaybackState};

#[derive(Debug, Default, Clone, Copy)]
pub struct RodioBackend;

impl EngineBackend for RodioBackend {
    fn new_instance(&self) -> Result<Box<dyn EngineInstance>, EngineError> {
        Ok(Box::new(RodioInstance::spawn()?))
    }
}

pub struct RodioInstance {
    commands: Option<Sender<Command>>,
    status: SharedStatus,
    thread: Option<JoinHandle<()>>,
    player_issued: bool,
}

impl RodioInstance {
    fn spawn() -> Result<Self, EngineError> {
        let status: SharedStatus = Arc::new(Mutex::new(Status::default()));
        let (tx, rx) = mpsc::channel::<Command>();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), String>>(1);

        let worker_status = Arc::clone(&status);
        let thread = thread::Builder::new()
            .name("playdeck-engine".into())
            .spawn(move || {
                // The output stream isn't Send, so it has to be opened here.
                let mut worker = match EngineWorker::new(worker_status) {
                    Ok(worker) => {
                        let _ = ready_tx.send(Ok(()));
                        worker
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                worker.run(rx);
            })
            .map_err(|e| EngineError::Init(format!("failed to spawn engine thread: {e}")))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = thread.join();
                return Err(EngineError::Init(e));
            }
            Err(_) => {
                let _ = thread.join();
                return Err(EngineError::Init("engine thread exited early".into()));
            }
        }

        tracing::info!("audio engine started");
        Ok(Self {
            commands: Some(tx),
            status,
            thread: Some(thread),
            player_issued: false,
        })
    }
}

impl EngineInstance for RodioInstance {
    fn new_player(&mut self) -> Result<Box<dyn MediaPlayer>, EngineError> {
        let commands = self.commands.clone().ok_or(EngineError::Released)?;
        if self.player_issued {
            // One output path per instance.
            return Err(EngineError::Unsupported("only one player per engine instance"));
        }
        self.player_issued = true;

        Ok(Box::new(RodioPlayer {
            commands: Some(commands),
            status: Arc::clone(&self.status),
        }))
    }

    fn version(&self) -> String {
        "rodio 0.21 + symphonia 0.5".to_string()
    }

    fn release(&mut self) {
        if let Some(tx) = self.commands.take() {
            let _ = tx.send(Command::Shutdown);
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::warn!("engine thread panicked");
            }
            tracing::info!("audio engine stopped");
        }
    }
}

impl Drop for RodioInstance {
    fn drop(&mut self) {
        self.release();
    }
}

pub struct RodioPlayer {
    commands: Option<Sender<Command>>,
    status: SharedStatus,
}

impl RodioPlayer {
    fn send(&self, cmd: Command) {
        if let Some(tx) = &self.commands {
            let _ = tx.send(cmd);
        }
    }
}

impl MediaPlayer for RodioPlayer {
    fn attach(&mut self, events: Sender<EngineEvent>) {
        self.send(Command::Attach(events));
    }

    fn set_media(&mut self, path: &Path) -> Result<(), EngineError> {
        if self.commands.is_none() {
            return Err(EngineError::Released);
        }
        {
            // Visible to `play` right away, before the worker has probed it.
            let mut status = self.status.lock();
            status.media = Some(path.to_path_buf());
            status.subtitles = None;
        }
        self.send(Command::Open(path.to_path_buf()));
        Ok(())
    }

    fn play(&mut self) -> Result<(), EngineError> {
        if self.commands.is_none() {
            return Err(EngineError::Released);
        }
        if self.status.lock().media.is_none() {
            return Err(EngineError::NoMedia);
        }
        self.send(Command::Play);
        Ok(())
    }

    fn set_pause(&mut self, pause: bool) {
        self.send(Command::Pause(pause));
    }

    fn stop(&mut self) {
        self.send(Command::Stop);
    }

    fn is_seekable(&self) -> bool {
        self.status.lock().seekable
    }

    fn set_position(&mut self, ratio: f32) {
        self.send(Command::Seek(ratio));
    }

    fn time_ms(&self) -> i64 {
        self.status.lock().time_ms
    }

    fn length_ms(&self) -> i64 {
        self.status.lock().length_ms
    }

    fn state(&self) -> PlaybackState {
        self.status.lock().state
    }

    fn volume(&self) -> i32 {
        self.status.lock().volume
    }

    fn set_volume(&mut self, volume: i32) {
        let volume = volume.clamp(0, 100);
        self.status.lock().volume = volume;
        self.send(Command::SetVolume(volume));
    }

    fn rate(&self) -> f32 {
        self.status.lock().rate
    }

    fn set_rate(&mut self, rate: f32) {
        self.status.lock().rate = rate;
        self.send(Command::SetRate(rate));
    }

    fn audio_tracks(&self) -> Result<Vec<AudioTrack>, EngineError> {
        let status = self.status.lock();
        if status.media.is_none() {
            return Err(EngineError::NoMedia);
        }
        Ok(status.tracks.clone())
    }

    fn audio_track(&self) -> Option<u32> {
        self.status.lock().track
    }

    fn set_audio_track(&mut self, id: u32) -> Result<(), EngineError> {
        if !self.status.lock().tracks.iter().any(|t| t.id == id) {
            return Err(EngineError::Unsupported("no such audio track"));
        }
        self.send(Command::SetAudioTrack(id));
        Ok(())
    }

    fn video_track_count(&self) -> usize {
        0
    }

    fn add_subtitle(&mut self, path: &Path) -> Result<(), EngineError> {
        if self.status.lock().media.is_none() {
            return Err(EngineError::NoMedia);
        }
        let track = subtitles::load(path)?;
        tracing::debug!(cues = track.cues().len(), path = %path.display(), "subtitle loaded");
        self.status.lock().subtitles = Some(track);
        Ok(())
    }

    fn subtitle_text(&self) -> Option<String> {
        let status = self.status.lock();
        let time_ms = u64::try_from(status.time_ms).ok()?;
        status.subtitles.as_ref()?.text_at(time_ms)
    }

    fn take_snapshot(&mut self, _path: &Path) -> Result<(), EngineError> {
        Err(EngineError::Unsupported("no video output"))
    }

    fn set_aspect_ratio(&mut self, ratio: Option<&str>) {
        tracing::debug!(?ratio, "aspect ratio ignored: no video output");
    }

    fn last_error(&self) -> Option<String> {
        self.status.lock().last_error.clone()
    }

    fn release(&mut self) {
        if let Some(tx) = self.commands.take() {
            let _ = tx.send(Command::Stop);
        }
    }
}

impl Drop for RodioPlayer {
    fn drop(&mut self) {
        self.release();
    }
}
