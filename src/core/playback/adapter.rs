//! core/playback/adapter.rs
//! The playback adapter (engine owner on the UI side).
//!
//! Lifecycle:
//! - `new` stores the backend, nothing is created yet
//! - `initialize` creates instance + player once the window exists
//! - `pump` drains engine events on every UI tick
//! - `release_resources` (or drop) tears everything down

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Instant;

use super::{
    AdapterError, AdapterTiming, MAX_RATE, MAX_VOLUME, MIN_RATE, MIN_VOLUME, Notification,
    UNKNOWN_ERROR,
};
use crate::core::engine::{EngineBackend, EngineEvent, EngineInstance, MediaPlayer};
use crate::core::types::{AspectRatio, AudioTrack, PlaybackState, VideoFrame};

pub struct PlaybackAdapter {
    backend: Box<dyn EngineBackend>,
    timing: AdapterTiming,

    instance: Option<Box<dyn EngineInstance>>,
    player: Option<Box<dyn MediaPlayer>>,
    events: Option<Receiver<EngineEvent>>,

    media: Option<PathBuf>,
    looping: bool,

    // Dedup memory for the chatty events.
    last_time_ms: Option<i64>,
    last_position: Option<f32>,
    last_rate: f32,

    // Deadlines, checked by `pump`.
    restart_at: Option<Instant>,
    rate_poll_at: Option<Instant>,

    // Produced outside `pump` (command failures), flushed by the next `pump`.
    outbox: Vec<Notification>,
}

impl PlaybackAdapter {
    pub fn new(backend: Box<dyn EngineBackend>, timing: AdapterTiming) -> Self {
        Self {
            backend,
            timing,
            instance: None,
            player: None,
            events: None,
            media: None,
            looping: false,
            last_time_ms: None,
            last_position: None,
            last_rate: 1.0,
            restart_at: None,
            rate_poll_at: None,
            outbox: Vec::new(),
        }
    }

    /// Create the engine. Call once, after the main window exists.
    pub fn initialize(&mut self) -> Result<(), AdapterError> {
        if self.is_ready() {
            return Ok(());
        }

        let result = self.try_initialize();
        if let Err(e) = &result {
            tracing::error!(error = %e, "engine initialization failed");
            self.outbox.push(Notification::Error(e.to_string()));
            self.release_resources();
        }
        result
    }

    fn try_initialize(&mut self) -> Result<(), AdapterError> {
        let instance = self
            .backend
            .new_instance()
            .map_err(AdapterError::Instance)?;
        // Kept before the player exists so a player failure still releases it.
        let instance = self.instance.insert(instance);

        let mut player = instance.new_player().map_err(AdapterError::Player)?;

        let (tx, rx) = mpsc::channel();
        player.attach(tx);

        tracing::info!(version = %instance.version(), "engine ready");
        self.player = Some(player);
        self.events = Some(rx);
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.player.is_some()
    }

    // ---------------------------------------------------------------------
    // Commands
    // ---------------------------------------------------------------------

    /// Replace the active media. `false` when the engine is not ready, the
    /// file is missing or the engine rejects it.
    pub fn load(&mut self, path: &Path) -> bool {
        let Some(player) = self.player.as_mut() else {
            return false;
        };

        if !path.exists() {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Invalid Path".to_string());
            self.outbox
                .push(Notification::Error(format!("File not found: {name}")));
            return false;
        }

        if let Err(e) = player.set_media(path) {
            self.outbox
                .push(Notification::Error(format!("Error loading media: {e}")));
            return false;
        }

        // Whatever the previous media still had queued is stale now.
        if let Some(rx) = &self.events {
            let stale = rx.try_iter().count();
            if stale > 0 {
                tracing::debug!(stale, "dropped events of the previous media");
            }
        }

        tracing::debug!(path = %path.display(), "media loaded");
        self.media = Some(path.to_path_buf());
        self.last_time_ms = None;
        self.last_position = None;
        self.restart_at = None;
        true
    }

    pub fn play(&mut self) {
        if self.media.is_none() {
            return;
        }
        let Some(player) = self.player.as_mut() else {
            return;
        };
        if let Err(e) = player.play() {
            tracing::warn!(error = %e, "engine refused to play");
            self.raise_error();
        }
    }

    pub fn pause(&mut self) {
        if self.state() != PlaybackState::Playing {
            return;
        }
        if let Some(player) = self.player.as_mut() {
            player.set_pause(true);
        }
    }

    pub fn stop(&mut self) {
        if self.media.is_none() {
            return;
        }
        if let Some(player) = self.player.as_mut() {
            player.stop();
        }
        self.restart_at = None;
    }

    /// Seek to `ratio` (clamped to 0..=1) of the duration.
    pub fn seek(&mut self, ratio: f32) {
        if self.media.is_none() {
            return;
        }
        let Some(player) = self.player.as_mut() else {
            return;
        };
        if player.is_seekable() {
            player.set_position(clamp_ratio(ratio));
        }
    }

    pub fn set_volume(&mut self, volume: i32) {
        if let Some(player) = self.player.as_mut() {
            player.set_volume(volume.clamp(MIN_VOLUME, MAX_VOLUME));
        }
    }

    pub fn set_rate(&mut self, rate: f32) {
        if self.media.is_none() {
            return;
        }
        let Some(player) = self.player.as_mut() else {
            return;
        };
        if player.is_seekable() {
            player.set_rate(clamp_rate(rate));
        }
    }

    pub fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
        if !looping {
            self.restart_at = None;
        }
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn audio_tracks(&self) -> Vec<AudioTrack> {
        let Some(player) = self.player.as_ref() else {
            return Vec::new();
        };
        match player.audio_tracks() {
            Ok(tracks) => tracks,
            Err(e) => {
                tracing::debug!(error = %e, "no audio track list");
                Vec::new()
            }
        }
    }

    pub fn set_audio_track(&mut self, id: u32) {
        if let Some(player) = self.player.as_mut() {
            if let Err(e) = player.set_audio_track(id) {
                tracing::warn!(error = %e, id, "audio track switch failed");
            }
        }
    }

    /// Attach an external subtitle file. `false` when the file is missing
    /// (the engine is not consulted) or the engine rejects it.
    pub fn set_subtitle_file(&mut self, path: &Path) -> bool {
        if self.media.is_none() || !path.exists() {
            return false;
        }
        let Some(player) = self.player.as_mut() else {
            return false;
        };
        match player.add_subtitle(path) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "subtitle rejected");
                false
            }
        }
    }

    pub fn take_snapshot(&mut self, path: Option<&Path>) -> bool {
        let Some(path) = path else {
            return false;
        };
        let Some(player) = self.player.as_mut() else {
            return false;
        };
        match player.take_snapshot(path) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "snapshot failed");
                false
            }
        }
    }

    pub fn set_aspect_ratio(&mut self, ratio: Option<AspectRatio>) {
        if let Some(player) = self.player.as_mut() {
            player.set_aspect_ratio(ratio.and_then(AspectRatio::as_engine_str));
        }
    }

    /// Stop and drop every engine handle. Safe to call repeatedly.
    pub fn release_resources(&mut self) {
        self.restart_at = None;
        self.rate_poll_at = None;
        self.events = None;

        let had_engine = self.player.is_some() || self.instance.is_some();

        if let Some(mut player) = self.player.take() {
            player.stop();
            player.release();
        }
        if let Some(mut instance) = self.instance.take() {
            instance.release();
        }
        self.media = None;

        if had_engine {
            tracing::info!("engine resources released");
        }
    }

    // ---------------------------------------------------------------------
    // Getters
    // ---------------------------------------------------------------------

    pub fn volume(&self) -> i32 {
        self.player.as_ref().map_or(0, |p| p.volume())
    }

    pub fn rate(&self) -> f32 {
        self.player.as_ref().map_or(1.0, |p| p.rate())
    }

    pub fn time_ms(&self) -> i64 {
        self.player.as_ref().map_or(0, |p| p.time_ms())
    }

    pub fn duration_ms(&self) -> i64 {
        self.player.as_ref().map_or(0, |p| p.length_ms())
    }

    pub fn state(&self) -> PlaybackState {
        self.player
            .as_ref()
            .map_or(PlaybackState::Idle, |p| p.state())
    }

    pub fn current_audio_track(&self) -> Option<u32> {
        self.player.as_ref().and_then(|p| p.audio_track())
    }

    pub fn has_video(&self) -> bool {
        self.player
            .as_ref()
            .is_some_and(|p| p.video_track_count() > 0)
    }

    pub fn subtitle_text(&self) -> Option<String> {
        self.player.as_ref().and_then(|p| p.subtitle_text())
    }

    /// Newest decoded picture of the current media.
    pub fn video_frame(&self) -> Option<VideoFrame> {
        self.media.as_ref()?;
        self.player.as_ref().and_then(|p| p.video_frame())
    }

    pub fn engine_version(&self) -> Option<String> {
        self.instance.as_ref().map(|i| i.version())
    }

    pub fn current_media(&self) -> Option<&Path> {
        self.media.as_deref()
    }

    // ---------------------------------------------------------------------
    // Event pump
    // ---------------------------------------------------------------------

    /// Drain engine events and run due deadlines. Call from the UI thread.
    pub fn pump(&mut self, now: Instant) -> Vec<Notification> {
        let pending: Vec<EngineEvent> = match &self.events {
            Some(rx) => rx.try_iter().collect(),
            None => Vec::new(),
        };
        for event in pending {
            self.on_event(event, now);
        }

        if self.restart_at.is_some_and(|at| at <= now) {
            self.restart_at = None;
            tracing::debug!("loop restart");
            self.play();
        }

        if self.rate_poll_at.is_some_and(|at| at <= now) {
            self.poll_rate(now);
        }

        std::mem::take(&mut self.outbox)
    }

    fn on_event(&mut self, event: EngineEvent, now: Instant) {
        tracing::trace!(?event, "engine event");
        match event {
            EngineEvent::TimeChanged(ms) => {
                if self.last_time_ms != Some(ms) {
                    self.last_time_ms = Some(ms);
                    self.outbox.push(Notification::Time(ms));
                }
            }
            EngineEvent::PositionChanged(pos) => {
                let changed = self
                    .last_position
                    .is_none_or(|last| (pos - last).abs() > 0.001);
                if changed {
                    self.last_position = Some(pos);
                    self.outbox.push(Notification::Position(pos));
                }
            }
            EngineEvent::LengthChanged(ms) => self.outbox.push(Notification::Duration(ms)),
            EngineEvent::Opening => self.on_state(PlaybackState::Opening, now),
            EngineEvent::Buffering(_) => self.on_state(PlaybackState::Buffering, now),
            EngineEvent::Playing => self.on_state(PlaybackState::Playing, now),
            EngineEvent::Paused => self.on_state(PlaybackState::Paused, now),
            EngineEvent::Stopped => self.on_state(PlaybackState::Stopped, now),
            EngineEvent::EndReached => self.on_state(PlaybackState::Ended, now),
            EngineEvent::EncounteredError => self.raise_error(),
        }
    }

    fn on_state(&mut self, state: PlaybackState, now: Instant) {
        self.outbox.push(Notification::State(state));

        match state {
            PlaybackState::Ended if self.looping => {
                self.restart_at = Some(now + self.timing.loop_restart_delay);
                self.rate_poll_at = None;
            }
            PlaybackState::Playing if self.rate_poll_at.is_none() => {
                self.rate_poll_at = Some(now + self.timing.rate_poll_interval);
            }
            PlaybackState::Stopped | PlaybackState::Ended | PlaybackState::Error => {
                self.rate_poll_at = None;
            }
            _ => {}
        }
    }

    fn raise_error(&mut self) {
        let mut message = UNKNOWN_ERROR.to_string();
        if let Some(detail) = self.player.as_ref().and_then(|p| p.last_error()) {
            message.push_str(&format!("\n({detail})"));
        }
        tracing::warn!(%message, "playback error");

        self.rate_poll_at = None;
        self.outbox.push(Notification::State(PlaybackState::Error));
        self.outbox.push(Notification::Error(message));
    }

    fn poll_rate(&mut self, now: Instant) {
        let Some(player) = self.player.as_ref() else {
            self.rate_poll_at = None;
            return;
        };
        if !matches!(
            player.state(),
            PlaybackState::Playing | PlaybackState::Paused
        ) {
            self.rate_poll_at = None;
            return;
        }

        let rate = player.rate();
        if rate != self.last_rate {
            self.last_rate = rate;
            self.outbox.push(Notification::Rate(rate));
        }
        self.rate_poll_at = Some(now + self.timing.rate_poll_interval);
    }

    #[cfg(test)]
    pub(crate) fn rate_poll_active(&self) -> bool {
        self.rate_poll_at.is_some()
    }
}

impl Drop for PlaybackAdapter {
    fn drop(&mut self) {
        self.release_resources();
    }
}

fn clamp_ratio(ratio: f32) -> f32 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

fn clamp_rate(rate: f32) -> f32 {
    if rate.is_nan() {
        1.0
    } else {
        rate.clamp(MIN_RATE, MAX_RATE)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::core::engine::fake::FakeBackend;

    fn ready() -> (PlaybackAdapter, FakeBackend) {
        let fake = FakeBackend::new();
        let mut adapter = PlaybackAdapter::new(Box::new(fake.clone()), AdapterTiming::default());
        adapter.initialize().unwrap();
        (adapter, fake)
    }

    fn with_media() -> (PlaybackAdapter, FakeBackend, tempfile::TempDir) {
        let (mut adapter, fake) = ready();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"x").unwrap();
        assert!(adapter.load(&path));
        (adapter, fake, dir)
    }

    #[test]
    fn not_ready_until_initialized() {
        let fake = FakeBackend::new();
        let mut adapter = PlaybackAdapter::new(Box::new(fake.clone()), AdapterTiming::default());

        assert!(!adapter.is_ready());
        assert_eq!(adapter.state(), PlaybackState::Idle);
        assert!(!adapter.load(Path::new("/nope")));
        adapter.play();
        adapter.set_volume(10);
        assert_eq!(fake.state().instances_created, 0);
        assert!(adapter.pump(Instant::now()).is_empty());

        adapter.initialize().unwrap();
        assert!(adapter.is_ready());
        assert_eq!(adapter.engine_version().as_deref(), Some("fake 1.0"));
    }

    #[test]
    fn player_failure_releases_the_instance() {
        let fake = FakeBackend::new();
        fake.state().fail_player = true;
        let mut adapter = PlaybackAdapter::new(Box::new(fake.clone()), AdapterTiming::default());

        let err = adapter.initialize().unwrap_err();
        assert!(matches!(err, AdapterError::Player(_)));
        assert!(!adapter.is_ready());
        assert_eq!(fake.state().instances_created, 1);
        assert_eq!(fake.state().instances_released, 1);

        let out = adapter.pump(Instant::now());
        assert!(matches!(out.as_slice(), [Notification::Error(_)]));
    }

    #[test]
    fn instance_failure_reports_error() {
        let fake = FakeBackend::new();
        fake.state().fail_instance = true;
        let mut adapter = PlaybackAdapter::new(Box::new(fake.clone()), AdapterTiming::default());

        assert!(matches!(
            adapter.initialize(),
            Err(AdapterError::Instance(_))
        ));
        assert!(!adapter.is_ready());
    }

    #[test]
    fn missing_file_is_reported() {
        let (mut adapter, fake) = ready();
        assert!(!adapter.load(Path::new("/definitely/not/here.mp4")));
        assert_eq!(
            adapter.pump(Instant::now()),
            vec![Notification::Error("File not found: here.mp4".into())]
        );
        assert!(fake.state().media.is_none());
        assert!(adapter.current_media().is_none());
    }

    #[test]
    fn missing_file_keeps_the_active_media() {
        let (mut adapter, fake, dir) = with_media();
        let first = dir.path().join("clip.mp4");
        adapter.pump(Instant::now());

        assert!(!adapter.load(&dir.path().join("gone.mp4")));
        assert_eq!(
            adapter.pump(Instant::now()),
            vec![Notification::Error("File not found: gone.mp4".into())]
        );
        assert_eq!(adapter.current_media(), Some(first.as_path()));
        assert_eq!(fake.state().media.as_deref(), Some(first.as_path()));

        adapter.play();
        assert_eq!(fake.state().plays, 1);
    }

    #[test]
    fn load_drops_events_of_the_previous_media() {
        let (mut adapter, fake, dir) = with_media();
        adapter.pump(Instant::now());

        fake.emit(EngineEvent::EndReached);
        let next = dir.path().join("next.mp4");
        std::fs::write(&next, b"x").unwrap();
        assert!(adapter.load(&next));

        assert!(adapter.pump(Instant::now()).is_empty());
    }

    #[test]
    fn video_facts_come_from_the_player() {
        let (mut adapter, fake) = ready();
        fake.state().video_tracks = 1;
        fake.state().frame = Some(VideoFrame {
            serial: 7,
            width: 2,
            height: 1,
            pixels: std::sync::Arc::new(vec![0; 8]),
        });
        assert!(adapter.has_video());
        // No media yet: a stale picture is not shown.
        assert!(adapter.video_frame().is_none());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie.mkv");
        std::fs::write(&path, b"x").unwrap();
        assert!(adapter.load(&path));
        assert_eq!(adapter.video_frame().map(|f| f.serial), Some(7));

        adapter.release_resources();
        assert!(!adapter.has_video());
        assert!(adapter.video_frame().is_none());
    }

    #[test]
    fn commands_without_media_are_ignored() {
        let (mut adapter, fake) = ready();
        adapter.play();
        adapter.seek(0.5);
        adapter.set_rate(2.0);
        adapter.stop();

        let s = fake.state();
        assert_eq!(s.plays, 0);
        assert!(s.positions.is_empty());
        assert_eq!(s.rate, 1.0);
        assert_eq!(s.stops, 0);
    }

    #[test]
    fn volume_is_clamped() {
        let (mut adapter, fake) = ready();
        for (asked, applied) in [(-5, 0), (0, 0), (42, 42), (100, 100), (150, 100)] {
            adapter.set_volume(asked);
            assert_eq!(fake.state().volume, applied);
        }
    }

    #[test]
    fn rate_is_clamped_and_needs_seekable_media() {
        let (mut adapter, fake, _dir) = with_media();
        for (asked, applied) in [(0.1, 0.25), (1.5, 1.5), (9.0, 4.0)] {
            adapter.set_rate(asked);
            assert_eq!(fake.state().rate, applied);
        }

        fake.state().seekable = false;
        adapter.set_rate(2.0);
        assert_eq!(fake.state().rate, 4.0);
    }

    #[test]
    fn seek_is_clamped_and_needs_seekable_media() {
        let (mut adapter, fake, _dir) = with_media();
        adapter.seek(-1.0);
        adapter.seek(0.3);
        adapter.seek(7.0);
        assert_eq!(fake.state().positions, vec![0.0, 0.3, 1.0]);

        fake.state().seekable = false;
        adapter.seek(0.5);
        assert_eq!(fake.state().positions.len(), 3);
    }

    #[test]
    fn pause_only_when_playing() {
        let (mut adapter, fake, _dir) = with_media();
        adapter.pause();
        assert!(fake.state().pauses.is_empty());

        adapter.play();
        adapter.pause();
        assert_eq!(fake.state().pauses, vec![true]);
    }

    #[test]
    fn time_and_position_are_deduplicated() {
        let (mut adapter, fake, _dir) = with_media();
        for event in [
            EngineEvent::TimeChanged(100),
            EngineEvent::TimeChanged(100),
            EngineEvent::TimeChanged(200),
            EngineEvent::PositionChanged(0.1),
            EngineEvent::PositionChanged(0.1005),
            EngineEvent::PositionChanged(0.2),
            EngineEvent::LengthChanged(60_000),
            EngineEvent::LengthChanged(60_000),
        ] {
            fake.emit(event);
        }

        assert_eq!(
            adapter.pump(Instant::now()),
            vec![
                Notification::Time(100),
                Notification::Time(200),
                Notification::Position(0.1),
                Notification::Position(0.2),
                Notification::Duration(60_000),
                Notification::Duration(60_000),
            ]
        );
    }

    #[test]
    fn each_state_event_gives_one_notification() {
        let (mut adapter, fake, _dir) = with_media();
        fake.emit(EngineEvent::Opening);
        fake.emit(EngineEvent::Buffering(0.5));
        fake.emit(EngineEvent::Playing);
        fake.emit(EngineEvent::Paused);
        fake.emit(EngineEvent::Stopped);

        assert_eq!(
            adapter.pump(Instant::now()),
            vec![
                Notification::State(PlaybackState::Opening),
                Notification::State(PlaybackState::Buffering),
                Notification::State(PlaybackState::Playing),
                Notification::State(PlaybackState::Paused),
                Notification::State(PlaybackState::Stopped),
            ]
        );
    }

    #[test]
    fn engine_error_carries_detail() {
        let (mut adapter, fake, _dir) = with_media();
        fake.state().last_error = Some("codec missing".into());
        fake.emit(EngineEvent::EncounteredError);

        assert_eq!(
            adapter.pump(Instant::now()),
            vec![
                Notification::State(PlaybackState::Error),
                Notification::Error(format!("{UNKNOWN_ERROR}\n(codec missing)")),
            ]
        );
    }

    #[test]
    fn refused_play_takes_the_error_path() {
        let (mut adapter, fake, _dir) = with_media();
        fake.state().fail_play = true;
        adapter.play();

        let out = adapter.pump(Instant::now());
        assert_eq!(out[0], Notification::State(PlaybackState::Error));
        assert!(matches!(&out[1], Notification::Error(m) if m.starts_with(UNKNOWN_ERROR)));
    }

    #[test]
    fn loop_restart_is_deferred() {
        let (mut adapter, fake, _dir) = with_media();
        adapter.set_loop(true);
        adapter.play();
        assert_eq!(fake.state().plays, 1);

        let t0 = Instant::now();
        fake.emit(EngineEvent::EndReached);
        let out = adapter.pump(t0);
        assert_eq!(out, vec![Notification::State(PlaybackState::Ended)]);
        assert_eq!(fake.state().plays, 1);

        adapter.pump(t0 + Duration::from_millis(49));
        assert_eq!(fake.state().plays, 1);

        adapter.pump(t0 + Duration::from_millis(50));
        assert_eq!(fake.state().plays, 2);

        adapter.pump(t0 + Duration::from_millis(500));
        assert_eq!(fake.state().plays, 2);
    }

    #[test]
    fn end_without_loop_does_not_restart() {
        let (mut adapter, fake, _dir) = with_media();
        adapter.play();
        let t0 = Instant::now();
        fake.emit(EngineEvent::EndReached);
        adapter.pump(t0);
        adapter.pump(t0 + Duration::from_secs(1));
        assert_eq!(fake.state().plays, 1);
    }

    #[test]
    fn rate_poll_runs_while_playing() {
        let (mut adapter, fake, _dir) = with_media();
        adapter.play();
        let t0 = Instant::now();

        fake.emit(EngineEvent::Playing);
        adapter.pump(t0);
        assert!(adapter.rate_poll_active());

        fake.state().rate = 1.5;
        assert!(adapter.pump(t0 + Duration::from_millis(100)).is_empty());
        assert_eq!(
            adapter.pump(t0 + Duration::from_millis(250)),
            vec![Notification::Rate(1.5)]
        );
        // unchanged rate is not republished
        assert!(adapter.pump(t0 + Duration::from_millis(500)).is_empty());

        fake.emit(EngineEvent::Stopped);
        adapter.pump(t0 + Duration::from_millis(600));
        assert!(!adapter.rate_poll_active());
    }

    #[test]
    fn rate_poll_stops_itself_outside_playback() {
        let (mut adapter, fake, _dir) = with_media();
        let t0 = Instant::now();
        fake.emit(EngineEvent::Playing);
        adapter.pump(t0);
        assert!(adapter.rate_poll_active());

        fake.state().state = PlaybackState::Opening;
        adapter.pump(t0 + Duration::from_millis(300));
        assert!(!adapter.rate_poll_active());
    }

    #[test]
    fn audio_tracks_swallow_engine_errors() {
        let (mut adapter, fake, _dir) = with_media();
        fake.state().tracks = vec![AudioTrack {
            id: 1,
            description: "English".into(),
        }];
        assert_eq!(adapter.audio_tracks().len(), 1);

        fake.state().fail_tracks = true;
        assert!(adapter.audio_tracks().is_empty());

        adapter.set_audio_track(1);
        assert_eq!(adapter.current_audio_track(), Some(1));
    }

    #[test]
    fn subtitle_needs_an_existing_file() {
        let (mut adapter, fake, dir) = with_media();
        assert!(!adapter.set_subtitle_file(&dir.path().join("missing.srt")));
        assert!(fake.state().subtitles.is_empty());

        let srt = dir.path().join("clip.srt");
        std::fs::write(&srt, "").unwrap();
        assert!(adapter.set_subtitle_file(&srt));
        assert_eq!(fake.state().subtitles, vec![srt]);
    }

    #[test]
    fn snapshot_needs_path_and_success() {
        let (mut adapter, fake, dir) = with_media();
        assert!(!adapter.take_snapshot(None));

        let target = dir.path().join("shot.png");
        assert!(adapter.take_snapshot(Some(&target)));

        fake.state().fail_snapshot = true;
        assert!(!adapter.take_snapshot(Some(&target)));
        assert_eq!(fake.state().snapshots.len(), 1);
    }

    #[test]
    fn aspect_ratio_default_clears_override() {
        let (mut adapter, fake) = ready();
        adapter.set_aspect_ratio(Some(AspectRatio::Wide));
        assert_eq!(fake.state().aspect_ratio.as_deref(), Some("16:9"));
        adapter.set_aspect_ratio(Some(AspectRatio::Default));
        assert_eq!(fake.state().aspect_ratio, None);
        adapter.set_aspect_ratio(Some(AspectRatio::Square));
        adapter.set_aspect_ratio(None);
        assert_eq!(fake.state().aspect_ratio, None);
    }

    #[test]
    fn release_is_idempotent() {
        let (mut adapter, fake, _dir) = with_media();
        adapter.release_resources();
        adapter.release_resources();
        drop(adapter);

        let s = fake.state();
        assert_eq!(s.players_released, 1);
        assert_eq!(s.instances_released, 1);
        assert_eq!(s.stops, 1);
    }
}
