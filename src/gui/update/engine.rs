//! gui/update/engine.rs
//! Adapter lifecycle + notification handling.
//!
//! - The engine is created by the first update after the window exists.
//! - Every Tick drains the adapter; notifications become widget state here.

use std::time::{Duration, Instant};

use iced::Task;
use iced::widget::image;

use super::super::state::{Message, Player};
use super::{dialogs, playlist, util};
use crate::core::playback::Notification;
use crate::core::types::PlaybackState;

/// Delay before a command-line file is opened.
const STARTUP_LOAD_DELAY: Duration = Duration::from_millis(100);

pub(crate) fn initialize(state: &mut Player) -> Task<Message> {
    if state.adapter.is_ready() {
        return Task::none();
    }

    if let Err(e) = state.adapter.initialize() {
        state.status = "Playback engine failed to initialize.".into();
        return dialogs::fatal(format!(
            "Could not start the playback engine:\n{e}\n\nCheck the log for details."
        ));
    }

    state.adapter.set_volume(state.volume);
    state.volume = state.adapter.volume();
    state.rate = state.adapter.rate();
    state.playback_state = state.adapter.state();
    state.status = "Ready.".into();

    if state.startup_file.is_some() {
        return util::after(STARTUP_LOAD_DELAY, Message::LoadStartupFile);
    }
    Task::none()
}

pub(crate) fn load_startup_file(state: &mut Player) -> Task<Message> {
    let Some(path) = state.startup_file.take() else {
        return Task::none();
    };

    if !path.is_file() {
        tracing::warn!(path = %path.display(), "command-line file not found");
        return dialogs::error(format!("File not found: {}", path.display()));
    }

    playlist::handle_opened(state, vec![path])
}

pub(crate) fn tick(state: &mut Player, now: Instant) -> Task<Message> {
    let notifications = state.adapter.pump(now);
    let tasks: Vec<Task<Message>> = notifications
        .into_iter()
        .map(|n| apply(state, n))
        .collect();

    state.subtitle = state.adapter.subtitle_text();
    refresh_frame(state);

    if state.hide_controls_at.is_some_and(|at| at <= now) {
        state.hide_controls_at = None;
        if state.fullscreen && !state.controls_hovered {
            state.controls_visible = false;
        }
    }

    Task::batch(tasks)
}

pub(crate) fn apply(state: &mut Player, notification: Notification) -> Task<Message> {
    match notification {
        Notification::Time(ms) => {
            // If user is dragging the seek slider, don't fight them.
            if state.seek_preview.is_none() {
                state.time_ms = ms;
            }
        }
        Notification::Position(ratio) => {
            if state.seek_preview.is_none() {
                state.position = ratio;
            }
        }
        Notification::Duration(ms) => state.duration_ms = ms,
        Notification::Rate(rate) => state.rate = rate,
        Notification::State(playback_state) => return state_changed(state, playback_state),
        Notification::Error(message) => {
            state.status = message.lines().next().unwrap_or_default().to_string();
            return dialogs::error(message);
        }
    }

    Task::none()
}

fn state_changed(state: &mut Player, playback_state: PlaybackState) -> Task<Message> {
    tracing::debug!(?playback_state, "playback state");
    state.playback_state = playback_state;
    refresh_media_facts(state);

    match playback_state {
        PlaybackState::Stopped => {
            state.time_ms = 0;
            state.position = 0.0;
            state.seek_preview = None;
        }
        PlaybackState::Ended if !state.looping => {
            let delay = Duration::from_millis(state.config.playback.auto_advance_delay_ms);
            return util::after(delay, Message::AutoAdvance(state.playlist.current_index()));
        }
        _ => {}
    }

    Task::none()
}

/// Swap in the engine's newest picture; unchanged serials cost nothing.
fn refresh_frame(state: &mut Player) {
    match state.adapter.video_frame() {
        Some(frame) if state.frame_serial != Some(frame.serial) => {
            state.frame_serial = Some(frame.serial);
            state.frame = Some(image::Handle::from_rgba(
                frame.width,
                frame.height,
                frame.pixels.to_vec(),
            ));
        }
        Some(_) => {}
        None => {
            state.frame = None;
            state.frame_serial = None;
        }
    }
}

/// Re-read what the engine knows about the current media.
pub(crate) fn refresh_media_facts(state: &mut Player) {
    state.has_video = state.adapter.has_video();
    state.audio_tracks = state.adapter.audio_tracks();
    state.audio_track = state.adapter.current_audio_track();
}
