//! gui/update/playback.rs
//! Transport, seek, volume, rate and the per-media extras
//! (audio track, aspect ratio, snapshot, subtitles).
//!
//! - GUI never touches the engine directly, only the adapter.
//! - Widget values are written back from the adapter after a change so the
//!   sliders show what the engine actually accepted.

use std::path::PathBuf;

use chrono::Local;
use iced::Task;

use super::super::state::{Message, Player};
use super::super::util::{file_name, format_rate, snapshot_file_name};
use super::{dialogs, playlist};
use crate::core::is_subtitle;
use crate::core::playback::{MAX_VOLUME, MIN_VOLUME};
use crate::core::types::{AspectRatio, AudioTrack, PlaybackState};

/// Rate range offered by the UI (the adapter accepts a wider one).
const UI_MIN_RATE: f32 = 0.5;
const UI_MAX_RATE: f32 = 4.0;
const RATE_STEP: f32 = 0.1;

/// Volume restored by unmute when nothing better is known.
const DEFAULT_UNMUTE_VOLUME: i32 = 50;

pub(crate) fn toggle_play_pause(state: &mut Player) -> Task<Message> {
    if state.adapter.state() == PlaybackState::Playing {
        state.adapter.pause();
        return Task::none();
    }

    if state.playlist.is_empty() {
        return playlist::open_files(state);
    }

    match (state.playlist.current_index(), state.adapter.current_media().is_some()) {
        (Some(_), true) => {
            state.adapter.play();
            Task::none()
        }
        // nothing loaded yet (or the entry was removed): start the cursor entry
        (index, _) => playlist::play_index(state, index.unwrap_or(0)),
    }
}

pub(crate) fn stop(state: &mut Player) -> Task<Message> {
    state.adapter.stop();
    state.seek_preview = None;
    Task::none()
}

pub(crate) fn toggle_loop(state: &mut Player) -> Task<Message> {
    state.looping = !state.looping;
    state.adapter.set_loop(state.looping);
    state.status = if state.looping {
        "Loop on.".into()
    } else {
        "Loop off.".into()
    };
    Task::none()
}

// ---- seek ----

/// Slider drag in progress: move the handle and the time label only.
pub(crate) fn seek_preview(state: &mut Player, ratio: f32) -> Task<Message> {
    if state.duration_ms <= 0 {
        return Task::none();
    }
    let ratio = ratio.clamp(0.0, 1.0);
    state.seek_preview = Some(ratio);
    state.position = ratio;
    state.time_ms = (ratio as f64 * state.duration_ms as f64) as i64;
    Task::none()
}

/// Slider released: one real seek.
pub(crate) fn seek_commit(state: &mut Player) -> Task<Message> {
    if let Some(ratio) = state.seek_preview.take() {
        state.adapter.seek(ratio);
    }
    Task::none()
}

pub(crate) fn seek_relative(state: &mut Player, delta_ms: i64) -> Task<Message> {
    let duration = state.adapter.duration_ms();
    if duration <= 0 || !state.playback_state.is_active() {
        return Task::none();
    }

    let target = (state.adapter.time_ms() + delta_ms).clamp(0, duration);
    state.adapter.seek(target as f32 / duration as f32);
    Task::none()
}

// ---- volume ----

pub(crate) fn set_volume(state: &mut Player, volume: i32) -> Task<Message> {
    let volume = volume.clamp(MIN_VOLUME, MAX_VOLUME);
    if volume > 0 {
        state.last_volume = volume;
    }
    state.adapter.set_volume(volume);
    state.volume = volume;
    Task::none()
}

pub(crate) fn volume_step(state: &mut Player, up: bool) -> Task<Message> {
    let step = state.config.playback.volume_step;
    let delta = if up { step } else { -step };
    set_volume(state, state.volume + delta)
}

pub(crate) fn toggle_mute(state: &mut Player) -> Task<Message> {
    if state.is_muted() {
        let restore = if state.last_volume > 0 {
            state.last_volume
        } else {
            DEFAULT_UNMUTE_VOLUME
        };
        set_volume(state, restore)
    } else {
        state.last_volume = state.volume;
        set_volume(state, 0)
    }
}

// ---- rate ----

pub(crate) fn set_rate(state: &mut Player, rate: f32) -> Task<Message> {
    if !state.can_change_rate() {
        return Task::none();
    }
    let rate = ((rate / RATE_STEP).round() * RATE_STEP).clamp(UI_MIN_RATE, UI_MAX_RATE);
    state.adapter.set_rate(rate);
    state.rate = state.adapter.rate();
    state.status = format!("Rate {}", format_rate(state.rate));
    Task::none()
}

pub(crate) fn rate_step(state: &mut Player, up: bool) -> Task<Message> {
    let delta = if up { RATE_STEP } else { -RATE_STEP };
    set_rate(state, state.rate + delta)
}

// ---- audio / video ----

pub(crate) fn select_audio_track(state: &mut Player, track: AudioTrack) -> Task<Message> {
    state.adapter.set_audio_track(track.id);
    state.audio_track = state.adapter.current_audio_track();
    Task::none()
}

pub(crate) fn select_aspect_ratio(state: &mut Player, ratio: AspectRatio) -> Task<Message> {
    state.aspect_ratio = ratio;
    state.adapter.set_aspect_ratio(Some(ratio));
    Task::none()
}

pub(crate) fn snapshot(state: &mut Player) -> Task<Message> {
    if state.adapter.current_media().is_none() || !state.has_video {
        return dialogs::warning("Snapshot Failed", "A video must be playing or paused.");
    }
    dialogs::save_snapshot(snapshot_file_name(Local::now()))
}

pub(crate) fn snapshot_target_chosen(state: &mut Player, path: Option<PathBuf>) -> Task<Message> {
    let Some(path) = path else {
        return Task::none();
    };
    if !state.has_video {
        return dialogs::warning("Snapshot Failed", "A video must be playing or paused.");
    }
    if state.adapter.take_snapshot(Some(&path)) {
        state.status = format!("Snapshot saved: {}", file_name(&path));
        Task::none()
    } else {
        dialogs::warning("Snapshot Failed", "Could not save the snapshot.")
    }
}

// ---- subtitles ----

pub(crate) fn load_subtitle(state: &mut Player) -> Task<Message> {
    let Some(media) = state.adapter.current_media() else {
        return dialogs::warning("Load Subtitle", "Play a video first.");
    };
    dialogs::pick_subtitle(media.parent())
}

pub(crate) fn subtitle_chosen(state: &mut Player, path: Option<PathBuf>) -> Task<Message> {
    let Some(path) = path else {
        return Task::none();
    };
    if !is_subtitle(&path) {
        return dialogs::warning("Subtitle Error", "Unsupported subtitle file type.");
    }
    if state.adapter.set_subtitle_file(&path) {
        state.status = format!("Subtitles: {}", file_name(&path));
        Task::none()
    } else {
        dialogs::warning("Subtitle Error", "Failed to load subtitle file.")
    }
}
