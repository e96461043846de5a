//! gui/update/playlist.rs
//! Opening media, playlist panel actions, next/previous, auto-advance.
//!
//! The playlist cursor is the "now playing" entry; the panel selection is
//! separate and never moves playback by itself.

use std::path::PathBuf;

use iced::Task;

use super::super::state::{Message, Player};
use super::super::util::file_name;
use super::{dialogs, engine, util};
use crate::core::{scan_folder, tags};

pub(crate) fn open_files(_state: &mut Player) -> Task<Message> {
    dialogs::pick_media_files()
}

pub(crate) fn open_folder(_state: &mut Player) -> Task<Message> {
    dialogs::pick_folder()
}

pub(crate) fn files_chosen(state: &mut Player, paths: Vec<PathBuf>) -> Task<Message> {
    if paths.is_empty() {
        return Task::none();
    }
    handle_opened(state, paths)
}

pub(crate) fn folder_chosen(state: &mut Player, folder: Option<PathBuf>) -> Task<Message> {
    let Some(folder) = folder else {
        return Task::none();
    };

    state.status = format!("Scanning {}...", folder.display());
    let dir = folder.clone();
    Task::perform(
        util::spawn_blocking(move || scan_folder(&dir)),
        move |result| {
            let result =
                result.unwrap_or_else(|| Err("folder scan stopped unexpectedly".to_string()));
            Message::FolderScanned(folder.clone(), result)
        },
    )
}

pub(crate) fn folder_scanned(
    state: &mut Player,
    folder: PathBuf,
    result: Result<Vec<PathBuf>, String>,
) -> Task<Message> {
    match result {
        Ok(files) if files.is_empty() => {
            state.status = format!("No media in {}", folder.display());
            dialogs::info(
                "No Media Found",
                "No supported media files found in this folder.".to_string(),
            )
        }
        Ok(files) => handle_opened(state, files),
        Err(e) => {
            tracing::warn!(folder = %folder.display(), error = %e, "folder scan failed");
            state.status = format!("Scan failed: {e}");
            dialogs::warning("Open Folder", &format!("Could not read the folder:\n{e}"))
        }
    }
}

/// Add `paths` to the playlist; start entry 0 if nothing is going on.
pub(crate) fn handle_opened(state: &mut Player, paths: Vec<PathBuf>) -> Task<Message> {
    let added = state.playlist.add(&paths);
    tracing::debug!(offered = paths.len(), added, "files opened");
    state.status = format!("Added {added} file(s) to the playlist.");

    let titles = load_titles(paths);

    if state.adapter.state().is_at_rest() && !state.playlist.is_empty() {
        return Task::batch([titles, play_index(state, 0)]);
    }
    titles
}

fn load_titles(paths: Vec<PathBuf>) -> Task<Message> {
    Task::perform(
        util::spawn_blocking(move || tags::display_titles(paths)),
        |titles| Message::TitlesLoaded(titles.unwrap_or_default()),
    )
}

pub(crate) fn titles_loaded(
    state: &mut Player,
    titles: Vec<(PathBuf, Option<String>)>,
) -> Task<Message> {
    for (path, title) in titles {
        if let Some(title) = title {
            state.titles.insert(crate::core::playlist::normalize(&path), title);
        }
    }
    Task::none()
}

/// Load and play entry `index`; moves the cursor and the panel selection.
pub(crate) fn play_index(state: &mut Player, index: usize) -> Task<Message> {
    if !state.adapter.is_ready() {
        return Task::none();
    }
    let Some(path) = state.playlist.set_current(index).map(|p| p.to_path_buf()) else {
        return Task::none();
    };
    state.selected = Some(index);

    state.time_ms = 0;
    state.position = 0.0;
    state.duration_ms = 0;
    state.seek_preview = None;
    state.subtitle = None;
    state.frame = None;
    state.frame_serial = None;

    if state.adapter.load(&path) {
        tracing::info!(path = %path.display(), index, "playing");
        state.status = format!("Playing: {}", file_name(&path));
        state.adapter.play();
        engine::refresh_media_facts(state);
    }

    Task::none()
}

pub(crate) fn next(state: &mut Player) -> Task<Message> {
    match state.playlist.next_index() {
        Some(i) => play_index(state, i),
        None => Task::none(),
    }
}

pub(crate) fn previous(state: &mut Player) -> Task<Message> {
    match state.playlist.previous_index() {
        Some(i) => play_index(state, i),
        None => Task::none(),
    }
}

/// Fired a short while after an observed end with loop off. `ended` is the
/// cursor at that moment; if the user has moved it since, this is stale.
pub(crate) fn auto_advance(state: &mut Player, ended: Option<usize>) -> Task<Message> {
    if state.looping || state.playlist.current_index() != ended {
        tracing::debug!(?ended, current = ?state.playlist.current_index(), "auto-advance dropped");
        return Task::none();
    }
    next(state)
}

pub(crate) fn select(state: &mut Player, index: usize) -> Task<Message> {
    if index < state.playlist.len() {
        state.selected = Some(index);
    }
    Task::none()
}

pub(crate) fn play_selected(state: &mut Player) -> Task<Message> {
    match state.selected {
        Some(i) => play_index(state, i),
        None => Task::none(),
    }
}

pub(crate) fn remove_selected(state: &mut Player) -> Task<Message> {
    let Some(index) = state.selected.take() else {
        return Task::none();
    };

    let removal = state.playlist.remove_indices(&[index]);
    if removal.current_removed {
        state.adapter.stop();
    }
    state.status = format!("Removed {} entry.", removal.removed);
    Task::none()
}

pub(crate) fn clear(state: &mut Player) -> Task<Message> {
    if state.playlist.is_empty() {
        return Task::none();
    }
    dialogs::confirm_clear()
}

pub(crate) fn clear_confirmed(state: &mut Player, yes: bool) -> Task<Message> {
    if !yes {
        return Task::none();
    }
    state.adapter.stop();
    state.playlist.clear();
    state.selected = None;
    state.titles.clear();
    state.status = "Playlist cleared.".into();
    Task::none()
}
