//! gui/update/mod.rs
//! Update logic (router).
//! Mutates state in response to `Message` events.

use iced::Task;

use super::state::{Message, Player};

mod dialogs;
mod engine;
mod keys;
mod playback;
mod playlist;
mod util;
mod window;

pub(crate) fn update(state: &mut Player, message: Message) -> Task<Message> {
    if closes_menus(&message) {
        state.open_menu = None;
    }

    match message {
        Message::Noop => Task::none(),

        // Engine
        Message::InitializeEngine => engine::initialize(state),
        Message::Tick(now) => engine::tick(state, now),
        Message::LoadStartupFile => engine::load_startup_file(state),

        // Media
        Message::OpenFiles => playlist::open_files(state),
        Message::OpenFolder => playlist::open_folder(state),
        Message::FilesChosen(paths) => playlist::files_chosen(state, paths),
        Message::FolderChosen(folder) => playlist::folder_chosen(state, folder),
        Message::FolderScanned(folder, result) => playlist::folder_scanned(state, folder, result),
        Message::TitlesLoaded(titles) => playlist::titles_loaded(state, titles),
        Message::Quit => window::quit(state),

        // Transport
        Message::TogglePlayPause => playback::toggle_play_pause(state),
        Message::Stop => playback::stop(state),
        Message::Next => playlist::next(state),
        Message::Previous => playlist::previous(state),
        Message::ToggleLoop => playback::toggle_loop(state),
        Message::AutoAdvance(ended) => playlist::auto_advance(state, ended),

        // Seek: preview vs commit
        Message::SeekPreview(ratio) => playback::seek_preview(state, ratio),
        Message::SeekCommit => playback::seek_commit(state),
        Message::SeekForward => {
            let step = state.config.playback.seek_step_ms;
            playback::seek_relative(state, step)
        }
        Message::SeekBackward => {
            let step = state.config.playback.seek_step_ms;
            playback::seek_relative(state, -step)
        }

        // Volume / rate
        Message::SetVolume(volume) => playback::set_volume(state, volume),
        Message::VolumeUp => playback::volume_step(state, true),
        Message::VolumeDown => playback::volume_step(state, false),
        Message::ToggleMute => playback::toggle_mute(state),
        Message::SetRate(rate) => playback::set_rate(state, rate),
        Message::RateUp => playback::rate_step(state, true),
        Message::RateDown => playback::rate_step(state, false),

        // Audio / video / subtitles
        Message::SelectAudioTrack(track) => playback::select_audio_track(state, track),
        Message::SelectAspectRatio(ratio) => playback::select_aspect_ratio(state, ratio),
        Message::Snapshot => playback::snapshot(state),
        Message::SnapshotTargetChosen(path) => playback::snapshot_target_chosen(state, path),
        Message::LoadSubtitle => playback::load_subtitle(state),
        Message::SubtitleChosen(path) => playback::subtitle_chosen(state, path),

        // Playlist panel
        Message::TogglePlaylist => window::toggle_playlist(state),
        Message::PlaylistSelect(i) => playlist::select(state, i),
        Message::PlaylistActivate(i) => playlist::play_index(state, i),
        Message::PlaylistPlaySelected => playlist::play_selected(state),
        Message::PlaylistRemoveSelected => playlist::remove_selected(state),
        Message::PlaylistClear => playlist::clear(state),
        Message::PlaylistClearConfirmed(yes) => playlist::clear_confirmed(state, yes),

        // Window
        Message::Input(id, input) => window::input(state, id, input),
        Message::ToggleFullscreen => window::toggle_fullscreen(state),
        Message::ExitFullscreen => window::exit_fullscreen(state),
        Message::ControlsHovered(hovered) => window::controls_hovered(state, hovered),
        Message::VideoClicked => window::video_clicked(state),
        Message::VideoScrolled(delta) => window::video_scrolled(state, delta),
        Message::ToggleMenu(menu) => window::toggle_menu(state, menu),
        Message::CloseMenus => window::close_menus(state),

        // Help
        Message::ShowHelp => dialogs::help(),
        Message::ShowAbout => dialogs::about(state.adapter.engine_version()),
    }
}

/// Menu items are plain commands; running one closes its dropdown.
fn closes_menus(message: &Message) -> bool {
    !matches!(
        message,
        Message::Noop
            | Message::Tick(_)
            | Message::Input(..)
            | Message::ToggleMenu(_)
            | Message::ControlsHovered(_)
            | Message::VideoClicked
            | Message::TitlesLoaded(_)
            | Message::FolderScanned(..)
    )
}
