//! gui/update/dialogs.rs
//! Native dialogs (rfd), each wrapped in a Task that reports back a Message.

use std::path::Path;

use iced::Task;
use rfd::{
    AsyncFileDialog, AsyncMessageDialog, MessageButtons, MessageDialogResult, MessageLevel,
};

use super::super::state::Message;
use crate::core::{SUBTITLE_EXTENSIONS, media_extensions};

pub(crate) fn pick_media_files() -> Task<Message> {
    let extensions = media_extensions();
    Task::perform(
        async move {
            AsyncFileDialog::new()
                .set_title("Open Media")
                .add_filter("Media Files", extensions.as_slice())
                .add_filter("All Files", &["*"])
                .pick_files()
                .await
                .map(|files| files.iter().map(|f| f.path().to_path_buf()).collect())
                .unwrap_or_default()
        },
        Message::FilesChosen,
    )
}

pub(crate) fn pick_folder() -> Task<Message> {
    Task::perform(
        async move {
            AsyncFileDialog::new()
                .set_title("Open Folder")
                .pick_folder()
                .await
                .map(|f| f.path().to_path_buf())
        },
        Message::FolderChosen,
    )
}

/// Subtitle picker starting next to the current media.
pub(crate) fn pick_subtitle(start_dir: Option<&Path>) -> Task<Message> {
    let mut dialog = AsyncFileDialog::new()
        .set_title("Load Subtitle File")
        .add_filter("Subtitle Files", SUBTITLE_EXTENSIONS)
        .add_filter("All Files", &["*"]);
    if let Some(dir) = start_dir {
        dialog = dialog.set_directory(dir);
    }

    let picked = dialog.pick_file();
    Task::perform(
        async move { picked.await.map(|f| f.path().to_path_buf()) },
        Message::SubtitleChosen,
    )
}

pub(crate) fn save_snapshot(default_name: String) -> Task<Message> {
    Task::perform(
        async move {
            AsyncFileDialog::new()
                .set_title("Save Snapshot")
                .set_file_name(default_name)
                .add_filter("PNG Images", &["png"])
                .save_file()
                .await
                .map(|f| f.path().to_path_buf())
        },
        Message::SnapshotTargetChosen,
    )
}

pub(crate) fn confirm_clear() -> Task<Message> {
    Task::perform(
        async move {
            AsyncMessageDialog::new()
                .set_level(MessageLevel::Warning)
                .set_title("Clear Playlist")
                .set_description("Are you sure?")
                .set_buttons(MessageButtons::YesNo)
                .show()
                .await
        },
        |answer| Message::PlaylistClearConfirmed(answer == MessageDialogResult::Yes),
    )
}

fn show(level: MessageLevel, title: &str, description: String) -> Task<Message> {
    let title = title.to_string();
    Task::perform(
        async move {
            AsyncMessageDialog::new()
                .set_level(level)
                .set_title(title)
                .set_description(description)
                .set_buttons(MessageButtons::Ok)
                .show()
                .await
        },
        |_| Message::Noop,
    )
}

pub(crate) fn error(description: String) -> Task<Message> {
    show(MessageLevel::Error, "Playdeck Error", description)
}

pub(crate) fn warning(title: &str, description: &str) -> Task<Message> {
    show(MessageLevel::Warning, title, description.to_string())
}

pub(crate) fn info(title: &str, description: String) -> Task<Message> {
    show(MessageLevel::Info, title, description)
}

/// Error dialog, then quit.
pub(crate) fn fatal(description: String) -> Task<Message> {
    Task::perform(
        async move {
            AsyncMessageDialog::new()
                .set_level(MessageLevel::Error)
                .set_title("Fatal Error")
                .set_description(description)
                .set_buttons(MessageButtons::Ok)
                .show()
                .await
        },
        |_| Message::Quit,
    )
}

pub(crate) fn help() -> Task<Message> {
    let text = "\
Open files with Media > Open Files (Ctrl+O) or a whole folder (Ctrl+Shift+O).

Space  play / pause        S  stop
Left / Right  seek 5 s     Up / Down  volume
M  mute                    F  fullscreen (Esc leaves)
+ / -  playback rate       Ctrl+Left / Ctrl+Right  previous / next
Ctrl+L  load subtitles     Ctrl+P  snapshot
Ctrl+T  playlist           Ctrl+Q  quit

Click the picture to play / pause, scroll over it to change the volume
(hold Shift for fine steps).";
    info("Playdeck - Help", text.to_string())
}

pub(crate) fn about(engine: Option<String>) -> Task<Message> {
    let text = format!(
        "Playdeck {}\n\nA small desktop media player.\n\nEngine: {}\nUI: iced",
        env!("CARGO_PKG_VERSION"),
        engine.unwrap_or_else(|| "N/A".to_string()),
    );
    info("About Playdeck", text)
}
