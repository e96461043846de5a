//! Menu row + the dropdown of the open menu.

use iced::widget::{Column, button, column, container, pick_list, row, text};
use iced::{Element, Length, Theme};

use super::super::state::{MenuKind, Message, Player};
use super::constants::{MENU_DROPDOWN_W, MENU_TEXT};
use crate::core::types::AspectRatio;

pub(crate) fn menu_row(state: &Player) -> Element<'_, Message> {
    let mut bar = row![].spacing(2);
    for kind in MenuKind::ALL {
        let label = text(kind.label()).size(MENU_TEXT);
        let style: fn(&Theme, button::Status) -> button::Style = if state.open_menu == Some(kind) {
            button::secondary
        } else {
            button::text
        };
        bar = bar.push(button(label).style(style).on_press(Message::ToggleMenu(kind)));
    }
    bar.into()
}

/// Items of the open menu, `None` when all menus are closed.
pub(crate) fn dropdown(state: &Player) -> Option<Element<'_, Message>> {
    let kind = state.open_menu?;

    let items: Column<'_, Message> = match kind {
        MenuKind::Media => column![
            item("Open Files...", Some(Message::OpenFiles)),
            item("Open Folder...", Some(Message::OpenFolder)),
            item("Quit", Some(Message::Quit)),
        ],
        MenuKind::Playback => column![
            item(
                if state.is_playing() { "Pause" } else { "Play" },
                state.can_play_pause().then_some(Message::TogglePlayPause),
            ),
            item("Stop", state.can_stop().then_some(Message::Stop)),
            item("Next", state.can_navigate().then_some(Message::Next)),
            item("Previous", state.can_navigate().then_some(Message::Previous)),
            item(checked("Loop Current", state.looping), Some(Message::ToggleLoop)),
        ],
        MenuKind::Audio => {
            let tracks: Element<'_, Message> = if state.can_pick_audio_track() {
                let current = state
                    .audio_track
                    .and_then(|id| state.audio_tracks.iter().find(|t| t.id == id).cloned());
                pick_list(
                    state.audio_tracks.as_slice(),
                    current,
                    Message::SelectAudioTrack,
                )
                .placeholder("Audio Track")
                .width(Length::Fill)
                .into()
            } else {
                text("Audio Track: -").size(MENU_TEXT).into()
            };
            column![
                item(
                    if state.is_muted() { "Unmute" } else { "Mute" },
                    Some(Message::ToggleMute),
                ),
                tracks,
            ]
        }
        MenuKind::Video => {
            let aspect: Element<'_, Message> = if state.has_video {
                pick_list(
                    AspectRatio::ALL,
                    Some(state.aspect_ratio),
                    Message::SelectAspectRatio,
                )
                .width(Length::Fill)
                .into()
            } else {
                text("Aspect Ratio: -").size(MENU_TEXT).into()
            };
            column![
                item(
                    checked("Fullscreen", state.fullscreen),
                    Some(Message::ToggleFullscreen),
                ),
                item("Take Snapshot...", state.can_snapshot().then_some(Message::Snapshot)),
                aspect,
            ]
        }
        MenuKind::Subtitles => column![item(
            "Load Subtitle File...",
            state.can_load_subtitle().then_some(Message::LoadSubtitle),
        )],
        MenuKind::View => column![item(
            checked("Show Playlist", state.show_playlist),
            Some(Message::TogglePlaylist),
        )],
        MenuKind::Help => column![
            item("Help", Some(Message::ShowHelp)),
            item("About Playdeck", Some(Message::ShowAbout)),
        ],
    };

    let panel = container(items.spacing(2))
        .width(Length::Fixed(MENU_DROPDOWN_W))
        .padding(4)
        .style(container::rounded_box);

    Some(panel.into())
}

fn item<'a>(label: impl Into<String>, on_press: Option<Message>) -> Element<'a, Message> {
    button(text(label.into()).size(MENU_TEXT))
        .width(Length::Fill)
        .style(button::text)
        .on_press_maybe(on_press)
        .into()
}

fn checked(label: &str, on: bool) -> String {
    if on {
        format!("✓ {label}")
    } else {
        format!("   {label}")
    }
}
