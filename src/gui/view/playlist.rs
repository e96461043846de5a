//! Playlist panel (list + Play / Remove / Clear).

use iced::widget::{Column, button, column, container, mouse_area, row, scrollable, text};
use iced::{Alignment, Length};

use super::super::state::{Message, Player};
use super::constants::{LIST_SPACING, ROW_H, ROW_HPAD, ROW_TEXT, ROW_VPAD};

pub(crate) fn build_playlist_panel(state: &Player) -> Column<'_, Message> {
    let has_selection = state.selected.is_some();

    let actions = row![
        button("Play").on_press_maybe(has_selection.then_some(Message::PlaylistPlaySelected)),
        button("Remove").on_press_maybe(has_selection.then_some(Message::PlaylistRemoveSelected)),
        button("Clear").on_press_maybe(
            (!state.playlist.is_empty()).then_some(Message::PlaylistClear)
        ),
    ]
    .spacing(6);

    column![
        text(format!("Playlist ({})", state.playlist.len())).size(16),
        build_entries(state).height(Length::Fill),
        actions,
    ]
    .spacing(8)
    .padding(8)
}

fn build_entries(state: &Player) -> iced::widget::Scrollable<'_, Message> {
    let mut col = column![].spacing(LIST_SPACING);

    for i in 0..state.playlist.len() {
        let is_current = state.playlist.current_index() == Some(i);
        let is_selected = state.selected == Some(i);

        // Now playing gets ▶, the selected row gets ●.
        let marker = if is_current {
            "▶"
        } else if is_selected {
            "●"
        } else {
            ""
        };

        let cells = row![
            text(marker).size(ROW_TEXT).width(Length::Fixed(20.0)),
            text(state.entry_label(i)).size(ROW_TEXT),
        ]
        .spacing(6)
        .align_y(Alignment::Center);

        let row_widget = mouse_area(
            container(cells)
                .padding([ROW_VPAD, ROW_HPAD])
                .height(Length::Fixed(ROW_H))
                .width(Length::Fill),
        )
        .on_press(Message::PlaylistSelect(i))
        .on_double_click(Message::PlaylistActivate(i));

        col = col.push(row_widget);
    }

    scrollable(col).height(Length::Fill)
}
