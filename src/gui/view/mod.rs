//! GUI renderer (reads state, produces widgets; no mutation).

mod constants;
mod menu;
mod playlist;
mod video;
mod widgets;

use iced::widget::{column, container, mouse_area, row};
use iced::{Element, Length};

use super::state::{Message, Player};
use constants::PLAYLIST_W;

pub(crate) fn view(state: &Player) -> Element<'_, Message> {
    let mut layout = column![];

    // Fullscreen shows only the picture and the (auto-hiding) controls.
    if !state.fullscreen {
        layout = layout.push(menu::menu_row(state));
        if let Some(dropdown) = menu::dropdown(state) {
            layout = layout.push(dropdown);
        }
    }

    let mut body = row![video::video_surface(state)].height(Length::Fill);
    if state.show_playlist && !state.fullscreen {
        body = body.push(
            container(playlist::build_playlist_panel(state))
                .width(Length::Fixed(PLAYLIST_W))
                .height(Length::Fill),
        );
    }
    layout = layout.push(body);

    if state.controls_visible {
        let controls = mouse_area(widgets::controls_bar(state))
            .on_enter(Message::ControlsHovered(true))
            .on_exit(Message::ControlsHovered(false));
        layout = layout.push(controls);
    }

    layout.into()
}
