//! Video surface: the engine's newest picture (letterboxed on black) with
//! the active subtitle cue on top.
//!
//! Audio-only media leaves the surface black; it is still the click / wheel
//! target for transport and volume gestures.

use iced::widget::{Stack, container, image, mouse_area, text};
use iced::{Alignment, Color, ContentFit, Element, Length, mouse};

use super::super::state::{Message, Player};
use super::constants::{SUBTITLE_PAD, SUBTITLE_TEXT};

pub(crate) fn video_surface(state: &Player) -> Element<'_, Message> {
    let cue = state.subtitle.as_deref().unwrap_or_default();

    let mut layers = Stack::new().width(Length::Fill).height(Length::Fill);
    if let Some(handle) = &state.frame {
        // Frames already carry the aspect override; Contain keeps it.
        layers = layers.push(
            image(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill),
        );
    }
    layers = layers.push(
        container(text(cue).size(SUBTITLE_TEXT).color(Color::WHITE))
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(SUBTITLE_PAD)
            .align_x(Alignment::Center)
            .align_y(Alignment::End),
    );

    let surface = container(layers)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(|_theme| container::Style {
            background: Some(Color::BLACK.into()),
            ..container::Style::default()
        });

    mouse_area(surface)
        .on_press(Message::VideoClicked)
        .on_double_click(Message::ToggleFullscreen)
        .on_scroll(|delta| Message::VideoScrolled(scroll_lines(delta)))
        .into()
}

/// Vertical wheel movement, positive = away from the user.
fn scroll_lines(delta: mouse::ScrollDelta) -> f32 {
    match delta {
        mouse::ScrollDelta::Lines { y, .. } => y,
        mouse::ScrollDelta::Pixels { y, .. } => y.signum(),
    }
}
