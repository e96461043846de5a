//! Controls bar under the picture.
//!
//! Emits only Messages; enabling follows the `Player::can_*` rules.

use iced::widget::{Container, button, column, container, row, slider, text};
use iced::{Alignment, Length};

use super::super::state::{Message, Player};
use super::super::util::{format_rate, format_time};
use super::constants::{CONTROLS_TEXT, RATE_SLIDER_W, TIME_LABEL_W, VOLUME_SLIDER_W};

fn small_button(label: &str, on_press: Option<Message>) -> iced::widget::Button<'_, Message> {
    button(text(label).size(CONTROLS_TEXT)).on_press_maybe(on_press)
}

pub(crate) fn controls_bar(state: &Player) -> Container<'_, Message> {
    // --- seek ---
    let seek_enabled = state.duration_ms > 0;
    let seek = slider(0.0..=1.0, state.position.clamp(0.0, 1.0), Message::SeekPreview)
        .step(0.001)
        .on_release(Message::SeekCommit)
        .width(Length::Fill);

    let total = if seek_enabled {
        format_time(state.duration_ms)
    } else {
        "--:--".to_string()
    };

    let seek_row = row![
        text(format_time(state.time_ms))
            .size(CONTROLS_TEXT)
            .width(Length::Fixed(TIME_LABEL_W)),
        seek,
        text(total)
            .size(CONTROLS_TEXT)
            .width(Length::Fixed(TIME_LABEL_W)),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    // --- transport ---
    let play_label = if state.is_playing() { "Pause" } else { "Play" };
    let transport = row![
        small_button("⏮", state.can_navigate().then_some(Message::Previous)),
        small_button(play_label, state.can_play_pause().then_some(Message::TogglePlayPause)),
        small_button("Stop", state.can_stop().then_some(Message::Stop)),
        small_button("⏭", state.can_navigate().then_some(Message::Next)),
    ]
    .spacing(6)
    .align_y(Alignment::Center);

    // --- rate (ignored by update unless something is playing) ---
    let rate = slider(0.5..=4.0, state.rate.clamp(0.5, 4.0), Message::SetRate)
        .step(0.1)
        .width(Length::Fixed(RATE_SLIDER_W));
    let rate_row = row![rate, text(format_rate(state.rate)).size(CONTROLS_TEXT)]
        .spacing(6)
        .align_y(Alignment::Center);

    // --- volume + extras ---
    let mute_label = if state.is_muted() { "Unmute" } else { "Mute" };
    let fullscreen_label = if state.fullscreen { "Window" } else { "Fullscreen" };
    let volume = slider(0..=100, state.volume.clamp(0, 100), Message::SetVolume)
        .width(Length::Fixed(VOLUME_SLIDER_W));

    let extras = row![
        small_button(mute_label, Some(Message::ToggleMute)),
        volume,
        text(format!("{}%", state.volume)).size(CONTROLS_TEXT),
        small_button("Snapshot", state.can_snapshot().then_some(Message::Snapshot)),
        small_button(fullscreen_label, Some(Message::ToggleFullscreen)),
    ]
    .spacing(6)
    .align_y(Alignment::Center);

    let left = row![transport, rate_row]
        .spacing(16)
        .align_y(Alignment::Center)
        .width(Length::Fill);
    let buttons = row![left, extras].spacing(16).align_y(Alignment::Center);

    let status = text(state.status.as_str()).size(CONTROLS_TEXT);

    container(column![seek_row, buttons, status].spacing(6)).padding([6, 12])
}
