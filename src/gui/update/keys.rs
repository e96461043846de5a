//! gui/update/keys.rs
//! Keyboard shortcuts -> Messages.
//!
//! Plain keys drive transport/volume/rate, Ctrl(+Shift) keys drive menus.
//! Anything else (Alt, Logo, unknown keys) maps to nothing.

use iced::keyboard::{Key, Modifiers, key::Named};

use super::super::state::Message;

pub(crate) fn shortcut(key: &Key, modifiers: Modifiers) -> Option<Message> {
    if modifiers.alt() || modifiers.logo() {
        return None;
    }

    match (modifiers.control(), modifiers.shift()) {
        (false, _) => plain(key, modifiers.shift()),
        (true, false) => control(key),
        (true, true) => control_shift(key),
    }
}

fn plain(key: &Key, shift: bool) -> Option<Message> {
    // `+` usually needs Shift; no other plain shortcut takes it.
    if let Key::Character("+") = key.as_ref() {
        return Some(Message::RateUp);
    }
    if shift {
        return None;
    }

    let message = match key.as_ref() {
        Key::Named(Named::Space) => Message::TogglePlayPause,
        Key::Named(Named::ArrowRight) => Message::SeekForward,
        Key::Named(Named::ArrowLeft) => Message::SeekBackward,
        Key::Named(Named::ArrowUp) => Message::VolumeUp,
        Key::Named(Named::ArrowDown) => Message::VolumeDown,
        Key::Named(Named::Escape) => Message::ExitFullscreen,
        Key::Character(c) => match c.to_ascii_lowercase().as_str() {
            "f" => Message::ToggleFullscreen,
            "s" => Message::Stop,
            "m" => Message::ToggleMute,
            "=" => Message::RateUp,
            "-" => Message::RateDown,
            _ => return None,
        },
        _ => return None,
    };
    Some(message)
}

fn control(key: &Key) -> Option<Message> {
    let message = match key.as_ref() {
        Key::Named(Named::ArrowRight) => Message::Next,
        Key::Named(Named::ArrowLeft) => Message::Previous,
        Key::Character(c) => match c.to_ascii_lowercase().as_str() {
            "o" => Message::OpenFiles,
            "l" => Message::LoadSubtitle,
            "p" => Message::Snapshot,
            "t" => Message::TogglePlaylist,
            "q" => Message::Quit,
            _ => return None,
        },
        _ => return None,
    };
    Some(message)
}

fn control_shift(key: &Key) -> Option<Message> {
    match key.as_ref() {
        Key::Character(c) if c.eq_ignore_ascii_case("o") => Some(Message::OpenFolder),
        _ => None,
    }
}
