//! gui/subscription.rs
//! - periodic Tick while the engine is up (drains adapter notifications)
//! - window input (keys, modifiers, cursor) for shortcuts and fullscreen

use iced::event::{self, Event};
use iced::{Subscription, keyboard, mouse, time, window};
use std::time::Duration;

use super::state::{Input, Message, Player};

const TICK_MS: u64 = 50;

pub(crate) fn subscription(state: &Player) -> Subscription<Message> {
    let input = event::listen_with(forward_input);

    if !state.adapter.is_ready() {
        return input;
    }

    let tick = time::every(Duration::from_millis(TICK_MS)).map(Message::Tick);
    Subscription::batch([tick, input])
}

fn forward_input(event: Event, status: event::Status, id: window::Id) -> Option<Message> {
    let input = match event {
        Event::Window(window::Event::Opened { .. }) => Input::Opened,
        Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
            Input::Modifiers(modifiers)
        }
        // Keys a focused widget already used (e.g. a slider) are not shortcuts.
        Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. })
            if status == event::Status::Ignored =>
        {
            Input::Key(key, modifiers)
        }
        Event::Mouse(mouse::Event::CursorMoved { .. }) => Input::CursorMoved,
        _ => return None,
    };

    Some(Message::Input(id, input))
}
