//! gui/mod.rs
//!
//! This folder contains ONLY frontend concerns:
//! - app state ('Player')
//! - messages ('Message')
//! - update logic ('update()')
//! - view layout ('view()')
//! - subscriptions (engine tick + window input)
//! - small UI helpers ('util')

use std::path::PathBuf;

use iced::Task;

use crate::config::Config;
use crate::core::engine;

pub(crate) mod state;
pub(crate) mod subscription;
pub(crate) mod update;
pub(crate) mod util;
pub(crate) mod view;

use state::{Message, Player};

// Re-export the entry points main.rs needs.
pub(crate) use subscription::subscription;
pub(crate) use update::update;
pub(crate) use view::view;

/// Initial state; the engine itself starts with the first update.
pub(crate) fn boot(config: Config, file: Option<PathBuf>) -> (Player, Task<Message>) {
    let backend = engine::backend_for(config.playback.engine);
    let player = Player::new(config, backend, file);
    (player, Task::done(Message::InitializeEngine))
}

pub(crate) fn title(state: &Player) -> String {
    util::window_title(state.adapter.current_media())
}
