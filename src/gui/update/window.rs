//! gui/update/window.rs
//! Window chrome: input routing, fullscreen, auto-hiding controls, menus,
//! mouse gestures on the picture, quit.

use std::time::{Duration, Instant};

use iced::window::{self, Mode};
use iced::Task;

use super::super::state::{Input, MenuKind, Message, Player};
use super::{keys, playback, update};

pub(crate) fn input(state: &mut Player, id: window::Id, input: Input) -> Task<Message> {
    state.window = Some(id);

    match input {
        Input::Opened => Task::none(),
        Input::Modifiers(modifiers) => {
            state.modifiers = modifiers;
            Task::none()
        }
        Input::Key(key, modifiers) => match keys::shortcut(&key, modifiers) {
            Some(message) => update(state, message),
            None => Task::none(),
        },
        Input::CursorMoved => {
            cursor_moved(state, Instant::now());
            Task::none()
        }
    }
}

/// Any pointer motion reveals the controls; in fullscreen they hide again
/// after a quiet period.
pub(crate) fn cursor_moved(state: &mut Player, now: Instant) {
    state.controls_visible = true;
    state.hide_controls_at = state
        .fullscreen
        .then(|| now + Duration::from_millis(state.config.ui.controls_hide_ms));
}

pub(crate) fn toggle_fullscreen(state: &mut Player) -> Task<Message> {
    set_fullscreen(state, !state.fullscreen)
}

pub(crate) fn exit_fullscreen(state: &mut Player) -> Task<Message> {
    if !state.fullscreen {
        return Task::none();
    }
    set_fullscreen(state, false)
}

fn set_fullscreen(state: &mut Player, on: bool) -> Task<Message> {
    state.fullscreen = on;
    state.open_menu = None;
    state.controls_visible = true;
    state.hide_controls_at = on
        .then(|| Instant::now() + Duration::from_millis(state.config.ui.controls_hide_ms));

    let Some(id) = state.window else {
        return Task::none();
    };
    let mode = if on { Mode::Fullscreen } else { Mode::Windowed };
    window::set_mode(id, mode)
}

pub(crate) fn controls_hovered(state: &mut Player, hovered: bool) -> Task<Message> {
    state.controls_hovered = hovered;
    if hovered {
        state.controls_visible = true;
    }
    Task::none()
}

/// Single click on the picture.
pub(crate) fn video_clicked(state: &mut Player) -> Task<Message> {
    if state.open_menu.take().is_some() {
        return Task::none();
    }
    if state.playlist.is_empty() {
        return Task::none();
    }
    playback::toggle_play_pause(state)
}

/// Wheel over the picture changes the volume; Shift gives fine steps.
pub(crate) fn video_scrolled(state: &mut Player, delta_y: f32) -> Task<Message> {
    if delta_y == 0.0 {
        return Task::none();
    }
    let step = if state.modifiers.shift() {
        1
    } else {
        state.config.playback.volume_step
    };
    let delta = if delta_y > 0.0 { step } else { -step };
    playback::set_volume(state, state.volume + delta)
}

pub(crate) fn toggle_menu(state: &mut Player, menu: MenuKind) -> Task<Message> {
    state.open_menu = if state.open_menu == Some(menu) {
        None
    } else {
        Some(menu)
    };
    Task::none()
}

pub(crate) fn close_menus(state: &mut Player) -> Task<Message> {
    state.open_menu = None;
    Task::none()
}

pub(crate) fn toggle_playlist(state: &mut Player) -> Task<Message> {
    state.show_playlist = !state.show_playlist;
    Task::none()
}

pub(crate) fn quit(state: &mut Player) -> Task<Message> {
    tracing::info!("quitting");
    state.adapter.release_resources();
    iced::exit()
}

#[cfg(test)]
mod tests {
    use iced::keyboard::{Key, Modifiers};

    use super::*;
    use crate::config::Config;
    use crate::core::engine::fake::FakeBackend;

    fn player() -> (Player, FakeBackend) {
        let fake = FakeBackend::new();
        let mut player = Player::new(Config::default(), Box::new(fake.clone()), None);
        let _ = update(&mut player, Message::InitializeEngine);
        (player, fake)
    }

    #[test]
    fn controls_hide_only_in_fullscreen() {
        let (mut player, _fake) = player();
        let t0 = Instant::now();

        cursor_moved(&mut player, t0);
        assert!(player.hide_controls_at.is_none());

        player.fullscreen = true;
        cursor_moved(&mut player, t0);
        let _ = update(&mut player, Message::Tick(t0 + Duration::from_millis(2_900)));
        assert!(player.controls_visible);

        let _ = update(&mut player, Message::Tick(t0 + Duration::from_millis(3_100)));
        assert!(!player.controls_visible);

        cursor_moved(&mut player, t0 + Duration::from_millis(3_200));
        assert!(player.controls_visible);
    }

    #[test]
    fn hovered_controls_stay_visible() {
        let (mut player, _fake) = player();
        player.fullscreen = true;
        let t0 = Instant::now();
        cursor_moved(&mut player, t0);
        let _ = update(&mut player, Message::ControlsHovered(true));

        let _ = update(&mut player, Message::Tick(t0 + Duration::from_secs(10)));
        assert!(player.controls_visible);
    }

    #[test]
    fn fullscreen_toggle_without_window_only_flips_state() {
        let (mut player, _fake) = player();
        let _ = update(&mut player, Message::ToggleFullscreen);
        assert!(player.fullscreen);
        let _ = update(&mut player, Message::ExitFullscreen);
        assert!(!player.fullscreen);
        assert!(player.hide_controls_at.is_none());
    }

    #[test]
    fn wheel_changes_volume_with_fine_steps_on_shift() {
        let (mut player, fake) = player();
        let _ = update(&mut player, Message::VideoScrolled(1.0));
        assert_eq!(player.volume, 55);

        player.modifiers = Modifiers::SHIFT;
        let _ = update(&mut player, Message::VideoScrolled(-1.0));
        assert_eq!(player.volume, 54);
        assert_eq!(fake.state().volume, 54);
    }

    #[test]
    fn menus_open_one_at_a_time() {
        let (mut player, _fake) = player();
        let _ = update(&mut player, Message::ToggleMenu(MenuKind::Media));
        let _ = update(&mut player, Message::ToggleMenu(MenuKind::Audio));
        assert_eq!(player.open_menu, Some(MenuKind::Audio));

        // picking a command closes the open menu
        let _ = update(&mut player, Message::ToggleLoop);
        assert_eq!(player.open_menu, None);
    }

    #[test]
    fn key_input_runs_the_shortcut() {
        let (mut player, _fake) = player();
        let id = window::Id::unique();
        let input = Input::Key(Key::Character("m".into()), Modifiers::empty());

        let _ = update(&mut player, Message::Input(id, input));

        assert_eq!(player.window, Some(id));
        assert!(player.is_muted());
    }

    #[test]
    fn quit_releases_the_engine() {
        let (mut player, fake) = player();
        let _ = update(&mut player, Message::Quit);
        assert!(!player.adapter.is_ready());
        assert_eq!(fake.state().instances_released, 1);
    }
}
