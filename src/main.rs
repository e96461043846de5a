//! Playdeck
//!
//! # What this program is
//! A small desktop media player built with `iced`. Files (or whole folders)
//! go into a playlist; the selected entry plays through the playback
//! adapter, which wraps an engine running on its own thread.
//!
//! # Layout
//! - `core::engine`: engine traits, the gstreamer (video) engine and the
//!   rodio/symphonia (audio-only) fallback
//! - `core::playback`: the adapter (commands in, notifications out)
//! - `core::*`: playlist, subtitles, tag titles, folder scanning
//! - `gui`: iced state / update / view / subscriptions
//! - `config`, `logging`: ambient setup done once in `main`
//!
//! # Threads
//! - UI thread: iced's loop; drains the adapter on a 50 ms tick.
//! - Engine threads: the gstreamer bus + streaming threads, or the rodio
//!   worker; they talk to the UI through channels and shared slots only.
//! - Short-lived helper threads for folder scans and tag reads.

mod config;
mod core;
mod gui;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use iced::{Size, window};

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(name = "playdeck", version, about = "A small desktop media player")]
struct Cli {
    /// Media file to open on startup
    file: Option<PathBuf>,

    /// Configuration file (defaults to ./playdeck.toml when present)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return startup_failure(&format!("{e:#}")),
    };

    // Dropping the guard flushes the file writer; keep it for the whole run.
    let _log_guard = match logging::init(&config.logging) {
        Ok(guard) => guard,
        Err(e) => return startup_failure(&format!("{e:#}")),
    };

    tracing::info!(version = env!("CARGO_PKG_VERSION"), file = ?cli.file, "starting");

    let file = cli.file;
    let result = iced::application(
        move || gui::boot(config.clone(), file.clone()),
        gui::update,
        gui::view,
    )
    .title(gui::title)
    .subscription(gui::subscription)
    .window(window::Settings {
        size: Size::new(800.0, 600.0),
        icon: app_icon(),
        ..window::Settings::default()
    })
    .run();

    match result {
        Ok(()) => {
            tracing::info!("bye");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "ui loop failed");
            startup_failure(&e.to_string())
        }
    }
}

fn startup_failure(message: &str) -> ExitCode {
    eprintln!("playdeck: {message}");
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("Playdeck")
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
    ExitCode::FAILURE
}

/// 32x32 "play" triangle on a dark square.
fn app_icon() -> Option<window::Icon> {
    const SIDE: u32 = 32;
    let mut rgba = Vec::with_capacity((SIDE * SIDE * 4) as usize);
    for y in 0..SIDE {
        for x in 0..SIDE {
            // Triangle from (10,8)-(10,24) to (24,16).
            let dy = (y as i32 - 16).abs();
            let inside = x >= 10 && x <= 24 && (dy * 14) <= (24 - x as i32) * 8;
            let pixel = if inside {
                [0xF2, 0xF2, 0xF2, 0xFF]
            } else {
                [0x20, 0x24, 0x2B, 0xFF]
            };
            rgba.extend_from_slice(&pixel);
        }
    }

    match window::icon::from_rgba(rgba, SIDE, SIDE) {
        Ok(icon) => Some(icon),
        Err(e) => {
            tracing::warn!(error = %e, "window icon rejected");
            None
        }
    }
}
