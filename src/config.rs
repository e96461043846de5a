//! config.rs
//! `playdeck.toml`: optional file, every key optional, values clamped.

use anyhow::{Context, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use crate::core::engine::EngineKind;
use crate::core::playback::AdapterTiming;

const FILE_NAME: &str = "playdeck.toml";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub playback: PlaybackConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// `explicit` (from `--config`) must exist; otherwise the first file found
    /// in the usual places wins, and no file at all means defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            return Self::read(path);
        }

        for path in candidates() {
            if path.exists() {
                return Self::read(&path);
            }
        }

        Ok(Config::default())
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&data).with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    pub fn parse(data: &str) -> anyhow::Result<Self> {
        let doc: ConfigDocument = toml::from_str(data)?;
        Ok(doc.into())
    }

    pub fn adapter_timing(&self) -> AdapterTiming {
        AdapterTiming {
            loop_restart_delay: Duration::from_millis(self.playback.loop_restart_delay_ms),
            rate_poll_interval: Duration::from_millis(self.playback.rate_poll_ms),
        }
    }
}

fn candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(current_dir) = env::current_dir() {
        candidates.push(current_dir.join(FILE_NAME));
        candidates.push(current_dir.join("config").join(FILE_NAME));
    }

    if let Ok(exe) = env::current_exe() {
        if let Some(dir) = exe.parent() {
            candidates.push(dir.join(FILE_NAME));
        }
    }

    candidates
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackConfig {
    pub engine: EngineKind,
    /// Volume applied once the engine is up.
    pub volume: i32,
    pub seek_step_ms: i64,
    pub volume_step: i32,
    pub loop_restart_delay_ms: u64,
    pub auto_advance_delay_ms: u64,
    pub rate_poll_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::Auto,
            volume: 50,
            seek_step_ms: 5000,
            volume_step: 5,
            loop_restart_delay_ms: 50,
            auto_advance_delay_ms: 100,
            rate_poll_ms: 250,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UiConfig {
    /// Fullscreen controls hide after this much mouse inactivity.
    pub controls_hide_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            controls_hide_ms: 3000,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    /// `EnvFilter` directives; `RUST_LOG` wins when set.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(".logs"),
            filter: "playdeck=debug,warn".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigDocument {
    #[serde(default)]
    playback: PlaybackSection,
    #[serde(default)]
    ui: UiSection,
    #[serde(default)]
    logging: LoggingSection,
}

impl From<ConfigDocument> for Config {
    fn from(value: ConfigDocument) -> Self {
        let defaults = Config::default();
        let p = value.playback;

        let playback = PlaybackConfig {
            engine: p.engine.unwrap_or(defaults.playback.engine),
            volume: p.volume.unwrap_or(defaults.playback.volume).clamp(0, 100),
            seek_step_ms: p
                .seek_step_ms
                .unwrap_or(defaults.playback.seek_step_ms)
                .clamp(100, 600_000),
            volume_step: p
                .volume_step
                .unwrap_or(defaults.playback.volume_step)
                .clamp(1, 50),
            loop_restart_delay_ms: p
                .loop_restart_delay_ms
                .unwrap_or(defaults.playback.loop_restart_delay_ms)
                .max(10),
            auto_advance_delay_ms: p
                .auto_advance_delay_ms
                .unwrap_or(defaults.playback.auto_advance_delay_ms)
                .max(10),
            rate_poll_ms: p
                .rate_poll_ms
                .unwrap_or(defaults.playback.rate_poll_ms)
                .max(50),
        };

        let ui = UiConfig {
            controls_hide_ms: value
                .ui
                .controls_hide_ms
                .unwrap_or(defaults.ui.controls_hide_ms)
                .max(500),
        };

        let logging = LoggingConfig {
            directory: value
                .logging
                .directory
                .unwrap_or(defaults.logging.directory),
            filter: value
                .logging
                .filter
                .filter(|f| !f.trim().is_empty())
                .unwrap_or(defaults.logging.filter),
        };

        Config {
            playback,
            ui,
            logging,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlaybackSection {
    engine: Option<EngineKind>,
    volume: Option<i32>,
    seek_step_ms: Option<i64>,
    volume_step: Option<i32>,
    loop_restart_delay_ms: Option<u64>,
    auto_advance_delay_ms: Option<u64>,
    rate_poll_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct UiSection {
    controls_hide_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingSection {
    directory: Option<PathBuf>,
    filter: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
        assert_eq!(
            Config::default().adapter_timing(),
            AdapterTiming::default()
        );
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = Config::parse("[playback]\nvolume = 80\n\n[ui]\ncontrols_hide_ms = 1500\n")
            .unwrap();
        assert_eq!(cfg.playback.volume, 80);
        assert_eq!(cfg.playback.seek_step_ms, 5000);
        assert_eq!(cfg.ui.controls_hide_ms, 1500);
        assert_eq!(cfg.logging, LoggingConfig::default());
    }

    #[test]
    fn values_are_clamped() {
        let cfg = Config::parse(
            "[playback]\nvolume = 400\nvolume_step = 0\nloop_restart_delay_ms = 0\nrate_poll_ms = 1\n\n[ui]\ncontrols_hide_ms = 5\n",
        )
        .unwrap();
        assert_eq!(cfg.playback.volume, 100);
        assert_eq!(cfg.playback.volume_step, 1);
        assert_eq!(cfg.playback.loop_restart_delay_ms, 10);
        assert_eq!(cfg.playback.rate_poll_ms, 50);
        assert_eq!(cfg.ui.controls_hide_ms, 500);
    }

    #[test]
    fn engine_choice_is_read() {
        assert_eq!(Config::default().playback.engine, EngineKind::Auto);
        let cfg = Config::parse("[playback]\nengine = \"audio\"\n").unwrap();
        assert_eq!(cfg.playback.engine, EngineKind::Audio);
        assert!(Config::parse("[playback]\nengine = \"vlc\"\n").is_err());
    }

    #[test]
    fn blank_filter_falls_back() {
        let cfg = Config::parse("[logging]\nfilter = \"  \"\ndirectory = \"/tmp/pd\"\n").unwrap();
        assert_eq!(cfg.logging.filter, "playdeck=debug,warn");
        assert_eq!(cfg.logging.directory, PathBuf::from("/tmp/pd"));
    }

    #[test]
    fn invalid_documents_are_errors() {
        assert!(Config::parse("[playback]\nvolume = \"loud\"\n").is_err());
        assert!(Config::parse("[playback]\nvolum = 3\n").is_err());
        assert!(Config::parse("not toml at all [").is_err());
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load(Some(&missing)).is_err());

        let path = dir.path().join("custom.toml");
        fs::write(&path, "[playback]\nseek_step_ms = 10000\n").unwrap();
        let cfg = Config::load(Some(&path)).unwrap();
        assert_eq!(cfg.playback.seek_step_ms, 10_000);
    }
}
