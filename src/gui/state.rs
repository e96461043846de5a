//! GUI state + messages.
//! Pure data definitions used by update/ + view/.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

use iced::keyboard::{Key, Modifiers};
use iced::widget::image;
use iced::window;

use crate::config::Config;
use crate::core::engine::EngineBackend;
use crate::core::playback::PlaybackAdapter;
use crate::core::playlist::Playlist;
use crate::core::types::{AspectRatio, AudioTrack, PlaybackState};

/// Top-level menus of the menu row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MenuKind {
    Media,
    Playback,
    Audio,
    Video,
    Subtitles,
    View,
    Help,
}

impl MenuKind {
    pub const ALL: [MenuKind; 7] = [
        Self::Media,
        Self::Playback,
        Self::Audio,
        Self::Video,
        Self::Subtitles,
        Self::View,
        Self::Help,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Media => "Media",
            Self::Playback => "Playback",
            Self::Audio => "Audio",
            Self::Video => "Video",
            Self::Subtitles => "Subtitles",
            Self::View => "View",
            Self::Help => "Help",
        }
    }
}

/// Raw window input forwarded by the event subscription.
#[derive(Debug, Clone)]
pub(crate) enum Input {
    Opened,
    Key(Key, Modifiers),
    Modifiers(Modifiers),
    CursorMoved,
}

/// App state
pub(crate) struct Player {
    pub config: Config,
    pub adapter: PlaybackAdapter,
    pub startup_file: Option<PathBuf>,
    pub window: Option<window::Id>,
    pub status: String,

    // Playlist
    pub playlist: Playlist,
    pub titles: HashMap<PathBuf, String>,
    pub selected: Option<usize>,
    pub show_playlist: bool,

    // Mirrored from adapter notifications
    pub playback_state: PlaybackState,
    pub time_ms: i64,
    pub duration_ms: i64,
    pub position: f32,
    pub rate: f32,
    pub volume: i32,
    pub subtitle: Option<String>,
    /// Picture on the video surface, rebuilt only when the serial moves.
    pub frame: Option<image::Handle>,
    pub frame_serial: Option<u64>,

    // Current media facts, refreshed on load / state change
    pub has_video: bool,
    pub audio_tracks: Vec<AudioTrack>,
    pub audio_track: Option<u32>,
    pub aspect_ratio: AspectRatio,

    // User toggles
    pub looping: bool,
    /// Last non-zero volume, restored on unmute.
    pub last_volume: i32,
    /// Seek slider drag in progress (ratio); engine position updates are held.
    pub seek_preview: Option<f32>,

    // Window chrome
    pub fullscreen: bool,
    pub controls_visible: bool,
    pub controls_hovered: bool,
    pub hide_controls_at: Option<Instant>,
    pub open_menu: Option<MenuKind>,
    pub modifiers: Modifiers,
}

impl Player {
    pub fn new(
        config: Config,
        backend: Box<dyn EngineBackend>,
        startup_file: Option<PathBuf>,
    ) -> Self {
        let adapter = PlaybackAdapter::new(backend, config.adapter_timing());
        let volume = config.playback.volume;

        Self {
            config,
            adapter,
            startup_file,
            window: None,
            status: "Starting engine...".to_string(),

            playlist: Playlist::new(),
            titles: HashMap::new(),
            selected: None,
            show_playlist: false,

            playback_state: PlaybackState::Idle,
            time_ms: 0,
            duration_ms: 0,
            position: 0.0,
            rate: 1.0,
            volume,
            subtitle: None,
            frame: None,
            frame_serial: None,

            has_video: false,
            audio_tracks: Vec::new(),
            audio_track: None,
            aspect_ratio: AspectRatio::Default,

            looping: false,
            last_volume: if volume > 0 { volume } else { 50 },
            seek_preview: None,

            fullscreen: false,
            controls_visible: true,
            controls_hovered: false,
            hide_controls_at: None,
            open_menu: None,
            modifiers: Modifiers::default(),
        }
    }

    pub fn is_muted(&self) -> bool {
        self.volume == 0
    }

    pub fn is_playing(&self) -> bool {
        self.playback_state == PlaybackState::Playing
    }

    // ---- enabling rules ----

    pub fn can_play_pause(&self) -> bool {
        !self.playlist.is_empty()
    }

    pub fn can_stop(&self) -> bool {
        self.playback_state.is_active()
    }

    pub fn can_navigate(&self) -> bool {
        self.playlist.can_navigate()
    }

    pub fn can_change_rate(&self) -> bool {
        self.playback_state.is_active()
    }

    pub fn can_load_subtitle(&self) -> bool {
        self.playback_state.is_active()
    }

    pub fn can_snapshot(&self) -> bool {
        self.playback_state.is_active() && self.has_video
    }

    pub fn can_pick_audio_track(&self) -> bool {
        self.audio_tracks.len() > 1
    }

    /// Playlist row label: ID3 title when known, else the file name.
    pub fn entry_label(&self, index: usize) -> String {
        let Some(path) = self.playlist.get(index) else {
            return String::new();
        };
        match self.titles.get(path) {
            Some(title) => title.clone(),
            None => super::util::file_name(path),
        }
    }
}

/// Message = "something happened".
#[derive(Debug, Clone)]
pub(crate) enum Message {
    Noop,

    // Engine
    InitializeEngine,
    Tick(Instant),
    LoadStartupFile,

    // Media
    OpenFiles,
    OpenFolder,
    FilesChosen(Vec<PathBuf>),
    FolderChosen(Option<PathBuf>),
    FolderScanned(PathBuf, Result<Vec<PathBuf>, String>),
    TitlesLoaded(Vec<(PathBuf, Option<String>)>),
    Quit,

    // Transport
    TogglePlayPause,
    Stop,
    Next,
    Previous,
    ToggleLoop,
    /// Carries the playlist index that ended.
    AutoAdvance(Option<usize>),

    // Seek: preview vs commit
    SeekPreview(f32),
    SeekCommit,
    SeekForward,
    SeekBackward,

    // Volume / rate
    SetVolume(i32),
    VolumeUp,
    VolumeDown,
    ToggleMute,
    SetRate(f32),
    RateUp,
    RateDown,

    // Audio / video / subtitles
    SelectAudioTrack(AudioTrack),
    SelectAspectRatio(AspectRatio),
    Snapshot,
    SnapshotTargetChosen(Option<PathBuf>),
    LoadSubtitle,
    SubtitleChosen(Option<PathBuf>),

    // Playlist panel
    TogglePlaylist,
    PlaylistSelect(usize),
    PlaylistActivate(usize),
    PlaylistPlaySelected,
    PlaylistRemoveSelected,
    PlaylistClear,
    PlaylistClearConfirmed(bool),

    // Window
    Input(window::Id, Input),
    ToggleFullscreen,
    ExitFullscreen,
    ControlsHovered(bool),
    VideoClicked,
    VideoScrolled(f32),
    ToggleMenu(MenuKind),
    CloseMenus,

    // Help
    ShowHelp,
    ShowAbout,
}
