//! core/mod.rs
//!
//! Everything that does not touch the GUI:
//! - which files count as media / subtitles
//! - folder discovery
//! - the playlist entity
//! - the engine boundary and the playback adapter on top of it
//!
//! The GUI calls into here and renders plain data back.

pub mod engine;
pub mod library;
pub mod playback;
pub mod playlist;
pub mod subtitles;
pub mod tags;
pub mod types;

use std::path::{Path, PathBuf};

pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "mpeg", "mpg",
];
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac", "aac", "m4a"];
pub const SUBTITLE_EXTENSIONS: &[&str] = &["srt", "sub", "ssa", "ass", "vtt"];

fn extension_in(path: &Path, set: &[&str]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| set.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

pub fn is_media(path: &Path) -> bool {
    extension_in(path, VIDEO_EXTENSIONS) || extension_in(path, AUDIO_EXTENSIONS)
}

pub fn is_subtitle(path: &Path) -> bool {
    extension_in(path, SUBTITLE_EXTENSIONS)
}

/// All media extensions, video first (dialog filters use this order).
pub fn media_extensions() -> Vec<&'static str> {
    VIDEO_EXTENSIONS
        .iter()
        .chain(AUDIO_EXTENSIONS)
        .copied()
        .collect()
}

/// Discover media in a folder for "Open Folder".
///
/// - Top level only
/// - Sorted by path (core owns ordering, GUI shouldn't)
pub fn scan_folder(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let mut paths = library::scan_media(dir)?;
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_checks_ignore_case() {
        assert!(is_media(Path::new("/x/Movie.MP4")));
        assert!(is_media(Path::new("song.flac")));
        assert!(!is_media(Path::new("movie.srt")));
        assert!(!is_media(Path::new("no_extension")));
        assert!(is_subtitle(Path::new("movie.VTT")));
        assert!(!is_subtitle(Path::new("movie.mkv")));
    }

    #[test]
    fn folder_scan_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c.mp3", "a.mp4", "b.ogg"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        let found = scan_folder(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.mp4", "b.ogg", "c.mp3"]);
    }

    #[test]
    fn media_extensions_cover_video_and_audio() {
        let all = media_extensions();
        assert_eq!(all.len(), VIDEO_EXTENSIONS.len() + AUDIO_EXTENSIONS.len());
        assert_eq!(all[0], "mp4");
    }
}
