//! core/library.rs
//! Folder scanning for "Open Folder" (one level, media extensions only).

use std::path::{Path, PathBuf};

use super::is_media;

/// List the supported media files directly inside `dir` (no recursion).
pub fn scan_media(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let entries = std::fs::read_dir(dir).map_err(|e| format!("{}: {e}", dir.display()))?;

    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| e.to_string())?;
        let path = entry.path();

        if path.is_file() && is_media(&path) {
            out.push(path);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_only_media_files_at_top_level() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.mp4", "b.MKV", "notes.txt", "c.flac"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("d.mp3"), b"x").unwrap();

        let mut found: Vec<String> = scan_media(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        found.sort();

        assert_eq!(found, vec!["a.mp4", "b.MKV", "c.flac"]);
    }

    #[test]
    fn missing_folder_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_media(&dir.path().join("gone")).is_err());
    }
}
