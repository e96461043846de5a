//! core/tags.rs
//! Display titles for playlist rows, read from ID3 tags when a file has them.
//!
//! - Never fails: untagged or unreadable files just return `None`
//!   and the caller falls back to the file name.

use std::path::{Path, PathBuf};

use id3::{Tag, TagLike};

/// "Artist - Title", or just "Title", from the file's ID3 tag.
pub fn display_title(path: &Path) -> Option<String> {
    let tag = Tag::read_from_path(path).ok()?;
    title_from_tag(&tag)
}

fn title_from_tag(tag: &Tag) -> Option<String> {
    let title = clean(tag.title())?;
    match clean(tag.artist()) {
        Some(artist) => Some(format!("{artist} - {title}")),
        None => Some(title),
    }
}

fn clean(s: Option<&str>) -> Option<String> {
    let trimmed = s?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Read display titles for a batch of paths (run off the UI thread).
pub fn display_titles(paths: Vec<PathBuf>) -> Vec<(PathBuf, Option<String>)> {
    paths
        .into_iter()
        .map(|path| {
            let title = display_title(&path);
            (path, title)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_with_and_without_artist() {
        let mut tag = Tag::new();
        tag.set_title("  Song ");
        assert_eq!(title_from_tag(&tag).as_deref(), Some("Song"));

        tag.set_artist("Band");
        assert_eq!(title_from_tag(&tag).as_deref(), Some("Band - Song"));
    }

    #[test]
    fn blank_title_means_no_title() {
        let mut tag = Tag::new();
        tag.set_artist("Band");
        tag.set_title("   ");
        assert_eq!(title_from_tag(&tag), None);
    }

    #[test]
    fn untagged_file_has_no_title() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.mp3");
        std::fs::write(&path, b"not really audio").unwrap();

        let titles = display_titles(vec![path.clone()]);
        assert_eq!(titles, vec![(path, None)]);
    }
}
