//! Session playlist: ordered media paths plus a "current" cursor.
//!
//! Invariant: `current` is `None` or a valid index into `entries`.
//! Every mutation below keeps it that way.

use std::path::{Component, Path, PathBuf};

#[derive(Debug, Default, Clone)]
pub struct Playlist {
    entries: Vec<PathBuf>,
    current: Option<usize>,
}

/// What a removal did to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removal {
    pub removed: usize,
    /// The current entry was among the removed ones (cursor is now `None`).
    pub current_removed: bool,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.entries.get(index).map(PathBuf::as_path)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Path> {
        self.current.and_then(|i| self.get(i))
    }

    /// Next/previous are only meaningful with more than one entry.
    pub fn can_navigate(&self) -> bool {
        self.entries.len() > 1
    }

    /// Append paths in order, skipping ones already present (normalized
    /// comparison). Returns how many were added.
    pub fn add<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut added = 0;
        for path in paths {
            let norm = normalize(path.as_ref());
            if !self.entries.contains(&norm) {
                self.entries.push(norm);
                added += 1;
            }
        }
        added
    }

    /// Remove the given indices (out-of-range ones are ignored).
    ///
    /// The cursor follows its entry when earlier rows disappear and resets
    /// when its own entry is removed.
    pub fn remove_indices(&mut self, indices: &[usize]) -> Removal {
        let mut doomed: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.entries.len())
            .collect();
        doomed.sort_unstable();
        doomed.dedup();

        let current_removed = self.current.is_some_and(|c| doomed.binary_search(&c).is_ok());

        self.current = match self.current {
            Some(_) if current_removed => None,
            Some(c) => Some(c - doomed.iter().filter(|&&i| i < c).count()),
            None => None,
        };

        for &i in doomed.iter().rev() {
            self.entries.remove(i);
        }

        Removal {
            removed: doomed.len(),
            current_removed,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.current = None;
    }

    /// Move the cursor. Out-of-range indices leave it untouched.
    pub fn set_current(&mut self, index: usize) -> Option<&Path> {
        if index >= self.entries.len() {
            return None;
        }
        self.current = Some(index);
        self.get(index)
    }

    /// Index after the cursor, wrapping. `None` unless navigation is enabled.
    /// With no cursor, the first entry is next.
    pub fn next_index(&self) -> Option<usize> {
        if !self.can_navigate() {
            return None;
        }
        let len = self.entries.len();
        Some(self.current.map_or(0, |c| (c + 1) % len))
    }

    /// Index before the cursor, wrapping. With no cursor, the last entry.
    pub fn previous_index(&self) -> Option<usize> {
        if !self.can_navigate() {
            return None;
        }
        let len = self.entries.len();
        Some(self.current.map_or(len - 1, |c| (c + len - 1) % len))
    }
}

/// Lexical path normalization: drops `.`, folds `..` into its parent and
/// collapses redundant separators. Never touches the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    out.pop();
                } else if !matches!(
                    out.components().next_back(),
                    Some(Component::RootDir | Component::Prefix(_))
                ) {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> Playlist {
        let mut p = Playlist::new();
        p.add(["/m/a.mp4", "/m/b.mp4", "/m/c.mp4"]);
        p
    }

    fn assert_cursor_valid(p: &Playlist) {
        if let Some(c) = p.current_index() {
            assert!(c < p.len(), "cursor {c} out of range for len {}", p.len());
        }
    }

    #[test]
    fn normalize_is_lexical() {
        assert_eq!(normalize(Path::new("/a/./b//c")), PathBuf::from("/a/b/c"));
        assert_eq!(normalize(Path::new("/a/b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("a/../../b")), PathBuf::from("../b"));
        assert_eq!(normalize(Path::new("/../x")), PathBuf::from("/x"));
        assert_eq!(normalize(Path::new("./")), PathBuf::from("."));
    }

    #[test]
    fn duplicate_add_is_rejected_silently() {
        let mut p = three();
        let added = p.add(["/m/./a.mp4", "/m/x/../b.mp4"]);
        assert_eq!(added, 0);
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn add_keeps_insertion_order() {
        let p = three();
        let names: Vec<_> = (0..p.len())
            .map(|i| p.get(i).unwrap().display().to_string())
            .collect();
        assert_eq!(names, vec!["/m/a.mp4", "/m/b.mp4", "/m/c.mp4"]);
        assert_eq!(p.current_index(), None);
    }

    #[test]
    fn removing_current_resets_cursor() {
        let mut p = three();
        p.set_current(1);
        let r = p.remove_indices(&[1]);
        assert!(r.current_removed);
        assert_eq!(p.current_index(), None);
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn removing_earlier_rows_shifts_cursor() {
        let mut p = three();
        p.set_current(2);
        let r = p.remove_indices(&[0, 0, 7]);
        assert_eq!(r.removed, 1);
        assert!(!r.current_removed);
        assert_eq!(p.current(), Some(Path::new("/m/c.mp4")));
    }

    #[test]
    fn clear_resets_cursor() {
        let mut p = three();
        p.set_current(0);
        p.clear();
        assert!(p.is_empty());
        assert_eq!(p.current_index(), None);
    }

    #[test]
    fn cursor_stays_valid_through_mixed_edits() {
        let mut p = Playlist::new();
        p.add(["/a", "/b", "/c", "/d"]);
        assert_cursor_valid(&p);
        p.set_current(3);
        p.remove_indices(&[0, 1]);
        assert_cursor_valid(&p);
        assert_eq!(p.current(), Some(Path::new("/d")));
        p.add(["/e"]);
        p.remove_indices(&[1]);
        assert_cursor_valid(&p);
        assert_eq!(p.current_index(), None);
        p.set_current(9);
        assert_cursor_valid(&p);
        p.set_current(0);
        p.clear();
        assert_cursor_valid(&p);
    }

    #[test]
    fn next_and_previous_wrap() {
        let mut p = three();
        p.set_current(2);
        assert_eq!(p.next_index(), Some(0));
        p.set_current(0);
        assert_eq!(p.previous_index(), Some(2));
        p.set_current(1);
        assert_eq!(p.next_index(), Some(2));
        assert_eq!(p.previous_index(), Some(0));
    }

    #[test]
    fn navigation_without_cursor() {
        let p = three();
        assert_eq!(p.next_index(), Some(0));
        assert_eq!(p.previous_index(), Some(2));
    }

    #[test]
    fn navigation_disabled_for_short_lists() {
        let mut p = Playlist::new();
        assert_eq!(p.next_index(), None);
        p.add(["/only.mp3"]);
        p.set_current(0);
        assert!(!p.can_navigate());
        assert_eq!(p.next_index(), None);
        assert_eq!(p.previous_index(), None);
    }

    #[test]
    fn set_current_out_of_range_is_ignored() {
        let mut p = three();
        p.set_current(1);
        assert!(p.set_current(3).is_none());
        assert_eq!(p.current_index(), Some(1));
    }
}
