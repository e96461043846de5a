//! Small pure helper functions used by the GUI.
//! - no UI widgets or state mutation

use std::path::Path;

use chrono::{DateTime, Local};

/// `mm:ss`, negative input counts as zero. Minutes keep counting past 99.
pub(crate) fn format_time(ms: i64) -> String {
    let total_seconds = ms.max(0) / 1000;
    let (minutes, seconds) = (total_seconds / 60, total_seconds % 60);
    format!("{minutes:02}:{seconds:02}")
}

/// Rate label shown next to the rate slider, e.g. `1.5x`.
pub(crate) fn format_rate(rate: f32) -> String {
    format!("{rate:.1}x")
}

/// File name with extension, used as the fallback playlist label.
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Default snapshot file name for `now`.
pub(crate) fn snapshot_file_name(now: DateTime<Local>) -> String {
    format!("Playdeck_snapshot_{}.png", now.format("%Y%m%d_%H%M%S"))
}

/// Window title: "<file> - Playdeck" while something is loaded.
pub(crate) fn window_title(media: Option<&Path>) -> String {
    match media {
        Some(path) => format!("{} - Playdeck", file_name(path)),
        None => "Playdeck".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn format_time_pads_and_floors() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(999), "00:00");
        assert_eq!(format_time(61_500), "01:01");
        assert_eq!(format_time(-5), "00:00");
        assert_eq!(format_time(100 * 60_000 + 7_000), "100:07");
    }

    #[test]
    fn rate_label_has_one_decimal() {
        assert_eq!(format_rate(1.0), "1.0x");
        assert_eq!(format_rate(0.5), "0.5x");
        assert_eq!(format_rate(4.0), "4.0x");
    }

    #[test]
    fn snapshot_name_uses_local_timestamp() {
        let when = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            snapshot_file_name(when),
            "Playdeck_snapshot_20240309_140507.png"
        );
    }

    #[test]
    fn titles_and_names() {
        assert_eq!(file_name(Path::new("/m/clip.mkv")), "clip.mkv");
        assert_eq!(window_title(None), "Playdeck");
        assert_eq!(
            window_title(Some(Path::new("/m/clip.mkv"))),
            "clip.mkv - Playdeck"
        );
    }
}
