//! core/subtitles.rs
//! External subtitle files -> timed cues.
//!
//! Formats: SubRip (.srt), WebVTT (.vtt), SubStation (.ssa/.ass) and
//! MicroDVD (.sub, frame based).

use std::path::Path;

use thiserror::Error;

/// Frame rate assumed for MicroDVD files that don't declare one.
const MICRODVD_DEFAULT_FPS: f64 = 25.0;

#[derive(Debug, Error)]
pub enum SubtitleError {
    #[error("failed to read subtitle file: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported subtitle format: {0}")]
    Unsupported(String),
    #[error("no cues found in subtitle file")]
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
}

/// Cues sorted by start time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubtitleTrack {
    cues: Vec<Cue>,
}

impl SubtitleTrack {
    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    /// Text of the cues showing at `ms`, joined by newlines when they overlap.
    pub fn text_at(&self, ms: u64) -> Option<String> {
        let upto = self.cues.partition_point(|c| c.start_ms <= ms);
        let lines: Vec<&str> = self.cues[..upto]
            .iter()
            .filter(|c| ms < c.end_ms)
            .map(|c| c.text.as_str())
            .collect();

        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }

    fn from_cues(mut cues: Vec<Cue>) -> Result<Self, SubtitleError> {
        cues.retain(|c| c.end_ms > c.start_ms && !c.text.trim().is_empty());
        if cues.is_empty() {
            return Err(SubtitleError::Empty);
        }
        cues.sort_by_key(|c| c.start_ms);
        Ok(Self { cues })
    }
}

pub fn load(path: &Path) -> Result<SubtitleTrack, SubtitleError> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    parse(&ext, &text)
}

/// Parse `text` according to the file extension `ext` (lowercase, no dot).
pub fn parse(ext: &str, text: &str) -> Result<SubtitleTrack, SubtitleError> {
    // Strip a UTF-8 BOM; some editors still write one.
    let text = text.trim_start_matches('\u{feff}');

    let cues = match ext {
        "srt" | "vtt" => parse_blocks(text),
        "ssa" | "ass" => parse_ssa(text),
        "sub" => parse_microdvd(text, MICRODVD_DEFAULT_FPS),
        other => return Err(SubtitleError::Unsupported(other.to_string())),
    };

    SubtitleTrack::from_cues(cues)
}

/// SubRip and WebVTT share the same block shape:
/// optional id line, `start --> end [settings]`, text lines, blank line.
fn parse_blocks(text: &str) -> Vec<Cue> {
    let mut cues = Vec::new();
    let mut lines = text.lines().map(str::trim_end).peekable();

    while let Some(line) = lines.next() {
        let Some((start, end)) = line.split_once("-->") else {
            continue;
        };
        let (Some(start_ms), Some(end_ms)) = (
            parse_timestamp(start.trim()),
            end.split_whitespace().next().and_then(parse_timestamp),
        ) else {
            continue;
        };

        let mut body: Vec<&str> = Vec::new();
        while let Some(next) = lines.peek() {
            if next.trim().is_empty() {
                break;
            }
            body.push(next);
            lines.next();
        }

        cues.push(Cue {
            start_ms,
            end_ms,
            text: strip_tags(&body.join("\n")),
        });
    }

    cues
}

/// `hh:mm:ss,mmm`, `hh:mm:ss.mmm` or `mm:ss.mmm`.
fn parse_timestamp(s: &str) -> Option<u64> {
    let (clock, frac) = s.split_once([',', '.']).unwrap_or((s, "0"));
    let parts: Vec<u64> = clock
        .split(':')
        .map(|p| p.trim().parse::<u64>().ok())
        .collect::<Option<_>>()?;

    let (h, m, sec) = match parts.as_slice() {
        [h, m, s] => (*h, *m, *s),
        [m, s] => (0, *m, *s),
        _ => return None,
    };

    let frac = frac.trim();
    let digits = frac.len().min(3);
    let mut millis: u64 = frac.get(..digits)?.parse().ok()?;
    for _ in digits..3 {
        millis *= 10;
    }

    Some(((h * 60 + m) * 60 + sec) * 1000 + millis)
}

/// SubStation: `Dialogue:` lines laid out by the `[Events]` `Format:` line.
fn parse_ssa(text: &str) -> Vec<Cue> {
    let mut start_idx = 1;
    let mut end_idx = 2;
    let mut field_count = 10;
    let mut cues = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if let Some(format) = line.strip_prefix("Format:") {
            let fields: Vec<String> = format
                .split(',')
                .map(|f| f.trim().to_ascii_lowercase())
                .collect();
            if fields.iter().any(|f| f == "text") {
                start_idx = fields.iter().position(|f| f == "start").unwrap_or(1);
                end_idx = fields.iter().position(|f| f == "end").unwrap_or(2);
                field_count = fields.len();
            }
            continue;
        }

        let Some(dialogue) = line.strip_prefix("Dialogue:") else {
            continue;
        };

        // Text is the last field and may itself contain commas.
        let fields: Vec<&str> = dialogue.splitn(field_count, ',').collect();
        if fields.len() < field_count {
            continue;
        }
        let (Some(start_ms), Some(end_ms)) = (
            parse_ssa_time(fields[start_idx]),
            parse_ssa_time(fields[end_idx]),
        ) else {
            continue;
        };

        let raw = fields[field_count - 1].replace("\\N", "\n").replace("\\n", "\n");
        cues.push(Cue {
            start_ms,
            end_ms,
            text: strip_overrides(&raw),
        });
    }

    cues
}

/// `h:mm:ss.cc` (centiseconds).
fn parse_ssa_time(s: &str) -> Option<u64> {
    let (clock, cs) = s.trim().split_once('.')?;
    let mut it = clock.split(':');
    let h: u64 = it.next()?.parse().ok()?;
    let m: u64 = it.next()?.parse().ok()?;
    let sec: u64 = it.next()?.parse().ok()?;
    let cs: u64 = cs.parse().ok()?;
    Some(((h * 60 + m) * 60 + sec) * 1000 + cs * 10)
}

/// MicroDVD: `{start_frame}{end_frame}text|second line`.
/// A leading `{1}{1}23.976` line declares the frame rate.
fn parse_microdvd(text: &str, default_fps: f64) -> Vec<Cue> {
    let mut fps = default_fps;
    let mut cues = Vec::new();

    for line in text.lines() {
        let Some((start, rest)) = line.trim().strip_prefix('{').and_then(|l| l.split_once('}'))
        else {
            continue;
        };
        let Some((end, body)) = rest.strip_prefix('{').and_then(|l| l.split_once('}')) else {
            continue;
        };
        let (Ok(start), Ok(end)) = (start.parse::<u64>(), end.parse::<u64>()) else {
            continue;
        };

        if start == 1 && end == 1 {
            if let Ok(declared) = body.trim().parse::<f64>() {
                if declared > 0.0 {
                    fps = declared;
                }
                continue;
            }
        }

        let to_ms = |frame: u64| ((frame as f64) * 1000.0 / fps).round() as u64;
        cues.push(Cue {
            start_ms: to_ms(start),
            end_ms: to_ms(end),
            text: strip_overrides(&body.replace('|', "\n")),
        });
    }

    cues
}

/// Drop `<i>`-style markup.
fn strip_tags(s: &str) -> String {
    strip_between(s, '<', '>')
}

/// Drop `{\an8}`-style override blocks.
fn strip_overrides(s: &str) -> String {
    strip_between(s, '{', '}')
}

fn strip_between(s: &str, open: char, close: char) -> String {
    let mut out = String::with_capacity(s.len());
    let mut depth = 0usize;
    for ch in s.chars() {
        if ch == open {
            depth += 1;
        } else if ch == close && depth > 0 {
            depth -= 1;
        } else if depth == 0 {
            out.push(ch);
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRT: &str = "1\n00:00:01,000 --> 00:00:02,500\nHello <i>there</i>\n\n2\n00:00:03,000 --> 00:00:04,000\nSecond\nline\n";

    #[test]
    fn srt_cues_and_lookup() {
        let track = parse("srt", SRT).unwrap();
        assert_eq!(track.cues().len(), 2);
        assert_eq!(track.cues()[0].start_ms, 1000);
        assert_eq!(track.cues()[0].end_ms, 2500);
        assert_eq!(track.text_at(1500).as_deref(), Some("Hello there"));
        assert_eq!(track.text_at(2500), None);
        assert_eq!(track.text_at(3999).as_deref(), Some("Second\nline"));
        assert_eq!(track.text_at(0), None);
    }

    #[test]
    fn vtt_short_timestamps_and_settings() {
        let vtt = "\u{feff}WEBVTT\n\nintro\n00:01.000 --> 00:02.000 align:start\nHi\n";
        let track = parse("vtt", vtt).unwrap();
        assert_eq!(
            track.cues(),
            &[Cue {
                start_ms: 1000,
                end_ms: 2000,
                text: "Hi".into()
            }]
        );
    }

    #[test]
    fn ass_dialogue_with_commas_and_overrides() {
        let ass = "[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\nDialogue: 0,0:00:01.50,0:00:03.00,Default,,0,0,0,,{\\an8}Well, hi\\Nthere\n";
        let track = parse("ass", ass).unwrap();
        let cue = &track.cues()[0];
        assert_eq!(cue.start_ms, 1500);
        assert_eq!(cue.end_ms, 3000);
        assert_eq!(cue.text, "Well, hi\nthere");
    }

    #[test]
    fn microdvd_uses_declared_fps() {
        let sub = "{1}{1}10\n{10}{20}One|Two\n";
        let track = parse("sub", sub).unwrap();
        let cue = &track.cues()[0];
        assert_eq!(cue.start_ms, 1000);
        assert_eq!(cue.end_ms, 2000);
        assert_eq!(cue.text, "One\nTwo");
    }

    #[test]
    fn overlapping_cues_are_joined() {
        let srt = "00:00:01,000 --> 00:00:05,000\nA\n\n00:00:02,000 --> 00:00:03,000\nB\n";
        let track = parse("srt", srt).unwrap();
        assert_eq!(track.text_at(2500).as_deref(), Some("A\nB"));
    }

    #[test]
    fn empty_or_unknown_files_are_errors() {
        assert!(matches!(parse("srt", "garbage"), Err(SubtitleError::Empty)));
        assert!(matches!(
            parse("txt", SRT),
            Err(SubtitleError::Unsupported(_))
        ));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie.SRT");
        std::fs::write(&path, SRT).unwrap();
        assert_eq!(load(&path).unwrap().cues().len(), 2);
        assert!(matches!(
            load(&dir.path().join("missing.srt")),
            Err(SubtitleError::Io(_))
        ));
    }
}
