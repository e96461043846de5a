//! core/engine/decoder.rs
//! Media probing and decoding (Symphonia) -> rodio::Source.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::Source;

use symphonia::core::audio::{AudioBufferRef, SampleBuffer, Signal, SignalSpec};
use symphonia::core::codecs::{CODEC_TYPE_NULL, Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, SeekMode, SeekTo, Track};
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::{Time, TimeBase};

use crate::core::types::AudioTrack;

/// What the engine learns about a file before playing it.
#[derive(Debug, Clone, Default)]
pub(super) struct MediaInfo {
    pub duration_ms: Option<u64>,
    pub tracks: Vec<AudioTrack>,
    pub default_track: Option<u32>,
}

fn open_format(path: &Path) -> Result<Box<dyn FormatReader>, String> {
    let file = File::open(path).map_err(|e| format!("Open failed: {e}"))?;
    let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| format!("Format probe failed: {e}"))?;

    Ok(probed.format)
}

fn is_decodable(track: &Track) -> bool {
    track.codec_params.codec != CODEC_TYPE_NULL
}

fn describe(track: &Track) -> String {
    let codec = symphonia::default::get_codecs()
        .get_codec(track.codec_params.codec)
        .map(|d| d.short_name)
        .unwrap_or("unknown");

    match track.language.as_deref().map(str::trim) {
        Some(lang) if !lang.is_empty() => format!("{lang} ({codec})"),
        _ => format!("Track {} ({codec})", track.id),
    }
}

/// Probe container duration and audio tracks without decoding.
pub(super) fn probe(path: &Path) -> Result<MediaInfo, String> {
    let format = open_format(path)?;

    let tracks: Vec<AudioTrack> = format
        .tracks()
        .iter()
        .filter(|t| is_decodable(t))
        .map(|t| AudioTrack {
            id: t.id,
            description: describe(t),
        })
        .collect();

    let default = format.default_track().filter(|t| is_decodable(t));
    let duration_ms = default
        .and_then(|t| duration_from_params(t.codec_params.time_base, t.codec_params.n_frames));

    Ok(MediaInfo {
        duration_ms,
        default_track: default.map(|t| t.id).or_else(|| tracks.first().map(|t| t.id)),
        tracks,
    })
}

/// Construct a new rodio Source from `path` for `track_id` (default track
/// when `None`), starting at `start_ms`.
pub(super) fn open_source_at_ms(
    path: &Path,
    track_id: Option<u32>,
    start_ms: u64,
) -> Result<SymphoniaSource, String> {
    let mut format = open_format(path)?;

    let track = match track_id {
        Some(id) => format.tracks().iter().find(|t| t.id == id),
        None => format.default_track(),
    }
    .filter(|t| is_decodable(t))
    .ok_or_else(|| "No supported audio track found.".to_string())?;

    let track_id = track.id;

    // Clone codec params so we can seek (mutable borrow of format) without borrow conflicts.
    let codec_params = track.codec_params.clone();

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| format!("Decoder init failed: {e}"))?;

    if start_ms > 0 {
        let time = Time::from(Duration::from_millis(start_ms));
        let seek_to = SeekTo::Time {
            time,
            track_id: Some(track_id),
        };

        format
            .seek(SeekMode::Accurate, seek_to)
            .map_err(|e| format!("Seek failed: {e}"))?;

        // After seek, safest is to reset decoder state by recreating it.
        decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| format!("Decoder re-init failed after seek: {e}"))?;
    }

    Ok(SymphoniaSource::new(
        path.to_path_buf(),
        format,
        decoder,
        track_id,
    ))
}

fn duration_from_params(time_base: Option<TimeBase>, n_frames: Option<u64>) -> Option<u64> {
    let tb = time_base?;
    let frames = n_frames?;

    let t = tb.calc_time(frames);
    // Time is { seconds: u64, frac: f64 } in symphonia 0.5.x.
    let ms = (t.seconds as f64 * 1000.0) + (t.frac * 1000.0);
    Some(ms.round() as u64)
}

/// A streaming rodio Source backed by Symphonia.
pub(super) struct SymphoniaSource {
    _path: PathBuf, // kept for debugging
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,

    // Output format for rodio
    sample_rate: u32,
    channels: u16,

    // Interleaved f32 samples ready to be yielded
    out: Vec<f32>,
    out_pos: usize,

    ended: bool,
}

impl SymphoniaSource {
    fn new(
        path: PathBuf,
        format: Box<dyn FormatReader>,
        decoder: Box<dyn Decoder>,
        track_id: u32,
    ) -> Self {
        let mut this = Self {
            _path: path,
            format,
            decoder,
            track_id,
            sample_rate: 44100,
            channels: 2,
            out: Vec::new(),
            out_pos: 0,
            ended: false,
        };

        // Prime once so sample_rate/channels become correct ASAP.
        if let Err(e) = this.fill_out_buffer() {
            tracing::warn!(error = %e, "first decode failed");
            this.ended = true;
        }

        this
    }

    fn fill_out_buffer(&mut self) -> Result<(), String> {
        if self.ended {
            return Ok(());
        }

        self.out.clear();
        self.out_pos = 0;

        loop {
            let packet = match self.format.next_packet() {
                Ok(p) => p,
                Err(SymphoniaError::IoError(_)) => {
                    self.ended = true;
                    return Ok(());
                }
                Err(SymphoniaError::ResetRequired) => {
                    self.decoder.reset();
                    continue;
                }
                Err(e) => return Err(format!("Decode read error: {e}")),
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = match self.decoder.decode(&packet) {
                Ok(d) => d,
                Err(SymphoniaError::IoError(_)) => {
                    self.ended = true;
                    return Ok(());
                }
                // Corrupt packet; skip.
                Err(SymphoniaError::DecodeError(_)) => continue,
                Err(SymphoniaError::ResetRequired) => {
                    self.decoder.reset();
                    continue;
                }
                Err(e) => return Err(format!("Decode error: {e}")),
            };

            match decoded {
                AudioBufferRef::F32(buf) => {
                    self.sample_rate = buf.spec().rate;
                    self.channels = buf.spec().channels.count() as u16;

                    let frames = buf.frames();
                    let chans = buf.spec().channels.count();

                    self.out.reserve(frames * chans);
                    for f in 0..frames {
                        for c in 0..chans {
                            self.out.push(buf.chan(c)[f]);
                        }
                    }
                    return Ok(());
                }
                other => {
                    let spec = SignalSpec::new(other.spec().rate, other.spec().channels);
                    self.sample_rate = spec.rate;
                    self.channels = spec.channels.count() as u16;

                    let frames = other.frames();

                    let mut sbuf = SampleBuffer::<f32>::new(frames as u64, spec);
                    sbuf.copy_interleaved_ref(other);

                    self.out.extend_from_slice(sbuf.samples());
                    return Ok(());
                }
            }
        }
    }
}

impl Iterator for SymphoniaSource {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        while self.out_pos >= self.out.len() {
            if self.ended {
                return None;
            }
            if let Err(e) = self.fill_out_buffer() {
                tracing::warn!(error = %e, "decode stopped");
                self.ended = true;
                return None;
            }
        }

        let s = self.out.get(self.out_pos).copied();
        self.out_pos += 1;
        s
    }
}

impl Source for SymphoniaSource {
    // rodio 0.21 uses current_span_len (not current_frame_len).
    fn current_span_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_needs_time_base_and_frames() {
        assert_eq!(duration_from_params(None, Some(10)), None);
        assert_eq!(duration_from_params(Some(TimeBase::new(1, 1000)), None), None);
        assert_eq!(
            duration_from_params(Some(TimeBase::new(1, 44_100)), Some(88_200)),
            Some(2000)
        );
    }

    #[test]
    fn probing_garbage_fails_softly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.mp3");
        std::fs::write(&path, [0u8; 64]).unwrap();
        assert!(probe(&path).is_err());
        assert!(open_source_at_ms(&path, None, 0).is_err());
    }
}
