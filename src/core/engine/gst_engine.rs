//! core/engine/gst_engine.rs
//! The video engine: a gstreamer `playbin` whose video sink is an RGBA appsink.
//!
//! - Decoded pictures land in a shared slot; the UI copies the newest one on
//!   its own tick (`video_frame`).
//! - A bus thread turns pipeline messages into `EngineEvent`s and reports
//!   time / position every 100 ms while playing.
//! - Aspect overrides rescale inside the pipeline (a capsfilter in front of
//!   the appsink), so frames and snapshots already have the requested shape.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use gst::prelude::*;
use gstreamer as gst;
use gstreamer_app as gst_app;
use gstreamer_video as gst_video;
use parking_lot::Mutex;

use super::{EngineBackend, EngineError, EngineEvent, EngineInstance, MediaPlayer};
use crate::core::subtitles::{self, SubtitleTrack};
use crate::core::types::{AudioTrack, PlaybackState, VideoFrame};

const TICK: Duration = Duration::from_millis(100);

/// Video branch handed to playbin as its `video-sink`.
const SINK_PIPELINE: &str = "videoconvert ! videoscale ! capsfilter name=aspect ! \
     appsink name=frames caps=video/x-raw,format=RGBA max-buffers=1 drop=true";

const REQUIRED_ELEMENTS: [&str; 5] = ["playbin", "appsink", "capsfilter", "videoconvert", "videoscale"];

#[derive(Debug, Default, Clone, Copy)]
pub struct GstBackend;

impl EngineBackend for GstBackend {
    fn new_instance(&self) -> Result<Box<dyn EngineInstance>, EngineError> {
        gst::init().map_err(|e| EngineError::Init(format!("gstreamer: {e}")))?;

        if let Some(missing) = REQUIRED_ELEMENTS
            .iter()
            .find(|name| gst::ElementFactory::find(name).is_none())
        {
            return Err(EngineError::Init(format!(
                "gstreamer element `{missing}` is not installed"
            )));
        }

        tracing::info!(version = %gst::version_string(), "video engine started");
        Ok(Box::new(GstInstance { released: false }))
    }
}

pub struct GstInstance {
    released: bool,
}

impl EngineInstance for GstInstance {
    fn new_player(&mut self) -> Result<Box<dyn MediaPlayer>, EngineError> {
        if self.released {
            return Err(EngineError::Released);
        }
        Ok(Box::new(GstPlayer::new()?))
    }

    fn version(&self) -> String {
        gst::version_string().to_string()
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            tracing::info!("video engine stopped");
        }
    }
}

#[derive(Debug)]
struct Status {
    media: Option<std::path::PathBuf>,
    state: PlaybackState,
    length_ms: i64,
    seekable: bool,
    volume: i32,
    rate: f32,
    subtitles: Option<SubtitleTrack>,
    last_error: Option<String>,
    aspect: Option<(u32, u32)>,
    // Waiting for the stream's size (aspect) or for a running pipeline (rate).
    aspect_pending: bool,
    rate_pending: bool,
}

impl Default for Status {
    fn default() -> Self {
        Self {
            media: None,
            state: PlaybackState::Idle,
            length_ms: 0,
            seekable: false,
            volume: 100,
            rate: 1.0,
            subtitles: None,
            last_error: None,
            aspect: None,
            aspect_pending: false,
            rate_pending: false,
        }
    }
}

/// Everything the UI handle, the bus thread and the streaming thread share.
#[derive(Default)]
struct Shared {
    status: Mutex<Status>,
    events: Mutex<Option<Sender<EngineEvent>>>,
    frame: Mutex<Option<VideoFrame>>,
    serial: AtomicU64,
    running: AtomicBool,
}

impl Shared {
    fn emit(&self, event: EngineEvent) {
        if let Some(tx) = self.events.lock().as_ref() {
            let _ = tx.send(event);
        }
    }
}

pub struct GstPlayer {
    playbin: gst::Element,
    aspect: gst::Element,
    shared: Arc<Shared>,
    bus_thread: Option<JoinHandle<()>>,
}

impl GstPlayer {
    fn new() -> Result<Self, EngineError> {
        let playbin = gst::ElementFactory::make("playbin")
            .name("playdeck")
            .build()
            .map_err(backend_err)?;

        let sink = gst::parse::bin_from_description(SINK_PIPELINE, true).map_err(backend_err)?;
        let aspect = sink
            .by_name("aspect")
            .ok_or_else(|| EngineError::Backend("aspect filter missing from video sink".into()))?;
        let frames = sink
            .by_name("frames")
            .and_then(|e| e.downcast::<gst_app::AppSink>().ok())
            .ok_or_else(|| EngineError::Backend("appsink missing from video sink".into()))?;

        aspect.set_property("caps", natural_caps());
        playbin.set_property("video-sink", &sink);

        let shared = Arc::new(Shared::default());

        let on_sample = Arc::clone(&shared);
        let on_preroll = Arc::clone(&shared);
        frames.set_callbacks(
            gst_app::AppSinkCallbacks::builder()
                .new_sample(move |sink| {
                    let sample = sink.pull_sample().map_err(|_| gst::FlowError::Eos)?;
                    store_sample(&sample, &on_sample)
                })
                // Paused seeks only deliver a preroll sample.
                .new_preroll(move |sink| {
                    let sample = sink.pull_preroll().map_err(|_| gst::FlowError::Eos)?;
                    store_sample(&sample, &on_preroll)
                })
                .build(),
        );

        let bus = playbin
            .bus()
            .ok_or_else(|| EngineError::Backend("pipeline has no bus".into()))?;

        shared.running.store(true, Ordering::Release);
        let bus_thread = thread::Builder::new()
            .name("playdeck-gst-bus".into())
            .spawn({
                let playbin = playbin.clone();
                let aspect = aspect.clone();
                let shared = Arc::clone(&shared);
                move || watch_bus(&bus, &playbin, &aspect, &shared)
            })
            .map_err(|e| EngineError::Init(format!("failed to spawn bus thread: {e}")))?;

        Ok(Self {
            playbin,
            aspect,
            shared,
            bus_thread: Some(bus_thread),
        })
    }

    fn is_released(&self) -> bool {
        self.bus_thread.is_none()
    }

    fn set_state(&self, state: gst::State) -> Result<(), EngineError> {
        self.playbin.set_state(state).map(|_| ()).map_err(|e| {
            let detail = format!("could not switch pipeline to {state:?}: {e}");
            self.shared.status.lock().last_error = Some(detail.clone());
            EngineError::Backend(detail)
        })
    }

    fn position_ms(&self) -> i64 {
        self.playbin
            .query_position::<gst::ClockTime>()
            .map_or(0, clock_ms)
    }
}

impl MediaPlayer for GstPlayer {
    fn attach(&mut self, events: Sender<EngineEvent>) {
        *self.shared.events.lock() = Some(events);
    }

    fn set_media(&mut self, path: &Path) -> Result<(), EngineError> {
        if self.is_released() {
            return Err(EngineError::Released);
        }

        // playbin wants an absolute file:// URI.
        let absolute = path.canonicalize().map_err(backend_err)?;
        let uri = gst::glib::filename_to_uri(&absolute, None).map_err(backend_err)?;

        if let Err(e) = self.set_state(gst::State::Null) {
            tracing::warn!(error = %e, "pipeline reset failed");
        }
        self.playbin.set_property("uri", uri.as_str());
        *self.shared.frame.lock() = None;

        let mut status = self.shared.status.lock();
        status.media = Some(path.to_path_buf());
        status.state = PlaybackState::Idle;
        status.length_ms = 0;
        status.seekable = false;
        status.subtitles = None;
        status.last_error = None;
        status.aspect_pending = status.aspect.is_some();
        status.rate_pending = status.rate != 1.0;
        Ok(())
    }

    fn play(&mut self) -> Result<(), EngineError> {
        if self.is_released() {
            return Err(EngineError::Released);
        }

        let previous = {
            let mut status = self.shared.status.lock();
            if status.media.is_none() {
                return Err(EngineError::NoMedia);
            }
            let previous = status.state;
            if !matches!(previous, PlaybackState::Playing | PlaybackState::Paused) {
                status.state = PlaybackState::Opening;
            }
            previous
        };

        match previous {
            PlaybackState::Playing | PlaybackState::Paused => {}
            PlaybackState::Ended => {
                // At EOS the pipeline is still in Playing, so no state change
                // will be posted: rewind and report it here.
                self.playbin
                    .seek_simple(gst::SeekFlags::FLUSH | gst::SeekFlags::KEY_UNIT, gst::ClockTime::ZERO)
                    .map_err(backend_err)?;
                self.shared.status.lock().state = PlaybackState::Playing;
                self.shared.emit(EngineEvent::Playing);
                return Ok(());
            }
            _ => self.shared.emit(EngineEvent::Opening),
        }

        self.set_state(gst::State::Playing)
    }

    fn set_pause(&mut self, pause: bool) {
        let target = if pause {
            gst::State::Paused
        } else {
            gst::State::Playing
        };
        if let Err(e) = self.set_state(target) {
            tracing::warn!(error = %e, pause, "pause toggle failed");
        }
    }

    fn stop(&mut self) {
        if self.is_released() {
            return;
        }
        // Marked first so the Playing -> Paused hop on the way down stays quiet.
        self.shared.status.lock().state = PlaybackState::Stopped;
        if let Err(e) = self.set_state(gst::State::Ready) {
            tracing::warn!(error = %e, "stop failed");
        }
        *self.shared.frame.lock() = None;
        self.shared.emit(EngineEvent::Stopped);
    }

    fn is_seekable(&self) -> bool {
        self.shared.status.lock().seekable
    }

    fn set_position(&mut self, ratio: f32) {
        let Some(length) = self.playbin.query_duration::<gst::ClockTime>() else {
            return;
        };
        let target = (length.mseconds() as f64 * f64::from(ratio.clamp(0.0, 1.0))) as u64;
        if let Err(e) = self.playbin.seek_simple(
            gst::SeekFlags::FLUSH | gst::SeekFlags::KEY_UNIT,
            gst::ClockTime::from_mseconds(target),
        ) {
            tracing::warn!(error = %e, ratio, "seek failed");
        }
    }

    fn time_ms(&self) -> i64 {
        self.position_ms()
    }

    fn length_ms(&self) -> i64 {
        self.shared.status.lock().length_ms
    }

    fn state(&self) -> PlaybackState {
        self.shared.status.lock().state
    }

    fn volume(&self) -> i32 {
        self.shared.status.lock().volume
    }

    fn set_volume(&mut self, volume: i32) {
        let volume = volume.clamp(0, 100);
        self.shared.status.lock().volume = volume;
        self.playbin.set_property("volume", f64::from(volume) / 100.0);
    }

    fn rate(&self) -> f32 {
        self.shared.status.lock().rate
    }

    fn set_rate(&mut self, rate: f32) {
        let running = {
            let mut status = self.shared.status.lock();
            status.rate = rate;
            matches!(status.state, PlaybackState::Playing | PlaybackState::Paused)
        };
        let applied = running && apply_rate(&self.playbin, rate);
        self.shared.status.lock().rate_pending = !applied;
    }

    fn audio_tracks(&self) -> Result<Vec<AudioTrack>, EngineError> {
        if self.shared.status.lock().media.is_none() {
            return Err(EngineError::NoMedia);
        }

        let count = self.playbin.property::<i32>("n-audio");
        let tracks = (0..count)
            .map(|index| {
                let tags = self
                    .playbin
                    .emit_by_name::<Option<gst::TagList>>("get-audio-tags", &[&index]);
                let description = tags.as_ref().map_or_else(String::new, |tags| {
                    let title = tags.get::<gst::tags::Title>().map(|v| v.get().to_owned());
                    let language = tags
                        .get::<gst::tags::LanguageCode>()
                        .map(|v| v.get().to_owned());
                    describe_track(title.as_deref(), language.as_deref())
                });
                AudioTrack {
                    id: index.unsigned_abs(),
                    description,
                }
            })
            .collect();
        Ok(tracks)
    }

    fn audio_track(&self) -> Option<u32> {
        // -1 while nothing is selected.
        u32::try_from(self.playbin.property::<i32>("current-audio")).ok()
    }

    fn set_audio_track(&mut self, id: u32) -> Result<(), EngineError> {
        let count = self.playbin.property::<i32>("n-audio");
        let index = i32::try_from(id)
            .ok()
            .filter(|index| *index < count)
            .ok_or(EngineError::Unsupported("no such audio track"))?;
        self.playbin.set_property("current-audio", index);
        Ok(())
    }

    fn video_track_count(&self) -> usize {
        if self.shared.status.lock().media.is_none() {
            return 0;
        }
        usize::try_from(self.playbin.property::<i32>("n-video")).unwrap_or(0)
    }

    fn add_subtitle(&mut self, path: &Path) -> Result<(), EngineError> {
        if self.shared.status.lock().media.is_none() {
            return Err(EngineError::NoMedia);
        }
        let track = subtitles::load(path)?;
        tracing::debug!(cues = track.cues().len(), path = %path.display(), "subtitle loaded");
        self.shared.status.lock().subtitles = Some(track);
        Ok(())
    }

    fn subtitle_text(&self) -> Option<String> {
        let time_ms = u64::try_from(self.position_ms()).ok()?;
        self.shared.status.lock().subtitles.as_ref()?.text_at(time_ms)
    }

    fn take_snapshot(&mut self, path: &Path) -> Result<(), EngineError> {
        if self.shared.status.lock().media.is_none() {
            return Err(EngineError::NoMedia);
        }
        let frame = self
            .shared
            .frame
            .lock()
            .clone()
            .ok_or(EngineError::Unsupported("no video frame decoded yet"))?;
        write_png(&frame, path)?;
        tracing::info!(path = %path.display(), width = frame.width, height = frame.height, "snapshot written");
        Ok(())
    }

    fn set_aspect_ratio(&mut self, ratio: Option<&str>) {
        let parsed = ratio.and_then(parse_ratio);
        if ratio.is_some() && parsed.is_none() {
            tracing::warn!(?ratio, "unrecognized aspect ratio, using the stream's own");
        }
        self.shared.status.lock().aspect = parsed;

        let applied = apply_aspect(&self.playbin, &self.aspect, parsed);
        self.shared.status.lock().aspect_pending = !applied;
    }

    fn video_frame(&self) -> Option<VideoFrame> {
        self.shared.frame.lock().clone()
    }

    fn last_error(&self) -> Option<String> {
        self.shared.status.lock().last_error.clone()
    }

    fn release(&mut self) {
        let Some(thread) = self.bus_thread.take() else {
            return;
        };
        self.shared.running.store(false, Ordering::Release);
        if let Err(e) = self.playbin.set_state(gst::State::Null) {
            tracing::warn!(error = %e, "pipeline shutdown failed");
        }
        if thread.join().is_err() {
            tracing::warn!("bus thread panicked");
        }
        *self.shared.events.lock() = None;
        *self.shared.frame.lock() = None;
    }
}

impl Drop for GstPlayer {
    fn drop(&mut self) {
        self.release();
    }
}

// -------------------------------------------------------------------------
// Bus thread
// -------------------------------------------------------------------------

fn watch_bus(bus: &gst::Bus, playbin: &gst::Element, aspect: &gst::Element, shared: &Shared) {
    let mut last_report = Instant::now();

    while shared.running.load(Ordering::Acquire) {
        if let Some(message) = bus.timed_pop(gst::ClockTime::from_mseconds(TICK.as_millis() as u64)) {
            on_message(&message, playbin, aspect, shared);
        }

        if last_report.elapsed() >= TICK {
            last_report = Instant::now();
            if shared.status.lock().state == PlaybackState::Playing {
                report_time(playbin, shared);
            }
        }
    }
}

fn on_message(message: &gst::Message, playbin: &gst::Element, aspect: &gst::Element, shared: &Shared) {
    use gst::MessageView;

    match message.view() {
        MessageView::Eos(_) => {
            shared.status.lock().state = PlaybackState::Ended;
            shared.emit(EngineEvent::EndReached);
        }
        MessageView::Error(err) => {
            let detail = err.error().to_string();
            tracing::warn!(error = %detail, debug = ?err.debug(), "pipeline error");
            {
                let mut status = shared.status.lock();
                status.state = PlaybackState::Error;
                status.last_error = Some(detail);
            }
            shared.emit(EngineEvent::EncounteredError);
        }
        MessageView::StateChanged(change)
            if message.src() == Some(playbin.upcast_ref::<gst::Object>()) =>
        {
            on_state_change(change.old(), change.current(), shared);
        }
        MessageView::Buffering(buffering) if buffering.percent() < 100 => {
            shared.emit(EngineEvent::Buffering(buffering.percent() as f32));
        }
        MessageView::DurationChanged(_) => refresh_length(playbin, shared),
        MessageView::AsyncDone(_) => {
            refresh_length(playbin, shared);
            settle_pending(playbin, aspect, shared);
        }
        _ => {}
    }
}

fn on_state_change(old: gst::State, current: gst::State, shared: &Shared) {
    let mut status = shared.status.lock();
    let event = match (old, current) {
        (_, gst::State::Playing) if status.state != PlaybackState::Stopped => {
            status.state = PlaybackState::Playing;
            EngineEvent::Playing
        }
        (gst::State::Playing, gst::State::Paused)
            if matches!(status.state, PlaybackState::Playing | PlaybackState::Buffering) =>
        {
            status.state = PlaybackState::Paused;
            EngineEvent::Paused
        }
        _ => return,
    };
    drop(status);
    shared.emit(event);
}

fn refresh_length(playbin: &gst::Element, shared: &Shared) {
    let length = playbin
        .query_duration::<gst::ClockTime>()
        .map_or(0, clock_ms);

    let mut query = gst::query::Seeking::new(gst::Format::Time);
    let seekable = playbin.query(&mut query) && query.result().0;

    let changed = {
        let mut status = shared.status.lock();
        status.seekable = seekable;
        let changed = status.length_ms != length;
        status.length_ms = length;
        changed
    };
    if changed && length > 0 {
        shared.emit(EngineEvent::LengthChanged(length));
    }
}

/// Apply what had to wait for a prerolled pipeline.
fn settle_pending(playbin: &gst::Element, aspect: &gst::Element, shared: &Shared) {
    let (aspect_ratio, aspect_pending, rate, rate_pending) = {
        let status = shared.status.lock();
        (status.aspect, status.aspect_pending, status.rate, status.rate_pending)
    };

    if aspect_pending && apply_aspect(playbin, aspect, aspect_ratio) {
        shared.status.lock().aspect_pending = false;
    }
    if rate_pending && apply_rate(playbin, rate) {
        shared.status.lock().rate_pending = false;
    }
}

fn report_time(playbin: &gst::Element, shared: &Shared) {
    let Some(position) = playbin.query_position::<gst::ClockTime>() else {
        return;
    };
    let time_ms = clock_ms(position);
    let length_ms = shared.status.lock().length_ms;

    shared.emit(EngineEvent::TimeChanged(time_ms));
    if length_ms > 0 {
        let ratio = (time_ms as f64 / length_ms as f64).clamp(0.0, 1.0) as f32;
        shared.emit(EngineEvent::PositionChanged(ratio));
    }
}

// -------------------------------------------------------------------------
// Pipeline helpers
// -------------------------------------------------------------------------

fn natural_caps() -> gst::Caps {
    gst::Caps::builder("video/x-raw")
        .field("pixel-aspect-ratio", gst::Fraction::new(1, 1))
        .build()
}

/// Point the capsfilter at the override (or back at the stream's shape).
/// `false` while the stream's size is still unknown.
fn apply_aspect(playbin: &gst::Element, aspect: &gst::Element, ratio: Option<(u32, u32)>) -> bool {
    let caps = match ratio {
        None => natural_caps(),
        Some(ratio) => {
            let Some(height) = stream_height(playbin) else {
                return false;
            };
            let (width, height) = override_size(height, ratio);
            gst::Caps::builder("video/x-raw")
                .field("width", i32::try_from(width).unwrap_or(i32::MAX))
                .field("height", i32::try_from(height).unwrap_or(i32::MAX))
                .field("pixel-aspect-ratio", gst::Fraction::new(1, 1))
                .build()
        }
    };
    aspect.set_property("caps", caps);
    true
}

fn stream_height(playbin: &gst::Element) -> Option<u32> {
    let pad = playbin.emit_by_name::<Option<gst::Pad>>("get-video-pad", &[&0i32])?;
    let caps = pad.current_caps()?;
    let info = gst_video::VideoInfo::from_caps(&caps).ok()?;
    Some(info.height())
}

fn apply_rate(playbin: &gst::Element, rate: f32) -> bool {
    let Some(position) = playbin.query_position::<gst::ClockTime>() else {
        return false;
    };
    match playbin.seek(
        f64::from(rate),
        gst::SeekFlags::FLUSH | gst::SeekFlags::ACCURATE,
        gst::SeekType::Set,
        position,
        gst::SeekType::End,
        gst::ClockTime::ZERO,
    ) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, rate, "rate change failed");
            false
        }
    }
}

fn store_sample(sample: &gst::Sample, shared: &Shared) -> Result<gst::FlowSuccess, gst::FlowError> {
    let caps = sample.caps().ok_or(gst::FlowError::NotNegotiated)?;
    let info = gst_video::VideoInfo::from_caps(caps).map_err(|_| gst::FlowError::NotNegotiated)?;
    let buffer = sample.buffer().ok_or(gst::FlowError::Error)?;
    let map = buffer.map_readable().map_err(|_| gst::FlowError::Error)?;

    let stride = info
        .stride()
        .first()
        .and_then(|s| usize::try_from(*s).ok())
        .ok_or(gst::FlowError::NotNegotiated)?;
    let pixels = pack_rows(map.as_slice(), stride, info.width(), info.height())
        .ok_or(gst::FlowError::Error)?;

    let serial = shared.serial.fetch_add(1, Ordering::Relaxed);
    *shared.frame.lock() = Some(VideoFrame {
        serial,
        width: info.width(),
        height: info.height(),
        pixels: Arc::new(pixels),
    });
    Ok(gst::FlowSuccess::Ok)
}

fn backend_err(e: impl std::fmt::Display) -> EngineError {
    EngineError::Backend(e.to_string())
}

fn clock_ms(time: gst::ClockTime) -> i64 {
    i64::try_from(time.mseconds()).unwrap_or(i64::MAX)
}

// -------------------------------------------------------------------------
// Pure helpers
// -------------------------------------------------------------------------

/// `"16:9"` -> `(16, 9)`.
fn parse_ratio(ratio: &str) -> Option<(u32, u32)> {
    let (num, den) = ratio.split_once(':')?;
    let num: u32 = num.trim().parse().ok()?;
    let den: u32 = den.trim().parse().ok()?;
    (num > 0 && den > 0).then_some((num, den))
}

/// Keep the height, stretch the width to `num:den` (even, for the scaler).
fn override_size(height: u32, (num, den): (u32, u32)) -> (u32, u32) {
    let width = (u64::from(height) * u64::from(num) + u64::from(den) / 2) / u64::from(den);
    let width = u32::try_from(width).unwrap_or(u32::MAX) & !1;
    (width.max(2), height)
}

/// Copy `height` rows of `width` RGBA pixels out of a strided buffer.
fn pack_rows(data: &[u8], stride: usize, width: u32, height: u32) -> Option<Vec<u8>> {
    let row = usize::try_from(width).ok()?.checked_mul(4)?;
    let rows = usize::try_from(height).ok()?;
    if stride < row {
        return None;
    }

    let mut pixels = Vec::with_capacity(row * rows);
    for y in 0..rows {
        let start = y * stride;
        pixels.extend_from_slice(data.get(start..start + row)?);
    }
    Some(pixels)
}

fn describe_track(title: Option<&str>, language: Option<&str>) -> String {
    match (title, language) {
        (Some(title), Some(language)) => format!("{title} [{language}]"),
        (Some(title), None) => title.to_string(),
        (None, Some(language)) => language.to_string(),
        (None, None) => String::new(),
    }
}

fn write_png(frame: &VideoFrame, path: &Path) -> Result<(), EngineError> {
    let image = image::RgbaImage::from_raw(frame.width, frame.height, frame.pixels.to_vec())
        .ok_or_else(|| EngineError::Backend("frame size does not match its pixels".into()))?;
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(width: u32, height: u32, pixel: [u8; 4]) -> VideoFrame {
        let pixels = pixel.repeat((width * height) as usize);
        VideoFrame {
            serial: 0,
            width,
            height,
            pixels: Arc::new(pixels),
        }
    }

    #[test]
    fn ratios_parse_from_menu_strings() {
        assert_eq!(parse_ratio("16:9"), Some((16, 9)));
        assert_eq!(parse_ratio(" 4 : 3 "), Some((4, 3)));
        assert_eq!(parse_ratio("1:0"), None);
        assert_eq!(parse_ratio("wide"), None);
    }

    #[test]
    fn override_keeps_height_and_stretches_width() {
        assert_eq!(override_size(720, (16, 9)), (1280, 720));
        assert_eq!(override_size(720, (4, 3)), (960, 720));
        assert_eq!(override_size(480, (1, 1)), (480, 480));
        // Odd widths are rounded down to even.
        assert_eq!(override_size(101, (16, 9)), (178, 101));
    }

    #[test]
    fn strided_rows_are_packed() {
        // 2x2 picture, rows padded to 12 bytes.
        let mut data = Vec::new();
        data.extend_from_slice(&[1, 1, 1, 1, 2, 2, 2, 2, 0, 0, 0, 0]);
        data.extend_from_slice(&[3, 3, 3, 3, 4, 4, 4, 4, 0, 0, 0, 0]);

        let packed = pack_rows(&data, 12, 2, 2).unwrap();
        assert_eq!(packed, [1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4]);

        assert!(pack_rows(&data[..20], 12, 2, 2).is_none());
        assert!(pack_rows(&data, 4, 2, 2).is_none());
    }

    #[test]
    fn track_description_prefers_title_then_language() {
        assert_eq!(describe_track(Some("Commentary"), Some("en")), "Commentary [en]");
        assert_eq!(describe_track(None, Some("de")), "de");
        assert_eq!(describe_track(None, None), "");
    }

    #[test]
    fn snapshot_writes_the_frame_as_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");

        write_png(&frame(4, 3, [10, 20, 30, 255]), &path).unwrap();

        let written = image::open(&path).unwrap().to_rgba8();
        assert_eq!(written.dimensions(), (4, 3));
        assert_eq!(written.get_pixel(2, 1).0, [10, 20, 30, 255]);
    }

    #[test]
    fn mismatched_frame_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let mut bad = frame(4, 3, [0, 0, 0, 255]);
        bad.height = 5;
        let err = write_png(&bad, &dir.path().join("bad.png")).unwrap_err();
        assert!(matches!(err, EngineError::Backend(_)));
    }
}
