//! View constants (layout/sizing).

pub(crate) const MENU_TEXT: f32 = 13.0;
pub(crate) const MENU_DROPDOWN_W: f32 = 230.0;

pub(crate) const CONTROLS_TEXT: f32 = 12.0;
pub(crate) const TIME_LABEL_W: f32 = 52.0;
pub(crate) const RATE_SLIDER_W: f32 = 110.0;
pub(crate) const VOLUME_SLIDER_W: f32 = 120.0;

pub(crate) const SUBTITLE_TEXT: f32 = 22.0;
pub(crate) const SUBTITLE_PAD: f32 = 24.0;

// playlist panel
pub(crate) const PLAYLIST_W: f32 = 280.0;
pub(crate) const ROW_TEXT: f32 = 14.0;
pub(crate) const ROW_H: f32 = 26.0;
pub(crate) const ROW_VPAD: f32 = 2.0;
pub(crate) const ROW_HPAD: f32 = 8.0;
pub(crate) const LIST_SPACING: f32 = 1.0;
