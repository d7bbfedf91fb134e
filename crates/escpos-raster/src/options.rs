//! Pipeline configuration options.
//!
//! Orientation flags here are explicit per-job settings; nothing in the
//! pipeline keeps printer state between jobs.

use crate::{DEFAULT_PRINT_WIDTH, DEFAULT_THRESHOLD, DitherMode, PrinterProfile};

/// Options controlling how a source image becomes a bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    /// Target width in dots. `None` keeps the source width.
    pub width: Option<u32>,

    /// Samples at or below this value print a dot.
    pub threshold: u8,

    pub dither: DitherMode,

    /// Derive height from the aspect ratio. When false, `height` is used.
    pub preserve_aspect: bool,

    /// Explicit height used when `preserve_aspect` is false.
    pub height: Option<u32>,

    /// Allow scaling images that are narrower than `width` up to it.
    pub allow_upscale: bool,

    /// Rotate landscape images to portrait before resizing.
    pub auto_rotate: bool,

    /// Rotate 180 degrees (for upside-down mounted printers).
    pub rotate_180: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            width: Some(DEFAULT_PRINT_WIDTH),
            threshold: DEFAULT_THRESHOLD,
            dither: DitherMode::Threshold,
            preserve_aspect: true,
            height: None,
            allow_upscale: false,
            auto_rotate: false,
            rotate_180: false,
        }
    }
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options sized for `profile`: full line width and its threshold.
    pub fn for_profile(profile: &PrinterProfile) -> Self {
        Self {
            width: Some(profile.dots_per_line),
            threshold: profile.image_threshold,
            ..Self::default()
        }
    }

    /// Builder: set target width (`None` keeps source width).
    pub fn with_width(mut self, val: Option<u32>) -> Self {
        self.width = val;
        self
    }

    /// Builder: set threshold.
    pub fn with_threshold(mut self, val: u8) -> Self {
        self.threshold = val;
        self
    }

    /// Builder: set dither mode.
    pub fn with_dither(mut self, val: DitherMode) -> Self {
        self.dither = val;
        self
    }

    /// Builder: use an explicit output height instead of the aspect ratio.
    pub fn with_exact_height(mut self, val: u32) -> Self {
        self.preserve_aspect = false;
        self.height = Some(val);
        self
    }

    /// Builder: set upscale flag.
    pub fn with_allow_upscale(mut self, val: bool) -> Self {
        self.allow_upscale = val;
        self
    }

    /// Builder: set auto-rotate flag.
    pub fn with_auto_rotate(mut self, val: bool) -> Self {
        self.auto_rotate = val;
        self
    }

    /// Builder: set 180 degree rotation flag.
    pub fn with_rotate_180(mut self, val: bool) -> Self {
        self.rotate_180 = val;
        self
    }
}
