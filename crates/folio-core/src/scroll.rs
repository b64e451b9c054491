#![forbid(unsafe_code)]

//! Scroll-driven navigation state.
//!
//! Two pure functions derive everything the navigation bar shows from the
//! current vertical scroll offset:
//!
//! - [`compute_active_section`] picks the section aligned with the viewport,
//!   looking [`DEFAULT_LOOKAHEAD_PX`] below the scroll offset to compensate
//!   for the fixed navbar overlay.
//! - [`compute_navbar_visual_state`] picks the background tier, blur radius
//!   and colour variant.
//!
//! [`ScrollNavigationTracker`] bundles the section set with the latest
//! [`ScrollState`] so the controller can recompute both in one call.
//!
//! # Example
//!
//! ```
//! use folio_core::scroll::{compute_active_section, compute_navbar_visual_state, OpacityTier, Section};
//!
//! let sections = [Section::new("home", 0.0, 600.0), Section::new("about", 600.0, 800.0)];
//! assert_eq!(compute_active_section(450.0, &sections), Some("home"));
//! assert_eq!(compute_active_section(500.0, &sections), Some("about"));
//!
//! assert_eq!(compute_navbar_visual_state(50.0, false).tier, OpacityTier::Low);
//! assert_eq!(compute_navbar_visual_state(51.0, false).tier, OpacityTier::High);
//! ```

use core::fmt;

/// Distance below the scroll offset used to probe for the active section.
pub const DEFAULT_LOOKAHEAD_PX: f64 = 100.0;

/// Scroll offset above which the navbar switches to the high-opacity tier.
pub const DEFAULT_NAVBAR_THRESHOLD_PX: f64 = 50.0;

/// Backdrop blur in the low tier.
pub const BLUR_LOW_PX: u32 = 10;

/// Backdrop blur in the high tier.
pub const BLUR_HIGH_PX: u32 = 15;

/// Fixed navbar height compensated when scrolling to an anchor.
pub const DEFAULT_ANCHOR_OFFSET_PX: f64 = 70.0;

/// A page region with a vertical extent `[top, top + height)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl Section {
    #[must_use]
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    /// Whether `y` lies in `[top, top + height)`.
    #[must_use]
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

/// Latest scroll position and colour-scheme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    pub scroll_y: f64,
    pub prefers_dark: bool,
}

/// Navbar background opacity tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OpacityTier {
    #[default]
    Low,
    High,
}

/// Light/dark colour branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ThemeVariant {
    #[default]
    Light,
    Dark,
}

impl ThemeVariant {
    #[must_use]
    pub const fn from_dark(prefers_dark: bool) -> Self {
        if prefers_dark { Self::Dark } else { Self::Light }
    }

    /// Value for the document `data-color-scheme` attribute.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// An RGBA colour with a fractional alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Everything the navbar style depends on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NavbarVisualState {
    pub tier: OpacityTier,
    pub blur_px: u32,
    pub variant: ThemeVariant,
}

impl NavbarVisualState {
    /// Background colour for this tier and variant.
    #[must_use]
    pub const fn background(&self) -> Rgba {
        match (self.variant, self.tier) {
            (ThemeVariant::Light, OpacityTier::High) => Rgba::new(252, 252, 249, 0.98),
            (ThemeVariant::Light, OpacityTier::Low) => Rgba::new(255, 255, 255, 0.95),
            (ThemeVariant::Dark, OpacityTier::High) => Rgba::new(31, 33, 33, 0.98),
            (ThemeVariant::Dark, OpacityTier::Low) => Rgba::new(38, 40, 40, 0.95),
        }
    }

    /// CSS `backdrop-filter` value.
    #[must_use]
    pub fn backdrop_filter(&self) -> String {
        format!("blur({}px)", self.blur_px)
    }
}

/// Id of the first section (in iteration order) containing `scroll_y + 100`.
#[must_use]
pub fn compute_active_section(scroll_y: f64, sections: &[Section]) -> Option<&str> {
    active_section_with_lookahead(scroll_y, DEFAULT_LOOKAHEAD_PX, sections)
}

/// [`compute_active_section`] with an explicit lookahead.
///
/// Overlapping extents are not an error: the earliest matching section wins.
#[must_use]
pub fn active_section_with_lookahead(
    scroll_y: f64,
    lookahead: f64,
    sections: &[Section],
) -> Option<&str> {
    let effective_y = scroll_y + lookahead;
    sections
        .iter()
        .find(|section| section.contains(effective_y))
        .map(|section| section.id.as_str())
}

/// Navbar style for a scroll offset and colour preference.
#[must_use]
pub fn compute_navbar_visual_state(scroll_y: f64, prefers_dark: bool) -> NavbarVisualState {
    navbar_state_with_threshold(scroll_y, DEFAULT_NAVBAR_THRESHOLD_PX, prefers_dark)
}

/// [`compute_navbar_visual_state`] with an explicit threshold (strict `>`).
#[must_use]
pub fn navbar_state_with_threshold(
    scroll_y: f64,
    threshold: f64,
    prefers_dark: bool,
) -> NavbarVisualState {
    let (tier, blur_px) = if scroll_y > threshold {
        (OpacityTier::High, BLUR_HIGH_PX)
    } else {
        (OpacityTier::Low, BLUR_LOW_PX)
    };
    NavbarVisualState {
        tier,
        blur_px,
        variant: ThemeVariant::from_dark(prefers_dark),
    }
}

/// Scroll offset that brings `section` just below the fixed navbar.
#[must_use]
pub fn scroll_target(section: &Section, anchor_offset: f64) -> f64 {
    (section.top - anchor_offset).max(0.0)
}

/// Result of one tracker pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerOutput {
    pub active_section: Option<String>,
    pub navbar: NavbarVisualState,
}

/// Section set plus the latest [`ScrollState`].
#[derive(Debug, Clone)]
pub struct ScrollNavigationTracker {
    sections: Vec<Section>,
    state: ScrollState,
    lookahead: f64,
    threshold: f64,
}

impl Default for ScrollNavigationTracker {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ScrollNavigationTracker {
    /// Tracker with the default lookahead and threshold.
    #[must_use]
    pub fn new(sections: Vec<Section>) -> Self {
        Self {
            sections,
            state: ScrollState::default(),
            lookahead: DEFAULT_LOOKAHEAD_PX,
            threshold: DEFAULT_NAVBAR_THRESHOLD_PX,
        }
    }

    #[must_use]
    pub fn with_lookahead(mut self, lookahead: f64) -> Self {
        self.lookahead = lookahead;
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Replace section geometry (after a layout pass).
    pub fn set_sections(&mut self, sections: Vec<Section>) {
        self.sections = sections;
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Look up a section by id.
    #[must_use]
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Record a new scroll offset. Negative offsets (overscroll) clamp to 0.
    pub fn set_scroll_y(&mut self, scroll_y: f64) {
        self.state.scroll_y = scroll_y.max(0.0);
    }

    pub fn set_prefers_dark(&mut self, prefers_dark: bool) {
        self.state.prefers_dark = prefers_dark;
    }

    #[must_use]
    pub const fn state(&self) -> ScrollState {
        self.state
    }

    /// Active section for the current state.
    #[must_use]
    pub fn active_section(&self) -> Option<&str> {
        active_section_with_lookahead(self.state.scroll_y, self.lookahead, &self.sections)
    }

    /// Navbar style for the current state.
    #[must_use]
    pub fn navbar(&self) -> NavbarVisualState {
        navbar_state_with_threshold(self.state.scroll_y, self.threshold, self.state.prefers_dark)
    }

    /// Derive both outputs from the current state.
    #[must_use]
    pub fn recompute(&self) -> TrackerOutput {
        TrackerOutput {
            active_section: self.active_section().map(str::to_owned),
            navbar: self.navbar(),
        }
    }
}
