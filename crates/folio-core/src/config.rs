#![forbid(unsafe_code)]

//! Page configuration.
//!
//! [`PageConfig`] captures every tunable of the page controller. Defaults
//! match the values the portfolio page ships with, so
//! `PageConfig::default()` reproduces the page exactly.
//!
//! # Timing and geometry defaults
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `nav_lookahead_px` | 100 | Probe distance below the scroll offset for the active section |
//! | `navbar_threshold_px` | 50 | Scroll offset above which the navbar turns opaque (strict `>`) |
//! | `anchor_offset_px` | 70 | Fixed navbar height subtracted from anchor scroll targets |
//! | `scroll_quiet_period` | 10ms | Debounce window for scroll recomputation |
//! | `submit_delay` | 1500ms | Simulated submission latency |
//! | `press_feedback` | 150ms | External link press feedback duration |
//! | `reveal_threshold` | 0.1 | Visible fraction that reveals an observed card |
//!
//! # Environment Variables
//!
//! | Variable | Type | Description |
//! |----------|------|-------------|
//! | `FOLIO_SCROLL_DEBOUNCE_MS` | u64 | Scroll quiet period |
//! | `FOLIO_SUBMIT_DELAY_MS` | u64 | Simulated submission latency |
//! | `FOLIO_ANCHOR_OFFSET_PX` | f64 | Anchor scroll compensation |
//! | `FOLIO_NAV_LOOKAHEAD_PX` | f64 | Active section lookahead |
//!
//! # Loading
//!
//! With the `page-config` feature the config can be read from TOML or JSON:
//!
//! ```toml
//! nav_lookahead_px = 120.0
//! scroll_quiet_period_ms = 16
//!
//! [elements]
//! navbar = "site-nav"
//! ```

use core::time::Duration;

#[cfg(feature = "page-config")]
use std::path::Path;

#[cfg(feature = "page-config")]
use serde::{Deserialize, Serialize};

use crate::scroll::{DEFAULT_ANCHOR_OFFSET_PX, DEFAULT_LOOKAHEAD_PX, DEFAULT_NAVBAR_THRESHOLD_PX};

/// Default scroll debounce window.
pub const DEFAULT_SCROLL_QUIET_MS: u64 = 10;

/// Default simulated submission latency.
pub const DEFAULT_SUBMIT_DELAY_MS: u64 = 1500;

/// Default external link press feedback duration.
pub const DEFAULT_PRESS_FEEDBACK_MS: u64 = 150;

/// Default reveal intersection threshold.
pub const DEFAULT_REVEAL_THRESHOLD: f64 = 0.1;

/// Default bottom root margin of the reveal observer (shrinks the viewport).
pub const DEFAULT_REVEAL_BOTTOM_MARGIN_PX: f64 = 50.0;

/// Hosts the page pre-resolves at startup.
pub const DEFAULT_CONNECTION_HINTS: [&str; 2] = ["//drive.google.com", "//github.com"];

/// Element ids the controller recognises in click and pointer events.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "page-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "page-config", serde(default))]
pub struct PageElements {
    pub navbar: String,
    pub nav_toggle: String,
    pub nav_menu: String,
    pub modal: String,
    pub modal_close: String,
}

impl Default for PageElements {
    fn default() -> Self {
        Self {
            navbar: "navbar".into(),
            nav_toggle: "nav-toggle".into(),
            nav_menu: "nav-menu".into(),
            modal: "success-modal".into(),
            modal_close: "modal-close".into(),
        }
    }
}

/// Every tunable of the page controller.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "page-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "page-config", serde(default))]
pub struct PageConfig {
    pub nav_lookahead_px: f64,
    pub navbar_threshold_px: f64,
    pub anchor_offset_px: f64,
    #[cfg_attr(feature = "page-config", serde(with = "millis", rename = "scroll_quiet_period_ms"))]
    pub scroll_quiet_period: Duration,
    #[cfg_attr(feature = "page-config", serde(with = "millis", rename = "submit_delay_ms"))]
    pub submit_delay: Duration,
    #[cfg_attr(feature = "page-config", serde(with = "millis", rename = "press_feedback_ms"))]
    pub press_feedback: Duration,
    pub reveal_threshold: f64,
    pub reveal_bottom_margin_px: f64,
    /// Submit button label while a submission is pending.
    pub sending_label: String,
    /// Submit button label at rest.
    pub submit_label: String,
    pub connection_hints: Vec<String>,
    pub elements: PageElements,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            nav_lookahead_px: DEFAULT_LOOKAHEAD_PX,
            navbar_threshold_px: DEFAULT_NAVBAR_THRESHOLD_PX,
            anchor_offset_px: DEFAULT_ANCHOR_OFFSET_PX,
            scroll_quiet_period: Duration::from_millis(DEFAULT_SCROLL_QUIET_MS),
            submit_delay: Duration::from_millis(DEFAULT_SUBMIT_DELAY_MS),
            press_feedback: Duration::from_millis(DEFAULT_PRESS_FEEDBACK_MS),
            reveal_threshold: DEFAULT_REVEAL_THRESHOLD,
            reveal_bottom_margin_px: DEFAULT_REVEAL_BOTTOM_MARGIN_PX,
            sending_label: "Sending...".into(),
            submit_label: "Send Message".into(),
            connection_hints: DEFAULT_CONNECTION_HINTS.iter().map(|h| (*h).to_owned()).collect(),
            elements: PageElements::default(),
        }
    }
}

impl PageConfig {
    #[must_use]
    pub fn with_scroll_quiet_period(mut self, period: Duration) -> Self {
        self.scroll_quiet_period = period;
        self
    }

    #[must_use]
    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = delay;
        self
    }

    #[must_use]
    pub fn with_anchor_offset(mut self, px: f64) -> Self {
        self.anchor_offset_px = px;
        self
    }

    #[must_use]
    pub fn with_nav_lookahead(mut self, px: f64) -> Self {
        self.nav_lookahead_px = px;
        self
    }

    #[must_use]
    pub fn with_elements(mut self, elements: PageElements) -> Self {
        self.elements = elements;
        self
    }

    /// Defaults overridden by `FOLIO_*` environment variables.
    ///
    /// Unparseable values are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `FOLIO_*` key.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(ms) = lookup("FOLIO_SCROLL_DEBOUNCE_MS").and_then(|v| v.trim().parse::<u64>().ok()) {
            config.scroll_quiet_period = Duration::from_millis(ms);
        }

        if let Some(ms) = lookup("FOLIO_SUBMIT_DELAY_MS").and_then(|v| v.trim().parse::<u64>().ok()) {
            config.submit_delay = Duration::from_millis(ms);
        }

        if let Some(px) = lookup("FOLIO_ANCHOR_OFFSET_PX").and_then(|v| v.trim().parse::<f64>().ok())
            && px.is_finite()
        {
            config.anchor_offset_px = px;
        }

        if let Some(px) = lookup("FOLIO_NAV_LOOKAHEAD_PX").and_then(|v| v.trim().parse::<f64>().ok())
            && px.is_finite()
        {
            config.nav_lookahead_px = px;
        }

        config
    }

    /// Check every parameter; an empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (name, value) in [
            ("nav_lookahead_px", self.nav_lookahead_px),
            ("navbar_threshold_px", self.navbar_threshold_px),
            ("anchor_offset_px", self.anchor_offset_px),
            ("reveal_bottom_margin_px", self.reveal_bottom_margin_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("{name} must be a finite value >= 0, got {value}"));
            }
        }

        if !(self.reveal_threshold > 0.0 && self.reveal_threshold <= 1.0) {
            errors.push(format!(
                "reveal_threshold must be in (0, 1], got {}",
                self.reveal_threshold
            ));
        }

        if self.submit_delay.is_zero() {
            errors.push("submit_delay must be > 0".into());
        }

        let elements = &self.elements;
        for (name, id) in [
            ("elements.navbar", &elements.navbar),
            ("elements.nav_toggle", &elements.nav_toggle),
            ("elements.nav_menu", &elements.nav_menu),
            ("elements.modal", &elements.modal),
            ("elements.modal_close", &elements.modal_close),
        ] {
            if id.trim().is_empty() {
                errors.push(format!("{name} must not be empty"));
            }
        }

        errors
    }

    /// Run [`validate`](Self::validate) and turn failures into an error.
    pub fn validated(self) -> Result<Self, PageConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(PageConfigError::Validation(errors))
        }
    }

    /// Load from a TOML string.
    #[cfg(feature = "page-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, PageConfigError> {
        let config: Self = toml::from_str(s).map_err(PageConfigError::Toml)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "page-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, PageConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PageConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "page-config")]
    pub fn from_json_str(s: &str) -> Result<Self, PageConfigError> {
        let config: Self = serde_json::from_str(s).map_err(PageConfigError::Json)?;
        config.validated()
    }
}

/// Errors that can occur when loading a page configuration.
#[derive(Debug)]
pub enum PageConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "page-config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "page-config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for PageConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "page-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "page-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for PageConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "page-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "page-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(feature = "page-config")]
mod millis {
    use core::time::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
