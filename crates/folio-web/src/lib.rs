#![forbid(unsafe_code)]

//! `folio-web` drives the portfolio page from a JS host.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding page pushes DOM signals as
//!   [`HostEvent`] values and applies the [`DomEffect`]s it gets back.
//! - **Deterministic time**: the host advances a monotonic clock explicitly;
//!   debounce windows and the simulated submission latency are measured on it.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! This crate does not bind to `wasm-bindgen`. A thin JS shim forwards
//! events, calls [`controller::PageController::step`], and arms a single
//! platform timer at [`controller::PageController::next_deadline`].

pub mod controller;
pub mod effects;
pub mod form_ui;
#[cfg(feature = "input-parser")]
pub mod input_parser;
pub mod modal;
pub mod nav_menu;
pub mod reveal;
pub mod session_record;
pub mod submission;

use core::time::Duration;
use std::collections::VecDeque;

pub use controller::{PageController, PageManifest, PageSnapshot, StepResult};
pub use effects::{DomEffect, WebOutputs};
pub use folio_core::event::HostEvent;

/// Web controller error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebError {
    /// `mount` was called on an already mounted controller.
    AlreadyMounted,
    /// The supplied configuration failed validation.
    InvalidConfig(Vec<String>),
}

impl core::fmt::Display for WebError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AlreadyMounted => write!(f, "page controller already mounted"),
            Self::InvalidConfig(errors) => write!(f, "invalid page config: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for WebError {}

/// Monotonic clock abstraction.
///
/// The controller never calls `Instant::now()`; all time flows through this trait.
pub trait HostClock {
    /// Elapsed time since an unspecified epoch, monotonically increasing.
    fn now_mono(&self) -> Duration;
}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time. Earlier values are ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl HostClock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now
    }
}

/// Host-driven FIFO of page signals.
#[derive(Debug, Clone, Default)]
pub struct WebEventSource {
    queue: VecDeque<HostEvent>,
}

impl WebEventSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a signal into the queue.
    pub fn push_event(&mut self, event: HostEvent) {
        self.queue.push_back(event);
    }

    /// Number of signals waiting.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drain all pending signals in delivery order.
    pub fn drain_events(&mut self) -> impl Iterator<Item = HostEvent> + '_ {
        self.queue.drain(..)
    }
}
