#![forbid(unsafe_code)]

//! Core: pure interaction engines for the portfolio page.
//!
//! # Role in folio
//! `folio-core` holds every piece of page behaviour that can be stated as a
//! pure function or a small deterministic state machine. Nothing here touches
//! the DOM, a wall clock, or a thread; all time is passed in by the caller.
//!
//! # Primary responsibilities
//! - **scroll**: active-section tracking and navbar appearance.
//! - **debounce**: trailing-edge coalescing of high-frequency signals.
//! - **form**: contact form validation.
//! - **timer**: keyed one-shot deadlines.
//! - **event**: canonical host signals.
//! - **config**: page tunables, environment overrides, optional file loading.
//!
//! # How it fits in the system
//! `folio-web` owns the host-facing controller; it feeds [`event::HostEvent`]
//! values through these engines and turns their outputs into DOM effects.

pub mod config;
pub mod debounce;
pub mod event;
pub mod form;
pub mod scroll;
pub mod timer;

pub use config::{PageConfig, PageConfigError, PageElements};
pub use debounce::{DebouncedDispatcher, Debouncer};
pub use event::{ClickEvent, ElementId, HostEvent, KeyCode, KeyEvent};
pub use form::{ErrorField, FieldError, FormField, FormFieldValue, ValidationResult, validate};
pub use scroll::{
    NavbarVisualState, OpacityTier, ScrollNavigationTracker, ScrollState, Section, ThemeVariant,
    compute_active_section, compute_navbar_visual_state,
};
pub use timer::TimerQueue;
