#![forbid(unsafe_code)]

//! DOM effects emitted by the controller for the host to apply.
//!
//! The controller never touches the page; it appends [`DomEffect`] values to
//! [`WebOutputs`] and the host drains them after each step, applying them in
//! order.

use folio_core::event::ElementId;
use folio_core::form::{FieldError, FormField};
use folio_core::scroll::{NavbarVisualState, ThemeVariant};

/// One mutation the host should apply to the page.
#[derive(Debug, Clone, PartialEq)]
pub enum DomEffect {
    /// Register a `dns-prefetch` hint for `host`.
    ConnectionHint { host: String },

    /// Restyle the navbar (background colour and backdrop blur).
    NavbarStyle(NavbarVisualState),

    /// Mark the nav link for `section` active and clear all others.
    /// `None` clears every link.
    ActiveLink { section: Option<String> },

    /// Set the document `data-color-scheme` attribute.
    ColorScheme(ThemeVariant),

    /// Open or close the mobile navigation menu (and its toggle).
    MenuOpen(bool),

    /// Smooth-scroll the window to `top`.
    ScrollTo { top: f64 },

    /// Remove all inline error messages and field highlights.
    ClearFieldErrors,

    /// Show these inline errors and highlight their fields.
    ShowFieldErrors(Vec<FieldError>),

    /// Update the submit button.
    SubmitButton { enabled: bool, label: String },

    /// Reset every form control to its initial value.
    ResetForm,

    /// Show or hide the confirmation modal.
    ModalVisible(bool),

    /// Lock or restore page scrolling behind the modal.
    ScrollLock(bool),

    /// Update a field group's `focused` / `has-value` classes.
    FieldDecor {
        field: FormField,
        focused: bool,
        has_value: bool,
    },

    /// Put an observed card in its pre-reveal state (transparent, shifted down).
    RevealPending(ElementId),

    /// Fade an observed element in.
    Reveal(ElementId),

    /// Scale an element for press feedback; `None` restores it.
    PressScale { target: ElementId, scale: Option<f32> },
}

/// Captured effects for host consumption.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WebOutputs {
    /// Effects in application order.
    pub effects: Vec<DomEffect>,
}

impl WebOutputs {
    pub fn push(&mut self, effect: DomEffect) {
        self.effects.push(effect);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Whether any captured effect satisfies `pred`.
    pub fn any(&self, pred: impl Fn(&DomEffect) -> bool) -> bool {
        self.effects.iter().any(pred)
    }
}
