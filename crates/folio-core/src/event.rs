#![forbid(unsafe_code)]

//! Canonical host signals.
//!
//! The embedding page (JS) translates DOM events into [`HostEvent`] values
//! and pushes them into the controller. Element identity is carried as
//! [`ElementId`] strings; containment ("is this click inside the navbar?")
//! is answered from the ancestor path the host attaches to each click.
//!
//! # Design Notes
//!
//! - Scroll offsets and geometry are CSS pixels as `f64`, as the DOM reports.
//! - `KeyEventKind` defaults to `Press`.
//! - `Modifiers` use bitflags for easy combination.

use bitflags::bitflags;
use core::fmt;

use crate::form::{FormField, FormFieldValue};
use crate::scroll::Section;

/// Identity of a page element (its DOM id, or a host-assigned key).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub String);

impl ElementId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Canonical input signal from the host page.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// The window scrolled to vertical offset `y`.
    Scroll { y: f64 },

    /// Section geometry was (re)measured.
    Layout(Vec<Section>),

    /// The system colour-scheme preference changed.
    ThemeChange { prefers_dark: bool },

    /// A pointer click.
    Click(ClickEvent),

    /// A keyboard event.
    Key(KeyEvent),

    /// The contact form was submitted with these raw values.
    Submit(FormFieldValue),

    /// A form control gained focus.
    FieldFocus { field: FormField },

    /// A form control lost focus with its current value.
    FieldBlur { field: FormField, value: String },

    /// Pointer press/release/leave over an element.
    Pointer(PointerEvent),

    /// An observed element's viewport intersection changed.
    Intersection(IntersectionEntry),
}

/// A click with its target and the target's ancestors (nearest first).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClickEvent {
    /// The element the click landed on.
    pub target: ElementId,

    /// Ancestors of `target`, nearest first.
    pub ancestors: Vec<ElementId>,

    /// `href` of the clicked anchor, if the click landed on (or in) a link.
    pub href: Option<String>,

    /// Whether the anchor opens in a new browsing context (`target="_blank"`).
    pub opens_new_tab: bool,
}

impl ClickEvent {
    /// A click on `target` with no ancestors.
    #[must_use]
    pub fn on(target: impl Into<ElementId>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    /// Attach the ancestor path (nearest first).
    #[must_use]
    pub fn within<I, E>(mut self, ancestors: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<ElementId>,
    {
        self.ancestors = ancestors.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    #[must_use]
    pub const fn new_tab(mut self) -> Self {
        self.opens_new_tab = true;
        self
    }

    /// Whether the click target is `id` itself (not a descendant).
    #[must_use]
    pub fn targets(&self, id: &ElementId) -> bool {
        &self.target == id
    }

    /// Whether `id` is the target or one of its ancestors.
    #[must_use]
    pub fn is_within(&self, id: &ElementId) -> bool {
        self.targets(id) || self.ancestors.iter().any(|a| a == id)
    }

    /// In-page anchor fragment of `href` (`"#about"` → `"about"`).
    #[must_use]
    pub fn anchor(&self) -> Option<&str> {
        self.href
            .as_deref()
            .and_then(|href| href.strip_prefix('#'))
            .filter(|id| !id.is_empty())
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with default modifiers and Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether this is the cancellation key being pressed.
    #[must_use]
    pub fn is_cancel(&self) -> bool {
        self.code == KeyCode::Escape && self.kind != KeyEventKind::Release
    }
}

/// Key codes the page reacts to; everything else is `Char` or `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),
    Enter,
    Escape,
    Tab,
    /// Any other named key.
    Other,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,

    /// Key is being held (repeat event).
    Repeat,

    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const NONE  = 0b0000;
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// Pointer press state change over an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub target: ElementId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Down,
    Up,
    Leave,
}

/// Viewport intersection report for one observed element.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub is_intersecting: bool,
    /// Visible fraction of the element, `0.0..=1.0`.
    pub ratio: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_containment_uses_ancestor_path() {
        let navbar = ElementId::new("navbar");
        let click = ClickEvent::on("nav-link-about").within(["nav-menu", "navbar", "body"]);
        assert!(click.is_within(&navbar));
        assert!(!click.targets(&navbar));
        assert!(!ClickEvent::on("hero").within(["main"]).is_within(&navbar));
    }

    #[test]
    fn target_is_within_itself() {
        let modal = ElementId::new("success-modal");
        let click = ClickEvent::on("success-modal");
        assert!(click.targets(&modal));
        assert!(click.is_within(&modal));
    }

    #[test]
    fn anchor_strips_fragment_marker() {
        assert_eq!(ClickEvent::on("a").with_href("#about").anchor(), Some("about"));
        assert_eq!(ClickEvent::on("a").with_href("#").anchor(), None);
        assert_eq!(
            ClickEvent::on("a").with_href("https://github.com").anchor(),
            None
        );
        assert_eq!(ClickEvent::on("a").anchor(), None);
    }

    #[test]
    fn escape_release_is_not_cancel() {
        assert!(KeyEvent::new(KeyCode::Escape).is_cancel());
        assert!(
            KeyEvent::new(KeyCode::Escape)
                .with_kind(KeyEventKind::Repeat)
                .is_cancel()
        );
        assert!(
            !KeyEvent::new(KeyCode::Escape)
                .with_kind(KeyEventKind::Release)
                .is_cancel()
        );
        assert!(!KeyEvent::new(KeyCode::Enter).is_cancel());
    }

    #[test]
    fn modifiers_default_empty() {
        let key = KeyEvent::new(KeyCode::Char('k')).with_modifiers(Modifiers::CTRL | Modifiers::SHIFT);
        assert!(key.modifiers.contains(Modifiers::CTRL));
        assert_eq!(Modifiers::default(), Modifiers::NONE);
    }
}
