#![forbid(unsafe_code)]

//! Confirmation modal lifecycle.
//!
//! The modal is `Hidden` until a submission completes. It opens only with a
//! [`SubmissionReceipt`], so nothing but the simulator can show it. While
//! visible, background page scrolling is locked.

use folio_core::event::{ClickEvent, ElementId, KeyEvent};

use crate::submission::SubmissionReceipt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ModalState {
    #[default]
    Hidden,
    Visible,
}

/// What closed the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    CloseButton,
    Backdrop,
    CancelKey,
}

/// Modal visibility plus the scroll lock it implies.
#[derive(Debug, Clone)]
pub struct Modal {
    backdrop: ElementId,
    close_button: ElementId,
    state: ModalState,
}

impl Modal {
    /// A hidden modal whose backdrop element is `backdrop`.
    #[must_use]
    pub fn new(backdrop: impl Into<ElementId>, close_button: impl Into<ElementId>) -> Self {
        Self {
            backdrop: backdrop.into(),
            close_button: close_button.into(),
            state: ModalState::Hidden,
        }
    }

    #[must_use]
    pub const fn state(&self) -> ModalState {
        self.state
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        matches!(self.state, ModalState::Visible)
    }

    /// Page scrolling is locked exactly while the modal is visible.
    #[must_use]
    pub const fn scroll_locked(&self) -> bool {
        self.is_visible()
    }

    /// Show the modal for a completed submission. Returns whether it opened.
    pub fn open(&mut self, _receipt: &SubmissionReceipt) -> bool {
        if self.is_visible() {
            return false;
        }
        self.state = ModalState::Visible;
        true
    }

    /// Close on a click: the close control, or the backdrop itself.
    ///
    /// Clicks on the modal content (descendants of the backdrop) are ignored.
    pub fn on_click(&mut self, click: &ClickEvent) -> Option<CloseReason> {
        if !self.is_visible() {
            return None;
        }
        let reason = if click.is_within(&self.close_button) {
            CloseReason::CloseButton
        } else if click.targets(&self.backdrop) {
            CloseReason::Backdrop
        } else {
            return None;
        };
        self.state = ModalState::Hidden;
        Some(reason)
    }

    /// Close on the cancellation key.
    pub fn on_key(&mut self, key: &KeyEvent) -> Option<CloseReason> {
        if self.is_visible() && key.is_cancel() {
            self.state = ModalState::Hidden;
            Some(CloseReason::CancelKey)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::SubmissionSimulator;
    use core::time::Duration;
    use folio_core::event::{KeyCode, KeyEventKind};
    use folio_core::form::FormFieldValue;

    fn receipt() -> SubmissionReceipt {
        let mut sim = SubmissionSimulator::new(Duration::from_millis(1));
        sim.submit(FormFieldValue::new("Ana", "a@b.co", "", "hi"), Duration::ZERO)
            .unwrap();
        sim.poll(Duration::from_millis(1)).unwrap()
    }

    fn visible_modal() -> Modal {
        let mut modal = Modal::new("success-modal", "modal-close");
        assert!(modal.open(&receipt()));
        modal
    }

    #[test]
    fn starts_hidden_and_unlocked() {
        let modal = Modal::new("success-modal", "modal-close");
        assert_eq!(modal.state(), ModalState::Hidden);
        assert!(!modal.scroll_locked());
    }

    #[test]
    fn open_locks_scroll_once() {
        let mut modal = visible_modal();
        assert!(modal.scroll_locked());
        assert!(!modal.open(&receipt()));
    }

    #[test]
    fn backdrop_click_closes_only_on_exact_target() {
        let mut modal = visible_modal();
        let content_click = ClickEvent::on("modal-body").within(["modal-content", "success-modal"]);
        assert_eq!(modal.on_click(&content_click), None);
        assert!(modal.is_visible());

        assert_eq!(
            modal.on_click(&ClickEvent::on("success-modal")),
            Some(CloseReason::Backdrop)
        );
        assert!(!modal.scroll_locked());
    }

    #[test]
    fn close_button_closes_even_via_its_icon() {
        let mut modal = visible_modal();
        let click = ClickEvent::on("close-icon").within(["modal-close", "modal-content", "success-modal"]);
        assert_eq!(modal.on_click(&click), Some(CloseReason::CloseButton));
    }

    #[test]
    fn escape_closes_only_when_visible() {
        let esc = KeyEvent::new(KeyCode::Escape);
        let mut hidden = Modal::new("success-modal", "modal-close");
        assert_eq!(hidden.on_key(&esc), None);

        let mut modal = visible_modal();
        assert_eq!(modal.on_key(&esc.with_kind(KeyEventKind::Release)), None);
        assert_eq!(modal.on_key(&KeyEvent::new(KeyCode::Enter)), None);
        assert_eq!(modal.on_key(&esc), Some(CloseReason::CancelKey));
        assert_eq!(modal.on_key(&esc), None);
        assert_eq!(modal.state(), ModalState::Hidden);
    }

    #[test]
    fn clicks_ignored_while_hidden() {
        let mut modal = Modal::new("success-modal", "modal-close");
        assert_eq!(modal.on_click(&ClickEvent::on("success-modal")), None);
        assert_eq!(modal.on_click(&ClickEvent::on("modal-close")), None);
    }
}
