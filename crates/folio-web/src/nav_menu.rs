#![forbid(unsafe_code)]

//! Mobile navigation menu.
//!
//! The toggle control flips the menu. Following a nav link closes it, and so
//! does any click that lands outside the navbar while it is open.

use folio_core::event::{ClickEvent, ElementId};

/// What a click did to the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChange {
    Opened,
    Closed,
}

#[derive(Debug, Clone)]
pub struct MobileNav {
    navbar: ElementId,
    toggle: ElementId,
    menu: ElementId,
    open: bool,
}

impl MobileNav {
    #[must_use]
    pub fn new(
        navbar: impl Into<ElementId>,
        toggle: impl Into<ElementId>,
        menu: impl Into<ElementId>,
    ) -> Self {
        Self {
            navbar: navbar.into(),
            toggle: toggle.into(),
            menu: menu.into(),
            open: false,
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Whether `click` hit a link inside the nav menu.
    #[must_use]
    pub fn is_nav_link(&self, click: &ClickEvent) -> bool {
        click.href.is_some() && click.is_within(&self.menu)
    }

    /// Apply a click. Returns the resulting change, if any.
    pub fn on_click(&mut self, click: &ClickEvent) -> Option<MenuChange> {
        if click.is_within(&self.toggle) {
            self.open = !self.open;
            return Some(if self.open {
                MenuChange::Opened
            } else {
                MenuChange::Closed
            });
        }
        let outside = !click.is_within(&self.navbar);
        if self.open && (self.is_nav_link(click) || outside) {
            self.open = false;
            return Some(MenuChange::Closed);
        }
        None
    }
}
