#![forbid(unsafe_code)]

//! Reveal-on-scroll for observed page elements.
//!
//! Cards start hidden and fade in the first time enough of them enters the
//! (bottom-inset) viewport. Sections are observed too but never hidden, so
//! revealing them only reasserts their resting style. Nothing is ever hidden
//! again once revealed.

use std::collections::BTreeMap;

use folio_core::event::{ElementId, IntersectionEntry};

/// Options the host passes to its intersection observer.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    /// CSS root margin, e.g. `0px 0px -50px 0px`.
    pub root_margin: String,
}

impl ObserverOptions {
    /// Options with the viewport's bottom edge pulled up by `bottom_inset_px`.
    #[must_use]
    pub fn new(threshold: f64, bottom_inset_px: f64) -> Self {
        Self {
            threshold,
            root_margin: format!("0px 0px -{bottom_inset_px}px 0px"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevealState {
    Pending,
    Revealed,
}

#[derive(Debug, Clone)]
pub struct RevealTracker {
    threshold: f64,
    observed: BTreeMap<ElementId, RevealState>,
}

impl RevealTracker {
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            observed: BTreeMap::new(),
        }
    }

    /// Observe an element that starts hidden. Returns `false` if already observed.
    pub fn observe_hidden(&mut self, target: ElementId) -> bool {
        if self.observed.contains_key(&target) {
            return false;
        }
        self.observed.insert(target, RevealState::Pending);
        true
    }

    /// Observe an element that starts visible.
    pub fn observe_visible(&mut self, target: ElementId) {
        self.observed.entry(target).or_insert(RevealState::Pending);
    }

    #[must_use]
    pub fn state(&self, target: &ElementId) -> Option<RevealState> {
        self.observed.get(target).copied()
    }

    /// Number of observed elements still waiting to be revealed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.observed
            .values()
            .filter(|s| **s == RevealState::Pending)
            .count()
    }

    /// Apply an intersection report. Returns `true` when it reveals the target.
    pub fn on_intersection(&mut self, entry: &IntersectionEntry) -> bool {
        if !entry.is_intersecting || entry.ratio < self.threshold {
            return false;
        }
        match self.observed.get_mut(&entry.target) {
            Some(state) if *state == RevealState::Pending => {
                *state = RevealState::Revealed;
                true
            }
            _ => false,
        }
    }
}
