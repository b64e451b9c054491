#![forbid(unsafe_code)]

//! Page controller: the single owner of all interactive page state.
//!
//! The host pushes [`HostEvent`]s, advances the clock, and calls
//! [`PageController::step`]. Each step drains the event queue in delivery
//! order through one dispatch table, then fires every deadline that has come
//! due (the debounced navigation refresh, the submission completion, and
//! press-feedback resets), earliest first. Resulting DOM mutations accumulate
//! in [`WebOutputs`] until the host takes them.
//!
//! # Example
//!
//! ```
//! use core::time::Duration;
//! use folio_core::config::PageConfig;
//! use folio_core::event::HostEvent;
//! use folio_core::scroll::Section;
//! use folio_web::controller::{PageController, PageManifest};
//! use folio_web::effects::DomEffect;
//!
//! let mut page = PageController::new(PageConfig::default()).unwrap();
//! page.mount(PageManifest {
//!     sections: vec![Section::new("home", 0.0, 600.0), Section::new("about", 600.0, 800.0)],
//!     nav_links: vec!["home".into(), "about".into()],
//!     ..PageManifest::default()
//! })
//! .unwrap();
//! page.take_outputs();
//!
//! page.push_event(HostEvent::Scroll { y: 550.0 });
//! page.step();
//! assert!(page.outputs().is_empty());
//!
//! page.advance_time(Duration::from_millis(10));
//! page.step();
//! assert!(page.outputs().any(|e| *e == DomEffect::ActiveLink { section: Some("about".into()) }));
//! ```

use core::time::Duration;
use std::collections::BTreeSet;

use folio_core::config::PageConfig;
use folio_core::debounce::Debouncer;
use folio_core::event::{ClickEvent, ElementId, HostEvent, KeyEvent, PointerEvent, PointerKind};
use folio_core::form::{FormField, FormFieldValue, ValidationResult, validate};
use folio_core::scroll::{
    NavbarVisualState, ScrollNavigationTracker, Section, ThemeVariant, TrackerOutput,
    scroll_target,
};
use folio_core::timer::TimerQueue;
use tracing::{debug, info, warn};

use crate::effects::{DomEffect, WebOutputs};
use crate::form_ui::{FieldDecor, FormUi};
use crate::modal::{CloseReason, Modal, ModalState};
use crate::nav_menu::{MenuChange, MobileNav};
use crate::reveal::{ObserverOptions, RevealTracker};
use crate::submission::{SubmissionSimulator, SubmissionState};
use crate::{DeterministicClock, HostClock, WebError, WebEventSource};

/// Scale applied while a button is pressed.
pub const BUTTON_PRESS_SCALE: f32 = 0.98;

/// Scale applied briefly when an external link is followed.
pub const EXTERNAL_LINK_SCALE: f32 = 0.95;

/// Static description of the page, reported by the host once at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageManifest {
    /// Page sections in document order.
    pub sections: Vec<Section>,
    /// Ids of the sections that have a nav link.
    pub nav_links: Vec<String>,
    /// Cards that start hidden and reveal on scroll.
    pub cards: Vec<ElementId>,
    /// Form values present at load (autofill, restored state).
    pub initial_values: FormFieldValue,
    pub prefers_dark: bool,
    pub scroll_y: f64,
}

/// Outcome of one [`PageController::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepResult {
    /// Host events dispatched.
    pub events_processed: u32,
    /// Deadlines fired.
    pub timers_fired: u32,
}

/// Observable controller state, used for replay checksums and assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSnapshot {
    pub now: Duration,
    pub scroll_y: f64,
    pub navbar: Option<NavbarVisualState>,
    pub active_link: Option<String>,
    pub menu_open: bool,
    pub modal: ModalState,
    pub submission: SubmissionState,
    pub submit_enabled: bool,
    pub decor: Vec<(FormField, FieldDecor)>,
    pub reveals_pending: usize,
    pub scroll_refresh_pending: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerSource {
    ScrollRefresh,
    Submission,
    PressFeedback,
}

/// Host-driven page controller.
#[derive(Debug)]
pub struct PageController {
    config: PageConfig,
    clock: DeterministicClock,
    events: WebEventSource,
    outputs: WebOutputs,
    tracker: ScrollNavigationTracker,
    scroll_refresh: Debouncer,
    nav_links: BTreeSet<String>,
    active_link: Option<String>,
    navbar: Option<NavbarVisualState>,
    menu: MobileNav,
    modal: Modal,
    submission: SubmissionSimulator,
    form_ui: FormUi,
    reveal: RevealTracker,
    press_resets: TimerQueue<ElementId>,
    mounted: bool,
}

impl PageController {
    /// Create a controller. The configuration is validated first.
    pub fn new(config: PageConfig) -> Result<Self, WebError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(WebError::InvalidConfig(errors));
        }
        let elements = &config.elements;
        Ok(Self {
            tracker: ScrollNavigationTracker::default()
                .with_lookahead(config.nav_lookahead_px)
                .with_threshold(config.navbar_threshold_px),
            scroll_refresh: Debouncer::new(config.scroll_quiet_period),
            menu: MobileNav::new(
                elements.navbar.as_str(),
                elements.nav_toggle.as_str(),
                elements.nav_menu.as_str(),
            ),
            modal: Modal::new(elements.modal.as_str(), elements.modal_close.as_str()),
            submission: SubmissionSimulator::new(config.submit_delay),
            form_ui: FormUi::new(config.submit_label.clone(), config.sending_label.clone()),
            reveal: RevealTracker::new(config.reveal_threshold),
            clock: DeterministicClock::new(),
            events: WebEventSource::new(),
            outputs: WebOutputs::default(),
            nav_links: BTreeSet::new(),
            active_link: None,
            navbar: None,
            press_resets: TimerQueue::new(),
            mounted: false,
            config,
        })
    }

    /// Apply the initial page state.
    ///
    /// Emits the connection hints, the colour scheme, the initial navbar style
    /// and active link, hides the observed cards, and decorates prefilled
    /// fields. Fails if called twice.
    pub fn mount(&mut self, manifest: PageManifest) -> Result<(), WebError> {
        if self.mounted {
            return Err(WebError::AlreadyMounted);
        }
        self.mounted = true;

        for host in &self.config.connection_hints {
            self.outputs.push(DomEffect::ConnectionHint { host: host.clone() });
        }

        self.tracker.set_sections(manifest.sections);
        self.tracker.set_scroll_y(manifest.scroll_y);
        self.tracker.set_prefers_dark(manifest.prefers_dark);
        self.nav_links = manifest.nav_links.into_iter().collect();

        self.outputs
            .push(DomEffect::ColorScheme(ThemeVariant::from_dark(manifest.prefers_dark)));
        self.refresh_navigation();

        let section_ids: Vec<ElementId> = self
            .tracker
            .sections()
            .iter()
            .map(|s| ElementId::new(s.id.as_str()))
            .collect();
        for id in section_ids {
            self.reveal.observe_visible(id);
        }
        for card in manifest.cards {
            if self.reveal.observe_hidden(card.clone()) {
                self.outputs.push(DomEffect::RevealPending(card));
            }
        }

        for field in FormField::ALL {
            if let Some(decor) = self.form_ui.seed(field, manifest.initial_values.get(field)) {
                self.push_decor(field, decor);
            }
        }

        info!(
            target: "folio.controller",
            sections = self.tracker.sections().len(),
            nav_links = self.nav_links.len(),
            cards = self.reveal.pending(),
            "portfolio page ready"
        );
        Ok(())
    }

    #[must_use]
    pub const fn config(&self) -> &PageConfig {
        &self.config
    }

    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Queue a host signal for the next step.
    pub fn push_event(&mut self, event: HostEvent) {
        self.events.push_event(event);
    }

    /// Advance the clock by `dt`.
    pub fn advance_time(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    /// Move the clock to an absolute time. Earlier values are ignored.
    pub fn set_time(&mut self, now: Duration) {
        self.clock.set(now);
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now_mono()
    }

    /// Dispatch all queued events, then fire every due deadline.
    pub fn step(&mut self) -> StepResult {
        let span = tracing::debug_span!(
            "folio.step",
            events = self.events.pending(),
            timers = tracing::field::Empty
        );
        let _guard = span.enter();

        let mut result = StepResult::default();
        let pending: Vec<HostEvent> = self.events.drain_events().collect();
        for event in pending {
            self.dispatch(event);
            result.events_processed += 1;
        }
        result.timers_fired = self.fire_due();
        span.record("timers", result.timers_fired);
        result
    }

    /// Earliest pending deadline, for the host's single platform timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        [
            self.scroll_refresh.next_deadline(),
            self.submission.next_deadline(),
            self.press_resets.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Intersection observer options the host should use for reveals.
    #[must_use]
    pub fn reveal_observer_options(&self) -> ObserverOptions {
        ObserverOptions::new(self.config.reveal_threshold, self.config.reveal_bottom_margin_px)
    }

    #[must_use]
    pub const fn outputs(&self) -> &WebOutputs {
        &self.outputs
    }

    /// Take the accumulated effects, leaving the buffer empty.
    pub fn take_outputs(&mut self) -> WebOutputs {
        std::mem::take(&mut self.outputs)
    }

    #[must_use]
    pub const fn submission_state(&self) -> SubmissionState {
        self.submission.state()
    }

    #[must_use]
    pub const fn modal_state(&self) -> ModalState {
        self.modal.state()
    }

    #[must_use]
    pub const fn menu_open(&self) -> bool {
        self.menu.is_open()
    }

    /// Section whose nav link currently carries the active marker.
    #[must_use]
    pub fn active_link(&self) -> Option<&str> {
        self.active_link.as_deref()
    }

    /// Last navbar style applied.
    #[must_use]
    pub const fn navbar(&self) -> Option<NavbarVisualState> {
        self.navbar
    }

    #[must_use]
    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            now: self.now(),
            scroll_y: self.tracker.state().scroll_y,
            navbar: self.navbar,
            active_link: self.active_link.clone(),
            menu_open: self.menu.is_open(),
            modal: self.modal.state(),
            submission: self.submission.state(),
            submit_enabled: self.form_ui.button().enabled,
            decor: FormField::ALL
                .iter()
                .map(|f| (*f, self.form_ui.decor(*f)))
                .collect(),
            reveals_pending: self.reveal.pending(),
            scroll_refresh_pending: self.scroll_refresh.is_pending(),
        }
    }

    fn dispatch(&mut self, event: HostEvent) {
        let now = self.now();
        match event {
            HostEvent::Scroll { y } => {
                self.tracker.set_scroll_y(y);
                self.scroll_refresh.trigger(now);
            }
            HostEvent::Layout(sections) => {
                for section in &sections {
                    self.reveal.observe_visible(ElementId::new(section.id.as_str()));
                }
                self.tracker.set_sections(sections);
                self.scroll_refresh.trigger(now);
            }
            HostEvent::ThemeChange { prefers_dark } => {
                self.tracker.set_prefers_dark(prefers_dark);
                self.outputs
                    .push(DomEffect::ColorScheme(ThemeVariant::from_dark(prefers_dark)));
                let navbar = self.tracker.navbar();
                self.apply_navbar(navbar);
            }
            HostEvent::Click(click) => self.on_click(&click),
            HostEvent::Key(key) => self.on_key(&key),
            HostEvent::Submit(fields) => self.on_submit(fields),
            HostEvent::FieldFocus { field } => {
                self.acknowledge_success();
                if let Some(decor) = self.form_ui.focus(field) {
                    self.push_decor(field, decor);
                }
            }
            HostEvent::FieldBlur { field, value } => {
                if let Some(decor) = self.form_ui.blur(field, &value) {
                    self.push_decor(field, decor);
                }
            }
            HostEvent::Pointer(pointer) => self.on_pointer(pointer),
            HostEvent::Intersection(entry) => {
                if self.reveal.on_intersection(&entry) {
                    self.outputs.push(DomEffect::Reveal(entry.target));
                }
            }
        }
    }

    fn on_click(&mut self, click: &ClickEvent) {
        match self.menu.on_click(click) {
            Some(MenuChange::Opened) => self.outputs.push(DomEffect::MenuOpen(true)),
            Some(MenuChange::Closed) => self.outputs.push(DomEffect::MenuOpen(false)),
            None => {}
        }

        if self.menu.is_nav_link(click)
            && let Some(anchor) = click.anchor()
        {
            match self.tracker.section(anchor) {
                Some(section) => {
                    let top = scroll_target(section, self.config.anchor_offset_px);
                    self.outputs.push(DomEffect::ScrollTo { top });
                }
                None => debug!(target: "folio.controller", anchor, "nav link to unknown section"),
            }
        }

        if let Some(reason) = self.modal.on_click(click) {
            self.close_modal(reason);
        }

        if click.opens_new_tab && click.href.is_some() {
            self.press(click.target.clone(), EXTERNAL_LINK_SCALE);
            let deadline = self.now().saturating_add(self.config.press_feedback);
            self.press_resets.schedule(click.target.clone(), deadline);
        }
    }

    fn on_key(&mut self, key: &KeyEvent) {
        if let Some(reason) = self.modal.on_key(key) {
            self.close_modal(reason);
        }
    }

    fn on_pointer(&mut self, pointer: PointerEvent) {
        match pointer.kind {
            PointerKind::Down => self.press(pointer.target, BUTTON_PRESS_SCALE),
            PointerKind::Up | PointerKind::Leave => {
                self.press_resets.cancel(&pointer.target);
                self.outputs.push(DomEffect::PressScale {
                    target: pointer.target,
                    scale: None,
                });
            }
        }
    }

    /// Validate, then start a submission.
    ///
    /// Nothing changes state until validation passes: an invalid submit
    /// after a completed one leaves it `Succeeded`.
    fn on_submit(&mut self, fields: FormFieldValue) {
        if let Some(deadline) = self.submission.next_deadline() {
            warn!(
                target: "folio.submission",
                deadline_ms = millis(deadline),
                "submit ignored: submission already in flight"
            );
            return;
        }

        self.outputs.push(DomEffect::ClearFieldErrors);
        match validate(&fields) {
            ValidationResult::Invalid(errors) => {
                debug!(
                    target: "folio.submission",
                    errors = errors.len(),
                    "submit blocked by validation"
                );
                self.outputs.push(DomEffect::ShowFieldErrors(errors));
            }
            ValidationResult::Valid(record) => {
                self.acknowledge_success();
                match self.submission.submit(record, self.now()) {
                    Ok(deadline) => {
                        let button = self.form_ui.begin_sending().clone();
                        self.outputs.push(DomEffect::SubmitButton {
                            enabled: button.enabled,
                            label: button.label,
                        });
                        debug!(
                            target: "folio.submission",
                            deadline_ms = millis(deadline),
                            "submission started"
                        );
                    }
                    Err(rejection) => {
                        warn!(target: "folio.submission", %rejection, "submit rejected");
                    }
                }
            }
        }
    }

    /// Fire due deadlines in deadline order. Ties go scroll, submission, press.
    fn fire_due(&mut self) -> u32 {
        let now = self.now();
        let mut fired = 0;
        while let Some((deadline, source)) = self.next_due(now) {
            match source {
                TimerSource::ScrollRefresh => {
                    if self.scroll_refresh.poll(now) {
                        self.refresh_navigation();
                    }
                }
                TimerSource::Submission => {
                    if let Some(receipt) = self.submission.poll(now) {
                        let button = self.form_ui.finish_sending().clone();
                        self.outputs.push(DomEffect::SubmitButton {
                            enabled: button.enabled,
                            label: button.label,
                        });
                        self.outputs.push(DomEffect::ResetForm);
                        for (field, decor) in self.form_ui.reset_values() {
                            self.push_decor(field, decor);
                        }
                        if self.modal.open(&receipt) {
                            self.outputs.push(DomEffect::ModalVisible(true));
                            self.outputs.push(DomEffect::ScrollLock(true));
                        }
                        info!(
                            target: "folio.submission",
                            completed_at_ms = millis(receipt.completed_at()),
                            "submission completed"
                        );
                    }
                }
                TimerSource::PressFeedback => {
                    for target in self.press_resets.drain_due(deadline) {
                        self.outputs.push(DomEffect::PressScale {
                            target,
                            scale: None,
                        });
                    }
                }
            }
            fired += 1;
        }
        fired
    }

    fn next_due(&self, now: Duration) -> Option<(Duration, TimerSource)> {
        [
            (self.scroll_refresh.next_deadline(), TimerSource::ScrollRefresh),
            (self.submission.next_deadline(), TimerSource::Submission),
            (self.press_resets.next_deadline(), TimerSource::PressFeedback),
        ]
        .into_iter()
        .filter_map(|(deadline, source)| deadline.map(|d| (d, source)))
        .filter(|(deadline, _)| *deadline <= now)
        .fold(None, |best, candidate| match best {
            Some((d, _)) if d <= candidate.0 => best,
            _ => Some(candidate),
        })
    }

    /// The debounced action: re-derive navbar style and active link.
    fn refresh_navigation(&mut self) {
        let TrackerOutput {
            active_section,
            navbar,
        } = self.tracker.recompute();
        self.apply_navbar(navbar);

        // No matching section keeps the current marker.
        if let Some(section) = active_section {
            let link = self.nav_links.contains(&section).then_some(section);
            if link != self.active_link {
                debug!(target: "folio.controller", active = ?link, "active link changed");
                self.active_link = link.clone();
                self.outputs.push(DomEffect::ActiveLink { section: link });
            }
        }
    }

    fn apply_navbar(&mut self, navbar: NavbarVisualState) {
        if self.navbar != Some(navbar) {
            self.navbar = Some(navbar);
            self.outputs.push(DomEffect::NavbarStyle(navbar));
        }
    }

    fn close_modal(&mut self, reason: CloseReason) {
        debug!(target: "folio.modal", ?reason, "modal closed");
        self.outputs.push(DomEffect::ModalVisible(false));
        self.outputs.push(DomEffect::ScrollLock(false));
        self.acknowledge_success();
    }

    fn acknowledge_success(&mut self) {
        if self.submission.acknowledge() {
            debug!(target: "folio.submission", "submission acknowledged");
        }
    }

    fn press(&mut self, target: ElementId, scale: f32) {
        self.outputs.push(DomEffect::PressScale {
            target,
            scale: Some(scale),
        });
    }

    fn push_decor(&mut self, field: FormField, decor: FieldDecor) {
        self.outputs.push(DomEffect::FieldDecor {
            field,
            focused: decor.focused,
            has_value: decor.has_value,
        });
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
