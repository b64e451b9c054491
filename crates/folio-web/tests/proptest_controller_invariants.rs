//! Property-based invariant tests for the page controller.
//!
//! Arbitrary interleavings of scrolls, clicks, keys, submits and clock
//! advances must keep these true after every step:
//!
//! 1. No deadline at or before `now` survives a step.
//! 2. The last scroll-lock effect matches the modal's visibility.
//! 3. The last menu effect matches the menu state.
//! 4. The modal opens at most once per completed submission.
//! 5. The same inputs produce the same snapshots.

use core::time::Duration;

use folio_core::config::PageConfig;
use folio_core::event::{ClickEvent, HostEvent, KeyCode, KeyEvent};
use folio_core::form::FormFieldValue;
use folio_core::scroll::Section;
use folio_web::controller::{PageController, PageManifest, PageSnapshot};
use folio_web::effects::DomEffect;
use folio_web::modal::ModalState;
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Scroll(u32),
    ToggleMenu,
    NavLink(&'static str),
    OutsideClick,
    Backdrop,
    ModalContent,
    Escape,
    SubmitValid,
    SubmitInvalid,
    Advance(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u32..4000).prop_map(Op::Scroll),
        Just(Op::ToggleMenu),
        prop_oneof![Just("home"), Just("work"), Just("missing")].prop_map(Op::NavLink),
        Just(Op::OutsideClick),
        Just(Op::Backdrop),
        Just(Op::ModalContent),
        Just(Op::Escape),
        Just(Op::SubmitValid),
        Just(Op::SubmitInvalid),
        (0u64..2000).prop_map(Op::Advance),
    ]
}

fn to_event(op: &Op) -> Option<HostEvent> {
    let click = match op {
        Op::Scroll(y) => return Some(HostEvent::Scroll { y: f64::from(*y) }),
        Op::Escape => return Some(HostEvent::Key(KeyEvent::new(KeyCode::Escape))),
        Op::SubmitValid => {
            return Some(HostEvent::Submit(FormFieldValue::new(
                "Ana", "ana@x.io", "", "hello",
            )));
        }
        Op::SubmitInvalid => {
            return Some(HostEvent::Submit(FormFieldValue::new("", "bad", "", "")));
        }
        Op::Advance(_) => return None,
        Op::ToggleMenu => ClickEvent::on("nav-toggle").within(["navbar"]),
        Op::NavLink(anchor) => ClickEvent::on(format!("link-{anchor}"))
            .within(["nav-menu", "navbar"])
            .with_href(format!("#{anchor}")),
        Op::OutsideClick => ClickEvent::on("hero").within(["main"]),
        Op::Backdrop => ClickEvent::on("success-modal"),
        Op::ModalContent => ClickEvent::on("modal-body").within(["success-modal"]),
    };
    Some(HostEvent::Click(click))
}

fn manifest() -> PageManifest {
    PageManifest {
        sections: vec![
            Section::new("home", 0.0, 900.0),
            Section::new("work", 900.0, 1500.0),
            Section::new("contact", 2400.0, 800.0),
        ],
        nav_links: vec!["home".into(), "work".into()],
        ..PageManifest::default()
    }
}

fn run(ops: &[Op]) -> Result<Vec<PageSnapshot>, TestCaseError> {
    let mut page = PageController::new(PageConfig::default()).expect("valid config");
    page.mount(manifest()).expect("mount");
    page.take_outputs();

    let mut snapshots = Vec::with_capacity(ops.len());
    let mut scroll_lock = false;
    let mut menu_open = false;
    let mut modal_opens = 0u64;
    let mut completions = 0u64;

    for op in ops {
        match op {
            Op::Advance(dt) => page.advance_time(Duration::from_millis(*dt)),
            other => {
                if let Some(event) = to_event(other) {
                    page.push_event(event);
                }
            }
        }
        let before = page.submission_state();
        page.step();
        if before != page.submission_state()
            && page.submission_state() == folio_web::submission::SubmissionState::Succeeded
        {
            completions += 1;
        }

        for effect in page.take_outputs().effects {
            match effect {
                DomEffect::ScrollLock(locked) => scroll_lock = locked,
                DomEffect::MenuOpen(open) => menu_open = open,
                DomEffect::ModalVisible(true) => modal_opens += 1,
                _ => {}
            }
        }

        let now = page.now();
        prop_assert!(
            page.next_deadline().is_none_or(|d| d > now),
            "due deadline survived a step"
        );
        prop_assert_eq!(scroll_lock, page.modal_state() == ModalState::Visible);
        prop_assert_eq!(menu_open, page.menu_open());
        prop_assert!(modal_opens <= completions);
        snapshots.push(page.snapshot());
    }
    Ok(snapshots)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn invariants_hold_after_every_step(ops in prop::collection::vec(op_strategy(), 1..60)) {
        run(&ops)?;
    }

    #[test]
    fn same_inputs_same_snapshots(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let first = run(&ops)?;
        let second = run(&ops)?;
        prop_assert_eq!(first, second);
    }
}
