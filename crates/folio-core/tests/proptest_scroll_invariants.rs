//! Property-based invariant tests for the page engines.
//!
//! 1. With contiguous, non-overlapping sections the active section is the
//!    unique one containing `scroll_y + 100`, or none past the last section.
//! 2. The navbar tier is High iff `scroll_y > 50`; blur follows the tier and
//!    the variant follows only the colour preference.
//! 3. A burst of debounce triggers fires exactly once, at the last trigger
//!    plus the quiet period.
//! 4. Validation errors are non-empty iff the result is invalid, come in
//!    field order, and never depend on the subject.
//! 5. Timer queues drain in deadline order.

use core::time::Duration;

use folio_core::debounce::{DebouncedDispatcher, Debouncer};
use folio_core::form::{ErrorField, FormFieldValue, ValidationResult, validate};
use folio_core::scroll::{
    BLUR_HIGH_PX, BLUR_LOW_PX, OpacityTier, Section, ThemeVariant, compute_active_section,
    compute_navbar_visual_state,
};
use folio_core::timer::TimerQueue;
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

/// Contiguous sections starting at 0 with heights in `1..2000`.
fn sections_strategy() -> impl Strategy<Value = Vec<Section>> {
    prop::collection::vec(1u32..2000, 1..12).prop_map(|heights| {
        let mut top = 0.0;
        heights
            .into_iter()
            .enumerate()
            .map(|(i, h)| {
                let section = Section::new(format!("s{i}"), top, f64::from(h));
                top += f64::from(h);
                section
            })
            .collect()
    })
}

/// Non-decreasing trigger times (ms), each gap shorter than the quiet period.
fn burst_strategy(quiet: u64) -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0..quiet, 1..20).prop_map(|gaps| {
        let mut t = 0;
        gaps.into_iter()
            .map(|g| {
                t += g;
                t
            })
            .collect()
    })
}

fn field_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("   ".to_string()),
        "[a-z]{1,8}",
        "[a-z]{1,6}@[a-z]{1,6}\\.[a-z]{2,3}",
        " [a-z]{1,4}@[a-z]{1,4} ",
    ]
}

// ── Active section ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn active_section_is_unique_containing_section(
        sections in sections_strategy(),
        scroll_y in 0u32..30_000,
    ) {
        let scroll_y = f64::from(scroll_y);
        let effective = scroll_y + 100.0;
        let containing: Vec<&str> = sections
            .iter()
            .filter(|s| effective >= s.top && effective < s.top + s.height)
            .map(|s| s.id.as_str())
            .collect();
        prop_assert!(containing.len() <= 1, "contiguous sections overlap");

        let total: f64 = sections.iter().map(|s| s.height).sum();
        let active = compute_active_section(scroll_y, &sections);
        prop_assert_eq!(active, containing.first().copied());
        prop_assert_eq!(active.is_none(), effective >= total);
    }

    #[test]
    fn overlapping_sections_pick_first_match(
        sections in sections_strategy(),
        scroll_y in 0u32..5_000,
    ) {
        let mut overlapping = sections.clone();
        overlapping.insert(0, Section::new("cover", 0.0, 1e9));
        prop_assert_eq!(
            compute_active_section(f64::from(scroll_y), &overlapping),
            Some("cover")
        );
    }
}

// ── Navbar state ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn navbar_tier_follows_threshold(scroll_y in 0.0f64..10_000.0, dark in any::<bool>()) {
        let state = compute_navbar_visual_state(scroll_y, dark);
        if scroll_y > 50.0 {
            prop_assert_eq!(state.tier, OpacityTier::High);
            prop_assert_eq!(state.blur_px, BLUR_HIGH_PX);
        } else {
            prop_assert_eq!(state.tier, OpacityTier::Low);
            prop_assert_eq!(state.blur_px, BLUR_LOW_PX);
        }
        prop_assert_eq!(state.variant, ThemeVariant::from_dark(dark));
    }
}

// ── Debounce ────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn burst_fires_once_after_last_trigger(
        (quiet, triggers) in (1u64..50).prop_flat_map(|q| (Just(q), burst_strategy(q))),
    ) {
        let mut runs = Vec::new();
        let mut debouncer = Debouncer::new(Duration::from_millis(quiet));
        let last = *triggers.last().unwrap_or(&0);
        let end = last + quiet * 3;
        let mut next = triggers.iter().peekable();
        for t in 0..=end {
            let now = Duration::from_millis(t);
            while next.peek().is_some_and(|&&at| at == t) {
                debouncer.trigger(now);
                next.next();
            }
            if debouncer.poll(now) {
                runs.push(t);
            }
        }
        prop_assert_eq!(runs, vec![last + quiet]);
    }

    #[test]
    fn dispatcher_never_holds_two_pending_runs(gaps in prop::collection::vec(0u64..30, 1..30)) {
        let mut count = 0u32;
        let mut dispatcher = DebouncedDispatcher::new(|| count += 1, Duration::from_millis(10));
        let mut t = 0;
        for gap in gaps {
            t += gap;
            dispatcher.poll(Duration::from_millis(t));
            dispatcher.trigger(Duration::from_millis(t));
            prop_assert_eq!(dispatcher.next_deadline(), Some(Duration::from_millis(t + 10)));
        }
        dispatcher.poll(Duration::from_millis(t + 10));
        prop_assert_eq!(dispatcher.next_deadline(), None);
        let runs = dispatcher.runs();
        drop(dispatcher);
        prop_assert_eq!(u64::from(count), runs);
    }
}

// ── Validation ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn errors_non_empty_iff_invalid(
        name in field_strategy(),
        email in field_strategy(),
        subject in field_strategy(),
        message in field_strategy(),
    ) {
        let record = FormFieldValue::new(name, email, subject, message);
        match validate(&record) {
            ValidationResult::Valid(trimmed) => {
                prop_assert_eq!(trimmed, record.trimmed());
            }
            ValidationResult::Invalid(errors) => {
                prop_assert!(!errors.is_empty());
                let order: Vec<ErrorField> = errors.iter().map(|e| e.field).collect();
                let mut sorted = order.clone();
                sorted.sort_by_key(|f| match f {
                    ErrorField::Name => 0,
                    ErrorField::Email => 1,
                    ErrorField::Message => 2,
                });
                sorted.dedup();
                prop_assert_eq!(order, sorted, "one error per field, in field order");
            }
        }
    }

    #[test]
    fn subject_never_matters(
        name in field_strategy(),
        email in field_strategy(),
        message in field_strategy(),
        a in field_strategy(),
        b in field_strategy(),
    ) {
        let with_a = validate(&FormFieldValue::new(name.clone(), email.clone(), a, message.clone()));
        let with_b = validate(&FormFieldValue::new(name, email, b, message));
        prop_assert_eq!(with_a.is_valid(), with_b.is_valid());
        prop_assert_eq!(with_a.errors(), with_b.errors());
    }
}

// ── Timers ──────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn timers_drain_in_deadline_order(
        deadlines in prop::collection::vec(0u64..1_000, 1..40),
        now in 0u64..1_000,
    ) {
        let mut queue = TimerQueue::new();
        for (key, d) in deadlines.iter().enumerate() {
            queue.schedule(key, Duration::from_millis(*d));
        }
        let due = queue.drain_due(Duration::from_millis(now));
        let due_deadlines: Vec<u64> = due.iter().map(|k| deadlines[*k]).collect();
        prop_assert!(due_deadlines.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(due_deadlines.iter().all(|d| *d <= now));
        prop_assert_eq!(due.len() + queue.len(), deadlines.len());
    }
}
