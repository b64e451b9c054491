#![forbid(unsafe_code)]

//! Simulated contact form submission.
//!
//! There is no transport: a valid record is "sent" by waiting a fixed delay
//! on the host clock.
//!
//! ```text
//!           submit(valid)              poll(now >= deadline)
//! ┌──────┐ ───────────────▶ ┌────────────┐ ─────────────────▶ ┌───────────┐
//! │ Idle │                  │ Submitting │                    │ Succeeded │
//! └──────┘ ◀─────────────── └────────────┘                    └───────────┘
//!     ▲            (never)                                          │
//!     └──────────────────────── acknowledge() ──────────────────────┘
//! ```
//!
//! `submit` while `Submitting` is rejected and leaves the pending deadline
//! untouched. There is no failure state, no retry and no cancellation.

use core::time::Duration;

use folio_core::form::FormFieldValue;

/// Submission lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
}

/// Why a submit request was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    /// A submission is already pending.
    InFlight { deadline: Duration },
}

impl core::fmt::Display for SubmitRejection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InFlight { deadline } => {
                write!(f, "submission already in flight until {}ms", deadline.as_millis())
            }
        }
    }
}

impl std::error::Error for SubmitRejection {}

/// Proof that a submission completed.
///
/// Only [`SubmissionSimulator::poll`] creates receipts; the confirmation
/// modal opens only with one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    fields: FormFieldValue,
    completed_at: Duration,
}

impl SubmissionReceipt {
    /// The record that was submitted.
    #[must_use]
    pub fn fields(&self) -> &FormFieldValue {
        &self.fields
    }

    #[must_use]
    pub const fn completed_at(&self) -> Duration {
        self.completed_at
    }
}

#[derive(Debug, Clone)]
struct Pending {
    fields: FormFieldValue,
    deadline: Duration,
}

/// Fixed-latency submission state machine.
#[derive(Debug, Clone)]
pub struct SubmissionSimulator {
    delay: Duration,
    state: SubmissionState,
    pending: Option<Pending>,
    completed: u64,
}

impl SubmissionSimulator {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: SubmissionState::Idle,
            pending: None,
            completed: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> SubmissionState {
        self.state
    }

    /// Start submitting a validated record.
    ///
    /// Accepted from `Idle` or `Succeeded`. Returns the completion deadline.
    pub fn submit(
        &mut self,
        fields: FormFieldValue,
        now: Duration,
    ) -> Result<Duration, SubmitRejection> {
        if let Some(pending) = &self.pending {
            return Err(SubmitRejection::InFlight {
                deadline: pending.deadline,
            });
        }
        let deadline = now.saturating_add(self.delay);
        self.pending = Some(Pending { fields, deadline });
        self.state = SubmissionState::Submitting;
        Ok(deadline)
    }

    /// Complete the pending submission if its deadline has passed.
    pub fn poll(&mut self, now: Duration) -> Option<SubmissionReceipt> {
        let due = self.pending.as_ref().is_some_and(|p| now >= p.deadline);
        if !due {
            return None;
        }
        let pending = self.pending.take()?;
        self.state = SubmissionState::Succeeded;
        self.completed += 1;
        Some(SubmissionReceipt {
            fields: pending.fields,
            completed_at: now,
        })
    }

    /// Return from `Succeeded` to `Idle`. Returns whether the state changed.
    pub fn acknowledge(&mut self) -> bool {
        if self.state == SubmissionState::Succeeded {
            self.state = SubmissionState::Idle;
            true
        } else {
            false
        }
    }

    /// Deadline of the pending submission.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Number of completed submissions.
    #[must_use]
    pub const fn completed(&self) -> u64 {
        self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn record() -> FormFieldValue {
        FormFieldValue::new("Ana", "a@b.co", "", "hi")
    }

    #[test]
    fn completes_after_fixed_delay() {
        let mut sim = SubmissionSimulator::new(ms(1500));
        assert_eq!(sim.submit(record(), ms(100)), Ok(ms(1600)));
        assert_eq!(sim.state(), SubmissionState::Submitting);
        assert_eq!(sim.poll(ms(1599)), None);

        let receipt = sim.poll(ms(1600)).expect("due");
        assert_eq!(receipt.fields(), &record());
        assert_eq!(receipt.completed_at(), ms(1600));
        assert_eq!(sim.state(), SubmissionState::Succeeded);
        assert_eq!(sim.poll(ms(5000)), None);
        assert_eq!(sim.completed(), 1);
    }

    #[test]
    fn second_submit_while_in_flight_has_no_effect() {
        let mut sim = SubmissionSimulator::new(ms(1500));
        sim.submit(record(), ms(0)).unwrap();
        let other = FormFieldValue::new("Bo", "b@c.de", "", "yo");
        assert_eq!(
            sim.submit(other, ms(700)),
            Err(SubmitRejection::InFlight { deadline: ms(1500) })
        );
        assert_eq!(sim.next_deadline(), Some(ms(1500)));
        assert_eq!(sim.state(), SubmissionState::Submitting);

        let receipt = sim.poll(ms(1500)).unwrap();
        assert_eq!(receipt.fields().name, "Ana");
    }

    #[test]
    fn acknowledge_only_leaves_succeeded() {
        let mut sim = SubmissionSimulator::new(ms(10));
        assert!(!sim.acknowledge());
        sim.submit(record(), ms(0)).unwrap();
        assert!(!sim.acknowledge());
        sim.poll(ms(10)).unwrap();
        assert!(sim.acknowledge());
        assert_eq!(sim.state(), SubmissionState::Idle);
    }

    #[test]
    fn submit_from_succeeded_starts_new_cycle() {
        let mut sim = SubmissionSimulator::new(ms(10));
        sim.submit(record(), ms(0)).unwrap();
        sim.poll(ms(10)).unwrap();
        assert_eq!(sim.submit(record(), ms(20)), Ok(ms(30)));
        assert_eq!(sim.state(), SubmissionState::Submitting);
    }

    #[test]
    fn rejection_display() {
        let err = SubmitRejection::InFlight { deadline: ms(1500) };
        assert_eq!(err.to_string(), "submission already in flight until 1500ms");
    }
}
