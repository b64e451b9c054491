#![forbid(unsafe_code)]

//! Trailing-edge debouncing on a host-supplied clock.
//!
//! A burst of [`Debouncer::trigger`] calls collapses into one run that happens
//! `quiet_period` after the *last* trigger. Time never comes from the system:
//! every call takes the caller's monotonic `now`, so behaviour is fully
//! deterministic under test.
//!
//! ```text
//! trigger  t=0    t=3    t=6
//!          |------x------x------------------| fire at t=16
//!                 cancel  cancel
//! ```
//!
//! [`Debouncer`] only tracks the deadline; the owner runs its own action when
//! [`Debouncer::poll`] returns `true`. [`DebouncedDispatcher`] additionally
//! owns the action.
//!
//! # Example
//!
//! ```
//! use core::time::Duration;
//! use folio_core::debounce::DebouncedDispatcher;
//!
//! let ms = Duration::from_millis;
//! let mut runs = 0;
//! let mut dispatcher = DebouncedDispatcher::new(|| runs += 1, ms(10));
//! dispatcher.trigger(ms(0));
//! dispatcher.trigger(ms(3));
//! dispatcher.trigger(ms(6));
//! assert!(!dispatcher.poll(ms(10)));
//! assert!(dispatcher.poll(ms(16)));
//! assert!(!dispatcher.poll(ms(40)));
//! drop(dispatcher);
//! assert_eq!(runs, 1);
//! ```

use core::time::Duration;

/// Deadline bookkeeping for a trailing debounce.
///
/// Holds zero or one pending deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer {
    quiet_period: Duration,
    deadline: Option<Duration>,
}

impl Debouncer {
    #[must_use]
    pub const fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            deadline: None,
        }
    }

    #[must_use]
    pub const fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Arm (or re-arm) the pending run at `now + quiet_period`.
    ///
    /// Returns `true` if an earlier pending run was cancelled.
    pub fn trigger(&mut self, now: Duration) -> bool {
        self.deadline
            .replace(now.saturating_add(self.quiet_period))
            .is_some()
    }

    /// Consume the pending run if its deadline has been reached.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop the pending run, if any.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// When the pending run becomes due.
    #[must_use]
    pub const fn next_deadline(&self) -> Option<Duration> {
        self.deadline
    }
}

/// A [`Debouncer`] that owns the action it dispatches.
pub struct DebouncedDispatcher<F: FnMut()> {
    action: F,
    debouncer: Debouncer,
    runs: u64,
}

impl<F: FnMut()> DebouncedDispatcher<F> {
    /// Wrap `action` so that bursts of triggers run it once.
    pub fn new(action: F, quiet_period: Duration) -> Self {
        Self {
            action,
            debouncer: Debouncer::new(quiet_period),
            runs: 0,
        }
    }

    /// Request a run; restarts the quiet period.
    pub fn trigger(&mut self, now: Duration) {
        self.debouncer.trigger(now);
    }

    /// Run the action if the quiet period has elapsed. Returns whether it ran.
    pub fn poll(&mut self, now: Duration) -> bool {
        if self.debouncer.poll(now) {
            self.runs += 1;
            (self.action)();
            true
        } else {
            false
        }
    }

    #[must_use]
    pub const fn next_deadline(&self) -> Option<Duration> {
        self.debouncer.next_deadline()
    }

    /// Number of times the action has run.
    #[must_use]
    pub const fn runs(&self) -> u64 {
        self.runs
    }
}

impl<F: FnMut()> core::fmt::Debug for DebouncedDispatcher<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DebouncedDispatcher")
            .field("debouncer", &self.debouncer)
            .field("runs", &self.runs)
            .finish_non_exhaustive()
    }
}
