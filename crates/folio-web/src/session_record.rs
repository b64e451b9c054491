#![forbid(unsafe_code)]

//! Deterministic session recording and replay.
//!
//! [`SessionRecorder`] wraps a [`PageController`] and logs every input, time
//! step and step checkpoint. [`replay`] feeds the same trace through a fresh
//! controller and compares the checkpoint checksums.
//!
//! # Trace layout
//!
//! - **Header**: the page manifest the controller was mounted with.
//! - **Input**: a host event with the clock time it was pushed at.
//! - **Tick**: the clock moved to `ts_ns`.
//! - **Checkpoint**: FNV-1a checksum of the controller snapshot after a step,
//!   chained with the previous checkpoint.
//! - **Summary**: checkpoint count and final chain value.
//!
//! Checkpoint 0 is taken right after mount; every later checkpoint follows
//! one `step()`. Given the same configuration, replay must reproduce every
//! checksum, since time and input only enter through the trace.

use core::time::Duration;

use folio_core::config::PageConfig;
use folio_core::event::HostEvent;

use crate::WebError;
use crate::controller::{PageController, PageManifest, PageSnapshot, StepResult};

/// Schema version for session traces.
pub const SCHEMA_VERSION: &str = "folio-trace-v1";

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

fn fnv1a64_bytes(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

fn fnv1a64_pair(prev: u64, next: u64) -> u64 {
    let hash = fnv1a64_bytes(FNV_OFFSET_BASIS, &prev.to_le_bytes());
    fnv1a64_bytes(hash, &next.to_le_bytes())
}

/// Checksum of a controller snapshot.
#[must_use]
pub fn checksum_snapshot(snapshot: &PageSnapshot) -> u64 {
    fnv1a64_bytes(FNV_OFFSET_BASIS, format!("{snapshot:?}").as_bytes())
}

fn duration_ns(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

/// A single record in a session trace.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceRecord {
    /// Session header (must be first).
    Header {
        schema: String,
        manifest: PageManifest,
    },
    /// A host event pushed at `ts_ns`.
    Input { ts_ns: u64, event: HostEvent },
    /// The clock moved to `ts_ns`.
    Tick { ts_ns: u64 },
    /// Snapshot checksum after mount (index 0) or after a step.
    Checkpoint {
        index: u64,
        ts_ns: u64,
        checksum: u64,
        checksum_chain: u64,
    },
    /// Trace summary (must be last).
    Summary {
        total_checkpoints: u64,
        final_checksum_chain: u64,
    },
}

/// A complete recorded session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionTrace {
    pub records: Vec<TraceRecord>,
}

impl SessionTrace {
    #[must_use]
    pub fn checkpoint_count(&self) -> u64 {
        self.records
            .iter()
            .filter(|r| matches!(r, TraceRecord::Checkpoint { .. }))
            .count() as u64
    }

    /// Final chain value from the summary record.
    #[must_use]
    pub fn final_checksum_chain(&self) -> Option<u64> {
        self.records.iter().rev().find_map(|r| match r {
            TraceRecord::Summary {
                final_checksum_chain,
                ..
            } => Some(*final_checksum_chain),
            _ => None,
        })
    }
}

/// Records a page session for deterministic replay.
#[derive(Debug)]
pub struct SessionRecorder {
    controller: PageController,
    records: Vec<TraceRecord>,
    checksum_chain: u64,
    checkpoints: u64,
}

impl SessionRecorder {
    /// Build and mount a controller, recording the header and checkpoint 0.
    pub fn new(config: PageConfig, manifest: PageManifest) -> Result<Self, WebError> {
        let mut controller = PageController::new(config)?;
        controller.mount(manifest.clone())?;
        let mut recorder = Self {
            controller,
            records: vec![TraceRecord::Header {
                schema: SCHEMA_VERSION.to_string(),
                manifest,
            }],
            checksum_chain: 0,
            checkpoints: 0,
        };
        recorder.record_checkpoint();
        Ok(recorder)
    }

    /// Record and queue a host event at the current clock time.
    pub fn push_event(&mut self, event: HostEvent) {
        self.records.push(TraceRecord::Input {
            ts_ns: duration_ns(self.controller.now()),
            event: event.clone(),
        });
        self.controller.push_event(event);
    }

    /// Record a clock advance.
    pub fn advance_time(&mut self, dt: Duration) {
        self.controller.advance_time(dt);
        self.records.push(TraceRecord::Tick {
            ts_ns: duration_ns(self.controller.now()),
        });
    }

    /// Step the controller and record a checkpoint.
    pub fn step(&mut self) -> StepResult {
        let result = self.controller.step();
        self.record_checkpoint();
        result
    }

    /// Finish recording and return the trace.
    #[must_use]
    pub fn finish(mut self) -> SessionTrace {
        self.records.push(TraceRecord::Summary {
            total_checkpoints: self.checkpoints,
            final_checksum_chain: self.checksum_chain,
        });
        SessionTrace {
            records: self.records,
        }
    }

    #[must_use]
    pub const fn controller(&self) -> &PageController {
        &self.controller
    }

    /// Mutable access, e.g. to drain outputs. Inputs pushed through this
    /// handle are not recorded.
    pub fn controller_mut(&mut self) -> &mut PageController {
        &mut self.controller
    }

    fn record_checkpoint(&mut self) {
        let checksum = checksum_snapshot(&self.controller.snapshot());
        let chain = fnv1a64_pair(self.checksum_chain, checksum);
        self.records.push(TraceRecord::Checkpoint {
            index: self.checkpoints,
            ts_ns: duration_ns(self.controller.now()),
            checksum,
            checksum_chain: chain,
        });
        self.checksum_chain = chain;
        self.checkpoints += 1;
    }
}

/// Result of replaying a session trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayResult {
    pub total_checkpoints: u64,
    pub final_checksum_chain: u64,
    /// First checkpoint whose checksum differed, if any.
    pub first_mismatch: Option<ReplayMismatch>,
}

impl ReplayResult {
    /// Whether every checkpoint matched.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.first_mismatch.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayMismatch {
    pub index: u64,
    pub expected: u64,
    pub actual: u64,
}

/// Errors that can occur during replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// The trace does not start with a header record.
    MissingHeader,
    /// The header names a schema this build cannot replay.
    UnsupportedSchema(String),
    /// The controller could not be built or mounted.
    Web(WebError),
}

impl core::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingHeader => write!(f, "trace missing header record"),
            Self::UnsupportedSchema(schema) => write!(f, "unsupported trace schema: {schema}"),
            Self::Web(e) => write!(f, "controller error: {e}"),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Web(e) => Some(e),
            _ => None,
        }
    }
}

impl From<WebError> for ReplayError {
    fn from(e: WebError) -> Self {
        Self::Web(e)
    }
}

/// Replay `trace` through a fresh controller built from `config`.
///
/// Inputs and ticks are fed as recorded; each checkpoint after the first
/// triggers one `step()`, matching the recording cadence.
pub fn replay(config: PageConfig, trace: &SessionTrace) -> Result<ReplayResult, ReplayError> {
    let manifest = match trace.records.first() {
        Some(TraceRecord::Header { schema, manifest }) => {
            if schema != SCHEMA_VERSION {
                return Err(ReplayError::UnsupportedSchema(schema.clone()));
            }
            manifest.clone()
        }
        _ => return Err(ReplayError::MissingHeader),
    };

    let mut controller = PageController::new(config)?;
    controller.mount(manifest)?;

    let mut replayed: u64 = 0;
    let mut checksum_chain: u64 = 0;
    let mut first_mismatch = None;

    for record in &trace.records {
        match record {
            TraceRecord::Input { event, .. } => controller.push_event(event.clone()),
            TraceRecord::Tick { ts_ns } => controller.set_time(Duration::from_nanos(*ts_ns)),
            TraceRecord::Checkpoint {
                index,
                checksum: expected,
                ..
            } => {
                if replayed > 0 {
                    controller.step();
                }
                let actual = checksum_snapshot(&controller.snapshot());
                checksum_chain = fnv1a64_pair(checksum_chain, actual);
                if actual != *expected && first_mismatch.is_none() {
                    first_mismatch = Some(ReplayMismatch {
                        index: *index,
                        expected: *expected,
                        actual,
                    });
                }
                replayed += 1;
            }
            TraceRecord::Header { .. } | TraceRecord::Summary { .. } => {}
        }
    }

    Ok(ReplayResult {
        total_checkpoints: replayed,
        final_checksum_chain: checksum_chain,
        first_mismatch,
    })
}
