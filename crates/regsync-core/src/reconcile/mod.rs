//! Reconciliation passes
//!
//! A pass converges one resource of one domain on its desired state:
//!
//! ```text
//! Init ──fetch──▶ Fetched ──equal────▶ Unchanged ─────────────┐
//!   │                │                                        ▼
//!   │                └──differs──▶ PendingUpdate ──update──▶ Updated ──▶ Reported
//!   │                                   │
//!   └────────────── any failure ────────┴──────────▶ Failed
//! ```
//!
//! Every pass is strictly sequential: the fetch completes before the
//! comparison, and the comparison (including the external-record merge)
//! completes before the single update call. Nothing is retried.

pub mod nameservers;
pub mod records;

pub use nameservers::NameserverReconciler;
pub use records::RecordReconciler;

use serde::Serialize;
use tracing::debug;

use crate::error::Error;

/// States of a reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileState {
    /// Nothing fetched yet
    Init,
    /// Current state retrieved from the provider
    Fetched,
    /// Desired and current state are equal
    Unchanged,
    /// Desired state differs and has to be pushed
    PendingUpdate,
    /// Update call succeeded
    Updated,
    /// Result handed back to the caller
    Reported,
    /// A fetch, merge or update step failed
    Failed,
}

/// Result of a reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileOutcome<T> {
    /// Whether the provider state differed from the desired state
    pub changed: bool,

    /// Domain that was reconciled
    pub domain: String,

    /// State pushed (when changed) or the caller's input (when unchanged)
    pub state: Vec<T>,

    /// The update was skipped because of dry-run mode
    pub dry_run: bool,

    /// States the pass went through, `Init` to `Reported`
    pub transitions: Vec<ReconcileState>,
}

/// Tracks and logs the state transitions of one pass
pub(crate) struct Pass<'a> {
    resource: &'static str,
    domain: &'a str,
    transitions: Vec<ReconcileState>,
}

impl<'a> Pass<'a> {
    pub(crate) fn new(resource: &'static str, domain: &'a str) -> Self {
        Self {
            resource,
            domain,
            transitions: vec![ReconcileState::Init],
        }
    }

    pub(crate) fn advance(&mut self, next: ReconcileState) {
        debug!(
            "{} pass for {}: {:?} -> {:?}",
            self.resource,
            self.domain,
            self.current(),
            next
        );
        self.transitions.push(next);
    }

    /// Record the failure and hand the error back for propagation
    pub(crate) fn fail(&mut self, err: Error) -> Error {
        self.advance(ReconcileState::Failed);
        err
    }

    pub(crate) fn current(&self) -> ReconcileState {
        self.transitions
            .last()
            .copied()
            .unwrap_or(ReconcileState::Init)
    }

    pub(crate) fn report<T>(mut self, changed: bool, state: Vec<T>, dry_run: bool) -> ReconcileOutcome<T> {
        self.advance(ReconcileState::Reported);
        ReconcileOutcome {
            changed,
            domain: self.domain.to_string(),
            state,
            dry_run,
            transitions: self.transitions,
        }
    }
}
