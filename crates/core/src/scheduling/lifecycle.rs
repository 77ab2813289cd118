//! Persistence state machine for a single appointment.
//!
//! ```text
//! Draft ──derive──▶ EndDateComputed ──check──▶ Validated ──write──▶ Persisted
//!   │                    │                                          │   │
//!   └────────────────────┴──────────▶ Rejected ◀─────────────────────┘   │
//!                                                                        ▼
//!                         Persisted ──edit──▶ EndDateComputed    Canceled
//! ```
//!
//! `Rejected` and `Canceled` are terminal. A rejected attempt never reaches
//! the store.

use agenda_domain::{AgendaError, Result};
use tracing::trace;

/// Phase of an appointment within one create/update/cancel attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Draft,
    EndDateComputed,
    Validated,
    Rejected,
    Persisted,
    Canceled,
}

impl LifecyclePhase {
    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(self, next: LifecyclePhase) -> bool {
        use LifecyclePhase::{Canceled, Draft, EndDateComputed, Persisted, Rejected, Validated};

        matches!(
            (self, next),
            (Draft, EndDateComputed)
                | (EndDateComputed, Validated)
                | (Validated, Persisted)
                | (Persisted, EndDateComputed)
                | (Persisted, Canceled)
                | (Draft | EndDateComputed | Persisted, Rejected)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Canceled)
    }
}

/// Tracks the phases one attempt has gone through.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    history: Vec<LifecyclePhase>,
}

impl Lifecycle {
    /// Attempt on a new appointment.
    pub fn draft() -> Self {
        Self { history: vec![LifecyclePhase::Draft] }
    }

    /// Attempt on an appointment that is already stored.
    pub fn persisted() -> Self {
        Self { history: vec![LifecyclePhase::Persisted] }
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.history.last().copied().unwrap_or(LifecyclePhase::Draft)
    }

    pub fn history(&self) -> &[LifecyclePhase] {
        &self.history
    }

    /// Move to `next`.
    ///
    /// # Errors
    /// Returns `AgendaError::Internal` for an illegal transition; the phase is
    /// left unchanged.
    pub fn advance(&mut self, next: LifecyclePhase) -> Result<()> {
        let current = self.phase();
        if !current.can_transition_to(next) {
            return Err(AgendaError::Internal(format!(
                "illegal appointment lifecycle transition {current:?} -> {next:?}"
            )));
        }
        trace!(from = ?current, to = ?next, "appointment lifecycle transition");
        self.history.push(next);
        Ok(())
    }

    /// Mark the attempt rejected and hand back the error that caused it.
    pub fn reject(&mut self, err: impl Into<AgendaError>) -> AgendaError {
        if self.phase().can_transition_to(LifecyclePhase::Rejected) {
            self.history.push(LifecyclePhase::Rejected);
        }
        err.into()
    }
}
