//! Evaluation State
//!
//! A session is either clean or dirty. Any attribute mutation marks it dirty;
//! only an external collaborator (renderer, save routine) marks it clean
//! again, once it has caught up. The revision counter lets several
//! collaborators track changes independently without fighting over the flag.

use tracing::trace;

/// Dirty state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirtyState {
    /// Nothing changed since the last `mark_clean`.
    #[default]
    Clean,

    /// At least one mutation happened since the last `mark_clean`.
    Dirty,
}

/// Dirty flag plus a count of every mutation ever applied.
#[derive(Debug, Clone, Default)]
pub struct EvaluationState {
    state: DirtyState,
    revision: u64,
}

impl EvaluationState {
    /// Create a clean state at revision zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mutation.
    pub fn mark_dirty(&mut self) {
        self.revision += 1;
        if self.state == DirtyState::Clean {
            trace!(revision = self.revision, "session marked dirty");
        }
        self.state = DirtyState::Dirty;
    }

    /// Acknowledge all pending changes.
    pub fn mark_clean(&mut self) {
        if self.state == DirtyState::Dirty {
            trace!(revision = self.revision, "session marked clean");
        }
        self.state = DirtyState::Clean;
    }

    /// Get the current dirty state.
    pub fn dirty_state(&self) -> DirtyState {
        self.state
    }

    /// Check if there are unacknowledged mutations.
    pub fn is_dirty(&self) -> bool {
        self.state == DirtyState::Dirty
    }

    /// Get the number of mutations applied so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
