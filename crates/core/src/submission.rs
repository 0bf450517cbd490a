//! Submission pipeline states.
//!
//! ```text
//! Idle -> Validating -> CreatingEntity -> UploadingMedia
//!      -> UpdatingEntityWithMedia -> Done
//! ```
//!
//! `UploadingMedia` and `UpdatingEntityWithMedia` are skipped when nothing
//! was staged or nothing uploaded. `Failed` is reachable from every working
//! state; validation and creation failures go back to `Idle`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    Validating,
    CreatingEntity,
    UploadingMedia,
    UpdatingEntityWithMedia,
    Done,
    Failed,
}

impl SubmissionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Whether the pipeline may step from `self` to `next`.
    pub fn can_transition_to(self, next: SubmissionState) -> bool {
        use SubmissionState::*;

        match (self, next) {
            (Idle, Validating) => true,
            (Validating, CreatingEntity | Idle | Failed) => true,
            (CreatingEntity, UploadingMedia | Done | Idle | Failed) => true,
            (UploadingMedia, UpdatingEntityWithMedia | Done | Failed) => true,
            (UpdatingEntityWithMedia, Done | Failed) => true,
            // A failed submission is reported, then the form is ready again.
            (Failed, Idle) => true,
            _ => false,
        }
    }
}

/// Records every state a submission passed through.
#[derive(Debug, Clone, Serialize)]
pub struct StateTrace {
    states: Vec<SubmissionState>,
}

impl Default for StateTrace {
    fn default() -> Self {
        Self {
            states: vec![SubmissionState::Idle],
        }
    }
}

impl StateTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> SubmissionState {
        self.states
            .last()
            .copied()
            .unwrap_or(SubmissionState::Idle)
    }

    /// Move to `next`.
    ///
    /// Illegal steps are a programming error in the orchestrator; they are
    /// caught in debug builds and recorded as-is in release builds.
    pub fn advance(&mut self, next: SubmissionState) {
        debug_assert!(
            self.current().can_transition_to(next),
            "illegal submission transition {:?} -> {:?}",
            self.current(),
            next
        );
        self.states.push(next);
    }

    pub fn states(&self) -> &[SubmissionState] {
        &self.states
    }

    /// Whether the pipeline ever reached `state`.
    pub fn visited(&self, state: SubmissionState) -> bool {
        self.states.contains(&state)
    }
}
