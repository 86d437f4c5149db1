//! Run state machine.
//!
//! ```text
//! Idle → Sampling → Estimating → Extracting → Done
//!   └────────┴───────────┴────────────┴──────→ Failed
//! ```

use serde::Serialize;
use thiserror::Error;

/// Stage of a single pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineState {
    /// Not started.
    #[default]
    Idle,
    /// Reading bits from the pixel grid.
    Sampling,
    /// Running the entropy estimators.
    Estimating,
    /// Hashing the bitstream into a seed.
    Extracting,
    /// Report produced.
    Done,
    /// Aborted on a fatal error.
    Failed,
}

/// Rejected state transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid pipeline transition {from:?} -> {to:?}")]
pub struct TransitionError {
    /// State the run was in.
    pub from: PipelineState,
    /// State that was requested.
    pub to: PipelineState,
}

impl PipelineState {
    /// Returns true for `Done` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }

    /// Returns true if `next` directly follows `self`.
    pub fn can_advance_to(self, next: PipelineState) -> bool {
        use PipelineState::*;
        match (self, next) {
            (Idle, Sampling)
            | (Sampling, Estimating)
            | (Estimating, Extracting)
            | (Extracting, Done) => true,
            (from, Failed) => !from.is_terminal(),
            _ => false,
        }
    }

    /// Moves to `next`, rejecting anything off the happy path or into
    /// `Failed` from a terminal state.
    pub fn advance(&mut self, next: PipelineState) -> Result<(), TransitionError> {
        let from = *self;
        if !from.can_advance_to(next) {
            return Err(TransitionError { from, to: next });
        }
        tracing::debug!(?from, to = ?next, "Pipeline transition");
        *self = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PipelineState::*;

    #[test]
    fn test_happy_path() {
        let mut state = PipelineState::default();
        for next in [Sampling, Estimating, Extracting, Done] {
            state.advance(next).unwrap();
        }
        assert_eq!(state, Done);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_fail_from_any_live_state() {
        for from in [Idle, Sampling, Estimating, Extracting] {
            let mut state = from;
            assert!(state.advance(Failed).is_ok());
            assert_eq!(state, Failed);
        }
    }

    #[test]
    fn test_terminal_states_are_final() {
        let mut done = Done;
        assert!(done.advance(Failed).is_err());

        let mut failed = Failed;
        assert_eq!(
            failed.advance(Sampling),
            Err(TransitionError {
                from: Failed,
                to: Sampling
            })
        );
    }

    #[test]
    fn test_no_skipping_stages() {
        let mut state = Sampling;
        assert!(state.advance(Extracting).is_err());
        assert_eq!(state, Sampling);
        assert!(!Idle.can_advance_to(Done));
    }
}
