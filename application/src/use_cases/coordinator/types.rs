//! Error, output and read-model types for the governance coordinator.

use crate::ports::membership::MembershipError;
use crate::ports::repository::RepositoryError;
use governance_domain::{
    GovernanceError, OrderingWarning, StepTransition, TallyResult, Vote, VotingSession, Workflow,
    WorkflowProgress,
};
use serde::Serialize;
use thiserror::Error;

/// Errors returned by coordinator operations.
///
/// None of them are retried by the coordinator: domain errors stem from
/// caller input or state only the caller can remedy, and port failures are
/// surfaced as-is.
#[derive(Error, Debug)]
pub enum CoordinatorError {
    #[error(transparent)]
    Governance(#[from] GovernanceError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Membership error: {0}")]
    Membership(#[from] MembershipError),
}

impl CoordinatorError {
    /// Stable machine-readable code for presentation-layer messages.
    pub fn code(&self) -> &'static str {
        match self {
            CoordinatorError::Governance(e) => e.code(),
            CoordinatorError::Repository(_) => "storage_failure",
            CoordinatorError::Membership(MembershipError::UnknownGroup(_)) => "unknown_group",
            CoordinatorError::Membership(_) => "membership_unavailable",
        }
    }

    /// The domain error, if this is a rejected operation.
    pub fn as_governance(&self) -> Option<&GovernanceError> {
        match self {
            CoordinatorError::Governance(e) => Some(e),
            _ => None,
        }
    }
}

/// Result of a successful vote cast
#[derive(Debug, Clone, Serialize)]
pub struct CastVoteOutput {
    /// The stored vote
    pub vote: Vote,
    /// Whether an earlier vote by the same voter was replaced
    pub replaced: bool,
}

/// Result of closing a session
#[derive(Debug, Clone, Serialize)]
pub struct CloseOutcome {
    /// The session in its terminal state
    pub session: VotingSession,
    pub result: TallyResult,
}

/// Read model for a session: the record plus a live tally.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session: VotingSession,
    /// Final tally for closed sessions, live preview otherwise
    pub tally: TallyResult,
    /// Active and within its deadline at read time
    pub accepting_votes: bool,
}

/// Read model for a workflow
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowView {
    pub workflow: Workflow,
    pub progress: WorkflowProgress,
    pub progress_pct: f64,
    /// Steps ahead of an earlier not-completed step
    pub warnings: Vec<OrderingWarning>,
}

impl From<Workflow> for WorkflowView {
    fn from(workflow: Workflow) -> Self {
        let progress = workflow.progress();
        Self {
            progress_pct: progress.percent(),
            warnings: workflow.ordering_warnings(),
            progress,
            workflow,
        }
    }
}

/// Result of a step transition
#[derive(Debug, Clone, Serialize)]
pub struct TransitionOutput {
    pub transition: StepTransition,
    pub workflow: WorkflowView,
}
