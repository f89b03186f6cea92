//! Domain error types

use super::ids::{MemberId, SessionId, StepId};
use crate::voting::session::SessionStatus;
use crate::workflow::step::{StepAction, StepStatus};
use thiserror::Error;

/// Kind of entity referenced by [`GovernanceError::UnknownEntity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Session,
    Workflow,
    Step,
    Group,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Session => write!(f, "session"),
            EntityKind::Workflow => write!(f, "workflow"),
            EntityKind::Step => write!(f, "step"),
            EntityKind::Group => write!(f, "group"),
        }
    }
}

/// Domain-level errors
///
/// Every variant is a rejected operation: the state that existed before the
/// call is left untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GovernanceError {
    #[error("Invalid session spec: {0}")]
    InvalidSessionSpec(String),

    #[error("Session {session_id} is not active (status: {status})")]
    SessionNotActive {
        session_id: SessionId,
        status: SessionStatus,
    },

    #[error("Invalid selection: {0}")]
    InvalidSelectionCount(String),

    #[error("Member {0} is not eligible to vote in this session")]
    NotEligible(MemberId),

    #[error("Step {step_id} is blocked: {reason}")]
    StepBlocked { step_id: StepId, reason: String },

    #[error("Unknown {kind}: {id}")]
    UnknownEntity { kind: EntityKind, id: String },

    #[error("Invalid workflow spec: {0}")]
    InvalidWorkflowSpec(String),

    #[error("Cannot {action} step {step_id} while it is {status}")]
    InvalidStepTransition {
        step_id: StepId,
        status: StepStatus,
        action: StepAction,
    },

    #[error("Member {0} is not authorized to close this session")]
    NotAuthorized(MemberId),

    #[error("Member {0} has already voted and votes are locked")]
    VoteLocked(MemberId),
}

impl GovernanceError {
    /// Shorthand for an unknown-entity error.
    pub fn unknown(kind: EntityKind, id: impl std::fmt::Display) -> Self {
        GovernanceError::UnknownEntity {
            kind,
            id: id.to_string(),
        }
    }

    /// Stable machine-readable code, used by callers to pick a message.
    pub fn code(&self) -> &'static str {
        match self {
            GovernanceError::InvalidSessionSpec(_) => "invalid_session_spec",
            GovernanceError::SessionNotActive { .. } => "session_not_active",
            GovernanceError::InvalidSelectionCount(_) => "invalid_selection_count",
            GovernanceError::NotEligible(_) => "not_eligible",
            GovernanceError::StepBlocked { .. } => "step_blocked",
            GovernanceError::UnknownEntity { .. } => "unknown_entity",
            GovernanceError::InvalidWorkflowSpec(_) => "invalid_workflow_spec",
            GovernanceError::InvalidStepTransition { .. } => "invalid_step_transition",
            GovernanceError::NotAuthorized(_) => "not_authorized",
            GovernanceError::VoteLocked(_) => "vote_locked",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_entity_display() {
        let error = GovernanceError::unknown(EntityKind::Workflow, "wf-1");
        assert_eq!(error.to_string(), "Unknown workflow: wf-1");
        assert_eq!(error.code(), "unknown_entity");
    }

    #[test]
    fn test_session_not_active_display() {
        let error = GovernanceError::SessionNotActive {
            session_id: SessionId::new("s-1"),
            status: SessionStatus::Cancelled,
        };
        assert_eq!(
            error.to_string(),
            "Session s-1 is not active (status: cancelled)"
        );
    }

    #[test]
    fn test_invalid_transition_display() {
        let error = GovernanceError::InvalidStepTransition {
            step_id: StepId::new("b"),
            status: StepStatus::Pending,
            action: StepAction::Complete,
        };
        assert_eq!(error.to_string(), "Cannot complete step b while it is pending");
        assert_eq!(error.code(), "invalid_step_transition");
    }
}
