//! Responses produced by the governance API.

use governance_application::{
    CastVoteOutput, CloseOutcome, CoordinatorError, SessionView, TransitionOutput, WorkflowView,
};
use governance_domain::{
    GovernanceError, TallyResult, VotingSession, Workflow, WorkflowProgress, WorkflowStep,
};
use serde::Serialize;

/// Payload of a successful request
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ResponseBody {
    Session(VotingSession),
    VoteCast(CastVoteOutput),
    SessionClosed(CloseOutcome),
    SessionsClosed(Vec<CloseOutcome>),
    SessionView(SessionView),
    Sessions(Vec<VotingSession>),
    Tally(TallyResult),
    Workflow(WorkflowView),
    StepTransition(TransitionOutput),
    Workflows(Vec<Workflow>),
    Progress {
        completed: usize,
        total: usize,
        percent: f64,
    },
    CanAdvance(bool),
    NextStep(Option<WorkflowStep>),
}

impl From<WorkflowProgress> for ResponseBody {
    fn from(progress: WorkflowProgress) -> Self {
        ResponseBody::Progress {
            completed: progress.completed,
            total: progress.total,
            percent: progress.percent(),
        }
    }
}

/// A rejected request, ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    /// Stable machine code, e.g. `session_not_active`
    pub code: String,
    /// What went wrong
    pub message: String,
    /// What the caller can do about it
    pub hint: &'static str,
}

impl From<&CoordinatorError> for ErrorBody {
    fn from(err: &CoordinatorError) -> Self {
        let code = err.code();
        Self {
            code: code.to_string(),
            message: err.to_string(),
            hint: hint_for(code),
        }
    }
}

impl From<CoordinatorError> for ErrorBody {
    fn from(err: CoordinatorError) -> Self {
        Self::from(&err)
    }
}

impl From<&GovernanceError> for ErrorBody {
    fn from(err: &GovernanceError) -> Self {
        let code = err.code();
        Self {
            code: code.to_string(),
            message: err.to_string(),
            hint: hint_for(code),
        }
    }
}

/// Corrective hint for each error code. The caller re-submits; nothing is
/// retried on their behalf.
pub fn hint_for(code: &str) -> &'static str {
    match code {
        "invalid_session_spec" => "Fix the session definition and create it again.",
        "session_not_active" => "This session is closed. Open a new session to vote again.",
        "invalid_selection_count" => "Pick between one and the allowed number of listed options.",
        "not_eligible" => "Only members of the group when the session opened may vote.",
        "step_blocked" => "Complete the preceding step (or reset a failed one) first.",
        "unknown_entity" => "Check the id; it does not refer to an existing record.",
        "invalid_workflow_spec" => "Give the workflow at least one step and unique step ids.",
        "invalid_step_transition" => "That action does not apply to the step's current status.",
        "not_authorized" => "Ask a group admin to close the session.",
        "vote_locked" => "Votes cannot be changed once cast in this deployment.",
        "unknown_group" => "Check the group id against the membership directory.",
        "unknown_alias" => "Create the entity with a matching \"as\" alias earlier in the script.",
        "membership_unavailable" | "storage_failure" => {
            "The service is unavailable. Try again later; nothing was changed."
        }
        _ => "",
    }
}

/// Outcome of one request
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GovernanceResponse {
    Ok {
        op: &'static str,
        result: ResponseBody,
    },
    Error {
        op: &'static str,
        error: ErrorBody,
    },
}

impl GovernanceResponse {
    pub fn ok(op: &'static str, result: ResponseBody) -> Self {
        GovernanceResponse::Ok { op, result }
    }

    pub fn error(op: &'static str, error: ErrorBody) -> Self {
        GovernanceResponse::Error { op, error }
    }

    pub fn op(&self) -> &'static str {
        match self {
            GovernanceResponse::Ok { op, .. } | GovernanceResponse::Error { op, .. } => op,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, GovernanceResponse::Ok { .. })
    }

    pub fn error_code(&self) -> Option<&str> {
        match self {
            GovernanceResponse::Error { error, .. } => Some(error.code.as_str()),
            GovernanceResponse::Ok { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use governance_domain::{SessionId, SessionStatus};

    #[test]
    fn test_error_body_carries_code_and_hint() {
        let err = CoordinatorError::from(GovernanceError::SessionNotActive {
            session_id: SessionId::new("s1"),
            status: SessionStatus::Completed,
        });
        let body = ErrorBody::from(&err);
        assert_eq!(body.code, "session_not_active");
        assert!(body.message.contains("s1"));
        assert!(!body.hint.is_empty());
    }

    #[test]
    fn test_every_domain_code_has_a_hint() {
        for code in [
            "invalid_session_spec",
            "session_not_active",
            "invalid_selection_count",
            "not_eligible",
            "step_blocked",
            "unknown_entity",
            "invalid_workflow_spec",
            "invalid_step_transition",
            "not_authorized",
            "vote_locked",
        ] {
            assert!(!hint_for(code).is_empty(), "no hint for {}", code);
        }
    }

    #[test]
    fn test_response_json_shape() {
        let response = GovernanceResponse::ok("can_advance", ResponseBody::CanAdvance(true));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["op"], "can_advance");
        assert_eq!(value["result"]["kind"], "can_advance");
        assert_eq!(value["result"]["data"], true);
    }
}
