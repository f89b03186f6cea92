//! Requests accepted by the governance API.
//!
//! Requests are plain serde values so any transport can carry them. In a
//! request script, an entity created with `"as": "<alias>"` can be referred
//! to later as `"$<alias>"` wherever a session or workflow id is expected.

use governance_domain::{MemberId, OptionId, SessionSpec, StepAction, StepId, StepSpec};
use serde::{Deserialize, Serialize};

/// One governance operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum GovernanceRequest {
    CreateSession {
        spec: SessionSpec,
        #[serde(default, rename = "as", skip_serializing_if = "Option::is_none")]
        alias: Option<String>,
    },
    CastVote {
        session_id: String,
        voter_id: MemberId,
        selections: Vec<OptionId>,
    },
    CloseSession {
        session_id: String,
        closed_by: MemberId,
    },
    CloseExpiredSessions,
    GetSession {
        session_id: String,
    },
    ListSessions {
        #[serde(default)]
        group_id: Option<String>,
    },
    PreviewTally {
        session_id: String,
    },
    CreateWorkflow {
        group_id: String,
        title: String,
        steps: Vec<StepSpec>,
        #[serde(default, rename = "as", skip_serializing_if = "Option::is_none")]
        alias: Option<String>,
    },
    TransitionStep {
        workflow_id: String,
        step_id: StepId,
        action: StepAction,
    },
    GetWorkflow {
        workflow_id: String,
    },
    ListWorkflows {
        #[serde(default)]
        group_id: Option<String>,
    },
    WorkflowProgress {
        workflow_id: String,
    },
    CanAdvance {
        workflow_id: String,
        step_id: StepId,
    },
    NextStep {
        workflow_id: String,
    },
}

impl GovernanceRequest {
    /// Operation name, matching the serialized `op` tag.
    pub fn op(&self) -> &'static str {
        match self {
            GovernanceRequest::CreateSession { .. } => "create_session",
            GovernanceRequest::CastVote { .. } => "cast_vote",
            GovernanceRequest::CloseSession { .. } => "close_session",
            GovernanceRequest::CloseExpiredSessions => "close_expired_sessions",
            GovernanceRequest::GetSession { .. } => "get_session",
            GovernanceRequest::ListSessions { .. } => "list_sessions",
            GovernanceRequest::PreviewTally { .. } => "preview_tally",
            GovernanceRequest::CreateWorkflow { .. } => "create_workflow",
            GovernanceRequest::TransitionStep { .. } => "transition_step",
            GovernanceRequest::GetWorkflow { .. } => "get_workflow",
            GovernanceRequest::ListWorkflows { .. } => "list_workflows",
            GovernanceRequest::WorkflowProgress { .. } => "workflow_progress",
            GovernanceRequest::CanAdvance { .. } => "can_advance",
            GovernanceRequest::NextStep { .. } => "next_step",
        }
    }

    /// Whether the request can change stored state.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            GovernanceRequest::CreateSession { .. }
                | GovernanceRequest::CastVote { .. }
                | GovernanceRequest::CloseSession { .. }
                | GovernanceRequest::CloseExpiredSessions
                | GovernanceRequest::CreateWorkflow { .. }
                | GovernanceRequest::TransitionStep { .. }
        )
    }
}

/// Parse a request script: a JSON array of requests, or one request per line.
pub fn parse_script(input: &str) -> Result<Vec<GovernanceRequest>, serde_json::Error> {
    let trimmed = input.trim_start();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed);
    }
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("//"))
        .map(serde_json::from_str)
        .collect()
}
