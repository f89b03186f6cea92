//! Domain events
//!
//! Emitted by the coordinator after a mutation has been stored, and handed to
//! notification and activity-log collaborators as fire-and-forget messages.

use crate::core::ids::{GroupId, MemberId, SessionId, StepId, WorkflowId};
use crate::voting::{CloseReason, SessionKind, SessionStatus, TallyResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GovernanceEvent {
    SessionCreated {
        session_id: SessionId,
        group_id: GroupId,
        kind: SessionKind,
        title: String,
        eligible_voter_count: usize,
        deadline: Option<DateTime<Utc>>,
    },
    VoteCast {
        session_id: SessionId,
        voter_id: MemberId,
        /// A previous vote by the same voter was replaced
        replaced: bool,
    },
    SessionClosed {
        session_id: SessionId,
        group_id: GroupId,
        status: SessionStatus,
        reason: CloseReason,
        result: TallyResult,
    },
    WorkflowCreated {
        workflow_id: WorkflowId,
        group_id: GroupId,
        step_count: usize,
    },
    StepStarted {
        workflow_id: WorkflowId,
        step_id: StepId,
    },
    StepCompleted {
        workflow_id: WorkflowId,
        step_id: StepId,
    },
    StepFailed {
        workflow_id: WorkflowId,
        step_id: StepId,
    },
    StepReset {
        workflow_id: WorkflowId,
        step_id: StepId,
    },
    WorkflowCompleted {
        workflow_id: WorkflowId,
        group_id: GroupId,
    },
}

impl GovernanceEvent {
    /// Event type identifier, matching the serialized `type` tag.
    pub fn event_type(&self) -> &'static str {
        match self {
            GovernanceEvent::SessionCreated { .. } => "session_created",
            GovernanceEvent::VoteCast { .. } => "vote_cast",
            GovernanceEvent::SessionClosed { .. } => "session_closed",
            GovernanceEvent::WorkflowCreated { .. } => "workflow_created",
            GovernanceEvent::StepStarted { .. } => "step_started",
            GovernanceEvent::StepCompleted { .. } => "step_completed",
            GovernanceEvent::StepFailed { .. } => "step_failed",
            GovernanceEvent::StepReset { .. } => "step_reset",
            GovernanceEvent::WorkflowCompleted { .. } => "workflow_completed",
        }
    }
}

/// An event stamped with the coordinator's clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEvent {
    pub occurred_at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: GovernanceEvent,
}

impl DomainEvent {
    pub fn new(event: GovernanceEvent, occurred_at: DateTime<Utc>) -> Self {
        Self { occurred_at, event }
    }

    pub fn event_type(&self) -> &'static str {
        self.event.event_type()
    }
}
