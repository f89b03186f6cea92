//! Domain layer for governance-engine
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Voting sessions
//!
//! A group decision is made in a [`VotingSession`]: a fixed option set, a
//! snapshot of the eligible voters and a quorum threshold. Each eligible
//! member holds at most one live [`Vote`]. Closing a session runs the
//! [`tally`] and ends it as `completed` (quorum met) or `cancelled`.
//!
//! ## Workflows
//!
//! A [`Workflow`] is an ordered list of steps. Step *i* may only start once
//! step *i-1* is completed, and any failed step blocks everything after it.

pub mod config;
pub mod core;
pub mod events;
pub mod voting;
pub mod workflow;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use core::{
    error::{EntityKind, GovernanceError},
    ids::{GroupId, MemberId, OptionId, SessionId, StepId, WorkflowId},
};
pub use events::{DomainEvent, GovernanceEvent};
pub use voting::{
    CloseReason, QuorumThreshold, RevotePolicy, SessionKind, SessionSpec, SessionStatus,
    TallyResult, Vote, VoteOption, VotingSession, tally,
};
pub use workflow::{
    OrderingWarning, StepAction, StepSpec, StepStatus, StepTransition, Workflow,
    WorkflowProgress, WorkflowStep,
};
