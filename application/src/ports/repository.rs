//! Persistence ports
//!
//! Storage is split per aggregate: one record per session, one record per
//! `(session, voter)` vote with last-write-wins semantics, and one record per
//! workflow with its embedded step list. Each call must be atomic; the
//! coordinator serializes writes per entity on top of that.

use async_trait::async_trait;
use governance_domain::{GroupId, MemberId, SessionId, Vote, VotingSession, Workflow, WorkflowId};
use thiserror::Error;

/// Errors reported by a storage adapter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record already exists: {0}")]
    AlreadyExists(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Storage failure: {0}")]
    Storage(String),
}

/// Storage for voting sessions and their votes.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn insert_session(&self, session: VotingSession) -> Result<(), RepositoryError>;

    async fn get_session(&self, id: &SessionId) -> Result<Option<VotingSession>, RepositoryError>;

    /// Replace a stored session record.
    async fn update_session(&self, session: VotingSession) -> Result<(), RepositoryError>;

    /// All sessions, or only those of `group`, ordered by creation time.
    async fn list_sessions(
        &self,
        group: Option<&GroupId>,
    ) -> Result<Vec<VotingSession>, RepositoryError>;

    async fn get_vote(
        &self,
        session: &SessionId,
        voter: &MemberId,
    ) -> Result<Option<Vote>, RepositoryError>;

    /// Store `vote`, replacing any vote by the same voter in the same
    /// session. Returns the replaced record.
    async fn upsert_vote(&self, vote: Vote) -> Result<Option<Vote>, RepositoryError>;

    /// Live votes of a session.
    async fn votes(&self, session: &SessionId) -> Result<Vec<Vote>, RepositoryError>;
}

/// Storage for workflows.
#[async_trait]
pub trait WorkflowRepository: Send + Sync {
    async fn insert_workflow(&self, workflow: Workflow) -> Result<(), RepositoryError>;

    async fn get_workflow(&self, id: &WorkflowId) -> Result<Option<Workflow>, RepositoryError>;

    /// Replace a stored workflow record.
    async fn update_workflow(&self, workflow: Workflow) -> Result<(), RepositoryError>;

    /// All workflows, or only those of `group`, ordered by creation time.
    async fn list_workflows(
        &self,
        group: Option<&GroupId>,
    ) -> Result<Vec<Workflow>, RepositoryError>;
}
