//! In-memory repositories.
//!
//! Each repository keeps its records behind a single `RwLock`, so a reader
//! always sees a session together with a consistent set of votes, and a vote
//! upsert is never half-visible.

use async_trait::async_trait;
use governance_application::{RepositoryError, SessionRepository, WorkflowRepository};
use governance_domain::{GroupId, MemberId, SessionId, Vote, VotingSession, Workflow, WorkflowId};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

#[derive(Default)]
struct SessionTables {
    sessions: HashMap<SessionId, VotingSession>,
    /// Insertion order, for stable listings
    order: Vec<SessionId>,
    /// `(session, voter)` -> live vote
    votes: HashMap<SessionId, BTreeMap<MemberId, Vote>>,
}

/// Sessions and votes held in process memory.
#[derive(Default)]
pub struct InMemorySessionRepository {
    tables: RwLock<SessionTables>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn insert_session(&self, session: VotingSession) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.sessions.contains_key(&session.id) {
            return Err(RepositoryError::AlreadyExists(session.id.to_string()));
        }
        tables.order.push(session.id.clone());
        tables.sessions.insert(session.id.clone(), session);
        Ok(())
    }

    async fn get_session(&self, id: &SessionId) -> Result<Option<VotingSession>, RepositoryError> {
        Ok(self.tables.read().await.sessions.get(id).cloned())
    }

    async fn update_session(&self, session: VotingSession) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        match tables.sessions.get_mut(&session.id) {
            Some(stored) => {
                *stored = session;
                Ok(())
            }
            None => Err(RepositoryError::NotFound(session.id.to_string())),
        }
    }

    async fn list_sessions(
        &self,
        group: Option<&GroupId>,
    ) -> Result<Vec<VotingSession>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .order
            .iter()
            .filter_map(|id| tables.sessions.get(id))
            .filter(|s| group.is_none_or(|g| &s.group_id == g))
            .cloned()
            .collect())
    }

    async fn get_vote(
        &self,
        session: &SessionId,
        voter: &MemberId,
    ) -> Result<Option<Vote>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .votes
            .get(session)
            .and_then(|votes| votes.get(voter))
            .cloned())
    }

    async fn upsert_vote(&self, vote: Vote) -> Result<Option<Vote>, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.sessions.contains_key(&vote.session_id) {
            return Err(RepositoryError::NotFound(vote.session_id.to_string()));
        }
        Ok(tables
            .votes
            .entry(vote.session_id.clone())
            .or_default()
            .insert(vote.voter_id.clone(), vote))
    }

    async fn votes(&self, session: &SessionId) -> Result<Vec<Vote>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .votes
            .get(session)
            .map(|votes| votes.values().cloned().collect())
            .unwrap_or_default())
    }
}

#[derive(Default)]
struct WorkflowTables {
    workflows: HashMap<WorkflowId, Workflow>,
    order: Vec<WorkflowId>,
}

/// Workflows held in process memory.
#[derive(Default)]
pub struct InMemoryWorkflowRepository {
    tables: RwLock<WorkflowTables>,
}

impl InMemoryWorkflowRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkflowRepository for InMemoryWorkflowRepository {
    async fn insert_workflow(&self, workflow: Workflow) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.workflows.contains_key(&workflow.id) {
            return Err(RepositoryError::AlreadyExists(workflow.id.to_string()));
        }
        tables.order.push(workflow.id.clone());
        tables.workflows.insert(workflow.id.clone(), workflow);
        Ok(())
    }

    async fn get_workflow(&self, id: &WorkflowId) -> Result<Option<Workflow>, RepositoryError> {
        Ok(self.tables.read().await.workflows.get(id).cloned())
    }

    async fn update_workflow(&self, workflow: Workflow) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        match tables.workflows.get_mut(&workflow.id) {
            Some(stored) => {
                *stored = workflow;
                Ok(())
            }
            None => Err(RepositoryError::NotFound(workflow.id.to_string())),
        }
    }

    async fn list_workflows(
        &self,
        group: Option<&GroupId>,
    ) -> Result<Vec<Workflow>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .order
            .iter()
            .filter_map(|id| tables.workflows.get(id))
            .filter(|w| group.is_none_or(|g| &w.group_id == g))
            .cloned()
            .collect())
    }
}
