//! Governance Coordinator use case
//!
//! The single mutation entry point for voting sessions and workflows.
//!
//! ```text
//! caller ──▶ GovernanceCoordinator ──▶ domain (validate, tally, transition)
//!                    │                        │
//!                    │◀───── new state ───────┘
//!                    ├──▶ SessionRepository / WorkflowRepository (store)
//!                    └──▶ EventPublisher (fire-and-forget)
//! ```
//!
//! Each mutation holds the entity's lock for its whole read-modify-write and
//! works on a copy of the stored record, so a rejected call leaves no trace.
//! Reads take no lock and see whatever the repository last stored.
//!
//! | Operation              | Module        |
//! |------------------------|---------------|
//! | create / cast / close  | [`voting`]    |
//! | expiry sweep, previews | [`voting`]    |
//! | create / transition    | [`workflow`]  |
//! | progress, next step    | [`workflow`]  |

mod locks;
mod types;
mod voting;
mod workflow;

pub use types::{
    CastVoteOutput, CloseOutcome, CoordinatorError, SessionView, TransitionOutput, WorkflowView,
};

use crate::config::CoordinatorConfig;
use crate::ports::clock::{Clock, SystemClock};
use crate::ports::event_publisher::{EventPublisher, NoEvents};
use crate::ports::membership::MembershipPort;
use crate::ports::repository::{SessionRepository, WorkflowRepository};
use governance_domain::{
    DomainEvent, EntityKind, GovernanceError, GovernanceEvent, SessionId, VotingSession, Workflow,
    WorkflowId,
};
use locks::EntityLocks;
use std::sync::Arc;

/// Orchestrates session and workflow operations over the injected ports.
pub struct GovernanceCoordinator<S, W, M>
where
    S: SessionRepository + 'static,
    W: WorkflowRepository + 'static,
    M: MembershipPort + 'static,
{
    pub(super) sessions: Arc<S>,
    pub(super) workflows: Arc<W>,
    pub(super) membership: Arc<M>,
    pub(super) events: Arc<dyn EventPublisher>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) config: CoordinatorConfig,
    session_locks: EntityLocks<SessionId>,
    workflow_locks: EntityLocks<WorkflowId>,
}

impl<S, W, M> GovernanceCoordinator<S, W, M>
where
    S: SessionRepository + 'static,
    W: WorkflowRepository + 'static,
    M: MembershipPort + 'static,
{
    pub fn new(sessions: Arc<S>, workflows: Arc<W>, membership: Arc<M>) -> Self {
        Self {
            sessions,
            workflows,
            membership,
            events: Arc::new(NoEvents),
            clock: Arc::new(SystemClock),
            config: CoordinatorConfig::default(),
            session_locks: EntityLocks::new(),
            workflow_locks: EntityLocks::new(),
        }
    }

    /// Attach the notification / activity-log publisher.
    pub fn with_events(mut self, events: Arc<dyn EventPublisher>) -> Self {
        self.events = events;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_config(mut self, config: CoordinatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub(super) fn publish(&self, event: GovernanceEvent) {
        self.events.publish(DomainEvent::new(event, self.clock.now()));
    }

    pub(super) async fn load_session(
        &self,
        id: &SessionId,
    ) -> Result<VotingSession, CoordinatorError> {
        self.sessions
            .get_session(id)
            .await?
            .ok_or_else(|| GovernanceError::unknown(EntityKind::Session, id).into())
    }

    pub(super) async fn load_workflow(&self, id: &WorkflowId) -> Result<Workflow, CoordinatorError> {
        self.workflows
            .get_workflow(id)
            .await?
            .ok_or_else(|| GovernanceError::unknown(EntityKind::Workflow, id).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::clock::ManualClock;
    use crate::ports::event_publisher::EventRecorder;
    use crate::ports::membership::MembershipError;
    use crate::ports::repository::RepositoryError;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use governance_domain::{
        CloseReason, GroupId, MemberId, OptionId, SessionKind, SessionSpec, SessionStatus, Vote, VoteOption,
    };
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Session store whose writes can be switched to fail.
    #[derive(Default)]
    struct FlakySessions {
        sessions: Mutex<HashMap<SessionId, VotingSession>>,
        votes: Mutex<Vec<Vote>>,
        fail_writes: AtomicBool,
        /// Updates to this one session fail
        stuck: Mutex<Option<SessionId>>,
    }

    impl FlakySessions {
        fn check(&self) -> Result<(), RepositoryError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                Err(RepositoryError::Storage("disk full".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl SessionRepository for FlakySessions {
        async fn insert_session(&self, session: VotingSession) -> Result<(), RepositoryError> {
            self.check()?;
            self.sessions.lock().unwrap().insert(session.id.clone(), session);
            Ok(())
        }

        async fn get_session(
            &self,
            id: &SessionId,
        ) -> Result<Option<VotingSession>, RepositoryError> {
            Ok(self.sessions.lock().unwrap().get(id).cloned())
        }

        async fn update_session(&self, session: VotingSession) -> Result<(), RepositoryError> {
            if self.stuck.lock().unwrap().as_ref() == Some(&session.id) {
                return Err(RepositoryError::Storage("write timeout".to_string()));
            }
            self.insert_session(session).await
        }

        async fn list_sessions(
            &self,
            _group: Option<&GroupId>,
        ) -> Result<Vec<VotingSession>, RepositoryError> {
            Ok(self.sessions.lock().unwrap().values().cloned().collect())
        }

        async fn get_vote(
            &self,
            session: &SessionId,
            voter: &MemberId,
        ) -> Result<Option<Vote>, RepositoryError> {
            Ok(self
                .votes
                .lock()
                .unwrap()
                .iter()
                .find(|v| &v.session_id == session && &v.voter_id == voter)
                .cloned())
        }

        async fn upsert_vote(&self, vote: Vote) -> Result<Option<Vote>, RepositoryError> {
            self.check()?;
            let mut votes = self.votes.lock().unwrap();
            let previous = votes
                .iter()
                .position(|v| v.session_id == vote.session_id && v.voter_id == vote.voter_id)
                .map(|i| votes.remove(i));
            votes.push(vote);
            Ok(previous)
        }

        async fn votes(&self, session: &SessionId) -> Result<Vec<Vote>, RepositoryError> {
            Ok(self
                .votes
                .lock()
                .unwrap()
                .iter()
                .filter(|v| &v.session_id == session)
                .cloned()
                .collect())
        }
    }

    struct NoWorkflows;

    #[async_trait]
    impl WorkflowRepository for NoWorkflows {
        async fn insert_workflow(&self, _workflow: Workflow) -> Result<(), RepositoryError> {
            Err(RepositoryError::Storage("read-only".to_string()))
        }

        async fn get_workflow(&self, _id: &WorkflowId) -> Result<Option<Workflow>, RepositoryError> {
            Ok(None)
        }

        async fn update_workflow(&self, _workflow: Workflow) -> Result<(), RepositoryError> {
            Err(RepositoryError::Storage("read-only".to_string()))
        }

        async fn list_workflows(
            &self,
            _group: Option<&GroupId>,
        ) -> Result<Vec<Workflow>, RepositoryError> {
            Ok(Vec::new())
        }
    }

    /// Two voters, `admin` is the admin; `offline` makes every call fail.
    struct Directory {
        offline: AtomicBool,
    }

    #[async_trait]
    impl MembershipPort for Directory {
        async fn eligible_voters(&self, _group: &GroupId) -> Result<Vec<MemberId>, MembershipError> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(MembershipError::Unavailable("timeout".to_string()));
            }
            Ok(vec![MemberId::new("admin"), MemberId::new("bob")])
        }

        async fn is_group_admin(
            &self,
            _group: &GroupId,
            member: &MemberId,
        ) -> Result<bool, MembershipError> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(MembershipError::Unavailable("timeout".to_string()));
            }
            Ok(member.as_str() == "admin")
        }
    }

    struct Fixture {
        coordinator: GovernanceCoordinator<FlakySessions, NoWorkflows, Directory>,
        sessions: Arc<FlakySessions>,
        directory: Arc<Directory>,
        events: Arc<EventRecorder>,
        clock: Arc<ManualClock>,
    }

    fn fixture() -> Fixture {
        let sessions = Arc::new(FlakySessions::default());
        let directory = Arc::new(Directory {
            offline: AtomicBool::new(false),
        });
        let events = Arc::new(EventRecorder::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let coordinator = GovernanceCoordinator::new(
            Arc::clone(&sessions),
            Arc::new(NoWorkflows),
            Arc::clone(&directory),
        )
        .with_events(events.clone())
        .with_clock(clock.clone());

        Fixture {
            coordinator,
            sessions,
            directory,
            events,
            clock,
        }
    }

    fn spec() -> SessionSpec {
        SessionSpec::new(GroupId::new("g"), "Budget", SessionKind::Decision)
            .with_option(VoteOption::new("x", "Approve"))
            .with_option(VoteOption::new("y", "Reject"))
    }

    #[tokio::test]
    async fn test_failed_write_publishes_nothing() {
        let f = fixture();
        let session = f.coordinator.create_session(spec()).await.unwrap();
        f.events.drain();

        f.sessions.fail_writes.store(true, Ordering::SeqCst);
        let err = f
            .coordinator
            .cast_vote(&session.id, &MemberId::new("bob"), &[OptionId::new("x")])
            .await
            .unwrap_err();
        assert_eq!(err.code(), "storage_failure");

        let err = f
            .coordinator
            .close_session(&session.id, &MemberId::new("admin"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoordinatorError::Repository(_)));

        assert!(f.events.events().is_empty());
        let stored = f.coordinator.get_session(&session.id).await.unwrap();
        assert_eq!(stored.session.status, SessionStatus::Active);
        assert_eq!(stored.tally.total_voters, 0);
    }

    #[tokio::test]
    async fn test_membership_outage_is_surfaced() {
        let f = fixture();
        let session = f.coordinator.create_session(spec()).await.unwrap();

        f.directory.offline.store(true, Ordering::SeqCst);
        let err = f.coordinator.create_session(spec()).await.unwrap_err();
        assert_eq!(err.code(), "membership_unavailable");
        assert!(err.as_governance().is_none());

        let err = f
            .coordinator
            .close_session(&session.id, &MemberId::new("admin"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "membership_unavailable");

        // Voting runs off the snapshot and needs no directory
        f.coordinator
            .cast_vote(&session.id, &MemberId::new("bob"), &[OptionId::new("y")])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_expired_close_needs_no_directory() {
        let f = fixture();
        let deadline = f.clock.now() + Duration::hours(1);
        let session = f
            .coordinator
            .create_session(spec().with_deadline(deadline))
            .await
            .unwrap();

        f.clock.advance(Duration::hours(2));
        f.directory.offline.store(true, Ordering::SeqCst);
        let outcome = f
            .coordinator
            .close_session(&session.id, &MemberId::new("bob"))
            .await
            .unwrap();
        assert_eq!(outcome.session.close_reason, Some(CloseReason::DeadlineExpired));
        assert_eq!(f.events.event_types().last(), Some(&"session_closed"));
    }

    #[tokio::test]
    async fn test_sweep_skips_a_session_it_cannot_store() {
        let f = fixture();
        let deadline = f.clock.now() + Duration::minutes(5);
        let stuck = f
            .coordinator
            .create_session(spec().with_deadline(deadline))
            .await
            .unwrap();
        let healthy = f
            .coordinator
            .create_session(spec().with_deadline(deadline))
            .await
            .unwrap();
        f.events.drain();

        f.clock.advance(Duration::minutes(10));
        *f.sessions.stuck.lock().unwrap() = Some(stuck.id.clone());

        let closed = f.coordinator.close_expired_sessions().await.unwrap();
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].session.id, healthy.id);
        assert_eq!(f.events.event_types(), vec!["session_closed"]);

        let view = f.coordinator.get_session(&stuck.id).await.unwrap();
        assert_eq!(view.session.status, SessionStatus::Active);

        // Picked up on the next pass once storage recovers
        *f.sessions.stuck.lock().unwrap() = None;
        let closed = f.coordinator.close_expired_sessions().await.unwrap();
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].session.id, stuck.id);
    }

    #[tokio::test]
    async fn test_unknown_ids() {
        let f = fixture();
        let err = f
            .coordinator
            .get_session(&SessionId::new("nope"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "unknown_entity");

        let err = f
            .coordinator
            .workflow_progress(&WorkflowId::new("nope"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_governance(),
            Some(GovernanceError::UnknownEntity {
                kind: EntityKind::Workflow,
                ..
            })
        ));
    }
}
