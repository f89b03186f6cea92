//! Voting-session operations of the coordinator.

use super::GovernanceCoordinator;
use super::types::{CastVoteOutput, CloseOutcome, CoordinatorError, SessionView};
use crate::ports::membership::MembershipPort;
use crate::ports::repository::{SessionRepository, WorkflowRepository};
use chrono::{DateTime, Utc};
use governance_domain::{
    CloseReason, GovernanceError, GovernanceEvent, GroupId, MemberId, OptionId, RevotePolicy,
    SessionId, SessionSpec, TallyResult, Vote, VotingSession, tally,
};
use tracing::{debug, info, warn};

impl<S, W, M> GovernanceCoordinator<S, W, M>
where
    S: SessionRepository + 'static,
    W: WorkflowRepository + 'static,
    M: MembershipPort + 'static,
{
    /// Open a new session for `spec.group_id`.
    ///
    /// The group's current eligible voters are snapshotted into the session;
    /// later membership changes do not affect its quorum arithmetic.
    pub async fn create_session(&self, spec: SessionSpec) -> Result<VotingSession, CoordinatorError> {
        let now = self.clock.now();
        let voters = self.membership.eligible_voters(&spec.group_id).await?;
        let session = VotingSession::create(SessionId::generate(), spec, voters, now)?;

        self.sessions.insert_session(session.clone()).await?;

        info!(
            "Created {} session {} for group {} ({} eligible voters)",
            session.kind,
            session.id,
            session.group_id,
            session.eligible_voter_count()
        );
        self.publish(GovernanceEvent::SessionCreated {
            session_id: session.id.clone(),
            group_id: session.group_id.clone(),
            kind: session.kind,
            title: session.title.clone(),
            eligible_voter_count: session.eligible_voter_count(),
            deadline: session.deadline,
        });

        Ok(session)
    }

    /// Cast or replace `voter`'s vote.
    ///
    /// A session found past its deadline is closed first, and the vote is
    /// then rejected with `SessionNotActive`.
    pub async fn cast_vote(
        &self,
        session_id: &SessionId,
        voter: &MemberId,
        selections: &[OptionId],
    ) -> Result<CastVoteOutput, CoordinatorError> {
        let _guard = self.session_locks.acquire(session_id).await;
        let now = self.clock.now();
        let session = self.load_session(session_id).await?;

        if session.needs_expiry(now) {
            let outcome = self
                .close_locked(session, CloseReason::DeadlineExpired, now)
                .await?;
            debug!("Rejected late vote by {} on {}", voter, session_id);
            return Err(GovernanceError::SessionNotActive {
                session_id: session_id.clone(),
                status: outcome.session.status,
            }
            .into());
        }

        let vote = session.admit_vote(voter, selections, now)?;

        if self.config.revote_policy == RevotePolicy::LockAfterFirst
            && self.sessions.get_vote(session_id, voter).await?.is_some()
        {
            return Err(GovernanceError::VoteLocked(voter.clone()).into());
        }

        let replaced = self.sessions.upsert_vote(vote.clone()).await?.is_some();

        if replaced {
            info!("Voter {} replaced their vote on {}", voter, session_id);
        } else {
            info!("Voter {} voted on {}", voter, session_id);
        }
        self.publish(GovernanceEvent::VoteCast {
            session_id: session_id.clone(),
            voter_id: voter.clone(),
            replaced,
        });

        Ok(CastVoteOutput { vote, replaced })
    }

    /// Close a session on behalf of `closed_by`, who must be a group admin.
    ///
    /// A session already past its deadline is closed by expiry whoever the
    /// caller is, without consulting the membership directory.
    pub async fn close_session(
        &self,
        session_id: &SessionId,
        closed_by: &MemberId,
    ) -> Result<CloseOutcome, CoordinatorError> {
        let _guard = self.session_locks.acquire(session_id).await;
        let now = self.clock.now();
        let session = self.load_session(session_id).await?;

        if session.status.is_terminal() {
            return Err(GovernanceError::SessionNotActive {
                session_id: session_id.clone(),
                status: session.status,
            }
            .into());
        }

        if session.needs_expiry(now) {
            debug!("Close of {} by {} found it expired", session_id, closed_by);
            return self
                .close_locked(session, CloseReason::DeadlineExpired, now)
                .await;
        }

        if !self
            .membership
            .is_group_admin(&session.group_id, closed_by)
            .await?
        {
            warn!("{} tried to close {} without admin rights", closed_by, session_id);
            return Err(GovernanceError::NotAuthorized(closed_by.clone()).into());
        }

        let reason = CloseReason::Manual {
            closed_by: closed_by.clone(),
        };
        self.close_locked(session, reason, now).await
    }

    /// Close every active session whose deadline has passed.
    ///
    /// Meant for a periodic scheduler; deadlines are also enforced lazily on
    /// each mutating call, so correctness never depends on this running.
    /// A session that fails to close is logged and left for the next pass.
    pub async fn close_expired_sessions(&self) -> Result<Vec<CloseOutcome>, CoordinatorError> {
        let now = self.clock.now();
        let candidates: Vec<SessionId> = self
            .sessions
            .list_sessions(None)
            .await?
            .into_iter()
            .filter(|s| s.needs_expiry(now))
            .map(|s| s.id)
            .collect();

        let mut closed = Vec::with_capacity(candidates.len());
        for id in candidates {
            match self.close_if_expired(&id, now).await {
                Ok(Some(outcome)) => closed.push(outcome),
                Ok(None) => {}
                Err(e) => warn!("Could not close expired session {}: {}", id, e),
            }
        }

        if !closed.is_empty() {
            info!("Closed {} expired session(s)", closed.len());
        }
        Ok(closed)
    }

    /// Session record plus its final or live tally. Never mutates state.
    pub async fn get_session(&self, session_id: &SessionId) -> Result<SessionView, CoordinatorError> {
        let session = self.load_session(session_id).await?;
        let current = match &session.result {
            Some(result) => result.clone(),
            None => {
                let votes = self.sessions.votes(session_id).await?;
                tally(&session, &votes)
            }
        };
        let accepting_votes = session.accepts_votes(self.clock.now());

        Ok(SessionView {
            session,
            tally: current,
            accepting_votes,
        })
    }

    /// Live tally computed from the stored votes.
    pub async fn preview_tally(&self, session_id: &SessionId) -> Result<TallyResult, CoordinatorError> {
        Ok(self.get_session(session_id).await?.tally)
    }

    pub async fn list_sessions(
        &self,
        group: Option<&GroupId>,
    ) -> Result<Vec<VotingSession>, CoordinatorError> {
        Ok(self.sessions.list_sessions(group).await?)
    }

    /// The live vote of `voter`, if any.
    pub async fn get_vote(
        &self,
        session_id: &SessionId,
        voter: &MemberId,
    ) -> Result<Option<Vote>, CoordinatorError> {
        self.load_session(session_id).await?;
        Ok(self.sessions.get_vote(session_id, voter).await?)
    }

    async fn close_if_expired(
        &self,
        id: &SessionId,
        now: DateTime<Utc>,
    ) -> Result<Option<CloseOutcome>, CoordinatorError> {
        let _guard = self.session_locks.acquire(id).await;
        // Re-read under the lock; a concurrent call may have closed it.
        let session = self.load_session(id).await?;
        if !session.needs_expiry(now) {
            return Ok(None);
        }
        self.close_locked(session, CloseReason::DeadlineExpired, now)
            .await
            .map(Some)
    }

    /// Tally, store and announce the close. Caller must hold the session lock.
    async fn close_locked(
        &self,
        mut session: VotingSession,
        reason: CloseReason,
        now: DateTime<Utc>,
    ) -> Result<CloseOutcome, CoordinatorError> {
        let votes = self.sessions.votes(&session.id).await?;
        let result = session.close(&votes, reason.clone(), now)?;

        self.sessions.update_session(session.clone()).await?;

        info!(
            "Session {} {} ({}): {}/{} voted, quorum {}",
            session.id,
            session.status,
            reason,
            result.total_voters,
            result.eligible_voter_count,
            if result.quorum_met { "met" } else { "missed" }
        );
        self.publish(GovernanceEvent::SessionClosed {
            session_id: session.id.clone(),
            group_id: session.group_id.clone(),
            status: session.status,
            reason,
            result: result.clone(),
        });

        Ok(CloseOutcome { session, result })
    }
}
