//! Voting session entity and its state machine
//!
//! ```text
//!            ┌──── quorum met ────▶ Completed
//!  Active ───┤
//!            └── quorum missed ───▶ Cancelled
//! ```
//!
//! Both closed states are terminal. The option list, selection bound, quorum
//! and eligible-voter snapshot are fixed when the session is created.

use super::quorum::QuorumThreshold;
use super::tally::{TallyResult, tally};
use super::vote::Vote;
use crate::core::error::GovernanceError;
use crate::core::ids::{GroupId, MemberId, OptionId, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What the session decides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    /// A single-choice group decision
    Decision,
    /// Electing admins; the only kind allowing several selections per vote
    AdminElection,
    /// Approving or rejecting a contract
    ContractApproval,
}

impl SessionKind {
    pub fn as_str(&self) -> &str {
        match self {
            SessionKind::Decision => "decision",
            SessionKind::AdminElection => "admin_election",
            SessionKind::ContractApproval => "contract_approval",
        }
    }

    /// Whether a vote may select more than one option
    pub fn allows_multi_select(&self) -> bool {
        matches!(self, SessionKind::AdminElection)
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Cancelled)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A candidate or choice in a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOption {
    pub id: OptionId,
    pub label: String,
}

impl VoteOption {
    pub fn new(id: impl Into<OptionId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Why a session was closed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CloseReason {
    /// Closed explicitly by a group admin or the coordinator
    Manual { closed_by: MemberId },
    /// Closed because the deadline passed
    DeadlineExpired,
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CloseReason::Manual { closed_by } => write!(f, "closed by {}", closed_by),
            CloseReason::DeadlineExpired => write!(f, "deadline expired"),
        }
    }
}

fn default_max_selections() -> usize {
    1
}

fn default_quorum() -> u8 {
    50
}

/// Caller-supplied description of a session to create.
///
/// The eligible voters are not part of a `SessionSpec`; they are a snapshot taken
/// from the membership service at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSpec {
    pub group_id: GroupId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub kind: SessionKind,
    pub options: Vec<VoteOption>,
    #[serde(default = "default_max_selections")]
    pub max_selections: usize,
    #[serde(default = "default_quorum")]
    pub quorum_required_pct: u8,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

impl SessionSpec {
    pub fn new(group_id: GroupId, title: impl Into<String>, kind: SessionKind) -> Self {
        Self {
            group_id,
            title: title.into(),
            description: String::new(),
            kind,
            options: Vec::new(),
            max_selections: default_max_selections(),
            quorum_required_pct: default_quorum(),
            deadline: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_option(mut self, option: VoteOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn with_max_selections(mut self, max: usize) -> Self {
        self.max_selections = max;
        self
    }

    pub fn with_quorum(mut self, percent: u8) -> Self {
        self.quorum_required_pct = percent;
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// A group decision being voted on (Entity).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotingSession {
    pub id: SessionId,
    pub group_id: GroupId,
    pub title: String,
    pub description: String,
    pub kind: SessionKind,
    pub options: Vec<VoteOption>,
    pub max_selections: usize,
    pub quorum: QuorumThreshold,
    /// Members allowed to vote, snapshotted at creation
    pub eligible_voters: BTreeSet<MemberId>,
    pub deadline: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub close_reason: Option<CloseReason>,
    /// Final tally, recorded when the session closes
    pub result: Option<TallyResult>,
}

impl VotingSession {
    /// Validates `spec` and creates an active session.
    pub fn create(
        id: SessionId,
        spec: SessionSpec,
        eligible_voters: impl IntoIterator<Item = MemberId>,
        now: DateTime<Utc>,
    ) -> Result<Self, GovernanceError> {
        let invalid = |msg: String| Err(GovernanceError::InvalidSessionSpec(msg));

        if spec.title.trim().is_empty() {
            return invalid("title must not be empty".to_string());
        }
        if spec.options.is_empty() {
            return invalid("at least one option is required".to_string());
        }

        let mut seen = BTreeSet::new();
        for option in &spec.options {
            if !seen.insert(&option.id) {
                return invalid(format!("duplicate option id '{}'", option.id));
            }
        }

        if spec.max_selections == 0 || spec.max_selections > spec.options.len() {
            return invalid(format!(
                "max_selections must be between 1 and {}, got {}",
                spec.options.len(),
                spec.max_selections
            ));
        }
        if spec.max_selections > 1 && !spec.kind.allows_multi_select() {
            return invalid(format!(
                "{} sessions allow a single selection per vote",
                spec.kind
            ));
        }

        let quorum = match QuorumThreshold::new(spec.quorum_required_pct) {
            Ok(q) => q,
            Err(msg) => return invalid(msg),
        };

        let eligible_voters: BTreeSet<MemberId> = eligible_voters.into_iter().collect();
        if eligible_voters.is_empty() {
            return invalid("the group has no eligible voters".to_string());
        }

        if let Some(deadline) = spec.deadline
            && deadline < now
        {
            return invalid(format!("deadline {} is already in the past", deadline));
        }

        Ok(Self {
            id,
            group_id: spec.group_id,
            title: spec.title,
            description: spec.description,
            kind: spec.kind,
            options: spec.options,
            max_selections: spec.max_selections,
            quorum,
            eligible_voters,
            deadline: spec.deadline,
            status: SessionStatus::Active,
            created_at: now,
            closed_at: None,
            close_reason: None,
            result: None,
        })
    }

    /// Size of the eligible-voter snapshot
    pub fn eligible_voter_count(&self) -> usize {
        self.eligible_voters.len()
    }

    pub fn is_eligible(&self, voter: &MemberId) -> bool {
        self.eligible_voters.contains(voter)
    }

    pub fn has_option(&self, option: &OptionId) -> bool {
        self.options.iter().any(|o| &o.id == option)
    }

    /// Whether the deadline has passed. A vote at the deadline instant is still on time.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.deadline.is_some_and(|deadline| now > deadline)
    }

    /// Active and not past its deadline.
    pub fn accepts_votes(&self, now: DateTime<Utc>) -> bool {
        self.status == SessionStatus::Active && !self.is_expired(now)
    }

    /// Active but past its deadline, i.e. due for an implicit close.
    pub fn needs_expiry(&self, now: DateTime<Utc>) -> bool {
        self.status == SessionStatus::Active && self.is_expired(now)
    }

    fn not_active(&self) -> GovernanceError {
        GovernanceError::SessionNotActive {
            session_id: self.id.clone(),
            status: self.status,
        }
    }

    /// Validate a ballot and build the vote record to store.
    pub fn admit_vote(
        &self,
        voter: &MemberId,
        selections: &[OptionId],
        now: DateTime<Utc>,
    ) -> Result<Vote, GovernanceError> {
        if !self.accepts_votes(now) {
            return Err(self.not_active());
        }

        let selections = self.validate_selections(selections)?;

        if !self.is_eligible(voter) {
            return Err(GovernanceError::NotEligible(voter.clone()));
        }

        Ok(Vote::new(self.id.clone(), voter.clone(), selections, now))
    }

    /// Check selection count, duplicates and option ids.
    pub fn validate_selections(
        &self,
        selections: &[OptionId],
    ) -> Result<BTreeSet<OptionId>, GovernanceError> {
        if selections.is_empty() {
            return Err(GovernanceError::InvalidSelectionCount(
                "a vote must select at least one option".to_string(),
            ));
        }
        if selections.len() > self.max_selections {
            return Err(GovernanceError::InvalidSelectionCount(format!(
                "{} selections exceed the maximum of {}",
                selections.len(),
                self.max_selections
            )));
        }

        let mut set = BTreeSet::new();
        for selection in selections {
            if !self.has_option(selection) {
                return Err(GovernanceError::InvalidSelectionCount(format!(
                    "unknown option '{}'",
                    selection
                )));
            }
            if !set.insert(selection.clone()) {
                return Err(GovernanceError::InvalidSelectionCount(format!(
                    "option '{}' selected more than once",
                    selection
                )));
            }
        }
        Ok(set)
    }

    /// Tally `votes` and move the session to its terminal state.
    ///
    /// The session completes when the quorum is met and is cancelled
    /// otherwise; a cancelled session cannot be reopened.
    pub fn close<'a>(
        &mut self,
        votes: impl IntoIterator<Item = &'a Vote>,
        reason: CloseReason,
        now: DateTime<Utc>,
    ) -> Result<TallyResult, GovernanceError> {
        if self.status.is_terminal() {
            return Err(self.not_active());
        }

        let result = tally(self, votes);
        self.status = if result.quorum_met {
            SessionStatus::Completed
        } else {
            SessionStatus::Cancelled
        };
        self.closed_at = Some(now);
        self.close_reason = Some(reason);
        self.result = Some(result.clone());
        Ok(result)
    }
}
