//! Vote records and the re-vote policy
//!
//! At most one live [`Vote`] exists per `(session, voter)` pair. Casting again
//! replaces the previous record under [`RevotePolicy::Replace`].

use crate::core::ids::{MemberId, OptionId, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single participant's ballot in a voting session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub session_id: SessionId,
    pub voter_id: MemberId,
    /// Selected option ids (1..=max_selections entries)
    pub selections: BTreeSet<OptionId>,
    pub cast_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(
        session_id: SessionId,
        voter_id: MemberId,
        selections: BTreeSet<OptionId>,
        cast_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id,
            voter_id,
            selections,
            cast_at,
        }
    }

    /// Check whether this vote selects the given option.
    pub fn selects(&self, option: &OptionId) -> bool {
        self.selections.contains(option)
    }
}

/// Whether a participant may change their vote while the session is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevotePolicy {
    /// Re-voting replaces the prior vote until the session closes
    #[default]
    Replace,
    /// The first vote is final
    LockAfterFirst,
}

impl RevotePolicy {
    pub fn as_str(&self) -> &str {
        match self {
            RevotePolicy::Replace => "replace",
            RevotePolicy::LockAfterFirst => "lock_after_first",
        }
    }
}

impl std::fmt::Display for RevotePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RevotePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "replace" => Ok(RevotePolicy::Replace),
            "lock_after_first" | "lock" => Ok(RevotePolicy::LockAfterFirst),
            _ => Err(format!(
                "Unknown re-vote policy: {}. Valid: replace, lock_after_first",
                s
            )),
        }
    }
}
