//! Membership service port
//!
//! The membership service owns groups, their members and admin roles. The
//! coordinator only asks two questions of it: who may vote in a group right
//! now (snapshotted into each new session), and whether a member is allowed
//! to close a session.

use async_trait::async_trait;
use governance_domain::{GroupId, MemberId};
use thiserror::Error;

/// Errors reported by a membership adapter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MembershipError {
    #[error("Unknown group: {0}")]
    UnknownGroup(GroupId),

    #[error("Membership service unavailable: {0}")]
    Unavailable(String),
}

/// Port for querying group membership.
#[async_trait]
pub trait MembershipPort: Send + Sync {
    /// Members currently eligible to vote in `group`.
    async fn eligible_voters(&self, group: &GroupId) -> Result<Vec<MemberId>, MembershipError>;

    /// Whether `member` is an admin of `group`.
    async fn is_group_admin(
        &self,
        group: &GroupId,
        member: &MemberId,
    ) -> Result<bool, MembershipError>;
}
