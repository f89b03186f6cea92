//! Membership directory backed by the `[[groups]]` configuration.
//!
//! Rosters can be edited at runtime (members joining or leaving), which is
//! how the eligible-voter snapshot taken at session creation is observable.

use crate::config::FileGroupConfig;
use async_trait::async_trait;
use governance_application::{MembershipError, MembershipPort};
use governance_domain::{GroupId, MemberId};
use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

#[derive(Debug, Clone, Default)]
struct Roster {
    /// Join order is kept so eligible voters list deterministically
    members: Vec<MemberId>,
    admins: BTreeSet<MemberId>,
}

/// In-process membership directory.
#[derive(Debug, Default)]
pub struct StaticMembership {
    groups: RwLock<HashMap<GroupId, Roster>>,
}

impl StaticMembership {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the directory from `[[groups]]` entries. A later duplicate id
    /// replaces an earlier one; config validation reports duplicates.
    pub fn from_config(groups: &[FileGroupConfig]) -> Self {
        let directory = Self::new();
        for group in groups {
            directory.put_group(
                GroupId::new(group.id.as_str()),
                group.members.iter().map(|m| MemberId::new(m.as_str())),
                group.admins.iter().map(|a| MemberId::new(a.as_str())),
            );
        }
        directory
    }

    /// Builder form of [`put_group`](Self::put_group).
    pub fn with_group<M, A>(self, group: impl Into<GroupId>, members: M, admins: A) -> Self
    where
        M: IntoIterator,
        M::Item: Into<MemberId>,
        A: IntoIterator,
        A::Item: Into<MemberId>,
    {
        self.put_group(
            group.into(),
            members.into_iter().map(Into::into),
            admins.into_iter().map(Into::into),
        );
        self
    }

    /// Create or replace a group's roster.
    pub fn put_group(
        &self,
        group: GroupId,
        members: impl IntoIterator<Item = MemberId>,
        admins: impl IntoIterator<Item = MemberId>,
    ) {
        let mut roster = Roster::default();
        for member in members {
            if !roster.members.contains(&member) {
                roster.members.push(member);
            }
        }
        roster.admins = admins.into_iter().collect();

        let mut groups = self.groups.write().unwrap_or_else(|e| e.into_inner());
        groups.insert(group, roster);
    }

    /// Add a member to an existing group. Returns `false` for unknown groups.
    pub fn add_member(&self, group: &GroupId, member: MemberId) -> bool {
        let mut groups = self.groups.write().unwrap_or_else(|e| e.into_inner());
        match groups.get_mut(group) {
            Some(roster) => {
                if !roster.members.contains(&member) {
                    roster.members.push(member);
                }
                true
            }
            None => false,
        }
    }

    /// Remove a member (and any admin role) from a group.
    pub fn remove_member(&self, group: &GroupId, member: &MemberId) -> bool {
        let mut groups = self.groups.write().unwrap_or_else(|e| e.into_inner());
        match groups.get_mut(group) {
            Some(roster) => {
                roster.admins.remove(member);
                let before = roster.members.len();
                roster.members.retain(|m| m != member);
                roster.members.len() != before
            }
            None => false,
        }
    }

    pub fn group_count(&self) -> usize {
        self.groups.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl MembershipPort for StaticMembership {
    async fn eligible_voters(&self, group: &GroupId) -> Result<Vec<MemberId>, MembershipError> {
        let groups = self.groups.read().unwrap_or_else(|e| e.into_inner());
        groups
            .get(group)
            .map(|roster| roster.members.clone())
            .ok_or_else(|| MembershipError::UnknownGroup(group.clone()))
    }

    async fn is_group_admin(
        &self,
        group: &GroupId,
        member: &MemberId,
    ) -> Result<bool, MembershipError> {
        let groups = self.groups.read().unwrap_or_else(|e| e.into_inner());
        groups
            .get(group)
            .map(|roster| roster.admins.contains(member))
            .ok_or_else(|| MembershipError::UnknownGroup(group.clone()))
    }
}
