//! Static group membership from TOML (`[[groups]]` tables)
//!
//! ```toml
//! [[groups]]
//! id = "founders"
//! members = ["alice", "bob", "carol"]
//! admins = ["alice"]
//! ```

use governance_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One group of the static membership directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGroupConfig {
    pub id: String,
    /// Members eligible to vote
    pub members: Vec<String>,
    /// Members allowed to close sessions manually
    pub admins: Vec<String>,
}

/// Check the `[[groups]]` list for duplicates, empty rosters and stray admins.
pub(crate) fn validate_groups(groups: &[FileGroupConfig]) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for group in groups {
        if !seen.insert(group.id.as_str()) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::DuplicateGroup {
                    group_id: group.id.clone(),
                },
                format!("groups: '{}' is defined more than once", group.id),
            ));
        }

        if group.members.is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::EmptyGroup {
                    group_id: group.id.clone(),
                },
                format!("groups.{}: no members, sessions cannot be opened", group.id),
            ));
        }

        for admin in &group.admins {
            if !group.members.contains(admin) {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::AdminNotMember {
                        group_id: group.id.clone(),
                        member_id: admin.clone(),
                    },
                    format!(
                        "groups.{}: admin '{}' is not listed as a member",
                        group.id, admin
                    ),
                ));
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(id: &str, members: &[&str], admins: &[&str]) -> FileGroupConfig {
        FileGroupConfig {
            id: id.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
            admins: admins.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn test_valid_groups_have_no_issues() {
        let groups = vec![group("a", &["x", "y"], &["x"]), group("b", &["z"], &[])];
        assert!(validate_groups(&groups).is_empty());
    }

    #[test]
    fn test_duplicate_group_is_an_error() {
        let groups = vec![group("a", &["x"], &[]), group("a", &["y"], &[])];
        let issues = validate_groups(&groups);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
        assert!(matches!(
            issues[0].code,
            ConfigIssueCode::DuplicateGroup { .. }
        ));
    }

    #[test]
    fn test_admin_outside_roster_and_empty_group_warn() {
        let issues = validate_groups(&[group("a", &[], &["boss"])]);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| !i.is_error()));
        assert!(issues.iter().any(|i| matches!(
            &i.code,
            ConfigIssueCode::AdminNotMember { member_id, .. } if member_id == "boss"
        )));
    }
}
