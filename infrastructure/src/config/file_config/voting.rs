//! Voting configuration from TOML (`[voting]` section)
//!
//! ```toml
//! [voting]
//! revote_policy = "replace"   # or "lock_after_first"
//! ```

use governance_domain::{ConfigIssue, ConfigIssueCode, RevotePolicy};
use serde::{Deserialize, Serialize};

/// Raw voting configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVotingConfig {
    /// "replace" or "lock_after_first"
    pub revote_policy: String,
}

impl Default for FileVotingConfig {
    fn default() -> Self {
        Self {
            revote_policy: RevotePolicy::default().as_str().to_string(),
        }
    }
}

impl FileVotingConfig {
    /// Parse `revote_policy`, falling back to `replace` with a warning.
    pub fn parse_revote_policy(&self) -> (RevotePolicy, Vec<ConfigIssue>) {
        match self.revote_policy.parse::<RevotePolicy>() {
            Ok(policy) => (policy, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "voting.revote_policy".to_string(),
                        value: self.revote_policy.clone(),
                        valid_values: vec![
                            "replace".to_string(),
                            "lock_after_first".to_string(),
                        ],
                    },
                    format!(
                        "voting.revote_policy: unknown value '{}', falling back to 'replace'",
                        self.revote_policy
                    ),
                );
                (RevotePolicy::default(), vec![issue])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_revote_policy() {
        let config = FileVotingConfig {
            revote_policy: "lock_after_first".to_string(),
        };
        let (policy, issues) = config.parse_revote_policy();
        assert_eq!(policy, RevotePolicy::LockAfterFirst);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_unknown_policy_falls_back_with_warning() {
        let config = FileVotingConfig {
            revote_policy: "sometimes".to_string(),
        };
        let (policy, issues) = config.parse_revote_policy();
        assert_eq!(policy, RevotePolicy::Replace);
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
    }
}
