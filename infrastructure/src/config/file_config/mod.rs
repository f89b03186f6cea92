//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Enumerated values stay strings here and are parsed with explicit
//! fallbacks, so a typo degrades to a reported issue instead of a load error.

mod groups;
mod logging;
mod voting;
mod workflow;

pub use groups::FileGroupConfig;
pub use logging::FileLoggingConfig;
pub use voting::FileVotingConfig;
pub use workflow::FileWorkflowConfig;

use governance_application::CoordinatorConfig;
use governance_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Vote casting policy
    pub voting: FileVotingConfig,
    /// Workflow behaviour
    pub workflow: FileWorkflowConfig,
    /// Activity log and diagnostic log destinations
    pub logging: FileLoggingConfig,
    /// Static membership directory
    pub groups: Vec<FileGroupConfig>,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks:
    /// 1. Enum parse failures (`voting.revote_policy`)
    /// 2. Duplicate group ids, empty groups, admins outside their group
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.voting.parse_revote_policy().1);
        issues.extend(groups::validate_groups(&self.groups));
        issues
    }

    /// Build the coordinator policy from this file.
    pub fn coordinator_config(&self) -> CoordinatorConfig {
        let (policy, _) = self.voting.parse_revote_policy();
        CoordinatorConfig::default()
            .with_revote_policy(policy)
            .with_out_of_order_warnings(self.workflow.warn_out_of_order)
    }
}
