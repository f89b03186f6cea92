//! Workflow configuration from TOML (`[workflow]` section)

use serde::{Deserialize, Serialize};

/// Raw workflow configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWorkflowConfig {
    /// Log a warning when a reset leaves later steps ahead of earlier ones
    pub warn_out_of_order: bool,
}

impl Default for FileWorkflowConfig {
    fn default() -> Self {
        Self {
            warn_out_of_order: true,
        }
    }
}
