//! Coordinator behaviour settings.

use governance_domain::RevotePolicy;

/// Controls policy decisions the coordinator makes on behalf of callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Whether a voter may replace their vote while a session is active
    pub revote_policy: RevotePolicy,
    /// Log a warning when a reset leaves later steps ahead of earlier ones
    pub warn_out_of_order: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            revote_policy: RevotePolicy::Replace,
            warn_out_of_order: true,
        }
    }
}

impl CoordinatorConfig {
    pub fn with_revote_policy(mut self, policy: RevotePolicy) -> Self {
        self.revote_policy = policy;
        self
    }

    pub fn with_out_of_order_warnings(mut self, enabled: bool) -> Self {
        self.warn_out_of_order = enabled;
        self
    }
}
