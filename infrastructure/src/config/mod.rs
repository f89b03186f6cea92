//! Configuration file loading for governance-engine
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `GOVERNANCE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./governance.toml` or `./.governance.toml`
//! 4. Global: `$XDG_CONFIG_HOME/governance-engine/config.toml`
//!    (fallback `~/.config/governance-engine/config.toml`)
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileGroupConfig, FileLoggingConfig, FileVotingConfig, FileWorkflowConfig,
};
pub use loader::{ConfigLoader, ConfigSource};
