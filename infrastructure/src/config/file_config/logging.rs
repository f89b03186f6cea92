//! Logging configuration from TOML (`[logging]` section)
//!
//! ```toml
//! [logging]
//! event_log = "~/.local/share/governance-engine/events.jsonl"
//! file = "/var/log/governance-engine/engine.log"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL activity log receiving every domain event
    pub event_log: Option<String>,
    /// Diagnostic log file, rotated daily
    pub file: Option<String>,
}

impl FileLoggingConfig {
    pub fn event_log_path(&self) -> Option<PathBuf> {
        self.event_log.as_deref().map(expand_home)
    }

    pub fn file_path(&self) -> Option<PathBuf> {
        self.file.as_deref().map(expand_home)
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}
