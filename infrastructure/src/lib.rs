//! Infrastructure layer for governance-engine
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod membership;
pub mod persistence;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigSource, FileConfig, FileGroupConfig, FileLoggingConfig, FileVotingConfig,
    FileWorkflowConfig,
};
pub use logging::{JsonlEventLog, TracingEventPublisher};
pub use membership::StaticMembership;
pub use persistence::{InMemorySessionRepository, InMemoryWorkflowRepository};
