//! Application-level configuration.
//!
//! - [`CoordinatorConfig`] - policy knobs for the governance coordinator

pub mod coordinator_config;

pub use coordinator_config::CoordinatorConfig;
