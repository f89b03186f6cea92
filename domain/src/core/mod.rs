//! Core domain concepts shared across all subdomains.
//!
//! - [`ids`] - typed identifiers for groups, members, sessions and workflows
//! - [`error::GovernanceError`] - domain-level errors

pub mod error;
pub mod ids;
