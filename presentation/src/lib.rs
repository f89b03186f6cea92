//! Presentation layer for governance-engine
//!
//! This crate contains the transport-neutral request/response API, CLI
//! definitions and output formatters.

pub mod api;
pub mod cli;
pub mod output;

// Re-export commonly used types
pub use api::{
    ErrorBody, GovernanceRequest, GovernanceResponse, RequestDispatcher, ResponseBody,
    parse_script,
};
pub use cli::commands::{Cli, OutputFormat};
pub use output::{ConsoleFormatter, JsonFormatter, ResponseFormatter, formatter_for};
