//! Transport-neutral request/response API over the coordinator.
//!
//! A transport (HTTP, RPC, the script runner in the binary) deserializes a
//! [`GovernanceRequest`], hands it to a [`RequestDispatcher`], and renders
//! the [`GovernanceResponse`]. No business rule lives here.

pub mod dispatcher;
pub mod request;
pub mod response;

pub use dispatcher::RequestDispatcher;
pub use request::{GovernanceRequest, parse_script};
pub use response::{ErrorBody, GovernanceResponse, ResponseBody, hint_for};
