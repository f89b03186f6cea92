//! Application layer for governance-engine
//!
//! This crate contains the governance coordinator use case, the ports it
//! drives, and application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::CoordinatorConfig;
pub use ports::{
    clock::{Clock, ManualClock, SystemClock},
    event_publisher::{EventPublisher, EventRecorder, FanoutPublisher, NoEvents},
    membership::{MembershipError, MembershipPort},
    repository::{RepositoryError, SessionRepository, WorkflowRepository},
};
pub use use_cases::coordinator::{
    CastVoteOutput, CloseOutcome, CoordinatorError, GovernanceCoordinator, SessionView,
    TransitionOutput, WorkflowView,
};
