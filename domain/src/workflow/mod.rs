//! Workflow domain
//!
//! A workflow is an ordered list of steps fixed at creation. Steps advance
//! through `pending → in_progress → completed | failed`, and `reset` returns
//! a finished or failed step to `pending`.
//!
//! - [`step`] - the step entity, its status and the transition actions
//! - [`graph`] - the workflow entity, ordering rule and progress

pub mod graph;
pub mod step;

pub use graph::{OrderingWarning, StepTransition, Workflow, WorkflowProgress};
pub use step::{StepAction, StepSpec, StepStatus, WorkflowStep};
