//! Workflow entity: an ordered, immutable list of steps
//!
//! Steps run strictly in position order. A step may start only when it is
//! the first step, or when its immediate predecessor is completed and no
//! earlier step has failed.

use super::step::{StepAction, StepSpec, StepStatus, WorkflowStep};
use crate::core::error::{EntityKind, GovernanceError};
use crate::core::ids::{GroupId, StepId, WorkflowId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Completed / total step counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowProgress {
    pub completed: usize,
    pub total: usize,
}

impl WorkflowProgress {
    /// `completed / total * 100`
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 * 100.0 / self.total as f64
        }
    }

    /// Percentage rounded to the nearest whole number, for display
    pub fn rounded_percent(&self) -> u8 {
        self.percent().round() as u8
    }
}

/// A step that is active or done while an earlier step is not completed.
///
/// Resetting a step leaves downstream steps untouched, so this state is
/// reachable. It is reported, never rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderingWarning {
    pub step_id: StepId,
    pub status: StepStatus,
    pub predecessor_id: StepId,
    pub predecessor_status: StepStatus,
}

impl std::fmt::Display for OrderingWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "step {} is {} but earlier step {} is {}",
            self.step_id, self.status, self.predecessor_id, self.predecessor_status
        )
    }
}

/// Outcome of a successful transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTransition {
    pub step_id: StepId,
    pub action: StepAction,
    pub from: StepStatus,
    pub to: StepStatus,
    /// This completion left every step completed
    pub workflow_completed: bool,
}

/// A group's multi-phase process (Entity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: WorkflowId,
    pub group_id: GroupId,
    pub title: String,
    /// Ordered steps; position is significant and never changes
    pub steps: Vec<WorkflowStep>,
    pub created_at: DateTime<Utc>,
}

impl Workflow {
    /// Build a workflow from step specs. Step ids must be unique and at least
    /// one step is required.
    pub fn create(
        id: WorkflowId,
        group_id: GroupId,
        title: impl Into<String>,
        steps: Vec<StepSpec>,
        now: DateTime<Utc>,
    ) -> Result<Self, GovernanceError> {
        if steps.is_empty() {
            return Err(GovernanceError::InvalidWorkflowSpec(
                "a workflow needs at least one step".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for step in &steps {
            if !seen.insert(step.id.clone()) {
                return Err(GovernanceError::InvalidWorkflowSpec(format!(
                    "duplicate step id '{}'",
                    step.id
                )));
            }
        }

        Ok(Self {
            id,
            group_id,
            title: title.into(),
            steps: steps.into_iter().map(WorkflowStep::from).collect(),
            created_at: now,
        })
    }

    pub fn position(&self, step_id: &StepId) -> Option<usize> {
        self.steps.iter().position(|s| &s.id == step_id)
    }

    pub fn step(&self, step_id: &StepId) -> Option<&WorkflowStep> {
        self.steps.iter().find(|s| &s.id == step_id)
    }

    fn require_position(&self, step_id: &StepId) -> Result<usize, GovernanceError> {
        self.position(step_id)
            .ok_or_else(|| GovernanceError::unknown(EntityKind::Step, step_id))
    }

    fn can_advance_at(&self, position: usize) -> bool {
        if position == 0 {
            return true;
        }
        let predecessors = &self.steps[..position];
        predecessors[position - 1].is_completed()
            && !predecessors.iter().any(|s| s.status == StepStatus::Failed)
    }

    /// Whether the step's ordering dependency is satisfied.
    pub fn can_advance(&self, step_id: &StepId) -> Result<bool, GovernanceError> {
        let position = self.require_position(step_id)?;
        Ok(self.can_advance_at(position))
    }

    pub fn progress(&self) -> WorkflowProgress {
        WorkflowProgress {
            completed: self.steps.iter().filter(|s| s.is_completed()).count(),
            total: self.steps.len(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.steps.iter().all(|s| s.is_completed())
    }

    /// First pending step that may be started right now
    pub fn next_startable(&self) -> Option<&WorkflowStep> {
        self.steps
            .iter()
            .enumerate()
            .find(|(i, s)| s.status == StepStatus::Pending && self.can_advance_at(*i))
            .map(|(_, s)| s)
    }

    /// Steps that moved ahead of an earlier, not-completed step.
    pub fn ordering_warnings(&self) -> Vec<OrderingWarning> {
        let mut warnings = Vec::new();
        for (i, step) in self.steps.iter().enumerate() {
            if !matches!(step.status, StepStatus::InProgress | StepStatus::Completed) {
                continue;
            }
            if let Some(blocker) = self.steps[..i].iter().find(|s| !s.is_completed()) {
                warnings.push(OrderingWarning {
                    step_id: step.id.clone(),
                    status: step.status,
                    predecessor_id: blocker.id.clone(),
                    predecessor_status: blocker.status,
                });
            }
        }
        warnings
    }

    /// Apply `action` to a step.
    ///
    /// Nothing is modified when an error is returned.
    pub fn transition(
        &mut self,
        step_id: &StepId,
        action: StepAction,
        now: DateTime<Utc>,
    ) -> Result<StepTransition, GovernanceError> {
        let position = self.require_position(step_id)?;
        let from = self.steps[position].status;

        let to = match (action, from) {
            (StepAction::Start, StepStatus::Pending) => {
                if !self.can_advance_at(position) {
                    let predecessor = &self.steps[position - 1];
                    return Err(GovernanceError::StepBlocked {
                        step_id: step_id.clone(),
                        reason: format!(
                            "predecessor {} is {} or an earlier step has failed",
                            predecessor.id, predecessor.status
                        ),
                    });
                }
                StepStatus::InProgress
            }
            (StepAction::Start, status) => {
                return Err(GovernanceError::StepBlocked {
                    step_id: step_id.clone(),
                    reason: format!("step is {}, not pending", status),
                });
            }
            (StepAction::Complete, StepStatus::InProgress) => StepStatus::Completed,
            (StepAction::Fail, StepStatus::InProgress) => StepStatus::Failed,
            (StepAction::Reset, StepStatus::Completed | StepStatus::Failed) => StepStatus::Pending,
            (action, status) => {
                return Err(GovernanceError::InvalidStepTransition {
                    step_id: step_id.clone(),
                    status,
                    action,
                });
            }
        };

        let step = &mut self.steps[position];
        step.status = to;
        step.completed_at = match to {
            StepStatus::Completed => Some(now),
            StepStatus::Pending => None,
            _ => step.completed_at,
        };

        Ok(StepTransition {
            step_id: step_id.clone(),
            action,
            from,
            to,
            workflow_completed: to == StepStatus::Completed && self.is_complete(),
        })
    }
}
