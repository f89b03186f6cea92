//! Workflow step entity

use crate::core::ids::{MemberId, StepId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a workflow step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Step is waiting to be started
    #[default]
    Pending,
    /// Step is being worked on
    InProgress,
    /// Step finished successfully
    Completed,
    /// Step failed; blocks every later step until reset
    Failed,
}

impl StepStatus {
    pub fn as_str(&self) -> &str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::InProgress => "in_progress",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            StepStatus::Pending => "Pending",
            StepStatus::InProgress => "In Progress",
            StepStatus::Completed => "Completed",
            StepStatus::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A requested step transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepAction {
    /// `pending` → `in_progress`, only once the predecessor is completed
    Start,
    /// `in_progress` → `completed`
    Complete,
    /// `in_progress` → `failed`
    Fail,
    /// `completed | failed` → `pending`
    Reset,
}

impl StepAction {
    pub fn as_str(&self) -> &str {
        match self {
            StepAction::Start => "start",
            StepAction::Complete => "complete",
            StepAction::Fail => "fail",
            StepAction::Reset => "reset",
        }
    }
}

impl std::fmt::Display for StepAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StepAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "start" => Ok(StepAction::Start),
            "complete" => Ok(StepAction::Complete),
            "fail" => Ok(StepAction::Fail),
            "reset" => Ok(StepAction::Reset),
            _ => Err(format!(
                "Unknown step action: {}. Valid: start, complete, fail, reset",
                s
            )),
        }
    }
}

/// Caller-supplied description of a step, used at workflow creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSpec {
    pub id: StepId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
    #[serde(default)]
    pub assigned_to: Option<MemberId>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

impl StepSpec {
    pub fn new(id: impl Into<StepId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            requirements: Vec::new(),
            outputs: Vec::new(),
            assigned_to: None,
            due_date: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_requirement(mut self, requirement: impl Into<String>) -> Self {
        self.requirements.push(requirement.into());
        self
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.outputs.push(output.into());
        self
    }

    pub fn assigned_to(mut self, member: impl Into<MemberId>) -> Self {
        self.assigned_to = Some(member.into());
        self
    }

    pub fn due(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// A single ordered unit of work within a workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub id: StepId,
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub outputs: Vec<String>,
    pub status: StepStatus,
    pub assigned_to: Option<MemberId>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<StepSpec> for WorkflowStep {
    fn from(spec: StepSpec) -> Self {
        Self {
            id: spec.id,
            title: spec.title,
            description: spec.description,
            requirements: spec.requirements,
            outputs: spec.outputs,
            status: StepStatus::Pending,
            assigned_to: spec.assigned_to,
            due_date: spec.due_date,
            completed_at: None,
        }
    }
}

impl WorkflowStep {
    pub fn is_completed(&self) -> bool {
        self.status == StepStatus::Completed
    }

    /// Past its due date without being completed.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed() && self.due_date.is_some_and(|due| now > due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_step_from_spec_starts_pending() {
        let step: WorkflowStep = StepSpec::new("formation", "Formation")
            .with_requirement("charter draft")
            .with_output("signed charter")
            .assigned_to("alice")
            .into();

        assert_eq!(step.status, StepStatus::Pending);
        assert_eq!(step.requirements, vec!["charter draft".to_string()]);
        assert_eq!(step.assigned_to, Some(MemberId::new("alice")));
        assert!(step.completed_at.is_none());
    }

    #[test]
    fn test_overdue() {
        let now = Utc::now();
        let step: WorkflowStep = StepSpec::new("a", "A").due(now - Duration::days(1)).into();
        assert!(step.is_overdue(now));

        let mut done = step.clone();
        done.status = StepStatus::Completed;
        assert!(!done.is_overdue(now));
    }

    #[test]
    fn test_parse_action() {
        assert_eq!("Start".parse::<StepAction>(), Ok(StepAction::Start));
        assert_eq!("reset".parse::<StepAction>(), Ok(StepAction::Reset));
        assert!("skip".parse::<StepAction>().is_err());
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&StepStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }
}
