//! Workflow operations of the coordinator.

use super::GovernanceCoordinator;
use super::types::{CoordinatorError, TransitionOutput, WorkflowView};
use crate::ports::membership::MembershipPort;
use crate::ports::repository::{SessionRepository, WorkflowRepository};
use governance_domain::{
    GovernanceEvent, GroupId, StepAction, StepId, StepSpec, Workflow, WorkflowId,
    WorkflowProgress, WorkflowStep,
};
use tracing::{debug, info, warn};

impl<S, W, M> GovernanceCoordinator<S, W, M>
where
    S: SessionRepository + 'static,
    W: WorkflowRepository + 'static,
    M: MembershipPort + 'static,
{
    /// Store a new workflow with its full, ordered step list.
    ///
    /// The group must be known to the membership directory.
    pub async fn create_workflow(
        &self,
        group_id: GroupId,
        title: impl Into<String>,
        steps: Vec<StepSpec>,
    ) -> Result<Workflow, CoordinatorError> {
        self.membership.eligible_voters(&group_id).await?;

        let workflow = Workflow::create(
            WorkflowId::generate(),
            group_id,
            title,
            steps,
            self.clock.now(),
        )?;
        self.workflows.insert_workflow(workflow.clone()).await?;

        info!(
            "Created workflow {} '{}' with {} steps",
            workflow.id,
            workflow.title,
            workflow.steps.len()
        );
        self.publish(GovernanceEvent::WorkflowCreated {
            workflow_id: workflow.id.clone(),
            group_id: workflow.group_id.clone(),
            step_count: workflow.steps.len(),
        });

        Ok(workflow)
    }

    /// Apply `action` to one step of a workflow.
    pub async fn transition_step(
        &self,
        workflow_id: &WorkflowId,
        step_id: &StepId,
        action: StepAction,
    ) -> Result<TransitionOutput, CoordinatorError> {
        let _guard = self.workflow_locks.acquire(workflow_id).await;
        let mut workflow = self.load_workflow(workflow_id).await?;

        let transition = workflow.transition(step_id, action, self.clock.now())?;
        self.workflows.update_workflow(workflow.clone()).await?;

        info!(
            "Workflow {}: step {} {} -> {}",
            workflow_id, step_id, transition.from, transition.to
        );

        let step_event = match action {
            StepAction::Start => GovernanceEvent::StepStarted {
                workflow_id: workflow_id.clone(),
                step_id: step_id.clone(),
            },
            StepAction::Complete => GovernanceEvent::StepCompleted {
                workflow_id: workflow_id.clone(),
                step_id: step_id.clone(),
            },
            StepAction::Fail => GovernanceEvent::StepFailed {
                workflow_id: workflow_id.clone(),
                step_id: step_id.clone(),
            },
            StepAction::Reset => GovernanceEvent::StepReset {
                workflow_id: workflow_id.clone(),
                step_id: step_id.clone(),
            },
        };
        self.publish(step_event);

        if transition.workflow_completed {
            info!("Workflow {} completed", workflow_id);
            self.publish(GovernanceEvent::WorkflowCompleted {
                workflow_id: workflow_id.clone(),
                group_id: workflow.group_id.clone(),
            });
        }

        let view = WorkflowView::from(workflow);
        if action == StepAction::Reset && self.config.warn_out_of_order {
            for warning in &view.warnings {
                warn!("Workflow {}: {}", workflow_id, warning);
            }
        }

        Ok(TransitionOutput {
            transition,
            workflow: view,
        })
    }

    pub async fn start_step(
        &self,
        workflow_id: &WorkflowId,
        step_id: &StepId,
    ) -> Result<TransitionOutput, CoordinatorError> {
        self.transition_step(workflow_id, step_id, StepAction::Start)
            .await
    }

    pub async fn complete_step(
        &self,
        workflow_id: &WorkflowId,
        step_id: &StepId,
    ) -> Result<TransitionOutput, CoordinatorError> {
        self.transition_step(workflow_id, step_id, StepAction::Complete)
            .await
    }

    pub async fn fail_step(
        &self,
        workflow_id: &WorkflowId,
        step_id: &StepId,
    ) -> Result<TransitionOutput, CoordinatorError> {
        self.transition_step(workflow_id, step_id, StepAction::Fail)
            .await
    }

    /// Return a completed or failed step to pending. Later steps are untouched.
    pub async fn reset_step(
        &self,
        workflow_id: &WorkflowId,
        step_id: &StepId,
    ) -> Result<TransitionOutput, CoordinatorError> {
        self.transition_step(workflow_id, step_id, StepAction::Reset)
            .await
    }

    pub async fn get_workflow(&self, workflow_id: &WorkflowId) -> Result<WorkflowView, CoordinatorError> {
        Ok(self.load_workflow(workflow_id).await?.into())
    }

    pub async fn list_workflows(
        &self,
        group: Option<&GroupId>,
    ) -> Result<Vec<Workflow>, CoordinatorError> {
        Ok(self.workflows.list_workflows(group).await?)
    }

    pub async fn workflow_progress(
        &self,
        workflow_id: &WorkflowId,
    ) -> Result<WorkflowProgress, CoordinatorError> {
        Ok(self.load_workflow(workflow_id).await?.progress())
    }

    pub async fn can_advance(
        &self,
        workflow_id: &WorkflowId,
        step_id: &StepId,
    ) -> Result<bool, CoordinatorError> {
        let workflow = self.load_workflow(workflow_id).await?;
        Ok(workflow.can_advance(step_id)?)
    }

    /// First pending step whose predecessors allow it to start.
    pub async fn next_step(
        &self,
        workflow_id: &WorkflowId,
    ) -> Result<Option<WorkflowStep>, CoordinatorError> {
        let workflow = self.load_workflow(workflow_id).await?;
        let next = workflow.next_startable().cloned();
        if next.is_none() {
            debug!("Workflow {} has no startable step", workflow_id);
        }
        Ok(next)
    }
}
