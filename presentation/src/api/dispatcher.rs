//! Routes [`GovernanceRequest`]s to the coordinator.

use super::request::GovernanceRequest;
use super::response::{ErrorBody, GovernanceResponse, ResponseBody};
use governance_application::{
    GovernanceCoordinator, MembershipPort, SessionRepository, WorkflowRepository,
};
use governance_domain::{GroupId, SessionId, WorkflowId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Executes requests one at a time and remembers script aliases.
pub struct RequestDispatcher<S, W, M>
where
    S: SessionRepository + 'static,
    W: WorkflowRepository + 'static,
    M: MembershipPort + 'static,
{
    coordinator: Arc<GovernanceCoordinator<S, W, M>>,
    aliases: HashMap<String, String>,
}

impl<S, W, M> RequestDispatcher<S, W, M>
where
    S: SessionRepository + 'static,
    W: WorkflowRepository + 'static,
    M: MembershipPort + 'static,
{
    pub fn new(coordinator: Arc<GovernanceCoordinator<S, W, M>>) -> Self {
        Self {
            coordinator,
            aliases: HashMap::new(),
        }
    }

    /// Run a single request. Failures become `Error` responses.
    pub async fn dispatch(&mut self, request: GovernanceRequest) -> GovernanceResponse {
        let op = request.op();
        match self.execute(request).await {
            Ok(body) => GovernanceResponse::ok(op, body),
            Err(error) => {
                debug!("{} rejected: {} ({})", op, error.message, error.code);
                GovernanceResponse::error(op, error)
            }
        }
    }

    /// Run requests in order. With `stop_on_error`, the first rejected
    /// request ends the run and is the last response returned.
    pub async fn run_script(
        &mut self,
        requests: Vec<GovernanceRequest>,
        stop_on_error: bool,
    ) -> Vec<GovernanceResponse> {
        let mut responses = Vec::with_capacity(requests.len());
        for request in requests {
            let response = self.dispatch(request).await;
            let failed = !response.is_ok();
            responses.push(response);
            if failed && stop_on_error {
                break;
            }
        }
        responses
    }

    async fn execute(&mut self, request: GovernanceRequest) -> Result<ResponseBody, ErrorBody> {
        let coordinator = Arc::clone(&self.coordinator);

        let body = match request {
            GovernanceRequest::CreateSession { spec, alias } => {
                let session = coordinator.create_session(spec).await?;
                self.remember(alias, session.id.as_str());
                ResponseBody::Session(session)
            }
            GovernanceRequest::CastVote {
                session_id,
                voter_id,
                selections,
            } => {
                let id = self.session_id(&session_id)?;
                ResponseBody::VoteCast(coordinator.cast_vote(&id, &voter_id, &selections).await?)
            }
            GovernanceRequest::CloseSession {
                session_id,
                closed_by,
            } => {
                let id = self.session_id(&session_id)?;
                ResponseBody::SessionClosed(coordinator.close_session(&id, &closed_by).await?)
            }
            GovernanceRequest::CloseExpiredSessions => {
                ResponseBody::SessionsClosed(coordinator.close_expired_sessions().await?)
            }
            GovernanceRequest::GetSession { session_id } => {
                let id = self.session_id(&session_id)?;
                ResponseBody::SessionView(coordinator.get_session(&id).await?)
            }
            GovernanceRequest::ListSessions { group_id } => {
                let group = group_id.map(GroupId::new);
                ResponseBody::Sessions(coordinator.list_sessions(group.as_ref()).await?)
            }
            GovernanceRequest::PreviewTally { session_id } => {
                let id = self.session_id(&session_id)?;
                ResponseBody::Tally(coordinator.preview_tally(&id).await?)
            }
            GovernanceRequest::CreateWorkflow {
                group_id,
                title,
                steps,
                alias,
            } => {
                let workflow = coordinator
                    .create_workflow(GroupId::new(group_id), title, steps)
                    .await?;
                self.remember(alias, workflow.id.as_str());
                ResponseBody::Workflow(workflow.into())
            }
            GovernanceRequest::TransitionStep {
                workflow_id,
                step_id,
                action,
            } => {
                let id = self.workflow_id(&workflow_id)?;
                ResponseBody::StepTransition(
                    coordinator.transition_step(&id, &step_id, action).await?,
                )
            }
            GovernanceRequest::GetWorkflow { workflow_id } => {
                let id = self.workflow_id(&workflow_id)?;
                ResponseBody::Workflow(coordinator.get_workflow(&id).await?)
            }
            GovernanceRequest::ListWorkflows { group_id } => {
                let group = group_id.map(GroupId::new);
                ResponseBody::Workflows(coordinator.list_workflows(group.as_ref()).await?)
            }
            GovernanceRequest::WorkflowProgress { workflow_id } => {
                let id = self.workflow_id(&workflow_id)?;
                coordinator.workflow_progress(&id).await?.into()
            }
            GovernanceRequest::CanAdvance {
                workflow_id,
                step_id,
            } => {
                let id = self.workflow_id(&workflow_id)?;
                ResponseBody::CanAdvance(coordinator.can_advance(&id, &step_id).await?)
            }
            GovernanceRequest::NextStep { workflow_id } => {
                let id = self.workflow_id(&workflow_id)?;
                ResponseBody::NextStep(coordinator.next_step(&id).await?)
            }
        };

        Ok(body)
    }

    fn remember(&mut self, alias: Option<String>, id: &str) {
        if let Some(alias) = alias {
            self.aliases.insert(alias, id.to_string());
        }
    }

    /// Resolve `$alias` references; anything else is taken as a literal id.
    fn resolve(&self, reference: &str) -> Result<String, ErrorBody> {
        match reference.strip_prefix('$') {
            Some(alias) => self.aliases.get(alias).cloned().ok_or_else(|| ErrorBody {
                code: "unknown_alias".to_string(),
                message: format!("No entity was created as '{}'", alias),
                hint: super::response::hint_for("unknown_alias"),
            }),
            None => Ok(reference.to_string()),
        }
    }

    fn session_id(&self, reference: &str) -> Result<SessionId, ErrorBody> {
        self.resolve(reference).map(SessionId::from)
    }

    fn workflow_id(&self, reference: &str) -> Result<WorkflowId, ErrorBody> {
        self.resolve(reference).map(WorkflowId::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::request::parse_script;
    use governance_infrastructure::{
        InMemorySessionRepository, InMemoryWorkflowRepository, StaticMembership,
    };

    fn dispatcher()
    -> RequestDispatcher<InMemorySessionRepository, InMemoryWorkflowRepository, StaticMembership>
    {
        let membership =
            StaticMembership::new().with_group("founders", ["alice", "bob", "carol"], ["alice"]);
        let coordinator = GovernanceCoordinator::new(
            Arc::new(InMemorySessionRepository::new()),
            Arc::new(InMemoryWorkflowRepository::new()),
            Arc::new(membership),
        );
        RequestDispatcher::new(Arc::new(coordinator))
    }

    #[tokio::test]
    async fn test_script_with_aliases() {
        let script = r#"[
            {"op": "create_session", "as": "budget", "spec": {
                "group_id": "founders", "title": "Budget", "kind": "decision",
                "options": [{"id": "yes", "label": "Yes"}, {"id": "no", "label": "No"}]
            }},
            {"op": "cast_vote", "session_id": "$budget", "voter_id": "alice", "selections": ["yes"]},
            {"op": "cast_vote", "session_id": "$budget", "voter_id": "bob", "selections": ["yes"]},
            {"op": "close_session", "session_id": "$budget", "closed_by": "alice"},
            {"op": "cast_vote", "session_id": "$budget", "voter_id": "carol", "selections": ["no"]}
        ]"#;

        let mut dispatcher = dispatcher();
        let responses = dispatcher
            .run_script(parse_script(script).unwrap(), false)
            .await;

        assert_eq!(responses.len(), 5);
        assert!(responses[..4].iter().all(|r| r.is_ok()));
        assert_eq!(responses[4].error_code(), Some("session_not_active"));

        match &responses[3] {
            GovernanceResponse::Ok {
                result: ResponseBody::SessionClosed(outcome),
                ..
            } => assert!(outcome.result.quorum_met),
            other => panic!("unexpected response {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_alias_and_stop_on_error() {
        let script = r#"
{"op": "get_workflow", "workflow_id": "$nothing"}
{"op": "list_workflows"}
"#;
        let mut dispatcher = dispatcher();
        let responses = dispatcher
            .run_script(parse_script(script).unwrap(), true)
            .await;

        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].error_code(), Some("unknown_alias"));
    }

    #[tokio::test]
    async fn test_workflow_requests() {
        let script = r#"[
            {"op": "create_workflow", "as": "formation", "group_id": "founders", "title": "Formation",
             "steps": [{"id": "a", "title": "Draft"}, {"id": "b", "title": "Sign"}]},
            {"op": "can_advance", "workflow_id": "$formation", "step_id": "b"},
            {"op": "transition_step", "workflow_id": "$formation", "step_id": "a", "action": "start"},
            {"op": "transition_step", "workflow_id": "$formation", "step_id": "a", "action": "complete"},
            {"op": "workflow_progress", "workflow_id": "$formation"},
            {"op": "next_step", "workflow_id": "$formation"}
        ]"#;

        let mut dispatcher = dispatcher();
        let responses = dispatcher
            .run_script(parse_script(script).unwrap(), true)
            .await;
        assert_eq!(responses.len(), 6);
        assert!(responses.iter().all(|r| r.is_ok()));

        let value = serde_json::to_value(&responses[1]).unwrap();
        assert_eq!(value["result"]["data"], false);

        let value = serde_json::to_value(&responses[4]).unwrap();
        assert_eq!(value["result"]["data"]["percent"], 50.0);

        let value = serde_json::to_value(&responses[5]).unwrap();
        assert_eq!(value["result"]["data"]["id"], "b");
    }
}
