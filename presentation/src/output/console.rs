//! Console output formatter for governance responses

use crate::api::{ErrorBody, GovernanceResponse, ResponseBody};
use crate::output::formatter::ResponseFormatter;
use colored::Colorize;
use governance_application::{CloseOutcome, SessionView, WorkflowView};
use governance_domain::{SessionStatus, StepStatus, TallyResult, VotingSession, WorkflowStep};

/// Formats responses for terminal display
pub struct ConsoleFormatter {
    detailed: bool,
}

impl ConsoleFormatter {
    /// Every field of every response
    pub fn full() -> Self {
        Self { detailed: true }
    }

    /// One line per response
    pub fn summary() -> Self {
        Self { detailed: false }
    }

    fn render(&self, response: &GovernanceResponse) -> String {
        match response {
            GovernanceResponse::Ok { op, result } => {
                let mut output = format!("{} {}\n", "✔".green().bold(), op.bold());
                if self.detailed {
                    output.push_str(&Self::body(result));
                } else {
                    output.push_str(&Self::indent(&Self::one_line(result), "  "));
                    output.push('\n');
                }
                output
            }
            GovernanceResponse::Error { op, error } => {
                format!("{} {}\n{}", "✘".red().bold(), op.bold(), Self::error(error))
            }
        }
    }

    fn error(error: &ErrorBody) -> String {
        let mut output = format!("  {} {}\n", format!("[{}]", error.code).red(), error.message);
        if !error.hint.is_empty() {
            output.push_str(&format!("  {} {}\n", "hint:".yellow(), error.hint));
        }
        output
    }

    fn body(body: &ResponseBody) -> String {
        match body {
            ResponseBody::Session(session) => Self::session(session, None),
            ResponseBody::VoteCast(out) => format!(
                "  {} voted for {}{}\n",
                out.vote.voter_id,
                Self::join(out.vote.selections.iter()),
                if out.replaced {
                    " (replaced previous vote)".dimmed().to_string()
                } else {
                    String::new()
                }
            ),
            ResponseBody::SessionClosed(outcome) => Self::closed(outcome),
            ResponseBody::SessionsClosed(outcomes) if outcomes.is_empty() => {
                format!("  {}\n", "No expired sessions".dimmed())
            }
            ResponseBody::SessionsClosed(outcomes) => {
                outcomes.iter().map(Self::closed).collect::<String>()
            }
            ResponseBody::SessionView(view) => Self::session_view(view),
            ResponseBody::Sessions(sessions) if sessions.is_empty() => {
                format!("  {}\n", "No sessions".dimmed())
            }
            ResponseBody::Sessions(sessions) => sessions
                .iter()
                .map(|s| {
                    format!(
                        "  {} {} [{}] {}\n",
                        Self::status(s.status),
                        s.title.bold(),
                        s.kind,
                        s.id.to_string().dimmed()
                    )
                })
                .collect(),
            ResponseBody::Tally(result) => Self::tally(result, None),
            ResponseBody::Workflow(view) => Self::workflow(view),
            ResponseBody::StepTransition(out) => {
                let mut output = format!(
                    "  step {}: {} → {}\n",
                    out.transition.step_id.to_string().bold(),
                    out.transition.from,
                    Self::step_status(out.transition.to)
                );
                if out.transition.workflow_completed {
                    output.push_str(&format!("  {}\n", "Workflow completed".green().bold()));
                }
                output.push_str(&Self::workflow(&out.workflow));
                output
            }
            ResponseBody::Workflows(workflows) if workflows.is_empty() => {
                format!("  {}\n", "No workflows".dimmed())
            }
            ResponseBody::Workflows(workflows) => workflows
                .iter()
                .map(|w| {
                    let progress = w.progress();
                    format!(
                        "  {} {}/{} steps {}\n",
                        w.title.bold(),
                        progress.completed,
                        progress.total,
                        w.id.to_string().dimmed()
                    )
                })
                .collect(),
            ResponseBody::Progress { .. }
            | ResponseBody::CanAdvance(_)
            | ResponseBody::NextStep(_) => format!("  {}\n", Self::one_line(body)),
        }
    }

    fn one_line(body: &ResponseBody) -> String {
        match body {
            ResponseBody::Session(s) => format!("session {} '{}' is {}", s.id, s.title, s.status),
            ResponseBody::VoteCast(out) => format!(
                "{} {} on {}",
                out.vote.voter_id,
                if out.replaced { "re-voted" } else { "voted" },
                out.vote.session_id
            ),
            ResponseBody::SessionClosed(outcome) => format!(
                "session {} {} ({:.1}% participation)",
                outcome.session.id, outcome.session.status, outcome.result.participation_pct
            ),
            ResponseBody::SessionsClosed(outcomes) => {
                format!("{} expired session(s) closed", outcomes.len())
            }
            ResponseBody::SessionView(view) => format!(
                "session {} is {}, {}/{} voted",
                view.session.id,
                view.session.status,
                view.tally.total_voters,
                view.tally.eligible_voter_count
            ),
            ResponseBody::Sessions(sessions) => format!("{} session(s)", sessions.len()),
            ResponseBody::Tally(t) => format!(
                "{}/{} voted ({:.1}%), quorum {}",
                t.total_voters,
                t.eligible_voter_count,
                t.participation_pct,
                if t.quorum_met { "met" } else { "not met" }
            ),
            ResponseBody::Workflow(view) => format!(
                "workflow {} at {}%",
                view.workflow.id,
                view.progress.rounded_percent()
            ),
            ResponseBody::StepTransition(out) => format!(
                "step {} {} → {}",
                out.transition.step_id, out.transition.from, out.transition.to
            ),
            ResponseBody::Workflows(workflows) => format!("{} workflow(s)", workflows.len()),
            ResponseBody::Progress {
                completed,
                total,
                percent,
            } => format!("{}/{} steps ({:.0}%)", completed, total, percent),
            ResponseBody::CanAdvance(true) => "step can start".to_string(),
            ResponseBody::CanAdvance(false) => "step is blocked".to_string(),
            ResponseBody::NextStep(Some(step)) => format!("next step: {} ({})", step.id, step.title),
            ResponseBody::NextStep(None) => "no step can start right now".to_string(),
        }
    }

    fn session(session: &VotingSession, result: Option<&TallyResult>) -> String {
        let mut output = format!(
            "  {} {} [{}]\n",
            Self::status(session.status),
            session.title.bold(),
            session.kind
        );
        output.push_str(&format!("  {} {}\n", "id:".dimmed(), session.id));
        if !session.description.is_empty() {
            output.push_str(&format!("  {}\n", session.description));
        }
        output.push_str(&format!(
            "  {} {}, up to {} selection(s), {} eligible voter(s)\n",
            "rules:".dimmed(),
            session.quorum,
            session.max_selections,
            session.eligible_voter_count()
        ));
        if let Some(deadline) = session.deadline {
            output.push_str(&format!("  {} {}\n", "deadline:".dimmed(), deadline.to_rfc3339()));
        }
        if let Some(reason) = &session.close_reason {
            output.push_str(&format!("  {} {}\n", "closed:".dimmed(), reason));
        }
        match result.or(session.result.as_ref()) {
            Some(result) => output.push_str(&Self::tally(result, Some(session))),
            None => {
                for option in &session.options {
                    output.push_str(&format!("    - {} ({})\n", option.label, option.id));
                }
            }
        }
        output
    }

    fn session_view(view: &SessionView) -> String {
        let mut output = Self::session(&view.session, Some(&view.tally));
        if view.session.status == SessionStatus::Active && !view.accepting_votes {
            output.push_str(&format!(
                "  {}\n",
                "Deadline passed; the session closes on its next update".yellow()
            ));
        }
        output
    }

    fn closed(outcome: &CloseOutcome) -> String {
        Self::session(&outcome.session, Some(&outcome.result))
    }

    fn tally(result: &TallyResult, session: Option<&VotingSession>) -> String {
        let mut output = String::new();
        let leaders = result.leaders();
        for (option, count) in &result.per_option {
            let label = session
                .and_then(|s| s.options.iter().find(|o| &o.id == option))
                .map(|o| o.label.as_str())
                .unwrap_or(option.as_str());
            let line = format!("    {:<24} {:>4}", label, count);
            if leaders.contains(option) {
                output.push_str(&format!("{}\n", line.green()));
            } else {
                output.push_str(&format!("{}\n", line));
            }
        }
        output.push_str(&format!(
            "  {} {} {}/{} ({:.1}%), quorum {}% {}\n",
            "participation:".dimmed(),
            result.participation_summary(),
            result.total_voters,
            result.eligible_voter_count,
            result.participation_pct,
            result.quorum_required_pct,
            if result.quorum_met {
                "met".green().to_string()
            } else {
                "not met".red().to_string()
            }
        ));
        output
    }

    fn workflow(view: &WorkflowView) -> String {
        let workflow = &view.workflow;
        let mut output = format!(
            "  {} {} {}\n",
            workflow.title.bold(),
            format!(
                "{}/{} ({}%)",
                view.progress.completed,
                view.progress.total,
                view.progress.rounded_percent()
            )
            .cyan(),
            workflow.id.to_string().dimmed()
        );
        for (i, step) in workflow.steps.iter().enumerate() {
            output.push_str(&format!("    {}. {}\n", i + 1, Self::step(step)));
        }
        for warning in &view.warnings {
            output.push_str(&format!("  {} {}\n", "warning:".yellow(), warning));
        }
        output
    }

    fn step(step: &WorkflowStep) -> String {
        let mut line = format!("{} {} ({})", Self::step_status(step.status), step.title, step.id);
        if let Some(member) = &step.assigned_to {
            line.push_str(&format!(" @{}", member));
        }
        if let Some(due) = step.due_date {
            line.push_str(&format!(" due {}", due.format("%Y-%m-%d")));
        }
        line
    }

    fn status(status: SessionStatus) -> String {
        let label = format!("[{}]", status);
        match status {
            SessionStatus::Active => label.cyan().to_string(),
            SessionStatus::Completed => label.green().to_string(),
            SessionStatus::Cancelled => label.red().to_string(),
        }
    }

    fn step_status(status: StepStatus) -> String {
        let label = status.display_name().to_string();
        match status {
            StepStatus::Pending => label.dimmed().to_string(),
            StepStatus::InProgress => label.yellow().to_string(),
            StepStatus::Completed => label.green().to_string(),
            StepStatus::Failed => label.red().to_string(),
        }
    }

    fn join<T: std::fmt::Display>(items: impl Iterator<Item = T>) -> String {
        items.map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ResponseFormatter for ConsoleFormatter {
    fn format(&self, response: &GovernanceResponse) -> String {
        self.render(response).trim_end().to_string()
    }

    fn format_all(&self, responses: &[GovernanceResponse]) -> String {
        let separator = if self.detailed { "\n\n" } else { "\n" };
        responses
            .iter()
            .map(|r| self.format(r))
            .collect::<Vec<_>>()
            .join(separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ErrorBody;

    #[test]
    fn test_error_shows_code_and_hint() {
        colored::control::set_override(false);
        let response = GovernanceResponse::error(
            "cast_vote",
            ErrorBody {
                code: "not_eligible".to_string(),
                message: "Member zed is not eligible to vote in this session".to_string(),
                hint: crate::api::hint_for("not_eligible"),
            },
        );

        let rendered = ConsoleFormatter::full().format(&response);
        assert!(rendered.contains("cast_vote"));
        assert!(rendered.contains("[not_eligible]"));
        assert!(rendered.contains("hint:"));
    }

    #[test]
    fn test_summary_is_one_line_per_response() {
        colored::control::set_override(false);
        let responses = vec![
            GovernanceResponse::ok(
                "workflow_progress",
                ResponseBody::Progress {
                    completed: 1,
                    total: 3,
                    percent: 100.0 / 3.0,
                },
            ),
            GovernanceResponse::ok("can_advance", ResponseBody::CanAdvance(false)),
        ];

        let rendered = ConsoleFormatter::summary().format_all(&responses);
        assert!(rendered.contains("1/3 steps (33%)"));
        assert!(rendered.contains("step is blocked"));
        assert_eq!(rendered.lines().count(), 4);
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "  "), "  a\n  b");
    }
}
