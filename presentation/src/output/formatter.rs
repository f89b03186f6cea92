//! Output formatter trait

use crate::api::GovernanceResponse;
use crate::cli::commands::OutputFormat;

/// Trait for rendering a run of responses
pub trait ResponseFormatter {
    /// Render a single response
    fn format(&self, response: &GovernanceResponse) -> String;

    /// Render every response of a script run
    fn format_all(&self, responses: &[GovernanceResponse]) -> String {
        responses
            .iter()
            .map(|r| self.format(r))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Pretty-printed JSON
pub struct JsonFormatter;

impl ResponseFormatter for JsonFormatter {
    fn format(&self, response: &GovernanceResponse) -> String {
        serde_json::to_string_pretty(response).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_all(&self, responses: &[GovernanceResponse]) -> String {
        serde_json::to_string_pretty(responses).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Pick the formatter for an output format.
pub fn formatter_for(format: OutputFormat) -> Box<dyn ResponseFormatter> {
    match format {
        OutputFormat::Full => Box::new(super::console::ConsoleFormatter::full()),
        OutputFormat::Summary => Box::new(super::console::ConsoleFormatter::summary()),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ResponseBody;

    #[test]
    fn test_json_run_is_an_array() {
        let responses = vec![
            GovernanceResponse::ok("can_advance", ResponseBody::CanAdvance(true)),
            GovernanceResponse::ok("next_step", ResponseBody::NextStep(None)),
        ];
        let rendered = JsonFormatter.format_all(&responses);
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[1]["op"], "next_step");
    }
}
