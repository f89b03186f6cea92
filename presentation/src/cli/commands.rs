//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Full formatted output for every response
    Full,
    /// One line per response
    Summary,
    /// JSON array of responses
    Json,
}

/// CLI arguments for governance-engine
#[derive(Parser, Debug)]
#[command(name = "governance-engine")]
#[command(author, version, about = "Group governance engine - quorum voting and ordered workflows")]
#[command(long_about = r#"
Governance Engine runs group decisions and multi-step workflows.

It reads a script of requests (a JSON array, or one JSON request per line),
executes them in order against the engine, and prints every response.

Configuration files are loaded from (in priority order):
1. GOVERNANCE_* environment variables
2. --config <path>         Explicit config file
3. ./governance.toml       Project-level config
4. ~/.config/governance-engine/config.toml   Global config

Example:
  governance-engine --config demos/governance.toml demos/formation.jsonl
  governance-engine -o json --stop-on-error requests.jsonl
  cat requests.jsonl | governance-engine -
"#)]
pub struct Cli {
    /// Request script to execute ("-" or omitted reads stdin)
    pub script: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,

    /// Stop at the first rejected request
    #[arg(long)]
    pub stop_on_error: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Script path, or `None` when the script comes from stdin.
    pub fn script_path(&self) -> Option<&PathBuf> {
        self.script
            .as_ref()
            .filter(|path| path.as_os_str() != "-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["governance-engine"]);
        assert_eq!(cli.output, OutputFormat::Full);
        assert!(cli.script_path().is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "governance-engine",
            "-vv",
            "-o",
            "json",
            "--stop-on-error",
            "--config",
            "custom.toml",
            "script.json",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(cli.stop_on_error);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert_eq!(cli.script_path(), Some(&PathBuf::from("script.json")));
    }

    #[test]
    fn test_dash_means_stdin() {
        let cli = Cli::parse_from(["governance-engine", "-"]);
        assert!(cli.script_path().is_none());
    }
}
