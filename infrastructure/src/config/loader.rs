//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["governance.toml", ".governance.toml"];
const APP_DIR: &str = "governance-engine";
const ENV_PREFIX: &str = "GOVERNANCE_";

/// One place configuration may come from, and whether it is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub label: &'static str,
    pub path: Option<PathBuf>,
    pub found: bool,
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `GOVERNANCE_*` environment variables (`__` separates sections,
    ///    e.g. `GOVERNANCE_VOTING__REVOTE_POLICY`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./governance.toml` or `./.governance.toml`
    /// 4. Global config under the platform config directory
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path).extract().map_err(Box::new)
    }

    fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/governance-engine/config.toml if set,
    /// otherwise falls back to ~/.config/governance-engine/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Config file locations in priority order (highest first), for `--show-config`.
    pub fn sources(config_path: Option<&Path>) -> Vec<ConfigSource> {
        let mut sources = Vec::new();

        if let Some(path) = config_path {
            sources.push(ConfigSource {
                label: "Explicit",
                found: path.exists(),
                path: Some(path.to_path_buf()),
            });
        }

        let project = Self::project_config_path();
        sources.push(ConfigSource {
            label: "Project",
            found: project.is_some(),
            path: project,
        });

        let global = Self::global_config_path();
        sources.push(ConfigSource {
            label: "Global",
            found: global.as_ref().is_some_and(|p| p.exists()),
            path: global,
        });

        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert!(config.groups.is_empty());
        assert!(config.workflow.warn_out_of_order);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("governance-engine"));
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[voting]
revote_policy = "lock_after_first"

[[groups]]
id = "founders"
members = ["alice", "bob"]
admins = ["alice"]
"#
        )
        .unwrap();

        let config = ConfigLoader::load(Some(&path)).unwrap();
        assert_eq!(config.voting.revote_policy, "lock_after_first");
        assert_eq!(config.groups.len(), 1);
        assert_eq!(config.groups[0].members.len(), 2);
        // Untouched sections keep their defaults
        assert!(config.workflow.warn_out_of_order);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[voting\nrevote_policy = ").unwrap();

        assert!(ConfigLoader::load(Some(&path)).is_err());
    }

    #[test]
    fn test_sources_list_explicit_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let sources = ConfigLoader::sources(Some(&path));
        assert_eq!(sources[0].label, "Explicit");
        assert!(!sources[0].found);
        assert!(sources.iter().any(|s| s.label == "Global"));
    }
}
