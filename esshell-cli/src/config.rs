//! Shell configuration file and command line overrides.

use crate::error::{CliError, CliResult};
use esshell_client::{ClientConfig, NodeConfig};
use esshell_rhai::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Everything the shell can be configured with.
///
/// ```toml
/// [client]
/// urls = ["http://localhost:9200"]
/// username = "admin"
/// request_timeout = 30
///
/// [node]
/// command = "/opt/engine/bin/start"
/// args = ["-Des.cluster.name=dev"]
/// startup_timeout = 60
///
/// [engine]
/// scripts_dir = "~/esshell-scripts"
/// max_operations = 1000000
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Engine connection.
    pub client: ClientConfig,
    /// Local node to start instead of connecting to a remote cluster.
    pub node: Option<NodeConfig>,
    /// Script engine limits.
    pub engine: EngineConfig,
}

/// Values given on the command line or through `ESSHELL_*` variables.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub cluster_name: Option<String>,
    pub request_timeout: Option<u64>,
    pub node_command: Option<PathBuf>,
    pub node_args: Vec<String>,
    pub scripts_dir: Option<PathBuf>,
}

impl ShellConfig {
    /// `<config_dir>/esshell/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("esshell").join("config.toml"))
    }

    /// Load an explicit file, or the default file when it exists.
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::read(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn read(path: &Path) -> CliResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    /// Parse TOML text.
    pub fn from_toml(text: &str) -> CliResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Apply command line overrides on top of file values.
    pub fn apply(&mut self, overrides: Overrides) {
        if !overrides.urls.is_empty() {
            self.client.urls = overrides.urls;
        }
        if let Some(username) = overrides.username {
            self.client.username = Some(username);
        }
        if let Some(password) = overrides.password {
            self.client.password = Some(password);
        }
        if let Some(name) = overrides.cluster_name {
            self.client.cluster_name = Some(name);
        }
        if let Some(secs) = overrides.request_timeout {
            self.client.request_timeout = Duration::from_secs(secs);
        }
        if let Some(command) = overrides.node_command {
            let mut node = NodeConfig::new(command);
            node.args = overrides.node_args;
            if let Some(existing) = &self.node {
                node.startup_timeout = existing.startup_timeout;
            }
            self.node = Some(node);
        } else if let Some(node) = &mut self.node
            && !overrides.node_args.is_empty()
        {
            node.args = overrides.node_args;
        }
        if let Some(dir) = overrides.scripts_dir {
            self.engine.scripts_dir = dir;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_file() {
        let config = ShellConfig::from_toml(
            r#"
            [client]
            urls = ["http://es-1:9200"]
            username = "admin"
            password = "secret"
            request_timeout = 5

            [node]
            command = "/opt/engine/bin/start"
            args = ["-d"]

            [engine]
            max_operations = 500
            "#,
        )
        .unwrap();

        assert_eq!(config.client.urls, vec!["http://es-1:9200".to_string()]);
        assert_eq!(config.client.request_timeout, Duration::from_secs(5));
        let node = config.node.unwrap();
        assert_eq!(node.command, PathBuf::from("/opt/engine/bin/start"));
        assert_eq!(node.startup_timeout, Duration::from_secs(60));
        assert_eq!(config.engine.max_operations, Some(500));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = ShellConfig::from_toml("").unwrap();
        assert_eq!(config.client.urls, vec!["http://localhost:9200".to_string()]);
        assert!(config.node.is_none());
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let err = ShellConfig::from_toml("[client]\nurls = 3").unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_missing_explicit_file() {
        let temp = TempDir::new().unwrap();
        let result = ShellConfig::load(Some(&temp.path().join("nope.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[client]\ncluster_name = \"dev\"\n").unwrap();

        let config = ShellConfig::load(Some(&path)).unwrap();
        assert_eq!(config.client.cluster_name.as_deref(), Some("dev"));
    }

    #[test]
    fn test_overrides_win() {
        let mut config = ShellConfig::from_toml(
            "[client]\nurls = [\"http://file:9200\"]\n[node]\ncommand = \"old\"\nstartup_timeout = 10\n",
        )
        .unwrap();

        config.apply(Overrides {
            urls: vec!["http://flag:9200".to_string()],
            request_timeout: Some(7),
            node_command: Some(PathBuf::from("new")),
            node_args: vec!["-x".to_string()],
            ..Overrides::default()
        });

        assert_eq!(config.client.urls, vec!["http://flag:9200".to_string()]);
        assert_eq!(config.client.request_timeout, Duration::from_secs(7));
        let node = config.node.unwrap();
        assert_eq!(node.command, PathBuf::from("new"));
        assert_eq!(node.args, vec!["-x".to_string()]);
        assert_eq!(node.startup_timeout, Duration::from_secs(10));
    }
}
