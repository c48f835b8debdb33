//! Client and local node configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Connection settings for the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Engine URL(s). Only the first one is used for connections.
    pub urls: Vec<String>,
    /// Basic auth username.
    pub username: Option<String>,
    /// Basic auth password.
    pub password: Option<String>,
    /// Request timeout.
    #[serde(with = "secs")]
    pub request_timeout: Duration,
    /// Cluster name, used when describing the client.
    pub cluster_name: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:9200")
    }
}

impl ClientConfig {
    /// Create a new configuration with a single URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            password: None,
            request_timeout: Duration::from_secs(30),
            cluster_name: None,
        }
    }

    /// Create configuration with multiple URLs for a cluster.
    pub fn cluster(urls: Vec<String>) -> Self {
        Self {
            urls,
            ..Self::default()
        }
    }

    /// Set basic authentication credentials.
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the cluster name shown by the client.
    pub fn with_cluster_name(mut self, name: impl Into<String>) -> Self {
        self.cluster_name = Some(name.into());
        self
    }
}

/// Settings for a local engine process started by the shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Executable that starts the engine.
    pub command: PathBuf,
    /// Arguments passed to the executable.
    #[serde(default)]
    pub args: Vec<String>,
    /// How long to wait for the node to answer a ping.
    #[serde(default = "NodeConfig::default_startup_timeout", with = "secs")]
    pub startup_timeout: Duration,
}

impl NodeConfig {
    /// Create a node configuration for an executable.
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            startup_timeout: Self::default_startup_timeout(),
        }
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Set the startup timeout.
    pub fn with_startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }

    fn default_startup_timeout() -> Duration {
        Duration::from_secs(60)
    }
}

mod secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::new("http://es:9200")
            .with_basic_auth("admin", "secret")
            .with_request_timeout(Duration::from_secs(5))
            .with_cluster_name("prod");

        assert_eq!(config.urls, vec!["http://es:9200".to_string()]);
        assert_eq!(config.username.as_deref(), Some("admin"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.cluster_name.as_deref(), Some("prod"));
    }

    #[test]
    fn test_config_deserializes_partial() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"urls": ["http://a:9200"], "request_timeout": 3}"#).unwrap();
        assert_eq!(config.urls, vec!["http://a:9200".to_string()]);
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert!(config.username.is_none());
    }

    #[test]
    fn test_node_config_defaults() {
        let node: NodeConfig = serde_json::from_str(r#"{"command": "/opt/engine/bin/start"}"#).unwrap();
        assert!(node.args.is_empty());
        assert_eq!(node.startup_timeout, Duration::from_secs(60));
    }
}
