//! A connected client with a script engine on top.

use crate::config::ShellConfig;
use crate::error::CliResult;
use esshell_client::ShellClient;
use esshell_rhai::{
    CommandRegistry, EngineConfig, RhaiJsonSerializer, ShellEngine, dynamic_to_json,
    register_indices_commands, rhai::Dynamic,
};
use tracing::info;

/// Client and engine for one shell run.
pub struct Session {
    client: ShellClient<RhaiJsonSerializer>,
    engine: ShellEngine,
}

impl Session {
    /// Connect as configured.
    ///
    /// A configured node is only started when `start_node` is set;
    /// otherwise the client talks to the configured URLs.
    pub fn open(config: &ShellConfig, start_node: bool) -> CliResult<Self> {
        let client = match (&config.node, start_node) {
            (Some(node), true) => {
                ShellClient::node(config.client.clone(), node.clone(), RhaiJsonSerializer)?
            }
            _ => ShellClient::transport(config.client.clone(), RhaiJsonSerializer)?,
        };
        info!("{}", client);
        Self::with_client(client, config.engine.clone())
    }

    /// Build the engine around an existing client.
    pub fn with_client(
        client: ShellClient<RhaiJsonSerializer>,
        engine_config: EngineConfig,
    ) -> CliResult<Self> {
        let mut registry = CommandRegistry::new();
        register_indices_commands(&mut registry, &client.indices())?;

        let mut engine = ShellEngine::builder()
            .config(engine_config)
            .registry(registry)
            .build()?;
        engine.set_constant("client", client.to_string());

        Ok(Self { client, engine })
    }

    /// The connected client.
    pub fn client(&self) -> &ShellClient<RhaiJsonSerializer> {
        &self.client
    }

    /// The script engine.
    pub fn engine(&self) -> &ShellEngine {
        &self.engine
    }

    /// The script engine, for evaluation.
    pub fn engine_mut(&mut self) -> &mut ShellEngine {
        &mut self.engine
    }

    /// Close the client and stop any owned node.
    pub fn close(self) -> CliResult<()> {
        self.client.close()?;
        Ok(())
    }
}

/// Text shown for a script result.
///
/// Maps and arrays print as pretty JSON, unit prints nothing.
pub fn render(value: &Dynamic) -> String {
    if value.is_unit() {
        return String::new();
    }
    if (value.is_map() || value.is_array())
        && let Ok(json) = dynamic_to_json(value.clone())
        && let Ok(text) = serde_json::to_string_pretty(&json)
    {
        return text;
    }
    value.to_string()
}

#[cfg(test)]
pub(crate) fn mock_session(transport: &esshell_client::testing::MockTransport) -> Session {
    let client = ShellClient::with_transport(
        std::sync::Arc::new(transport.clone()),
        RhaiJsonSerializer,
    )
    .unwrap();
    Session::with_client(client, EngineConfig::default()).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use esshell_client::testing::MockTransport;

    #[test]
    fn test_session_exposes_commands_and_client() {
        let transport = MockTransport::acknowledging();
        let mut session = mock_session(&transport);

        let client = session.engine_mut().eval("client").unwrap();
        assert_eq!(client.to_string(), "Transport client connected to [mock]");

        let result = session.engine_mut().eval(r#"openIndex("logs")"#).unwrap();
        assert_eq!(render(&result), "{\n  \"acknowledged\": true\n}");
        assert_eq!(transport.requests().len(), 1);

        session.close().unwrap();
        assert_eq!(transport.events().snapshot(), vec!["transport.close"]);
    }

    #[test]
    fn test_render_scalars() {
        assert_eq!(render(&Dynamic::UNIT), "");
        assert_eq!(render(&Dynamic::from(42_i64)), "42");
        assert_eq!(render(&Dynamic::from("text")), "text");
    }
}
