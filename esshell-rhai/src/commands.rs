//! Index administration commands.

use crate::args::{index_names, request_map, required_targets, targets};
use crate::bindings::RhaiJsonSerializer;
use crate::command::{Command, ExecutableCommand};
use crate::error::{Result, to_eval_error};
use crate::registry::CommandRegistry;
use esshell_client::{
    CloseIndexRequest, CreateIndexRequest, DeleteIndexRequest, FlushRequest, GetMappingRequest,
    GetSettingsRequest, GetWarmerRequest, Indices, IndicesClient, OpenIndexRequest, OptimizeRequest,
    RefreshRequest, StatusRequest,
};
use rhai::{Dynamic, EvalAltResult};

type EvalResult<T> = std::result::Result<T, Box<EvalAltResult>>;

/// The indices client commands run against.
pub type ShellIndices = IndicesClient<RhaiJsonSerializer>;

/// Register every index administration command.
pub fn register_indices_commands(
    registry: &mut CommandRegistry,
    indices: &ShellIndices,
) -> Result<()> {
    registry
        .register(CreateIndexCommand(indices.clone()))?
        .register(DeleteIndexCommand(indices.clone()))?
        .register(OpenIndexCommand(indices.clone()))?
        .register(CloseIndexCommand(indices.clone()))?
        .register(FlushCommand(indices.clone()))?
        .register(RefreshCommand(indices.clone()))?
        .register(OptimizeCommand(indices.clone()))?
        .register(StatusCommand(indices.clone()))?
        .register(GetMappingCommand(indices.clone()))?
        .register(GetSettingsCommand(indices.clone()))?
        .register(GetWarmerCommand(indices.clone()))?;
    Ok(())
}

macro_rules! indices_command {
    (
        $(#[$meta:meta])*
        $name:ident, $alias:literal, $help:expr,
        |$indices:ident, $args:ident| $body:expr
    ) => {
        $(#[$meta])*
        pub struct $name(pub ShellIndices);

        impl Command for $name {
            fn executable(&self) -> Option<ExecutableCommand> {
                Some(ExecutableCommand::new(&[$alias]))
            }

            fn help(&self) -> &str {
                $help
            }

            fn invoke(&self, $args: Vec<Dynamic>) -> EvalResult<Dynamic> {
                let $indices = &self.0;
                $body
            }
        }
    };
}

/// `createIndex(name)`, `createIndex(name, body)` or `createIndex(request)`.
pub struct CreateIndexCommand(pub ShellIndices);

impl Command for CreateIndexCommand {
    fn executable(&self) -> Option<ExecutableCommand> {
        Some(ExecutableCommand::new(&["createIndex"]))
    }

    fn help(&self) -> &str {
        "Create an index.\n\n\
         createIndex(name)\n\
         createIndex(name, body)      body as JSON text or a map\n\
         createIndex(#{index: name, settings: #{...}, mappings: #{...}, timeout: \"30s\"})"
    }

    fn invoke(&self, args: Vec<Dynamic>) -> EvalResult<Dynamic> {
        if let Some(request) = request_map::<CreateIndexRequest>(&args) {
            return self.0.create_index_request(request?).map_err(to_eval_error);
        }

        let result = match args.as_slice() {
            [name] if name.is_string() => self
                .0
                .create_index_request(CreateIndexRequest::new(name.to_string())),
            [name, body] if name.is_string() && body.is_string() => {
                self.0.create_index(&name.to_string(), &body.to_string())
            }
            [name, body] if name.is_string() && body.is_map() => {
                self.0.create_index_json(&name.to_string(), body)
            }
            _ => {
                return Err(to_eval_error(
                    "createIndex expects a name, a name and a body, or a request map",
                ));
            }
        };
        result.map_err(to_eval_error)
    }
}

indices_command!(
    /// `deleteIndex(names...)` or `deleteIndex(request)`.
    DeleteIndexCommand,
    "deleteIndex",
    "Delete one or more indices.\n\n\
     deleteIndex(name, ...)\n\
     deleteIndex(#{indices: [...], timeout: \"30s\"})",
    |indices, args| required_targets("deleteIndex", &args, |names| DeleteIndexRequest {
        indices: names,
        timeout: None,
    })
    .and_then(|request| indices.delete_index_request(request).map_err(to_eval_error))
);

indices_command!(
    /// `openIndex(names...)` or `openIndex(request)`.
    OpenIndexCommand,
    "openIndex",
    "Open one or more closed indices.\n\n\
     openIndex(name, ...)\n\
     openIndex(#{indices: [...], timeout: \"30s\"})",
    |indices, args| required_targets("openIndex", &args, |names| OpenIndexRequest {
        indices: names,
        timeout: None,
    })
    .and_then(|request| indices.open_index_request(request).map_err(to_eval_error))
);

indices_command!(
    /// `closeIndex(names...)` or `closeIndex(request)`.
    CloseIndexCommand,
    "closeIndex",
    "Close one or more open indices.\n\n\
     closeIndex(name, ...)\n\
     closeIndex(#{indices: [...], timeout: \"30s\"})",
    |indices, args| required_targets("closeIndex", &args, |names| CloseIndexRequest {
        indices: names,
        timeout: None,
    })
    .and_then(|request| indices.close_index_request(request).map_err(to_eval_error))
);

indices_command!(
    /// `flush(names...)`.
    FlushCommand,
    "flush",
    "Flush indices to disk. No arguments flushes every index.\n\n\
     flush(name, ...)\n\
     flush(#{indices: [...], force: true, wait_if_ongoing: true})",
    |indices, args| targets(&args, FlushRequest::new)
        .and_then(|request| indices.flush_request(request).map_err(to_eval_error))
);

indices_command!(
    /// `refresh(names...)`.
    RefreshCommand,
    "refresh",
    "Refresh indices so recent changes are searchable. No arguments refreshes every index.\n\n\
     refresh(name, ...)",
    |indices, args| targets(&args, RefreshRequest::new)
        .and_then(|request| indices.refresh_request(request).map_err(to_eval_error))
);

indices_command!(
    /// `optimize(names...)`.
    OptimizeCommand,
    "optimize",
    "Merge index segments. No arguments optimizes every index.\n\n\
     optimize(name, ...)\n\
     optimize(#{indices: [...], max_num_segments: 1, only_expunge_deletes: false, flush: true})",
    |indices, args| targets(&args, OptimizeRequest::new)
        .and_then(|request| indices.optimize_request(request).map_err(to_eval_error))
);

indices_command!(
    /// `status(names...)`.
    StatusCommand,
    "status",
    "Index status and statistics. No arguments reports every index.\n\n\
     status(name, ...)",
    |indices, args| targets(&args, StatusRequest::new)
        .and_then(|request| indices.status_request(request).map_err(to_eval_error))
);

indices_command!(
    /// `getMapping(names...)`.
    GetMappingCommand,
    "getMapping",
    "Mappings by index. Indices without mappings are left out.\n\n\
     getMapping(name, ...)\n\
     getMapping(#{indices: [...], types: \"doc*\"})",
    |indices, args| targets(&args, GetMappingRequest::new)
        .and_then(|request| indices.get_mapping_request(request).map_err(to_eval_error))
);

indices_command!(
    /// `getSettings(names...)`.
    GetSettingsCommand,
    "getSettings",
    "Settings by index.\n\n\
     getSettings(name, ...)",
    |indices, args| targets(&args, GetSettingsRequest::new)
        .and_then(|request| indices.get_settings_request(request).map_err(to_eval_error))
);

/// `getWarmer(names...)`, `getWarmer(names, pattern)` or `getWarmer(request)`.
pub struct GetWarmerCommand(pub ShellIndices);

impl Command for GetWarmerCommand {
    fn executable(&self) -> Option<ExecutableCommand> {
        Some(ExecutableCommand::new(&["getWarmer"]))
    }

    fn help(&self) -> &str {
        "Warmers by index. Indices without matching warmers are left out.\n\n\
         getWarmer(name, ...)\n\
         getWarmer([names], \"pattern*\")\n\
         getWarmer(#{indices: [...], name: \"pattern*\"})"
    }

    fn invoke(&self, args: Vec<Dynamic>) -> EvalResult<Dynamic> {
        let request = match args.as_slice() {
            [names, pattern] if names.is_array() && pattern.is_string() => {
                GetWarmerRequest::new(Indices::of(index_names(&args[..1])?))
                    .name(pattern.to_string())
            }
            _ => targets(&args, GetWarmerRequest::new)?,
        };
        self.0.get_warmer_request(request).map_err(to_eval_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CommandRegistry;
    use esshell_client::testing::MockTransport;
    use esshell_client::{AdminRequest, ClientError, ShellClient};
    use rhai::{Engine, Map};
    use serde_json::json;
    use std::sync::Arc;

    fn engine_with(transport: &MockTransport) -> Engine {
        let client =
            ShellClient::with_transport(Arc::new(transport.clone()), RhaiJsonSerializer).unwrap();
        let mut registry = CommandRegistry::new();
        register_indices_commands(&mut registry, &client.indices()).unwrap();

        let mut engine = Engine::new();
        registry.install(&mut engine);
        engine
    }

    #[test]
    fn test_all_commands_registered() {
        let transport = MockTransport::acknowledging();
        let client =
            ShellClient::with_transport(Arc::new(transport), RhaiJsonSerializer).unwrap();
        let mut registry = CommandRegistry::new();
        register_indices_commands(&mut registry, &client.indices()).unwrap();

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(
            names,
            vec![
                "closeIndex",
                "createIndex",
                "deleteIndex",
                "flush",
                "getMapping",
                "getSettings",
                "getWarmer",
                "openIndex",
                "optimize",
                "refresh",
                "status",
            ]
        );
    }

    #[test]
    fn test_create_index_with_text_body() {
        let transport = MockTransport::acknowledging();
        let engine = engine_with(&transport);

        let result: Map = engine
            .eval(r#"createIndex("idx1", "{\"settings\":{\"number_of_shards\":1}}")"#)
            .unwrap();
        assert!(result["acknowledged"].as_bool().unwrap());

        let AdminRequest::CreateIndex(request) = &transport.requests()[0] else {
            panic!("expected create request");
        };
        assert_eq!(request.index, "idx1");
        assert_eq!(request.body().unwrap(), json!({"settings": {"number_of_shards": 1}}));
    }

    #[test]
    fn test_create_index_with_map_body() {
        let transport = MockTransport::acknowledging();
        let engine = engine_with(&transport);

        engine
            .eval::<Dynamic>(r#"createIndex("idx", #{settings: #{number_of_shards: 2}})"#)
            .unwrap();

        let AdminRequest::CreateIndex(request) = &transport.requests()[0] else {
            panic!("expected create request");
        };
        assert_eq!(request.body().unwrap()["settings"]["number_of_shards"], 2);
    }

    #[test]
    fn test_create_index_request_map() {
        let transport = MockTransport::acknowledging();
        let engine = engine_with(&transport);

        engine
            .eval::<Dynamic>(r#"createIndex(#{index: "logs", timeout: "5s"})"#)
            .unwrap();

        assert_eq!(
            transport.requests()[0],
            AdminRequest::CreateIndex(CreateIndexRequest::new("logs").timeout("5s"))
        );
    }

    #[test]
    fn test_bad_arguments_are_script_errors() {
        let transport = MockTransport::acknowledging();
        let engine = engine_with(&transport);

        assert!(engine.eval::<Dynamic>("createIndex(1)").is_err());
        assert!(engine.eval::<Dynamic>("deleteIndex()").is_err());
        assert!(engine.eval::<Dynamic>("deleteIndex(#{indices: []})").is_err());
        assert!(engine.eval::<Dynamic>("openIndex(#{indices: [], timeout: \"5s\"})").is_err());
        assert!(engine.eval::<Dynamic>(r#"createIndex("idx", "{oops")"#).is_err());
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_maintenance_targets() {
        let transport = MockTransport::acknowledging();
        let engine = engine_with(&transport);

        engine.eval::<Dynamic>("flush()").unwrap();
        engine.eval::<Dynamic>(r#"refresh("a", ["b", "c"])"#).unwrap();
        engine
            .eval::<Dynamic>(r#"optimize(#{indices: ["a"], max_num_segments: 1})"#)
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0], AdminRequest::Flush(FlushRequest::new(Indices::all())));
        assert_eq!(
            requests[1],
            AdminRequest::Refresh(RefreshRequest::new(Indices::of(["a", "b", "c"])))
        );
        assert_eq!(
            requests[2],
            AdminRequest::Optimize(OptimizeRequest::new(Indices::of(["a"])).max_num_segments(1))
        );
    }

    #[test]
    fn test_get_warmer_with_pattern() {
        let transport = MockTransport::new(|_| {
            Ok(json!({
                "metadata": {"indices": {
                    "a": {"warmers": {
                        "foo-bar": {"types": [], "source": {}},
                        "bar-foo": {"types": [], "source": {}}
                    }}
                }}
            }))
        });
        let engine = engine_with(&transport);

        let result: Map = engine.eval(r#"getWarmer(["a"], "foo*")"#).unwrap();
        let a = result["a"].clone().try_cast::<Map>().unwrap();
        let warmers = a["warmers"].clone().try_cast::<Map>().unwrap();
        assert_eq!(warmers.len(), 1);
        assert!(warmers.contains_key("foo-bar"));
    }

    #[test]
    fn test_engine_error_reaches_script() {
        let transport =
            MockTransport::new(|_| Err(ClientError::IndexExists("idx".to_string())));
        let engine = engine_with(&transport);

        let err = engine.eval::<Dynamic>(r#"createIndex("idx")"#).unwrap_err();
        assert!(err.to_string().contains("Index already exists: idx"));
    }
}
