//! End-to-end shell workflows over an in-memory transport.

use esshell::esshell_client::testing::{MockNode, MockTransport};
use esshell::esshell_client::{AdminRequest, ClientError, Indices};
use esshell::esshell_rhai::rhai::{Dynamic, EvalAltResult, Map};
use esshell::esshell_rhai::dynamic_to_json;
use esshell::prelude::*;
use serde_json::json;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn shell(transport: &MockTransport) -> (ShellClient<RhaiJsonSerializer>, ShellEngine) {
    let client =
        ShellClient::with_transport(Arc::new(transport.clone()), RhaiJsonSerializer).unwrap();
    let mut registry = CommandRegistry::new();
    register_indices_commands(&mut registry, &client.indices()).unwrap();
    let engine = ShellEngine::builder().registry(registry).build().unwrap();
    (client, engine)
}

// =============================================================================
// Index lifecycle
// =============================================================================

#[test]
fn test_create_index_returns_engine_response() {
    let transport = MockTransport::new(|_| {
        Ok(json!({"acknowledged": true, "shards_acknowledged": true, "index": "idx1"}))
    });
    let (_client, mut engine) = shell(&transport);

    let result = engine
        .eval(r#"createIndex("idx1", "{\"mappings\":{\"doc\":{\"properties\":{}}}}")"#)
        .unwrap();
    assert_eq!(
        dynamic_to_json(result).unwrap(),
        json!({"acknowledged": true, "shards_acknowledged": true, "index": "idx1"})
    );

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let AdminRequest::CreateIndex(request) = &requests[0] else {
        panic!("expected create request");
    };
    assert_eq!(request.index, "idx1");
    assert_eq!(
        request.body().unwrap(),
        json!({"mappings": {"doc": {"properties": {}}}})
    );
}

#[test]
fn test_lifecycle_script_issues_requests_in_order() {
    let transport = MockTransport::acknowledging();
    let (_client, mut engine) = shell(&transport);

    engine
        .eval(
            r#"
            createIndex("logs");
            closeIndex("logs");
            openIndex("logs");
            refresh();
            deleteIndex("logs");
            "#,
        )
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 5);
    assert!(matches!(&requests[0], AdminRequest::CreateIndex(r) if r.index == "logs"));
    assert!(matches!(&requests[1], AdminRequest::CloseIndex(r) if r.indices == Indices::of(["logs"])));
    assert!(matches!(&requests[2], AdminRequest::OpenIndex(r) if r.indices == Indices::of(["logs"])));
    assert!(matches!(&requests[3], AdminRequest::Refresh(r) if r.indices.is_all()));
    assert!(matches!(&requests[4], AdminRequest::DeleteIndex(r) if r.indices == Indices::of(["logs"])));
}

#[test]
fn test_maintenance_script_file() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("nightly.rhai"),
        r#"
        let targets = ["logs-1", "logs-2"];
        flush(targets);
        optimize(#{indices: targets, max_num_segments: 1});
        status(targets)
        "#,
    )
    .unwrap();

    let transport = MockTransport::acknowledging();
    let client =
        ShellClient::with_transport(Arc::new(transport.clone()), RhaiJsonSerializer).unwrap();
    let mut registry = CommandRegistry::new();
    register_indices_commands(&mut registry, &client.indices()).unwrap();
    let mut engine = ShellEngine::builder()
        .registry(registry)
        .scripts_dir(temp.path())
        .build()
        .unwrap();

    let result = engine.run_file("nightly.rhai").unwrap();
    assert_eq!(dynamic_to_json(result).unwrap(), json!({"acknowledged": true}));

    let requests = transport.requests();
    let names: Vec<&str> = requests.iter().map(AdminRequest::name).collect();
    assert_eq!(names, vec!["flush", "optimize", "status"]);
    let AdminRequest::Optimize(optimize) = &requests[1] else {
        panic!("expected optimize request");
    };
    assert_eq!(optimize.indices, Indices::of(["logs-1", "logs-2"]));
    assert_eq!(optimize.max_num_segments, Some(1));
}

#[test]
fn test_engine_failure_surfaces_in_script() {
    let transport = MockTransport::new(|_| Err(ClientError::IndexNotFound("missing".to_string())));
    let (_client, mut engine) = shell(&transport);

    let err = engine.eval(r#"openIndex("missing")"#).unwrap_err();
    assert!(err.to_string().contains("missing"));
}

// =============================================================================
// Metadata listings
// =============================================================================

#[test]
fn test_get_warmer_omits_indices_without_matches() {
    let transport = MockTransport::new(|_| {
        Ok(json!({
            "cluster_name": "test",
            "metadata": {"indices": {
                "a": {"warmers": {
                    "foo-daily": {"types": ["doc"], "source": {"query": {"match_all": {}}}},
                    "bar": {"types": [], "source": {}}
                }},
                "b": {"warmers": {
                    "bar": {"types": [], "source": {}}
                }}
            }}
        }))
    });
    let (_client, mut engine) = shell(&transport);

    let result = engine.eval(r#"getWarmer(["a", "b"], "foo*")"#).unwrap();
    let listing = dynamic_to_json(result).unwrap();

    assert_eq!(
        listing,
        json!({"a": {"warmers": {
            "foo-daily": {"types": ["doc"], "source": {"query": {"match_all": {}}}}
        }}})
    );
}

#[test]
fn test_get_settings_keyed_by_index() {
    let transport = MockTransport::new(|_| {
        Ok(json!({
            "metadata": {"indices": {
                "logs": {"settings": {"index": {"number_of_shards": "1"}}},
                "empty": {}
            }}
        }))
    });
    let (_client, mut engine) = shell(&transport);

    let result: Map = engine.eval("getSettings()").unwrap().cast();
    assert!(result.contains_key("logs"));
    assert!(!result.contains_key("empty"));
}

// =============================================================================
// Client lifecycle
// =============================================================================

#[test]
fn test_node_client_closes_client_before_node() {
    let transport = MockTransport::acknowledging();
    let events = transport.events();
    let client = ShellClient::with_node(
        Arc::new(transport),
        Arc::new(MockNode::new(events.clone())),
        "test-cluster",
        RhaiJsonSerializer,
    )
    .unwrap();

    assert_eq!(
        client.to_string(),
        "Node client connected to cluster [test-cluster]"
    );

    client.close().unwrap();
    client.close().unwrap();
    assert!(client.is_closed());
    assert_eq!(events.snapshot(), vec!["transport.close", "node.close"]);
}

#[test]
fn test_closed_client_rejects_script_commands() {
    let transport = MockTransport::acknowledging();
    let (client, mut engine) = shell(&transport);

    client.close().unwrap();
    assert!(engine.eval("flush()").is_err());
    assert!(transport.requests().is_empty());
}

// =============================================================================
// Command registration and help
// =============================================================================

struct Unmarked;

impl Command for Unmarked {
    fn invoke(&self, _args: Vec<Dynamic>) -> std::result::Result<Dynamic, Box<EvalAltResult>> {
        Ok(Dynamic::UNIT)
    }
}

struct Greeting;

impl Command for Greeting {
    fn executable(&self) -> Option<ExecutableCommand> {
        Some(ExecutableCommand::new(&["greet"]))
    }

    fn invoke(&self, _args: Vec<Dynamic>) -> std::result::Result<Dynamic, Box<EvalAltResult>> {
        Ok(Dynamic::from("hello"))
    }
}

#[test]
fn test_unmarked_command_is_rejected() {
    let mut registry = CommandRegistry::new();
    let err = registry.register(Unmarked).unwrap_err();

    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("Unmarked"));
    assert!(registry.is_empty());
}

#[test]
fn test_help_renders_text_or_signature() {
    let transport = MockTransport::acknowledging();
    let client =
        ShellClient::with_transport(Arc::new(transport), RhaiJsonSerializer).unwrap();
    let mut registry = CommandRegistry::new();
    register_indices_commands(&mut registry, &client.indices()).unwrap();
    registry.register(Greeting).unwrap();
    let mut engine = ShellEngine::builder().registry(registry).build().unwrap();

    let create_help = engine.help("createIndex").unwrap();
    assert!(create_help.starts_with("Create an index."));

    // No help text: falls back to the registered signatures.
    let greet_help = engine.help("greet").unwrap();
    assert!(greet_help.contains("greet("));

    let from_script: String = engine.eval(r#"help("greet")"#).unwrap().cast();
    assert_eq!(from_script, greet_help);
    assert!(engine.help("nope").is_none());
}
