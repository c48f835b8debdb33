//! In-memory doubles for exercising clients without an engine.

use crate::error::Result;
use crate::node::NodeHandle;
use crate::request::AdminRequest;
use crate::transport::Transport;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;

/// Shared, ordered log of lifecycle events.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    /// Append an event.
    pub fn record(&self, event: impl Into<String>) {
        self.0.lock().push(event.into());
    }

    /// Events recorded so far.
    pub fn snapshot(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

type Responder = dyn Fn(&AdminRequest) -> Result<Value> + Send + Sync;

/// Transport that records requests and answers from a closure.
#[derive(Clone)]
pub struct MockTransport {
    responder: Arc<Responder>,
    requests: Arc<Mutex<Vec<AdminRequest>>>,
    events: EventLog,
}

impl MockTransport {
    /// Answer every request with `responder`.
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&AdminRequest) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            responder: Arc::new(responder),
            requests: Arc::default(),
            events: EventLog::default(),
        }
    }

    /// Answer every request with `{"acknowledged": true}`.
    pub fn acknowledging() -> Self {
        Self::new(|_| Ok(json!({"acknowledged": true})))
    }

    /// Requests sent so far, in order.
    pub fn requests(&self) -> Vec<AdminRequest> {
        self.requests.lock().clone()
    }

    /// Lifecycle events, shared with any [`MockNode`] built from it.
    pub fn events(&self) -> EventLog {
        self.events.clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: AdminRequest) -> Result<Value> {
        let response = (self.responder)(&request);
        self.requests.lock().push(request);
        response
    }

    async fn ping(&self) -> Result<bool> {
        Ok(true)
    }

    fn close(&self) -> Result<()> {
        self.events.record("transport.close");
        Ok(())
    }

    fn describe(&self) -> String {
        "[mock]".to_string()
    }
}

/// Node that records when it is stopped.
#[derive(Debug, Clone)]
pub struct MockNode {
    events: EventLog,
}

impl MockNode {
    /// Record stops into `events`.
    pub fn new(events: EventLog) -> Self {
        Self { events }
    }
}

impl NodeHandle for MockNode {
    fn close(&self) -> Result<()> {
        self.events.record("node.close");
        Ok(())
    }
}
