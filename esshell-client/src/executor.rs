//! Request execution.
//!
//! Each submitted request turns into exactly one engine call. The response
//! is shaped by the request's [`Action`] and converted into the shell's
//! native representation through a [`JsonSerializer`].

use crate::error::{ClientError, Result};
use crate::json::JsonSerializer;
use crate::metadata::{self, ClusterStateResponse};
use crate::request::*;
use crate::transport::Transport;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::runtime::Runtime;
use tracing::{debug, instrument};

/// An operation a request performs against the engine.
pub trait Action: Send {
    /// Operation name, used in logs.
    const NAME: &'static str;

    /// Check the request before anything is sent.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// The engine request to send.
    fn to_admin_request(&self) -> AdminRequest;

    /// Shape the raw response into what the caller receives.
    fn transform(&self, response: Value) -> Result<Value> {
        Ok(response)
    }
}

macro_rules! acknowledged_action {
    ($($request:ident => $variant:ident, $name:literal;)*) => {
        $(
            impl Action for $request {
                const NAME: &'static str = $name;

                fn to_admin_request(&self) -> AdminRequest {
                    AdminRequest::$variant(self.clone())
                }
            }
        )*
    };
}

acknowledged_action! {
    DeleteIndexRequest => DeleteIndex, "delete_index";
    OpenIndexRequest => OpenIndex, "open_index";
    CloseIndexRequest => CloseIndex, "close_index";
    FlushRequest => Flush, "flush";
    RefreshRequest => Refresh, "refresh";
    OptimizeRequest => Optimize, "optimize";
    StatusRequest => Status, "status";
}

impl Action for CreateIndexRequest {
    const NAME: &'static str = "create_index";

    fn validate(&self) -> Result<()> {
        if self.index.trim().is_empty() {
            return Err(ClientError::validation("Index name must not be empty"));
        }
        self.body().map(|_| ())
    }

    fn to_admin_request(&self) -> AdminRequest {
        AdminRequest::CreateIndex(self.clone())
    }
}

impl Action for GetMappingRequest {
    const NAME: &'static str = "get_mapping";

    fn to_admin_request(&self) -> AdminRequest {
        AdminRequest::ClusterState(ClusterStateRequest {
            indices: self.indices.clone(),
        })
    }

    fn transform(&self, response: Value) -> Result<Value> {
        let state = ClusterStateResponse::from_value(response)?;
        Ok(metadata::mappings_view(&state, &self.types))
    }
}

impl Action for GetSettingsRequest {
    const NAME: &'static str = "get_settings";

    fn to_admin_request(&self) -> AdminRequest {
        AdminRequest::ClusterState(ClusterStateRequest {
            indices: self.indices.clone(),
        })
    }

    fn transform(&self, response: Value) -> Result<Value> {
        let state = ClusterStateResponse::from_value(response)?;
        Ok(metadata::settings_view(&state))
    }
}

impl Action for GetWarmerRequest {
    const NAME: &'static str = "get_warmer";

    fn to_admin_request(&self) -> AdminRequest {
        AdminRequest::ClusterState(ClusterStateRequest {
            indices: self.indices.clone(),
        })
    }

    fn transform(&self, response: Value) -> Result<Value> {
        let state = ClusterStateResponse::from_value(response)?;
        Ok(metadata::warmers_view(&state, &self.name))
    }
}

/// Runs requests on a transport and converts the results.
pub struct RequestExecutor<S> {
    transport: Arc<dyn Transport>,
    runtime: Arc<Runtime>,
    serializer: Arc<S>,
    closed: Arc<AtomicBool>,
}

impl<S> Clone for RequestExecutor<S> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            runtime: self.runtime.clone(),
            serializer: self.serializer.clone(),
            closed: self.closed.clone(),
        }
    }
}

impl<S: JsonSerializer> RequestExecutor<S> {
    /// Create an executor.
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        runtime: Arc<Runtime>,
        serializer: Arc<S>,
        closed: Arc<AtomicBool>,
    ) -> Self {
        Self {
            transport,
            runtime,
            serializer,
            closed,
        }
    }

    /// The serializer used for results.
    pub fn serializer(&self) -> &S {
        &self.serializer
    }

    /// Drive a future on the executor's runtime.
    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Execute a request and return the shaped response as JSON.
    #[instrument(skip_all, fields(action = A::NAME))]
    pub fn execute_value<A: Action>(&self, action: A) -> Result<Value> {
        if self.closed.load(Ordering::Acquire) {
            return Err(ClientError::Closed);
        }

        action.validate()?;
        let request = action.to_admin_request();
        debug!(request = ?request, "Sending request");

        let response = self.runtime.block_on(self.transport.send(request))?;
        action.transform(response)
    }

    /// Execute a request and return the response in native form.
    pub fn execute<A: Action>(&self, action: A) -> Result<S::Output> {
        let value = self.execute_value(action)?;
        self.serializer.value_to_json(&value)
    }
}
