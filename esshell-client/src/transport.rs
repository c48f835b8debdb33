//! Transport abstraction between executors and the engine.

use crate::error::Result;
use crate::request::AdminRequest;
use async_trait::async_trait;
use serde_json::Value;

/// Sends administrative requests to the engine.
///
/// Implementations return the engine's JSON response body for successful
/// requests and map failures to [`crate::ClientError`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and wait for its response.
    async fn send(&self, request: AdminRequest) -> Result<Value>;

    /// Whether the engine is reachable.
    async fn ping(&self) -> Result<bool>;

    /// Release connections. Requests sent afterwards fail.
    fn close(&self) -> Result<()>;

    /// Short description of the connection target.
    fn describe(&self) -> String;
}
