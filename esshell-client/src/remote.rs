//! HTTP transport backed by the `opensearch` crate.

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::request::{AdminRequest, Indices};
use crate::transport::Transport;
use async_trait::async_trait;
use opensearch::cluster::ClusterStateParts;
use opensearch::http::response::Response;
use opensearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use opensearch::indices::{
    IndicesCloseParts, IndicesCreateParts, IndicesDeleteParts, IndicesFlushParts,
    IndicesForcemergeParts, IndicesOpenParts, IndicesRefreshParts, IndicesStatsParts,
};
use opensearch::OpenSearch;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

const METADATA: &[&str] = &["metadata"];

/// Transport talking to a remote engine over HTTP.
pub struct OpenSearchTransport {
    client: RwLock<Option<Arc<OpenSearch>>>,
    config: ClientConfig,
}

impl OpenSearchTransport {
    /// Connect using the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        info!("Initializing engine transport for: {:?}", config.urls);

        let url = config
            .urls
            .first()
            .ok_or_else(|| ClientError::validation("No URLs provided"))?;

        let url = opensearch::http::Url::parse(url)
            .map_err(|e| ClientError::validation(format!("Invalid URL: {}", e)))?;

        let mut builder = TransportBuilder::new(SingleNodeConnectionPool::new(url))
            .timeout(config.request_timeout)
            .disable_proxy();

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.auth(opensearch::auth::Credentials::Basic(
                user.clone(),
                pass.clone(),
            ));
        }

        let transport = builder
            .build()
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        debug!("Engine transport initialized");

        Ok(Self {
            client: RwLock::new(Some(Arc::new(OpenSearch::new(transport)))),
            config,
        })
    }

    /// The configuration this transport was built from.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn client(&self) -> Result<Arc<OpenSearch>> {
        self.client.read().clone().ok_or(ClientError::Closed)
    }
}

#[async_trait]
impl Transport for OpenSearchTransport {
    async fn send(&self, request: AdminRequest) -> Result<Value> {
        let client = self.client()?;
        let indices = client.indices();

        match request {
            AdminRequest::CreateIndex(req) => {
                let body = req.body()?;
                let mut call = indices
                    .create(IndicesCreateParts::Index(&req.index))
                    .body(body);
                if let Some(timeout) = &req.timeout {
                    call = call.timeout(timeout);
                }
                read_body(call.send().await?, &req.index).await
            }
            AdminRequest::DeleteIndex(req) => {
                let names = path_targets(&req.indices);
                let mut call = indices.delete(IndicesDeleteParts::Index(&names));
                if let Some(timeout) = &req.timeout {
                    call = call.timeout(timeout);
                }
                read_body(call.send().await?, &req.indices.to_string()).await
            }
            AdminRequest::OpenIndex(req) => {
                let names = path_targets(&req.indices);
                let mut call = indices.open(IndicesOpenParts::Index(&names));
                if let Some(timeout) = &req.timeout {
                    call = call.timeout(timeout);
                }
                read_body(call.send().await?, &req.indices.to_string()).await
            }
            AdminRequest::CloseIndex(req) => {
                let names = path_targets(&req.indices);
                let mut call = indices.close(IndicesCloseParts::Index(&names));
                if let Some(timeout) = &req.timeout {
                    call = call.timeout(timeout);
                }
                read_body(call.send().await?, &req.indices.to_string()).await
            }
            AdminRequest::Flush(req) => {
                let names = req.indices.as_strs();
                let parts = scoped(&names, IndicesFlushParts::None, IndicesFlushParts::Index);
                let mut call = indices.flush(parts);
                if let Some(force) = req.force {
                    call = call.force(force);
                }
                if let Some(wait) = req.wait_if_ongoing {
                    call = call.wait_if_ongoing(wait);
                }
                read_body(call.send().await?, &req.indices.to_string()).await
            }
            AdminRequest::Refresh(req) => {
                let names = req.indices.as_strs();
                let parts = scoped(&names, IndicesRefreshParts::None, IndicesRefreshParts::Index);
                read_body(indices.refresh(parts).send().await?, &req.indices.to_string()).await
            }
            AdminRequest::Optimize(req) => {
                let names = req.indices.as_strs();
                let parts =
                    scoped(&names, IndicesForcemergeParts::None, IndicesForcemergeParts::Index);
                let mut call = indices.forcemerge(parts);
                if let Some(segments) = req.max_num_segments {
                    call = call.max_num_segments(segments);
                }
                if let Some(only) = req.only_expunge_deletes {
                    call = call.only_expunge_deletes(only);
                }
                if let Some(flush) = req.flush {
                    call = call.flush(flush);
                }
                read_body(call.send().await?, &req.indices.to_string()).await
            }
            AdminRequest::Status(req) => {
                let names = req.indices.as_strs();
                let parts = scoped(&names, IndicesStatsParts::None, IndicesStatsParts::Index);
                read_body(indices.stats(parts).send().await?, &req.indices.to_string()).await
            }
            AdminRequest::ClusterState(req) => {
                let names = req.indices.as_strs();
                let response = client.cluster().state(metadata_parts(&names)).send().await?;
                read_body(response, &req.indices.to_string()).await
            }
        }
    }

    async fn ping(&self) -> Result<bool> {
        let client = self.client()?;
        match client.ping().send().await {
            Ok(response) => Ok(response.status_code().is_success()),
            Err(e) => {
                debug!("Ping failed: {}", e);
                Ok(false)
            }
        }
    }

    fn close(&self) -> Result<()> {
        if self.client.write().take().is_some() {
            info!("Closed engine transport");
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("[{}]", self.config.urls.join(", "))
    }
}

/// Names for endpoints whose path always carries an index segment.
fn path_targets(indices: &Indices) -> Vec<&str> {
    if indices.names().is_empty() {
        vec![Indices::ALL]
    } else {
        indices.as_strs()
    }
}

/// `all` when no index is named, otherwise the per-index parts.
fn scoped<'b, P>(names: &'b [&'b str], all: P, index: impl FnOnce(&'b [&'b str]) -> P) -> P {
    if names.is_empty() { all } else { index(names) }
}

fn metadata_parts<'b>(names: &'b [&'b str]) -> ClusterStateParts<'b> {
    scoped(names, ClusterStateParts::Metric(METADATA), |names| {
        ClusterStateParts::MetricIndex(METADATA, names)
    })
}

async fn read_body(response: Response, target: &str) -> Result<Value> {
    let status = response.status_code();
    let text = response.text().await?;
    let body = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };

    if status.is_success() {
        return Ok(body);
    }

    Err(map_error(status.as_u16(), &body, target))
}

fn map_error(status: u16, body: &Value, target: &str) -> ClientError {
    let error_type = body["error"]["type"].as_str().unwrap_or("");
    match error_type {
        "index_not_found_exception" | "index_missing_exception" => {
            return ClientError::IndexNotFound(target.to_string());
        }
        "resource_already_exists_exception" | "index_already_exists_exception" => {
            return ClientError::IndexExists(target.to_string());
        }
        _ => {}
    }

    if status == 404 {
        return ClientError::IndexNotFound(target.to_string());
    }

    let reason = body["error"]["reason"]
        .as_str()
        .or_else(|| body["error"].as_str())
        .or_else(|| body.as_str())
        .unwrap_or("Unknown error");
    ClientError::engine(status, reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transport_requires_url() {
        let config = ClientConfig::cluster(Vec::new());
        assert!(matches!(
            OpenSearchTransport::new(config),
            Err(ClientError::Validation(_))
        ));
    }

    #[test]
    fn test_transport_rejects_bad_url() {
        let config = ClientConfig::new("not a url");
        assert!(OpenSearchTransport::new(config).is_err());
    }

    #[test]
    fn test_close_is_idempotent() {
        let transport = OpenSearchTransport::new(ClientConfig::default()).unwrap();
        assert_eq!(transport.describe(), "[http://localhost:9200]");
        transport.close().unwrap();
        transport.close().unwrap();
        assert!(matches!(transport.client(), Err(ClientError::Closed)));
    }

    #[test]
    fn test_map_error_kinds() {
        let exists = json!({"error": {"type": "resource_already_exists_exception", "reason": "exists"}});
        assert!(matches!(map_error(400, &exists, "idx"), ClientError::IndexExists(name) if name == "idx"));

        let missing = json!({"error": {"type": "index_not_found_exception", "reason": "no such index"}});
        assert!(matches!(map_error(404, &missing, "idx"), ClientError::IndexNotFound(_)));

        let other = json!({"error": {"type": "illegal_argument_exception", "reason": "bad shards"}});
        match map_error(400, &other, "idx") {
            ClientError::Engine { status, reason } => {
                assert_eq!(status, 400);
                assert_eq!(reason, "bad shards");
            }
            e => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn test_lifecycle_paths_never_empty() {
        let all = Indices::all();
        let names = path_targets(&all);
        assert_eq!(names, vec!["_all"]);
        assert_eq!(IndicesDeleteParts::Index(&names).url(), "/_all");
        assert_eq!(IndicesOpenParts::Index(&names).url(), "/_all/_open");
        assert_eq!(IndicesCloseParts::Index(&names).url(), "/_all/_close");

        let logs = Indices::of(["logs"]);
        let names = path_targets(&logs);
        assert_eq!(IndicesDeleteParts::Index(&names).url(), "/logs");
        assert_eq!(IndicesCloseParts::Index(&names).url(), "/logs/_close");
    }

    #[test]
    fn test_maintenance_parts() {
        let none: Vec<&str> = Vec::new();
        let logs = vec!["logs"];

        let parts = scoped(&none, IndicesFlushParts::None, IndicesFlushParts::Index);
        assert_eq!(parts.url(), "/_flush");
        let parts = scoped(&logs, IndicesFlushParts::None, IndicesFlushParts::Index);
        assert_eq!(parts.url(), "/logs/_flush");

        let parts = scoped(&none, IndicesRefreshParts::None, IndicesRefreshParts::Index);
        assert_eq!(parts.url(), "/_refresh");
        let parts = scoped(&logs, IndicesForcemergeParts::None, IndicesForcemergeParts::Index);
        assert_eq!(parts.url(), "/logs/_forcemerge");
        let parts = scoped(&none, IndicesStatsParts::None, IndicesStatsParts::Index);
        assert_eq!(parts.url(), "/_stats");

        // An explicit marker is sent as a path segment.
        let marker = vec![Indices::ALL];
        let parts = scoped(&marker, IndicesRefreshParts::None, IndicesRefreshParts::Index);
        assert_eq!(parts.url(), "/_all/_refresh");
    }

    #[test]
    fn test_listing_reads_metadata_metric() {
        let none: Vec<&str> = Vec::new();
        assert_eq!(metadata_parts(&none).url(), "/_cluster/state/metadata");

        let logs = vec!["logs"];
        assert_eq!(metadata_parts(&logs).url(), "/_cluster/state/metadata/logs");
    }

    #[test]
    fn test_indices_marker_in_errors() {
        let err = map_error(404, &Value::Null, &Indices::all().to_string());
        assert_eq!(err.to_string(), "Index not found: _all");
    }
}
