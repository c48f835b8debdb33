//! Client facades handed to the shell.
//!
//! A [`ShellClient`] is either connected to a remote cluster over a
//! transport, or owns a local node it started itself. Both expose the same
//! [`IndicesClient`] and share one close lifecycle: the connection is
//! released first, then the node (if any) is stopped.

use crate::config::{ClientConfig, NodeConfig};
use crate::error::{ClientError, Result};
use crate::executor::RequestExecutor;
use crate::indices::IndicesClient;
use crate::json::JsonSerializer;
use crate::node::{LocalNode, NodeHandle};
use crate::remote::OpenSearchTransport;
use crate::transport::Transport;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::runtime::Builder;
use tracing::{debug, info, instrument, warn};

const DEFAULT_CLUSTER_NAME: &str = "elasticsearch";
const PING_INTERVAL: Duration = Duration::from_millis(250);

enum Mode {
    Transport,
    Node { cluster_name: String },
}

struct Inner<S> {
    transport: Arc<dyn Transport>,
    node: Option<Arc<dyn NodeHandle>>,
    executor: RequestExecutor<S>,
    closed: Arc<AtomicBool>,
    mode: Mode,
}

/// Entry point for index administration from the shell.
pub struct ShellClient<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for ShellClient<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: JsonSerializer + 'static> ShellClient<S> {
    /// Connect to a remote cluster.
    #[instrument(skip_all)]
    pub fn transport(config: ClientConfig, serializer: S) -> Result<Self> {
        let transport = OpenSearchTransport::new(config)?;
        Self::with_transport(Arc::new(transport), serializer)
    }

    /// Start a local node and connect to it.
    ///
    /// Fails with [`ClientError::NodeStartup`] if the node does not answer
    /// a ping within the configured startup timeout; the node is stopped
    /// in that case.
    #[instrument(skip_all)]
    pub fn node(config: ClientConfig, node_config: NodeConfig, serializer: S) -> Result<Self> {
        let cluster_name = config
            .cluster_name
            .clone()
            .unwrap_or_else(|| DEFAULT_CLUSTER_NAME.to_string());

        let node = LocalNode::start(&node_config)?;
        let transport =
            OpenSearchTransport::new(config).map(|t| Arc::new(t) as Arc<dyn Transport>);
        Self::start_node_client(
            transport,
            Arc::new(node),
            cluster_name,
            serializer,
            node_config.startup_timeout,
        )
    }

    /// Attach to a freshly started node, stopping it again on failure.
    ///
    /// The startup error is returned even when stopping also fails.
    fn start_node_client(
        transport: Result<Arc<dyn Transport>>,
        node: Arc<dyn NodeHandle>,
        cluster_name: String,
        serializer: S,
        startup_timeout: Duration,
    ) -> Result<Self> {
        let transport = match transport {
            Ok(transport) => transport,
            Err(e) => return Err(startup_failure(e, node.close())),
        };

        let client = Self::with_node(transport, node, cluster_name, serializer)?;
        if let Err(e) = client.wait_for_node(startup_timeout) {
            return Err(startup_failure(e, client.close()));
        }
        Ok(client)
    }

    /// Build a client over an existing transport.
    pub fn with_transport(transport: Arc<dyn Transport>, serializer: S) -> Result<Self> {
        Self::build(transport, None, Mode::Transport, serializer)
    }

    /// Build a client that owns a node.
    pub fn with_node(
        transport: Arc<dyn Transport>,
        node: Arc<dyn NodeHandle>,
        cluster_name: impl Into<String>,
        serializer: S,
    ) -> Result<Self> {
        let mode = Mode::Node {
            cluster_name: cluster_name.into(),
        };
        Self::build(transport, Some(node), mode, serializer)
    }

    fn build(
        transport: Arc<dyn Transport>,
        node: Option<Arc<dyn NodeHandle>>,
        mode: Mode,
        serializer: S,
    ) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ClientError::Connection(format!("Failed to start runtime: {}", e)))?;

        let closed = Arc::new(AtomicBool::new(false));
        let executor = RequestExecutor::new(
            transport.clone(),
            Arc::new(runtime),
            Arc::new(serializer),
            closed.clone(),
        );

        Ok(Self {
            inner: Arc::new(Inner {
                transport,
                node,
                executor,
                closed,
                mode,
            }),
        })
    }

    fn wait_for_node(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.ping()? {
                debug!("Local node is reachable");
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ClientError::NodeStartup {
                    timeout_secs: timeout.as_secs(),
                });
            }
            std::thread::sleep(PING_INTERVAL);
        }
    }

    /// Whether the engine answers.
    pub fn ping(&self) -> Result<bool> {
        if self.is_closed() {
            return Err(ClientError::Closed);
        }
        self.inner.executor.block_on(self.inner.transport.ping())
    }

    /// Index administration.
    pub fn indices(&self) -> IndicesClient<S> {
        IndicesClient::new(self.inner.executor.clone())
    }

    /// The serializer results are converted with.
    pub fn serializer(&self) -> &S {
        self.inner.executor.serializer()
    }
}

impl<S> ShellClient<S> {
    /// Close the connection, then stop the owned node.
    ///
    /// Closing an already closed client does nothing.
    pub fn close(&self) -> Result<()> {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        info!("Closing {}", self);
        let transport = self.inner.transport.close();
        let node = match &self.inner.node {
            Some(node) => node.close(),
            None => Ok(()),
        };
        transport.and(node)
    }

    /// Whether [`ShellClient::close`] was called.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }
}

impl<S> fmt::Display for ShellClient<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.mode {
            Mode::Node { cluster_name } => {
                write!(f, "Node client connected to cluster [{}]", cluster_name)
            }
            Mode::Transport => write!(
                f,
                "Transport client connected to {}",
                self.inner.transport.describe()
            ),
        }
    }
}

impl<S> fmt::Debug for ShellClient<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShellClient")
            .field("target", &self.to_string())
            .field("closed", &self.is_closed())
            .finish()
    }
}

fn startup_failure(error: ClientError, cleanup: Result<()>) -> ClientError {
    if let Err(e) = cleanup {
        warn!("Failed to stop local node after startup error: {}", e);
    }
    error
}
