//! Local engine node owned by the shell.

use crate::config::NodeConfig;
use crate::error::Result;
use parking_lot::Mutex;
use std::process::{Child, Command, Stdio};
use tracing::{debug, info, warn};

/// A node whose lifetime the shell controls.
pub trait NodeHandle: Send + Sync {
    /// Stop the node. Stopping twice is a no-op.
    fn close(&self) -> Result<()>;
}

/// An engine process started from [`NodeConfig`].
pub struct LocalNode {
    child: Mutex<Option<Child>>,
    description: String,
}

impl LocalNode {
    /// Start the node process.
    pub fn start(config: &NodeConfig) -> Result<Self> {
        info!("Starting local node: {}", config.command.display());

        let child = Command::new(&config.command)
            .args(&config.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        debug!(pid = child.id(), "Local node started");

        Ok(Self {
            child: Mutex::new(Some(child)),
            description: config.command.display().to_string(),
        })
    }

    /// Process id, while the node is running.
    pub fn id(&self) -> Option<u32> {
        self.child.lock().as_ref().map(Child::id)
    }
}

impl NodeHandle for LocalNode {
    fn close(&self) -> Result<()> {
        let Some(mut child) = self.child.lock().take() else {
            return Ok(());
        };

        info!("Stopping local node: {}", self.description);
        if let Err(e) = child.kill() {
            // Already exited.
            warn!("Failed to kill node process: {}", e);
        }
        child.wait()?;
        Ok(())
    }
}

impl Drop for LocalNode {
    fn drop(&mut self) {
        if let Err(e) = NodeHandle::close(self) {
            warn!("Failed to stop local node: {}", e);
        }
    }
}
