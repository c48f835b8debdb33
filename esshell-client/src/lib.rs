//! Index administration client for the esshell scripting shell.
//!
//! This crate provides the engine-facing half of the shell:
//! - Request types for index lifecycle, maintenance and metadata listings
//! - A JSON bridge to the shell's native value representation
//! - Executors that turn one request into one engine call
//! - Client facades for remote clusters and shell-owned local nodes
//!
//! # Example
//!
//! ```rust,no_run
//! use esshell_client::{ClientConfig, ShellClient, ValueSerializer};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ShellClient::transport(
//!         ClientConfig::new("http://localhost:9200"),
//!         ValueSerializer,
//!     )?;
//!
//!     let indices = client.indices();
//!     indices.create_index("articles", r#"{"settings": {"number_of_shards": 1}}"#)?;
//!     indices.refresh(&["articles"])?;
//!     println!("{}", indices.get_settings(&["articles"])?);
//!
//!     client.close()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod client;
mod config;
mod error;
mod executor;
mod glob;
mod indices;
mod json;
mod metadata;
mod node;
mod remote;
mod request;
mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::ShellClient;
pub use config::{ClientConfig, NodeConfig};
pub use error::{ClientError, Result};
pub use executor::{Action, RequestExecutor};
pub use glob::{NameFilter, simple_match};
pub use indices::IndicesClient;
pub use json::{JsonSerializer, ValueSerializer};
pub use metadata::{
    ClusterStateResponse, IndexMetaData, MetaData, WarmerEntry, mappings_view, settings_view,
    warmers_view,
};
pub use node::{LocalNode, NodeHandle};
pub use remote::OpenSearchTransport;
pub use request::{
    AdminRequest, CloseIndexRequest, ClusterStateRequest, CreateIndexRequest, DeleteIndexRequest,
    FlushRequest, GetMappingRequest, GetSettingsRequest, GetWarmerRequest, Indices,
    OpenIndexRequest, OptimizeRequest, RefreshRequest, StatusRequest,
};
pub use transport::Transport;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        ClientConfig, ClientError, IndicesClient, JsonSerializer, NodeConfig, Result, ShellClient,
        ValueSerializer,
    };
}
