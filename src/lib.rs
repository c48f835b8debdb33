//! esshell - a scripting shell for search engine index administration.
//!
//! This crate ties the workspace together:
//! - [`esshell_client`] talks to the engine (remote cluster or local node)
//! - [`esshell_rhai`] exposes index commands to Rhai scripts
//!
//! # Example
//!
//! ```rust,no_run
//! use esshell::prelude::*;
//!
//! fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let client = ShellClient::transport(ClientConfig::default(), RhaiJsonSerializer)?;
//!
//!     let mut registry = CommandRegistry::new();
//!     register_indices_commands(&mut registry, &client.indices())?;
//!     let mut engine = ShellEngine::builder().registry(registry).build()?;
//!
//!     engine.eval(r#"createIndex("logs"); refresh("logs")"#)?;
//!     client.close()?;
//!     Ok(())
//! }
//! ```

pub use esshell_client;
pub use esshell_rhai;

pub use esshell_client::{
    ClientConfig, ClientError, IndicesClient, NodeConfig, ShellClient, Transport,
};
pub use esshell_rhai::{
    Command, CommandRegistry, EngineConfig, ExecutableCommand, RhaiJsonSerializer, ScriptError,
    ShellEngine, register_indices_commands,
};

/// Prelude for common imports.
pub mod prelude {
    pub use esshell_client::prelude::*;
    pub use esshell_rhai::{
        Command, CommandRegistry, ExecutableCommand, RhaiJsonSerializer, ScriptError, ShellEngine,
        register_indices_commands,
    };
}
