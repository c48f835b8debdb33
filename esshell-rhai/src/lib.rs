//! # esshell Rhai
//!
//! Rhai scripting for index administration.
//!
//! Commands are plain Rust types implementing [`Command`]. Only commands
//! carrying an [`ExecutableCommand`] marker can be registered; the
//! [`CommandRegistry`] installs them into a [`ShellEngine`] under each of
//! their aliases, together with `help`, JSON and logging helpers.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use esshell_client::{ClientConfig, ShellClient};
//! use esshell_rhai::{CommandRegistry, RhaiJsonSerializer, ShellEngine, register_indices_commands};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ShellClient::transport(ClientConfig::default(), RhaiJsonSerializer)?;
//!
//!     let mut registry = CommandRegistry::new();
//!     register_indices_commands(&mut registry, &client.indices())?;
//!
//!     let mut engine = ShellEngine::builder().registry(registry).build()?;
//!     let settings = engine.eval(r#"createIndex("logs"); getSettings("logs")"#)?;
//!     println!("{settings}");
//!
//!     client.close()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Script Example
//!
//! ```rhai
//! createIndex("logs-2024", #{
//!     settings: #{ number_of_shards: 1 },
//!     mappings: #{ doc: #{ properties: #{ message: #{ type: "string" } } } }
//! });
//!
//! refresh("logs-2024");
//! let warmers = getWarmer(["logs-2024"], "daily*");
//! log_info(to_json(warmers));
//! ```

mod args;
mod bindings;
mod command;
mod commands;
mod engine;
mod error;
mod registry;
mod script;

pub use bindings::{RhaiJsonSerializer, dynamic_to_json, json_to_dynamic, register_utility_functions};
pub use command::{Command, CommandFunction, ExecutableCommand};
pub use commands::{
    CloseIndexCommand, CreateIndexCommand, DeleteIndexCommand, FlushCommand, GetMappingCommand,
    GetSettingsCommand, GetWarmerCommand, OpenIndexCommand, OptimizeCommand, RefreshCommand,
    ShellIndices, StatusCommand, register_indices_commands,
};
pub use engine::{EngineConfig, ShellEngine, ShellEngineBuilder};
pub use error::{Result, ScriptError};
pub use registry::CommandRegistry;
pub use script::ScriptLoader;

// Re-export rhai for advanced usage
pub use rhai;
