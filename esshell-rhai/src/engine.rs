//! Rhai engine configuration and script execution.

use crate::bindings::register_utility_functions;
use crate::error::{Result, ScriptError};
use crate::registry::CommandRegistry;
use crate::script::ScriptLoader;
use rhai::{AST, Dynamic, Engine, Scope};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Rhai engine with the shell's commands installed.
///
/// Variables defined by one evaluation stay visible to the next, so an
/// interactive session behaves like a single script.
pub struct ShellEngine {
    /// The underlying Rhai engine.
    engine: Engine,
    /// Variables shared across evaluations.
    scope: Scope<'static>,
    /// Script loader for file operations.
    loader: ScriptLoader,
    /// Installed commands.
    registry: Arc<CommandRegistry>,
    /// Configuration.
    config: EngineConfig,
}

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Base directory for relative script paths.
    pub scripts_dir: PathBuf,
    /// Maximum operations per evaluation.
    pub max_operations: Option<u64>,
    /// Maximum call stack depth.
    pub max_call_depth: usize,
    /// Maximum string length, 0 for unlimited.
    ///
    /// Size limits also apply to values commands return, so a low limit
    /// rejects listings from large clusters.
    pub max_string_size: usize,
    /// Maximum array size, 0 for unlimited.
    pub max_array_size: usize,
    /// Maximum map size, 0 for unlimited.
    pub max_map_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scripts_dir: PathBuf::from("."),
            max_operations: Some(100_000),
            max_call_depth: 64,
            max_string_size: 0,
            max_array_size: 0,
            max_map_size: 0,
        }
    }
}

impl ShellEngine {
    /// Create a new engine builder.
    pub fn builder() -> ShellEngineBuilder {
        ShellEngineBuilder::new()
    }

    /// Create an engine from configuration and a populated registry.
    pub fn from_config(config: EngineConfig, registry: Arc<CommandRegistry>) -> Result<Self> {
        let mut engine = Engine::new();

        // Apply limits
        if let Some(max_ops) = config.max_operations {
            engine.set_max_operations(max_ops);
        }
        engine.set_max_call_levels(config.max_call_depth);
        engine.set_max_string_size(config.max_string_size);
        engine.set_max_array_size(config.max_array_size);
        engine.set_max_map_size(config.max_map_size);

        register_utility_functions(&mut engine);
        registry.install(&mut engine);
        debug!("Installed {} commands", registry.len());

        let loader = ScriptLoader::new(&config.scripts_dir);

        Ok(Self {
            engine,
            scope: Scope::new(),
            loader,
            registry,
            config,
        })
    }

    /// Get a reference to the underlying Rhai engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Get the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the installed commands.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Define a constant visible to every evaluation.
    pub fn set_constant(&mut self, name: &str, value: impl Into<Dynamic>) {
        self.scope.push_constant_dynamic(name.to_string(), value.into());
    }

    /// Help for one command, or `None` if no such command exists.
    pub fn help(&self, name: &str) -> Option<String> {
        self.registry.describe(&self.engine, name)
    }

    /// One summary line per installed command.
    pub fn summary(&self) -> String {
        self.registry.summary(&self.engine)
    }

    /// Compile a script from source code.
    pub fn compile(&self, source: &str) -> Result<AST> {
        self.engine
            .compile(source)
            .map_err(|e| ScriptError::Parse(e.to_string()))
    }

    /// Evaluate source text in the shared scope.
    pub fn eval(&mut self, source: &str) -> Result<Dynamic> {
        let ast = self.compile(source)?;
        self.engine
            .eval_ast_with_scope(&mut self.scope, &ast)
            .map_err(ScriptError::from)
    }

    /// Evaluate a script file in the shared scope.
    pub fn run_file(&mut self, path: impl AsRef<Path>) -> Result<Dynamic> {
        let path = path.as_ref();
        let source = self.loader.load(path)?;
        let full_path = self.loader.resolve_path(path);
        debug!("Running script: {}", full_path.display());

        let ast = self
            .engine
            .compile(&source)
            .map_err(|e| ScriptError::compilation(&full_path, e.to_string()))?;

        self.engine
            .eval_ast_with_scope(&mut self.scope, &ast)
            .map_err(|e| ScriptError::runtime(&full_path, e.to_string()))
    }
}

/// Builder for [`ShellEngine`].
pub struct ShellEngineBuilder {
    config: EngineConfig,
    registry: Arc<CommandRegistry>,
}

impl Default for ShellEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellEngineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            registry: Arc::new(CommandRegistry::new()),
        }
    }

    /// Start from an existing configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Commands to install.
    pub fn registry(mut self, registry: CommandRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    /// Set the scripts directory.
    pub fn scripts_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.scripts_dir = path.into();
        self
    }

    /// Set maximum operations per evaluation.
    pub fn max_operations(mut self, max: u64) -> Self {
        self.config.max_operations = Some(max);
        self
    }

    /// Disable operation limit.
    pub fn unlimited_operations(mut self) -> Self {
        self.config.max_operations = None;
        self
    }

    /// Set maximum call stack depth.
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.config.max_call_depth = depth;
        self
    }

    /// Set maximum string size.
    pub fn max_string_size(mut self, size: usize) -> Self {
        self.config.max_string_size = size;
        self
    }

    /// Set maximum array size.
    pub fn max_array_size(mut self, size: usize) -> Self {
        self.config.max_array_size = size;
        self
    }

    /// Set maximum map size.
    pub fn max_map_size(mut self, size: usize) -> Self {
        self.config.max_map_size = size;
        self
    }

    /// Build the engine.
    pub fn build(self) -> Result<ShellEngine> {
        ShellEngine::from_config(self.config, self.registry)
    }
}
