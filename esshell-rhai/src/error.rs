//! Error types for the scripting layer.

use esshell_client::ClientError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for scripting operations.
pub type Result<T> = std::result::Result<T, ScriptError>;

/// Errors raised while registering commands or running scripts.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Script file not found.
    #[error("Script not found: {path}")]
    ScriptNotFound { path: PathBuf },

    /// Script compilation error.
    #[error("Script compilation error in {path}: {message}")]
    CompilationError { path: PathBuf, message: String },

    /// Script runtime error.
    #[error("Script runtime error in {path}: {message}")]
    RuntimeError { path: PathBuf, message: String },

    /// A command object without the executable marker.
    #[error("The provided command object [{type_name}] is not annotated with the ExecutableCommand marker")]
    InvalidCommand { type_name: String },

    /// Two commands claim the same script name.
    #[error("Command [{name}] is already registered")]
    DuplicateCommand { name: String },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Rhai parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Rhai runtime error outside a script file.
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Index administration error.
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl From<rhai::ParseError> for ScriptError {
    fn from(err: rhai::ParseError) -> Self {
        ScriptError::Parse(err.to_string())
    }
}

impl From<Box<rhai::EvalAltResult>> for ScriptError {
    fn from(err: Box<rhai::EvalAltResult>) -> Self {
        ScriptError::Runtime(err.to_string())
    }
}

impl ScriptError {
    /// Create an invalid command error.
    pub fn invalid_command(type_name: impl Into<String>) -> Self {
        ScriptError::InvalidCommand {
            type_name: type_name.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        ScriptError::ConfigError {
            message: message.into(),
        }
    }

    /// Create a compilation error.
    pub fn compilation(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ScriptError::CompilationError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a runtime error.
    pub fn runtime(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ScriptError::RuntimeError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether this is an invalid-argument style error.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            ScriptError::InvalidCommand { .. } | ScriptError::DuplicateCommand { .. }
        )
    }
}

/// Convert any displayable error into a script runtime error.
pub(crate) fn to_eval_error(err: impl std::fmt::Display) -> Box<rhai::EvalAltResult> {
    Box::new(rhai::EvalAltResult::from(err.to_string()))
}
