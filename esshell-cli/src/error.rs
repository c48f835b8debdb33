//! Error types for the esshell CLI.

use std::fmt;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug)]
pub enum CliError {
    /// IO error (terminal, config and script files)
    Io(std::io::Error),

    /// Shell configuration error
    Config(String),

    /// Could not connect to or start the engine
    Client(esshell_client::ClientError),

    /// Script failed to parse or run
    Script(esshell_rhai::ScriptError),

    /// Invalid argument
    InvalidArgument(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Client(e) => write!(f, "{}", e),
            CliError::Script(e) => write!(f, "{}", e),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<toml::de::Error> for CliError {
    fn from(e: toml::de::Error) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<esshell_client::ClientError> for CliError {
    fn from(e: esshell_client::ClientError) -> Self {
        CliError::Client(e)
    }
}

impl From<esshell_rhai::ScriptError> for CliError {
    fn from(e: esshell_rhai::ScriptError) -> Self {
        CliError::Script(e)
    }
}
