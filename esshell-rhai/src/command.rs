//! Script-callable commands.
//!
//! A command is exposed to scripts only if it carries an
//! [`ExecutableCommand`] marker. Wrapping an unmarked command fails
//! immediately, naming the offending type.

use crate::error::{Result, ScriptError};
use rhai::{Dynamic, EvalAltResult};
use std::fmt;
use std::sync::Arc;

/// Marker a command must carry to be callable from scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutableCommand {
    /// Script function names the command is registered under.
    pub aliases: &'static [&'static str],
}

impl ExecutableCommand {
    /// Marker with the given aliases.
    pub const fn new(aliases: &'static [&'static str]) -> Self {
        Self { aliases }
    }
}

/// A named operation scripts can call.
pub trait Command: Send + Sync {
    /// The executable marker, if the command has one.
    fn executable(&self) -> Option<ExecutableCommand> {
        None
    }

    /// Help text shown to shell users.
    fn help(&self) -> &str {
        ""
    }

    /// Run the command with the script's arguments.
    fn invoke(&self, args: Vec<Dynamic>) -> std::result::Result<Dynamic, Box<EvalAltResult>>;

    /// Type name used in registration errors.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A marked command bound to one script function name.
#[derive(Clone)]
pub struct CommandFunction {
    name: String,
    marker: ExecutableCommand,
    command: Arc<dyn Command>,
}

impl CommandFunction {
    /// Wrap a command.
    ///
    /// Fails with [`ScriptError::InvalidCommand`] when the command has no
    /// [`ExecutableCommand`] marker.
    pub fn new(name: impl Into<String>, command: Arc<dyn Command>) -> Result<Self> {
        let marker = command
            .executable()
            .ok_or_else(|| ScriptError::invalid_command(command.type_name()))?;

        Ok(Self {
            name: name.into(),
            marker,
            command,
        })
    }

    /// Script function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The command's marker.
    pub fn marker(&self) -> ExecutableCommand {
        self.marker
    }

    /// The command's help text.
    pub fn help(&self) -> &str {
        self.command.help()
    }

    /// Call the command.
    pub fn call(&self, args: Vec<Dynamic>) -> std::result::Result<Dynamic, Box<EvalAltResult>> {
        self.command.invoke(args)
    }

    /// Human-readable rendering: the help text, or `default` when the help
    /// text is blank.
    pub fn render(&self, default: impl FnOnce() -> String) -> String {
        let help = self.command.help();
        if help.trim().is_empty() {
            default()
        } else {
            help.to_string()
        }
    }
}

impl fmt::Debug for CommandFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandFunction")
            .field("name", &self.name)
            .field("command", &self.command.type_name())
            .finish()
    }
}
