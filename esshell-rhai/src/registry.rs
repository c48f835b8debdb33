//! Explicit command registration.

use crate::command::{Command, CommandFunction};
use crate::error::{Result, ScriptError};
use rhai::{Dynamic, Engine};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

/// The shell's command table.
///
/// Commands are added once at startup; [`CommandRegistry::install`] then
/// makes each of them callable from scripts under every alias.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    functions: BTreeMap<String, CommandFunction>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under all of its aliases.
    pub fn register<C: Command + 'static>(&mut self, command: C) -> Result<&mut Self> {
        self.register_shared(Arc::new(command))
    }

    /// Register a shared command under all of its aliases.
    ///
    /// Nothing is registered if the command is unmarked or one of its
    /// aliases is taken.
    pub fn register_shared(&mut self, command: Arc<dyn Command>) -> Result<&mut Self> {
        let marker = command
            .executable()
            .ok_or_else(|| ScriptError::invalid_command(command.type_name()))?;

        if marker.aliases.is_empty() {
            return Err(ScriptError::config(format!(
                "Command [{}] has no aliases",
                command.type_name()
            )));
        }

        let mut functions = Vec::with_capacity(marker.aliases.len());
        for alias in marker.aliases {
            if self.functions.contains_key(*alias)
                || functions.iter().any(|f: &CommandFunction| f.name() == *alias)
            {
                return Err(ScriptError::DuplicateCommand {
                    name: alias.to_string(),
                });
            }
            functions.push(CommandFunction::new(*alias, command.clone())?);
        }

        for function in functions {
            debug!("Registered command: {}", function.name());
            self.functions.insert(function.name().to_string(), function);
        }
        Ok(self)
    }

    /// Look up a command by script name.
    pub fn get(&self, name: &str) -> Option<&CommandFunction> {
        self.functions.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Make every command callable from `engine`, plus `help()` and
    /// `help(name)`.
    ///
    /// Each command accepts zero to three arguments of any type.
    pub fn install(&self, engine: &mut Engine) {
        for (name, function) in &self.functions {
            let f = function.clone();
            engine.register_fn(name.as_str(), move || f.call(Vec::new()));
            let f = function.clone();
            engine.register_fn(name.as_str(), move |a: Dynamic| f.call(vec![a]));
            let f = function.clone();
            engine.register_fn(name.as_str(), move |a: Dynamic, b: Dynamic| {
                f.call(vec![a, b])
            });
            let f = function.clone();
            engine.register_fn(
                name.as_str(),
                move |a: Dynamic, b: Dynamic, c: Dynamic| f.call(vec![a, b, c]),
            );
        }

        let rendered: Arc<HashMap<String, String>> = Arc::new(
            self.functions
                .iter()
                .map(|(name, function)| {
                    let text = function.render(|| default_rendering(engine, name));
                    (name.clone(), text)
                })
                .collect(),
        );

        let overview = format!(
            "Available commands:\n{}",
            self.summary_with(|name| rendered.get(name).cloned())
        );
        engine.register_fn("help", move || overview.clone());

        let lookup = rendered.clone();
        engine.register_fn("help", move |name: &str| {
            lookup
                .get(name)
                .cloned()
                .unwrap_or_else(|| format!("Unknown command [{}]", name))
        });
    }

    /// Rendering of a single command as shown by `help(name)`.
    pub fn describe(&self, engine: &Engine, name: &str) -> Option<String> {
        self.functions
            .get(name)
            .map(|function| function.render(|| default_rendering(engine, name)))
    }

    /// One line per command: its name and the first line of its help.
    pub fn summary(&self, engine: &Engine) -> String {
        self.summary_with(|name| self.describe(engine, name))
    }

    fn summary_with(&self, render: impl Fn(&str) -> Option<String>) -> String {
        self.functions
            .keys()
            .map(|name| {
                let text = render(name).unwrap_or_default();
                format!("  {:<12} {}", name, text.lines().next().unwrap_or(""))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The engine's own description of a function: its registered signatures.
fn default_rendering(engine: &Engine, name: &str) -> String {
    let prefix = format!("{}(", name);
    let signatures: Vec<String> = engine
        .gen_fn_signatures(false)
        .into_iter()
        .filter(|signature| signature.starts_with(&prefix))
        .collect();

    if signatures.is_empty() {
        format!("{}(...)", name)
    } else {
        signatures.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ExecutableCommand;
    use rhai::EvalAltResult;

    struct Count;

    impl Command for Count {
        fn executable(&self) -> Option<ExecutableCommand> {
            Some(ExecutableCommand::new(&["count", "cnt"]))
        }

        fn help(&self) -> &str {
            "Count the arguments.\n\nUsage: count(a, b)"
        }

        fn invoke(&self, args: Vec<Dynamic>) -> std::result::Result<Dynamic, Box<EvalAltResult>> {
            Ok(Dynamic::from(args.len() as i64))
        }
    }

    struct Quiet;

    impl Command for Quiet {
        fn executable(&self) -> Option<ExecutableCommand> {
            Some(ExecutableCommand::new(&["quiet"]))
        }

        fn invoke(&self, _args: Vec<Dynamic>) -> std::result::Result<Dynamic, Box<EvalAltResult>> {
            Ok(Dynamic::UNIT)
        }
    }

    struct Hidden;

    impl Command for Hidden {
        fn invoke(&self, _args: Vec<Dynamic>) -> std::result::Result<Dynamic, Box<EvalAltResult>> {
            Ok(Dynamic::UNIT)
        }
    }

    #[test]
    fn test_register_all_aliases() {
        let mut registry = CommandRegistry::new();
        registry.register(Count).unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["cnt", "count"]);
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let mut registry = CommandRegistry::new();
        registry.register(Count).unwrap();
        let err = registry.register(Count).unwrap_err();
        assert!(matches!(err, ScriptError::DuplicateCommand { name } if name == "count"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unmarked_command_rejected() {
        let mut registry = CommandRegistry::new();
        let err = registry.register(Hidden).unwrap_err();
        assert!(err.to_string().contains("Hidden"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_installed_commands_accept_any_arity() {
        let mut registry = CommandRegistry::new();
        registry.register(Count).unwrap();

        let mut engine = Engine::new();
        registry.install(&mut engine);

        assert_eq!(engine.eval::<i64>("count()").unwrap(), 0);
        assert_eq!(engine.eval::<i64>(r#"cnt("a")"#).unwrap(), 1);
        assert_eq!(engine.eval::<i64>(r#"count("a", [1, 2])"#).unwrap(), 2);
        assert_eq!(engine.eval::<i64>(r#"count(1, #{a: 1}, "c")"#).unwrap(), 3);
    }

    #[test]
    fn test_help_uses_text_or_signatures() {
        let mut registry = CommandRegistry::new();
        registry.register(Count).unwrap();
        registry.register(Quiet).unwrap();

        let mut engine = Engine::new();
        registry.install(&mut engine);

        let help = engine.eval::<String>(r#"help("count")"#).unwrap();
        assert!(help.starts_with("Count the arguments."));

        let quiet = registry.describe(&engine, "quiet").unwrap();
        assert!(quiet.contains("quiet("), "{quiet}");

        let overview = engine.eval::<String>("help()").unwrap();
        let summary = registry.summary(&engine);
        assert_eq!(overview, format!("Available commands:\n{summary}"));
        assert!(summary.contains("count        Count the arguments."));
        assert!(summary.contains("quiet"));

        assert!(registry.describe(&engine, "missing").is_none());
    }
}
