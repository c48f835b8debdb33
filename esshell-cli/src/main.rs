//! esshell - scripting shell for search engine index administration.
//!
//! # Commands
//!
//! - `esshell` / `esshell repl` - Interactive shell
//! - `esshell run <script>` - Run a script file
//! - `esshell eval <expr>` - Evaluate one expression
//! - `esshell commands [name]` - List index commands or show one command's help

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;
mod session;

use commands::{list, repl, script};
use config::{Overrides, ShellConfig};
use error::CliResult;
use session::Session;

/// esshell - index administration from scripts
#[derive(Parser)]
#[command(name = "esshell")]
#[command(author = "Pegasus Heavy Industries LLC")]
#[command(version)]
#[command(about = "Scripting shell for search engine index administration")]
#[command(long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = format!(
    "{}\n  {} esshell --url http://localhost:9200\n  {} esshell eval 'getSettings(\"logs\")'\n  {} esshell run maintenance.rhai\n  {} esshell commands createIndex",
    "Examples:".bright_cyan().bold(),
    "$".dimmed(),
    "$".dimmed(),
    "$".dimmed(),
    "$".dimmed(),
))]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    connection: ConnectionArgs,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Enable debug logging (overridden by ESSHELL_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive shell (default)
    #[command(alias = "shell")]
    Repl,

    /// Run a script file
    #[command(alias = "r")]
    Run {
        /// Script path, absolute or relative to the scripts directory
        script: PathBuf,
    },

    /// Evaluate a single expression
    #[command(alias = "e")]
    Eval {
        /// Script source to evaluate
        expression: String,
    },

    /// List index commands, or show the help of one
    #[command(alias = "c")]
    Commands {
        /// Command name
        name: Option<String>,
    },
}

#[derive(Args)]
struct ConnectionArgs {
    /// Configuration file (default: <config dir>/esshell/config.toml)
    #[arg(long, global = true, env = "ESSHELL_CONFIG")]
    config: Option<PathBuf>,

    /// Engine URL; repeat or separate with commas for several
    #[arg(short, long = "url", global = true, env = "ESSHELL_URL", value_delimiter = ',')]
    urls: Vec<String>,

    /// Basic auth username
    #[arg(long, global = true, env = "ESSHELL_USER")]
    user: Option<String>,

    /// Basic auth password
    #[arg(long, global = true, env = "ESSHELL_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Cluster name shown for node clients
    #[arg(long, global = true, env = "ESSHELL_CLUSTER")]
    cluster_name: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "ESSHELL_TIMEOUT")]
    timeout: Option<u64>,

    /// Start a local node with this command instead of using a remote cluster
    #[arg(long, global = true, env = "ESSHELL_NODE_CMD")]
    node_cmd: Option<PathBuf>,

    /// Argument for the local node command (repeatable)
    #[arg(long = "node-arg", global = true, allow_hyphen_values = true)]
    node_args: Vec<String>,

    /// Directory relative script paths are resolved against
    #[arg(long, global = true, env = "ESSHELL_SCRIPTS_DIR")]
    scripts_dir: Option<PathBuf>,
}

impl ConnectionArgs {
    fn into_overrides(self) -> Overrides {
        Overrides {
            urls: self.urls,
            username: self.user,
            password: self.password,
            cluster_name: self.cluster_name,
            request_timeout: self.timeout,
            node_command: self.node_cmd,
            node_args: self.node_args,
            scripts_dir: self.scripts_dir,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("ESSHELL_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> CliResult<()> {
    let mut config = ShellConfig::load(cli.connection.config.as_deref())?;
    config.apply(cli.connection.into_overrides());

    let command = cli.command.unwrap_or(Commands::Repl);

    // Listing needs the commands, not a running node.
    let start_node = !matches!(command, Commands::Commands { .. });
    let mut session = Session::open(&config, start_node)?;

    let stdout = io::stdout();
    let result = match command {
        Commands::Repl => repl::execute(&mut session),
        Commands::Run { script: path } => script::run_file(&mut session, &path, &mut stdout.lock()),
        Commands::Eval { expression } => script::eval(&mut session, &expression, &mut stdout.lock()),
        Commands::Commands { name } => list::execute(&session, name.as_deref(), &mut stdout.lock()),
    };

    let closed = session.close();
    result.and(closed)
}

fn main() {
    let cli = Cli::parse();

    // Handle color preferences
    if cli.no_color {
        colored::control::set_override(false);
    }

    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("\n  {} {}\n", "Error:".red().bold(), e);
        std::process::exit(1);
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_repl() {
        let cli = Cli::try_parse_from(["esshell", "--url", "http://a:9200,http://b:9200"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.connection.urls, vec!["http://a:9200", "http://b:9200"]);
    }

    #[test]
    fn test_eval_with_global_flags() {
        let cli = Cli::try_parse_from([
            "esshell",
            "eval",
            "flush()",
            "--node-cmd",
            "/opt/engine/bin/start",
            "--node-arg",
            "-d",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Eval { expression }) => assert_eq!(expression, "flush()"),
            _ => panic!("expected eval"),
        }
        let overrides = cli.connection.into_overrides();
        assert_eq!(overrides.node_command, Some(PathBuf::from("/opt/engine/bin/start")));
        assert_eq!(overrides.node_args, vec!["-d".to_string()]);
    }
}
