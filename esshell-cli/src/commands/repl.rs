//! Interactive shell.
//!
//! Each line is evaluated as a script in one persistent scope. A few words
//! are handled by the shell itself instead of the script engine.

use crate::error::CliError;
use crate::session::{Session, render};
use colored::Colorize;
use std::io::{self, BufRead, Write};

/// Run the shell on the terminal.
pub fn execute(session: &mut Session) -> Result<(), CliError> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run(session, stdin.lock(), stdout.lock())
}

/// Run the shell over arbitrary input and output.
pub fn run<R: BufRead, W: Write>(
    session: &mut Session,
    mut input: R,
    mut output: W,
) -> Result<(), CliError> {
    writeln!(output, "{}", "esshell".bright_cyan().bold())?;
    writeln!(output, "{}", session.client())?;
    writeln!(output, "Type 'help' for shell commands, 'help()' for index commands.")?;
    writeln!(output, "Type 'exit' or 'quit' to quit.")?;
    writeln!(output)?;

    let mut history = Vec::new();

    loop {
        write!(output, "> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        match line {
            "exit" | "quit" => {
                writeln!(output, "Goodbye!")?;
                break;
            }
            "help" => {
                print_help(&mut output)?;
                continue;
            }
            "history" => {
                print_history(&mut output, &history)?;
                continue;
            }
            "clear" => {
                write!(output, "\x1B[2J\x1B[1;1H")?;
                continue;
            }
            _ => {}
        }

        history.push(line.to_string());

        match session.engine_mut().eval(line) {
            Ok(value) => {
                let text = render(&value);
                if !text.is_empty() {
                    writeln!(output, "{}", text)?;
                }
            }
            Err(e) => writeln!(output, "{} {}", "Error:".red().bold(), e)?,
        }
    }

    Ok(())
}

fn print_help<W: Write>(output: &mut W) -> io::Result<()> {
    writeln!(output, "Shell commands:")?;
    writeln!(output, "  help     - Show this help message")?;
    writeln!(output, "  history  - Show command history")?;
    writeln!(output, "  clear    - Clear the screen")?;
    writeln!(output, "  exit     - Exit the shell")?;
    writeln!(output, "  quit     - Exit the shell")?;
    writeln!(output)?;
    writeln!(output, "Anything else is evaluated as a script, for example:")?;
    writeln!(output, "  help()                  list index commands")?;
    writeln!(output, "  help(\"createIndex\")     describe one command")?;
    writeln!(output, "  getSettings(\"logs\")")?;
    writeln!(output)
}

fn print_history<W: Write>(output: &mut W, history: &[String]) -> io::Result<()> {
    if history.is_empty() {
        return writeln!(output, "No command history yet.");
    }

    writeln!(output, "Command history:")?;
    for (i, cmd) in history.iter().enumerate() {
        writeln!(output, "  {}: {}", i + 1, cmd)?;
    }
    writeln!(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::mock_session;
    use esshell_client::testing::MockTransport;
    use std::io::Cursor;

    fn transcript(transport: &MockTransport, input: &str) -> String {
        colored::control::set_override(false);
        let mut session = mock_session(transport);
        let mut output = Vec::new();
        run(&mut session, Cursor::new(input), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_evaluates_lines_in_one_scope() {
        let transport = MockTransport::acknowledging();
        let out = transcript(&transport, "let name = \"logs\";\ncreateIndex(name)\nexit\n");

        assert!(out.contains("\"acknowledged\": true"));
        assert!(out.contains("Goodbye!"));
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn test_errors_do_not_end_the_session() {
        let transport = MockTransport::acknowledging();
        let out = transcript(&transport, "deleteIndex()\n1 + 1\n");

        assert!(out.contains("Error:"));
        assert!(out.contains("deleteIndex requires at least one index name"));
        assert!(out.contains("2"));
    }

    #[test]
    fn test_history_and_help() {
        let transport = MockTransport::acknowledging();
        let out = transcript(&transport, "history\n40 + 2\nhistory\nhelp\n");

        assert!(out.contains("No command history yet."));
        assert!(out.contains("1: 40 + 2"));
        assert!(out.contains("Shell commands:"));
    }

    #[test]
    fn test_end_of_input_exits() {
        let transport = MockTransport::acknowledging();
        let out = transcript(&transport, "");
        assert!(out.contains("Transport client connected to [mock]"));
    }
}
