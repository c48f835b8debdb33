//! `esshell commands`: registered script commands and their help.

use crate::error::CliError;
use crate::session::Session;
use colored::Colorize;
use std::io::Write;

/// Print every command, or the full help of one.
pub fn execute<W: Write>(
    session: &Session,
    name: Option<&str>,
    output: &mut W,
) -> Result<(), CliError> {
    let engine = session.engine();

    if let Some(name) = name {
        let help = engine
            .help(name)
            .ok_or_else(|| CliError::InvalidArgument(format!("Unknown command [{}]", name)))?;
        writeln!(output, "{}", name.bright_cyan().bold())?;
        writeln!(output, "{}", help)?;
        return Ok(());
    }

    writeln!(output, "{}", "Commands:".bright_cyan().bold())?;
    writeln!(output, "{}", engine.summary())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::mock_session;
    use esshell_client::testing::MockTransport;

    #[test]
    fn test_lists_all_commands() {
        colored::control::set_override(false);
        let session = mock_session(&MockTransport::acknowledging());
        let mut output = Vec::new();
        execute(&session, None, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        for name in ["createIndex", "getWarmer", "optimize", "status"] {
            assert!(text.contains(name), "missing {name}");
        }
        assert!(text.contains("createIndex  Create an index."));
        assert!(text.ends_with(&format!("{}\n", session.engine().summary())));
    }

    #[test]
    fn test_single_command_help() {
        colored::control::set_override(false);
        let session = mock_session(&MockTransport::acknowledging());
        let mut output = Vec::new();
        execute(&session, Some("getWarmer"), &mut output).unwrap();
        assert!(String::from_utf8(output).unwrap().contains("getWarmer([names], \"pattern*\")"));

        let err = execute(&session, Some("nope"), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));
    }
}
