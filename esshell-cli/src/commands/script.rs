//! Non-interactive evaluation: `esshell run` and `esshell eval`.

use crate::error::CliError;
use crate::session::{Session, render};
use std::io::Write;
use std::path::Path;

/// Run a script file and print its result.
pub fn run_file<W: Write>(session: &mut Session, path: &Path, output: &mut W) -> Result<(), CliError> {
    let value = session.engine_mut().run_file(path)?;
    print_result(output, &render(&value))
}

/// Evaluate an expression and print its result.
pub fn eval<W: Write>(session: &mut Session, expression: &str, output: &mut W) -> Result<(), CliError> {
    let value = session.engine_mut().eval(expression)?;
    print_result(output, &render(&value))
}

fn print_result<W: Write>(output: &mut W, text: &str) -> Result<(), CliError> {
    if !text.is_empty() {
        writeln!(output, "{}", text)?;
    }
    Ok(())
}
