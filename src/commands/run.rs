//! Executes input scripts through a session and reports what failed.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use crate::core::diagnostics::report_error;
use crate::core::engine::Engine;
use crate::core::session::{Report, Session, SessionHooks};

/// Runs each file in order. Returns `false` if any statement failed.
pub fn run_files<E: Engine, H: SessionHooks>(
    session: &mut Session<E, H>,
    inputs: &[PathBuf],
    pretty: bool,
) -> Result<bool> {
    let mut ok = true;
    for input in inputs {
        let source = fs::read_to_string(input)
            .with_context(|| format!("Read input {}", input.display()))?;
        let name = input.display().to_string();
        session.hooks_mut().file_loaded(&name, &source);
        let report = session.execute(&source);
        print_report(&report, &name, &source, pretty);
        ok &= report.is_ok();
        if session.quit_requested() {
            break;
        }
    }
    Ok(ok)
}

/// Prints `forall` echoes to stdout and failures to stderr.
pub fn print_report(report: &Report, filename: &str, source: &str, pretty: bool) {
    for echo in &report.echoes {
        println!("{}", echo);
    }
    for failure in &report.failures {
        match &failure.file {
            // Nested scripts: their source is not at hand, keep it to one line.
            Some(file) => eprintln!("{} {}: {}", "error:".bright_red(), file, failure.error),
            None => report_error(filename, source, &failure.error, pretty),
        }
    }
}
