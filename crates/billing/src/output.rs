//! Output formatting helpers for the `billing` CLI.

use std::io::{self, Write};

use billing_core::Formula;
use serde::Serialize;

/// Print a value as pretty JSON to stdout.
pub fn output_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            // Ignore broken pipe errors (e.g., piped to `head`)
            let _ = writeln!(handle, "{}", json);
        }
        Err(e) => {
            eprintln!("Error: failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print a line to stdout, ignoring broken pipes.
pub fn output_line(line: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let _ = writeln!(handle, "{}", line);
}

/// Format a formula as a compact one-line string.
///
/// Format: `{kind} {value|term} [since D] [till D] [(reason)]`, prefixed
/// with its 1-based position when `index` is given.
pub fn format_formula_compact(formula: &Formula, index: Option<usize>) -> String {
    match index {
        Some(i) => format!("{:>3}. {}", i + 1, formula),
        None => formula.to_string(),
    }
}
