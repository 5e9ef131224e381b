//! `billing validate` -- report the first error in formula text.
//!
//! Prints `OK` for valid input. Invalid input prints the error message and
//! exits with status 1.

use anyhow::Result;

use crate::cli::ValidateArgs;
use crate::commands::read_source;
use crate::context::RuntimeContext;
use crate::output::{output_json, output_line};

/// Execute the `billing validate` command.
pub fn run(ctx: &RuntimeContext, args: &ValidateArgs) -> Result<()> {
    let source = read_source(&args.source)?;
    let error = ctx.engine().validate(source);

    if ctx.json {
        output_json(&serde_json::json!({
            "valid": error.is_none(),
            "error": error,
        }));
    } else {
        match &error {
            Some(message) => output_line(message),
            None if !ctx.quiet => output_line("OK"),
            None => {}
        }
    }

    if error.is_some() {
        std::process::exit(1);
    }
    Ok(())
}
