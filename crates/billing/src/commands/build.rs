//! `billing build` -- compile formulas and print the resulting modifiers.

use anyhow::Result;
use tracing::debug;

use crate::cli::BuildArgs;
use crate::commands::read_source;
use crate::context::RuntimeContext;
use crate::output::{format_formula_compact, output_json, output_line};

/// Execute the `billing build` command.
pub fn run(ctx: &RuntimeContext, args: &BuildArgs) -> Result<()> {
    let source = read_source(&args.source)?;
    let formulas = ctx.engine().build_all(source)?;
    debug!(count = formulas.len(), cached = ctx.engine().cache().len(), "build finished");

    if ctx.json {
        output_json(&formulas);
        return Ok(());
    }

    let numbered = formulas.len() > 1;
    for (i, formula) in formulas.iter().enumerate() {
        output_line(&format_formula_compact(formula, numbered.then_some(i)));
    }
    Ok(())
}
