//! `billing normalize` -- print the canonical form of formula text.

use anyhow::Result;

use crate::cli::NormalizeArgs;
use crate::context::RuntimeContext;
use crate::output::{output_json, output_line};

/// Execute the `billing normalize` command.
///
/// Input without any text prints nothing (JSON: `null`).
pub fn run(ctx: &RuntimeContext, args: &NormalizeArgs) -> Result<()> {
    let normalized = ctx.engine().normalize(&args.formula);

    if ctx.json {
        output_json(&serde_json::json!({ "normalized": normalized }));
    } else if let Some(text) = normalized {
        output_line(&text);
    }
    Ok(())
}
