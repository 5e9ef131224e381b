//! `billing config` -- show or initialize configuration.

use anyhow::{Result, bail};
use billing_config::save_config;

use crate::cli::{ConfigArgs, ConfigCommands, ConfigInitArgs};
use crate::context::RuntimeContext;
use crate::output::{output_json, output_line};

/// Execute the `billing config` command.
pub fn run(ctx: &RuntimeContext, args: &ConfigArgs) -> Result<()> {
    match &args.command {
        ConfigCommands::Show => show(ctx),
        ConfigCommands::Init(init_args) => init(ctx, init_args),
    }
}

fn show(ctx: &RuntimeContext) -> Result<()> {
    if ctx.json {
        output_json(&ctx.config);
        return Ok(());
    }

    let source = ctx
        .config_path
        .as_ref()
        .map_or_else(|| "(defaults)".to_string(), |p| p.display().to_string());
    output_line(&format!("config file:               {}", source));
    output_line(&format!("formula.cache:             {}", ctx.config.formula.cache));
    output_line(&format!(
        "formula.duplicate_addons:  {}",
        ctx.config.formula.duplicate_addons
    ));
    output_line(&format!("output.json:               {}", ctx.config.output.json));
    Ok(())
}

fn init(ctx: &RuntimeContext, args: &ConfigInitArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.path.display()
        );
    }
    save_config(&args.path, &ctx.config)?;

    if ctx.json {
        output_json(&serde_json::json!({ "path": args.path }));
    } else if !ctx.quiet {
        output_line(&format!("Wrote {}", args.path.display()));
    }
    Ok(())
}
