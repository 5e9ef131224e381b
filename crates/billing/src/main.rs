//! `billing` -- build and validate billing formulas from the command line.
//!
//! Parses CLI arguments with clap, loads configuration into a runtime
//! context, and dispatches to command handlers.

mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;

use cli::{Cli, Commands, GlobalArgs};
use context::RuntimeContext;

fn main() {
    let cli = Cli::parse();

    if cli.global.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("billing=debug,billing_formula=debug,billing_config=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    let ctx = match RuntimeContext::from_global_args(&cli.global) {
        Ok(ctx) => ctx,
        Err(e) => exit_with_error(&cli.global, &e),
    };

    let result = match cli.command {
        Some(Commands::Build(args)) => commands::build::run(&ctx, &args),
        Some(Commands::Validate(args)) => commands::validate::run(&ctx, &args),
        Some(Commands::Normalize(args)) => commands::normalize::run(&ctx, &args),
        Some(Commands::Config(args)) => commands::config_cmd::run(&ctx, &args),
        Some(Commands::Completion(args)) => commands::completion::run(&args),
        Some(Commands::Version) => commands::version::run(&ctx),
        None => {
            // No subcommand -- print help
            use clap::CommandFactory;
            Cli::command().print_help().ok();
            println!();
            Ok(())
        }
    };

    if let Err(e) = result {
        exit_with_error(&cli.global, &e);
    }
}

/// Print `e` (as JSON in JSON mode) to stderr and exit with code 1.
fn exit_with_error(global: &GlobalArgs, e: &anyhow::Error) -> ! {
    if global.json {
        let err_json = serde_json::json!({
            "error": format!("{:#}", e),
        });
        if let Ok(s) = serde_json::to_string_pretty(&err_json) {
            eprintln!("{}", s);
        }
    } else {
        eprintln!("Error: {:#}", e);
    }
    std::process::exit(1);
}
