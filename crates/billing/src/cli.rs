//! Clap CLI definitions for the `billing` command.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// billing -- build and check charge formulas.
///
/// Formulas are method chains such as
/// `discount.fixed('2%').since('2018-08-01').reason('loyalty')`.
#[derive(Parser, Debug)]
#[command(
    name = "billing",
    about = "Build and validate billing formulas",
    long_about = "Compiles billing formulas (discounts, installments) into modifiers and reports formula errors.",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Config file (default: $BILLING_CONFIG or the nearest billing.yaml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output (errors only).
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build formulas and print the resulting modifiers.
    Build(BuildArgs),

    /// Check formulas and report the first error.
    #[command(alias = "check")]
    Validate(ValidateArgs),

    /// Print the normalized form of a formula.
    Normalize(NormalizeArgs),

    /// Show or initialize configuration.
    Config(ConfigArgs),

    /// Generate shell completions.
    Completion(CompletionArgs),

    /// Print version information.
    Version,
}

// ---------------------------------------------------------------------------
// Formula sources
// ---------------------------------------------------------------------------

/// Where formula text comes from: positional arguments or a file.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Formula text; each argument is one or more newline-separated statements.
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub formulas: Vec<String>,

    /// Read formulas from a file, one statement per line.
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,
}

/// Arguments for `billing build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Arguments for `billing validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Arguments for `billing normalize`.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Formula text to normalize.
    pub formula: String,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Arguments for `billing config`.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration.
    Show,

    /// Write a billing.yaml holding the effective configuration.
    Init(ConfigInitArgs),
}

/// Arguments for `billing config init`.
#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Target file.
    #[arg(default_value = "billing.yaml")]
    pub path: PathBuf,

    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Arguments for `billing completion`.
#[derive(Args, Debug)]
pub struct CompletionArgs {
    #[command(subcommand)]
    pub command: CompletionCommands,
}

/// Completion subcommands.
#[derive(Subcommand, Debug)]
pub enum CompletionCommands {
    /// Generate Bash completions.
    Bash,
    /// Generate Zsh completions.
    Zsh,
    /// Generate Fish completions.
    Fish,
    /// Generate PowerShell completions.
    Powershell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn file_and_positional_conflict() {
        let res = Cli::try_parse_from(["billing", "build", "x", "--file", "f.txt"]);
        assert!(res.is_err());
    }

    #[test]
    fn build_requires_a_source() {
        assert!(Cli::try_parse_from(["billing", "build"]).is_err());
        let cli = Cli::try_parse_from(["billing", "build", "--file", "f.txt"]).unwrap();
        match cli.command {
            Some(Commands::Build(args)) => {
                assert!(args.source.formulas.is_empty());
                assert_eq!(args.source.file, Some(PathBuf::from("f.txt")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["billing", "normalize", " a ", "--json", "-v"]).unwrap();
        assert!(cli.global.json);
        assert!(cli.global.verbose);
    }
}
