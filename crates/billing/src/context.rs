//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds what a command handler needs: the loaded
//! configuration, output flags, and the formula engine built from that
//! configuration.

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use billing_config::{BillingConfig, find_config_file, load_config};
use billing_formula::FormulaEngine;
use tracing::debug;

use crate::cli::GlobalArgs;

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
pub struct RuntimeContext {
    /// Config file the configuration was read from, if any.
    pub config_path: Option<PathBuf>,

    /// Effective configuration (defaults, file and environment).
    pub config: BillingConfig,

    /// Whether to produce JSON output.
    pub json: bool,

    /// Quiet mode: suppress non-essential output.
    pub quiet: bool,

    engine: FormulaEngine,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments.
    ///
    /// The config file is `--config` when given, otherwise the nearest
    /// `billing.yaml` found from the current directory upwards.
    pub fn from_global_args(global: &GlobalArgs) -> Result<Self> {
        let config_path = match &global.config {
            Some(path) => Some(path.clone()),
            None => env::current_dir()
                .ok()
                .and_then(|cwd| find_config_file(&cwd)),
        };
        let config = load_config(config_path.as_deref())?;
        debug!(path = ?config_path, ?config, "configuration loaded");

        let engine = FormulaEngine::from_options(config.formula.clone());

        Ok(Self {
            json: global.json || config.output.json,
            quiet: global.quiet,
            config_path,
            config,
            engine,
        })
    }

    /// The formula engine configured for this run.
    pub fn engine(&self) -> &FormulaEngine {
        &self.engine
    }
}
