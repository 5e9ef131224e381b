//! Configuration for the billing toolkit.
//!
//! This crate loads `billing.yaml` files layered with `BILLING_*`
//! environment variables, and locates the config file by walking up the
//! directory tree.

pub mod config;
pub mod discovery;

pub use config::{BillingConfig, ConfigError, OutputConfig, load_config, save_config};
pub use discovery::find_config_file;
