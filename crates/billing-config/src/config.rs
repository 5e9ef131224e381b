//! Configuration types and loading.
//!
//! The main entry point is [`BillingConfig`], the contents of a
//! `billing.yaml` file. It is loaded with [`load_config`], which layers
//! defaults, the YAML file and `BILLING_*` environment variables, and
//! saved with [`save_config`].

use std::path::{Path, PathBuf};

use billing_formula::EngineOptions;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of environment variables merged over the file.
pub const ENV_PREFIX: &str = "BILLING_";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The configuration file could not be written.
    #[error("failed to write config file: {0}")]
    WriteError(#[from] std::io::Error),

    /// The configuration could not be serialized to YAML.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] serde_yaml::Error),

    /// A layer held a malformed or mistyped value.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError::Invalid(Box::new(e))
    }
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// CLI output settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Print JSON instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

/// Top-level configuration, as stored in `billing.yaml`.
///
/// ```yaml
/// formula:
///   cache: true
///   duplicate_addons: reject
/// output:
///   json: false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingConfig {
    #[serde(default)]
    pub formula: EngineOptions,

    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// Load configuration from defaults, `path` and the environment.
///
/// Later layers win: defaults, then the YAML file at `path` (if given),
/// then `BILLING_*` variables with `__` separating nested keys
/// (`BILLING_FORMULA__CACHE=false`).
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] when `path` does not exist and
/// [`ConfigError::Invalid`] when any layer fails to deserialize.
pub fn load_config(path: Option<&Path>) -> Result<BillingConfig> {
    let mut figment = Figment::from(Serialized::defaults(BillingConfig::default()));

    if let Some(path) = path {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        figment = figment.merge(Yaml::file(path));
    }

    let config = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()?;
    Ok(config)
}

/// Save configuration as YAML to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`ConfigError::WriteError`] on I/O failure or
/// [`ConfigError::SerializeError`] if serialization fails.
pub fn save_config(path: &Path, config: &BillingConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use billing_formula::DuplicateAddons;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let cfg = BillingConfig::default();
        assert!(cfg.formula.cache);
        assert_eq!(cfg.formula.duplicate_addons, DuplicateAddons::LastWins);
        assert!(!cfg.output.json);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/billing.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
        assert_eq!(err.to_string(), "config file not found: /nonexistent/billing.yaml");
    }

    #[test]
    fn test_roundtrip_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("billing.yaml");

        let mut cfg = BillingConfig::default();
        cfg.formula.cache = false;
        cfg.formula.duplicate_addons = DuplicateAddons::Reject;
        cfg.output.json = true;

        save_config(&path, &cfg).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("duplicate_addons: reject"));

        Jail::expect_with(|_| {
            let loaded = load_config(Some(&path)).map_err(|e| e.to_string())?;
            assert_eq!(loaded, cfg);
            Ok(())
        });
    }

    #[test]
    fn test_file_layer_over_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file("billing.yaml", "formula:\n  duplicate_addons: reject\n")?;
            let cfg = load_config(Some(Path::new("billing.yaml"))).map_err(|e| e.to_string())?;
            assert_eq!(cfg.formula.duplicate_addons, DuplicateAddons::Reject);
            assert!(cfg.formula.cache);
            assert!(!cfg.output.json);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("billing.yaml", "formula:\n  cache: true\noutput:\n  json: false\n")?;
            jail.set_env("BILLING_FORMULA__CACHE", "false");
            jail.set_env("BILLING_OUTPUT__JSON", "true");
            let cfg = load_config(Some(Path::new("billing.yaml"))).map_err(|e| e.to_string())?;
            assert!(!cfg.formula.cache);
            assert!(cfg.output.json);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_value_is_reported() {
        Jail::expect_with(|jail| {
            jail.create_file("billing.yaml", "formula:\n  duplicate_addons: sometimes\n")?;
            let err = load_config(Some(Path::new("billing.yaml"))).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)));
            Ok(())
        });
    }
}
