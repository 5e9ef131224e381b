//! Engine settings, loadable from configuration files.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What to do when a chain sets the same addon twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateAddons {
    /// The later call overwrites the earlier one.
    #[default]
    LastWins,
    /// Fail with `FormulaError::DuplicateAddon`.
    Reject,
}

impl DuplicateAddons {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LastWins => "last-wins",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for DuplicateAddons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Memoize compiled formulas by normalized source text.
    #[serde(default = "default_cache")]
    pub cache: bool,

    #[serde(default)]
    pub duplicate_addons: DuplicateAddons,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            cache: default_cache(),
            duplicate_addons: DuplicateAddons::default(),
        }
    }
}

fn default_cache() -> bool {
    true
}
