//! Memoization of compiled formulas, keyed by normalized source text.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use billing_core::Formula;

/// Storage for compiled formulas.
///
/// Stored formulas are shared through `Arc` and never mutated.
pub trait FormulaCache: Send + Sync {
    fn get(&self, key: &str) -> Option<Arc<Formula>>;

    /// Stores `formula` under `key` unless an entry already exists, and
    /// returns the entry that ends up cached.
    fn insert(&self, key: String, formula: Arc<Formula>) -> Arc<Formula>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Unbounded in-memory cache living as long as its engine.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Arc<Formula>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FormulaCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Arc<Formula>> {
        // Entries are immutable, so a poisoned lock still holds valid data.
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn insert(&self, key: String, formula: Arc<Formula>) -> Arc<Formula> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.entry(key).or_insert(formula).clone()
    }

    fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Cache that stores nothing; every build compiles afresh.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCache;

impl FormulaCache for NoopCache {
    fn get(&self, _key: &str) -> Option<Arc<Formula>> {
        None
    }

    fn insert(&self, _key: String, formula: Arc<Formula>) -> Arc<Formula> {
        formula
    }

    fn len(&self) -> usize {
        0
    }
}
