//! The formula engine facade: normalize, build (with caching) and validate.

use std::sync::Arc;

use billing_core::Formula;
use tracing::{debug, warn};

use crate::ast::Statement;
use crate::builder::build_statement;
use crate::cache::{FormulaCache, MemoryCache, NoopCache};
use crate::error::{FormulaError, Result};
use crate::normalize::{FormulaInput, normalize};
use crate::options::EngineOptions;
use crate::parser::{parse, parse_statement};
use crate::registry::Registry;

/// Compiles formula source into shared, immutable [`Formula`] values.
///
/// The engine is `Send + Sync`; its cache is the only shared mutable state.
pub struct FormulaEngine {
    registry: Registry,
    cache: Arc<dyn FormulaCache>,
    options: EngineOptions,
}

impl FormulaEngine {
    /// Engine with default options backed by `cache`.
    pub fn new(cache: Arc<dyn FormulaCache>) -> Self {
        Self::with_options(cache, EngineOptions::default())
    }

    pub fn with_options(cache: Arc<dyn FormulaCache>, options: EngineOptions) -> Self {
        Self {
            registry: Registry::new(),
            cache,
            options,
        }
    }

    /// Engine whose cache is chosen by `options.cache`.
    pub fn from_options(options: EngineOptions) -> Self {
        let cache: Arc<dyn FormulaCache> = if options.cache {
            Arc::new(MemoryCache::new())
        } else {
            Arc::new(NoopCache)
        };
        Self::with_options(cache, options)
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn cache(&self) -> &dyn FormulaCache {
        self.cache.as_ref()
    }

    /// Canonical form of `input`; `None` when it holds no text.
    pub fn normalize(&self, input: impl Into<FormulaInput>) -> Option<String> {
        normalize(input)
    }

    /// Builds the single formula `input` describes.
    ///
    /// Sources holding more than one statement are rejected with a parse
    /// error at the second statement; use [`FormulaEngine::build_all`] for
    /// batches.
    pub fn build(&self, input: impl Into<FormulaInput>) -> Result<Arc<Formula>> {
        let source = normalize(input).ok_or(FormulaError::EmptyFormula)?;
        self.cached(&source, || {
            let statement = parse_statement(&source)?;
            self.build_one(&statement)
        })
    }

    /// Builds every newline-separated statement of `input`, in order.
    ///
    /// Each statement is cached on its own, keyed by its normalized line.
    pub fn build_all(&self, input: impl Into<FormulaInput>) -> Result<Vec<Arc<Formula>>> {
        let source = normalize(input).ok_or(FormulaError::EmptyFormula)?;
        self.build_program(&source)
    }

    /// Runs the build pipeline and reports the first failure as text.
    ///
    /// Returns `None` when every statement builds. Empty input is parsed
    /// as-is and reported as an unexpected end of input.
    pub fn validate(&self, input: impl Into<FormulaInput>) -> Option<String> {
        let source = normalize(input).unwrap_or_default();
        match self.build_program(&source) {
            Ok(_) => None,
            Err(e) => {
                debug!(formula = %source, error = %e, "formula is invalid");
                Some(e.to_string())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn build_program(&self, source: &str) -> Result<Vec<Arc<Formula>>> {
        let program = parse(source)?;
        let lines: Vec<&str> = source.lines().collect();
        program
            .statements
            .iter()
            .map(|statement| {
                // Statements never span lines, so a statement's line is its own source.
                let line = statement.pos().line as usize;
                match line.checked_sub(1).and_then(|i| lines.get(i)) {
                    Some(key) => self.cached(key, || self.build_one(statement)),
                    None => {
                        warn!(line, "statement line not found in source, skipping cache");
                        self.build_one(statement).map(Arc::new)
                    }
                }
            })
            .collect()
    }

    fn build_one(&self, statement: &Statement) -> Result<Formula> {
        build_statement(&self.registry, statement, self.options.duplicate_addons)
    }

    fn cached(&self, key: &str, compile: impl FnOnce() -> Result<Formula>) -> Result<Arc<Formula>> {
        if let Some(hit) = self.cache.get(key) {
            debug!(formula = key, "formula cache hit");
            return Ok(hit);
        }
        let formula = compile()?;
        debug!(formula = key, kind = %formula.kind(), "formula compiled");
        Ok(self.cache.insert(key.to_owned(), Arc::new(formula)))
    }
}

impl Default for FormulaEngine {
    fn default() -> Self {
        Self::from_options(EngineOptions::default())
    }
}
