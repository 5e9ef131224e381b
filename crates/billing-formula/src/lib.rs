//! Formula engine for the billing toolkit.
//!
//! Formulas are method-chain expressions describing pricing adjustments,
//! for example:
//!
//! ```text
//! discount.fixed('2%').since('2018-08-01').reason('loyalty')
//! installment.since('2024-08-01').lasts('2 months')
//! ```
//!
//! The engine normalizes the source text, parses it into a chain of calls,
//! resolves each call against a registry of modifiers and addons, and
//! returns an immutable [`billing_core::Formula`]. Compiled formulas are
//! cached by normalized text.

pub mod ast;
pub mod builder;
pub mod cache;
pub mod engine;
pub mod error;
pub mod lexer;
pub mod normalize;
pub mod options;
pub mod parser;
pub mod registry;

pub use cache::{FormulaCache, MemoryCache, NoopCache};
pub use engine::FormulaEngine;
pub use error::{FormulaError, ParseError};
pub use normalize::{FormulaInput, normalize};
pub use options::{DuplicateAddons, EngineOptions};
