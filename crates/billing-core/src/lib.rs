//! Core types for the billing toolkit.
//!
//! This crate holds the data model shared by the formula engine and the
//! billing pipeline: the charge modifiers formulas compile into, generic
//! types and their matching rules, money and quantities, charges, bills,
//! and the aggregator that merges charges into bills.

pub mod aggregator;
pub mod charge;
pub mod modifiers;
pub mod money;
pub mod types;

pub use modifiers::{Formula, ModifierKind};
pub use types::Type;
