//! Charge modifiers: the typed, immutable values produced by compiling
//! formula source text.
//!
//! A [`Formula`] is one of a closed set of modifier kinds. Every kind
//! carries the shared [`Addons`] (validity bounds and a reason) plus its
//! own payload. Values are never mutated after construction; building the
//! same source twice yields structurally equal values.

pub mod addons;

use std::fmt;

use serde::Serialize;

pub use addons::{DiscountValue, Period, PeriodUnit, Reason, Since, Till, ValueKind};

/// The kind of a [`Formula`], fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModifierKind {
    FixedDiscount,
    Installment,
}

impl ModifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FixedDiscount => "fixed-discount",
            Self::Installment => "installment",
        }
    }
}

impl fmt::Display for ModifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Addons shared by every modifier kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Addons {
    #[serde(skip_serializing_if = "Option::is_none")]
    since: Option<Since>,
    #[serde(skip_serializing_if = "Option::is_none")]
    till: Option<Till>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<Reason>,
}

impl Addons {
    pub fn new(since: Option<Since>, till: Option<Till>, reason: Option<Reason>) -> Self {
        Self {
            since,
            till,
            reason,
        }
    }

    pub fn since(&self) -> Option<&Since> {
        self.since.as_ref()
    }

    pub fn till(&self) -> Option<&Till> {
        self.till.as_ref()
    }

    pub fn reason(&self) -> Option<&Reason> {
        self.reason.as_ref()
    }
}

/// A discount whose value is either a percentage or a fixed amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixedDiscount {
    value: DiscountValue,
    #[serde(flatten)]
    addons: Addons,
}

impl FixedDiscount {
    pub fn new(value: DiscountValue, addons: Addons) -> Self {
        Self { value, addons }
    }

    pub fn value(&self) -> &DiscountValue {
        &self.value
    }

    /// Returns `true` when the value is a percentage.
    pub fn is_relative(&self) -> bool {
        self.value.is_relative()
    }

    pub fn addons(&self) -> &Addons {
        &self.addons
    }
}

/// Spreads a charge over a term, e.g. "2 months".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Installment {
    #[serde(skip_serializing_if = "Option::is_none")]
    term: Option<Period>,
    #[serde(flatten)]
    addons: Addons,
}

impl Installment {
    pub fn new(term: Option<Period>, addons: Addons) -> Self {
        Self { term, addons }
    }

    pub fn term(&self) -> Option<&Period> {
        self.term.as_ref()
    }

    pub fn addons(&self) -> &Addons {
        &self.addons
    }
}

/// A compiled formula: one charge modifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Formula {
    FixedDiscount(FixedDiscount),
    Installment(Installment),
}

impl Formula {
    pub fn kind(&self) -> ModifierKind {
        match self {
            Self::FixedDiscount(_) => ModifierKind::FixedDiscount,
            Self::Installment(_) => ModifierKind::Installment,
        }
    }

    pub fn addons(&self) -> &Addons {
        match self {
            Self::FixedDiscount(d) => d.addons(),
            Self::Installment(i) => i.addons(),
        }
    }

    pub fn since(&self) -> Option<&Since> {
        self.addons().since()
    }

    pub fn till(&self) -> Option<&Till> {
        self.addons().till()
    }

    pub fn reason(&self) -> Option<&Reason> {
        self.addons().reason()
    }

    /// Discount value, absent for kinds that carry none.
    pub fn value(&self) -> Option<&DiscountValue> {
        match self {
            Self::FixedDiscount(d) => Some(d.value()),
            Self::Installment(_) => None,
        }
    }

    pub fn is_relative(&self) -> bool {
        self.value().is_some_and(DiscountValue::is_relative)
    }

    /// Installment term, absent for other kinds.
    pub fn term(&self) -> Option<&Period> {
        match self {
            Self::Installment(i) => i.term(),
            Self::FixedDiscount(_) => None,
        }
    }

    /// Returns `false` when both bounds are set and `since` is after `till`.
    ///
    /// Formulas are built as written; consumers decide whether to reject
    /// inverted intervals.
    pub fn has_valid_interval(&self) -> bool {
        match (self.since(), self.till()) {
            (Some(since), Some(till)) => since.value() <= till.value(),
            _ => true,
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FixedDiscount(d) => write!(f, "{} {}", self.kind(), d.value())?,
            Self::Installment(i) => match i.term() {
                Some(term) => write!(f, "{} {}", self.kind(), term)?,
                None => write!(f, "{}", self.kind())?,
            },
        }
        if let Some(since) = self.since() {
            write!(f, " since {}", since.value().date())?;
        }
        if let Some(till) = self.till() {
            write!(f, " till {}", till.value().date())?;
        }
        if let Some(reason) = self.reason() {
            write!(f, " ({})", reason)?;
        }
        Ok(())
    }
}
