//! Addon values attached to charge modifiers.
//!
//! Each addon wraps a single field and is immutable once constructed.

use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

/// Inclusive lower validity bound of a modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Since(NaiveDateTime);

impl Since {
    pub fn new(value: NaiveDateTime) -> Self {
        Self(value)
    }

    pub fn value(&self) -> NaiveDateTime {
        self.0
    }
}

/// Inclusive upper validity bound of a modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Till(NaiveDateTime);

impl Till {
    pub fn new(value: NaiveDateTime) -> Self {
        Self(value)
    }

    pub fn value(&self) -> NaiveDateTime {
        self.0
    }
}

/// Free-text explanation, used for audit and display only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Reason(String);

impl Reason {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Periods
// ---------------------------------------------------------------------------

/// Unit of a [`Period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    Day,
    Month,
    Year,
}

impl PeriodUnit {
    /// Returns the singular unit name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Parses a unit name, accepting singular and plural forms.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "day" | "days" => Some(Self::Day),
            "month" | "months" => Some(Self::Month),
            "year" | "years" => Some(Self::Year),
            _ => None,
        }
    }
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A duration expressed as a count of calendar units, e.g. "2 months".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Period {
    count: u32,
    unit: PeriodUnit,
}

impl Period {
    pub fn new(count: u32, unit: PeriodUnit) -> Self {
        Self { count, unit }
    }

    pub fn months(count: u32) -> Self {
        Self::new(count, PeriodUnit::Month)
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn unit(&self) -> PeriodUnit {
        self.unit
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.count == 1 { "" } else { "s" };
        write!(f, "{} {}{}", self.count, self.unit, plural)
    }
}

// ---------------------------------------------------------------------------
// Discount value
// ---------------------------------------------------------------------------

/// How a [`DiscountValue`] magnitude is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Percentage of the charged sum.
    Relative,
    /// Fixed amount, optionally in a given currency.
    Absolute,
}

/// Magnitude of a discount plus its interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DiscountValue {
    magnitude: Decimal,
    kind: ValueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    currency: Option<String>,
}

impl DiscountValue {
    pub fn relative(magnitude: Decimal) -> Self {
        Self {
            magnitude,
            kind: ValueKind::Relative,
            currency: None,
        }
    }

    pub fn absolute(magnitude: Decimal, currency: Option<String>) -> Self {
        Self {
            magnitude,
            kind: ValueKind::Absolute,
            currency,
        }
    }

    pub fn magnitude(&self) -> Decimal {
        self.magnitude
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    pub fn is_relative(&self) -> bool {
        self.kind == ValueKind::Relative
    }
}

impl fmt::Display for DiscountValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, &self.currency) {
            (ValueKind::Relative, _) => write!(f, "{}%", self.magnitude),
            (ValueKind::Absolute, Some(currency)) => write!(f, "{} {}", self.magnitude, currency),
            (ValueKind::Absolute, None) => write!(f, "{}", self.magnitude),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn period_unit_accepts_plurals() {
        assert_eq!(PeriodUnit::parse("months"), Some(PeriodUnit::Month));
        assert_eq!(PeriodUnit::parse("Day"), Some(PeriodUnit::Day));
        assert_eq!(PeriodUnit::parse("years"), Some(PeriodUnit::Year));
        assert_eq!(PeriodUnit::parse("weeks"), None);
    }

    #[test]
    fn period_display() {
        assert_eq!(Period::months(2).to_string(), "2 months");
        assert_eq!(Period::new(1, PeriodUnit::Year).to_string(), "1 year");
    }

    #[test]
    fn discount_value_display() {
        let two = Decimal::from_str("2").unwrap();
        assert_eq!(DiscountValue::relative(two).to_string(), "2%");
        assert_eq!(
            DiscountValue::absolute(two, Some("USD".into())).to_string(),
            "2 USD"
        );
        assert_eq!(DiscountValue::absolute(two, None).to_string(), "2");
    }
}
