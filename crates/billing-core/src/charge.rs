//! Charges and the bills they are aggregated into.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::modifiers::Formula;
use crate::money::{Money, Quantity};
use crate::types::Type;

/// Errors raised while recording charges.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChargeError {
    #[error("Charge {id} being saved overlaps a previously saved one. Unique key: {unique_key}")]
    Overlapping { id: String, unique_key: String },
}

/// Period a charge or bill accounts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UsageInterval {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl UsageInterval {
    /// Creates an interval, swapping the bounds if they are given in reverse.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        if end < start {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Smallest interval covering both `self` and `other`.
    pub fn extend(&self, other: &UsageInterval) -> UsageInterval {
        UsageInterval {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A single priced usage of a target, with the modifiers that applied to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Charge {
    pub id: Option<String>,
    pub r#type: Type,
    pub target: String,
    pub sum: Money,
    pub usage: Quantity,
    pub interval: UsageInterval,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Arc<Formula>>,
}

impl Charge {
    pub fn new(
        r#type: Type,
        target: impl Into<String>,
        sum: Money,
        usage: Quantity,
        interval: UsageInterval,
    ) -> Self {
        Self {
            id: None,
            r#type,
            target: target.into(),
            sum,
            usage,
            interval,
            modifiers: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Attaches a compiled formula as a modifier of this charge.
    pub fn with_modifier(mut self, formula: Arc<Formula>) -> Self {
        self.modifiers.push(formula);
        self
    }

    /// Key identifying what this charge accounts for.
    pub fn unique_string(&self) -> String {
        format!(
            "{}|{}|{}",
            self.r#type.unique_id(),
            self.target,
            self.interval.start().format("%Y-%m-%d %H:%M:%S")
        )
    }
}

/// Charges merged under one uniqueness key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bill {
    pub id: Option<String>,
    pub r#type: Type,
    pub time: NaiveDateTime,
    pub sum: Money,
    pub quantity: Quantity,
    pub customer: String,
    pub target: String,
    pub plan: Option<String>,
    pub charges: Vec<Charge>,
    pub usage_interval: UsageInterval,
}

impl Bill {
    /// Uniqueness key: bills with equal keys are merged by the aggregator.
    pub fn unique_string(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}",
            self.sum.currency(),
            self.customer,
            self.target,
            self.r#type.unique_id(),
            self.time.format("%Y-%m-%d %H:%M:%S"),
            self.plan.as_deref().unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 8, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn interval_normalizes_and_extends() {
        let a = UsageInterval::new(day(10), day(5));
        assert_eq!(a.start(), day(5));
        let b = UsageInterval::new(day(8), day(20));
        let both = a.extend(&b);
        assert_eq!(both.start(), day(5));
        assert_eq!(both.end(), day(20));
    }

    #[test]
    fn charge_unique_string() {
        let charge = Charge::new(
            Type::new("1", Some("monthly")),
            "server-1",
            Money::new(Decimal::from(10), "USD"),
            Quantity::new(Decimal::ONE, "items"),
            UsageInterval::new(day(1), day(31)),
        );
        assert_eq!(charge.unique_string(), "monthly|server-1|2024-08-01 00:00:00");
    }

    #[test]
    fn overlapping_message() {
        let err = ChargeError::Overlapping {
            id: "42".into(),
            unique_key: "monthly|server-1".into(),
        };
        assert_eq!(
            err.to_string(),
            "Charge 42 being saved overlaps a previously saved one. Unique key: monthly|server-1"
        );
    }
}
