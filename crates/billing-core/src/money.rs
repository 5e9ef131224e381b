//! Minimal money and quantity values, enough for bill aggregation.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("currency mismatch: {0} vs {1}")]
    CurrencyMismatch(String, String),
}

/// An amount in a given currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Money {
    amount: Decimal,
    currency: String,
}

impl Money {
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.clone(),
                other.currency.clone(),
            ));
        }
        Ok(Money::new(self.amount + other.amount, self.currency.clone()))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// A measured amount of something, e.g. "3 items" or "1.5 gb".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Quantity {
    value: Decimal,
    unit: String,
}

impl Quantity {
    pub fn new(value: Decimal, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Only identical units are convertible; no conversion tables are kept.
    pub fn is_convertible(&self, unit: &str) -> bool {
        self.unit == unit
    }

    /// Sum of two quantities, `None` if the units are not convertible.
    pub fn add(&self, other: &Quantity) -> Option<Quantity> {
        self.is_convertible(&other.unit)
            .then(|| Quantity::new(self.value + other.value, self.unit.clone()))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_adds_same_currency() {
        let a = Money::new(Decimal::from(10), "USD");
        let b = Money::new(Decimal::from(5), "USD");
        assert_eq!(a.add(&b).unwrap(), Money::new(Decimal::from(15), "USD"));
    }

    #[test]
    fn money_rejects_mixed_currency() {
        let a = Money::new(Decimal::from(10), "USD");
        let b = Money::new(Decimal::from(5), "EUR");
        assert_eq!(
            a.add(&b).unwrap_err(),
            MoneyError::CurrencyMismatch("USD".into(), "EUR".into())
        );
    }

    #[test]
    fn quantity_adds_only_same_unit() {
        let a = Quantity::new(Decimal::from(2), "items");
        let b = Quantity::new(Decimal::from(3), "items");
        let c = Quantity::new(Decimal::from(3), "gb");
        assert_eq!(a.add(&b), Some(Quantity::new(Decimal::from(5), "items")));
        assert_eq!(a.add(&c), None);
    }
}
