//! Merge charges into bills by uniqueness key.
//!
//! Every charge is first turned into a single-charge bill by a
//! [`Generalizer`]; bills with the same [`Bill::unique_string`] are then
//! merged. Output order follows the first appearance of each key.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::charge::{Bill, Charge, ChargeError};
use crate::money::MoneyError;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AggregationError {
    #[error("cannot aggregate bills with different IDs: {0} and {1}")]
    ConflictingIds(String, String),

    #[error("cannot aggregate bill sums: {0}")]
    Money(#[from] MoneyError),
}

/// Turns a charge into the bill it belongs to.
pub trait Generalizer {
    fn create_bill(&self, charge: &Charge) -> Bill;
}

/// Fields a bill takes from outside the charge itself.
#[derive(Debug, Clone)]
pub struct BillContext {
    pub customer: String,
    pub plan: Option<String>,
    pub time: NaiveDateTime,
}

/// Builds bills stamped with a fixed [`BillContext`].
#[derive(Debug, Clone)]
pub struct SimpleGeneralizer {
    context: BillContext,
}

impl SimpleGeneralizer {
    pub fn new(context: BillContext) -> Self {
        Self { context }
    }
}

impl Generalizer for SimpleGeneralizer {
    fn create_bill(&self, charge: &Charge) -> Bill {
        Bill {
            id: None,
            r#type: charge.r#type.clone(),
            time: self.context.time,
            sum: charge.sum.clone(),
            quantity: charge.usage.clone(),
            customer: self.context.customer.clone(),
            target: charge.target.clone(),
            plan: self.context.plan.clone(),
            charges: vec![charge.clone()],
            usage_interval: charge.interval,
        }
    }
}

pub struct Aggregator<G> {
    generalizer: G,
}

impl<G: Generalizer> Aggregator<G> {
    pub fn new(generalizer: G) -> Self {
        Self { generalizer }
    }

    /// Aggregates charges into bills.
    pub fn aggregate_charges<'a>(
        &self,
        charges: impl IntoIterator<Item = &'a Charge>,
    ) -> Result<Vec<Bill>, AggregationError> {
        let mut bills = BillSet::default();
        for charge in charges {
            bills.merge(self.generalizer.create_bill(charge))?;
        }
        Ok(bills.into_vec())
    }

    /// Aggregates each group on its own, then merges the resulting bills.
    pub fn aggregate_batches(&self, batches: &[Vec<Charge>]) -> Result<Vec<Bill>, AggregationError> {
        let mut bills = BillSet::default();
        for batch in batches {
            for bill in self.aggregate_charges(batch)? {
                bills.merge(bill)?;
            }
        }
        Ok(bills.into_vec())
    }
}

/// Fails if `charge` covers the same key as an already recorded charge
/// with a different id.
pub fn ensure_no_overlap(existing: &[Charge], charge: &Charge) -> Result<(), ChargeError> {
    let key = charge.unique_string();
    let clash = existing
        .iter()
        .any(|c| c.id != charge.id && c.unique_string() == key);
    if clash {
        return Err(ChargeError::Overlapping {
            id: charge.id.clone().unwrap_or_else(|| "<unsaved>".into()),
            unique_key: key,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

#[derive(Default)]
struct BillSet {
    order: Vec<Bill>,
    index: HashMap<String, usize>,
}

impl BillSet {
    fn merge(&mut self, bill: Bill) -> Result<(), AggregationError> {
        let uid = bill.unique_string();
        match self.index.get(&uid) {
            Some(&pos) => {
                let merged = merge_bills(&self.order[pos], bill)?;
                self.order[pos] = merged;
            }
            None => {
                self.index.insert(uid, self.order.len());
                self.order.push(bill);
            }
        }
        Ok(())
    }

    fn into_vec(self) -> Vec<Bill> {
        self.order
    }
}

fn merge_bills(first: &Bill, other: Bill) -> Result<Bill, AggregationError> {
    let id = merge_ids(first.id.as_deref(), other.id.as_deref())?;
    let sum = first.sum.add(&other.sum)?;
    let quantity = first
        .quantity
        .add(&other.quantity)
        .unwrap_or_else(|| first.quantity.clone());
    let usage_interval = first.usage_interval.extend(&other.usage_interval);

    let mut charges = first.charges.clone();
    charges.extend(other.charges);

    Ok(Bill {
        id,
        r#type: first.r#type.clone(),
        time: first.time,
        sum,
        quantity,
        customer: first.customer.clone(),
        target: first.target.clone(),
        plan: first.plan.clone(),
        charges,
        usage_interval,
    })
}

fn merge_ids(first: Option<&str>, other: Option<&str>) -> Result<Option<String>, AggregationError> {
    match (first, other) {
        (None, id) | (id, None) => Ok(id.map(str::to_owned)),
        (Some(a), Some(b)) if a == b => Ok(Some(b.to_owned())),
        (Some(a), Some(b)) => Err(AggregationError::ConflictingIds(a.to_owned(), b.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charge::UsageInterval;
    use crate::money::{Money, Quantity};
    use crate::types::Type;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 8, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn aggregator() -> Aggregator<SimpleGeneralizer> {
        Aggregator::new(SimpleGeneralizer::new(BillContext {
            customer: "client".into(),
            plan: Some("plan-a".into()),
            time: day(1),
        }))
    }

    fn charge(target: &str, amount: i64, qty: i64, unit: &str, from: u32, to: u32) -> Charge {
        Charge::new(
            Type::new("1", Some("monthly")),
            target,
            Money::new(Decimal::from(amount), "USD"),
            Quantity::new(Decimal::from(qty), unit),
            UsageInterval::new(day(from), day(to)),
        )
    }

    #[test]
    fn merges_charges_with_same_key() {
        let charges = vec![
            charge("srv", 10, 1, "items", 1, 10),
            charge("srv", 5, 2, "items", 5, 20),
        ];
        let bills = aggregator().aggregate_charges(&charges).unwrap();
        assert_eq!(bills.len(), 1);
        let bill = &bills[0];
        assert_eq!(bill.sum, Money::new(Decimal::from(15), "USD"));
        assert_eq!(bill.quantity, Quantity::new(Decimal::from(3), "items"));
        assert_eq!(bill.charges.len(), 2);
        assert_eq!(bill.usage_interval, UsageInterval::new(day(1), day(20)));
    }

    #[test]
    fn keeps_first_quantity_when_units_differ() {
        let charges = vec![
            charge("srv", 10, 1, "items", 1, 10),
            charge("srv", 5, 2, "gb", 1, 10),
        ];
        let bills = aggregator().aggregate_charges(&charges).unwrap();
        assert_eq!(bills[0].quantity, Quantity::new(Decimal::from(1), "items"));
        assert_eq!(bills[0].sum.amount(), Decimal::from(15));
    }

    #[test]
    fn separate_targets_stay_separate_in_order() {
        let charges = vec![
            charge("b", 1, 1, "items", 1, 2),
            charge("a", 1, 1, "items", 1, 2),
            charge("b", 1, 1, "items", 1, 2),
        ];
        let bills = aggregator().aggregate_charges(&charges).unwrap();
        let targets: Vec<&str> = bills.iter().map(|b| b.target.as_str()).collect();
        assert_eq!(targets, vec!["b", "a"]);
    }

    #[test]
    fn batches_are_merged_across_groups() {
        let batches = vec![
            vec![charge("srv", 1, 1, "items", 1, 2)],
            vec![charge("srv", 2, 1, "items", 3, 4), charge("x", 7, 1, "items", 1, 2)],
        ];
        let bills = aggregator().aggregate_batches(&batches).unwrap();
        assert_eq!(bills.len(), 2);
        assert_eq!(bills[0].sum.amount(), Decimal::from(3));
    }

    #[test]
    fn id_merging_rules() {
        assert_eq!(merge_ids(None, Some("7")).unwrap(), Some("7".into()));
        assert_eq!(merge_ids(Some("7"), None).unwrap(), Some("7".into()));
        assert_eq!(merge_ids(Some("7"), Some("7")).unwrap(), Some("7".into()));
        assert_eq!(merge_ids(None, None).unwrap(), None);
        assert_eq!(
            merge_ids(Some("7"), Some("8")).unwrap_err(),
            AggregationError::ConflictingIds("7".into(), "8".into())
        );
    }

    #[test]
    fn currency_mismatch_fails() {
        let mut eur = charge("srv", 5, 1, "items", 1, 2);
        eur.sum = Money::new(Decimal::from(5), "EUR");
        // Different currency means a different key, so force a merge directly.
        let usd = aggregator().generalizer.create_bill(&charge("srv", 5, 1, "items", 1, 2));
        let eur = aggregator().generalizer.create_bill(&eur);
        assert!(matches!(merge_bills(&usd, eur), Err(AggregationError::Money(_))));
    }

    #[test]
    fn overlap_detection() {
        let saved = vec![charge("srv", 1, 1, "items", 1, 2).with_id("1")];
        let same = charge("srv", 1, 1, "items", 1, 2).with_id("1");
        assert!(ensure_no_overlap(&saved, &same).is_ok());

        let clash = charge("srv", 1, 1, "items", 1, 5).with_id("2");
        let err = ensure_no_overlap(&saved, &clash).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Charge 2 being saved overlaps a previously saved one. Unique key: monthly|srv|2024-08-01 00:00:00"
        );

        let elsewhere = charge("other", 1, 1, "items", 1, 2).with_id("3");
        assert!(ensure_no_overlap(&saved, &elsewhere).is_ok());
    }
}
