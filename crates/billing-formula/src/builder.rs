//! Evaluate parsed statements into [`Formula`] values.

use billing_core::modifiers::{
    Addons, DiscountValue, FixedDiscount, Formula, Installment, Period, Reason, Since, Till,
};
use tracing::trace;

use crate::ast::{Call, Pos, Statement};
use crate::error::{FormulaError, Result};
use crate::options::DuplicateAddons;
use crate::registry::{AddonValue, ModifierHead, Registry};

/// Builds the formula a single statement describes.
pub fn build_statement(
    registry: &Registry,
    statement: &Statement,
    duplicates: DuplicateAddons,
) -> Result<Formula> {
    match statement {
        Statement::Literal { value, .. } => Err(FormulaError::UnexpectedResult {
            printed: value.to_string(),
        }),
        Statement::Chain(head) => build_chain(registry, head, duplicates),
    }
}

fn build_chain(registry: &Registry, head: &Call, duplicates: DuplicateAddons) -> Result<Formula> {
    let kind = registry
        .resolve(&head.name)
        .ok_or_else(|| FormulaError::UnknownModifier {
            name: head.name.clone(),
            line: head.pos.line,
            column: head.pos.column,
        })?;
    if !head.args.is_empty() {
        return Err(FormulaError::ArgumentCount {
            call: head.name.clone(),
            expected: 0,
            found: head.args.len(),
        });
    }

    let mut state = ModifierState::new(kind, duplicates);
    for call in head.iter().skip(1) {
        let ctor = registry
            .resolve_addon(kind, &call.name)
            .ok_or_else(|| FormulaError::UnknownAddon {
                modifier: head.name.clone(),
                name: call.name.clone(),
                line: call.pos.line,
                column: call.pos.column,
            })?;
        let value = ctor(call)?;
        trace!(modifier = %kind, addon = %call.name, ?value, "applying addon");
        state.apply(&call.name, call.pos, value)?;
    }
    state.finish()
}

/// Accumulates addon values for one chain.
#[derive(Debug)]
struct ModifierState {
    head: ModifierHead,
    duplicates: DuplicateAddons,
    value: Option<DiscountValue>,
    term: Option<Period>,
    since: Option<Since>,
    till: Option<Till>,
    reason: Option<Reason>,
}

impl ModifierState {
    fn new(head: ModifierHead, duplicates: DuplicateAddons) -> Self {
        Self {
            head,
            duplicates,
            value: None,
            term: None,
            since: None,
            till: None,
            reason: None,
        }
    }

    fn apply(&mut self, name: &str, pos: Pos, value: AddonValue) -> Result<()> {
        let occupied = match &value {
            AddonValue::Since(_) => self.since.is_some(),
            AddonValue::Till(_) => self.till.is_some(),
            AddonValue::Reason(_) => self.reason.is_some(),
            AddonValue::Value(_) => self.value.is_some(),
            AddonValue::Term(_) => self.term.is_some(),
        };
        if occupied && self.duplicates == DuplicateAddons::Reject {
            return Err(FormulaError::DuplicateAddon {
                name: name.to_owned(),
                line: pos.line,
                column: pos.column,
            });
        }

        match value {
            AddonValue::Since(v) => self.since = Some(v),
            AddonValue::Till(v) => self.till = Some(v),
            AddonValue::Reason(v) => self.reason = Some(v),
            AddonValue::Value(v) => self.value = Some(v),
            AddonValue::Term(v) => self.term = Some(v),
        }
        Ok(())
    }

    fn finish(self) -> Result<Formula> {
        let addons = Addons::new(self.since, self.till, self.reason);
        match self.head {
            ModifierHead::Discount => match self.value {
                Some(value) => Ok(Formula::FixedDiscount(FixedDiscount::new(value, addons))),
                // A discount without a value never becomes a charge modifier.
                None => Err(FormulaError::UnexpectedResult {
                    printed: self.head.to_string(),
                }),
            },
            ModifierHead::Installment => {
                Ok(Formula::Installment(Installment::new(self.term, addons)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use billing_core::modifiers::{ModifierKind, PeriodUnit};
    use pretty_assertions::assert_eq;

    fn build_with(src: &str, duplicates: DuplicateAddons) -> Result<Formula> {
        let program = parse(src)?;
        build_statement(&Registry::new(), &program.statements[0], duplicates)
    }

    fn build(src: &str) -> Result<Formula> {
        build_with(src, DuplicateAddons::LastWins)
    }

    #[test]
    fn fixed_discount_chain() {
        let f = build("discount.fixed('2%').since('2018-08-01').reason('test reason')").unwrap();
        assert_eq!(f.kind(), ModifierKind::FixedDiscount);
        assert_eq!(f.value().unwrap().magnitude().to_string(), "2");
        assert!(f.is_relative());
        assert_eq!(f.since().unwrap().value().to_string(), "2018-08-01 00:00:00");
        assert_eq!(f.reason().unwrap().value(), "test reason");
        assert!(f.till().is_none());
    }

    #[test]
    fn addon_order_does_not_matter() {
        let a = build("discount.since('2020-01-01').fixed('10 USD')").unwrap();
        let b = build("discount.fixed('10 USD').since('2020-01-01')").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn installment_with_term() {
        let f = build("installment.since('2024-08-01').lasts('2 months').reason('test reason')")
            .unwrap();
        assert_eq!(f.kind(), ModifierKind::Installment);
        let term = f.term().unwrap();
        assert_eq!((term.count(), term.unit()), (2, PeriodUnit::Month));
    }

    #[test]
    fn installment_without_term() {
        let f = build("installment.till('2025-01-01')").unwrap();
        assert!(f.term().is_none());
        assert!(f.till().is_some());
    }

    #[test]
    fn duplicate_addons_last_wins() {
        let f = build("discount.fixed('1%').since('2020-01-01').since('2021-01-01').fixed('3%')")
            .unwrap();
        assert_eq!(f.since().unwrap().value().to_string(), "2021-01-01 00:00:00");
        assert_eq!(f.value().unwrap().magnitude().to_string(), "3");
    }

    #[test]
    fn duplicate_addons_rejected_when_configured() {
        let err = build_with(
            "discount.fixed('1%').since('2020-01-01').since('2021-01-01')",
            DuplicateAddons::Reject,
        )
        .unwrap_err();
        assert_eq!(
            err,
            FormulaError::DuplicateAddon {
                name: "since".into(),
                line: 1,
                column: 42,
            }
        );
        // fixed and relative share one slot
        assert!(build_with("discount.fixed('1%').relative('2')", DuplicateAddons::Reject).is_err());
    }

    #[test]
    fn unknown_modifier() {
        let err = build("leasing.since('2020-01-01')").unwrap_err();
        assert_eq!(err.to_string(), "Unknown modifier \"leasing\" at line 1 and column 1");
    }

    #[test]
    fn unknown_addon() {
        let err = build("discount.fixed('1%').lasts('2 months')").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown addon \"lasts\" for \"discount\" at line 1 and column 22"
        );
    }

    #[test]
    fn head_takes_no_arguments() {
        let err = build("discount('5%')").unwrap_err();
        assert!(matches!(err, FormulaError::ArgumentCount { expected: 0, found: 1, .. }));
    }

    #[test]
    fn discount_without_value() {
        let err = build("discount.since('2020-01-01')").unwrap_err();
        assert_eq!(err.to_string(), "Formula run returned unexpected result : discount");
    }

    #[test]
    fn literal_statement() {
        let err = build("true").unwrap_err();
        assert_eq!(err.to_string(), "Formula run returned unexpected result : true");
        let err = build("'hello'").unwrap_err();
        assert_eq!(err.to_string(), "Formula run returned unexpected result : hello");
    }

    #[test]
    fn inverted_bounds_are_kept_as_written() {
        let f = build("discount.fixed('1%').since('2021-01-01').till('2020-01-01')").unwrap();
        assert!(!f.has_valid_interval());
    }
}
