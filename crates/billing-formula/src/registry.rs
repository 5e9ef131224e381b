//! Dispatch tables from call names to modifier heads and addon handlers.
//!
//! The first call of a chain names the modifier (`discount`,
//! `installment`); every following call is an addon resolved against that
//! head. Literal sniffing (the `%` marker, `"<int> <unit>"` durations,
//! dates) happens only in the handlers here; they hand typed values to the
//! builder.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use billing_core::modifiers::{DiscountValue, Period, PeriodUnit, Reason, Since, Till};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::ast::{Call, Literal};
use crate::error::{FormulaError, Result};

/// Format of date literals in `since(...)` and `till(...)`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Modifier family selected by the head of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierHead {
    Discount,
    Installment,
}

impl ModifierHead {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discount => "discount",
            Self::Installment => "installment",
        }
    }
}

impl fmt::Display for ModifierHead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed value produced by an addon call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddonValue {
    Since(Since),
    Till(Till),
    Reason(Reason),
    Value(DiscountValue),
    Term(Period),
}

impl AddonValue {
    /// Builder slot this value fills; two values with the same slot are duplicates.
    pub fn slot(&self) -> &'static str {
        match self {
            Self::Since(_) => "since",
            Self::Till(_) => "till",
            Self::Reason(_) => "reason",
            Self::Value(_) => "value",
            Self::Term(_) => "term",
        }
    }
}

/// Handler turning an addon call's arguments into a typed value.
pub type AddonCtor = fn(&Call) -> Result<AddonValue>;

pub struct Registry {
    modifiers: HashMap<&'static str, ModifierHead>,
    addons: HashMap<ModifierHead, HashMap<&'static str, AddonCtor>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Registry with the built-in modifiers and addons.
    pub fn new() -> Self {
        let common: [(&'static str, AddonCtor); 3] =
            [("since", since), ("till", till), ("reason", reason)];

        let mut discount: HashMap<&'static str, AddonCtor> = HashMap::from(common);
        discount.insert("fixed", fixed);
        discount.insert("relative", relative);

        let mut installment: HashMap<&'static str, AddonCtor> = HashMap::from(common);
        installment.insert("lasts", lasts);

        Self {
            modifiers: HashMap::from([
                ("discount", ModifierHead::Discount),
                ("installment", ModifierHead::Installment),
            ]),
            addons: HashMap::from([
                (ModifierHead::Discount, discount),
                (ModifierHead::Installment, installment),
            ]),
        }
    }

    pub fn resolve(&self, head: &str) -> Option<ModifierHead> {
        self.modifiers.get(head).copied()
    }

    pub fn resolve_addon(&self, head: ModifierHead, name: &str) -> Option<AddonCtor> {
        self.addons.get(&head)?.get(name).copied()
    }

    /// Addon names accepted after `head`, sorted.
    pub fn addon_names(&self, head: ModifierHead) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .addons
            .get(&head)
            .map(|m| m.keys().copied().collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }
}

// ---------------------------------------------------------------------------
// Addon handlers
// ---------------------------------------------------------------------------

fn since(call: &Call) -> Result<AddonValue> {
    parse_date(call).map(|d| AddonValue::Since(Since::new(d)))
}

fn till(call: &Call) -> Result<AddonValue> {
    parse_date(call).map(|d| AddonValue::Till(Till::new(d)))
}

fn reason(call: &Call) -> Result<AddonValue> {
    match single_arg(call)? {
        Literal::Str(text) => Ok(AddonValue::Reason(Reason::new(text.clone()))),
        other => Err(FormulaError::invalid(&call.name, other.to_string())),
    }
}

fn fixed(call: &Call) -> Result<AddonValue> {
    parse_discount(call, false).map(AddonValue::Value)
}

fn relative(call: &Call) -> Result<AddonValue> {
    parse_discount(call, true).map(AddonValue::Value)
}

fn lasts(call: &Call) -> Result<AddonValue> {
    let raw = match single_arg(call)? {
        Literal::Str(text) => text.as_str(),
        other => return Err(FormulaError::invalid(&call.name, other.to_string())),
    };
    let invalid = || FormulaError::invalid(&call.name, raw);

    let mut parts = raw.split_whitespace();
    let (Some(count), Some(unit), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };
    let count: u32 = count.parse().map_err(|_| invalid())?;
    if count == 0 {
        return Err(invalid());
    }
    let unit = PeriodUnit::parse(unit).ok_or_else(invalid)?;
    Ok(AddonValue::Term(Period::new(count, unit)))
}

// ---------------------------------------------------------------------------
// Literal parsing
// ---------------------------------------------------------------------------

fn single_arg(call: &Call) -> Result<&Literal> {
    match call.args.as_slice() {
        [arg] => Ok(arg),
        args => Err(FormulaError::ArgumentCount {
            call: call.name.clone(),
            expected: 1,
            found: args.len(),
        }),
    }
}

fn parse_date(call: &Call) -> Result<NaiveDateTime> {
    let raw = match single_arg(call)? {
        Literal::Str(text) => text.trim(),
        other => return Err(FormulaError::invalid(&call.name, other.to_string())),
    };
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| FormulaError::invalid(&call.name, raw))
}

/// Parses `"2%"`, `"5 USD"`, `"5"` or a bare number.
///
/// A trailing `%` marks the value relative; `force_relative` makes it
/// relative regardless.
fn parse_discount(call: &Call, force_relative: bool) -> Result<DiscountValue> {
    let raw = match single_arg(call)? {
        Literal::Str(text) | Literal::Number(text) => text.trim(),
        other => return Err(FormulaError::invalid(&call.name, other.to_string())),
    };
    let invalid = || FormulaError::invalid(&call.name, raw);

    if let Some(percent) = raw.strip_suffix('%') {
        let magnitude = Decimal::from_str(percent.trim()).map_err(|_| invalid())?;
        return Ok(DiscountValue::relative(magnitude));
    }

    let mut parts = raw.split_whitespace();
    let amount = parts.next().ok_or_else(invalid)?;
    let magnitude = Decimal::from_str(amount).map_err(|_| invalid())?;
    let currency = match (parts.next(), parts.next()) {
        (None, _) => None,
        (Some(code), None) if code.chars().all(|c| c.is_ascii_alphabetic()) => {
            Some(code.to_ascii_uppercase())
        }
        _ => return Err(invalid()),
    };

    if force_relative {
        if currency.is_some() {
            return Err(invalid());
        }
        return Ok(DiscountValue::relative(magnitude));
    }
    Ok(DiscountValue::absolute(magnitude, currency))
}
