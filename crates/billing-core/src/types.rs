//! Generic billing type: an id with an optional name.
//!
//! Types decide which prices and plans a charge falls under. Matching
//! supports a wildcard id ([`Type::ANY`]) that compares by name instead, and
//! a reserved [`Type::NONE`] value that never matches anything, itself
//! included.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Type {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl Type {
    /// Wildcard id: match by name.
    pub const ANY: &'static str = "ANY";
    /// Reserved value that never matches.
    pub const NONE: &'static str = "NONE";

    pub fn new(id: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.map(str::to_owned),
        }
    }

    /// A wildcard type selected by name only.
    pub fn any(name: &str) -> Self {
        Self::new(Self::ANY, Some(name))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns `true` if the name is set and is not a sentinel.
    pub fn has_name(&self) -> bool {
        matches!(self.name.as_deref(), Some(n) if !n.is_empty() && n != Self::ANY && n != Self::NONE)
    }

    /// The name when it is meaningful, the id otherwise.
    pub fn unique_id(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if self.has_name() => name,
            _ => &self.id,
        }
    }

    /// Strict identity: same id and same name.
    pub fn equals(&self, other: &Type) -> bool {
        self == other
    }

    /// Returns `true` if `self` applies to `other`.
    pub fn matches(&self, other: &Type) -> bool {
        if self.id == Self::ANY || other.id == Self::ANY {
            check_matches(
                self.name.as_deref().unwrap_or_default(),
                other.name.as_deref().unwrap_or_default(),
            )
        } else {
            check_matches(&self.id, &other.id)
        }
    }
}

fn check_matches(lhs: &str, rhs: &str) -> bool {
    if lhs == Type::NONE || rhs == Type::NONE {
        return false;
    }
    lhs == rhs
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.unique_id())
    }
}
