//! Canonical form of formula source text.
//!
//! Normalized text is what the engine parses and what the cache is keyed
//! by: every line trimmed, blank lines dropped, lines joined with `\n`.

/// Scalar values callers may pass as formula source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaInput(String);

impl FormulaInput {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FormulaInput {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for FormulaInput {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&String> for FormulaInput {
    fn from(s: &String) -> Self {
        Self(s.clone())
    }
}

/// `true` reads as `"1"`, `false` as empty text.
impl From<bool> for FormulaInput {
    fn from(b: bool) -> Self {
        Self(if b { "1".into() } else { String::new() })
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FormulaInput {
                fn from(n: $t) -> Self {
                    Self(n.to_string())
                }
            }
        )*
    };
}

impl_from_int!(i32, i64, u32, u64, usize);

/// Normalizes formula source; `None` when nothing but whitespace remains.
pub fn normalize(input: impl Into<FormulaInput>) -> Option<String> {
    let input = input.into();
    let lines: Vec<&str> = input
        .as_str()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_whitespace() {
        assert_eq!(normalize("ab\ncd").as_deref(), Some("ab\ncd"));
        assert_eq!(normalize(" ab  \n  \n cd").as_deref(), Some("ab\ncd"));
        assert_eq!(normalize("ab").as_deref(), Some("ab"));
        assert_eq!(normalize("\r\n ab \r\n").as_deref(), Some("ab"));
    }

    #[test]
    fn blank_input_is_absent() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize(" "), None);
        assert_eq!(normalize("\n\n\n"), None);
        assert_eq!(normalize(false), None);
    }

    #[test]
    fn scalars_are_coerced() {
        assert_eq!(normalize(true).as_deref(), Some("1"));
        assert_eq!(normalize(42_i64).as_deref(), Some("42"));
    }

    #[test]
    fn idempotent() {
        for s in ["", " a \n\n b ", "x", "\t\ty\n", "a\n \n\tb\n c "] {
            let once = normalize(s);
            let twice = once.as_deref().and_then(normalize);
            assert_eq!(once, twice, "input {:?}", s);
        }
    }
}
