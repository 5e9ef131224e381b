//! Errors produced while compiling formula source text.

use crate::lexer::TokenKind;

/// A lexical or structural failure, located at the offending token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unexpected token \"{token}\" ({kind}) at line {line} and column {column}")]
pub struct ParseError {
    /// Source text of the offending token.
    pub token: String,
    pub kind: TokenKind,
    /// 1-based line.
    pub line: u32,
    /// 1-based column, counted in characters.
    pub column: u32,
}

/// Errors that can occur while building a formula.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormulaError {
    #[error("Formula is empty")]
    EmptyFormula,

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Unknown modifier \"{name}\" at line {line} and column {column}")]
    UnknownModifier { name: String, line: u32, column: u32 },

    #[error("Unknown addon \"{name}\" for \"{modifier}\" at line {line} and column {column}")]
    UnknownAddon {
        modifier: String,
        name: String,
        line: u32,
        column: u32,
    },

    #[error("Call \"{call}\" expects {expected} argument(s), got {found}")]
    ArgumentCount {
        call: String,
        expected: usize,
        found: usize,
    },

    #[error("Invalid value for \"{field}\" : {raw}")]
    InvalidArgument { field: String, raw: String },

    #[error("Duplicate addon \"{name}\" at line {line} and column {column}")]
    DuplicateAddon { name: String, line: u32, column: u32 },

    #[error("Formula run returned unexpected result : {printed}")]
    UnexpectedResult { printed: String },
}

/// A specialized `Result` type for formula operations.
pub type Result<T> = std::result::Result<T, FormulaError>;

impl FormulaError {
    pub(crate) fn invalid(field: &str, raw: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.to_owned(),
            raw: raw.into(),
        }
    }
}
