//! Syntax tree for formula source.
//!
//! A program is a list of newline-separated statements. A statement is
//! either a bare literal or a chain of calls, where each call links to
//! its successor: `a.b(x).c(y)` is `a -> b(x) -> c(y)`.

use std::fmt;

/// 1-based source position of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Str(String),
    /// Number as written in the source.
    Number(String),
    Bool(bool),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) | Self::Number(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub name: String,
    pub args: Vec<Literal>,
    pub next: Option<Box<Call>>,
    pub pos: Pos,
}

impl Call {
    /// Iterates over this call and all of its successors.
    pub fn iter(&self) -> CallIter<'_> {
        CallIter { cur: Some(self) }
    }
}

pub struct CallIter<'a> {
    cur: Option<&'a Call>,
}

impl<'a> Iterator for CallIter<'a> {
    type Item = &'a Call;

    fn next(&mut self) -> Option<Self::Item> {
        let call = self.cur?;
        self.cur = call.next.as_deref();
        Some(call)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Literal { value: Literal, pos: Pos },
    Chain(Call),
}

impl Statement {
    pub fn pos(&self) -> Pos {
        match self {
            Self::Literal { pos, .. } => *pos,
            Self::Chain(call) => call.pos,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, next: Option<Call>) -> Call {
        Call {
            name: name.into(),
            args: vec![],
            next: next.map(Box::new),
            pos: Pos { line: 1, column: 1 },
        }
    }

    #[test]
    fn iter_walks_the_chain() {
        let chain = call("a", Some(call("b", Some(call("c", None)))));
        let names: Vec<&str> = chain.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn literal_display() {
        assert_eq!(Literal::Bool(true).to_string(), "true");
        assert_eq!(Literal::Number("2.5".into()).to_string(), "2.5");
        assert_eq!(Literal::Str("x y".into()).to_string(), "x y");
    }
}
