//! Recursive-descent parser for formula source.
//!
//! ```text
//! program   := NEWLINE* statement (NEWLINE+ statement)* NEWLINE* EOF
//! statement := literal | chain
//! chain     := call ("." call)*
//! call      := IDENT ( "(" [ literal ("," literal)* ] ")" )?
//! literal   := STRING | NUMBER | "true" | "false"
//! ```

use crate::ast::{Call, Literal, Pos, Program, Statement};
use crate::error::ParseError;
use crate::lexer::{Token, TokenKind, lex};

/// Parses normalized (or raw) source text into a [`Program`].
///
/// Source without any statement fails at the `EOF` token.
pub fn parse(src: &str) -> Result<Program, ParseError> {
    let tokens = lex(src)?;
    Parser::new(&tokens).program()
}

/// Parses source that must hold exactly one statement.
///
/// A second statement fails at its first token.
pub fn parse_statement(src: &str) -> Result<Statement, ParseError> {
    let tokens = lex(src)?;
    let mut parser = Parser::new(&tokens);
    parser.skip_newlines();
    let statement = parser.statement()?;
    parser.skip_newlines();
    parser.expect(TokenKind::Eof)?;
    Ok(statement)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn cur(&self) -> &'a Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> TokenKind {
        self.cur().kind
    }

    fn advance(&mut self) -> &'a Token {
        let t = self.cur();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn err(&self) -> ParseError {
        self.cur().unexpected()
    }

    fn expect(&mut self, kind: TokenKind) -> Result<&'a Token, ParseError> {
        if self.peek() == kind {
            Ok(self.advance())
        } else {
            Err(self.err())
        }
    }

    fn skip_newlines(&mut self) {
        while self.peek() == TokenKind::Newline {
            self.advance();
        }
    }

    fn program(&mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();
        self.skip_newlines();
        loop {
            statements.push(self.statement()?);
            match self.peek() {
                TokenKind::Eof => break,
                TokenKind::Newline => {
                    self.skip_newlines();
                    if self.peek() == TokenKind::Eof {
                        break;
                    }
                }
                _ => return Err(self.err()),
            }
        }
        Ok(Program { statements })
    }

    fn statement(&mut self) -> Result<Statement, ParseError> {
        let tok = self.cur();
        let pos = Pos {
            line: tok.line,
            column: tok.column,
        };
        if self.peek() == TokenKind::Ident {
            return self.chain().map(Statement::Chain);
        }
        let value = self.literal()?;
        Ok(Statement::Literal { value, pos })
    }

    fn chain(&mut self) -> Result<Call, ParseError> {
        let mut head = self.call()?;
        let mut rest = Vec::new();
        while self.peek() == TokenKind::Dot {
            self.advance();
            rest.push(self.call()?);
        }
        head.next = rest.into_iter().rev().fold(None, |next, mut call| {
            call.next = next;
            Some(Box::new(call))
        });
        Ok(head)
    }

    fn call(&mut self) -> Result<Call, ParseError> {
        let name = self.expect(TokenKind::Ident)?;
        let pos = Pos {
            line: name.line,
            column: name.column,
        };
        let mut args = Vec::new();
        if self.peek() == TokenKind::LParen {
            self.advance();
            if self.peek() == TokenKind::RParen {
                self.advance();
            } else {
                loop {
                    args.push(self.literal()?);
                    match self.peek() {
                        TokenKind::Comma => {
                            self.advance();
                        }
                        TokenKind::RParen => {
                            self.advance();
                            break;
                        }
                        _ => return Err(self.err()),
                    }
                }
            }
        }
        Ok(Call {
            name: name.text.clone(),
            args,
            next: None,
            pos,
        })
    }

    fn literal(&mut self) -> Result<Literal, ParseError> {
        let tok = self.cur();
        let lit = match tok.kind {
            TokenKind::Str => Literal::Str(tok.text.clone()),
            TokenKind::Number => Literal::Number(tok.text.clone()),
            TokenKind::True => Literal::Bool(true),
            TokenKind::False => Literal::Bool(false),
            _ => return Err(self.err()),
        };
        self.advance();
        Ok(lit)
    }
}
