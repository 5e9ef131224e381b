//! Tokenizer for formula source text.

use std::fmt;

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Ident,
    /// Quoted string; the token text holds the unescaped content.
    Str,
    /// Numeric literal, kept as written.
    Number,
    True,
    False,
    Dot,
    Comma,
    LParen,
    RParen,
    Newline,
    Eof,
    /// A character no token can start with.
    Unknown,
    /// A string literal missing its closing quote.
    Unterminated,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ident => "IDENT",
            Self::Str => "STRING",
            Self::Number => "NUMBER",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Dot => "DOT",
            Self::Comma => "COMMA",
            Self::LParen => "LPAREN",
            Self::RParen => "RPAREN",
            Self::Newline => "NEWLINE",
            Self::Eof => "EOF",
            Self::Unknown => "UNKNOWN",
            Self::Unterminated => "UNTERMINATED",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
    pub column: u32,
}

impl Token {
    /// Error pointing at this token.
    pub fn unexpected(&self) -> ParseError {
        ParseError {
            token: self.text.clone(),
            kind: self.kind,
            line: self.line,
            column: self.column,
        }
    }
}

/// Splits `src` into tokens. The returned list always ends with `Eof`.
pub fn lex(src: &str) -> Result<Vec<Token>, ParseError> {
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0usize;
    let mut line: u32 = 1;
    let mut column: u32 = 1;

    while pos < chars.len() {
        let c = chars[pos];
        let (tok_line, tok_col) = (line, column);
        let mut push = |kind: TokenKind, text: String| {
            tokens.push(Token {
                kind,
                text,
                line: tok_line,
                column: tok_col,
            })
        };

        if c == '\n' {
            push(TokenKind::Newline, "\\n".into());
            pos += 1;
            line += 1;
            column = 1;
            continue;
        }

        if c == ' ' || c == '\t' || c == '\r' {
            pos += 1;
            column += 1;
            continue;
        }

        let single = match c {
            '.' => Some(TokenKind::Dot),
            ',' => Some(TokenKind::Comma),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            _ => None,
        };
        if let Some(kind) = single {
            push(kind, c.to_string());
            pos += 1;
            column += 1;
            continue;
        }

        // String literal
        if c == '\'' || c == '"' {
            let quote = c;
            let mut end = pos + 1;
            let mut s = String::new();
            loop {
                if end >= chars.len() || chars[end] == '\n' {
                    let partial: String = chars[pos..end].iter().collect();
                    return Err(ParseError {
                        token: partial,
                        kind: TokenKind::Unterminated,
                        line: tok_line,
                        column: tok_col,
                    });
                }
                let sc = chars[end];
                if sc == quote {
                    end += 1;
                    break;
                }
                // A backslash before a line break escapes nothing; the break ends the string.
                if sc == '\\' && end + 1 < chars.len() && chars[end + 1] != '\n' {
                    match chars[end + 1] {
                        'n' => s.push('\n'),
                        't' => s.push('\t'),
                        '\\' => s.push('\\'),
                        '\'' => s.push('\''),
                        '"' => s.push('"'),
                        other => {
                            s.push('\\');
                            s.push(other);
                        }
                    }
                    end += 2;
                    continue;
                }
                s.push(sc);
                end += 1;
            }
            push(TokenKind::Str, s);
            column += (end - pos) as u32;
            pos = end;
            continue;
        }

        // Number
        if c.is_ascii_digit()
            || (c == '-' && pos + 1 < chars.len() && chars[pos + 1].is_ascii_digit())
        {
            let mut end = pos + 1;
            while end < chars.len() && chars[end].is_ascii_digit() {
                end += 1;
            }
            if end + 1 < chars.len() && chars[end] == '.' && chars[end + 1].is_ascii_digit() {
                end += 1;
                while end < chars.len() && chars[end].is_ascii_digit() {
                    end += 1;
                }
            }
            push(TokenKind::Number, chars[pos..end].iter().collect());
            column += (end - pos) as u32;
            pos = end;
            continue;
        }

        // Identifier or keyword
        if c.is_ascii_alphabetic() || c == '_' {
            let mut end = pos + 1;
            while end < chars.len() && (chars[end].is_ascii_alphanumeric() || chars[end] == '_') {
                end += 1;
            }
            let word: String = chars[pos..end].iter().collect();
            let kind = match word.as_str() {
                "true" => TokenKind::True,
                "false" => TokenKind::False,
                _ => TokenKind::Ident,
            };
            push(kind, word);
            column += (end - pos) as u32;
            pos = end;
            continue;
        }

        return Err(ParseError {
            token: c.to_string(),
            kind: TokenKind::Unknown,
            line: tok_line,
            column: tok_col,
        });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        text: "EOF".into(),
        line,
        column,
    });
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        lex(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_source_is_just_eof() {
        let tokens = lex("").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
    }

    #[test]
    fn chain_tokens() {
        use TokenKind::*;
        assert_eq!(
            kinds("discount.fixed('2%', 3, true)"),
            vec![Ident, Dot, Ident, LParen, Str, Comma, Number, Comma, True, RParen, Eof]
        );
    }

    #[test]
    fn positions_track_lines_and_columns() {
        let tokens = lex("a.b\n  c('x')").unwrap();
        let c = tokens.iter().find(|t| t.text == "c").unwrap();
        assert_eq!((c.line, c.column), (2, 3));
        let x = tokens.iter().find(|t| t.kind == TokenKind::Str).unwrap();
        assert_eq!((x.line, x.column), (2, 5));
        let rparen = tokens.iter().find(|t| t.kind == TokenKind::RParen).unwrap();
        assert_eq!(rparen.column, 8);
    }

    #[test]
    fn string_escapes_and_quotes() {
        let tokens = lex(r#"'it\'s' "say \"hi\"""#).unwrap();
        assert_eq!(tokens[0].text, "it's");
        assert_eq!(tokens[1].text, "say \"hi\"");
    }

    #[test]
    fn numbers_keep_their_text() {
        let tokens = lex("-2.50 7").unwrap();
        assert_eq!(tokens[0].text, "-2.50");
        assert_eq!(tokens[1].text, "7");
    }

    #[test]
    fn unterminated_string() {
        let err = lex("reason('oops").unwrap_err();
        assert_eq!(err.kind, TokenKind::Unterminated);
        assert_eq!(err.token, "'oops");
        assert_eq!((err.line, err.column), (1, 8));
    }

    #[test]
    fn string_cannot_span_lines() {
        let err = lex("'a\nb'").unwrap_err();
        assert_eq!(err.kind, TokenKind::Unterminated);
    }

    #[test]
    fn escaped_line_break_is_unterminated() {
        let err = lex("reason('a\\\nb')").unwrap_err();
        assert_eq!(err.kind, TokenKind::Unterminated);
        assert_eq!(err.token, "'a\\");
        assert_eq!((err.line, err.column), (1, 8));
    }

    #[test]
    fn unknown_character() {
        let err = lex("discount # x").unwrap_err();
        assert_eq!(err.to_string(), "Unexpected token \"#\" (UNKNOWN) at line 1 and column 10");
    }
}
