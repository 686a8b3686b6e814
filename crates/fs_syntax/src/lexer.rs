//! Hand-written lexer shared by both grammars. No external parsing crate is
//! used; the language is small enough that a direct character scan reads
//! more clearly than a combinator pipeline.

use crate::token::{Operator, Token, TokenKind};
use fs_base::{Result, Span, SpannedError};

pub struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, bytes: source.as_bytes(), pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    /// Consumes whitespace and `#`-to-end-of-line comments; this is the
    /// "skipper" both grammars share.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_whitespace() => {
                    self.pos += 1;
                }
                Some(b'#') => {
                    while let Some(b) = self.peek() {
                        if b == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn is_ident_start(b: u8) -> bool {
        b.is_ascii_alphabetic() || b == b'_'
    }

    fn is_ident_continue(b: u8) -> bool {
        b.is_ascii_alphanumeric() || b == b'_'
    }

    fn read_string(&mut self, start: usize) -> Result<Token> {
        let mut value = String::new();
        loop {
            match self.advance() {
                Some(b'"') => break,
                Some(b'\\') => match self.advance() {
                    Some(b'"') => value.push('"'),
                    Some(b'\\') => value.push('\\'),
                    Some(b'n') => value.push('\n'),
                    Some(other) => value.push(other as char),
                    None => return Err(SpannedError::new("unterminated string literal", Span::new(start, self.pos))),
                },
                Some(b) => {
                    // UTF-8 continuation bytes are pushed verbatim; only the
                    // ASCII fast path matters for escapes above.
                    value.push(b as char);
                }
                None => return Err(SpannedError::new("unterminated string literal", Span::new(start, self.pos))),
            }
        }
        Ok(Token::new(TokenKind::String(value), Span::new(start, self.pos)))
    }

    fn read_number(&mut self, start: usize) -> Token {
        let mut is_fractional = false;
        while let Some(b) = self.peek() {
            if b.is_ascii_digit() {
                self.pos += 1;
            } else if b == b'.' && self.peek_at(1).map_or(false, |n| n.is_ascii_digit()) {
                is_fractional = true;
                self.pos += 1;
            } else {
                break;
            }
        }
        let text = &self.source[start..self.pos];
        let span = Span::new(start, self.pos);
        if is_fractional {
            Token::new(TokenKind::Fractional(text.parse().unwrap_or(0.0)), span)
        } else {
            Token::new(TokenKind::Integer(text.parse().unwrap_or(0)), span)
        }
    }

    fn read_identifier(&mut self, start: usize) -> Token {
        while let Some(b) = self.peek() {
            if Self::is_ident_continue(b) {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text = self.source[start..self.pos].to_string();
        Token::new(TokenKind::Identifier(text), Span::new(start, self.pos))
    }

    /// Produces the next token, including a final `Eof` once the source is
    /// exhausted; callers should stop polling after receiving it.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia();
        let start = self.pos;
        let b = match self.peek() {
            None => return Ok(Token::new(TokenKind::Eof, Span::point(start))),
            Some(b) => b,
        };

        if b == b'"' {
            self.pos += 1;
            return self.read_string(start);
        }
        if b.is_ascii_digit() || (b == b'-' && self.peek_at(1).map_or(false, |n| n.is_ascii_digit())) {
            if b == b'-' {
                self.pos += 1;
                let mut tok = self.read_number(start);
                negate_numeric(&mut tok);
                return Ok(tok);
            }
            return Ok(self.read_number(start));
        }
        if Self::is_ident_start(b) {
            return Ok(self.read_identifier(start));
        }
        if b == b'$' {
            self.pos += 1;
            let ident_start = self.pos;
            while let Some(b) = self.peek() {
                if Self::is_ident_continue(b) {
                    self.pos += 1;
                } else {
                    break;
                }
            }
            if ident_start == self.pos {
                return Err(SpannedError::new("expected a name after '$'", Span::new(start, self.pos)));
            }
            let name = self.source[ident_start..self.pos].to_string();
            return Ok(Token::new(TokenKind::Dollar(name), Span::new(start, self.pos)));
        }

        self.pos += 1;
        let kind = match b {
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b',' => TokenKind::Comma,
            b':' => TokenKind::Colon,
            b'<' => {
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    TokenKind::Operator(Operator::LessEqual)
                } else {
                    TokenKind::Operator(Operator::Less)
                }
            }
            b'>' => {
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    TokenKind::Operator(Operator::GreaterEqual)
                } else {
                    TokenKind::Operator(Operator::Greater)
                }
            }
            b'=' => {
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    TokenKind::Operator(Operator::ExactMatch)
                } else {
                    TokenKind::Operator(Operator::Equal)
                }
            }
            b'!' => {
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    TokenKind::Operator(Operator::NotEqual)
                } else {
                    return Err(SpannedError::new("unexpected character '!'", Span::new(start, self.pos)));
                }
            }
            other => {
                return Err(SpannedError::new(
                    format!("unexpected character {:?}", other as char),
                    Span::new(start, self.pos),
                ));
            }
        };
        Ok(Token::new(kind, Span::new(start, self.pos)))
    }

    /// Lexes the whole source into a vector, for parsers that prefer
    /// indexed lookahead over pull-based tokenization.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let done = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if done {
                break;
            }
        }
        Ok(tokens)
    }
}

fn negate_numeric(tok: &mut Token) {
    match &mut tok.kind {
        TokenKind::Integer(v) => *v = -*v,
        TokenKind::Fractional(v) => *v = -*v,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src).tokenize().unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_a_simple_condition_line() {
        let kinds = kinds(r#"BaseType == "Chaos Orb""#);
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier("BaseType".into()),
                TokenKind::Operator(Operator::ExactMatch),
                TokenKind::String("Chaos Orb".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_negative_integers() {
        assert_eq!(kinds("-5"), vec![TokenKind::Integer(-5), TokenKind::Eof]);
    }

    #[test]
    fn lexes_dollar_references() {
        assert_eq!(kinds("$my_price"), vec![TokenKind::Dollar("my_price".into()), TokenKind::Eof]);
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(kinds("# a comment\nShow"), vec![TokenKind::Identifier("Show".into()), TokenKind::Eof]);
    }

    #[test]
    fn unterminated_string_is_an_error() {
        assert!(Lexer::new("\"oops").tokenize().is_err());
    }
}
