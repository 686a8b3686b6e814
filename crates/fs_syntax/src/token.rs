//! The token vocabulary shared by the spirit-filter (SF) and real-filter
//! (RF) grammars. Both languages are whitespace/line-oriented and share the
//! same lexical layer; keyword recognition happens above this layer, in
//! each grammar's own keyword table, since `Rarity` means something
//! different to SF's expression evaluator than it does to RF's flat parser.

use fs_base::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Less,
    LessEqual,
    Equal,
    ExactMatch,
    Greater,
    GreaterEqual,
    NotEqual,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A bare word: `Show`, `BaseType`, `Chaos Orb` is two of these.
    Identifier(String),
    /// `$name` — a spirit-filter variable reference.
    Dollar(String),
    Integer(i64),
    Fractional(f64),
    /// A double-quoted string literal, already unescaped.
    String(String),
    Operator(Operator),
    LBrace,
    RBrace,
    LParen,
    RParen,
    Comma,
    Colon,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub origin: Span,
}

impl Token {
    pub fn new(kind: TokenKind, origin: Span) -> Self {
        Self { kind, origin }
    }
}
