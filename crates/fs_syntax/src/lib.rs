//! # fs_syntax
//!
//! Lexing and parsing for both Filter Spirit grammars:
//!
//! - [`sf`] — the spirit-filter authoring language (constants, nested
//!   blocks, expressions, autogeneration directives)
//! - [`rf`] — the real-filter format the game client reads and writes
//!   directly
//!
//! Both share [`token`], [`lexer`], and [`keywords`]; they diverge only in
//! block structure (brace-delimited and nestable for SF, indentation-based
//! and flat for RF) and in what a statement's operands are allowed to be
//! (arbitrary expressions for SF, literals only for RF).

pub mod keywords;
pub mod lexer;
pub mod rf;
pub mod sf;
pub mod token;

pub use lexer::Lexer;
pub use token::{Operator, Token, TokenKind};
