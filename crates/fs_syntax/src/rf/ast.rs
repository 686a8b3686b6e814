//! Real-filter (RF) syntax tree. RF is already flat — no constants, no
//! nested blocks, no `$` references, no autogeneration — so it reuses SF's
//! statement and expression shapes directly rather than duplicating them.

use crate::sf::ast::Statement;
use fs_base::Span;

pub use crate::sf::ast::RawVisibility;

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub visibility: RawVisibility,
    pub visibility_origin: Span,
    pub continue_: bool,
    pub statements: Vec<Statement>,
    pub origin: Span,
}
