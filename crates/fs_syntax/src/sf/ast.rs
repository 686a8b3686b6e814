//! Spirit-filter (SF) syntax tree. SF is the authoring language: it adds
//! constants, nested blocks with inherited conditions/actions, price-range
//! conditions, and the `Autogenerate` directive on top of what the real
//! filter format can express. Keyword resolution (which condition or action
//! a given identifier names) is deferred to `fs_compile`'s symbol/keyword
//! tables; this tree only records what was written, plus its origin.

use crate::token::Operator;
use fs_base::Span;

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub items: Vec<TopLevel>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TopLevel {
    ConstantDef(ConstantDef),
    Block(Block),
    Import(ImportStmt),
}

/// `$name = <expr>` at the top level, outside any block.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantDef {
    pub name: String,
    pub name_origin: Span,
    pub value: ConstantValue,
    pub origin: Span,
}

/// What a constant name is bound to: a `<sequence>` of values (spliced into
/// an operand list wherever the name is referenced), or a `{ block tree }`
/// of unexpanded statements (spliced into a block wherever `Expand $name`
/// appears).
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Sequence(Vec<Expr>),
    Tree(Vec<Statement>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawVisibility {
    Show,
    Hide,
    Minimal,
}

/// One `Show { ... }` / `Hide { ... }` block, possibly containing nested
/// blocks. A nested block inherits its parent's conditions and actions; the
/// compiler is responsible for threading that state down.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub visibility: RawVisibility,
    pub visibility_origin: Span,
    pub continue_: bool,
    pub statements: Vec<Statement>,
    pub nested: Vec<Block>,
    pub origin: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Condition(ConditionStmt),
    Action(ActionStmt),
    Autogenerate(AutogenerateStmt),
    Expand(ExpandStmt),
    Import(ImportStmt),
}

/// `Expand $name` — splices the block tree bound to `$name` in place,
/// inheriting whatever conditions/actions are in scope at the splice site.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandStmt {
    pub name: String,
    pub name_origin: Span,
    pub origin: Span,
}

/// `Import "path"` — a marker naming another document to be spliced in at
/// this position. Carries no conditions or actions of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportStmt {
    pub path: String,
    pub path_origin: Span,
    pub origin: Span,
}

/// A condition line: a keyword, an optional comparison operator (absent for
/// boolean/list conditions written bare, e.g. `Identified`), and its
/// operands, each an unevaluated expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionStmt {
    pub keyword: String,
    pub keyword_origin: Span,
    pub op: Option<Operator>,
    pub operands: Vec<Expr>,
    pub origin: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionStmt {
    pub keyword: String,
    pub keyword_origin: Span,
    pub operands: Vec<Expr>,
    pub origin: Span,
}

/// `Autogenerate BaseType Class(...) Tier(...) Price($x .. $y)` — drives
/// compile-time synthesis of flat blocks from a market snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct AutogenerateStmt {
    pub category: String,
    pub category_origin: Span,
    pub price: PriceRangeExpr,
    pub origin: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceRangeExpr {
    pub lower: Option<(Expr, bool)>,
    pub upper: Option<(Expr, bool)>,
    pub origin: Span,
}

/// An unevaluated value expression. The evaluator turns these into
/// [`fs_model::Object`]s by constructor-shape matching against the operand
/// list a keyword expects.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Integer(i64, Span),
    Fractional(f64, Span),
    String(String, Span),
    /// A bare word used as a value, e.g. `Rare`, `Circle`, `Red`.
    Identifier(String, Span),
    /// `$name` — resolved against the symbol table at evaluation time.
    Reference(String, Span),
}

impl Expr {
    pub fn origin(&self) -> Span {
        match self {
            Expr::Integer(_, s)
            | Expr::Fractional(_, s)
            | Expr::String(_, s)
            | Expr::Identifier(_, s)
            | Expr::Reference(_, s) => *s,
        }
    }
}
