//! # fs_model
//!
//! The domain data model shared by the parser, compiler, and engine:
//!
//! - [`primitive`] — scalar value types, each carrying its origin
//! - [`object`] — the evaluator's value wrapper (scalar or homogeneous array)
//! - [`enums`] — closed vocabularies (rarity, shape, suit, influence, ...)
//! - [`condition`] — the polymorphic condition family and price-range condition
//! - [`action`] — the action set and its field-wise override semantics
//! - [`item`] — the in-game drop model the engine matches against
//! - [`block`] — filter blocks, flat filters, and visibility
//! - [`style`] — the resolved per-item style produced by the engine
//! - [`match_result`] — per-condition and per-block match traces
//!
//! This crate has no knowledge of source syntax or market data; it is the
//! vocabulary that the parser produces, the compiler transforms, and the
//! engine consumes.

pub mod action;
pub mod block;
pub mod condition;
pub mod enums;
pub mod item;
pub mod match_result;
pub mod object;
pub mod primitive;
pub mod style;
pub mod text;

pub use action::ActionSet;
pub use block::{FilterEntry, FlatFilter, ImportMarker, ItemFilterBlock, Visibility};
pub use condition::{Condition, ConditionSet, PriceRangeCondition};
pub use enums::*;
pub use item::Item;
pub use match_result::{BlockMatchResult, ConditionMatchResult, FilteringResult};
pub use object::{Object, PrimitiveKind};
pub use primitive::{Primitive, Spanned};
pub use style::Style;

pub use fs_base::Span;
