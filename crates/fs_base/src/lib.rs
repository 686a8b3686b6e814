//! # fs_base
//!
//! Pure structural atoms shared across the Filter Spirit pipeline.
//!
//! This crate provides the foundational types used by every downstream
//! crate in the pipeline:
//!
//! - [`Arena`] — bump allocation for stable AST references
//! - [`Interner`]/[`Symbol`] — string interning for cheap identifier equality
//! - [`Span`] — source position tracking ("origin" in the rest of the pipeline)
//! - [`SpannedError`]/[`Result`] — low-level errors carrying a source position
//!
//! It has **no knowledge of filter syntax, item data, or market data**. Every
//! other crate builds on top of this one.

pub mod arena;
pub mod error;
pub mod intern;
pub mod span;

pub use arena::Arena;
pub use error::{Result, SpannedError};
pub use intern::{Interner, Symbol, SymbolEq};
pub use span::Span;
