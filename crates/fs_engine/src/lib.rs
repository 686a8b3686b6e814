//! # fs_engine
//!
//! Consumes the flat filter [`fs_compile`] produces:
//!
//! - [`engine`] — matches a single item against a filter, the way the game
//!   client evaluates its own loaded filter
//! - [`serializer`] — writes a flat filter out as native filter text, and
//!   reads that same text back in

pub mod engine;
pub mod serializer;

pub use engine::{pass_item_through_filter, PassResult, TraceMode};
pub use serializer::{parse, serialize, Preamble};
