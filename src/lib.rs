//! # filter_spirit
//!
//! Ties the three compiler crates together into one entry point: parse and
//! compile a spirit filter (`fs_syntax` + `fs_compile`), bind it against a
//! market snapshot, and hand the result to `fs_engine` for matching or
//! serialization. Everything here is a thin facade — the actual pipeline
//! stages live in their own crates so each can be used independently.

#[cfg(feature = "cli")]
pub mod cli;

use fs_compile::{CompileOptions, Diagnostic, DiagnosticBag, MarketSnapshot};
use fs_model::FlatFilter;

/// Compiles spirit-filter source all the way down to a flat filter, ready
/// to hand to [`fs_engine::pass_item_through_filter`] or
/// [`fs_engine::serialize`].
pub fn compile(source: &str, options: &CompileOptions, market: &MarketSnapshot) -> Result<(FlatFilter, DiagnosticBag), Diagnostic> {
    fs_compile::compile_source(source, options, market)
}

/// Reads already-written native filter text (the format the game client
/// itself produces) straight into a flat filter, bypassing the spirit
/// filter compiler entirely.
pub fn read_native_filter(source: &str) -> Result<(FlatFilter, DiagnosticBag), Diagnostic> {
    fs_engine::parse(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_source_into_a_flat_filter() {
        let (filter, diagnostics) = compile(
            r#"Show { BaseType == "Chaos Orb" SetFontSize 40 }"#,
            &CompileOptions::default(),
            &MarketSnapshot::new(),
        )
        .unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn reads_native_filter_text_without_a_symbol_table() {
        let (filter, diagnostics) = read_native_filter("Show\n\tIdentified True\n").unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(filter.len(), 1);
    }
}
