//! # fs_compile
//!
//! Turns a parsed spirit filter into a flat filter the engine can run:
//!
//! - [`symbol_table`] — binds `$name` constants as they're defined
//! - [`evaluator`] — turns expressions into [`fs_model::Primitive`]s
//! - [`diagnostic`] — the closed set of problems the compiler can report
//! - [`compiler`] — lowers nested blocks, threading inherited conditions and
//!   actions, into either flat blocks or autogenerate directives
//! - [`market`] — the market snapshot shape autogeneration reads from
//! - [`autogen`] — expands one `Autogenerate` directive into flat blocks
//! - [`binder`] — ties compilation and autogeneration together into one
//!   [`fs_model::FlatFilter`]
//!
//! RF source never reaches this crate: it has no constants, nesting, or
//! autogeneration, so [`fs_syntax::rf`] lowers directly to [`fs_model`]
//! without an evaluator or symbol table.

pub mod autogen;
pub mod binder;
pub mod compiler;
pub mod diagnostic;
pub mod evaluator;
pub mod market;
pub mod symbol_table;

pub use binder::bind;
pub use compiler::{compile, CompileOptions, CompiledBlock, CompiledSpiritFilter};
pub use diagnostic::{Diagnostic, DiagnosticBag, DiagnosticCode, Severity};
pub use market::MarketSnapshot;

use fs_syntax::sf::parse_document;

/// Parses and compiles spirit-filter source, then binds it against `market`
/// in one call. Returns the flat filter and every diagnostic collected
/// across parsing, compilation, and binding.
pub fn compile_source(source: &str, options: &CompileOptions, market: &MarketSnapshot) -> Result<(fs_model::FlatFilter, DiagnosticBag), Diagnostic> {
    let document = parse_document(source)?;
    let (compiled, mut diagnostics) = compile(&document, options);
    let (flat, bind_diagnostics) = bind(&compiled, market);
    diagnostics.extend(bind_diagnostics);
    Ok((flat, diagnostics))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_and_binds_a_minimal_filter() {
        let (flat, diagnostics) = compile_source(
            r#"Show { BaseType == "Chaos Orb" SetFontSize 45 }"#,
            &CompileOptions::default(),
            &MarketSnapshot::new(),
        )
        .unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(flat.len(), 1);
    }
}
