//! Binds a compiled spirit filter to a market snapshot: expands every
//! `Autogenerate` entry into its generated blocks via [`crate::autogen`],
//! and threads every already-flat block straight through, preserving source
//! order (first-match-wins semantics depend on it).

use crate::autogen;
use crate::compiler::{CompiledBlock, CompiledSpiritFilter};
use crate::diagnostic::DiagnosticBag;
use crate::market::MarketSnapshot;
use fs_model::block::FlatFilter;

pub fn bind(filter: &CompiledSpiritFilter, market: &MarketSnapshot) -> (FlatFilter, DiagnosticBag) {
    let mut out = FlatFilter::new();
    let mut diagnostics = DiagnosticBag::new();

    for block in &filter.blocks {
        match block {
            CompiledBlock::Flat(flat) => out.push(flat.clone()),
            CompiledBlock::Autogenerate(autogen_block) => match autogen::generate_blocks(autogen_block, market) {
                Ok(generated) => {
                    for block in generated {
                        out.push(block);
                    }
                }
                Err(d) => diagnostics.push(d),
            },
            CompiledBlock::Import { path, origin } => out.push_import(path.clone(), *origin),
        }
    }

    (out, diagnostics)
}
