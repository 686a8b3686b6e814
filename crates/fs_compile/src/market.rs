//! Minimal view of market pricing data needed to expand `Autogenerate`
//! directives. A real integration would pull this from a price API; this
//! crate only needs the shape the autogeneration algorithm consumes: a price
//! per item, a confidence flag, and (for stackable currency) a known maximum
//! stack size.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct MarketItem {
    pub name: String,
    pub price_chaos: f64,
    pub is_low_confidence: bool,
}

impl MarketItem {
    pub fn new(name: impl Into<String>, price_chaos: f64) -> Self {
        Self { name: name.into(), price_chaos, is_low_confidence: false }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GemMarketItem {
    pub name: String,
    pub level: i32,
    pub quality: i32,
    pub corrupted: bool,
    pub price_chaos: f64,
    pub is_low_confidence: bool,
}

/// Snapshot of market pricing by autogeneration category, plus the known
/// maximum stack size of each stackable currency item (needed to turn a
/// price-per-unit bound into a `StackSize` bound). Categories with no known
/// items simply generate no blocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketSnapshot {
    pub currency: Vec<MarketItem>,
    pub delirium_orbs: Vec<MarketItem>,
    pub essences: Vec<MarketItem>,
    pub fossils: Vec<MarketItem>,
    pub oils: Vec<MarketItem>,
    pub vials: Vec<MarketItem>,
    pub fragments: Vec<MarketItem>,
    pub resonators: Vec<MarketItem>,
    pub scarabs: Vec<MarketItem>,
    pub tattoos: Vec<MarketItem>,
    pub incubators: Vec<MarketItem>,
    pub divination_cards: Vec<MarketItem>,
    pub gems: Vec<GemMarketItem>,
    max_stack_sizes: HashMap<String, i32>,
}

impl MarketSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_max_stack_size(&mut self, item_name: impl Into<String>, size: i32) {
        self.max_stack_sizes.insert(item_name.into(), size);
    }

    pub fn max_stack_size_of(&self, item_name: &str) -> Option<i32> {
        self.max_stack_sizes.get(item_name).copied()
    }
}
