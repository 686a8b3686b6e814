//! Exercises the full pipeline: spirit-filter source in, a matched item's
//! style out, and a native-filter round trip through the serializer.

use fs_compile::market::MarketItem;
use fs_compile::{CompileOptions, MarketSnapshot};
use fs_engine::{pass_item_through_filter, TraceMode};
use fs_model::{Item, RarityTag};

#[test]
fn compiled_filter_matches_a_dropped_item() {
    let source = r#"
        Show {
            BaseType == "Chaos Orb"
            SetFontSize 45
            SetTextColor 255 0 0
        }
    "#;

    let (filter, diagnostics) = filter_spirit::compile(source, &CompileOptions::default(), &MarketSnapshot::new()).unwrap();
    assert!(diagnostics.is_empty());

    let item = Item { base_type: "Chaos Orb".into(), rarity: Some(RarityTag::Normal), ..Default::default() };
    let result = pass_item_through_filter(&item, &filter, 1, TraceMode::Off);

    assert!(result.result.matched());
    assert_eq!(result.style.font_size, 45);
    assert_eq!(result.style.text_color.r, 255);
}

#[test]
fn nested_blocks_inherit_parent_conditions_without_their_own() {
    let source = r#"
        Show {
            Rarity Normal
            Show {
                BaseType == "Chaos Orb"
            }
        }
    "#;

    let (filter, diagnostics) = filter_spirit::compile(source, &CompileOptions::default(), &MarketSnapshot::new()).unwrap();
    assert!(diagnostics.is_empty());
    // The outer block has its own condition, so it emits a block too.
    assert_eq!(filter.len(), 2);
    assert_eq!(filter.entries[1].conditions.conditions.len(), 2);
}

#[test]
fn autogeneration_expands_against_the_market_and_drops_items_outside_the_price_band() {
    let source = r#"Show { Autogenerate Currency Price(1, 50) }"#;

    let mut market = MarketSnapshot::new();
    market.currency.push(MarketItem::new("Chaos Orb", 1.0));
    market.currency.push(MarketItem::new("Exalted Orb", 60.0));
    market.set_max_stack_size("Chaos Orb", 10_000);
    market.set_max_stack_size("Exalted Orb", 10_000);

    let (filter, diagnostics) = filter_spirit::compile(source, &CompileOptions::default(), &market).unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(filter.len(), 1);
}

#[test]
fn serialized_filter_round_trips_through_the_native_reader() {
    let source = r#"Hide { Rarity Unique Continue }"#;
    let (filter, diagnostics) = filter_spirit::compile(source, &CompileOptions::default(), &MarketSnapshot::new()).unwrap();
    assert!(diagnostics.is_empty());

    let text = fs_engine::serialize(&filter, None);
    let (reparsed, reparse_diagnostics) = filter_spirit::read_native_filter(&text).unwrap();
    assert!(reparse_diagnostics.is_empty());
    assert_eq!(reparsed.len(), filter.len());
    assert!(reparsed.entries[0].continue_);
}

#[test]
fn expand_splices_a_shared_constant_tree_into_multiple_blocks() {
    let source = r#"
        $common = { ItemLevel >= 80 }
        Show {
            Expand $common
            BaseType == "Chaos Orb"
        }
        Hide {
            Expand $common
            Rarity Unique
        }
    "#;

    let (filter, diagnostics) = filter_spirit::compile(source, &CompileOptions::default(), &MarketSnapshot::new()).unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(filter.len(), 2);
    assert_eq!(filter.entries[0].conditions.conditions.len(), 2);
    assert_eq!(filter.entries[1].conditions.conditions.len(), 2);
}

#[test]
fn import_statement_is_serialized_as_a_comment_and_ignored_by_matching() {
    let source = r#"
        Import "shared.filter"
        Show {
            BaseType == "Chaos Orb"
        }
    "#;

    let (filter, diagnostics) = filter_spirit::compile(source, &CompileOptions::default(), &MarketSnapshot::new()).unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(filter.imports.len(), 1);
    assert_eq!(filter.imports[0].path, "shared.filter");

    let text = fs_engine::serialize(&filter, None);
    assert!(text.contains("# Import \"shared.filter\""));

    let item = fs_model::Item { base_type: "Chaos Orb".into(), rarity: Some(RarityTag::Normal), ..Default::default() };
    let result = pass_item_through_filter(&item, &filter, 1, TraceMode::Off);
    assert!(result.result.matched());
}

#[test]
fn ruthless_mode_swaps_hide_for_minimal_but_still_compiles() {
    let source = r#"Hide { Identified True }"#;
    let options = CompileOptions { ruthless_mode: true };
    let (filter, diagnostics) = filter_spirit::compile(source, &options, &MarketSnapshot::new()).unwrap();

    assert!(!diagnostics.has_errors());
    assert!(diagnostics.iter().any(|d| d.code == fs_compile::DiagnosticCode::RuthlessModeVisibilitySwap));
    assert_eq!(filter.entries[0].visibility, fs_model::Visibility::Minimal);
}
