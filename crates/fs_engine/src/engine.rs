//! Runs a dropped item through a flat filter: first-match-wins unless a
//! block carries `Continue`, in which case later blocks may still refine the
//! style. Pure and side-effect free — no I/O, no randomness, no memoization
//! — so the same filter can be shared across threads and run concurrently
//! against disjoint items.

use fs_model::block::{FlatFilter, Visibility};
use fs_model::item::Item;
use fs_model::match_result::{BlockMatchResult, FilteringResult};
use fs_model::primitive::Color;
use fs_model::style::Style;
use fs_model::ActionSet;

/// Whether the engine should keep a full per-block match trace. Tracing
/// costs an allocation per block tested; production filtering skips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceMode {
    Off,
    Full,
}

/// The end result of running one item through a filter: the style it ends
/// up drawn with, and whether it's shown at all.
#[derive(Debug, Clone, PartialEq)]
pub struct PassResult {
    pub style: Style,
    pub visibility: Visibility,
    pub result: FilteringResult,
}

/// Tests `item` against every block of `filter` in order, applying matched
/// blocks' actions field-wise and stopping at the first match that doesn't
/// carry `Continue`.
pub fn pass_item_through_filter(item: &Item, filter: &FlatFilter, area_level: i32, trace: TraceMode) -> PassResult {
    let mut style = Style::default_for_rarity(item.rarity);
    let mut visibility = Visibility::Show;
    let mut matched_block = None;
    let mut block_trace = Vec::new();

    for (index, block) in filter.entries.iter().enumerate() {
        let mut match_result = BlockMatchResult::new(block.origin);
        for condition in &block.conditions.conditions {
            match_result.push(condition.test_item(item, area_level));
        }
        let matches = match_result.is_successful();

        if trace == TraceMode::Full {
            block_trace.push(match_result);
        }

        if !matches {
            continue;
        }

        apply_actions(&mut style, &block.actions);
        visibility = block.visibility;
        matched_block = Some(index);

        if !block.continue_ {
            break;
        }
    }

    PassResult {
        style,
        visibility,
        result: FilteringResult { matched_block, trace: block_trace },
    }
}

/// Overwrites `style` field by field with whatever `actions` sets, leaving
/// fields the action set doesn't touch untouched — the inheritance rule a
/// later matching `Continue` block relies on to refine, not replace, style.
fn apply_actions(style: &mut Style, actions: &ActionSet) {
    if let Some(c) = actions.border_color {
        style.border_color = c;
    }
    if let Some(c) = actions.text_color {
        style.text_color = c;
    }
    if let Some(c) = actions.background_color {
        style.background_color = c;
    }
    if let Some(f) = actions.font_size {
        style.font_size = f.value;
    }
}

/// The opaque-black default background the client falls back to, exposed so
/// callers building a minimal style (e.g. in tests) don't need to reach into
/// [`fs_model::style`] directly.
pub fn default_background() -> Color {
    Style::default_for_rarity(None).background_color
}

#[cfg(test)]
mod tests {
    use super::*;
    use fs_base::Span;
    use fs_model::block::ItemFilterBlock;
    use fs_model::condition::{Condition, StringMatchMode, TestedProperty};
    use fs_model::primitive::{FontSize, FsString};
    use fs_model::RarityTag;

    fn base_type_block(visibility: Visibility, base_type: &str, continue_: bool) -> ItemFilterBlock {
        let mut block = ItemFilterBlock::new(visibility, Span::new(0, 1));
        block.continue_ = continue_;
        block.conditions.push(Condition::StringMatch {
            property: TestedProperty::BaseType,
            mode: StringMatchMode::Exact,
            negate: false,
            values: vec![FsString::new(base_type, Span::new(0, 1))],
            origin: Span::new(0, 1),
        });
        block
    }

    fn sample_item(base_type: &str) -> Item {
        Item { base_type: base_type.into(), rarity: Some(RarityTag::Normal), ..Default::default() }
    }

    #[test]
    fn first_matching_block_without_continue_stops_evaluation() {
        let mut filter = FlatFilter::new();
        filter.push(base_type_block(Visibility::Show, "Chaos Orb", false));
        filter.push(base_type_block(Visibility::Hide, "Chaos Orb", false));

        let result = pass_item_through_filter(&sample_item("Chaos Orb"), &filter, 1, TraceMode::Off);
        assert_eq!(result.visibility, Visibility::Show);
        assert_eq!(result.result.matched_block, Some(0));
    }

    #[test]
    fn continue_lets_a_later_block_refine_the_style() {
        let mut first = base_type_block(Visibility::Show, "Chaos Orb", true);
        first.actions.font_size = Some(FontSize::new(30, Span::new(0, 1)));
        let mut second = base_type_block(Visibility::Show, "Chaos Orb", false);
        second.actions.border_color = Some(Color { r: 255, g: 0, b: 0, a: None, origin: Span::new(0, 1) });

        let mut filter = FlatFilter::new();
        filter.push(first);
        filter.push(second);

        let result = pass_item_through_filter(&sample_item("Chaos Orb"), &filter, 1, TraceMode::Off);
        assert_eq!(result.style.font_size, 30);
        assert_eq!(result.style.border_color.r, 255);
        assert_eq!(result.result.matched_block, Some(1));
    }

    #[test]
    fn no_matching_block_keeps_the_rarity_default_style() {
        let filter = FlatFilter::new();
        let item = Item { base_type: "Chaos Orb".into(), rarity: Some(RarityTag::Unique), ..Default::default() };
        let result = pass_item_through_filter(&item, &filter, 1, TraceMode::Off);
        assert!(!result.result.matched());
        assert_eq!(result.style, Style::default_for_rarity(Some(RarityTag::Unique)));
    }

    #[test]
    fn trace_mode_full_records_every_block_tested() {
        let mut filter = FlatFilter::new();
        filter.push(base_type_block(Visibility::Show, "Chaos Orb", false));
        filter.push(base_type_block(Visibility::Show, "Exalted Orb", false));

        let result = pass_item_through_filter(&sample_item("Chaos Orb"), &filter, 1, TraceMode::Full);
        assert_eq!(result.result.trace.len(), 2);
        assert!(result.result.trace[0].is_successful());
    }

    #[test]
    fn trace_mode_off_records_nothing() {
        let mut filter = FlatFilter::new();
        filter.push(base_type_block(Visibility::Show, "Chaos Orb", false));
        let result = pass_item_through_filter(&sample_item("Chaos Orb"), &filter, 1, TraceMode::Off);
        assert!(result.result.trace.is_empty());
    }
}
