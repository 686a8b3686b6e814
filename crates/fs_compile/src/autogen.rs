//! Expands one `Autogenerate` directive into concrete flat blocks from a
//! market snapshot. Mirrors the category table of the original compiler's
//! autogeneration pass: stackable currency gets a `StackSize` bound computed
//! from price-per-unit, most other categories just list every item whose
//! price falls in range, and gems are enumerated across the full
//! level/quality/corrupted grid.

use crate::compiler::AutogenBlock;
use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::market::{GemMarketItem, MarketItem, MarketSnapshot};
use fs_base::Span;
use fs_model::block::ItemFilterBlock;
use fs_model::condition::{Condition, ConditionSet, ListValue, OrderedValue, PriceRangeCondition, RangeBound, StringMatchMode, TestedProperty};
use fs_model::primitive::FsString;
use fs_model::Spanned;

/// Used when a stackable item's maximum stack size is not known to the
/// caller's market snapshot; the game's largest currency stack sizes top out
/// well below this.
pub const DEFAULT_MAX_STACK_SIZE: i32 = 50_000;

const MIN_GEM_LEVEL: i32 = 1;
/// 21 for a normal gem, 40 for an awakened one; the grid is scanned up to
/// the higher bound and `matching_gems` naturally yields nothing for levels
/// a given gem can't reach.
const MAX_GEM_LEVEL: i32 = 40;
const MIN_GEM_QUALITY: i32 = 0;
const MAX_GEM_QUALITY: i32 = 23;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutogenCategory {
    Currency,
    DeliriumOrbs,
    Essences,
    Fossils,
    Oils,
    Vials,
    Fragments,
    Resonators,
    Scarabs,
    Tattoos,
    Incubators,
    Cards,
    Gems,
}

impl AutogenCategory {
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "Currency" => Self::Currency,
            "DeliriumOrbs" => Self::DeliriumOrbs,
            "Essences" => Self::Essences,
            "Fossils" => Self::Fossils,
            "Oils" => Self::Oils,
            "Vials" => Self::Vials,
            "Fragments" => Self::Fragments,
            "Resonators" => Self::Resonators,
            "Scarabs" => Self::Scarabs,
            "Tattoos" => Self::Tattoos,
            "Incubators" => Self::Incubators,
            "Cards" => Self::Cards,
            "Gems" => Self::Gems,
            _ => return None,
        })
    }

    fn item_class_names(self) -> &'static [&'static str] {
        match self {
            Self::Currency | Self::Fossils | Self::Oils | Self::Vials | Self::Resonators | Self::Scarabs | Self::Incubators | Self::DeliriumOrbs => {
                &["Currency"]
            }
            Self::Essences => &["Essences"],
            Self::Fragments => &["Map Fragments"],
            Self::Tattoos => &["Jewel"],
            Self::Cards => &["Divination Card"],
            Self::Gems => &["Active Skill Gems", "Support Skill Gems"],
        }
    }
}

/// Expands one autogenerate directive against `market`, or fails if the
/// category name is unrecognized or the block carries a condition the
/// generator can't reconcile with its own generated conditions.
pub fn generate_blocks(autogen: &AutogenBlock, market: &MarketSnapshot) -> Result<Vec<ItemFilterBlock>, Diagnostic> {
    let category = AutogenCategory::parse(&autogen.category).ok_or_else(|| {
        Diagnostic::new(
            DiagnosticCode::UnknownKeyword,
            format!("'{}' is not a known Autogenerate category", autogen.category),
            autogen.category_origin,
        )
    })?;

    verify_autogen_conditions(&autogen.conditions, category)?;

    Ok(match category {
        AutogenCategory::Currency => generate_blocks_stackable(autogen, "Currency", &market.currency, |name| {
            market.max_stack_size_of(name).unwrap_or(DEFAULT_MAX_STACK_SIZE)
        }),
        AutogenCategory::DeliriumOrbs => generate_blocks_simple(autogen, &["Currency"], &market.delirium_orbs),
        AutogenCategory::Essences => generate_blocks_simple(autogen, &["Essences"], &market.essences),
        AutogenCategory::Fossils => generate_blocks_simple(autogen, &["Currency"], &market.fossils),
        AutogenCategory::Oils => generate_blocks_simple(autogen, &["Currency"], &market.oils),
        AutogenCategory::Vials => generate_blocks_simple(autogen, &["Currency"], &market.vials),
        AutogenCategory::Fragments => generate_blocks_simple(autogen, &["Map Fragments"], &market.fragments),
        AutogenCategory::Resonators => generate_blocks_simple(autogen, &["Currency"], &market.resonators),
        AutogenCategory::Scarabs => generate_blocks_simple(autogen, &["Currency"], &market.scarabs),
        AutogenCategory::Tattoos => generate_blocks_simple(autogen, &["Jewel"], &market.tattoos),
        AutogenCategory::Incubators => generate_blocks_simple(autogen, &["Currency"], &market.incubators),
        AutogenCategory::Cards => generate_blocks_simple(autogen, &["Divination Card"], &market.divination_cards),
        AutogenCategory::Gems => generate_blocks_gems(autogen, &market.gems),
    })
}

/// An autogenerate block may carry a manual `Class` condition (to narrow
/// which of the category's classes it wants), but nothing else: every other
/// condition is produced by the generator itself.
fn verify_autogen_conditions(conditions: &ConditionSet, category: AutogenCategory) -> Result<(), Diagnostic> {
    let allowed = category.item_class_names();
    for condition in &conditions.conditions {
        match condition {
            Condition::StringMatch { property: TestedProperty::Class, values, .. } => {
                if values.iter().any(|v| !allowed.contains(&v.value.as_str())) {
                    return Err(Diagnostic::new(
                        DiagnosticCode::TypeMismatch,
                        "a Class condition on an Autogenerate block may only name classes the category itself produces",
                        condition.origin(),
                    ));
                }
            }
            other => {
                return Err(Diagnostic::new(
                    DiagnosticCode::TypeMismatch,
                    "an Autogenerate block may only carry a Class condition; everything else is generated automatically",
                    other.origin(),
                ))
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EligibleItem<'a> {
    name: &'a str,
    amount_min: Option<i32>,
    amount_max: Option<i32>,
}

impl<'a> EligibleItem<'a> {
    fn has_same_amounts_as(&self, other: &EligibleItem) -> bool {
        self.amount_min == other.amount_min && self.amount_max == other.amount_max
    }

    fn sort_key(&self) -> (i32, i32) {
        (self.amount_min.unwrap_or(-1), self.amount_max.unwrap_or(i32::MAX))
    }
}

/// Computes the stack-size bound each stackable item needs to fall within a
/// price range, dropping items that would need more than their known max
/// stack size (too cheap) or whose cheapest single unit already exceeds the
/// upper bound (too expensive). Sorted so items with identical bounds end up
/// adjacent, letting the caller group them into one block.
fn eligible_stackable_items<'a>(price: &PriceRangeCondition, items: &'a [MarketItem], max_stack_size_of: impl Fn(&str) -> i32) -> Vec<EligibleItem<'a>> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if item.is_low_confidence || item.price_chaos <= 0.0 {
            continue;
        }
        let mut entry = EligibleItem { name: item.name.as_str(), amount_min: None, amount_max: None };

        if let Some(lower) = price.lower {
            let amount_min = (lower.value / item.price_chaos).ceil() as i32;
            if amount_min > max_stack_size_of(&item.name) {
                continue;
            }
            entry.amount_min = Some(amount_min);
        }

        if let Some(upper) = price.upper {
            let amount_max = (upper.value / item.price_chaos).floor() as i32;
            if amount_max == 0 {
                continue;
            }
            entry.amount_max = Some(amount_max.min(max_stack_size_of(&item.name)));
        }

        out.push(entry);
    }
    out.sort_by_key(EligibleItem::sort_key);
    out
}

fn matching_items<'a>(price: &PriceRangeCondition, items: &'a [MarketItem]) -> Vec<&'a str> {
    items
        .iter()
        .filter(|item| !item.is_low_confidence && price.includes(item.price_chaos))
        .map(|item| item.name.as_str())
        .collect()
}

fn matching_gems<'a>(price: &PriceRangeCondition, gems: &'a [GemMarketItem], level: i32, quality: i32, corrupted: bool) -> Vec<&'a str> {
    gems.iter()
        .filter(|g| !g.is_low_confidence && price.includes(g.price_chaos) && g.level == level && g.quality == quality && g.corrupted == corrupted)
        .map(|g| g.name.as_str())
        .collect()
}

fn base_block(autogen: &AutogenBlock, class_names: &[&str], base_types: Vec<FsString>) -> ItemFilterBlock {
    let mut block = ItemFilterBlock::new(autogen.visibility, autogen.origin);
    block.actions = autogen.actions.clone();
    block.continue_ = autogen.continue_;
    block.conditions.push(Condition::StringMatch {
        property: TestedProperty::Class,
        mode: StringMatchMode::Exact,
        negate: false,
        values: class_names.iter().map(|c| FsString::new(*c, autogen.origin)).collect(),
        origin: autogen.origin,
    });
    block.conditions.push(Condition::StringMatch {
        property: TestedProperty::BaseType,
        mode: StringMatchMode::Exact,
        negate: false,
        values: base_types,
        origin: autogen.origin,
    });
    block
}

fn stack_size_bound(value: i32, origin: Span, lower: bool) -> Condition {
    let bound = RangeBound { value: OrderedValue::Integer(value), inclusive: true };
    if lower {
        Condition::LowerBound { property: TestedProperty::StackSize, bound, origin }
    } else {
        Condition::UpperBound { property: TestedProperty::StackSize, bound, origin }
    }
}

fn generate_blocks_stackable(autogen: &AutogenBlock, class_name: &str, items: &[MarketItem], max_stack_size_of: impl Fn(&str) -> i32) -> Vec<ItemFilterBlock> {
    let eligible = eligible_stackable_items(&autogen.price, items, max_stack_size_of);
    let mut out = Vec::new();
    let mut i = 0;
    while i < eligible.len() {
        let first = eligible[i];
        let mut j = i + 1;
        while j < eligible.len() && eligible[j].has_same_amounts_as(&first) {
            j += 1;
        }

        let base_types = eligible[i..j].iter().map(|e| FsString::new(e.name, autogen.origin)).collect();
        let mut block = base_block(autogen, &[class_name], base_types);
        if let Some(min) = first.amount_min {
            block.conditions.push(stack_size_bound(min, autogen.origin, true));
        }
        if let Some(max) = first.amount_max {
            block.conditions.push(stack_size_bound(max, autogen.origin, false));
        }
        if block.conditions.is_valid() {
            out.push(block);
        }
        i = j;
    }
    out
}

fn generate_blocks_simple(autogen: &AutogenBlock, class_names: &[&str], items: &[MarketItem]) -> Vec<ItemFilterBlock> {
    let names = matching_items(&autogen.price, items);
    if names.is_empty() {
        return Vec::new();
    }
    let base_types = names.into_iter().map(|n| FsString::new(n, autogen.origin)).collect();
    let block = base_block(autogen, class_names, base_types);
    if block.conditions.is_valid() {
        vec![block]
    } else {
        Vec::new()
    }
}

fn generate_blocks_gems(autogen: &AutogenBlock, gems: &[GemMarketItem]) -> Vec<ItemFilterBlock> {
    let class_names = AutogenCategory::Gems.item_class_names();
    let mut out = Vec::new();
    for level in MIN_GEM_LEVEL..=MAX_GEM_LEVEL {
        for quality in MIN_GEM_QUALITY..=MAX_GEM_QUALITY {
            for corrupted in [false, true] {
                let names = matching_gems(&autogen.price, gems, level, quality, corrupted);
                if names.is_empty() {
                    continue;
                }
                let base_types = names.into_iter().map(|n| FsString::new(n, autogen.origin)).collect();
                let mut block = base_block(autogen, class_names, base_types);
                block.conditions.push(Condition::ValueList {
                    property: TestedProperty::GemLevel,
                    allowed: true,
                    values: vec![Spanned::new(ListValue::Integer(level), autogen.origin)],
                    origin: autogen.origin,
                });
                block.conditions.push(Condition::ValueList {
                    property: TestedProperty::Quality,
                    allowed: true,
                    values: vec![Spanned::new(ListValue::Integer(quality), autogen.origin)],
                    origin: autogen.origin,
                });
                block.conditions.push(Condition::Boolean { property: TestedProperty::Corrupted, value: corrupted, origin: autogen.origin });
                if block.conditions.is_valid() {
                    out.push(block);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fs_model::action::ActionSet;
    use fs_model::block::Visibility;

    fn autogen(category: &str, lower: Option<f64>, upper: Option<f64>) -> AutogenBlock {
        AutogenBlock {
            category: category.into(),
            category_origin: Span::new(0, 1),
            price: PriceRangeCondition {
                lower: lower.map(|v| RangeBound { value: v, inclusive: true }),
                upper: upper.map(|v| RangeBound { value: v, inclusive: true }),
                origin: Span::new(0, 1),
            },
            visibility: Visibility::Show,
            conditions: ConditionSet::default(),
            actions: ActionSet::default(),
            continue_: false,
            origin: Span::new(0, 1),
        }
    }

    #[test]
    fn unknown_category_is_a_diagnostic() {
        let mut market = MarketSnapshot::new();
        market.currency.push(MarketItem::new("Chaos Orb", 1.0));
        let err = generate_blocks(&autogen("NotACategory", Some(1.0), None), &market).unwrap_err();
        assert_eq!(err.code, DiagnosticCode::UnknownKeyword);
    }

    #[test]
    fn stackable_items_with_identical_bounds_share_one_block() {
        let mut market = MarketSnapshot::new();
        market.currency.push(MarketItem::new("Orb of Alteration", 0.1));
        market.currency.push(MarketItem::new("Orb of Transmutation", 0.1));
        market.currency.push(MarketItem::new("Chaos Orb", 1.0));
        market.set_max_stack_size("Orb of Alteration", 10000);
        market.set_max_stack_size("Orb of Transmutation", 10000);
        market.set_max_stack_size("Chaos Orb", 10000);

        let blocks = generate_blocks(&autogen("Currency", Some(5.0), Some(300.0)), &market).unwrap();
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn stack_size_upper_bound_is_clamped_to_the_items_max_stack_size() {
        let mut market = MarketSnapshot::new();
        market.currency.push(MarketItem::new("Chaos Orb", 1.0));
        market.currency.push(MarketItem::new("Divine Orb", 200.0));
        market.set_max_stack_size("Chaos Orb", 20);
        market.set_max_stack_size("Divine Orb", 10);

        let blocks = generate_blocks(&autogen("Currency", Some(5.0), Some(300.0)), &market).unwrap();
        assert_eq!(blocks.len(), 2);

        let chaos = blocks.iter().find(|b| matches!(&b.conditions.conditions[1], Condition::StringMatch { values, .. } if values[0].value == "Chaos Orb")).unwrap();
        let upper = chaos.conditions.conditions.iter().find_map(|c| match c {
            Condition::UpperBound { property: TestedProperty::StackSize, bound, .. } => Some(bound.value),
            _ => None,
        });
        assert_eq!(upper, Some(OrderedValue::Integer(20)));

        let divine = blocks.iter().find(|b| matches!(&b.conditions.conditions[1], Condition::StringMatch { values, .. } if values[0].value == "Divine Orb")).unwrap();
        let divine_upper = divine.conditions.conditions.iter().find_map(|c| match c {
            Condition::UpperBound { property: TestedProperty::StackSize, bound, .. } => Some(bound.value),
            _ => None,
        });
        assert_eq!(divine_upper, Some(OrderedValue::Integer(1)));
    }

    #[test]
    fn item_too_cheap_for_max_stack_size_is_dropped() {
        let mut market = MarketSnapshot::new();
        market.currency.push(MarketItem::new("Portal Scroll", 0.01));
        market.set_max_stack_size("Portal Scroll", 40);

        let blocks = generate_blocks(&autogen("Currency", Some(5.0), None), &market).unwrap();
        assert!(blocks.is_empty());
    }

    #[test]
    fn simple_category_lists_every_matching_item_in_one_block() {
        let mut market = MarketSnapshot::new();
        market.essences.push(MarketItem::new("Essence of Greed", 2.0));
        market.essences.push(MarketItem::new("Essence of Hatred", 50.0));

        let blocks = generate_blocks(&autogen("Essences", Some(1.0), Some(10.0)), &market).unwrap();
        assert_eq!(blocks.len(), 1);
        let Condition::StringMatch { values, .. } = &blocks[0].conditions.conditions[1] else { panic!() };
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].value, "Essence of Greed");
    }

    #[test]
    fn gems_are_split_per_level_quality_and_corruption() {
        let mut market = MarketSnapshot::new();
        market.gems.push(GemMarketItem { name: "Fireball".into(), level: 20, quality: 20, corrupted: false, price_chaos: 5.0, is_low_confidence: false });
        market.gems.push(GemMarketItem { name: "Fireball".into(), level: 21, quality: 23, corrupted: true, price_chaos: 50.0, is_low_confidence: false });

        let blocks = generate_blocks(&autogen("Gems", Some(1.0), Some(100.0)), &market).unwrap();
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn manual_condition_other_than_class_is_rejected() {
        let market = MarketSnapshot::new();
        let mut bad = autogen("Currency", Some(1.0), None);
        bad.conditions.push(Condition::Boolean { property: TestedProperty::Identified, value: true, origin: Span::new(0, 1) });
        let err = generate_blocks(&bad, &market).unwrap_err();
        assert_eq!(err.code, DiagnosticCode::TypeMismatch);
    }
}
