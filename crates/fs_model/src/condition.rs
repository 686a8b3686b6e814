//! The polymorphic condition family: every test an item filter block can
//! place on a dropped item. Represented as a tagged enum (dynamic dispatch
//! through pattern matching) rather than a trait-object hierarchy, since the
//! whole family is closed and known at compile time.

use crate::enums::{GemQualityTypeTag, InfluenceTag, RarityTag, SocketSpecValue};
use crate::item::Item;
use crate::match_result::ConditionMatchResult;
use crate::primitive::{FsString, Integer, Spanned};
use crate::text::compare_strings_ignore_diacritics;
use fs_base::Span;

/// Price comparisons tolerate floating-point error; two prices within this
/// many chaos orbs of each other are considered equal.
pub const PRICE_EPSILON: f64 = 1e-9;

/// Every property an official condition can test. Kept as a flat tag (not
/// split per condition subfamily) so conflict-detection queries during
/// autogeneration can ask "does this block already constrain property X"
/// without matching on the concrete condition shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestedProperty {
    Rarity,
    ItemLevel,
    DropLevel,
    Quality,
    Sockets,
    SocketGroup,
    LinkedSockets,
    Width,
    Height,
    StackSize,
    GemLevel,
    MapTier,
    CorruptedMods,
    EnchantmentPassiveNum,
    BaseArmour,
    BaseEvasion,
    BaseEnergyShield,
    BaseWard,
    BaseDefencePercentile,
    MemoryStrands,
    AreaLevel,
    HasSearingExarchImplicit,
    HasEaterOfWorldsImplicit,
    Class,
    BaseType,
    HasExplicitMod,
    HasImplicitMod,
    HasEnchantment,
    EnchantmentPassiveNode,
    ArchnemesisMod,
    HasInfluence,
    TransfiguredGem,
    AlternateQuality,
    Identified,
    Corrupted,
    Mirrored,
    FracturedItem,
    SynthesisedItem,
    AnyEnchantment,
    ShapedMap,
    ElderMap,
    BlightedMap,
    UberBlightedMap,
    Replica,
    HasCruciblePassiveTree,
    ZanaMemory,
    Scourged,
    ElderItem,
    ShaperItem,
}

/// The comparison operator written between a keyword and its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Less,
    LessEqual,
    Equal,
    ExactMatch,
    Greater,
    GreaterEqual,
    NotEqual,
}

impl ComparisonOp {
    /// `true` for strict operators that have no symbol spelled as `=`-family.
    pub fn is_exact(self) -> bool {
        matches!(self, ComparisonOp::ExactMatch)
    }
}

/// A value an ordered condition (range-bound or enumerated list) may hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderedValue {
    Integer(i32),
    Fractional(f64),
    Rarity(RarityTag),
}

/// An inclusive-or-exclusive bound on an ordered field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeBound<T> {
    pub value: T,
    pub inclusive: bool,
}

/// A value that can appear in an equals/not-equals value list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListValue {
    Integer(i32),
    Rarity(RarityTag),
    GemQualityType(GemQualityTypeTag),
}

/// String-match mode: substring/first-match versus full-string equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringMatchMode {
    Substring,
    Exact,
}

fn property_value_i32(itm: &Item, area_level: i32, property: TestedProperty) -> Option<i32> {
    Some(match property {
        TestedProperty::ItemLevel => itm.item_level,
        TestedProperty::DropLevel => itm.drop_level,
        TestedProperty::Quality => itm.quality,
        TestedProperty::Width => itm.width,
        TestedProperty::Height => itm.height,
        TestedProperty::StackSize => itm.stack_size?,
        TestedProperty::GemLevel => itm.gem_level?,
        TestedProperty::MapTier => itm.map_tier?,
        TestedProperty::LinkedSockets => itm.links(),
        TestedProperty::CorruptedMods => itm.corrupted_mods,
        TestedProperty::EnchantmentPassiveNum => itm.enchantment_passive_num,
        TestedProperty::BaseArmour => itm.base_armour?,
        TestedProperty::BaseEvasion => itm.base_evasion?,
        TestedProperty::BaseEnergyShield => itm.base_energy_shield?,
        TestedProperty::BaseWard => itm.base_ward?,
        TestedProperty::BaseDefencePercentile => itm.base_defence_percentile?,
        TestedProperty::MemoryStrands => itm.memory_strands?,
        TestedProperty::AreaLevel => area_level,
        _ => return None,
    })
}

fn compare_i32(op: ComparisonOp, lhs: i32, rhs: i32) -> bool {
    match op {
        ComparisonOp::Less => lhs < rhs,
        ComparisonOp::LessEqual => lhs <= rhs,
        ComparisonOp::Equal | ComparisonOp::ExactMatch => lhs == rhs,
        ComparisonOp::Greater => lhs > rhs,
        ComparisonOp::GreaterEqual => lhs >= rhs,
        ComparisonOp::NotEqual => lhs != rhs,
    }
}

fn compare_f64(op: ComparisonOp, lhs: f64, rhs: f64) -> bool {
    match op {
        ComparisonOp::Less => lhs < rhs,
        ComparisonOp::LessEqual => lhs <= rhs || (lhs - rhs).abs() < PRICE_EPSILON,
        ComparisonOp::Equal | ComparisonOp::ExactMatch => (lhs - rhs).abs() < PRICE_EPSILON,
        ComparisonOp::Greater => lhs > rhs,
        ComparisonOp::GreaterEqual => lhs >= rhs || (lhs - rhs).abs() < PRICE_EPSILON,
        ComparisonOp::NotEqual => (lhs - rhs).abs() >= PRICE_EPSILON,
    }
}

/// `test_socket_or_link_count` (A) from the game's own sockets logic: no
/// requirement means "always satisfied".
fn test_count(req: Option<i32>, op: ComparisonOp, actual: i32) -> bool {
    match req {
        None => true,
        Some(req) => compare_i32(op, actual, req),
    }
}

/// `test_color_count` (B): a zero color requirement carries no information
/// (there is no way to write "0 red sockets required"), so the caller must
/// treat it as "no opinion" via the `default` fallback.
fn test_color_count(req: i32, op: ComparisonOp, actual: i32, default: bool) -> bool {
    if req == 0 {
        return default;
    }
    match op {
        ComparisonOp::Less => actual < req,
        ComparisonOp::LessEqual => actual <= req,
        ComparisonOp::Greater => actual > req,
        // soft-equal and >= both mean "at least" for colors; this is how
        // the game client actually behaves, not a typo.
        ComparisonOp::GreaterEqual | ComparisonOp::Equal => actual >= req,
        ComparisonOp::ExactMatch => actual == req,
        ComparisonOp::NotEqual => false,
    }
}

fn uses_or(op: ComparisonOp) -> bool {
    matches!(op, ComparisonOp::Less | ComparisonOp::Greater)
}

fn test_color_requirements_all(
    spec: SocketSpecValue,
    op: ComparisonOp,
    r: i32,
    g: i32,
    b: i32,
    w: i32,
    a: i32,
    d: i32,
    default: bool,
) -> bool {
    test_color_count(spec.r, op, r, default)
        && test_color_count(spec.g, op, g, default)
        && test_color_count(spec.b, op, b, default)
        && test_color_count(spec.w, op, w, default)
        && test_color_count(spec.a, op, a, default)
        && test_color_count(spec.d, op, d, default)
}

fn test_color_requirements_any(
    spec: SocketSpecValue,
    op: ComparisonOp,
    r: i32,
    g: i32,
    b: i32,
    w: i32,
    a: i32,
    d: i32,
) -> bool {
    test_color_count(spec.r, op, r, false)
        || test_color_count(spec.g, op, g, false)
        || test_color_count(spec.b, op, b, false)
        || test_color_count(spec.w, op, w, false)
        || test_color_count(spec.a, op, a, false)
        || test_color_count(spec.d, op, d, false)
}

/// Implements the Sockets/SocketGroup rules documented in §4.7: `<`/`>` use
/// OR across sub-requirements, everything else uses AND; plain `=` is exact
/// on the count but "at least" on colors. `group_matters` selects
/// `SocketGroup` (per-link-group reasoning) over `Sockets` (whole item).
pub fn test_sockets_condition(op: ComparisonOp, spec: SocketSpecValue, group_matters: bool, item: &Item) -> bool {
    debug_assert!(op != ComparisonOp::NotEqual, "!= must be handled by the caller as a negation of =");

    if item.sockets.groups.is_empty() {
        // An item with no sockets is treated as one empty link-group.
        return test_count(spec.num, op, 0)
            && test_color_requirements_all(spec, op, 0, 0, 0, 0, 0, 0, true);
    }

    if group_matters {
        if uses_or(op) {
            return test_count(spec.num, op, item.sockets.links())
                || item.sockets.groups.iter().any(|g| {
                    test_color_requirements_any(
                        spec,
                        op,
                        g.count_of(crate::enums::SocketColorTag::R),
                        g.count_of(crate::enums::SocketColorTag::G),
                        g.count_of(crate::enums::SocketColorTag::B),
                        g.count_of(crate::enums::SocketColorTag::W),
                        g.count_of(crate::enums::SocketColorTag::A),
                        g.count_of(crate::enums::SocketColorTag::D),
                    )
                });
        }
        item.sockets.groups.iter().any(|g| {
            test_count(spec.num, op, g.sockets.len() as i32)
                && test_color_requirements_all(
                    spec,
                    op,
                    g.count_of(crate::enums::SocketColorTag::R),
                    g.count_of(crate::enums::SocketColorTag::G),
                    g.count_of(crate::enums::SocketColorTag::B),
                    g.count_of(crate::enums::SocketColorTag::W),
                    g.count_of(crate::enums::SocketColorTag::A),
                    g.count_of(crate::enums::SocketColorTag::D),
                    true,
                )
        })
    } else {
        let counts = |c| item.sockets.count_of(c);
        use crate::enums::SocketColorTag::*;
        if uses_or(op) {
            test_count(spec.num, op, item.sockets.sockets())
                || test_color_requirements_any(spec, op, counts(R), counts(G), counts(B), counts(W), counts(A), counts(D))
        } else {
            test_count(spec.num, op, item.sockets.sockets())
                && test_color_requirements_all(spec, op, counts(R), counts(G), counts(B), counts(W), counts(A), counts(D), true)
        }
    }
}

/// Counts how many of `values` match `sv` under diacritic/plural-tolerant
/// comparison, returning the count and the origin of the first match.
fn count_matches<'a>(sv: &str, values: &'a [FsString], exact: bool) -> (usize, Option<Span>) {
    let mut count = 0usize;
    let mut first = None;
    for v in values {
        if compare_strings_ignore_diacritics(sv, &v.value, exact) {
            count += 1;
            if first.is_none() {
                first = Some(v.origin);
            }
        }
    }
    (count, first)
}

/// The full condition family. Conditions never borrow from the AST; every
/// value is owned so a compiled filter can outlive the source text.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Boolean {
        property: TestedProperty,
        value: bool,
        origin: Span,
    },
    LowerBound {
        property: TestedProperty,
        bound: RangeBound<OrderedValue>,
        origin: Span,
    },
    UpperBound {
        property: TestedProperty,
        bound: RangeBound<OrderedValue>,
        origin: Span,
    },
    ValueList {
        property: TestedProperty,
        /// `true` selects "must be one of", `false` selects "must be none of".
        allowed: bool,
        values: Vec<Spanned<ListValue>>,
        origin: Span,
    },
    StringMatch {
        property: TestedProperty,
        mode: StringMatchMode,
        /// `true` selects "no entry matches" (`!=`); only legal where the
        /// game client actually supports it (not `HasExplicitMod`).
        negate: bool,
        values: Vec<FsString>,
        origin: Span,
    },
    CountedString {
        property: TestedProperty,
        op: ComparisonOp,
        count: Option<Integer>,
        names: Vec<FsString>,
        origin: Span,
    },
    HasInfluence {
        exact: bool,
        spec: InfluenceSpec,
        origin: Span,
    },
    Sockets {
        group_matters: bool,
        op: ComparisonOp,
        spec: SocketSpecValue,
        origin: Span,
    },
}

/// The set of influences named in a `HasInfluence` condition. Distinct from
/// [`crate::item::InfluenceSet`] (an item's actual influences) even though
/// the shape is identical, because this one also represents the literal
/// `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InfluenceSpec {
    pub none: bool,
    pub shaper: bool,
    pub elder: bool,
    pub crusader: bool,
    pub redeemer: bool,
    pub hunter: bool,
    pub warlord: bool,
}

impl InfluenceSpec {
    pub fn is_none(&self) -> bool {
        self.none
    }

    pub fn tags(&self) -> Vec<InfluenceTag> {
        let mut out = Vec::new();
        if self.shaper {
            out.push(InfluenceTag::Shaper);
        }
        if self.elder {
            out.push(InfluenceTag::Elder);
        }
        if self.crusader {
            out.push(InfluenceTag::Crusader);
        }
        if self.redeemer {
            out.push(InfluenceTag::Redeemer);
        }
        if self.hunter {
            out.push(InfluenceTag::Hunter);
        }
        if self.warlord {
            out.push(InfluenceTag::Warlord);
        }
        out
    }
}

impl Condition {
    pub fn origin(&self) -> Span {
        match self {
            Condition::Boolean { origin, .. }
            | Condition::LowerBound { origin, .. }
            | Condition::UpperBound { origin, .. }
            | Condition::ValueList { origin, .. }
            | Condition::StringMatch { origin, .. }
            | Condition::CountedString { origin, .. }
            | Condition::HasInfluence { origin, .. }
            | Condition::Sockets { origin, .. } => *origin,
        }
    }

    pub fn property(&self) -> TestedProperty {
        match self {
            Condition::Boolean { property, .. }
            | Condition::LowerBound { property, .. }
            | Condition::UpperBound { property, .. }
            | Condition::ValueList { property, .. }
            | Condition::StringMatch { property, .. }
            | Condition::CountedString { property, .. } => *property,
            Condition::HasInfluence { .. } => TestedProperty::HasInfluence,
            Condition::Sockets { group_matters, .. } => {
                if *group_matters {
                    TestedProperty::SocketGroup
                } else {
                    TestedProperty::Sockets
                }
            }
        }
    }

    /// Rejects conditions the game client would refuse to load: empty value
    /// lists (e.g. an autogenerated `BaseType` with no eligible items) and
    /// invalid socket specs. A block whose condition set contains an invalid
    /// condition is dropped entirely by the binder/compiler.
    pub fn is_valid(&self) -> bool {
        match self {
            Condition::ValueList { values, .. } => !values.is_empty(),
            Condition::StringMatch { values, .. } => !values.is_empty(),
            Condition::CountedString { names, .. } => !names.is_empty(),
            Condition::Sockets { spec, .. } => spec.is_valid(),
            Condition::Boolean { .. } | Condition::LowerBound { .. } | Condition::UpperBound { .. } | Condition::HasInfluence { .. } => true,
        }
    }

    pub fn test_item(&self, item: &Item, area_level: i32) -> ConditionMatchResult {
        let origin = self.origin();
        match self {
            Condition::Boolean { property, value, .. } => {
                let actual = boolean_property_value(item, *property);
                ConditionMatchResult::new(actual == *value, origin, None)
            }
            Condition::LowerBound { property, bound, .. } => {
                let result = test_ordered_bound(item, area_level, *property, *bound, true);
                ConditionMatchResult::new(result, origin, None)
            }
            Condition::UpperBound { property, bound, .. } => {
                let result = test_ordered_bound(item, area_level, *property, *bound, false);
                ConditionMatchResult::new(result, origin, None)
            }
            Condition::ValueList { property, allowed, values, .. } => {
                let actual = match ordered_property_value(item, area_level, *property) {
                    Some(v) => v,
                    None => return ConditionMatchResult::new(false, origin, None),
                };
                let found = values.iter().find(|v| list_value_eq(v.value, actual));
                let matched = *allowed == found.is_some();
                ConditionMatchResult::new(matched, origin, found.map(|v| v.origin))
            }
            Condition::StringMatch { property, mode, negate, values, .. } => {
                if *property == TestedProperty::TransfiguredGem && !item.is_transfigured_gem {
                    return ConditionMatchResult::new(false, origin, None);
                }
                let exact = *mode == StringMatchMode::Exact;
                let hay = string_property_values(item, *property);
                let mut match_origin = None;
                let any = hay.iter().any(|sv| {
                    if let Some(v) = values.iter().find(|v| compare_strings_ignore_diacritics(sv, &v.value, exact)) {
                        match_origin = Some(v.origin);
                        true
                    } else {
                        false
                    }
                });
                let matched = if *negate { !any } else { any };
                ConditionMatchResult::new(matched, origin, if *negate { None } else { match_origin })
            }
            Condition::CountedString { property, op, count, names, .. } => {
                let hay = string_property_values(item, *property);
                let mut total = 0usize;
                let mut first = None;
                for sv in &hay {
                    let (c, o) = count_matches(sv, names, false);
                    total += c;
                    if first.is_none() {
                        first = o;
                    }
                }
                let required = count.map(|c| c.value).unwrap_or(1);
                let matched = compare_i32(*op, total as i32, required);
                ConditionMatchResult::new(matched, origin, first)
            }
            Condition::HasInfluence { exact, spec, .. } => {
                let matched = if spec.is_none() {
                    item.influence.is_none()
                } else if *exact {
                    spec.tags().into_iter().all(|t| item.influence.has(t))
                } else {
                    spec.tags().into_iter().any(|t| item.influence.has(t))
                };
                ConditionMatchResult::new(matched, origin, None)
            }
            Condition::Sockets { group_matters, op, spec, .. } => {
                let matched = if *op == ComparisonOp::NotEqual {
                    !test_sockets_condition(ComparisonOp::Equal, *spec, *group_matters, item)
                } else {
                    test_sockets_condition(*op, *spec, *group_matters, item)
                };
                ConditionMatchResult::new(matched, origin, None)
            }
        }
    }
}

fn list_value_eq(lhs: ListValue, rhs: ListValue) -> bool {
    match (lhs, rhs) {
        (ListValue::Integer(a), ListValue::Integer(b)) => a == b,
        (ListValue::Rarity(a), ListValue::Rarity(b)) => a == b,
        (ListValue::GemQualityType(a), ListValue::GemQualityType(b)) => a == b,
        _ => false,
    }
}

fn ordered_property_value(item: &Item, area_level: i32, property: TestedProperty) -> Option<ListValue> {
    if property == TestedProperty::Rarity {
        return item.rarity.map(ListValue::Rarity);
    }
    if property == TestedProperty::AlternateQuality {
        return item.gem_quality_type.map(ListValue::GemQualityType);
    }
    property_value_i32(item, area_level, property).map(ListValue::Integer)
}

fn test_ordered_bound(item: &Item, area_level: i32, property: TestedProperty, bound: RangeBound<OrderedValue>, is_lower: bool) -> bool {
    let op_int = |inclusive: bool, lower: bool| -> ComparisonOp {
        match (lower, inclusive) {
            (true, true) => ComparisonOp::GreaterEqual,
            (true, false) => ComparisonOp::Greater,
            (false, true) => ComparisonOp::LessEqual,
            (false, false) => ComparisonOp::Less,
        }
    };

    match bound.value {
        OrderedValue::Integer(v) => match property_value_i32(item, area_level, property) {
            Some(actual) => compare_i32(op_int(bound.inclusive, is_lower), actual, v),
            None => false,
        },
        OrderedValue::Fractional(_) => false, // fractional bounds only occur in price-range, never on flat conditions
        OrderedValue::Rarity(r) => match item.rarity {
            Some(actual) => {
                let actual = actual as i32;
                let v = r as i32;
                compare_i32(op_int(bound.inclusive, is_lower), actual, v)
            }
            None => false,
        },
    }
}

fn boolean_property_value(item: &Item, property: TestedProperty) -> bool {
    match property {
        TestedProperty::Identified => item.identified,
        TestedProperty::Corrupted => item.corrupted,
        TestedProperty::Mirrored => item.mirrored,
        TestedProperty::FracturedItem => item.fractured,
        TestedProperty::SynthesisedItem => item.synthesised,
        TestedProperty::AnyEnchantment => item.enchantment.is_some(),
        TestedProperty::ShapedMap => item.shaped_map,
        TestedProperty::ElderMap => item.elder_map,
        TestedProperty::BlightedMap => item.blighted_map,
        TestedProperty::UberBlightedMap => item.uber_blighted_map,
        TestedProperty::Replica => item.replica,
        TestedProperty::HasCruciblePassiveTree => item.has_crucible_passive_tree,
        TestedProperty::ZanaMemory => item.zana_memory,
        TestedProperty::Scourged => item.scourged,
        TestedProperty::HasSearingExarchImplicit => item.has_searing_exarch_implicit,
        TestedProperty::HasEaterOfWorldsImplicit => item.has_eater_of_worlds_implicit,
        TestedProperty::TransfiguredGem => item.is_transfigured_gem,
        TestedProperty::ElderItem => item.influence.elder,
        TestedProperty::ShaperItem => item.influence.shaper,
        _ => false,
    }
}

fn string_property_values(item: &Item, property: TestedProperty) -> Vec<&str> {
    match property {
        TestedProperty::Class => vec![item.class.as_str()],
        TestedProperty::BaseType => vec![item.base_type.as_str()],
        TestedProperty::HasExplicitMod => item.explicit_mods.iter().map(String::as_str).collect(),
        TestedProperty::HasImplicitMod => item.implicit_mods.iter().map(String::as_str).collect(),
        TestedProperty::HasEnchantment => item.enchantment.as_deref().into_iter().collect(),
        TestedProperty::EnchantmentPassiveNode => item.enchantment_passive_node.as_deref().into_iter().collect(),
        TestedProperty::ArchnemesisMod => item.archnemesis_mods.iter().map(String::as_str).collect(),
        TestedProperty::TransfiguredGem => vec![item.base_type.as_str()],
        _ => Vec::new(),
    }
}

/// A price-range condition. Distinct from the official [`Condition`] family:
/// the game client has no notion of `Price`, so this never reaches a flat
/// filter. It exists only to drive autogeneration at compile/bind time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRangeCondition {
    pub lower: Option<RangeBound<f64>>,
    pub upper: Option<RangeBound<f64>>,
    pub origin: Span,
}

impl PriceRangeCondition {
    pub fn includes(&self, price: f64) -> bool {
        let lower_ok = self.lower.map_or(true, |b| {
            if b.inclusive {
                price >= b.value || (price - b.value).abs() < PRICE_EPSILON
            } else {
                price > b.value
            }
        });
        let upper_ok = self.upper.map_or(true, |b| {
            if b.inclusive {
                price <= b.value || (price - b.value).abs() < PRICE_EPSILON
            } else {
                price < b.value
            }
        });
        lower_ok && upper_ok
    }
}

/// A whole block's conditions: they all must pass for the block to match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionSet {
    pub conditions: Vec<Condition>,
}

impl ConditionSet {
    pub fn is_valid(&self) -> bool {
        self.conditions.iter().all(Condition::is_valid)
    }

    pub fn push(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Item, LinkedGroup, SocketInfo};
    use fs_base::Span;

    fn sample_item() -> Item {
        Item {
            class: "Belts".into(),
            base_type: "Studded Leather Belt".into(),
            item_level: 70,
            ..Default::default()
        }
    }

    #[test]
    fn range_merge_scenario_from_spec() {
        let lower = Condition::LowerBound {
            property: TestedProperty::ItemLevel,
            bound: RangeBound { value: OrderedValue::Integer(70), inclusive: true },
            origin: Span::new(0, 1),
        };
        let upper = Condition::UpperBound {
            property: TestedProperty::ItemLevel,
            bound: RangeBound { value: OrderedValue::Integer(85), inclusive: false },
            origin: Span::new(0, 1),
        };

        let mut item = sample_item();
        item.item_level = 70;
        assert!(lower.test_item(&item, 83).is_successful());
        assert!(upper.test_item(&item, 83).is_successful());

        item.item_level = 85;
        assert!(!upper.test_item(&item, 83).is_successful());

        item.item_level = 69;
        assert!(!lower.test_item(&item, 83).is_successful());
    }

    #[test]
    fn exact_vs_substring_scenario_from_spec() {
        let item = sample_item();
        let exact = Condition::StringMatch {
            property: TestedProperty::BaseType,
            mode: StringMatchMode::Exact,
            negate: false,
            values: vec![FsString::new("Leather Belt", Span::new(0, 1))],
            origin: Span::new(0, 1),
        };
        let substring = Condition::StringMatch {
            property: TestedProperty::BaseType,
            mode: StringMatchMode::Substring,
            negate: false,
            values: vec![FsString::new("Leather Belt", Span::new(0, 1))],
            origin: Span::new(0, 1),
        };
        assert!(!exact.test_item(&item, 1).is_successful());
        assert!(substring.test_item(&item, 1).is_successful());
    }

    #[test]
    fn has_explicit_mod_counts_matches() {
        let mut item = sample_item();
        item.explicit_mods = vec!["of the Whale".into(), "of the Fox".into(), "Tyrannical".into()];
        let cond = Condition::CountedString {
            property: TestedProperty::HasExplicitMod,
            op: ComparisonOp::GreaterEqual,
            count: Some(Integer::new(2, Span::new(0, 1))),
            names: vec![FsString::new("of the", Span::new(0, 1))],
            origin: Span::new(0, 1),
        };
        assert!(cond.test_item(&item, 1).is_successful());
    }

    #[test]
    fn has_influence_none_matches_uninfluenced_item() {
        let item = sample_item();
        let cond = Condition::HasInfluence {
            exact: false,
            spec: InfluenceSpec { none: true, ..Default::default() },
            origin: Span::new(0, 1),
        };
        assert!(cond.test_item(&item, 1).is_successful());
    }

    #[test]
    fn has_influence_exact_requires_all_listed() {
        let mut item = sample_item();
        item.influence.shaper = true;
        let spec = InfluenceSpec { shaper: true, elder: true, ..Default::default() };
        let loose = Condition::HasInfluence { exact: false, spec, origin: Span::new(0, 1) };
        let exact = Condition::HasInfluence { exact: true, spec, origin: Span::new(0, 1) };
        assert!(loose.test_item(&item, 1).is_successful());
        assert!(!exact.test_item(&item, 1).is_successful());

        item.influence.elder = true;
        assert!(exact.test_item(&item, 1).is_successful());
    }

    fn rgb_item(sockets: &[&str]) -> Item {
        let mut item = sample_item();
        item.sockets = SocketInfo {
            groups: sockets
                .iter()
                .map(|group| LinkedGroup {
                    sockets: group.chars().map(|c| crate::enums::SocketColorTag::from_letter(c).unwrap()).collect(),
                })
                .collect(),
        };
        item
    }

    #[test]
    fn sockets_less_than_uses_or() {
        let item = rgb_item(&["RGGGB"]); // 5 sockets, 3 green
        let spec = SocketSpecValue { num: Some(5), g: 3, ..Default::default() };
        assert!(!test_sockets_condition(ComparisonOp::Less, spec, false, &item));

        let item2 = rgb_item(&["RGGB"]); // 4 sockets, 2 green: < 5 sockets true -> OR succeeds
        assert!(test_sockets_condition(ComparisonOp::Less, spec, false, &item2));
    }

    #[test]
    fn sockets_less_equal_uses_and() {
        let item = rgb_item(&["RGGGB"]); // 5 sockets, 3 green
        let spec = SocketSpecValue { num: Some(5), g: 3, ..Default::default() };
        assert!(test_sockets_condition(ComparisonOp::LessEqual, spec, false, &item));

        let item2 = rgb_item(&["RGGGGB"]); // 6 sockets exceeds <=5
        assert!(!test_sockets_condition(ComparisonOp::LessEqual, spec, false, &item2));
    }

    #[test]
    fn sockets_soft_equal_is_exact_count_at_least_color() {
        let spec = SocketSpecValue { num: Some(5), g: 3, ..Default::default() };
        let item = rgb_item(&["RGGGB"]);
        assert!(test_sockets_condition(ComparisonOp::Equal, spec, false, &item));

        let item_more_green = rgb_item(&["GGGGB"]);
        assert!(test_sockets_condition(ComparisonOp::Equal, spec, false, &item_more_green));
    }

    #[test]
    fn empty_sockets_are_one_empty_group() {
        let item = sample_item();
        let spec = SocketSpecValue { num: Some(0), ..Default::default() };
        assert!(test_sockets_condition(ComparisonOp::Equal, spec, false, &item));
    }

    #[test]
    fn condition_set_rejects_invalid_conditions() {
        let set = ConditionSet {
            conditions: vec![Condition::StringMatch {
                property: TestedProperty::BaseType,
                mode: StringMatchMode::Exact,
                negate: false,
                values: vec![],
                origin: Span::new(0, 1),
            }],
        };
        assert!(!set.is_valid());
    }

    #[test]
    fn price_range_includes_checks_both_bounds() {
        let range = PriceRangeCondition {
            lower: Some(RangeBound { value: 5.0, inclusive: true }),
            upper: Some(RangeBound { value: 300.0, inclusive: false }),
            origin: Span::new(0, 1),
        };
        assert!(range.includes(5.0));
        assert!(range.includes(200.0));
        assert!(!range.includes(4.999));
        assert!(!range.includes(300.0));
    }
}
