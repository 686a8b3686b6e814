//! Lowers a parsed spirit filter into flat blocks, threading each nested
//! block's inherited conditions and actions down from its parent. Blocks
//! that carry an `Autogenerate` directive are lowered to an
//! [`AutogenBlock`] instead of a flat block, since expanding them requires
//! a market snapshot that isn't available at parse time.

use crate::diagnostic::{Diagnostic, DiagnosticBag, DiagnosticCode};
use crate::evaluator::evaluate_operand_list;
use crate::symbol_table::SymbolTable;
use fs_base::Span;
use fs_model::action::{AlertSoundAction, AlertSoundPositioning, ActionSet};
use fs_model::block::{ItemFilterBlock, Visibility};
use fs_model::condition::{
    Condition, ConditionSet, ComparisonOp, InfluenceSpec, ListValue, OrderedValue, PriceRangeCondition, RangeBound,
    StringMatchMode, TestedProperty,
};
use fs_model::enums::SocketSpecValue;
use fs_model::primitive::{AlertSoundKind, BeamEffect, Color, MinimapIcon};
use fs_model::{Object, Primitive, PrimitiveKind, Spanned};
use fs_syntax::sf::ast as sf;
use fs_syntax::token::Operator;

pub struct CompileOptions {
    pub ruthless_mode: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self { ruthless_mode: false }
    }
}

pub struct AutogenBlock {
    pub category: String,
    pub category_origin: Span,
    pub price: PriceRangeCondition,
    pub visibility: Visibility,
    pub conditions: ConditionSet,
    pub actions: ActionSet,
    pub continue_: bool,
    pub origin: Span,
}

pub enum CompiledBlock {
    Flat(ItemFilterBlock),
    Autogenerate(AutogenBlock),
    Import { path: String, origin: Span },
}

/// `Expand` may not nest deeper than this; past it we assume a cycle rather
/// than run the stack out.
const MAX_EXPANSION_DEPTH: u8 = 16;

#[derive(Default)]
pub struct CompiledSpiritFilter {
    pub blocks: Vec<CompiledBlock>,
}

pub fn compile(doc: &sf::Document, options: &CompileOptions) -> (CompiledSpiritFilter, DiagnosticBag) {
    let mut symbols = SymbolTable::new();
    let mut diagnostics = DiagnosticBag::new();
    let mut out = CompiledSpiritFilter::default();

    for item in &doc.items {
        match item {
            sf::TopLevel::ConstantDef(def) => match &def.value {
                sf::ConstantValue::Sequence(exprs) => match evaluate_operand_list(exprs, &symbols) {
                    Ok(values) => {
                        let object = match values.len() {
                            1 => Object::scalar(values.into_iter().next().unwrap()),
                            _ => match Object::array(values, def.origin) {
                                Some(object) => object,
                                None => {
                                    diagnostics.push(Diagnostic::new(
                                        DiagnosticCode::ArrayElementTypeMismatch,
                                        "a multi-value constant must have values of the same type",
                                        def.origin,
                                    ));
                                    continue;
                                }
                            },
                        };
                        if let Err(d) = symbols.define(&def.name, object, def.name_origin) {
                            diagnostics.push(d);
                        }
                    }
                    Err(d) => diagnostics.push(d),
                },
                sf::ConstantValue::Tree(statements) => {
                    if let Err(d) = symbols.define_tree(&def.name, statements.clone(), def.name_origin) {
                        diagnostics.push(d);
                    }
                }
            },
            sf::TopLevel::Block(block) => {
                lower_block(
                    block,
                    &ConditionSet::default(),
                    &ActionSet::default(),
                    &symbols,
                    options,
                    &mut diagnostics,
                    &mut out.blocks,
                );
            }
            sf::TopLevel::Import(stmt) => {
                out.blocks.push(CompiledBlock::Import { path: stmt.path.clone(), origin: stmt.origin });
            }
        }
    }

    (out, diagnostics)
}

fn merge_conditions(inherited: &ConditionSet, own: &ConditionSet) -> ConditionSet {
    ConditionSet {
        conditions: inherited.conditions.iter().chain(own.conditions.iter()).cloned().collect(),
    }
}

fn lower_block(
    block: &sf::Block,
    inherited_conditions: &ConditionSet,
    inherited_actions: &ActionSet,
    symbols: &SymbolTable,
    options: &CompileOptions,
    diagnostics: &mut DiagnosticBag,
    out: &mut Vec<CompiledBlock>,
) {
    let visibility = match block.visibility {
        sf::RawVisibility::Show => Visibility::Show,
        sf::RawVisibility::Hide => Visibility::Hide,
        sf::RawVisibility::Minimal => Visibility::Minimal,
    };

    let mut own_conditions = ConditionSet::default();
    let mut own_actions = ActionSet::default();
    let mut autogen: Option<sf::AutogenerateStmt> = None;

    lower_statements(&block.statements, symbols, diagnostics, out, &mut own_conditions, &mut own_actions, &mut autogen, 0);

    let effective_conditions = merge_conditions(inherited_conditions, &own_conditions);
    let effective_actions = inherited_actions.override_with(&own_actions);
    let visibility = apply_ruthless_mode(visibility, options, diagnostics, block.origin);

    if let Some(stmt) = &autogen {
        if !block.nested.is_empty() {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::NestedAutogenerate,
                "Autogenerate cannot be combined with nested blocks",
                stmt.origin,
            ));
        }
        match build_price_range(&stmt.price, symbols) {
            Ok(price) => out.push(CompiledBlock::Autogenerate(AutogenBlock {
                category: stmt.category.clone(),
                category_origin: stmt.category_origin,
                price,
                visibility,
                conditions: effective_conditions.clone(),
                actions: effective_actions.clone(),
                continue_: block.continue_,
                origin: block.origin,
            })),
            Err(d) => diagnostics.push(d),
        }
    } else if block.nested.is_empty() || !own_conditions.conditions.is_empty() {
        let mut flat = ItemFilterBlock::new(visibility, block.origin);
        flat.conditions = effective_conditions.clone();
        flat.actions = effective_actions.clone();
        flat.continue_ = block.continue_;
        if flat.is_valid() {
            out.push(CompiledBlock::Flat(flat));
        } else {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::EmptyValueList,
                "block has an empty or invalid condition and was dropped",
                block.origin,
            ));
        }
    }

    for child in &block.nested {
        lower_block(child, &effective_conditions, &effective_actions, symbols, options, diagnostics, out);
    }
}

/// Dispatches one statement list into the accumulators a block is building
/// up. Factored out of `lower_block` so `Expand $name` can recurse into a
/// symbol table tree with the same dispatch logic, without re-borrowing
/// `block.statements`.
fn lower_statements(
    statements: &[sf::Statement],
    symbols: &SymbolTable,
    diagnostics: &mut DiagnosticBag,
    out: &mut Vec<CompiledBlock>,
    own_conditions: &mut ConditionSet,
    own_actions: &mut ActionSet,
    autogen: &mut Option<sf::AutogenerateStmt>,
    depth: u8,
) {
    for statement in statements {
        match statement {
            sf::Statement::Condition(stmt) => match build_condition(stmt, symbols) {
                Ok(condition) => own_conditions.push(condition),
                Err(d) => diagnostics.push(d),
            },
            sf::Statement::Action(stmt) => match build_action(stmt, symbols) {
                Ok(apply) => apply(own_actions),
                Err(d) => diagnostics.push(d),
            },
            sf::Statement::Autogenerate(stmt) => {
                if autogen.is_some() {
                    diagnostics.push(Diagnostic::new(
                        DiagnosticCode::NestedAutogenerate,
                        "a block may contain only one Autogenerate directive",
                        stmt.origin,
                    ));
                } else {
                    *autogen = Some(stmt.clone());
                }
            }
            sf::Statement::Import(stmt) => {
                out.push(CompiledBlock::Import { path: stmt.path.clone(), origin: stmt.origin });
            }
            sf::Statement::Expand(stmt) => {
                if depth >= MAX_EXPANSION_DEPTH {
                    diagnostics.push(Diagnostic::new(
                        DiagnosticCode::CyclicExpansion,
                        format!("'${}' is nested too deeply to expand; check for a cycle", stmt.name),
                        stmt.origin,
                    ));
                    continue;
                }
                match symbols.resolve_tree(&stmt.name) {
                    None => diagnostics.push(Diagnostic::new(
                        DiagnosticCode::UndefinedReference,
                        format!("'${}' does not name a block tree", stmt.name),
                        stmt.origin,
                    )),
                    Some(tree) => {
                        let mut layer = DiagnosticBag::new();
                        lower_statements(&tree.statements, symbols, &mut layer, out, own_conditions, own_actions, autogen, depth + 1);
                        for d in layer.into_vec() {
                            diagnostics.push(d.with_note(format!("while expanding '${}'", stmt.name), stmt.origin));
                        }
                    }
                }
            }
        }
    }
}

/// In Ruthless mode the game client has no `Hide` visibility level, only the
/// weaker `Minimal`, and vice versa has no use for `Minimal` outside it —
/// so compiling a `Hide` block for Ruthless mode emits `Minimal` instead
/// (and a `Minimal` block, presumably written for Ruthless mode already,
/// swaps back to `Hide` when compiled without it), with a non-fatal warning
/// either way. `Show` is unaffected.
fn apply_ruthless_mode(visibility: Visibility, options: &CompileOptions, diagnostics: &mut DiagnosticBag, origin: Span) -> Visibility {
    if !options.ruthless_mode {
        return visibility;
    }
    match visibility {
        Visibility::Hide => {
            diagnostics.push(
                Diagnostic::new(DiagnosticCode::RuthlessModeVisibilitySwap, "Hide is replaced by Minimal in Ruthless mode", origin)
                    .warning(),
            );
            Visibility::Minimal
        }
        Visibility::Minimal => {
            diagnostics.push(
                Diagnostic::new(DiagnosticCode::RuthlessModeVisibilitySwap, "Minimal is replaced by Hide in Ruthless mode", origin)
                    .warning(),
            );
            Visibility::Hide
        }
        Visibility::Show => visibility,
    }
}

fn build_price_range(expr: &sf::PriceRangeExpr, symbols: &SymbolTable) -> Result<PriceRangeCondition, Diagnostic> {
    Ok(PriceRangeCondition {
        lower: build_price_bound(&expr.lower, symbols)?,
        upper: build_price_bound(&expr.upper, symbols)?,
        origin: expr.origin,
    })
}

fn build_price_bound(bound: &Option<(sf::Expr, bool)>, symbols: &SymbolTable) -> Result<Option<RangeBound<f64>>, Diagnostic> {
    let Some((expr, inclusive)) = bound else { return Ok(None) };
    let primitive = crate::evaluator::evaluate_expr(expr, symbols)?;
    let value = match primitive {
        Primitive::Integer(v) => v.value as f64,
        Primitive::Fractional(v) => v.value,
        other => return Err(Diagnostic::new(DiagnosticCode::TypeMismatch, "a price bound must be a number", other.origin())),
    };
    Ok(Some(RangeBound { value, inclusive: *inclusive }))
}

const BOOLEAN_PROPERTIES: &[TestedProperty] = &[
    TestedProperty::Identified,
    TestedProperty::Corrupted,
    TestedProperty::Mirrored,
    TestedProperty::FracturedItem,
    TestedProperty::SynthesisedItem,
    TestedProperty::AnyEnchantment,
    TestedProperty::ShapedMap,
    TestedProperty::ElderMap,
    TestedProperty::BlightedMap,
    TestedProperty::UberBlightedMap,
    TestedProperty::Replica,
    TestedProperty::HasCruciblePassiveTree,
    TestedProperty::ZanaMemory,
    TestedProperty::Scourged,
    TestedProperty::HasSearingExarchImplicit,
    TestedProperty::HasEaterOfWorldsImplicit,
    TestedProperty::ElderItem,
    TestedProperty::ShaperItem,
];

const ORDERED_INT_PROPERTIES: &[TestedProperty] = &[
    TestedProperty::ItemLevel,
    TestedProperty::DropLevel,
    TestedProperty::Quality,
    TestedProperty::Width,
    TestedProperty::Height,
    TestedProperty::StackSize,
    TestedProperty::GemLevel,
    TestedProperty::MapTier,
    TestedProperty::LinkedSockets,
    TestedProperty::CorruptedMods,
    TestedProperty::EnchantmentPassiveNum,
    TestedProperty::BaseArmour,
    TestedProperty::BaseEvasion,
    TestedProperty::BaseEnergyShield,
    TestedProperty::BaseWard,
    TestedProperty::BaseDefencePercentile,
    TestedProperty::MemoryStrands,
    TestedProperty::AreaLevel,
];

const STRING_PROPERTIES: &[TestedProperty] = &[
    TestedProperty::Class,
    TestedProperty::BaseType,
    TestedProperty::HasEnchantment,
    TestedProperty::EnchantmentPassiveNode,
    TestedProperty::ArchnemesisMod,
    TestedProperty::HasImplicitMod,
];

fn keyword_to_property(keyword: &str) -> Option<TestedProperty> {
    use TestedProperty::*;
    Some(match keyword {
        "Rarity" => Rarity,
        "ItemLevel" => ItemLevel,
        "DropLevel" => DropLevel,
        "Quality" => Quality,
        "Sockets" => Sockets,
        "SocketGroup" => SocketGroup,
        "LinkedSockets" => LinkedSockets,
        "Width" => Width,
        "Height" => Height,
        "StackSize" => StackSize,
        "GemLevel" => GemLevel,
        "MapTier" => MapTier,
        "CorruptedMods" => CorruptedMods,
        "EnchantmentPassiveNum" => EnchantmentPassiveNum,
        "BaseArmour" => BaseArmour,
        "BaseEvasion" => BaseEvasion,
        "BaseEnergyShield" => BaseEnergyShield,
        "BaseWard" => BaseWard,
        "BaseDefencePercentile" => BaseDefencePercentile,
        "MemoryStrands" => MemoryStrands,
        "AreaLevel" => AreaLevel,
        "HasSearingExarchImplicit" => HasSearingExarchImplicit,
        "HasEaterOfWorldsImplicit" => HasEaterOfWorldsImplicit,
        "Class" => Class,
        "BaseType" => BaseType,
        "HasExplicitMod" => HasExplicitMod,
        "HasImplicitMod" => HasImplicitMod,
        "HasEnchantment" => HasEnchantment,
        "EnchantmentPassiveNode" => EnchantmentPassiveNode,
        "ArchnemesisMod" => ArchnemesisMod,
        "HasInfluence" => HasInfluence,
        "TransfiguredGem" => TransfiguredGem,
        "AlternateQuality" => AlternateQuality,
        "Identified" => Identified,
        "Corrupted" => Corrupted,
        "Mirrored" => Mirrored,
        "FracturedItem" => FracturedItem,
        "SynthesisedItem" => SynthesisedItem,
        "AnyEnchantment" => AnyEnchantment,
        "ShapedMap" => ShapedMap,
        "ElderMap" => ElderMap,
        "BlightedMap" => BlightedMap,
        "UberBlightedMap" => UberBlightedMap,
        "Replica" => Replica,
        "HasCruciblePassiveTree" => HasCruciblePassiveTree,
        "ZanaMemory" => ZanaMemory,
        "Scourged" => Scourged,
        "ElderItem" => ElderItem,
        "ShaperItem" => ShaperItem,
        _ => return None,
    })
}

fn build_condition(stmt: &sf::ConditionStmt, symbols: &SymbolTable) -> Result<Condition, Diagnostic> {
    if stmt.keyword == "Price" {
        return Err(Diagnostic::new(
            DiagnosticCode::PriceWithoutAutogenerate,
            "'Price' only has meaning inside an Autogenerate directive",
            stmt.keyword_origin,
        ));
    }
    let property = keyword_to_property(&stmt.keyword)
        .ok_or_else(|| Diagnostic::new(DiagnosticCode::UnknownKeyword, format!("'{}' is not a known condition", stmt.keyword), stmt.keyword_origin))?;
    let values = evaluate_operand_list(&stmt.operands, symbols)?;

    if BOOLEAN_PROPERTIES.contains(&property) {
        return build_boolean_condition(property, stmt, values);
    }
    if property == TestedProperty::TransfiguredGem {
        return build_transfigured_gem_condition(stmt, values);
    }
    if ORDERED_INT_PROPERTIES.contains(&property) {
        return build_ordered_int_condition(property, stmt, values);
    }
    if property == TestedProperty::Rarity {
        return build_rarity_condition(stmt, values);
    }
    if property == TestedProperty::AlternateQuality {
        return build_alternate_quality_condition(stmt, values);
    }
    if STRING_PROPERTIES.contains(&property) {
        return build_string_condition(property, stmt, values);
    }
    if property == TestedProperty::HasExplicitMod {
        return build_counted_string_condition(stmt, values);
    }
    if property == TestedProperty::HasInfluence {
        return build_influence_condition(stmt, values);
    }
    if property == TestedProperty::Sockets || property == TestedProperty::SocketGroup {
        return build_sockets_condition(property, stmt, values);
    }
    unreachable!("every TestedProperty variant is handled by one of the branches above")
}

fn expect_single_kind(values: &[Primitive], kind: PrimitiveKind, origin: Span) -> Result<(), Diagnostic> {
    if values.iter().any(|v| v.kind() != kind) {
        return Err(Diagnostic::new(
            DiagnosticCode::TypeMismatch,
            format!("expected {} value(s)", kind.name()),
            origin,
        ));
    }
    Ok(())
}

fn build_boolean_condition(property: TestedProperty, stmt: &sf::ConditionStmt, values: Vec<Primitive>) -> Result<Condition, Diagnostic> {
    if stmt.op.is_some() {
        return Err(Diagnostic::new(DiagnosticCode::TypeMismatch, "boolean conditions take no comparison operator", stmt.keyword_origin));
    }
    let value = match values.as_slice() {
        [] => true,
        [Primitive::Boolean(b)] => b.value,
        _ => return Err(Diagnostic::new(DiagnosticCode::WrongOperandCount, "expected zero or one boolean operand", stmt.origin)),
    };
    Ok(Condition::Boolean { property, value, origin: stmt.origin })
}

fn build_transfigured_gem_condition(stmt: &sf::ConditionStmt, values: Vec<Primitive>) -> Result<Condition, Diagnostic> {
    if values.is_empty() {
        return build_boolean_condition(TestedProperty::TransfiguredGem, stmt, values);
    }
    build_string_condition(TestedProperty::TransfiguredGem, stmt, values)
}

fn build_ordered_int_condition(property: TestedProperty, stmt: &sf::ConditionStmt, values: Vec<Primitive>) -> Result<Condition, Diagnostic> {
    expect_single_kind(&values, PrimitiveKind::Integer, stmt.origin)?;
    let ints: Vec<Spanned<i32>> = values
        .into_iter()
        .map(|v| match v {
            Primitive::Integer(i) => i,
            _ => unreachable!(),
        })
        .collect();

    match stmt.op {
        Some(Operator::Less) | Some(Operator::LessEqual) | Some(Operator::Greater) | Some(Operator::GreaterEqual) => {
            let op = stmt.op.unwrap();
            if ints.len() != 1 {
                return Err(Diagnostic::new(DiagnosticCode::WrongOperandCount, "a range bound takes exactly one value", stmt.origin));
            }
            let v = ints[0];
            let (lower, inclusive) = match op {
                Operator::Greater => (true, false),
                Operator::GreaterEqual => (true, true),
                Operator::Less => (false, false),
                Operator::LessEqual => (false, true),
                _ => unreachable!(),
            };
            let bound = RangeBound { value: OrderedValue::Integer(v.value), inclusive };
            Ok(if lower {
                Condition::LowerBound { property, bound, origin: stmt.origin }
            } else {
                Condition::UpperBound { property, bound, origin: stmt.origin }
            })
        }
        Some(Operator::ExactMatch) => Err(Diagnostic::new(
            DiagnosticCode::ExactMatchOnNonStringProperty,
            "'==' only applies to string conditions",
            stmt.keyword_origin,
        )),
        None | Some(Operator::Equal) | Some(Operator::NotEqual) => {
            if ints.is_empty() {
                return Err(Diagnostic::new(DiagnosticCode::WrongOperandCount, "expected at least one value", stmt.origin));
            }
            let allowed = stmt.op != Some(Operator::NotEqual);
            Ok(Condition::ValueList {
                property,
                allowed,
                values: ints.into_iter().map(|i| Spanned::new(ListValue::Integer(i.value), i.origin)).collect(),
                origin: stmt.origin,
            })
        }
    }
}

fn build_rarity_condition(stmt: &sf::ConditionStmt, values: Vec<Primitive>) -> Result<Condition, Diagnostic> {
    expect_single_kind(&values, PrimitiveKind::Rarity, stmt.origin)?;
    let rarities: Vec<Spanned<fs_model::enums::RarityTag>> = values
        .into_iter()
        .map(|v| match v {
            Primitive::Rarity(r) => r,
            _ => unreachable!(),
        })
        .collect();

    match stmt.op {
        Some(op @ (Operator::Less | Operator::LessEqual | Operator::Greater | Operator::GreaterEqual)) => {
            if rarities.len() != 1 {
                return Err(Diagnostic::new(DiagnosticCode::WrongOperandCount, "a rarity bound takes exactly one value", stmt.origin));
            }
            let v = rarities[0];
            let (lower, inclusive) = match op {
                Operator::Greater => (true, false),
                Operator::GreaterEqual => (true, true),
                Operator::Less => (false, false),
                Operator::LessEqual => (false, true),
                _ => unreachable!(),
            };
            let bound = RangeBound { value: OrderedValue::Rarity(v.value), inclusive };
            Ok(if lower {
                Condition::LowerBound { property: TestedProperty::Rarity, bound, origin: stmt.origin }
            } else {
                Condition::UpperBound { property: TestedProperty::Rarity, bound, origin: stmt.origin }
            })
        }
        Some(Operator::ExactMatch) => Err(Diagnostic::new(DiagnosticCode::ExactMatchOnNonStringProperty, "'==' only applies to string conditions", stmt.keyword_origin)),
        None | Some(Operator::Equal) | Some(Operator::NotEqual) => {
            if rarities.is_empty() {
                return Err(Diagnostic::new(DiagnosticCode::WrongOperandCount, "expected at least one rarity", stmt.origin));
            }
            let allowed = stmt.op != Some(Operator::NotEqual);
            Ok(Condition::ValueList {
                property: TestedProperty::Rarity,
                allowed,
                values: rarities.into_iter().map(|r| Spanned::new(ListValue::Rarity(r.value), r.origin)).collect(),
                origin: stmt.origin,
            })
        }
    }
}

fn build_alternate_quality_condition(stmt: &sf::ConditionStmt, values: Vec<Primitive>) -> Result<Condition, Diagnostic> {
    if !matches!(stmt.op, None | Some(Operator::Equal) | Some(Operator::NotEqual)) {
        return Err(Diagnostic::new(
            DiagnosticCode::TypeMismatch,
            "AlternateQuality has no natural order; only '=' and '!=' apply",
            stmt.keyword_origin,
        ));
    }
    expect_single_kind(&values, PrimitiveKind::GemQualityType, stmt.origin)?;
    if values.is_empty() {
        return Err(Diagnostic::new(DiagnosticCode::WrongOperandCount, "expected at least one gem quality type", stmt.origin));
    }
    let allowed = stmt.op != Some(Operator::NotEqual);
    let listed = values
        .into_iter()
        .map(|v| match v {
            Primitive::GemQualityType(q) => Spanned::new(ListValue::GemQualityType(q.value), q.origin),
            _ => unreachable!(),
        })
        .collect();
    Ok(Condition::ValueList { property: TestedProperty::AlternateQuality, allowed, values: listed, origin: stmt.origin })
}

fn build_string_condition(property: TestedProperty, stmt: &sf::ConditionStmt, values: Vec<Primitive>) -> Result<Condition, Diagnostic> {
    expect_single_kind(&values, PrimitiveKind::String, stmt.origin)?;
    if values.is_empty() {
        return Err(Diagnostic::new(DiagnosticCode::WrongOperandCount, "expected at least one string", stmt.origin));
    }
    let strings = values
        .into_iter()
        .map(|v| match v {
            Primitive::String(s) => s,
            _ => unreachable!(),
        })
        .collect();
    let (mode, negate) = match stmt.op {
        None | Some(Operator::Equal) => (StringMatchMode::Substring, false),
        Some(Operator::ExactMatch) => (StringMatchMode::Exact, false),
        Some(Operator::NotEqual) => (StringMatchMode::Substring, true),
        Some(_) => return Err(Diagnostic::new(DiagnosticCode::TypeMismatch, "string conditions accept only '=', '==', or '!='", stmt.keyword_origin)),
    };
    Ok(Condition::StringMatch { property, mode, negate, values: strings, origin: stmt.origin })
}

fn build_counted_string_condition(stmt: &sf::ConditionStmt, values: Vec<Primitive>) -> Result<Condition, Diagnostic> {
    let mut count = None;
    let mut names = Vec::new();
    for v in values {
        match v {
            Primitive::Integer(i) if count.is_none() && names.is_empty() => count = Some(i),
            Primitive::String(s) => names.push(s),
            other => {
                return Err(Diagnostic::new(
                    DiagnosticCode::TypeMismatch,
                    "expected an optional leading count followed by strings",
                    other.origin(),
                ))
            }
        }
    }
    if names.is_empty() {
        return Err(Diagnostic::new(DiagnosticCode::WrongOperandCount, "expected at least one mod name", stmt.origin));
    }
    let op = match stmt.op {
        None => ComparisonOp::GreaterEqual,
        Some(Operator::Less) => ComparisonOp::Less,
        Some(Operator::LessEqual) => ComparisonOp::LessEqual,
        Some(Operator::Greater) => ComparisonOp::Greater,
        Some(Operator::GreaterEqual) => ComparisonOp::GreaterEqual,
        Some(Operator::Equal) => ComparisonOp::Equal,
        Some(Operator::NotEqual) => {
            return Err(Diagnostic::new(
                DiagnosticCode::ExactMatchOnNonStringProperty,
                "'!=' on HasExplicitMod is rejected: the game client's own implementation of it is buggy",
                stmt.keyword_origin,
            ))
        }
        Some(Operator::ExactMatch) => {
            return Err(Diagnostic::new(DiagnosticCode::ExactMatchOnNonStringProperty, "'==' is not valid on HasExplicitMod", stmt.keyword_origin))
        }
    };
    Ok(Condition::CountedString { property: TestedProperty::HasExplicitMod, op, count, names, origin: stmt.origin })
}

fn build_influence_condition(stmt: &sf::ConditionStmt, values: Vec<Primitive>) -> Result<Condition, Diagnostic> {
    let exact = stmt.op == Some(Operator::ExactMatch);
    if !matches!(stmt.op, None | Some(Operator::Equal) | Some(Operator::ExactMatch)) {
        return Err(Diagnostic::new(DiagnosticCode::TypeMismatch, "HasInfluence accepts only '=' or '=='", stmt.keyword_origin));
    }
    if values.is_empty() {
        return Err(Diagnostic::new(DiagnosticCode::WrongOperandCount, "expected at least one influence, or 'None'", stmt.origin));
    }
    let mut spec = InfluenceSpec::default();
    for v in values {
        match v {
            Primitive::Influence(tag) => match tag.value {
                fs_model::enums::InfluenceTag::Shaper => spec.shaper = true,
                fs_model::enums::InfluenceTag::Elder => spec.elder = true,
                fs_model::enums::InfluenceTag::Crusader => spec.crusader = true,
                fs_model::enums::InfluenceTag::Redeemer => spec.redeemer = true,
                fs_model::enums::InfluenceTag::Hunter => spec.hunter = true,
                fs_model::enums::InfluenceTag::Warlord => spec.warlord = true,
            },
            Primitive::Boolean(_) => return Err(Diagnostic::new(DiagnosticCode::TypeMismatch, "expected an influence name or 'None'", stmt.origin)),
            other => return Err(Diagnostic::new(DiagnosticCode::TypeMismatch, "expected an influence name", other.origin())),
        }
    }
    Ok(Condition::HasInfluence { exact, spec, origin: stmt.origin })
}

fn build_sockets_condition(property: TestedProperty, stmt: &sf::ConditionStmt, values: Vec<Primitive>) -> Result<Condition, Diagnostic> {
    let op = match stmt.op {
        None => ComparisonOp::Equal,
        Some(Operator::Less) => ComparisonOp::Less,
        Some(Operator::LessEqual) => ComparisonOp::LessEqual,
        Some(Operator::Greater) => ComparisonOp::Greater,
        Some(Operator::GreaterEqual) => ComparisonOp::GreaterEqual,
        Some(Operator::Equal) => ComparisonOp::Equal,
        Some(Operator::NotEqual) => ComparisonOp::NotEqual,
        Some(Operator::ExactMatch) => {
            return Err(Diagnostic::new(DiagnosticCode::ExactMatchOnNonStringProperty, "'==' is not valid on socket conditions", stmt.keyword_origin))
        }
    };

    let mut spec = SocketSpecValue::default();
    for v in values {
        match v {
            Primitive::Integer(i) if spec.num.is_none() => spec.num = Some(i.value),
            Primitive::SocketColor(c) => match c.value {
                fs_model::enums::SocketColorTag::R => spec.r += 1,
                fs_model::enums::SocketColorTag::G => spec.g += 1,
                fs_model::enums::SocketColorTag::B => spec.b += 1,
                fs_model::enums::SocketColorTag::W => spec.w += 1,
                fs_model::enums::SocketColorTag::A => spec.a += 1,
                fs_model::enums::SocketColorTag::D => spec.d += 1,
            },
            other => {
                return Err(Diagnostic::new(
                    DiagnosticCode::TypeMismatch,
                    "expected an optional leading socket count followed by color letters",
                    other.origin(),
                ))
            }
        }
    }
    if !spec.is_valid() {
        return Err(Diagnostic::new(DiagnosticCode::InvalidSocketSpec, "socket specification is empty or inconsistent", stmt.origin));
    }
    Ok(Condition::Sockets { group_matters: property == TestedProperty::SocketGroup, op, spec, origin: stmt.origin })
}

type ActionApplier = Box<dyn FnOnce(&mut ActionSet)>;

fn build_action(stmt: &sf::ActionStmt, symbols: &SymbolTable) -> Result<ActionApplier, Diagnostic> {
    let values = evaluate_operand_list(&stmt.operands, symbols)?;
    match stmt.keyword.as_str() {
        "SetBorderColor" => {
            let color = build_color(&values, stmt.origin)?;
            Ok(Box::new(move |a| a.border_color = Some(color)))
        }
        "SetTextColor" => {
            let color = build_color(&values, stmt.origin)?;
            Ok(Box::new(move |a| a.text_color = Some(color)))
        }
        "SetBackgroundColor" => {
            let color = build_color(&values, stmt.origin)?;
            Ok(Box::new(move |a| a.background_color = Some(color)))
        }
        "SetFontSize" => {
            let size = expect_one_integer(&values, stmt.origin)?;
            Ok(Box::new(move |a| a.font_size = Some(Spanned::new(size.value.clamp(0, 255) as u8, size.origin))))
        }
        "PlayAlertSound" | "PlayAlertSoundPositional" => {
            let positioning = if stmt.keyword == "PlayAlertSoundPositional" {
                AlertSoundPositioning::Positional
            } else {
                AlertSoundPositioning::Normal
            };
            let sound = build_alert_sound(&values, stmt.origin)?;
            Ok(Box::new(move |a| a.alert_sound = Some(AlertSoundAction { sound, positioning })))
        }
        "DisableDropSound" => {
            let value = match values.as_slice() {
                [] => true,
                [Primitive::Boolean(b)] => b.value,
                _ => return Err(Diagnostic::new(DiagnosticCode::WrongOperandCount, "expected zero or one boolean operand", stmt.origin)),
            };
            let origin = stmt.origin;
            Ok(Box::new(move |a| a.disable_drop_sound = Some(Spanned::new(value, origin))))
        }
        "MinimapIcon" => {
            let icon = build_minimap_icon(&values, stmt.origin)?;
            Ok(Box::new(move |a| a.minimap_icon = Some(icon)))
        }
        "PlayEffect" => {
            let effect = build_beam_effect(&values, stmt.origin)?;
            Ok(Box::new(move |a| a.beam_effect = Some(effect)))
        }
        other => Err(Diagnostic::new(DiagnosticCode::UnknownKeyword, format!("'{other}' is not a known action"), stmt.keyword_origin)),
    }
}

fn expect_one_integer(values: &[Primitive], origin: Span) -> Result<Spanned<i32>, Diagnostic> {
    match values {
        [Primitive::Integer(i)] => Ok(*i),
        _ => Err(Diagnostic::new(DiagnosticCode::WrongOperandCount, "expected exactly one integer", origin)),
    }
}

fn build_color(values: &[Primitive], origin: Span) -> Result<Color, Diagnostic> {
    let ints: Vec<i32> = values
        .iter()
        .map(|v| match v {
            Primitive::Integer(i) => Ok(i.value),
            _ => Err(Diagnostic::new(DiagnosticCode::NoMatchingConstructor, "a color is 3 or 4 integers in [0, 255]", origin)),
        })
        .collect::<Result<_, _>>()?;
    let clamp = |v: i32| v.clamp(0, 255) as u8;
    match ints.as_slice() {
        [r, g, b] => Ok(Color { r: clamp(*r), g: clamp(*g), b: clamp(*b), a: None, origin }),
        [r, g, b, a] => Ok(Color { r: clamp(*r), g: clamp(*g), b: clamp(*b), a: Some(clamp(*a)), origin }),
        _ => Err(Diagnostic::new(DiagnosticCode::NoMatchingConstructor, "a color is 3 or 4 integers in [0, 255]", origin)),
    }
}

fn build_alert_sound(values: &[Primitive], origin: Span) -> Result<fs_model::primitive::AlertSound, Diagnostic> {
    let mut kind = None;
    let mut volume = None;
    for v in values {
        match v {
            Primitive::Integer(i) if kind.is_none() => kind = Some(AlertSoundKind::BuiltinId(Spanned::new(i.value.max(0) as u16, i.origin))),
            Primitive::Integer(i) if kind.is_some() && volume.is_none() => volume = Some(Spanned::new(i.value.clamp(0, 300) as u8, i.origin)),
            Primitive::String(s) if kind.is_none() => kind = Some(AlertSoundKind::CustomPath(s.clone())),
            Primitive::AlertSound(a) if kind.is_none() => {
                kind = Some(a.kind.clone());
                volume = a.volume;
            }
            other => return Err(Diagnostic::new(DiagnosticCode::NoMatchingConstructor, "unexpected alert sound operand", other.origin())),
        }
    }
    let kind = kind.ok_or_else(|| Diagnostic::new(DiagnosticCode::WrongOperandCount, "expected a sound id, voice line, or file path", origin))?;
    Ok(fs_model::primitive::AlertSound { kind, volume, origin })
}

fn build_minimap_icon(values: &[Primitive], origin: Span) -> Result<MinimapIcon, Diagnostic> {
    match values {
        [Primitive::Integer(size), Primitive::Suit(suit), Primitive::Shape(shape)] => Ok(MinimapIcon {
            size: size.value.clamp(0, 2) as u8,
            suit: suit.value,
            shape: shape.value,
            origin,
        }),
        _ => Err(Diagnostic::new(DiagnosticCode::NoMatchingConstructor, "expected <size> <suit> <shape>", origin)),
    }
}

fn build_beam_effect(values: &[Primitive], origin: Span) -> Result<BeamEffect, Diagnostic> {
    match values {
        [Primitive::Suit(suit)] => Ok(BeamEffect { suit: suit.value, temporary: false, origin }),
        [Primitive::Suit(suit), Primitive::Boolean(temp)] => Ok(BeamEffect { suit: suit.value, temporary: temp.value, origin }),
        _ => Err(Diagnostic::new(DiagnosticCode::NoMatchingConstructor, "expected <suit> [temporary]", origin)),
    }
}

/// Lowers one already-parsed RF block into a flat block, sharing
/// [`build_condition`]/[`build_action`] with the SF path instead of
/// duplicating constructor-shape matching. RF statements never contain a
/// `$name` reference, so the symbol table passed through is always empty.
pub fn lower_rf_block(block: &fs_syntax::rf::Block, diagnostics: &mut DiagnosticBag) -> Option<ItemFilterBlock> {
    let symbols = SymbolTable::new();
    let visibility = match block.visibility {
        sf::RawVisibility::Show => Visibility::Show,
        sf::RawVisibility::Hide => Visibility::Hide,
        sf::RawVisibility::Minimal => Visibility::Minimal,
    };
    let mut flat = ItemFilterBlock::new(visibility, block.origin);
    flat.continue_ = block.continue_;

    for statement in &block.statements {
        match statement {
            sf::Statement::Condition(stmt) => match build_condition(stmt, &symbols) {
                Ok(condition) => flat.conditions.push(condition),
                Err(d) => diagnostics.push(d),
            },
            sf::Statement::Action(stmt) => match build_action(stmt, &symbols) {
                Ok(apply) => apply(&mut flat.actions),
                Err(d) => diagnostics.push(d),
            },
            sf::Statement::Autogenerate(stmt) => {
                diagnostics.push(Diagnostic::new(
                    DiagnosticCode::UnknownKeyword,
                    "Autogenerate is not valid in the native filter format",
                    stmt.origin,
                ));
            }
            sf::Statement::Expand(stmt) => {
                diagnostics.push(Diagnostic::new(DiagnosticCode::UnknownKeyword, "Expand is not valid in the native filter format", stmt.origin));
            }
            sf::Statement::Import(stmt) => {
                diagnostics.push(Diagnostic::new(DiagnosticCode::UnknownKeyword, "Import is not valid in the native filter format", stmt.origin));
            }
        }
    }

    if flat.is_valid() {
        Some(flat)
    } else {
        diagnostics.push(Diagnostic::new(DiagnosticCode::EmptyValueList, "block has an empty or invalid condition and was dropped", block.origin));
        None
    }
}

/// Lowers a whole parsed RF document straight to a flat filter, the
/// "parallel read path" for filters the game client already wrote: no
/// evaluator or symbol resolution is meaningfully exercised since RF has no
/// constants or references.
pub fn lower_rf_document(doc: &fs_syntax::rf::Document) -> (fs_model::block::FlatFilter, DiagnosticBag) {
    let mut diagnostics = DiagnosticBag::new();
    let mut out = fs_model::block::FlatFilter::new();
    for block in &doc.blocks {
        if let Some(flat) = lower_rf_block(block, &mut diagnostics) {
            out.push(flat);
        }
    }
    (out, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fs_syntax::sf::parse_document;

    fn compile_source(src: &str) -> (CompiledSpiritFilter, DiagnosticBag) {
        let doc = parse_document(src).unwrap();
        compile(&doc, &CompileOptions::default())
    }

    #[test]
    fn simple_block_compiles_without_diagnostics() {
        let (filter, diagnostics) = compile_source(
            r#"
            Show {
                BaseType == "Chaos Orb"
                SetFontSize 45
            }
            "#,
        );
        assert!(diagnostics.into_vec().is_empty());
        assert_eq!(filter.blocks.len(), 1);
    }

    #[test]
    fn nested_block_inherits_parent_conditions_and_actions() {
        let (filter, diagnostics) = compile_source(
            r#"
            Show {
                Rarity == Rare
                SetTextColor 255 255 255
                Show {
                    ItemLevel >= 80
                }
            }
            "#,
        );
        assert!(diagnostics.into_vec().is_empty());
        assert_eq!(filter.blocks.len(), 2);
        let CompiledBlock::Flat(child) = &filter.blocks[1] else { panic!("expected a flat block") };
        assert_eq!(child.conditions.conditions.len(), 2);
        assert!(child.actions.text_color.is_some());
    }

    #[test]
    fn container_block_with_no_own_conditions_does_not_emit_its_own_entry() {
        let (filter, _) = compile_source(
            r#"
            Show {
                SetTextColor 1 2 3
                Show {
                    ItemLevel >= 1
                }
            }
            "#,
        );
        assert_eq!(filter.blocks.len(), 1);
    }

    #[test]
    fn constant_reference_resolves_through_compilation() {
        let (filter, diagnostics) = compile_source("$lvl = 80\nShow { ItemLevel >= $lvl }");
        assert!(diagnostics.into_vec().is_empty());
        assert_eq!(filter.blocks.len(), 1);
    }

    #[test]
    fn ruthless_mode_swaps_hide_for_minimal_and_warns() {
        let doc = parse_document(r#"Hide { ItemLevel >= 1 }"#).unwrap();
        let (filter, diagnostics) = compile(&doc, &CompileOptions { ruthless_mode: true });
        let CompiledBlock::Flat(block) = &filter.blocks[0] else { panic!() };
        assert_eq!(block.visibility, Visibility::Minimal);
        assert!(diagnostics.into_vec().iter().any(|d| d.code == DiagnosticCode::RuthlessModeVisibilitySwap));
    }

    #[test]
    fn non_ruthless_mode_leaves_hide_untouched() {
        let doc = parse_document(r#"Hide { ItemLevel >= 1 }"#).unwrap();
        let (filter, diagnostics) = compile(&doc, &CompileOptions::default());
        let CompiledBlock::Flat(block) = &filter.blocks[0] else { panic!() };
        assert_eq!(block.visibility, Visibility::Hide);
        assert!(diagnostics.into_vec().is_empty());
    }

    #[test]
    fn autogenerate_produces_an_autogen_block_not_a_flat_block() {
        let (filter, diagnostics) = compile_source(
            r#"
            Show {
                Autogenerate StackableCurrency Price(5, 300)
            }
            "#,
        );
        assert!(diagnostics.into_vec().is_empty());
        assert_eq!(filter.blocks.len(), 1);
        assert!(matches!(filter.blocks[0], CompiledBlock::Autogenerate(_)));
    }

    #[test]
    fn sockets_condition_parses_count_and_colors() {
        let (filter, diagnostics) = compile_source(r#"Show { Sockets >= 5 R G B }"#);
        assert!(diagnostics.into_vec().is_empty());
        let CompiledBlock::Flat(block) = &filter.blocks[0] else { panic!() };
        match &block.conditions.conditions[0] {
            Condition::Sockets { spec, .. } => {
                assert_eq!(spec.num, Some(5));
                assert_eq!(spec.r, 1);
            }
            other => panic!("expected a sockets condition, got {other:?}"),
        }
    }

    #[test]
    fn unknown_keyword_is_a_diagnostic() {
        let (_, diagnostics) = compile_source(r#"Show { Frobnicate 1 }"#);
        assert!(diagnostics.into_vec().iter().any(|d| d.code == DiagnosticCode::UnknownKeyword));
    }

    #[test]
    fn multi_value_constant_splices_into_an_action() {
        let (filter, diagnostics) = compile_source("$col = 100 200 50\nShow { SetTextColor $col }");
        assert!(diagnostics.into_vec().is_empty());
        let CompiledBlock::Flat(block) = &filter.blocks[0] else { panic!() };
        let color = block.actions.text_color.unwrap();
        assert_eq!((color.r, color.g, color.b), (100, 200, 50));
    }

    #[test]
    fn expand_splices_a_block_tree_into_its_use_site() {
        let (filter, diagnostics) = compile_source(
            r#"
            $shared = {
                ItemLevel >= 80
                SetFontSize 45
            }
            Show {
                Expand $shared
            }
            "#,
        );
        assert!(diagnostics.into_vec().is_empty());
        let CompiledBlock::Flat(block) = &filter.blocks[0] else { panic!() };
        assert_eq!(block.conditions.conditions.len(), 1);
        assert!(block.actions.font_size.is_some());
    }

    #[test]
    fn expand_of_an_undefined_name_is_a_diagnostic() {
        let (_, diagnostics) = compile_source("Show { Expand $missing }");
        assert!(diagnostics.into_vec().iter().any(|d| d.code == DiagnosticCode::UndefinedReference));
    }

    #[test]
    fn errors_inside_an_expansion_carry_a_note_naming_the_expansion_site() {
        let (_, diagnostics) = compile_source(
            r#"
            $shared = {
                Frobnicate 1
            }
            Show {
                Expand $shared
            }
            "#,
        );
        let diagnostics = diagnostics.into_vec();
        let err = diagnostics.iter().find(|d| d.code == DiagnosticCode::UnknownKeyword).unwrap();
        assert!(err.notes.iter().any(|(note, _)| note.contains("expanding")));
    }

    #[test]
    fn import_statement_produces_a_compiled_import_marker() {
        let (filter, diagnostics) = compile_source(r#"Show { Import "shared.filter" ItemLevel >= 1 }"#);
        assert!(diagnostics.into_vec().is_empty());
        assert!(filter.blocks.iter().any(|b| matches!(b, CompiledBlock::Import { path, .. } if path == "shared.filter")));
    }

    #[test]
    fn top_level_import_statement_produces_a_compiled_import_marker() {
        let (filter, diagnostics) = compile_source(r#"Import "shared.filter" Show { ItemLevel >= 1 }"#);
        assert!(diagnostics.into_vec().is_empty());
        assert!(filter.blocks.iter().any(|b| matches!(b, CompiledBlock::Import { path, .. } if path == "shared.filter")));
    }

    #[test]
    fn price_outside_autogenerate_is_a_diagnostic() {
        let (_, diagnostics) = compile_source(r#"Show { Price >= 5 ItemLevel >= 1 }"#);
        assert!(diagnostics.into_vec().iter().any(|d| d.code == DiagnosticCode::PriceWithoutAutogenerate));
    }
}
