//! Bit-shaped output: turns a flat filter into the text the game client
//! reads, and reads that same text back via [`fs_syntax::rf`] for round-trip
//! verification and for loading filters the client itself already wrote.
//!
//! The serializer always writes an explicit comparison operator rather than
//! eliding the implicit `=` the way a hand-authored filter often does; the
//! output is valid and loads identically, it just isn't a byte-for-byte copy
//! of what a human would type. See `DESIGN.md`.

use fs_compile::compiler::lower_rf_document;
use fs_compile::{Diagnostic, DiagnosticBag};
use fs_model::block::{FlatFilter, ItemFilterBlock, Visibility};
use fs_model::condition::{Condition, ComparisonOp, ListValue, OrderedValue, RangeBound, TestedProperty};
use fs_model::primitive::{AlertSoundKind, Color};
use fs_model::ActionSet;

/// Optional metadata written as a `#`-prefixed comment header before the
/// first block, the way a generated filter identifies itself.
#[derive(Debug, Clone, Default)]
pub struct Preamble {
    pub generator_version: Option<String>,
    pub generated_at: Option<String>,
    pub price_data_downloaded_at: Option<String>,
    pub price_data_source: Option<String>,
    pub league: Option<String>,
    pub attribution: Vec<String>,
}

impl Preamble {
    fn render(&self) -> String {
        let mut lines = Vec::new();
        if let Some(v) = &self.generator_version {
            lines.push(format!("# Generated by Filter Spirit {v}"));
        }
        if let Some(d) = &self.generated_at {
            lines.push(format!("# Generation date: {d}"));
        }
        if let Some(d) = &self.price_data_downloaded_at {
            lines.push(format!("# Price data downloaded: {d}"));
        }
        if let Some(s) = &self.price_data_source {
            lines.push(format!("# Price data source: {s}"));
        }
        if let Some(l) = &self.league {
            lines.push(format!("# League: {l}"));
        }
        for line in &self.attribution {
            lines.push(format!("# {line}"));
        }
        lines.join("\n")
    }
}

/// Serializes `filter` into the native filter format, with an optional
/// comment preamble. Import markers have no native-format equivalent, so
/// they're written as `# Import "path"` comment lines at the position they
/// occupied; re-parsing the result drops them like any other comment.
pub fn serialize(filter: &FlatFilter, preamble: Option<&Preamble>) -> String {
    let mut out = String::new();

    if let Some(preamble) = preamble {
        let rendered = preamble.render();
        if !rendered.is_empty() {
            out.push_str(&rendered);
            out.push_str("\n\n");
        }
    }

    let mut segments: Vec<String> = Vec::new();
    for index in 0..=filter.entries.len() {
        for marker in filter.imports.iter().filter(|m| m.position == index) {
            segments.push(format!("# Import {}", quote(&marker.path)));
        }
        if let Some(block) = filter.entries.get(index) {
            segments.push(serialize_block(block));
        }
    }
    out.push_str(&segments.join("\n\n"));
    if !segments.is_empty() {
        out.push('\n');
    }
    out
}

fn serialize_block(block: &ItemFilterBlock) -> String {
    let mut lines = Vec::new();
    lines.push(match block.visibility {
        Visibility::Show => "Show".to_string(),
        Visibility::Hide => "Hide".to_string(),
        Visibility::Minimal => "Minimal".to_string(),
    });

    for condition in &block.conditions.conditions {
        lines.push(format!("\t{}", serialize_condition(condition)));
    }

    for line in serialize_actions(&block.actions) {
        lines.push(format!("\t{line}"));
    }

    if block.continue_ {
        lines.push("\tContinue".to_string());
    }

    lines.join("\n")
}

fn bool_token(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn op_token(op: ComparisonOp) -> &'static str {
    match op {
        ComparisonOp::Less => "<",
        ComparisonOp::LessEqual => "<=",
        ComparisonOp::Equal => "=",
        ComparisonOp::ExactMatch => "==",
        ComparisonOp::Greater => ">",
        ComparisonOp::GreaterEqual => ">=",
        ComparisonOp::NotEqual => "!=",
    }
}

fn ordered_value_token(value: OrderedValue) -> String {
    match value {
        OrderedValue::Integer(i) => i.to_string(),
        OrderedValue::Fractional(f) => f.to_string(),
        OrderedValue::Rarity(r) => r.name().to_string(),
    }
}

fn list_value_token(value: ListValue) -> String {
    match value {
        ListValue::Integer(i) => i.to_string(),
        ListValue::Rarity(r) => r.name().to_string(),
        ListValue::GemQualityType(g) => g.name().to_string(),
    }
}

fn property_keyword(property: TestedProperty) -> &'static str {
    use TestedProperty::*;
    match property {
        Rarity => "Rarity",
        ItemLevel => "ItemLevel",
        DropLevel => "DropLevel",
        Quality => "Quality",
        Sockets => "Sockets",
        SocketGroup => "SocketGroup",
        LinkedSockets => "LinkedSockets",
        Width => "Width",
        Height => "Height",
        StackSize => "StackSize",
        GemLevel => "GemLevel",
        MapTier => "MapTier",
        CorruptedMods => "CorruptedMods",
        EnchantmentPassiveNum => "EnchantmentPassiveNum",
        BaseArmour => "BaseArmour",
        BaseEvasion => "BaseEvasion",
        BaseEnergyShield => "BaseEnergyShield",
        BaseWard => "BaseWard",
        BaseDefencePercentile => "BaseDefencePercentile",
        MemoryStrands => "MemoryStrands",
        AreaLevel => "AreaLevel",
        HasSearingExarchImplicit => "HasSearingExarchImplicit",
        HasEaterOfWorldsImplicit => "HasEaterOfWorldsImplicit",
        Class => "Class",
        BaseType => "BaseType",
        HasExplicitMod => "HasExplicitMod",
        HasImplicitMod => "HasImplicitMod",
        HasEnchantment => "HasEnchantment",
        EnchantmentPassiveNode => "EnchantmentPassiveNode",
        ArchnemesisMod => "ArchnemesisMod",
        HasInfluence => "HasInfluence",
        TransfiguredGem => "TransfiguredGem",
        AlternateQuality => "AlternateQuality",
        Identified => "Identified",
        Corrupted => "Corrupted",
        Mirrored => "Mirrored",
        FracturedItem => "FracturedItem",
        SynthesisedItem => "SynthesisedItem",
        AnyEnchantment => "AnyEnchantment",
        ShapedMap => "ShapedMap",
        ElderMap => "ElderMap",
        BlightedMap => "BlightedMap",
        UberBlightedMap => "UberBlightedMap",
        Replica => "Replica",
        HasCruciblePassiveTree => "HasCruciblePassiveTree",
        ZanaMemory => "ZanaMemory",
        Scourged => "Scourged",
        ElderItem => "ElderItem",
        ShaperItem => "ShaperItem",
    }
}

fn quote(value: &str) -> String {
    format!("\"{value}\"")
}

fn socket_spec_token(spec: fs_model::SocketSpecValue) -> String {
    use fs_model::SocketColorTag::*;
    let mut token = String::new();
    if let Some(num) = spec.num {
        token.push_str(&num.to_string());
    }
    for (color, count) in [(R, spec.r), (G, spec.g), (B, spec.b), (W, spec.w), (A, spec.a), (D, spec.d)] {
        for _ in 0..count {
            token.push(color.letter());
        }
    }
    token
}

fn serialize_condition(condition: &Condition) -> String {
    let keyword = property_keyword(condition.property());
    match condition {
        Condition::Boolean { value, .. } => format!("{keyword} {}", bool_token(*value)),
        Condition::LowerBound { bound, .. } => {
            let op = if bound.inclusive { ComparisonOp::GreaterEqual } else { ComparisonOp::Greater };
            format!("{keyword} {} {}", op_token(op), ordered_value_token(bound.value))
        }
        Condition::UpperBound { bound, .. } => {
            let op = if bound.inclusive { ComparisonOp::LessEqual } else { ComparisonOp::Less };
            format!("{keyword} {} {}", op_token(op), ordered_value_token(bound.value))
        }
        Condition::ValueList { allowed, values, .. } => {
            let op = if *allowed { ComparisonOp::Equal } else { ComparisonOp::NotEqual };
            let operands: Vec<String> = values.iter().map(|v| list_value_token(v.value)).collect();
            format!("{keyword} {} {}", op_token(op), operands.join(" "))
        }
        Condition::StringMatch { mode, negate, values, .. } => {
            use fs_model::condition::StringMatchMode;
            let op = match (mode, negate) {
                (StringMatchMode::Exact, _) => ComparisonOp::ExactMatch,
                (StringMatchMode::Substring, true) => ComparisonOp::NotEqual,
                (StringMatchMode::Substring, false) => ComparisonOp::Equal,
            };
            let operands: Vec<String> = values.iter().map(|v| quote(&v.value)).collect();
            format!("{keyword} {} {}", op_token(op), operands.join(" "))
        }
        Condition::CountedString { op, count, names, .. } => {
            let mut operands = Vec::new();
            if let Some(count) = count {
                operands.push(count.value.to_string());
            }
            operands.extend(names.iter().map(|n| quote(&n.value)));
            format!("{keyword} {} {}", op_token(*op), operands.join(" "))
        }
        Condition::HasInfluence { exact, spec, .. } => {
            let op = if *exact { ComparisonOp::ExactMatch } else { ComparisonOp::Equal };
            if spec.is_none() {
                format!("{keyword} {} None", op_token(op))
            } else {
                let names: Vec<&str> = spec.tags().into_iter().map(|t| t.name()).collect();
                format!("{keyword} {} {}", op_token(op), names.join(" "))
            }
        }
        Condition::Sockets { op, spec, .. } => format!("{keyword} {} {}", op_token(*op), socket_spec_token(*spec)),
    }
}

fn serialize_color(name: &str, color: Color) -> String {
    match color.a {
        Some(a) => format!("{name} {} {} {} {}", color.r, color.g, color.b, a),
        None => format!("{name} {} {} {}", color.r, color.g, color.b),
    }
}

fn serialize_actions(actions: &ActionSet) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(c) = actions.border_color {
        out.push(serialize_color("SetBorderColor", c));
    }
    if let Some(c) = actions.text_color {
        out.push(serialize_color("SetTextColor", c));
    }
    if let Some(c) = actions.background_color {
        out.push(serialize_color("SetBackgroundColor", c));
    }
    if let Some(f) = actions.font_size {
        out.push(format!("SetFontSize {}", f.value));
    }
    if let Some(alert) = &actions.alert_sound {
        let keyword = match alert.positioning {
            fs_model::action::AlertSoundPositioning::Normal => "PlayAlertSound",
            fs_model::action::AlertSoundPositioning::Positional => "PlayAlertSoundPositional",
        };
        let mut operands = match &alert.sound.kind {
            AlertSoundKind::BuiltinId(id) => vec![id.value.to_string()],
            AlertSoundKind::ShaperVoiceLine(tag) => vec![tag.value.name().to_string()],
            AlertSoundKind::CustomPath(path) => vec![quote(&path.value)],
        };
        if let Some(volume) = alert.sound.volume {
            operands.push(volume.value.to_string());
        }
        out.push(format!("{keyword} {}", operands.join(" ")));
    }
    if let Some(disable) = actions.disable_drop_sound {
        out.push(format!("DisableDropSound {}", bool_token(disable.value)));
    }
    if let Some(icon) = actions.minimap_icon {
        out.push(format!("MinimapIcon {} {} {}", icon.size, icon.suit.name(), icon.shape.name()));
    }
    if let Some(beam) = actions.beam_effect {
        if beam.temporary {
            out.push(format!("PlayEffect {} Temp", beam.suit.name()));
        } else {
            out.push(format!("PlayEffect {}", beam.suit.name()));
        }
    }
    out
}

/// Parses already-written native filter text back into a flat filter,
/// bypassing the spirit-filter compiler entirely (RF has no constants or
/// nesting to resolve).
pub fn parse(source: &str) -> Result<(FlatFilter, DiagnosticBag), Diagnostic> {
    let doc = fs_syntax::rf::parse_document(source)?;
    Ok(lower_rf_document(&doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fs_base::Span;
    use fs_model::condition::{RangeBound, StringMatchMode};
    use fs_model::primitive::{FontSize, FsString};

    fn span() -> Span {
        Span::new(0, 1)
    }

    #[test]
    fn serializes_a_minimal_show_block() {
        let mut block = ItemFilterBlock::new(Visibility::Show, span());
        block.conditions.push(Condition::StringMatch {
            property: TestedProperty::BaseType,
            mode: StringMatchMode::Exact,
            negate: false,
            values: vec![FsString::new("Chaos Orb", span())],
            origin: span(),
        });
        block.actions.font_size = Some(FontSize::new(45, span()));

        let mut filter = FlatFilter::new();
        filter.push(block);

        let text = serialize(&filter, None);
        assert!(text.starts_with("Show\n\tBaseType == \"Chaos Orb\"\n\tSetFontSize 45"));
    }

    #[test]
    fn continue_is_written_as_its_own_trailing_line() {
        let mut block = ItemFilterBlock::new(Visibility::Hide, span());
        block.continue_ = true;
        let mut filter = FlatFilter::new();
        filter.push(block);
        let text = serialize(&filter, None);
        assert_eq!(text, "Hide\n\tContinue\n");
    }

    #[test]
    fn lower_bound_uses_strict_or_inclusive_operator() {
        let mut block = ItemFilterBlock::new(Visibility::Show, span());
        block.conditions.push(Condition::LowerBound {
            property: TestedProperty::ItemLevel,
            bound: RangeBound { value: OrderedValue::Integer(70), inclusive: true },
            origin: span(),
        });
        let mut filter = FlatFilter::new();
        filter.push(block);
        assert!(serialize(&filter, None).contains("ItemLevel >= 70"));
    }

    #[test]
    fn preamble_is_rendered_as_comment_lines_before_the_first_block() {
        let preamble = Preamble { league: Some("Standard".into()), ..Default::default() };
        let filter = FlatFilter::new();
        let text = serialize(&filter, Some(&preamble));
        assert!(text.starts_with("# League: Standard"));
    }

    #[test]
    fn minimal_visibility_round_trips_through_parse() {
        let mut block = ItemFilterBlock::new(Visibility::Minimal, span());
        block.conditions.push(Condition::Boolean { property: TestedProperty::Identified, value: true, origin: span() });
        let mut filter = FlatFilter::new();
        filter.push(block);

        let text = serialize(&filter, None);
        assert!(text.starts_with("Minimal\n"));
        let (parsed, diagnostics) = parse(&text).unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(parsed.entries[0].visibility, Visibility::Minimal);
    }

    #[test]
    fn import_marker_is_written_as_a_comment_line_at_its_position() {
        let mut filter = FlatFilter::new();
        filter.push_import("shared.filter".into(), span());
        filter.push(ItemFilterBlock::new(Visibility::Show, span()));

        let text = serialize(&filter, None);
        assert!(text.starts_with("# Import \"shared.filter\"\n\nShow"));
    }

    #[test]
    fn import_marker_vanishes_harmlessly_on_round_trip() {
        let mut filter = FlatFilter::new();
        filter.push(ItemFilterBlock::new(Visibility::Show, span()));
        filter.push_import("shared.filter".into(), span());
        filter.push(ItemFilterBlock::new(Visibility::Hide, span()));

        let text = serialize(&filter, None);
        let (parsed, diagnostics) = parse(&text).unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(parsed.len(), 2);
        assert!(parsed.imports.is_empty());
    }

    #[test]
    fn round_trips_through_parse() {
        let mut block = ItemFilterBlock::new(Visibility::Show, span());
        block.conditions.push(Condition::Boolean { property: TestedProperty::Identified, value: true, origin: span() });
        let mut filter = FlatFilter::new();
        filter.push(block);

        let text = serialize(&filter, None);
        let (parsed, diagnostics) = parse(&text).unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.entries[0].visibility, Visibility::Show);
    }
}
