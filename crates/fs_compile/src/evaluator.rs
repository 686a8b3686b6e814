//! Turns spirit-filter expressions into primitive values. Each expression
//! evaluates independently to one [`Primitive`]; grouping a statement's
//! evaluated primitives into a compound value (a `Color` from three
//! integers, a `SocketSpec` from a count and some color letters) is the
//! compiler's job, since the right grouping depends on which keyword the
//! operands belong to.

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::symbol_table::SymbolTable;
use fs_model::enums::{GemQualityTypeTag, InfluenceTag, RarityTag, ShapeTag, ShaperVoiceLineTag, SocketColorTag, SuitTag};
use fs_model::object::NamedObject;
use fs_model::primitive::{Boolean, FsString, Integer};
use fs_model::{Object, Primitive, Spanned};
use fs_syntax::sf::ast::Expr;

/// Evaluates one expression to a primitive. A `$name` reference to an array
/// is rejected here; callers that accept arrays should use
/// [`evaluate_operand_list`] instead, which splices a referenced array
/// in place.
pub fn evaluate_expr(expr: &Expr, symbols: &SymbolTable) -> Result<Primitive, Diagnostic> {
    match expr {
        Expr::Integer(v, origin) => Ok(Primitive::Integer(Integer::new(*v as i32, *origin))),
        Expr::Fractional(v, origin) => Ok(Primitive::Fractional(Spanned::new(*v, *origin))),
        Expr::String(v, origin) => Ok(Primitive::String(FsString::new(v.clone(), *origin))),
        Expr::Identifier(word, origin) => resolve_literal_word(word, *origin),
        Expr::Reference(name, origin) => resolve_scalar_reference(name, *origin, symbols),
    }
}

fn resolve_scalar_reference(name: &str, origin: fs_base::Span, symbols: &SymbolTable) -> Result<Primitive, Diagnostic> {
    let bound = lookup(name, origin, symbols)?;
    match &bound.object {
        Object::Scalar(p) => Ok(p.clone().with_origin(origin)),
        Object::Array { .. } => Err(Diagnostic::new(
            DiagnosticCode::TypeMismatch,
            format!("'${name}' is a list and cannot be used as a single value here"),
            origin,
        )),
    }
}

fn lookup<'a>(name: &str, origin: fs_base::Span, symbols: &'a SymbolTable) -> Result<&'a NamedObject, Diagnostic> {
    symbols
        .resolve(name)
        .ok_or_else(|| Diagnostic::new(DiagnosticCode::UndefinedReference, format!("'${name}' is not defined"), origin))
}

/// Evaluates a whole operand list, splicing any `$name` array reference into
/// the output in place (so `HasExplicitMod $mods "extra"` flattens the
/// bound list alongside the literal operand).
pub fn evaluate_operand_list(operands: &[Expr], symbols: &SymbolTable) -> Result<Vec<Primitive>, Diagnostic> {
    let mut out = Vec::with_capacity(operands.len());
    for expr in operands {
        match expr {
            Expr::Reference(name, origin) => {
                let bound = lookup(name, *origin, symbols)?;
                match &bound.object {
                    Object::Scalar(p) => out.push(p.clone().with_origin(*origin)),
                    Object::Array { elements, .. } => {
                        out.extend(elements.iter().cloned().map(|p| p.with_origin(*origin)));
                    }
                }
            }
            other => out.push(evaluate_expr(other, symbols)?),
        }
    }
    Ok(out)
}

fn word_eq(word: &str, name: &str) -> bool {
    word == name
}

fn resolve_literal_word(word: &str, origin: fs_base::Span) -> Result<Primitive, Diagnostic> {
    if word_eq(word, "True") {
        return Ok(Primitive::Boolean(Boolean::new(true, origin)));
    }
    if word_eq(word, "False") {
        return Ok(Primitive::Boolean(Boolean::new(false, origin)));
    }
    if let Some(rarity) = match word {
        "Normal" => Some(RarityTag::Normal),
        "Magic" => Some(RarityTag::Magic),
        "Rare" => Some(RarityTag::Rare),
        "Unique" => Some(RarityTag::Unique),
        _ => None,
    } {
        return Ok(Primitive::Rarity(Spanned::new(rarity, origin)));
    }
    if let Some(shape) = match word {
        "Circle" => Some(ShapeTag::Circle),
        "Diamond" => Some(ShapeTag::Diamond),
        "Hexagon" => Some(ShapeTag::Hexagon),
        "Square" => Some(ShapeTag::Square),
        "Star" => Some(ShapeTag::Star),
        "Triangle" => Some(ShapeTag::Triangle),
        "Cross" => Some(ShapeTag::Cross),
        "Moon" => Some(ShapeTag::Moon),
        "Raindrop" => Some(ShapeTag::Raindrop),
        "Kite" => Some(ShapeTag::Kite),
        "Pentagon" => Some(ShapeTag::Pentagon),
        "UpsideDownHouse" => Some(ShapeTag::UpsideDownHouse),
        _ => None,
    } {
        return Ok(Primitive::Shape(Spanned::new(shape, origin)));
    }
    if let Some(suit) = match word {
        "Red" => Some(SuitTag::Red),
        "Green" => Some(SuitTag::Green),
        "Blue" => Some(SuitTag::Blue),
        "Brown" => Some(SuitTag::Brown),
        "White" => Some(SuitTag::White),
        "Yellow" => Some(SuitTag::Yellow),
        "Cyan" => Some(SuitTag::Cyan),
        "Grey" => Some(SuitTag::Grey),
        "Orange" => Some(SuitTag::Orange),
        "Pink" => Some(SuitTag::Pink),
        "Purple" => Some(SuitTag::Purple),
        _ => None,
    } {
        return Ok(Primitive::Suit(Spanned::new(suit, origin)));
    }
    if let Some(influence) = match word {
        "Shaper" => Some(InfluenceTag::Shaper),
        "Elder" => Some(InfluenceTag::Elder),
        "Crusader" => Some(InfluenceTag::Crusader),
        "Redeemer" => Some(InfluenceTag::Redeemer),
        "Hunter" => Some(InfluenceTag::Hunter),
        "Warlord" => Some(InfluenceTag::Warlord),
        _ => None,
    } {
        return Ok(Primitive::Influence(Spanned::new(influence, origin)));
    }
    if let Some(quality) = match word {
        "Superior" => Some(GemQualityTypeTag::Superior),
        "Anomalous" => Some(GemQualityTypeTag::Anomalous),
        "Divergent" => Some(GemQualityTypeTag::Divergent),
        "Phantasmal" => Some(GemQualityTypeTag::Phantasmal),
        _ => None,
    } {
        return Ok(Primitive::GemQualityType(Spanned::new(quality, origin)));
    }
    if word.len() == 1 {
        if let Some(color) = SocketColorTag::from_letter(word.chars().next().unwrap()) {
            return Ok(Primitive::SocketColor(Spanned::new(color, origin)));
        }
    }
    if let Some(line) = shaper_voice_line(word) {
        return Ok(Primitive::AlertSound(fs_model::primitive::AlertSound {
            kind: fs_model::primitive::AlertSoundKind::ShaperVoiceLine(Spanned::new(line, origin)),
            volume: None,
            origin,
        }));
    }
    Err(Diagnostic::new(
        DiagnosticCode::NoMatchingConstructor,
        format!("'{word}' does not name a known value"),
        origin,
    ))
}

fn shaper_voice_line(word: &str) -> Option<ShaperVoiceLineTag> {
    Some(match word {
        "ShAlchemy" => ShaperVoiceLineTag::ShAlchemy,
        "ShBlessed" => ShaperVoiceLineTag::ShBlessed,
        "ShChaos" => ShaperVoiceLineTag::ShChaos,
        "ShDivine" => ShaperVoiceLineTag::ShDivine,
        "ShExalted" => ShaperVoiceLineTag::ShExalted,
        "ShFusing" => ShaperVoiceLineTag::ShFusing,
        "ShGeneral" => ShaperVoiceLineTag::ShGeneral,
        "ShMirror" => ShaperVoiceLineTag::ShMirror,
        "ShRegal" => ShaperVoiceLineTag::ShRegal,
        "ShVaal" => ShaperVoiceLineTag::ShVaal,
        "ShVaul" => ShaperVoiceLineTag::ShVaul,
        "ShVault" => ShaperVoiceLineTag::ShVault,
        "ShWar" => ShaperVoiceLineTag::ShWar,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fs_base::Span;
    use fs_model::PrimitiveKind;

    #[test]
    fn evaluates_integer_literal() {
        let symbols = SymbolTable::new();
        let value = evaluate_expr(&Expr::Integer(5, Span::new(0, 1)), &symbols).unwrap();
        assert_eq!(value.kind(), PrimitiveKind::Integer);
    }

    #[test]
    fn evaluates_rarity_word() {
        let symbols = SymbolTable::new();
        let value = evaluate_expr(&Expr::Identifier("Rare".into(), Span::new(0, 4)), &symbols).unwrap();
        assert_eq!(value.kind(), PrimitiveKind::Rarity);
    }

    #[test]
    fn unresolved_reference_is_a_diagnostic() {
        let symbols = SymbolTable::new();
        let err = evaluate_expr(&Expr::Reference("missing".into(), Span::new(0, 1)), &symbols).unwrap_err();
        assert_eq!(err.code, DiagnosticCode::UndefinedReference);
    }

    #[test]
    fn unknown_word_is_no_matching_constructor() {
        let symbols = SymbolTable::new();
        let err = evaluate_expr(&Expr::Identifier("Gibberish".into(), Span::new(0, 9)), &symbols).unwrap_err();
        assert_eq!(err.code, DiagnosticCode::NoMatchingConstructor);
    }

    #[test]
    fn operand_list_splices_referenced_arrays() {
        let mut symbols = SymbolTable::new();
        let array = Object::array(
            vec![
                Primitive::String(FsString::new("a", Span::new(0, 1))),
                Primitive::String(FsString::new("b", Span::new(0, 1))),
            ],
            Span::new(0, 1),
        )
        .unwrap();
        symbols.define("mods", array, Span::new(0, 1)).unwrap();

        let operands = vec![Expr::Reference("mods".into(), Span::new(2, 7)), Expr::String("c".into(), Span::new(8, 9))];
        let values = evaluate_operand_list(&operands, &symbols).unwrap();
        assert_eq!(values.len(), 3);
    }
}
