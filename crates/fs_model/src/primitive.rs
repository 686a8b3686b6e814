//! Scalar value types. Every scalar carries the [`Span`] of the literal or
//! reference that produced it, independent of the [`crate::Object`] wrapper
//! that later carries the *usage* origin (e.g. a `$name` reference site).

use crate::enums::{
    GemQualityTypeTag, InfluenceTag, RarityTag, ShaperVoiceLineTag, ShapeTag, SocketColorTag,
    SocketSpecValue, SuitTag,
};
use fs_base::Span;

/// A value paired with the source range that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spanned<T> {
    pub value: T,
    pub origin: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, origin: Span) -> Self {
        Self { value, origin }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Spanned<U> {
        Spanned::new(f(self.value), self.origin)
    }
}

pub type Boolean = Spanned<bool>;
pub type Integer = Spanned<i32>;
pub type Fractional = Spanned<f64>;
pub type FontSize = Spanned<u8>;
pub type SoundId = Spanned<u16>;
pub type Volume = Spanned<u8>;

/// An owned string literal. Unlike the other scalars this is not `Copy`.
#[derive(Debug, Clone, PartialEq)]
pub struct FsString {
    pub value: String,
    pub origin: Span,
}

impl FsString {
    pub fn new(value: impl Into<String>, origin: Span) -> Self {
        Self { value: value.into(), origin }
    }
}

/// An RGB(A) color, channels in `[0, 255]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: Option<u8>,
    pub origin: Span,
}

/// `MinimapIcon <size> <suit> <shape>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimapIcon {
    /// Icon size, one of `{0, 1, 2}` (large to small).
    pub size: u8,
    pub suit: SuitTag,
    pub shape: ShapeTag,
    pub origin: Span,
}

/// `PlayEffect <suit> [Temp]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeamEffect {
    pub suit: SuitTag,
    pub temporary: bool,
    pub origin: Span,
}

/// Either a numeric/shaper-voice-line alert sound or a custom file path,
/// each with an optional volume.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertSoundKind {
    BuiltinId(SoundId),
    ShaperVoiceLine(Spanned<ShaperVoiceLineTag>),
    CustomPath(FsString),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertSound {
    pub kind: AlertSoundKind,
    pub volume: Option<Volume>,
    pub origin: Span,
}

/// A socket-specification literal, e.g. `5RGB` parsed into counts.
pub type SocketSpec = Spanned<SocketSpecValue>;

/// The full set of scalar value kinds an [`crate::Object`] may wrap.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Boolean(Boolean),
    Integer(Integer),
    Fractional(Fractional),
    String(FsString),
    Rarity(Spanned<RarityTag>),
    Shape(Spanned<ShapeTag>),
    Suit(Spanned<SuitTag>),
    Influence(Spanned<InfluenceTag>),
    SocketColor(Spanned<SocketColorTag>),
    SocketSpec(SocketSpec),
    Color(Color),
    MinimapIcon(MinimapIcon),
    BeamEffect(BeamEffect),
    FontSize(FontSize),
    AlertSound(AlertSound),
    GemQualityType(Spanned<GemQualityTypeTag>),
}

/// The tag-only counterpart of [`Primitive`], used for type-mismatch
/// diagnostics and array-homogeneity checks where the value itself doesn't
/// matter yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Boolean,
    Integer,
    Fractional,
    String,
    Rarity,
    Shape,
    Suit,
    Influence,
    SocketColor,
    SocketSpec,
    Color,
    MinimapIcon,
    BeamEffect,
    FontSize,
    AlertSound,
    GemQualityType,
}

impl Primitive {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Primitive::Boolean(_) => PrimitiveKind::Boolean,
            Primitive::Integer(_) => PrimitiveKind::Integer,
            Primitive::Fractional(_) => PrimitiveKind::Fractional,
            Primitive::String(_) => PrimitiveKind::String,
            Primitive::Rarity(_) => PrimitiveKind::Rarity,
            Primitive::Shape(_) => PrimitiveKind::Shape,
            Primitive::Suit(_) => PrimitiveKind::Suit,
            Primitive::Influence(_) => PrimitiveKind::Influence,
            Primitive::SocketColor(_) => PrimitiveKind::SocketColor,
            Primitive::SocketSpec(_) => PrimitiveKind::SocketSpec,
            Primitive::Color(_) => PrimitiveKind::Color,
            Primitive::MinimapIcon(_) => PrimitiveKind::MinimapIcon,
            Primitive::BeamEffect(_) => PrimitiveKind::BeamEffect,
            Primitive::FontSize(_) => PrimitiveKind::FontSize,
            Primitive::AlertSound(_) => PrimitiveKind::AlertSound,
            Primitive::GemQualityType(_) => PrimitiveKind::GemQualityType,
        }
    }

    pub fn origin(&self) -> Span {
        match self {
            Primitive::Boolean(v) => v.origin,
            Primitive::Integer(v) => v.origin,
            Primitive::Fractional(v) => v.origin,
            Primitive::String(v) => v.origin,
            Primitive::Rarity(v) => v.origin,
            Primitive::Shape(v) => v.origin,
            Primitive::Suit(v) => v.origin,
            Primitive::Influence(v) => v.origin,
            Primitive::SocketColor(v) => v.origin,
            Primitive::SocketSpec(v) => v.origin,
            Primitive::Color(v) => v.origin,
            Primitive::MinimapIcon(v) => v.origin,
            Primitive::BeamEffect(v) => v.origin,
            Primitive::FontSize(v) => v.origin,
            Primitive::AlertSound(v) => v.origin,
            Primitive::GemQualityType(v) => v.origin,
        }
    }

    /// Re-originates this primitive at `new_origin`, used when a `$name`
    /// reference copies a previously-bound object to a new use site.
    pub fn with_origin(mut self, new_origin: Span) -> Self {
        match &mut self {
            Primitive::Boolean(v) => v.origin = new_origin,
            Primitive::Integer(v) => v.origin = new_origin,
            Primitive::Fractional(v) => v.origin = new_origin,
            Primitive::String(v) => v.origin = new_origin,
            Primitive::Rarity(v) => v.origin = new_origin,
            Primitive::Shape(v) => v.origin = new_origin,
            Primitive::Suit(v) => v.origin = new_origin,
            Primitive::Influence(v) => v.origin = new_origin,
            Primitive::SocketColor(v) => v.origin = new_origin,
            Primitive::SocketSpec(v) => v.origin = new_origin,
            Primitive::Color(v) => v.origin = new_origin,
            Primitive::MinimapIcon(v) => v.origin = new_origin,
            Primitive::BeamEffect(v) => v.origin = new_origin,
            Primitive::FontSize(v) => v.origin = new_origin,
            Primitive::AlertSound(v) => v.origin = new_origin,
            Primitive::GemQualityType(v) => v.origin = new_origin,
        }
        self
    }
}

impl PrimitiveKind {
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Fractional => "fractional",
            PrimitiveKind::String => "string",
            PrimitiveKind::Rarity => "rarity",
            PrimitiveKind::Shape => "shape",
            PrimitiveKind::Suit => "suit",
            PrimitiveKind::Influence => "influence",
            PrimitiveKind::SocketColor => "socket color",
            PrimitiveKind::SocketSpec => "socket spec",
            PrimitiveKind::Color => "color",
            PrimitiveKind::MinimapIcon => "minimap icon",
            PrimitiveKind::BeamEffect => "beam effect",
            PrimitiveKind::FontSize => "font size",
            PrimitiveKind::AlertSound => "alert sound",
            PrimitiveKind::GemQualityType => "gem quality type",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_origin_rewrites_only_the_origin() {
        let p = Primitive::Integer(Integer::new(5, Span::new(0, 1)));
        let moved = p.with_origin(Span::new(10, 12));
        assert_eq!(moved.origin(), Span::new(10, 12));
        match moved {
            Primitive::Integer(i) => assert_eq!(i.value, 5),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn kind_matches_variant() {
        let p = Primitive::String(FsString::new("Chaos Orb", Span::new(0, 9)));
        assert_eq!(p.kind(), PrimitiveKind::String);
    }
}
