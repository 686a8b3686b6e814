//! Closed vocabularies used throughout the condition and action model.

/// Item rarity. Ordered: `Normal < Magic < Rare < Unique`, used by `Rarity`
/// range-bound conditions (`Rarity >= Rare`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RarityTag {
    Normal,
    Magic,
    Rare,
    Unique,
}

impl RarityTag {
    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Magic => "Magic",
            Self::Rare => "Rare",
            Self::Unique => "Unique",
        }
    }
}

/// Minimap icon and beam shapes supported by the client's `PlayEffect`
/// keyword. `UpsideDownHouse` is the community name for the inverted-house
/// glyph added in a later league.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeTag {
    Circle,
    Diamond,
    Hexagon,
    Square,
    Star,
    Triangle,
    Cross,
    Moon,
    Raindrop,
    Kite,
    Pentagon,
    UpsideDownHouse,
}

impl ShapeTag {
    pub fn name(self) -> &'static str {
        match self {
            Self::Circle => "Circle",
            Self::Diamond => "Diamond",
            Self::Hexagon => "Hexagon",
            Self::Square => "Square",
            Self::Star => "Star",
            Self::Triangle => "Triangle",
            Self::Cross => "Cross",
            Self::Moon => "Moon",
            Self::Raindrop => "Raindrop",
            Self::Kite => "Kite",
            Self::Pentagon => "Pentagon",
            Self::UpsideDownHouse => "UpsideDownHouse",
        }
    }
}

/// Colors accepted by `MinimapIcon` and `PlayEffect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuitTag {
    Red,
    Green,
    Blue,
    Brown,
    White,
    Yellow,
    Cyan,
    Grey,
    Orange,
    Pink,
    Purple,
}

impl SuitTag {
    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Green => "Green",
            Self::Blue => "Blue",
            Self::Brown => "Brown",
            Self::White => "White",
            Self::Yellow => "Yellow",
            Self::Cyan => "Cyan",
            Self::Grey => "Grey",
            Self::Orange => "Orange",
            Self::Pink => "Pink",
            Self::Purple => "Purple",
        }
    }
}

/// A single influence tag an item may carry. `HasInfluence` conditions test
/// against a set of these (see [`InfluenceSpec`]); an item itself carries at
/// most the influences present on its base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfluenceTag {
    Shaper,
    Elder,
    Crusader,
    Redeemer,
    Hunter,
    Warlord,
}

impl InfluenceTag {
    pub fn name(self) -> &'static str {
        match self {
            Self::Shaper => "Shaper",
            Self::Elder => "Elder",
            Self::Crusader => "Crusader",
            Self::Redeemer => "Redeemer",
            Self::Hunter => "Hunter",
            Self::Warlord => "Warlord",
        }
    }
}

/// The single-letter socket colors used in socket-spec literals (`5RGB`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketColorTag {
    R,
    G,
    B,
    W,
    A,
    D,
}

impl SocketColorTag {
    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'R' => Some(Self::R),
            'G' => Some(Self::G),
            'B' => Some(Self::B),
            'W' => Some(Self::W),
            'A' => Some(Self::A),
            'D' => Some(Self::D),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Self::R => 'R',
            Self::G => 'G',
            Self::B => 'B',
            Self::W => 'W',
            Self::A => 'A',
            Self::D => 'D',
        }
    }
}

/// A set of required socket colors plus an optional total-socket count, as
/// written in a `5RGB`-style literal. Counts below zero never occur; each
/// field counts how many sockets of that color are *required* (a comparison
/// operator elsewhere in the condition decides at-least/at-most/exact).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SocketSpecValue {
    pub num: Option<i32>,
    pub r: i32,
    pub g: i32,
    pub b: i32,
    pub w: i32,
    pub a: i32,
    pub d: i32,
}

impl SocketSpecValue {
    /// Total required colored sockets, independent of `num`.
    pub fn required_colors(&self) -> i32 {
        self.r + self.g + self.b + self.w + self.a + self.d
    }

    /// A socket-spec literal is valid if it names at least one color or a
    /// count, and the declared count (if any) is not exceeded by the sum of
    /// required colors.
    pub fn is_valid(&self) -> bool {
        if self.num.is_none() && self.required_colors() == 0 {
            return false;
        }
        if let Some(num) = self.num {
            if self.required_colors() > num {
                return false;
            }
        }
        true
    }
}

/// Alternate quality gem types (`TransfiguredGem`/`AlternateQuality`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GemQualityTypeTag {
    Superior,
    Anomalous,
    Divergent,
    Phantasmal,
}

impl GemQualityTypeTag {
    pub fn name(self) -> &'static str {
        match self {
            Self::Superior => "Superior",
            Self::Anomalous => "Anomalous",
            Self::Divergent => "Divergent",
            Self::Phantasmal => "Phantasmal",
        }
    }
}

/// A curated subset of shaper voice-line alert sounds (`ShVaal`, `ShMirror`,
/// ...). The game's actual list is larger; callers needing the full table
/// should extend this enum rather than falling back to raw integers, so
/// typos are caught at parse time instead of silently ignored by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaperVoiceLineTag {
    ShAlchemy,
    ShBlessed,
    ShChaos,
    ShDivine,
    ShExalted,
    ShFusing,
    ShGeneral,
    ShMirror,
    ShRegal,
    ShVaal,
    ShVaul,
    ShVault,
    ShWar,
}

impl ShaperVoiceLineTag {
    pub fn name(self) -> &'static str {
        match self {
            Self::ShAlchemy => "ShAlchemy",
            Self::ShBlessed => "ShBlessed",
            Self::ShChaos => "ShChaos",
            Self::ShDivine => "ShDivine",
            Self::ShExalted => "ShExalted",
            Self::ShFusing => "ShFusing",
            Self::ShGeneral => "ShGeneral",
            Self::ShMirror => "ShMirror",
            Self::ShRegal => "ShRegal",
            Self::ShVaal => "ShVaal",
            Self::ShVaul => "ShVaul",
            Self::ShVault => "ShVault",
            Self::ShWar => "ShWar",
        }
    }
}
