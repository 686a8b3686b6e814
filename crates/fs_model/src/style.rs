//! The fully-resolved visual style applied to an item: either produced by a
//! matched block's action set, or the client's built-in default when no
//! block matches.

use crate::enums::RarityTag;
use crate::primitive::Color;

/// Every field resolved, unlike [`crate::action::ActionSet`] where each
/// field is independently optional.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub border_color: Color,
    pub text_color: Color,
    pub background_color: Color,
    pub font_size: u8,
}

const DEFAULT_FONT_SIZE: u8 = 32;

fn solid(r: u8, g: u8, b: u8) -> Color {
    Color { r, g, b, a: None, origin: fs_base::Span::point(0) }
}

impl Style {
    /// The client's built-in default style for an item of the given rarity,
    /// used when no filter block matched (or no filter is loaded at all).
    pub fn default_for_rarity(rarity: Option<RarityTag>) -> Self {
        let (text_color, border_color) = match rarity {
            None | Some(RarityTag::Normal) => (solid(200, 200, 200), solid(200, 200, 200)),
            Some(RarityTag::Magic) => (solid(136, 136, 255), solid(136, 136, 255)),
            Some(RarityTag::Rare) => (solid(255, 255, 119), solid(255, 255, 119)),
            Some(RarityTag::Unique) => (solid(175, 96, 37), solid(175, 96, 37)),
        };
        Style {
            border_color,
            text_color,
            background_color: solid(0, 0, 0),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_default_style_uses_orange_family() {
        let style = Style::default_for_rarity(Some(RarityTag::Unique));
        assert_eq!(style.text_color.r, 175);
    }

    #[test]
    fn missing_rarity_falls_back_to_normal_style() {
        let with_none = Style::default_for_rarity(None);
        let with_normal = Style::default_for_rarity(Some(RarityTag::Normal));
        assert_eq!(with_none, with_normal);
    }
}
