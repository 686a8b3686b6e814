//! The action set a matched block applies to an item's on-screen style.
//! Every field is independently optional so inherited-block semantics can
//! "override just the border color" without disturbing the rest.

use crate::primitive::{AlertSound, BeamEffect, Color, FontSize, MinimapIcon, Spanned};
use fs_base::Span;

/// `PlayAlertSound`/`PlayAlertSoundPositional`/`DisableDropSound` collapse to
/// one optional field each; the action set can't hold conflicting sound
/// directives simultaneously any more than the client can.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSoundPositioning {
    Normal,
    Positional,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertSoundAction {
    pub sound: AlertSound,
    pub positioning: AlertSoundPositioning,
}

/// The full set of style-affecting actions a block may specify. `None` means
/// "not set by this block"; a child block inherits the parent's value for
/// any field it leaves `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionSet {
    pub border_color: Option<Color>,
    pub text_color: Option<Color>,
    pub background_color: Option<Color>,
    pub font_size: Option<FontSize>,
    pub alert_sound: Option<AlertSoundAction>,
    pub disable_drop_sound: Option<Spanned<bool>>,
    pub minimap_icon: Option<MinimapIcon>,
    pub beam_effect: Option<BeamEffect>,
}

impl ActionSet {
    /// Applies `other` on top of `self`, field by field. Used when lowering
    /// a nested block: the child's own action set is overridden onto the
    /// inherited parent set, the way the compiler threads inherited state
    /// down through nested blocks.
    pub fn override_with(&self, other: &ActionSet) -> ActionSet {
        ActionSet {
            border_color: other.border_color.or(self.border_color),
            text_color: other.text_color.or(self.text_color),
            background_color: other.background_color.or(self.background_color),
            font_size: other.font_size.or(self.font_size),
            alert_sound: other.alert_sound.clone().or_else(|| self.alert_sound.clone()),
            disable_drop_sound: other.disable_drop_sound.or(self.disable_drop_sound),
            minimap_icon: other.minimap_icon.or(self.minimap_icon),
            beam_effect: other.beam_effect.or(self.beam_effect),
        }
    }

    pub fn origins(&self) -> Vec<Span> {
        let mut out = Vec::new();
        if let Some(c) = &self.border_color {
            out.push(c.origin);
        }
        if let Some(c) = &self.text_color {
            out.push(c.origin);
        }
        if let Some(c) = &self.background_color {
            out.push(c.origin);
        }
        if let Some(f) = &self.font_size {
            out.push(f.origin);
        }
        if let Some(a) = &self.alert_sound {
            out.push(a.sound.origin);
        }
        if let Some(d) = &self.disable_drop_sound {
            out.push(d.origin);
        }
        if let Some(m) = &self.minimap_icon {
            out.push(m.origin);
        }
        if let Some(b) = &self.beam_effect {
            out.push(b.origin);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(r: u8) -> Color {
        Color { r, g: 0, b: 0, a: None, origin: Span::new(0, 1) }
    }

    #[test]
    fn override_with_keeps_parent_fields_not_set_by_child() {
        let parent = ActionSet { border_color: Some(color(1)), text_color: Some(color(2)), ..Default::default() };
        let child = ActionSet { border_color: Some(color(9)), ..Default::default() };
        let merged = parent.override_with(&child);
        assert_eq!(merged.border_color.unwrap().r, 9);
        assert_eq!(merged.text_color.unwrap().r, 2);
    }

    #[test]
    fn override_with_empty_child_is_identity() {
        let parent = ActionSet { border_color: Some(color(5)), ..Default::default() };
        let merged = parent.override_with(&ActionSet::default());
        assert_eq!(merged, parent);
    }
}
