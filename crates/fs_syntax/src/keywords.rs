//! The closed keyword vocabulary both grammars recognize. Kept as flat
//! string tables rather than one token variant per keyword: the parser only
//! needs to know "is this word a condition keyword, an action keyword, or
//! neither" to find statement boundaries. Mapping a keyword's text to the
//! semantic property/action it names is `fs_compile`'s job.

pub const CONDITION_KEYWORDS: &[&str] = &[
    "Rarity",
    "ItemLevel",
    "DropLevel",
    "Quality",
    "Sockets",
    "SocketGroup",
    "LinkedSockets",
    "Width",
    "Height",
    "StackSize",
    "GemLevel",
    "MapTier",
    "CorruptedMods",
    "EnchantmentPassiveNum",
    "BaseArmour",
    "BaseEvasion",
    "BaseEnergyShield",
    "BaseWard",
    "BaseDefencePercentile",
    "MemoryStrands",
    "AreaLevel",
    "HasSearingExarchImplicit",
    "HasEaterOfWorldsImplicit",
    "Class",
    "BaseType",
    "HasExplicitMod",
    "HasImplicitMod",
    "HasEnchantment",
    "EnchantmentPassiveNode",
    "ArchnemesisMod",
    "HasInfluence",
    "TransfiguredGem",
    "AlternateQuality",
    "Identified",
    "Corrupted",
    "Mirrored",
    "FracturedItem",
    "SynthesisedItem",
    "AnyEnchantment",
    "ShapedMap",
    "ElderMap",
    "BlightedMap",
    "UberBlightedMap",
    "Replica",
    "HasCruciblePassiveTree",
    "ZanaMemory",
    "Scourged",
    "ElderItem",
    "ShaperItem",
    "Price",
];

pub const ACTION_KEYWORDS: &[&str] = &[
    "SetBorderColor",
    "SetTextColor",
    "SetBackgroundColor",
    "SetFontSize",
    "PlayAlertSound",
    "PlayAlertSoundPositional",
    "DisableDropSound",
    "MinimapIcon",
    "PlayEffect",
];

pub const STRUCTURAL_KEYWORDS: &[&str] = &["Show", "Hide", "Minimal", "Continue", "Autogenerate", "Expand", "Import"];

pub fn is_condition_keyword(word: &str) -> bool {
    CONDITION_KEYWORDS.contains(&word)
}

pub fn is_action_keyword(word: &str) -> bool {
    ACTION_KEYWORDS.contains(&word)
}

pub fn is_structural_keyword(word: &str) -> bool {
    STRUCTURAL_KEYWORDS.contains(&word)
}

/// `true` if `word` starts a new statement, ending whatever operand list is
/// currently being accumulated.
pub fn is_statement_boundary(word: &str) -> bool {
    is_condition_keyword(word) || is_action_keyword(word) || is_structural_keyword(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_tables_do_not_overlap() {
        for kw in CONDITION_KEYWORDS {
            assert!(!is_action_keyword(kw), "{kw} listed as both a condition and an action");
        }
    }

    #[test]
    fn unknown_word_is_not_a_boundary() {
        assert!(!is_statement_boundary("Chaos"));
    }
}
