//! The in-game drop model the engine matches filters against.

use crate::enums::{GemQualityTypeTag, InfluenceTag, RarityTag, SocketColorTag};

/// A single socket's color, part of a [`LinkedGroup`].
pub type SocketColor = SocketColorTag;

/// A maximal set of linked sockets on an item. A single item may have
/// several disjoint groups (e.g. a 6-socket item with a 4-link and a 2-link).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkedGroup {
    pub sockets: Vec<SocketColor>,
}

impl LinkedGroup {
    pub fn count_of(&self, color: SocketColor) -> i32 {
        self.sockets.iter().filter(|&&c| c == color).count() as i32
    }
}

/// All of an item's socket groups, derived from its socket layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocketInfo {
    pub groups: Vec<LinkedGroup>,
}

impl SocketInfo {
    /// Total socket count across all groups.
    pub fn sockets(&self) -> i32 {
        self.groups.iter().map(|g| g.sockets.len() as i32).sum()
    }

    /// The largest link group's size; what `LinkedSockets` tests against.
    pub fn links(&self) -> i32 {
        self.groups.iter().map(|g| g.sockets.len() as i32).max().unwrap_or(0)
    }

    pub fn count_of(&self, color: SocketColor) -> i32 {
        self.groups.iter().map(|g| g.count_of(color)).sum()
    }
}

/// The set of influences an item carries. All flags false is "no influence",
/// the case `HasInfluence None` matches against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InfluenceSet {
    pub shaper: bool,
    pub elder: bool,
    pub crusader: bool,
    pub redeemer: bool,
    pub hunter: bool,
    pub warlord: bool,
}

impl InfluenceSet {
    pub fn is_none(&self) -> bool {
        !(self.shaper || self.elder || self.crusader || self.redeemer || self.hunter || self.warlord)
    }

    pub fn has(&self, tag: InfluenceTag) -> bool {
        match tag {
            InfluenceTag::Shaper => self.shaper,
            InfluenceTag::Elder => self.elder,
            InfluenceTag::Crusader => self.crusader,
            InfluenceTag::Redeemer => self.redeemer,
            InfluenceTag::Hunter => self.hunter,
            InfluenceTag::Warlord => self.warlord,
        }
    }
}

/// An explicit modifier line on an item, tested by `HasExplicitMod`.
pub type ExplicitMod = String;

/// The drop being tested against a filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Item {
    pub class: String,
    pub base_type: String,
    pub rarity: Option<RarityTag>,
    pub item_level: i32,
    pub drop_level: i32,
    pub quality: i32,
    pub width: i32,
    pub height: i32,
    pub stack_size: Option<i32>,
    pub gem_level: Option<i32>,
    pub gem_quality_type: Option<GemQualityTypeTag>,
    pub map_tier: Option<i32>,
    pub sockets: SocketInfo,
    pub identified: bool,
    pub corrupted: bool,
    pub mirrored: bool,
    pub fractured: bool,
    pub synthesised: bool,
    pub shaped_map: bool,
    pub elder_map: bool,
    pub blighted_map: bool,
    pub uber_blighted_map: bool,
    pub replica: bool,
    pub scourged: bool,
    pub has_crucible_passive_tree: bool,
    pub is_prophecy: bool,
    pub is_transfigured_gem: bool,
    pub memory_strands: Option<i32>,
    pub corrupted_mods: i32,
    pub enchantment_passive_num: i32,
    pub base_armour: Option<i32>,
    pub base_evasion: Option<i32>,
    pub base_energy_shield: Option<i32>,
    pub base_ward: Option<i32>,
    pub base_defence_percentile: Option<i32>,
    pub has_searing_exarch_implicit: bool,
    pub has_eater_of_worlds_implicit: bool,
    pub influence: InfluenceSet,
    pub explicit_mods: Vec<ExplicitMod>,
    pub implicit_mods: Vec<ExplicitMod>,
    pub enchantment: Option<String>,
    pub enchantment_passive_node: Option<String>,
    pub archnemesis_mods: Vec<ExplicitMod>,
    pub zana_memory: bool,
}

impl Item {
    pub fn links(&self) -> i32 {
        self.sockets.links()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn influence_is_none_with_all_flags_unset() {
        assert!(InfluenceSet::default().is_none());
    }

    #[test]
    fn influence_has_reads_individual_flags() {
        let spec = InfluenceSet { shaper: true, ..Default::default() };
        assert!(spec.has(InfluenceTag::Shaper));
        assert!(!spec.has(InfluenceTag::Elder));
    }

    #[test]
    fn socket_info_links_is_largest_group() {
        let info = SocketInfo {
            groups: vec![
                LinkedGroup { sockets: vec![SocketColor::R, SocketColor::G] },
                LinkedGroup { sockets: vec![SocketColor::B, SocketColor::B, SocketColor::B] },
            ],
        };
        assert_eq!(info.links(), 3);
        assert_eq!(info.sockets(), 5);
        assert_eq!(info.count_of(SocketColor::B), 3);
    }

    #[test]
    fn empty_sockets_have_zero_links() {
        assert_eq!(SocketInfo::default().links(), 0);
    }
}
