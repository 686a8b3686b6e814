//! Flat filter blocks: the form the game client actually reads, and the
//! output of both the compiler's lowering pass and the RF parser.

use crate::action::ActionSet;
use crate::condition::ConditionSet;
use fs_base::Span;

/// `Show`, `Hide`, or `Minimal` (a visibility level weaker than `Hide`,
/// specific to the "ruthless" game mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Show,
    Hide,
    Minimal,
}

/// One block of a flat filter: a visibility, the conditions that must all
/// pass, and the actions to apply when they do. `continue_` marks a block
/// written with the `Continue` keyword, which lets matching fall through to
/// later blocks instead of stopping at the first match.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFilterBlock {
    pub visibility: Visibility,
    pub conditions: ConditionSet,
    pub actions: ActionSet,
    pub continue_: bool,
    pub origin: Span,
}

impl ItemFilterBlock {
    pub fn new(visibility: Visibility, origin: Span) -> Self {
        Self {
            visibility,
            conditions: ConditionSet::default(),
            actions: ActionSet::default(),
            continue_: false,
            origin,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.conditions.is_valid()
    }
}

/// An entry in a flat filter. Currently identical to [`ItemFilterBlock`];
/// kept as a distinct alias because the serializer and the engine address
/// filter contents through this name, while the compiler's lowering pass
/// produces bare blocks before they're sequenced into a filter.
pub type FilterEntry = ItemFilterBlock;

/// An `Import "path"` statement's position in a flat filter. Import markers
/// carry no matchable content; they record where a filter author asked for
/// another document to be spliced in, so the serializer can render the
/// marker back out at the right place in the text.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportMarker {
    pub path: String,
    /// Index into `entries` of the block this import preceded.
    pub position: usize,
    pub origin: Span,
}

/// A complete, ready-to-serialize or ready-to-match filter: an ordered list
/// of blocks, first-match-wins (unless a block carries `Continue`), plus any
/// import markers interleaved among them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatFilter {
    pub entries: Vec<FilterEntry>,
    pub imports: Vec<ImportMarker>,
}

impl FlatFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: FilterEntry) {
        self.entries.push(entry);
    }

    pub fn push_import(&mut self, path: String, origin: Span) {
        self.imports.push(ImportMarker { path, position: self.entries.len(), origin });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_block_has_no_conditions_and_matches_everything() {
        let block = ItemFilterBlock::new(Visibility::Show, Span::new(0, 1));
        assert!(block.is_valid());
        assert!(block.conditions.conditions.is_empty());
    }

    #[test]
    fn flat_filter_preserves_insertion_order() {
        let mut filter = FlatFilter::new();
        filter.push(ItemFilterBlock::new(Visibility::Show, Span::new(0, 1)));
        filter.push(ItemFilterBlock::new(Visibility::Hide, Span::new(2, 3)));
        assert_eq!(filter.len(), 2);
        assert_eq!(filter.entries[0].visibility, Visibility::Show);
        assert_eq!(filter.entries[1].visibility, Visibility::Hide);
    }

    #[test]
    fn import_marker_records_the_entry_index_it_preceded() {
        let mut filter = FlatFilter::new();
        filter.push(ItemFilterBlock::new(Visibility::Show, Span::new(0, 1)));
        filter.push_import("shared.filter".into(), Span::new(2, 3));
        filter.push(ItemFilterBlock::new(Visibility::Hide, Span::new(4, 5)));
        assert_eq!(filter.imports.len(), 1);
        assert_eq!(filter.imports[0].position, 1);
        assert_eq!(filter.imports[0].path, "shared.filter");
    }
}
