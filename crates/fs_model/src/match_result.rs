//! Match traces: the evidence the engine records while testing an item
//! against a filter, consumed by diagnostic/"why did this item match"
//! tooling rather than by the matching decision itself.

use fs_base::Span;

/// The outcome of testing a single condition against an item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionMatchResult {
    success: bool,
    /// Origin of the condition itself, for pointing back into source.
    pub condition_origin: Span,
    /// Origin of the specific operand that produced the match, when the
    /// condition holds a list (e.g. which `BaseType` string matched).
    pub matched_operand: Option<Span>,
}

impl ConditionMatchResult {
    pub fn new(success: bool, condition_origin: Span, matched_operand: Option<Span>) -> Self {
        Self { success, condition_origin, matched_operand }
    }

    pub fn is_successful(&self) -> bool {
        self.success
    }
}

/// The outcome of testing one block's whole condition set against an item.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockMatchResult {
    pub conditions: Vec<ConditionMatchResult>,
    pub block_origin: Span,
}

impl BlockMatchResult {
    pub fn new(block_origin: Span) -> Self {
        Self { conditions: Vec::new(), block_origin }
    }

    pub fn push(&mut self, result: ConditionMatchResult) {
        self.conditions.push(result);
    }

    /// A block matches only if every condition in it succeeded; an empty
    /// condition set always matches (a filter's catch-all block).
    pub fn is_successful(&self) -> bool {
        self.conditions.iter().all(ConditionMatchResult::is_successful)
    }

    /// The first condition that failed, if any — what a "why didn't this
    /// block match" report points at.
    pub fn first_failure(&self) -> Option<&ConditionMatchResult> {
        self.conditions.iter().find(|c| !c.is_successful())
    }
}

/// The end-to-end outcome of running one item through a whole filter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilteringResult {
    /// Index into the flat filter's block list of the block that matched,
    /// `None` if no block matched (the item is shown with client defaults).
    pub matched_block: Option<usize>,
    /// Present only when the engine was asked to keep a full trace (every
    /// block tested, not just the first match); empty otherwise.
    pub trace: Vec<BlockMatchResult>,
}

impl FilteringResult {
    pub fn matched(&self) -> bool {
        self.matched_block.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_matches_when_all_conditions_succeed() {
        let mut result = BlockMatchResult::new(Span::new(0, 1));
        result.push(ConditionMatchResult::new(true, Span::new(0, 1), None));
        result.push(ConditionMatchResult::new(true, Span::new(2, 3), None));
        assert!(result.is_successful());
    }

    #[test]
    fn block_with_empty_conditions_always_matches() {
        let result = BlockMatchResult::new(Span::new(0, 1));
        assert!(result.is_successful());
    }

    #[test]
    fn first_failure_reports_earliest_failing_condition() {
        let mut result = BlockMatchResult::new(Span::new(0, 1));
        result.push(ConditionMatchResult::new(true, Span::new(0, 1), None));
        result.push(ConditionMatchResult::new(false, Span::new(2, 3), None));
        result.push(ConditionMatchResult::new(false, Span::new(4, 5), None));
        assert_eq!(result.first_failure().unwrap().condition_origin, Span::new(2, 3));
    }

    #[test]
    fn filtering_result_with_no_match_reports_unmatched() {
        let result = FilteringResult::default();
        assert!(!result.matched());
    }
}
