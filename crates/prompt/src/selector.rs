//! Budgeted selection — fit a ranked list into a length budget.
//!
//! The rule is rank-monotone: walk the ranked candidates in order and include
//! each one while the running total stays within budget; at the first
//! candidate that would overflow, stop. Smaller, lower-ranked candidates are
//! never pulled forward, so the output is always a prefix of the input.

/// A ranked item with the content length it would add to the prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<T> {
    pub item: T,
    pub len: usize,
}

impl<T> Candidate<T> {
    pub fn new(item: T, len: usize) -> Self {
        Self { item, len }
    }
}

/// Outcome of a selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<T> {
    /// Included items, in input order
    pub selected: Vec<T>,
    /// Candidates left out by the stopping rule
    pub dropped_count: usize,
    /// Running total after selection, including the fixed overhead
    pub used_len: usize,
    /// Combined length of the dropped candidates
    pub dropped_len: usize,
}

/// Stateless selector. Create one and reuse it.
#[derive(Debug, Clone, Copy, Default)]
pub struct BudgetedSelector;

impl BudgetedSelector {
    pub fn new() -> Self {
        Self
    }

    /// Select a prefix of `ranked` that fits in `budget` after `fixed_overhead_len`.
    ///
    /// Never fails: if nothing fits (even when the overhead alone exceeds the
    /// budget) the selection is empty and every candidate counts as dropped.
    pub fn select<T>(
        &self,
        ranked: impl IntoIterator<Item = Candidate<T>>,
        fixed_overhead_len: usize,
        budget: usize,
    ) -> Selection<T> {
        let mut used = fixed_overhead_len;
        let mut selected = Vec::new();
        let mut dropped_count = 0;
        let mut dropped_len = 0usize;
        let mut stopped = false;

        for candidate in ranked {
            if !stopped && used.saturating_add(candidate.len) <= budget {
                used += candidate.len;
                selected.push(candidate.item);
            } else {
                stopped = true;
                dropped_count += 1;
                dropped_len = dropped_len.saturating_add(candidate.len);
            }
        }

        Selection {
            selected,
            dropped_count,
            used_len: used,
            dropped_len,
        }
    }
}
