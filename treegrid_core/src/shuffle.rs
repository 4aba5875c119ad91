// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View state carried across a list shuffle by object identity.
//!
//! A shuffle (sort, bulk refresh) invalidates every row index at once, so rows
//! cannot be shifted the way [`ListBoxStateTracker`](crate::ListBoxStateTracker)
//! shifts them. Instead each interesting row is keyed by the object it shows, and
//! the data source reports where each object ended up.

use alloc::vec::Vec;
use core::hash::Hash;

use crate::{PositionManager, PositionTracker, RestoreOutcome, ViewState};

/// Caret, anchor, top row, and selection of a view, keyed for a list shuffle.
#[derive(Clone, Debug)]
pub struct ListShuffle<K> {
    positions: PositionManager<K>,
    caret: Option<K>,
    anchor: Option<K>,
    top: Option<K>,
    selected: Vec<K>,
    old_caret: Option<usize>,
    old_top: usize,
    horizontal_offset: f64,
    column: usize,
    untracked: usize,
}

impl<K: Clone + Eq + Hash> ListShuffle<K> {
    /// Captures `state`, keying rows with `key_of`.
    ///
    /// Rows for which `key_of` returns `None` cannot be followed; a selected row
    /// without a key is dropped, a caret without a key keeps its row index.
    pub fn begin(state: &ViewState, mut key_of: impl FnMut(usize) -> Option<K>) -> Self {
        let mut positions = PositionManager::new();
        let column = Some(state.column);
        let mut track = |row: usize| {
            let key = key_of(row)?;
            positions.store(key.clone(), PositionTracker::new(row, column));
            Some(key)
        };
        let caret = state.caret.and_then(&mut track);
        let anchor = state.anchor.and_then(&mut track);
        let top = track(state.top);
        let mut selected = Vec::new();
        let mut untracked = 0;
        for row in state.selection.iter() {
            match track(row) {
                Some(key) => selected.push(key),
                None => untracked += 1,
            }
        }
        Self {
            positions,
            caret,
            anchor,
            top,
            selected,
            old_caret: state.caret,
            old_top: state.top,
            horizontal_offset: state.horizontal_offset,
            column: state.column,
            untracked,
        }
    }

    /// The trackers the data source updates with [`PositionManager::relocate`].
    pub fn positions_mut(&mut self) -> &mut PositionManager<K> {
        &mut self.positions
    }

    /// Number of tracked objects.
    #[must_use]
    pub fn tracked_count(&self) -> usize {
        self.positions.len()
    }

    fn row_of(&self, key: Option<&K>, count: usize) -> Option<usize> {
        let row = self.positions.get(key?)?.resolved_row()?;
        (row < count).then_some(row)
    }

    /// Writes the relocated state into `state`, whose row count is now `current_count`.
    ///
    /// A shuffle always repaints the whole viewport.
    pub fn finish(self, state: &mut ViewState, current_count: usize) -> RestoreOutcome {
        let previous = core::mem::take(&mut state.selection);
        state.item_count = current_count;
        state.column = self.column;
        let mut pruned = self.untracked;
        for key in &self.selected {
            match self.row_of(Some(key), current_count) {
                Some(row) => state.selection.select(row),
                None => pruned += 1,
            }
        }

        let last = current_count.checked_sub(1);
        let clamp = |row: usize| last.map(|last| row.min(last));
        state.caret = self
            .row_of(self.caret.as_ref(), current_count)
            .or_else(|| self.old_caret.and_then(clamp));
        state.anchor = self
            .row_of(self.anchor.as_ref(), current_count)
            .or(state.caret);
        state.top = self
            .row_of(self.top.as_ref(), current_count)
            .or_else(|| clamp(self.old_top))
            .unwrap_or(0);
        state.horizontal_offset = self.horizontal_offset;

        let outcome = RestoreOutcome {
            selection_changed: previous != state.selection,
            repaint_all: true,
            caret_moved: state.caret != self.old_caret,
            pruned,
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "list shuffle finished",
            count = current_count,
            caret = ?state.caret,
            top = state.top,
            pruned,
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SelectionRanges;
    use alloc::vec;

    fn live(items: &[u32], caret: usize, selected: &[usize]) -> ViewState {
        ViewState {
            item_count: items.len(),
            caret: Some(caret),
            anchor: Some(caret),
            top: 1,
            selection: SelectionRanges::from_indices(selected.iter().copied()),
            ..ViewState::default()
        }
    }

    /// Relocates every tracked object to its index in `after`.
    fn reorder(shuffle: &mut ListShuffle<u32>, after: &[u32]) {
        for id in 0..10 {
            let row = after.iter().position(|&x| x == id);
            shuffle.positions_mut().relocate(&id, row, None);
        }
    }

    #[test]
    fn sort_follows_objects() {
        let before = [30, 10, 20, 40];
        let mut state = live(&before, 0, &[0, 3]);
        let mut shuffle = ListShuffle::begin(&state, |row| before.get(row).map(|x| x / 10));
        assert_eq!(shuffle.tracked_count(), 3);
        reorder(&mut shuffle, &[1, 2, 3, 4]);

        let outcome = shuffle.finish(&mut state, 4);
        assert_eq!(state.caret, Some(2));
        assert_eq!(state.anchor, Some(2));
        assert_eq!(state.top, 0);
        assert_eq!(state.selection.iter().collect::<Vec<_>>(), vec![2, 3]);
        assert!(outcome.repaint_all);
        assert!(outcome.caret_moved);
        assert!(outcome.selection_changed);
        assert_eq!(outcome.pruned, 0);
    }

    #[test]
    fn removed_objects_are_pruned_and_caret_clamps() {
        let before = [1, 2, 3, 4, 5];
        let mut state = live(&before, 4, &[1, 4]);
        let mut shuffle = ListShuffle::begin(&state, |row| before.get(row).copied());
        // Object 5 (the caret) and object 2 disappear.
        reorder(&mut shuffle, &[1, 3, 4]);

        let outcome = shuffle.finish(&mut state, 3);
        assert_eq!(state.caret, Some(2));
        assert!(state.selection.is_empty());
        assert_eq!(outcome.pruned, 2);
    }

    #[test]
    fn unkeyed_rows_cannot_follow() {
        let mut state = live(&[0, 0, 0], 1, &[2]);
        let shuffle = ListShuffle::<u32>::begin(&state, |_| None);
        let outcome = shuffle.finish(&mut state, 3);
        assert_eq!(state.caret, Some(1));
        assert_eq!(outcome.pruned, 1);
        assert!(!outcome.caret_moved);
    }

    #[test]
    fn empty_result_clears_caret() {
        let mut state = live(&[7], 0, &[0]);
        let shuffle = ListShuffle::begin(&state, |_| Some(7_u32));
        let outcome = shuffle.finish(&mut state, 0);
        assert_eq!(state.caret, None);
        assert_eq!(state.anchor, None);
        assert_eq!(state.top, 0);
        assert!(outcome.selection_changed);
    }
}
