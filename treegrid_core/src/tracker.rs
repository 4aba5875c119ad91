// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single tracked positions and the shift rules every tracked position obeys.

use core::hash::Hash;

use hashbrown::HashMap;

use crate::{ItemCountChanged, ItemMoved, TreeCoordinate, TreeSource};

/// Shifts `row` through a count change with the given ceiling.
///
/// Rows at or above `ceiling` are untouched. Rows below it move by `change`; a row
/// that would land at or above the ceiling was removed and yields `None`.
/// A `None` ceiling sits above row `0`. Insertions with no ceiling are ignored.
#[must_use]
pub fn shift_after_change(row: usize, ceiling: Option<usize>, change: isize) -> Option<usize> {
    let Some(ceiling) = ceiling else {
        if change > 0 {
            return Some(row);
        }
        return row.checked_sub(change.unsigned_abs());
    };
    if row <= ceiling {
        return Some(row);
    }
    if change >= 0 {
        return Some(row + change.unsigned_abs());
    }
    row.checked_sub(change.unsigned_abs())
        .filter(|&shifted| shifted > ceiling)
}

/// Shifts `row` through a block move.
///
/// Moving up, rows in `[to, from)` shift down by the block size and the block
/// shifts up by `from - to`. Moving down, the block shifts down by `to - from`
/// and rows in `[from + count, to + count)` shift up by the block size.
#[must_use]
pub fn shift_for_move(row: usize, moved: &ItemMoved) -> usize {
    let ItemMoved {
        from_row: from,
        to_row: to,
        item_count: count,
        ..
    } = *moved;
    if count == 0 || from == to {
        return row;
    }
    if from > to {
        if (to..from).contains(&row) {
            row + count
        } else if (from..from + count).contains(&row) {
            row - (from - to)
        } else {
            row
        }
    } else if (from..from + count).contains(&row) {
        row + (to - from)
    } else if (from + count..to + count).contains(&row) {
        row - count
    } else {
        row
    }
}

/// One coordinate tracked across a structural-change transaction.
///
/// Create it from a live coordinate right before the change, feed it the change
/// events, then consume [`PositionTracker::resolved_row`] once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PositionTracker {
    /// Row when tracking began.
    pub start_row: usize,
    /// Native column the position belongs to, or `None` for "first non-blank column".
    pub column: Option<usize>,
    /// Current row, or `None` once the tracked item has been removed.
    pub end_row: Option<usize>,
    /// Structural parent to fall back to when the item is removed.
    pub parent_row: Option<usize>,
}

impl PositionTracker {
    /// Starts tracking `row` in `column`.
    #[must_use]
    pub const fn new(row: usize, column: Option<usize>) -> Self {
        Self {
            start_row: row,
            column,
            end_row: Some(row),
            parent_row: None,
        }
    }

    /// Returns `true` if the tracked item no longer exists.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.end_row.is_none()
    }

    /// The row to restore: the current row, or the structural parent when deleted.
    #[must_use]
    pub fn resolved_row(&self) -> Option<usize> {
        self.end_row.or(self.parent_row)
    }

    /// Applies an expand, collapse, insert, or delete.
    ///
    /// A sub-item adjustment for the tracked column replaces the main change.
    pub fn apply_change(&mut self, change: &ItemCountChanged) {
        let ceiling = change.change_ceiling();
        let delta = self
            .column
            .map_or(change.change, |column| change.change_for_column(column));

        if let Some(parent) = self.parent_row {
            self.parent_row = shift_after_change(parent, ceiling, delta).or(change.anchor_row);
        }
        if let Some(row) = self.end_row {
            self.end_row = shift_after_change(row, ceiling, delta);
            if self.end_row.is_none() {
                self.parent_row = change.anchor_row;
            }
        }
    }

    /// Applies a block move if it affects the tracked column.
    pub fn apply_move(&mut self, moved: &ItemMoved) {
        if !moved.applies_to_column(self.column.unwrap_or(0)) {
            return;
        }
        self.end_row = self.end_row.map(|row| shift_for_move(row, moved));
        self.parent_row = self.parent_row.map(|row| shift_for_move(row, moved));
    }
}

/// Keyed trackers that survive a list shuffle.
///
/// The host stores a tracker per object before the shuffle, the data source reports
/// each object's new row with [`PositionManager::relocate`], and the host reads the
/// results back with [`PositionManager::retrieve`].
#[derive(Clone, Debug)]
pub struct PositionManager<K> {
    trackers: HashMap<K, PositionTracker>,
}

impl<K> Default for PositionManager<K> {
    fn default() -> Self {
        Self {
            trackers: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> PositionManager<K> {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored trackers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    /// Returns `true` if no trackers are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }

    /// Stores a tracker, replacing any tracker already stored for `key`.
    pub fn store(&mut self, key: K, tracker: PositionTracker) {
        self.trackers.insert(key, tracker);
    }

    /// Returns the tracker stored for `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&PositionTracker> {
        self.trackers.get(key)
    }

    /// Records the new row of `key`, or `None` if it was removed, with an optional
    /// parent to fall back to. Returns `false` if `key` is not tracked.
    pub fn relocate(&mut self, key: &K, row: Option<usize>, parent_row: Option<usize>) -> bool {
        let Some(tracker) = self.trackers.get_mut(key) else {
            return false;
        };
        tracker.end_row = row;
        tracker.parent_row = parent_row;
        true
    }

    /// Applies a count change to every stored tracker.
    pub fn apply_change(&mut self, change: &ItemCountChanged) {
        self.trackers
            .values_mut()
            .for_each(|tracker| tracker.apply_change(change));
    }

    /// Applies a block move to every stored tracker.
    pub fn apply_move(&mut self, moved: &ItemMoved) {
        self.trackers
            .values_mut()
            .for_each(|tracker| tracker.apply_move(moved));
    }

    /// Removes and returns the tracker for `key`.
    pub fn retrieve(&mut self, key: &K) -> Option<PositionTracker> {
        self.trackers.remove(key)
    }

    /// Removes the tracker for `key` and resolves it against `source`.
    ///
    /// Trackers without a column are bound to the first non-blank column of their
    /// row. Returns `None` if the key is unknown or nothing survived.
    pub fn retrieve_coordinate<S: TreeSource + ?Sized>(
        &mut self,
        key: &K,
        source: &S,
    ) -> Option<TreeCoordinate> {
        let tracker = self.retrieve(key)?;
        let row = tracker.resolved_row()?;
        if row >= source.visible_item_count() {
            return None;
        }
        let column = tracker
            .column
            .unwrap_or_else(|| source.first_non_blank_column(row));
        Some(TreeCoordinate::new(row, column))
    }

    /// Removes all trackers.
    pub fn clear(&mut self) {
        self.trackers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ItemInfo;

    #[test]
    fn zero_change_is_a_no_op() {
        for row in 0..10 {
            assert_eq!(shift_after_change(row, Some(3), 0), Some(row));
        }
    }

    #[test]
    fn rows_at_or_above_ceiling_are_fixed() {
        assert_eq!(shift_after_change(3, Some(3), -4), Some(3));
        assert_eq!(shift_after_change(0, Some(3), 5), Some(0));
    }

    #[test]
    fn deleted_rows_report_none() {
        // Collapse at 3 removing rows 4..=7.
        assert_eq!(shift_after_change(4, Some(3), -4), None);
        assert_eq!(shift_after_change(7, Some(3), -4), None);
        assert_eq!(shift_after_change(8, Some(3), -4), Some(4));
    }

    #[test]
    fn missing_ceiling_deletes_from_the_top_and_ignores_inserts() {
        assert_eq!(shift_after_change(1, None, -2), None);
        assert_eq!(shift_after_change(2, None, -2), Some(0));
        assert_eq!(shift_after_change(2, None, 3), Some(2));
    }

    #[test]
    fn move_down_and_back() {
        let mv = ItemMoved::new(5, 10, 2);
        assert_eq!(shift_for_move(5, &mv), 10);
        assert_eq!(shift_for_move(6, &mv), 11);
        assert_eq!(shift_for_move(7, &mv), 5);
        assert_eq!(shift_for_move(11, &mv), 9);
        assert_eq!(shift_for_move(12, &mv), 12);
        assert_eq!(shift_for_move(4, &mv), 4);
        for row in 0..20 {
            assert_eq!(shift_for_move(shift_for_move(row, &mv), &mv.inverse()), row);
        }
    }

    #[test]
    fn move_up_shifts_crossed_rows_down() {
        let mv = ItemMoved::new(8, 2, 3);
        assert_eq!(shift_for_move(8, &mv), 2);
        assert_eq!(shift_for_move(10, &mv), 4);
        assert_eq!(shift_for_move(2, &mv), 5);
        assert_eq!(shift_for_move(7, &mv), 10);
        assert_eq!(shift_for_move(11, &mv), 11);
    }

    #[test]
    fn deleted_tracker_falls_back_to_anchor() {
        let mut t = PositionTracker::new(6, Some(0));
        t.apply_change(&ItemCountChanged::toggle(3, 0, -4));
        assert!(t.is_deleted());
        assert_eq!(t.resolved_row(), Some(3));
        // Parent keeps shifting with later changes.
        t.apply_change(&ItemCountChanged::toggle(1, 0, 2));
        assert_eq!(t.resolved_row(), Some(5));
    }

    #[test]
    fn sub_item_changes_only_touch_their_column() {
        let ev = ItemCountChanged::toggle(2, 0, 3).with_sub_item_change(1, 1);
        let mut col0 = PositionTracker::new(5, Some(0));
        let mut col1 = PositionTracker::new(5, Some(1));
        col0.apply_change(&ev);
        col1.apply_change(&ev);
        assert_eq!(col0.end_row, Some(8));
        assert_eq!(col1.end_row, Some(6));
    }

    #[test]
    fn moves_respect_column_filter() {
        let mut mv = ItemMoved::new(0, 4, 1);
        mv.column = 1;
        mv.updates_trailing_columns = false;
        let mut t0 = PositionTracker::new(0, Some(0));
        let mut t1 = PositionTracker::new(0, Some(1));
        t0.apply_move(&mv);
        t1.apply_move(&mv);
        assert_eq!(t0.end_row, Some(0));
        assert_eq!(t1.end_row, Some(4));
    }

    struct Rows(usize);

    impl TreeSource for Rows {
        fn visible_item_count(&self) -> usize {
            self.0
        }

        fn column_count(&self) -> usize {
            3
        }

        fn item_info(&self, _: usize, native_column: usize, _: bool) -> ItemInfo {
            ItemInfo {
                blank: native_column == 0,
                ..ItemInfo::default()
            }
        }
    }

    #[test]
    fn manager_relocates_and_binds_columns() {
        let mut manager = PositionManager::new();
        manager.store("caret", PositionTracker::new(4, None));
        manager.store("gone", PositionTracker::new(2, Some(2)));
        manager.store("far", PositionTracker::new(1, Some(0)));
        assert!(manager.relocate(&"caret", Some(7), None));
        assert!(manager.relocate(&"gone", None, Some(0)));
        assert!(manager.relocate(&"far", Some(50), None));
        assert!(!manager.relocate(&"missing", Some(1), None));

        let source = Rows(10);
        assert_eq!(
            manager.retrieve_coordinate(&"caret", &source),
            Some(TreeCoordinate::new(7, 1))
        );
        assert_eq!(
            manager.retrieve_coordinate(&"gone", &source),
            Some(TreeCoordinate::new(0, 2))
        );
        assert_eq!(manager.retrieve_coordinate(&"far", &source), None);
        assert!(manager.is_empty());
    }

    #[test]
    fn manager_applies_changes_to_all() {
        let mut manager = PositionManager::new();
        manager.store(1_u32, PositionTracker::new(5, Some(0)));
        manager.store(2_u32, PositionTracker::new(1, Some(0)));
        manager.apply_change(&ItemCountChanged::items(Some(2), 0, 2));
        manager.apply_move(&ItemMoved::new(1, 0, 1));
        assert_eq!(manager.get(&1).and_then(|t| t.end_row), Some(7));
        assert_eq!(manager.get(&2).and_then(|t| t.end_row), Some(0));
        assert_eq!(manager.len(), 2);
    }
}
