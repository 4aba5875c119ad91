// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Live view state and the tracker that carries it across a structural change.
//!
//! A structural change is applied in three steps:
//!
//! 1. [`ListBoxStateTracker::capture`] snapshots caret, anchor, top row, horizontal
//!    offset, and selection from the live [`ViewState`].
//! 2. [`ListBoxStateTracker::apply_change`] and [`ListBoxStateTracker::apply_move`]
//!    rewrite every tracked row. Cost depends on the number of tracked rows, not on
//!    the size of the tree.
//! 3. [`ListBoxStateTracker::restore`] replays the adjusted state onto the view once
//!    its row count has been updated.

use alloc::vec::Vec;

use crate::{
    ItemCountChanged, ItemMoved, SelectionRanges, TreeGridError, shift_after_change,
    shift_for_move,
};

/// How an extended-selection caret move treats the caret row itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ModifySelectionAction {
    /// Leave the caret row as the range logic left it.
    #[default]
    None,
    /// Select the caret row.
    Select,
    /// Deselect the caret row.
    Clear,
    /// Flip the caret row.
    Toggle,
}

/// The position and selection state a tree grid view owns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    /// Number of visible rows.
    pub item_count: usize,
    /// Focused row.
    pub caret: Option<usize>,
    /// Fixed end of range selections.
    pub anchor: Option<usize>,
    /// First row in the viewport.
    pub top: usize,
    /// Horizontal scroll offset in pixels.
    pub horizontal_offset: f64,
    /// Native column the selection belongs to.
    pub column: usize,
    /// Selected rows in `column`.
    pub selection: SelectionRanges,
}

impl ViewState {
    /// Creates state for `item_count` rows with the caret on row `0` when non-empty.
    #[must_use]
    pub fn new(item_count: usize) -> Self {
        Self {
            item_count,
            caret: (item_count > 0).then_some(0),
            ..Self::default()
        }
    }

    /// Moves the caret. Out-of-range rows are rejected.
    pub fn set_caret(&mut self, row: usize) -> Result<(), TreeGridError> {
        TreeGridError::check_row(row, self.item_count)?;
        self.caret = Some(row);
        Ok(())
    }

    /// Selects or deselects one row.
    pub fn set_selected(&mut self, row: usize, select: bool) -> Result<(), TreeGridError> {
        TreeGridError::check_row(row, self.item_count)?;
        if select {
            self.selection.select(row);
        } else {
            self.selection.deselect(row);
        }
        Ok(())
    }

    /// Selects or deselects `start..=end`.
    pub fn select_range(&mut self, start: usize, end: usize, select: bool) -> Result<(), TreeGridError> {
        TreeGridError::check_row(end, self.item_count)?;
        self.selection.set_range(start, end, select)
    }

    /// Moves the caret in extended multi-select mode.
    ///
    /// With `extend_from_anchor`, rows between the anchor and the new caret are
    /// selected. Without `preserve_selection`, rows outside that span are cleared.
    /// Returns the action actually applied to the caret row, which is
    /// [`ModifySelectionAction::None`] when `action` left it unchanged.
    pub fn set_current_extended_multi_select_index(
        &mut self,
        new_caret: usize,
        extend_from_anchor: bool,
        preserve_selection: bool,
        action: ModifySelectionAction,
    ) -> Result<ModifySelectionAction, TreeGridError> {
        TreeGridError::check_row(new_caret, self.item_count)?;
        let start_caret = self.caret.unwrap_or(0);
        let caret_initially_selected = self.selection.contains(new_caret);

        let (anchor, extend) = match (extend_from_anchor, self.anchor) {
            (true, Some(anchor)) if anchor < self.item_count => (anchor, true),
            _ => (new_caret, false),
        };

        if (anchor == new_caret && !preserve_selection) || start_caret == new_caret {
            self.selection.select(new_caret);
        } else if new_caret >= anchor && start_caret > new_caret && start_caret > anchor {
            // Shrinking toward the anchor from below.
            if preserve_selection && extend {
                self.selection.set_range(new_caret + 1, start_caret, false)?;
            }
        } else if new_caret <= anchor && start_caret < new_caret && start_caret < anchor {
            // Shrinking toward the anchor from above.
            if preserve_selection && extend {
                self.selection.set_range(start_caret, new_caret - 1, false)?;
            }
        } else {
            self.selection.set_range(
                new_caret.min(start_caret),
                new_caret.max(start_caret),
                true,
            )?;
        }

        if !preserve_selection {
            let keep_top = anchor.min(new_caret);
            let keep_bottom = anchor.max(new_caret);
            if keep_top > 0 {
                self.selection.set_range(0, keep_top - 1, false)?;
            }
            self.selection.truncate(keep_bottom + 1);
        }

        let now_selected = self.selection.contains(new_caret);
        let applied = match action {
            ModifySelectionAction::Toggle if caret_initially_selected => {
                ModifySelectionAction::Clear
            }
            ModifySelectionAction::Toggle => ModifySelectionAction::Select,
            other => other,
        };
        let applied = match applied {
            ModifySelectionAction::Clear if now_selected => {
                self.selection.deselect(new_caret);
                applied
            }
            ModifySelectionAction::Clear if !caret_initially_selected => {
                ModifySelectionAction::None
            }
            ModifySelectionAction::Select if !now_selected => {
                self.selection.select(new_caret);
                applied
            }
            ModifySelectionAction::Select if caret_initially_selected => {
                ModifySelectionAction::None
            }
            other => other,
        };

        self.anchor = Some(anchor);
        self.caret = Some(new_caret);
        Ok(applied)
    }
}

/// What [`ListBoxStateTracker::restore`] changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RestoreOutcome {
    /// Listeners must be told the selection changed.
    pub selection_changed: bool,
    /// The whole viewport must be repainted.
    pub repaint_all: bool,
    /// The caret item was replaced or relocated.
    pub caret_moved: bool,
    /// Number of selection entries dropped because their rows went away.
    pub pruned: usize,
}

/// Caret, anchor, top row, horizontal offset, and selection carried across one
/// structural-change transaction.
#[derive(Clone, Debug, PartialEq)]
pub struct ListBoxStateTracker {
    caret: Option<usize>,
    anchor: Option<usize>,
    top: Option<usize>,
    horizontal_offset: f64,
    column: usize,
    selection: Vec<Option<usize>>,
    full_visible_count: usize,
    caret_selected: bool,
    selected_caret_follows: bool,
    caret_moved: bool,
    caret_relocated: bool,
    repaint_all: bool,
}

impl ListBoxStateTracker {
    /// Snapshots `state`. `full_visible_count` is the number of rows that fit
    /// entirely in the viewport.
    #[must_use]
    pub fn capture(state: &ViewState, full_visible_count: usize) -> Self {
        Self {
            caret: state.caret,
            anchor: state.anchor,
            top: Some(state.top),
            horizontal_offset: state.horizontal_offset,
            column: state.column,
            selection: state.selection.iter().map(Some).collect(),
            full_visible_count,
            caret_selected: state.caret.is_some_and(|c| state.selection.contains(c)),
            selected_caret_follows: false,
            caret_moved: false,
            caret_relocated: false,
            repaint_all: false,
        }
    }

    /// Chooses whether a selected caret that gets relocated to its parent carries
    /// its selection along. Off by default: deleted selection entries are dropped.
    #[must_use]
    pub const fn with_selected_caret_follows(mut self, follows: bool) -> Self {
        self.selected_caret_follows = follows;
        self
    }

    /// The adjusted caret row.
    #[must_use]
    pub const fn caret(&self) -> Option<usize> {
        self.caret
    }

    /// The adjusted anchor row.
    #[must_use]
    pub const fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    /// The adjusted top row.
    #[must_use]
    pub const fn top(&self) -> Option<usize> {
        self.top
    }

    /// The adjusted selection; removed entries are `None`.
    #[must_use]
    pub fn selection(&self) -> &[Option<usize>] {
        &self.selection
    }

    /// Returns `true` if the caret item was replaced or relocated.
    #[must_use]
    pub const fn caret_moved(&self) -> bool {
        self.caret_moved
    }

    /// Returns `true` if the top row was removed and the viewport must be repainted.
    #[must_use]
    pub const fn repaint_all(&self) -> bool {
        self.repaint_all
    }

    /// Adjusts every tracked row for an expand, collapse, insert, or delete.
    ///
    /// `new_count` is the row count after the change.
    pub fn apply_change(&mut self, change: &ItemCountChanged, new_count: usize) {
        let delta = change.change_for_column(self.column);
        if delta == 0 || (change.anchor_row.is_none() && delta > 0) {
            return;
        }
        let ceiling = change.change_ceiling();

        for entry in &mut self.selection {
            *entry = entry.and_then(|row| shift_after_change(row, ceiling, delta));
        }

        if let Some(top) = self.top {
            let shifted = shift_after_change(top, ceiling, delta);
            self.top = Some(match shifted {
                Some(row) => row,
                None => {
                    self.repaint_all = true;
                    let below = ceiling.map_or(0, |c| c + 1);
                    if below < new_count {
                        below
                    } else {
                        new_count.saturating_sub(1)
                    }
                }
            });
        }
        if change.is_expansion_toggle && delta > 0 {
            self.make_room_for_expansion(change, delta);
        }

        let fallback = change.anchor_row.or((new_count > 0).then_some(0));
        if let Some(caret) = self.caret {
            match shift_after_change(caret, ceiling, delta) {
                Some(row) => {
                    self.caret = Some(row);
                    if delta > 0 && !change.is_expansion_toggle && Some(caret) == ceiling {
                        // Rows inserted after the caret's item take over the ceiling's
                        // identity for listeners even though the index is unchanged.
                        // Expanding the caret's own item keeps the caret on that item.
                        self.caret_moved = true;
                    }
                }
                None => {
                    self.caret = fallback;
                    self.caret_moved = true;
                    self.caret_relocated = true;
                }
            }
        }
        if let Some(anchor) = self.anchor {
            self.anchor = shift_after_change(anchor, ceiling, delta).or(fallback);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "tracked positions adjusted",
            ceiling = ?ceiling,
            delta,
            caret = ?self.caret,
            top = ?self.top,
            caret_moved = self.caret_moved,
            repaint_all = self.repaint_all,
        );
    }

    /// Scrolls so the children of a freshly expanded row are visible, without
    /// pushing the expanded row itself out of the top of the viewport.
    fn make_room_for_expansion(&mut self, change: &ItemCountChanged, delta: isize) {
        let (Some(anchor), Some(top)) = (change.anchor_row, self.top) else {
            return;
        };
        if anchor < top || anchor >= top + self.full_visible_count {
            return;
        }
        let below_anchor = self.full_visible_count as isize - 1 - (anchor - top) as isize;
        let space_needed = delta + change.blanks_after_anchor as isize - below_anchor;
        if space_needed > 0 {
            self.top = Some((top + space_needed.unsigned_abs()).min(anchor));
        }
    }

    /// Adjusts every tracked row for a block move in the tracked column.
    pub fn apply_move(&mut self, moved: &ItemMoved) {
        if !moved.applies_to_column(self.column) {
            return;
        }
        let shift = |row: Option<usize>| row.map(|r| shift_for_move(r, moved));
        self.caret = shift(self.caret);
        self.anchor = shift(self.anchor);
        self.top = shift(self.top);
        for entry in &mut self.selection {
            *entry = shift(*entry);
        }
    }

    /// Replays the adjusted state onto `state`, whose row count is now `current_count`.
    ///
    /// The selection is rebuilt first, then caret and anchor, then the top row, then the
    /// horizontal offset. An empty list skips caret restoration and reports a selection
    /// change instead.
    pub fn restore(&self, state: &mut ViewState, current_count: usize) -> RestoreOutcome {
        state.item_count = current_count;
        state.column = self.column;
        state.selection.clear();
        let mut pruned = 0;
        for entry in &self.selection {
            match entry {
                Some(row) if *row < current_count => state.selection.select(*row),
                _ => pruned += 1,
            }
        }

        let mut outcome = RestoreOutcome {
            selection_changed: self.caret_moved,
            repaint_all: self.repaint_all,
            caret_moved: self.caret_moved,
            pruned,
        };

        if current_count == 0 {
            state.caret = None;
            state.anchor = None;
            outcome.selection_changed = true;
        } else {
            let last = current_count - 1;
            state.caret = self.caret.map(|row| row.min(last));
            state.anchor = self.anchor.map(|row| row.min(last));
            if self.caret_relocated && self.caret_selected && self.selected_caret_follows {
                if let Some(caret) = state.caret {
                    state.selection.select(caret);
                }
            }
        }

        state.top = self
            .top
            .unwrap_or(0)
            .min(current_count.saturating_sub(1));
        state.horizontal_offset = self.horizontal_offset;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "view state restored",
            count = current_count,
            caret = ?state.caret,
            top = state.top,
            selected = state.selection.count(),
            pruned,
            selection_changed = outcome.selection_changed,
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn state(count: usize, caret: usize, selection: &[usize]) -> ViewState {
        ViewState {
            item_count: count,
            caret: Some(caret),
            anchor: Some(caret),
            selection: SelectionRanges::from_indices(selection.iter().copied()),
            ..ViewState::default()
        }
    }

    #[test]
    fn zero_change_leaves_everything_alone() {
        let live = state(10, 7, &[2, 7, 9]);
        let mut tracker = ListBoxStateTracker::capture(&live, 5);
        let before = tracker.clone();
        tracker.apply_change(&ItemCountChanged::toggle(3, 0, 0), 10);
        assert_eq!(tracker, before);
        let mut restored = live.clone();
        let outcome = tracker.restore(&mut restored, 10);
        assert_eq!(restored, live);
        assert!(!outcome.selection_changed);
    }

    #[test]
    fn collapse_relocates_deleted_caret_to_the_collapsed_row() {
        // Ten rows, caret on 7, selection {2, 7, 9}. Collapsing row 3 removes rows 4..=7.
        let mut live = state(10, 7, &[2, 7, 9]);
        let mut tracker = ListBoxStateTracker::capture(&live, 5);
        tracker.apply_change(&ItemCountChanged::toggle(3, 0, -4), 6);
        assert_eq!(tracker.caret(), Some(3));
        assert!(tracker.caret_moved());
        assert_eq!(tracker.selection(), &[Some(2), None, Some(5)]);

        let outcome = tracker.restore(&mut live, 6);
        assert_eq!(live.caret, Some(3));
        assert_eq!(live.anchor, Some(3));
        // Row 7 is dropped from the selection even though the caret lands on row 3.
        assert_eq!(live.selection.iter().collect::<Vec<_>>(), vec![2, 5]);
        assert!(outcome.selection_changed);
        assert_eq!(outcome.pruned, 1);
    }

    #[test]
    fn relocated_caret_can_carry_its_selection() {
        let mut live = state(10, 7, &[2, 7]);
        let mut tracker =
            ListBoxStateTracker::capture(&live, 5).with_selected_caret_follows(true);
        tracker.apply_change(&ItemCountChanged::toggle(3, 0, -4), 6);
        tracker.restore(&mut live, 6);
        assert_eq!(live.selection.iter().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn expansion_scrolls_to_show_children() {
        // Top 0, five fully visible rows, expand row 2 by three rows.
        let mut live = state(10, 2, &[]);
        let mut tracker = ListBoxStateTracker::capture(&live, 5);
        tracker.apply_change(&ItemCountChanged::toggle(2, 0, 3), 13);
        assert_eq!(tracker.top(), Some(1));
        let outcome = tracker.restore(&mut live, 13);
        assert_eq!(live.top, 1);
        assert_eq!(live.caret, Some(2));
        assert!(!outcome.selection_changed);
    }

    #[test]
    fn expansion_never_scrolls_the_expanded_row_out() {
        let mut live = state(30, 4, &[]);
        live.top = 2;
        let mut tracker = ListBoxStateTracker::capture(&live, 4);
        tracker.apply_change(&ItemCountChanged::toggle(4, 0, 20), 50);
        assert_eq!(tracker.top(), Some(4));
    }

    #[test]
    fn insertion_at_caret_flags_a_move_without_changing_the_row() {
        let live = state(10, 4, &[4]);
        let mut tracker = ListBoxStateTracker::capture(&live, 5);
        tracker.apply_change(&ItemCountChanged::items(Some(4), 0, 2), 12);
        assert_eq!(tracker.caret(), Some(4));
        assert!(tracker.caret_moved());

        let mut tracker = ListBoxStateTracker::capture(&live, 5);
        tracker.apply_change(&ItemCountChanged::items(Some(6), 0, 2), 12);
        assert!(!tracker.caret_moved());

        // Expanding the caret's own row adds children below the same item, so no
        // caret change is reported for it.
        let mut tracker = ListBoxStateTracker::capture(&live, 5);
        tracker.apply_change(&ItemCountChanged::toggle(4, 0, 2), 12);
        assert_eq!(tracker.caret(), Some(4));
        assert!(!tracker.caret_moved());
    }

    #[test]
    fn blanks_after_anchor_raise_the_ceiling() {
        // Row 3 is followed by two blank rows, so rows 6..=8 go when it collapses.
        let mut live = state(12, 5, &[3, 4, 6, 9]);
        live.top = 6;
        let mut tracker = ListBoxStateTracker::capture(&live, 5);
        let change = ItemCountChanged::toggle(3, 0, -3).with_blanks_after_anchor(2);
        assert_eq!(change.change_ceiling(), Some(5));
        tracker.apply_change(&change, 9);
        assert_eq!(tracker.caret(), Some(5));
        assert!(!tracker.caret_moved());
        assert_eq!(tracker.selection(), &[Some(3), Some(4), None, Some(6)]);
        assert!(tracker.repaint_all());
        assert_eq!(tracker.top(), Some(6));

        let outcome = tracker.restore(&mut live, 9);
        assert_eq!(live.selection.iter().collect::<Vec<_>>(), vec![3, 4, 6]);
        assert_eq!(live.top, 6);
        assert_eq!(outcome.pruned, 1);
        assert!(!outcome.selection_changed);

        // Without the blanks the caret's row would have been removed.
        let live = state(12, 5, &[]);
        let mut tracker = ListBoxStateTracker::capture(&live, 5);
        tracker.apply_change(&ItemCountChanged::toggle(3, 0, -3), 9);
        assert_eq!(tracker.caret(), Some(3));
        assert!(tracker.caret_moved());
    }

    #[test]
    fn blanks_after_anchor_count_toward_expansion_room() {
        // Five full rows from the top, expanding row 2 by two rows. The two rows below
        // it absorb the children alone, but one blank row after it needs one more.
        let live = state(10, 2, &[]);
        let mut tracker = ListBoxStateTracker::capture(&live, 5);
        tracker.apply_change(&ItemCountChanged::toggle(2, 0, 2), 12);
        assert_eq!(tracker.top(), Some(0));

        let mut tracker = ListBoxStateTracker::capture(&live, 5);
        tracker.apply_change(&ItemCountChanged::toggle(2, 0, 2).with_blanks_after_anchor(1), 12);
        assert_eq!(tracker.top(), Some(1));
        assert_eq!(tracker.caret(), Some(2));
    }

    #[test]
    fn unanchored_insertion_is_ignored() {
        let live = state(10, 4, &[4, 6]);
        let mut tracker = ListBoxStateTracker::capture(&live, 5);
        let before = tracker.clone();
        tracker.apply_change(&ItemCountChanged::items(None, 0, 3), 13);
        assert_eq!(tracker, before);
    }

    #[test]
    fn deleted_top_forces_repaint_and_clamps() {
        let mut live = state(20, 0, &[]);
        live.top = 6;
        let mut tracker = ListBoxStateTracker::capture(&live, 5);
        tracker.apply_change(&ItemCountChanged::toggle(3, 0, -10), 10);
        assert!(tracker.repaint_all());
        assert_eq!(tracker.top(), Some(4));

        // Below the end after the change: clamp to the last row.
        let mut tracker = ListBoxStateTracker::capture(&live, 5);
        tracker.apply_change(&ItemCountChanged::toggle(3, 0, -16), 4);
        assert_eq!(tracker.top(), Some(3));
    }

    #[test]
    fn move_shifts_all_tracked_rows() {
        let mut live = state(20, 7, &[5, 7, 12]);
        live.top = 8;
        let mut tracker = ListBoxStateTracker::capture(&live, 5);
        tracker.apply_move(&ItemMoved::new(5, 10, 2));
        assert_eq!(tracker.caret(), Some(5));
        assert_eq!(tracker.top(), Some(6));
        assert_eq!(tracker.selection(), &[Some(10), Some(5), Some(12)]);
        tracker.restore(&mut live, 20);
        assert_eq!(live.selection.iter().collect::<Vec<_>>(), vec![5, 10, 12]);
    }

    #[test]
    fn restoring_an_empty_list_reports_a_selection_change() {
        let mut live = state(3, 1, &[1]);
        let mut tracker = ListBoxStateTracker::capture(&live, 5);
        tracker.apply_change(&ItemCountChanged::items(None, 0, -3), 0);
        let outcome = tracker.restore(&mut live, 0);
        assert!(outcome.selection_changed);
        assert_eq!(live.caret, None);
        assert!(live.selection.is_empty());
        assert_eq!(live.top, 0);
    }

    #[test]
    fn extended_select_extends_from_anchor() {
        let mut live = ViewState::new(10);
        live.set_current_extended_multi_select_index(2, false, false, ModifySelectionAction::Select)
            .unwrap();
        assert_eq!(live.anchor, Some(2));
        live.set_current_extended_multi_select_index(5, true, false, ModifySelectionAction::Select)
            .unwrap();
        assert_eq!(live.selection.iter().collect::<Vec<_>>(), vec![2, 3, 4, 5]);
        assert_eq!(live.anchor, Some(2));
        assert_eq!(live.caret, Some(5));

        // Shrink back toward the anchor.
        live.set_current_extended_multi_select_index(3, true, false, ModifySelectionAction::Select)
            .unwrap();
        assert_eq!(live.selection.iter().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn extended_select_toggle_preserves_other_rows() {
        let mut live = ViewState::new(10);
        live.set_current_extended_multi_select_index(1, false, false, ModifySelectionAction::Select)
            .unwrap();
        let applied = live
            .set_current_extended_multi_select_index(6, false, true, ModifySelectionAction::Toggle)
            .unwrap();
        assert_eq!(applied, ModifySelectionAction::Select);
        assert_eq!(live.selection.iter().collect::<Vec<_>>(), vec![1, 6]);
        let applied = live
            .set_current_extended_multi_select_index(6, false, true, ModifySelectionAction::Toggle)
            .unwrap();
        assert_eq!(applied, ModifySelectionAction::Clear);
        assert_eq!(live.selection.iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn out_of_range_rows_are_rejected() {
        let mut live = ViewState::new(3);
        assert_eq!(
            live.set_caret(3),
            Err(TreeGridError::RowOutOfRange { row: 3, count: 3 })
        );
        assert!(live.set_selected(5, true).is_err());
        assert!(
            live.set_current_extended_multi_select_index(9, false, false, ModifySelectionAction::None)
                .is_err()
        );
    }
}
