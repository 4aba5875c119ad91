// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural-change notifications raised by a data source.

use smallvec::SmallVec;

/// A change in the number of rows of a sub-item list hosted in one column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubItemColumnAdjustment {
    /// Native column that owns the sub-item list.
    pub column: usize,
    /// Signed change in that column's row count.
    pub change: isize,
}

/// Rows were added below, or removed from below, an anchor row.
///
/// Covers expansion, collapse, insertion, and deletion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemCountChanged {
    /// The row the change hangs off, usually the expanded or collapsed parent.
    /// `None` for root-level changes with no row above them.
    pub anchor_row: Option<usize>,
    /// Native column the change occurred in.
    pub column: usize,
    /// Signed change in the visible row count.
    pub change: isize,
    /// Blank rows that follow the anchor and are unaffected by the change.
    pub blanks_after_anchor: usize,
    /// Row-count changes of sub-item lists in other columns.
    pub sub_item_changes: SmallVec<[SubItemColumnAdjustment; 2]>,
    /// The change is the result of toggling an expansion.
    pub is_expansion_toggle: bool,
}

impl ItemCountChanged {
    /// An expansion (`change > 0`) or collapse (`change < 0`) of `anchor_row`.
    #[must_use]
    pub fn toggle(anchor_row: usize, column: usize, change: isize) -> Self {
        Self {
            anchor_row: Some(anchor_row),
            column,
            change,
            blanks_after_anchor: 0,
            sub_item_changes: SmallVec::new(),
            is_expansion_toggle: true,
        }
    }

    /// An insertion (`change > 0`) or deletion (`change < 0`) after `anchor_row`.
    #[must_use]
    pub fn items(anchor_row: Option<usize>, column: usize, change: isize) -> Self {
        Self {
            anchor_row,
            column,
            change,
            blanks_after_anchor: 0,
            sub_item_changes: SmallVec::new(),
            is_expansion_toggle: false,
        }
    }

    /// Sets the blank rows following the anchor.
    #[must_use]
    pub fn with_blanks_after_anchor(mut self, blanks: usize) -> Self {
        self.blanks_after_anchor = blanks;
        self
    }

    /// Adds a sub-item list change.
    #[must_use]
    pub fn with_sub_item_change(mut self, column: usize, change: isize) -> Self {
        self.sub_item_changes
            .push(SubItemColumnAdjustment { column, change });
        self
    }

    /// The change seen by positions tracked in native `column`.
    ///
    /// A sub-item adjustment for that column replaces the main change.
    #[must_use]
    pub fn change_for_column(&self, column: usize) -> isize {
        self.sub_item_changes
            .iter()
            .find(|adj| adj.column == column)
            .map_or(self.change, |adj| adj.change)
    }

    /// The last row that cannot move: `anchor_row + blanks_after_anchor`.
    ///
    /// Rows after the ceiling shift by `change`; rows that would shift to or
    /// above it were removed.
    #[must_use]
    pub fn change_ceiling(&self) -> Option<usize> {
        self.anchor_row.map(|row| row + self.blanks_after_anchor)
    }
}

/// A contiguous block of rows moved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemMoved {
    /// Native column the move occurred in.
    pub column: usize,
    /// First row of the block before the move.
    pub from_row: usize,
    /// First row of the block after the move.
    pub to_row: usize,
    /// Number of rows in the block.
    pub item_count: usize,
    /// Positions tracked in columns after `column` are affected too.
    pub updates_trailing_columns: bool,
}

impl ItemMoved {
    /// A move of `item_count` rows from `from_row` to `to_row` in column `0`.
    #[must_use]
    pub const fn new(from_row: usize, to_row: usize, item_count: usize) -> Self {
        Self {
            column: 0,
            from_row,
            to_row,
            item_count,
            updates_trailing_columns: true,
        }
    }

    /// Returns `true` if a position tracked in `column` moves with this change.
    #[must_use]
    pub const fn applies_to_column(&self, column: usize) -> bool {
        column == self.column || (self.updates_trailing_columns && column >= self.column)
    }

    /// The move that undoes this one.
    #[must_use]
    pub const fn inverse(&self) -> Self {
        Self {
            from_row: self.to_row,
            to_row: self.from_row,
            ..*self
        }
    }
}

/// Display data (text or images) changed for a run of rows; no structure changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayDataChanged {
    /// First affected row.
    pub start_row: usize,
    /// Number of affected rows.
    pub count: usize,
    /// Affected native column, or `None` for all columns.
    pub column: Option<usize>,
}

/// The state image of a cell was toggled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateToggled {
    /// Row of the toggled cell.
    pub row: usize,
    /// Native column of the toggled cell.
    pub column: usize,
}
