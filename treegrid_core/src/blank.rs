// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Merged ("blank") cell regions and the resolver that finds their owner.

use crate::{BlankAxis, BlankSide, ColumnPermutation, DisplayColumns, TreeCoordinate, TreeSource};

/// A rectangular region of cells that all display one owner cell's content.
///
/// Columns are display columns. `anchor_column` is `None` when the whole region is
/// structurally empty; otherwise it lies in `left_column..=right_column` and
/// `(top_row, anchor_column)` is the owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlankExpansion {
    /// First row of the region.
    pub top_row: usize,
    /// Last row of the region (inclusive).
    pub bottom_row: usize,
    /// First display column of the region.
    pub left_column: usize,
    /// Last display column of the region (inclusive).
    pub right_column: usize,
    /// Display column of the owner cell on `top_row`.
    pub anchor_column: Option<usize>,
}

impl BlankExpansion {
    /// A one-cell region owned by itself.
    #[must_use]
    pub const fn single(row: usize, column: usize) -> Self {
        Self {
            top_row: row,
            bottom_row: row,
            left_column: column,
            right_column: column,
            anchor_column: Some(column),
        }
    }

    /// The owner cell, if any.
    #[must_use]
    pub fn anchor(&self) -> Option<TreeCoordinate> {
        self.anchor_column
            .map(|column| TreeCoordinate::new(self.top_row, column))
    }

    /// Returns `true` if the cell lies inside the region.
    #[must_use]
    pub const fn contains(&self, row: usize, column: usize) -> bool {
        row >= self.top_row
            && row <= self.bottom_row
            && column >= self.left_column
            && column <= self.right_column
    }

    /// Number of rows spanned.
    #[must_use]
    pub const fn row_span(&self) -> usize {
        self.bottom_row - self.top_row + 1
    }

    /// Number of columns spanned.
    #[must_use]
    pub const fn column_span(&self) -> usize {
        self.right_column - self.left_column + 1
    }

    /// Returns `true` if the region is larger than one cell.
    #[must_use]
    pub const fn is_merged(&self) -> bool {
        self.row_span() > 1 || self.column_span() > 1
    }
}

/// Cell classification used while walking a row or column.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Cell {
    Content,
    Horizontal,
    Vertical,
}

struct Walker<'a, S: TreeSource + ?Sized> {
    source: &'a S,
    columns: DisplayColumns<'a>,
    rows: usize,
}

impl<S: TreeSource + ?Sized> Walker<'_, S> {
    fn cell(&self, row: usize, display: usize) -> Cell {
        let Some(native) = self.columns.native(display) else {
            return Cell::Content;
        };
        let info = self.source.item_info(row, native, false);
        match (info.blank, info.blank_axis) {
            (false, _) => Cell::Content,
            (true, BlankAxis::Horizontal) => Cell::Horizontal,
            (true, BlankAxis::Vertical) => Cell::Vertical,
        }
    }

    fn level(&self, row: usize, display: usize) -> usize {
        self.columns
            .native(display)
            .map_or(0, |native| self.source.item_info(row, native, false).level)
    }

    /// Returns `true` if `row` continues a vertical blank at `level` in `display`.
    fn continues(&self, row: usize, display: usize, level: usize) -> bool {
        self.cell(row, display) == Cell::Vertical && self.level(row, display) == level
    }

    /// Walks from `display` toward `side` over horizontal blanks. Returns the first
    /// column that is not a horizontal blank, or the last blank before the edge.
    fn walk(&self, row: usize, display: usize, side: BlankSide) -> (usize, bool) {
        let last = self.columns.visible_count().saturating_sub(1);
        let mut column = display;
        loop {
            let next = match side {
                BlankSide::Left if column > 0 => column - 1,
                BlankSide::Right if column < last => column + 1,
                _ => return (column, false),
            };
            column = next;
            if self.cell(row, column) != Cell::Horizontal {
                return (column, true);
            }
        }
    }

    /// Finds the owner of a horizontal blank on `row`, preferring `side`.
    fn horizontal_owner(&self, row: usize, display: usize, side: BlankSide) -> Option<usize> {
        let (column, found) = self.walk(row, display, side);
        if found {
            return Some(column);
        }
        let (column, found) = self.walk(row, display, side.flip());
        found.then_some(column)
    }

    /// Extends a region of horizontal blanks around `column` on `row`.
    fn horizontal_extent(&self, row: usize, column: usize, side: BlankSide) -> (usize, usize) {
        let last = self.columns.visible_count().saturating_sub(1);
        let mut left = column;
        while left > 0 && self.cell(row, left - 1) == Cell::Horizontal {
            left -= 1;
        }
        let mut right = column;
        while right < last && self.cell(row, right + 1) == Cell::Horizontal {
            right += 1;
        }
        // Blanks on the non-preferred side belong to another owner unless their run
        // reaches the edge.
        match side {
            BlankSide::Left => (if left == 0 { 0 } else { column }, right),
            BlankSide::Right => (left, if right == last { last } else { column }),
        }
    }

    /// Extends a region downward over vertical blanks of the same branch level.
    fn bottom_row(&self, top: usize, display: usize, level: usize) -> usize {
        let mut bottom = top;
        while bottom + 1 < self.rows && self.continues(bottom + 1, display, level) {
            bottom += 1;
        }
        bottom
    }
}

/// Resolves the merged region containing `(row, native_column)`.
///
/// Horizontal blanks are resolved along the row, toward the permutation's preferred
/// [`BlankSide`] first. Vertical blanks are resolved upward to the first row that is
/// not a vertical blank, without leaving the branch level of the starting cell. A
/// hidden or out-of-range column resolves to a one-cell region.
pub fn resolve_blank_expansion<S: TreeSource + ?Sized>(
    source: &S,
    row: usize,
    native_column: usize,
    permutation: Option<&ColumnPermutation>,
) -> BlankExpansion {
    let columns = DisplayColumns::new(permutation, source.column_count());
    let rows = source.visible_item_count();
    let Some(display) = columns.display(native_column) else {
        return BlankExpansion::single(row, native_column);
    };
    if row >= rows {
        return BlankExpansion::single(row, display);
    }
    let walker = Walker {
        source,
        columns,
        rows,
    };
    let side = columns.blank_side();

    let level = walker.level(row, display);
    let mut top = row;
    while top > 0
        && walker.cell(top, display) == Cell::Vertical
        && walker.level(top - 1, display) == level
    {
        top -= 1;
    }
    let top_cell = walker.cell(top, display);
    let anchor = match top_cell {
        Cell::Content => Some(display),
        Cell::Horizontal => walker.horizontal_owner(top, display, side),
        // Nothing above at this level owns it.
        Cell::Vertical => None,
    };

    let (left_column, right_column) = match (anchor, top_cell) {
        (Some(owner), _) => walker.horizontal_extent(top, owner, side),
        (None, Cell::Horizontal) => walker.horizontal_extent(top, display, side),
        (None, _) => (display, display),
    };
    let bottom_row = walker.bottom_row(top, display, level);

    BlankExpansion {
        top_row: top,
        bottom_row,
        left_column,
        right_column,
        anchor_column: anchor,
    }
}
