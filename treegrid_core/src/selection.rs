// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-selection stored as sorted inclusive row ranges.

use core::ops::RangeInclusive;

use smallvec::SmallVec;

use crate::TreeGridError;

/// A set of selected rows stored as sorted, disjoint, non-adjacent inclusive ranges.
///
/// Selecting a long run is one range regardless of its length, and a row can never be
/// present twice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionRanges {
    ranges: SmallVec<[(usize, usize); 4]>,
}

impl SelectionRanges {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a selection from arbitrary rows; duplicates collapse.
    #[must_use]
    pub fn from_indices(rows: impl IntoIterator<Item = usize>) -> Self {
        let mut selection = Self::new();
        for row in rows {
            selection.select(row);
        }
        selection
    }

    /// Returns `true` if no row is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Number of selected rows.
    #[must_use]
    pub fn count(&self) -> usize {
        self.ranges.iter().map(|(start, end)| end - start + 1).sum()
    }

    /// The stored ranges, ascending.
    pub fn ranges(&self) -> impl Iterator<Item = RangeInclusive<usize>> + '_ {
        self.ranges.iter().map(|&(start, end)| start..=end)
    }

    /// Selected rows, ascending.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.ranges().flatten()
    }

    /// Returns `true` if `row` is selected.
    #[must_use]
    pub fn contains(&self, row: usize) -> bool {
        // First range whose end is at or past `row`.
        let i = self.ranges.partition_point(|&(_, end)| end < row);
        self.ranges.get(i).is_some_and(|&(start, _)| start <= row)
    }

    /// Selects one row.
    pub fn select(&mut self, row: usize) {
        self.insert_range(row, row);
    }

    /// Deselects one row.
    pub fn deselect(&mut self, row: usize) {
        self.remove_range(row, row);
    }

    /// Flips one row and returns its new state.
    pub fn toggle(&mut self, row: usize) -> bool {
        if self.contains(row) {
            self.deselect(row);
            false
        } else {
            self.select(row);
            true
        }
    }

    /// Selects or deselects `start..=end`.
    pub fn set_range(&mut self, start: usize, end: usize, select: bool) -> Result<(), TreeGridError> {
        if start > end {
            return Err(TreeGridError::InvalidRange { start, end });
        }
        if select {
            self.insert_range(start, end);
        } else {
            self.remove_range(start, end);
        }
        Ok(())
    }

    /// Selects `0..count`.
    pub fn select_all(&mut self, count: usize) {
        self.ranges.clear();
        if count > 0 {
            self.ranges.push((0, count - 1));
        }
    }

    /// Deselects everything.
    pub fn clear(&mut self) {
        self.ranges.clear();
    }

    /// Drops every row at or past `count`.
    pub fn truncate(&mut self, count: usize) {
        if count == 0 {
            self.ranges.clear();
        } else {
            self.remove_range(count, usize::MAX);
        }
    }

    fn insert_range(&mut self, start: usize, end: usize) {
        // Ranges touching or overlapping `start..=end` merge with it.
        let first = self
            .ranges
            .partition_point(|&(_, e)| e.saturating_add(1) < start);
        let last = self
            .ranges
            .partition_point(|&(s, _)| s <= end.saturating_add(1));
        if first == last {
            self.ranges.insert(first, (start, end));
            return;
        }
        let merged = (
            start.min(self.ranges[first].0),
            end.max(self.ranges[last - 1].1),
        );
        self.ranges.drain(first + 1..last);
        self.ranges[first] = merged;
    }

    fn remove_range(&mut self, start: usize, end: usize) {
        let first = self.ranges.partition_point(|&(_, e)| e < start);
        let last = self.ranges.partition_point(|&(s, _)| s <= end);
        if first == last {
            return;
        }
        let mut kept: SmallVec<[(usize, usize); 2]> = SmallVec::new();
        let (head_start, _) = self.ranges[first];
        let (_, tail_end) = self.ranges[last - 1];
        if head_start < start {
            kept.push((head_start, start - 1));
        }
        if tail_end > end {
            kept.push((end + 1, tail_end));
        }
        self.ranges.drain(first..last);
        for (i, range) in kept.into_iter().enumerate() {
            self.ranges.insert(first + i, range);
        }
    }
}
