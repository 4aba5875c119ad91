// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Native ⇄ display column mapping.

use smallvec::SmallVec;

use crate::TreeGridError;

/// The side a blank cell looks toward first when searching for its owner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlankSide {
    /// Blank cells repeat the nearest non-blank cell to their left.
    #[default]
    Left,
    /// Blank cells repeat the nearest non-blank cell to their right.
    Right,
}

impl BlankSide {
    /// The opposite side.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Reordering and hiding of native columns for display.
///
/// Display columns are dense `0..visible_count()`; every display column maps to a
/// distinct native column. Native columns that are not displayed are hidden.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnPermutation {
    display_to_native: SmallVec<[usize; 8]>,
    native_to_display: SmallVec<[Option<usize>; 8]>,
    blank_side: BlankSide,
}

impl ColumnPermutation {
    /// Creates a permutation that shows all `native_count` columns in native order.
    #[must_use]
    pub fn identity(native_count: usize) -> Self {
        Self {
            display_to_native: (0..native_count).collect(),
            native_to_display: (0..native_count).map(Some).collect(),
            blank_side: BlankSide::Left,
        }
    }

    /// Creates a permutation from a display order of native columns.
    ///
    /// Native columns missing from `display_order` are hidden. The order must be
    /// non-empty, in range, and free of duplicates.
    pub fn from_order(native_count: usize, display_order: &[usize]) -> Result<Self, TreeGridError> {
        if display_order.is_empty() {
            return Err(TreeGridError::InvalidPermutation);
        }
        let mut native_to_display: SmallVec<[Option<usize>; 8]> =
            core::iter::repeat_n(None, native_count).collect();
        for (display, &native) in display_order.iter().enumerate() {
            TreeGridError::check_column(native, native_count)?;
            if native_to_display[native].replace(display).is_some() {
                return Err(TreeGridError::InvalidPermutation);
            }
        }
        Ok(Self {
            display_to_native: display_order.iter().copied().collect(),
            native_to_display,
            blank_side: BlankSide::Left,
        })
    }

    /// Sets the side blank cells look toward first.
    #[must_use]
    pub fn with_blank_side(mut self, side: BlankSide) -> Self {
        self.blank_side = side;
        self
    }

    /// Number of native columns, shown or hidden.
    #[must_use]
    pub fn native_count(&self) -> usize {
        self.native_to_display.len()
    }

    /// Number of displayed columns.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.display_to_native.len()
    }

    /// Native columns in display order.
    #[must_use]
    pub fn display_order(&self) -> &[usize] {
        &self.display_to_native
    }

    /// The native column shown at `display`, if any.
    #[must_use]
    pub fn native_column(&self, display: usize) -> Option<usize> {
        self.display_to_native.get(display).copied()
    }

    /// The display position of `native`, or `None` if it is hidden or out of range.
    #[must_use]
    pub fn display_column(&self, native: usize) -> Option<usize> {
        self.native_to_display.get(native).copied().flatten()
    }

    /// The side blank cells look toward first.
    #[must_use]
    pub const fn blank_side(&self) -> BlankSide {
        self.blank_side
    }

    /// Sets the side blank cells look toward first.
    pub fn set_blank_side(&mut self, side: BlankSide) {
        self.blank_side = side;
    }

    /// Returns `true` if blank cells anchor toward the left.
    #[must_use]
    pub fn prefer_left_blanks(&self) -> bool {
        self.blank_side == BlankSide::Left
    }

    /// Moves the column at display position `from` to display position `to`.
    pub fn move_column(&mut self, from: usize, to: usize) -> Result<(), TreeGridError> {
        let count = self.visible_count();
        TreeGridError::check_column(from, count)?;
        TreeGridError::check_column(to, count)?;
        if from != to {
            let native = self.display_to_native.remove(from);
            self.display_to_native.insert(to, native);
            self.rebuild_inverse();
        }
        Ok(())
    }

    /// Hides a native column. Hiding an already hidden column does nothing.
    ///
    /// The last displayed column cannot be hidden.
    pub fn hide_native(&mut self, native: usize) -> Result<(), TreeGridError> {
        TreeGridError::check_column(native, self.native_count())?;
        let Some(display) = self.native_to_display[native] else {
            return Ok(());
        };
        if self.visible_count() == 1 {
            return Err(TreeGridError::InvalidPermutation);
        }
        self.display_to_native.remove(display);
        self.rebuild_inverse();
        Ok(())
    }

    /// Shows a hidden native column at display position `at` (clamped to the end).
    ///
    /// Showing a displayed column moves it to `at`.
    pub fn show_native(&mut self, native: usize, at: usize) -> Result<(), TreeGridError> {
        TreeGridError::check_column(native, self.native_count())?;
        if let Some(display) = self.native_to_display[native] {
            self.display_to_native.remove(display);
        }
        let at = at.min(self.display_to_native.len());
        self.display_to_native.insert(at, native);
        self.rebuild_inverse();
        Ok(())
    }

    fn rebuild_inverse(&mut self) {
        self.native_to_display.iter_mut().for_each(|slot| *slot = None);
        for (display, &native) in self.display_to_native.iter().enumerate() {
            self.native_to_display[native] = Some(display);
        }
    }
}

/// Column mapping through an optional [`ColumnPermutation`].
///
/// Without a permutation, native and display columns are identical.
#[derive(Clone, Copy, Debug)]
pub struct DisplayColumns<'a> {
    permutation: Option<&'a ColumnPermutation>,
    native_count: usize,
}

impl<'a> DisplayColumns<'a> {
    /// Wraps `permutation` for a source with `native_count` columns.
    #[must_use]
    pub const fn new(permutation: Option<&'a ColumnPermutation>, native_count: usize) -> Self {
        Self {
            permutation,
            native_count,
        }
    }

    /// Number of displayed columns.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.permutation
            .map_or(self.native_count, ColumnPermutation::visible_count)
    }

    /// The native column at `display`.
    #[must_use]
    pub fn native(&self, display: usize) -> Option<usize> {
        match self.permutation {
            Some(p) => p.native_column(display),
            None => (display < self.native_count).then_some(display),
        }
    }

    /// The display column of `native`.
    #[must_use]
    pub fn display(&self, native: usize) -> Option<usize> {
        match self.permutation {
            Some(p) => p.display_column(native),
            None => (native < self.native_count).then_some(native),
        }
    }

    /// The side blank cells look toward first.
    #[must_use]
    pub fn blank_side(&self) -> BlankSide {
        self.permutation
            .map_or(BlankSide::Left, ColumnPermutation::blank_side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_maps_both_ways() {
        let p = ColumnPermutation::identity(3);
        assert_eq!(p.native_column(2), Some(2));
        assert_eq!(p.display_column(1), Some(1));
        assert_eq!(p.native_column(3), None);
        assert!(p.prefer_left_blanks());
    }

    #[test]
    fn from_order_hides_missing_columns() {
        let p = ColumnPermutation::from_order(4, &[2, 0, 3]).unwrap();
        assert_eq!(p.visible_count(), 3);
        assert_eq!(p.native_column(0), Some(2));
        assert_eq!(p.display_column(3), Some(2));
        assert_eq!(p.display_column(1), None);
    }

    #[test]
    fn from_order_rejects_duplicates_and_range_errors() {
        assert_eq!(
            ColumnPermutation::from_order(3, &[0, 0]),
            Err(TreeGridError::InvalidPermutation)
        );
        assert_eq!(
            ColumnPermutation::from_order(3, &[0, 3]),
            Err(TreeGridError::ColumnOutOfRange { column: 3, count: 3 })
        );
        assert_eq!(
            ColumnPermutation::from_order(3, &[]),
            Err(TreeGridError::InvalidPermutation)
        );
    }

    #[test]
    fn move_hide_show_keep_inverse_consistent() {
        let mut p = ColumnPermutation::identity(4);
        p.move_column(0, 3).unwrap();
        assert_eq!(p.display_order(), &[1, 2, 3, 0]);
        assert_eq!(p.display_column(0), Some(3));

        p.hide_native(2).unwrap();
        assert_eq!(p.display_order(), &[1, 3, 0]);
        assert_eq!(p.display_column(2), None);
        assert_eq!(p.display_column(0), Some(2));

        p.show_native(2, 0).unwrap();
        assert_eq!(p.display_order(), &[2, 1, 3, 0]);
        for display in 0..p.visible_count() {
            let native = p.native_column(display).unwrap();
            assert_eq!(p.display_column(native), Some(display));
        }
    }

    #[test]
    fn last_column_cannot_be_hidden() {
        let mut p = ColumnPermutation::from_order(2, &[1]).unwrap();
        assert_eq!(p.hide_native(0), Ok(()));
        assert_eq!(p.hide_native(1), Err(TreeGridError::InvalidPermutation));
    }

    #[test]
    fn display_columns_without_permutation_is_identity() {
        let cols = DisplayColumns::new(None, 2);
        assert_eq!(cols.visible_count(), 2);
        assert_eq!(cols.native(1), Some(1));
        assert_eq!(cols.display(2), None);
        assert_eq!(cols.blank_side(), BlankSide::Left);

        let p = ColumnPermutation::identity(2).with_blank_side(BlankSide::Right);
        assert_eq!(DisplayColumns::new(Some(&p), 2).blank_side(), BlankSide::Right);
    }
}
