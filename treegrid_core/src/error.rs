// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for rejected range and construction requests.

/// Errors returned by fallible tree-grid operations.
///
/// Only caller mistakes are reported here. Positions that stop referring to a live
/// item after a structural change are repaired in place and never become errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeGridError {
    /// A row index was outside `0..count`.
    #[error("row {row} is out of range for {count} visible rows")]
    RowOutOfRange {
        /// The rejected row.
        row: usize,
        /// The number of rows at the time of the call.
        count: usize,
    },
    /// A column index was outside `0..count`.
    #[error("column {column} is out of range for {count} columns")]
    ColumnOutOfRange {
        /// The rejected column.
        column: usize,
        /// The number of columns at the time of the call.
        count: usize,
    },
    /// A display order did not describe a set of distinct native columns.
    #[error("display order is not a valid column permutation")]
    InvalidPermutation,
    /// Column header percentages were not ascending within `(0, 1]`.
    #[error("column header percentages must ascend within (0, 1]")]
    InvalidHeaders,
    /// A multi-row selection was requested from a single-selection view.
    #[error("single-selection views select at most one row")]
    SingleSelection,
    /// A range had its start after its end.
    #[error("range {start}..={end} is inverted")]
    InvalidRange {
        /// Inclusive start.
        start: usize,
        /// Inclusive end.
        end: usize,
    },
}

impl TreeGridError {
    /// Checks that `row` addresses one of `count` rows.
    pub fn check_row(row: usize, count: usize) -> Result<(), Self> {
        if row < count {
            Ok(())
        } else {
            Err(Self::RowOutOfRange { row, count })
        }
    }

    /// Checks that `column` addresses one of `count` columns.
    pub fn check_column(column: usize, count: usize) -> Result<(), Self> {
        if column < count {
            Ok(())
        } else {
            Err(Self::ColumnOutOfRange { column, count })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TreeGridError;
    use alloc::string::ToString;

    #[test]
    fn range_checks_reject_past_the_end() {
        assert_eq!(TreeGridError::check_row(2, 3), Ok(()));
        assert_eq!(
            TreeGridError::check_row(3, 3),
            Err(TreeGridError::RowOutOfRange { row: 3, count: 3 })
        );
        assert_eq!(
            TreeGridError::check_column(0, 0),
            Err(TreeGridError::ColumnOutOfRange { column: 0, count: 0 })
        );
    }

    #[test]
    fn messages_name_the_offending_values() {
        let err = TreeGridError::InvalidRange { start: 5, end: 2 };
        assert_eq!(err.to_string(), "range 5..=2 is inverted");
    }
}
