// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Source-independent structural navigation built on [`TreeSource::item_info`].

use crate::{ColumnPermutation, DisplayColumns, TreeCoordinate, TreeNavigation, TreeSource};

/// Computes a navigation target by walking rows and columns of `source`.
///
/// Landing on a merged region yields its owner cell. Regions with no owner are
/// skipped. Returns `None` when there is nowhere to go.
pub fn default_navigation_target<S: TreeSource + ?Sized>(
    source: &S,
    direction: TreeNavigation,
    from: TreeCoordinate,
    permutation: Option<&ColumnPermutation>,
) -> Option<TreeCoordinate> {
    let columns = DisplayColumns::new(permutation, source.column_count());
    let count = source.visible_item_count();
    let native = columns.native(from.column)?;
    if from.row >= count {
        return None;
    }
    let region = source.blank_expansion(from.row, native, permutation);
    let land = |row: usize, display: usize| {
        let native = columns.native(display)?;
        source.blank_expansion(row, native, permutation).anchor()
    };
    let level_at = |row: usize| source.item_info(row, native, false).level;
    let info = source.item_info(from.row, native, false);
    let level = info.level;

    match direction {
        TreeNavigation::Up => (0..region.top_row)
            .rev()
            .find_map(|row| land(row, from.column)),
        TreeNavigation::Down => (region.bottom_row + 1..count).find_map(|row| land(row, from.column)),
        TreeNavigation::LeftColumn => (0..region.left_column)
            .rev()
            .find_map(|column| land(from.row, column)),
        TreeNavigation::RightColumn => (region.right_column + 1..columns.visible_count())
            .find_map(|column| land(from.row, column)),
        TreeNavigation::Left => {
            default_navigation_target(source, TreeNavigation::LeftColumn, from, permutation)
                .or_else(|| {
                    default_navigation_target(source, TreeNavigation::Parent, from, permutation)
                })
        }
        TreeNavigation::Right => {
            default_navigation_target(source, TreeNavigation::RightColumn, from, permutation)
                .or_else(|| {
                    default_navigation_target(source, TreeNavigation::FirstChild, from, permutation)
                })
        }
        TreeNavigation::Parent | TreeNavigation::ComplexParent => {
            if level == 0 {
                return None;
            }
            let skip_blanks = direction == TreeNavigation::ComplexParent;
            (0..from.row)
                .rev()
                .find(|&row| {
                    let info = source.item_info(row, native, false);
                    info.level < level && !(skip_blanks && info.blank)
                })
                .map(|row| TreeCoordinate::new(row, from.column))
        }
        TreeNavigation::FirstChild => {
            let child = from.row + 1;
            (info.expanded && child < count && level_at(child) == level + 1)
                .then(|| TreeCoordinate::new(child, from.column))
        }
        TreeNavigation::LastChild => {
            if !info.expanded {
                return None;
            }
            (from.row + 1..count)
                .take_while(|&row| level_at(row) > level)
                .filter(|&row| level_at(row) == level + 1)
                .last()
                .map(|row| TreeCoordinate::new(row, from.column))
        }
        TreeNavigation::NextSibling => {
            if info.last_in_branch {
                return None;
            }
            (from.row + 1..count)
                .map(|row| (row, level_at(row)))
                .take_while(|&(_, l)| l >= level)
                .find(|&(_, l)| l == level)
                .map(|(row, _)| TreeCoordinate::new(row, from.column))
        }
        TreeNavigation::PreviousSibling => {
            if info.first_in_branch {
                return None;
            }
            (0..from.row)
                .rev()
                .map(|row| (row, level_at(row)))
                .take_while(|&(_, l)| l >= level)
                .find(|&(_, l)| l == level)
                .map(|(row, _)| TreeCoordinate::new(row, from.column))
        }
    }
}
