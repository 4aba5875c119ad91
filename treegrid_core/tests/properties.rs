// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for row bookkeeping invariants.

use std::collections::BTreeSet;

use proptest::prelude::*;
use treegrid_core::{
    ItemCountChanged, ItemMoved, ListBoxStateTracker, MaxWidthCache, SelectionRanges, ViewState,
    shift_after_change, shift_for_move,
};

fn valid_move() -> impl Strategy<Value = (usize, ItemMoved)> {
    (1_usize..40).prop_flat_map(|len| {
        (1..=len).prop_flat_map(move |count| {
            (0..=len - count, 0..=len - count)
                .prop_map(move |(from, to)| (len, ItemMoved::new(from, to, count)))
        })
    })
}

fn view_state() -> impl Strategy<Value = ViewState> {
    (1_usize..50).prop_flat_map(|count| {
        (
            0..count,
            0..count,
            proptest::collection::btree_set(0..count, 0..10),
        )
            .prop_map(move |(caret, top, selected)| ViewState {
                item_count: count,
                caret: Some(caret),
                anchor: Some(caret),
                top,
                selection: SelectionRanges::from_indices(selected),
                ..ViewState::default()
            })
    })
}

proptest! {
    #[test]
    fn zero_change_never_moves_a_row(row in 0_usize..1000, ceiling in proptest::option::of(0_usize..1000)) {
        prop_assert_eq!(shift_after_change(row, ceiling, 0), Some(row));
    }

    #[test]
    fn collapse_deletes_exactly_the_hidden_rows(row in 0_usize..100, ceiling in 0_usize..50, removed in 1_usize..20) {
        let shifted = shift_after_change(row, Some(ceiling), -(removed as isize));
        if row <= ceiling {
            prop_assert_eq!(shifted, Some(row));
        } else if row <= ceiling + removed {
            prop_assert_eq!(shifted, None);
        } else {
            prop_assert_eq!(shifted, Some(row - removed));
        }
    }

    #[test]
    fn expand_then_collapse_round_trips(row in 0_usize..100, ceiling in 0_usize..50, added in 1_usize..20) {
        let change = added as isize;
        let expanded = shift_after_change(row, Some(ceiling), change);
        prop_assert!(expanded.is_some());
        let restored = expanded.and_then(|r| shift_after_change(r, Some(ceiling), -change));
        prop_assert_eq!(restored, Some(row));
    }

    #[test]
    fn moves_permute_rows_and_invert((len, moved) in valid_move()) {
        let after: BTreeSet<usize> = (0..len).map(|row| shift_for_move(row, &moved)).collect();
        prop_assert_eq!(after.len(), len);
        prop_assert!(after.iter().all(|&row| row < len));
        for row in 0..len {
            let back = shift_for_move(shift_for_move(row, &moved), &moved.inverse());
            prop_assert_eq!(back, row);
        }
    }

    #[test]
    fn untouched_state_restores_exactly(state in view_state()) {
        let count = state.item_count;
        let mut tracker = ListBoxStateTracker::capture(&state, 5);
        tracker.apply_change(&ItemCountChanged::toggle(0, 0, 0), count);
        let mut restored = state.clone();
        let outcome = tracker.restore(&mut restored, count);
        prop_assert_eq!(restored, state);
        prop_assert_eq!(outcome.pruned, 0);
    }

    #[test]
    fn restored_rows_are_in_range(state in view_state(), anchor in 0_usize..50, change in -20_isize..20) {
        let count = state.item_count;
        let anchor = anchor.min(count - 1);
        let after_anchor = (count - 1 - anchor) as isize;
        let change = change.max(-after_anchor);
        let new_count = count.saturating_add_signed(change);

        let mut tracker = ListBoxStateTracker::capture(&state, 5);
        tracker.apply_change(&ItemCountChanged::toggle(anchor, 0, change), new_count);
        let mut restored = state.clone();
        tracker.restore(&mut restored, new_count);

        prop_assert!(restored.caret.is_some_and(|c| c < new_count));
        prop_assert!(restored.top < new_count.max(1));
        prop_assert!(restored.selection.iter().all(|row| row < new_count));
    }

    #[test]
    fn max_width_only_grows_without_reset(widths in proptest::collection::vec(0.0_f64..500.0, 1..40)) {
        let mut cache = MaxWidthCache::new();
        let mut widest = 0.0_f64;
        for (row, width) in widths.into_iter().enumerate() {
            cache.update_max_width(width, row, row, false);
            widest = widest.max(width);
            prop_assert!(cache.max_width() >= width);
            prop_assert_eq!(cache.max_width(), widest);
        }
    }

    #[test]
    fn selection_matches_a_set_model(ops in proptest::collection::vec((0_usize..64, 0_u8..3), 0..80)) {
        let mut ranges = SelectionRanges::new();
        let mut model = BTreeSet::new();
        for (row, op) in ops {
            match op {
                0 => {
                    ranges.select(row);
                    model.insert(row);
                }
                1 => {
                    ranges.deselect(row);
                    model.remove(&row);
                }
                _ => {
                    let now = ranges.toggle(row);
                    if !model.remove(&row) {
                        model.insert(row);
                    }
                    prop_assert_eq!(now, model.contains(&row));
                }
            }
        }
        prop_assert_eq!(ranges.iter().collect::<Vec<_>>(), model.iter().copied().collect::<Vec<_>>());
        prop_assert_eq!(ranges.count(), model.len());
    }
}
