// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests: arbitrary inserts, deletes, selections, and scrolls keep the view
//! consistent with the rows it shows.

use proptest::prelude::*;
use treegrid_core::{ItemCountChanged, ItemInfo, TreeSource};
use treegrid_input::ManualClock;
use treegrid_view::{TreeGridView, ViewConfig};

struct Rows(usize);

impl TreeSource for Rows {
    fn visible_item_count(&self) -> usize {
        self.0
    }

    fn item_info(&self, _: usize, _: usize, _: bool) -> ItemInfo {
        ItemInfo::default()
    }
}

#[derive(Clone, Debug)]
enum Op {
    Insert { anchor: Option<usize>, widths: Vec<u16> },
    Delete { anchor: Option<usize>, count: usize },
    Select(usize),
    Scroll(isize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (
            proptest::option::of(0_usize..64),
            proptest::collection::vec(1_u16..400, 1..8),
        )
            .prop_map(|(anchor, widths)| Op::Insert { anchor, widths }),
        (proptest::option::of(0_usize..64), 1_usize..8)
            .prop_map(|(anchor, count)| Op::Delete { anchor, count }),
        (0_usize..64).prop_map(Op::Select),
        (-6_isize..6).prop_map(Op::Scroll),
    ]
}

/// Applies `op` to the width model and returns the matching change, if any.
fn apply(model: &mut Vec<f64>, op: &Op) -> Option<ItemCountChanged> {
    let len = model.len();
    match op {
        Op::Insert { anchor, widths } => {
            let widths = widths.iter().map(|&w| f64::from(w));
            let added = widths.len() as isize;
            match anchor.filter(|_| len > 0).map(|a| a % len) {
                Some(anchor) => {
                    for (offset, width) in widths.enumerate() {
                        model.insert(anchor + 1 + offset, width);
                    }
                    Some(ItemCountChanged::items(Some(anchor), 0, added))
                }
                None => {
                    model.extend(widths);
                    Some(ItemCountChanged::items(None, 0, added))
                }
            }
        }
        Op::Delete { anchor, count } => match anchor.filter(|_| len > 0).map(|a| a % len) {
            Some(anchor) => {
                let count = (*count).min(len - 1 - anchor);
                if count == 0 {
                    return None;
                }
                model.drain(anchor + 1..anchor + 1 + count);
                Some(ItemCountChanged::items(Some(anchor), 0, -(count as isize)))
            }
            None => {
                let count = (*count).min(len);
                if count == 0 {
                    return None;
                }
                model.drain(..count);
                Some(ItemCountChanged::items(None, 0, -(count as isize)))
            }
        },
        Op::Select(_) | Op::Scroll(_) => None,
    }
}

proptest! {
    #[test]
    fn view_state_stays_inside_the_rows(
        initial in proptest::collection::vec(1_u16..400, 0..30),
        ops in proptest::collection::vec(op(), 1..25),
    ) {
        let mut model: Vec<f64> = initial.iter().map(|&w| f64::from(w)).collect();
        let clock = ManualClock::new();
        // Five full rows and a partial sixth.
        let config = ViewConfig::default().with_viewport_size(300, 100.0);
        let mut view: TreeGridView<_> = TreeGridView::new(&clock, config, model.len(), 1);
        {
            let mut measure = |row: usize| model[row];
            view.update_extent(&mut measure);
        }

        for op in &ops {
            if let Some(change) = apply(&mut model, op) {
                let mut measure = |row: usize| model[row];
                view.item_count_changed(&Rows(model.len()), &change, &mut measure);
            }
            match *op {
                Op::Select(row) if row < model.len() => {
                    view.set_selected(row, true).unwrap();
                }
                Op::Scroll(rows) => {
                    view.scroll_by(rows);
                }
                _ => {}
            }

            let count = model.len();
            prop_assert_eq!(view.item_count(), count);
            if count == 0 {
                prop_assert_eq!(view.current_index(), None);
            }
            prop_assert!(view.current_index().is_none_or(|row| row < count));
            prop_assert!(view.anchor_index().is_none_or(|row| row < count));
            prop_assert!(view.selected_indices().all(|row| row < count));
            prop_assert!(view.top_index() <= view.viewport().max_top());
            prop_assert_eq!(view.top_index(), view.viewport().top_row());

            let mut measure = |row: usize| model[row];
            view.update_extent(&mut measure);
            let widest = model[view.viewport().visible_range()]
                .iter()
                .copied()
                .fold(0.0, f64::max);
            prop_assert_eq!(view.max_width(), widest);
            view.take_notifications();
        }
    }
}
