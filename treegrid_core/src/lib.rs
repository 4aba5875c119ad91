// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Treegrid Core: position bookkeeping for virtualized tree grids.
//!
//! A tree grid shows a flattened, scrollable view of a hierarchy with several
//! columns. Rows come and go as branches expand and collapse, and every row index
//! the view holds (caret, anchor, top row, selection, cached measurements) must be
//! rewritten when that happens. This crate holds that bookkeeping, independent of
//! any widget toolkit:
//!
//! - [`TreeSource`]: the contract a data source implements, plus the capability
//!   flags ([`BranchFeatures`]) that select behavior through lookup tables.
//! - [`ColumnPermutation`]: display order, hidden columns, and the preferred side
//!   for resolving merged cells.
//! - [`resolve_blank_expansion`]: finds the merged region containing a cell and the
//!   cell that owns it.
//! - [`PositionTracker`] and [`PositionManager`]: single rows carried across
//!   [`ItemCountChanged`] and [`ItemMoved`] events.
//! - [`ListBoxStateTracker`]: the whole [`ViewState`] carried across a change, then
//!   restored in one step.
//! - [`ListShuffle`]: state carried across a list shuffle by object identity.
//! - [`MaxWidthCache`]: the widest visible row, adjusted incrementally.
//!
//! ## Minimal example
//!
//! Collapsing a branch that contains the caret:
//!
//! ```rust
//! use treegrid_core::{ItemCountChanged, ListBoxStateTracker, SelectionRanges, ViewState};
//!
//! let mut state = ViewState::new(10);
//! state.caret = Some(7);
//! state.selection = SelectionRanges::from_indices([2, 9]);
//!
//! let mut tracker = ListBoxStateTracker::capture(&state, 5);
//! // Row 3 collapses, removing rows 4..=7.
//! tracker.apply_change(&ItemCountChanged::toggle(3, 0, -4), 6);
//! let outcome = tracker.restore(&mut state, 6);
//!
//! assert_eq!(state.caret, Some(3));
//! assert_eq!(state.selection.iter().collect::<Vec<_>>(), [2, 5]);
//! assert!(outcome.caret_moved);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod blank;
mod columns;
mod error;
mod events;
mod extrema;
mod navigation;
mod selection;
mod shuffle;
mod source;
mod state;
mod tracker;

pub use blank::{BlankExpansion, resolve_blank_expansion};
pub use columns::{BlankSide, ColumnPermutation, DisplayColumns};
pub use error::TreeGridError;
pub use events::{
    DisplayDataChanged, ItemCountChanged, ItemMoved, StateToggled, SubItemColumnAdjustment,
};
pub use extrema::{MaxWidthCache, WidestRange, WidthMeasure, compute_width_of_range};
pub use navigation::default_navigation_target;
pub use selection::SelectionRanges;
pub use shuffle::ListShuffle;
pub use source::{
    BlankAxis, BranchFeatures, BranchId, CollapsePolicy, DisplayData, ItemInfo,
    LabelEditTrigger, MouseEditStyle, TreeCoordinate, TreeNavigation, TreeSource,
};
pub use state::{ListBoxStateTracker, ModifySelectionAction, RestoreOutcome, ViewState};
pub use tracker::{PositionManager, PositionTracker, shift_after_change, shift_for_move};
