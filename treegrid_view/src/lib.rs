// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Treegrid View: a headless virtualized tree grid.
//!
//! [`TreeGridView`] ties the pieces together. It keeps caret, anchor, selection, and
//! scroll position valid while the data source expands, collapses, inserts, deletes,
//! moves, and reindexes rows; it answers hit tests and navigation; and it drives the
//! mouse, type-ahead, and label-edit state machines. Painting and the data itself
//! stay with the host.
//!
//! ```rust
//! use treegrid_core::{ItemCountChanged, ItemInfo, TreeSource};
//! use treegrid_input::ManualClock;
//! use treegrid_view::{TreeGridView, ViewConfig, ViewNotification};
//!
//! // A source whose row count the host updates before notifying the view.
//! struct Rows(usize);
//!
//! impl TreeSource for Rows {
//!     fn visible_item_count(&self) -> usize {
//!         self.0
//!     }
//!
//!     fn item_info(&self, _: usize, _: usize, _: bool) -> ItemInfo {
//!         ItemInfo::default()
//!     }
//! }
//!
//! let clock = ManualClock::new();
//! let config = ViewConfig::default().with_viewport_size(300, 90.0);
//! let mut view: TreeGridView<_> = TreeGridView::new(&clock, config, 10, 1);
//! view.set_current_index(7).unwrap();
//! view.take_notifications();
//!
//! // Row 3 collapses, hiding rows 4..=7. The caret falls back to row 3.
//! let mut width = |_: usize| 120.0;
//! view.item_count_changed(&Rows(6), &ItemCountChanged::toggle(3, 0, -4), &mut width);
//! assert_eq!(view.current_index(), Some(3));
//! assert!(view.take_notifications().contains(&ViewNotification::SelectionChanged));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod notification;
mod view;

pub use config::{SelectionMode, ViewConfig};
pub use notification::ViewNotification;
pub use view::TreeGridView;
