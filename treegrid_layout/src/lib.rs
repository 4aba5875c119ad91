// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Treegrid Layout: pixel geometry for virtualized tree grids.
//!
//! Rows are uniformly tall and scroll by whole rows. Columns are divided by a
//! [`ColumnLayout`]: a single column, equal columns, or [`ColumnHeaderBounds`] built
//! from fixed and proportional headers. Within a cell, an item is laid out left to
//! right as indent, expand glyph, state image, image, and label ([`ItemLayout`]).
//!
//! [`HitTester`] combines these with a [`TreeSource`](treegrid_core::TreeSource) to
//! map a viewport point to a row, a display and native column, and a
//! [`HitRegion`]. Points inside merged cells are classified against the cell that
//! owns the region.
//!
//! ```rust
//! use kurbo::Point;
//! use treegrid_core::{ItemInfo, TreeSource};
//! use treegrid_layout::{ColumnLayout, HitRegion, HitTester, ItemMetrics, RowViewport};
//!
//! struct Flat;
//!
//! impl TreeSource for Flat {
//!     fn visible_item_count(&self) -> usize {
//!         100
//!     }
//!
//!     fn item_info(&self, _: usize, _: usize, _: bool) -> ItemInfo {
//!         ItemInfo::default()
//!     }
//! }
//!
//! let metrics = ItemMetrics::default().with_item_height(20.0);
//! let mut viewport = RowViewport::new(100, metrics.item_height, 200.0);
//! viewport.set_top_row(10);
//! let columns = ColumnLayout::Single;
//!
//! let tester = HitTester::new(&viewport, &columns, &metrics, 300);
//! let hit = tester.resolve(Point::new(280.0, 45.0), &Flat, &mut |_: usize, _: usize| 40.0);
//! assert_eq!(hit.row, Some(12));
//! assert_eq!(hit.region, HitRegion::RightOfLabel);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod headers;
mod hit;
mod item_layout;
mod metrics;
mod viewport;

pub use headers::{ColumnHeader, ColumnHeaderBounds, ColumnLayout, ColumnSpan, MIN_COLUMN_WIDTH};
pub use hit::{HitInfo, HitTester, ItemMeasure};
pub use item_layout::{HitRegion, ItemLayout, ItemSegment};
pub use metrics::ItemMetrics;
pub use viewport::{RowViewport, ScrollAlign};
