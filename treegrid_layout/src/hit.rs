// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Maps viewport points to rows, columns, and item regions.

use kurbo::Point;
use treegrid_core::{
    BlankExpansion, ColumnPermutation, DisplayColumns, DisplayData, TreeCoordinate, TreeSource,
};

use crate::{ColumnLayout, HitRegion, ItemLayout, ItemMetrics, RowViewport};

/// Per-cell measurements the hit tester cannot derive from structure alone.
pub trait ItemMeasure {
    /// Width of the label text drawn for a cell, without padding.
    fn label_width(&mut self, row: usize, native_column: usize) -> f64;

    /// Images drawn for a cell.
    fn display_data(&mut self, row: usize, native_column: usize) -> DisplayData {
        let _ = (row, native_column);
        DisplayData::default()
    }
}

impl<F: FnMut(usize, usize) -> f64> ItemMeasure for F {
    fn label_width(&mut self, row: usize, native_column: usize) -> f64 {
        self(row, native_column)
    }
}

/// The result of resolving a point.
///
/// `row` and the columns describe the cell under the point. When that cell is part
/// of a merged region, `blank` holds the region and `anchor` its owner, and `region`
/// is classified against the owner's item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitInfo {
    /// Classification of the point.
    pub region: HitRegion,
    /// Row under the point.
    pub row: Option<usize>,
    /// Display column under the point.
    pub display_column: Option<usize>,
    /// Native column under the point.
    pub native_column: Option<usize>,
    /// Owner of the merged region under the point. The column is a display column.
    pub anchor: Option<TreeCoordinate>,
    /// The merged region under the point.
    pub blank: Option<BlankExpansion>,
}

impl HitInfo {
    const fn outside(region: HitRegion) -> Self {
        Self {
            region,
            row: None,
            display_column: None,
            native_column: None,
            anchor: None,
            blank: None,
        }
    }

    /// The cell a click acts on: the region owner if any, else the cell hit.
    /// `None` when nothing actionable was hit.
    #[must_use]
    pub fn target(&self) -> Option<TreeCoordinate> {
        if self.region == HitRegion::Nowhere || self.region.is_outside() {
            return None;
        }
        self.anchor.or_else(|| {
            Some(TreeCoordinate::new(self.row?, self.display_column?))
        })
    }
}

/// Resolves viewport points against the current layout.
#[derive(Clone, Copy, Debug)]
pub struct HitTester<'a> {
    viewport: &'a RowViewport,
    columns: &'a ColumnLayout,
    metrics: &'a ItemMetrics,
    permutation: Option<&'a ColumnPermutation>,
    control_width: u32,
    horizontal_offset: f64,
}

impl<'a> HitTester<'a> {
    /// Creates a tester for a viewport `control_width` pixels wide.
    #[must_use]
    pub const fn new(
        viewport: &'a RowViewport,
        columns: &'a ColumnLayout,
        metrics: &'a ItemMetrics,
        control_width: u32,
    ) -> Self {
        Self {
            viewport,
            columns,
            metrics,
            permutation: None,
            control_width,
            horizontal_offset: 0.0,
        }
    }

    /// Maps display columns through `permutation`.
    #[must_use]
    pub const fn with_permutation(mut self, permutation: Option<&'a ColumnPermutation>) -> Self {
        self.permutation = permutation;
        self
    }

    /// Accounts for content scrolled `offset` pixels to the left.
    #[must_use]
    pub const fn with_horizontal_offset(mut self, offset: f64) -> Self {
        self.horizontal_offset = offset;
        self
    }

    /// Resolves a viewport-relative point.
    ///
    /// Points outside the viewport report the direction. Points past the last row,
    /// on a column the source does not have, or in a merged region without an
    /// owner resolve to [`HitRegion::Nowhere`].
    pub fn resolve<S, M>(&self, point: Point, source: &S, measure: &mut M) -> HitInfo
    where
        S: TreeSource + ?Sized,
        M: ItemMeasure + ?Sized,
    {
        if point.y < 0.0 {
            return HitInfo::outside(HitRegion::Above);
        }
        if point.y >= self.viewport.height() {
            return HitInfo::outside(HitRegion::Below);
        }
        if point.x < 0.0 {
            return HitInfo::outside(HitRegion::ToLeft);
        }
        if point.x >= f64::from(self.control_width) {
            return HitInfo::outside(HitRegion::ToRight);
        }
        let Some(row) = self.viewport.row_at_y(point.y) else {
            return HitInfo::outside(HitRegion::Nowhere);
        };

        let x = point.x + self.horizontal_offset;
        let span = self.columns.hit_test(self.control_width, x);
        let mut hit = HitInfo {
            row: Some(row),
            display_column: Some(span.column),
            ..HitInfo::outside(HitRegion::Nowhere)
        };
        let columns = DisplayColumns::new(self.permutation, source.column_count());
        let Some(native) = columns.native(span.column) else {
            return hit;
        };
        hit.native_column = Some(native);

        let cell = source.item_info(row, native, self.metrics.root_lines);
        let (owner_row, owner_native, left) = if cell.blank {
            let region = source.blank_expansion(row, native, self.permutation);
            hit.blank = Some(region);
            let Some(anchor) = region.anchor() else {
                return hit;
            };
            hit.anchor = Some(anchor);
            let Some(owner_native) = columns.native(anchor.column) else {
                return hit;
            };
            let left = self
                .columns
                .span(self.control_width, region.left_column, region.right_column)
                .map_or(span.left, |s| s.left);
            (anchor.row, owner_native, left)
        } else {
            (row, native, span.left)
        };

        let info = if owner_row == row && owner_native == native {
            cell
        } else {
            source.item_info(owner_row, owner_native, self.metrics.root_lines)
        };
        let display = measure.display_data(owner_row, owner_native);
        let label_width = measure.label_width(owner_row, owner_native);
        let layout = ItemLayout::compute(self.metrics, &info, &display, label_width);
        hit.region = layout.classify(x - f64::from(left));
        hit
    }
}
