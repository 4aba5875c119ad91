// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column boundaries from header definitions.
//!
//! A header is either fixed (a pixel width) or proportional (an ending percentage of
//! the space left over by fixed columns, with a minimum pixel width). As the control
//! narrows, proportional columns drop to their minimum one at a time, in the order
//! given by their thresholds, and the remaining percentage is spread over the rest.

use core::num::NonZeroUsize;

use smallvec::SmallVec;
use treegrid_core::TreeGridError;

/// Smallest width a fixed column can be set to.
pub const MIN_COLUMN_WIDTH: u32 = 4;

/// One column header.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnHeader {
    /// Ending percentage in `(0, 1]` for proportional columns, `0.0` for fixed ones.
    pub percentage: f32,
    /// Width of a fixed column, or the minimum width of a proportional one.
    pub width: u32,
    /// The width may be changed after construction.
    pub adjustable: bool,
}

impl ColumnHeader {
    /// A fixed, adjustable column.
    #[must_use]
    pub const fn fixed(width: u32) -> Self {
        Self {
            percentage: 0.0,
            width,
            adjustable: true,
        }
    }

    /// A proportional column ending at `percentage` with a minimum width.
    #[must_use]
    pub const fn proportional(percentage: f32, min_width: u32) -> Self {
        Self {
            percentage,
            width: min_width,
            adjustable: true,
        }
    }

    /// Sets whether the width may change.
    #[must_use]
    pub const fn with_adjustable(mut self, adjustable: bool) -> Self {
        self.adjustable = adjustable;
        self
    }

    /// Returns `true` for fixed columns.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.percentage == 0.0
    }
}

/// A column and its horizontal extent in whole pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColumnSpan {
    /// Display column (the leftmost one for multi-column spans).
    pub column: usize,
    /// Left edge.
    pub left: u32,
    /// Width.
    pub width: u32,
}

impl ColumnSpan {
    /// Right edge (exclusive).
    #[must_use]
    pub const fn right(&self) -> u32 {
        self.left + self.width
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Bound {
    header: usize,
    /// Available width at or below which the column sits at its minimum.
    threshold: f32,
    incremental: f32,
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Pixel positions are rounded to the nearest whole pixel"
)]
fn round_px(x: f32) -> u32 {
    (x + 0.5) as u32
}

/// Validated headers plus the thresholds used to size proportional columns.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnHeaderBounds {
    headers: SmallVec<[ColumnHeader; 8]>,
    bounds: SmallVec<[Bound; 8]>,
    total_fixed: u32,
}

impl ColumnHeaderBounds {
    /// Validates `headers`: at least one, with proportional percentages ascending
    /// within `(0, 1]`.
    pub fn new(headers: &[ColumnHeader]) -> Result<Self, TreeGridError> {
        if headers.is_empty() {
            return Err(TreeGridError::InvalidHeaders);
        }
        let mut prev = 0.0;
        for header in headers.iter().filter(|h| !h.is_fixed()) {
            if !(header.percentage > prev && header.percentage <= 1.0) {
                return Err(TreeGridError::InvalidHeaders);
            }
            prev = header.percentage;
        }
        let mut bounds = Self {
            headers: headers.iter().copied().collect(),
            bounds: SmallVec::new(),
            total_fixed: 0,
        };
        bounds.recalculate();
        Ok(bounds)
    }

    fn recalculate(&mut self) {
        self.total_fixed = self
            .headers
            .iter()
            .filter(|h| h.is_fixed())
            .map(|h| h.width)
            .sum();
        self.bounds.clear();
        let mut prev = 0.0;
        for (header, h) in self.headers.iter().enumerate() {
            if h.is_fixed() {
                continue;
            }
            let incremental = h.percentage - prev;
            prev = h.percentage;
            self.bounds.push(Bound {
                header,
                threshold: h.width as f32 / incremental,
                incremental,
            });
        }
        // First to reach its minimum comes first.
        self.bounds
            .sort_unstable_by(|a, b| b.threshold.total_cmp(&a.threshold));

        // Once a column is pinned at its minimum, the percentages of the others
        // apply to what is left, which raises their thresholds.
        let Some((first, rest)) = self.bounds.split_first_mut() else {
            return;
        };
        let mut total_min = self.headers[first.header].width as f32;
        let mut remaining = 1.0 - first.incremental;
        for bound in rest {
            let min = self.headers[bound.header].width as f32;
            bound.threshold = total_min + min * remaining / bound.incremental;
            remaining -= bound.incremental;
            total_min += min;
        }
    }

    /// The headers, in display order.
    #[must_use]
    pub fn headers(&self) -> &[ColumnHeader] {
        &self.headers
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Always `false`; construction rejects empty header lists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Total width the columns need at `control_width`.
    ///
    /// Equal to `control_width` when proportional columns fill it exactly, larger
    /// when a horizontal scrollbar is needed, smaller when only fixed columns exist
    /// and leave a blank strip.
    #[must_use]
    pub fn required_width(&self, control_width: u32) -> u32 {
        let Some(last) = self.bounds.last() else {
            return self.total_fixed;
        };
        let available = control_width as f32 - self.total_fixed as f32;
        if available <= last.threshold {
            round_px(self.total_fixed as f32 + last.threshold)
        } else {
            control_width
        }
    }

    /// Unrounded width of every column at `control_width`.
    #[must_use]
    pub fn column_widths(&self, control_width: u32) -> SmallVec<[f32; 8]> {
        let mut widths: SmallVec<[f32; 8]> =
            self.headers.iter().map(|h| h.width as f32).collect();
        if self.bounds.is_empty() {
            return widths;
        }
        let mut pinned: SmallVec<[bool; 8]> = SmallVec::from_elem(false, self.headers.len());
        let available = control_width as f32 - self.total_fixed as f32;
        let mut proportional_width = available;
        let mut base = 1.0;
        for bound in &self.bounds {
            if available > bound.threshold {
                break;
            }
            base -= bound.incremental;
            proportional_width -= widths[bound.header];
            pinned[bound.header] = true;
        }
        let mut prev = 0.0;
        for (i, header) in self.headers.iter().enumerate() {
            if header.is_fixed() {
                continue;
            }
            if !pinned[i] {
                widths[i] = (header.percentage - prev) / base * proportional_width;
            }
            prev = header.percentage;
        }
        widths
    }

    /// Left edge and width of display columns `left..=right`, rounded to whole
    /// pixels. Returns `None` for an empty or out-of-range span.
    #[must_use]
    pub fn column_bounds(&self, control_width: u32, left: usize, right: usize) -> Option<ColumnSpan> {
        if left > right || right >= self.headers.len() {
            return None;
        }
        let widths = self.column_widths(control_width);
        let float_left: f32 = widths[..left].iter().sum();
        let float_right = float_left + widths[left..=right].iter().sum::<f32>();
        let px_left = if left == 0 { 0 } else { round_px(float_left) };
        Some(ColumnSpan {
            column: left,
            left: px_left,
            width: round_px(float_right).saturating_sub(px_left),
        })
    }

    /// The column containing `x`, with its rounded bounds.
    ///
    /// Points past the last boundary belong to the last column, which then extends
    /// to `control_width`.
    #[must_use]
    pub fn column_hit_test(&self, control_width: u32, x: f64) -> ColumnSpan {
        let widths = self.column_widths(control_width);
        let mut total = 0.0_f32;
        let mut prev = 0.0_f32;
        for (column, width) in widths.iter().enumerate() {
            prev = total;
            total += width;
            let edge = round_px(total);
            if x < f64::from(edge) {
                let left = round_px(prev);
                return ColumnSpan {
                    column,
                    left,
                    width: edge - left,
                };
            }
        }
        let left = round_px(prev);
        ColumnSpan {
            column: widths.len() - 1,
            left,
            width: control_width.saturating_sub(left),
        }
    }

    /// Sets the width of an adjustable fixed column, no narrower than
    /// [`MIN_COLUMN_WIDTH`]. Returns `Ok(true)` if the width changed.
    pub fn set_fixed_width(&mut self, column: usize, width: u32) -> Result<bool, TreeGridError> {
        TreeGridError::check_column(column, self.headers.len())?;
        let header = &mut self.headers[column];
        if !header.is_fixed() || !header.adjustable {
            return Ok(false);
        }
        let width = width.max(MIN_COLUMN_WIDTH);
        if width == header.width {
            return Ok(false);
        }
        header.width = width;
        self.recalculate();
        Ok(true)
    }
}

/// How a row's width is divided into display columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ColumnLayout {
    /// One column spanning the control.
    #[default]
    Single,
    /// Equal columns; the last absorbs the rounding remainder.
    Uniform(NonZeroUsize),
    /// Columns sized by headers.
    Headers(ColumnHeaderBounds),
}

impl ColumnLayout {
    /// Number of display columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        match self {
            Self::Single => 1,
            Self::Uniform(count) => count.get(),
            Self::Headers(bounds) => bounds.len(),
        }
    }

    /// Total width of all columns at `control_width`.
    #[must_use]
    pub fn content_width(&self, control_width: u32) -> u32 {
        match self {
            Self::Single | Self::Uniform(_) => control_width,
            Self::Headers(bounds) => bounds.required_width(control_width),
        }
    }

    fn uniform_width(control_width: u32, count: NonZeroUsize) -> u32 {
        let count = u32::try_from(count.get()).unwrap_or(u32::MAX);
        control_width / count
    }

    /// Bounds of display columns `left..=right`, or `None` if out of range.
    #[must_use]
    pub fn span(&self, control_width: u32, left: usize, right: usize) -> Option<ColumnSpan> {
        if left > right || right >= self.column_count() {
            return None;
        }
        match self {
            Self::Single => Some(ColumnSpan {
                column: 0,
                left: 0,
                width: control_width,
            }),
            Self::Uniform(count) => {
                let width = Self::uniform_width(control_width, *count);
                let px = |column: usize| u32::try_from(column).map_or(u32::MAX, |c| c.saturating_mul(width));
                let end = if right + 1 == count.get() {
                    control_width
                } else {
                    px(right + 1)
                };
                Some(ColumnSpan {
                    column: left,
                    left: px(left),
                    width: end.saturating_sub(px(left)),
                })
            }
            Self::Headers(bounds) => bounds.column_bounds(control_width, left, right),
        }
    }

    /// The display column containing content-space `x`. Points past the end belong
    /// to the last column.
    #[must_use]
    pub fn hit_test(&self, control_width: u32, x: f64) -> ColumnSpan {
        match self {
            Self::Single => ColumnSpan {
                column: 0,
                left: 0,
                width: control_width,
            },
            Self::Uniform(count) => {
                let width = Self::uniform_width(control_width, *count);
                let last = count.get() - 1;
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "The column is clamped to the last column right after the cast"
                )]
                let column = if width == 0 {
                    last
                } else {
                    ((x.max(0.0) / f64::from(width)) as usize).min(last)
                };
                self.span(control_width, column, column).unwrap_or_default()
            }
            Self::Headers(bounds) => bounds.column_hit_test(control_width, x),
        }
    }
}
