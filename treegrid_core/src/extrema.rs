// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incrementally maintained widest-item cache for horizontal scroll extents.
//!
//! The cache remembers the widest visible item and the contiguous row range that
//! achieves it. After a structural change or a scroll, only rows that entered the
//! visible window are measured; the whole window is re-measured only when the cached
//! range itself was removed or scrolled away.
//!
//! Visible windows passed to the adjustment methods should include the partially
//! visible row at the bottom of the viewport.

use core::ops::Range;

/// Measures the width of a row, typically indent plus images plus label.
///
/// Takes `&mut self` so implementations can cache text measurements.
pub trait WidthMeasure {
    /// Width of `row` in pixels.
    fn item_width(&mut self, row: usize) -> f64;
}

impl<F: FnMut(usize) -> f64> WidthMeasure for F {
    fn item_width(&mut self, row: usize) -> f64 {
        self(row)
    }
}

/// The widest width over a range and the rows achieving it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WidestRange {
    /// The widest width.
    pub width: f64,
    /// First row achieving `width`.
    pub first: usize,
    /// Last row achieving `width`.
    pub last: usize,
}

/// Measures `rows` and returns the widest width with the first and last rows that
/// achieve it, or `None` for an empty range.
pub fn compute_width_of_range<M: WidthMeasure + ?Sized>(
    measure: &mut M,
    rows: Range<usize>,
) -> Option<WidestRange> {
    let mut widest: Option<WidestRange> = None;
    for row in rows {
        let width = measure.item_width(row);
        debug_assert!(
            width.is_finite(),
            "item widths must be finite; got {width:?} for row {row}"
        );
        let here = WidestRange {
            width,
            first: row,
            last: row,
        };
        widest = Some(match widest {
            Some(w) if width > w.width => here,
            Some(mut w) => {
                if width == w.width {
                    w.last = row;
                }
                w
            }
            None => here,
        });
    }
    widest
}

/// The widest known item and the row range achieving it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MaxWidthCache {
    max_width: f64,
    range: Option<(usize, usize)>,
}

impl MaxWidthCache {
    /// Creates an empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_width: 0.0,
            range: None,
        }
    }

    /// The widest known width.
    #[must_use]
    pub const fn max_width(&self) -> f64 {
        self.max_width
    }

    /// First and last rows achieving [`MaxWidthCache::max_width`], if known.
    #[must_use]
    pub const fn range(&self) -> Option<(usize, usize)> {
        self.range
    }

    /// Returns `true` if the rows achieving the width are unknown.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        self.range.is_none()
    }

    /// Forgets which rows achieve the width; the next update adopts its range.
    pub fn invalidate(&mut self) {
        self.range = None;
    }

    /// Folds a measured width for `start..=end` into the cache.
    ///
    /// A wider width (or `force_reset`) replaces the cache. An equal width widens the
    /// cached range to cover both, or adopts the new range when the cached one is
    /// unknown. A narrower width is ignored. Returns `true` if the width changed.
    pub fn update_max_width(&mut self, width: f64, start: usize, end: usize, force_reset: bool) -> bool {
        debug_assert!(start <= end, "inverted width range {start}..={end}");
        let old = self.max_width;
        if force_reset || width > self.max_width {
            self.max_width = width;
            self.range = Some((start, end));
        } else if width == self.max_width {
            self.range = Some(match self.range {
                None => (start, end),
                Some((first, last)) => (first.min(start), last.max(end)),
            });
        }
        self.max_width != old
    }

    /// Re-measures `rows` from scratch.
    pub fn reset<M: WidthMeasure + ?Sized>(&mut self, measure: &mut M, rows: Range<usize>) -> bool {
        #[cfg(feature = "tracing")]
        tracing::trace!(message = "max width reset", start = rows.start, end = rows.end);
        match compute_width_of_range(measure, rows) {
            Some(w) => self.update_max_width(w.width, w.first, w.last, true),
            None => {
                let changed = self.max_width != 0.0;
                *self = Self::new();
                changed
            }
        }
    }

    /// Clamps the cached range to `visible`. Returns `false` if the widest rows
    /// left the window entirely.
    fn keep_visible(&mut self, visible: &Range<usize>) -> bool {
        match self.range {
            Some((first, last)) if first < visible.end && last >= visible.start => {
                self.range = Some((first.max(visible.start), last.min(visible.end - 1)));
                true
            }
            Some(_) => false,
            None => true,
        }
    }

    fn fold<M: WidthMeasure + ?Sized>(&mut self, measure: &mut M, rows: Range<usize>) -> bool {
        compute_width_of_range(measure, rows)
            .is_some_and(|w| self.update_max_width(w.width, w.first, w.last, false))
    }

    /// Accounts for `added` rows inserted after `ceiling`, with `visible` the window
    /// after the change.
    pub fn adjust_for_expansion<M: WidthMeasure + ?Sized>(
        &mut self,
        measure: &mut M,
        ceiling: usize,
        added: usize,
        visible: Range<usize>,
    ) -> bool {
        if added == 0 {
            return false;
        }
        if self.is_unknown() {
            return self.reset(measure, visible);
        }
        match self.range {
            Some((first, _)) if first > ceiling => {
                self.range = self.range.map(|(f, l)| (f + added, l + added));
            }
            // The inserted rows split the cached run.
            Some((_, last)) if last > ceiling => self.range = None,
            _ => {}
        }
        if !self.keep_visible(&visible) {
            // Pushed out of the window by the inserted rows.
            return self.reset(measure, visible);
        }
        let inserted = ceiling + 1..ceiling + 1 + added;
        let touched = clip(inserted, &visible);
        let changed = self.fold(measure, touched);
        if self.is_unknown() {
            return self.reset(measure, visible) || changed;
        }
        changed
    }

    /// Accounts for `removed` rows deleted after `ceiling`, with `visible` the window
    /// after the change.
    pub fn adjust_for_collapse<M: WidthMeasure + ?Sized>(
        &mut self,
        measure: &mut M,
        ceiling: usize,
        removed: usize,
        visible: Range<usize>,
    ) -> bool {
        if removed == 0 {
            return false;
        }
        if self.is_unknown() {
            return self.reset(measure, visible);
        }
        let deleted = ceiling + 1..ceiling + 1 + removed;
        match self.range {
            Some((first, last)) if first < deleted.end && last >= deleted.start => {
                // The widest item may be gone.
                return self.reset(measure, visible);
            }
            Some((first, last)) if first > ceiling => {
                self.range = Some((first - removed, last - removed));
            }
            _ => {}
        }
        if !self.keep_visible(&visible) {
            return self.reset(measure, visible);
        }
        // Rows that slid up into the bottom of the window are new to the cache.
        let exposed = visible.end.saturating_sub(removed).max(visible.start)..visible.end;
        let changed = self.fold(measure, exposed);
        if self.is_unknown() {
            return self.reset(measure, visible) || changed;
        }
        changed
    }

    /// Accounts for the visible window moving from `old` to `new` without a
    /// structural change.
    pub fn adjust_for_scroll<M: WidthMeasure + ?Sized>(
        &mut self,
        measure: &mut M,
        old: Range<usize>,
        new: Range<usize>,
    ) -> bool {
        if old == new {
            return false;
        }
        if self.is_unknown() || !self.keep_visible(&new) {
            // The widest item scrolled away.
            return self.reset(measure, new);
        }
        let above = new.start..old.start.min(new.end).max(new.start);
        let below = old.end.max(new.start).min(new.end)..new.end;
        let mut changed = self.fold(measure, above);
        changed |= self.fold(measure, below);
        changed
    }
}

fn clip(rows: Range<usize>, bounds: &Range<usize>) -> Range<usize> {
    let start = rows.start.max(bounds.start);
    let end = rows.end.min(bounds.end);
    start..end.max(start)
}
