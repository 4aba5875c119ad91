// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row-granular vertical scrolling over uniformly tall rows.

use core::ops::Range;

use kurbo::Rect;

/// Alignment mode when scrolling a specific row into view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollAlign {
    /// Put the row at the top of the viewport.
    Start,
    /// Center the row within the viewport.
    Center,
    /// Put the row on the last fully visible line.
    End,
    /// Move just enough to make the row fully visible.
    #[default]
    Nearest,
}

/// Vertical viewport that scrolls by whole rows.
///
/// The viewport shows rows starting at [`RowViewport::top_row`]. The last row may be
/// cut off; [`RowViewport::full_visible_count`] counts only rows shown entirely, while
/// [`RowViewport::visible_range`] includes the partial one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowViewport {
    item_count: usize,
    item_height: f64,
    height: f64,
    top_row: usize,
}

impl RowViewport {
    /// Creates a viewport `height` pixels tall over `item_count` rows of `item_height`.
    #[must_use]
    pub fn new(item_count: usize, item_height: f64, height: f64) -> Self {
        Self {
            item_count,
            item_height: item_height.max(0.0),
            height: height.max(0.0),
            top_row: 0,
        }
    }

    /// Number of rows.
    #[must_use]
    pub const fn item_count(&self) -> usize {
        self.item_count
    }

    /// Sets the number of rows, clamping the top row. Returns `true` if the top moved.
    pub fn set_item_count(&mut self, count: usize) -> bool {
        self.item_count = count;
        self.set_top_row(self.top_row)
    }

    /// Row height.
    #[must_use]
    pub const fn item_height(&self) -> f64 {
        self.item_height
    }

    /// Sets the row height.
    pub fn set_item_height(&mut self, height: f64) {
        debug_assert!(height.is_finite(), "row heights must be finite; got {height}");
        self.item_height = height.max(0.0);
        self.set_top_row(self.top_row);
    }

    /// Viewport height.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Sets the viewport height.
    pub fn set_height(&mut self, height: f64) {
        debug_assert!(height.is_finite(), "viewport height must be finite; got {height}");
        self.height = height.max(0.0);
        self.set_top_row(self.top_row);
    }

    /// First row in the viewport.
    #[must_use]
    pub const fn top_row(&self) -> usize {
        self.top_row
    }

    /// Sets the first row, clamped to [`RowViewport::max_top`]. Returns `true` if it moved.
    pub fn set_top_row(&mut self, row: usize) -> bool {
        let row = self.clamp_top(row);
        let changed = row != self.top_row;
        self.top_row = row;
        changed
    }

    /// Scrolls by `rows` (negative scrolls up). Returns `true` if the top moved.
    pub fn scroll_by(&mut self, rows: isize) -> bool {
        self.set_top_row(self.top_row.saturating_add_signed(rows))
    }

    /// Number of rows that fit entirely in the viewport.
    #[must_use]
    pub fn full_visible_count(&self) -> usize {
        if self.item_height <= 0.0 {
            return 0;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "A non-negative ratio truncates to its floor"
        )]
        let rows = (self.height / self.item_height) as usize;
        rows
    }

    /// Rows drawn in the viewport, including a partially visible last row.
    #[must_use]
    pub fn visible_range(&self) -> Range<usize> {
        let full = self.full_visible_count();
        let partial = usize::from(full as f64 * self.item_height < self.height);
        let end = self
            .top_row
            .saturating_add(full + partial)
            .min(self.item_count);
        self.top_row.min(end)..end
    }

    /// Largest top row that still fills the viewport.
    #[must_use]
    pub fn max_top(&self) -> usize {
        self.item_count
            .saturating_sub(self.full_visible_count().max(1))
    }

    /// Clamps a candidate top row.
    #[must_use]
    pub fn clamp_top(&self, row: usize) -> usize {
        row.min(self.max_top())
    }

    /// The row under viewport-relative `y`, or `None` outside the rows.
    #[must_use]
    pub fn row_at_y(&self, y: f64) -> Option<usize> {
        if !(0.0..self.height).contains(&y) || self.item_height <= 0.0 {
            return None;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "A non-negative ratio truncates to its floor"
        )]
        let offset = (y / self.item_height) as usize;
        let row = self.top_row + offset;
        (row < self.item_count).then_some(row)
    }

    /// Viewport-relative top edge of `row`; negative above the viewport.
    #[must_use]
    pub fn y_of_row(&self, row: usize) -> f64 {
        (row as f64 - self.top_row as f64) * self.item_height
    }

    /// Viewport-relative bounds of `row`, `width` pixels wide.
    #[must_use]
    pub fn row_rect(&self, row: usize, width: f64) -> Rect {
        let y = self.y_of_row(row);
        Rect::new(0.0, y, width, y + self.item_height)
    }

    /// Returns `true` if `row` is shown entirely.
    #[must_use]
    pub fn is_row_fully_visible(&self, row: usize) -> bool {
        row < self.item_count
            && row >= self.top_row
            && row - self.top_row < self.full_visible_count()
    }

    /// Returns `true` if any part of `row` is shown.
    #[must_use]
    pub fn is_row_partially_visible(&self, row: usize) -> bool {
        self.visible_range().contains(&row)
    }

    /// Scrolls so that `row` is shown using `align`. Returns `true` if the top moved.
    pub fn scroll_to_row(&mut self, row: usize, align: ScrollAlign) -> bool {
        if self.item_count == 0 {
            return self.set_top_row(0);
        }
        let row = row.min(self.item_count - 1);
        let full = self.full_visible_count().max(1);
        let top = match align {
            ScrollAlign::Start => row,
            ScrollAlign::End => (row + 1).saturating_sub(full),
            ScrollAlign::Center => row.saturating_sub((full - 1) / 2),
            ScrollAlign::Nearest => {
                if row < self.top_row {
                    row
                } else if row - self.top_row >= full {
                    row + 1 - full
                } else {
                    self.top_row
                }
            }
        };
        self.set_top_row(top)
    }

    /// Scrolls the minimum needed to show `row` entirely. Returns `true` if the top moved.
    pub fn scroll_into_view(&mut self, row: usize) -> bool {
        self.scroll_to_row(row, ScrollAlign::Nearest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_row_counts_as_visible_not_full() {
        // 55px of 10px rows: five full rows and half of a sixth.
        let mut vp = RowViewport::new(100, 10.0, 55.0);
        assert_eq!(vp.full_visible_count(), 5);
        assert_eq!(vp.visible_range(), 0..6);
        vp.set_top_row(3);
        assert_eq!(vp.visible_range(), 3..9);
        assert!(vp.is_row_fully_visible(7));
        assert!(!vp.is_row_fully_visible(8));
        assert!(vp.is_row_partially_visible(8));
    }

    #[test]
    fn top_clamps_to_keep_viewport_full() {
        let mut vp = RowViewport::new(12, 10.0, 50.0);
        assert_eq!(vp.max_top(), 7);
        assert!(vp.set_top_row(100));
        assert_eq!(vp.top_row(), 7);
        assert_eq!(vp.visible_range(), 7..12);
        // Shrinking the list drags the top along.
        assert!(vp.set_item_count(6));
        assert_eq!(vp.top_row(), 1);
        assert!(vp.scroll_by(-5));
        assert_eq!(vp.top_row(), 0);
    }

    #[test]
    fn row_mapping() {
        let mut vp = RowViewport::new(20, 10.0, 50.0);
        vp.set_top_row(4);
        assert_eq!(vp.row_at_y(0.0), Some(4));
        assert_eq!(vp.row_at_y(19.9), Some(5));
        assert_eq!(vp.row_at_y(-1.0), None);
        assert_eq!(vp.row_at_y(50.0), None);
        assert_eq!(vp.y_of_row(6), 20.0);
        assert_eq!(vp.y_of_row(2), -20.0);
        assert_eq!(vp.row_rect(5, 80.0), Rect::new(0.0, 10.0, 80.0, 20.0));

        let short = RowViewport::new(2, 10.0, 50.0);
        assert_eq!(short.row_at_y(25.0), None);
    }

    #[test]
    fn scroll_to_row_alignment() {
        let mut vp = RowViewport::new(30, 10.0, 50.0);
        assert!(vp.scroll_to_row(10, ScrollAlign::Start));
        assert_eq!(vp.top_row(), 10);
        vp.scroll_to_row(10, ScrollAlign::End);
        assert_eq!(vp.top_row(), 6);
        vp.scroll_to_row(10, ScrollAlign::Center);
        assert_eq!(vp.top_row(), 8);
        // Already fully visible: nothing moves.
        assert!(!vp.scroll_into_view(11));
        assert!(vp.scroll_into_view(13));
        assert_eq!(vp.top_row(), 9);
        assert!(vp.scroll_into_view(2));
        assert_eq!(vp.top_row(), 2);
        // Near the end the top clamps.
        vp.scroll_to_row(29, ScrollAlign::Start);
        assert_eq!(vp.top_row(), 25);
    }
}
