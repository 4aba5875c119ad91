// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed per-item measurements shared by every row.

/// Pixel sizes of the elements drawn for one item.
///
/// All sizes are logical pixels and expected to be finite and non-negative.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemMetrics {
    /// Height of every row.
    pub item_height: f64,
    /// Horizontal indent per nesting level.
    pub indent_width: f64,
    /// Width of the expand/collapse glyph.
    pub glyph_width: f64,
    /// Width of the state image (for example a checkbox).
    pub state_image_width: f64,
    /// Width of the primary image.
    pub image_width: f64,
    /// Gap between the primary image and the label.
    pub image_padding: f64,
    /// Padding on each side of the label text.
    pub label_padding: f64,
    /// Items without children still reserve room for the glyph, so labels align.
    pub reserve_glyph_space: bool,
    /// Root items are drawn with lines and glyphs, as if they had a parent.
    pub root_lines: bool,
}

impl Default for ItemMetrics {
    fn default() -> Self {
        Self {
            item_height: 18.0,
            indent_width: 19.0,
            glyph_width: 16.0,
            state_image_width: 16.0,
            image_width: 16.0,
            image_padding: 3.0,
            label_padding: 2.0,
            reserve_glyph_space: true,
            root_lines: false,
        }
    }
}

impl ItemMetrics {
    /// Sets the row height.
    #[must_use]
    pub fn with_item_height(mut self, height: f64) -> Self {
        debug_assert!(height.is_finite(), "item height must be finite; got {height}");
        self.item_height = height.max(0.0);
        self
    }

    /// Sets the indent per level.
    #[must_use]
    pub fn with_indent_width(mut self, width: f64) -> Self {
        self.indent_width = width.max(0.0);
        self
    }

    /// Sets the expand/collapse glyph width.
    #[must_use]
    pub fn with_glyph_width(mut self, width: f64) -> Self {
        self.glyph_width = width.max(0.0);
        self
    }

    /// Sets the state and primary image widths.
    #[must_use]
    pub fn with_image_widths(mut self, state_image: f64, image: f64) -> Self {
        self.state_image_width = state_image.max(0.0);
        self.image_width = image.max(0.0);
        self
    }

    /// Sets the label padding.
    #[must_use]
    pub fn with_label_padding(mut self, padding: f64) -> Self {
        self.label_padding = padding.max(0.0);
        self
    }

    /// Chooses whether leaf items reserve glyph space.
    #[must_use]
    pub const fn with_reserve_glyph_space(mut self, reserve: bool) -> Self {
        self.reserve_glyph_space = reserve;
        self
    }

    /// Chooses whether root items get lines and glyphs.
    #[must_use]
    pub const fn with_root_lines(mut self, root_lines: bool) -> Self {
        self.root_lines = root_lines;
        self
    }

    /// Indent in front of an item at `level`.
    ///
    /// With root lines every level, including the root, is pushed right by one step.
    #[must_use]
    pub fn indent_for(&self, level: usize) -> f64 {
        let steps = level + usize::from(self.root_lines);
        steps as f64 * self.indent_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indent_counts_root_lines() {
        let m = ItemMetrics::default().with_indent_width(10.0);
        assert_eq!(m.indent_for(0), 0.0);
        assert_eq!(m.indent_for(3), 30.0);
        assert_eq!(m.with_root_lines(true).indent_for(0), 10.0);
    }

    #[test]
    fn negative_sizes_clamp_to_zero() {
        let m = ItemMetrics::default()
            .with_glyph_width(-4.0)
            .with_image_widths(-1.0, 12.0);
        assert_eq!(m.glyph_width, 0.0);
        assert_eq!(m.state_image_width, 0.0);
        assert_eq!(m.image_width, 12.0);
    }
}
