// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Horizontal segments of one rendered item.

use smallvec::SmallVec;
use treegrid_core::{DisplayData, ItemInfo};

use crate::ItemMetrics;

/// Where a point falls relative to the grid and the item under it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HitRegion {
    /// No actionable target: past the last row, a hidden column, or an empty
    /// merged region.
    #[default]
    Nowhere,
    /// Above the viewport.
    Above,
    /// Below the viewport.
    Below,
    /// Left of the viewport.
    ToLeft,
    /// Right of the viewport.
    ToRight,
    /// Indentation in front of the item.
    Indent,
    /// The expand/collapse glyph.
    Glyph,
    /// The state image.
    StateIcon,
    /// The primary image.
    Icon,
    /// The label text, including its padding.
    Label,
    /// Empty space after the label.
    RightOfLabel,
}

impl HitRegion {
    /// Returns `true` for the four regions outside the viewport.
    #[must_use]
    pub const fn is_outside(self) -> bool {
        matches!(self, Self::Above | Self::Below | Self::ToLeft | Self::ToRight)
    }

    /// Returns `true` for the parts of an item that select it when clicked.
    #[must_use]
    pub const fn is_on_item(self) -> bool {
        matches!(self, Self::StateIcon | Self::Icon | Self::Label)
    }
}

/// One element of an item and its half-open horizontal extent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemSegment {
    /// The element.
    pub region: HitRegion,
    /// Left edge, relative to the item's left edge.
    pub start: f64,
    /// Right edge (exclusive).
    pub end: f64,
}

/// The elements of one item laid out left to right.
///
/// Segments are contiguous from `0.0` and never overlap. Elements the item does
/// not have take no space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemLayout {
    segments: SmallVec<[ItemSegment; 5]>,
}

impl ItemLayout {
    /// Lays out an item with the given structure, images, and measured label width.
    ///
    /// Simple cells show only a label. Otherwise the item is indented by level;
    /// expandable items get a glyph, and leaves reserve its width as indent when
    /// [`ItemMetrics::reserve_glyph_space`] is set.
    #[must_use]
    pub fn compute(
        metrics: &ItemMetrics,
        info: &ItemInfo,
        display: &DisplayData,
        label_width: f64,
    ) -> Self {
        let mut layout = Self::default();
        if !info.simple_cell {
            let mut indent = metrics.indent_for(info.level);
            if !info.expandable && metrics.reserve_glyph_space {
                indent += metrics.glyph_width;
            }
            layout.push(HitRegion::Indent, indent);
            if info.expandable {
                layout.push(HitRegion::Glyph, metrics.glyph_width);
            }
            if display.state_image.is_some() {
                layout.push(HitRegion::StateIcon, metrics.state_image_width);
            }
            if display.image.is_some() {
                layout.push(HitRegion::Icon, metrics.image_width + metrics.image_padding);
            }
        }
        layout.push(
            HitRegion::Label,
            label_width.max(0.0) + 2.0 * metrics.label_padding,
        );
        layout
    }

    fn push(&mut self, region: HitRegion, width: f64) {
        if width <= 0.0 {
            return;
        }
        let start = self.width();
        self.segments.push(ItemSegment {
            region,
            start,
            end: start + width,
        });
    }

    /// The segments, left to right.
    #[must_use]
    pub fn segments(&self) -> &[ItemSegment] {
        &self.segments
    }

    /// Right edge of the label.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.segments.last().map_or(0.0, |s| s.end)
    }

    /// The extent of `region`, if the item has it.
    #[must_use]
    pub fn bounds_of(&self, region: HitRegion) -> Option<(f64, f64)> {
        self.segments
            .iter()
            .find(|s| s.region == region)
            .map(|s| (s.start, s.end))
    }

    /// Classifies an item-relative `x`.
    ///
    /// Everything at or past the label's right edge is [`HitRegion::RightOfLabel`];
    /// negative or NaN offsets are [`HitRegion::Nowhere`].
    #[must_use]
    pub fn classify(&self, x: f64) -> HitRegion {
        if x.is_nan() || x < 0.0 {
            return HitRegion::Nowhere;
        }
        self.segments
            .iter()
            .find(|s| x < s.end)
            .map_or(HitRegion::RightOfLabel, |s| s.region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> ItemMetrics {
        ItemMetrics {
            indent_width: 10.0,
            glyph_width: 8.0,
            state_image_width: 12.0,
            image_width: 16.0,
            image_padding: 2.0,
            label_padding: 1.0,
            ..ItemMetrics::default()
        }
    }

    #[test]
    fn full_item_segments_in_order() {
        let info = ItemInfo {
            level: 2,
            expandable: true,
            ..ItemInfo::default()
        };
        let display = DisplayData {
            image: Some(0),
            state_image: Some(1),
        };
        let layout = ItemLayout::compute(&metrics(), &info, &display, 30.0);
        let regions: SmallVec<[HitRegion; 5]> = layout.segments().iter().map(|s| s.region).collect();
        assert_eq!(
            regions.as_slice(),
            [
                HitRegion::Indent,
                HitRegion::Glyph,
                HitRegion::StateIcon,
                HitRegion::Icon,
                HitRegion::Label
            ]
        );
        assert_eq!(layout.bounds_of(HitRegion::Glyph), Some((20.0, 28.0)));
        assert_eq!(layout.bounds_of(HitRegion::Label), Some((58.0, 90.0)));
        assert_eq!(layout.classify(19.9), HitRegion::Indent);
        assert_eq!(layout.classify(28.0), HitRegion::StateIcon);
        assert_eq!(layout.classify(90.0), HitRegion::RightOfLabel);
        assert_eq!(layout.classify(-1.0), HitRegion::Nowhere);
    }

    #[test]
    fn absent_elements_take_no_space() {
        let info = ItemInfo::default();
        let layout = ItemLayout::compute(&metrics(), &info, &DisplayData::default(), 20.0);
        // A root leaf: reserved glyph space becomes indent, then the label.
        assert_eq!(layout.bounds_of(HitRegion::Indent), Some((0.0, 8.0)));
        assert_eq!(layout.bounds_of(HitRegion::Glyph), None);
        assert_eq!(layout.bounds_of(HitRegion::StateIcon), None);
        assert_eq!(layout.classify(8.0), HitRegion::Label);
    }

    #[test]
    fn simple_cells_are_all_label() {
        let info = ItemInfo {
            level: 3,
            expandable: true,
            simple_cell: true,
            ..ItemInfo::default()
        };
        let layout = ItemLayout::compute(&metrics(), &info, &DisplayData::default(), 10.0);
        assert_eq!(layout.segments().len(), 1);
        assert_eq!(layout.classify(0.0), HitRegion::Label);
        assert_eq!(layout.width(), 12.0);
    }
}
