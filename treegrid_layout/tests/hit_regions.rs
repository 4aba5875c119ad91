// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for item segment classification.

use proptest::prelude::*;
use treegrid_core::{DisplayData, ItemInfo};
use treegrid_layout::{HitRegion, ItemLayout, ItemMetrics};

fn metrics() -> impl Strategy<Value = ItemMetrics> {
    (
        0.0_f64..30.0,
        0.0_f64..20.0,
        0.0_f64..20.0,
        0.0_f64..20.0,
        0.0_f64..5.0,
        0.0_f64..5.0,
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(indent, glyph, state, image, image_pad, label_pad, reserve, root_lines)| ItemMetrics {
                indent_width: indent,
                glyph_width: glyph,
                state_image_width: state,
                image_width: image,
                image_padding: image_pad,
                label_padding: label_pad,
                reserve_glyph_space: reserve,
                root_lines,
                ..ItemMetrics::default()
            },
        )
}

fn item() -> impl Strategy<Value = (ItemInfo, DisplayData)> {
    (0_usize..6, any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(level, expandable, simple_cell, image, state_image)| {
            (
                ItemInfo {
                    level,
                    expandable,
                    simple_cell,
                    ..ItemInfo::default()
                },
                DisplayData {
                    image: image.then_some(0),
                    state_image: state_image.then_some(1),
                },
            )
        },
    )
}

proptest! {
    #[test]
    fn segments_tile_the_item(m in metrics(), (info, display) in item(), label in 0.0_f64..200.0) {
        let layout = ItemLayout::compute(&m, &info, &display, label);
        let segments = layout.segments();
        let mut edge = 0.0;
        for segment in segments {
            prop_assert_eq!(segment.start, edge);
            prop_assert!(segment.end > segment.start);
            edge = segment.end;
        }
        prop_assert_eq!(layout.width(), edge);
    }

    #[test]
    fn every_point_has_exactly_one_region(
        m in metrics(),
        (info, display) in item(),
        label in 0.0_f64..200.0,
        fraction in 0.0_f64..1.0,
    ) {
        let layout = ItemLayout::compute(&m, &info, &display, label);
        let x = layout.width() * fraction;
        prop_assume!(x < layout.width());
        let region = layout.classify(x);
        let owners = layout
            .segments()
            .iter()
            .filter(|s| s.start <= x && x < s.end)
            .count();
        prop_assert_eq!(owners, 1);
        prop_assert_ne!(region, HitRegion::RightOfLabel);
        prop_assert_ne!(region, HitRegion::Nowhere);
        prop_assert_eq!(layout.classify(layout.width()), HitRegion::RightOfLabel);
    }

    #[test]
    fn absent_elements_are_never_hit(m in metrics(), (info, display) in item(), label in 0.0_f64..200.0) {
        let layout = ItemLayout::compute(&m, &info, &display, label);
        let has = |region| layout.bounds_of(region).is_some();
        if display.state_image.is_none() || info.simple_cell {
            prop_assert!(!has(HitRegion::StateIcon));
        }
        if display.image.is_none() || info.simple_cell {
            prop_assert!(!has(HitRegion::Icon));
        }
        if !info.expandable || info.simple_cell {
            prop_assert!(!has(HitRegion::Glyph));
        }
    }
}
