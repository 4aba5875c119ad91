// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Notifications a view queues for its host.

use core::ops::Range;

use treegrid_core::TreeCoordinate;
use treegrid_input::EditTarget;

/// Something the host should react to. Drained with
/// [`TreeGridView::take_notifications`](crate::TreeGridView::take_notifications).
#[derive(Clone, Debug, PartialEq)]
pub enum ViewNotification {
    /// The set of selected rows changed.
    SelectionChanged,
    /// The caret moved or now sits on a different item.
    CaretChanged {
        /// The caret row.
        row: Option<usize>,
        /// The native column of the caret.
        column: usize,
    },
    /// These rows must be repainted.
    Invalidate {
        /// Affected rows.
        rows: Range<usize>,
    },
    /// The whole viewport must be repainted.
    InvalidateAll,
    /// The scroll position changed.
    ScrollChanged {
        /// The first visible row.
        top: usize,
        /// The horizontal offset in pixels.
        horizontal_offset: f64,
    },
    /// The widest visible item changed width.
    ExtentChanged {
        /// The new widest width.
        max_width: f64,
    },
    /// A glyph was clicked; the source should toggle the row's expansion.
    ToggleExpansion(TreeCoordinate),
    /// The cell was double clicked.
    Activate(TreeCoordinate),
    /// A drag started on the cell.
    DragStarted(TreeCoordinate),
    /// The drag ended or was abandoned.
    DragEnded,
    /// Call [`TreeGridView::on_timer`](crate::TreeGridView::on_timer) after `delay_ms`.
    StartEditTimer {
        /// Milliseconds to wait.
        delay_ms: u64,
    },
    /// The host should show an edit control over the target.
    LabelEditStarted(EditTarget),
    /// The edit control should be removed.
    LabelEditEnded {
        /// The cell that was edited, at its final position.
        target: EditTarget,
        /// The new text was accepted.
        committed: bool,
    },
}
