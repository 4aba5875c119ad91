// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View configuration.

use treegrid_input::{MouseConfig, TypeAheadConfig};
use treegrid_layout::ItemMetrics;

/// How clicks and selection calls change the selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SelectionMode {
    /// At most one row is selected and it follows the caret.
    Single,
    /// Each click toggles the clicked row.
    Multiple,
    /// Shift extends from the anchor and control toggles.
    #[default]
    Extended,
}

impl SelectionMode {
    /// Returns `true` if more than one row can be selected.
    #[must_use]
    pub const fn is_multi(self) -> bool {
        !matches!(self, Self::Single)
    }
}

/// Settings a [`TreeGridView`](crate::TreeGridView) is created with.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewConfig {
    /// Selection behavior.
    pub selection_mode: SelectionMode,
    /// Item geometry.
    pub metrics: ItemMetrics,
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: f64,
    /// A selected caret whose row is deleted stays selected on the row it falls back to.
    /// Off by default.
    pub selected_caret_follows: bool,
    /// Pixels scrolled per horizontal scroll step.
    pub horizontal_scroll_step: f64,
    /// Mouse thresholds.
    pub mouse: MouseConfig,
    /// Type-ahead settings.
    pub type_ahead: TypeAheadConfig,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            selection_mode: SelectionMode::default(),
            metrics: ItemMetrics::default(),
            width: 0,
            height: 0.0,
            selected_caret_follows: false,
            horizontal_scroll_step: 16.0,
            mouse: MouseConfig::default(),
            type_ahead: TypeAheadConfig::default(),
        }
    }
}

impl ViewConfig {
    /// Sets the selection mode.
    #[must_use]
    pub const fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = mode;
        self
    }

    /// Sets the item metrics.
    #[must_use]
    pub fn with_metrics(mut self, metrics: ItemMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Sets the viewport size.
    #[must_use]
    pub fn with_viewport_size(mut self, width: u32, height: f64) -> Self {
        self.width = width;
        self.height = height.max(0.0);
        self
    }

    /// Sets whether a relocated selected caret keeps its selection.
    #[must_use]
    pub const fn with_selected_caret_follows(mut self, follows: bool) -> Self {
        self.selected_caret_follows = follows;
        self
    }

    /// Sets the mouse thresholds.
    #[must_use]
    pub const fn with_mouse(mut self, mouse: MouseConfig) -> Self {
        self.mouse = mouse;
        self
    }

    /// Sets the type-ahead settings.
    #[must_use]
    pub const fn with_type_ahead(mut self, type_ahead: TypeAheadConfig) -> Self {
        self.type_ahead = type_ahead;
        self
    }
}
