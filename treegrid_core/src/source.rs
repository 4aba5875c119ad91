// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The data-source contract: per-cell structural info, capability flags, and navigation.

use crate::{BlankExpansion, ColumnPermutation, navigation, resolve_blank_expansion};

bitflags::bitflags! {
    /// Capabilities a branch advertises to the display engine.
    ///
    /// Behavior that depends on these is selected through the lookup tables on this type
    /// (see [`BranchFeatures::allows_label_edit`] and [`BranchFeatures::collapse_policy`])
    /// rather than through per-branch trait objects.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct BranchFeatures: u32 {
        /// Items in the branch may be expanded.
        const EXPANSIONS = 0x0000_0001;
        /// Items may be relocated within the branch.
        const BRANCH_RELOCATION = 0x0000_0002;
        /// Items may be inserted and deleted.
        const INSERTS_AND_DELETES = 0x0000_0004;
        /// The branch batches its change notifications.
        const DELAYED_UPDATES = 0x0000_0008;
        /// Items may be realigned after a bulk change.
        const REALIGNS = 0x0000_0010;
        /// Items carry a toggleable state image.
        const STATE_CHANGES = 0x0000_0020;
        /// Items can be located again after a list shuffle.
        const POSITION_TRACKING = 0x0000_0040;
        /// The index of an item within its branch never changes.
        const DEFAULT_POSITION_TRACKING = 0x0000_0080;
        /// Collapsing discards the branch and all of its children.
        const ON_COLLAPSE_CLOSE_AND_DISCARD = 0x0000_0100;
        /// Collapsing discards the children of the branch.
        const ON_COLLAPSE_CLOSE_CHILDREN = 0x0000_0200;
        /// The number of columns depends on the row.
        const JAGGED_COLUMNS = 0x0000_0400;
        /// Label edits can be activated by an explicit command.
        const EXPLICIT_LABEL_EDITS = 0x0000_0800;
        /// Label edits start after a delay when a selected item is clicked again.
        const DELAYED_LABEL_EDITS = 0x0000_1000;
        /// Label edits start as soon as an item is clicked.
        const IMMEDIATE_MOUSE_LABEL_EDITS = 0x0000_2000;
        /// Label edits start whenever an item becomes selected, by any means.
        const IMMEDIATE_SELECTION_LABEL_EDITS = 0x0000_4000;
        /// Some columns host their own sub-item lists.
        const COMPLEX_COLUMNS = 0x0000_8000;
        /// The branch never reports display data changes.
        const DISPLAY_DATA_FIXED = 0x0001_0000;
    }
}

impl Default for BranchFeatures {
    fn default() -> Self {
        Self::empty()
    }
}

/// Ways a label edit can be started.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LabelEditTrigger {
    /// An explicit edit command (for example a key binding).
    Explicit,
    /// A second click on an already selected item, after the edit delay.
    DelayedMouse,
    /// A click on an item.
    ImmediateMouse,
    /// Any selection change, including keyboard and programmatic ones.
    Selection,
}

/// How a mouse click on a label may start an edit, from most to least eager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseEditStyle {
    /// Clicks start an edit right away.
    Immediate,
    /// A click on the selected item arms a timer that starts the edit.
    Delayed,
    /// Mouse input never starts an edit.
    None,
}

/// What happens to a branch's children when its parent collapses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollapsePolicy {
    /// Only the expansion state changes.
    KeepState,
    /// Children are discarded.
    CloseChildren,
    /// The branch and its children are discarded.
    CloseAndDiscard,
}

const LABEL_EDIT_TABLE: [(LabelEditTrigger, BranchFeatures); 4] = [
    (
        LabelEditTrigger::Explicit,
        BranchFeatures::EXPLICIT_LABEL_EDITS,
    ),
    (
        LabelEditTrigger::DelayedMouse,
        BranchFeatures::DELAYED_LABEL_EDITS,
    ),
    (
        LabelEditTrigger::ImmediateMouse,
        BranchFeatures::IMMEDIATE_MOUSE_LABEL_EDITS
            .union(BranchFeatures::IMMEDIATE_SELECTION_LABEL_EDITS),
    ),
    (
        LabelEditTrigger::Selection,
        BranchFeatures::IMMEDIATE_SELECTION_LABEL_EDITS,
    ),
];

const COLLAPSE_TABLE: [(BranchFeatures, CollapsePolicy); 2] = [
    (
        BranchFeatures::ON_COLLAPSE_CLOSE_AND_DISCARD,
        CollapsePolicy::CloseAndDiscard,
    ),
    (
        BranchFeatures::ON_COLLAPSE_CLOSE_CHILDREN,
        CollapsePolicy::CloseChildren,
    ),
];

impl BranchFeatures {
    /// Returns `true` if `trigger` may start a label edit on items of this branch.
    #[must_use]
    pub fn allows_label_edit(self, trigger: LabelEditTrigger) -> bool {
        LABEL_EDIT_TABLE
            .iter()
            .find(|(t, _)| *t == trigger)
            .is_some_and(|(_, bits)| self.intersects(*bits))
    }

    /// Returns the most eager mouse edit style the branch allows.
    #[must_use]
    pub fn mouse_edit_style(self) -> MouseEditStyle {
        if self.allows_label_edit(LabelEditTrigger::ImmediateMouse) {
            MouseEditStyle::Immediate
        } else if self.allows_label_edit(LabelEditTrigger::DelayedMouse) {
            MouseEditStyle::Delayed
        } else {
            MouseEditStyle::None
        }
    }

    /// Returns the collapse behavior; discarding takes priority over closing children.
    #[must_use]
    pub fn collapse_policy(self) -> CollapsePolicy {
        COLLAPSE_TABLE
            .iter()
            .find(|(bits, _)| self.contains(*bits))
            .map_or(CollapsePolicy::KeepState, |(_, policy)| *policy)
    }

    /// Returns `true` if items of this branch can be found again after a list shuffle.
    #[must_use]
    pub const fn tracks_positions(self) -> bool {
        self.intersects(
            Self::POSITION_TRACKING.union(Self::DEFAULT_POSITION_TRACKING),
        )
    }
}

/// Opaque identity of a branch, assigned by the data source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchId(pub u64);

/// Which neighbor a blank cell projects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlankAxis {
    /// The cell repeats a neighboring column in the same row (jagged columns).
    #[default]
    Horizontal,
    /// The cell continues the cell above it (complex columns with uneven sub-lists).
    Vertical,
}

/// Structural information about one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ItemInfo {
    /// Nesting depth; root items are level `0`.
    pub level: usize,
    /// The branch that owns the cell.
    pub branch: BranchId,
    /// Index of the item inside its branch.
    pub row_in_branch: usize,
    /// Column index inside the branch, which may differ from the native column.
    pub column_in_branch: usize,
    /// The cell shows another cell's content.
    pub blank: bool,
    /// Which neighbor a blank cell projects. Ignored when `blank` is false.
    pub blank_axis: BlankAxis,
    /// The item has (or may have) children.
    pub expandable: bool,
    /// The item is currently expanded.
    pub expanded: bool,
    /// The cell has no glyph, indent, or images; only a label.
    pub simple_cell: bool,
    /// The item is the first in its branch.
    pub first_in_branch: bool,
    /// The item is the last in its branch.
    pub last_in_branch: bool,
    /// Capabilities of the owning branch.
    pub features: BranchFeatures,
}

/// Images shown next to a label. Indices refer to host image lists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisplayData {
    /// Primary icon.
    pub image: Option<u16>,
    /// State image, such as a checkbox.
    pub state_image: Option<u16>,
}

/// A `(row, column)` pair. The column is a display column unless stated otherwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeCoordinate {
    /// Absolute visible row.
    pub row: usize,
    /// Column.
    pub column: usize,
}

impl TreeCoordinate {
    /// Creates a coordinate.
    #[must_use]
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Directions for structural navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TreeNavigation {
    /// The parent item.
    Parent,
    /// The parent item, skipping blank projections in complex columns.
    ComplexParent,
    /// The first child of an expanded item.
    FirstChild,
    /// The last child of an expanded item.
    LastChild,
    /// The next item at the same level within the same parent.
    NextSibling,
    /// The previous item at the same level within the same parent.
    PreviousSibling,
    /// The row above.
    Up,
    /// The row below.
    Down,
    /// The column to the left, or the parent from the leftmost column.
    Left,
    /// The column to the left.
    LeftColumn,
    /// The column to the right, or the first child from the rightmost column.
    Right,
    /// The column to the right.
    RightColumn,
}

/// The data source a tree grid displays.
///
/// Rows are absolute visible rows `0..visible_item_count()`. Columns passed to
/// [`TreeSource::item_info`] are native columns.
pub trait TreeSource {
    /// Number of currently visible rows.
    fn visible_item_count(&self) -> usize;

    /// Number of native columns.
    fn column_count(&self) -> usize {
        1
    }

    /// Structural info for a cell. `check_root_lines` asks the source to report root
    /// items as expandable when root lines are drawn.
    fn item_info(&self, row: usize, native_column: usize, check_root_lines: bool) -> ItemInfo;

    /// The merged region containing a cell. Columns in the result are display columns.
    fn blank_expansion(
        &self,
        row: usize,
        native_column: usize,
        permutation: Option<&ColumnPermutation>,
    ) -> BlankExpansion {
        resolve_blank_expansion(self, row, native_column, permutation)
    }

    /// The target of a navigation request, or `None` if there is none.
    ///
    /// `from.column` and the returned column are display columns.
    fn navigation_target(
        &self,
        direction: TreeNavigation,
        from: TreeCoordinate,
        permutation: Option<&ColumnPermutation>,
    ) -> Option<TreeCoordinate> {
        navigation::default_navigation_target(self, direction, from, permutation)
    }

    /// The first native column on `row` that is not blank, or `0`.
    fn first_non_blank_column(&self, row: usize) -> usize {
        (0..self.column_count())
            .find(|&column| !self.item_info(row, column, false).blank)
            .unwrap_or(0)
    }
}
