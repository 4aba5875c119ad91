// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The view: owned state, structural-change transactions, and the public API.

mod interaction;

use alloc::vec::Vec;
use core::hash::Hash;
use core::ops::Range;

use kurbo::Point;
use treegrid_core::{
    ColumnPermutation, DisplayColumns, DisplayDataChanged, ItemCountChanged, ItemMoved,
    ListBoxStateTracker, ListShuffle, MaxWidthCache, ModifySelectionAction, PositionManager,
    RestoreOutcome, SelectionRanges, StateToggled, TreeCoordinate, TreeGridError, TreeNavigation,
    TreeSource, ViewState, WidthMeasure, compute_width_of_range,
};
use treegrid_input::{Clock, EditSession, MouseFsm, TypeAheadSession};
use treegrid_layout::{ColumnLayout, HitInfo, HitTester, ItemMeasure, RowViewport};

use crate::{SelectionMode, ViewConfig, ViewNotification};

/// A headless virtualized tree grid.
///
/// The view owns caret, anchor, selection, scroll position, column layout, and the
/// widest-item cache. It never owns the data: every call that needs structure takes
/// the [`TreeSource`], and every call that needs widths takes a measure.
///
/// Structural changes run as one transaction each: snapshot, adjust, update the row
/// count, restore, then update the width cache incrementally. Effects the host must
/// act on are queued as [`ViewNotification`]s.
///
/// `C` is the clock driving type-ahead timeouts. `K` keys rows across list shuffles.
#[derive(Debug)]
pub struct TreeGridView<C, K = u64> {
    config: ViewConfig,
    state: ViewState,
    viewport: RowViewport,
    columns: ColumnLayout,
    permutation: Option<ColumnPermutation>,
    native_columns: usize,
    widths: MaxWidthCache,
    /// Visible rows before the first scroll not yet folded into `widths`.
    scrolled_from: Option<Range<usize>>,
    positions: PositionManager<K>,
    shuffle: Option<ListShuffle<K>>,
    notifications: Vec<ViewNotification>,
    update_depth: usize,
    pending_repaint: bool,
    restoring: bool,
    /// A selection change raised while restoring, published once the restore ends.
    selection_deferred: bool,
    mouse: MouseFsm,
    type_ahead: TypeAheadSession<C>,
    edit: Option<EditSession>,
}

impl<C: Clock, K: Clone + Eq + Hash> TreeGridView<C, K> {
    /// Creates a view over `item_count` rows of a source with `native_columns` columns.
    pub fn new(clock: C, config: ViewConfig, item_count: usize, native_columns: usize) -> Self {
        let viewport = RowViewport::new(item_count, config.metrics.item_height, config.height);
        Self {
            state: ViewState::new(item_count),
            viewport,
            columns: ColumnLayout::default(),
            permutation: None,
            native_columns: native_columns.max(1),
            widths: MaxWidthCache::new(),
            scrolled_from: None,
            positions: PositionManager::new(),
            shuffle: None,
            notifications: Vec::new(),
            update_depth: 0,
            pending_repaint: false,
            restoring: false,
            selection_deferred: false,
            mouse: MouseFsm::with_config(config.mouse),
            type_ahead: TypeAheadSession::with_config(clock, config.type_ahead),
            edit: None,
            config,
        }
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// The live position and selection state.
    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// The row viewport.
    #[must_use]
    pub fn viewport(&self) -> &RowViewport {
        &self.viewport
    }

    /// Number of visible rows.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.state.item_count
    }

    /// Resizes the viewport.
    pub fn set_viewport_size(&mut self, width: u32, height: f64) {
        let old = self.viewport.visible_range();
        self.config.width = width;
        self.config.height = height.max(0.0);
        self.viewport.set_height(self.config.height);
        self.state.top = self.viewport.top_row();
        if self.scrolled_from.is_none() && old != self.viewport.visible_range() {
            self.scrolled_from = Some(old);
        }
        self.notify(ViewNotification::InvalidateAll);
    }

    /// How rows are divided into display columns.
    #[must_use]
    pub fn columns(&self) -> &ColumnLayout {
        &self.columns
    }

    /// Replaces the column layout.
    pub fn set_columns(&mut self, columns: ColumnLayout) {
        self.columns = columns;
        self.notify(ViewNotification::InvalidateAll);
    }

    /// The display order of native columns, if any.
    #[must_use]
    pub fn permutation(&self) -> Option<&ColumnPermutation> {
        self.permutation.as_ref()
    }

    /// Replaces the display order. Columns that are no longer displayed lose the caret.
    pub fn set_permutation(&mut self, permutation: Option<ColumnPermutation>) {
        self.permutation = permutation;
        if self.display_columns().display(self.state.column).is_none() {
            let first = self.display_columns().native(0).unwrap_or(0);
            self.switch_column(first);
        }
        self.notify(ViewNotification::InvalidateAll);
    }

    /// Native/display column mapping.
    #[must_use]
    pub fn display_columns(&self) -> DisplayColumns<'_> {
        DisplayColumns::new(self.permutation.as_ref(), self.native_columns)
    }

    /// Positions the host asked the view to keep current across structural changes.
    #[must_use]
    pub fn positions(&self) -> &PositionManager<K> {
        &self.positions
    }

    /// Mutable access to the host's tracked positions.
    pub fn positions_mut(&mut self) -> &mut PositionManager<K> {
        &mut self.positions
    }

    // --- Notifications and batching ---

    /// Drains the queued notifications.
    pub fn take_notifications(&mut self) -> Vec<ViewNotification> {
        core::mem::take(&mut self.notifications)
    }

    /// The queued notifications.
    #[must_use]
    pub fn notifications(&self) -> &[ViewNotification] {
        &self.notifications
    }

    fn notify(&mut self, notification: ViewNotification) {
        match notification {
            ViewNotification::SelectionChanged if self.restoring => {
                self.selection_deferred = true;
                return;
            }
            ViewNotification::Invalidate { .. } | ViewNotification::InvalidateAll
                if self.update_depth > 0 =>
            {
                self.pending_repaint = true;
                return;
            }
            _ => {}
        }
        let repeat = matches!(
            notification,
            ViewNotification::SelectionChanged | ViewNotification::InvalidateAll
        ) && self.notifications.last() == Some(&notification);
        if !repeat {
            self.notifications.push(notification);
        }
    }

    fn invalidate_rows(&mut self, rows: Range<usize>) {
        let visible = self.viewport.visible_range();
        let start = rows.start.max(visible.start);
        let end = rows.end.min(visible.end);
        if start < end {
            self.notify(ViewNotification::Invalidate { rows: start..end });
        }
    }

    fn notify_caret(&mut self) {
        self.notify(ViewNotification::CaretChanged {
            row: self.state.caret,
            column: self.state.column,
        });
    }

    fn notify_scroll(&mut self) {
        self.notify(ViewNotification::ScrollChanged {
            top: self.state.top,
            horizontal_offset: self.state.horizontal_offset,
        });
    }

    fn notify_extent(&mut self, changed: bool) {
        if changed {
            self.notify(ViewNotification::ExtentChanged {
                max_width: self.widths.max_width(),
            });
        }
    }

    /// Starts a batch. Repaints are held until the outermost [`end_update`](Self::end_update).
    pub fn begin_update(&mut self) {
        self.update_depth += 1;
    }

    /// Ends a batch. Returns `true` if this ended the outermost batch.
    pub fn end_update(&mut self) -> bool {
        debug_assert!(self.update_depth > 0, "end_update without a matching begin_update");
        self.update_depth = self.update_depth.saturating_sub(1);
        if self.update_depth > 0 {
            return false;
        }
        if core::mem::take(&mut self.pending_repaint) {
            self.notify(ViewNotification::InvalidateAll);
        }
        true
    }

    /// Returns `true` inside a [`begin_update`](Self::begin_update) batch.
    #[must_use]
    pub const fn is_updating(&self) -> bool {
        self.update_depth > 0
    }

    /// Returns `true` while tracked state is being replayed after a structural change.
    #[must_use]
    pub const fn is_restoring(&self) -> bool {
        self.restoring
    }

    // --- Structural changes ---

    /// Rows were added or removed below `change.anchor_row`.
    ///
    /// `source` must already report the new row count.
    pub fn item_count_changed<S, M>(&mut self, source: &S, change: &ItemCountChanged, measure: &mut M)
    where
        S: TreeSource + ?Sized,
        M: WidthMeasure + ?Sized,
    {
        let scrolled = self.flush_scroll(measure);
        let new_count = source.visible_item_count();
        let old_top = self.state.top;
        let old_caret = self.state.caret;

        let mut tracker = ListBoxStateTracker::capture(&self.state, self.viewport.full_visible_count())
            .with_selected_caret_follows(self.config.selected_caret_follows);
        tracker.apply_change(change, new_count);
        self.positions.apply_change(change);
        self.follow_edit(|edit| edit.apply_count_change(change));
        self.cancel_mouse();

        self.viewport.set_item_count(new_count);
        let outcome = self.restore(&tracker, new_count);
        self.publish(outcome, old_top, old_caret);

        let window_moved = outcome.repaint_all || self.state.top != old_top;
        if window_moved {
            self.notify(ViewNotification::InvalidateAll);
        } else {
            self.invalidate_rows(change.anchor_row.unwrap_or(0)..usize::MAX);
        }

        let visible = self.viewport.visible_range();
        let delta = change.change;
        let widened = match change.change_ceiling() {
            _ if window_moved => self.widths.reset(measure, visible),
            Some(ceiling) if delta > 0 => {
                self.widths
                    .adjust_for_expansion(measure, ceiling, delta.unsigned_abs(), visible)
            }
            Some(ceiling) if delta < 0 => {
                self.widths
                    .adjust_for_collapse(measure, ceiling, delta.unsigned_abs(), visible)
            }
            Some(_) => false,
            None => self.widths.reset(measure, visible),
        };
        self.notify_extent(scrolled || widened);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "item count changed",
            anchor = ?change.anchor_row,
            change = change.change,
            count = new_count,
            caret = ?self.state.caret,
            top = self.state.top,
            selection_changed = outcome.selection_changed,
        );
    }

    /// A block of rows moved.
    pub fn item_moved<M>(&mut self, moved: &ItemMoved, measure: &mut M)
    where
        M: WidthMeasure + ?Sized,
    {
        let scrolled = self.flush_scroll(measure);
        let count = self.state.item_count;
        let old_top = self.state.top;
        let old_caret = self.state.caret;

        let mut tracker = ListBoxStateTracker::capture(&self.state, self.viewport.full_visible_count())
            .with_selected_caret_follows(self.config.selected_caret_follows);
        tracker.apply_move(moved);
        self.positions.apply_move(moved);
        self.follow_edit(|edit| edit.apply_move(moved));
        self.cancel_mouse();

        let outcome = self.restore(&tracker, count);
        self.publish(outcome, old_top, old_caret);

        let first = moved.from_row.min(moved.to_row);
        let end = moved.from_row.max(moved.to_row).saturating_add(moved.item_count);
        let visible = self.viewport.visible_range();
        let touches_widest = self
            .widths
            .range()
            .is_some_and(|(start, last)| start < end && last >= first);
        let widened = if self.state.top != old_top {
            self.notify(ViewNotification::InvalidateAll);
            self.widths.reset(measure, visible)
        } else {
            self.invalidate_rows(first..end);
            touches_widest && self.widths.reset(measure, visible)
        };
        self.notify_extent(scrolled || widened);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "items moved",
            from = moved.from_row,
            to = moved.to_row,
            count = moved.item_count,
            caret = ?self.state.caret,
        );
    }

    /// A bulk reindex (sort, refresh) is about to happen.
    ///
    /// `key_of` names the object shown on a row. After the source has reindexed,
    /// relocate each key through [`shuffle_positions_mut`](Self::shuffle_positions_mut)
    /// and call [`list_shuffle_ending`](Self::list_shuffle_ending).
    pub fn list_shuffle_beginning(&mut self, key_of: impl FnMut(usize) -> Option<K>) {
        self.cancel_label_edit();
        self.cancel_mouse();
        self.shuffle = Some(ListShuffle::begin(&self.state, key_of));
    }

    /// Keyed positions of the shuffle in progress.
    pub fn shuffle_positions_mut(&mut self) -> Option<&mut PositionManager<K>> {
        self.shuffle.as_mut().map(ListShuffle::positions_mut)
    }

    /// The bulk reindex finished. Without a matching
    /// [`list_shuffle_beginning`](Self::list_shuffle_beginning) this is a full refresh.
    pub fn list_shuffle_ending<S, M>(&mut self, source: &S, measure: &mut M)
    where
        S: TreeSource + ?Sized,
        M: WidthMeasure + ?Sized,
    {
        let shuffle = self.shuffle.take();
        self.reindex(source, measure, shuffle);
    }

    /// Everything may have changed. Keeps caret, anchor, and selection by index,
    /// dropping what no longer exists.
    pub fn refresh<S, M>(&mut self, source: &S, measure: &mut M)
    where
        S: TreeSource + ?Sized,
        M: WidthMeasure + ?Sized,
    {
        self.cancel_label_edit();
        self.cancel_mouse();
        self.shuffle = None;
        self.reindex(source, measure, None);
    }

    fn reindex<S, M>(&mut self, source: &S, measure: &mut M, shuffle: Option<ListShuffle<K>>)
    where
        S: TreeSource + ?Sized,
        M: WidthMeasure + ?Sized,
    {
        self.scrolled_from = None;
        let count = source.visible_item_count();
        let old_top = self.state.top;
        let old_caret = self.state.caret;
        self.viewport.set_item_count(count);

        let had_selection = !self.state.selection.is_empty();
        self.restoring = true;
        let outcome = match shuffle {
            Some(shuffle) => shuffle.finish(&mut self.state, count),
            None => self.clamp_state(count),
        };
        self.sync_top();
        self.keep_single_selection(had_selection);
        self.restoring = false;

        self.publish(outcome, old_top, old_caret);
        self.notify(ViewNotification::InvalidateAll);
        let visible = self.viewport.visible_range();
        let widened = self.widths.reset(measure, visible);
        self.notify_extent(widened);
    }

    fn clamp_state(&mut self, count: usize) -> RestoreOutcome {
        let before = self.state.selection.count();
        let old_caret = self.state.caret;
        let last = count.checked_sub(1);
        let clamp = |row: Option<usize>| row.and_then(|r| last.map(|last| r.min(last)));
        self.state.item_count = count;
        self.state.selection.truncate(count);
        self.state.caret = clamp(self.state.caret).or(last.map(|_| 0));
        self.state.anchor = clamp(self.state.anchor);
        self.state.top = self.state.top.min(last.unwrap_or(0));
        let after = self.state.selection.count();
        RestoreOutcome {
            selection_changed: before != after,
            repaint_all: true,
            caret_moved: self.state.caret != old_caret,
            pruned: before - after,
        }
    }

    /// Display data changed for some rows.
    pub fn display_data_changed<M>(&mut self, change: &DisplayDataChanged, measure: &mut M)
    where
        M: WidthMeasure + ?Sized,
    {
        let scrolled = self.flush_scroll(measure);
        let end = change
            .start_row
            .saturating_add(change.count)
            .min(self.state.item_count);
        let rows = change.start_row.min(end)..end;
        self.invalidate_rows(rows.clone());

        let visible = self.viewport.visible_range();
        let widened = match self.widths.range() {
            // The widest item may have narrowed.
            Some((first, last)) if first < rows.end && last >= rows.start => {
                self.widths.reset(measure, visible)
            }
            _ => {
                let touched = rows.start.max(visible.start)..rows.end.min(visible.end);
                compute_width_of_range(measure, touched).is_some_and(|w| {
                    self.widths.update_max_width(w.width, w.first, w.last, false)
                })
            }
        };
        self.notify_extent(scrolled || widened);
    }

    /// A cell's state image was toggled.
    pub fn state_toggled(&mut self, toggled: &StateToggled) {
        self.invalidate_rows(toggled.row..toggled.row.saturating_add(1));
    }

    fn restore(&mut self, tracker: &ListBoxStateTracker, count: usize) -> RestoreOutcome {
        let had_selection = !self.state.selection.is_empty();
        self.restoring = true;
        let outcome = tracker.restore(&mut self.state, count);
        self.sync_top();
        self.keep_single_selection(had_selection);
        self.restoring = false;
        outcome
    }

    /// In single-selection mode a selection that survived the change sits on the caret.
    fn keep_single_selection(&mut self, had_selection: bool) {
        if self.config.selection_mode != SelectionMode::Single || !had_selection {
            return;
        }
        let Some(caret) = self.state.caret else {
            return;
        };
        // Infallible: the closure never fails.
        let _ = self.change_selection(|state| {
            if state.selection.count() != 1 || !state.selection.contains(caret) {
                state.selection.clear();
                state.selection.select(caret);
            }
            Ok(())
        });
    }

    fn sync_top(&mut self) {
        self.viewport.set_top_row(self.state.top);
        self.state.top = self.viewport.top_row();
    }

    fn publish(&mut self, outcome: RestoreOutcome, old_top: usize, old_caret: Option<usize>) {
        let deferred = core::mem::take(&mut self.selection_deferred);
        if outcome.selection_changed || deferred {
            self.notify(ViewNotification::SelectionChanged);
        }
        if outcome.caret_moved || self.state.caret.is_none() != old_caret.is_none() {
            self.notify_caret();
        }
        if self.state.top != old_top {
            self.notify_scroll();
        }
    }

    fn follow_edit(&mut self, follow: impl FnOnce(&mut EditSession) -> bool) {
        let Some(edit) = &mut self.edit else {
            return;
        };
        if follow(edit) {
            return;
        }
        let target = edit.target();
        self.edit = None;
        self.notify(ViewNotification::LabelEditEnded {
            target,
            committed: false,
        });
    }

    // --- Caret, column, and selection ---

    /// The caret row.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.state.caret
    }

    /// Moves the caret and the anchor. In single-selection mode the selection follows.
    pub fn set_current_index(&mut self, row: usize) -> Result<(), TreeGridError> {
        TreeGridError::check_row(row, self.state.item_count)?;
        let single = self.config.selection_mode == SelectionMode::Single;
        self.change_selection(|state| {
            state.caret = Some(row);
            state.anchor = Some(row);
            if single {
                state.selection.clear();
                state.selection.select(row);
            }
            Ok(())
        })
    }

    /// The display column of the caret.
    #[must_use]
    pub fn current_column(&self) -> usize {
        self.display_columns().display(self.state.column).unwrap_or(0)
    }

    /// The native column of the caret.
    #[must_use]
    pub fn current_native_column(&self) -> usize {
        self.state.column
    }

    /// Moves the caret to display column `column`. The selection belongs to one
    /// column, so changing columns clears it.
    pub fn set_current_column(&mut self, column: usize) -> Result<(), TreeGridError> {
        let columns = self.display_columns();
        let native = columns.native(column).ok_or(TreeGridError::ColumnOutOfRange {
            column,
            count: columns.visible_count(),
        })?;
        self.switch_column(native);
        Ok(())
    }

    fn switch_column(&mut self, native: usize) {
        if native == self.state.column {
            return;
        }
        let single = self.config.selection_mode == SelectionMode::Single;
        // Infallible: the closure never fails.
        let _ = self.change_selection(|state| {
            state.column = native;
            state.selection.clear();
            if let (true, Some(caret)) = (single, state.caret) {
                state.selection.select(caret);
            }
            Ok(())
        });
        self.notify_caret();
    }

    /// The fixed end of range selections.
    #[must_use]
    pub fn anchor_index(&self) -> Option<usize> {
        self.state.anchor
    }

    /// Sets the fixed end of range selections.
    pub fn set_anchor_index(&mut self, row: usize) -> Result<(), TreeGridError> {
        TreeGridError::check_row(row, self.state.item_count)?;
        self.state.anchor = Some(row);
        Ok(())
    }

    /// The selected rows, ascending.
    pub fn selected_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.state.selection.iter()
    }

    /// The selection.
    #[must_use]
    pub fn selection(&self) -> &SelectionRanges {
        &self.state.selection
    }

    /// Returns `true` if `row` is selected.
    #[must_use]
    pub fn is_selected(&self, row: usize) -> bool {
        self.state.selection.contains(row)
    }

    /// Selects or deselects one row. In single-selection mode, selecting a row
    /// deselects the others and moves the caret to it.
    pub fn set_selected(&mut self, row: usize, select: bool) -> Result<(), TreeGridError> {
        let single = self.config.selection_mode == SelectionMode::Single;
        self.change_selection(|state| {
            if single && select {
                TreeGridError::check_row(row, state.item_count)?;
                state.selection.clear();
                state.caret = Some(row);
                state.anchor = Some(row);
            }
            state.set_selected(row, select)
        })
    }

    /// Selects or deselects `start..=end`.
    pub fn select_range(&mut self, start: usize, end: usize, select: bool) -> Result<(), TreeGridError> {
        if start == end {
            return self.set_selected(start, select);
        }
        if select && !self.config.selection_mode.is_multi() {
            return Err(TreeGridError::SingleSelection);
        }
        self.change_selection(|state| state.select_range(start, end, select))
    }

    /// Selects every row.
    pub fn select_all(&mut self) -> Result<(), TreeGridError> {
        if self.state.item_count > 1 && !self.config.selection_mode.is_multi() {
            return Err(TreeGridError::SingleSelection);
        }
        self.change_selection(|state| {
            state.selection.select_all(state.item_count);
            Ok(())
        })
    }

    /// Deselects every row.
    pub fn clear_selection(&mut self) {
        let _ = self.change_selection(|state| {
            state.selection.clear();
            Ok(())
        });
    }

    /// Moves the caret the way an extended-selection click or key does.
    ///
    /// See [`ViewState::set_current_extended_multi_select_index`]. In
    /// single-selection mode this moves the caret and selects it.
    pub fn set_current_extended_multi_select_index(
        &mut self,
        row: usize,
        extend_from_anchor: bool,
        preserve_selection: bool,
        action: ModifySelectionAction,
    ) -> Result<ModifySelectionAction, TreeGridError> {
        if !self.config.selection_mode.is_multi() {
            self.set_current_index(row)?;
            return Ok(ModifySelectionAction::Select);
        }
        self.change_selection(|state| {
            state.set_current_extended_multi_select_index(
                row,
                extend_from_anchor,
                preserve_selection,
                action,
            )
        })
    }

    /// Applies `edit` to the state and reports what changed.
    fn change_selection<R>(
        &mut self,
        edit: impl FnOnce(&mut ViewState) -> Result<R, TreeGridError>,
    ) -> Result<R, TreeGridError> {
        let before = self.state.selection.clone();
        let old_caret = self.state.caret;
        let result = edit(&mut self.state)?;

        if self.state.selection != before {
            let bounds = selection_bounds(&before)
                .into_iter()
                .chain(selection_bounds(&self.state.selection))
                .reduce(|a, b| a.start.min(b.start)..a.end.max(b.end));
            if let Some(rows) = bounds {
                self.invalidate_rows(rows);
            }
            self.notify(ViewNotification::SelectionChanged);
        }
        if self.state.caret != old_caret {
            for row in [old_caret, self.state.caret].into_iter().flatten() {
                self.invalidate_rows(row..row + 1);
            }
            self.notify_caret();
        }
        Ok(result)
    }

    // --- Scrolling and extents ---

    /// The first visible row.
    #[must_use]
    pub fn top_index(&self) -> usize {
        self.state.top
    }

    /// Scrolls `row` to the top, as far as the row count allows. Returns `true` if
    /// the view scrolled.
    pub fn set_top_index(&mut self, row: usize) -> Result<bool, TreeGridError> {
        TreeGridError::check_row(row, self.state.item_count)?;
        Ok(self.scroll_rows(|viewport| viewport.set_top_row(row)))
    }

    /// Scrolls by whole rows. Returns `true` if the view scrolled.
    pub fn scroll_by(&mut self, rows: isize) -> bool {
        self.scroll_rows(|viewport| viewport.scroll_by(rows))
    }

    fn scroll_rows(&mut self, scroll: impl FnOnce(&mut RowViewport) -> bool) -> bool {
        let old = self.viewport.visible_range();
        if !scroll(&mut self.viewport) {
            return false;
        }
        if self.scrolled_from.is_none() {
            self.scrolled_from = Some(old);
        }
        self.state.top = self.viewport.top_row();
        self.notify_scroll();
        self.notify(ViewNotification::InvalidateAll);
        true
    }

    /// The horizontal scroll offset in pixels.
    #[must_use]
    pub fn horizontal_offset(&self) -> f64 {
        self.state.horizontal_offset
    }

    fn max_horizontal_offset(&self) -> f64 {
        let content =
            f64::from(self.columns.content_width(self.config.width)).max(self.widths.max_width());
        (content - f64::from(self.config.width)).max(0.0)
    }

    /// Scrolls horizontally, clamped to the content width. Returns `true` if the
    /// offset changed.
    pub fn set_horizontal_offset(&mut self, offset: f64) -> bool {
        if offset.is_nan() {
            return false;
        }
        let offset = offset.clamp(0.0, self.max_horizontal_offset());
        if offset == self.state.horizontal_offset {
            return false;
        }
        self.state.horizontal_offset = offset;
        self.notify_scroll();
        self.notify(ViewNotification::InvalidateAll);
        true
    }

    /// Scrolls horizontally by `steps` of [`ViewConfig::horizontal_scroll_step`].
    pub fn scroll_horizontally(&mut self, steps: isize) -> bool {
        let offset = self.state.horizontal_offset + steps as f64 * self.config.horizontal_scroll_step;
        self.set_horizontal_offset(offset)
    }

    /// Scrolls the least needed to show `row` entirely and display column `column`
    /// as far as it fits. Returns `true` if the view scrolled.
    pub fn scroll_into_view(&mut self, row: usize, column: usize) -> Result<bool, TreeGridError> {
        TreeGridError::check_row(row, self.state.item_count)?;
        TreeGridError::check_column(column, self.columns.column_count())?;
        let mut scrolled = self.scroll_rows(|viewport| viewport.scroll_into_view(row));
        if let Some(span) = self.columns.span(self.config.width, column, column) {
            let left = f64::from(span.left);
            let right = f64::from(span.right());
            let width = f64::from(self.config.width);
            let offset = self.state.horizontal_offset;
            let wanted = if left < offset {
                left
            } else if right > offset + width {
                (right - width).min(left)
            } else {
                offset
            };
            scrolled |= self.set_horizontal_offset(wanted);
        }
        Ok(scrolled)
    }

    /// The widest visible item, as last measured.
    #[must_use]
    pub fn max_width(&self) -> f64 {
        self.widths.max_width()
    }

    /// Measures rows scrolled into view since the last update, or the whole window
    /// when nothing is cached. Returns `true` if the widest width changed.
    pub fn update_extent<M: WidthMeasure + ?Sized>(&mut self, measure: &mut M) -> bool {
        let mut changed = self.flush_scroll(measure);
        if self.widths.is_unknown() {
            changed |= self.widths.reset(measure, self.viewport.visible_range());
        }
        self.notify_extent(changed);
        changed
    }

    fn flush_scroll<M: WidthMeasure + ?Sized>(&mut self, measure: &mut M) -> bool {
        let Some(old) = self.scrolled_from.take() else {
            return false;
        };
        self.widths
            .adjust_for_scroll(measure, old, self.viewport.visible_range())
    }

    // --- Hit testing and navigation ---

    /// Resolves a viewport point to a cell and region.
    pub fn resolve<S, M>(&self, point: Point, source: &S, measure: &mut M) -> HitInfo
    where
        S: TreeSource + ?Sized,
        M: ItemMeasure + ?Sized,
    {
        HitTester::new(
            &self.viewport,
            &self.columns,
            &self.config.metrics,
            self.config.width,
        )
        .with_permutation(self.permutation.as_ref())
        .with_horizontal_offset(self.state.horizontal_offset)
        .resolve(point, source, measure)
    }

    /// Moves the caret in `direction` and scrolls it into view.
    ///
    /// Returns the new caret cell (display column), or `None` if there was no caret
    /// or no target. In extended mode the selection collapses to the new caret.
    pub fn navigate<S>(&mut self, source: &S, direction: TreeNavigation) -> Option<TreeCoordinate>
    where
        S: TreeSource + ?Sized,
    {
        let caret = self.state.caret?;
        let from = TreeCoordinate::new(caret, self.current_column());
        let target = source.navigation_target(direction, from, self.permutation.as_ref())?;
        self.focus_cell(target).ok()?;
        Some(target)
    }

    /// Puts the caret on `cell` the way keyboard navigation does.
    fn focus_cell(&mut self, cell: TreeCoordinate) -> Result<(), TreeGridError> {
        self.set_current_column(cell.column)?;
        match self.config.selection_mode {
            SelectionMode::Extended => {
                self.set_current_extended_multi_select_index(
                    cell.row,
                    false,
                    false,
                    ModifySelectionAction::None,
                )?;
            }
            SelectionMode::Single | SelectionMode::Multiple => self.set_current_index(cell.row)?,
        }
        let column = cell.column.min(self.columns.column_count().saturating_sub(1));
        self.scroll_into_view(cell.row, column)?;
        Ok(())
    }
}

/// The rows spanned by a selection as a half-open range.
fn selection_bounds(selection: &SelectionRanges) -> Option<Range<usize>> {
    let first = selection.ranges().next()?;
    let last = selection.ranges().last()?;
    Some(*first.start()..*last.end() + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use treegrid_core::ItemInfo;
    use treegrid_input::ManualClock;

    /// A flat list of rows in one column.
    struct Flat(usize);

    impl TreeSource for Flat {
        fn visible_item_count(&self) -> usize {
            self.0
        }

        fn item_info(&self, _: usize, _: usize, _: bool) -> ItemInfo {
            ItemInfo::default()
        }
    }

    fn width(row: usize) -> f64 {
        10.0 + (row % 7) as f64
    }

    /// Five full rows of 18px.
    fn view(clock: &ManualClock, count: usize) -> TreeGridView<&ManualClock> {
        let config = ViewConfig::default().with_viewport_size(200, 90.0);
        TreeGridView::new(clock, config, count, 1)
    }

    #[test]
    fn new_view_puts_caret_on_first_row() {
        let clock = ManualClock::new();
        let v = view(&clock, 10);
        assert_eq!(v.current_index(), Some(0));
        assert_eq!(v.top_index(), 0);
        assert_eq!(v.selected_indices().count(), 0);
        assert_eq!(v.viewport().full_visible_count(), 5);
    }

    #[test]
    fn selection_changes_are_reported_once() {
        let clock = ManualClock::new();
        let mut v = view(&clock, 10);
        v.select_range(1, 3, true).unwrap();
        let notes = v.take_notifications();
        assert_eq!(
            notes,
            vec![
                ViewNotification::Invalidate { rows: 1..4 },
                ViewNotification::SelectionChanged
            ]
        );
        v.select_range(1, 3, true).unwrap();
        assert!(v.take_notifications().is_empty(), "no change, no notification");
    }

    #[test]
    fn single_selection_follows_the_caret() {
        let clock = ManualClock::new();
        let config = ViewConfig::default()
            .with_viewport_size(200, 90.0)
            .with_selection_mode(SelectionMode::Single);
        let mut v: TreeGridView<_> = TreeGridView::new(&clock, config, 10, 1);
        v.set_current_index(4).unwrap();
        v.set_current_index(6).unwrap();
        assert_eq!(v.selected_indices().collect::<Vec<_>>(), vec![6]);
        assert_eq!(v.select_range(1, 3, true), Err(TreeGridError::SingleSelection));
        assert_eq!(v.select_all(), Err(TreeGridError::SingleSelection));
        v.set_selected(2, true).unwrap();
        assert_eq!(v.current_index(), Some(2));
        assert_eq!(v.selected_indices().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn out_of_range_requests_are_rejected() {
        let clock = ManualClock::new();
        let mut v = view(&clock, 4);
        assert_eq!(
            v.set_current_index(4),
            Err(TreeGridError::RowOutOfRange { row: 4, count: 4 })
        );
        assert!(v.set_top_index(9).is_err());
        assert!(v.set_current_column(1).is_err());
        assert_eq!(v.current_index(), Some(0));
    }

    #[test]
    fn batches_hold_repaints_until_the_outermost_end() {
        let clock = ManualClock::new();
        let mut v = view(&clock, 20);
        v.begin_update();
        v.begin_update();
        v.select_range(0, 2, true).unwrap();
        v.scroll_by(3);
        assert!(!v.end_update());
        assert!(
            !v.notifications()
                .iter()
                .any(|n| matches!(n, ViewNotification::InvalidateAll | ViewNotification::Invalidate { .. })),
            "repaints are held inside a batch"
        );
        assert!(v.end_update());
        assert_eq!(v.notifications().last(), Some(&ViewNotification::InvalidateAll));
    }

    #[test]
    fn switching_columns_clears_the_selection() {
        let clock = ManualClock::new();
        let config = ViewConfig::default().with_viewport_size(200, 90.0);
        let mut v: TreeGridView<_> = TreeGridView::new(&clock, config, 10, 3);
        v.select_range(2, 4, true).unwrap();
        v.set_current_column(2).unwrap();
        assert_eq!(v.current_column(), 2);
        assert!(v.selection().is_empty());

        let p = ColumnPermutation::from_order(3, &[2, 0]).unwrap();
        v.set_permutation(Some(p));
        assert_eq!(v.current_column(), 0, "native 2 is now displayed first");
        assert_eq!(v.current_native_column(), 2);
    }

    #[test]
    fn scrolling_defers_width_measurement() {
        let clock = ManualClock::new();
        let mut v = view(&clock, 40);
        let mut measure = |row: usize| width(row);
        assert!(v.update_extent(&mut measure));
        assert_eq!(v.max_width(), 14.0);

        let mut calls = 0;
        let mut counting = |row: usize| {
            calls += 1;
            width(row)
        };
        assert!(v.set_top_index(1).unwrap());
        v.update_extent(&mut counting);
        assert_eq!(calls, 1, "only the row scrolled into view is measured");
        assert_eq!(v.top_index(), 1);
    }

    #[test]
    fn horizontal_scroll_clamps_to_content() {
        let clock = ManualClock::new();
        let mut v = view(&clock, 10);
        let mut wide = |_: usize| 350.0;
        v.update_extent(&mut wide);
        assert!(v.set_horizontal_offset(500.0));
        assert_eq!(v.horizontal_offset(), 150.0);
        assert!(v.scroll_horizontally(-2));
        assert_eq!(v.horizontal_offset(), 118.0);
        assert!(!v.set_horizontal_offset(f64::NAN));
    }

    #[test]
    fn restore_reports_one_selection_change() {
        let clock = ManualClock::new();
        let config = ViewConfig::default()
            .with_viewport_size(200, 90.0)
            .with_selection_mode(SelectionMode::Single);
        let mut v: TreeGridView<_> = TreeGridView::new(&clock, config, 10, 1);
        v.set_current_index(7).unwrap();
        v.take_notifications();

        // Row 3 collapses over the selected caret. The single selection is re-placed
        // on the caret while restoring, and the view reports it once.
        let mut measure = |row: usize| width(row);
        v.item_count_changed(&Flat(6), &ItemCountChanged::toggle(3, 0, -4), &mut measure);
        assert!(!v.is_restoring());
        assert_eq!(v.current_index(), Some(3));
        assert_eq!(v.selected_indices().collect::<Vec<_>>(), vec![3]);
        let changes = v
            .take_notifications()
            .into_iter()
            .filter(|n| *n == ViewNotification::SelectionChanged)
            .count();
        assert_eq!(changes, 1);
    }

    #[test]
    fn scroll_into_view_moves_the_minimum() {
        let clock = ManualClock::new();
        let mut v = view(&clock, 30);
        assert!(v.scroll_into_view(7, 0).unwrap());
        assert_eq!(v.top_index(), 3);
        assert!(!v.scroll_into_view(5, 0).unwrap());
        assert!(v.scroll_into_view(1, 0).unwrap());
        assert_eq!(v.top_index(), 1);
    }
}
