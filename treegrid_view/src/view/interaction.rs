// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mouse, type-ahead, and label-edit handling.

use core::hash::Hash;

use kurbo::Point;
use treegrid_core::{ModifySelectionAction, TreeCoordinate, TreeGridError, TreeSource};
use treegrid_input::{
    Clock, EditCommit, EditSession, EditTarget, ItemText, Modifiers, MouseAction, MouseButton,
    MousePress, MouseState, TypeAheadSession,
};
use treegrid_layout::ItemMeasure;

use super::TreeGridView;
use crate::{SelectionMode, ViewNotification};

impl<C: Clock, K: Clone + Eq + Hash> TreeGridView<C, K> {
    /// A mouse button went down at a viewport point.
    pub fn on_mouse_down<S, M>(
        &mut self,
        point: Point,
        button: MouseButton,
        modifiers: Modifiers,
        time_ms: u64,
        source: &S,
        measure: &mut M,
    ) where
        S: TreeSource + ?Sized,
        M: ItemMeasure + ?Sized,
    {
        let hit = self.resolve(point, source, measure);
        let press = hit.target().map(|cell| {
            let native = self.display_columns().native(cell.column).unwrap_or(cell.column);
            let features = source.item_info(cell.row, native, false).features;
            MousePress::new(cell, hit.region, point, time_ms)
                .with_selected(self.state.selection.contains(cell.row))
                .with_edit_style(features.mouse_edit_style())
        });
        let actions = self.mouse.on_down(button, modifiers, press);
        self.apply_mouse_actions(&actions);
    }

    /// The pointer moved.
    pub fn on_mouse_move(&mut self, point: Point) {
        let actions = self.mouse.on_move(point);
        self.apply_mouse_actions(&actions);
    }

    /// The mouse button was released.
    pub fn on_mouse_up(&mut self, point: Point, time_ms: u64) {
        let actions = self.mouse.on_up(point, time_ms);
        self.apply_mouse_actions(&actions);
    }

    /// The edit timer requested by [`ViewNotification::StartEditTimer`] fired.
    pub fn on_timer(&mut self, time_ms: u64) {
        let actions = self.mouse.on_tick(time_ms);
        self.apply_mouse_actions(&actions);
    }

    /// Abandons any press, drag, or armed edit, as on capture loss.
    pub fn cancel_mouse(&mut self) {
        let actions = self.mouse.cancel();
        self.apply_mouse_actions(&actions);
    }

    /// The state of the mouse state machine.
    #[must_use]
    pub fn mouse_state(&self) -> MouseState {
        self.mouse.state()
    }

    fn apply_mouse_actions(&mut self, actions: &[MouseAction]) {
        for action in actions {
            match *action {
                MouseAction::Select {
                    cell,
                    button,
                    modifiers,
                } => self.select_from_mouse(cell, button, modifiers),
                MouseAction::ToggleExpansion(cell) => {
                    self.notify(ViewNotification::ToggleExpansion(cell));
                }
                MouseAction::BeginDrag(cell) => self.notify(ViewNotification::DragStarted(cell)),
                MouseAction::EndDrag => self.notify(ViewNotification::DragEnded),
                MouseAction::StartEditTimer { delay_ms, .. } => {
                    self.notify(ViewNotification::StartEditTimer { delay_ms });
                }
                MouseAction::BeginLabelEdit(cell) => {
                    // The row can vanish between the click and the timer.
                    let _ = self.begin_label_edit(cell.row, cell.column);
                }
                MouseAction::CancelEdit => {
                    self.cancel_label_edit();
                }
                MouseAction::Activate(cell) => self.notify(ViewNotification::Activate(cell)),
            }
        }
    }

    /// Applies a click to the selection.
    ///
    /// A secondary click on a selected row only moves the caret. Otherwise extended
    /// mode extends with shift and toggles with control, multiple mode toggles, and
    /// single mode selects the row.
    fn select_from_mouse(&mut self, cell: TreeCoordinate, button: MouseButton, modifiers: Modifiers) {
        if cell.row >= self.state.item_count || self.set_current_column(cell.column).is_err() {
            return;
        }
        let row = cell.row;
        let selected = self.state.selection.contains(row);
        let result = if button == MouseButton::Secondary && selected {
            self.change_selection(|state| state.set_caret(row))
        } else {
            match self.config.selection_mode {
                SelectionMode::Extended => {
                    let toggle = modifiers.contains(Modifiers::CONTROL);
                    let action = if toggle {
                        ModifySelectionAction::Toggle
                    } else {
                        ModifySelectionAction::Select
                    };
                    self.set_current_extended_multi_select_index(
                        row,
                        modifiers.contains(Modifiers::SHIFT),
                        toggle,
                        action,
                    )
                    .map(|_| ())
                }
                SelectionMode::Multiple => self.change_selection(|state| {
                    state.set_caret(row)?;
                    state.anchor = Some(row);
                    state.selection.toggle(row);
                    Ok(())
                }),
                SelectionMode::Single if selected => {
                    self.change_selection(|state| state.set_caret(row))
                }
                SelectionMode::Single => self.set_current_index(row),
            }
        };
        debug_assert!(result.is_ok(), "row {row} was checked against the row count");
    }

    // --- Type-ahead ---

    /// The type-ahead session.
    #[must_use]
    pub fn type_ahead(&self) -> &TypeAheadSession<C> {
        &self.type_ahead
    }

    /// Extends the type-ahead prefix with `ch` and moves the caret to the matching row.
    ///
    /// Returns the row, or `None` if nothing matched.
    pub fn type_char<T: ItemText + ?Sized>(&mut self, ch: char, items: &T) -> Option<usize> {
        let current = self.state.caret.unwrap_or(0);
        let row = self.type_ahead.search(ch, items, current)?;
        let column = self.current_column();
        self.focus_cell(TreeCoordinate::new(row, column)).ok()?;
        Some(row)
    }

    /// Drops the type-ahead prefix.
    pub fn reset_type_ahead(&mut self) {
        self.type_ahead.reset();
    }

    // --- Label editing ---

    /// Starts editing the label at `row` and display column `column`, ending any
    /// edit in progress. The edit starts pending; activate it through
    /// [`label_edit_mut`](Self::label_edit_mut) once the edit control shows.
    pub fn begin_label_edit(&mut self, row: usize, column: usize) -> Result<EditTarget, TreeGridError> {
        TreeGridError::check_row(row, self.state.item_count)?;
        let columns = self.display_columns();
        let native = columns.native(column).ok_or(TreeGridError::ColumnOutOfRange {
            column,
            count: columns.visible_count(),
        })?;
        self.cancel_label_edit();
        if self.mouse.state() == MouseState::EditPending {
            // The armed timer would otherwise cancel this edit later.
            let _ = self.mouse.cancel();
        }
        let target = EditTarget::new(row, native);
        self.edit = Some(EditSession::new(target));
        if column < self.columns.column_count() {
            self.scroll_into_view(row, column)?;
        }
        self.notify(ViewNotification::LabelEditStarted(target));
        Ok(target)
    }

    /// The edit in progress.
    #[must_use]
    pub fn label_edit(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    /// Mutable access to the edit in progress.
    pub fn label_edit_mut(&mut self) -> Option<&mut EditSession> {
        self.edit.as_mut()
    }

    /// Ends the edit in progress, accepting its text if it was active.
    pub fn commit_label_edit(&mut self) -> Option<EditCommit> {
        let mut edit = self.edit.take()?;
        let commit = edit.commit();
        self.notify(ViewNotification::LabelEditEnded {
            target: edit.target(),
            committed: commit.is_some(),
        });
        commit
    }

    /// Ends the edit in progress without a change. Returns `false` if there was none.
    pub fn cancel_label_edit(&mut self) -> bool {
        let Some(mut edit) = self.edit.take() else {
            return false;
        };
        edit.cancel();
        self.notify(ViewNotification::LabelEditEnded {
            target: edit.target(),
            committed: false,
        });
        true
    }
}
