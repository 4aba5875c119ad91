// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label-edit lifecycle.
//!
//! An [`EditSession`] names the cell being edited by coordinate only. The view
//! that owns the session outlives it and keeps the coordinate current as rows
//! shift; the host's edit control reads the target and text back through the
//! view rather than holding a reference to it.

use alloc::string::String;
use treegrid_core::{ItemCountChanged, ItemMoved, shift_after_change, shift_for_move};

/// The cell an edit applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EditTarget {
    /// Absolute row.
    pub row: usize,
    /// Native column.
    pub native_column: usize,
}

impl EditTarget {
    /// Creates a target.
    #[must_use]
    pub const fn new(row: usize, native_column: usize) -> Self {
        Self { row, native_column }
    }
}

/// Where an edit is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EditState {
    /// Requested but the edit control is not showing yet.
    #[default]
    Pending,
    /// The edit control is showing.
    Active,
    /// The new text was accepted.
    Committed,
    /// The edit ended without a change.
    Cancelled,
}

/// A committed edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditCommit {
    /// The edited cell.
    pub target: EditTarget,
    /// The new label text.
    pub text: String,
}

/// One label edit, from request to commit or cancel.
#[derive(Clone, Debug)]
pub struct EditSession {
    target: EditTarget,
    state: EditState,
    text: String,
}

impl EditSession {
    /// A pending edit of `target`.
    #[must_use]
    pub const fn new(target: EditTarget) -> Self {
        Self {
            target,
            state: EditState::Pending,
            text: String::new(),
        }
    }

    /// The cell being edited, adjusted for structural changes so far.
    #[must_use]
    pub const fn target(&self) -> EditTarget {
        self.target
    }

    /// The lifecycle state.
    #[must_use]
    pub const fn state(&self) -> EditState {
        self.state
    }

    /// Returns `true` while the edit is pending or active.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self.state, EditState::Pending | EditState::Active)
    }

    /// The text in the edit control.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Shows the edit control with `initial` text. Only a pending edit activates.
    pub fn activate(&mut self, initial: impl Into<String>) -> bool {
        if self.state != EditState::Pending {
            return false;
        }
        self.text = initial.into();
        self.state = EditState::Active;
        true
    }

    /// Replaces the text of an active edit.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        if self.state != EditState::Active {
            return false;
        }
        self.text = text.into();
        true
    }

    /// Accepts the current text of an active edit.
    pub fn commit(&mut self) -> Option<EditCommit> {
        if self.state != EditState::Active {
            return None;
        }
        self.state = EditState::Committed;
        Some(EditCommit {
            target: self.target,
            text: core::mem::take(&mut self.text),
        })
    }

    /// Ends a live edit without a change. Returns `false` if it had already ended.
    pub fn cancel(&mut self) -> bool {
        if !self.is_live() {
            return false;
        }
        self.state = EditState::Cancelled;
        self.text.clear();
        true
    }

    /// Follows the target through a row-count change.
    ///
    /// Returns `false` once the edit is no longer live; a deleted row cancels it.
    pub fn apply_count_change(&mut self, change: &ItemCountChanged) -> bool {
        if !self.is_live() {
            return false;
        }
        let delta = change.change_for_column(self.target.native_column);
        match shift_after_change(self.target.row, change.change_ceiling(), delta) {
            Some(row) => {
                self.target.row = row;
                true
            }
            None => {
                self.cancel();
                false
            }
        }
    }

    /// Cancels the edit if a move shifts its row.
    ///
    /// Returns `false` once the edit is no longer live.
    pub fn apply_move(&mut self, moved: &ItemMoved) -> bool {
        if !self.is_live() {
            return false;
        }
        if moved.applies_to_column(self.target.native_column)
            && shift_for_move(self.target.row, moved) != self.target.row
        {
            self.cancel();
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_runs_pending_active_committed() {
        let mut edit = EditSession::new(EditTarget::new(4, 0));
        assert_eq!(edit.state(), EditState::Pending);
        assert!(!edit.set_text("x"), "pending edits have no text");
        assert!(edit.activate("old"));
        assert!(!edit.activate("again"));
        assert!(edit.set_text("new"));
        let commit = edit.commit().expect("active edit commits");
        assert_eq!(commit.text, "new");
        assert_eq!(commit.target, EditTarget::new(4, 0));
        assert_eq!(edit.state(), EditState::Committed);
        assert!(!edit.cancel(), "finished edits stay finished");
        assert!(edit.commit().is_none());
    }

    #[test]
    fn rows_above_shift_the_target() {
        let mut edit = EditSession::new(EditTarget::new(10, 0));
        assert!(edit.apply_count_change(&ItemCountChanged::toggle(2, 0, 3)));
        assert_eq!(edit.target().row, 13);
        assert!(edit.apply_count_change(&ItemCountChanged::toggle(2, 0, -3)));
        assert_eq!(edit.target().row, 10);
    }

    #[test]
    fn deleting_the_row_cancels() {
        let mut edit = EditSession::new(EditTarget::new(5, 0));
        edit.activate("label");
        assert!(!edit.apply_count_change(&ItemCountChanged::toggle(3, 0, -4)));
        assert_eq!(edit.state(), EditState::Cancelled);
        assert_eq!(edit.text(), "");
    }

    #[test]
    fn sub_item_changes_apply_to_their_column() {
        let mut edit = EditSession::new(EditTarget::new(6, 2));
        let change = ItemCountChanged::toggle(1, 0, -5).with_sub_item_change(2, 1);
        assert!(edit.apply_count_change(&change));
        assert_eq!(edit.target().row, 7);
    }

    #[test]
    fn moves_cancel_only_when_the_row_shifts() {
        let mut edit = EditSession::new(EditTarget::new(1, 0));
        assert!(edit.apply_move(&ItemMoved::new(5, 8, 2)));
        assert!(edit.is_live());
        assert!(!edit.apply_move(&ItemMoved::new(3, 0, 2)));
        assert_eq!(edit.state(), EditState::Cancelled);
    }
}
