// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Treegrid Input: interaction state for virtualized tree grids.
//!
//! These are small state machines that sit between a host's input events and a
//! tree grid view. None of them touch the view directly; each returns what the
//! host should do next.
//!
//! - [`mouse`]: an explicit press/drag/edit state machine. Feed it resolved hits and
//!   carry out the [`MouseAction`]s it returns.
//! - [`type_ahead`]: incremental label search with a pluggable [`Clock`].
//! - [`edit`]: the lifecycle of one label edit, addressed by coordinate and kept
//!   current across structural changes.
//!
//! This crate is `no_std` and uses `alloc`. The `std` feature adds
//! [`SystemClock`](type_ahead::SystemClock).

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod edit;
pub mod mouse;
pub mod type_ahead;

pub use edit::{EditCommit, EditSession, EditState, EditTarget};
pub use mouse::{
    Modifiers, MouseAction, MouseActions, MouseButton, MouseConfig, MouseFsm, MousePress,
    MouseState,
};
pub use type_ahead::{Clock, ItemText, ManualClock, TypeAheadConfig, TypeAheadSession};
