// Copyright 2025 the Treegrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mouse press sequencing: select, drag, delayed label edit, and double click.
//!
//! ## Usage
//!
//! The host resolves each pointer event with a hit tester, feeds it to the
//! [`MouseFsm`], and carries out the returned [`MouseAction`]s:
//!
//! ```
//! use kurbo::Point;
//! use treegrid_core::{MouseEditStyle, TreeCoordinate};
//! use treegrid_input::mouse::{Modifiers, MouseAction, MouseButton, MouseFsm, MousePress};
//! use treegrid_layout::HitRegion;
//!
//! let mut fsm = MouseFsm::new();
//! let cell = TreeCoordinate::new(3, 0);
//! let press = MousePress::new(cell, HitRegion::Label, Point::new(40.0, 60.0), 1_000)
//!     .with_selected(true)
//!     .with_edit_style(MouseEditStyle::Delayed);
//!
//! // Clicking an already selected label arms the edit timer on release.
//! fsm.on_down(MouseButton::Primary, Modifiers::empty(), Some(press));
//! let actions = fsm.on_up(Point::new(41.0, 60.0), 1_100);
//! assert!(actions.contains(&MouseAction::StartEditTimer { cell, delay_ms: 500 }));
//!
//! // The edit starts once the delay has passed.
//! assert_eq!(fsm.on_tick(1_700).as_slice(), [MouseAction::BeginLabelEdit(cell)]);
//! ```
//!
//! ## Transitions
//!
//! | State         | Event                       | Next          | Actions                        |
//! |---------------|-----------------------------|---------------|--------------------------------|
//! | `Idle`        | down on glyph               | `Idle`        | `ToggleExpansion`              |
//! | `Idle`        | down, second click on cell  | `ButtonDown`  | `Activate`                     |
//! | `Idle`        | down on item                | `ButtonDown`  | `Select` unless deferred       |
//! | `ButtonDown`  | move past threshold         | `Dragging`    | `BeginDrag`                    |
//! | `ButtonDown`  | up                          | `Idle` / `EditPending` | deferred `Select`, edit actions |
//! | `Dragging`    | up                          | `Idle`        | `EndDrag`                      |
//! | `EditPending` | tick past deadline          | `Idle`        | `BeginLabelEdit`               |
//! | `EditPending` | down                        | as `Idle`     | `CancelEdit`, then as `Idle`   |
//! | any           | cancel                      | `Idle`        | `EndDrag` / `CancelEdit`       |

use kurbo::Point;
use smallvec::SmallVec;
use treegrid_core::{MouseEditStyle, TreeCoordinate};
use treegrid_layout::HitRegion;

bitflags::bitflags! {
    /// Keyboard modifiers held during a press.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Extend the selection from the anchor.
        const SHIFT = 0b01;
        /// Toggle the clicked row, keeping the rest of the selection.
        const CONTROL = 0b10;
    }
}

/// Mouse buttons the state machine distinguishes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// The main button. Selects, drags, edits, and activates.
    #[default]
    Primary,
    /// The context button. Selects only.
    Secondary,
}

/// Thresholds for telling clicks, drags, and double clicks apart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouseConfig {
    /// Distance the pointer must travel with a button down before a drag starts.
    pub drag_threshold: f64,
    /// Delay between a click on a selected label and the start of its edit.
    pub edit_delay_ms: u64,
    /// Longest gap between two clicks on one cell that counts as a double click.
    pub double_click_ms: u64,
}

impl Default for MouseConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 4.0,
            edit_delay_ms: 500,
            double_click_ms: 500,
        }
    }
}

impl MouseConfig {
    /// Sets the drag distance threshold.
    #[must_use]
    pub fn with_drag_threshold(mut self, distance: f64) -> Self {
        self.drag_threshold = distance.max(0.0);
        self
    }

    /// Sets the delayed edit interval.
    #[must_use]
    pub const fn with_edit_delay_ms(mut self, delay: u64) -> Self {
        self.edit_delay_ms = delay;
        self
    }

    /// Sets the double click interval.
    #[must_use]
    pub const fn with_double_click_ms(mut self, interval: u64) -> Self {
        self.double_click_ms = interval;
        self
    }
}

/// What the pointer landed on when a button went down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MousePress {
    /// The cell acted on (the owner of a merged region).
    pub cell: TreeCoordinate,
    /// Where on the item the press landed.
    pub region: HitRegion,
    /// Pointer position.
    pub position: Point,
    /// Event time in milliseconds.
    pub time_ms: u64,
    /// The row was selected before the press.
    pub selected: bool,
    /// How the cell's branch lets mouse clicks start a label edit.
    pub edit_style: MouseEditStyle,
}

impl MousePress {
    /// A press on an unselected cell whose branch does not allow mouse edits.
    #[must_use]
    pub const fn new(cell: TreeCoordinate, region: HitRegion, position: Point, time_ms: u64) -> Self {
        Self {
            cell,
            region,
            position,
            time_ms,
            selected: false,
            edit_style: MouseEditStyle::None,
        }
    }

    /// Records whether the row was already selected.
    #[must_use]
    pub const fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Records the branch's mouse edit style.
    #[must_use]
    pub const fn with_edit_style(mut self, style: MouseEditStyle) -> Self {
        self.edit_style = style;
        self
    }
}

/// Commands for the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseAction {
    /// Update the selection for a click on `cell`.
    Select {
        /// The clicked cell.
        cell: TreeCoordinate,
        /// The button pressed.
        button: MouseButton,
        /// Modifiers held.
        modifiers: Modifiers,
    },
    /// Expand or collapse the row.
    ToggleExpansion(TreeCoordinate),
    /// A drag of the selection started on this cell.
    BeginDrag(TreeCoordinate),
    /// The drag ended.
    EndDrag,
    /// Start a timer and call [`MouseFsm::on_tick`] after `delay_ms`.
    StartEditTimer {
        /// The cell that will be edited.
        cell: TreeCoordinate,
        /// Milliseconds until the edit starts.
        delay_ms: u64,
    },
    /// Start editing the label of the cell.
    BeginLabelEdit(TreeCoordinate),
    /// A pending edit was abandoned.
    CancelEdit,
    /// The cell was double clicked.
    Activate(TreeCoordinate),
}

/// Actions produced by one event. Most events produce at most two.
pub type MouseActions = SmallVec<[MouseAction; 2]>;

/// The state of the machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MouseState {
    /// No button is down and no edit is pending.
    #[default]
    Idle,
    /// A button is down and the pointer has not moved far.
    ButtonDown,
    /// A drag is in progress.
    Dragging,
    /// A delayed label edit is armed.
    EditPending,
}

#[derive(Clone, Copy, Debug)]
struct Down {
    press: MousePress,
    button: MouseButton,
    modifiers: Modifiers,
    /// Selection was deferred to release so that a drag can carry it.
    select_on_up: bool,
    /// The press was the second half of a double click.
    double_click: bool,
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    Idle,
    ButtonDown(Down),
    Dragging(TreeCoordinate),
    EditPending { cell: TreeCoordinate, deadline: u64 },
}

/// Explicit state machine for mouse presses on a tree grid.
#[derive(Clone, Debug)]
pub struct MouseFsm {
    config: MouseConfig,
    phase: Phase,
    last_click: Option<(TreeCoordinate, u64)>,
}

impl Default for MouseFsm {
    fn default() -> Self {
        Self::new()
    }
}

impl MouseFsm {
    /// Creates a machine with the default [`MouseConfig`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MouseConfig::default())
    }

    /// Creates a machine with custom thresholds.
    #[must_use]
    pub const fn with_config(config: MouseConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            last_click: None,
        }
    }

    /// The thresholds in use.
    #[must_use]
    pub const fn config(&self) -> &MouseConfig {
        &self.config
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> MouseState {
        match self.phase {
            Phase::Idle => MouseState::Idle,
            Phase::ButtonDown(_) => MouseState::ButtonDown,
            Phase::Dragging(_) => MouseState::Dragging,
            Phase::EditPending { .. } => MouseState::EditPending,
        }
    }

    /// The cell a drag in progress started on.
    #[must_use]
    pub const fn drag_origin(&self) -> Option<TreeCoordinate> {
        match self.phase {
            Phase::Dragging(cell) => Some(cell),
            _ => None,
        }
    }

    /// A button went down on `press`, or on no item when `press` is `None`.
    ///
    /// Presses on the indent or to the right of the label only end what was
    /// in progress.
    pub fn on_down(
        &mut self,
        button: MouseButton,
        modifiers: Modifiers,
        press: Option<MousePress>,
    ) -> MouseActions {
        let mut actions = MouseActions::new();
        match self.phase {
            Phase::EditPending { .. } => actions.push(MouseAction::CancelEdit),
            Phase::Dragging(_) => actions.push(MouseAction::EndDrag),
            Phase::Idle | Phase::ButtonDown(_) => {}
        }
        self.phase = Phase::Idle;

        let Some(press) = press.filter(|p| p.region.is_on_item() || p.region == HitRegion::Glyph)
        else {
            return actions;
        };
        if press.region == HitRegion::Glyph && button == MouseButton::Primary {
            self.last_click = None;
            actions.push(MouseAction::ToggleExpansion(press.cell));
            return actions;
        }

        let double_click = button == MouseButton::Primary
            && self.last_click.is_some_and(|(cell, time)| {
                cell == press.cell
                    && press.time_ms.saturating_sub(time) <= self.config.double_click_ms
            });
        let select_on_up = !double_click
            && press.selected
            && button == MouseButton::Primary
            && modifiers.is_empty();
        if double_click {
            self.last_click = None;
            actions.push(MouseAction::Activate(press.cell));
        } else if !select_on_up {
            actions.push(MouseAction::Select {
                cell: press.cell,
                button,
                modifiers,
            });
        }
        self.phase = Phase::ButtonDown(Down {
            press,
            button,
            modifiers,
            select_on_up,
            double_click,
        });
        actions
    }

    /// The pointer moved to `position`.
    pub fn on_move(&mut self, position: Point) -> MouseActions {
        let mut actions = MouseActions::new();
        if let Phase::ButtonDown(down) = self.phase {
            let moved = down.press.position.distance(position);
            if down.button == MouseButton::Primary
                && !down.double_click
                && moved > self.config.drag_threshold
            {
                self.phase = Phase::Dragging(down.press.cell);
                actions.push(MouseAction::BeginDrag(down.press.cell));
            }
        }
        actions
    }

    /// The button was released at `position`.
    pub fn on_up(&mut self, position: Point, time_ms: u64) -> MouseActions {
        let mut actions = MouseActions::new();
        match self.phase {
            Phase::Idle | Phase::EditPending { .. } => {}
            Phase::Dragging(_) => {
                self.phase = Phase::Idle;
                actions.push(MouseAction::EndDrag);
            }
            Phase::ButtonDown(down) => {
                self.phase = Phase::Idle;
                if down.double_click {
                    return actions;
                }
                let cell = down.press.cell;
                if down.select_on_up {
                    actions.push(MouseAction::Select {
                        cell,
                        button: down.button,
                        modifiers: down.modifiers,
                    });
                }
                let plain_label_click = down.button == MouseButton::Primary
                    && down.modifiers.is_empty()
                    && down.press.region == HitRegion::Label
                    && down.press.position.distance(position) <= self.config.drag_threshold;
                if plain_label_click {
                    match down.press.edit_style {
                        MouseEditStyle::Immediate => {
                            actions.push(MouseAction::BeginLabelEdit(cell));
                        }
                        MouseEditStyle::Delayed if down.press.selected => {
                            self.phase = Phase::EditPending {
                                cell,
                                deadline: time_ms.saturating_add(self.config.edit_delay_ms),
                            };
                            actions.push(MouseAction::StartEditTimer {
                                cell,
                                delay_ms: self.config.edit_delay_ms,
                            });
                        }
                        MouseEditStyle::Delayed | MouseEditStyle::None => {}
                    }
                }
                if down.button == MouseButton::Primary {
                    self.last_click = Some((cell, down.press.time_ms));
                }
            }
        }
        actions
    }

    /// The edit timer fired, or the host polls at `time_ms`.
    pub fn on_tick(&mut self, time_ms: u64) -> MouseActions {
        let mut actions = MouseActions::new();
        if let Phase::EditPending { cell, deadline } = self.phase {
            if time_ms >= deadline {
                self.phase = Phase::Idle;
                self.last_click = None;
                actions.push(MouseAction::BeginLabelEdit(cell));
            }
        }
        actions
    }

    /// Abandons any press, drag, or pending edit (focus loss, capture loss, or a
    /// structural change under the pointer).
    pub fn cancel(&mut self) -> MouseActions {
        let mut actions = MouseActions::new();
        match self.phase {
            Phase::Dragging(_) => actions.push(MouseAction::EndDrag),
            Phase::EditPending { .. } => actions.push(MouseAction::CancelEdit),
            Phase::Idle | Phase::ButtonDown(_) => {}
        }
        self.phase = Phase::Idle;
        self.last_click = None;
        actions
    }
}
