// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event envelopes and input payloads.

use kurbo::Point;
use micropaint_scene::NodeId;

/// Traversal phase of a listener invocation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Root → target, before descending further.
    Capture,
    /// Target → root, while returning from the descent. Upward-only walks
    /// (focus, keys, chars) always run in this phase.
    Bubble,
}

/// Pointer button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Wheel button.
    Middle,
    /// Any other button, by window-system index.
    Other(u8),
}

impl From<u8> for MouseButton {
    /// Window-system button index: 0 left, 1 right, 2 middle.
    fn from(index: u8) -> Self {
        match index {
            0 => Self::Left,
            1 => Self::Right,
            2 => Self::Middle,
            n => Self::Other(n),
        }
    }
}

/// Button or key transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Released.
    Release,
    /// Pressed.
    Press,
    /// Held long enough to auto-repeat (keys only).
    Repeat,
}

bitflags::bitflags! {
    /// Modifier keys held during an occurrence.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Either shift key.
        const SHIFT     = 0b0000_0001;
        /// Either control key.
        const CONTROL   = 0b0000_0010;
        /// Either alt/option key.
        const ALT       = 0b0000_0100;
        /// Either super/command key.
        const SUPER     = 0b0000_1000;
        /// Caps lock is on.
        const CAPS_LOCK = 0b0001_0000;
        /// Num lock is on.
        const NUM_LOCK  = 0b0010_0000;
    }
}

/// Platform-independent key code, as reported by the window system.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyCode(pub i32);

/// Pointer payload, shared by click, move, enter and leave events.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Mouse {
    /// Pointer position in the local space of the node currently handling
    /// the event.
    pub position: Point,
    /// Button for button occurrences; `None` for movement.
    pub button: Option<MouseButton>,
    /// Transition for button occurrences; `None` for movement.
    pub action: Option<Action>,
    /// Modifiers held.
    pub modifiers: Modifiers,
}

impl Mouse {
    /// Payload for a pointer movement.
    pub fn moved(position: Point) -> Self {
        Self {
            position,
            button: None,
            action: None,
            modifiers: Modifiers::empty(),
        }
    }
}

/// Key payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Key {
    /// Key code.
    pub key: KeyCode,
    /// Hardware scan code.
    pub scancode: i32,
    /// Transition.
    pub action: Action,
    /// Modifiers held.
    pub modifiers: Modifiers,
}

/// Text input payload: one Unicode scalar value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Char {
    /// The typed character.
    pub ch: char,
}

/// Focus transition payload. The event's target is the node gaining or
/// losing focus.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Focus;

/// Per-dispatch mutable record handed to every listener.
///
/// A fresh envelope is built for each traversal and dropped when it ends.
/// Listeners stop the rest of that traversal with [`Event::cancel`].
#[derive(Clone, Debug)]
pub struct Event<P> {
    target: Option<NodeId>,
    current_target: NodeId,
    phase: Phase,
    cancelled: bool,
    payload: P,
}

/// Click, move, enter and leave events.
pub type MouseEvent = Event<Mouse>;
/// Key events.
pub type KeyEvent = Event<Key>;
/// Character input events.
pub type CharEvent = Event<Char>;
/// Focus-in and focus-out events.
pub type FocusEvent = Event<Focus>;

impl<P> Event<P> {
    /// Start an envelope whose traversal begins at `start`.
    pub(crate) fn new(start: NodeId, payload: P) -> Self {
        Self {
            target: None,
            current_target: start,
            phase: Phase::Capture,
            cancelled: false,
            payload,
        }
    }

    /// Start an envelope whose target is known up front.
    pub(crate) fn targeted(target: NodeId, payload: P) -> Self {
        Self {
            target: Some(target),
            current_target: target,
            phase: Phase::Bubble,
            cancelled: false,
            payload,
        }
    }

    /// The node the dispatch resolved to so far.
    ///
    /// During capture this follows the descent; once the deepest listener
    /// is reached it stays fixed for the rest of the traversal.
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// The node whose listener is running.
    pub fn current_target(&self) -> NodeId {
        self.current_target
    }

    /// Phase of the running invocation.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Stop this traversal: no further listeners run in it.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Whether a listener cancelled the traversal.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// The payload.
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Mutable payload, e.g. for a listener that rewrites input.
    pub fn payload_mut(&mut self) -> &mut P {
        &mut self.payload
    }

    pub(crate) fn set_target(&mut self, node: NodeId) {
        self.target = Some(node);
    }

    pub(crate) fn visit(&mut self, node: NodeId, phase: Phase) {
        self.current_target = node;
        self.phase = phase;
    }
}

impl Event<Mouse> {
    /// Pointer position in the current target's local space.
    pub fn position(&self) -> Point {
        self.payload.position
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.payload.position = position;
    }
}
