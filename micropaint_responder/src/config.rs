// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatch policy knobs.

/// What a bubbling pointer handler sees as [`position`](crate::types::Event::position).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BubblePosition {
    /// Each bubbling handler sees the pointer in its own local space, the
    /// same point it saw while capturing.
    #[default]
    Restore,
    /// The position keeps the value computed at the deepest node the
    /// descent reached, whatever node is bubbling.
    Deepest,
}

/// Policy for a [`Dispatcher`](crate::dispatcher::Dispatcher).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Position seen by bubbling handlers.
    pub bubble_position: BubblePosition,
    /// Drop the focused node before key routing and focus switching once it
    /// is removed from the scene or detached from the root.
    ///
    /// No focus-out is delivered for such a node.
    pub clear_detached_focus: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            bubble_position: BubblePosition::Restore,
            clear_detached_focus: true,
        }
    }
}
