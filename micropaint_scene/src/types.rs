// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: node identifiers, cursors, and containment shapes.

use alloc::boxed::Box;
use core::fmt;

use kurbo::Point;
use micropaint_hit::stroke::Polyline;
use micropaint_hit::{HitParams, PreciseHitTest};

use crate::placement::Placement;

/// Identifier for a node in the scene (generational).
///
/// A removed node's slot may be reused; the generation keeps old handles
/// from resolving to the new occupant.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.0, self.1)
    }
}

/// Cursor shape a node asks for while it is the frontmost node under the
/// pointer.
///
/// These are the standard shapes every desktop window system provides.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum CursorId {
    /// Regular arrow.
    #[default]
    Arrow,
    /// Text insertion bar.
    IBeam,
    /// Precision crosshair, used over the drawing canvas.
    Crosshair,
    /// Pointing hand, used over buttons.
    Hand,
    /// Horizontal resize arrows.
    HorizontalResize,
    /// Vertical resize arrows.
    VerticalResize,
}

/// Containment predicate of a node, evaluated in its local space.
#[derive(Default)]
pub enum HitShape {
    /// The rect `0,0 → placement.size`.
    #[default]
    Bounds,
    /// Contains every point. Used for the root, which covers the window.
    Everywhere,
    /// Contains no point. Useful for purely structural groups.
    Nothing,
    /// A freehand stroke.
    Stroke(Polyline),
    /// Any other predicate.
    Custom(Box<dyn PreciseHitTest>),
}

impl HitShape {
    /// Evaluate the predicate for `local`, a point in the node's own space.
    pub fn contains(&self, placement: &Placement, local: Point, params: &HitParams) -> bool {
        match self {
            Self::Bounds => placement.local_bounds().contains_local(local, params),
            Self::Everywhere => true,
            Self::Nothing => false,
            Self::Stroke(stroke) => stroke.contains_local(local, params),
            Self::Custom(shape) => shape.contains_local(local, params),
        }
    }
}

impl fmt::Debug for HitShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounds => f.write_str("Bounds"),
            Self::Everywhere => f.write_str("Everywhere"),
            Self::Nothing => f.write_str("Nothing"),
            Self::Stroke(stroke) => f
                .debug_tuple("Stroke")
                .field(&stroke.points().len())
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<Polyline> for HitShape {
    fn from(stroke: Polyline) -> Self {
        Self::Stroke(stroke)
    }
}

/// Everything needed to insert a node.
#[derive(Debug, Default)]
pub struct NodeSpec {
    /// Placement relative to the parent.
    pub placement: Placement,
    /// Containment predicate.
    pub shape: HitShape,
    /// Cursor requested while this node is frontmost under the pointer.
    pub cursor: CursorId,
}

impl NodeSpec {
    /// A rectangular node with the default cursor.
    pub fn new(placement: Placement) -> Self {
        Self {
            placement,
            ..Self::default()
        }
    }

    /// Replace the containment predicate.
    pub fn with_shape(mut self, shape: impl Into<HitShape>) -> Self {
        self.shape = shape.into();
        self
    }

    /// Replace the cursor.
    pub fn with_cursor(mut self, cursor: CursorId) -> Self {
        self.cursor = cursor;
        self
    }
}
