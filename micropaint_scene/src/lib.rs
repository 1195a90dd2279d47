// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Micropaint Scene: the node tree behind the paint application's UI.
//!
//! Every visual element, from the window-sized root down to a single
//! freehand stroke, is a node in one [`Scene`]. A node has:
//!
//! - a [`Placement`] relative to its parent (translation, rotation about its
//!   own center, scale, and a local size),
//! - a containment predicate ([`HitShape`]) evaluated in its local space,
//! - a [`CursorId`] it requests while it is the frontmost node under the
//!   pointer,
//! - a `hovered` flag maintained by the event dispatcher,
//! - an ordered list of children (paint order) and a back-reference to its
//!   parent.
//!
//! ## Not a renderer
//!
//! The scene stores geometry and interaction state only. Drawing, clipping
//! and text layout belong to the rendering collaborator, which walks
//! [`Scene::children_of`] in paint order and applies [`Placement::affine`].
//!
//! ## Coordinate spaces
//!
//! Points travel downward: a point in a node's parent space is mapped into
//! the node's local space with [`Scene::to_local`], tested with
//! [`Scene::contains`], and then handed to the node's children. A
//! [degenerate](Placement::is_degenerate) placement (zero scale) has no
//! inverse, so the node and its subtree are unreachable until the scale is
//! fixed.
//!
//! ## API overview
//!
//! - [`Scene::insert`] / [`Scene::remove`] / [`Scene::reparent`] keep parent
//!   links and child lists consistent and report [`SceneError`]s.
//! - [`Scene::set_placement`], [`Scene::set_shape`], [`Scene::set_cursor`].
//! - [`Scene::ancestors`] walks from a node up to its root.
//! - [`Scene::hit_test_point`] finds the deepest frontmost node under a
//!   point, as used for cursor resolution.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod placement;
mod tree;
mod types;

pub use error::SceneError;
pub use micropaint_hit::{HitParams, PreciseHitTest};
pub use placement::Placement;
pub use tree::{Ancestors, Hit, Scene};
pub use types::{CursorId, HitShape, NodeId, NodeSpec};
