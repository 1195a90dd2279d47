// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus switching.
//!
//! Focus moves only when a pointer button resolves to a target. The node
//! losing focus and then the node gaining it each get one upward walk
//! through their ancestor chain, in the bubble phase, with no hit testing.

use micropaint_scene::{NodeId, Scene};

use crate::listeners::{FocusKind, Listeners};
use crate::types::{Event, Focus, Phase};

/// Walk from `target` to the root invoking the `kind` handler of every node
/// on the way, until one cancels.
pub(crate) fn walk(scene: &Scene, listeners: &mut Listeners, target: NodeId, kind: FocusKind) {
    let mut ev = Event::targeted(target, Focus);
    for node in scene.ancestors(target) {
        ev.visit(node, Phase::Bubble);
        listeners.focus(node, kind, &mut ev);
        if ev.is_cancelled() {
            break;
        }
    }
}

/// Move focus from `current` to `candidate`.
///
/// Focus-out for the old node always runs before focus-in for the new one.
/// Returns the new focused node.
pub(crate) fn switch(
    scene: &Scene,
    listeners: &mut Listeners,
    current: Option<NodeId>,
    candidate: NodeId,
) -> NodeId {
    if current == Some(candidate) {
        return candidate;
    }
    tracing::debug!(from = ?current, to = %candidate, "focus switch");
    if let Some(old) = current {
        walk(scene, listeners, old, FocusKind::Out);
    }
    walk(scene, listeners, candidate, FocusKind::In);
    candidate
}

/// Whether `focused` is still alive and under `root`.
pub(crate) fn is_attached(scene: &Scene, root: NodeId, focused: NodeId) -> bool {
    scene.is_alive(focused) && scene.is_descendant_of(focused, root)
}
