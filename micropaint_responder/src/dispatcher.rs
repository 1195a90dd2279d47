// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher: turns raw window input into routed events.
//!
//! One [`Dispatcher`] serves one scene root. Each inbound call runs one
//! complete dispatch before returning:
//!
//! - [`Dispatcher::pointer_button`]: click route, then focus switch.
//! - [`Dispatcher::pointer_moved`]: move route, leave pass, enter pass,
//!   cursor resolution, each independent of the others' cancellation.
//! - [`Dispatcher::key`] / [`Dispatcher::char`]: upward walk from the
//!   focused node via [`KeyRouter`].
//!
//! ## Click and move routes
//!
//! The route starts at the root with the pointer in the root's local space.
//! The root is visited whether or not it contains the pointer. At each node:
//!
//! 1. If the node handles the event kind, it becomes the target and its
//!    handler runs in [`Phase::Capture`].
//! 2. Children are tried frontmost first. A child is entered only if it
//!    contains the pointer in its own local space. Once an entered child's
//!    subtree produces a new target, the siblings behind it are skipped.
//! 3. On the way back up, every node that handles the event runs its handler
//!    again in [`Phase::Bubble`], provided some target was set.
//!
//! Cancelling stops the rest of the route, bubble calls included.
//!
//! ```
//! use kurbo::{Point, Size};
//! use micropaint_responder::dispatcher::Dispatcher;
//! use micropaint_responder::listeners::Listeners;
//! use micropaint_responder::types::{Action, Modifiers, MouseButton};
//! use micropaint_scene::{HitShape, NodeSpec, Placement, Scene};
//!
//! let mut scene = Scene::new();
//! let root = scene.insert(None, NodeSpec::default().with_shape(HitShape::Everywhere)).unwrap();
//! let button = scene
//!     .insert(Some(root), NodeSpec::new(Placement::at(Point::new(10.0, 10.0), Size::new(80.0, 24.0))))
//!     .unwrap();
//!
//! let mut listeners = Listeners::new();
//! listeners.on_mouse_clicked(button, |ev| {
//!     assert_eq!(ev.position(), Point::new(5.0, 5.0));
//! });
//!
//! let mut dispatcher = Dispatcher::new(root);
//! let target = dispatcher.pointer_button(
//!     &scene,
//!     &mut listeners,
//!     Point::new(15.0, 15.0),
//!     MouseButton::Left,
//!     Action::Press,
//!     Modifiers::empty(),
//! );
//! assert_eq!(target, Some(button));
//! assert_eq!(dispatcher.focused(), Some(button));
//! ```

use kurbo::Point;
use micropaint_scene::{CursorId, NodeId, Scene};

use crate::config::{BubblePosition, DispatchConfig};
use crate::focus;
use crate::hover::HoverPass;
use crate::key_router::KeyRouter;
use crate::listeners::{Listeners, PointerKind};
use crate::types::{
    Action, CharEvent, Event, Key, KeyCode, KeyEvent, Modifiers, Mouse, MouseButton, MouseEvent,
    Phase,
};

/// Receiver of cursor-shape requests, usually the window.
pub trait CursorSink {
    /// Show `cursor` from now on.
    fn set_cursor(&mut self, cursor: CursorId);
}

impl<F: FnMut(CursorId)> CursorSink for F {
    fn set_cursor(&mut self, cursor: CursorId) {
        self(cursor);
    }
}

/// Event dispatcher for one scene root.
///
/// Owns the state that outlives a single dispatch: the focused node, the
/// cursor last applied to the window, and the last pointer position.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    root: NodeId,
    focused: Option<NodeId>,
    cursor: Option<CursorId>,
    pointer: Point,
    config: DispatchConfig,
    keys: KeyRouter,
}

impl Dispatcher {
    /// Create a dispatcher with the default [`DispatchConfig`].
    pub fn new(root: NodeId) -> Self {
        Self::with_config(root, DispatchConfig::default())
    }

    /// Create a dispatcher with an explicit policy.
    pub fn with_config(root: NodeId, config: DispatchConfig) -> Self {
        Self {
            root,
            focused: None,
            cursor: None,
            pointer: Point::ZERO,
            config,
            keys: KeyRouter,
        }
    }

    /// The root every dispatch starts from.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Start dispatching from a different root.
    ///
    /// Focus is kept; it is validated against the new root on the next
    /// button, key or char occurrence.
    pub fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    /// The policy in use.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// The focused node, if any.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// The cursor last requested from the window, if any.
    pub fn applied_cursor(&self) -> Option<CursorId> {
        self.cursor
    }

    /// The last pointer position seen, in root parent space.
    ///
    /// Hosts whose button callback carries no position pass this back to
    /// [`Dispatcher::pointer_button`].
    pub fn pointer_position(&self) -> Point {
        self.pointer
    }

    /// Dispatch a pointer button occurrence at `position` (root parent space).
    ///
    /// The resolved target takes focus, even if a handler cancelled the
    /// route. Returns the target, or `None` when no node on the route
    /// handles clicks.
    pub fn pointer_button(
        &mut self,
        scene: &Scene,
        listeners: &mut Listeners,
        position: Point,
        button: MouseButton,
        action: Action,
        modifiers: Modifiers,
    ) -> Option<NodeId> {
        tracing::trace!(?position, ?button, ?action, "pointer button");
        self.pointer = position;
        self.drop_detached_focus(scene);
        let Some(local) = scene.to_local(self.root, position) else {
            tracing::warn!(root = %self.root, "pointer button skipped: root is stale or not invertible");
            return None;
        };
        let mut ev = Event::new(
            self.root,
            Mouse {
                position: local,
                button: Some(button),
                action: Some(action),
                modifiers,
            },
        );
        Route {
            scene,
            listeners: &mut *listeners,
            kind: PointerKind::Click,
            bubble: self.config.bubble_position,
        }
        .visit(self.root, local, &mut ev);

        let target = ev.target()?;
        self.focused = Some(focus::switch(scene, listeners, self.focused, target));
        Some(target)
    }

    /// Dispatch a pointer movement to `position` (root parent space).
    ///
    /// Runs the move route, then the leave and enter passes, then cursor
    /// resolution. A cancelled move route does not affect the later steps.
    /// Returns the move route's target.
    pub fn pointer_moved(
        &mut self,
        scene: &mut Scene,
        listeners: &mut Listeners,
        position: Point,
        cursor: &mut impl CursorSink,
    ) -> Option<NodeId> {
        tracing::trace!(?position, "pointer moved");
        self.pointer = position;
        let root_local = scene.to_local(self.root, position);

        let mut target = None;
        if let Some(local) = root_local {
            let mut ev = Event::new(self.root, Mouse::moved(local));
            Route {
                scene: &*scene,
                listeners: &mut *listeners,
                kind: PointerKind::Move,
                bubble: self.config.bubble_position,
            }
            .visit(self.root, local, &mut ev);
            target = ev.target();
        } else {
            tracing::warn!(root = %self.root, "pointer move skipped: root is stale or not invertible");
        }

        let mut hover = HoverPass {
            scene: &mut *scene,
            listeners,
            bubble: self.config.bubble_position,
        };
        hover.leave(self.root, root_local, position);
        if let Some(local) = root_local {
            hover.enter(self.root, local);
            self.resolve_cursor(scene, position, cursor);
        }
        target
    }

    /// Dispatch a key occurrence to the focused node and its ancestors.
    ///
    /// Returns the finished envelope, or `None` when nothing is focused.
    pub fn key(
        &mut self,
        scene: &Scene,
        listeners: &mut Listeners,
        key: KeyCode,
        scancode: i32,
        action: Action,
        modifiers: Modifiers,
    ) -> Option<KeyEvent> {
        tracing::trace!(?key, scancode, ?action, "key");
        self.drop_detached_focus(scene);
        let key = Key {
            key,
            scancode,
            action,
            modifiers,
        };
        self.keys.route_key(scene, listeners, self.focused, key)
    }

    /// Dispatch a text occurrence to the focused node and its ancestors.
    ///
    /// Codepoints that are not Unicode scalar values are dropped.
    pub fn char(
        &mut self,
        scene: &Scene,
        listeners: &mut Listeners,
        codepoint: u32,
    ) -> Option<CharEvent> {
        tracing::trace!(codepoint, "char");
        let Some(ch) = char::from_u32(codepoint) else {
            tracing::warn!(codepoint, "char dropped: not a Unicode scalar value");
            return None;
        };
        self.drop_detached_focus(scene);
        self.keys.route_char(scene, listeners, self.focused, ch)
    }

    fn drop_detached_focus(&mut self, scene: &Scene) {
        if !self.config.clear_detached_focus {
            return;
        }
        if let Some(node) = self.focused {
            if !focus::is_attached(scene, self.root, node) {
                tracing::debug!(%node, "clearing detached focus");
                self.focused = None;
            }
        }
    }

    fn resolve_cursor(&mut self, scene: &Scene, position: Point, sink: &mut impl CursorSink) {
        let Some(hit) = scene.hit_test_point(self.root, position) else {
            return;
        };
        let wanted = scene.cursor_of(hit.node).unwrap_or_default();
        tracing::trace!(node = %hit.node, ?wanted, "cursor resolved");
        if self.cursor != Some(wanted) {
            tracing::debug!(from = ?self.cursor, to = ?wanted, "cursor change");
            sink.set_cursor(wanted);
            self.cursor = Some(wanted);
        }
    }
}

/// One click or move route.
///
/// The node passed to `visit` is entered without a containment test, so the
/// root always gets its capture call. Children are entered only when they
/// contain the pointer.
struct Route<'a> {
    scene: &'a Scene,
    listeners: &'a mut Listeners,
    kind: PointerKind,
    bubble: BubblePosition,
}

impl Route<'_> {
    fn visit(&mut self, node: NodeId, local: Point, ev: &mut MouseEvent) {
        ev.set_position(local);
        let capable = self.listeners.has_pointer(node, self.kind);
        if capable && !ev.is_cancelled() {
            ev.set_target(node);
            ev.visit(node, Phase::Capture);
            self.listeners.pointer(node, self.kind, ev);
        }

        let scene = self.scene;
        for &child in scene.children_of(node).iter().rev() {
            if ev.is_cancelled() {
                return;
            }
            let Some(child_local) = scene.localize(child, local) else {
                continue;
            };
            let before = ev.target();
            self.visit(child, child_local, ev);
            if ev.target() != before {
                break;
            }
        }

        if ev.target().is_some() && capable && !ev.is_cancelled() {
            if self.bubble == BubblePosition::Restore {
                ev.set_position(local);
            }
            ev.visit(node, Phase::Bubble);
            self.listeners.pointer(node, self.kind, ev);
        }
    }
}
