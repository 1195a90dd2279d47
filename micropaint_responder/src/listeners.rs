// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener table: which nodes handle which events, and how.
//!
//! The scene holds geometry; this table holds interaction. A node's
//! [`Capabilities`] are exactly the handlers registered for it, so the
//! dispatcher can ask "does this node handle clicks?" before every step
//! without calling into the node.
//!
//! ```
//! use micropaint_responder::listeners::{Capabilities, Listeners};
//! use micropaint_scene::{NodeSpec, Scene};
//!
//! let mut scene = Scene::new();
//! let button = scene.insert(None, NodeSpec::default()).unwrap();
//!
//! let mut listeners = Listeners::new();
//! listeners
//!     .on_mouse_clicked(button, |ev| ev.cancel())
//!     .on_mouse_enter(button, |_| {});
//! assert_eq!(
//!     listeners.capabilities(button),
//!     Capabilities::MOUSE_CLICK | Capabilities::MOUSE_ENTER
//! );
//! ```

use alloc::boxed::Box;
use core::fmt;

use hashbrown::HashMap;
use micropaint_scene::{NodeId, Scene};

use crate::types::{CharEvent, FocusEvent, KeyEvent, MouseEvent};

bitflags::bitflags! {
    /// Event interfaces a node implements.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// Pointer button press/release.
        const MOUSE_CLICK = 1 << 0;
        /// Pointer movement.
        const MOUSE_MOVE  = 1 << 1;
        /// Pointer entered the node.
        const MOUSE_ENTER = 1 << 2;
        /// Pointer left the node.
        const MOUSE_LEAVE = 1 << 3;
        /// The node or a descendant gained focus.
        const FOCUS_IN    = 1 << 4;
        /// The node or a descendant lost focus.
        const FOCUS_OUT   = 1 << 5;
        /// Key press, release or repeat while focused.
        const KEY_INPUT   = 1 << 6;
        /// Text input while focused.
        const CHAR_INPUT  = 1 << 7;
    }
}

type MouseHandler = Box<dyn FnMut(&mut MouseEvent)>;
type FocusHandler = Box<dyn FnMut(&mut FocusEvent)>;
type KeyHandler = Box<dyn FnMut(&mut KeyEvent)>;
type CharHandler = Box<dyn FnMut(&mut CharEvent)>;

/// The four pointer-driven traversals.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum PointerKind {
    Click,
    Move,
    Enter,
    Leave,
}

impl PointerKind {
    pub(crate) fn capability(self) -> Capabilities {
        match self {
            Self::Click => Capabilities::MOUSE_CLICK,
            Self::Move => Capabilities::MOUSE_MOVE,
            Self::Enter => Capabilities::MOUSE_ENTER,
            Self::Leave => Capabilities::MOUSE_LEAVE,
        }
    }
}

/// Which focus transition a walk reports.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FocusKind {
    In,
    Out,
}

#[derive(Default)]
struct Slot {
    clicked: Option<MouseHandler>,
    moved: Option<MouseHandler>,
    enter: Option<MouseHandler>,
    leave: Option<MouseHandler>,
    focus_in: Option<FocusHandler>,
    focus_out: Option<FocusHandler>,
    key: Option<KeyHandler>,
    char: Option<CharHandler>,
}

impl Slot {
    fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::empty();
        caps.set(Capabilities::MOUSE_CLICK, self.clicked.is_some());
        caps.set(Capabilities::MOUSE_MOVE, self.moved.is_some());
        caps.set(Capabilities::MOUSE_ENTER, self.enter.is_some());
        caps.set(Capabilities::MOUSE_LEAVE, self.leave.is_some());
        caps.set(Capabilities::FOCUS_IN, self.focus_in.is_some());
        caps.set(Capabilities::FOCUS_OUT, self.focus_out.is_some());
        caps.set(Capabilities::KEY_INPUT, self.key.is_some());
        caps.set(Capabilities::CHAR_INPUT, self.char.is_some());
        caps
    }

    fn pointer(&mut self, kind: PointerKind) -> &mut Option<MouseHandler> {
        match kind {
            PointerKind::Click => &mut self.clicked,
            PointerKind::Move => &mut self.moved,
            PointerKind::Enter => &mut self.enter,
            PointerKind::Leave => &mut self.leave,
        }
    }

    fn focus(&mut self, kind: FocusKind) -> &mut Option<FocusHandler> {
        match kind {
            FocusKind::In => &mut self.focus_in,
            FocusKind::Out => &mut self.focus_out,
        }
    }
}

/// Handlers keyed by node.
///
/// Each node has at most one handler per capability; registering again
/// replaces the previous handler. Handlers see the phase through
/// [`Event::phase`](crate::types::Event::phase) and are called once per
/// phase they are reached in.
#[derive(Default)]
pub struct Listeners {
    slots: HashMap<NodeId, Slot>,
}

impl Listeners {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle pointer button occurrences that reach `node`.
    pub fn on_mouse_clicked(
        &mut self,
        node: NodeId,
        handler: impl FnMut(&mut MouseEvent) + 'static,
    ) -> &mut Self {
        self.slot(node).clicked = Some(Box::new(handler));
        self
    }

    /// Handle pointer movement that reaches `node`.
    pub fn on_mouse_moved(
        &mut self,
        node: NodeId,
        handler: impl FnMut(&mut MouseEvent) + 'static,
    ) -> &mut Self {
        self.slot(node).moved = Some(Box::new(handler));
        self
    }

    /// Handle the pointer entering `node` or one of its descendants.
    pub fn on_mouse_enter(
        &mut self,
        node: NodeId,
        handler: impl FnMut(&mut MouseEvent) + 'static,
    ) -> &mut Self {
        self.slot(node).enter = Some(Box::new(handler));
        self
    }

    /// Handle the pointer leaving `node` or one of its descendants.
    pub fn on_mouse_leave(
        &mut self,
        node: NodeId,
        handler: impl FnMut(&mut MouseEvent) + 'static,
    ) -> &mut Self {
        self.slot(node).leave = Some(Box::new(handler));
        self
    }

    /// Handle focus arriving at `node` or one of its descendants.
    pub fn on_focus_in(
        &mut self,
        node: NodeId,
        handler: impl FnMut(&mut FocusEvent) + 'static,
    ) -> &mut Self {
        self.slot(node).focus_in = Some(Box::new(handler));
        self
    }

    /// Handle focus leaving `node` or one of its descendants.
    pub fn on_focus_out(
        &mut self,
        node: NodeId,
        handler: impl FnMut(&mut FocusEvent) + 'static,
    ) -> &mut Self {
        self.slot(node).focus_out = Some(Box::new(handler));
        self
    }

    /// Handle key occurrences routed through `node`.
    pub fn on_key_input(
        &mut self,
        node: NodeId,
        handler: impl FnMut(&mut KeyEvent) + 'static,
    ) -> &mut Self {
        self.slot(node).key = Some(Box::new(handler));
        self
    }

    /// Handle text input routed through `node`.
    pub fn on_char_input(
        &mut self,
        node: NodeId,
        handler: impl FnMut(&mut CharEvent) + 'static,
    ) -> &mut Self {
        self.slot(node).char = Some(Box::new(handler));
        self
    }

    /// Drop every handler of `node`.
    pub fn remove(&mut self, node: NodeId) {
        self.slots.remove(&node);
    }

    /// Drop every capability in `caps` from `node`, keeping the others.
    pub fn remove_capabilities(&mut self, node: NodeId, caps: Capabilities) {
        let Some(slot) = self.slots.get_mut(&node) else {
            return;
        };
        for kind in [
            PointerKind::Click,
            PointerKind::Move,
            PointerKind::Enter,
            PointerKind::Leave,
        ] {
            if caps.contains(kind.capability()) {
                *slot.pointer(kind) = None;
            }
        }
        if caps.contains(Capabilities::FOCUS_IN) {
            slot.focus_in = None;
        }
        if caps.contains(Capabilities::FOCUS_OUT) {
            slot.focus_out = None;
        }
        if caps.contains(Capabilities::KEY_INPUT) {
            slot.key = None;
        }
        if caps.contains(Capabilities::CHAR_INPUT) {
            slot.char = None;
        }
        if slot.capabilities().is_empty() {
            self.slots.remove(&node);
        }
    }

    /// The event interfaces `node` implements.
    pub fn capabilities(&self, node: NodeId) -> Capabilities {
        self.slots
            .get(&node)
            .map_or(Capabilities::empty(), Slot::capabilities)
    }

    /// Number of nodes with at least one handler.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no node has a handler.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Forget handlers of nodes that were removed from `scene`.
    ///
    /// Registration does not consult the scene, so this is also what clears
    /// handlers registered on ids that were already stale.
    pub fn retain_alive(&mut self, scene: &Scene) {
        let before = self.slots.len();
        self.slots.retain(|id, _| scene.is_alive(*id));
        let dropped = before - self.slots.len();
        if dropped > 0 {
            tracing::debug!(dropped, "dropped listeners of removed nodes");
        }
    }

    // --- dispatch hooks ---

    pub(crate) fn has_pointer(&self, node: NodeId, kind: PointerKind) -> bool {
        self.capabilities(node).contains(kind.capability())
    }

    /// Run `node`'s pointer handler for `kind`, if any.
    pub(crate) fn pointer(&mut self, node: NodeId, kind: PointerKind, ev: &mut MouseEvent) {
        if let Some(handler) = self.slots.get_mut(&node).and_then(|s| s.pointer(kind).as_mut()) {
            handler(ev);
        }
    }

    pub(crate) fn focus(&mut self, node: NodeId, kind: FocusKind, ev: &mut FocusEvent) {
        if let Some(handler) = self.slots.get_mut(&node).and_then(|s| s.focus(kind).as_mut()) {
            handler(ev);
        }
    }

    pub(crate) fn key(&mut self, node: NodeId, ev: &mut KeyEvent) {
        if let Some(handler) = self.slots.get_mut(&node).and_then(|s| s.key.as_mut()) {
            handler(ev);
        }
    }

    pub(crate) fn char(&mut self, node: NodeId, ev: &mut CharEvent) {
        if let Some(handler) = self.slots.get_mut(&node).and_then(|s| s.char.as_mut()) {
            handler(ev);
        }
    }

    fn slot(&mut self, node: NodeId) -> &mut Slot {
        self.slots.entry(node).or_default()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.slots.iter().map(|(id, slot)| (id, slot.capabilities())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::Cell;
    use micropaint_scene::NodeSpec;

    use crate::types::{Event, Mouse};
    use kurbo::Point;

    fn scene_with(n: usize) -> (Scene, alloc::vec::Vec<NodeId>) {
        let mut scene = Scene::new();
        let ids = (0..n)
            .map(|_| scene.insert(None, NodeSpec::default()).unwrap())
            .collect();
        (scene, ids)
    }

    #[test]
    fn capabilities_follow_registrations() {
        let (_, ids) = scene_with(1);
        let node = ids[0];
        let mut listeners = Listeners::new();
        assert!(listeners.capabilities(node).is_empty());

        listeners
            .on_key_input(node, |_| {})
            .on_char_input(node, |_| {})
            .on_focus_in(node, |_| {});
        assert_eq!(
            listeners.capabilities(node),
            Capabilities::KEY_INPUT | Capabilities::CHAR_INPUT | Capabilities::FOCUS_IN
        );

        listeners.remove_capabilities(node, Capabilities::KEY_INPUT | Capabilities::FOCUS_IN);
        assert_eq!(listeners.capabilities(node), Capabilities::CHAR_INPUT);

        listeners.remove_capabilities(node, Capabilities::CHAR_INPUT);
        assert!(listeners.is_empty());
    }

    #[test]
    fn registering_again_replaces_the_handler() {
        let (_, ids) = scene_with(1);
        let node = ids[0];
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let mut listeners = Listeners::new();
        {
            let first = first.clone();
            listeners.on_mouse_moved(node, move |_| first.set(first.get() + 1));
        }
        {
            let second = second.clone();
            listeners.on_mouse_moved(node, move |_| second.set(second.get() + 1));
        }
        let mut ev = Event::new(node, Mouse::moved(Point::ZERO));
        listeners.pointer(node, PointerKind::Move, &mut ev);
        assert_eq!((first.get(), second.get()), (0, 1));
        // Other kinds have no handler and do nothing.
        listeners.pointer(node, PointerKind::Click, &mut ev);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn retain_alive_drops_removed_nodes() {
        let (mut scene, ids) = scene_with(2);
        let mut listeners = Listeners::new();
        listeners.on_mouse_clicked(ids[0], |_| {});
        listeners.on_mouse_clicked(ids[1], |_| {});
        scene.remove(ids[0]).unwrap();
        listeners.retain_alive(&scene);
        assert_eq!(listeners.len(), 1);
        assert!(listeners.capabilities(ids[0]).is_empty());
        assert!(listeners.has_pointer(ids[1], PointerKind::Click));
    }

    #[test]
    fn handlers_on_stale_ids_never_reach_the_reused_slot() {
        let (mut scene, ids) = scene_with(1);
        let stale = ids[0];
        scene.remove(stale).unwrap();

        let calls = Rc::new(Cell::new(0));
        let mut listeners = Listeners::new();
        {
            let calls = calls.clone();
            listeners.on_mouse_clicked(stale, move |_| calls.set(calls.get() + 1));
        }
        let fresh = scene.insert(None, NodeSpec::default()).unwrap();
        assert_ne!(fresh, stale);
        assert!(!listeners.has_pointer(fresh, PointerKind::Click));

        let mut ev = Event::new(fresh, Mouse::moved(Point::ZERO));
        listeners.pointer(fresh, PointerKind::Click, &mut ev);
        assert_eq!(calls.get(), 0);

        listeners.retain_alive(&scene);
        assert!(listeners.is_empty());
    }
}
