// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover bookkeeping: the leave and enter passes run after every pointer move.
//!
//! Each pass builds its own envelope, so cancelling the move dispatch (or
//! one of these passes) never stops the `hovered` flags from being brought
//! up to date. Cancellation inside a pass only suppresses the remaining
//! handler calls of that pass.
//!
//! A node is a *leave candidate* when it is hovered but no longer contains
//! the pointer, and an *enter candidate* when it contains the pointer but is
//! not hovered yet. Only candidates change their flag and receive a capture
//! call. Bubble calls go to the candidate and to every capable ancestor the
//! pass returns through.

use kurbo::Point;
use micropaint_scene::{NodeId, Scene};
use smallvec::SmallVec;

use crate::config::BubblePosition;
use crate::listeners::{Listeners, PointerKind};
use crate::types::{Event, Mouse, MouseEvent, Phase};

type Children = SmallVec<[NodeId; 8]>;

pub(crate) struct HoverPass<'a> {
    pub(crate) scene: &'a mut Scene,
    pub(crate) listeners: &'a mut Listeners,
    pub(crate) bubble: BubblePosition,
}

impl HoverPass<'_> {
    /// Clear `hovered` on every node the pointer has left.
    ///
    /// Every node is visited, contained or not. `root_local` is `None` when
    /// the root cannot be inverted, in which case every node counts as left.
    /// Nodes with no local space (under a degenerate placement) see
    /// `position`, the root parent-space point, as the event position.
    pub(crate) fn leave(&mut self, root: NodeId, root_local: Option<Point>, position: Point) {
        let mut ev = Event::new(root, Mouse::moved(root_local.unwrap_or(position)));
        self.leave_node(root, root_local, position, &mut ev);
    }

    /// Set `hovered` on every node newly under the pointer.
    ///
    /// Descends only into children that contain the pointer.
    pub(crate) fn enter(&mut self, root: NodeId, root_local: Point) {
        let mut ev = Event::new(root, Mouse::moved(root_local));
        self.enter_node(root, root_local, &mut ev);
    }

    /// Returns whether a target was set in this node's subtree.
    fn leave_node(
        &mut self,
        node: NodeId,
        local: Option<Point>,
        unmapped: Point,
        ev: &mut MouseEvent,
    ) -> bool {
        let at = local.unwrap_or(unmapped);
        ev.set_position(at);
        let inside = local.is_some_and(|p| self.scene.contains(node, p));
        let candidate = !inside && self.scene.is_hovered(node);
        let capable = self.listeners.has_pointer(node, PointerKind::Leave);
        if candidate {
            self.scene.set_hovered(node, false);
            if capable && !ev.is_cancelled() {
                self.capture(node, PointerKind::Leave, ev);
            }
        }

        let mut produced = candidate && capable;
        let children: Children = self.scene.children_of(node).iter().rev().copied().collect();
        for child in children {
            let child_local = local.and_then(|p| self.scene.to_local(child, p));
            produced |= self.leave_node(child, child_local, unmapped, ev);
        }

        if produced && capable && !ev.is_cancelled() {
            if self.bubble == BubblePosition::Restore {
                ev.set_position(at);
            }
            ev.visit(node, Phase::Bubble);
            self.listeners.pointer(node, PointerKind::Leave, ev);
        }
        produced
    }

    fn enter_node(&mut self, node: NodeId, local: Point, ev: &mut MouseEvent) -> bool {
        ev.set_position(local);
        let inside = self.scene.contains(node, local);
        let candidate = inside && !self.scene.is_hovered(node);
        let capable = self.listeners.has_pointer(node, PointerKind::Enter);
        if candidate {
            self.scene.set_hovered(node, true);
            if capable && !ev.is_cancelled() {
                self.capture(node, PointerKind::Enter, ev);
            }
        }

        let mut produced = candidate && capable;
        let children: Children = self.scene.children_of(node).iter().rev().copied().collect();
        for child in children {
            if let Some(child_local) = self.scene.localize(child, local) {
                produced |= self.enter_node(child, child_local, ev);
            }
        }

        if produced && capable && !ev.is_cancelled() {
            if self.bubble == BubblePosition::Restore {
                ev.set_position(local);
            }
            ev.visit(node, Phase::Bubble);
            self.listeners.pointer(node, PointerKind::Enter, ev);
        }
        produced
    }

    /// Capture call for a candidate: it becomes the target.
    fn capture(&mut self, node: NodeId, kind: PointerKind, ev: &mut MouseEvent) {
        ev.set_target(node);
        ev.visit(node, Phase::Capture);
        self.listeners.pointer(node, kind, ev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use kurbo::Size;
    use micropaint_scene::{HitShape, NodeSpec, Placement};

    type Log = Rc<RefCell<Vec<(&'static str, NodeId, Phase)>>>;

    fn record(listeners: &mut Listeners, log: &Log, node: NodeId) {
        let l = log.clone();
        listeners.on_mouse_enter(node, move |ev| {
            l.borrow_mut().push(("enter", ev.current_target(), ev.phase()));
        });
        let l = log.clone();
        listeners.on_mouse_leave(node, move |ev| {
            l.borrow_mut().push(("leave", ev.current_target(), ev.phase()));
        });
    }

    fn scene() -> (Scene, NodeId, NodeId, NodeId) {
        let mut scene = Scene::new();
        let root = scene
            .insert(None, NodeSpec::default().with_shape(HitShape::Everywhere))
            .unwrap();
        let panel = scene
            .insert(
                Some(root),
                NodeSpec::new(Placement::at(Point::new(10.0, 10.0), Size::new(100.0, 100.0))),
            )
            .unwrap();
        let button = scene
            .insert(
                Some(panel),
                NodeSpec::new(Placement::at(Point::new(10.0, 10.0), Size::new(20.0, 20.0))),
            )
            .unwrap();
        (scene, root, panel, button)
    }

    fn pass(scene: &mut Scene, listeners: &mut Listeners, root: NodeId, at: Point) {
        let mut hover = HoverPass {
            scene,
            listeners,
            bubble: BubblePosition::Restore,
        };
        hover.leave(root, Some(at), at);
        hover.enter(root, at);
    }

    #[test]
    fn flags_track_the_pointer() {
        let (mut scene, root, panel, button) = scene();
        let mut listeners = Listeners::new();

        pass(&mut scene, &mut listeners, root, Point::new(25.0, 25.0));
        assert!(scene.is_hovered(root));
        assert!(scene.is_hovered(panel));
        assert!(scene.is_hovered(button));

        pass(&mut scene, &mut listeners, root, Point::new(80.0, 80.0));
        assert!(scene.is_hovered(panel));
        assert!(!scene.is_hovered(button));

        pass(&mut scene, &mut listeners, root, Point::new(500.0, 500.0));
        assert!(scene.is_hovered(root));
        assert!(!scene.is_hovered(panel));
    }

    #[test]
    fn entering_a_child_bubbles_through_hovered_parent() {
        let (mut scene, root, panel, button) = scene();
        let log: Log = Rc::default();
        let mut listeners = Listeners::new();
        record(&mut listeners, &log, panel);
        record(&mut listeners, &log, button);

        pass(&mut scene, &mut listeners, root, Point::new(80.0, 80.0));
        assert_eq!(
            *log.borrow(),
            [
                ("enter", panel, Phase::Capture),
                ("enter", panel, Phase::Bubble)
            ]
        );
        log.borrow_mut().clear();

        pass(&mut scene, &mut listeners, root, Point::new(25.0, 25.0));
        assert_eq!(
            *log.borrow(),
            [
                ("enter", button, Phase::Capture),
                ("enter", button, Phase::Bubble),
                ("enter", panel, Phase::Bubble),
            ]
        );
        log.borrow_mut().clear();

        pass(&mut scene, &mut listeners, root, Point::new(500.0, 500.0));
        assert_eq!(
            *log.borrow(),
            [
                ("leave", panel, Phase::Capture),
                ("leave", button, Phase::Capture),
                ("leave", button, Phase::Bubble),
                ("leave", panel, Phase::Bubble),
            ]
        );
    }

    #[test]
    fn cancelled_pass_still_updates_flags() {
        let (mut scene, root, panel, button) = scene();
        let log: Log = Rc::default();
        let mut listeners = Listeners::new();
        record(&mut listeners, &log, button);
        listeners.on_mouse_enter(panel, |ev| ev.cancel());

        pass(&mut scene, &mut listeners, root, Point::new(25.0, 25.0));
        assert!(scene.is_hovered(panel));
        assert!(scene.is_hovered(button));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn uninvertible_root_leaves_everything() {
        let (mut scene, root, panel, button) = scene();
        let mut listeners = Listeners::new();
        pass(&mut scene, &mut listeners, root, Point::new(25.0, 25.0));

        let mut hover = HoverPass {
            scene: &mut scene,
            listeners: &mut listeners,
            bubble: BubblePosition::Restore,
        };
        hover.leave(root, None, Point::new(25.0, 25.0));
        assert!(!scene.is_hovered(root));
        assert!(!scene.is_hovered(panel));
        assert!(!scene.is_hovered(button));
    }

    #[test]
    fn leave_under_degenerate_parent_reports_root_space_position() {
        let (mut scene, root, panel, button) = scene();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::new();
        {
            let seen = seen.clone();
            listeners.on_mouse_leave(button, move |ev| {
                seen.borrow_mut().push((ev.phase(), ev.position()));
            });
        }
        pass(&mut scene, &mut listeners, root, Point::new(25.0, 25.0));
        assert!(scene.is_hovered(button));

        let mut placement = *scene.placement(panel).unwrap();
        placement.scale = kurbo::Vec2::ZERO;
        scene.set_placement(panel, placement).unwrap();
        pass(&mut scene, &mut listeners, root, Point::new(26.0, 26.0));

        assert!(!scene.is_hovered(panel));
        assert!(!scene.is_hovered(button));
        assert_eq!(
            *seen.borrow(),
            [
                (Phase::Capture, Point::new(26.0, 26.0)),
                (Phase::Bubble, Point::new(26.0, 26.0)),
            ]
        );
    }

    #[test]
    fn deepest_mode_keeps_child_position_while_bubbling() {
        for (mode, panel_sees) in [
            (BubblePosition::Restore, Point::new(15.0, 15.0)),
            (BubblePosition::Deepest, Point::new(5.0, 5.0)),
        ] {
            let (mut scene, root, panel, button) = scene();
            let seen = Rc::new(RefCell::new(Vec::new()));
            let mut listeners = Listeners::new();
            for node in [panel, button] {
                let seen = seen.clone();
                listeners.on_mouse_enter(node, move |ev| {
                    seen.borrow_mut()
                        .push((ev.current_target(), ev.phase(), ev.position()));
                });
            }
            let mut hover = HoverPass {
                scene: &mut scene,
                listeners: &mut listeners,
                bubble: mode,
            };
            hover.enter(root, Point::new(25.0, 25.0));
            assert_eq!(
                *seen.borrow(),
                [
                    (panel, Phase::Capture, Point::new(15.0, 15.0)),
                    (button, Phase::Capture, Point::new(5.0, 5.0)),
                    (button, Phase::Bubble, Point::new(5.0, 5.0)),
                    (panel, Phase::Bubble, panel_sees),
                ]
            );
        }
    }
}
