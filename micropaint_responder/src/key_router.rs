// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key and text routing along the focused node's ancestor chain.
//!
//! There is no hit testing and no capture phase: the walk starts at the
//! focused node, runs its handler, then moves to the parent until a handler
//! cancels or the root has been visited.

use micropaint_scene::{NodeId, Scene};

use crate::listeners::Listeners;
use crate::types::{Char, CharEvent, Event, Key, KeyEvent, Phase};

/// Upward-only router for keyboard and text events.
#[derive(Copy, Clone, Debug, Default)]
pub struct KeyRouter;

impl KeyRouter {
    /// Route a key occurrence from `focused` to the root.
    ///
    /// Returns the finished envelope, or `None` when nothing is focused.
    pub fn route_key(
        self,
        scene: &Scene,
        listeners: &mut Listeners,
        focused: Option<NodeId>,
        key: Key,
    ) -> Option<KeyEvent> {
        let Some(focused) = focused else {
            tracing::debug!(?key, "key dropped: nothing focused");
            return None;
        };
        let mut ev = Event::targeted(focused, key);
        for node in scene.ancestors(focused) {
            ev.visit(node, Phase::Bubble);
            listeners.key(node, &mut ev);
            if ev.is_cancelled() {
                break;
            }
        }
        Some(ev)
    }

    /// Route a text occurrence from `focused` to the root.
    ///
    /// Returns the finished envelope, or `None` when nothing is focused.
    pub fn route_char(
        self,
        scene: &Scene,
        listeners: &mut Listeners,
        focused: Option<NodeId>,
        ch: char,
    ) -> Option<CharEvent> {
        let Some(focused) = focused else {
            tracing::debug!(?ch, "char dropped: nothing focused");
            return None;
        };
        let mut ev = Event::targeted(focused, Char { ch });
        for node in scene.ancestors(focused) {
            ev.visit(node, Phase::Bubble);
            listeners.char(node, &mut ev);
            if ev.is_cancelled() {
                break;
            }
        }
        Some(ev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use micropaint_scene::NodeSpec;

    use crate::types::{Action, KeyCode, Modifiers};

    fn chain() -> (Scene, NodeId, NodeId, NodeId) {
        let mut scene = Scene::new();
        let root = scene.insert(None, NodeSpec::default()).unwrap();
        let panel = scene.insert(Some(root), NodeSpec::default()).unwrap();
        let field = scene.insert(Some(panel), NodeSpec::default()).unwrap();
        (scene, root, panel, field)
    }

    fn press(code: i32) -> Key {
        Key {
            key: KeyCode(code),
            scancode: 0,
            action: Action::Press,
            modifiers: Modifiers::empty(),
        }
    }

    #[test]
    fn walks_from_focused_node_to_root() {
        let (scene, root, panel, field) = chain();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::new();
        for node in [root, panel, field] {
            let log = log.clone();
            listeners.on_key_input(node, move |ev| {
                assert_eq!(ev.phase(), Phase::Bubble);
                log.borrow_mut().push((ev.current_target(), ev.target()));
            });
        }
        let ev = KeyRouter
            .route_key(&scene, &mut listeners, Some(field), press(65))
            .unwrap();
        assert!(!ev.is_cancelled());
        assert_eq!(
            *log.borrow(),
            [(field, Some(field)), (panel, Some(field)), (root, Some(field))]
        );
    }

    #[test]
    fn cancelling_at_focused_node_stops_the_walk() {
        let (scene, _root, panel, field) = chain();
        let parent_calls = Rc::new(RefCell::new(0));
        let mut listeners = Listeners::new();
        listeners.on_key_input(field, |ev| ev.cancel());
        {
            let parent_calls = parent_calls.clone();
            listeners.on_key_input(panel, move |_| *parent_calls.borrow_mut() += 1);
        }
        let ev = KeyRouter
            .route_key(&scene, &mut listeners, Some(field), press(65))
            .unwrap();
        assert!(ev.is_cancelled());
        assert_eq!(*parent_calls.borrow(), 0);
    }

    #[test]
    fn nothing_focused_drops_the_occurrence() {
        let (scene, root, _, _) = chain();
        let calls = Rc::new(RefCell::new(0));
        let mut listeners = Listeners::new();
        {
            let calls = calls.clone();
            listeners.on_key_input(root, move |_| *calls.borrow_mut() += 1);
        }
        {
            let calls = calls.clone();
            listeners.on_char_input(root, move |_| *calls.borrow_mut() += 1);
        }
        assert!(
            KeyRouter
                .route_key(&scene, &mut listeners, None, press(65))
                .is_none()
        );
        assert!(
            KeyRouter
                .route_char(&scene, &mut listeners, None, 'a')
                .is_none()
        );
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn char_skips_nodes_without_handler() {
        let (scene, root, _panel, field) = chain();
        let typed = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::new();
        {
            let typed = typed.clone();
            listeners.on_char_input(root, move |ev| typed.borrow_mut().push(ev.payload().ch));
        }
        KeyRouter.route_char(&scene, &mut listeners, Some(field), '7');
        assert_eq!(*typed.borrow(), ['7']);
    }
}
