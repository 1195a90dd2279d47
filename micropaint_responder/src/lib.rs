// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Micropaint Responder: capture/bubble event dispatch over a micropaint scene.
//!
//! ## Overview
//!
//! The window reports raw input: pointer buttons, pointer moves, keys and
//! typed characters. A [`Dispatcher`](dispatcher::Dispatcher) turns each
//! occurrence into typed [`Event`](types::Event)s and routes them through a
//! [`micropaint_scene::Scene`], calling the handlers registered in a
//! [`Listeners`](listeners::Listeners) table.
//!
//! ## Pointer routing
//!
//! Clicks and moves descend from the root, converting the pointer into each
//! visited node's local space. Overlapping siblings are tried frontmost
//! first. Nodes that handle the event become the target on the way down
//! ([`Phase::Capture`](types::Phase::Capture)) and run again on the way back
//! up ([`Phase::Bubble`](types::Phase::Bubble)). A handler stops the rest of
//! a route with [`Event::cancel`](types::Event::cancel).
//!
//! ## Hover and cursor
//!
//! After every move, a leave pass and an enter pass keep each node's
//! `hovered` flag in sync with the pointer and report transitions to
//! mouse-enter and mouse-leave handlers. Then the frontmost node under the
//! pointer picks the cursor; the window is told only when it changes, via
//! [`CursorSink`](dispatcher::CursorSink).
//!
//! ## Focus and keys
//!
//! A pointer button that resolves to a target moves focus there: focus-out
//! walks up from the old node, then focus-in walks up from the new one. Keys
//! and characters walk up from the focused node through
//! [`KeyRouter`](key_router::KeyRouter) and are dropped when nothing is
//! focused.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use kurbo::{Point, Size};
//! use micropaint_responder::dispatcher::Dispatcher;
//! use micropaint_responder::listeners::Listeners;
//! use micropaint_responder::types::{Action, Modifiers, MouseButton};
//! use micropaint_scene::{CursorId, HitShape, NodeSpec, Placement, Scene};
//!
//! let mut scene = Scene::new();
//! let root = scene.insert(None, NodeSpec::default().with_shape(HitShape::Everywhere)).unwrap();
//! let field = scene
//!     .insert(
//!         Some(root),
//!         NodeSpec::new(Placement::at(Point::new(20.0, 20.0), Size::new(60.0, 20.0)))
//!             .with_cursor(CursorId::IBeam),
//!     )
//!     .unwrap();
//!
//! let text = Rc::new(RefCell::new(String::new()));
//! let mut listeners = Listeners::new();
//! {
//!     let text = text.clone();
//!     listeners
//!         .on_mouse_clicked(field, |_| {})
//!         .on_char_input(field, move |ev| text.borrow_mut().push(ev.payload().ch));
//! }
//!
//! let mut dispatcher = Dispatcher::new(root);
//! let mut cursor = CursorId::Arrow;
//! dispatcher.pointer_moved(&mut scene, &mut listeners, Point::new(30.0, 30.0), &mut |c: CursorId| cursor = c);
//! assert_eq!(cursor, CursorId::IBeam);
//! assert!(scene.is_hovered(field));
//!
//! let at = dispatcher.pointer_position();
//! dispatcher.pointer_button(&scene, &mut listeners, at, MouseButton::Left, Action::Press, Modifiers::empty());
//! for ch in "12".chars() {
//!     dispatcher.char(&scene, &mut listeners, ch.into());
//! }
//! assert_eq!(*text.borrow(), "12");
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod config;
pub mod dispatcher;
mod focus;
mod hover;
pub mod key_router;
pub mod listeners;
pub mod types;
