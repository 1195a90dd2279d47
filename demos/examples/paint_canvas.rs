// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A tiny paint window driven by scripted input.
//!
//! The scene is a window-sized root with a toolbar holding a stroke-width
//! field, and a canvas below it. Pressing on the canvas starts a freehand
//! stroke, moving extends it and releasing ends it. Pressing on an existing
//! stroke selects it instead. Clicking the width field focuses it; digits
//! typed there set the width of the next stroke once Enter is pressed.
//!
//! Handlers never touch the scene directly. They queue [`Command`]s that the
//! host applies between occurrences, the same way a window loop would.
//!
//! Run:
//! - `cargo run -p micropaint_demos --example paint_canvas`

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kurbo::{Point, Size};
use micropaint_hit::stroke::{PEN_SAMPLE_SPACING, Polyline};
use micropaint_responder::dispatcher::Dispatcher;
use micropaint_responder::listeners::Listeners;
use micropaint_responder::types::{Action, KeyCode, Modifiers, MouseButton, Phase};
use micropaint_scene::{CursorId, HitShape, NodeId, NodeSpec, Placement, Scene};

const KEY_ENTER: KeyCode = KeyCode(257);
const KEY_BACKSPACE: KeyCode = KeyCode(259);

#[derive(Debug)]
enum Command {
    Begin(Point),
    Extend(Point),
    End,
}

type Queue = Rc<RefCell<Vec<Command>>>;

/// Raw occurrences, as a window system would report them.
enum Input {
    Move(f64, f64),
    Press,
    Release,
    Text(&'static str),
    Key(KeyCode),
}

struct App {
    scene: Scene,
    listeners: Listeners,
    dispatcher: Dispatcher,
    canvas: NodeId,
    queue: Queue,
    width: Rc<Cell<f64>>,
    drawing: Option<NodeId>,
}

impl App {
    fn new() -> Self {
        let mut scene = Scene::new();
        let root = scene
            .insert(
                None,
                NodeSpec::new(Placement::sized(Size::new(640.0, 480.0)))
                    .with_shape(HitShape::Everywhere),
            )
            .expect("fresh scene");
        let toolbar = scene
            .insert(
                Some(root),
                NodeSpec::new(Placement::sized(Size::new(640.0, 40.0))),
            )
            .expect("root is alive");
        let field = scene
            .insert(
                Some(toolbar),
                NodeSpec::new(Placement::at(Point::new(8.0, 8.0), Size::new(64.0, 24.0)))
                    .with_cursor(CursorId::IBeam),
            )
            .expect("toolbar is alive");
        let canvas = scene
            .insert(
                Some(root),
                NodeSpec::new(Placement::at(Point::new(0.0, 40.0), Size::new(640.0, 440.0)))
                    .with_cursor(CursorId::Crosshair),
            )
            .expect("root is alive");

        let queue: Queue = Rc::default();
        let width = Rc::new(Cell::new(1.0));
        let mut listeners = Listeners::new();
        wire_canvas(&mut listeners, canvas, &queue);
        wire_width_field(&mut listeners, field, &width);

        Self {
            scene,
            listeners,
            dispatcher: Dispatcher::new(root),
            canvas,
            queue,
            width,
            drawing: None,
        }
    }

    fn feed(&mut self, input: &Input) {
        let mut window_cursor = |cursor: CursorId| println!("  window cursor -> {cursor:?}");
        match *input {
            Input::Move(x, y) => {
                self.dispatcher.pointer_moved(
                    &mut self.scene,
                    &mut self.listeners,
                    Point::new(x, y),
                    &mut window_cursor,
                );
            }
            Input::Press | Input::Release => {
                let action = if matches!(input, Input::Press) {
                    Action::Press
                } else {
                    Action::Release
                };
                let at = self.dispatcher.pointer_position();
                self.dispatcher.pointer_button(
                    &self.scene,
                    &mut self.listeners,
                    at,
                    MouseButton::Left,
                    action,
                    Modifiers::empty(),
                );
            }
            Input::Text(text) => {
                for ch in text.chars() {
                    self.dispatcher
                        .char(&self.scene, &mut self.listeners, u32::from(ch));
                }
            }
            Input::Key(key) => {
                self.dispatcher.key(
                    &self.scene,
                    &mut self.listeners,
                    key,
                    0,
                    Action::Press,
                    Modifiers::empty(),
                );
            }
        }
        self.apply();
    }

    /// Apply the commands queued by handlers during the last occurrence.
    fn apply(&mut self) {
        let commands: Vec<Command> = self.queue.borrow_mut().drain(..).collect();
        for command in commands {
            match command {
                Command::Begin(at) => {
                    let mut stroke = Polyline::new();
                    stroke.half_width = self.width.get() * 0.5;
                    stroke.push(at);
                    let figure = self
                        .scene
                        .insert(
                            Some(self.canvas),
                            NodeSpec::new(Placement::sized(Size::new(640.0, 440.0)))
                                .with_shape(stroke),
                        )
                        .expect("canvas is alive");
                    wire_figure(&mut self.listeners, figure);
                    self.drawing = Some(figure);
                    println!("  begin stroke {figure} at {at:?}");
                }
                Command::Extend(at) => {
                    let Some(figure) = self.drawing else { continue };
                    if let Some(HitShape::Stroke(stroke)) = self.scene.shape_mut(figure) {
                        stroke.push_spaced(at, PEN_SAMPLE_SPACING);
                    }
                }
                Command::End => {
                    if let Some(figure) = self.drawing.take() {
                        if let Some(HitShape::Stroke(stroke)) = self.scene.shape(figure) {
                            println!("  end stroke {figure}: {} samples", stroke.points().len());
                        }
                    }
                }
            }
        }
    }
}

fn wire_canvas(listeners: &mut Listeners, canvas: NodeId, queue: &Queue) {
    let drawing = Rc::new(Cell::new(false));
    {
        let queue = queue.clone();
        let drawing = drawing.clone();
        listeners.on_mouse_clicked(canvas, move |ev| {
            // Decide once the route is complete: a press on a figure selects
            // it and the canvas only observes.
            if ev.phase() != Phase::Bubble {
                return;
            }
            match ev.payload().action {
                Some(Action::Press) if ev.target() == Some(canvas) => {
                    drawing.set(true);
                    queue.borrow_mut().push(Command::Begin(ev.position()));
                }
                Some(Action::Release) if drawing.get() => {
                    drawing.set(false);
                    queue.borrow_mut().push(Command::End);
                }
                _ => {}
            }
        });
    }
    let queue = queue.clone();
    listeners.on_mouse_moved(canvas, move |ev| {
        if ev.phase() == Phase::Capture && drawing.get() {
            queue.borrow_mut().push(Command::Extend(ev.position()));
        }
    });
}

fn wire_figure(listeners: &mut Listeners, figure: NodeId) {
    listeners
        .on_mouse_clicked(figure, move |ev| {
            if ev.phase() == Phase::Capture && ev.payload().action == Some(Action::Press) {
                println!("  selected stroke {figure}");
            }
        })
        .on_mouse_enter(figure, move |ev| {
            if ev.phase() == Phase::Capture {
                println!("  pointer over stroke {figure}");
            }
        })
        .on_mouse_leave(figure, move |ev| {
            if ev.phase() == Phase::Capture {
                println!("  pointer left stroke {figure}");
            }
        });
}

fn wire_width_field(listeners: &mut Listeners, field: NodeId, width: &Rc<Cell<f64>>) {
    let text = Rc::new(RefCell::new(String::from("1")));
    {
        let text = text.clone();
        listeners.on_char_input(field, move |ev| {
            let ch = ev.payload().ch;
            if ch.is_ascii_digit() || (ch == '.' && !text.borrow().contains('.')) {
                text.borrow_mut().push(ch);
                println!("  width field: {:?}", text.borrow());
            }
            ev.cancel();
        });
    }
    let width = width.clone();
    listeners
        .on_mouse_clicked(field, |_| {})
        .on_focus_in(field, |_| println!("  width field focused"))
        .on_focus_out(field, |_| println!("  width field lost focus"))
        .on_key_input(field, move |ev| {
            let key = ev.payload().key;
            if key == KEY_BACKSPACE {
                text.borrow_mut().pop();
                println!("  width field: {:?}", text.borrow());
            } else if key == KEY_ENTER {
                match text.borrow().parse::<f64>() {
                    Ok(w) if w > 0.0 => {
                        width.set(w);
                        println!("  stroke width set to {w}");
                    }
                    _ => println!("  ignoring width {:?}", text.borrow()),
                }
            }
            ev.cancel();
        });
}

fn main() {
    let mut app = App::new();
    let script = [
        Input::Move(300.0, 200.0),
        Input::Text("ignored: nothing focused"),
        Input::Press,
        Input::Move(310.0, 204.0),
        Input::Move(320.0, 210.0),
        Input::Move(322.0, 211.0),
        Input::Move(340.0, 220.0),
        Input::Release,
        Input::Move(20.0, 20.0),
        Input::Press,
        Input::Release,
        Input::Key(KEY_BACKSPACE),
        Input::Text("4"),
        Input::Key(KEY_ENTER),
        Input::Move(315.0, 207.0),
        Input::Press,
        Input::Release,
        Input::Move(100.0, 400.0),
        Input::Press,
        Input::Move(140.0, 400.0),
        Input::Release,
    ];
    for input in &script {
        match input {
            Input::Move(x, y) => println!("move to ({x}, {y})"),
            Input::Press => println!("press"),
            Input::Release => println!("release"),
            Input::Text(t) => println!("type {t:?}"),
            Input::Key(k) => println!("key {k:?}"),
        }
        app.feed(input);
    }
}
