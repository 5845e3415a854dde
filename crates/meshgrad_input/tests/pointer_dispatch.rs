//! Integration tests routing pointer input through to gradient handlers

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use meshgrad_core::{GradientEventKind, GradientHandlers, PerspectiveCamera};
use meshgrad_input::PointerRouter;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

fn counting_handlers() -> (Rc<RefCell<HashMap<GradientEventKind, u32>>>, GradientHandlers) {
    let counts = Rc::new(RefCell::new(HashMap::new()));
    let mut handlers = GradientHandlers::new();
    for kind in GradientEventKind::ALL {
        let counts = Rc::clone(&counts);
        handlers.set(kind, move |e| {
            *counts.borrow_mut().entry(e.kind).or_insert(0) += 1;
        });
    }
    (counts, handlers)
}

fn camera() -> PerspectiveCamera {
    PerspectiveCamera {
        position: [0.0, 0.0, 3.0],
        ..PerspectiveCamera::default()
    }
}

#[test]
fn test_each_input_fires_each_handler_once() {
    let (counts, mut handlers) = counting_handlers();
    let mut router = PointerRouter::new();
    let size = PhysicalSize::new(640, 480);
    let camera = camera();

    let mut events = Vec::new();
    events.extend(router.process_cursor_moved(PhysicalPosition::new(320.0, 240.0), size, &camera));
    events.extend(router.process_mouse_button(MouseButton::Left, ElementState::Pressed));
    events.extend(router.process_mouse_button(MouseButton::Left, ElementState::Released));
    events.extend(router.process_mouse_wheel(MouseScrollDelta::LineDelta(0.0, 1.0)));
    events.extend(router.process_mouse_button(MouseButton::Right, ElementState::Pressed));
    events.extend(router.process_cursor_left());

    for event in &events {
        assert!(handlers.dispatch(event));
    }

    let counts = counts.borrow();
    for kind in [
        GradientEventKind::PointerOver,
        GradientEventKind::PointerEnter,
        GradientEventKind::PointerMove,
        GradientEventKind::PointerUp,
        GradientEventKind::Click,
        GradientEventKind::Wheel,
        GradientEventKind::ContextMenu,
        GradientEventKind::PointerOut,
        GradientEventKind::PointerLeave,
    ] {
        assert_eq!(counts.get(&kind), Some(&1), "{} count", kind);
    }
    assert_eq!(counts.get(&GradientEventKind::PointerDown), Some(&2));
    assert_eq!(counts.get(&GradientEventKind::DoubleClick), None);
}

#[test]
fn test_omitted_handlers_never_fire() {
    let clicks = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&clicks);
    let mut handlers = GradientHandlers::new().on_click(move |_| *sink.borrow_mut() += 1);
    let mut router = PointerRouter::new();
    let camera = camera();

    let mut events = router.process_cursor_moved(
        PhysicalPosition::new(320.0, 240.0),
        PhysicalSize::new(640, 480),
        &camera,
    );
    events.extend(router.process_mouse_button(MouseButton::Left, ElementState::Pressed));
    events.extend(router.process_mouse_button(MouseButton::Left, ElementState::Released));

    let fired = events.iter().filter(|e| handlers.dispatch(e)).count();
    assert_eq!(fired, 1);
    assert_eq!(*clicks.borrow(), 1);
}
