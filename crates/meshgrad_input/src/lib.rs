//! Pointer input for the mesh gradient
//!
//! This crate picks the gradient plane under the cursor and turns winit
//! window events into the widget's pointer events.

mod pointer_router;

pub use pointer_router::{
    map_mouse_button, PointerRouter, DEFAULT_DOUBLE_CLICK_DISTANCE, DEFAULT_DOUBLE_CLICK_MS,
    PIXELS_PER_LINE,
};
