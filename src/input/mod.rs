//! Input handling module
//!
//! Provides demo key mapping from raw events to semantic actions.

mod input_mapper;

pub use input_mapper::{step_speed, InputAction, InputMapper};
