//! Mesh Gradient - animated gradient demo
//!
//! Library half of the demo binary: configuration loading, the window and
//! render systems, and demo key mapping.

pub mod config;
pub mod input;
pub mod systems;
