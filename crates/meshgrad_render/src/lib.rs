//! Mesh Gradient Rendering Library
//!
//! This crate provides the wgpu-based pipeline that draws an animated,
//! noise-displaced gradient plane.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`widget::MeshGradient`] - The component: props, clock, handlers and GPU resources
//! - [`pipeline::GradientPipeline`] - Fill and wireframe pipelines over one plane
//! - [`draw_state::DrawState`] - Clear color, opacity and pixel ratio per frame

pub mod context;
pub mod draw_state;
pub mod pipeline;
pub mod widget;

// Re-export core types for convenience
pub use meshgrad_core::{
    Color, ColorInput, GradientEvent, GradientEventKind, GradientHandlers, MeshGradientProps,
    Palette, PerspectiveCamera, PlaneGeometry, PropsDiff,
};

pub use context::{ContextError, RenderContext};
pub use draw_state::{DrawState, DEFAULT_MAX_PIXEL_RATIO};
pub use widget::{GradientState, MeshGradient};
