//! Rendering pipeline components
//!
//! GPU data layouts and the fill/wireframe pipelines for the gradient plane.

pub mod types;
pub mod gradient_pipeline;

// Re-export types
pub use types::{GradientUniforms, GradientVertex, PALETTE_ENTRY_SIZE};

// Re-export pipeline
pub use gradient_pipeline::{
    needs_realloc, palette_buffer_size, DrawMode, GradientPipeline, PipelineError, DEPTH_FORMAT,
};
