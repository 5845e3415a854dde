//! Core types for the mesh gradient widget
//!
//! Everything here is plain data and math; nothing touches the GPU.
//!
//! - [`MeshGradientProps`] - The widget's configuration surface
//! - [`Color`] / [`ColorInput`] - Linear colors and the forms callers supply
//! - [`Palette`] - Ordered colors converted once per props change
//! - [`AnimationClock`] - The `time += speed * delta` accumulator
//! - [`PerspectiveCamera`] - Framing and picking rays
//! - [`PlaneGeometry`] - The tessellated plane the shader displaces
//! - [`GradientEvent`] / [`GradientHandlers`] - Event objects and callbacks

pub mod camera;
pub mod clock;
pub mod color;
pub mod events;
pub mod geometry;
pub mod palette;
pub mod props;

pub use camera::{PerspectiveCamera, PlaneHit, Ray};
pub use clock::{AnimationClock, FrameTimer};
pub use color::{Color, ColorInput, ColorParseError};
pub use events::{
    GradientEvent, GradientEventKind, GradientEventKinds, GradientHandler, GradientHandlers,
    PointerButton,
};
pub use geometry::{clamp_segments, PlaneGeometry, PlaneVertex, MAX_SEGMENTS};
pub use palette::Palette;
pub use props::{MeshGradientProps, PropsDiff};
