//! The mesh gradient component
//!
//! [`GradientState`] holds everything that does not need a GPU: props, the
//! converted palette, the animation clock and the caller's handlers.
//! [`MeshGradient`] pairs it with the [`GradientPipeline`] that draws it.

use meshgrad_core::{
    AnimationClock, GradientEvent, GradientHandlers, MeshGradientProps, Palette, PlaneGeometry,
    PropsDiff,
};

use crate::draw_state::DrawState;
use crate::pipeline::{DrawMode, GradientPipeline, GradientUniforms, PipelineError};

/// CPU side of a mesh gradient instance
#[derive(Debug)]
pub struct GradientState {
    props: MeshGradientProps,
    palette: Palette,
    clock: AnimationClock,
    handlers: GradientHandlers,
}

impl GradientState {
    /// Mount a new instance
    ///
    /// Time starts at zero, the palette is converted once and the
    /// props-update handler (if any) receives a [`PropsDiff::MOUNT`] event.
    pub fn mount(props: MeshGradientProps, handlers: GradientHandlers) -> Self {
        if !props.speed_in_expected_range() {
            log::debug!("Speed {} outside the tuned range 0..0.1", props.speed);
        }
        let palette = props.palette();
        let mut state = Self {
            props,
            palette,
            clock: AnimationClock::new(),
            handlers,
        };
        state.dispatch(&GradientEvent::props_update(PropsDiff::MOUNT));
        state
    }

    /// Apply new props and report what changed
    ///
    /// Only a colors change reconverts the palette. Nothing here touches the
    /// clock.
    pub fn apply_props(&mut self, props: MeshGradientProps) -> PropsDiff {
        let diff = props.diff(&self.props);
        if !diff.any() {
            return diff;
        }

        if diff.speed && !props.speed_in_expected_range() {
            log::debug!("Speed {} outside the tuned range 0..0.1", props.speed);
        }
        if diff.colors {
            self.palette = props.palette();
            log::debug!("Palette reconverted: {} colors", self.palette.len());
        }
        self.props = props;
        self.dispatch(&GradientEvent::props_update(diff));
        diff
    }

    /// Advance the clock by `speed * delta` and return the new time
    pub fn frame(&mut self, delta: f32) -> f64 {
        self.clock.advance(self.props.speed, delta)
    }

    /// Uniforms for the current frame
    pub fn uniforms(&self, view_proj: [[f32; 4]; 4]) -> GradientUniforms {
        GradientUniforms {
            view_proj,
            time: self.clock.time_f32(),
            color_count: self.palette.len() as u32,
            ..Default::default()
        }
    }

    pub fn draw_mode(&self) -> DrawMode {
        DrawMode::from_wireframe(self.props.wireframe)
    }

    /// Forward an event to the matching handler, unchanged
    pub fn dispatch(&mut self, event: &GradientEvent) -> bool {
        self.handlers.dispatch(event)
    }

    pub fn props(&self) -> &MeshGradientProps {
        &self.props
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn time(&self) -> f64 {
        self.clock.time()
    }

    pub fn handlers(&self) -> &GradientHandlers {
        &self.handlers
    }

    pub fn handlers_mut(&mut self) -> &mut GradientHandlers {
        &mut self.handlers
    }
}

/// A mesh gradient instance with its GPU resources
pub struct MeshGradient {
    state: GradientState,
    pipeline: GradientPipeline,
}

impl MeshGradient {
    /// Mount with the default 1x1 plane at 500x500 segments
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        props: MeshGradientProps,
        handlers: GradientHandlers,
    ) -> Self {
        Self::with_geometry(device, surface_format, &PlaneGeometry::default(), props, handlers)
    }

    /// Mount with a custom plane tessellation
    pub fn with_geometry(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        geometry: &PlaneGeometry,
        props: MeshGradientProps,
        handlers: GradientHandlers,
    ) -> Self {
        let state = GradientState::mount(props, handlers);
        let pipeline = GradientPipeline::new(device, surface_format, geometry, state.palette());
        log::info!(
            "Mesh gradient mounted: {} colors, wireframe {}",
            state.palette().len(),
            state.props().wireframe
        );
        Self { state, pipeline }
    }

    /// Apply new props, uploading the palette if the colors changed
    pub fn set_props(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        props: MeshGradientProps,
    ) -> PropsDiff {
        let diff = self.state.apply_props(props);
        if diff.colors {
            self.pipeline.update_palette(device, queue, self.state.palette());
        }
        diff
    }

    /// Advance the animation
    pub fn frame(&mut self, delta: f32) -> f64 {
        self.state.frame(delta)
    }

    /// Write this frame's uniforms
    pub fn prepare(&self, queue: &wgpu::Queue, view_proj: [[f32; 4]; 4]) {
        self.pipeline
            .update_uniforms(queue, &self.state.uniforms(view_proj));
    }

    /// Resize the depth attachment to match the drawing buffer
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.pipeline.ensure_depth_texture(device, width, height);
    }

    /// Record the plane into an existing pass
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        self.pipeline.draw(render_pass, self.state.draw_mode());
    }

    /// Clear `view` to `clear_color` and draw the plane
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        clear_color: wgpu::Color,
    ) -> Result<(), PipelineError> {
        self.pipeline
            .render(encoder, view, clear_color, self.state.draw_mode())
    }

    /// Global draw state for the current props
    pub fn draw_state(&self, scale_factor: f64, max_pixel_ratio: f32) -> DrawState {
        DrawState::from_props(self.state.props(), scale_factor, max_pixel_ratio)
    }

    pub fn dispatch(&mut self, event: &GradientEvent) -> bool {
        self.state.dispatch(event)
    }

    pub fn state(&self) -> &GradientState {
        &self.state
    }

    pub fn props(&self) -> &MeshGradientProps {
        self.state.props()
    }

    pub fn time(&self) -> f64 {
        self.state.time()
    }

    pub fn handlers_mut(&mut self) -> &mut GradientHandlers {
        self.state.handlers_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshgrad_core::{Color, GradientEventKind};
    use std::cell::RefCell;
    use std::rc::Rc;

    const PALETTE_A: [&str; 5] = ["#C3E4FF", "#6EC3F4", "#EAE2FF", "#B9BEFF", "#B3B8F9"];
    const PALETTE_B: [&str; 5] = ["#69D2E7", "#A7DBD8", "#E0E4CC", "#F38630", "#FA6900"];

    fn recorder() -> (Rc<RefCell<Vec<GradientEvent>>>, GradientHandlers) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let handlers =
            GradientHandlers::new().on_props_update(move |e| sink.borrow_mut().push(e.clone()));
        (events, handlers)
    }

    #[test]
    fn test_mount_starts_at_zero() {
        let state = GradientState::mount(MeshGradientProps::new(PALETTE_A), GradientHandlers::new());
        assert_eq!(state.time(), 0.0);
        assert_eq!(state.palette().len(), 5);
        assert_eq!(state.draw_mode(), DrawMode::Fill);
    }

    #[test]
    fn test_mount_fires_props_update_once() {
        let (events, handlers) = recorder();
        let _state = GradientState::mount(MeshGradientProps::new(PALETTE_A), handlers);
        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, GradientEventKind::PropsUpdate);
        assert_eq!(events[0].props_diff, Some(PropsDiff::MOUNT));
    }

    #[test]
    fn test_palette_order_preserved() {
        let state = GradientState::mount(MeshGradientProps::new(PALETTE_B), GradientHandlers::new());
        let expected: Vec<Color> = PALETTE_B
            .iter()
            .map(|hex| hex.parse::<Color>().unwrap())
            .collect();
        assert_eq!(state.palette().colors(), expected.as_slice());
    }

    #[test]
    fn test_time_accumulates_speed_times_delta() {
        let props = MeshGradientProps::new(PALETTE_A).with_speed(0.02);
        let mut state = GradientState::mount(props, GradientHandlers::new());
        for _ in 0..10 {
            state.frame(0.5);
        }
        assert!((state.time() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_zero_speed_freezes_time() {
        let props = MeshGradientProps::new(PALETTE_A).with_speed(0.0);
        let mut state = GradientState::mount(props, GradientHandlers::new());
        state.frame(1.0);
        state.frame(1.0);
        assert_eq!(state.time(), 0.0);
    }

    #[test]
    fn test_non_color_changes_keep_time_and_palette() {
        let mut state =
            GradientState::mount(MeshGradientProps::new(PALETTE_A), GradientHandlers::new());
        state.frame(1.0);
        let time = state.time();
        let palette = state.palette().clone();

        let props = state
            .props()
            .clone()
            .with_wireframe(true)
            .with_speed(0.05)
            .with_background_color("#000000")
            .with_background_opacity(0.8);
        let diff = state.apply_props(props);

        assert!(diff.wireframe && diff.speed && diff.background);
        assert!(!diff.colors);
        assert_eq!(state.time(), time);
        assert_eq!(state.palette(), &palette);
        assert_eq!(state.draw_mode(), DrawMode::Wireframe);
    }

    #[test]
    fn test_palette_switch_keeps_time() {
        let (events, handlers) = recorder();
        let mut state = GradientState::mount(MeshGradientProps::new(PALETTE_A), handlers);
        state.frame(2.0);
        let time = state.time();

        let props = state.props().clone().with_colors(PALETTE_B);
        let diff = state.apply_props(props);

        assert!(diff.colors);
        assert_eq!(state.time(), time);
        assert_eq!(state.palette(), &MeshGradientProps::new(PALETTE_B).palette());
        assert_eq!(events.borrow().len(), 2);
    }

    #[test]
    fn test_unchanged_props_fire_nothing() {
        let (events, handlers) = recorder();
        let props = MeshGradientProps::new(PALETTE_A);
        let mut state = GradientState::mount(props.clone(), handlers);
        assert!(!state.apply_props(props).any());
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn test_uniforms_carry_time_and_count() {
        let mut state =
            GradientState::mount(MeshGradientProps::new(PALETTE_A), GradientHandlers::new());
        state.frame(10.0);
        let uniforms = state.uniforms(GradientUniforms::default().view_proj);
        assert_eq!(uniforms.color_count, 5);
        assert!((uniforms.time - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_empty_palette_count_zero() {
        let state = GradientState::mount(MeshGradientProps::default(), GradientHandlers::new());
        assert_eq!(state.uniforms(GradientUniforms::default().view_proj).color_count, 0);
    }

    #[test]
    fn test_dispatch_without_handler() {
        let mut state =
            GradientState::mount(MeshGradientProps::new(PALETTE_A), GradientHandlers::new());
        assert!(!state.dispatch(&GradientEvent::new(GradientEventKind::Click)));
    }
}
