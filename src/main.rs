//! Mesh Gradient demo
//!
//! Shows an animated mesh gradient filling the window. Clicking the gradient
//! switches palettes; keys toggle wireframe, palette, speed and fullscreen.

use std::cell::Cell;
use std::rc::Rc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use meshgrad::config::AppConfig;
use meshgrad::input::{step_speed, InputAction, InputMapper};
use meshgrad::systems::{RenderError, RenderSystem, WindowSystem};
use meshgrad_core::{FrameTimer, GradientHandlers, MeshGradientProps};
use meshgrad_input::PointerRouter;

/// Main application state
struct App {
    /// Application configuration
    config: AppConfig,
    window: Option<WindowSystem>,
    render: Option<RenderSystem>,
    router: PointerRouter,
    timer: FrameTimer,
    /// Index into the demo palettes
    palette_index: usize,
    /// Set by the click handler, consumed after dispatch
    palette_requested: Rc<Cell<bool>>,
}

impl App {
    fn new() -> Self {
        // Load configuration
        let config = AppConfig::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        });

        let router = PointerRouter::new().with_double_click(
            config.input.double_click_interval(),
            config.input.double_click_distance,
        );
        let timer = FrameTimer::with_max_delta(config.rendering.max_frame_delta);

        Self {
            config,
            window: None,
            render: None,
            router,
            timer,
            palette_index: 0,
            palette_requested: Rc::new(Cell::new(false)),
        }
    }

    fn handlers(&self) -> GradientHandlers {
        let palette_requested = Rc::clone(&self.palette_requested);
        GradientHandlers::new()
            .on_click(move |_| palette_requested.set(true))
            .on_pointer_move(|e| {
                if let Some(hit) = e.hit {
                    log::debug!("Pointer move at uv ({:.3}, {:.3})", hit.uv[0], hit.uv[1]);
                }
            })
            .on_props_update(|e| log::debug!("Props updated: {:?}", e.props_diff))
    }

    /// Apply a props change and refresh the title
    fn update_props(&mut self, f: impl FnOnce(MeshGradientProps) -> MeshGradientProps) {
        if let Some(render) = &mut self.render {
            let props = f(render.props().clone());
            render.set_props(props);
            if let Some(window) = &self.window {
                let props = render.props();
                window.update_title(props.speed, props.wireframe);
            }
        }
    }

    fn next_palette(&mut self) {
        let palettes = &self.config.demo.palettes;
        if palettes.is_empty() {
            return;
        }
        self.palette_index = (self.palette_index + 1) % palettes.len();
        let colors = palettes[self.palette_index].clone();
        log::info!("Switching to palette {}", self.palette_index);
        self.update_props(|props| props.with_colors(colors));
    }

    fn handle_action(&mut self, event_loop: &ActiveEventLoop, action: InputAction) {
        let step = self.config.demo.speed_step;
        match action {
            InputAction::ToggleWireframe => {
                self.update_props(|props| {
                    let wireframe = !props.wireframe;
                    props.with_wireframe(wireframe)
                });
            }
            InputAction::NextPalette => self.next_palette(),
            InputAction::SpeedUp => {
                self.update_props(|props| {
                    let speed = step_speed(props.speed, step);
                    props.with_speed(speed)
                });
            }
            InputAction::SpeedDown => {
                self.update_props(|props| {
                    let speed = step_speed(props.speed, -step);
                    props.with_speed(speed)
                });
            }
            InputAction::ToggleFullscreen => {
                if let Some(window) = &self.window {
                    window.toggle_fullscreen();
                }
            }
            InputAction::Exit => event_loop.exit(),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window) => window,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let render = match RenderSystem::new(
            window.window().clone(),
            self.config.initial_props(),
            self.handlers(),
            self.config.camera.to_camera(),
            self.config.rendering.clone(),
            self.config.window.transparent,
        ) {
            Ok(render) => render,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let props = render.props();
        window.update_title(props.speed, props.wireframe);
        window.request_redraw();

        self.timer = FrameTimer::with_max_delta(self.config.rendering.max_frame_delta);
        self.window = Some(window);
        self.render = Some(render);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
                return;
            }

            WindowEvent::Resized(physical_size) => {
                if let (Some(window), Some(render)) = (&self.window, &mut self.render) {
                    render.resize(*physical_size, window.scale_factor());
                }
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let (Some(window), Some(render)) = (&self.window, &mut self.render) {
                    render.resize(window.inner_size(), *scale_factor);
                }
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let PhysicalKey::Code(key) = key_event.physical_key {
                    if let Some(action) = InputMapper::map_keyboard(key, key_event.state) {
                        self.handle_action(event_loop, action);
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                let dt = self.timer.tick();

                let mut exit = false;
                if let Some(render) = &mut self.render {
                    render.update(dt);
                    match render.render_frame() {
                        Ok(()) => {}
                        Err(RenderError::SurfaceLost) => render.recover_surface(),
                        Err(RenderError::OutOfMemory) => {
                            log::error!("GPU out of memory");
                            exit = true;
                        }
                        Err(e) => log::warn!("{}", e),
                    }
                }
                if exit {
                    event_loop.exit();
                    return;
                }

                // Request next frame
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
                return;
            }

            _ => {}
        }

        // Pointer events go to the gradient after the window handled them
        if let (Some(window), Some(render)) = (&self.window, &mut self.render) {
            let pointer_events =
                self.router
                    .handle_window_event(&event, window.inner_size(), render.camera());
            for pointer_event in &pointer_events {
                render.dispatch(pointer_event);
            }
        }
        if self.palette_requested.replace(false) {
            self.next_palette();
        }
    }
}

fn main() {
    // Initialize logging
    env_logger::init();
    log::info!("Starting Mesh Gradient");

    // Create event loop
    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            return;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    // Create and run application
    let mut app = App::new();
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
    }
}
