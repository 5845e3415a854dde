//! Pointer routing for the gradient plane
//!
//! Turns raw window input into the widget's pointer events:
//! - Cursor moves: over/enter, move, out/leave as the cursor crosses the plane
//! - Buttons: down/up on the plane, click for left press + release on it
//! - Two clicks close in time and space: double-click
//! - Right press on the plane: context menu
//! - Wheel while on the plane

use std::time::{Duration, Instant};

use meshgrad_core::{
    GradientEvent, GradientEventKind, PerspectiveCamera, PlaneHit, PointerButton,
};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// Default maximum gap between the two clicks of a double-click
pub const DEFAULT_DOUBLE_CLICK_MS: u64 = 300;
/// Default maximum distance between the two clicks, in physical pixels
pub const DEFAULT_DOUBLE_CLICK_DISTANCE: f32 = 4.0;
/// Pixels per wheel line when the platform reports pixel deltas
pub const PIXELS_PER_LINE: f32 = 100.0;

/// Last known cursor state
#[derive(Debug, Clone, Copy)]
struct PointerSample {
    screen: [f32; 2],
    ndc: [f32; 2],
    hit: Option<PlaneHit>,
}

/// Routes window input to gradient pointer events
pub struct PointerRouter {
    cursor: Option<PointerSample>,
    hovering: bool,
    // Left press that landed on the plane, waiting for a release
    pending_click: bool,
    last_click: Option<(Instant, [f32; 2])>,

    // Configuration
    pub plane_size: [f32; 2],
    pub double_click_interval: Duration,
    pub double_click_distance: f32,
}

impl Default for PointerRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerRouter {
    pub fn new() -> Self {
        Self {
            cursor: None,
            hovering: false,
            pending_click: false,
            last_click: None,

            plane_size: [1.0, 1.0],
            double_click_interval: Duration::from_millis(DEFAULT_DOUBLE_CLICK_MS),
            double_click_distance: DEFAULT_DOUBLE_CLICK_DISTANCE,
        }
    }

    /// Set the double-click thresholds
    pub fn with_double_click(mut self, interval: Duration, distance: f32) -> Self {
        self.double_click_interval = interval;
        self.double_click_distance = distance;
        self
    }

    /// Set the size of the plane being picked
    pub fn with_plane_size(mut self, width: f32, height: f32) -> Self {
        self.plane_size = [width, height];
        self
    }

    /// Whether the cursor is currently over the plane
    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    /// Route a window event
    ///
    /// Events the router doesn't care about yield nothing.
    pub fn handle_window_event(
        &mut self,
        event: &WindowEvent,
        surface_size: PhysicalSize<u32>,
        camera: &PerspectiveCamera,
    ) -> Vec<GradientEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.process_cursor_moved(*position, surface_size, camera)
            }
            WindowEvent::CursorLeft { .. } => self.process_cursor_left(),
            WindowEvent::MouseInput { state, button, .. } => {
                self.process_mouse_button(*button, *state)
            }
            WindowEvent::MouseWheel { delta, .. } => self.process_mouse_wheel(*delta),
            _ => Vec::new(),
        }
    }

    /// Process cursor movement
    pub fn process_cursor_moved(
        &mut self,
        position: PhysicalPosition<f64>,
        surface_size: PhysicalSize<u32>,
        camera: &PerspectiveCamera,
    ) -> Vec<GradientEvent> {
        if surface_size.width == 0 || surface_size.height == 0 {
            return Vec::new();
        }

        let screen = [position.x as f32, position.y as f32];
        let ndc = [
            screen[0] / surface_size.width as f32 * 2.0 - 1.0,
            1.0 - screen[1] / surface_size.height as f32 * 2.0,
        ];
        let hit = camera
            .ray_from_ndc(ndc[0], ndc[1])
            .intersect_plane_z0(self.plane_size[0], self.plane_size[1]);
        let sample = PointerSample { screen, ndc, hit };
        self.cursor = Some(sample);

        let mut events = Vec::new();
        match (self.hovering, hit.is_some()) {
            (false, true) => {
                self.hovering = true;
                log::debug!("Pointer entered gradient at ({:.0}, {:.0})", screen[0], screen[1]);
                events.push(Self::event(GradientEventKind::PointerOver, &sample));
                events.push(Self::event(GradientEventKind::PointerEnter, &sample));
                events.push(Self::event(GradientEventKind::PointerMove, &sample));
            }
            (true, true) => {
                events.push(Self::event(GradientEventKind::PointerMove, &sample));
            }
            (true, false) => {
                self.hovering = false;
                log::debug!("Pointer left gradient at ({:.0}, {:.0})", screen[0], screen[1]);
                self.pending_click = false;
                events.push(Self::event(GradientEventKind::PointerOut, &sample));
                events.push(Self::event(GradientEventKind::PointerLeave, &sample));
            }
            (false, false) => {}
        }
        events
    }

    /// Process the cursor leaving the window
    pub fn process_cursor_left(&mut self) -> Vec<GradientEvent> {
        let last = self.cursor.take();
        self.pending_click = false;
        if !self.hovering {
            return Vec::new();
        }
        self.hovering = false;

        let sample = PointerSample {
            hit: None,
            ..last.unwrap_or(PointerSample {
                screen: [0.0, 0.0],
                ndc: [0.0, 0.0],
                hit: None,
            })
        };
        vec![
            Self::event(GradientEventKind::PointerOut, &sample),
            Self::event(GradientEventKind::PointerLeave, &sample),
        ]
    }

    /// Process mouse button input
    pub fn process_mouse_button(
        &mut self,
        button: MouseButton,
        state: ElementState,
    ) -> Vec<GradientEvent> {
        self.process_mouse_button_at(button, state, Instant::now())
    }

    /// Process mouse button input observed at `now`
    pub fn process_mouse_button_at(
        &mut self,
        button: MouseButton,
        state: ElementState,
        now: Instant,
    ) -> Vec<GradientEvent> {
        let sample = match self.cursor {
            Some(sample) if self.hovering => sample,
            _ => {
                if state == ElementState::Released && button == MouseButton::Left {
                    self.pending_click = false;
                }
                return Vec::new();
            }
        };
        let pointer_button = map_mouse_button(button);

        let mut events = Vec::new();
        match state {
            ElementState::Pressed => {
                events.push(
                    Self::event_at(GradientEventKind::PointerDown, &sample, now)
                        .with_button(pointer_button),
                );
                match button {
                    MouseButton::Left => self.pending_click = true,
                    MouseButton::Right => events.push(
                        Self::event_at(GradientEventKind::ContextMenu, &sample, now)
                            .with_button(pointer_button),
                    ),
                    _ => {}
                }
            }
            ElementState::Released => {
                events.push(
                    Self::event_at(GradientEventKind::PointerUp, &sample, now)
                        .with_button(pointer_button),
                );
                if button == MouseButton::Left && self.pending_click {
                    self.pending_click = false;
                    events.push(
                        Self::event_at(GradientEventKind::Click, &sample, now)
                            .with_button(pointer_button),
                    );
                    if self.is_double_click(now, sample.screen) {
                        // The pair is consumed; a third click starts over
                        self.last_click = None;
                        log::debug!(
                            "Double-click at ({:.0}, {:.0})",
                            sample.screen[0],
                            sample.screen[1]
                        );
                        events.push(
                            Self::event_at(GradientEventKind::DoubleClick, &sample, now)
                                .with_button(pointer_button),
                        );
                    } else {
                        self.last_click = Some((now, sample.screen));
                    }
                }
            }
        }
        events
    }

    /// Process wheel input
    pub fn process_mouse_wheel(&mut self, delta: MouseScrollDelta) -> Vec<GradientEvent> {
        let sample = match self.cursor {
            Some(sample) if self.hovering => sample,
            _ => return Vec::new(),
        };
        let lines = match delta {
            MouseScrollDelta::LineDelta(x, y) => [x, y],
            MouseScrollDelta::PixelDelta(pos) => [
                pos.x as f32 / PIXELS_PER_LINE,
                pos.y as f32 / PIXELS_PER_LINE,
            ],
        };
        vec![Self::event(GradientEventKind::Wheel, &sample).with_wheel_delta(lines)]
    }

    fn is_double_click(&self, now: Instant, screen: [f32; 2]) -> bool {
        match self.last_click {
            Some((at, pos)) => {
                let dx = screen[0] - pos[0];
                let dy = screen[1] - pos[1];
                now.saturating_duration_since(at) <= self.double_click_interval
                    && (dx * dx + dy * dy).sqrt() <= self.double_click_distance
            }
            None => false,
        }
    }

    fn event(kind: GradientEventKind, sample: &PointerSample) -> GradientEvent {
        GradientEvent::pointer(kind, sample.screen, sample.ndc, sample.hit)
    }

    fn event_at(kind: GradientEventKind, sample: &PointerSample, now: Instant) -> GradientEvent {
        GradientEvent {
            timestamp: now,
            ..Self::event(kind, sample)
        }
    }
}

/// Map a winit mouse button to the widget's button type
pub fn map_mouse_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Left,
        MouseButton::Right => PointerButton::Right,
        MouseButton::Middle => PointerButton::Middle,
        MouseButton::Back => PointerButton::Back,
        MouseButton::Forward => PointerButton::Forward,
        MouseButton::Other(id) => PointerButton::Other(id),
    }
}
