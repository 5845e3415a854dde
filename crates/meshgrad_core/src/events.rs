//! Gradient events and caller callbacks
//!
//! Input events are routed to the plane by `meshgrad_input`; this module
//! defines the event object callers receive and the table of optional
//! handlers. Handlers get the event exactly as produced, one call per event.

use bitflags::bitflags;
use std::fmt;
use std::time::Instant;

use crate::camera::PlaneHit;
use crate::props::PropsDiff;

/// Kinds of events a gradient can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradientEventKind {
    Click,
    ContextMenu,
    DoubleClick,
    Wheel,
    PointerUp,
    PointerDown,
    PointerOver,
    PointerOut,
    PointerEnter,
    PointerLeave,
    PointerMove,
    /// Props were applied (mount or change)
    PropsUpdate,
}

impl GradientEventKind {
    pub const ALL: [GradientEventKind; 12] = [
        GradientEventKind::Click,
        GradientEventKind::ContextMenu,
        GradientEventKind::DoubleClick,
        GradientEventKind::Wheel,
        GradientEventKind::PointerUp,
        GradientEventKind::PointerDown,
        GradientEventKind::PointerOver,
        GradientEventKind::PointerOut,
        GradientEventKind::PointerEnter,
        GradientEventKind::PointerLeave,
        GradientEventKind::PointerMove,
        GradientEventKind::PropsUpdate,
    ];

    /// The single-bit set for this kind
    pub fn flag(self) -> GradientEventKinds {
        match self {
            GradientEventKind::Click => GradientEventKinds::CLICK,
            GradientEventKind::ContextMenu => GradientEventKinds::CONTEXT_MENU,
            GradientEventKind::DoubleClick => GradientEventKinds::DOUBLE_CLICK,
            GradientEventKind::Wheel => GradientEventKinds::WHEEL,
            GradientEventKind::PointerUp => GradientEventKinds::POINTER_UP,
            GradientEventKind::PointerDown => GradientEventKinds::POINTER_DOWN,
            GradientEventKind::PointerOver => GradientEventKinds::POINTER_OVER,
            GradientEventKind::PointerOut => GradientEventKinds::POINTER_OUT,
            GradientEventKind::PointerEnter => GradientEventKinds::POINTER_ENTER,
            GradientEventKind::PointerLeave => GradientEventKinds::POINTER_LEAVE,
            GradientEventKind::PointerMove => GradientEventKinds::POINTER_MOVE,
            GradientEventKind::PropsUpdate => GradientEventKinds::PROPS_UPDATE,
        }
    }

    /// Callback name as it appears in the widget API
    pub fn handler_name(self) -> &'static str {
        match self {
            GradientEventKind::Click => "on_click",
            GradientEventKind::ContextMenu => "on_context_menu",
            GradientEventKind::DoubleClick => "on_double_click",
            GradientEventKind::Wheel => "on_wheel",
            GradientEventKind::PointerUp => "on_pointer_up",
            GradientEventKind::PointerDown => "on_pointer_down",
            GradientEventKind::PointerOver => "on_pointer_over",
            GradientEventKind::PointerOut => "on_pointer_out",
            GradientEventKind::PointerEnter => "on_pointer_enter",
            GradientEventKind::PointerLeave => "on_pointer_leave",
            GradientEventKind::PointerMove => "on_pointer_move",
            GradientEventKind::PropsUpdate => "on_props_update",
        }
    }
}

impl fmt::Display for GradientEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

bitflags! {
    /// A set of event kinds
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GradientEventKinds: u16 {
        const CLICK = 1 << 0;
        const CONTEXT_MENU = 1 << 1;
        const DOUBLE_CLICK = 1 << 2;
        const WHEEL = 1 << 3;
        const POINTER_UP = 1 << 4;
        const POINTER_DOWN = 1 << 5;
        const POINTER_OVER = 1 << 6;
        const POINTER_OUT = 1 << 7;
        const POINTER_ENTER = 1 << 8;
        const POINTER_LEAVE = 1 << 9;
        const POINTER_MOVE = 1 << 10;
        const PROPS_UPDATE = 1 << 11;
    }
}

/// Mouse button involved in a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// The event object handed to callbacks
#[derive(Debug, Clone, PartialEq)]
pub struct GradientEvent {
    pub kind: GradientEventKind,
    /// Cursor position in physical pixels, if the event came from the pointer
    pub screen_position: Option<[f32; 2]>,
    /// Cursor position in normalized device coordinates
    pub ndc: Option<[f32; 2]>,
    /// Intersection with the plane; absent for leave/out after the cursor
    /// exits and for props updates
    pub hit: Option<PlaneHit>,
    pub button: Option<PointerButton>,
    /// Wheel delta in lines (x, y)
    pub wheel_delta: Option<[f32; 2]>,
    /// Fields that changed, for props updates
    pub props_diff: Option<PropsDiff>,
    pub timestamp: Instant,
}

impl GradientEvent {
    /// A bare event of the given kind
    pub fn new(kind: GradientEventKind) -> Self {
        Self {
            kind,
            screen_position: None,
            ndc: None,
            hit: None,
            button: None,
            wheel_delta: None,
            props_diff: None,
            timestamp: Instant::now(),
        }
    }

    /// A pointer event at a screen position
    pub fn pointer(
        kind: GradientEventKind,
        screen_position: [f32; 2],
        ndc: [f32; 2],
        hit: Option<PlaneHit>,
    ) -> Self {
        Self {
            screen_position: Some(screen_position),
            ndc: Some(ndc),
            hit,
            ..Self::new(kind)
        }
    }

    /// A props-update event
    pub fn props_update(diff: PropsDiff) -> Self {
        Self {
            props_diff: Some(diff),
            ..Self::new(GradientEventKind::PropsUpdate)
        }
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = Some(button);
        self
    }

    pub fn with_wheel_delta(mut self, delta: [f32; 2]) -> Self {
        self.wheel_delta = Some(delta);
        self
    }
}

/// A caller-supplied event callback
pub type GradientHandler = Box<dyn FnMut(&GradientEvent)>;

/// Optional callbacks, one per event kind
#[derive(Default)]
pub struct GradientHandlers {
    on_click: Option<GradientHandler>,
    on_context_menu: Option<GradientHandler>,
    on_double_click: Option<GradientHandler>,
    on_wheel: Option<GradientHandler>,
    on_pointer_up: Option<GradientHandler>,
    on_pointer_down: Option<GradientHandler>,
    on_pointer_over: Option<GradientHandler>,
    on_pointer_out: Option<GradientHandler>,
    on_pointer_enter: Option<GradientHandler>,
    on_pointer_leave: Option<GradientHandler>,
    on_pointer_move: Option<GradientHandler>,
    on_props_update: Option<GradientHandler>,
}

impl GradientHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_click(mut self, f: impl FnMut(&GradientEvent) + 'static) -> Self {
        self.on_click = Some(Box::new(f));
        self
    }

    pub fn on_context_menu(mut self, f: impl FnMut(&GradientEvent) + 'static) -> Self {
        self.on_context_menu = Some(Box::new(f));
        self
    }

    pub fn on_double_click(mut self, f: impl FnMut(&GradientEvent) + 'static) -> Self {
        self.on_double_click = Some(Box::new(f));
        self
    }

    pub fn on_wheel(mut self, f: impl FnMut(&GradientEvent) + 'static) -> Self {
        self.on_wheel = Some(Box::new(f));
        self
    }

    pub fn on_pointer_up(mut self, f: impl FnMut(&GradientEvent) + 'static) -> Self {
        self.on_pointer_up = Some(Box::new(f));
        self
    }

    pub fn on_pointer_down(mut self, f: impl FnMut(&GradientEvent) + 'static) -> Self {
        self.on_pointer_down = Some(Box::new(f));
        self
    }

    pub fn on_pointer_over(mut self, f: impl FnMut(&GradientEvent) + 'static) -> Self {
        self.on_pointer_over = Some(Box::new(f));
        self
    }

    pub fn on_pointer_out(mut self, f: impl FnMut(&GradientEvent) + 'static) -> Self {
        self.on_pointer_out = Some(Box::new(f));
        self
    }

    pub fn on_pointer_enter(mut self, f: impl FnMut(&GradientEvent) + 'static) -> Self {
        self.on_pointer_enter = Some(Box::new(f));
        self
    }

    pub fn on_pointer_leave(mut self, f: impl FnMut(&GradientEvent) + 'static) -> Self {
        self.on_pointer_leave = Some(Box::new(f));
        self
    }

    pub fn on_pointer_move(mut self, f: impl FnMut(&GradientEvent) + 'static) -> Self {
        self.on_pointer_move = Some(Box::new(f));
        self
    }

    pub fn on_props_update(mut self, f: impl FnMut(&GradientEvent) + 'static) -> Self {
        self.on_props_update = Some(Box::new(f));
        self
    }

    fn slot(&mut self, kind: GradientEventKind) -> &mut Option<GradientHandler> {
        match kind {
            GradientEventKind::Click => &mut self.on_click,
            GradientEventKind::ContextMenu => &mut self.on_context_menu,
            GradientEventKind::DoubleClick => &mut self.on_double_click,
            GradientEventKind::Wheel => &mut self.on_wheel,
            GradientEventKind::PointerUp => &mut self.on_pointer_up,
            GradientEventKind::PointerDown => &mut self.on_pointer_down,
            GradientEventKind::PointerOver => &mut self.on_pointer_over,
            GradientEventKind::PointerOut => &mut self.on_pointer_out,
            GradientEventKind::PointerEnter => &mut self.on_pointer_enter,
            GradientEventKind::PointerLeave => &mut self.on_pointer_leave,
            GradientEventKind::PointerMove => &mut self.on_pointer_move,
            GradientEventKind::PropsUpdate => &mut self.on_props_update,
        }
    }

    /// Install or replace the handler for `kind`
    pub fn set(&mut self, kind: GradientEventKind, f: impl FnMut(&GradientEvent) + 'static) {
        *self.slot(kind) = Some(Box::new(f));
    }

    /// Remove the handler for `kind`
    pub fn clear(&mut self, kind: GradientEventKind) {
        *self.slot(kind) = None;
    }

    /// Whether a handler is installed for `kind`
    pub fn has(&self, kind: GradientEventKind) -> bool {
        self.subscribed().contains(kind.flag())
    }

    /// Kinds with an installed handler
    pub fn subscribed(&self) -> GradientEventKinds {
        let slots = [
            (self.on_click.is_some(), GradientEventKinds::CLICK),
            (self.on_context_menu.is_some(), GradientEventKinds::CONTEXT_MENU),
            (self.on_double_click.is_some(), GradientEventKinds::DOUBLE_CLICK),
            (self.on_wheel.is_some(), GradientEventKinds::WHEEL),
            (self.on_pointer_up.is_some(), GradientEventKinds::POINTER_UP),
            (self.on_pointer_down.is_some(), GradientEventKinds::POINTER_DOWN),
            (self.on_pointer_over.is_some(), GradientEventKinds::POINTER_OVER),
            (self.on_pointer_out.is_some(), GradientEventKinds::POINTER_OUT),
            (self.on_pointer_enter.is_some(), GradientEventKinds::POINTER_ENTER),
            (self.on_pointer_leave.is_some(), GradientEventKinds::POINTER_LEAVE),
            (self.on_pointer_move.is_some(), GradientEventKinds::POINTER_MOVE),
            (self.on_props_update.is_some(), GradientEventKinds::PROPS_UPDATE),
        ];
        slots
            .iter()
            .filter(|(present, _)| *present)
            .fold(GradientEventKinds::empty(), |acc, (_, flag)| acc | *flag)
    }

    /// Invoke the handler for the event's kind
    ///
    /// Returns `false` without doing anything when no handler is installed.
    pub fn dispatch(&mut self, event: &GradientEvent) -> bool {
        match self.slot(event.kind) {
            Some(handler) => {
                handler(event);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for GradientHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GradientHandlers")
            .field("subscribed", &self.subscribed())
            .finish()
    }
}
