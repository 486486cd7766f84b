//! Host input events and their normalization.
//!
//! Hosts report positions either relative to the rendering surface or in
//! client (page) coordinates. Everything past [`normalize_pointer_event`]
//! works on a single [`Point`].

use serde::{Deserialize, Serialize};

use crate::transform::Point;

/// A mouse, pen or single touch position as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Position in client coordinates
    pub client: Point,
    /// Position relative to the rendering surface, when the host provides it
    #[serde(default)]
    pub offset: Option<Point>,
}

impl PointerEvent {
    /// Event carrying only a client position (touch points).
    pub fn client(x: f32, y: f32) -> Self {
        Self {
            client: Point::new(x, y),
            offset: None,
        }
    }

    /// Event carrying both positions (mouse events).
    pub fn with_offset(client: Point, offset: Point) -> Self {
        Self {
            client,
            offset: Some(offset),
        }
    }
}

/// Mouse wheel or trackpad scroll.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelEvent {
    /// Vertical scroll delta; negative scrolls up
    pub delta_y: f32,
    /// Pointer position at the time of the scroll
    #[serde(flatten)]
    pub pointer: PointerEvent,
}

/// Touch event listing every touch still in contact with the surface.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TouchEvent {
    pub touches: Vec<PointerEvent>,
}

impl TouchEvent {
    pub fn new(touches: Vec<PointerEvent>) -> Self {
        Self { touches }
    }

    /// Touch event from client positions.
    pub fn from_points(points: &[(f32, f32)]) -> Self {
        Self::new(
            points
                .iter()
                .map(|&(x, y)| PointerEvent::client(x, y))
                .collect(),
        )
    }

    /// Touch event with no active touches (the last finger lifted).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.touches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.touches.is_empty()
    }
}

/// Canonical position of a pointer event, preferring the surface-relative one.
pub fn normalize_pointer_event(event: &PointerEvent) -> Point {
    event.offset.unwrap_or(event.client)
}

/// Every input the controller understands, in a serializable form.
///
/// Used to record and replay interaction scripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    Wheel(WheelEvent),
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp,
    TouchStart(TouchEvent),
    TouchMove(TouchEvent),
    TouchEnd(TouchEvent),
    /// Host layout reported a new image origin
    Anchor { x: f32, y: f32 },
    /// Displayed image changed identity
    Reset,
}

impl InputEvent {
    /// Script name of the event, as used in the `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            InputEvent::Wheel(_) => "wheel",
            InputEvent::PointerDown(_) => "pointer_down",
            InputEvent::PointerMove(_) => "pointer_move",
            InputEvent::PointerUp => "pointer_up",
            InputEvent::TouchStart(_) => "touch_start",
            InputEvent::TouchMove(_) => "touch_move",
            InputEvent::TouchEnd(_) => "touch_end",
            InputEvent::Anchor { .. } => "anchor",
            InputEvent::Reset => "reset",
        }
    }
}
