//! Input events for drawing on the surface.
//!
//! Mouse and touch events arrive in screen (client) coordinates. They are
//! resolved into a single canvas-local [`Point`] by subtracting the canvas
//! bounding box origin, so the stroke state machine never sees the device
//! shape of the event.

use serde::{Deserialize, Serialize};

use crate::Point;

/// Phase of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    /// Touch started (finger down).
    Start,
    /// Touch moved (finger dragging).
    Move,
    /// Touch ended (finger up).
    End,
    /// Touch cancelled (e.g., palm rejection).
    Cancel,
}

/// A single touch point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Touch identifier (for multi-touch).
    #[serde(default)]
    pub id: u32,
    /// X position in screen coordinates.
    pub client_x: f32,
    /// Y position in screen coordinates.
    pub client_y: f32,
    /// Pressure (0.0 to 1.0, if available).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f32>,
}

impl TouchPoint {
    /// Create a touch point at the given screen position.
    #[must_use]
    pub fn new(client_x: f32, client_y: f32) -> Self {
        Self {
            id: 0,
            client_x,
            client_y,
            pressure: None,
        }
    }
}

/// A touch event with one or more touch points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    /// Phase of this touch event.
    pub phase: TouchPhase,
    /// All current touch points.
    pub touches: Vec<TouchPoint>,
    /// Timestamp in milliseconds since surface start.
    #[serde(default)]
    pub timestamp_ms: u64,
}

impl TouchEvent {
    /// Create a new touch event.
    #[must_use]
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>, timestamp_ms: u64) -> Self {
        Self {
            phase,
            touches,
            timestamp_ms,
        }
    }

    /// Create a single-finger touch event.
    #[must_use]
    pub fn single(phase: TouchPhase, client_x: f32, client_y: f32) -> Self {
        Self::new(phase, vec![TouchPoint::new(client_x, client_y)], 0)
    }

    /// Get the primary (first) touch point.
    #[must_use]
    pub fn primary_touch(&self) -> Option<&TouchPoint> {
        self.touches.first()
    }
}

/// A pointer event as delivered by the host's event dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PointerEvent {
    /// Mouse event.
    Mouse {
        /// X coordinate in screen space.
        client_x: f32,
        /// Y coordinate in screen space.
        client_y: f32,
    },
    /// Touch event; only the primary touch point draws.
    Touch(TouchEvent),
}

impl PointerEvent {
    /// Create a mouse event at the given screen position.
    #[must_use]
    pub fn mouse(client_x: f32, client_y: f32) -> Self {
        Self::Mouse { client_x, client_y }
    }

    /// Create a single-finger touch move event at the given screen position.
    #[must_use]
    pub fn touch(client_x: f32, client_y: f32) -> Self {
        Self::Touch(TouchEvent::single(TouchPhase::Move, client_x, client_y))
    }

    /// Whether this event came from a touch screen.
    #[must_use]
    pub fn is_touch(&self) -> bool {
        matches!(self, Self::Touch(_))
    }

    /// Screen position of the event, if it carries one.
    ///
    /// A touch event with an empty touch list has no position.
    #[must_use]
    pub fn client_position(&self) -> Option<(f32, f32)> {
        match self {
            Self::Mouse { client_x, client_y } => Some((*client_x, *client_y)),
            Self::Touch(touch) => touch.primary_touch().map(|t| (t.client_x, t.client_y)),
        }
    }
}

/// Screen-space bounding box of the canvas element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasBounds {
    /// Left edge in screen coordinates.
    pub left: f32,
    /// Top edge in screen coordinates.
    pub top: f32,
}

impl CanvasBounds {
    /// Create bounds with the given screen-space origin.
    #[must_use]
    pub fn new(left: f32, top: f32) -> Self {
        Self { left, top }
    }

    /// Resolve an event into a canvas-local point.
    #[must_use]
    pub fn resolve(&self, event: &PointerEvent) -> Option<Point> {
        event
            .client_position()
            .map(|(x, y)| Point::new(x - self.left, y - self.top))
    }
}

/// What the host should do with the platform's default handling of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Let the platform handle the event normally.
    Continue,
    /// Suppress the default action (scroll/pan for touch drags).
    PreventDefault,
}

impl Propagation {
    /// Whether the default action must be suppressed.
    #[must_use]
    pub fn prevents_default(self) -> bool {
        self == Self::PreventDefault
    }
}
