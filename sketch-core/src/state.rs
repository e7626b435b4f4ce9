//! Drawing surface state machine.
//!
//! Tracks the toolbar selection and the gesture in progress. The machine is
//! raster-free: `extend` hands back the [`Segment`] to paint and the caller
//! rasterizes it before returning to the event loop.

use crate::{
    AttributeChange, CanvasBounds, PointerEvent, Propagation, Rgb, Segment, Stroke,
    ToolAttributes, ERASER_WIDTH,
};

/// Gesture phase.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    /// No contact.
    #[default]
    Idle,
    /// A stroke is being traced.
    Tracing(Stroke),
}

/// Result of feeding a move event into the machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extension {
    /// Segment to rasterize now, if the event extended a stroke.
    pub segment: Option<Segment>,
    /// Whether the host must suppress the platform default for this event.
    pub propagation: Propagation,
}

/// Mutable surface state: toolbar selection plus the in-progress gesture.
#[derive(Debug, Clone)]
pub struct SurfaceState {
    attributes: ToolAttributes,
    gesture: Gesture,
    bounds: CanvasBounds,
    background: Rgb,
    eraser_width: f32,
}

impl SurfaceState {
    /// Create an idle state painting over `background`.
    #[must_use]
    pub fn new(attributes: ToolAttributes, background: Rgb) -> Self {
        Self {
            attributes,
            gesture: Gesture::Idle,
            bounds: CanvasBounds::default(),
            background,
            eraser_width: ERASER_WIDTH,
        }
    }

    /// Override the eraser width.
    #[must_use]
    pub fn with_eraser_width(mut self, width: f32) -> Self {
        self.eraser_width = width;
        self
    }

    /// Start a stroke.
    ///
    /// Ignored while a stroke is already being traced, or when the event
    /// carries no position. Returns whether a stroke was started.
    pub fn begin(&mut self, event: &PointerEvent) -> bool {
        if self.is_tracing() {
            tracing::trace!("begin ignored: stroke already in progress");
            return false;
        }
        let Some(origin) = self.bounds.resolve(event) else {
            tracing::trace!("begin ignored: event has no position");
            return false;
        };

        let style = self
            .attributes
            .stroke_style(self.background, self.eraser_width);
        self.gesture = Gesture::Tracing(Stroke::begin(origin, style, self.attributes.mode));
        true
    }

    /// Extend the stroke in progress.
    ///
    /// A no-op while idle. Touch events always ask the host to suppress the
    /// default scroll/pan when a stroke is being traced.
    pub fn extend(&mut self, event: &PointerEvent) -> Extension {
        let Gesture::Tracing(stroke) = &mut self.gesture else {
            return Extension {
                segment: None,
                propagation: Propagation::Continue,
            };
        };

        let propagation = if event.is_touch() {
            Propagation::PreventDefault
        } else {
            Propagation::Continue
        };

        let segment = self.bounds.resolve(event).map(|point| stroke.push(point));
        Extension {
            segment,
            propagation,
        }
    }

    /// Finish the stroke in progress, if any.
    ///
    /// Idempotent; the finished stroke is handed to the caller and not kept.
    pub fn end(&mut self) -> Option<Stroke> {
        match std::mem::take(&mut self.gesture) {
            Gesture::Tracing(stroke) => Some(stroke),
            Gesture::Idle => None,
        }
    }

    /// Force the machine idle, discarding any stroke in progress.
    pub fn reset(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Update the toolbar selection. Affects future strokes only.
    pub fn set_attributes(&mut self, change: &AttributeChange) -> ToolAttributes {
        self.attributes = self.attributes.apply(change);
        self.attributes
    }

    /// Move the canvas origin (the canvas was scrolled or laid out again).
    pub fn set_bounds(&mut self, bounds: CanvasBounds) {
        self.bounds = bounds;
    }

    /// Current canvas origin.
    #[must_use]
    pub fn bounds(&self) -> CanvasBounds {
        self.bounds
    }

    /// Current toolbar selection.
    #[must_use]
    pub fn attributes(&self) -> ToolAttributes {
        self.attributes
    }

    /// Background color used for reset and the eraser.
    #[must_use]
    pub fn background(&self) -> Rgb {
        self.background
    }

    /// Whether a stroke is in progress.
    #[must_use]
    pub fn is_tracing(&self) -> bool {
        matches!(self.gesture, Gesture::Tracing(_))
    }

    /// The gesture in progress.
    #[must_use]
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self::new(ToolAttributes::default(), Rgb::WHITE)
    }
}
