//! The drawing surface.
//!
//! Couples the [`SurfaceState`] machine with a tiny-skia raster. Every
//! segment is painted before the event handler returns, so the raster always
//! reflects all input processed so far and a replay of the same events on a
//! freshly reset surface yields byte-identical captures.
//!
//! Until a raster is attached (or when the configured size is zero) every
//! drawing operation is a silent no-op and [`DrawingSurface::capture`]
//! returns `None`.

use sketch_core::{
    AttributeChange, CanvasBounds, PointerEvent, Propagation, Rgb, Segment, Stroke,
    SurfaceState, ToolAttributes, ERASER_WIDTH,
};
use tiny_skia::{Color, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Transform};

use crate::capture::CapturedImage;

/// Configuration for a drawing surface.
#[derive(Debug, Clone)]
pub struct SurfaceConfig {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Background color, also used by the eraser.
    pub background: Rgb,
    /// Initial toolbar selection.
    pub attributes: ToolAttributes,
    /// Eraser width in pixels.
    pub eraser_width: f32,
    /// Enable anti-aliasing.
    pub anti_aliasing: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            background: Rgb::WHITE,
            attributes: ToolAttributes::default(),
            eraser_width: ERASER_WIDTH,
            anti_aliasing: true,
        }
    }
}

impl SurfaceConfig {
    /// Default configuration at the given size.
    #[must_use]
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

/// A free-hand drawing surface backed by an RGBA raster.
#[derive(Debug, Clone)]
pub struct DrawingSurface {
    config: SurfaceConfig,
    state: SurfaceState,
    pixmap: Option<Pixmap>,
}

impl DrawingSurface {
    /// Create a surface and attach its raster.
    #[must_use]
    pub fn new(config: SurfaceConfig) -> Self {
        let mut surface = Self::detached(config);
        surface.attach();
        surface
    }

    /// Create a surface with no raster yet.
    #[must_use]
    pub fn detached(config: SurfaceConfig) -> Self {
        let state = SurfaceState::new(config.attributes, config.background)
            .with_eraser_width(config.eraser_width);
        Self {
            config,
            state,
            pixmap: None,
        }
    }

    /// Allocate the raster and paint the background.
    ///
    /// Returns whether a raster is available afterwards; a zero-sized surface
    /// never gets one.
    pub fn attach(&mut self) -> bool {
        if self.pixmap.is_none() {
            self.pixmap = Pixmap::new(self.config.width, self.config.height);
            match self.pixmap.as_mut() {
                Some(pixmap) => {
                    pixmap.fill(to_color(self.config.background));
                    tracing::debug!(
                        "Surface attached at {}x{}",
                        self.config.width,
                        self.config.height
                    );
                }
                None => tracing::warn!(
                    "Cannot allocate a {}x{} raster, surface stays detached",
                    self.config.width,
                    self.config.height
                ),
            }
        }
        self.pixmap.is_some()
    }

    /// Drop the raster. The surface goes idle and stops drawing.
    pub fn detach(&mut self) {
        self.pixmap = None;
        self.state.reset();
    }

    /// Whether a raster is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.pixmap.is_some()
    }

    /// Start a stroke at the event position.
    pub fn begin(&mut self, event: &PointerEvent) {
        if self.pixmap.is_none() {
            tracing::trace!("begin ignored: no raster attached");
            return;
        }
        self.state.begin(event);
    }

    /// Extend the stroke to the event position, painting the new segment.
    ///
    /// Returns whether the host must suppress the platform default (touch
    /// scrolling) for this event.
    pub fn extend(&mut self, event: &PointerEvent) -> Propagation {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return Propagation::Continue;
        };
        let extension = self.state.extend(event);
        if let Some(segment) = extension.segment {
            paint_segment(pixmap, &segment, self.config.anti_aliasing);
        }
        extension.propagation
    }

    /// Finish the stroke in progress.
    ///
    /// The finished stroke is returned for callers that keep their own
    /// history; the surface retains only pixels.
    pub fn end(&mut self) -> Option<Stroke> {
        if self.pixmap.is_none() {
            return None;
        }
        self.state.end()
    }

    /// Go idle and repaint everything with the background color.
    pub fn reset(&mut self) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        self.state.reset();
        pixmap.fill(to_color(self.config.background));
        tracing::debug!("Surface reset");
    }

    /// Change the toolbar selection for future strokes.
    pub fn set_attributes(&mut self, change: &AttributeChange) -> ToolAttributes {
        self.state.set_attributes(change)
    }

    /// Update the canvas' screen-space origin.
    pub fn set_bounds(&mut self, bounds: CanvasBounds) {
        self.state.set_bounds(bounds);
    }

    /// Current toolbar selection.
    #[must_use]
    pub fn attributes(&self) -> ToolAttributes {
        self.state.attributes()
    }

    /// Whether a stroke is in progress.
    #[must_use]
    pub fn is_tracing(&self) -> bool {
        self.state.is_tracing()
    }

    /// Surface configuration.
    #[must_use]
    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// Encode the current raster as PNG.
    ///
    /// Does not change any state. Mid-stroke captures show the partial
    /// stroke.
    #[must_use]
    pub fn capture(&self) -> Option<CapturedImage> {
        let pixmap = self.pixmap.as_ref()?;
        match CapturedImage::encode(pixmap) {
            Ok(image) => Some(image),
            Err(e) => {
                tracing::warn!("{e}");
                None
            }
        }
    }

    /// Straight-alpha RGBA bytes of the raster, row by row.
    #[must_use]
    pub fn rgba_pixels(&self) -> Option<Vec<u8>> {
        let pixmap = self.pixmap.as_ref()?;
        let mut out = Vec::with_capacity(pixmap.data().len());
        for pixel in pixmap.pixels() {
            let color = pixel.demultiply();
            out.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
        }
        Some(out)
    }
}

/// Stroke one segment onto the raster with round caps and joins.
fn paint_segment(pixmap: &mut Pixmap, segment: &Segment, anti_alias: bool) {
    let mut builder = PathBuilder::new();
    builder.move_to(segment.from.x, segment.from.y);
    builder.line_to(segment.to.x, segment.to.y);
    let Some(path) = builder.finish() else {
        tracing::trace!("Skipping degenerate segment {:?}", segment);
        return;
    };

    let color = segment.style.color;
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, 255);
    paint.anti_alias = anti_alias;

    let stroke = tiny_skia::Stroke {
        width: segment.style.width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..tiny_skia::Stroke::default()
    };

    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}

fn to_color(rgb: Rgb) -> Color {
    Color::from_rgba8(rgb.r, rgb.g, rgb.b, 255)
}
