//! Strokes and the drawing attributes they carry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Default pencil width in pixels.
pub const DEFAULT_WIDTH: f32 = 3.0;

/// Eraser width in pixels.
///
/// Applied regardless of the selected pencil width; anything narrower leaves
/// residue along the edges of wide strokes.
pub const ERASER_WIDTH: f32 = 20.0;

/// Smallest allowed stroke width.
pub const MIN_WIDTH: f32 = 1.0;

/// A point in canvas-local coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Black, the default pencil color.
    pub const BLACK: Self = Self::new(0x00, 0x00, 0x00);
    /// White, the default background.
    pub const WHITE: Self = Self::new(0xff, 0xff, 0xff);

    /// Create a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` hex string (the leading `#` is optional).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidColor`] if the string is not six hex digits.
    pub fn from_hex(hex: &str) -> CoreResult<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::InvalidColor(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| CoreError::InvalidColor(hex.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Format as lowercase `#rrggbb`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

/// A named toolbar color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    /// Human readable label.
    pub label: &'static str,
    /// The color.
    pub color: Rgb,
}

/// Pencil colors offered by the toolbar.
pub const PALETTE: [Swatch; 6] = [
    Swatch { label: "Black", color: Rgb::new(0x00, 0x00, 0x00) },
    Swatch { label: "Blue", color: Rgb::new(0x1e, 0x40, 0xaf) },
    Swatch { label: "Green", color: Rgb::new(0x04, 0x78, 0x57) },
    Swatch { label: "Red", color: Rgb::new(0xb9, 0x1c, 0x1c) },
    Swatch { label: "Purple", color: Rgb::new(0x7e, 0x22, 0xce) },
    Swatch { label: "Orange", color: Rgb::new(0xb4, 0x53, 0x09) },
];

/// Whether a stroke paints ink or erases it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    /// Paint with the selected color and width.
    #[default]
    Draw,
    /// Paint with the background color at [`ERASER_WIDTH`].
    Erase,
}

/// The toolbar's current selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolAttributes {
    /// Pencil color.
    pub color: Rgb,
    /// Pencil width in pixels, at least [`MIN_WIDTH`].
    pub width: f32,
    /// Draw or erase.
    pub mode: ToolMode,
}

impl Default for ToolAttributes {
    fn default() -> Self {
        Self {
            color: Rgb::BLACK,
            width: DEFAULT_WIDTH,
            mode: ToolMode::Draw,
        }
    }
}

impl ToolAttributes {
    /// Whether the eraser is selected.
    #[must_use]
    pub fn is_eraser(&self) -> bool {
        self.mode == ToolMode::Erase
    }

    /// Resolve the paint actually used for a stroke.
    ///
    /// The eraser ignores the pencil color and width entirely.
    #[must_use]
    pub fn stroke_style(&self, background: Rgb, eraser_width: f32) -> StrokeStyle {
        match self.mode {
            ToolMode::Draw => StrokeStyle {
                color: self.color,
                width: self.width,
            },
            ToolMode::Erase => StrokeStyle {
                color: background,
                width: eraser_width,
            },
        }
    }

    /// Apply a partial change, returning the resulting attributes.
    #[must_use]
    pub fn apply(mut self, change: &AttributeChange) -> Self {
        if let Some(color) = change.color {
            self.color = color;
        }
        if let Some(width) = change.width {
            if width.is_finite() {
                self.width = width.max(MIN_WIDTH);
            } else {
                tracing::debug!("Ignoring non-finite stroke width {width}");
            }
        }
        if let Some(erase) = change.erase {
            self.mode = if erase { ToolMode::Erase } else { ToolMode::Draw };
        }
        self
    }
}

/// A partial update to the toolbar selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeChange {
    /// New pencil color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    /// New pencil width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    /// Turn the eraser on or off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erase: Option<bool>,
}

impl AttributeChange {
    /// Pick a pencil color from the toolbar. Also leaves eraser mode.
    #[must_use]
    pub fn swatch(color: Rgb) -> Self {
        Self {
            color: Some(color),
            erase: Some(false),
            ..Self::default()
        }
    }

    /// Change only the width.
    #[must_use]
    pub fn width(width: f32) -> Self {
        Self {
            width: Some(width),
            ..Self::default()
        }
    }

    /// Turn the eraser on or off.
    #[must_use]
    pub fn eraser(erase: bool) -> Self {
        Self {
            erase: Some(erase),
            ..Self::default()
        }
    }
}

/// Resolved paint for a stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// Ink color.
    pub color: Rgb,
    /// Line width in pixels.
    pub width: f32,
}

/// A straight piece of a stroke, ready to rasterize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Start of the segment (the path's previous position).
    pub from: Point,
    /// End of the segment.
    pub to: Point,
    /// Paint captured when the stroke began.
    pub style: StrokeStyle,
}

/// One continuous gesture.
///
/// The style and mode are fixed at the moment the gesture begins.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    style: StrokeStyle,
    mode: ToolMode,
    points: Vec<Point>,
}

impl Stroke {
    /// Start a stroke at `origin`.
    #[must_use]
    pub fn begin(origin: Point, style: StrokeStyle, mode: ToolMode) -> Self {
        Self {
            style,
            mode,
            points: vec![origin],
        }
    }

    /// Append a point, returning the segment that joins it to the stroke.
    pub fn push(&mut self, point: Point) -> Segment {
        let from = self.last_point();
        self.points.push(point);
        Segment {
            from,
            to: point,
            style: self.style,
        }
    }

    fn last_point(&self) -> Point {
        self.points.last().copied().unwrap_or_default()
    }

    /// Paint used by every segment.
    #[must_use]
    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    /// Draw or erase.
    #[must_use]
    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    /// Points in drawing order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}
