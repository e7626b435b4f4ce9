//! Stroke scripts: recorded pointer input replayed onto a surface.
//!
//! A script is a JSON array of steps:
//!
//! ```json
//! [
//!   { "op": "set_attributes", "color": "#1e40af", "width": 5 },
//!   { "op": "begin", "x": 10, "y": 10 },
//!   { "op": "extend", "x": 60, "y": 40, "input": "touch" },
//!   { "op": "end" }
//! ]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sketch_core::{AttributeChange, PointerEvent};
use sketch_renderer::{CapturedImage, DrawingSurface, SurfaceConfig};
use thiserror::Error;

/// Errors loading or rendering a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The script file could not be read.
    #[error("failed to read script {path}: {source}")]
    Io {
        /// Script location.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The script is not valid JSON for a step list.
    #[error("invalid stroke script: {0}")]
    Parse(#[from] serde_json::Error),
    /// The surface could not produce an image.
    #[error("surface has nothing to capture")]
    NoCapture,
}

/// Which device a step pretends to come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Mouse event.
    #[default]
    Mouse,
    /// Single-finger touch event.
    Touch,
}

impl InputKind {
    fn event(self, x: f32, y: f32) -> PointerEvent {
        match self {
            Self::Mouse => PointerEvent::mouse(x, y),
            Self::Touch => PointerEvent::touch(x, y),
        }
    }
}

/// One recorded input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Pointer pressed.
    Begin {
        /// Client x.
        x: f32,
        /// Client y.
        y: f32,
        /// Input device.
        #[serde(default)]
        input: InputKind,
    },
    /// Pointer moved.
    Extend {
        /// Client x.
        x: f32,
        /// Client y.
        y: f32,
        /// Input device.
        #[serde(default)]
        input: InputKind,
    },
    /// Pointer released.
    End,
    /// Clear the drawing.
    Reset,
    /// Toolbar change.
    SetAttributes(AttributeChange),
}

/// An ordered list of steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrokeScript(Vec<ScriptStep>);

impl StrokeScript {
    /// Parse a script from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Parse`] on malformed input.
    pub fn parse(json: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a script file.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Io`] if the file cannot be read and
    /// [`ScriptError::Parse`] on malformed input.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let json = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&json)
    }

    /// The steps in order.
    #[must_use]
    pub fn steps(&self) -> &[ScriptStep] {
        &self.0
    }

    /// Feed every step to a surface.
    pub fn replay(&self, surface: &mut DrawingSurface) {
        for step in &self.0 {
            match *step {
                ScriptStep::Begin { x, y, input } => surface.begin(&input.event(x, y)),
                ScriptStep::Extend { x, y, input } => {
                    surface.extend(&input.event(x, y));
                }
                ScriptStep::End => {
                    surface.end();
                }
                ScriptStep::Reset => surface.reset(),
                ScriptStep::SetAttributes(change) => {
                    surface.set_attributes(&change);
                }
            }
        }
        tracing::debug!(steps = self.0.len(), "Replayed stroke script");
    }

    /// Replay onto a fresh surface and capture it.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::NoCapture`] if the surface cannot be encoded.
    pub fn render(&self, config: SurfaceConfig) -> Result<CapturedImage, ScriptError> {
        let mut surface = DrawingSurface::new(config);
        self.replay(&mut surface);
        surface.capture().ok_or(ScriptError::NoCapture)
    }
}

impl From<Vec<ScriptStep>> for StrokeScript {
    fn from(steps: Vec<ScriptStep>) -> Self {
        Self(steps)
    }
}
