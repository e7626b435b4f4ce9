//! The presentation boundary.

use std::fmt;

use sketch_core::{ResultCollection, ToolAttributes};

/// A user-facing notice shown instead of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The surface had no raster to capture.
    NothingToCapture,
    /// The model reply held no usable records.
    NothingDetected,
    /// The model could not be invoked.
    AnalysisFailed,
}

impl Notice {
    /// Text shown to the user.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::NothingToCapture => "The canvas is not ready yet. Please try again.",
            Self::NothingDetected => {
                "No mathematical expressions detected. Try drawing more clearly."
            }
            Self::AnalysisFailed => "Failed to analyze the image. Please try again.",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Displays session output.
pub trait Presenter {
    /// Show a non-empty result collection.
    fn show_results(&mut self, results: &ResultCollection);

    /// Show a notice in place of results.
    fn show_notice(&mut self, notice: Notice);

    /// Toolbar selection changed.
    fn attributes_changed(&mut self, _attributes: &ToolAttributes) {}

    /// An analysis started or finished.
    fn set_busy(&mut self, _busy: bool) {}
}
