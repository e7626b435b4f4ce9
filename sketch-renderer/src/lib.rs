//! # Sketch Solver Renderer
//!
//! Raster drawing surface built on tiny-skia.
//!
//! ```text
//! pointer/touch ──► SurfaceState ──► Segment ──► tiny-skia Pixmap
//!                                                     │
//!                                        capture() ───┴──► PNG / data URL
//! ```
//!
//! Build the browser bindings with:
//!
//! ```bash
//! wasm-pack build --target web sketch-renderer -- --features wasm
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod capture;
pub mod error;
pub mod surface;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use capture::{CapturedImage, PNG_MIME};
pub use error::{RenderError, RenderResult};
pub use surface::{DrawingSurface, SurfaceConfig};
