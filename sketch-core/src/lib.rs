//! # Sketch Solver Core
//!
//! Core logic for turning a hand-drawn expression into solved results.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 sketch-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Input           │  Reply Normalizer        │
//! │  - Mouse/touch   │  - Fence stripping       │
//! │  - Canvas origin │  - Quote/key repair      │
//! │                  │  - Schema validation     │
//! ├─────────────────────────────────────────────┤
//! │  Surface State   │  Results                 │
//! │  - Idle/Tracing  │  - Result records        │
//! │  - Tool attrs    │  - Display coercion      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Rasterization lives in `sketch-renderer`; this crate only decides which
//! segment to paint and with what.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod event;
pub mod normalize;
pub mod result;
pub mod state;
pub mod stroke;

pub use error::{CoreError, CoreResult};
pub use event::{CanvasBounds, PointerEvent, Propagation, TouchEvent, TouchPhase, TouchPoint};
pub use normalize::{normalize, normalize_with_tier, Normalized, RecoveryTier};
pub use result::{ResultCollection, ResultRecord};
pub use state::{Extension, Gesture, SurfaceState};
pub use stroke::{
    AttributeChange, Point, Rgb, Segment, Stroke, StrokeStyle, Swatch, ToolAttributes, ToolMode,
    DEFAULT_WIDTH, ERASER_WIDTH, MIN_WIDTH, PALETTE,
};
