//! # Sketch Session
//!
//! Orchestrates one drawing session: pointer input goes to the drawing
//! surface, `analyze` captures the raster, hands it to a [`ModelInvoker`],
//! normalizes the reply and shows the outcome through a [`Presenter`].
//!
//! ```text
//! pointer ──► DrawingSurface ──capture──► ModelInvoker ──raw text──►
//!     normalize ──► ResultCollection ──► Presenter
//!                          │
//!                          └─ assign records ──► Variables
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod invoker;
pub mod presenter;
pub mod session;

pub use invoker::{InvokeError, ModelInvoker, Variables};
pub use presenter::{Notice, Presenter};
pub use session::Session;
