//! The analysis session.
//!
//! A [`Session`] wires one drawing surface to a model and a presenter.
//! Surface operations are synchronous; only [`Session::analyze`] suspends,
//! and dropping its future is the only way to cancel it.

use sketch_core::{normalize, AttributeChange, PointerEvent, ResultCollection, ToolAttributes};
use sketch_renderer::{DrawingSurface, SurfaceConfig};

use crate::invoker::{ModelInvoker, Variables};
use crate::presenter::{Notice, Presenter};

/// Drawing surface, model capability and presenter for one user.
pub struct Session<I, P> {
    surface: DrawingSurface,
    invoker: I,
    presenter: P,
    variables: Variables,
}

impl<I, P> Session<I, P>
where
    I: ModelInvoker,
    P: Presenter,
{
    /// Create a session with an attached surface.
    #[must_use]
    pub fn new(config: SurfaceConfig, invoker: I, presenter: P) -> Self {
        Self::with_surface(DrawingSurface::new(config), invoker, presenter)
    }

    /// Create a session around an existing surface.
    #[must_use]
    pub fn with_surface(surface: DrawingSurface, invoker: I, presenter: P) -> Self {
        Self {
            surface,
            invoker,
            presenter,
            variables: Variables::new(),
        }
    }

    /// Seed the variables handed to the model.
    #[must_use]
    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    /// The drawing surface.
    #[must_use]
    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    /// Mutable access to the drawing surface.
    pub fn surface_mut(&mut self) -> &mut DrawingSurface {
        &mut self.surface
    }

    /// The presenter.
    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Consume the session and return the presenter.
    #[must_use]
    pub fn into_presenter(self) -> P {
        self.presenter
    }

    /// Variables bound so far.
    #[must_use]
    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    /// Forget every bound variable.
    pub fn clear_variables(&mut self) {
        self.variables.clear();
    }

    /// Pointer pressed.
    pub fn pointer_down(&mut self, event: &PointerEvent) {
        self.surface.begin(event);
    }

    /// Pointer moved. Returns whether the platform default must be suppressed.
    pub fn pointer_move(&mut self, event: &PointerEvent) -> bool {
        self.surface.extend(event).prevents_default()
    }

    /// Pointer released.
    pub fn pointer_up(&mut self) {
        self.surface.end();
    }

    /// Clear the drawing.
    pub fn reset(&mut self) {
        self.surface.reset();
    }

    /// Change toolbar attributes and tell the presenter.
    pub fn set_attributes(&mut self, change: &AttributeChange) -> ToolAttributes {
        let attributes = self.surface.set_attributes(change);
        self.presenter.attributes_changed(&attributes);
        attributes
    }

    /// Capture the drawing, ask the model, and present what comes back.
    ///
    /// Never fails: invocation errors and unusable replies end as a
    /// [`Notice`] and an empty collection. Records marked `assign` are bound
    /// into [`Session::variables`] in reply order.
    pub async fn analyze(&mut self) -> ResultCollection {
        self.presenter.set_busy(true);
        let results = self.run_analysis().await;
        self.presenter.set_busy(false);
        results
    }

    async fn run_analysis(&mut self) -> ResultCollection {
        let Some(image) = self.surface.capture() else {
            tracing::warn!("Analysis requested with no surface to capture");
            self.presenter.show_notice(Notice::NothingToCapture);
            return ResultCollection::empty();
        };
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            bytes = image.png_bytes().len(),
            variables = self.variables.len(),
            "Invoking model"
        );

        let raw = match self.invoker.invoke(&image, &self.variables).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "Model invocation failed");
                self.presenter.show_notice(Notice::AnalysisFailed);
                return ResultCollection::empty();
            }
        };

        let results = normalize(&raw);
        if results.is_empty() {
            tracing::info!("Model reply held no records");
            self.presenter.show_notice(Notice::NothingDetected);
            return results;
        }

        tracing::info!(records = results.len(), "Analysis complete");
        self.presenter.show_results(&results);
        for record in results.assignments() {
            tracing::debug!(name = %record.expr, "Binding variable");
            self.variables
                .insert(record.expr.clone(), record.result.clone());
        }
        results
    }
}
