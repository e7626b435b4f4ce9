//! The model invocation boundary.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use sketch_renderer::CapturedImage;
use thiserror::Error;

/// User-assigned variables, supplied verbatim to the model.
pub type Variables = BTreeMap<String, serde_json::Value>;

/// Errors a model invoker can report.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The request could not be delivered or answered.
    #[error("model request failed: {0}")]
    Transport(String),
    /// The model service refused the request.
    #[error("model service returned {status}: {message}")]
    Rejected {
        /// HTTP-like status code.
        status: u16,
        /// Service-provided message.
        message: String,
    },
    /// The model answered without any text.
    #[error("model reply contained no text")]
    EmptyReply,
}

/// Sends a captured drawing to a vision-language model.
///
/// The returned text is untrusted and goes straight to the normalizer.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Ask the model to solve the drawing.
    ///
    /// # Errors
    ///
    /// Returns an [`InvokeError`] if the model could not be reached or
    /// produced no reply.
    async fn invoke(
        &self,
        image: &CapturedImage,
        variables: &Variables,
    ) -> Result<String, InvokeError>;
}

#[async_trait]
impl<T: ModelInvoker + ?Sized> ModelInvoker for Arc<T> {
    async fn invoke(
        &self,
        image: &CapturedImage,
        variables: &Variables,
    ) -> Result<String, InvokeError> {
        (**self).invoke(image, variables).await
    }
}

#[async_trait]
impl<T: ModelInvoker + ?Sized> ModelInvoker for Box<T> {
    async fn invoke(
        &self,
        image: &CapturedImage,
        variables: &Variables,
    ) -> Result<String, InvokeError> {
        (**self).invoke(image, variables).await
    }
}
