//! Gemini `generateContent` client.
//!
//! Sends the captured drawing as inline PNG data alongside the solving
//! prompt and returns the model's text parts joined together. The reply is
//! not parsed here; the session normalizes it.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sketch_renderer::CapturedImage;
use sketch_session::{InvokeError, ModelInvoker, Variables};
use thiserror::Error;
use url::Url;

use crate::GeminiConfig;

/// Errors that can occur when talking to the Gemini API.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// No API key was configured.
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,
    /// The base URL provided is invalid.
    #[error("invalid Gemini base URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed (connection, timeout, etc.).
    #[error("Gemini HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// JSON encoding or decoding failed.
    #[error("failed to handle Gemini payload: {0}")]
    Json(#[from] serde_json::Error),
    /// The API answered with an error document.
    #[error("Gemini API error {code}: {message}")]
    Api {
        /// HTTP status code.
        code: u16,
        /// Human readable error message.
        message: String,
    },
    /// The reply had no candidate text.
    #[error("Gemini reply contained no text")]
    EmptyReply,
}

impl From<GeminiError> for InvokeError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::Api { code, message } => Self::Rejected {
                status: code,
                message,
            },
            GeminiError::EmptyReply => Self::EmptyReply,
            other => Self::Transport(other.to_string()),
        }
    }
}

/// Gemini vision client.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<InnerClient>,
}

struct InnerClient {
    http: Client,
    endpoint: Url,
    model: String,
}

impl GeminiClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::MissingApiKey`] without a key,
    /// [`GeminiError::InvalidUrl`] if the base URL is malformed, and
    /// [`GeminiError::Http`] if the HTTP client fails to build.
    pub fn new(config: &GeminiConfig) -> Result<Self, GeminiError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(GeminiError::MissingApiKey)?;
        let endpoint = endpoint(&config.base_url, &config.model, api_key)?;

        let http = Client::builder()
            .user_agent(concat!("sketch-solver/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .no_proxy()
            .build()?;

        Ok(Self {
            inner: Arc::new(InnerClient {
                http,
                endpoint,
                model: config.model.clone(),
            }),
        })
    }

    /// The model this client targets.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Ask Gemini to solve a drawing and return its raw text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API reports an error, or
    /// the reply holds no text.
    pub async fn solve(
        &self,
        image: &CapturedImage,
        variables: &Variables,
    ) -> Result<String, GeminiError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: solving_prompt(variables)?,
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type().to_string(),
                            data: image.to_base64(),
                        },
                    },
                ],
            }],
        };

        tracing::debug!(model = %self.inner.model, "Sending generateContent request");
        let response = self
            .inner
            .http
            .post(self.inner.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorEnvelope>().await {
                Ok(envelope) => envelope.error.message,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string(),
            };
            return Err(GeminiError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let reply: GenerateResponse = response.json().await?;
        let text = reply.text().ok_or(GeminiError::EmptyReply)?;
        tracing::debug!(chars = text.len(), "Gemini replied");
        Ok(text)
    }
}

#[async_trait]
impl ModelInvoker for GeminiClient {
    async fn invoke(
        &self,
        image: &CapturedImage,
        variables: &Variables,
    ) -> Result<String, InvokeError> {
        Ok(self.solve(image, variables).await?)
    }
}

fn endpoint(base_url: &str, model: &str, api_key: &str) -> Result<Url, GeminiError> {
    let mut url = Url::parse(base_url).map_err(|e| GeminiError::InvalidUrl(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| GeminiError::InvalidUrl(base_url.to_string()))?
        .pop_if_empty()
        .extend(["v1beta", "models", &format!("{model}:generateContent")]);
    url.query_pairs_mut().append_pair("key", api_key);
    Ok(url)
}

/// Build the solving prompt with the user's variables embedded as JSON.
///
/// # Errors
///
/// Returns [`GeminiError::Json`] if the variables cannot be serialized.
pub fn solving_prompt(variables: &Variables) -> Result<String, GeminiError> {
    let variables = serde_json::to_string(variables)?;
    Ok(format!(
        "{PROMPT_HEAD}\nUser-assigned variables (substitute their values wherever they \
         appear in the drawing): {variables}\n{PROMPT_TAIL}"
    ))
}

const PROMPT_HEAD: &str = r#"The image contains handwritten mathematical expressions, equations, or graphical problems. Solve them.
Evaluate expressions with PEMDAS precedence: Parentheses, then Exponents, then Multiplication and Division left to right, then Addition and Subtraction left to right.
Example: 2 + 3 * 4 -> 3 * 4 = 12, 2 + 12 = 14.
Example: 2 + 3 + 5 * 4 - 8 / 2 -> 5 * 4 = 20, 8 / 2 = 4, 2 + 3 = 5, 5 + 20 = 25, 25 - 4 = 21.
Exactly one of the following five cases applies:
1. A simple expression such as 2 + 2 or 5 / 6. Answer with a list of one object: [{"expr": the expression, "result": the answer}].
2. A system of equations such as 3y + 4x = 0 and x^2 + 2x + 1 = 0. Solve for every variable and answer with one object per variable, for example [{"expr": "x", "result": 2, "assign": true}, {"expr": "y", "result": 5, "assign": true}].
3. Variable assignments such as x = 4. Answer with one object per variable, the variable as "expr", the value as "result", and "assign": true.
4. A graphical word problem (collisions, trigonometry, Pythagoras, a cricket wagon wheel, and so on). Colors in the drawing carry meaning. Answer with a list of one object: [{"expr": the problem, "result": the answer}].
5. An abstract concept (love, jealousy, patriotism, a historic event, an invention, a quote). Answer in the same format, with "expr" explaining the drawing and "result" naming the concept.
Escape backslashes in strings, e.g. \f becomes \\f and \n becomes \\n."#;

const PROMPT_TAIL: &str = "Use double quotes for every JSON key and string value, never single quotes.
Reply with the JSON array only. No backticks, no Markdown.";

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize, Deserialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

impl GenerateResponse {
    /// Text parts of the first candidate, joined.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| match part {
                Part::Text { text } => Some(text.as_str()),
                Part::InlineData { .. } => None,
            })
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}
