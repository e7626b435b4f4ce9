//! # Sketch Solver CLI
//!
//! Command-line host for the sketch solver. Stroke scripts stand in for a
//! pointer device; the drawing is rasterized, captured as PNG and, for
//! `analyze`, sent to Gemini.
//!
//! ## Usage
//!
//! ```bash
//! sketch-solver render --script strokes.json --output drawing.png
//! sketch-solver normalize --input reply.txt
//! GEMINI_API_KEY=... sketch-solver analyze --script strokes.json --variables '{"x": 4}'
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `CliConfig` / `GeminiConfig` - Resolved configuration
//! - `StrokeScript` - Recorded pointer input replayed onto a surface
//! - `GeminiClient` - `ModelInvoker` backed by the Gemini REST API
//! - `TerminalPresenter` - Prints results and notices

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod gemini;
mod presenter;
mod script;

pub use gemini::{solving_prompt, GeminiClient, GeminiError};
pub use presenter::{present, render_results, OutputFormat, TerminalPresenter};
pub use script::{InputKind, ScriptError, ScriptStep, StrokeScript};

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use sketch_renderer::SurfaceConfig;
use sketch_session::Variables;

/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default Gemini API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Command-line arguments for sketch-solver.
#[derive(Debug, Clone, Parser)]
#[command(name = "sketch-solver")]
#[command(about = "Draw a math problem, let a vision model solve it")]
#[command(version)]
pub struct CliArgs {
    /// What to do
    #[command(subcommand)]
    pub command: Command,

    /// Surface width in pixels
    #[arg(long, global = true, default_value = "800")]
    pub width: u32,

    /// Surface height in pixels
    #[arg(long, global = true, default_value = "400")]
    pub height: u32,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Replay a stroke script and write the PNG capture
    Render {
        /// Stroke script (JSON array of steps)
        #[arg(long)]
        script: PathBuf,
        /// Where to write the PNG
        #[arg(long)]
        output: PathBuf,
    },
    /// Normalize a raw model reply into result records
    Normalize {
        /// Reply file; stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Replay a stroke script and solve it with Gemini
    Analyze {
        /// Stroke script (JSON array of steps)
        #[arg(long)]
        script: PathBuf,
        /// User-assigned variables as a JSON object
        #[arg(long)]
        variables: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Gemini connection
        #[command(flatten)]
        gemini: GeminiArgs,
    },
}

/// Gemini connection arguments.
#[derive(Debug, Clone, Args)]
pub struct GeminiArgs {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gemini model name
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Gemini API root URL
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "GEMINI_TIMEOUT_SECS", default_value = "60")]
    pub timeout_secs: u64,
}

/// Gemini client configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key.
    pub api_key: Option<String>,
    /// Model name.
    pub model: String,
    /// API root URL.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl From<GeminiArgs> for GeminiConfig {
    fn from(args: GeminiArgs) -> Self {
        Self {
            api_key: args.api_key,
            model: args.model,
            base_url: args.base_url,
            timeout: Duration::from_secs(args.timeout_secs),
        }
    }
}

/// Resolved CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Surface the scripts are replayed onto.
    pub surface: SurfaceConfig,
    /// Subcommand to run.
    pub command: Command,
}

impl From<CliArgs> for CliConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            surface: SurfaceConfig::with_size(args.width, args.height),
            command: args.command,
        }
    }
}

/// Parse `--variables` JSON into a variable map.
///
/// # Errors
///
/// Returns an error unless the text is a JSON object.
pub fn parse_variables(json: &str) -> Result<Variables, serde_json::Error> {
    serde_json::from_str(json)
}
