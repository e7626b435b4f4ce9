//! # Sketch Solver
//!
//! Command-line entry point.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use sketch_cli::{
    parse_variables, present, CliArgs, CliConfig, Command, GeminiClient, GeminiConfig,
    OutputFormat, StrokeScript, TerminalPresenter,
};
use sketch_renderer::{DrawingSurface, SurfaceConfig};
use sketch_session::{Session, Variables};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured tracing with optional JSON format.
///
/// Set `RUST_LOG` to control log levels (default: info,sketch_cli=debug,sketch_session=debug).
/// Set `RUST_LOG_FORMAT=json` for JSON output. Logs go to stderr so stdout
/// carries only results.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sketch_cli=debug,sketch_session=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = CliConfig::from(CliArgs::parse());
    tracing::debug!(
        "Surface config: {}x{}",
        config.surface.width,
        config.surface.height
    );

    match config.command {
        Command::Render { script, output } => render(&config.surface, &script, &output),
        Command::Normalize { input, format } => normalize(input.as_deref(), format),
        Command::Analyze {
            script,
            variables,
            format,
            gemini,
        } => {
            let variables = match variables {
                Some(json) => parse_variables(&json).context("--variables must be a JSON object")?,
                None => Variables::new(),
            };
            analyze(
                config.surface,
                &script,
                variables,
                format,
                &GeminiConfig::from(gemini),
            )
            .await
        }
    }
}

fn render(surface: &SurfaceConfig, script: &Path, output: &Path) -> anyhow::Result<()> {
    let image = StrokeScript::load(script)?.render(surface.clone())?;
    std::fs::write(output, image.png_bytes())
        .with_context(|| format!("failed to write {}", output.display()))?;
    tracing::info!(
        "Wrote {}x{} PNG to {}",
        image.width(),
        image.height(),
        output.display()
    );
    Ok(())
}

fn normalize(input: Option<&Path>, format: OutputFormat) -> anyhow::Result<()> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read stdin")?;
            raw
        }
    };

    let normalized = sketch_core::normalize_with_tier(&raw);
    tracing::info!(
        records = normalized.records.len(),
        tier = ?normalized.tier,
        "Normalized reply"
    );
    let mut presenter = TerminalPresenter::new(std::io::stdout(), format);
    present(&mut presenter, &normalized.records);
    Ok(())
}

async fn analyze(
    surface: SurfaceConfig,
    script: &Path,
    variables: Variables,
    format: OutputFormat,
    gemini: &GeminiConfig,
) -> anyhow::Result<()> {
    let script = StrokeScript::load(script)?;
    let client = GeminiClient::new(gemini)?;
    tracing::info!("Using Gemini model {}", client.model());

    let presenter = TerminalPresenter::new(std::io::stdout(), format);
    let mut session = Session::with_surface(DrawingSurface::new(surface), client, presenter)
        .with_variables(variables);
    script.replay(session.surface_mut());

    let results = session.analyze().await;
    if results.assignments().next().is_some() {
        tracing::info!(variables = ?session.variables(), "Bound variables");
    }
    Ok(())
}
