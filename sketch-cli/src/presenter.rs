//! Terminal output for analysis results.

use std::io::Write;

use sketch_core::{ResultCollection, ToolAttributes};
use sketch_session::{Notice, Presenter};

/// How results are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One `expr = result` line per record.
    #[default]
    Text,
    /// The collection as a JSON array.
    Json,
}

/// Writes results and notices to a stream, usually stdout.
pub struct TerminalPresenter<W> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> TerminalPresenter<W> {
    /// Create a presenter over a writer.
    #[must_use]
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    /// Consume the presenter and return the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::warn!(error = %e, "Failed to write output");
        }
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn show_results(&mut self, results: &ResultCollection) {
        let text = render_results(results, self.format);
        self.emit(&text);
    }

    fn show_notice(&mut self, notice: Notice) {
        match self.format {
            OutputFormat::Text => self.emit(notice.message()),
            OutputFormat::Json => {
                let doc = serde_json::json!({ "notice": notice.message() });
                self.emit(&doc.to_string());
            }
        }
    }

    fn attributes_changed(&mut self, attributes: &ToolAttributes) {
        tracing::debug!(
            color = %attributes.color,
            width = attributes.width,
            eraser = attributes.is_eraser(),
            "Tool attributes changed"
        );
    }

    fn set_busy(&mut self, busy: bool) {
        if busy {
            tracing::info!("Analyzing drawing");
        }
    }
}

/// Show a collection, or the nothing-detected notice when it is empty.
pub fn present<P: Presenter>(presenter: &mut P, results: &ResultCollection) {
    if results.is_empty() {
        presenter.show_notice(Notice::NothingDetected);
    } else {
        presenter.show_results(results);
    }
}

/// Format a collection for the terminal.
#[must_use]
pub fn render_results(results: &ResultCollection, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => results
            .iter()
            .map(|record| {
                let marker = if record.assign { "  (assigned)" } else { "" };
                format!("{} = {}{marker}", record.expr, record.result_text())
            })
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Json => serde_json::to_string_pretty(results)
            .unwrap_or_else(|_| String::from("[]")),
    }
}
