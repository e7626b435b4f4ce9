//! Integration tests for the command-line host.
//!
//! Script files on disk, PNG output, and the full analyze flow against a
//! mocked Gemini endpoint.

use std::time::Duration;

use serde_json::json;
use sketch_cli::{
    GeminiClient, GeminiConfig, OutputFormat, ScriptError, StrokeScript, TerminalPresenter,
};
use sketch_renderer::{CapturedImage, DrawingSurface, SurfaceConfig};
use sketch_session::{Session, Variables};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SCRIPT: &str = r##"[
    {"op": "set_attributes", "color": "#047857"},
    {"op": "begin", "x": 10, "y": 20},
    {"op": "extend", "x": 90, "y": 20},
    {"op": "end"}
]"##;

fn write_script(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("strokes.json");
    std::fs::write(&path, body).expect("write script");
    path
}

// ============================================================================
// Scripts
// ============================================================================

#[test]
fn test_script_file_renders_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = StrokeScript::load(&write_script(&dir, SCRIPT)).expect("load");

    let image = script
        .render(SurfaceConfig::with_size(100, 40))
        .expect("render");
    let out = dir.path().join("drawing.png");
    std::fs::write(&out, image.png_bytes()).expect("write png");

    let reread = CapturedImage::from_png(std::fs::read(&out).expect("read png")).expect("png");
    assert_eq!((reread.width(), reread.height()), (100, 40));
    let pixel = reread.decode().expect("decode").get_pixel(50, 20).0;
    assert_eq!(&pixel[..3], &[0x04, 0x78, 0x57]);
}

#[test]
fn test_script_reset_step_clears_drawing() {
    let script = StrokeScript::parse(
        r#"[
            {"op": "begin", "x": 5, "y": 5},
            {"op": "extend", "x": 30, "y": 15},
            {"op": "reset"}
        ]"#,
    )
    .expect("script");
    let image = script
        .render(SurfaceConfig::with_size(40, 20))
        .expect("render");
    assert!(image
        .decode()
        .expect("decode")
        .pixels()
        .all(|p| p.0 == [255, 255, 255, 255]));
}

#[test]
fn test_missing_script_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = StrokeScript::load(&dir.path().join("absent.json")).expect_err("missing");
    assert!(matches!(err, ScriptError::Io { .. }));
}

// ============================================================================
// Analyze against a mocked Gemini
// ============================================================================

async fn analyze_with_reply(reply: serde_json::Value, status: u16) -> (String, Variables) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(status).set_body_json(reply))
        .mount(&server)
        .await;

    let client = GeminiClient::new(&GeminiConfig {
        api_key: Some("test-key".into()),
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
        ..GeminiConfig::default()
    })
    .expect("client");

    let mut session = Session::with_surface(
        DrawingSurface::new(SurfaceConfig::with_size(100, 40)),
        client,
        TerminalPresenter::new(Vec::new(), OutputFormat::Text),
    );
    StrokeScript::parse(SCRIPT)
        .expect("script")
        .replay(session.surface_mut());

    session.analyze().await;
    let variables = session.variables().clone();
    let out = String::from_utf8(session.into_presenter().into_inner()).expect("utf8");
    (out, variables)
}

fn candidate(text: &str) -> serde_json::Value {
    json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn analyze_prints_solved_records() {
    let (out, variables) = analyze_with_reply(
        candidate("```json\n[{'expr': 'x', 'result': '4', 'assign': true}]\n```"),
        200,
    )
    .await;
    assert_eq!(out, "x = 4  (assigned)\n");
    assert_eq!(variables.get("x"), Some(&json!(4)));
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn analyze_prints_failure_notice_on_api_error() {
    let (out, variables) = analyze_with_reply(
        json!({ "error": { "code": 500, "message": "backend unavailable" } }),
        500,
    )
    .await;
    assert_eq!(out, "Failed to analyze the image. Please try again.\n");
    assert!(variables.is_empty());
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn analyze_prints_nothing_detected_for_prose() {
    let (out, _) = analyze_with_reply(candidate("I only see a green line."), 200).await;
    assert_eq!(
        out,
        "No mathematical expressions detected. Try drawing more clearly.\n"
    );
}
