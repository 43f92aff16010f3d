//! HTTP API for mdr.
//!
//! Exposes the renderers over JSON `POST` endpoints:
//!
//! | Route | Output |
//! |---|---|
//! | `GET /health` | `{"status":"healthy","service":"mdr"}` |
//! | `POST /render/html` | `text/html` |
//! | `POST /render/pdf` | PDF attachment |
//! | `POST /render/docx` | Word attachment |
//! | `POST /render/xlsx` | Excel attachment |
//! | `POST /render` | any of the above, chosen by `format` |
//!
//! Input errors return `400` and render failures `500`, both with an
//! `{"error": "..."}` body.
//!
//! # Quick Start
//!
//! ```ignore
//! use mdr_export::Exporter;
//! use mdr_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_owned(),
//!         port: 5000,
//!         exporter: Exporter::default(),
//!     };
//!     run_server(config).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use mdr_export::Exporter;
use state::AppState;

/// Server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Renderer used by every request.
    pub exporter: Exporter,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 5000,
            exporter: Exporter::default(),
        }
    }
}

/// Build the router without binding a socket.
pub fn router(exporter: Exporter) -> Router {
    app::create_router(Arc::new(AppState { exporter }))
}

/// Run the server.
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(config.exporter);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from mdr config.
#[must_use]
pub fn server_config_from_config(config: &mdr_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        exporter: Exporter::from_config(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use mdr_diagrams::{DiagramResolver, DiagramToolRunner, ToolError};
    use mdr_export::{PdfEngine, PdfError};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    struct NoTool;

    impl DiagramToolRunner for NoTool {
        fn render_svg(&self, _source: &str) -> Result<String, ToolError> {
            Err(ToolError::MissingOutput)
        }
    }

    struct FakePdf;

    impl PdfEngine for FakePdf {
        fn convert(&self, _html: &str, _stylesheet: &str) -> Result<Vec<u8>, PdfError> {
            Ok(b"%PDF-fake".to_vec())
        }
    }

    struct BrokenPdf;

    impl PdfEngine for BrokenPdf {
        fn convert(&self, _html: &str, _stylesheet: &str) -> Result<Vec<u8>, PdfError> {
            Err(PdfError::MissingOutput)
        }
    }

    fn test_router(pdf: Arc<dyn PdfEngine>) -> Router {
        router(Exporter::new(
            DiagramResolver::new(Arc::new(NoTool), "http://plantuml.test"),
            pdf,
        ))
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();
        (status, headers, body)
    }

    fn error_message(body: &[u8]) -> String {
        let value: Value = serde_json::from_slice(body).unwrap();
        value["error"].as_str().unwrap().to_owned()
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, headers, body) = send(test_router(Arc::new(FakePdf)), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["x-content-type-options"], "nosniff");
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({"status": "healthy", "service": "mdr"}));
    }

    #[tokio::test]
    async fn test_render_html() {
        let request = post_json(
            "/render/html",
            &json!({"markdown": "# Hello", "title": "Greeting", "include_toc": true}),
        );
        let (status, headers, body) = send(test_router(Arc::new(FakePdf)), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "text/html; charset=utf-8");
        assert!(headers.get(header::CONTENT_DISPOSITION).is_none());
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("<title>Greeting</title>"));
        assert!(html.contains("Table of Contents"));
    }

    #[tokio::test]
    async fn test_render_html_fragment() {
        let request = post_json(
            "/render/html",
            &json!({"markdown": "**bold**", "fragment": true}),
        );
        let (status, _, body) = send(test_router(Arc::new(FakePdf)), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(String::from_utf8(body).unwrap(), "<p><strong>bold</strong></p>");
    }

    #[tokio::test]
    async fn test_missing_markdown() {
        for uri in ["/render/html", "/render/pdf", "/render/docx", "/render/xlsx", "/render"] {
            let request = post_json(uri, &json!({"title": "x"}));
            let (status, _, body) = send(test_router(Arc::new(FakePdf)), request).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(
                error_message(&body),
                "Missing 'markdown' field in request body"
            );
        }
    }

    #[tokio::test]
    async fn test_body_not_json() {
        let request = Request::post("/render/html")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("not json"))
            .unwrap();
        let (status, _, body) = send(test_router(Arc::new(FakePdf)), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!error_message(&body).is_empty());
    }

    #[tokio::test]
    async fn test_render_pdf_attachment() {
        let request = post_json("/render/pdf", &json!({"markdown": "# Hi", "title": "Report"}));
        let (status, headers, body) = send(test_router(Arc::new(FakePdf)), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Report.pdf\""
        );
        assert_eq!(body, b"%PDF-fake");
    }

    #[tokio::test]
    async fn test_render_docx_default_title() {
        let request = post_json("/render/docx", &json!({"markdown": "# Hi"}));
        let (status, headers, body) = send(test_router(Arc::new(FakePdf)), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Document.docx\""
        );
        assert!(body.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_render_xlsx() {
        let request = post_json(
            "/render/xlsx",
            &json!({"markdown": "| A | B |\n|---|---|\n| 1 | 2 |", "title": "Data"}),
        );
        let (status, headers, body) = send(test_router(Arc::new(FakePdf)), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[header::CONTENT_TYPE],
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert!(body.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_unified_render() {
        let request = post_json(
            "/render",
            &json!({"markdown": "# Hi", "format": "DOCX", "title": "Notes"}),
        );
        let (status, headers, _) = send(test_router(Arc::new(FakePdf)), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Notes.docx\""
        );
    }

    #[tokio::test]
    async fn test_unified_render_html_options() {
        let request = post_json(
            "/render",
            &json!({
                "markdown": "# Hi",
                "format": "html",
                "options": {"include_css": false, "table_style": "td { color: red; }"}
            }),
        );
        let (status, _, body) = send(test_router(Arc::new(FakePdf)), request).await;

        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("td { color: red; }"));
        assert!(!html.contains("font-family"));
    }

    #[tokio::test]
    async fn test_unified_unsupported_format() {
        let request = post_json("/render", &json!({"markdown": "x", "format": "invalid"}));
        let (status, _, body) = send(test_router(Arc::new(FakePdf)), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            error_message(&body),
            "Unsupported format: invalid. Supported formats: html, pdf, docx, xlsx"
        );
    }

    #[tokio::test]
    async fn test_unified_missing_format() {
        let request = post_json("/render", &json!({"markdown": "x"}));
        let (status, _, body) = send(test_router(Arc::new(FakePdf)), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_message(&body), "Missing 'format' field in request body");
    }

    #[tokio::test]
    async fn test_render_failure_is_500() {
        let request = post_json("/render/pdf", &json!({"markdown": "x"}));
        let (status, _, body) = send(test_router(Arc::new(BrokenPdf)), request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error_message(&body), "PDF engine produced no output");
    }

    #[test]
    fn test_server_config_from_config() {
        let config = mdr_config::Config::default();
        let server = server_config_from_config(&config);
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 5000);
    }
}
