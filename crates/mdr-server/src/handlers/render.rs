//! Render endpoints.
//!
//! Each request runs the synchronous render pipeline on the blocking pool
//! with a fresh engine.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use mdr_export::{DEFAULT_TITLE, OutputFormat, RenderOptions, Rendered};
use serde::Deserialize;

use crate::error::ServerError;
use crate::state::AppState;

fn default_true() -> bool {
    true
}

/// Body of the per-format endpoints.
///
/// Fields that do not apply to a format are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct RenderRequest {
    markdown: Option<String>,
    title: Option<String>,
    #[serde(default)]
    include_toc: bool,
    #[serde(default = "default_true")]
    include_css: bool,
    #[serde(default)]
    fragment: bool,
    table_style: Option<String>,
}

impl RenderRequest {
    fn into_parts(self) -> Result<(String, RenderOptions), ServerError> {
        let markdown = self
            .markdown
            .ok_or_else(|| ServerError::missing_field("markdown"))?;
        let options = RenderOptions {
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
            include_toc: self.include_toc,
            include_css: self.include_css,
            fragment: self.fragment,
            table_style: self.table_style,
            ..RenderOptions::default()
        };
        Ok((markdown, options))
    }
}

/// Body of `POST /render`.
#[derive(Debug, Deserialize)]
pub(crate) struct UnifiedRequest {
    markdown: Option<String>,
    format: Option<String>,
    title: Option<String>,
    #[serde(default)]
    options: UnifiedOptions,
}

#[derive(Debug, Deserialize)]
struct UnifiedOptions {
    #[serde(default)]
    include_toc: bool,
    #[serde(default = "default_true")]
    include_css: bool,
    table_style: Option<String>,
}

impl Default for UnifiedOptions {
    fn default() -> Self {
        Self {
            include_toc: false,
            include_css: true,
            table_style: None,
        }
    }
}

type Payload<T> = Result<Json<T>, JsonRejection>;

fn parse_body<T>(payload: Payload<T>) -> Result<T, ServerError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ServerError::BadRequest(rejection.body_text()))
}

/// Handle POST /render/html.
pub(crate) async fn render_html(
    State(state): State<Arc<AppState>>,
    payload: Payload<RenderRequest>,
) -> Result<Response, ServerError> {
    let (markdown, options) = parse_body(payload)?.into_parts()?;
    render(&state, markdown, OutputFormat::Html, options).await
}

/// Handle POST /render/pdf.
pub(crate) async fn render_pdf(
    State(state): State<Arc<AppState>>,
    payload: Payload<RenderRequest>,
) -> Result<Response, ServerError> {
    let (markdown, options) = parse_body(payload)?.into_parts()?;
    render(&state, markdown, OutputFormat::Pdf, options).await
}

/// Handle POST /render/docx.
pub(crate) async fn render_docx(
    State(state): State<Arc<AppState>>,
    payload: Payload<RenderRequest>,
) -> Result<Response, ServerError> {
    let (markdown, options) = parse_body(payload)?.into_parts()?;
    render(&state, markdown, OutputFormat::Docx, options).await
}

/// Handle POST /render/xlsx.
pub(crate) async fn render_xlsx(
    State(state): State<Arc<AppState>>,
    payload: Payload<RenderRequest>,
) -> Result<Response, ServerError> {
    let (markdown, options) = parse_body(payload)?.into_parts()?;
    render(&state, markdown, OutputFormat::Xlsx, options).await
}

/// Handle POST /render.
pub(crate) async fn render_unified(
    State(state): State<Arc<AppState>>,
    payload: Payload<UnifiedRequest>,
) -> Result<Response, ServerError> {
    let request = parse_body(payload)?;
    let markdown = request
        .markdown
        .ok_or_else(|| ServerError::missing_field("markdown"))?;
    let format: OutputFormat = request
        .format
        .ok_or_else(|| ServerError::missing_field("format"))?
        .to_lowercase()
        .parse()?;

    let options = RenderOptions {
        title: request.title.unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
        include_toc: request.options.include_toc,
        include_css: request.options.include_css,
        table_style: request.options.table_style,
        ..RenderOptions::default()
    };
    render(&state, markdown, format, options).await
}

async fn render(
    state: &AppState,
    markdown: String,
    format: OutputFormat,
    options: RenderOptions,
) -> Result<Response, ServerError> {
    let exporter = state.exporter.clone();
    let rendered =
        tokio::task::spawn_blocking(move || exporter.render(&markdown, format, &options))
            .await??;
    Ok(document_response(rendered))
}

fn document_response(rendered: Rendered) -> Response {
    let content_type = HeaderValue::from_static(rendered.mime_type());
    if !rendered.format.is_attachment() {
        return ([(header::CONTENT_TYPE, content_type)], rendered.bytes).into_response();
    }

    let disposition = HeaderValue::from_bytes(
        format!("attachment; filename=\"{}\"", rendered.filename).as_bytes(),
    )
    .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        rendered.bytes,
    )
        .into_response()
}
