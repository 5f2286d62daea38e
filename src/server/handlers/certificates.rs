//! Certificate fill, preview and export handlers.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::LaurelError,
    export::{self, ExportFormat, Exporter},
    fill::{self, FillValues},
    render::RenderTarget,
    template::Template,
};

use super::super::state::AppState;
use super::error_response;

/// Request body shared by the certificate endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRequest {
    pub template_id: String,
    #[serde(default)]
    pub input_values: FillValues,
    /// Export format (render only). Defaults to PDF.
    #[serde(default)]
    pub format: Option<ExportFormat>,
    /// Preview zoom (preview only). Defaults to the server setting.
    #[serde(default)]
    pub preview_scale: Option<f32>,
}

/// Response of the generate endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub template: Template,
    pub input_values: FillValues,
}

/// POST /api/certificates/generate - Echo the template with the values to fill.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CertificateRequest>,
) -> Result<Json<GenerateResponse>, (StatusCode, String)> {
    let template = state
        .store
        .get_template(&req.template_id)
        .await
        .map_err(error_response)?;
    Ok(Json(GenerateResponse {
        template,
        input_values: req.input_values,
    }))
}

/// POST /api/certificates/render - Export the filled certificate as a download.
pub async fn render(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CertificateRequest>,
) -> Result<Response, (StatusCode, String)> {
    let template = state
        .store
        .get_template(&req.template_id)
        .await
        .map_err(error_response)?;

    let format = req.format.unwrap_or_default();
    let settings = state.config.render.export_settings(format);
    let filled = fill::fill(&template, &req.input_values);
    let fonts = state.fonts.clone();

    // Rasterizing is CPU-bound, keep it off the async workers
    let doc = tokio::task::spawn_blocking(move || {
        let mut target = RenderTarget::new(fonts);
        target.mount(filled)?;
        Exporter::new(settings).export(&target)
    })
    .await
    .map_err(|e| error_response(LaurelError::Document(format!("Task error: {}", e))))?
    .map_err(error_response)?;

    Ok((
        [
            (header::CONTENT_TYPE, doc.format.mime_type().to_string()),
            (header::CONTENT_DISPOSITION, attachment(&doc.file_name)),
        ],
        doc.bytes,
    )
        .into_response())
}

/// POST /api/certificates/preview - PNG preview at the preview zoom.
pub async fn preview(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CertificateRequest>,
) -> Result<Response, (StatusCode, String)> {
    let template = state
        .store
        .get_template(&req.template_id)
        .await
        .map_err(error_response)?;

    let scale = req
        .preview_scale
        .unwrap_or(state.config.render.preview_scale);
    let filled = fill::fill(&template, &req.input_values);
    let fonts = state.fonts.clone();

    let png = tokio::task::spawn_blocking(move || {
        let mut target = RenderTarget::new(fonts);
        target.mount(filled)?;
        export::preview_png(&target, scale)
    })
    .await
    .map_err(|e| error_response(LaurelError::Image(format!("Task error: {}", e))))?
    .map_err(error_response)?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}

/// `Content-Disposition` value with a header-safe file name.
fn attachment(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}
