//! Axum route handlers for the workflow API.
//!
//! Long runs (generation, bulk export) are reserved synchronously so a busy
//! workflow answers 409 right away, then continue on a background task. Clients
//! follow progress through `GET /api/v1/workflow` and the notifications feed.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::export::{export_filename, render_pdf, ExportedFile};
use crate::layout::{compose_resume, RenderedResume};
use crate::models::resume::ResumeRecord;
use crate::state::AppState;
use crate::workflow::{Direction, Notification, WorkflowSnapshot};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SetCountRequest {
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct SetCountResponse {
    pub requested_count: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    /// Falls back to the stored requested count when absent.
    #[serde(default)]
    pub count: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct GenerateAccepted {
    pub count: u32,
    pub status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub direction: Direction,
}

#[derive(Debug, Serialize)]
pub struct NavigateResponse {
    pub current_index: usize,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct CurrentResumeResponse {
    pub index: usize,
    pub total: usize,
    pub record: ResumeRecord,
    pub layout: RenderedResume,
}

#[derive(Debug, Serialize)]
pub struct BulkExportAccepted {
    pub total: usize,
    pub status: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/workflow
pub async fn handle_get_workflow(State(state): State<AppState>) -> Json<WorkflowSnapshot> {
    Json(state.controller.snapshot())
}

/// PUT /api/v1/workflow/count
///
/// Stores the count later generation runs use. Out-of-range values are clamped.
pub async fn handle_set_count(
    State(state): State<AppState>,
    Json(request): Json<SetCountRequest>,
) -> Json<SetCountResponse> {
    let requested_count = state.controller.set_requested_count(request.count);
    Json(SetCountResponse { requested_count })
}

/// POST /api/v1/workflow/generate
///
/// Starts a generation run and returns 202. The record list is cleared now and
/// fills in as each resume arrives. An empty body uses the stored count; a body
/// that does not parse is rejected with 400.
pub async fn handle_generate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<GenerateAccepted>), AppError> {
    let request = parse_generate_request(&body)?;
    let count = request
        .count
        .unwrap_or_else(|| state.controller.requested_count() as i64);

    // The run logs and notifies its own outcome; the task handle is detached.
    let (count, _handle) = state.controller.spawn_generate(count)?;
    info!("Accepted generation of {count} resume(s)");

    Ok((
        StatusCode::ACCEPTED,
        Json(GenerateAccepted {
            count,
            status: "generating",
        }),
    ))
}

fn parse_generate_request(body: &[u8]) -> Result<GenerateRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(GenerateRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid generate request: {e}")))
}

/// POST /api/v1/workflow/navigate
pub async fn handle_navigate(
    State(state): State<AppState>,
    Json(request): Json<NavigateRequest>,
) -> Result<Json<NavigateResponse>, AppError> {
    let current_index = state.controller.navigate(request.direction)?;
    Ok(Json(NavigateResponse {
        current_index,
        total: state.controller.snapshot().total,
    }))
}

/// GET /api/v1/resumes/current
///
/// The selected record together with its composed page layout.
pub async fn handle_get_current(
    State(state): State<AppState>,
) -> Result<Json<CurrentResumeResponse>, AppError> {
    let (index, record) = state
        .controller
        .current_record()
        .ok_or_else(|| AppError::NotFound("No resumes generated yet".to_string()))?;
    let total = state.controller.snapshot().total;

    let config = state.page_config.clone();
    let for_layout = record.clone();
    let layout = tokio::task::spawn_blocking(move || compose_resume(index, &for_layout, &config))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in layout: {e}")))?;

    Ok(Json(CurrentResumeResponse {
        index,
        total,
        record,
        layout,
    }))
}

/// GET /api/v1/resumes/current/pdf
///
/// Inline PDF preview of the selected record. Nothing is written to disk.
pub async fn handle_preview_pdf(State(state): State<AppState>) -> Result<Response, AppError> {
    let (index, record) = state
        .controller
        .current_record()
        .ok_or_else(|| AppError::NotFound("No resumes generated yet".to_string()))?;

    let filename = export_filename(&record.name);
    let config = state.page_config.clone();
    let bytes = tokio::task::spawn_blocking(move || {
        render_pdf(&compose_resume(index, &record, &config))
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in preview: {e}")))?
    .map_err(|e| AppError::Export(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{filename}.pdf\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// POST /api/v1/exports/current
///
/// Exports the selected record and waits for the file. 204 when there is nothing to export.
pub async fn handle_export_current(State(state): State<AppState>) -> Result<Response, AppError> {
    match state.controller.download_current().await? {
        Some(file) => Ok(Json::<ExportedFile>(file).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// POST /api/v1/exports/all
///
/// Starts a bulk export and returns 202. 204 when there is nothing to export.
pub async fn handle_export_all(State(state): State<AppState>) -> Result<Response, AppError> {
    let Some((total, _handle)) = state.controller.spawn_download_all()? else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };
    info!("Accepted bulk export of {total} resume(s)");

    Ok((
        StatusCode::ACCEPTED,
        Json(BulkExportAccepted {
            total,
            status: "exporting",
        }),
    )
        .into_response())
}

/// GET /api/v1/notifications
pub async fn handle_notifications(State(state): State<AppState>) -> Json<Vec<Notification>> {
    Json(state.notifications.recent())
}
