//! JSON API handlers consumed by the page scripts.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::super::{assets, AppState};
use crate::client::ClientError;
use crate::models::{ClassificationSheet, Job, JobCreateRequest};
use crate::stage::{self, StageProjection};

/// Health check endpoint for container orchestration.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// Envelope returned by `GET /api/jobs/{id}`: the latest poll snapshot plus
/// its stage projection, everything the page script needs in one fetch.
#[derive(Debug, Serialize)]
pub struct JobEnvelope {
    pub job: Option<Job>,
    pub error: Option<String>,
    pub polling: bool,
    pub stage: StageProjection,
}

/// Parameters for the jobs list.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
}

/// Body for job creation from the upload form.
#[derive(Debug, Deserialize)]
pub struct CreateJobBody {
    pub input_url: String,
    pub doc_name: String,
    #[serde(default)]
    pub config_overrides: serde_json::Value,
}

fn client_error_response(e: ClientError) -> Response {
    let status = match &e {
        ClientError::NotFound => StatusCode::NOT_FOUND,
        ClientError::Status(_) | ClientError::Transport(_) | ClientError::Decode(_) => {
            StatusCode::BAD_GATEWAY
        }
    };
    (status, Json(serde_json::json!({ "error": e.to_string() }))).into_response()
}

/// List recent jobs.
pub async fn api_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Response {
    let limit = params.limit.unwrap_or(50).clamp(1, 500);
    match state.client.list_jobs(limit).await {
        Ok(jobs) => Json(jobs).into_response(),
        Err(e) => client_error_response(e),
    }
}

/// Latest poll snapshot for one job.
pub async fn api_job(State(state): State<AppState>, Path(job_id): Path<String>) -> Response {
    let poll_state = state.poll_state(&job_id).await;
    let envelope = JobEnvelope {
        stage: stage::project(poll_state.job.as_ref()),
        job: poll_state.job,
        error: poll_state.error,
        polling: poll_state.polling,
    };
    Json(envelope).into_response()
}

/// Create a job from the upload form.
pub async fn api_create_job(
    State(state): State<AppState>,
    Json(body): Json<CreateJobBody>,
) -> Response {
    let request = JobCreateRequest::new(body.input_url, body.doc_name, body.config_overrides);
    match state.client.create_job(&request).await {
        Ok(job) => (StatusCode::CREATED, Json(job)).into_response(),
        Err(e) => client_error_response(e),
    }
}

/// Cancel a job through its shared poller so local state reconciles
/// immediately; falls back to a direct cancel when nothing is polling it.
pub async fn api_cancel_job(State(state): State<AppState>, Path(job_id): Path<String>) -> Response {
    if let Some(poller) = state.poller(&job_id) {
        let cancelled = poller.cancel().await;
        let poll_state = poller.state();
        return Json(serde_json::json!({
            "cancelled": cancelled,
            "error": poll_state.error,
        }))
        .into_response();
    }

    match state.client.cancel_job(&job_id).await {
        Ok(response) => Json(serde_json::json!({
            "cancelled": true,
            "status": response.status.as_str(),
            "message": response.message,
        }))
        .into_response(),
        Err(e) => client_error_response(e),
    }
}

/// Results manifest pass-through.
pub async fn api_results(State(state): State<AppState>, Path(job_id): Path<String>) -> Response {
    match state.client.get_results(&job_id).await {
        Ok(manifest) => Json(manifest).into_response(),
        Err(e) => client_error_response(e),
    }
}

/// CSV export pass-through.
pub async fn api_csv(State(state): State<AppState>, Path(job_id): Path<String>) -> Response {
    match state.client.get_csv(&job_id).await {
        Ok(csv) => ([(header::CONTENT_TYPE, "text/csv")], csv).into_response(),
        Err(e) => client_error_response(e),
    }
}

/// Rendered figure image pass-through.
pub async fn api_image(
    State(state): State<AppState>,
    Path((job_id, sha)): Path<(String, String)>,
) -> Response {
    match state.client.get_image(&job_id, &sha).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/png")], bytes).into_response(),
        Err(e) => client_error_response(e),
    }
}

/// Classification sheet pass-through.
pub async fn api_classification(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Response {
    match state.client.get_classification(&job_id).await {
        Ok(sheet) => Json(sheet).into_response(),
        Err(e) => client_error_response(e),
    }
}

/// Submit a reviewed classification sheet to the backend.
pub async fn api_submit_review(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(sheet): Json<ClassificationSheet>,
) -> Response {
    match state.client.submit_review(&job_id, &sheet).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => client_error_response(e),
    }
}

pub async fn serve_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], assets::CSS)
}

pub async fn serve_js() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript")], assets::JS)
}
