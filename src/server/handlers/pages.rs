//! HTML page handlers.

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse};

use super::super::{templates, AppState};
use crate::stage;

/// Jobs list page.
pub async fn jobs_page(State(state): State<AppState>) -> impl IntoResponse {
    match state.client.list_jobs(50).await {
        Ok(jobs) => Html(templates::base_template("Jobs", &templates::jobs_list(&jobs))),
        Err(e) => Html(templates::base_template(
            "Error",
            &templates::error_page(&format!("Failed to list jobs: {}", e)),
        )),
    }
}

/// Job detail page with the stage tracker.
pub async fn job_detail_page(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let poll_state = state.poll_state(&job_id).await;
    let projection = stage::project(poll_state.job.as_ref());
    let title = poll_state
        .job
        .as_ref()
        .map(|j| j.doc_name.clone())
        .unwrap_or_else(|| job_id.clone());

    Html(templates::base_template(
        &title,
        &templates::job_detail(&job_id, &poll_state, &projection),
    ))
}

/// Classification review page.
pub async fn review_page(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    match state.client.get_classification(&job_id).await {
        Ok(sheet) => Html(templates::base_template(
            "Review",
            &templates::review_form(&job_id, &sheet, state.review_threshold),
        )),
        Err(e) => Html(templates::base_template(
            "Error",
            &templates::error_page(&format!("Failed to load classification: {}", e)),
        )),
    }
}

/// Upload form page.
pub async fn upload_page() -> impl IntoResponse {
    Html(templates::base_template("Upload", &templates::upload_form()))
}
