//! Router configuration for the web dashboard.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Root and /jobs are the unified jobs list
        .route("/", get(handlers::jobs_page))
        .route("/jobs", get(handlers::jobs_page))
        // Job detail and review pages
        .route("/jobs/:job_id", get(handlers::job_detail_page))
        .route("/jobs/:job_id/review", get(handlers::review_page))
        .route("/upload", get(handlers::upload_page))
        // JSON API consumed by the page scripts
        .route("/api/jobs", get(handlers::api_list_jobs).post(handlers::api_create_job))
        .route("/api/jobs/:job_id", get(handlers::api_job))
        .route("/api/jobs/:job_id/cancel", post(handlers::api_cancel_job))
        .route("/api/jobs/:job_id/results", get(handlers::api_results))
        .route("/api/jobs/:job_id/csv", get(handlers::api_csv))
        .route("/api/jobs/:job_id/images/:sha", get(handlers::api_image))
        .route(
            "/api/jobs/:job_id/classification",
            get(handlers::api_classification).post(handlers::api_submit_review),
        )
        .route("/health", get(handlers::health))
        // Static assets (CSS/JS)
        .route("/static/style.css", get(handlers::serve_css))
        .route("/static/dashboard.js", get(handlers::serve_js))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
