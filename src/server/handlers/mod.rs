//! HTTP handlers for the dashboard.

mod api;
mod pages;

pub use api::{
    api_cancel_job, api_classification, api_create_job, api_csv, api_image, api_job,
    api_list_jobs, api_results, api_submit_review, health, serve_css, serve_js,
};
pub use pages::{job_detail_page, jobs_page, review_page, upload_page};
