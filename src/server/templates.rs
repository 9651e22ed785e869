//! HTML templates for the dashboard.
//!
//! Pages are rendered server-side from the latest poll snapshot; the
//! embedded script keeps them fresh by polling the JSON endpoints.

use crate::models::{ClassificationSheet, Job};
use crate::poller::PollState;
use crate::stage::{StageProjection, STAGES};
use crate::utils::{format_timestamp, html_escape};

/// Base HTML template.
pub fn base_template(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - docwatch</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <header id="main-header">
        <nav>
            <a href="/" class="logo">docwatch</a>
            <a href="/upload">upload</a>
        </nav>
    </header>
    <main>
        {}
    </main>
    <script src="/static/dashboard.js"></script>
</body>
</html>"#,
        html_escape(title),
        content
    )
}

/// Jobs list table.
pub fn jobs_list(jobs: &[Job]) -> String {
    if jobs.is_empty() {
        return "<h1>Jobs</h1><p class=\"empty\">No jobs yet. <a href=\"/upload\">Upload a document</a> to get started.</p>".to_string();
    }

    let mut rows = String::new();
    for job in jobs {
        rows.push_str(&format!(
            r#"<tr>
                <td><a href="/jobs/{id}">{id}</a></td>
                <td>{doc}</td>
                <td><span class="status status-{status}">{status}</span></td>
                <td>{progress}%</td>
                <td>{created}</td>
            </tr>"#,
            id = html_escape(&job.id),
            doc = html_escape(&job.doc_name),
            status = job.status.as_str(),
            progress = job.progress_percent,
            created = format_timestamp(Some(job.created_at)),
        ));
    }

    format!(
        r#"<h1>Jobs</h1>
<table class="jobs">
    <thead>
        <tr><th>Job</th><th>Document</th><th>Status</th><th>Progress</th><th>Created</th></tr>
    </thead>
    <tbody>{}</tbody>
</table>"#,
        rows
    )
}

/// Stage tracker: completed / current / upcoming entries plus the bar.
pub fn stage_tracker(projection: &StageProjection) -> String {
    let mut items = String::new();
    for stage in STAGES {
        let class = if projection.completed.contains(&stage) {
            "done"
        } else if stage == projection.current {
            "current"
        } else {
            "upcoming"
        };
        items.push_str(&format!(
            "<li class=\"stage {}\" data-stage=\"{}\">{}</li>",
            class,
            stage.key(),
            stage.label()
        ));
    }

    format!(
        r#"<div id="stage-tracker">
    <div class="progress-track"><div class="progress-fill" id="stage-progress" style="width: {progress}%"></div></div>
    <ol class="stages">{items}</ol>
    <p id="stage-message">{message}</p>
</div>"#,
        progress = projection.progress,
        items = items,
        message = html_escape(&projection.message),
    )
}

/// Job detail page body.
pub fn job_detail(job_id: &str, state: &PollState, projection: &StageProjection) -> String {
    let header = match &state.job {
        Some(job) => format!(
            r#"<h1>{doc}</h1>
<p class="meta">job <code>{id}</code> · created {created} · started {started} · completed {completed}</p>"#,
            doc = html_escape(&job.doc_name),
            id = html_escape(&job.id),
            created = format_timestamp(Some(job.created_at)),
            started = format_timestamp(job.started_at),
            completed = format_timestamp(job.completed_at),
        ),
        None => format!("<h1>Job <code>{}</code></h1>", html_escape(job_id)),
    };

    let error_banner = match &state.error {
        Some(err) => format!("<div class=\"error-banner\" id=\"job-error\">{}</div>", html_escape(err)),
        None => "<div class=\"error-banner hidden\" id=\"job-error\"></div>".to_string(),
    };

    let actions = {
        let mut out = String::from("<div class=\"actions\">");
        let cancellable = state
            .job
            .as_ref()
            .map(|j| j.status.is_cancellable())
            .unwrap_or(false);
        if cancellable {
            out.push_str("<button id=\"cancel-job\" class=\"btn danger\">Cancel job</button>");
        }
        if let Some(job) = &state.job {
            if job.status.results_available() {
                out.push_str(&format!(
                    "<a class=\"btn\" href=\"/api/jobs/{}/results\">Results JSON</a>",
                    html_escape(&job.id)
                ));
            }
            if job.status == crate::models::JobStatus::ClassificationPending {
                out.push_str(&format!(
                    "<a class=\"btn\" href=\"/jobs/{}/review\">Review classification</a>",
                    html_escape(&job.id)
                ));
            }
            if let Some(url) = &job.manifest_url {
                out.push_str(&format!(
                    "<a class=\"btn\" href=\"{}\">Manifest</a>",
                    html_escape(url)
                ));
            }
        }
        out.push_str("</div>");
        out
    };

    format!(
        r#"<div id="job-detail" data-job-id="{id}" data-polling="{polling}">
{header}
{error_banner}
{tracker}
{actions}
</div>"#,
        id = html_escape(job_id),
        polling = state.polling,
        header = header,
        error_banner = error_banner,
        tracker = stage_tracker(projection),
        actions = actions,
    )
}

/// Classification review form.
pub fn review_form(job_id: &str, sheet: &ClassificationSheet, threshold: f64) -> String {
    let mut rows = String::new();
    for item in &sheet.items {
        let flagged = if item.needs_review(threshold) { " flagged" } else { "" };
        rows.push_str(&format!(
            r#"<tr class="review-item{flagged}" data-item-id="{id}">
                <td>{id}</td>
                <td>{page}</td>
                <td>{label}</td>
                <td>{confidence:.2}</td>
                <td><input type="text" name="label-{id}" value="{effective}"></td>
            </tr>"#,
            flagged = flagged,
            id = html_escape(&item.id),
            page = item.page,
            label = html_escape(&item.label),
            confidence = item.confidence,
            effective = html_escape(item.effective_label()),
        ));
    }

    format!(
        r#"<h1>Classification review</h1>
<p class="meta">job <code>{id}</code> · {total} items · {pending} below threshold {threshold:.2}</p>
<form id="review-form" data-job-id="{id}">
<table class="review">
    <thead>
        <tr><th>Item</th><th>Page</th><th>Predicted</th><th>Confidence</th><th>Label</th></tr>
    </thead>
    <tbody>{rows}</tbody>
</table>
<div class="actions">
    <button type="submit" class="btn primary">Submit review</button>
    <button type="button" id="accept-all" class="btn">Accept all predictions</button>
</div>
</form>"#,
        id = html_escape(job_id),
        total = sheet.items.len(),
        pending = sheet.pending_review(threshold).len(),
        threshold = threshold,
        rows = rows,
    )
}

/// Upload form page body.
pub fn upload_form() -> String {
    r#"<h1>Upload</h1>
<p class="meta">The document must already be reachable by the pipeline (blob store URL).</p>
<form id="upload-form">
    <label>Document name <input type="text" name="doc_name" placeholder="report.pdf" required></label>
    <label>Input URL <input type="url" name="input_url" placeholder="https://blobs.example.com/report.pdf" required></label>
    <label>Config overrides (JSON) <textarea name="config_overrides" placeholder="{}"></textarea></label>
    <button type="submit" class="btn primary">Submit job</button>
    <p id="upload-result"></p>
</form>"#
        .to_string()
}

/// Error page body.
pub fn error_page(message: &str) -> String {
    format!("<h1>Error</h1><p class=\"error-banner\">{}</p>", html_escape(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::project;

    #[test]
    fn test_base_template_escapes_title() {
        let html = base_template("<x>", "<p>ok</p>");
        assert!(html.contains("&lt;x&gt; - docwatch"));
        assert!(html.contains("<p>ok</p>"));
    }

    #[test]
    fn test_jobs_list_empty() {
        let html = jobs_list(&[]);
        assert!(html.contains("No jobs yet"));
    }

    #[test]
    fn test_stage_tracker_marks_current() {
        let projection = project(None);
        let html = stage_tracker(&projection);
        assert!(html.contains("class=\"stage current\" data-stage=\"queued\""));
        assert!(html.contains("width: 0%"));
    }
}
