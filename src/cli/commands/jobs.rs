//! Jobs list command.

use console::style;

use crate::client::PipelineClient;
use crate::config::Settings;
use crate::models::JobStatus;
use crate::utils::format_timestamp;

/// List recent jobs.
pub async fn cmd_jobs(settings: &Settings, limit: usize) -> anyhow::Result<()> {
    let client = PipelineClient::from_settings(settings);
    let jobs = client.list_jobs(limit.clamp(1, 500)).await?;

    if jobs.is_empty() {
        println!("{} No jobs found", style("!").yellow());
        return Ok(());
    }

    println!(
        "{:<38} {:<28} {:<26} {:>4}  {}",
        style("JOB").dim(),
        style("DOCUMENT").dim(),
        style("STATUS").dim(),
        style("PCT").dim(),
        style("CREATED").dim()
    );

    for job in &jobs {
        let status = match job.status {
            JobStatus::Completed => style(job.status.as_str()).green(),
            JobStatus::Failed | JobStatus::Cancelled => style(job.status.as_str()).red(),
            JobStatus::ClassificationPending => style(job.status.as_str()).yellow(),
            _ => style(job.status.as_str()).cyan(),
        };
        println!(
            "{:<38} {:<28} {:<26} {:>3}%  {}",
            job.id,
            truncate(&job.doc_name, 27),
            status,
            job.progress_percent,
            format_timestamp(Some(job.created_at)),
        );
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max - 1).collect();
        format!("{}…", cut)
    }
}
