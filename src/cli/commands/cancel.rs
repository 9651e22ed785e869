//! Job cancellation command.

use console::style;

use crate::client::PipelineClient;
use crate::config::Settings;

/// Request cancellation and report the reconciled status.
pub async fn cmd_cancel(settings: &Settings, job_id: &str) -> anyhow::Result<()> {
    let client = PipelineClient::from_settings(settings);

    let response = client.cancel_job(job_id).await?;
    println!(
        "{} Cancellation requested for {} ({})",
        style("→").cyan(),
        style(job_id).bold(),
        response.message
    );

    // Reconcile with the authoritative server state.
    let job = client.get_job(job_id).await?;
    println!(
        "  Status is now {}",
        style(job.status.as_str()).yellow()
    );

    Ok(())
}
