//! Results retrieval command.

use console::style;

use crate::client::PipelineClient;
use crate::config::Settings;

/// Fetch and display results for a finished job.
pub async fn cmd_results(
    settings: &Settings,
    job_id: &str,
    json: bool,
    integration: bool,
) -> anyhow::Result<()> {
    let client = PipelineClient::from_settings(settings);

    let job = client.get_job(job_id).await?;
    if !job.status.results_available() {
        anyhow::bail!(
            "job {} is {} — results are not available yet",
            job_id,
            job.status.as_str()
        );
    }

    if integration {
        // Integration JSON is only guaranteed present after full completion,
        // not after classification review alone.
        if !matches!(job.status, crate::models::JobStatus::Completed) {
            anyhow::bail!(
                "integration JSON requires status completed (job is {})",
                job.status.as_str()
            );
        }
        let payload = client.get_integration(job_id).await?;
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let manifest = client.get_results(job_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&manifest)?);
        return Ok(());
    }

    println!(
        "{} {} — {}",
        style("✓").green(),
        style(&job.doc_name).bold(),
        manifest.summary()
    );

    for figure in &manifest.figures {
        let caption = if figure.caption.is_empty() { "(no caption)" } else { &figure.caption };
        println!("  figure {:<12} p{:<4} {}", figure.id, figure.page, caption);
    }
    for table in &manifest.tables {
        let caption = if table.caption.is_empty() { "(no caption)" } else { &table.caption };
        println!("  table  {:<12} p{:<4} {}", table.id, table.page, caption);
    }

    if let Some(url) = &job.manifest_url {
        println!("  Manifest: {}", url);
    }

    Ok(())
}
