//! Live job watch command.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::client::PipelineClient;
use crate::config::Settings;
use crate::models::{Job, JobStatus};
use crate::poller::JobPoller;
use crate::stage;
use crate::utils::format_duration;

/// Give up after this many consecutive not-found polls; the job id is
/// almost certainly wrong rather than merely slow to register.
const NOT_FOUND_GIVE_UP: u32 = 3;

/// Watch a job until it reaches a terminal status.
pub async fn cmd_watch(
    settings: &Settings,
    job_id: &str,
    interval_secs: Option<u64>,
) -> anyhow::Result<()> {
    let client = PipelineClient::from_settings(settings);
    let interval = interval_secs
        .map(Duration::from_secs)
        .unwrap_or_else(|| settings.poll_interval());

    let poller = JobPoller::spawn(client, job_id, interval, true);
    let mut rx = poller.subscribe();

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos:>3}% {wide_msg}")
            .unwrap()
            .progress_chars("█▓░"),
    );
    pb.set_message("Connecting...");

    let mut not_found_streak = 0u32;

    loop {
        if rx.changed().await.is_err() {
            break;
        }
        let state = rx.borrow_and_update().clone();
        let projection = stage::project(state.job.as_ref());

        pb.set_position(projection.progress as u64);
        match &state.error {
            Some(err) if err == "job not found" => {
                not_found_streak += 1;
                if not_found_streak >= NOT_FOUND_GIVE_UP {
                    pb.finish_and_clear();
                    anyhow::bail!("job {} not found", job_id);
                }
                pb.set_message(format!("{} (retrying)", err));
            }
            Some(err) => {
                not_found_streak = 0;
                pb.set_message(format!("{} ({})", projection.message, err));
            }
            None => {
                not_found_streak = 0;
                pb.set_message(format!("{}: {}", projection.label, projection.message));
            }
        }

        if !state.polling {
            pb.finish_and_clear();
            if let Some(job) = &state.job {
                print_outcome(job);
            }
            break;
        }
    }

    Ok(())
}

fn print_outcome(job: &Job) {
    let elapsed = {
        let d = job.elapsed();
        let now = chrono::Utc::now();
        format_duration(now - d, now)
    };

    match job.status {
        JobStatus::Completed => {
            println!(
                "{} {} completed in {}",
                style("✓").green(),
                style(&job.doc_name).bold(),
                elapsed
            );
            if let Some(url) = &job.manifest_url {
                println!("  Manifest: {}", url);
            }
            println!("  Results: docw results {}", job.id);
        }
        JobStatus::Failed => {
            println!("{} {} failed after {}", style("✗").red(), job.doc_name, elapsed);
            if let Some(err) = &job.error_message {
                println!("  {}", style(err).red());
            }
        }
        JobStatus::Cancelled => {
            println!("{} {} cancelled", style("!").yellow(), job.doc_name);
        }
        _ => {
            println!("{} {} stopped at {}", style("!").yellow(), job.doc_name, job.status.as_str());
        }
    }
}
