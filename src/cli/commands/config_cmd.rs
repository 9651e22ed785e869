//! Configuration management commands.

use std::path::Path;

use console::style;

use crate::config::Settings;

/// Print one setting, or all of them.
pub fn cmd_get(settings: &Settings, key: Option<&str>) -> anyhow::Result<()> {
    match key {
        Some("api_url") => println!("{}", settings.resolved_api_url()),
        Some("request_timeout") => println!("{}", settings.request_timeout),
        Some("poll_interval_secs") => println!("{}", settings.poll_interval_secs),
        Some("review_threshold") => println!("{}", settings.review_threshold),
        Some(other) => anyhow::bail!("unknown setting '{}'", other),
        None => {
            println!("api_url            = {}", settings.resolved_api_url());
            println!("request_timeout    = {}", settings.request_timeout);
            println!("poll_interval_secs = {}", settings.poll_interval_secs);
            println!("review_threshold   = {}", settings.review_threshold);
        }
    }
    Ok(())
}

/// Persist one setting.
pub fn cmd_set(settings: &Settings, path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let mut updated = settings.clone();
    match key {
        "api_url" => updated.api_url = Some(value.trim_end_matches('/').to_string()),
        "request_timeout" => updated.request_timeout = value.parse()?,
        "poll_interval_secs" => updated.poll_interval_secs = value.parse()?,
        "review_threshold" => {
            let threshold: f64 = value.parse()?;
            if !(0.0..=1.0).contains(&threshold) {
                anyhow::bail!("review_threshold must be between 0 and 1");
            }
            updated.review_threshold = threshold;
        }
        other => anyhow::bail!("unknown setting '{}'", other),
    }
    updated.save_to(path)?;
    println!("{} Saved {} to {}", style("✓").green(), key, path.display());
    Ok(())
}

/// Print the settings file path.
pub fn cmd_path(path: &Path) -> anyhow::Result<()> {
    println!("{}", path.display());
    Ok(())
}
