//! Job submission command.

use console::style;

use crate::client::PipelineClient;
use crate::config::Settings;
use crate::models::JobCreateRequest;

/// Submit a document to the pipeline.
pub async fn cmd_submit(
    settings: &Settings,
    doc_name: &str,
    input_url: &str,
    overrides: &[String],
    watch: bool,
) -> anyhow::Result<()> {
    let parsed = url::Url::parse(input_url)
        .map_err(|e| anyhow::anyhow!("invalid input URL '{}': {}", input_url, e))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("input URL must be http(s); the pipeline cannot reach {}", parsed.scheme());
    }

    let config_overrides = parse_overrides(overrides)?;
    let client = PipelineClient::from_settings(settings);

    let request = JobCreateRequest::new(
        input_url.to_string(),
        doc_name.to_string(),
        config_overrides,
    );
    let job = client.create_job(&request).await?;

    println!(
        "{} Submitted {} as job {}",
        style("✓").green(),
        style(doc_name).bold(),
        style(&job.id).cyan()
    );

    if watch {
        super::watch::cmd_watch(settings, &job.id, None).await?;
    }

    Ok(())
}

/// Parse `key=value` pairs into a JSON object. Dotted keys are passed
/// through verbatim; the backend owns the override schema.
fn parse_overrides(overrides: &[String]) -> anyhow::Result<serde_json::Value> {
    let mut map = serde_json::Map::new();
    for pair in overrides {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("invalid override '{}' (expected key=value)", pair))?;
        // Numbers and booleans are sent typed; everything else as a string.
        let value = match value.parse::<serde_json::Value>() {
            Ok(v) if v.is_number() || v.is_boolean() => v,
            _ => serde_json::Value::String(value.to_string()),
        };
        map.insert(key.to_string(), value);
    }
    Ok(serde_json::Value::Object(map))
}
