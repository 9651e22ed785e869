//! Interactive classification review command.

use std::io::{self, Write};

use console::style;

use crate::client::PipelineClient;
use crate::config::Settings;
use crate::models::ReviewDecision;

/// Review pending classifications for a job and submit the result.
pub async fn cmd_review(settings: &Settings, job_id: &str, approve_all: bool) -> anyhow::Result<()> {
    let client = PipelineClient::from_settings(settings);
    let mut sheet = client.get_classification(job_id).await?;

    if sheet.items.is_empty() {
        println!("{} Nothing to review for {}", style("!").yellow(), job_id);
        return Ok(());
    }

    if approve_all {
        sheet.accept_all();
        client.submit_review(job_id, &sheet).await?;
        println!(
            "{} Accepted all {} predictions for {}",
            style("✓").green(),
            sheet.items.len(),
            style(job_id).bold()
        );
        return Ok(());
    }

    let mut skipped = std::collections::HashSet::new();
    let pending = sheet.pending_review(settings.review_threshold);
    println!(
        "{} {} items, {} below confidence {:.2}",
        style("→").cyan(),
        sheet.items.len(),
        pending.len(),
        settings.review_threshold
    );

    for index in pending {
        let item = &sheet.items[index];
        println!(
            "\n  {} on page {} — predicted {} ({:.0}% confidence)",
            style(&item.id).bold(),
            item.page,
            style(&item.label).yellow(),
            item.confidence * 100.0
        );
        print!("  [Enter=accept, s=skip, or type a label] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        let decision = match input {
            "" => ReviewDecision::Accept,
            "s" | "S" => {
                skipped.insert(index);
                ReviewDecision::Skip
            }
            label => ReviewDecision::Override(label.to_string()),
        };
        sheet.apply(index, decision);
    }

    // High-confidence items are accepted implicitly; skipped ones stay open.
    for index in 0..sheet.items.len() {
        if sheet.items[index].reviewed_label.is_none() && !skipped.contains(&index) {
            sheet.apply(index, ReviewDecision::Accept);
        }
    }
    client.submit_review(job_id, &sheet).await?;

    println!(
        "\n{} Submitted review: {}/{} items labeled",
        style("✓").green(),
        sheet.reviewed_count(),
        sheet.items.len()
    );

    Ok(())
}
