//! Reusable-work search command.

use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use super::BoardContext;
use crate::error::Result;
use crate::model::{ReusableComponent, MAX_RELEVANCE};

#[derive(Serialize)]
struct ReuseOutput<'a> {
    description: &'a str,
    results: &'a [ReusableComponent],
    count: usize,
}

/// Execute the reuse command.
///
/// # Errors
///
/// Returns `Error::RequiredField` for a blank description, or an error if
/// the board cannot be opened or the search fails.
pub fn execute(description: &str, board: Option<&PathBuf>, no_delay: bool, json: bool) -> Result<()> {
    let ctx = BoardContext::open(board, no_delay)?;
    let results = ctx.block_on(ctx.store.find_reusable_components(description))?;

    if crate::is_silent() {
        for r in &results {
            println!("{}", r.ticket_id);
        }
        return Ok(());
    }

    if json {
        let output = ReuseOutput {
            description: description.trim(),
            count: results.len(),
            results: &results,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if crate::is_csv() {
        println!("ticket_id,relevance_score,title,task,adaptation_notes");
        for r in &results {
            let (title, task) = r
                .ticket_details
                .as_ref()
                .map(|d| (d.title.as_str(), d.task.as_str()))
                .unwrap_or_default();
            println!(
                "{},{},{},{},{}",
                r.ticket_id,
                r.relevance_score,
                crate::csv_escape(title),
                crate::csv_escape(task),
                crate::csv_escape(&r.adaptation_notes)
            );
        }
        return Ok(());
    }

    if results.is_empty() {
        println!("No reusable tickets found.");
        return Ok(());
    }

    println!("Reusable tickets ({}):", results.len());
    for r in &results {
        println!();
        let title = r.ticket_details.as_ref().map_or(r.ticket_id.as_str(), |d| d.title.as_str());
        println!(
            "{} {} {}",
            title.bold(),
            r.ticket_id.dimmed(),
            format!("{}/{MAX_RELEVANCE}", r.relevance_score).green()
        );
        if let Some(details) = &r.ticket_details {
            println!("  {}", details.task.dimmed());
        }
        println!("  {}", r.adaptation_notes);
    }

    Ok(())
}
