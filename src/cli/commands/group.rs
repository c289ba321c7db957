//! Group commands.
//!
//! - `tg group list` - Regroup all tickets by theme
//! - `tg group show <label>` - Tickets in one group
//! - `tg group strategy <label>` - Completion advice for one group

use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use super::{truncate, BoardContext};
use crate::cli::GroupCommands;
use crate::error::{Error, Result};
use crate::model::{GroupedTickets, Ticket};

#[derive(Serialize)]
struct GroupSummary<'a> {
    label: &'a str,
    ticket_ids: Vec<&'a str>,
    count: usize,
}

#[derive(Serialize)]
struct GroupListOutput<'a> {
    groups: Vec<GroupSummary<'a>>,
    count: usize,
}

#[derive(Serialize)]
struct GroupShowOutput<'a> {
    label: &'a str,
    tickets: &'a [Ticket],
    count: usize,
}

#[derive(Serialize)]
struct StrategyOutput<'a> {
    label: &'a str,
    strategy: &'a str,
}

/// Execute a group command.
///
/// # Errors
///
/// Returns an error if the board cannot be opened or saved, grouping
/// fails, or the group does not exist.
pub fn execute(command: &GroupCommands, board: Option<&PathBuf>, no_delay: bool, json: bool) -> Result<()> {
    let ctx = BoardContext::open(board, no_delay)?;

    match command {
        GroupCommands::List => execute_list(&ctx, json),
        GroupCommands::Show { label } => execute_show(&ctx, label, json),
        GroupCommands::Strategy { label } => execute_strategy(&ctx, label, json),
    }
}

fn execute_list(ctx: &BoardContext, json: bool) -> Result<()> {
    let grouped = ctx.block_on(ctx.store.group_tickets())?;
    let grouped = ctx.commit(|store| Ok(store.set_grouped(&grouped)))?;

    if json {
        let output = GroupListOutput {
            count: grouped.len(),
            groups: summaries(&grouped),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if crate::is_csv() {
        println!("label,ticket_ids");
        for g in grouped.iter() {
            let ids: Vec<&str> = g.tickets.iter().map(|t| t.id.as_str()).collect();
            println!("{},{}", crate::csv_escape(&g.label), crate::csv_escape(&ids.join(";")));
        }
        return Ok(());
    }

    if grouped.is_empty() {
        println!("No groups found.");
        return Ok(());
    }

    println!("Groups ({}):", grouped.len());
    for g in grouped.iter() {
        println!();
        println!("{} {}", g.label.cyan().bold(), format!("({})", g.tickets.len()).dimmed());
        for t in &g.tickets {
            println!("  {} {}", t.id.dimmed(), truncate(&t.title, 60));
        }
    }

    Ok(())
}

fn execute_show(ctx: &BoardContext, label: &str, json: bool) -> Result<()> {
    let grouped = ctx.store.grouped();
    let tickets = grouped.get(label).ok_or_else(|| Error::GroupNotFound {
        label: label.to_string(),
        available: grouped.labels(),
    })?;

    if json {
        let output = GroupShowOutput {
            label,
            tickets,
            count: tickets.len(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{} {}", label.cyan().bold(), format!("({})", tickets.len()).dimmed());
    for t in tickets {
        println!(
            "  {} {} {}",
            t.id.dimmed(),
            format!("[{}]", t.status).cyan(),
            truncate(&t.title, 50)
        );
        if let Some(task) = &t.task {
            println!("      {}", truncate(task, 60).dimmed());
        }
    }

    Ok(())
}

fn execute_strategy(ctx: &BoardContext, label: &str, json: bool) -> Result<()> {
    let strategy = ctx.block_on(ctx.store.completion_strategy(label));

    if json {
        let output = StrategyOutput {
            label,
            strategy: &strategy,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", format!("Strategy: {label}").cyan().bold());
    println!();
    println!("{strategy}");

    Ok(())
}

fn summaries(grouped: &GroupedTickets) -> Vec<GroupSummary<'_>> {
    grouped
        .iter()
        .map(|g| GroupSummary {
            label: &g.label,
            ticket_ids: g.tickets.iter().map(|t| t.id.as_str()).collect(),
            count: g.tickets.len(),
        })
        .collect()
}
