//! Ticket commands.

use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use super::{format_minutes, format_timestamp, BoardContext};
use crate::cli::TicketCommands;
use crate::error::Result;
use crate::model::TicketStatus;
use crate::validate::normalize_status;

#[derive(Serialize)]
struct MoveOutput<'a> {
    id: &'a str,
    from: TicketStatus,
    to: TicketStatus,
}

/// Execute a ticket command.
///
/// # Errors
///
/// Returns an error if the status is invalid, the ticket does not exist, or
/// the board cannot be opened or saved.
pub fn execute(command: &TicketCommands, board: Option<&PathBuf>, json: bool) -> Result<()> {
    let ctx = BoardContext::open(board, true)?;

    match command {
        TicketCommands::Move { id, status } => execute_move(&ctx, id, status, json),
        TicketCommands::Show { id } => execute_show(&ctx, id, json),
    }
}

fn execute_move(ctx: &BoardContext, id: &str, status: &str, json: bool) -> Result<()> {
    let status = normalize_status(status)?;

    let previous = ctx.commit(|store| {
        store
            .update_ticket_status(id, status)
            .ok_or_else(|| ctx.ticket_not_found(id))
    })?;

    if crate::is_silent() {
        println!("{id}");
        return Ok(());
    }

    if json {
        let output = MoveOutput {
            id,
            from: previous,
            to: status,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if previous == status {
        println!("{id} is already in {status}");
    } else {
        println!("Moved {id}: {previous} {} {}", "→".dimmed(), status.to_string().green());
    }

    Ok(())
}

fn execute_show(ctx: &BoardContext, id: &str, json: bool) -> Result<()> {
    let ticket = ctx.store.ticket(id).ok_or_else(|| ctx.ticket_not_found(id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ticket)?);
        return Ok(());
    }

    println!("{}", ticket.title.bold());
    println!("  ID:       {}", ticket.id);
    if let Some(task) = &ticket.task {
        println!("  Task:     {task}");
    }
    println!("  Status:   {}", ticket.status);
    println!("  Priority: {}", ticket.priority);
    if let Some(minutes) = ticket.estimated_time {
        println!("  Estimate: {}", format_minutes(minutes));
    }
    if !ticket.tags.is_empty() {
        println!("  Tags:     {}", ticket.tags.join(", "));
    }
    println!("  Created:  {}", format_timestamp(ticket.created_at));
    if !ticket.description.is_empty() {
        println!();
        println!("  {}", ticket.description);
    }

    Ok(())
}
