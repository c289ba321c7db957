//! Kanban board command.

use colored::{ColoredString, Colorize};
use serde::Serialize;
use std::path::PathBuf;

use super::{format_minutes, truncate, BoardContext};
use crate::error::Result;
use crate::model::{KanbanBoard, Priority, Ticket, TicketStatus};
use crate::validate::normalize_priority;

#[derive(Serialize)]
struct ColumnOutput<'a> {
    status: TicketStatus,
    tickets: Vec<&'a Ticket>,
    count: usize,
}

#[derive(Serialize)]
struct BoardOutput<'a> {
    columns: Vec<ColumnOutput<'a>>,
    total: usize,
}

/// Execute the board command.
///
/// # Errors
///
/// Returns an error if the priority filter is invalid or the board cannot
/// be opened.
pub fn execute(priority: Option<&str>, board: Option<&PathBuf>, json: bool) -> Result<()> {
    let priority = priority.map(normalize_priority).transpose()?;
    let ctx = BoardContext::open(board, true)?;
    let kanban = ctx.store.kanban();

    let columns = filtered_columns(&kanban, priority);
    let total = columns.iter().map(|c| c.count).sum();

    if json {
        let output = BoardOutput { columns, total };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if crate::is_csv() {
        println!("status,id,title,task,priority,estimated_minutes,tags");
        for column in &columns {
            for t in &column.tickets {
                println!(
                    "{},{},{},{},{},{},{}",
                    crate::csv_escape(column.status.as_str()),
                    t.id,
                    crate::csv_escape(&t.title),
                    crate::csv_escape(t.task.as_deref().unwrap_or("")),
                    t.priority.value(),
                    t.estimated_time.map(|m| m.to_string()).unwrap_or_default(),
                    crate::csv_escape(&t.tags.join(";"))
                );
            }
        }
        return Ok(());
    }

    if total == 0 {
        println!("The board is empty. Create a task with `tg task create <title>`.");
        return Ok(());
    }

    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{} {}", column_heading(column.status), format!("({})", column.count).dimmed());
        if column.tickets.is_empty() {
            println!("  {}", "(empty)".dimmed());
        }
        for t in &column.tickets {
            let estimate = t.estimated_time.map(format_minutes).unwrap_or_default();
            println!(
                "  {} {} {} {}",
                t.id.dimmed(),
                priority_badge(t.priority),
                truncate(&t.title, 48),
                estimate.dimmed()
            );
            if let Some(task) = &t.task {
                println!("      {}", truncate(task, 60).dimmed());
            }
        }
    }

    Ok(())
}

fn filtered_columns(kanban: &KanbanBoard, priority: Option<Priority>) -> Vec<ColumnOutput<'_>> {
    kanban
        .columns()
        .map(|(status, tickets)| {
            let tickets: Vec<&Ticket> = tickets
                .iter()
                .filter(|t| priority.is_none_or(|p| t.priority == p))
                .collect();
            ColumnOutput {
                status,
                count: tickets.len(),
                tickets,
            }
        })
        .collect()
}

fn column_heading(status: TicketStatus) -> ColoredString {
    match status {
        TicketStatus::ToDo => status.as_str().blue().bold(),
        TicketStatus::InProgress => status.as_str().yellow().bold(),
        TicketStatus::Done => status.as_str().green().bold(),
    }
}

fn priority_badge(priority: Priority) -> ColoredString {
    let badge = format!("P{}", priority.value());
    match priority.value() {
        1 => badge.red(),
        2 => badge.yellow(),
        3 => badge.normal(),
        _ => badge.dimmed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed::demo_tasks;

    #[test]
    fn test_priority_filter() {
        let kanban = KanbanBoard::from_tasks(&demo_tasks());

        let all = filtered_columns(&kanban, None);
        assert_eq!(all.iter().map(|c| c.count).sum::<usize>(), 8);

        let highest = filtered_columns(&kanban, Some(Priority::HIGHEST));
        let ids: Vec<&str> = highest
            .iter()
            .flat_map(|c| c.tickets.iter().map(|t| t.id.as_str()))
            .collect();
        assert_eq!(ids, vec!["ticket_1", "ticket_7", "ticket_6"]);
    }
}
