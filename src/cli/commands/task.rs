//! Task commands.
//!
//! - `tg task create <title>` - Create a task (and break it down when an API key is set)
//! - `tg task list` - List tasks
//! - `tg task show <id>` - Show a task and its tickets
//! - `tg task generate <id>` - Replace a task's tickets with an AI breakdown

use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use tracing::warn;

use super::{format_minutes, format_timestamp, print_notice, truncate, BoardContext};
use crate::cli::TaskCommands;
use crate::error::Result;
use crate::model::{Task, Ticket};
use crate::validate::require_non_empty;

#[derive(Serialize)]
struct TaskOutput {
    id: String,
    title: String,
    description: String,
    ticket_count: usize,
    estimated_minutes: u32,
    created_at: String,
}

impl From<&Task> for TaskOutput {
    fn from(t: &Task) -> Self {
        Self {
            id: t.id.clone(),
            title: t.title.clone(),
            description: t.description.clone(),
            ticket_count: t.tickets.len(),
            estimated_minutes: t.estimated_minutes(),
            created_at: format_timestamp(t.created_at),
        }
    }
}

#[derive(Serialize)]
struct TaskListOutput {
    tasks: Vec<TaskOutput>,
    count: usize,
}

#[derive(Serialize)]
struct CreateOutput<'a> {
    task: &'a Task,
    generated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<String>,
}

#[derive(Serialize)]
struct GenerateOutput<'a> {
    task_id: &'a str,
    tickets: &'a [Ticket],
    count: usize,
}

/// Execute a task command.
///
/// # Errors
///
/// Returns an error if the board cannot be opened or saved, or the
/// operation fails.
pub fn execute(command: &TaskCommands, board: Option<&PathBuf>, no_delay: bool, json: bool) -> Result<()> {
    let ctx = BoardContext::open(board, no_delay)?;

    match command {
        TaskCommands::Create {
            title,
            description,
            no_generate,
        } => execute_create(&ctx, title, description, *no_generate, json),
        TaskCommands::List => execute_list(&ctx, json),
        TaskCommands::Show { id } => execute_show(&ctx, id, json),
        TaskCommands::Generate { id } => execute_generate(&ctx, id, json),
    }
}

fn execute_create(ctx: &BoardContext, title: &str, description: &str, no_generate: bool, json: bool) -> Result<()> {
    let title = require_non_empty("title", title)?;
    let description = description.trim();

    let mut task = ctx.block_on(ctx.store.create_task(title, description));
    ctx.commit(|store| {
        store.insert_task(task.clone());
        Ok(())
    })?;

    // With a key set the task starts empty; fill it in right away
    let mut generated = false;
    let mut notice = None;
    if !no_generate {
        match generate_and_commit(ctx, &task.id) {
            Ok(tickets) => {
                task.tickets = tickets;
                generated = true;
            }
            Err(e) if e.is_notice() => {
                print_notice(&e, json);
                notice = Some(e.to_string());
            }
            Err(e) => {
                warn!(task_id = %task.id, error = %e, "Task created but breakdown failed");
                return Err(e);
            }
        }
    }

    if crate::is_silent() {
        println!("{}", task.id);
        return Ok(());
    }

    if json {
        let output = CreateOutput {
            task: &task,
            generated,
            notice,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Created task: {}", task.title.bold());
        println!("  ID:      {}", task.id);
        println!("  Tickets: {}", task.tickets.len());
        print_tickets(&task.tickets);
    }

    Ok(())
}

fn execute_list(ctx: &BoardContext, json: bool) -> Result<()> {
    let tasks = ctx.store.tasks();

    if json {
        let output = TaskListOutput {
            count: tasks.len(),
            tasks: tasks.iter().map(TaskOutput::from).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if crate::is_csv() {
        println!("id,title,tickets,estimated_minutes,created_at");
        for t in &tasks {
            println!(
                "{},{},{},{},{}",
                t.id,
                crate::csv_escape(&t.title),
                t.tickets.len(),
                t.estimated_minutes(),
                format_timestamp(t.created_at)
            );
        }
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks yet. Create one with `tg task create <title>`.");
        return Ok(());
    }

    println!("Tasks ({}):", tasks.len());
    println!();
    for t in &tasks {
        println!(
            "  {} {} {}",
            t.id.dimmed(),
            truncate(&t.title, 50).bold(),
            format!("[{} tickets, {}]", t.tickets.len(), format_minutes(t.estimated_minutes())).dimmed()
        );
    }

    Ok(())
}

fn execute_show(ctx: &BoardContext, id: &str, json: bool) -> Result<()> {
    let task = ctx.store.task(id).ok_or_else(|| ctx.task_not_found(id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&task)?);
        return Ok(());
    }

    println!("{}", task.title.bold());
    println!("  ID:        {}", task.id);
    println!("  Created:   {}", format_timestamp(task.created_at));
    println!("  Estimated: {}", format_minutes(task.estimated_minutes()));
    if !task.description.is_empty() {
        println!();
        println!("  {}", task.description);
    }
    println!();
    println!("Tickets ({}):", task.tickets.len());
    print_tickets(&task.tickets);

    Ok(())
}

fn execute_generate(ctx: &BoardContext, id: &str, json: bool) -> Result<()> {
    let tickets = generate_and_commit(ctx, id)?;

    if crate::is_silent() {
        for t in &tickets {
            println!("{}", t.id);
        }
        return Ok(());
    }

    if json {
        let output = GenerateOutput {
            task_id: id,
            tickets: &tickets,
            count: tickets.len(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Generated {} tickets for {id}:", tickets.len());
        print_tickets(&tickets);
    }

    Ok(())
}

/// Run a breakdown and write its tickets, holding the task's generation
/// marker throughout so other runs cannot start one for the same task.
fn generate_and_commit(ctx: &BoardContext, task_id: &str) -> Result<Vec<Ticket>> {
    ctx.generating(task_id, || {
        let tickets = ctx.block_on(ctx.store.generate_tickets(task_id))?;
        ctx.commit(|store| store.replace_tickets(task_id, tickets.clone()))?;
        Ok(tickets)
    })
}

fn print_tickets(tickets: &[Ticket]) {
    for t in tickets {
        let estimate = t.estimated_time.map(format_minutes).unwrap_or_default();
        println!(
            "  {} {} {} {}",
            t.id.dimmed(),
            format!("[{}]", t.status).cyan(),
            truncate(&t.title, 50),
            format!("P{} {estimate}", t.priority.value()).dimmed()
        );
    }
}

