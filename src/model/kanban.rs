//! Kanban projection.
//!
//! A read-only view of every ticket across all tasks, bucketed by status.
//! The store rebuilds it after each mutation of the task list.

use serde::Serialize;

use super::task::Task;
use super::ticket::{Ticket, TicketStatus};

/// Tickets grouped into the three board columns.
///
/// Each ticket carries its owning task's title. Column order follows task
/// order, then ticket order within a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KanbanBoard {
    #[serde(rename = "To Do")]
    to_do: Vec<Ticket>,
    #[serde(rename = "In Progress")]
    in_progress: Vec<Ticket>,
    #[serde(rename = "Done")]
    done: Vec<Ticket>,
}

impl KanbanBoard {
    /// Build the projection from the task list.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut board = Self::default();
        for task in tasks {
            for ticket in &task.tickets {
                let annotated = ticket.clone().with_task(&task.title);
                board.column_mut(ticket.status).push(annotated);
            }
        }
        board
    }

    /// Tickets in one column.
    #[must_use]
    pub fn column(&self, status: TicketStatus) -> &[Ticket] {
        match status {
            TicketStatus::ToDo => &self.to_do,
            TicketStatus::InProgress => &self.in_progress,
            TicketStatus::Done => &self.done,
        }
    }

    fn column_mut(&mut self, status: TicketStatus) -> &mut Vec<Ticket> {
        match status {
            TicketStatus::ToDo => &mut self.to_do,
            TicketStatus::InProgress => &mut self.in_progress,
            TicketStatus::Done => &mut self.done,
        }
    }

    /// Columns in board order.
    pub fn columns(&self) -> impl Iterator<Item = (TicketStatus, &[Ticket])> {
        TicketStatus::ALL.into_iter().map(|s| (s, self.column(s)))
    }

    /// Total number of tickets on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.to_do.len() + self.in_progress.len() + self.done.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
