//! Task model for TaskGenius.
//!
//! A task is the top-level unit of work a user enters. It exclusively owns
//! its tickets; regenerating a breakdown replaces the whole list.

use serde::{Deserialize, Serialize};

use super::ticket::Ticket;

/// A task in TaskGenius.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Globally unique identifier (e.g. "task_5d2e8b1a90c4")
    pub id: String,

    /// Task title, never empty
    pub title: String,

    /// Free-form description, may be empty
    #[serde(default)]
    pub description: String,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,

    /// Tickets in breakdown order
    #[serde(default)]
    pub tickets: Vec<Ticket>,
}

impl Task {
    /// Create a new task with no tickets.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        let id = format!("task_{}", &uuid::Uuid::new_v4().simple().to_string()[..12]);

        Self {
            id,
            title: title.into(),
            description: description.into(),
            created_at: chrono::Utc::now().timestamp_millis(),
            tickets: Vec::new(),
        }
    }

    /// Use a fixed identifier instead of the random one.
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    /// Set the tickets.
    #[must_use]
    pub fn with_tickets(mut self, tickets: Vec<Ticket>) -> Self {
        self.tickets = tickets;
        self
    }

    /// Look up a ticket by identifier.
    #[must_use]
    pub fn ticket(&self, ticket_id: &str) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == ticket_id)
    }

    /// Look up a ticket by identifier for mutation.
    pub fn ticket_mut(&mut self, ticket_id: &str) -> Option<&mut Ticket> {
        self.tickets.iter_mut().find(|t| t.id == ticket_id)
    }

    /// Sum of ticket estimates in minutes, ignoring unestimated tickets.
    /// Saturates at `u32::MAX`.
    #[must_use]
    pub fn estimated_minutes(&self) -> u32 {
        self.tickets
            .iter()
            .filter_map(|t| t.estimated_time)
            .fold(0, u32::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ticket::Priority;

    #[test]
    fn test_new_task() {
        let task = Task::new("Build a company website", "About, services, contact");

        assert!(task.id.starts_with("task_"));
        assert_eq!(task.title, "Build a company website");
        assert!(task.tickets.is_empty());
    }

    #[test]
    fn test_ticket_lookup_and_estimate() {
        let task = Task::new("t", "").with_tickets(vec![
            Ticket::new("a", "", Priority::HIGHEST).with_id("ticket_a").with_estimated_time(90),
            Ticket::new("b", "", Priority::HIGH).with_id("ticket_b"),
        ]);

        assert_eq!(task.ticket("ticket_b").map(|t| t.title.as_str()), Some("b"));
        assert!(task.ticket("ticket_c").is_none());
        assert_eq!(task.estimated_minutes(), 90);
    }

    #[test]
    fn test_estimate_saturates() {
        let task = Task::new("t", "").with_tickets(vec![
            Ticket::new("a", "", Priority::HIGHEST).with_estimated_time(u32::MAX),
            Ticket::new("b", "", Priority::HIGH).with_estimated_time(60),
        ]);

        assert_eq!(task.estimated_minutes(), u32::MAX);
    }
}
