//! Ticket model for TaskGenius.
//!
//! Tickets are the actionable sub-units a task is broken down into. A ticket
//! belongs to exactly one task; status is the only field that changes after
//! creation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ticket status values, one per kanban column.
///
/// Transitions are unrestricted: any status can be set from any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    #[default]
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
}

impl TicketStatus {
    /// All statuses in board column order.
    pub const ALL: [Self; 3] = [Self::ToDo, Self::InProgress, Self::Done];

    /// Display name, also used as the serialized form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ToDo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket priority, 1 (highest) through 5 (lowest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const HIGHEST: Self = Self(1);
    pub const HIGH: Self = Self(2);
    pub const MEDIUM: Self = Self(3);
    pub const LOW: Self = Self(4);
    pub const LOWEST: Self = Self(5);

    /// Numeric value (1-5).
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Human label shown next to the `P<n>` badge.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self.0 {
            1 => "Highest",
            2 => "High",
            3 => "Medium",
            4 => "Low",
            _ => "Lowest",
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!("priority must be 1-5, got {value}"))
        }
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> Self {
        p.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}: {}", self.0, self.label())
    }
}

/// A ticket in TaskGenius.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique identifier within the owning task (e.g. "ticket_3f9a1c2e")
    pub id: String,

    /// Ticket title
    pub title: String,

    /// What needs to be done
    pub description: String,

    /// Current kanban column
    pub status: TicketStatus,

    /// 1 = highest, 5 = lowest
    pub priority: Priority,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,

    /// Free-form tags, in insertion order without duplicates
    #[serde(default)]
    pub tags: Vec<String>,

    /// Effort estimate in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<u32>,

    /// Title of the owning task, filled in by board projections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
}

impl Ticket {
    /// Create a new "To Do" ticket with a random identifier.
    pub fn new(title: impl Into<String>, description: impl Into<String>, priority: Priority) -> Self {
        let id = format!("ticket_{}", &uuid::Uuid::new_v4().simple().to_string()[..8]);

        Self {
            id,
            title: title.into(),
            description: description.into(),
            status: TicketStatus::ToDo,
            priority,
            created_at: chrono::Utc::now().timestamp_millis(),
            tags: Vec::new(),
            estimated_time: None,
            task: None,
        }
    }

    /// Use a fixed identifier instead of the random one.
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    /// Set the status.
    #[must_use]
    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = status;
        self
    }

    /// Add tags, skipping ones already present.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tag in tags {
            let tag = tag.into();
            if !self.tags.contains(&tag) {
                self.tags.push(tag);
            }
        }
        self
    }

    /// Set the effort estimate in minutes.
    #[must_use]
    pub fn with_estimated_time(mut self, minutes: u32) -> Self {
        self.estimated_time = Some(minutes);
        self
    }

    /// Annotate with the owning task's title.
    #[must_use]
    pub fn with_task(mut self, task_title: &str) -> Self {
        self.task = Some(task_title.to_string());
        self
    }
}

/// A ticket proposed by the assistant, before the store gives it an
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TicketDraft {
    /// Turn the draft into a fresh "To Do" ticket.
    #[must_use]
    pub fn into_ticket(self) -> Ticket {
        let mut ticket = Ticket::new(self.title, self.description, self.priority).with_tags(self.tags);
        ticket.estimated_time = self.estimated_time;
        ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ticket() {
        let ticket = Ticket::new("Design homepage", "Hero section", Priority::HIGHEST);

        assert!(ticket.id.starts_with("ticket_"));
        assert_eq!(ticket.id.len(), "ticket_".len() + 8);
        assert_eq!(ticket.status, TicketStatus::ToDo);
        assert_eq!(ticket.priority.value(), 1);
        assert!(ticket.task.is_none());
    }

    #[test]
    fn test_status_serializes_as_column_name() {
        let json = serde_json::to_string(&TicketStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        let parsed: TicketStatus = serde_json::from_str("\"To Do\"").unwrap();
        assert_eq!(parsed, TicketStatus::ToDo);
        assert!(serde_json::from_str::<TicketStatus>("\"Blocked\"").is_err());
    }

    #[test]
    fn test_default_status_is_to_do() {
        assert_eq!(TicketStatus::default(), TicketStatus::ToDo);
    }

    #[test]
    fn test_priority_bounds() {
        assert!(Priority::try_from(0).is_err());
        assert!(Priority::try_from(6).is_err());
        assert_eq!(Priority::try_from(3).unwrap(), Priority::MEDIUM);
        assert_eq!(Priority::LOW.to_string(), "P4: Low");
        assert!(serde_json::from_str::<Priority>("9").is_err());
    }

    #[test]
    fn test_tags_deduplicated() {
        let ticket = Ticket::new("t", "d", Priority::HIGH).with_tags(["auth", "backend", "auth"]);
        assert_eq!(ticket.tags, vec!["auth", "backend"]);
    }

    #[test]
    fn test_draft_into_ticket() {
        let draft = TicketDraft {
            title: "Test it".into(),
            description: "QA pass".into(),
            priority: Priority::MEDIUM,
            estimated_time: Some(120),
            tags: vec!["testing".into()],
        };
        let ticket = draft.into_ticket();
        assert_eq!(ticket.status, TicketStatus::ToDo);
        assert_eq!(ticket.estimated_time, Some(120));
        assert_eq!(ticket.tags, vec!["testing"]);
    }
}
