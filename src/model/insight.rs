//! Grouping and reuse results produced by the assistant.

use serde::{Deserialize, Serialize};

use super::ticket::Ticket;

/// Fallback text when no strategy exists for a group.
pub const NO_STRATEGY: &str = "No specific strategy available for this group.";

/// Highest relevance score a reuse match can carry.
pub const MAX_RELEVANCE: u8 = 10;

/// Tickets that share a theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketGroup {
    pub label: String,
    pub tickets: Vec<Ticket>,
}

/// The grouped projection: themes in the order the assistant produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupedTickets(Vec<TicketGroup>);

impl GroupedTickets {
    #[must_use]
    pub fn new(groups: Vec<TicketGroup>) -> Self {
        Self(groups)
    }

    /// Tickets for a label, if the label exists.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&[Ticket]> {
        self.0
            .iter()
            .find(|g| g.label == label)
            .map(|g| g.tickets.as_slice())
    }

    /// Group labels in order.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.0.iter().map(|g| g.label.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TicketGroup> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut TicketGroup> {
        self.0.iter_mut()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<TicketGroup> for GroupedTickets {
    fn from_iter<I: IntoIterator<Item = TicketGroup>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Denormalized ticket info attached to a reuse match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketSummary {
    pub title: String,
    pub task: String,
}

/// A prior ticket that could be reused for new work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReusableComponent {
    pub ticket_id: String,
    /// 0 (unrelated) to 10 (drop-in reuse)
    pub relevance_score: u8,
    pub adaptation_notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_details: Option<TicketSummary>,
}

impl ReusableComponent {
    /// Create a match, clamping the score to the 0-10 range.
    pub fn new(ticket_id: impl Into<String>, relevance_score: u8, adaptation_notes: impl Into<String>) -> Self {
        Self {
            ticket_id: ticket_id.into(),
            relevance_score: relevance_score.min(MAX_RELEVANCE),
            adaptation_notes: adaptation_notes.into(),
            ticket_details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, title: &str, task: &str) -> Self {
        self.ticket_details = Some(TicketSummary {
            title: title.to_string(),
            task: task.to_string(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ticket::Priority;

    #[test]
    fn test_group_lookup_preserves_order() {
        let grouped: GroupedTickets = [
            TicketGroup { label: "B".into(), tickets: vec![] },
            TicketGroup {
                label: "A".into(),
                tickets: vec![Ticket::new("x", "", Priority::HIGH)],
            },
        ]
        .into_iter()
        .collect();

        assert_eq!(grouped.labels(), vec!["B", "A"]);
        assert_eq!(grouped.get("A").map(<[Ticket]>::len), Some(1));
        assert!(grouped.get("C").is_none());
    }

    #[test]
    fn test_iter_mut_edits_in_place() {
        let mut grouped = GroupedTickets::new(vec![TicketGroup {
            label: "A".into(),
            tickets: vec![Ticket::new("x", "", Priority::HIGH)],
        }]);

        for group in grouped.iter_mut() {
            group.tickets.clear();
        }
        assert_eq!(grouped.get("A").map(<[Ticket]>::len), Some(0));
    }

    #[test]
    fn test_relevance_clamped() {
        let c = ReusableComponent::new("ticket_1", 42, "notes");
        assert_eq!(c.relevance_score, MAX_RELEVANCE);
    }
}
