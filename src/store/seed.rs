//! Demo data for a fresh board.

use crate::assistant::group_by_demo_themes;
use crate::model::{GroupedTickets, Priority, Task, Ticket, TicketStatus};

/// The two sample tasks a new board starts with.
#[must_use]
pub fn demo_tasks() -> Vec<Task> {
    vec![
        Task::new(
            "Build a company website",
            "Create a modern website for our startup with about, services, and contact pages.",
        )
        .with_id("task_1")
        .with_tickets(vec![
            Ticket::new(
                "Design homepage layout",
                "Create a clean, modern layout for the homepage featuring our brand colors, logo, and a compelling hero section.",
                Priority::HIGHEST,
            )
            .with_id("ticket_1")
            .with_tags(["design", "frontend", "ui/ux"])
            .with_estimated_time(120),
            Ticket::new(
                "Build about page",
                "Develop the about page with company history, mission statement, and team member profiles.",
                Priority::HIGH,
            )
            .with_id("ticket_2")
            .with_tags(["frontend", "content"])
            .with_estimated_time(90),
            Ticket::new(
                "Implement contact form",
                "Create a contact form with validation that sends emails to the company inbox.",
                Priority::HIGH,
            )
            .with_id("ticket_3")
            .with_status(TicketStatus::InProgress)
            .with_tags(["frontend", "backend", "forms"])
            .with_estimated_time(120),
            Ticket::new(
                "Optimize for mobile devices",
                "Ensure the website is fully responsive and works well on all mobile devices and screen sizes.",
                Priority::MEDIUM,
            )
            .with_id("ticket_4")
            .with_tags(["frontend", "responsive", "testing"])
            .with_estimated_time(180),
            Ticket::new(
                "Add SEO metadata",
                "Implement proper SEO metadata, sitemap, and optimize for search engines.",
                Priority::LOW,
            )
            .with_id("ticket_5")
            .with_status(TicketStatus::Done)
            .with_tags(["seo", "metadata"])
            .with_estimated_time(60),
        ]),
        Task::new(
            "Develop user authentication system",
            "Create a secure authentication system with login, registration, password reset, and social auth options.",
        )
        .with_id("task_2")
        .with_tickets(vec![
            Ticket::new(
                "Design auth UI screens",
                "Create login, registration, and password reset screen designs with consistent branding.",
                Priority::HIGHEST,
            )
            .with_id("ticket_6")
            .with_status(TicketStatus::Done)
            .with_tags(["design", "ui/ux", "auth"])
            .with_estimated_time(120),
            Ticket::new(
                "Implement JWT authentication",
                "Set up JWT-based authentication with proper token refresh and storage.",
                Priority::HIGHEST,
            )
            .with_id("ticket_7")
            .with_status(TicketStatus::InProgress)
            .with_tags(["backend", "security", "auth"])
            .with_estimated_time(240),
            Ticket::new(
                "Add social login options",
                "Integrate Google, Facebook, and Apple login options into the authentication flow.",
                Priority::MEDIUM,
            )
            .with_id("ticket_8")
            .with_tags(["frontend", "backend", "auth", "oauth"])
            .with_estimated_time(180),
        ]),
    ]
}

/// Grouped projection matching `tasks`, using the demo themes.
#[must_use]
pub fn demo_grouped(tasks: &[Task]) -> GroupedTickets {
    let tickets: Vec<Ticket> = tasks
        .iter()
        .flat_map(|task| task.tickets.iter().map(|t| t.clone().with_task(&task.title)))
        .collect();
    group_by_demo_themes(&tickets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_ids_unique() {
        let tasks = demo_tasks();
        assert_eq!(tasks.len(), 2);

        let ids: HashSet<_> = tasks.iter().flat_map(|t| t.tickets.iter().map(|k| k.id.clone())).collect();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn test_seed_groups_cover_all_tickets() {
        let grouped = demo_grouped(&demo_tasks());
        assert_eq!(grouped.len(), 4);
        assert_eq!(grouped.iter().map(|g| g.tickets.len()).sum::<usize>(), 8);
    }
}
