//! Demo assistant.
//!
//! Serves fixed sample responses after a simulated delay. Breakdowns follow
//! five stages derived from the task title; grouping, strategies and reuse
//! matches are static lookups keyed to the seeded demo tickets.

use std::time::Duration;
use tracing::debug;

use super::provider::{AssistantInfo, BreakdownRequest, TaskAssistant};
use crate::config::Latency;
use crate::error::Result;
use crate::model::{GroupedTickets, Priority, ReusableComponent, Ticket, TicketDraft, TicketGroup};

/// Static theme assignments: group label and the ticket ids it collects.
const DEMO_GROUPS: &[(&str, &[&str])] = &[
    ("UI Design Tasks", &["ticket_1", "ticket_6"]),
    ("Authentication Implementation", &["ticket_7", "ticket_8"]),
    ("Website Content Development", &["ticket_2", "ticket_5"]),
    ("Technical Implementation", &["ticket_3", "ticket_4"]),
];

const DEMO_STRATEGIES: &[(&str, &str)] = &[
    (
        "UI Design Tasks",
        "1. Recommended order: Start with the homepage layout first, then move to the auth UI screens.\n\n\
         2. Parallel work: These tasks can be worked on in parallel if different designers are available.\n\n\
         3. Efficiency tips: Create a shared design system first to ensure consistency across both tasks. Use the same color scheme, typography, and component styles.\n\n\
         4. Estimated time: About 4-5 hours total for both tasks.\n\n\
         5. Recommended tools: Figma for design collaboration, Unsplash for stock imagery, and Material Design or Apple's Human Interface Guidelines for reference.",
    ),
    (
        "Authentication Implementation",
        "1. Recommended order: Implement the JWT authentication first, then add social login options.\n\n\
         2. Dependencies: Social login requires the base authentication system to be in place first.\n\n\
         3. Efficiency tips: Use an authentication library rather than building from scratch. Consider Auth0 or Firebase Authentication.\n\n\
         4. Estimated time: 7-8 hours total for both tasks.\n\n\
         5. Security considerations: Implement proper token storage, CSRF protection, and secure password handling.",
    ),
    (
        "Website Content Development",
        "1. Recommended order: Build the about page first, then add SEO metadata once content is finalized.\n\n\
         2. Parallel work: These tasks can be handled simultaneously if resources allow.\n\n\
         3. Efficiency tips: Prepare all content in advance before implementation. Use a CMS if frequent content updates are expected.\n\n\
         4. Estimated time: 2.5 hours total for both tasks.\n\n\
         5. Content strategy: Focus on clear, concise messaging that aligns with brand voice and SEO goals.",
    ),
    (
        "Technical Implementation",
        "1. Recommended order: First implement the contact form, then optimize for mobile devices.\n\n\
         2. Parallel work: These could be done in parallel by different team members.\n\n\
         3. Efficiency tips: Build the contact form with responsive design in mind from the start. Use a CSS framework like Tailwind for responsive utilities.\n\n\
         4. Estimated time: About 5 hours total for both tasks.\n\n\
         5. Testing approach: Test the contact form on multiple browsers and devices. Use tools like BrowserStack for device testing.",
    ),
];

/// Assistant that answers from built-in samples.
#[derive(Debug, Clone)]
pub struct DemoAssistant {
    model: String,
    latency: Latency,
}

impl DemoAssistant {
    /// Create a demo assistant reporting `model` and sleeping per `latency`.
    pub fn new(model: impl Into<String>, latency: Latency) -> Self {
        Self {
            model: model.into(),
            latency,
        }
    }

    async fn simulate(delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for DemoAssistant {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MODEL, Latency::default())
    }
}

/// Collect tickets into the static demo themes.
///
/// Themes whose tickets are all missing from `tickets` are left out.
#[must_use]
pub fn group_by_demo_themes(tickets: &[Ticket]) -> GroupedTickets {
    DEMO_GROUPS
        .iter()
        .map(|(label, ids)| TicketGroup {
            label: (*label).to_string(),
            tickets: ids
                .iter()
                .filter_map(|id| tickets.iter().find(|t| t.id == *id).cloned())
                .collect(),
        })
        .filter(|g| !g.tickets.is_empty())
        .collect()
}

/// The five-stage breakdown: research, design, implementation, testing,
/// deployment.
fn stage_drafts(title: &str) -> Vec<TicketDraft> {
    let draft = |title: String, description: &str, priority: Priority, minutes: u32, tags: &[&str]| TicketDraft {
        title,
        description: description.to_string(),
        priority,
        estimated_time: Some(minutes),
        tags: tags.iter().map(|t| (*t).to_string()).collect(),
    };

    vec![
        draft(
            format!("Research for {title}"),
            "Conduct initial research to gather requirements and references.",
            Priority::HIGHEST,
            90,
            &["research", "planning"],
        ),
        draft(
            format!("Design UI for {title}"),
            "Create mockups and design specifications.",
            Priority::HIGH,
            180,
            &["design", "ui/ux"],
        ),
        draft(
            format!("Implement {title}"),
            "Code the main functionality based on the design specs.",
            Priority::HIGH,
            240,
            &["development", "implementation"],
        ),
        draft(
            format!("Test {title}"),
            "Conduct thorough testing to ensure quality and functionality.",
            Priority::MEDIUM,
            120,
            &["testing", "qa"],
        ),
        draft(
            format!("Deploy {title}"),
            "Release to production and verify the rollout.",
            Priority::MEDIUM,
            60,
            &["deployment", "devops"],
        ),
    ]
}

impl TaskAssistant for DemoAssistant {
    fn info(&self) -> AssistantInfo {
        AssistantInfo {
            name: "demo".to_string(),
            model: self.model.clone(),
        }
    }

    async fn breakdown(&self, request: &BreakdownRequest) -> Result<Vec<TicketDraft>> {
        debug!(model = %request.model, prompt_len = request.prompt().len(), "Demo breakdown");
        Self::simulate(self.latency.breakdown).await;
        Ok(stage_drafts(request.title.trim()))
    }

    async fn group(&self, tickets: &[Ticket]) -> Result<GroupedTickets> {
        Self::simulate(self.latency.group).await;

        let grouped = group_by_demo_themes(tickets);
        debug!(groups = grouped.len(), input = tickets.len(), "Demo grouping");
        Ok(grouped)
    }

    async fn completion_strategy(&self, label: &str, _tickets: &[Ticket]) -> Result<Option<String>> {
        Self::simulate(self.latency.strategy).await;
        Ok(DEMO_STRATEGIES
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, text)| (*text).to_string()))
    }

    async fn find_reusable(&self, description: &str, _tickets: &[Ticket]) -> Result<Vec<ReusableComponent>> {
        debug!(description_len = description.len(), "Demo reuse search");
        Self::simulate(self.latency.reuse).await;

        Ok(vec![
            ReusableComponent::new(
                "ticket_1",
                8,
                "The homepage layout design can be repurposed by adapting the color scheme and hero section while maintaining the overall structure.",
            )
            .with_details("Design homepage layout", "Build a company website"),
            ReusableComponent::new(
                "ticket_3",
                7,
                "The contact form implementation can be reused with minimal modifications to field validation and submission handling.",
            )
            .with_details("Implement contact form", "Build a company website"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed::demo_tasks;

    fn assistant() -> DemoAssistant {
        DemoAssistant::new("test-model", Latency::none())
    }

    fn annotated_demo_tickets() -> Vec<Ticket> {
        demo_tasks()
            .into_iter()
            .flat_map(|task| {
                let title = task.title.clone();
                task.tickets.into_iter().map(move |t| t.with_task(&title))
            })
            .collect()
    }

    #[tokio::test]
    async fn test_breakdown_has_five_stages() {
        let request = BreakdownRequest {
            title: "Launch blog".into(),
            description: String::new(),
            model: "test-model".into(),
        };
        let drafts = assistant().breakdown(&request).await.unwrap();

        let titles: Vec<_> = drafts.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Research for Launch blog",
                "Design UI for Launch blog",
                "Implement Launch blog",
                "Test Launch blog",
                "Deploy Launch blog",
            ]
        );
        let priorities: Vec<u8> = drafts.iter().map(|d| d.priority.value()).collect();
        assert_eq!(priorities, vec![1, 2, 2, 3, 3]);
    }

    #[tokio::test]
    async fn test_group_demo_tickets() {
        let grouped = assistant().group(&annotated_demo_tickets()).await.unwrap();

        assert_eq!(
            grouped.labels(),
            vec![
                "UI Design Tasks",
                "Authentication Implementation",
                "Website Content Development",
                "Technical Implementation",
            ]
        );
        let ui = grouped.get("UI Design Tasks").unwrap();
        assert_eq!(ui.len(), 2);
        assert_eq!(ui[1].task.as_deref(), Some("Develop user authentication system"));
    }

    #[tokio::test]
    async fn test_group_skips_missing_tickets() {
        let grouped = assistant().group(&[]).await.unwrap();
        assert!(grouped.is_empty());
    }

    #[tokio::test]
    async fn test_strategy_lookup() {
        let a = assistant();
        let known = a.completion_strategy("UI Design Tasks", &[]).await.unwrap();
        assert!(known.unwrap().starts_with("1. Recommended order: Start with the homepage layout"));
        assert!(a.completion_strategy("Nonexistent Group", &[]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reusable_results_are_static() {
        let a = assistant();
        let first = a.find_reusable("a blog", &[]).await.unwrap();
        let second = a.find_reusable("something else entirely", &[]).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].relevance_score, 8);
        assert_eq!(first[1].ticket_id, "ticket_3");
    }
}
