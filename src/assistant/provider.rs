//! Assistant trait.
//!
//! Defines the narrow interface between the store and whatever produces
//! breakdowns and insights: prompt in, structured drafts out. Uses async
//! methods so an HTTP-backed implementation can slot in beside the demo.

use serde::Serialize;
use std::future::Future;
use std::pin::Pin;

use crate::error::Result;
use crate::model::{GroupedTickets, ReusableComponent, Ticket, TicketDraft};

/// Assistant metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistantInfo {
    pub name: String,
    pub model: String,
}

/// A request to break a task down into ticket drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownRequest {
    pub title: String,
    pub description: String,
    pub model: String,
}

impl BreakdownRequest {
    /// Render the prompt sent to a generative model.
    #[must_use]
    pub fn prompt(&self) -> String {
        let description = if self.description.trim().is_empty() {
            "(no description)"
        } else {
            self.description.trim()
        };

        format!(
            "Break the following task into 3-7 actionable tickets.\n\
             Task: {}\n\
             Description: {description}\n\n\
             Respond with a JSON array. Each element has: \"title\" (string), \
             \"description\" (string), \"priority\" (integer 1-5, 1 = highest), \
             \"estimated_time\" (integer minutes), \"tags\" (array of strings).",
            self.title.trim()
        )
    }
}

/// Trait for task assistants.
///
/// The trait is not object-safe because of its `impl Future` returns; use
/// [`BoxedAssistant`] for runtime selection.
pub trait TaskAssistant: Send + Sync {
    /// Get assistant metadata.
    fn info(&self) -> AssistantInfo;

    /// Break a task down into ticket drafts, in execution order.
    fn breakdown(
        &self,
        request: &BreakdownRequest,
    ) -> impl Future<Output = Result<Vec<TicketDraft>>> + Send;

    /// Group tickets by theme. Tickets carry their owning task's title.
    fn group(&self, tickets: &[Ticket]) -> impl Future<Output = Result<GroupedTickets>> + Send;

    /// Advice for completing a group, or `None` when the assistant has
    /// nothing specific for that label.
    fn completion_strategy(
        &self,
        label: &str,
        tickets: &[Ticket],
    ) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Find prior tickets that could be reused for the described work.
    fn find_reusable(
        &self,
        description: &str,
        tickets: &[Ticket],
    ) -> impl Future<Output = Result<Vec<ReusableComponent>>> + Send;
}

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Object-safe version of `TaskAssistant` for boxing.
trait TaskAssistantBoxed: Send + Sync {
    fn info(&self) -> AssistantInfo;
    fn breakdown_boxed(&self, request: BreakdownRequest) -> BoxFuture<'_, Result<Vec<TicketDraft>>>;
    fn group_boxed(&self, tickets: Vec<Ticket>) -> BoxFuture<'_, Result<GroupedTickets>>;
    fn completion_strategy_boxed(
        &self,
        label: String,
        tickets: Vec<Ticket>,
    ) -> BoxFuture<'_, Result<Option<String>>>;
    fn find_reusable_boxed(
        &self,
        description: String,
        tickets: Vec<Ticket>,
    ) -> BoxFuture<'_, Result<Vec<ReusableComponent>>>;
}

/// Boxed assistant for dynamic dispatch.
pub struct BoxedAssistant {
    inner: Box<dyn TaskAssistantBoxed>,
}

impl BoxedAssistant {
    /// Box any assistant.
    pub fn new<A: TaskAssistant + 'static>(assistant: A) -> Self {
        Self {
            inner: Box::new(BoxedAssistantWrapper(assistant)),
        }
    }

    #[must_use]
    pub fn info(&self) -> AssistantInfo {
        self.inner.info()
    }

    /// Break a task down into ticket drafts.
    ///
    /// # Errors
    ///
    /// Propagates the assistant's failure.
    pub async fn breakdown(&self, request: &BreakdownRequest) -> Result<Vec<TicketDraft>> {
        self.inner.breakdown_boxed(request.clone()).await
    }

    /// Group tickets by theme.
    ///
    /// # Errors
    ///
    /// Propagates the assistant's failure.
    pub async fn group(&self, tickets: &[Ticket]) -> Result<GroupedTickets> {
        self.inner.group_boxed(tickets.to_vec()).await
    }

    /// Advice for completing a group.
    ///
    /// # Errors
    ///
    /// Propagates the assistant's failure.
    pub async fn completion_strategy(&self, label: &str, tickets: &[Ticket]) -> Result<Option<String>> {
        self.inner
            .completion_strategy_boxed(label.to_string(), tickets.to_vec())
            .await
    }

    /// Find reusable prior tickets.
    ///
    /// # Errors
    ///
    /// Propagates the assistant's failure.
    pub async fn find_reusable(&self, description: &str, tickets: &[Ticket]) -> Result<Vec<ReusableComponent>> {
        self.inner
            .find_reusable_boxed(description.to_string(), tickets.to_vec())
            .await
    }
}

impl std::fmt::Debug for BoxedAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxedAssistant").field("info", &self.info()).finish()
    }
}

/// Wrapper to implement `TaskAssistantBoxed` for any `TaskAssistant`.
///
/// Arguments are taken owned so the returned futures only borrow `self`.
struct BoxedAssistantWrapper<A: TaskAssistant + 'static>(A);

impl<A: TaskAssistant + 'static> TaskAssistantBoxed for BoxedAssistantWrapper<A> {
    fn info(&self) -> AssistantInfo {
        self.0.info()
    }

    fn breakdown_boxed(&self, request: BreakdownRequest) -> BoxFuture<'_, Result<Vec<TicketDraft>>> {
        Box::pin(async move { self.0.breakdown(&request).await })
    }

    fn group_boxed(&self, tickets: Vec<Ticket>) -> BoxFuture<'_, Result<GroupedTickets>> {
        Box::pin(async move { self.0.group(&tickets).await })
    }

    fn completion_strategy_boxed(
        &self,
        label: String,
        tickets: Vec<Ticket>,
    ) -> BoxFuture<'_, Result<Option<String>>> {
        Box::pin(async move { self.0.completion_strategy(&label, &tickets).await })
    }

    fn find_reusable_boxed(
        &self,
        description: String,
        tickets: Vec<Ticket>,
    ) -> BoxFuture<'_, Result<Vec<ReusableComponent>>> {
        Box::pin(async move { self.0.find_reusable(&description, &tickets).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_task_and_schema() {
        let request = BreakdownRequest {
            title: "Build a company website".into(),
            description: String::new(),
            model: "gemini-1.5-flash".into(),
        };
        let prompt = request.prompt();
        assert!(prompt.contains("Task: Build a company website"));
        assert!(prompt.contains("(no description)"));
        assert!(prompt.contains("\"priority\""));
    }
}
