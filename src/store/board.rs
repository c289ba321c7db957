//! The task store.
//!
//! Single source of truth for tasks and tickets. Every mutation goes through
//! here and rebuilds the kanban projection before the lock is released.
//! State sits behind a mutex that is never held across an await point, so
//! each mutation is atomic with respect to the others.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::in_flight::InFlight;
use super::snapshot::BoardSnapshot;
use crate::assistant::{BoxedAssistant, BreakdownRequest};
use crate::config::{remove_credential, store_credential, ApiKey};
use crate::error::{Error, Result};
use crate::model::{
    GroupedTickets, KanbanBoard, Priority, ReusableComponent, Task, Ticket, TicketDraft,
    TicketGroup, TicketStatus, TicketSummary, MAX_RELEVANCE, NO_STRATEGY,
};
use crate::validate::{find_similar_ids, require_non_empty};

#[derive(Debug)]
struct BoardState {
    tasks: Vec<Task>,
    kanban: KanbanBoard,
    grouped: GroupedTickets,
    credential: Option<ApiKey>,
}

impl BoardState {
    fn refresh_kanban(&mut self) {
        self.kanban = KanbanBoard::from_tasks(&self.tasks);
    }

    fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == task_id)
    }

    /// Keep only grouped tickets still on the board, refreshed from their
    /// live copies. Groups left empty are dropped.
    fn reconcile_grouped(&self, grouped: &GroupedTickets) -> GroupedTickets {
        let live = self.annotated_tickets();
        grouped
            .iter()
            .filter_map(|g| {
                let tickets: Vec<Ticket> = g
                    .tickets
                    .iter()
                    .filter_map(|t| live.iter().find(|l| l.id == t.id).cloned())
                    .collect();
                (!tickets.is_empty()).then(|| TicketGroup {
                    label: g.label.clone(),
                    tickets,
                })
            })
            .collect()
    }

    /// Every ticket in task order, annotated with its task's title.
    fn annotated_tickets(&self) -> Vec<Ticket> {
        self.tasks
            .iter()
            .flat_map(|task| task.tickets.iter().map(|t| t.clone().with_task(&task.title)))
            .collect()
    }

    fn task_not_found(&self, task_id: &str) -> Error {
        let ids: Vec<String> = self.tasks.iter().map(|t| t.id.clone()).collect();
        let similar = find_similar_ids(task_id, &ids, 3);
        if similar.is_empty() {
            Error::TaskNotFound { id: task_id.to_string() }
        } else {
            Error::TaskNotFoundSimilar {
                id: task_id.to_string(),
                similar,
            }
        }
    }
}

/// Handle to the shared board state.
///
/// Cloning is cheap; clones see the same tasks, credential and in-flight
/// markers.
#[derive(Debug, Clone)]
pub struct TaskStore {
    state: Arc<Mutex<BoardState>>,
    assistant: Arc<BoxedAssistant>,
    in_flight: InFlight,
    credential_file: Option<PathBuf>,
    create_delay: Duration,
}

impl TaskStore {
    /// Create a store over `snapshot`, answering AI calls with `assistant`.
    #[must_use]
    pub fn new(snapshot: BoardSnapshot, assistant: BoxedAssistant) -> Self {
        let mut state = BoardState {
            tasks: snapshot.tasks,
            kanban: KanbanBoard::default(),
            grouped: snapshot.grouped,
            credential: None,
        };
        state.refresh_kanban();

        Self {
            state: Arc::new(Mutex::new(state)),
            assistant: Arc::new(assistant),
            in_flight: InFlight::default(),
            credential_file: None,
            create_delay: Duration::ZERO,
        }
    }

    /// Start with a credential already configured.
    #[must_use]
    pub fn with_credential(self, credential: Option<ApiKey>) -> Self {
        self.lock().credential = credential;
        self
    }

    /// Persist credential changes to this config file.
    #[must_use]
    pub fn with_credential_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.credential_file = Some(path.into());
        self
    }

    /// Simulated latency of `create_task`.
    #[must_use]
    pub fn with_create_delay(mut self, delay: Duration) -> Self {
        self.create_delay = delay;
        self
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Read access ──────────────────────────────────────────

    /// All tasks in creation order.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.lock().tasks.clone()
    }

    /// One task by identifier.
    #[must_use]
    pub fn task(&self, task_id: &str) -> Option<Task> {
        self.lock().tasks.iter().find(|t| t.id == task_id).cloned()
    }

    /// One ticket by identifier, annotated with its task's title.
    #[must_use]
    pub fn ticket(&self, ticket_id: &str) -> Option<Ticket> {
        let state = self.lock();
        state
            .tasks
            .iter()
            .find_map(|task| task.ticket(ticket_id).map(|t| t.clone().with_task(&task.title)))
    }

    /// The kanban projection.
    #[must_use]
    pub fn kanban(&self) -> KanbanBoard {
        self.lock().kanban.clone()
    }

    /// The grouped projection.
    #[must_use]
    pub fn grouped(&self) -> GroupedTickets {
        self.lock().grouped.clone()
    }

    /// Identifiers of all tasks.
    #[must_use]
    pub fn task_ids(&self) -> Vec<String> {
        self.lock().tasks.iter().map(|t| t.id.clone()).collect()
    }

    /// Identifiers of all tickets across tasks.
    #[must_use]
    pub fn ticket_ids(&self) -> Vec<String> {
        self.lock()
            .tasks
            .iter()
            .flat_map(|t| t.tickets.iter().map(|k| k.id.clone()))
            .collect()
    }

    /// Serializable copy of the state.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        let state = self.lock();
        BoardSnapshot::new(state.tasks.clone(), state.grouped.clone())
    }

    /// Replace tasks and groups with `snapshot`, keeping the credential and
    /// in-flight markers.
    pub fn reload(&self, snapshot: BoardSnapshot) {
        let mut state = self.lock();
        state.tasks = snapshot.tasks;
        state.grouped = snapshot.grouped;
        state.refresh_kanban();
    }

    /// Whether a breakdown is currently running for `task_id`.
    #[must_use]
    pub fn is_generating(&self, task_id: &str) -> bool {
        self.in_flight.contains(task_id)
    }

    // ── Credential ───────────────────────────────────────────

    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.lock().credential.is_some()
    }

    /// Set the credential, writing it to the config file first when the
    /// store has one.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the config file cannot be written; the
    /// in-memory credential is then unchanged.
    pub fn set_credential(&self, key: ApiKey) -> Result<()> {
        if let Some(path) = &self.credential_file {
            store_credential(path, &key)?;
        }
        self.lock().credential = Some(key);
        info!(persisted = self.credential_file.is_some(), "API key set");
        Ok(())
    }

    /// Forget the credential.
    ///
    /// Returns whether a key was removed: from the config file when the
    /// store has one, otherwise from memory.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the config file cannot be read or written.
    pub fn clear_credential(&self) -> Result<bool> {
        let removed_file = match &self.credential_file {
            Some(path) => Some(remove_credential(path)?),
            None => None,
        };
        let had_key = self.lock().credential.take().is_some();

        let removed = removed_file.unwrap_or(had_key);
        if removed {
            info!("API key cleared");
        }
        Ok(removed)
    }

    // ── Task operations ──────────────────────────────────────

    /// Create a task and append it to the board.
    ///
    /// The title must already be validated as non-empty. Without a
    /// credential the task gets one default ticket; with one it starts
    /// empty, waiting for [`generate_tickets`](Self::generate_tickets).
    pub async fn create_task(&self, title: &str, description: &str) -> Task {
        if !self.create_delay.is_zero() {
            tokio::time::sleep(self.create_delay).await;
        }

        let mut task = Task::new(title, description);
        if !self.has_credential() {
            task.tickets.push(default_ticket(&task));
        }
        self.insert_task(task.clone());

        info!(task_id = %task.id, tickets = task.tickets.len(), "Task created");
        task
    }

    /// Append an already built task, replacing any task with the same id.
    pub fn insert_task(&self, task: Task) {
        let mut state = self.lock();
        match state.tasks.iter().position(|t| t.id == task.id) {
            Some(i) => state.tasks[i] = task,
            None => state.tasks.push(task),
        }
        state.refresh_kanban();
    }

    /// Replace a task's tickets with the assistant's breakdown.
    ///
    /// # Errors
    ///
    /// - `Error::MissingCredential` if no API key is configured
    /// - `Error::TaskNotFound` / `TaskNotFoundSimilar` for an unknown id
    /// - `Error::GenerationInProgress` if a breakdown for this task is
    ///   already running
    /// - `Error::Assistant` if the assistant fails or returns nothing
    ///
    /// On any error the task is left unchanged.
    pub async fn generate_tickets(&self, task_id: &str) -> Result<Vec<Ticket>> {
        let request = {
            let state = self.lock();
            if state.credential.is_none() {
                debug!(task_id, "Ticket generation skipped: no API key");
                return Err(Error::MissingCredential);
            }

            let task = state
                .tasks
                .iter()
                .find(|t| t.id == task_id)
                .ok_or_else(|| state.task_not_found(task_id))?;

            BreakdownRequest {
                title: task.title.clone(),
                description: task.description.clone(),
                model: self.assistant.info().model,
            }
        };

        let _guard = self
            .in_flight
            .try_acquire(task_id)
            .ok_or_else(|| Error::GenerationInProgress {
                task_id: task_id.to_string(),
            })?;

        debug!(task_id, "Requesting breakdown");
        let drafts = self.assistant.breakdown(&request).await.map_err(|e| {
            warn!(task_id, error = %e, "Breakdown failed");
            e
        })?;

        if drafts.is_empty() {
            return Err(Error::Assistant("assistant returned no tickets".into()));
        }

        let tickets: Vec<Ticket> = drafts.into_iter().map(TicketDraft::into_ticket).collect();
        self.replace_tickets(task_id, tickets.clone())?;

        info!(task_id, count = tickets.len(), "Tickets generated");
        Ok(tickets)
    }

    /// Swap a task's whole ticket list.
    ///
    /// # Errors
    ///
    /// Returns `Error::TaskNotFound` / `TaskNotFoundSimilar` if the task is
    /// gone; nothing changes.
    pub fn replace_tickets(&self, task_id: &str, tickets: Vec<Ticket>) -> Result<()> {
        let mut state = self.lock();
        let Some(task) = state.task_mut(task_id) else {
            return Err(state.task_not_found(task_id));
        };
        task.tickets = tickets;
        state.refresh_kanban();
        Ok(())
    }

    /// Move a ticket to another column.
    ///
    /// Returns the previous status, or `None` (and changes nothing) if no
    /// ticket has that identifier.
    pub fn update_ticket_status(&self, ticket_id: &str, status: TicketStatus) -> Option<TicketStatus> {
        let mut state = self.lock();

        let previous = state
            .tasks
            .iter_mut()
            .find_map(|task| task.ticket_mut(ticket_id))
            .map(|ticket| std::mem::replace(&mut ticket.status, status))?;

        state.refresh_kanban();
        sync_grouped_status(&mut state.grouped, ticket_id, status);
        drop(state);

        info!(ticket_id, from = %previous, to = %status, "Ticket moved");
        Some(previous)
    }

    // ── Grouping & insights ──────────────────────────────────

    /// Regroup every ticket by theme and store the result.
    ///
    /// # Errors
    ///
    /// Propagates the assistant's failure; the previous grouping is kept.
    pub async fn group_tickets(&self) -> Result<GroupedTickets> {
        let tickets = self.lock().annotated_tickets();

        let grouped = self.assistant.group(&tickets).await.map_err(|e| {
            warn!(error = %e, "Grouping failed");
            e
        })?;

        let grouped = self.set_grouped(&grouped);
        info!(groups = grouped.len(), tickets = tickets.len(), "Tickets grouped");
        Ok(grouped)
    }

    /// Store a grouping, reconciled against the tickets currently on the
    /// board. Returns what was stored.
    pub fn set_grouped(&self, grouped: &GroupedTickets) -> GroupedTickets {
        let mut state = self.lock();
        let grouped = state.reconcile_grouped(grouped);
        state.grouped = grouped.clone();
        grouped
    }

    /// Advice for completing a group. Never fails: unknown labels and
    /// assistant errors yield the generic fallback text.
    pub async fn completion_strategy(&self, label: &str) -> String {
        let tickets = self.grouped().get(label).map(<[Ticket]>::to_vec).unwrap_or_default();

        match self.assistant.completion_strategy(label, &tickets).await {
            Ok(Some(strategy)) => strategy,
            Ok(None) => {
                debug!(label, "No strategy for group");
                NO_STRATEGY.to_string()
            }
            Err(e) => {
                warn!(label, error = %e, "Strategy lookup failed");
                NO_STRATEGY.to_string()
            }
        }
    }

    /// Find prior tickets that could be reused for the described work.
    ///
    /// Matches missing a ticket summary are filled in from the board.
    ///
    /// # Errors
    ///
    /// - `Error::RequiredField` if `description` is blank
    /// - `Error::Assistant` if the assistant fails
    pub async fn find_reusable_components(&self, description: &str) -> Result<Vec<ReusableComponent>> {
        let description = require_non_empty("description", description)?;
        let tickets = self.lock().annotated_tickets();

        let mut results = self
            .assistant
            .find_reusable(description, &tickets)
            .await
            .map_err(|e| {
                warn!(error = %e, "Reuse search failed");
                e
            })?;

        for result in &mut results {
            result.relevance_score = result.relevance_score.min(MAX_RELEVANCE);
            if result.ticket_details.is_none() {
                result.ticket_details = tickets.iter().find(|t| t.id == result.ticket_id).map(|t| {
                    TicketSummary {
                        title: t.title.clone(),
                        task: t.task.clone().unwrap_or_default(),
                    }
                });
            }
        }

        info!(count = results.len(), "Reuse search complete");
        Ok(results)
    }
}

/// The single ticket a task gets when no AI breakdown is available.
fn default_ticket(task: &Task) -> Ticket {
    let description = if task.description.trim().is_empty() {
        task.title.clone()
    } else {
        task.description.clone()
    };

    Ticket::new(task.title.clone(), description, Priority::HIGHEST)
}

fn sync_grouped_status(grouped: &mut GroupedTickets, ticket_id: &str, status: TicketStatus) {
    for t in grouped
        .iter_mut()
        .flat_map(|g| g.tickets.iter_mut())
        .filter(|t| t.id == ticket_id)
    {
        t.status = status;
    }
}
