//! Data models for TaskGenius.
//!
//! This module contains all domain models:
//! - Task
//! - Ticket / TicketDraft
//! - KanbanBoard (derived projection)
//! - GroupedTickets / ReusableComponent (assistant insights)

pub mod insight;
pub mod kanban;
pub mod task;
pub mod ticket;

pub use insight::{GroupedTickets, ReusableComponent, TicketGroup, TicketSummary, MAX_RELEVANCE, NO_STRATEGY};
pub use kanban::KanbanBoard;
pub use task::Task;
pub use ticket::{Priority, Ticket, TicketDraft, TicketStatus};
