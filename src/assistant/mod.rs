//! Assistant module: the "AI" behind breakdowns and insights.
//!
//! The store talks to an assistant only through [`TaskAssistant`] (boxed as
//! [`BoxedAssistant`]), so the demo below and a real generative-model
//! integration are interchangeable.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   TaskStore      │
//! └────────┬─────────┘
//!          │  BreakdownRequest / &[Ticket]
//!          ▼
//! ┌──────────────────┐
//! │  BoxedAssistant  │
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │  DemoAssistant   │  ← static samples + simulated latency
//! └──────────────────┘
//! ```

pub mod demo;
pub mod provider;

pub use demo::{group_by_demo_themes, DemoAssistant};
pub use provider::{AssistantInfo, BoxedAssistant, BreakdownRequest, TaskAssistant};

use crate::config::{resolve_latency, resolve_model, TaskGeniusConfig};

/// Create the assistant described by the configuration.
#[must_use]
pub fn create_assistant(config: &TaskGeniusConfig, no_delay: bool) -> BoxedAssistant {
    let model = resolve_model(config);
    let latency = resolve_latency(config, no_delay);
    BoxedAssistant::new(DemoAssistant::new(model, latency))
}
