//! Error types for TaskGenius.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (3=not_found, 4=validation, 7=config, etc.)
//! - Retryability flags for scripted callers
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use thiserror::Error;

/// Result type alias for TaskGenius operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Scripts match on the string or the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Not Found (exit 3)
    TaskNotFound,
    TicketNotFound,
    GroupNotFound,

    // Validation (exit 4)
    InvalidStatus,
    InvalidPriority,
    RequiredField,

    // Config (exit 7)
    MissingCredential,
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Assistant (exit 9)
    AssistantError,
    GenerationInProgress,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::TicketNotFound => "TICKET_NOT_FOUND",
            Self::GroupNotFound => "GROUP_NOT_FOUND",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::InvalidPriority => "INVALID_PRIORITY",
            Self::RequiredField => "REQUIRED_FIELD",
            Self::MissingCredential => "MISSING_CREDENTIAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::AssistantError => "ASSISTANT_ERROR",
            Self::GenerationInProgress => "GENERATION_IN_PROGRESS",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::TaskNotFound | Self::TicketNotFound | Self::GroupNotFound => 3,
            Self::InvalidStatus | Self::InvalidPriority | Self::RequiredField => 4,
            Self::MissingCredential | Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
            Self::AssistantError | Self::GenerationInProgress => 9,
        }
    }

    /// Whether the caller should retry, either with corrected input or
    /// after the in-flight call settles.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::InvalidStatus
                | Self::InvalidPriority
                | Self::RequiredField
                | Self::AssistantError
                | Self::GenerationInProgress
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in TaskGenius operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Task not found: {id}")]
    TaskNotFound { id: String },

    #[error("Task not found: {id} (did you mean: {}?)", similar.join(", "))]
    TaskNotFoundSimilar { id: String, similar: Vec<String> },

    #[error("Ticket not found: {id}")]
    TicketNotFound { id: String },

    #[error("Ticket not found: {id} (did you mean: {}?)", similar.join(", "))]
    TicketNotFoundSimilar { id: String, similar: Vec<String> },

    #[error("Group not found: {label}")]
    GroupNotFound { label: String, available: Vec<String> },

    #[error("Invalid status: {input}")]
    InvalidStatus {
        input: String,
        suggestion: Option<String>,
    },

    #[error("Invalid priority: {0}")]
    InvalidPriority(String),

    #[error("{field} is required")]
    RequiredField { field: &'static str },

    #[error("No API key configured: tasks are added without AI breakdown")]
    MissingCredential,

    #[error("Ticket generation already in progress for task {task_id}")]
    GenerationInProgress { task_id: String },

    #[error("Assistant error: {0}")]
    Assistant(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::TaskNotFound { .. } | Self::TaskNotFoundSimilar { .. } => ErrorCode::TaskNotFound,
            Self::TicketNotFound { .. } | Self::TicketNotFoundSimilar { .. } => {
                ErrorCode::TicketNotFound
            }
            Self::GroupNotFound { .. } => ErrorCode::GroupNotFound,
            Self::InvalidStatus { .. } => ErrorCode::InvalidStatus,
            Self::InvalidPriority(_) => ErrorCode::InvalidPriority,
            Self::RequiredField { .. } => ErrorCode::RequiredField,
            Self::MissingCredential => ErrorCode::MissingCredential,
            Self::GenerationInProgress { .. } => ErrorCode::GenerationInProgress,
            Self::Assistant(_) => ErrorCode::AssistantError,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Whether this error only degrades the result instead of failing the
    /// request outright. The CLI prints these as notices.
    #[must_use]
    pub const fn is_notice(&self) -> bool {
        matches!(self, Self::MissingCredential)
    }

    /// Context-aware recovery hint for humans and scripts.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::TaskNotFound { id } => Some(format!(
                "No task with ID '{id}'. Use `tg task list` to see available tasks."
            )),
            Self::TicketNotFound { id } => Some(format!(
                "No ticket with ID '{id}'. Use `tg board` to see all tickets."
            )),
            Self::TaskNotFoundSimilar { similar, .. }
            | Self::TicketNotFoundSimilar { similar, .. } => {
                Some(format!("Did you mean: {}?", similar.join(", ")))
            }

            Self::GroupNotFound { available, .. } => {
                if available.is_empty() {
                    Some("No groups yet. Run `tg group list` to group tickets.".to_string())
                } else {
                    Some(format!("Known groups: {}", available.join(", ")))
                }
            }

            Self::InvalidStatus { suggestion, .. } => {
                let mut hint = String::from(
                    "Valid statuses: \"To Do\", \"In Progress\", \"Done\". \
                     Synonyms: todo, wip, doing, complete",
                );
                if let Some(s) = suggestion {
                    hint.push_str(&format!("\n  Did you mean: {s}?"));
                }
                Some(hint)
            }

            Self::InvalidPriority(_) => {
                Some("Valid priorities: 1-5, P1-P5, or: highest, high, medium, low, lowest".to_string())
            }

            Self::MissingCredential => Some(
                "Set a Gemini API key to break tasks down with AI:\n  \
                 tg key set <api-key>   (or export GEMINI_API_KEY)"
                    .to_string(),
            ),

            Self::GenerationInProgress { task_id } => Some(format!(
                "Wait for the current breakdown of '{task_id}' to finish, then try again."
            )),

            Self::Assistant(_) => Some("The assistant call failed. Please try again.".to_string()),

            Self::RequiredField { .. }
            | Self::Io(_)
            | Self::Json(_)
            | Self::Config(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    ///
    /// Includes error code, message, retryability, exit code, and
    /// optional recovery hint.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_category() {
        assert_eq!(Error::TaskNotFound { id: "task_9".into() }.exit_code(), 3);
        assert_eq!(Error::RequiredField { field: "title" }.exit_code(), 4);
        assert_eq!(Error::MissingCredential.exit_code(), 7);
        assert_eq!(Error::Assistant("boom".into()).exit_code(), 9);
    }

    #[test]
    fn test_structured_json_includes_hint() {
        let err = Error::TicketNotFoundSimilar {
            id: "ticket_10".into(),
            similar: vec!["ticket_1".into()],
        };
        let json = err.to_structured_json();
        assert_eq!(json["error"]["code"], "TICKET_NOT_FOUND");
        assert_eq!(json["error"]["retryable"], false);
        assert!(json["error"]["hint"].as_str().unwrap().contains("ticket_1"));
    }

    #[test]
    fn test_missing_credential_is_notice() {
        assert!(Error::MissingCredential.is_notice());
        assert!(!Error::TaskNotFound { id: "x".into() }.is_notice());
    }
}
