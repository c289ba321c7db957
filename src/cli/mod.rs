//! CLI definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for list/query commands.
#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table (default)
    #[default]
    Table,
    /// JSON (same as --json)
    Json,
    /// Comma-separated values
    Csv,
}

pub mod commands;

/// TaskGenius - break tasks into tickets and track them on a kanban board
#[derive(Parser, Debug)]
#[command(name = "tg", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Board file path (default: ~/.taskgenius/board.json)
    #[arg(long, global = true, env = "TG_BOARD")]
    pub board: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Output format (table, json, csv)
    #[arg(long, value_enum, global = true, default_value_t)]
    pub format: OutputFormat,

    /// Output only the ID (for scripting)
    #[arg(long, global = true)]
    pub silent: bool,

    /// Skip the simulated assistant latency
    #[arg(long, global = true)]
    pub no_delay: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Task management
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Ticket management
    Ticket {
        #[command(subcommand)]
        command: TicketCommands,
    },

    /// Show the kanban board
    Board {
        /// Only show tickets with this priority (1-5 or highest..lowest)
        #[arg(long, short)]
        priority: Option<String>,
    },

    /// Thematic ticket groups and completion strategies
    Group {
        #[command(subcommand)]
        command: GroupCommands,
    },

    /// Find existing tickets that could be reused for new work
    Reuse {
        /// Description of the new work
        description: String,
    },

    /// Manage the Gemini API key
    Key {
        #[command(subcommand)]
        command: KeyCommands,
    },

    /// Discard the board and start over with the demo tasks
    Reset {
        /// Start with an empty board instead
        #[arg(long)]
        empty: bool,
    },

    /// Print version information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ============================================================================
// Task Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a new task
    Create {
        /// Task title
        title: String,

        /// Task description
        #[arg(long, short, default_value = "")]
        description: String,

        /// Don't break the task into tickets, even with an API key set
        #[arg(long)]
        no_generate: bool,
    },

    /// List tasks
    List,

    /// Show task details and its tickets
    Show {
        /// Task ID
        id: String,
    },

    /// Replace a task's tickets with an AI breakdown
    Generate {
        /// Task ID
        id: String,
    },
}

// ============================================================================
// Ticket Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum TicketCommands {
    /// Move a ticket to another column
    Move {
        /// Ticket ID
        id: String,

        /// New status (todo, in_progress, done, ...)
        status: String,
    },

    /// Show ticket details
    Show {
        /// Ticket ID
        id: String,
    },
}

// ============================================================================
// Group Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum GroupCommands {
    /// Regroup all tickets by theme and list the groups
    List,

    /// Show the tickets in one group
    Show {
        /// Group label
        label: String,
    },

    /// Show a completion strategy for one group
    Strategy {
        /// Group label
        label: String,
    },
}

// ============================================================================
// Key Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum KeyCommands {
    /// Save the API key to the config file
    Set {
        /// Gemini API key
        key: String,
    },

    /// Remove the saved API key
    Clear,

    /// Show whether an API key is configured
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ticket_move() {
        let cli = Cli::parse_from(["tg", "ticket", "move", "ticket_1", "done", "--json"]);
        assert!(cli.json);
        match cli.command {
            Commands::Ticket {
                command: TicketCommands::Move { id, status },
            } => {
                assert_eq!(id, "ticket_1");
                assert_eq!(status, "done");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
