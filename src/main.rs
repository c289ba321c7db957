//! TaskGenius CLI entry point.

use clap::Parser;
use std::process::ExitCode;
use tg::cli::commands;
use tg::cli::{Cli, Commands, OutputFormat};
use tg::error::Error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.silent {
        tg::SILENT.store(true, std::sync::atomic::Ordering::Relaxed);
    }
    if cli.format == OutputFormat::Csv {
        tg::CSV_OUTPUT.store(true, std::sync::atomic::Ordering::Relaxed);
    }
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Effective JSON mode: --json OR --format json
    let json = cli.json || cli.format == OutputFormat::Json;

    // Set up tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet, json);

    match run(&cli, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool, json: bool) {
    use tracing_subscriber::EnvFilter;

    let rust_log = std::env::var("RUST_LOG").is_ok();

    // JSON mode keeps stderr for the structured error unless logs were asked for
    if quiet || (json && verbose == 0 && !rust_log) {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if rust_log {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli, json: bool) -> Result<(), Error> {
    let board = cli.board.as_ref();

    match &cli.command {
        Commands::Task { command } => commands::task::execute(command, board, cli.no_delay, json),
        Commands::Ticket { command } => commands::ticket::execute(command, board, json),
        Commands::Board { priority } => commands::board::execute(priority.as_deref(), board, json),
        Commands::Group { command } => commands::group::execute(command, board, cli.no_delay, json),
        Commands::Reuse { description } => commands::reuse::execute(description, board, cli.no_delay, json),
        Commands::Key { command } => commands::key::execute(command, board, json),
        Commands::Reset { empty } => commands::reset::execute(*empty, board, json),
        Commands::Version => commands::version::execute(json),
        Commands::Completions { shell } => commands::completions::execute(shell),
    }
}
