// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! minutelog - staged submission pipeline for a meeting-report log.
//!
//! This is the binary entry point.

mod board;
mod doctor;
mod shell;

use clap::{Parser, Subcommand};
use chrono::NaiveDate;

/// minutelog - staged submission pipeline for a meeting-report log.
#[derive(Parser, Debug)]
#[command(name = "minutelog", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch an interactive session (login, stage, commit).
    Shell,
    /// Print the record board, grouped by meeting date and department.
    Board {
        /// Show a single meeting date instead of all of them.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Print the resolved configuration as TOML.
    Config,
    /// Run diagnostic checks against the environment.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match minutelog_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            minutelog_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log.level);

    let result = match cli.command {
        Some(Commands::Shell) => shell::run_shell(config).await,
        Some(Commands::Board { date }) => board::run_board(&config, date).await,
        Some(Commands::Config) => {
            match toml::to_string_pretty(&config) {
                Ok(rendered) => {
                    print!("{rendered}");
                    Ok(())
                }
                Err(e) => Err(minutelog_core::MinutelogError::Internal(format!(
                    "failed to render config: {e}"
                ))),
            }
        }
        Some(Commands::Doctor { plain }) => doctor::run_doctor(&config, plain).await,
        None => {
            println!("minutelog: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber from the configured log level.
///
/// `RUST_LOG` takes precedence when set. Log output goes to stderr so it
/// never interleaves with board/REPL output.
fn init_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_board_with_date() {
        let cli = Cli::parse_from(["minutelog", "board", "--date", "2026-08-05"]);
        match cli.command {
            Some(Commands::Board { date }) => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2026, 8, 5));
            }
            other => panic!("expected board command, got: {other:?}"),
        }
    }

    #[test]
    fn cli_parses_bare_invocation() {
        let cli = Cli::parse_from(["minutelog"]);
        assert!(cli.command.is_none());
    }
}
