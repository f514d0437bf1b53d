//! Migratassert CLI - migrate Tablassert v4.4.0 configurations to TC3
//!
//! This is the main entry point for the Migratassert CLI application,
//! providing the batch `migrate` command plus configuration and shell
//! completion helpers.
//!
//! Copyright (c) 2025 Migratassert Team
//! Licensed under the Apache-2.0 license

mod batch;
mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // The config file also carries logging and color settings
    let config = Config::load_with_file(cli.config.as_deref());
    let file_logging = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();

    if let Err(e) = init_logging(&cli, &file_logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let use_color = cli.use_color() && config.as_ref().map_or(true, |c| c.output.color);
    control::set_override(use_color);

    let result = config.and_then(|config| run(cli, config));

    match result {
        Ok(()) => {
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}", error::format_error(&e, use_color));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip_all, fields(run_id = logging::current_run_id().unwrap_or("unknown")))]
fn run(cli: Cli, config: Config) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let use_color = cli.use_color() && config.output.color;
    let mut output = OutputWriter::new(cli.output, use_color, cli.quiet, cli.verbosity_level());

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    match cli.command {
        Commands::Migrate(args) => handlers::handle_migrate(args, &config, &mut output),
        Commands::Config(args) => handlers::handle_config(args, &config, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, file: &config::LoggingConfig) -> Result<()> {
    // Verbosity first, then the config file, then the environment
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());
    logging_config.merge_with_file(file, cli.verbosity_level());
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}
