//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.
//!
//! Copyright (c) 2025 Migratassert Team
//! Licensed under the Apache-2.0 license

use crate::batch;
use crate::cli::{CompletionsArgs, ConfigAction, ConfigArgs, MigrateArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use clap::CommandFactory;
use std::io::Write;

/// Handle the migrate command
pub fn handle_migrate(args: MigrateArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let settings = config.migration_settings(&args);
    let _timer = Timer::with_details("migrate", &args.input_dir.display().to_string());
    tracing::debug!(?settings, "Effective migration settings");

    if settings.dry_run {
        output.info(&format!(
            "DRY RUN: Would migrate files from {} to {}\n",
            args.input_dir.display(),
            args.output_dir.display()
        ))?;
    }

    if !config.output.progress {
        output.disable_progress();
    }
    let progress = output.progress_bar(0, "migrating");

    let summary = batch::run_migration(
        &args.input_dir,
        &args.output_dir,
        &settings,
        progress.as_ref(),
    )?;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    if summary.files_processed == 0 {
        output.warning(&format!("No YAML files found in {}", args.input_dir.display()))?;
    }

    output.summary(&summary)?;

    if summary.has_failures() {
        return Err(Error::MigrationFailed {
            failed: summary.files_failed,
            processed: summary.files_processed,
        });
    }

    Ok(())
}

/// Handle the config command
pub fn handle_config(args: ConfigArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        ConfigAction::Init(init) => {
            if init.path.exists() && !init.force {
                return Err(Error::config(format!(
                    "{} already exists (use --force to overwrite)",
                    init.path.display()
                )));
            }

            Config::default().save(&init.path)?;
            output.success(&format!("Configuration written to {}", init.path.display()))
        }
        ConfigAction::Show(show) => {
            let rendered = config.render(show.format)?;
            output.write(&rendered)
        }
    }
}

/// Handle the completions command
pub fn handle_completions(args: CompletionsArgs) -> Result<()> {
    handle_completions_to(args, &mut std::io::stdout())
}

fn handle_completions_to(args: CompletionsArgs, out: &mut dyn Write) -> Result<()> {
    let mut cmd = crate::cli::Cli::command();
    let name = cmd.get_name().to_string();

    clap_complete::generate(args.shell.to_clap_shell(), &mut cmd, name, out);
    out.flush()?;

    Ok(())
}
