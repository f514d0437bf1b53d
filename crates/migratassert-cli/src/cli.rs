//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.
//!
//! Copyright (c) 2025 Migratassert Team
//! Licensed under the Apache-2.0 license

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use migratassert_core::AnnotationLayout;
use std::path::PathBuf;

/// Migratassert - migrate Tablassert v4.4.0 configurations to TC3
///
/// Converts every YAML configuration in a directory to the TC3 schema and
/// reports the fields that TC3 has no place for.
#[derive(Parser, Debug)]
#[command(
    name = "migratassert",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "MIGRATASSERT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for reports
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Migrate every v4.4.0 YAML file in a directory to TC3
    Migrate(MigrateArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Directory containing v4.4.0 YAML configurations
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Directory to write TC3 configurations to
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Transform and report without writing any files
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Shape of the TC3 annotations block
    #[arg(long, value_enum)]
    pub annotations: Option<AnnotationsArg>,

    /// Keep `biolink:` prefixes on prioritize/avoid class lists
    #[arg(long)]
    pub keep_class_prefixes: bool,

    /// Do not fill in ./DATALAKE paths for sources without posix_filepath
    #[arg(long)]
    pub no_default_local: bool,

    /// Number of worker threads (0 uses one per CPU)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,
}

/// Annotation layout as accepted on the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum AnnotationsArg {
    /// List of `{annotation, method, encoding}` entries
    Tagged,
    /// Mapping keyed by attribute name
    Keyed,
}

impl From<AnnotationsArg> for AnnotationLayout {
    fn from(arg: AnnotationsArg) -> Self {
        match arg {
            AnnotationsArg::Tagged => AnnotationLayout::Tagged,
            AnnotationsArg::Keyed => AnnotationLayout::Keyed,
        }
    }
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init(ConfigInitArgs),

    /// Show the effective configuration
    Show(ConfigShowArgs),
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Where to write the file
    #[arg(long, default_value = ".migratassert.yaml")]
    pub path: PathBuf,

    /// Force overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "yaml")]
    pub format: ConfigFormat,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
    /// TOML format
    Toml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_migrate() {
        let cli = Cli::parse_from([
            "migratassert",
            "migrate",
            "configs",
            "out",
            "-n",
            "--annotations",
            "keyed",
            "--keep-class-prefixes",
            "--jobs",
            "4",
        ]);
        let Commands::Migrate(args) = cli.command else {
            panic!("expected migrate command");
        };
        assert_eq!(args.input_dir, PathBuf::from("configs"));
        assert_eq!(args.output_dir, PathBuf::from("out"));
        assert!(args.dry_run);
        assert_eq!(args.annotations, Some(AnnotationsArg::Keyed));
        assert!(args.keep_class_prefixes);
        assert!(!args.no_default_local);
        assert_eq!(args.jobs, Some(4));
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli::parse_from(["migratassert", "-vv", "migrate", "in", "out"]);
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::parse_from(["migratassert", "--quiet", "migrate", "in", "out"]);
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_verbose_after_subcommand() {
        let cli = Cli::parse_from(["migratassert", "migrate", "in", "out", "--verbose", "--dry-run"]);
        assert_eq!(cli.verbosity_level(), 1);
    }

    #[test]
    fn test_annotations_arg_conversion() {
        assert_eq!(AnnotationLayout::from(AnnotationsArg::Keyed), AnnotationLayout::Keyed);
        assert_eq!(AnnotationLayout::from(AnnotationsArg::Tagged), AnnotationLayout::Tagged);
    }
}
