//! Javelin CLI
//!
//! Command-line interface for the Javelin Java formatter and linter

mod commands;
mod discovery;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use javelin_core::{init_tracing, init_tracing_with};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser)]
#[command(name = "javelin")]
#[command(about = "Javelin: alignment-aware formatter and linter for Java sources")]
#[command(version = javelin_core::VERSION)]
#[command(
    long_about = "Javelin formats Java sources into one canonical layout and checks them\n\
against style, best-practice and architecture rules.\n\
\n\
Examples:\n  \
javelin format src/              # Rewrite files in place\n  \
javelin format --check .         # Exit 1 when a file needs formatting\n  \
javelin lint --format sarif .    # SARIF report for CI\n  \
javelin config schema            # JSON Schema of javelin.toml"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (javelin.toml/javelin.json/javelin.yaml)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Number of threads to use for parallel processing
    #[arg(
        short = 'j',
        long,
        global = true,
        help = "Number of threads (default: number of CPU cores)"
    )]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Format Java files
    #[command(alias = "fmt")]
    Format {
        /// Files or directories to format
        #[arg(help = "Files or directories to format (default: current directory)")]
        paths: Vec<PathBuf>,

        /// Check formatting without modifying files
        #[arg(long, help = "Report files that would change and exit 1 without writing")]
        check: bool,

        /// Show diff of proposed changes without applying them
        #[arg(long, help = "Show a unified diff of proposed formatting changes")]
        diff: bool,

        #[arg(long, help = "Maximum line width for formatting")]
        line_width: Option<usize>,
    },

    /// Lint Java files for style, best-practice and architecture violations
    #[command(alias = "check")]
    Lint {
        /// Files or directories to lint
        #[arg(help = "Files or directories to process (default: current directory)")]
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(
            short,
            long,
            default_value = "human",
            help = "Output format for diagnostics"
        )]
        format: OutputFormat,

        #[arg(long, help = "Fail the run when any warning is reported")]
        fail_on_warning: bool,
    },

    /// List built-in rules
    Rules,

    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the JSON Schema of the configuration file
    Schema,

    /// Print the configuration with defaults applied
    Show,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Human,
    Json,
    Sarif,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    match cli.verbose {
        0 => init_tracing(),
        1 => init_tracing_with("javelin=debug"),
        _ => init_tracing_with("javelin=trace"),
    }

    if let Some(threads) = cli.threads
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
    {
        error!("Failed to set thread pool size: {}", e);
        return ExitCode::from(commands::EXIT_ERROR);
    }

    match run_command(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::from(commands::EXIT_ERROR)
        }
    }
}

fn default_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths
    }
}

fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Format {
            paths,
            check,
            diff,
            line_width,
        } => commands::format_command(default_paths(paths), check, diff, line_width, cli.config),

        Commands::Lint {
            paths,
            format,
            fail_on_warning,
        } => commands::lint_command(default_paths(paths), format, fail_on_warning, cli.config),

        Commands::Rules => commands::rules_command(),

        Commands::Config { action } => match action {
            ConfigAction::Schema => commands::config_schema_command(),
            ConfigAction::Show => commands::config_show_command(cli.config),
        },
    }
}
