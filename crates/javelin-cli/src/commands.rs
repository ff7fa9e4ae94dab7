//! CLI command implementations
//!
//! Every file is processed by its own formatter or analyzer invocation on
//! the rayon pool; results are reported in path order afterwards.

use anyhow::{Context, Result};
use colored::*;
use javelin_core::{
    ConfigLoader, DiagnosticRenderer, FormatResult, JavelinConfig, OutputFormat as CoreOutputFormat,
    SourceFile, config_schema, format,
};
use javelin_rules::{Analyzer, LintContext, LintOutcome};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::{debug, info};

use crate::OutputFormat;
use crate::discovery::FileDiscovery;
use crate::output::{FormatSummary, print_lint_summary};

/// Formatting differs under `--check`, or the lint run failed
pub const EXIT_FAILURE: u8 = 1;
/// A file could not be read, parsed or written
pub const EXIT_ERROR: u8 = 2;

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => CoreOutputFormat::Human,
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Sarif => CoreOutputFormat::Sarif,
        }
    }
}

/// Explicit `--config`, else the nearest configuration file above the
/// first path, else defaults
fn load_config(config_path: Option<&Path>, paths: &[PathBuf]) -> Result<JavelinConfig> {
    let start = match paths.first() {
        Some(path) if path.is_file() => match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        },
        Some(path) if path.is_dir() => path.clone(),
        _ => PathBuf::from("."),
    };
    let config = ConfigLoader::load(config_path, Some(&start))?;
    debug!("Loaded configuration");
    Ok(config)
}

fn report_error(error: &dyn std::fmt::Display) {
    eprintln!("{} {}", "error:".red().bold(), error);
}

/// Format command implementation
pub fn format_command(
    paths: Vec<PathBuf>,
    check: bool,
    diff: bool,
    line_width: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<ExitCode> {
    debug!("Running format command on paths: {:?}", paths);
    let config = load_config(config_path.as_deref(), &paths)?;
    let mut options = config.format_options();
    if let Some(width) = line_width {
        options.line_width = width;
    }

    let files = FileDiscovery::new(&config.files_config())?.discover(&paths)?;
    if files.is_empty() {
        eprintln!("No Java files found in specified paths.");
        return Ok(ExitCode::SUCCESS);
    }
    info!("Formatting {} files", files.len());

    let write = !check && !diff;
    let start = Instant::now();
    let results: Vec<(&PathBuf, javelin_core::Result<FormatResult>)> = files
        .par_iter()
        .map(|path| {
            let result = SourceFile::read(path).and_then(|source| {
                let formatted = format(&source, &options)?;
                if write && formatted.changed {
                    source.write(&formatted.content)?;
                }
                Ok(formatted)
            });
            (path, result)
        })
        .collect();

    let mut summary = FormatSummary {
        files_checked: files.len(),
        ..Default::default()
    };
    for (path, result) in &results {
        match result {
            Ok(formatted) if formatted.changed => {
                summary.files_changed += 1;
                if diff {
                    print!("{}", formatted.diff(path));
                } else if check {
                    println!("{}", path.display());
                }
            }
            Ok(_) => {}
            Err(e) => {
                summary.files_failed += 1;
                report_error(e);
            }
        }
    }
    summary.print(check || diff, start.elapsed());

    if summary.files_failed > 0 {
        Ok(ExitCode::from(EXIT_ERROR))
    } else if check && summary.files_changed > 0 {
        Ok(ExitCode::from(EXIT_FAILURE))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Lint command implementation
pub fn lint_command(
    paths: Vec<PathBuf>,
    format: OutputFormat,
    fail_on_warning: bool,
    config_path: Option<PathBuf>,
) -> Result<ExitCode> {
    debug!("Running lint command on paths: {:?}", paths);
    let config = load_config(config_path.as_deref(), &paths)?;
    let mut ctx = LintContext::from_configuration(&config.linter_config())?;
    if fail_on_warning {
        ctx.config.fail_on_warning = true;
    }

    let files = FileDiscovery::new(&config.files_config())?.discover(&paths)?;
    info!("Linting {} files", files.len());

    let analyzer = Analyzer::default();
    let results: Vec<javelin_core::Result<Vec<javelin_core::Diagnostic>>> = files
        .par_iter()
        .map(|path| SourceFile::read(path).and_then(|source| analyzer.analyze(&source, &ctx)))
        .collect();

    let mut diagnostics = Vec::new();
    let mut files_failed = 0;
    for result in results {
        match result {
            Ok(found) => diagnostics.extend(found),
            Err(e) => {
                files_failed += 1;
                report_error(&e);
            }
        }
    }

    let outcome = LintOutcome::from_diagnostics(&diagnostics, ctx.config.fail_on_warning);
    let renderer = DiagnosticRenderer::with_format(format.into());
    match format {
        OutputFormat::Human => {
            if !diagnostics.is_empty() {
                println!("{}", renderer.render_diagnostics(&diagnostics));
            }
            print_lint_summary(files.len(), files_failed, &outcome);
        }
        OutputFormat::Json | OutputFormat::Sarif => {
            println!("{}", renderer.render_diagnostics(&diagnostics));
        }
    }

    if files_failed > 0 {
        Ok(ExitCode::from(EXIT_ERROR))
    } else if !outcome.passed() {
        Ok(ExitCode::from(EXIT_FAILURE))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Print the JSON Schema of the configuration file
pub fn config_schema_command() -> Result<ExitCode> {
    println!("{}", config_schema()?);
    Ok(ExitCode::SUCCESS)
}

/// Print the resolved configuration
pub fn config_show_command(config_path: Option<PathBuf>) -> Result<ExitCode> {
    let config = load_config(config_path.as_deref(), &[])?;
    let resolved = JavelinConfig {
        formatter: Some(config.formatter_config()),
        linter: Some(config.linter_config()),
        files: Some(config.files_config()),
    };
    let json =
        serde_json::to_string_pretty(&resolved).context("Failed to serialize configuration")?;
    println!("{json}");
    Ok(ExitCode::SUCCESS)
}

/// List built-in rules in registration order
pub fn rules_command() -> Result<ExitCode> {
    let analyzer = Analyzer::default();
    for rule in analyzer.registry().iter() {
        let metadata = rule.metadata();
        println!(
            "{} {:<8} {:<14} {}",
            format!("{:<18}", metadata.id).bold(),
            metadata.default_severity.to_string(),
            metadata.category.slug(),
            metadata.description
        );
    }
    Ok(ExitCode::SUCCESS)
}
