//! Command-line interface for radar
//! Lints javascript files for duplicated `if`/`else if` conditions and inverted boolean checks.
//!
//! Usage:
//!   radar `<paths>`... [--config `<file>`] [--format text|json|yaml] [--fix]
//!   radar --list-rules
//!
//! The exit code is 1 when an error-level diagnostic is reported or a file cannot be read or
//! parsed, 0 otherwise. Set `RADAR_LOG` (e.g. `RADAR_LOG=debug`) to see internal logging.

use clap::{Arg, ArgAction, Command};
use radar::radar::config::{Loader, RadarConfig};
use radar::radar::diagnostics::{Diagnostic, Severity};
use radar::radar::fixing::apply_fixes;
use radar::radar::linter::Linter;
use radar::radar::parsing::format_source_context;
use radar::radar::rules::catalogue;
use serde::Serialize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Picked up from the working directory when `--config` is not given
const LOCAL_CONFIG: &str = ".radar.toml";

#[derive(Debug, Serialize)]
struct FileReport {
    path: String,
    diagnostics: Vec<Diagnostic>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("RADAR_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("radar")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Finds duplicated if/else-if conditions and inverted boolean checks")
        .arg_required_else_help(true)
        .arg(
            Arg::new("paths")
                .help("Javascript files to lint")
                .num_args(1..)
                .required_unless_present("list-rules")
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format")
                .value_parser(["text", "json", "yaml"])
                .default_value("text"),
        )
        .arg(
            Arg::new("fix")
                .long("fix")
                .help("Rewrite files in place with the available fixes")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-rules")
                .long("list-rules")
                .help("List available rules")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("list-rules") {
        handle_list_rules_command();
        return;
    }

    let config = load_config(matches.get_one::<String>("config")).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });
    let paths: Vec<&String> = matches
        .get_many::<String>("paths")
        .map(|paths| paths.collect())
        .unwrap_or_default();
    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");

    let code = handle_lint_command(&config, &paths, format, matches.get_flag("fix"));
    std::process::exit(code);
}

fn load_config(path: Option<&String>) -> Result<RadarConfig, config::ConfigError> {
    match path {
        Some(path) => Loader::new().with_file(path).build(),
        None => Loader::new().with_optional_file(LOCAL_CONFIG).build(),
    }
}

/// Lint every path and print the results, returning the process exit code
fn handle_lint_command(config: &RadarConfig, paths: &[&String], format: &str, fix: bool) -> i32 {
    let linter = Linter::new(config);
    let mut reports = Vec::new();
    let mut failed = false;

    for path in paths {
        match lint_file(&linter, Path::new(path.as_str()), fix) {
            Ok(diagnostics) => reports.push(FileReport {
                path: path.to_string(),
                diagnostics,
            }),
            Err(message) => {
                eprintln!("{}", message);
                failed = true;
            }
        }
    }

    let formatted = match format {
        "json" => serde_json::to_string_pretty(&reports).map_err(|e| e.to_string()),
        "yaml" => serde_yaml::to_string(&reports).map_err(|e| e.to_string()),
        _ => Ok(format_text(&reports)),
    };
    match formatted {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("Error formatting diagnostics: {}", e);
            return 1;
        }
    }

    let has_errors = reports
        .iter()
        .flat_map(|report| &report.diagnostics)
        .any(|diagnostic| diagnostic.severity == Severity::Error);
    if failed || has_errors {
        1
    } else {
        0
    }
}

/// Lint one file, applying fixes first when asked to
fn lint_file(linter: &Linter, path: &Path, fix: bool) -> Result<Vec<Diagnostic>, String> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("{}: cannot read file: {}", path.display(), e))?;

    let lint = |source: &str| {
        linter.lint_source(source).map_err(|e| {
            format!(
                "{}: {}\n\n{}",
                path.display(),
                e,
                format_source_context(source, e.range())
            )
        })
    };

    let diagnostics = lint(&source)?;
    if !fix {
        return Ok(diagnostics);
    }

    let outcome = apply_fixes(&source, &diagnostics);
    if !outcome.changed() {
        return Ok(diagnostics);
    }
    std::fs::write(path, &outcome.output)
        .map_err(|e| format!("{}: cannot write fixes: {}", path.display(), e))?;
    tracing::info!(
        path = %path.display(),
        applied = outcome.applied,
        skipped = outcome.skipped,
        "applied fixes"
    );
    // Report what is left after fixing
    lint(&outcome.output)
}

fn format_text(reports: &[FileReport]) -> String {
    let mut output = String::new();
    for report in reports {
        for diagnostic in &report.diagnostics {
            output.push_str(&format!(
                "{}:{}:{}: {}: {} [{}]\n",
                report.path,
                diagnostic.range.start.display_line(),
                diagnostic.range.start.column + 1,
                diagnostic.severity,
                diagnostic.message,
                diagnostic.code
            ));
            for secondary in &diagnostic.secondary {
                output.push_str(&format!(
                    "    {}:{}:{}: {}\n",
                    report.path,
                    secondary.range.start.display_line(),
                    secondary.range.start.column + 1,
                    secondary.label
                ));
            }
        }
    }
    output
}

fn handle_list_rules_command() {
    println!("Available rules:\n");

    for rule in catalogue() {
        println!("  {}", rule.id);
        println!("    {}", rule.description);
        println!(
            "    category: {}, default severity: {}{}",
            rule.category,
            rule.default_severity,
            if rule.fixable { ", fixable" } else { "" }
        );
        println!();
    }
}
