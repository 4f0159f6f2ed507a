//! Command-line interface for springlint.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

use crate::engine::{ReviewEngine, ScanOptions};
use crate::issue::{Category, ScanResult, Severity};
use crate::logging::Logger;
use crate::report::{self, ReportFormat};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Heuristic code reviewer for Java/Spring-Boot projects.
///
/// Springlint scans a Maven or Gradle source tree with 13 rule-based
/// checkers covering structure, performance, security, persistence, and
/// operations concerns, then scores the project and renders a report.
#[derive(Parser)]
#[command(name = "springlint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a project and print or save the findings
    Scan(ScanArgs),
    /// Merge saved scan results into a rendered report
    Report(ReportArgs),
}

/// Arguments for the scan command.
#[derive(Parser)]
pub struct ScanArgs {
    /// Project root (must contain pom.xml or build.gradle)
    pub path: PathBuf,

    /// Glob patterns of files to include (default: **/*.java)
    #[arg(long = "include")]
    pub include_patterns: Vec<String>,

    /// Glob patterns of files to exclude
    #[arg(long = "exclude")]
    pub exclude_patterns: Vec<String>,

    /// Categories to run (default: all 13)
    #[arg(short, long = "category")]
    pub categories: Vec<String>,

    /// Output format: json, html, or markdown
    #[arg(short, long, default_value = "json")]
    pub format: String,

    /// Write the report here instead of printing the scan result
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the report command.
#[derive(Parser)]
pub struct ReportArgs {
    /// JSON files holding scan results, as produced by `scan`
    #[arg(short, long = "input", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output format: json, html, or markdown
    #[arg(short, long, default_value = "markdown")]
    pub format: String,

    /// Report output path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Project name shown in the report header
    #[arg(long, default_value = "project")]
    pub project_name: String,
}

/// Run the scan command.
pub fn run_scan(args: &ScanArgs) -> anyhow::Result<i32> {
    // Validate flags before any file I/O.
    let format: ReportFormat = match args.format.parse() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let mut categories = Vec::new();
    for name in &args.categories {
        match Category::parse(name) {
            Some(c) => categories.push(c),
            None => {
                eprintln!("Error: unknown category {:?}", name);
                return Ok(EXIT_ERROR);
            }
        }
    }

    let options = ScanOptions {
        include_patterns: (!args.include_patterns.is_empty())
            .then(|| args.include_patterns.clone()),
        exclude_patterns: (!args.exclude_patterns.is_empty())
            .then(|| args.exclude_patterns.clone()),
        categories: (!categories.is_empty()).then_some(categories),
    };

    let logger = Logger::new("springlint");
    let engine = ReviewEngine::new(logger);
    let result = engine.scan_project(&args.path, &options);

    if !result.success {
        eprintln!(
            "{} {}",
            "scan failed:".red().bold(),
            result.message.as_deref().unwrap_or("unknown error")
        );
        // Still emit the failed result so callers can consume it.
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(EXIT_FAILED);
    }

    print_summary(&result);

    match &args.output {
        Some(path) => {
            let project_name = args
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "project".to_string());
            let report = report::create_report(std::slice::from_ref(&result), &project_name);
            report::write_report(&report, format, path)?;
            println!("Report written to {}", path.display());
        }
        None => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    if result.summary.critical_issues > 0 || result.summary.major_issues > 0 {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the report command.
pub fn run_report(args: &ReportArgs) -> anyhow::Result<i32> {
    let format: ReportFormat = match args.format.parse() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let mut results = Vec::new();
    for input in &args.inputs {
        let raw = match std::fs::read_to_string(input) {
            Ok(raw) => raw,
            Err(e) => {
                eprintln!("Error: cannot read {}: {}", input.display(), e);
                return Ok(EXIT_ERROR);
            }
        };
        let result: ScanResult = match serde_json::from_str(&raw) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Error: cannot parse {}: {}", input.display(), e);
                return Ok(EXIT_ERROR);
            }
        };
        results.push(result);
    }

    let report = report::create_report(&results, &args.project_name);
    if let Err(e) = report::write_report(&report, format, &args.output) {
        eprintln!("Error: {:#}", e);
        return Ok(EXIT_ERROR);
    }

    println!(
        "Report ({}) written to {}",
        format,
        args.output.display()
    );
    Ok(EXIT_SUCCESS)
}

fn print_summary(result: &ScanResult) {
    let s = &result.summary;
    eprintln!(
        "scanned {} files in {}ms: {} issue(s) ({} {}, {} {}, {} {}, {} {})",
        s.files_scanned,
        s.review_time_ms,
        s.total_issues,
        s.critical_issues,
        Severity::Critical.as_str().red().bold(),
        s.major_issues,
        Severity::Major.as_str().yellow(),
        s.minor_issues,
        Severity::Minor.as_str().cyan(),
        s.info_issues,
        Severity::Info.as_str().normal(),
    );
}
