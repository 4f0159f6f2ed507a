//! Report synthesis and rendering.
//!
//! Merges scan results into a single `ReviewReport`, scores it, and
//! renders JSON, Markdown, or HTML. Rendering is a pure projection of the
//! report: no filtering or reordering happens at this stage.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::issue::{Category, Issue, ScanResult, Severity, Summary};

/// Per-severity score deductions.
pub const CRITICAL_PENALTY: u32 = 20;
pub const MAJOR_PENALTY: u32 = 10;
pub const MINOR_PENALTY: u32 = 5;

/// Supported report output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Json,
    Markdown,
    Html,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Markdown => "markdown",
            ReportFormat::Html => "html",
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "html" => Ok(ReportFormat::Html),
            _ => Err(format!("format must be json, html or markdown, got {}", s)),
        }
    }
}

/// The merged, scored review report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewReport {
    pub project_name: String,
    pub scan_time: DateTime<Utc>,
    pub summary: Summary,
    pub issues: Vec<Issue>,
    pub recommendations: Vec<String>,
    pub quality_score: u32,
}

/// Score formula: 100 minus per-severity penalties, clamped to `[0, 100]`.
/// Info issues do not affect the score.
pub fn quality_score(critical: usize, major: usize, minor: usize) -> u32 {
    let deduction = critical as u32 * CRITICAL_PENALTY
        + major as u32 * MAJOR_PENALTY
        + minor as u32 * MINOR_PENALTY;
    100u32.saturating_sub(deduction)
}

/// Merge scan results into one report. Issues keep their scan order;
/// summaries are summed field by field.
pub fn create_report(results: &[ScanResult], project_name: &str) -> ReviewReport {
    let issues: Vec<Issue> = results.iter().flat_map(|r| r.issues.clone()).collect();
    let files_scanned = results.iter().map(|r| r.summary.files_scanned).sum();
    let review_time_ms = results.iter().map(|r| r.summary.review_time_ms).sum();

    let count = |s: Severity| issues.iter().filter(|i| i.severity == s).count();
    let summary = Summary {
        total_issues: issues.len(),
        critical_issues: count(Severity::Critical),
        major_issues: count(Severity::Major),
        minor_issues: count(Severity::Minor),
        info_issues: count(Severity::Info),
        files_scanned,
        review_time_ms,
    };

    let recommendations = recommendations_for(&issues);
    let quality_score = quality_score(
        summary.critical_issues,
        summary.major_issues,
        summary.minor_issues,
    );

    ReviewReport {
        project_name: project_name.to_string(),
        scan_time: Utc::now(),
        summary,
        issues,
        recommendations,
        quality_score,
    }
}

fn recommendations_for(issues: &[Issue]) -> Vec<String> {
    let mut recommendations = Vec::new();

    let critical = issues.iter().filter(|i| i.severity == Severity::Critical).count();
    let security = issues.iter().filter(|i| i.category == Category::Security).count();
    let performance = issues
        .iter()
        .filter(|i| i.category == Category::Performance)
        .count();

    if critical > 0 {
        recommendations.push(format!(
            "Resolve the {} critical issue(s) first; they can affect system stability",
            critical
        ));
    }
    if security > 0 {
        recommendations.push(format!(
            "Harden security: {} security issue(s) were found",
            security
        ));
    }
    if performance > 0 {
        recommendations.push(format!(
            "Tune performance: {} performance issue(s) were found",
            performance
        ));
    }

    recommendations.push("Establish a code review process to keep quality up".to_string());
    recommendations
        .push("Consider wiring static analysis into the CI/CD pipeline".to_string());

    recommendations
}

/// Render a report in the requested format.
pub fn render(report: &ReviewReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => {
            serde_json::to_string_pretty(report).context("serializing report to JSON")
        }
        ReportFormat::Markdown => Ok(render_markdown(report)),
        ReportFormat::Html => Ok(render_html(report)),
    }
}

/// Render and write to `path`. A write failure is an error for the caller
/// to surface, not a panic.
pub fn write_report(report: &ReviewReport, format: ReportFormat, path: &Path) -> Result<()> {
    let rendered = render(report, format)?;
    std::fs::write(path, rendered)
        .with_context(|| format!("writing report to {}", path.display()))?;
    Ok(())
}

fn render_markdown(report: &ReviewReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Code Review Report\n");
    let _ = writeln!(out, "## Project\n");
    let _ = writeln!(out, "- **Project**: {}", report.project_name);
    let _ = writeln!(out, "- **Scan time**: {}", report.scan_time.to_rfc3339());
    let _ = writeln!(out, "- **qualityScore**: {}/100", report.quality_score);

    let s = &report.summary;
    let _ = writeln!(out, "\n## Summary\n");
    let _ = writeln!(out, "| Metric | Count |");
    let _ = writeln!(out, "|--------|-------|");
    let _ = writeln!(out, "| Total issues | {} |", s.total_issues);
    let _ = writeln!(out, "| Critical | {} |", s.critical_issues);
    let _ = writeln!(out, "| Major | {} |", s.major_issues);
    let _ = writeln!(out, "| Minor | {} |", s.minor_issues);
    let _ = writeln!(out, "| Info | {} |", s.info_issues);
    let _ = writeln!(out, "| Files scanned | {} |", s.files_scanned);
    let _ = writeln!(out, "| Review time | {}ms |", s.review_time_ms);

    let _ = writeln!(out, "\n## Recommendations\n");
    for rec in &report.recommendations {
        let _ = writeln!(out, "- {}", rec);
    }

    let _ = writeln!(out, "\n## Issues\n");
    for issue in &report.issues {
        let _ = writeln!(out, "### {} ({})\n", issue.issue_type, issue.severity);
        let _ = writeln!(out, "- **File**: {}", issue.file);
        if let Some(line) = issue.line {
            let _ = writeln!(out, "- **Line**: {}", line);
        }
        let _ = writeln!(out, "- **Description**: {}", issue.description);
        if let Some(suggestion) = &issue.suggestion {
            let _ = writeln!(out, "- **Suggestion**: {}", suggestion);
        }
        let _ = writeln!(out, "- **Category**: {}", issue.category);
        let _ = writeln!(out, "- **Rule**: {}\n", issue.rule_id);
    }

    out
}

fn render_html(report: &ReviewReport) -> String {
    let mut issues_html = String::new();
    for issue in &report.issues {
        let line = issue
            .line
            .map(|l| format!("<p><strong>Line:</strong> {}</p>", l))
            .unwrap_or_default();
        let suggestion = issue
            .suggestion
            .as_deref()
            .map(|s| format!("<p><strong>Suggestion:</strong> {}</p>", s))
            .unwrap_or_default();
        let _ = write!(
            issues_html,
            r#"<div class="issue {sev}">
<h4>{issue_type}</h4>
<p><strong>File:</strong> {file}</p>
{line}
<p><strong>Description:</strong> {description}</p>
{suggestion}
<p><strong>Category:</strong> {category} | <strong>Severity:</strong> {sev}</p>
</div>
"#,
            sev = issue.severity,
            issue_type = issue.issue_type,
            file = issue.file,
            line = line,
            description = issue.description,
            suggestion = suggestion,
            category = issue.category,
        );
    }

    let mut recs_html = String::new();
    for rec in &report.recommendations {
        let _ = write!(recs_html, "<li>{}</li>", rec);
    }

    let s = &report.summary;
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>Code Review Report - {project}</title>
<style>
body {{ font-family: Arial, sans-serif; margin: 20px; background-color: #f5f5f5; }}
.container {{ max-width: 1200px; margin: 0 auto; background: white; padding: 20px; border-radius: 8px; }}
.summary {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(160px, 1fr)); gap: 16px; }}
.summary-card {{ background: #f8f9fa; padding: 15px; border-radius: 6px; text-align: center; }}
.issue {{ background: #f8f9fa; margin: 10px 0; padding: 15px; border-radius: 6px; border-left: 4px solid #dee2e6; }}
.issue.critical {{ border-left-color: #dc3545; }}
.issue.major {{ border-left-color: #fd7e14; }}
.issue.minor {{ border-left-color: #ffc107; }}
.issue.info {{ border-left-color: #17a2b8; }}
.recommendations {{ background: #e7f3ff; padding: 20px; border-radius: 6px; }}
</style>
</head>
<body>
<div class="container">
<h1>Code Review Report</h1>
<h2>{project}</h2>
<p>Scan time: {scan_time}</p>
<p>qualityScore: <strong>{score}/100</strong></p>
<div class="summary">
<div class="summary-card"><h3>Total</h3><h2>{total}</h2></div>
<div class="summary-card"><h3>Critical</h3><h2>{critical}</h2></div>
<div class="summary-card"><h3>Major</h3><h2>{major}</h2></div>
<div class="summary-card"><h3>Minor</h3><h2>{minor}</h2></div>
<div class="summary-card"><h3>Files</h3><h2>{files}</h2></div>
</div>
<div class="recommendations">
<h3>Recommendations</h3>
<ul>{recs}</ul>
</div>
<div class="issues">
<h3>Issues</h3>
{issues}
</div>
</div>
</body>
</html>
"#,
        project = report.project_name,
        scan_time = report.scan_time.to_rfc3339(),
        score = report.quality_score,
        total = s.total_issues,
        critical = s.critical_issues,
        major = s.major_issues,
        minor = s.minor_issues,
        files = s.files_scanned,
        recs = recs_html,
        issues = issues_html,
    )
}
