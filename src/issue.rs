//! Core types for review findings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Severity levels for issues, ordered: critical > major > minor > info.
///
/// Variant order is ascending so the derived `Ord` ranks `Critical` highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Minor,
    Major,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Major => "major",
            Severity::Minor => "minor",
            Severity::Info => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(Severity::Critical),
            "major" => Ok(Severity::Major),
            "minor" => Ok(Severity::Minor),
            "info" => Ok(Severity::Info),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// The 13 review categories, one per checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    CodeStructure,
    Performance,
    Security,
    Database,
    ThreadSafety,
    ApiDesign,
    ExceptionHandling,
    Configuration,
    ServiceRelation,
    Transaction,
    Environment,
    Maintainability,
    ThirdParty,
}

/// All categories, in checker-registration order.
pub const ALL_CATEGORIES: [Category; 13] = [
    Category::CodeStructure,
    Category::Performance,
    Category::Security,
    Category::Database,
    Category::ThreadSafety,
    Category::ApiDesign,
    Category::ExceptionHandling,
    Category::Configuration,
    Category::ServiceRelation,
    Category::Transaction,
    Category::Environment,
    Category::Maintainability,
    Category::ThirdParty,
];

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::CodeStructure => "code_structure",
            Category::Performance => "performance",
            Category::Security => "security",
            Category::Database => "database",
            Category::ThreadSafety => "thread_safety",
            Category::ApiDesign => "api_design",
            Category::ExceptionHandling => "exception_handling",
            Category::Configuration => "configuration",
            Category::ServiceRelation => "service_relation",
            Category::Transaction => "transaction",
            Category::Environment => "environment",
            Category::Maintainability => "maintainability",
            Category::ThirdParty => "third_party",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "code_structure" => Some(Category::CodeStructure),
            "performance" => Some(Category::Performance),
            "security" => Some(Category::Security),
            "database" => Some(Category::Database),
            "thread_safety" => Some(Category::ThreadSafety),
            "api_design" => Some(Category::ApiDesign),
            "exception_handling" => Some(Category::ExceptionHandling),
            "configuration" => Some(Category::Configuration),
            "service_relation" => Some(Category::ServiceRelation),
            "transaction" => Some(Category::Transaction),
            "environment" => Some(Category::Environment),
            "maintainability" => Some(Category::Maintainability),
            "third_party" => Some(Category::ThirdParty),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::parse(s).ok_or_else(|| format!("unknown category: {}", s))
    }
}

/// A single review finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub category: Category,
    pub severity: Severity,
    /// Short human label for the check, e.g. "SQL injection risk".
    #[serde(rename = "type")]
    pub issue_type: String,
    pub description: String,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Stable identifier for the rule that produced this issue.
    pub rule_id: String,
}

impl Issue {
    /// Build an issue with the `rule_id` defaulted from category and type.
    pub fn new(
        category: Category,
        issue_type: impl Into<String>,
        description: impl Into<String>,
        file: impl Into<String>,
        severity: Severity,
    ) -> Self {
        let issue_type = issue_type.into();
        let rule_id = format!("{}-{}", category.as_str(), slugify(&issue_type));
        Issue {
            category,
            severity,
            issue_type,
            description: description.into(),
            file: file.into(),
            line: None,
            column: None,
            suggestion: None,
            rule_id,
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_rule_id(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = rule_id.into();
        self
    }
}

fn slugify(s: &str) -> String {
    s.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Aggregate counts for one scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_issues: usize,
    pub critical_issues: usize,
    pub major_issues: usize,
    pub minor_issues: usize,
    pub info_issues: usize,
    pub files_scanned: usize,
    /// Elapsed scan time in milliseconds.
    pub review_time_ms: u64,
}

impl Summary {
    /// Derive a summary from a set of issues. The only constructor used by
    /// the engine, so `total_issues` always equals the sum of the severity
    /// counts.
    pub fn from_issues(issues: &[Issue], files_scanned: usize, review_time: Duration) -> Self {
        let count = |s: Severity| issues.iter().filter(|i| i.severity == s).count();
        Summary {
            total_issues: issues.len(),
            critical_issues: count(Severity::Critical),
            major_issues: count(Severity::Major),
            minor_issues: count(Severity::Minor),
            info_issues: count(Severity::Info),
            files_scanned,
            review_time_ms: review_time.as_millis() as u64,
        }
    }
}

/// Result of one scan invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub issues: Vec<Issue>,
    pub summary: Summary,
}

impl ScanResult {
    /// An aborted scan: no issues, zero-valued summary.
    pub fn failure(message: impl Into<String>, review_time: Duration) -> Self {
        ScanResult {
            success: false,
            message: Some(message.into()),
            issues: Vec::new(),
            summary: Summary {
                review_time_ms: review_time.as_millis() as u64,
                ..Summary::default()
            },
        }
    }
}
