//! Maintainability checks: long methods, magic numbers, open TODOs, and
//! comment coverage.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::issue::{Category, Issue, Severity};
use crate::logging::Logger;

use super::{files_with_extension, read_file, Checker};

/// Methods longer than this get a split suggestion.
pub const MAX_METHOD_BODY_LINES: usize = 30;
/// Files whose comment-to-code ratio falls below this are reported.
pub const MIN_COMMENT_RATIO: f64 = 0.1;

static MAGIC_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{2,}\b").unwrap());

pub struct MaintainabilityChecker {
    logger: Logger,
}

impl MaintainabilityChecker {
    pub fn new(logger: Logger) -> Self {
        MaintainabilityChecker { logger }
    }
}

impl Checker for MaintainabilityChecker {
    fn category(&self) -> Category {
        Category::Maintainability
    }

    fn check(&self, files: &[PathBuf], _root: &Path) -> anyhow::Result<Vec<Issue>> {
        let mut issues = Vec::new();

        for file in files_with_extension(files, &["java"]) {
            let Some(data) = read_file(file, &self.logger) else {
                continue;
            };
            let path = file.to_string_lossy();
            issues.extend(check_maintainability(&path, &data.lines));
        }

        Ok(issues)
    }
}

pub fn check_maintainability(file: &str, lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut comment_lines = 0usize;
    let mut code_lines = 0usize;

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        let line_number = i + 1;

        if line.starts_with("//") || line.starts_with("/*") || line.starts_with('*') {
            comment_lines += 1;
        } else if !line.is_empty() && !line.starts_with("import") && !line.starts_with("package") {
            code_lines += 1;
        }

        if line.contains("public") && line.contains('(') && line.contains(')') {
            let mut method_lines = 0;
            for following in &lines[i + 1..] {
                let trimmed = following.trim();
                if trimmed == "}" {
                    break;
                }
                method_lines += 1;
            }
            if method_lines > MAX_METHOD_BODY_LINES {
                issues.push(
                    Issue::new(
                        Category::Maintainability,
                        "long method",
                        format!("method body spans {} lines", method_lines),
                        file,
                        Severity::Minor,
                    )
                    .with_line(line_number)
                    .with_suggestion("split the method into smaller pieces")
                    .with_rule_id("long-method"),
                );
            }
        }

        if MAGIC_NUMBER.is_match(line) && !line.contains("final") && !line.contains("static") {
            issues.push(
                Issue::new(
                    Category::Maintainability,
                    "magic number",
                    "numeric literal has no named constant",
                    file,
                    Severity::Minor,
                )
                .with_line(line_number)
                .with_suggestion("extract the number into a named constant")
                .with_rule_id("magic-number"),
            );
        }

        if line.contains("TODO") || line.contains("FIXME") {
            issues.push(
                Issue::new(
                    Category::Maintainability,
                    "open TODO",
                    "unfinished TODO/FIXME marker",
                    file,
                    Severity::Info,
                )
                .with_line(line_number)
                .with_suggestion("resolve or ticket the marker")
                .with_rule_id("todo-comment"),
            );
        }
    }

    if code_lines > 0 && (comment_lines as f64) / (code_lines as f64) < MIN_COMMENT_RATIO {
        issues.push(
            Issue::new(
                Category::Maintainability,
                "insufficient comments",
                "comment coverage is low for this file",
                file,
                Severity::Minor,
            )
            .with_suggestion("document the non-obvious parts")
            .with_rule_id("insufficient-comments"),
        );
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(src: &str) -> Vec<String> {
        src.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_long_method() {
        let mut src = String::from("// handles import batches\npublic void process(Batch batch) {\n");
        for n in 0..40 {
            src.push_str(&format!("    handle(batch, {});\n", n));
        }
        src.push_str("}\n");
        let issues = check_maintainability("BatchService.java", &lines(&src));
        let long = issues.iter().find(|i| i.rule_id == "long-method").unwrap();
        assert_eq!(long.line, Some(2));
        assert!(long.description.contains("40"));
    }

    #[test]
    fn test_magic_number() {
        let src = "// retry budget\nint retries = 30;";
        let issues = check_maintainability("Client.java", &lines(src));
        assert!(issues.iter().any(|i| i.rule_id == "magic-number"));
    }

    #[test]
    fn test_constant_not_magic() {
        let src = "// retry budget\nprivate static final int MAX_RETRIES = 30;";
        let issues = check_maintainability("Client.java", &lines(src));
        assert!(issues.iter().all(|i| i.rule_id != "magic-number"));
    }

    #[test]
    fn test_todo_marker() {
        let src = "// TODO: remove after the v2 cutover\nint x = 1;";
        let issues = check_maintainability("Legacy.java", &lines(src));
        let todo = issues.iter().find(|i| i.rule_id == "todo-comment").unwrap();
        assert_eq!(todo.severity, Severity::Info);
    }

    #[test]
    fn test_low_comment_ratio() {
        let src: String = (0..20).map(|n| format!("int v{} = n();\n", n)).collect();
        let issues = check_maintainability("Uncommented.java", &lines(&src));
        let low = issues
            .iter()
            .find(|i| i.rule_id == "insufficient-comments")
            .unwrap();
        assert_eq!(low.line, None);
    }

    #[test]
    fn test_commented_file_unflagged() {
        let src = "\
// adds two numbers
int sum = a + b;";
        let issues = check_maintainability("Math.java", &lines(src));
        assert!(issues.iter().all(|i| i.rule_id != "insufficient-comments"));
    }
}
