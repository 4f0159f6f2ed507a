//! Exception handling checks: swallowed exceptions, silent catches, and
//! generic exception types.

use std::path::{Path, PathBuf};

use crate::issue::{Category, Issue, Severity};
use crate::logging::Logger;

use super::{files_with_extension, read_file, Checker};

pub struct ExceptionHandlingChecker {
    logger: Logger,
}

impl ExceptionHandlingChecker {
    pub fn new(logger: Logger) -> Self {
        ExceptionHandlingChecker { logger }
    }
}

impl Checker for ExceptionHandlingChecker {
    fn category(&self) -> Category {
        Category::ExceptionHandling
    }

    fn check(&self, files: &[PathBuf], _root: &Path) -> anyhow::Result<Vec<Issue>> {
        let mut issues = Vec::new();

        for file in files_with_extension(files, &["java"]) {
            let Some(data) = read_file(file, &self.logger) else {
                continue;
            };
            let path = file.to_string_lossy();
            issues.extend(check_exception_handling(&path, &data.content, &data.lines));
        }

        Ok(issues)
    }
}

pub fn check_exception_handling(file: &str, content: &str, lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();
    let has_logging = content.contains("log") || content.contains("Log");

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        let line_number = i + 1;

        if line.contains("catch") && i + 2 < lines.len() {
            let next = lines[i + 1].trim();
            let after_next = lines[i + 2].trim();
            if next == "{" && after_next == "}" {
                issues.push(
                    Issue::new(
                        Category::ExceptionHandling,
                        "empty catch block",
                        "empty catch block swallows the exception",
                        file,
                        Severity::Major,
                    )
                    .with_line(line_number)
                    .with_suggestion("handle the exception or at least log it")
                    .with_rule_id("empty-catch"),
                );
            }
        }

        if line.contains("catch") && !has_logging {
            issues.push(
                Issue::new(
                    Category::ExceptionHandling,
                    "exception logging",
                    "exception is caught but the file never logs",
                    file,
                    Severity::Minor,
                )
                .with_line(line_number)
                .with_suggestion("log the exception for traceability")
                .with_rule_id("exception-logging"),
            );
        }

        if line.contains("throw new Exception") || line.contains("throw new RuntimeException") {
            issues.push(
                Issue::new(
                    Category::ExceptionHandling,
                    "generic exception type",
                    "a generic exception type is thrown",
                    file,
                    Severity::Minor,
                )
                .with_line(line_number)
                .with_suggestion("throw a more specific exception type")
                .with_rule_id("generic-exception"),
            );
        }
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
    fn test_empty_catch_block() {
        let src = "\
try {
    parse(input);
} catch (Exception e)
{
}
log.info(\"done\");";
        let issues = check_exception_handling("Parser.java", src, &lines(src));
        let empty = issues.iter().find(|i| i.rule_id == "empty-catch").unwrap();
        assert_eq!(empty.severity, Severity::Major);
        assert_eq!(empty.line, Some(3));
    }

    #[test]
    fn test_catch_without_logging() {
        let src = "\
try {
    parse(input);
} catch (Exception e) {
    return null;
}";
        let issues = check_exception_handling("Parser.java", src, &lines(src));
        assert!(issues.iter().any(|i| i.rule_id == "exception-logging"));
    }

    #[test]
    fn test_catch_with_logging_unflagged() {
        let src = "\
try {
    parse(input);
} catch (Exception e) {
    log.error(\"parse failed\", e);
}";
        let issues = check_exception_handling("Parser.java", src, &lines(src));
        assert!(issues.iter().all(|i| i.rule_id != "exception-logging"));
    }

    #[test]
    fn test_generic_exception_throw() {
        let src = "throw new RuntimeException(\"boom\");";
        let issues = check_exception_handling("Service.java", src, &lines(src));
        assert!(issues.iter().any(|i| i.rule_id == "generic-exception"));
    }
}
