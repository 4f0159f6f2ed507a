//! Transaction boundary checks: rollback rules, propagation, read-only
//! hints, and oversized transactional methods.

use std::path::{Path, PathBuf};

use crate::issue::{Category, Issue, Severity};
use crate::logging::Logger;

use super::{files_with_extension, read_file, Checker};

/// Transactional methods longer than this hold locks too long.
pub const MAX_TRANSACTION_LINES: usize = 50;

pub struct TransactionChecker {
    logger: Logger,
}

impl TransactionChecker {
    pub fn new(logger: Logger) -> Self {
        TransactionChecker { logger }
    }
}

impl Checker for TransactionChecker {
    fn category(&self) -> Category {
        Category::Transaction
    }

    fn check(&self, files: &[PathBuf], _root: &Path) -> anyhow::Result<Vec<Issue>> {
        let mut issues = Vec::new();

        for file in files_with_extension(files, &["java"]) {
            let Some(data) = read_file(file, &self.logger) else {
                continue;
            };
            let path = file.to_string_lossy();
            issues.extend(check_transactions(&path, &data.content, &data.lines));
        }

        Ok(issues)
    }
}

pub fn check_transactions(file: &str, content: &str, lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();
    let has_query_calls =
        content.contains("select") || content.contains("find") || content.contains("get");

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        let line_number = i + 1;

        if !line.contains("@Transactional") {
            continue;
        }

        if !line.contains("rollbackFor") {
            issues.push(
                Issue::new(
                    Category::Transaction,
                    "transaction rollback config",
                    "@Transactional does not specify rollbackFor",
                    file,
                    Severity::Minor,
                )
                .with_line(line_number)
                .with_suggestion("add rollbackFor = Exception.class")
                .with_rule_id("transaction-rollback"),
            );
        }

        if !line.contains("propagation") {
            issues.push(
                Issue::new(
                    Category::Transaction,
                    "transaction propagation",
                    "transaction propagation behaviour is implicit",
                    file,
                    Severity::Info,
                )
                .with_line(line_number)
                .with_suggestion("state the propagation, e.g. REQUIRED or REQUIRES_NEW")
                .with_rule_id("transaction-propagation"),
            );
        }

        if has_query_calls && !line.contains("readOnly = true") {
            issues.push(
                Issue::new(
                    Category::Transaction,
                    "read-only transaction",
                    "query method could run in a read-only transaction",
                    file,
                    Severity::Minor,
                )
                .with_line(line_number)
                .with_suggestion("add readOnly = true for query paths")
                .with_rule_id("readonly-transaction"),
            );
        }

        let mut method_lines = 0;
        for following in &lines[i + 1..] {
            if following.contains("public") {
                break;
            }
            method_lines += 1;
            if method_lines > MAX_TRANSACTION_LINES {
                issues.push(
                    Issue::new(
                        Category::Transaction,
                        "large transaction",
                        "transactional method is long and may hold locks too long",
                        file,
                        Severity::Major,
                    )
                    .with_line(line_number)
                    .with_suggestion("split the transaction or tighten its boundary")
                    .with_rule_id("large-transaction"),
                );
                break;
            }
        }
    }

    issues
}
