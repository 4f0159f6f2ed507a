//! Configuration and deployment checks on source and config files.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::issue::{Category, Issue, Severity};
use crate::logging::Logger;

use super::{files_with_extension, read_file, Checker};

static PASSWORD_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)password\s*[:=]\s*["']?([^"'\s]+)["']?"#).unwrap());

pub struct ConfigurationChecker {
    logger: Logger,
}

impl ConfigurationChecker {
    pub fn new(logger: Logger) -> Self {
        ConfigurationChecker { logger }
    }
}

impl Checker for ConfigurationChecker {
    fn category(&self) -> Category {
        Category::Configuration
    }

    fn check(&self, files: &[PathBuf], _root: &Path) -> anyhow::Result<Vec<Issue>> {
        let mut issues = Vec::new();

        for file in files_with_extension(files, &["java", "properties", "yml"]) {
            let Some(data) = read_file(file, &self.logger) else {
                continue;
            };
            let path = file.to_string_lossy();
            issues.extend(check_configuration(&path, &data.lines));
        }

        Ok(issues)
    }
}

pub fn check_configuration(file: &str, lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        let line_number = i + 1;

        if line.contains("password") && (line.contains('=') || line.contains(':')) {
            if let Some(caps) = PASSWORD_VALUE.captures(line) {
                // ${...} placeholders resolve from the environment
                if !caps[1].starts_with("${") {
                    issues.push(
                        Issue::new(
                            Category::Configuration,
                            "hard-coded password",
                            "password is hard-coded in configuration",
                            file,
                            Severity::Critical,
                        )
                        .with_line(line_number)
                        .with_suggestion("load secrets from environment variables or a vault")
                        .with_rule_id("hardcoded-password"),
                    );
                }
            }
        }

        if line.contains("debug") && line.contains("true") {
            issues.push(
                Issue::new(
                    Category::Configuration,
                    "debug mode",
                    "debug mode should not be enabled in production",
                    file,
                    Severity::Minor,
                )
                .with_line(line_number)
                .with_suggestion("disable debug mode outside development")
                .with_rule_id("debug-mode"),
            );
        }

        if line.contains("jdbc:") && line.contains("localhost") {
            issues.push(
                Issue::new(
                    Category::Configuration,
                    "database host",
                    "database URL points at localhost",
                    file,
                    Severity::Minor,
                )
                .with_line(line_number)
                .with_suggestion("configure the database host via environment")
                .with_rule_id("db-config"),
            );
        }
    }

    issues
}
