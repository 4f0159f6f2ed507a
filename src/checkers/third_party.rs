//! Third-party dependency checks over build files and imports.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::issue::{Category, Issue, Severity};
use crate::logging::Logger;

use super::{files_with_extension, read_file, Checker};

static ARTIFACT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<artifactId>([^<]+)</artifactId>").unwrap());
static IMPORT_STMT: Lazy<Regex> = Lazy::new(|| Regex::new(r"import\s+([^;]+);").unwrap());

pub struct ThirdPartyChecker {
    logger: Logger,
}

impl ThirdPartyChecker {
    pub fn new(logger: Logger) -> Self {
        ThirdPartyChecker { logger }
    }
}

impl Checker for ThirdPartyChecker {
    fn category(&self) -> Category {
        Category::ThirdParty
    }

    fn check(&self, files: &[PathBuf], _root: &Path) -> anyhow::Result<Vec<Issue>> {
        let mut issues = Vec::new();

        for file in files_with_extension(files, &["xml", "gradle", "java"]) {
            let Some(data) = read_file(file, &self.logger) else {
                continue;
            };
            let path = file.to_string_lossy();
            issues.extend(check_dependencies(&path, &data.lines));
            if path.ends_with(".java") {
                issues.extend(check_unused_imports(&path, &data.lines));
            }
        }

        Ok(issues)
    }
}

/// Version hygiene and known-vulnerable or legacy artifacts.
pub fn check_dependencies(file: &str, lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut reported_duplicates: HashSet<String> = HashSet::new();

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        let line_number = i + 1;

        if file.contains("pom.xml") && line.contains("<version>") && line.contains("SNAPSHOT") {
            issues.push(
                Issue::new(
                    Category::ThirdParty,
                    "unstable dependency version",
                    "dependency uses a SNAPSHOT version",
                    file,
                    Severity::Minor,
                )
                .with_line(line_number)
                .with_suggestion("avoid SNAPSHOT versions in production builds")
                .with_rule_id("snapshot-dependency"),
            );
        }

        if line.contains("log4j") && line.contains("2.1") {
            issues.push(
                Issue::new(
                    Category::ThirdParty,
                    "vulnerable dependency",
                    "Log4j below 2.15.0 has known vulnerabilities",
                    file,
                    Severity::Critical,
                )
                .with_line(line_number)
                .with_suggestion("upgrade to Log4j 2.15.0 or later")
                .with_rule_id("log4j-vulnerability"),
            );
        }

        if line.contains("commons-lang") && !line.contains("commons-lang3") {
            issues.push(
                Issue::new(
                    Category::ThirdParty,
                    "legacy dependency",
                    "commons-lang has been superseded",
                    file,
                    Severity::Minor,
                )
                .with_line(line_number)
                .with_suggestion("migrate to commons-lang3")
                .with_rule_id("outdated-dependency"),
            );
        }

        if file.contains("pom.xml") {
            if let Some(caps) = ARTIFACT_ID.captures(line) {
                let artifact = caps[1].to_string();
                let declarations = lines
                    .iter()
                    .filter(|l| {
                        ARTIFACT_ID
                            .captures(l)
                            .map_or(false, |c| c[1] == *artifact)
                    })
                    .count();
                if declarations > 1 && reported_duplicates.insert(artifact.clone()) {
                    issues.push(
                        Issue::new(
                            Category::ThirdParty,
                            "duplicate dependency",
                            format!("dependency {} is declared more than once", artifact),
                            file,
                            Severity::Minor,
                        )
                        .with_line(line_number)
                        .with_suggestion("remove the duplicate declaration")
                        .with_rule_id("duplicate-dependency"),
                    );
                }
            }
        }
    }

    issues
}

/// Imports whose terminal class name never appears outside import lines.
pub fn check_unused_imports(file: &str, lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        if !line.starts_with("import") {
            continue;
        }
        let Some(caps) = IMPORT_STMT.captures(line) else {
            continue;
        };
        let Some(class_name) = caps[1].trim().rsplit('.').next() else {
            continue;
        };
        if class_name == "*" {
            continue;
        }

        let used = lines
            .iter()
            .any(|l| !l.trim_start().starts_with("import") && l.contains(class_name));
        if !used {
            issues.push(
                Issue::new(
                    Category::ThirdParty,
                    "unused import",
                    format!("import {} is never used", class_name),
                    file,
                    Severity::Info,
                )
                .with_line(i + 1)
                .with_suggestion("remove the unused import")
                .with_rule_id("unused-import"),
            );
        }
    }

    issues
}
