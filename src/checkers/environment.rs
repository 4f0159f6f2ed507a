//! Environment dependency checks: env var defaults, profile settings,
//! and dependency version stability.

use std::path::{Path, PathBuf};

use crate::issue::{Category, Issue, Severity};
use crate::logging::Logger;

use super::{files_with_extension, read_file, Checker};

pub struct EnvironmentChecker {
    logger: Logger,
}

impl EnvironmentChecker {
    pub fn new(logger: Logger) -> Self {
        EnvironmentChecker { logger }
    }
}

impl Checker for EnvironmentChecker {
    fn category(&self) -> Category {
        Category::Environment
    }

    fn check(&self, files: &[PathBuf], _root: &Path) -> anyhow::Result<Vec<Issue>> {
        let mut issues = Vec::new();

        for file in files_with_extension(files, &["java", "properties", "yml", "xml"]) {
            let Some(data) = read_file(file, &self.logger) else {
                continue;
            };
            let path = file.to_string_lossy();
            issues.extend(check_environment(&path, &data.lines));
        }

        Ok(issues)
    }
}

pub fn check_environment(file: &str, lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        let line_number = i + 1;

        if (line.contains("System.getenv") || line.contains("System.getProperty"))
            && !line.contains("default")
            && !line.contains('?')
        {
            issues.push(
                Issue::new(
                    Category::Environment,
                    "env var default",
                    "environment lookup has no default value",
                    file,
                    Severity::Minor,
                )
                .with_line(line_number)
                .with_suggestion("provide a default so missing variables do not break startup")
                .with_rule_id("env-default"),
            );
        }

        if line.contains("spring.profiles.active")
            && (line.contains("prod") || line.contains("production"))
        {
            issues.push(
                Issue::new(
                    Category::Environment,
                    "production profile",
                    "production profile is activated here",
                    file,
                    Severity::Info,
                )
                .with_line(line_number)
                .with_suggestion("double-check production configuration before deploying")
                .with_rule_id("prod-config"),
            );
        }

        if file.contains("pom.xml")
            && line.contains("<version>")
            && (line.contains("SNAPSHOT") || line.contains("RELEASE"))
        {
            issues.push(
                Issue::new(
                    Category::Environment,
                    "dependency version",
                    "dependency pins an unstable version",
                    file,
                    Severity::Minor,
                )
                .with_line(line_number)
                .with_suggestion("pin a stable release version")
                .with_rule_id("dependency-version"),
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
    fn test_getenv_without_default() {
        let src = "String host = System.getenv(\"DB_HOST\");";
        let issues = check_environment("Config.java", &lines(src));
        assert!(issues.iter().any(|i| i.rule_id == "env-default"));
    }

    #[test]
    fn test_getenv_with_default_unflagged() {
        let src = "String host = System.getenv(\"DB_HOST\") != null ? System.getenv(\"DB_HOST\") : \"db\";";
        let issues = check_environment("Config.java", &lines(src));
        assert!(issues.iter().all(|i| i.rule_id != "env-default"));
    }

    #[test]
    fn test_prod_profile_note() {
        let src = "spring.profiles.active=prod";
        let issues = check_environment("application.properties", &lines(src));
        let prod = issues.iter().find(|i| i.rule_id == "prod-config").unwrap();
        assert_eq!(prod.severity, Severity::Info);
    }

    #[test]
    fn test_snapshot_version_in_pom() {
        let src = "<version>1.2.0-SNAPSHOT</version>";
        let issues = check_environment("pom.xml", &lines(src));
        assert!(issues.iter().any(|i| i.rule_id == "dependency-version"));
    }

    #[test]
    fn test_stable_version_unflagged() {
        let src = "<version>1.2.0</version>";
        let issues = check_environment("pom.xml", &lines(src));
        assert!(issues.is_empty());
    }
}
