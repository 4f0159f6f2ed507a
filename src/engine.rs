//! Review engine: file resolution and checker dispatch.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::checkers::{all_checkers, Checker};
use crate::config::ProjectConfig;
use crate::issue::{Category, Issue, ScanResult, Summary};
use crate::logging::Logger;
use crate::project::probe_project;

pub const DEFAULT_INCLUDES: [&str; 1] = ["**/*.java"];
pub const DEFAULT_EXCLUDES: [&str; 4] = [
    "**/target/**",
    "**/build/**",
    "**/node_modules/**",
    "**/.git/**",
];

/// Caller-supplied scan filters. Unset fields fall back to the project
/// config file, then to the defaults above.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub include_patterns: Option<Vec<String>>,
    pub exclude_patterns: Option<Vec<String>>,
    pub categories: Option<Vec<Category>>,
}

pub struct ReviewEngine {
    checkers: Vec<Box<dyn Checker>>,
    logger: Logger,
}

impl ReviewEngine {
    pub fn new(logger: Logger) -> Self {
        let checkers = all_checkers(&logger);
        ReviewEngine { checkers, logger }
    }

    /// Scan a project root. Boundary failures (missing path, unrecognized
    /// build system) come back as a failed `ScanResult`, not an `Err`.
    pub fn scan_project(&self, root: &Path, options: &ScanOptions) -> ScanResult {
        let started = Instant::now();

        if !root.exists() {
            self.logger
                .error(format!("project path does not exist: {}", root.display()));
            return ScanResult::failure(
                format!("project path does not exist: {}", root.display()),
                started.elapsed(),
            );
        }

        let project = match probe_project(root, &self.logger) {
            Ok(project) => project,
            Err(e) => {
                self.logger.error(format!("project probe failed: {:#}", e));
                return ScanResult::failure(format!("{:#}", e), started.elapsed());
            }
        };
        self.logger.info(format!(
            "reviewing {} ({}, java {})",
            project.name,
            project.build_system.as_str(),
            project.java_version
        ));

        let options = match self.merge_config(root, options) {
            Ok(merged) => merged,
            Err(e) => {
                self.logger.error(format!("invalid project config: {:#}", e));
                return ScanResult::failure(format!("{:#}", e), started.elapsed());
            }
        };

        let files = match self.resolve_files(root, &options) {
            Ok(files) => files,
            Err(e) => {
                self.logger.error(format!("file resolution failed: {:#}", e));
                return ScanResult::failure(format!("{:#}", e), started.elapsed());
            }
        };
        self.logger
            .info(format!("scanning {} files under {}", files.len(), root.display()));

        let mut issues: Vec<Issue> = Vec::new();
        for checker in &self.checkers {
            let category = checker.category();
            if let Some(wanted) = &options.categories {
                if !wanted.contains(&category) {
                    continue;
                }
            }
            match checker.check(&files, root) {
                Ok(found) => {
                    self.logger
                        .debug(format!("{}: {} issue(s)", category, found.len()));
                    issues.extend(found);
                }
                Err(e) => {
                    // One broken checker must not sink the whole scan.
                    self.logger
                        .error(format!("checker {} failed: {:#}", category, e));
                }
            }
        }

        let summary = Summary::from_issues(&issues, files.len(), started.elapsed());
        ScanResult {
            success: true,
            issues,
            summary,
            message: None,
        }
    }

    fn merge_config(&self, root: &Path, options: &ScanOptions) -> Result<ScanOptions> {
        let file_config = ProjectConfig::load(root)?.unwrap_or_default();
        let pick = |explicit: &Option<Vec<String>>, from_file: &[String]| {
            explicit.clone().or_else(|| {
                (!from_file.is_empty()).then(|| from_file.to_vec())
            })
        };
        Ok(ScanOptions {
            include_patterns: pick(&options.include_patterns, &file_config.include),
            exclude_patterns: pick(&options.exclude_patterns, &file_config.exclude),
            categories: options.categories.clone().or_else(|| {
                (!file_config.categories.is_empty()).then(|| file_config.categories.clone())
            }),
        })
    }

    fn resolve_files(&self, root: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>> {
        let includes = build_globset(
            options
                .include_patterns
                .as_deref()
                .unwrap_or(&DEFAULT_INCLUDES.map(String::from)),
        )?;
        let excludes = build_globset(
            options
                .exclude_patterns
                .as_deref()
                .unwrap_or(&DEFAULT_EXCLUDES.map(String::from)),
        )?;

        let mut files = Vec::new();
        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
            if includes.is_match(rel) && !excludes.is_match(rel) {
                files.push(entry.path().to_path_buf());
            }
        }

        files.sort();
        files.dedup();
        Ok(files)
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::Severity;
    use std::fs;
    use tempfile::TempDir;

    fn maven_project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("pom.xml"), "<project/>").unwrap();
        dir
    }

    #[test]
    fn test_missing_path_fails_scan() {
        let engine = ReviewEngine::new(Logger::default());
        let result = engine.scan_project(Path::new("/no/such/dir"), &ScanOptions::default());
        assert!(!result.success);
        assert!(result
            .message
            .as_deref()
            .unwrap()
            .contains("project path does not exist"));
        assert_eq!(result.summary.total_issues, 0);
    }

    #[test]
    fn test_non_java_project_fails_scan() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Cargo.toml"), "[package]").unwrap();
        let engine = ReviewEngine::new(Logger::default());
        let result = engine.scan_project(dir.path(), &ScanOptions::default());
        assert!(!result.success);
        assert!(result.message.as_deref().unwrap().contains("Maven or Gradle"));
    }

    #[test]
    fn test_scan_finds_sql_injection() {
        let dir = maven_project();
        fs::create_dir_all(dir.path().join("src/main/java")).unwrap();
        fs::write(
            dir.path().join("src/main/java/UserDao.java"),
            "public class UserDao {\n    void load(String id) throws Exception {\n        String sql = \"SELECT id FROM t WHERE id=\" + id; stmt.executeQuery(sql);\n    }\n}\n",
        )
        .unwrap();

        let engine = ReviewEngine::new(Logger::default());
        let result = engine.scan_project(dir.path(), &ScanOptions::default());
        assert!(result.success);
        assert!(result
            .issues
            .iter()
            .any(|i| i.category == Category::Security && i.severity == Severity::Critical));
        assert_eq!(result.summary.files_scanned, 1);
    }

    #[test]
    fn test_category_filter() {
        let dir = maven_project();
        fs::create_dir_all(dir.path().join("src/main/java")).unwrap();
        fs::write(
            dir.path().join("src/main/java/UserDao.java"),
            "public class UserDao {\n    String sql = \"SELECT * FROM users\";\n}\n",
        )
        .unwrap();

        let engine = ReviewEngine::new(Logger::default());
        let options = ScanOptions {
            categories: Some(vec![Category::Database]),
            ..Default::default()
        };
        let result = engine.scan_project(dir.path(), &options);
        assert!(result.success);
        assert!(!result.issues.is_empty());
        assert!(result.issues.iter().all(|i| i.category == Category::Database));
    }

    #[test]
    fn test_exclude_patterns() {
        let dir = maven_project();
        fs::create_dir_all(dir.path().join("target/classes")).unwrap();
        fs::write(
            dir.path().join("target/classes/Gen.java"),
            "class Gen { SimpleDateFormat f; }",
        )
        .unwrap();

        let engine = ReviewEngine::new(Logger::default());
        let result = engine.scan_project(dir.path(), &ScanOptions::default());
        assert!(result.success);
        assert_eq!(result.summary.files_scanned, 0);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_config_file_seeds_categories() {
        let dir = maven_project();
        fs::write(
            dir.path().join("springlint.yaml"),
            "categories:\n  - thread_safety\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("src/main/java")).unwrap();
        fs::write(
            dir.path().join("src/main/java/DateUtil.java"),
            "class DateUtil {\n    SimpleDateFormat fmt;\n    String sql = \"SELECT * FROM t\";\n}\n",
        )
        .unwrap();

        let engine = ReviewEngine::new(Logger::default());
        let result = engine.scan_project(dir.path(), &ScanOptions::default());
        assert!(result.success);
        assert!(!result.issues.is_empty());
        assert!(result
            .issues
            .iter()
            .all(|i| i.category == Category::ThreadSafety));
    }
}
