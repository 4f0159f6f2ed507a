//! Thread-safety checks on singleton Spring beans.

use std::path::{Path, PathBuf};

use crate::issue::{Category, Issue, Severity};
use crate::logging::Logger;

use super::{files_with_extension, read_file, Checker};

pub struct ThreadSafetyChecker {
    logger: Logger,
}

impl ThreadSafetyChecker {
    pub fn new(logger: Logger) -> Self {
        ThreadSafetyChecker { logger }
    }
}

impl Checker for ThreadSafetyChecker {
    fn category(&self) -> Category {
        Category::ThreadSafety
    }

    fn check(&self, files: &[PathBuf], _root: &Path) -> anyhow::Result<Vec<Issue>> {
        let mut issues = Vec::new();

        for file in files_with_extension(files, &["java"]) {
            let Some(data) = read_file(file, &self.logger) else {
                continue;
            };
            let path = file.to_string_lossy();
            issues.extend(check_shared_state(&path, &data.content, &data.lines));
        }

        Ok(issues)
    }
}

/// Mutable instance fields in singleton beans, non-thread-safe formatters
/// and collections.
pub fn check_shared_state(file: &str, content: &str, lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();
    let is_singleton_bean =
        content.contains("@Controller") || content.contains("@Service");

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        let line_number = i + 1;

        if is_singleton_bean
            && line.contains("private")
            && !line.contains("static")
            && !line.contains("final")
        {
            issues.push(
                Issue::new(
                    Category::ThreadSafety,
                    "mutable bean field",
                    "mutable instance field on a singleton bean is shared across requests",
                    file,
                    Severity::Major,
                )
                .with_line(line_number)
                .with_suggestion("make the field final or move the state into method scope")
                .with_rule_id("instance-variable"),
            );
        }

        if line.contains("SimpleDateFormat") && !line.contains("ThreadLocal") {
            issues.push(
                Issue::new(
                    Category::ThreadSafety,
                    "SimpleDateFormat sharing",
                    "SimpleDateFormat is not thread-safe",
                    file,
                    Severity::Major,
                )
                .with_line(line_number)
                .with_suggestion("use ThreadLocal<SimpleDateFormat> or DateTimeFormatter")
                .with_rule_id("simpledateformat"),
            );
        }

        if line.contains("HashMap") && !line.contains("ConcurrentHashMap") {
            issues.push(
                Issue::new(
                    Category::ThreadSafety,
                    "unsynchronized map",
                    "HashMap is unsafe under concurrent access",
                    file,
                    Severity::Minor,
                )
                .with_line(line_number)
                .with_suggestion("consider ConcurrentHashMap")
                .with_rule_id("hashmap-thread"),
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
    fn test_mutable_field_in_service() {
        let src = "\
@Service
public class CounterService {
    private int counter;
}";
        let issues = check_shared_state("CounterService.java", src, &lines(src));
        let field = issues.iter().find(|i| i.rule_id == "instance-variable").unwrap();
        assert_eq!(field.severity, Severity::Major);
        assert_eq!(field.line, Some(3));
    }

    #[test]
    fn test_final_field_unflagged() {
        let src = "\
@Service
public class UserService {
    private final UserRepository repository;
}";
        let issues = check_shared_state("UserService.java", src, &lines(src));
        assert!(issues.iter().all(|i| i.rule_id != "instance-variable"));
    }

    #[test]
    fn test_simpledateformat() {
        let src = "SimpleDateFormat fmt = new SimpleDateFormat(\"yyyy-MM-dd\");";
        let issues = check_shared_state("DateUtil.java", src, &lines(src));
        assert!(issues.iter().any(|i| i.rule_id == "simpledateformat"));
    }

    #[test]
    fn test_thread_local_format_unflagged() {
        let src = "ThreadLocal<SimpleDateFormat> fmt = ThreadLocal.withInitial(SimpleDateFormat::new);";
        let issues = check_shared_state("DateUtil.java", src, &lines(src));
        assert!(issues.iter().all(|i| i.rule_id != "simpledateformat"));
    }

    #[test]
    fn test_concurrent_hashmap_unflagged() {
        let src = "Map<String, String> cache = new ConcurrentHashMap<>();";
        let issues = check_shared_state("Cache.java", src, &lines(src));
        assert!(issues.is_empty());
    }
}
