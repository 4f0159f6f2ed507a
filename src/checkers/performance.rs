//! Performance checks: loop hazards, HTTP call patterns, cache usage, and
//! query optimization heuristics.

use std::path::{Path, PathBuf};

use crate::issue::{Category, Issue, Severity};
use crate::logging::Logger;

use super::{files_with_extension, read_file, Checker};

/// Lookahead window for nested-loop detection.
pub const NESTED_LOOP_WINDOW: usize = 5;
/// Lookahead window for loop-body hazards (DB/HTTP calls, mutation).
pub const LOOKAHEAD_WINDOW: usize = 10;
/// Lines inspected around an expensive call for a cache annotation.
pub const CACHE_WINDOW: usize = 3;
/// More than this many HTTP-client mentions in a window is reported.
const MAX_SEQUENTIAL_API_CALLS: usize = 2;

pub struct PerformanceChecker {
    logger: Logger,
}

impl PerformanceChecker {
    pub fn new(logger: Logger) -> Self {
        PerformanceChecker { logger }
    }
}

impl Checker for PerformanceChecker {
    fn category(&self) -> Category {
        Category::Performance
    }

    fn check(&self, files: &[PathBuf], _root: &Path) -> anyhow::Result<Vec<Issue>> {
        let mut issues = Vec::new();

        for file in files_with_extension(files, &["java"]) {
            let Some(data) = read_file(file, &self.logger) else {
                continue;
            };
            let path = file.to_string_lossy();

            issues.extend(check_loop_optimization(&path, &data.lines));
            issues.extend(check_api_call_frequency(&path, &data.lines));
            issues.extend(check_cache_usage(&path, &data.content, &data.lines));
            issues.extend(check_query_optimization(&path, &data.lines));
        }

        Ok(issues)
    }
}

fn is_loop_line(line: &str) -> bool {
    line.contains("for") || line.contains("while")
}

fn is_http_call(line: &str) -> bool {
    line.contains("http")
        || line.contains("restTemplate")
        || line.contains("webClient")
        || line.contains("HttpClient")
}

/// Inspect the lines following a loop keyword for nested loops, database
/// operations, and collection mutation.
pub fn check_loop_optimization(file: &str, lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        let line_number = i + 1;

        if is_loop_line(line) && i + NESTED_LOOP_WINDOW < lines.len() {
            let window = &lines[i + 1..(i + 1 + NESTED_LOOP_WINDOW).min(lines.len())];
            if window.iter().any(|l| is_loop_line(l.trim())) {
                issues.push(
                    Issue::new(
                        Category::Performance,
                        "nested loops",
                        "nested loop detected, may hurt performance",
                        file,
                        Severity::Major,
                    )
                    .with_line(line_number)
                    .with_suggestion(
                        "reduce algorithmic complexity or use a more suitable data structure",
                    )
                    .with_rule_id("nested-loops"),
                );
            }
        }

        if is_loop_line(line) {
            let window = &lines[(i + 1).min(lines.len())..(i + 1 + LOOKAHEAD_WINDOW).min(lines.len())];
            if window.iter().any(|l| {
                let l = l.trim();
                l.contains("query")
                    || l.contains("save")
                    || l.contains("update")
                    || l.contains("delete")
            }) {
                issues.push(
                    Issue::new(
                        Category::Performance,
                        "database operation in loop",
                        "database operation executed inside a loop",
                        file,
                        Severity::Critical,
                    )
                    .with_line(line_number)
                    .with_suggestion("batch the operation or move the query out of the loop")
                    .with_rule_id("loop-db-operation"),
                );
            }
        }

        if is_loop_line(line) && !line.contains("Iterator") && !line.contains("concurrent") {
            let window = &lines[(i + 1).min(lines.len())..(i + 1 + LOOKAHEAD_WINDOW).min(lines.len())];
            for (j, l) in window.iter().enumerate() {
                let l = l.trim();
                let mutates = l.contains("remove(") || l.contains("add(");
                if mutates && (l.contains("List") || l.contains("Set")) {
                    issues.push(
                        Issue::new(
                            Category::Performance,
                            "collection modified in loop",
                            "modifying a collection inside a loop can throw ConcurrentModificationException",
                            file,
                            Severity::Major,
                        )
                        .with_line(i + 2 + j)
                        .with_suggestion("use an Iterator or the Stream API for collection edits")
                        .with_rule_id("collection-modification"),
                    );
                    break;
                }
            }
        }
    }

    issues
}

/// HTTP-call-frequency heuristics: calls inside loops, blocking template
/// calls, and bursts of sequential calls.
pub fn check_api_call_frequency(file: &str, lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        let line_number = i + 1;

        if is_loop_line(line) {
            let window = &lines[(i + 1).min(lines.len())..(i + 1 + LOOKAHEAD_WINDOW).min(lines.len())];
            if window.iter().any(|l| is_http_call(l.trim())) {
                issues.push(
                    Issue::new(
                        Category::Performance,
                        "HTTP call in loop",
                        "HTTP request executed inside a loop",
                        file,
                        Severity::Major,
                    )
                    .with_line(line_number)
                    .with_suggestion("batch the calls or process them asynchronously")
                    .with_rule_id("loop-api-call"),
                );
            }
        }

        if line.contains("restTemplate.getForObject") || line.contains("restTemplate.postForObject")
        {
            issues.push(
                Issue::new(
                    Category::Performance,
                    "blocking HTTP call",
                    "synchronous HTTP call may block the thread",
                    file,
                    Severity::Minor,
                )
                .with_line(line_number)
                .with_suggestion("consider WebClient for non-blocking calls")
                .with_rule_id("sync-api-call"),
            );
        }

        if line.contains("restTemplate") || line.contains("HttpClient") || line.contains("webClient")
        {
            let window = &lines[(i + 1).min(lines.len())..(i + 1 + LOOKAHEAD_WINDOW).min(lines.len())];
            let call_count = 1 + window
                .iter()
                .filter(|l| {
                    let l = l.trim();
                    l.contains("restTemplate") || l.contains("HttpClient") || l.contains("webClient")
                })
                .count();
            if call_count > MAX_SEQUENTIAL_API_CALLS {
                issues.push(
                    Issue::new(
                        Category::Performance,
                        "sequential HTTP calls",
                        format!("{} HTTP calls in close succession", call_count),
                        file,
                        Severity::Major,
                    )
                    .with_line(line_number)
                    .with_suggestion("parallelize with CompletableFuture or WebClient")
                    .with_rule_id("sequential-api-calls"),
                );
            }
        }
    }

    issues
}

/// Expensive-looking calls should carry a cache annotation within
/// `CACHE_WINDOW` lines; cache annotations should carry key/condition
/// attributes; cache configuration should set an expiry.
pub fn check_cache_usage(file: &str, content: &str, lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();
    let is_test_path = file.to_lowercase().contains("test");

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        let line_number = i + 1;

        let expensive = line.contains("findAll")
            || line.contains("findBy")
            || line.contains("getAll")
            || line.contains("select");
        if expensive {
            let start = i.saturating_sub(CACHE_WINDOW);
            let end = (i + CACHE_WINDOW).min(lines.len());
            let cached = lines[start..end].iter().any(|l| l.contains("@Cacheable"));
            if !cached && !is_test_path {
                issues.push(
                    Issue::new(
                        Category::Performance,
                        "missing cache",
                        "repeated query or lookup may benefit from caching",
                        file,
                        Severity::Minor,
                    )
                    .with_line(line_number)
                    .with_suggestion("consider @Cacheable or an external cache")
                    .with_rule_id("missing-cache"),
                );
            }
        }

        if line.contains("@Cacheable") && !line.contains("key") && !line.contains("condition") {
            issues.push(
                Issue::new(
                    Category::Performance,
                    "incomplete cache config",
                    "cache annotation has no key or condition attribute",
                    file,
                    Severity::Minor,
                )
                .with_line(line_number)
                .with_suggestion("add a key attribute to improve the hit rate")
                .with_rule_id("cache-config"),
            );
        }

        if (file.contains("CacheConfig") || file.contains("CacheManager"))
            && !content.contains("setTimeToLive")
            && !content.contains("expireAfterWrite")
        {
            issues.push(
                Issue::new(
                    Category::Performance,
                    "cache expiration",
                    "cache configuration sets no expiry",
                    file,
                    Severity::Minor,
                )
                .with_line(line_number)
                .with_suggestion("configure a time-to-live to avoid stale entries")
                .with_rule_id("cache-expiration"),
            );
        }
    }

    issues
}

/// Query-shape heuristics: N+1 suspicion, missing pagination, native SQL,
/// LIKE scans, and bulk operations.
pub fn check_query_optimization(file: &str, lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        let line_number = i + 1;

        if line.contains("findAll") || line.contains("findBy") {
            let window = &lines[(i + 1).min(lines.len())..(i + 1 + LOOKAHEAD_WINDOW).min(lines.len())];
            if window.iter().any(|l| {
                let l = l.trim();
                l.contains("for") && (l.contains("get") || l.contains("find"))
            }) {
                issues.push(
                    Issue::new(
                        Category::Performance,
                        "N+1 query",
                        "collection fetch followed by per-element lookups suggests an N+1 query",
                        file,
                        Severity::Major,
                    )
                    .with_line(line_number)
                    .with_suggestion("use a JOIN fetch or @EntityGraph")
                    .with_rule_id("n-plus-one-query"),
                );
            }
        }

        if line.contains("findAll()") && !line.contains("Pageable") {
            issues.push(
                Issue::new(
                    Category::Performance,
                    "missing pagination",
                    "findAll without pagination may return an unbounded result set",
                    file,
                    Severity::Major,
                )
                .with_line(line_number)
                .with_suggestion("add a Pageable parameter")
                .with_rule_id("missing-pagination"),
            );
        }

        if line.contains("@Query") && line.contains("nativeQuery = true") {
            issues.push(
                Issue::new(
                    Category::Performance,
                    "native SQL query",
                    "native SQL bypasses the ORM; watch for injection and portability",
                    file,
                    Severity::Minor,
                )
                .with_line(line_number)
                .with_suggestion("prefer JPQL or the Criteria API")
                .with_rule_id("native-query"),
            );
        }

        if line.contains("findBy") && line.contains("Like") {
            issues.push(
                Issue::new(
                    Category::Performance,
                    "LIKE query",
                    "LIKE queries can be slow without supporting indexes",
                    file,
                    Severity::Minor,
                )
                .with_line(line_number)
                .with_suggestion("index the column and avoid leading wildcards")
                .with_rule_id("like-query"),
            );
        }

        if line.contains("deleteAll") || line.contains("saveAll") {
            issues.push(
                Issue::new(
                    Category::Performance,
                    "bulk operation",
                    "bulk operation over a large data set can be expensive",
                    file,
                    Severity::Info,
                )
                .with_line(line_number)
                .with_suggestion("process large volumes in batches")
                .with_rule_id("bulk-operation"),
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
    fn test_nested_loop_within_window() {
        let src = "\
for (User u : users) {
    process(u);
    for (Order o : u.orders()) {
        total += o.amount();
    }
}
end();";
        let issues = check_loop_optimization("N.java", &lines(src));
        assert!(issues.iter().any(|i| i.rule_id == "nested-loops"));
        let nested = issues.iter().find(|i| i.rule_id == "nested-loops").unwrap();
        assert_eq!(nested.line, Some(1));
        assert_eq!(nested.severity, Severity::Major);
    }

    #[test]
    fn test_db_call_in_loop_is_critical() {
        let src = "\
for (User u : users) {
    repository.save(u);
}";
        let issues = check_loop_optimization("S.java", &lines(src));
        let db = issues.iter().find(|i| i.rule_id == "loop-db-operation").unwrap();
        assert_eq!(db.severity, Severity::Critical);
        assert_eq!(db.line, Some(1));
    }

    #[test]
    fn test_db_call_outside_window_not_reported() {
        let mut src = String::from("for (int i = 0; i < n; i++) {\n");
        for _ in 0..LOOKAHEAD_WINDOW {
            src.push_str("    counter += i;\n");
        }
        src.push_str("}\nrepository.save(x);\n");
        let issues = check_loop_optimization("W.java", &lines(&src));
        assert!(issues.iter().all(|i| i.rule_id != "loop-db-operation"));
    }

    #[test]
    fn test_http_call_in_loop() {
        let src = "\
while (it.hasNext()) {
    restTemplate.getForObject(url, String.class);
}";
        let issues = check_api_call_frequency("H.java", &lines(src));
        assert!(issues.iter().any(|i| i.rule_id == "loop-api-call"));
        assert!(issues.iter().any(|i| i.rule_id == "sync-api-call"));
    }

    #[test]
    fn test_missing_cache_skipped_in_tests() {
        let src = "List<User> all = repository.findAll(pageable);";
        let issues = check_cache_usage("UserServiceTest.java", src, &lines(src));
        assert!(issues.iter().all(|i| i.rule_id != "missing-cache"));

        let issues = check_cache_usage("UserService.java", src, &lines(src));
        assert!(issues.iter().any(|i| i.rule_id == "missing-cache"));
    }

    #[test]
    fn test_cacheable_nearby_suppresses_missing_cache() {
        let src = "\
@Cacheable(value = \"users\", key = \"#id\")
public List<User> findByGroup(String id) {
    return repository.findByGroup(id);
}";
        let issues = check_cache_usage("UserService.java", src, &lines(src));
        assert!(issues.iter().all(|i| i.rule_id != "missing-cache"));
    }

    #[test]
    fn test_find_all_without_pageable() {
        let src = "List<User> users = repository.findAll();";
        let issues = check_query_optimization("R.java", &lines(src));
        let paging = issues.iter().find(|i| i.rule_id == "missing-pagination").unwrap();
        assert_eq!(paging.severity, Severity::Major);
    }
}
