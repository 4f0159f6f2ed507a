//! Inter-service wiring checks: injection cycles, Feign resilience, and
//! discovery health configuration.

use std::path::{Path, PathBuf};

use crate::issue::{Category, Issue, Severity};
use crate::logging::Logger;

use super::{files_with_extension, read_file, Checker};

/// Lines after an injection annotation inspected for the injected type.
pub const INJECTION_LOOKAHEAD: usize = 2;

pub struct ServiceRelationChecker {
    logger: Logger,
}

impl ServiceRelationChecker {
    pub fn new(logger: Logger) -> Self {
        ServiceRelationChecker { logger }
    }
}

impl Checker for ServiceRelationChecker {
    fn category(&self) -> Category {
        Category::ServiceRelation
    }

    fn check(&self, files: &[PathBuf], _root: &Path) -> anyhow::Result<Vec<Issue>> {
        let mut issues = Vec::new();

        for file in files_with_extension(files, &["java"]) {
            let Some(data) = read_file(file, &self.logger) else {
                continue;
            };
            let path = file.to_string_lossy();
            issues.extend(check_service_relations(&path, &data.content, &data.lines));
        }

        Ok(issues)
    }
}

pub fn check_service_relations(file: &str, content: &str, lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();
    let uses_discovery = content.contains("@EnableEurekaClient")
        || content.contains("@EnableDiscoveryClient");

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        let line_number = i + 1;

        if line.contains("@Autowired") || line.contains("@Resource") {
            let end = (i + 1 + INJECTION_LOOKAHEAD).min(lines.len());
            let following = lines[i + 1..end].join(" ");
            if following.contains("Service") || following.contains("Component") {
                issues.push(
                    Issue::new(
                        Category::ServiceRelation,
                        "potential circular dependency",
                        "injected service may form a dependency cycle",
                        file,
                        Severity::Minor,
                    )
                    .with_line(line_number)
                    .with_suggestion("review the dependency graph between services")
                    .with_rule_id("circular-dependency"),
                );
            }
        }

        if line.contains("@FeignClient")
            && !line.contains("fallback")
            && !line.contains("fallbackFactory")
        {
            issues.push(
                Issue::new(
                    Category::ServiceRelation,
                    "Feign without fallback",
                    "Feign client has no fallback configured",
                    file,
                    Severity::Major,
                )
                .with_line(line_number)
                .with_suggestion("set fallback or fallbackFactory on the client")
                .with_rule_id("feign-fallback"),
            );
        }

        if uses_discovery && line.contains("@Enable") && !content.contains("health") {
            issues.push(
                Issue::new(
                    Category::ServiceRelation,
                    "missing health check",
                    "service registration has no health check configuration",
                    file,
                    Severity::Minor,
                )
                .with_line(line_number)
                .with_suggestion("expose a health endpoint for the registry")
                .with_rule_id("health-check"),
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
    fn test_injected_service_flagged() {
        let src = "\
@Autowired
private OrderService orderService;";
        let issues = check_service_relations("UserService.java", src, &lines(src));
        let cycle = issues
            .iter()
            .find(|i| i.rule_id == "circular-dependency")
            .unwrap();
        assert_eq!(cycle.line, Some(1));
    }

    #[test]
    fn test_injected_repository_unflagged() {
        let src = "\
@Autowired
private UserRepository repository;";
        let issues = check_service_relations("UserService.java", src, &lines(src));
        assert!(issues.iter().all(|i| i.rule_id != "circular-dependency"));
    }

    #[test]
    fn test_feign_without_fallback() {
        let src = "@FeignClient(name = \"billing\")";
        let issues = check_service_relations("BillingClient.java", src, &lines(src));
        let feign = issues.iter().find(|i| i.rule_id == "feign-fallback").unwrap();
        assert_eq!(feign.severity, Severity::Major);
    }

    #[test]
    fn test_feign_with_fallback_unflagged() {
        let src = "@FeignClient(name = \"billing\", fallback = BillingFallback.class)";
        let issues = check_service_relations("BillingClient.java", src, &lines(src));
        assert!(issues.iter().all(|i| i.rule_id != "feign-fallback"));
    }

    #[test]
    fn test_discovery_without_health_check() {
        let src = "\
@EnableDiscoveryClient
public class Application {
}";
        let issues = check_service_relations("Application.java", src, &lines(src));
        assert!(issues.iter().any(|i| i.rule_id == "health-check"));
    }
}
