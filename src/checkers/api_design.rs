//! REST API surface checks: URL naming, HTTP method declarations,
//! parameter validation, and return-type conventions.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::issue::{Category, Issue, Severity};
use crate::logging::Logger;

use super::{files_with_extension, read_file, Checker};

static MAPPING_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"value\s*=\s*"([^"]+)""#).unwrap());
static HAS_UPPERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").unwrap());

const MAPPING_ANNOTATIONS: [&str; 5] = [
    "@RequestMapping",
    "@GetMapping",
    "@PostMapping",
    "@PutMapping",
    "@DeleteMapping",
];

pub struct ApiDesignChecker {
    logger: Logger,
}

impl ApiDesignChecker {
    pub fn new(logger: Logger) -> Self {
        ApiDesignChecker { logger }
    }
}

impl Checker for ApiDesignChecker {
    fn category(&self) -> Category {
        Category::ApiDesign
    }

    fn check(&self, files: &[PathBuf], _root: &Path) -> anyhow::Result<Vec<Issue>> {
        let mut issues = Vec::new();

        for file in files_with_extension(files, &["java"]) {
            let Some(data) = read_file(file, &self.logger) else {
                continue;
            };
            let path = file.to_string_lossy();
            issues.extend(check_rest_design(&path, &data.content, &data.lines));
        }

        Ok(issues)
    }
}

pub fn check_rest_design(file: &str, content: &str, lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();
    let is_rest_controller = content.contains("@RestController");

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        let line_number = i + 1;

        if MAPPING_ANNOTATIONS.iter().any(|a| line.contains(a)) {
            if let Some(caps) = MAPPING_URL.captures(line) {
                let url = &caps[1];
                if url.contains('_') || HAS_UPPERCASE.is_match(url) {
                    issues.push(
                        Issue::new(
                            Category::ApiDesign,
                            "URL naming",
                            "URL paths should use lowercase letters and hyphens",
                            file,
                            Severity::Minor,
                        )
                        .with_line(line_number)
                        .with_suggestion("use kebab-case, e.g. /user-profile")
                        .with_rule_id("url-naming"),
                    );
                }
            }

            if line.contains("@RequestMapping") && !line.contains("method") {
                issues.push(
                    Issue::new(
                        Category::ApiDesign,
                        "HTTP method unspecified",
                        "@RequestMapping does not restrict the HTTP method",
                        file,
                        Severity::Minor,
                    )
                    .with_line(line_number)
                    .with_suggestion("use @GetMapping/@PostMapping or set the method attribute")
                    .with_rule_id("http-method"),
                );
            }
        }

        if (line.contains("@RequestBody") || line.contains("@RequestParam"))
            && !line.contains("@Valid")
            && !line.contains("@Validated")
        {
            issues.push(
                Issue::new(
                    Category::ApiDesign,
                    "parameter validation",
                    "API parameter has no validation annotation",
                    file,
                    Severity::Major,
                )
                .with_line(line_number)
                .with_suggestion("annotate with @Valid or @Validated")
                .with_rule_id("parameter-validation"),
            );
        }

        if is_rest_controller
            && line.contains("public")
            && line.contains('(')
            && !line.contains("ResponseEntity")
            && !line.contains("Result")
        {
            issues.push(
                Issue::new(
                    Category::ApiDesign,
                    "return type convention",
                    "API method does not use the shared response wrapper",
                    file,
                    Severity::Minor,
                )
                .with_line(line_number)
                .with_suggestion("return ResponseEntity or the project Result type")
                .with_rule_id("return-type"),
            );
        }
    }

    issues
}
