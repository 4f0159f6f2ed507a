//! Code structure and quality checks: duplicate blocks, naming conventions,
//! design pattern smells, and method complexity/length.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::issue::{Category, Issue, Severity};
use crate::logging::Logger;

use super::{files_with_extension, read_file, Checker};

/// Size of the sliding window used for duplicate-block detection.
pub const DUPLICATE_BLOCK_LINES: usize = 3;
/// A duplicate block shorter than this many characters is ignored as trivial.
const DUPLICATE_MIN_BLOCK_CHARS: usize = 10;
/// Cyclomatic complexity above this value is reported.
pub const MAX_METHOD_COMPLEXITY: usize = 10;
/// Method bodies longer than this many lines are reported.
pub const MAX_METHOD_LINES: usize = 50;

static CLASS_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"class\s+([a-zA-Z_][a-zA-Z0-9_]*)").unwrap());
static METHOD_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:public|private|protected)?\s*\w+\s+([a-zA-Z_][a-zA-Z0-9_]*)\s*\(").unwrap()
});
static FIELD_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:private|protected|public)?\s+\w+\s+([a-zA-Z_][a-zA-Z0-9_]*)\s*[;=]").unwrap()
});
static CONSTANT_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:public|private|protected)?\s+static\s+final\s+\w+\s+([a-zA-Z_][a-zA-Z0-9_]*)")
        .unwrap()
});
static PASCAL_CASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][a-zA-Z0-9]*$").unwrap());
static CAMEL_CASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-zA-Z0-9]*$").unwrap());
static UPPER_SNAKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").unwrap());

pub struct CodeStructureChecker {
    logger: Logger,
}

impl CodeStructureChecker {
    pub fn new(logger: Logger) -> Self {
        CodeStructureChecker { logger }
    }
}

impl Checker for CodeStructureChecker {
    fn category(&self) -> Category {
        Category::CodeStructure
    }

    fn check(&self, files: &[PathBuf], _root: &Path) -> anyhow::Result<Vec<Issue>> {
        let mut issues = Vec::new();

        for file in files_with_extension(files, &["java"]) {
            let Some(data) = read_file(file, &self.logger) else {
                continue;
            };
            let path = file.to_string_lossy();

            issues.extend(check_duplicate_code(&path, &data.lines));
            issues.extend(check_naming_conventions(&path, &data.lines));
            issues.extend(check_design_patterns(&path, &data.content, &data.lines));
            issues.extend(check_method_complexity(&path, &data.lines));
        }

        Ok(issues)
    }
}

/// Slide a window of `DUPLICATE_BLOCK_LINES` consecutive lines over the file
/// and report any non-trivial block text that recurs at two or more offsets.
/// Each recurring block is reported once, listing all starting line numbers.
pub fn check_duplicate_code(file: &str, lines: &[String]) -> Vec<Issue> {
    let mut blocks: HashMap<String, Vec<usize>> = HashMap::new();

    for i in 0..lines.len().saturating_sub(DUPLICATE_BLOCK_LINES - 1) {
        let block = lines[i..i + DUPLICATE_BLOCK_LINES].join("\n").trim().to_string();
        if block.len() > DUPLICATE_MIN_BLOCK_CHARS
            && !block.starts_with("//")
            && !block.starts_with('*')
        {
            blocks.entry(block).or_default().push(i + 1);
        }
    }

    let mut duplicated: Vec<&Vec<usize>> = blocks.values().filter(|v| v.len() > 1).collect();
    duplicated.sort_by_key(|v| v[0]);

    duplicated
        .into_iter()
        .map(|line_numbers| {
            let listed = line_numbers
                .iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            Issue::new(
                Category::CodeStructure,
                "duplicate code",
                format!("duplicated code block found at lines {}", listed),
                file,
                Severity::Major,
            )
            .with_line(line_numbers[0])
            .with_suggestion("extract the repeated block into its own method")
            .with_rule_id("duplicate-code")
        })
        .collect()
}

/// Classify identifiers in declaration lines and enforce the Java naming
/// conventions: classes PascalCase, methods/variables camelCase (with `m`/`s`
/// prefixes tolerated for fields), constants UPPER_SNAKE_CASE.
pub fn check_naming_conventions(file: &str, lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        let line_number = i + 1;

        if let Some(caps) = CLASS_DECL.captures(line) {
            let name = &caps[1];
            if !PASCAL_CASE.is_match(name) {
                issues.push(
                    Issue::new(
                        Category::CodeStructure,
                        "class naming",
                        format!("class name \"{}\" is not PascalCase", name),
                        file,
                        Severity::Minor,
                    )
                    .with_line(line_number)
                    .with_suggestion("use PascalCase for class names, e.g. UserService")
                    .with_rule_id("class-naming"),
                );
            }
        }

        if let Some(caps) = METHOD_DECL.captures(line) {
            let name = caps.get(1).unwrap().as_str();
            if !CAMEL_CASE.is_match(name) && name != "main" {
                issues.push(
                    Issue::new(
                        Category::CodeStructure,
                        "method naming",
                        format!("method name \"{}\" is not camelCase", name),
                        file,
                        Severity::Minor,
                    )
                    .with_line(line_number)
                    .with_suggestion("use camelCase for method names, e.g. getUserById")
                    .with_rule_id("method-naming"),
                );
            }
        }

        if let Some(caps) = FIELD_DECL.captures(line) {
            let name = caps.get(1).unwrap().as_str();
            if !CAMEL_CASE.is_match(name) && !name.starts_with('m') && !name.starts_with('s') {
                issues.push(
                    Issue::new(
                        Category::CodeStructure,
                        "variable naming",
                        format!("variable name \"{}\" is not camelCase", name),
                        file,
                        Severity::Minor,
                    )
                    .with_line(line_number)
                    .with_suggestion("use camelCase for variable names, e.g. userId")
                    .with_rule_id("variable-naming"),
                );
            }
        }

        if let Some(caps) = CONSTANT_DECL.captures(line) {
            let name = caps.get(1).unwrap().as_str();
            if !UPPER_SNAKE.is_match(name) {
                issues.push(
                    Issue::new(
                        Category::CodeStructure,
                        "constant naming",
                        format!("constant \"{}\" is not UPPER_SNAKE_CASE", name),
                        file,
                        Severity::Minor,
                    )
                    .with_line(line_number)
                    .with_suggestion("use UPPER_SNAKE_CASE for constants, e.g. MAX_RETRY_COUNT")
                    .with_rule_id("constant-naming"),
                );
            }
        }
    }

    issues
}

/// Heuristics over common design patterns: non-thread-safe singletons, and
/// Factory/Builder classes that do not expose the expected methods.
pub fn check_design_patterns(file: &str, content: &str, lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();

    if content.contains("private static")
        && content.contains("getInstance()")
        && !content.contains("synchronized")
        && !content.contains("volatile")
    {
        issues.push(
            Issue::new(
                Category::CodeStructure,
                "singleton pattern",
                "singleton implementation does not look thread safe",
                file,
                Severity::Minor,
            )
            .with_suggestion("use double-checked locking or an enum singleton")
            .with_rule_id("singleton-pattern"),
        );
    }

    if file.contains("Factory") && content.contains("new ") {
        let has_factory_method = lines.iter().any(|l| {
            l.contains("create") || l.contains("build") || l.contains("get") || l.contains("make")
        });
        if !has_factory_method {
            issues.push(
                Issue::new(
                    Category::CodeStructure,
                    "factory pattern",
                    "class is named Factory but exposes no creation method",
                    file,
                    Severity::Info,
                )
                .with_suggestion("factories should expose create()/build() style methods")
                .with_rule_id("factory-pattern"),
            );
        }
    }

    if file.contains("Builder") && !content.contains("build()") {
        issues.push(
            Issue::new(
                Category::CodeStructure,
                "builder pattern",
                "class is named Builder but has no build() method",
                file,
                Severity::Info,
            )
            .with_suggestion("builders should return the built object from build()")
            .with_rule_id("builder-pattern"),
        );
    }

    issues
}

/// Two-state scanner over method bodies. A method signature not terminated
/// by `;` starts a body; brace depth returning to zero ends it. Decision
/// points (`if`, loops, `case`/`default`, `catch`, each `&&`/`||`) add to a
/// base complexity of 1.
pub fn check_method_complexity(file: &str, lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();

    let mut in_method = false;
    let mut method_start_line = 0usize;
    let mut method_name = String::new();
    let mut brace_count: i32 = 0;
    let mut complexity = 0usize;
    let mut line_count = 0usize;

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();

        if !in_method {
            if let Some(caps) = METHOD_DECL.captures(line) {
                if !line.ends_with(';') {
                    in_method = true;
                    method_start_line = i + 1;
                    method_name = caps[1].to_string();
                    brace_count = if line.contains('{') { 1 } else { 0 };
                    complexity = 1;
                    line_count = 0;
                }
            }
        } else {
            line_count += 1;

            brace_count += line.matches('{').count() as i32;
            brace_count -= line.matches('}').count() as i32;

            if line.contains("if ") || line.contains("else if") {
                complexity += 1;
            }
            if line.contains("for ") || line.contains("while ") || line.contains("do ") {
                complexity += 1;
            }
            if line.contains("case ") || line.contains("default:") {
                complexity += 1;
            }
            if line.contains("catch ") {
                complexity += 1;
            }
            complexity += line.matches("&&").count() + line.matches("||").count();

            if brace_count == 0 {
                in_method = false;

                if complexity > MAX_METHOD_COMPLEXITY {
                    issues.push(
                        Issue::new(
                            Category::CodeStructure,
                            "method complexity",
                            format!(
                                "method \"{}\" has cyclomatic complexity {}, above the recommended {}",
                                method_name, complexity, MAX_METHOD_COMPLEXITY
                            ),
                            file,
                            Severity::Major,
                        )
                        .with_line(method_start_line)
                        .with_suggestion("split the method into smaller ones")
                        .with_rule_id("method-complexity"),
                    );
                }

                if line_count > MAX_METHOD_LINES {
                    issues.push(
                        Issue::new(
                            Category::CodeStructure,
                            "method too long",
                            format!(
                                "method \"{}\" is {} lines long, above the recommended {}",
                                method_name, line_count, MAX_METHOD_LINES
                            ),
                            file,
                            Severity::Minor,
                        )
                        .with_line(method_start_line)
                        .with_suggestion("split the method into smaller ones")
                        .with_rule_id("method-length"),
                    );
                }
            }
        }
    }

    issues
}
