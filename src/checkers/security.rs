//! Security checks: SQL injection, XSS exposure, permission validation, and
//! input validation heuristics.

use std::path::{Path, PathBuf};

use crate::issue::{Category, Issue, Severity};
use crate::logging::Logger;

use super::{files_with_extension, read_file, Checker};

/// Lines inspected after a `Statement` declaration for an execute call.
pub const STATEMENT_EXEC_WINDOW: usize = 5;
/// Lines inspected after a request parameter for a raw `return`.
pub const XSS_RETURN_WINDOW: usize = 5;
/// Lines inspected after a request parameter for an inline null/empty check.
pub const VALIDATION_WINDOW: usize = 10;

pub struct SecurityChecker {
    logger: Logger,
}

impl SecurityChecker {
    pub fn new(logger: Logger) -> Self {
        SecurityChecker { logger }
    }
}

impl Checker for SecurityChecker {
    fn category(&self) -> Category {
        Category::Security
    }

    fn check(&self, files: &[PathBuf], _root: &Path) -> anyhow::Result<Vec<Issue>> {
        let mut issues = Vec::new();

        for file in files_with_extension(files, &["java", "jsp"]) {
            let Some(data) = read_file(file, &self.logger) else {
                continue;
            };
            let path = file.to_string_lossy();

            issues.extend(check_sql_injection(&path, &data.lines));
            issues.extend(check_xss_protection(&path, &data.content, &data.lines));
            issues.extend(check_permission_validation(&path, &data.content, &data.lines));
            issues.extend(check_input_validation(&path, &data.content, &data.lines));
        }

        Ok(issues)
    }
}

fn is_controller(file: &str, content: &str) -> bool {
    file.contains("Controller")
        || content.contains("@Controller")
        || content.contains("@RestController")
}

/// String-concatenated SQL handed to an execute call is critical; a raw
/// `Statement` followed by an execute call within the window is major.
pub fn check_sql_injection(file: &str, lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        let line_number = i + 1;

        let executes = line.contains("executeQuery(")
            || line.contains("executeUpdate(")
            || line.contains("execute(");
        if executes && line.contains('+') && line.contains('"') {
            issues.push(
                Issue::new(
                    Category::Security,
                    "SQL injection risk",
                    "SQL statement built by string concatenation",
                    file,
                    Severity::Critical,
                )
                .with_line(line_number)
                .with_suggestion("use a PreparedStatement with bind parameters")
                .with_rule_id("sql-injection"),
            );
        }

        if line.contains("Statement") && !line.contains("Prepared") {
            let end = (i + STATEMENT_EXEC_WINDOW).min(lines.len());
            let window = lines[i..end].join(" ");
            if window.contains("executeQuery")
                || window.contains("executeUpdate")
                || window.contains("execute(")
            {
                issues.push(
                    Issue::new(
                        Category::Security,
                        "SQL injection risk",
                        "raw Statement used to execute SQL",
                        file,
                        Severity::Major,
                    )
                    .with_line(line_number)
                    .with_suggestion("use a PreparedStatement instead of Statement")
                    .with_rule_id("statement-execution"),
                );
            }
        }
    }

    issues
}

/// Controllers that hand request parameters straight back, and template
/// files that interpolate parameters without any escaping utility.
pub fn check_xss_protection(file: &str, content: &str, lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();

    let has_escaping = content.contains("HtmlUtils.htmlEscape")
        || content.contains("StringEscapeUtils")
        || content.contains("encodeForHTML")
        || content.contains("escapeHtml");

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        let line_number = i + 1;

        if is_controller(file, content)
            && (line.contains("@RequestParam") || line.contains("@PathVariable"))
        {
            let window = &lines[(i + 1).min(lines.len())..(i + 1 + XSS_RETURN_WINDOW).min(lines.len())];
            if window.iter().any(|l| {
                let l = l.trim();
                l.contains("return") && !l.contains("htmlEscape") && !l.contains("escape")
            }) {
                issues.push(
                    Issue::new(
                        Category::Security,
                        "XSS risk",
                        "request parameter returned without escaping",
                        file,
                        Severity::Major,
                    )
                    .with_line(line_number)
                    .with_suggestion("escape user input with HtmlUtils.htmlEscape() or similar")
                    .with_rule_id("xss-protection"),
                );
            }
        }
    }

    if file.ends_with(".jsp") && !has_escaping {
        for (i, raw) in lines.iter().enumerate() {
            let line = raw.trim();
            if line.contains("${param.") || line.contains("<%=request.getParameter") {
                issues.push(
                    Issue::new(
                        Category::Security,
                        "JSP XSS risk",
                        "request parameter written directly into the page",
                        file,
                        Severity::Critical,
                    )
                    .with_line(i + 1)
                    .with_suggestion("use <c:out> or fn:escapeXml() for request parameters")
                    .with_rule_id("jsp-xss"),
                );
            }
        }
    }

    issues
}

/// State-mutating endpoints in a controller with no recognized security
/// framework marker anywhere in the file; hard-coded role literals.
pub fn check_permission_validation(file: &str, content: &str, lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();

    let has_security_framework = content.contains("@PreAuthorize")
        || content.contains("@Secured")
        || content.contains("hasRole")
        || content.contains("hasPermission")
        || content.contains("SecurityContextHolder")
        || (content.contains("Subject") && content.contains("hasRole"));

    if is_controller(file, content) && !has_security_framework {
        for (i, raw) in lines.iter().enumerate() {
            let line = raw.trim();
            let mutating = line.contains("@PostMapping")
                || line.contains("@PutMapping")
                || line.contains("@DeleteMapping");
            if mutating && !content.contains("Authentication") && !content.contains("Principal") {
                issues.push(
                    Issue::new(
                        Category::Security,
                        "missing permission check",
                        "state-mutating endpoint has no visible permission validation",
                        file,
                        Severity::Major,
                    )
                    .with_line(i + 1)
                    .with_suggestion("add @PreAuthorize or validate permissions in the handler")
                    .with_rule_id("permission-validation"),
                );
            }
        }
    }

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        let literal = line.contains("\"ROLE_") || line.contains("\"ADMIN\"") || line.contains("\"USER\"");
        if literal && (line.contains("hasRole") || line.contains("hasAuthority")) {
            issues.push(
                Issue::new(
                    Category::Security,
                    "hard-coded role",
                    "role or permission string is hard-coded",
                    file,
                    Severity::Minor,
                )
                .with_line(i + 1)
                .with_suggestion("define roles and permissions in a constants class or enum")
                .with_rule_id("hardcoded-roles"),
            );
        }
    }

    issues
}

/// Request bodies and parameters should carry validation annotations or an
/// inline null/empty check within the window; DTO files should carry Bean
/// Validation annotations.
pub fn check_input_validation(file: &str, content: &str, lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();

    let has_bean_validation = content.contains("@Valid")
        || content.contains("@Validated")
        || content.contains("@NotNull")
        || content.contains("@NotEmpty")
        || content.contains("@NotBlank");

    if is_controller(file, content) && !has_bean_validation {
        for (i, raw) in lines.iter().enumerate() {
            let line = raw.trim();
            let line_number = i + 1;

            if line.contains("@RequestBody") && !line.contains("@Valid") && !line.contains("@Validated")
            {
                issues.push(
                    Issue::new(
                        Category::Security,
                        "missing input validation",
                        "request body accepted without validation",
                        file,
                        Severity::Major,
                    )
                    .with_line(line_number)
                    .with_suggestion("annotate the body with @Valid or @Validated")
                    .with_rule_id("input-validation"),
                );
            }

            if line.contains("@RequestParam")
                && !line.contains("required = false")
                && !line.contains("defaultValue")
            {
                let window =
                    &lines[(i + 1).min(lines.len())..(i + 1 + VALIDATION_WINDOW).min(lines.len())];
                let validated = window.iter().any(|l| {
                    let l = l.trim();
                    l.contains("if")
                        && (l.contains("null") || l.contains("isEmpty") || l.contains("isBlank"))
                });
                if !validated {
                    issues.push(
                        Issue::new(
                            Category::Security,
                            "missing parameter validation",
                            "request parameter accepted without validation",
                            file,
                            Severity::Minor,
                        )
                        .with_line(line_number)
                        .with_suggestion("validate the parameter or use Bean Validation")
                        .with_rule_id("param-validation"),
                    );
                }
            }
        }
    }

    if (file.ends_with("DTO.java") || file.ends_with("Request.java") || file.ends_with("Form.java"))
        && !has_bean_validation
    {
        issues.push(
            Issue::new(
                Category::Security,
                "missing validation annotations",
                "data transfer class has no Bean Validation annotations",
                file,
                Severity::Minor,
            )
            .with_suggestion("add @NotNull/@NotEmpty style annotations")
            .with_rule_id("dto-validation"),
        );
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
    fn test_concatenated_sql_is_critical() {
        let src = r#"String sql = "SELECT * FROM t WHERE id=" + id; stmt.executeQuery(sql);"#;
        let issues = check_sql_injection("Dao.java", &lines(src));
        let inj = issues.iter().find(|i| i.rule_id == "sql-injection").unwrap();
        assert_eq!(inj.severity, Severity::Critical);
        assert_eq!(inj.issue_type, "SQL injection risk");
        assert_eq!(inj.line, Some(1));
    }

    #[test]
    fn test_prepared_statement_not_flagged() {
        let src = r#"PreparedStatement ps = conn.prepareStatement("SELECT * FROM t WHERE id = ?");"#;
        let issues = check_sql_injection("Dao.java", &lines(src));
        assert!(issues.iter().all(|i| i.rule_id != "statement-execution"));
    }

    #[test]
    fn test_raw_statement_with_execute_within_window() {
        let src = "\
Statement stmt = conn.createStatement();
String sql = buildQuery();
ResultSet rs = stmt.executeQuery(sql);";
        let issues = check_sql_injection("Dao.java", &lines(src));
        let raw = issues.iter().find(|i| i.rule_id == "statement-execution").unwrap();
        assert_eq!(raw.severity, Severity::Major);
        assert_eq!(raw.line, Some(1));
    }

    #[test]
    fn test_controller_returning_request_param() {
        let src = "\
@GetMapping(\"/echo\")
public String echo(@RequestParam String input) {
    return input;
}";
        let issues = check_xss_protection("EchoController.java", src, &lines(src));
        let xss = issues.iter().find(|i| i.rule_id == "xss-protection").unwrap();
        assert_eq!(xss.severity, Severity::Major);
        assert_eq!(xss.line, Some(2));
    }

    #[test]
    fn test_jsp_interpolation_without_escaping() {
        let src = "<p>Hello ${param.name}</p>";
        let issues = check_xss_protection("hello.jsp", src, &lines(src));
        let jsp = issues.iter().find(|i| i.rule_id == "jsp-xss").unwrap();
        assert_eq!(jsp.severity, Severity::Critical);
    }

    #[test]
    fn test_jsp_with_escaping_utility_unflagged() {
        let src = "\
<%@ taglib uri=\"fn\" %>
<p>${fn:escapeHtml(param.name)}</p>";
        // The file-wide escaping probe looks for escapeHtml anywhere.
        let issues = check_xss_protection("hello.jsp", src, &lines(src));
        assert!(issues.iter().all(|i| i.rule_id != "jsp-xss"));
    }

    #[test]
    fn test_mutating_endpoint_without_security_marker() {
        let src = "\
@RestController
public class UserController {
    @PostMapping(\"/users\")
    public User create(@RequestBody User user) { return service.save(user); }
}";
        let issues = check_permission_validation("UserController.java", src, &lines(src));
        let perm = issues
            .iter()
            .find(|i| i.rule_id == "permission-validation")
            .unwrap();
        assert_eq!(perm.severity, Severity::Major);
        assert_eq!(perm.line, Some(3));
    }

    #[test]
    fn test_secured_controller_unflagged() {
        let src = "\
@RestController
public class UserController {
    @PreAuthorize(\"hasRole('ADMIN')\")
    @PostMapping(\"/users\")
    public User create(@RequestBody User user) { return service.save(user); }
}";
        let issues = check_permission_validation("UserController.java", src, &lines(src));
        assert!(issues.iter().all(|i| i.rule_id != "permission-validation"));
    }

    #[test]
    fn test_hardcoded_role_literal() {
        let src = "if (auth.hasRole(\"ADMIN\")) { grant(); }";
        let issues = check_permission_validation("Guard.java", src, &lines(src));
        assert!(issues.iter().any(|i| i.rule_id == "hardcoded-roles"));
    }

    #[test]
    fn test_request_body_without_valid() {
        let src = "\
@RestController
public class OrderController {
    @PostMapping(\"/orders\")
    public Order create(@RequestBody Order order) { return service.place(order); }
}";
        let issues = check_input_validation("OrderController.java", src, &lines(src));
        assert!(issues.iter().any(|i| i.rule_id == "input-validation"));
    }

    #[test]
    fn test_request_param_with_inline_check_unflagged() {
        let src = "\
@RestController
public class SearchController {
    @GetMapping(\"/search\")
    public List<Doc> search(@RequestParam String q) {
        if (q == null || q.isEmpty()) {
            return List.of();
        }
        return service.search(q);
    }
}";
        let issues = check_input_validation("SearchController.java", src, &lines(src));
        assert!(issues.iter().all(|i| i.rule_id != "param-validation"));
    }

    #[test]
    fn test_dto_without_validation_annotations() {
        let src = "public class UserDTO { private String name; }";
        let issues = check_input_validation("UserDTO.java", src, &lines(src));
        assert!(issues.iter().any(|i| i.rule_id == "dto-validation"));
    }
}
