//! Database checks: transaction markers, connection pooling, indexes, raw
//! SQL shape, and JPA entity configuration.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::issue::{Category, Issue, Severity};
use crate::logging::Logger;

use super::{files_with_extension, read_file, Checker};

/// IN clauses with more than this many elements are reported.
pub const MAX_IN_CLAUSE_ELEMENTS: usize = 100;
/// Connection pools larger than this are reported.
const MAX_POOL_SIZE: usize = 50;

static POOL_SIZE_VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());
static FIND_BY_FIELD: Lazy<Regex> = Lazy::new(|| Regex::new(r"findBy(\w+)").unwrap());
static FIND_BY_TWO_FIELDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"findBy(\w+?)And(\w+)").unwrap());
static IN_CLAUSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)IN\s*\(([^)]+)\)").unwrap());
static CLASS_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"class\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap());

pub struct DatabaseChecker {
    logger: Logger,
}

impl DatabaseChecker {
    pub fn new(logger: Logger) -> Self {
        DatabaseChecker { logger }
    }
}

impl Checker for DatabaseChecker {
    fn category(&self) -> Category {
        Category::Database
    }

    fn check(&self, files: &[PathBuf], _root: &Path) -> anyhow::Result<Vec<Issue>> {
        let mut issues = Vec::new();

        for file in files_with_extension(files, &["java"]) {
            let Some(data) = read_file(file, &self.logger) else {
                continue;
            };
            let path = file.to_string_lossy();

            for (i, raw) in data.lines.iter().enumerate() {
                let line = raw.trim();

                if line.contains("@Transactional") && !line.contains("rollbackFor") {
                    issues.push(
                        Issue::new(
                            Category::Database,
                            "transaction rollback config",
                            "@Transactional does not specify rollbackFor",
                            &*path,
                            Severity::Minor,
                        )
                        .with_line(i + 1)
                        .with_suggestion("add rollbackFor = Exception.class")
                        .with_rule_id("transaction-rollback"),
                    );
                }

                if line.contains("findAll()") && !line.contains("Pageable") {
                    issues.push(
                        Issue::new(
                            Category::Database,
                            "missing pagination",
                            "findAll without pagination may return an unbounded result set",
                            &*path,
                            Severity::Major,
                        )
                        .with_line(i + 1)
                        .with_suggestion("add a Pageable parameter")
                        .with_rule_id("missing-pagination"),
                    );
                }
            }

            issues.extend(check_connection_pool(&path, &data.content, &data.lines));
            issues.extend(check_index_optimization(&path, &data.content, &data.lines));
            issues.extend(check_sql_queries(&path, &data.lines));
            issues.extend(check_orm_usage(&path, &data.content, &data.lines));
        }

        Ok(issues)
    }
}

/// Direct connection creation without a pool, oversized pools, and missing
/// timeout configuration.
pub fn check_connection_pool(file: &str, content: &str, lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();

    if (file.contains("DataSource") || file.contains("database"))
        && content.contains("new")
        && content.contains("Connection")
        && !content.contains("DataSource")
        && !content.contains("ConnectionPool")
    {
        issues.push(
            Issue::new(
                Category::Database,
                "missing connection pool",
                "database connections created directly instead of via a pool",
                file,
                Severity::Major,
            )
            .with_suggestion("use a connection pool such as HikariCP")
            .with_rule_id("missing-connection-pool"),
        );
    }

    if file.contains("application.") || file.contains("DataSource") {
        for (i, raw) in lines.iter().enumerate() {
            let line = raw.trim();
            let line_number = i + 1;

            let pool_key = line.contains("maximum-pool-size")
                || line.contains("maxActive")
                || line.contains("max-active")
                || line.contains("maxPoolSize");
            if pool_key {
                if let Some(m) = POOL_SIZE_VALUE.find(line) {
                    if let Ok(size) = m.as_str().parse::<usize>() {
                        if size > MAX_POOL_SIZE {
                            issues.push(
                                Issue::new(
                                    Category::Database,
                                    "connection pool size",
                                    format!("pool size {} looks oversized", size),
                                    file,
                                    Severity::Minor,
                                )
                                .with_line(line_number)
                                .with_suggestion("most applications do well with 10-20 connections")
                                .with_rule_id("connection-pool-size"),
                            );
                        }
                    }
                }
            }

            if !content.contains("timeout")
                && !content.contains("idle-timeout")
                && !content.contains("max-wait")
            {
                issues.push(
                    Issue::new(
                        Category::Database,
                        "connection timeout config",
                        "no connection timeout configuration found",
                        file,
                        Severity::Minor,
                    )
                    .with_line(line_number)
                    .with_suggestion("configure connection and idle timeouts")
                    .with_rule_id("connection-timeout"),
                );
                break;
            }
        }
    }

    issues
}

/// Query-method fields in entity files should be backed by single or
/// composite indexes.
pub fn check_index_optimization(file: &str, content: &str, lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();

    if !file.ends_with("Entity.java") && !content.contains("@Entity") {
        return issues;
    }

    let has_index = content.contains("@Index") || content.contains("@Indexed");

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        let line_number = i + 1;

        if (line.contains("findBy") || line.contains("where")) && !has_index && !content.contains("@Id")
        {
            if let Some(caps) = FIND_BY_FIELD.captures(line) {
                let field = &caps[1];
                let field_indexed = lines
                    .iter()
                    .any(|l| l.contains("@Index") && l.contains(&field.to_lowercase()));
                if !field_indexed {
                    issues.push(
                        Issue::new(
                            Category::Database,
                            "missing index",
                            format!("field {} is queried but may lack an index", field),
                            file,
                            Severity::Minor,
                        )
                        .with_line(line_number)
                        .with_suggestion("index frequently queried fields")
                        .with_rule_id("missing-index"),
                    );
                }
            }
        }

        if line.contains("findBy") && line.contains("And") {
            if let Some(caps) = FIND_BY_TWO_FIELDS.captures(line) {
                let (field1, field2) = (caps[1].to_string(), caps[2].to_string());
                let has_composite = lines.iter().any(|l| {
                    l.contains("@Index")
                        && l.contains(&field1.to_lowercase())
                        && l.contains(&field2.to_lowercase())
                });
                if !has_composite {
                    issues.push(
                        Issue::new(
                            Category::Database,
                            "missing composite index",
                            format!(
                                "combined query on {} and {} may need a composite index",
                                field1, field2
                            ),
                            file,
                            Severity::Minor,
                        )
                        .with_line(line_number)
                        .with_suggestion("create a composite index for combined query fields")
                        .with_rule_id("composite-index"),
                    );
                }
            }
        }
    }

    issues
}

/// Raw SQL shape: `SELECT *`, unspecified JOIN types, unindexed ORDER BY,
/// and oversized IN clauses.
pub fn check_sql_queries(file: &str, lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        let line_number = i + 1;

        if line.contains("SELECT *") || line.contains("select *") {
            issues.push(
                Issue::new(
                    Category::Database,
                    "SELECT * query",
                    "SELECT * fetches every column",
                    file,
                    Severity::Minor,
                )
                .with_line(line_number)
                .with_suggestion("select only the columns the caller needs")
                .with_rule_id("select-star"),
            );
        }

        if (line.contains("JOIN") || line.contains("join"))
            && !line.contains("INNER JOIN")
            && !line.contains("inner join")
            && !line.contains("LEFT JOIN")
            && !line.contains("left join")
        {
            issues.push(
                Issue::new(
                    Category::Database,
                    "JOIN type",
                    "JOIN type not specified",
                    file,
                    Severity::Info,
                )
                .with_line(line_number)
                .with_suggestion("spell out INNER JOIN or LEFT JOIN")
                .with_rule_id("join-type"),
            );
        }

        if (line.contains("ORDER BY") || line.contains("order by"))
            && !line.contains("INDEX")
            && !line.contains("index")
        {
            issues.push(
                Issue::new(
                    Category::Database,
                    "ORDER BY performance",
                    "ORDER BY may not be backed by an index",
                    file,
                    Severity::Info,
                )
                .with_line(line_number)
                .with_suggestion("sort on indexed columns")
                .with_rule_id("order-by"),
            );
        }

        if let Some(caps) = IN_CLAUSE.captures(line) {
            let element_count = caps[1].split(',').count();
            if element_count > MAX_IN_CLAUSE_ELEMENTS {
                issues.push(
                    Issue::new(
                        Category::Database,
                        "IN clause size",
                        format!("IN clause has {} elements", element_count),
                        file,
                        Severity::Major,
                    )
                    .with_line(line_number)
                    .with_suggestion("batch the lookup or rewrite as a JOIN")
                    .with_rule_id("in-clause-size"),
                );
            }
        }
    }

    issues
}

/// JPA entity configuration: no-arg constructor, Serializable, lazy
/// collection associations, and repositories without custom queries.
pub fn check_orm_usage(file: &str, content: &str, lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();

    if file.ends_with("Entity.java") || content.contains("@Entity") {
        if let Some(caps) = CLASS_NAME.captures(content) {
            let class_name = &caps[1];
            let has_param_ctor = lines
                .iter()
                .any(|l| l.contains(&format!("{}(", class_name)) && !l.contains(&format!("{}()", class_name)) && !l.contains("new "));
            let has_no_arg_ctor = content.contains(&format!("{}()", class_name));
            if has_param_ctor && !has_no_arg_ctor {
                issues.push(
                    Issue::new(
                        Category::Database,
                        "missing no-arg constructor",
                        "JPA entity has no no-arg constructor",
                        file,
                        Severity::Major,
                    )
                    .with_suggestion("JPA requires a no-arg constructor on entities")
                    .with_rule_id("no-arg-constructor"),
                );
            }
        }

        if !content.contains("implements Serializable") {
            issues.push(
                Issue::new(
                    Category::Database,
                    "not Serializable",
                    "JPA entity does not implement Serializable",
                    file,
                    Severity::Minor,
                )
                .with_suggestion("implement Serializable on entities")
                .with_rule_id("serializable"),
            );
        }

        for (i, raw) in lines.iter().enumerate() {
            let line = raw.trim();
            if (line.contains("@OneToMany") || line.contains("@ManyToMany"))
                && !line.contains("fetch = FetchType.LAZY")
            {
                issues.push(
                    Issue::new(
                        Category::Database,
                        "eager collection association",
                        "collection association is not explicitly lazy",
                        file,
                        Severity::Minor,
                    )
                    .with_line(i + 1)
                    .with_suggestion("set fetch = FetchType.LAZY")
                    .with_rule_id("lazy-loading"),
                );
            }
        }
    }

    if (file.ends_with("Repository.java") || file.ends_with("Dao.java"))
        && !content.contains("@Query")
        && lines.len() > 50
    {
        issues.push(
            Issue::new(
                Category::Database,
                "missing custom query",
                "large repository defines no custom queries",
                file,
                Severity::Info,
            )
            .with_suggestion("use @Query to optimize complex lookups")
            .with_rule_id("custom-query"),
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
    fn test_oversized_pool() {
        let src = "spring.datasource.hikari.maximum-pool-size: 80\nspring.datasource.hikari.idle-timeout: 10000";
        let issues = check_connection_pool("application.yml", src, &lines(src));
        let pool = issues.iter().find(|i| i.rule_id == "connection-pool-size").unwrap();
        assert_eq!(pool.severity, Severity::Minor);
        assert!(pool.description.contains("80"));
    }

    #[test]
    fn test_missing_timeout_reported_once() {
        let src = "spring.datasource.url: jdbc:mysql://db/prod\nspring.datasource.username: app\nspring.datasource.password: ${DB_PASSWORD}";
        let issues = check_connection_pool("application.yml", src, &lines(src));
        let timeouts: Vec<_> = issues
            .iter()
            .filter(|i| i.rule_id == "connection-timeout")
            .collect();
        assert_eq!(timeouts.len(), 1);
    }

    #[test]
    fn test_select_star_and_join_type() {
        let src = "\
String q = \"SELECT * FROM users u JOIN orders o ON u.id = o.user_id\";";
        let issues = check_sql_queries("Dao.java", &lines(src));
        assert!(issues.iter().any(|i| i.rule_id == "select-star"));
        assert!(issues.iter().any(|i| i.rule_id == "join-type"));
    }

    #[test]
    fn test_in_clause_over_limit() {
        let elements = (0..150).map(|i| i.to_string()).collect::<Vec<_>>().join(",");
        let src = format!("String q = \"SELECT id FROM t WHERE id IN ({})\";", elements);
        let issues = check_sql_queries("Dao.java", &lines(&src));
        let in_clause = issues.iter().find(|i| i.rule_id == "in-clause-size").unwrap();
        assert_eq!(in_clause.severity, Severity::Major);
        assert!(in_clause.description.contains("150"));
    }

    #[test]
    fn test_in_clause_under_limit_unflagged() {
        let src = "String q = \"SELECT id FROM t WHERE id IN (1, 2, 3)\";";
        let issues = check_sql_queries("Dao.java", &lines(src));
        assert!(issues.iter().all(|i| i.rule_id != "in-clause-size"));
    }

    #[test]
    fn test_entity_without_serializable() {
        let src = "\
@Entity
public class User {
    @Id private Long id;
}";
        let issues = check_orm_usage("User.java", src, &lines(src));
        assert!(issues.iter().any(|i| i.rule_id == "serializable"));
    }

    #[test]
    fn test_entity_missing_no_arg_constructor() {
        let src = "\
@Entity
public class User implements Serializable {
    private String name;
    public User(String name) { this.name = name; }
}";
        let issues = check_orm_usage("User.java", src, &lines(src));
        assert!(issues.iter().any(|i| i.rule_id == "no-arg-constructor"));
        assert!(issues.iter().all(|i| i.rule_id != "serializable"));
    }

    #[test]
    fn test_eager_collection_association() {
        let src = "\
@Entity
public class Order implements Serializable {
    @OneToMany(mappedBy = \"order\")
    private List<Item> items;
    public Order() {}
}";
        let issues = check_orm_usage("Order.java", src, &lines(src));
        let lazy = issues.iter().find(|i| i.rule_id == "lazy-loading").unwrap();
        assert_eq!(lazy.line, Some(3));
    }
}
