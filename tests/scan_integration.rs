//! End-to-end scans over small on-disk project fixtures.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use springlint::{Category, Logger, ReviewEngine, ScanOptions, Severity};

fn maven_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("pom.xml"), "<project/>").unwrap();
    fs::create_dir_all(dir.path().join("src/main/java")).unwrap();
    dir
}

fn write_source(dir: &TempDir, name: &str, content: &str) {
    fs::write(dir.path().join("src/main/java").join(name), content).unwrap();
}

fn engine() -> ReviewEngine {
    ReviewEngine::new(Logger::new("test"))
}

#[test]
fn scan_missing_path_fails_before_io() {
    let result = engine().scan_project(Path::new("/definitely/not/here"), &ScanOptions::default());
    assert!(!result.success);
    assert!(result
        .message
        .as_deref()
        .unwrap()
        .contains("project path does not exist"));
    assert_eq!(result.summary.total_issues, 0);
    assert_eq!(result.summary.files_scanned, 0);
}

#[test]
fn scan_without_build_file_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("README.md"), "# not a java project").unwrap();
    let result = engine().scan_project(dir.path(), &ScanOptions::default());
    assert!(!result.success);
    assert!(result.message.as_deref().unwrap().contains("Maven or Gradle"));
}

#[test]
fn scan_reports_sql_injection_on_the_offending_line() {
    let dir = maven_project();
    write_source(
        &dir,
        "UserDao.java",
        "public class UserDao {\n\
         \x20   void load(String id) throws Exception {\n\
         \x20       String sql = \"SELECT * FROM t WHERE id=\" + id; stmt.executeQuery(sql);\n\
         \x20   }\n\
         }\n",
    );

    let result = engine().scan_project(dir.path(), &ScanOptions::default());
    assert!(result.success);

    let injection = result
        .issues
        .iter()
        .find(|i| i.issue_type == "SQL injection risk" && i.severity == Severity::Critical)
        .expect("critical SQL injection issue");
    assert_eq!(injection.category, Category::Security);
    assert_eq!(injection.line, Some(3));
}

#[test]
fn scan_reports_repeated_block_once_with_both_lines() {
    // One 3-line block repeated at lines 10-12 and 40-42, padded with
    // unique filler statements so no other window repeats.
    let block = "int total = a + b;\nint count = total * 2;\nsave(total, count);\n";
    let mut src = String::new();
    for n in 1..=9 {
        src.push_str(&format!("int f{} = {};\n", n, n));
    }
    src.push_str(block);
    for n in 13..=39 {
        src.push_str(&format!("int f{} = {};\n", n, n));
    }
    src.push_str(block);

    let dir = maven_project();
    write_source(&dir, "Calc.java", &src);

    let result = engine().scan_project(dir.path(), &ScanOptions::default());
    assert!(result.success);

    let duplicates: Vec<_> = result
        .issues
        .iter()
        .filter(|i| i.rule_id == "duplicate-code")
        .collect();
    assert_eq!(duplicates.len(), 1);
    assert!(duplicates[0].description.contains("10"));
    assert!(duplicates[0].description.contains("40"));
    assert_eq!(duplicates[0].line, Some(10));
}

#[test]
fn category_filter_suppresses_other_findings() {
    // Only a naming violation: requesting security must return nothing.
    let dir = maven_project();
    write_source(
        &dir,
        "bad_name.java",
        "public class bad_name {\n}\n",
    );

    let all = engine().scan_project(dir.path(), &ScanOptions::default());
    assert!(all
        .issues
        .iter()
        .any(|i| i.category == Category::CodeStructure));

    let options = ScanOptions {
        categories: Some(vec![Category::Security]),
        ..Default::default()
    };
    let security_only = engine().scan_project(dir.path(), &options);
    assert!(security_only.success);
    assert!(security_only.issues.is_empty());
}

#[test]
fn issues_follow_registration_then_file_order() {
    let dir = maven_project();
    // AlphaService triggers thread_safety; ZetaDao triggers database.
    write_source(
        &dir,
        "AlphaService.java",
        "@Service\npublic class AlphaService {\n    SimpleDateFormat fmt;\n}\n",
    );
    write_source(
        &dir,
        "ZetaDao.java",
        "public class ZetaDao {\n    String q = \"SELECT * FROM t\";\n}\n",
    );

    let options = ScanOptions {
        categories: Some(vec![Category::Database, Category::ThreadSafety]),
        ..Default::default()
    };
    let result = engine().scan_project(dir.path(), &options);
    assert!(result.success);

    // Database is registered before thread_safety, so its issues come first
    // even though ZetaDao sorts after AlphaService.
    let categories: Vec<_> = result.issues.iter().map(|i| i.category).collect();
    let first_thread_safety = categories
        .iter()
        .position(|c| *c == Category::ThreadSafety)
        .expect("thread safety issue");
    let last_database = categories
        .iter()
        .rposition(|c| *c == Category::Database)
        .expect("database issue");
    assert!(last_database < first_thread_safety);
}

#[test]
fn summary_counts_are_consistent() {
    let dir = maven_project();
    write_source(
        &dir,
        "Mixed.java",
        "public class Mixed {\n\
         \x20   String q = \"SELECT * FROM t\";\n\
         \x20   SimpleDateFormat fmt;\n\
         }\n",
    );

    let result = engine().scan_project(dir.path(), &ScanOptions::default());
    assert!(result.success);
    let s = &result.summary;
    assert_eq!(
        s.total_issues,
        s.critical_issues + s.major_issues + s.minor_issues + s.info_issues
    );
    assert_eq!(s.files_scanned, 1);
}

#[test]
fn unreadable_files_do_not_abort_the_scan() {
    let dir = maven_project();
    write_source(&dir, "Ok.java", "public class Ok {\n}\n");
    // Invalid UTF-8 makes the file unreadable for line-oriented checkers.
    fs::write(dir.path().join("src/main/java/Bad.java"), [0xff, 0xfe, 0x00]).unwrap();

    let result = engine().scan_project(dir.path(), &ScanOptions::default());
    assert!(result.success);
    assert_eq!(result.summary.files_scanned, 2);
}
