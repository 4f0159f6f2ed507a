//! Category checkers and the checker contract.
//!
//! Each checker is a self-contained rule set over raw file text. Checkers
//! filter the provided file list themselves, skip unreadable files with a
//! warning, and hold no state between invocations.

mod api_design;
mod code_structure;
mod configuration;
mod database;
mod environment;
mod exception_handling;
mod maintainability;
mod performance;
mod security;
mod service_relation;
mod thread_safety;
mod third_party;
mod transaction;

pub use api_design::ApiDesignChecker;
pub use code_structure::CodeStructureChecker;
pub use configuration::ConfigurationChecker;
pub use database::DatabaseChecker;
pub use environment::EnvironmentChecker;
pub use exception_handling::ExceptionHandlingChecker;
pub use maintainability::MaintainabilityChecker;
pub use performance::PerformanceChecker;
pub use security::SecurityChecker;
pub use service_relation::ServiceRelationChecker;
pub use thread_safety::ThreadSafetyChecker;
pub use third_party::ThirdPartyChecker;
pub use transaction::TransactionChecker;

use std::path::{Path, PathBuf};

use crate::issue::{Category, Issue};
use crate::logging::Logger;

/// A single-category rule set that scans files and emits issues.
pub trait Checker {
    /// The category this checker reports under.
    fn category(&self) -> Category;

    /// Scan the file set and return findings in file order, then line order.
    fn check(&self, files: &[PathBuf], root: &Path) -> anyhow::Result<Vec<Issue>>;
}

/// File contents split once for line-oriented rules.
pub struct FileData {
    pub content: String,
    pub lines: Vec<String>,
}

/// Read a file into `(content, lines)`. An unreadable file is logged as a
/// warning and yields `None`; the caller continues with the remainder.
pub fn read_file(path: &Path, logger: &Logger) -> Option<FileData> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let lines = content.lines().map(str::to_string).collect();
            Some(FileData { content, lines })
        }
        Err(e) => {
            logger.warn(format!("cannot read file {}: {}", path.display(), e));
            None
        }
    }
}

/// Select files with any of the given extensions, keeping the input order.
pub fn files_with_extension<'a>(files: &'a [PathBuf], exts: &[&str]) -> Vec<&'a PathBuf> {
    files
        .iter()
        .filter(|f| {
            f.extension()
                .and_then(|e| e.to_str())
                .map(|e| exts.contains(&e))
                .unwrap_or(false)
        })
        .collect()
}

/// All checkers, in registration order. This order is the externally
/// observable dispatch order for issues.
pub fn all_checkers(logger: &Logger) -> Vec<Box<dyn Checker>> {
    vec![
        Box::new(CodeStructureChecker::new(logger.child("CodeStructureChecker"))),
        Box::new(PerformanceChecker::new(logger.child("PerformanceChecker"))),
        Box::new(SecurityChecker::new(logger.child("SecurityChecker"))),
        Box::new(DatabaseChecker::new(logger.child("DatabaseChecker"))),
        Box::new(ThreadSafetyChecker::new(logger.child("ThreadSafetyChecker"))),
        Box::new(ApiDesignChecker::new(logger.child("ApiDesignChecker"))),
        Box::new(ExceptionHandlingChecker::new(
            logger.child("ExceptionHandlingChecker"),
        )),
        Box::new(ConfigurationChecker::new(logger.child("ConfigurationChecker"))),
        Box::new(ServiceRelationChecker::new(
            logger.child("ServiceRelationChecker"),
        )),
        Box::new(TransactionChecker::new(logger.child("TransactionChecker"))),
        Box::new(EnvironmentChecker::new(logger.child("EnvironmentChecker"))),
        Box::new(MaintainabilityChecker::new(
            logger.child("MaintainabilityChecker"),
        )),
        Box::new(ThirdPartyChecker::new(logger.child("ThirdPartyChecker"))),
    ]
}
