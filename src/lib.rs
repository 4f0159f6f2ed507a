//! Springlint - heuristic code review for Java/Spring-Boot projects.
//!
//! Springlint scans a Maven or Gradle source tree with 13 rule-based
//! checkers working on raw file text (no AST), aggregates the findings
//! into a scored report, and renders it as JSON, Markdown, or HTML.
//!
//! # Architecture
//!
//! - `issue`: the finding data model (`Issue`, `Severity`, `Category`)
//! - `checkers`: the 13 category checkers behind the `Checker` trait
//! - `project`: build-system probing and file inventories
//! - `engine`: file resolution and ordered checker dispatch
//! - `report`: report synthesis, scoring, and rendering
//! - `config`: optional `springlint.yaml` scan defaults
//! - `cli`: the `scan` and `report` subcommands
//!
//! # Adding a New Checker
//!
//! Implement the `Checker` trait in `src/checkers/`, add the category to
//! `issue::Category` and `ALL_CATEGORIES`, and register the checker in
//! `checkers::all_checkers`. Registration order is the order issues are
//! reported in.

pub mod checkers;
pub mod cli;
pub mod config;
pub mod engine;
pub mod issue;
pub mod logging;
pub mod project;
pub mod report;

pub use checkers::{all_checkers, Checker};
pub use engine::{ReviewEngine, ScanOptions};
pub use issue::{Category, Issue, ScanResult, Severity, Summary, ALL_CATEGORIES};
pub use logging::Logger;
pub use project::{probe_project, BuildSystem, ProjectInfo};
pub use report::{create_report, render, write_report, ReportFormat, ReviewReport};
