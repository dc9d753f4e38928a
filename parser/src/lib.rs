//! Test-report reconstruction from parallel execution logs.
//!
//! This crate turns the raw, interleaved console transcript of a parallel
//! UI-test run (Cucumber/Playwright style) into a structured
//! [`DashboardData`]: test cases with status, steps, errors, browser,
//! synthetic duration and artifact URLs, plus a pass/fail summary.
//!
//! # Main entry points
//!
//! - [`parse_log`]: parse with the default configuration.
//! - [`parse_log_with_report`]: same, with per-run [`ParseReport`]
//!   diagnostics (rule hits, orphaned lines, warnings).
//! - [`LogParser`]: reusable parser bound to a [`ParserConfig`].
//! - [`ReportCache`]: memoizes results for logs that are re-parsed as they
//!   grow.
//!
//! # Example
//!
//! ```
//! use runlog_core::CaseStatus;
//! use runlog_parser::parse_log;
//!
//! let log = "\
//! 🚀 Starting test run
//! Scenario: Valid login
//! ▶ open login page
//! ✓ user sees dashboard
//! Scenario: Locked account
//! ✗ expected error banner
//! ";
//!
//! let data = parse_log(log, "@smoke").unwrap();
//! assert_eq!(data.summary.total, 2);
//! assert_eq!(data.summary.failed, 1);
//!
//! let locked = data.find_case("Locked account").unwrap();
//! assert_eq!(locked.status, CaseStatus::Failed);
//! // Run-wide banners are repeated at the top of every case.
//! assert_eq!(locked.steps[0].content, "🚀 Starting test run");
//! ```
//!
//! [`DashboardData`]: runlog_core::DashboardData

pub mod cache;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod report;

use runlog_core::DashboardData;

pub use cache::{ReportCache, content_digest};
pub use config::ParserConfig;
pub use error::{Result, RunlogError};
pub use parser::{LogParser, normalize_line, normalize_log};
pub use report::ParseReport;

/// Parses an execution log with the default configuration.
///
/// Returns `None` only when `log` is empty. Any non-empty input, including
/// whitespace-only input, produces a report. `tag_filter` is accepted for
/// display purposes and does not affect the result.
///
/// # Examples
///
/// ```
/// use runlog_parser::parse_log;
///
/// assert!(parse_log("", "").is_none());
///
/// let data = parse_log("just some output", "").unwrap();
/// assert_eq!(data.test_cases[0].title, "Execution Log");
/// ```
pub fn parse_log(log: &str, tag_filter: &str) -> Option<DashboardData> {
    LogParser::default().parse(log, tag_filter)
}

/// Parses an execution log and returns diagnostics alongside the result.
pub fn parse_log_with_report(log: &str, tag_filter: &str) -> (Option<DashboardData>, ParseReport) {
    LogParser::default().parse_with_report(log, tag_filter)
}
