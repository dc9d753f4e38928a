//! Core report types for reconstructed test-run transcripts.
//!
//! This crate defines the structured result of parsing a parallel
//! Cucumber/Playwright-style execution log:
//!
//! - [`DashboardData`]: the parse result, a [`Summary`] plus the ordered
//!   list of [`TestCase`]s.
//! - [`TestCase`]: one logical test with its steps, status, artifacts and
//!   error messages.
//! - [`TestStep`]: one classified line; its [`StepOutcome`] is always
//!   derived from its [`StepKind`].
//! - [`ReportBundle`]: a versioned bundle of reports from a batch run.
//!
//! Validation ([`validate_report`], [`validate_bundle`]) checks the
//! invariants every parsed report must satisfy.
//!
//! # Example
//!
//! ```
//! use runlog_core::*;
//!
//! let mut case = TestCase::new("Valid login", "Chrome");
//! case.push_step(StepKind::StepStart, "▶ open page");
//! case.push_step(StepKind::Success, "✓ page opened");
//!
//! let report = DashboardData::new(vec![case]);
//! assert_eq!(report.summary.passed, 1);
//! assert!(validate_report(&report).is_empty());
//! ```

mod bundle;
mod types;
mod validate;

pub use bundle::{BundleEntry, ReportBundle};
pub use types::*;
pub use validate::{ValidationError, validate_bundle, validate_report};
