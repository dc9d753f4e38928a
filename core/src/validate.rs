//! Report and bundle validation.
//!
//! Checks the structural invariants every parsed report must hold: summary
//! counts agree with the case list, step outcomes agree with step kinds, ids
//! are present and unique, and the `video` field mirrors the last recorded
//! video.
//!
//! # Examples
//!
//! ```
//! use runlog_core::*;
//!
//! let report = DashboardData::new(vec![TestCase::new("Checkout", "Chrome")]);
//! assert!(validate_report(&report).is_empty());
//!
//! // A summary that disagrees with the case list is rejected.
//! let mut bad = report.clone();
//! bad.summary.total = 3;
//! assert!(!validate_report(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{CaseStatus, DashboardData, ReportBundle, TestCase};

/// Report/bundle validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Bundle version string is empty.
    #[error("bundle version cannot be empty")]
    EmptyBundleVersion,
    /// Two reports in the same bundle share a source name.
    #[error("duplicate source in bundle: {0}")]
    DuplicateSource(String),
    /// `summary.total` differs from the number of cases.
    #[error("summary total {summary} does not match {actual} test cases")]
    TotalMismatch { summary: usize, actual: usize },
    /// A per-status count differs from the cases' statuses.
    #[error("summary count for {status} is {summary}, expected {actual}")]
    StatusCountMismatch {
        status: CaseStatus,
        summary: usize,
        actual: usize,
    },
    /// A case has an empty id or title.
    #[error("test case has an empty id or title")]
    EmptyCase,
    /// Two cases share an id.
    #[error("duplicate test case id: {0}")]
    DuplicateCaseId(String),
    /// A step's outcome cannot be derived from its kind.
    #[error("step {index} of '{case}' has an outcome that does not match its kind")]
    StepOutcomeMismatch { case: String, index: usize },
    /// `video` is not the last entry of `videos`.
    #[error("video field of '{0}' is not the last recorded video")]
    VideoMismatch(String),
}

/// Validates a bundle: non-empty version, unique sources, and every
/// contained report.
pub fn validate_bundle(bundle: &ReportBundle) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if bundle.version.trim().is_empty() {
        errors.push(ValidationError::EmptyBundleVersion);
        return errors;
    }

    let mut seen_sources: HashSet<&str> = HashSet::new();
    for entry in &bundle.reports {
        if !seen_sources.insert(entry.source.as_str()) {
            errors.push(ValidationError::DuplicateSource(entry.source.clone()));
            return errors;
        }
        if let Some(report) = &entry.report {
            errors.extend(validate_report(report));
        }
    }

    errors
}

/// Validates a single report.
pub fn validate_report(report: &DashboardData) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let summary = &report.summary;

    if summary.total != report.test_cases.len() {
        errors.push(ValidationError::TotalMismatch {
            summary: summary.total,
            actual: report.test_cases.len(),
        });
    }

    for (status, counted) in [
        (CaseStatus::Passed, summary.passed),
        (CaseStatus::Failed, summary.failed),
        (CaseStatus::Skipped, summary.skipped),
    ] {
        let actual = report
            .test_cases
            .iter()
            .filter(|case| case.status == status)
            .count();
        if actual != counted {
            errors.push(ValidationError::StatusCountMismatch {
                status,
                summary: counted,
                actual,
            });
        }
    }

    let mut seen_ids: HashSet<&str> = HashSet::new();
    for case in &report.test_cases {
        if !seen_ids.insert(case.id.as_str()) {
            errors.push(ValidationError::DuplicateCaseId(case.id.clone()));
        }
        errors.extend(validate_case(case));
    }

    errors
}

fn validate_case(case: &TestCase) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if case.id.is_empty() || case.title.trim().is_empty() {
        errors.push(ValidationError::EmptyCase);
    }

    for (index, step) in case.steps.iter().enumerate() {
        if step.kind.outcome() != step.outcome {
            errors.push(ValidationError::StepOutcomeMismatch {
                case: case.title.clone(),
                index,
            });
        }
    }

    if case.video.as_ref() != case.videos.last() {
        errors.push(ValidationError::VideoMismatch(case.title.clone()));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BundleEntry, StepKind, StepOutcome};

    #[test]
    fn test_valid_report_passes() {
        let mut case = TestCase::new("Login", "Chrome");
        case.push_step(StepKind::Success, "✓ ok");
        case.record_video("http://h/videos/a.webm".into(), "📹 a.webm");
        let report = DashboardData::new(vec![case]);

        assert!(validate_report(&report).is_empty());
    }

    #[test]
    fn test_status_count_mismatch_detected() {
        let mut report = DashboardData::new(vec![TestCase::new("Login", "Chrome")]);
        report.test_cases[0].mark_failed();

        let errors = validate_report(&report);
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::StatusCountMismatch {
                status: CaseStatus::Failed,
                ..
            }
        )));
    }

    #[test]
    fn test_step_outcome_mismatch_detected() {
        let mut case = TestCase::new("Login", "Chrome");
        case.push_step(StepKind::Failure, "✗ nope");
        case.steps[0].outcome = StepOutcome::Pass;
        let report = DashboardData::new(vec![case]);

        assert_eq!(
            validate_report(&report),
            vec![ValidationError::StepOutcomeMismatch {
                case: "Login".to_string(),
                index: 0
            }]
        );
    }

    #[test]
    fn test_duplicate_ids_detected() {
        let report = DashboardData::new(vec![
            TestCase::new("a b", "Chrome"),
            TestCase::new("a-b", "Chrome"),
        ]);
        assert!(
            validate_report(&report)
                .iter()
                .any(|e| matches!(e, ValidationError::DuplicateCaseId(id) if id == "a-b"))
        );
    }

    #[test]
    fn test_video_mismatch_detected() {
        let mut case = TestCase::new("Login", "Chrome");
        case.video = Some("http://h/videos/a.webm".into());
        let report = DashboardData::new(vec![case]);

        assert!(matches!(
            validate_report(&report).as_slice(),
            [ValidationError::VideoMismatch(_)]
        ));
    }

    #[test]
    fn test_bundle_duplicate_source() {
        let mut bundle = ReportBundle::new("1.0.0", "2026-01-01T00:00:00Z");
        bundle.reports.push(BundleEntry::new("run.log", None));
        bundle.reports.push(BundleEntry::new("run.log", None));

        assert_eq!(
            validate_bundle(&bundle),
            vec![ValidationError::DuplicateSource("run.log".to_string())]
        );
    }

    #[test]
    fn test_bundle_empty_version() {
        let bundle = ReportBundle::new(" ", "2026-01-01T00:00:00Z");
        assert_eq!(
            validate_bundle(&bundle),
            vec![ValidationError::EmptyBundleVersion]
        );
    }
}
