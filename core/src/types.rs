//! Report type definitions for reconstructed test runs.
//!
//! This module defines the data model produced by the log parser. Field names
//! and enum spellings are part of the wire contract consumed by the dashboard,
//! so every type here serializes with [`serde`] to the exact JSON shape the UI
//! reads (`testCases`, `type`, `"PASSED"`, ...).

use serde::{Deserialize, Serialize};

/// Version of the report contract (semver).
///
/// Embedded in every [`ReportBundle`](crate::ReportBundle) to track
/// compatibility across report versions.
pub const REPORT_CONTRACT_VERSION: &str = "1.0.0";

/// Title of the case synthesized when a log contains no recognizable
/// structure at all.
pub const EXECUTION_LOG_TITLE: &str = "Execution Log";

/// Title of the case synthesized when step or artifact lines appear before
/// any test case has been identified.
pub const TEST_EXECUTION_TITLE: &str = "Test Execution";

/// Kind of a classified log line.
///
/// # Examples
///
/// ```
/// use runlog_core::{StepKind, StepOutcome};
///
/// assert_eq!(StepKind::Failure.outcome(), StepOutcome::Fail);
/// assert_eq!(StepKind::Video.outcome(), StepOutcome::Pass);
/// assert_eq!(StepKind::StepStart.outcome(), StepOutcome::Info);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    /// A step began executing.
    StepStart,
    /// A step finished successfully.
    Success,
    /// A step reported an explicit failure.
    Failure,
    /// Plain informational output.
    Log,
    /// A video recording was saved.
    Video,
    /// A screenshot was saved.
    Screenshot,
    /// A generic error, exception or assertion message.
    Error,
}

impl StepKind {
    /// Derives the outcome of a step from its kind.
    ///
    /// This is the only place the mapping lives; [`TestStep::new`] always
    /// goes through it, so a step's outcome can never disagree with its kind.
    pub fn outcome(self) -> StepOutcome {
        match self {
            Self::Failure | Self::Error => StepOutcome::Fail,
            Self::Success | Self::Video | Self::Screenshot => StepOutcome::Pass,
            Self::StepStart | Self::Log => StepOutcome::Info,
        }
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StepStart => write!(f, "step-start"),
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
            Self::Log => write!(f, "log"),
            Self::Video => write!(f, "video"),
            Self::Screenshot => write!(f, "screenshot"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Outcome attached to a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StepOutcome {
    Pass,
    Fail,
    Info,
}

/// Status of a reconstructed test case.
///
/// # Examples
///
/// ```
/// use runlog_core::CaseStatus;
///
/// assert_eq!(CaseStatus::default(), CaseStatus::Passed);
/// assert_eq!(serde_json::to_string(&CaseStatus::Failed).unwrap(), "\"FAILED\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum CaseStatus {
    /// No failure has been observed (the starting state).
    #[default]
    Passed,
    /// At least one failure or error line was attributed to the case.
    Failed,
    Skipped,
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Passed => write!(f, "PASSED"),
            Self::Failed => write!(f, "FAILED"),
            Self::Skipped => write!(f, "SKIPPED"),
        }
    }
}

/// One classified line belonging to a test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestStep {
    #[serde(rename = "type")]
    pub kind: StepKind,
    pub content: String,
    #[serde(rename = "status")]
    pub outcome: StepOutcome,
}

impl TestStep {
    /// Creates a step whose outcome is derived from `kind`.
    ///
    /// # Examples
    ///
    /// ```
    /// use runlog_core::{StepKind, StepOutcome, TestStep};
    ///
    /// let step = TestStep::new(StepKind::Success, "✓ page opened");
    /// assert_eq!(step.outcome, StepOutcome::Pass);
    ///
    /// let json = serde_json::to_value(&step).unwrap();
    /// assert_eq!(json["type"], "success");
    /// assert_eq!(json["status"], "PASS");
    /// ```
    pub fn new(kind: StepKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            outcome: kind.outcome(),
        }
    }

    /// Creates an informational log step.
    pub fn log(content: impl Into<String>) -> Self {
        Self::new(StepKind::Log, content)
    }
}

/// One logical test or scenario reconstructed from a transcript.
///
/// Cases start out [`CaseStatus::Passed`] and can only move to
/// [`CaseStatus::Failed`] through [`mark_failed`](TestCase::mark_failed) or
/// [`record_failure`](TestCase::record_failure); nothing moves them back.
///
/// # Examples
///
/// ```
/// use runlog_core::{CaseStatus, StepKind, TestCase};
///
/// let mut case = TestCase::new("Valid login", "Chrome");
/// assert_eq!(case.id, "valid-login");
/// assert_eq!(case.status, CaseStatus::Passed);
///
/// case.push_step(StepKind::StepStart, "▶ open page");
/// case.record_failure(StepKind::Failure, "✗ timed out", "timed out");
/// assert_eq!(case.status, CaseStatus::Failed);
/// assert_eq!(case.errors, vec!["timed out".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Stable slug derived from the title.
    pub id: String,
    /// Display name (scenario name, file stem, or a synthetic fallback).
    pub title: String,
    pub status: CaseStatus,
    /// Synthetic duration derived from the step count (e.g. `"12s"`).
    pub duration: String,
    pub browser: String,
    pub steps: Vec<TestStep>,
    /// Last video URL recorded for this case.
    pub video: Option<String>,
    pub videos: Vec<String>,
    pub errors: Vec<String>,
    pub screenshots: Vec<String>,
}

impl TestCase {
    /// Creates an empty, passing case for `title`.
    pub fn new(title: &str, browser: &str) -> Self {
        Self {
            id: slugify(title),
            title: title.to_string(),
            status: CaseStatus::Passed,
            duration: "0s".to_string(),
            browser: browser.to_string(),
            steps: Vec::new(),
            video: None,
            videos: Vec::new(),
            errors: Vec::new(),
            screenshots: Vec::new(),
        }
    }

    /// Appends a step of the given kind.
    pub fn push_step(&mut self, kind: StepKind, content: impl Into<String>) {
        self.steps.push(TestStep::new(kind, content));
    }

    /// Irrevocably marks the case as failed.
    pub fn mark_failed(&mut self) {
        self.status = CaseStatus::Failed;
    }

    /// Records a failing line: the message goes to `errors`, a failing step
    /// is appended and the case is marked failed.
    pub fn record_failure(
        &mut self,
        kind: StepKind,
        content: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.errors.push(message.into());
        self.push_step(kind, content);
        self.mark_failed();
    }

    /// Records a video URL and the line that announced it.
    pub fn record_video(&mut self, url: String, content: impl Into<String>) {
        self.video = Some(url.clone());
        self.videos.push(url);
        self.push_step(StepKind::Video, content);
    }

    /// Records a screenshot URL. Screenshots do not produce a step.
    pub fn record_screenshot(&mut self, url: String) {
        self.screenshots.push(url);
    }

    /// Returns `true` if this case was synthesized rather than declared.
    pub fn is_synthetic(&self) -> bool {
        self.title == EXECUTION_LOG_TITLE || self.title == TEST_EXECUTION_TITLE
    }
}

/// Case counts by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Summary {
    /// Counts case statuses.
    ///
    /// # Examples
    ///
    /// ```
    /// use runlog_core::{Summary, TestCase};
    ///
    /// let mut failing = TestCase::new("b", "Chrome");
    /// failing.mark_failed();
    /// let cases = vec![TestCase::new("a", "Chrome"), failing];
    ///
    /// let summary = Summary::from_cases(&cases);
    /// assert_eq!((summary.total, summary.passed, summary.failed), (2, 1, 1));
    /// ```
    pub fn from_cases(cases: &[TestCase]) -> Self {
        let mut summary = Self {
            total: cases.len(),
            ..Self::default()
        };
        for case in cases {
            match case.status {
                CaseStatus::Passed => summary.passed += 1,
                CaseStatus::Failed => summary.failed += 1,
                CaseStatus::Skipped => summary.skipped += 1,
            }
        }
        summary
    }
}

/// Structured report reconstructed from one transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub summary: Summary,
    pub test_cases: Vec<TestCase>,
}

impl DashboardData {
    /// Builds a report, computing the summary from `test_cases`.
    pub fn new(test_cases: Vec<TestCase>) -> Self {
        Self {
            summary: Summary::from_cases(&test_cases),
            test_cases,
        }
    }

    /// Finds a case by its exact title.
    pub fn find_case(&self, title: &str) -> Option<&TestCase> {
        self.test_cases.iter().find(|case| case.title == title)
    }

    /// Returns `true` when the report contains a synthesized fallback case,
    /// meaning no structural markers were found for at least part of the log.
    ///
    /// # Examples
    ///
    /// ```
    /// use runlog_core::{DashboardData, TestCase, EXECUTION_LOG_TITLE};
    ///
    /// let report = DashboardData::new(vec![TestCase::new(EXECUTION_LOG_TITLE, "Unknown")]);
    /// assert!(report.is_low_confidence());
    ///
    /// let report = DashboardData::new(vec![TestCase::new("Checkout", "Chrome")]);
    /// assert!(!report.is_low_confidence());
    /// ```
    pub fn is_low_confidence(&self) -> bool {
        self.test_cases.iter().any(TestCase::is_synthetic)
    }
}

/// Derives a stable id from a title: lowercased, with every non-alphanumeric
/// character replaced by `-`.
///
/// # Examples
///
/// ```
/// use runlog_core::slugify;
///
/// assert_eq!(slugify("Valid login"), "valid-login");
/// assert_eq!(slugify("Cart: add item"), "cart--add-item");
/// assert_eq!(slugify("Giriş Testi"), "giriş-testi");
/// ```
pub fn slugify(title: &str) -> String {
    title
        .chars()
        .flat_map(char::to_lowercase)
        .map(|ch| if ch.is_alphanumeric() { ch } else { '-' })
        .collect()
}
