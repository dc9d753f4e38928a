use serde::{Deserialize, Serialize};

use crate::DashboardData;

/// One parsed transcript inside a [`ReportBundle`].
///
/// `report` is `None` when the source log was empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleEntry {
    /// Where the transcript came from (usually a file path).
    pub source: String,
    pub report: Option<DashboardData>,
}

impl BundleEntry {
    pub fn new(source: impl Into<String>, report: Option<DashboardData>) -> Self {
        Self {
            source: source.into(),
            report,
        }
    }
}

/// Serializable bundle of reports produced by one batch run.
///
/// # Examples
///
/// ```
/// use runlog_core::*;
///
/// let mut bundle = ReportBundle::new("1.0.0", "2026-01-15T10:30:00Z");
/// bundle.reports.push(BundleEntry::new(
///     "nightly.log",
///     Some(DashboardData::new(vec![TestCase::new("Checkout", "Chrome")])),
/// ));
/// bundle.reports.push(BundleEntry::new("empty.log", None));
///
/// assert_eq!(bundle.report_count(), 2);
/// assert_eq!(bundle.total_cases(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportBundle {
    /// Report contract version (populated from
    /// [`REPORT_CONTRACT_VERSION`](crate::REPORT_CONTRACT_VERSION)).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_version: Option<String>,
    /// Version of the tool that produced the bundle.
    pub version: String,
    /// ISO-8601 timestamp for bundle creation.
    pub generated_at: String,
    pub reports: Vec<BundleEntry>,
}

impl ReportBundle {
    pub fn new(version: impl Into<String>, generated_at: impl Into<String>) -> Self {
        Self {
            contract_version: Some(crate::REPORT_CONTRACT_VERSION.to_string()),
            version: version.into(),
            generated_at: generated_at.into(),
            reports: Vec::new(),
        }
    }

    /// Returns the number of reports in this bundle.
    pub fn report_count(&self) -> usize {
        self.reports.len()
    }

    /// Sums the case counts of every non-empty report.
    pub fn total_cases(&self) -> usize {
        self.reports
            .iter()
            .filter_map(|entry| entry.report.as_ref())
            .map(|report| report.summary.total)
            .sum()
    }
}
