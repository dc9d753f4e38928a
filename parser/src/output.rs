//! Output formatting for reports, diagnostics and bundles.

use runlog_core::{DashboardData, ReportBundle, StepOutcome, TestCase};

use crate::error::Result;
use crate::report::ParseReport;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Json,
    Yaml,
    Markdown,
    Table,
}

/// Formats a parse result. An empty-log result renders as `null` in JSON
/// and YAML.
pub fn format_dashboard(data: Option<&DashboardData>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&data)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(&data)?),
        OutputFormat::Markdown => {
            Ok(data.map_or_else(|| "_Empty log._\n".to_string(), dashboard_to_markdown))
        }
        OutputFormat::Table => {
            Ok(data.map_or_else(|| "(empty log)\n".to_string(), dashboard_to_table))
        }
    }
}

/// Formats parse diagnostics.
pub fn format_parse_report(report: &ParseReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(report)?),
        OutputFormat::Markdown => Ok(parse_report_to_markdown(report)),
        OutputFormat::Table => Ok(parse_report_to_table(report)),
    }
}

/// Formats a batch bundle. Markdown and table render one summary row per
/// source.
pub fn format_bundle(bundle: &ReportBundle, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(bundle)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(bundle)?),
        OutputFormat::Markdown | OutputFormat::Table => Ok(bundle_to_table(bundle)),
    }
}

fn status_icon(case: &TestCase) -> &'static str {
    match case.status {
        runlog_core::CaseStatus::Passed => "✓",
        runlog_core::CaseStatus::Failed => "✗",
        runlog_core::CaseStatus::Skipped => "-",
    }
}

fn dashboard_to_markdown(data: &DashboardData) -> String {
    let mut out = String::new();
    let summary = &data.summary;

    out.push_str("# Test Run Report\n\n");
    out.push_str(&format!(
        "**Total:** {}  **Passed:** {}  **Failed:** {}  **Skipped:** {}\n\n",
        summary.total, summary.passed, summary.failed, summary.skipped
    ));
    if data.is_low_confidence() {
        out.push_str("> No reliable test structure was found in part of this log.\n\n");
    }

    for case in &data.test_cases {
        out.push_str(&format!("## {} {}\n\n", status_icon(case), case.title));
        out.push_str(&format!(
            "**Status:** {}  **Browser:** {}  **Duration:** {}\n\n",
            case.status, case.browser, case.duration
        ));

        if !case.errors.is_empty() {
            out.push_str("### Errors\n\n");
            for error in &case.errors {
                out.push_str(&format!("- {error}\n"));
            }
            out.push('\n');
        }

        if !case.videos.is_empty() || !case.screenshots.is_empty() {
            out.push_str("### Artifacts\n\n");
            for video in &case.videos {
                out.push_str(&format!("- [video]({video})\n"));
            }
            for shot in &case.screenshots {
                out.push_str(&format!("- ![screenshot]({shot})\n"));
            }
            out.push('\n');
        }

        if !case.steps.is_empty() {
            out.push_str("### Steps\n\n");
            out.push_str("| Type | Status | Content |\n");
            out.push_str("|------|--------|---------|\n");
            for step in &case.steps {
                let outcome = match step.outcome {
                    StepOutcome::Pass => "PASS",
                    StepOutcome::Fail => "FAIL",
                    StepOutcome::Info => "INFO",
                };
                out.push_str(&format!(
                    "| {} | {outcome} | {} |\n",
                    step.kind,
                    step.content.replace('|', "\\|")
                ));
            }
            out.push('\n');
        }
    }

    out
}

fn dashboard_to_table(data: &DashboardData) -> String {
    let mut out = String::new();
    let summary = &data.summary;

    out.push_str(&format!(
        "Total: {}  Passed: {}  Failed: {}  Skipped: {}\n",
        summary.total, summary.passed, summary.failed, summary.skipped
    ));

    let title_width = data
        .test_cases
        .iter()
        .map(|case| case.title.chars().count())
        .max()
        .unwrap_or(5)
        .max(5);

    out.push_str(&format!(
        "  {:<title_width$}  {:<7}  {:<8}  {:>5}  {:>6}  {:>6}\n",
        "TITLE", "STATUS", "BROWSER", "STEPS", "ERRORS", "VIDEOS"
    ));
    for case in &data.test_cases {
        out.push_str(&format!(
            "  {:<title_width$}  {:<7}  {:<8}  {:>5}  {:>6}  {:>6}\n",
            case.title,
            case.status.to_string(),
            case.browser,
            case.steps.len(),
            case.errors.len(),
            case.videos.len()
        ));
    }

    out
}

fn parse_report_to_markdown(report: &ParseReport) -> String {
    let mut out = String::new();

    out.push_str("# Parse Diagnostics\n\n");
    out.push_str(&format!("**Coverage:** {:.0}%\n\n", report.coverage() * 100.0));
    out.push_str(&format!(
        "**Lines:** {} total, {} blank, {} global ({} duplicate), {} attributed, {} orphaned\n\n",
        report.total_lines,
        report.blank_lines,
        report.global_lines,
        report.duplicate_global_lines,
        report.attributed_lines,
        report.orphaned_lines
    ));
    out.push_str(&format!("**Browser:** {}\n\n", report.detected_browser));

    if !report.rule_hits.is_empty() {
        out.push_str("| Rule | Lines |\n");
        out.push_str("|------|-------|\n");
        for (rule, count) in &report.rule_hits {
            out.push_str(&format!("| {rule} | {count} |\n"));
        }
        out.push('\n');
    }

    if !report.warnings.is_empty() {
        out.push_str("## Warnings\n\n");
        for warning in &report.warnings {
            out.push_str(&format!("- {warning}\n"));
        }
        out.push('\n');
    }

    out
}

fn parse_report_to_table(report: &ParseReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Coverage: {:.0}%  Lines: {}  Attributed: {}  Global: {}  Orphaned: {}\n",
        report.coverage() * 100.0,
        report.total_lines,
        report.attributed_lines,
        report.global_lines,
        report.orphaned_lines
    ));
    for (rule, count) in &report.rule_hits {
        out.push_str(&format!("  {rule:<14} {count:>6}\n"));
    }
    for warning in &report.warnings {
        out.push_str(&format!("  warning: {warning}\n"));
    }

    out
}

fn bundle_to_table(bundle: &ReportBundle) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Bundle {} generated {} ({} report(s), {} case(s))\n",
        bundle.version,
        bundle.generated_at,
        bundle.report_count(),
        bundle.total_cases()
    ));
    for entry in &bundle.reports {
        match &entry.report {
            Some(report) => out.push_str(&format!(
                "  {}  total={} passed={} failed={} skipped={}\n",
                entry.source,
                report.summary.total,
                report.summary.passed,
                report.summary.failed,
                report.summary.skipped
            )),
            None => out.push_str(&format!("  {}  (empty log)\n", entry.source)),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_log;

    const LOG: &str = "Scenario: Login\n▶ open page\n✗ button missing";

    #[test]
    fn test_json_output_uses_wire_names() {
        let data = parse_log(LOG, "").unwrap();
        let json = format_dashboard(Some(&data), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["summary"]["failed"], 1);
        assert_eq!(value["testCases"][0]["title"], "Login");
        assert_eq!(value["testCases"][0]["steps"][0]["type"], "step-start");
    }

    #[test]
    fn test_empty_result_is_null_json() {
        assert_eq!(format_dashboard(None, OutputFormat::Json).unwrap(), "null");
    }

    #[test]
    fn test_markdown_lists_errors_and_steps() {
        let data = parse_log(LOG, "").unwrap();
        let md = format_dashboard(Some(&data), OutputFormat::Markdown).unwrap();

        assert!(md.contains("## ✗ Login"));
        assert!(md.contains("- button missing"));
        assert!(md.contains("| failure | FAIL | ✗ button missing |"));
    }

    #[test]
    fn test_table_has_one_row_per_case() {
        let data = parse_log("Scenario: A\nScenario: B", "").unwrap();
        let table = format_dashboard(Some(&data), OutputFormat::Table).unwrap();
        assert_eq!(table.lines().count(), 4);
    }

    #[test]
    fn test_parse_report_markdown_has_rules() {
        let (_, report) = crate::parse_log_with_report(LOG, "@smoke");
        let md = format_parse_report(&report, OutputFormat::Markdown).unwrap();
        assert!(md.contains("| known-title | 1 |"));
        assert!(md.contains("| step-marker | 2 |"));
    }
}
