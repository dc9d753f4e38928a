//! Post-pass: merge global steps, stamp run-wide values, build the summary.

use runlog_core::{DashboardData, EXECUTION_LOG_TITLE, TestCase, TestStep};
use tracing::debug;

use super::ParseContext;
use crate::report::ParseReport;

/// Finalizes a parse context into a report.
///
/// Global steps are prepended to every case in discovery order, each case
/// gets a synthetic duration and the final detected browser. When no case
/// was ever created, the whole log becomes a single "Execution Log" case.
pub(super) fn finish(ctx: ParseContext<'_>, lines: &[String]) -> (DashboardData, ParseReport) {
    let ParseContext {
        config,
        mut cases,
        global_steps,
        detected_browser,
        mut report,
        ..
    } = ctx;

    if cases.is_empty() {
        debug!(
            lines = lines.len(),
            "No test case identified; returning the log as a single case"
        );
        let mut fallback = TestCase::new(EXECUTION_LOG_TITLE, &detected_browser);
        fallback.steps = lines
            .iter()
            .filter(|line| !line.is_empty())
            .map(|line| TestStep::log(line.as_str()))
            .collect();
        cases.push(fallback);
    } else {
        for case in &mut cases {
            let own_steps = std::mem::take(&mut case.steps);
            case.steps = global_steps.iter().cloned().chain(own_steps).collect();
        }
    }

    for case in &mut cases {
        let seconds = case.steps.len() as u64 * u64::from(config.step_duration_secs);
        case.duration = format!("{seconds}s");
        case.browser = detected_browser.clone();
    }

    report.detected_browser = detected_browser;
    report.synthetic_fallback = cases.iter().any(TestCase::is_synthetic);
    report.collect_warnings();

    let data = DashboardData::new(cases);
    debug!(
        total = data.summary.total,
        passed = data.summary.passed,
        failed = data.summary.failed,
        "Parsed execution log"
    );
    (data, report)
}
