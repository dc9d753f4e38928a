//! Structured diagnostics for one parse run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-run parse diagnostics.
///
/// Describes how each transcript line was handled so callers can judge how
/// much of a report came from explicit structure and how much from
/// fallback heuristics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseReport {
    /// Tag filter the caller passed in. Echoed only; it does not affect parsing.
    pub tag_filter: String,
    pub total_lines: usize,
    pub blank_lines: usize,
    pub global_lines: usize,
    pub duplicate_global_lines: usize,
    pub attributed_lines: usize,
    pub orphaned_lines: usize,
    /// Attribution rule name → number of lines it claimed.
    pub rule_hits: BTreeMap<String, usize>,
    /// Titles found by `Feature:`/`Scenario:` declarations.
    pub declared_titles: Vec<String>,
    pub detected_browser: String,
    /// Every distinct browser seen, in detection order.
    pub browsers_seen: Vec<String>,
    /// Whether a synthesized fallback case is part of the result.
    pub synthetic_fallback: bool,
    pub warnings: Vec<String>,
}

impl ParseReport {
    pub(crate) fn record_rule(&mut self, rule: &str) {
        *self.rule_hits.entry(rule.to_string()).or_insert(0) += 1;
    }

    /// Fraction of non-blank lines that were attributed to a test case or
    /// kept as a global step.
    pub fn coverage(&self) -> f64 {
        let relevant = self.total_lines.saturating_sub(self.blank_lines);
        if relevant == 0 {
            return 0.0;
        }
        (self.attributed_lines + self.global_lines + self.duplicate_global_lines) as f64
            / relevant as f64
    }

    pub(crate) fn collect_warnings(&mut self) {
        if self.total_lines > self.blank_lines && self.declared_titles.is_empty() {
            self.warnings.push(
                "No Feature:/Scenario: declarations found; test cases were inferred heuristically"
                    .to_string(),
            );
        }
        if self.orphaned_lines > 0 {
            self.warnings.push(format!(
                "{} orphaned line(s) could not be attributed and were dropped",
                self.orphaned_lines
            ));
        }
        if self.browsers_seen.len() > 1 {
            self.warnings.push(format!(
                "Multiple browsers detected ({}); every test case is labelled with the last one ({})",
                self.browsers_seen.join(", "),
                self.detected_browser
            ));
        }
        if self.synthetic_fallback {
            self.warnings.push(
                "Result contains a synthesized fallback test case; structure is low-confidence"
                    .to_string(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_ignores_blank_lines() {
        let report = ParseReport {
            total_lines: 10,
            blank_lines: 2,
            global_lines: 1,
            attributed_lines: 5,
            orphaned_lines: 2,
            ..ParseReport::default()
        };
        assert!((report.coverage() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_coverage_of_empty_report_is_zero() {
        assert_eq!(ParseReport::default().coverage(), 0.0);
    }

    #[test]
    fn test_warnings_flag_multiple_browsers() {
        let mut report = ParseReport {
            total_lines: 3,
            declared_titles: vec!["Login".to_string()],
            browsers_seen: vec!["Chrome".to_string(), "Firefox".to_string()],
            detected_browser: "Firefox".to_string(),
            ..ParseReport::default()
        };
        report.collect_warnings();
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("Chrome, Firefox"));
    }

    #[test]
    fn test_record_rule_counts() {
        let mut report = ParseReport::default();
        report.record_rule("known-title");
        report.record_rule("known-title");
        report.record_rule("carryover");
        assert_eq!(report.rule_hits["known-title"], 2);
        assert_eq!(report.rule_hits["carryover"], 1);
    }
}
