//! Execution-log parser.
//!
//! Reconstructs a structured report from one unstructured transcript of a
//! parallel test run. Lines from concurrently running tests are interleaved
//! and carry no reliable per-line test delimiter, so the parser works in
//! stages:
//!
//! 1. **Normalize**: strip ANSI codes and repair mis-decoded glyphs on every
//!    line ([`normalize_line`]).
//! 2. **Index**: pre-scan `Feature:`/`Scenario:` declarations to seed the
//!    known test-case titles.
//! 3. **Attribute**: an ordered rule table decides whether each line is a
//!    run-wide banner or which test case owns it.
//! 4. **Classify & aggregate**: attributed lines become steps, errors and
//!    artifacts on their case; global banners are merged into every case and
//!    the summary is computed.
//!
//! All mutable state lives in a parse context created per call, so a
//! [`LogParser`] can be shared freely across threads.

mod aggregate;
mod attribute;
mod classify;
mod index;
mod normalize;
mod patterns;

use std::collections::{HashMap, HashSet};

use runlog_core::{DashboardData, StepKind, TestCase, TestStep};
use tracing::{debug, trace};

use crate::config::ParserConfig;
use crate::report::ParseReport;
use attribute::{Line, Target};

pub use normalize::{normalize_line, normalize_log};

/// Parser for parallel test-run transcripts.
#[derive(Debug, Clone, Default)]
pub struct LogParser {
    config: ParserConfig,
}

impl LogParser {
    /// Creates a parser with the given configuration.
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses a transcript into a report.
    ///
    /// Returns `None` only for an empty log. `tag_filter` is accepted for
    /// callers that display it; it does not influence parsing.
    pub fn parse(&self, log: &str, tag_filter: &str) -> Option<DashboardData> {
        self.parse_with_report(log, tag_filter).0
    }

    /// Parses a transcript and also returns diagnostics for the run.
    pub fn parse_with_report(
        &self,
        log: &str,
        tag_filter: &str,
    ) -> (Option<DashboardData>, ParseReport) {
        let mut ctx = ParseContext::new(&self.config, tag_filter);
        if log.is_empty() {
            ctx.report.warnings.push("Empty execution log".to_string());
            return (None, ctx.report);
        }

        let lines = normalize_log(log);
        ctx.report.total_lines = lines.len();
        debug!(tag_filter, lines = lines.len(), "Parsing execution log");

        let declared = index::declared_titles(&lines);
        for title in &declared {
            ctx.get_or_create(title);
        }
        debug!(titles = ?declared, "Indexed declared test cases");
        ctx.report.declared_titles = declared;

        for line in &lines {
            ctx.consume(line);
        }

        let (data, report) = aggregate::finish(ctx, &lines);
        (Some(data), report)
    }
}

/// Mutable state of a single parse call.
struct ParseContext<'a> {
    config: &'a ParserConfig,
    /// Cases in creation order; their titles are the known titles.
    cases: Vec<TestCase>,
    lowered_titles: Vec<String>,
    by_title: HashMap<String, usize>,
    global_steps: Vec<TestStep>,
    seen_globals: HashSet<String>,
    last_active: Option<usize>,
    detected_browser: String,
    report: ParseReport,
}

impl<'a> ParseContext<'a> {
    fn new(config: &'a ParserConfig, tag_filter: &str) -> Self {
        Self {
            config,
            cases: Vec::new(),
            lowered_titles: Vec::new(),
            by_title: HashMap::new(),
            global_steps: Vec::new(),
            seen_globals: HashSet::new(),
            last_active: None,
            detected_browser: config.default_browser.clone(),
            report: ParseReport {
                tag_filter: tag_filter.to_string(),
                ..ParseReport::default()
            },
        }
    }

    /// Returns the index of the case whose title is the longest known title
    /// contained in `lower`. Ties go to the earliest discovered title.
    fn longest_known_title(&self, lower: &str) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (index, title) in self.lowered_titles.iter().enumerate() {
            if !title.is_empty()
                && lower.contains(title.as_str())
                && best.is_none_or(|(_, len)| title.len() > len)
            {
                best = Some((index, title.len()));
            }
        }
        best.map(|(index, _)| index)
    }

    /// Looks up a case by title, creating it with the currently detected
    /// browser if it does not exist yet.
    fn get_or_create(&mut self, title: &str) -> usize {
        if let Some(&index) = self.by_title.get(title) {
            return index;
        }
        let index = self.cases.len();
        self.cases.push(TestCase::new(title, &self.detected_browser));
        self.lowered_titles.push(title.to_lowercase());
        self.by_title.insert(title.to_string(), index);
        debug!(title, "Created test case");
        index
    }

    fn observe_browser(&mut self, line: &str) {
        let Some(browser) = patterns::browser_name(line) else {
            return;
        };
        if !self.report.browsers_seen.contains(&browser) {
            self.report.browsers_seen.push(browser.clone());
        }
        self.detected_browser = browser;
    }

    fn record_global(&mut self, line: &str) {
        if self.seen_globals.insert(line.to_string()) {
            self.global_steps.push(TestStep::new(StepKind::Log, line));
            self.report.global_lines += 1;
        } else {
            self.report.duplicate_global_lines += 1;
        }
    }

    /// Resolves a target to a case index and makes it the last active case.
    /// Returns `None` for global lines.
    fn case_index(&mut self, target: Target) -> Option<usize> {
        let index = match target {
            Target::Global => return None,
            Target::Case(index) | Target::Active(index) => index,
            Target::Title(title) => self.get_or_create(&title),
        };
        self.last_active = Some(index);
        Some(index)
    }

    fn consume(&mut self, text: &str) {
        if text.is_empty() {
            self.report.blank_lines += 1;
            return;
        }

        self.observe_browser(text);

        let line = Line::new(text);
        let Some((rule, target)) = attribute::resolve(self, &line) else {
            trace!(line = text, "Orphaned line dropped");
            self.report.orphaned_lines += 1;
            return;
        };
        self.report.record_rule(rule);

        match self.case_index(target) {
            Some(index) => {
                trace!(rule, case = %self.cases[index].title, line = text, "Attributed line");
                self.report.attributed_lines += 1;
                classify::apply(&mut self.cases[index], text, self.config);
            }
            None => {
                trace!(rule, line = text, "Global line");
                self.record_global(text);
            }
        }
    }
}
