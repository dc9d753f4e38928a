//! Line attribution.
//!
//! Decides, for every normalized line, whether it is a run-wide banner or
//! which test case owns it. The decision is an ordered table of rules; the
//! first rule that selects a target wins. Rules only read the parse context,
//! the caller applies the selected [`Target`].
//!
//! Explicit structure (declared titles, spec filenames) is trusted before the
//! last-active carryover, because parallel workers interleave their output
//! and a stale "last active" pointer is the weakest signal available.

use runlog_core::TEST_EXECUTION_TITLE;

use super::ParseContext;
use super::patterns;

/// Where a line goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Target {
    /// Run-wide banner, shared by every case.
    Global,
    /// An existing case, which becomes the last active case.
    Case(usize),
    /// Get-or-create a case by title; it becomes the last active case.
    Title(String),
    /// The current last active case.
    Active(usize),
}

/// A line together with its lowercase form, computed once.
pub(super) struct Line<'a> {
    pub(super) text: &'a str,
    pub(super) lower: String,
}

impl<'a> Line<'a> {
    pub(super) fn new(text: &'a str) -> Self {
        Self {
            text,
            lower: text.to_lowercase(),
        }
    }
}

pub(super) struct Rule {
    pub(super) name: &'static str,
    pub(super) select: fn(&ParseContext<'_>, &Line<'_>) -> Option<Target>,
}

/// Attribution rules in precedence order.
pub(super) const RULES: [Rule; 7] = [
    Rule {
        name: "global-banner",
        select: global_banner,
    },
    Rule {
        name: "known-title",
        select: known_title,
    },
    Rule {
        name: "spec-file",
        select: spec_file,
    },
    Rule {
        name: "legacy-title",
        select: legacy_title,
    },
    Rule {
        name: "step-marker",
        select: step_marker,
    },
    Rule {
        name: "carryover",
        select: carryover,
    },
    Rule {
        name: "artifact",
        select: artifact,
    },
];

/// Runs the rule table. Returns the winning rule's name and target, or
/// `None` for a true orphan.
pub(super) fn resolve(ctx: &ParseContext<'_>, line: &Line<'_>) -> Option<(&'static str, Target)> {
    RULES
        .iter()
        .find_map(|rule| (rule.select)(ctx, line).map(|target| (rule.name, target)))
}

fn global_banner(_ctx: &ParseContext<'_>, line: &Line<'_>) -> Option<Target> {
    patterns::is_global_banner(line.text).then_some(Target::Global)
}

fn known_title(ctx: &ParseContext<'_>, line: &Line<'_>) -> Option<Target> {
    ctx.longest_known_title(&line.lower).map(Target::Case)
}

fn spec_file(_ctx: &ParseContext<'_>, line: &Line<'_>) -> Option<Target> {
    patterns::spec_file_stem(line.text).map(|stem| Target::Title(stem.to_string()))
}

fn legacy_title(ctx: &ParseContext<'_>, line: &Line<'_>) -> Option<Target> {
    ctx.config
        .legacy_titles
        .iter()
        .map(|title| title.trim())
        .find(|title| !title.is_empty() && line.lower.contains(&title.to_lowercase()))
        .map(|title| Target::Title(title.to_string()))
}

fn step_marker(ctx: &ParseContext<'_>, line: &Line<'_>) -> Option<Target> {
    if !patterns::is_step_event(line.text) {
        return None;
    }
    Some(active_or_synthetic(ctx))
}

fn carryover(ctx: &ParseContext<'_>, _line: &Line<'_>) -> Option<Target> {
    ctx.last_active.map(Target::Active)
}

fn artifact(ctx: &ParseContext<'_>, line: &Line<'_>) -> Option<Target> {
    patterns::is_artifact_line(line.text).then(|| active_or_synthetic(ctx))
}

fn active_or_synthetic(ctx: &ParseContext<'_>) -> Target {
    match ctx.last_active {
        Some(index) => Target::Active(index),
        None => Target::Title(TEST_EXECUTION_TITLE.to_string()),
    }
}
