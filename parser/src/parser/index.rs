//! Pre-scan for explicit `Feature:`/`Scenario:` declarations.
//!
//! These two keywords are the only reliable test boundary in a transcript, so
//! their titles seed the known-title list before attribution starts.

const SCENARIO_MARKERS: [&str; 2] = ["Scenario Outline:", "Scenario:"];
const FEATURE_MARKER: &str = "Feature:";

/// A title declared by a `Feature:` or `Scenario:` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Declaration {
    Feature(String),
    Scenario(String),
}

/// Extracts the declaration on one line, if any.
///
/// The title is the text after the marker up to the next `:`, trimmed.
/// Scenario markers are checked first; a line carrying both is a scenario.
pub(super) fn declaration(line: &str) -> Option<Declaration> {
    for marker in SCENARIO_MARKERS {
        if let Some(title) = title_after(line, marker) {
            return Some(Declaration::Scenario(title));
        }
    }
    title_after(line, FEATURE_MARKER).map(Declaration::Feature)
}

fn title_after(line: &str, marker: &str) -> Option<String> {
    let (_, rest) = line.split_once(marker)?;
    let title = rest.split(':').next().unwrap_or_default().trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

/// Collects the test-case titles declared in `lines`, in discovery order.
///
/// Every scenario is a test case. A feature is only a test case when no
/// scenario is declared between it and the next feature; otherwise it is a
/// container whose scenarios are the cases.
pub(super) fn declared_titles(lines: &[String]) -> Vec<String> {
    let mut titles: Vec<String> = Vec::new();
    let mut open_feature: Option<String> = None;
    let mut feature_has_scenarios = false;

    for line in lines {
        match declaration(line) {
            Some(Declaration::Feature(title)) => {
                if let Some(previous) = open_feature.take()
                    && !feature_has_scenarios
                {
                    push(&mut titles, previous);
                }
                open_feature = Some(title);
                feature_has_scenarios = false;
            }
            Some(Declaration::Scenario(title)) => {
                feature_has_scenarios = true;
                push(&mut titles, title);
            }
            None => {}
        }
    }

    if let Some(feature) = open_feature
        && !feature_has_scenarios
    {
        push(&mut titles, feature);
    }

    titles
}

fn push(titles: &mut Vec<String>, title: String) {
    if !titles.contains(&title) {
        titles.push(title);
    }
}
