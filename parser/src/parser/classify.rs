//! Step classification for attributed lines.
//!
//! Each line owned by a test case is classified into exactly one step kind
//! by ordered pattern checks, then applied to the case: steps appended,
//! errors collected, artifacts recorded, status flipped on failure.

use regex::Regex;
use runlog_core::{StepKind, TestCase};

use super::patterns::{self, PATTERNS};
use crate::ParserConfig;

const START_GLYPH: &str = "▶";
const PASS_GLYPH: &str = "✓";
const FAIL_GLYPH: &str = "✗";

/// Classification of one attributed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum LineClass {
    /// Marker-stripped step text.
    StepStart(String),
    Success(String),
    Failure(String),
    /// Artifact file name, when one could be extracted.
    Video(Option<String>),
    /// Image file name, when one could be extracted and is a `.png`/`.jpg`.
    Screenshot(Option<String>),
    Error,
    Declaration,
    Log,
}

pub(super) fn classify(line: &str) -> LineClass {
    let p = &*PATTERNS;

    if let Some(text) = strip_marker(&p.step_start, line) {
        return LineClass::StepStart(text);
    }
    if let Some(text) = strip_marker(&p.pass, line) {
        return LineClass::Success(text);
    }
    if let Some(text) = strip_marker(&p.fail, line) {
        return LineClass::Failure(text);
    }
    if let Some(m) = p.video.find(line) {
        return LineClass::Video(artifact_file_name(&line[m.end()..]));
    }
    if let Some(m) = p.screenshot.find(line) {
        let image = artifact_file_name(&line[m.end()..]).filter(|name| is_image(name));
        return LineClass::Screenshot(image);
    }
    if p.error.is_match(line) {
        return LineClass::Error;
    }
    if patterns::is_declaration(line) {
        return LineClass::Declaration;
    }
    LineClass::Log
}

/// Classifies `line` and applies it to `case`.
pub(super) fn apply(case: &mut TestCase, line: &str, config: &ParserConfig) {
    match classify(line) {
        LineClass::StepStart(text) => {
            case.push_step(StepKind::StepStart, glyph_prefixed(START_GLYPH, &text))
        }
        LineClass::Success(text) => {
            case.push_step(StepKind::Success, glyph_prefixed(PASS_GLYPH, &text))
        }
        LineClass::Failure(text) => {
            let message = if text.is_empty() {
                line.to_string()
            } else {
                text.clone()
            };
            case.record_failure(StepKind::Failure, glyph_prefixed(FAIL_GLYPH, &text), message);
        }
        LineClass::Video(Some(file)) => case.record_video(config.video_url(&file), line),
        LineClass::Screenshot(Some(file)) => {
            case.record_screenshot(config.screenshot_url(&file))
        }
        LineClass::Video(None) | LineClass::Screenshot(None) | LineClass::Log => {
            case.push_step(StepKind::Log, line)
        }
        LineClass::Error => case.record_failure(StepKind::Error, line, line),
        LineClass::Declaration => {}
    }
}

/// Removes the first marker match and collapses whitespace.
fn strip_marker(marker: &Regex, line: &str) -> Option<String> {
    let m = marker.find(line)?;
    let rest = format!("{} {}", &line[..m.start()], &line[m.end()..]);
    let collapsed = rest.split_whitespace().collect::<Vec<_>>().join(" ");
    Some(
        collapsed
            .trim_start_matches(|ch: char| ch == ':' || ch == '-' || ch.is_whitespace())
            .to_string(),
    )
}

fn glyph_prefixed(glyph: &str, text: &str) -> String {
    if text.is_empty() {
        glyph.to_string()
    } else {
        format!("{glyph} {text}")
    }
}

/// Takes the trailing path token, keeps its last `\`/`/` segment, and
/// accepts it only if it looks like `stem.ext`.
fn artifact_file_name(rest: &str) -> Option<String> {
    let token = rest.split_whitespace().last()?;
    let name = token
        .rsplit(['\\', '/'])
        .next()?
        .trim_matches(|ch: char| {
            matches!(
                ch,
                '"' | '\'' | '`' | '(' | ')' | '[' | ']' | '<' | '>' | ',' | ';' | ':'
            )
        })
        .trim_end_matches('.');
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(name.to_string())
}

fn is_image(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".png") || lower.ends_with(".jpg")
}

#[cfg(test)]
mod tests {
    use super::*;
    use runlog_core::{CaseStatus, StepOutcome};

    fn case() -> TestCase {
        TestCase::new("Login", "Chrome")
    }

    #[test]
    fn test_classify_order() {
        assert_eq!(classify("▶ open page"), LineClass::StepStart("open page".into()));
        assert_eq!(classify("[PASS] - logged in"), LineClass::Success("logged in".into()));
        assert_eq!(
            classify("✗ assertion failed: expected 200 got 500"),
            LineClass::Failure("assertion failed: expected 200 got 500".into())
        );
        assert_eq!(classify("Error: boom"), LineClass::Error);
        assert_eq!(classify("Scenario: Valid login"), LineClass::Declaration);
        assert_eq!(classify("navigating to /home"), LineClass::Log);
    }

    #[test]
    fn test_marker_stripped_from_middle_of_line() {
        assert_eq!(
            classify("[worker 2]   ✓   page opened"),
            LineClass::Success("[worker 2] page opened".into())
        );
    }

    #[test]
    fn test_video_file_name_from_windows_path() {
        assert_eq!(
            classify(r"Video kaydedildi: C:\out\run1.webm"),
            LineClass::Video(Some("run1.webm".into()))
        );
        assert_eq!(
            classify("📹 Video recorded: /tmp/videos/\"abc.webm\""),
            LineClass::Video(Some("abc.webm".into()))
        );
        assert_eq!(classify("📹 Video kaydedildi:"), LineClass::Video(None));
    }

    #[test]
    fn test_screenshot_requires_image_extension() {
        assert_eq!(
            classify("📸 Screenshot saved: shots/fail.PNG"),
            LineClass::Screenshot(Some("fail.PNG".into()))
        );
        assert_eq!(classify("📸 Screenshot saved: trace.zip"), LineClass::Screenshot(None));
    }

    #[test]
    fn test_apply_step_content_is_glyph_prefixed() {
        let mut case = case();
        apply(&mut case, "[STEP] open page", &ParserConfig::default());
        apply(&mut case, "[PASSED] page opened", &ParserConfig::default());

        assert_eq!(case.steps[0].content, "▶ open page");
        assert_eq!(case.steps[0].kind, StepKind::StepStart);
        assert_eq!(case.steps[1].content, "✓ page opened");
        assert_eq!(case.steps[1].outcome, StepOutcome::Pass);
    }

    #[test]
    fn test_apply_failure_marks_case_failed() {
        let mut case = case();
        apply(&mut case, "✘ cart total mismatch", &ParserConfig::default());

        assert_eq!(case.status, CaseStatus::Failed);
        assert_eq!(case.errors, vec!["cart total mismatch"]);
        assert_eq!(case.steps[0].content, "✗ cart total mismatch");
        assert_eq!(case.steps[0].outcome, StepOutcome::Fail);
    }

    #[test]
    fn test_apply_error_keeps_whole_line() {
        let mut case = case();
        apply(&mut case, "TypeError: x is undefined", &ParserConfig::default());

        assert_eq!(case.status, CaseStatus::Failed);
        assert_eq!(case.errors, vec!["TypeError: x is undefined"]);
        assert_eq!(case.steps[0].kind, StepKind::Error);
    }

    #[test]
    fn test_apply_artifacts_build_urls() {
        let config = ParserConfig::default().with_base_url("https://qa.example.com/");
        let mut case = case();
        apply(&mut case, "🎥 Video saved: out/run.webm", &config);
        apply(&mut case, "📸 Screenshot taken: out/step-1.jpg", &config);

        assert_eq!(case.video.as_deref(), Some("https://qa.example.com/videos/run.webm"));
        assert_eq!(case.screenshots, vec!["https://qa.example.com/screenshots/step-1.jpg"]);
        assert_eq!(case.steps.len(), 1);
        assert_eq!(case.steps[0].kind, StepKind::Video);
    }

    #[test]
    fn test_apply_rejected_screenshot_becomes_log() {
        let mut case = case();
        apply(&mut case, "📸 Screenshot saved: trace.zip", &ParserConfig::default());

        assert!(case.screenshots.is_empty());
        assert_eq!(case.steps[0].kind, StepKind::Log);
    }

    #[test]
    fn test_apply_declaration_adds_nothing() {
        let mut case = case();
        apply(&mut case, "Scenario: Login", &ParserConfig::default());
        assert!(case.steps.is_empty());
    }
}
