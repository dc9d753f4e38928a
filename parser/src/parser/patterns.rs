//! Marker patterns recognized in execution transcripts.

use regex::Regex;
use std::sync::LazyLock;

/// Regex patterns for classifying transcript lines.
pub(super) static PATTERNS: LazyLock<LogPatterns> = LazyLock::new(LogPatterns::new);

pub(super) struct LogPatterns {
    // Step events
    pub(super) step_start: Regex,
    pub(super) pass: Regex,
    pub(super) fail: Regex,
    pub(super) error: Regex,

    // Artifacts
    pub(super) video: Regex,
    pub(super) screenshot: Regex,

    // Structure
    pub(super) declaration: Regex,
    pub(super) spec_file: Regex,

    // Run-wide context
    pub(super) global_banner: Regex,
    pub(super) browser_banner: Regex,
    pub(super) browser_tag: Regex,
}

impl LogPatterns {
    fn new() -> Self {
        // Patterns are constants; a failing expect() is a bug in the pattern text.
        Self {
            step_start: Regex::new(r"(?i)▶|►|\[step\]|\bstep:").expect("static regex must compile"),
            pass: Regex::new(r"(?i)✓|✔|✅|\[pass(?:ed)?\]").expect("static regex must compile"),
            fail: Regex::new(r"(?i)✗|✘|❌|\[fail(?:ed)?\]").expect("static regex must compile"),
            // TypeError:, AssertionError, TimeoutException, "Timeout 30000ms exceeded"
            error: Regex::new(
                r"(?i)error:|exception\b|assertionerror|assertion failed|timeout\s+\d+\s*ms\s+exceeded"
            )
            .expect("static regex must compile"),

            video: Regex::new(r"(?i)📹|🎥|video\s+(?:kaydedildi|recorded|saved)")
                .expect("static regex must compile"),
            screenshot: Regex::new(r"(?i)📸|screenshot\s+(?:kaydedildi|saved|taken)")
                .expect("static regex must compile"),

            declaration: Regex::new(r"Feature:|Scenario(?: Outline)?:").expect("static regex must compile"),
            // login.spec.ts, tests/cart-flow.test.ts, features/checkout.feature
            spec_file: Regex::new(r"([A-Za-z0-9_-]+)\.(?:spec\.ts|test\.ts|feature)\b")
                .expect("static regex must compile"),

            global_banner: Regex::new(
                r"(?i)🚀|starting test run|test run started|parallel execution|parallel:\s*true|running in parallel|🧵|thread count|threads?:\s*\d|workers?:\s*\d|environment:|\benv:|⚙|config(?:uration)?\s+loaded|loaded config"
            )
            .expect("static regex must compile"),
            browser_banner: Regex::new(r"(?i)browser.*(?:🌐|headless)|(?:🌐|headless).*browser")
                .expect("static regex must compile"),
            browser_tag: Regex::new(r"(?i)browser:\s*([a-z][\w-]*)").expect("static regex must compile"),
        }
    }
}

/// Returns `true` if the line is a run-wide banner (run start, parallelism,
/// thread count, environment, browser, config).
pub(super) fn is_global_banner(line: &str) -> bool {
    PATTERNS.global_banner.is_match(line) || PATTERNS.browser_banner.is_match(line)
}

/// Returns `true` if the line carries a step start/pass/fail marker.
pub(super) fn is_step_event(line: &str) -> bool {
    PATTERNS.step_start.is_match(line)
        || PATTERNS.pass.is_match(line)
        || PATTERNS.fail.is_match(line)
}

/// Returns `true` if the line announces a video or screenshot.
pub(super) fn is_artifact_line(line: &str) -> bool {
    PATTERNS.video.is_match(line) || PATTERNS.screenshot.is_match(line)
}

/// Returns `true` if the line is a `Feature:`/`Scenario:` declaration.
pub(super) fn is_declaration(line: &str) -> bool {
    PATTERNS.declaration.is_match(line)
}

/// Extracts the base name from a `<name>.spec.ts`, `<name>.test.ts` or
/// `<name>.feature` reference.
pub(super) fn spec_file_stem(line: &str) -> Option<&str> {
    PATTERNS
        .spec_file
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Extracts a `browser: <id>` tag and maps engine names to browser names.
pub(super) fn browser_name(line: &str) -> Option<String> {
    let id = PATTERNS.browser_tag.captures(line)?.get(1)?.as_str();
    let name = match id.to_ascii_lowercase().as_str() {
        "chromium" => "Chrome".to_string(),
        "firefox" => "Firefox".to_string(),
        "webkit" => "Safari".to_string(),
        _ => id.to_string(),
    };
    Some(name)
}
