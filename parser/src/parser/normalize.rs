//! Line normalization: ANSI stripping and charset repair.
//!
//! Transcripts are often captured through a pipe that decodes UTF-8 output as
//! Windows-1252, which turns status glyphs into sequences like `âœ“`. Every
//! line is repaired with a fixed table before anything else looks at it.

use regex::Regex;
use std::sync::LazyLock;

/// Known mis-decoded sequences and the glyph they were meant to be.
const MOJIBAKE_TABLE: &[(&str, &str)] = &[
    ("\u{f0}\u{178}\u{152}\u{90}", "🌐"),
    ("\u{f0}\u{178}\u{201c}\u{b8}", "📸"),
    ("\u{f0}\u{178}\u{201c}\u{b9}", "📹"),
    ("\u{f0}\u{178}\u{201c}\u{8d}", "📍"),
    ("\u{f0}\u{178}\u{17d}\u{a5}", "🎥"),
    ("\u{f0}\u{178}\u{161}\u{20ac}", "🚀"),
    ("\u{f0}\u{178}\u{a7}\u{b5}", "🧵"),
    ("\u{e2}\u{153}\u{201c}", "✓"),
    ("\u{e2}\u{153}\u{201d}", "✔"),
    ("\u{e2}\u{153}\u{2026}", "✅"),
    ("\u{e2}\u{153}\u{2014}", "✗"),
    ("\u{e2}\u{153}\u{2dc}", "✘"),
    ("\u{e2}\u{9d}\u{152}", "❌"),
    ("\u{e2}\u{2013}\u{ba}", "►"),
    ("\u{e2}\u{2013}\u{b6}", "▶"),
    ("\u{e2}\u{161}\u{2122}", "⚙"),
];

/// Sequences whose last byte has no Windows-1252 mapping and was dropped.
///
/// The same prefix starts other glyphs (`âŒ›` is ⌛, `ðŸ“‹` is 📋), so these
/// are only repaired when followed by ASCII or the end of the line.
const TRUNCATED_TABLE: &[(&str, &str)] = &[
    ("\u{f0}\u{178}\u{152}", "🌐"),
    ("\u{f0}\u{178}\u{201c}", "📍"),
    ("\u{e2}\u{152}", "❌"),
];

static ANSI_RE: LazyLock<Regex> = LazyLock::new(|| {
    // SAFETY: compile-time constant pattern, exercised by tests.
    Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").expect("static regex must compile")
});

/// Normalizes one raw transcript line.
///
/// Strips ANSI color codes, repairs known mojibake, and trims surrounding
/// whitespace (including a stray byte-order mark). Unknown garbling passes
/// through unchanged. Normalizing an already-normalized line is a no-op.
pub fn normalize_line(raw: &str) -> String {
    let mut cleaned = raw.to_string();
    while ANSI_RE.is_match(&cleaned) {
        cleaned = ANSI_RE.replace_all(&cleaned, "").into_owned();
    }

    for (garbled, glyph) in MOJIBAKE_TABLE {
        if cleaned.contains(garbled) {
            cleaned = cleaned.replace(garbled, glyph);
        }
    }
    for (garbled, glyph) in TRUNCATED_TABLE {
        if cleaned.contains(garbled) {
            cleaned = replace_truncated(&cleaned, garbled, glyph);
        }
    }

    cleaned
        .trim_matches(|ch: char| ch.is_whitespace() || ch == '\u{feff}')
        .to_string()
}

/// Replaces `garbled` only where the next char is ASCII or the line ends.
fn replace_truncated(line: &str, garbled: &str, glyph: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(pos) = rest.find(garbled) {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + garbled.len()..];
        if after.chars().next().is_none_or(|ch| ch.is_ascii()) {
            out.push_str(glyph);
        } else {
            out.push_str(garbled);
        }
        rest = after;
    }
    out.push_str(rest);
    out
}

/// Splits a transcript into normalized lines, preserving line order.
pub fn normalize_log(raw: &str) -> Vec<String> {
    raw.lines().map(normalize_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repairs_checkmark() {
        assert_eq!(normalize_line("âœ“ page opened"), "✓ page opened");
    }

    #[test]
    fn test_repairs_cross_and_camera() {
        assert_eq!(normalize_line("  âœ— login failed  "), "✗ login failed");
        assert_eq!(
            normalize_line("ðŸ“¸ Screenshot saved: shot.png"),
            "📸 Screenshot saved: shot.png"
        );
        assert_eq!(
            normalize_line("ðŸ“¹ Video kaydedildi: a.webm"),
            "📹 Video kaydedildi: a.webm"
        );
    }

    #[test]
    fn test_repairs_globe_with_and_without_control_byte() {
        assert_eq!(
            normalize_line("ðŸŒ\u{90} Browser: chromium"),
            "🌐 Browser: chromium"
        );
        assert_eq!(normalize_line("ðŸŒ Browser: webkit"), "🌐 Browser: webkit");
    }

    #[test]
    fn test_strips_ansi_sequences() {
        assert_eq!(normalize_line("\x1b[32m✓\x1b[0m done"), "✓ done");
    }

    #[test]
    fn test_unknown_garbling_passes_through() {
        assert_eq!(normalize_line("Ã¼ber test"), "Ã¼ber test");
    }

    #[test]
    fn test_truncated_forms_do_not_swallow_other_glyphs() {
        // ⌛ and 📋 share a prefix with the truncated ❌ and 📍 forms.
        let hourglass = "\u{e2}\u{152}\u{203a} Waiting for page";
        let clipboard = "\u{f0}\u{178}\u{201c}\u{2039} Test plan";
        assert_eq!(normalize_line(hourglass), hourglass);
        assert_eq!(normalize_line(clipboard), clipboard);

        assert_eq!(normalize_line("\u{e2}\u{152} login failed"), "❌ login failed");
        assert_eq!(normalize_line("done \u{e2}\u{152}"), "done ❌");
        assert_eq!(normalize_line("\u{f0}\u{178}\u{201c} Pinned"), "📍 Pinned");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "âœ“ ok",
            "  \u{feff} âœ— bad ",
            "ðŸŒ\u{90} Browser: chromium (Headless)",
            "\x1b[\x1b[31m0mâ–¶ step",
            "plain text",
            "",
            "ââœ““",
            "\u{e2}\u{152}\u{203a} \u{e2}\u{152}",
        ];
        for sample in samples {
            let once = normalize_line(sample);
            assert_eq!(normalize_line(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_normalize_log_keeps_line_order() {
        let lines = normalize_log("a\r\n  b \nâœ“ c");
        assert_eq!(lines, vec!["a", "b", "✓ c"]);
    }
}
