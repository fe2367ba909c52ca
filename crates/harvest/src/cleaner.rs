// ABOUTME: Text cleaners for verse text and Q&A prose.
// ABOUTME: Ordered footnote/cross-reference stripping, boilerplate validity check, and Q&A beautifying.

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet, RegexSetBuilder};

use crate::patterns::{BOILERPLATE_PATTERNS, MIN_VERSE_CHARS, MOJIBAKE_REPAIRS, VERSE_CLEANUP_RULES};

static CLEANUP_RULES: Lazy<Vec<Regex>> = Lazy::new(|| {
    VERSE_CLEANUP_RULES
        .iter()
        .map(|pattern| Regex::new(pattern).unwrap())
        .collect()
});
static BOILERPLATE: Lazy<RegexSet> = Lazy::new(|| {
    RegexSetBuilder::new(BOILERPLATE_PATTERNS)
        .case_insensitive(true)
        .build()
        .unwrap()
});
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static HORIZONTAL_SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static EXTRA_BLANK_LINES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n\s*\n+").unwrap());

/// Normalize whitespace in text
pub fn normalize_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip footnotes, cross-references and alternate-translation notes from verse text.
///
/// Every rule in [`VERSE_CLEANUP_RULES`] runs exactly once, in table order,
/// then whitespace is collapsed and the result trimmed.
pub fn clean_verse_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut cleaned = text.to_string();
    for rule in CLEANUP_RULES.iter() {
        cleaned = rule.replace_all(&cleaned, "").into_owned();
    }

    WHITESPACE_RE.replace_all(&cleaned, " ").trim().to_string()
}

/// Check whether cleaned text looks like a verse and not site boilerplate.
pub fn is_valid_verse_text(text: &str) -> bool {
    if text.trim().chars().count() < MIN_VERSE_CHARS {
        return false;
    }
    !BOILERPLATE.is_match(text)
}

/// Clean Q&A prose while keeping paragraph breaks.
///
/// Repairs mojibake, collapses spaces and tabs, and reduces runs of blank
/// lines to a single blank line.
pub fn beautify_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut repaired = text.to_string();
    for (wrong, right) in MOJIBAKE_REPAIRS {
        if repaired.contains(wrong) {
            repaired = repaired.replace(wrong, right);
        }
    }

    let spaced = HORIZONTAL_SPACE_RE.replace_all(&repaired, " ");
    let paragraphs = EXTRA_BLANK_LINES_RE.replace_all(&spaced, "\n\n");
    paragraphs.trim().to_string()
}
