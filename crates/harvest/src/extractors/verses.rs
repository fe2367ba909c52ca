// ABOUTME: Turns flattened chapter text into numbered verses using ordered fallback tiers.
// ABOUTME: Each raw pair is range-checked, cleaned and validated before it is admitted.

//! Verse parsing.
//!
//! Key behaviors:
//! - Tiers run in a fixed order; the first tier that admits at least one
//!   verse wins and later tiers are not tried.
//! - Verse numbers outside 1..=999 are dropped silently.
//! - Within a tier the last occurrence of a number wins.
//! - Parsing never fails; no verses is an empty map.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::books::expected_verse_count;
use crate::cleaner::{clean_verse_text, is_valid_verse_text, normalize_spaces};
use crate::corpus::Verses;

static NUMBERED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?:^|\s)(\d+)\s+(["'«»”“(\[]?\p{L})"#).unwrap());
static PUNCTUATED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?:^|\s)(\d+)\s*[.:)\]]\s*(["'«»”“(]?\p{L})"#).unwrap());
static LINE_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\s*[.:)\]]?\s*(.*)$").unwrap());

const MIN_VERSE_NUMBER: u32 = 1;
const MAX_VERSE_NUMBER: u32 = 999;

/// Which heuristic produced a chapter's verses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseTier {
    NumberedRuns,
    PunctuatedRuns,
    LineRuns,
    BoundarySplit,
}

impl fmt::Display for ParseTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParseTier::NumberedRuns => "numbered runs",
            ParseTier::PunctuatedRuns => "punctuated runs",
            ParseTier::LineRuns => "line runs",
            ParseTier::BoundarySplit => "boundary split",
        };
        write!(f, "{}", s)
    }
}

type RawPairs = Vec<(String, String)>;

const TIERS: &[(ParseTier, fn(&str) -> RawPairs)] = &[
    (ParseTier::NumberedRuns, numbered_runs),
    (ParseTier::PunctuatedRuns, punctuated_runs),
    (ParseTier::LineRuns, line_runs),
    (ParseTier::BoundarySplit, boundary_split),
];

/// Runs between consecutive marker matches on whitespace-collapsed text.
///
/// A verse's text starts at the second capture (the first letter) and ends
/// where the next marker match begins.
fn marker_runs(re: &Regex, text: &str) -> RawPairs {
    let collapsed = normalize_spaces(text);
    let markers: Vec<(usize, String, usize)> = re
        .captures_iter(&collapsed)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let number = caps.get(1)?;
            let body = caps.get(2)?;
            Some((whole.start(), number.as_str().to_string(), body.start()))
        })
        .collect();

    markers
        .iter()
        .enumerate()
        .map(|(i, (_, number, body_start))| {
            let end = markers
                .get(i + 1)
                .map_or(collapsed.len(), |(next_start, _, _)| *next_start);
            (number.clone(), collapsed[*body_start..end].to_string())
        })
        .collect()
}

fn numbered_runs(text: &str) -> RawPairs {
    marker_runs(&NUMBERED_RE, text)
}

fn punctuated_runs(text: &str) -> RawPairs {
    marker_runs(&PUNCTUATED_RE, text)
}

fn line_runs(text: &str) -> RawPairs {
    let mut pairs: RawPairs = Vec::new();
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(caps) = LINE_MARKER_RE.captures(line) {
            let number = caps.get(1).map_or("", |m| m.as_str()).to_string();
            let rest = caps.get(2).map_or("", |m| m.as_str()).to_string();
            pairs.push((number, rest));
        } else if let Some((_, current)) = pairs.last_mut() {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(line);
        }
    }
    pairs
}

fn boundary_split(text: &str) -> RawPairs {
    let mut pairs: RawPairs = Vec::new();
    for token in text.split_whitespace() {
        if token.chars().all(|c| c.is_ascii_digit()) {
            pairs.push((token.to_string(), String::new()));
        } else if let Some((_, current)) = pairs.last_mut() {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(token);
        }
    }
    pairs
}

/// Range check, clean and validate raw pairs; later duplicates overwrite earlier ones.
fn admit(pairs: RawPairs) -> Verses {
    let mut verses = Verses::new();
    for (number, text) in pairs {
        let Ok(number) = number.parse::<u32>() else {
            continue;
        };
        if !(MIN_VERSE_NUMBER..=MAX_VERSE_NUMBER).contains(&number) {
            continue;
        }
        let cleaned = clean_verse_text(&text);
        if is_valid_verse_text(&cleaned) {
            verses.insert(number, cleaned);
        }
    }
    verses
}

/// Outcome of parsing one chapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedChapter {
    /// Tier that admitted the verses, `None` when every tier came up empty.
    pub tier: Option<ParseTier>,
    pub verses: Verses,
}

impl ParsedChapter {
    /// True when the chapter has verses and, if the expected count is known,
    /// at least `threshold` of them.
    pub fn meets_confidence(&self, expected: Option<u32>, threshold: f64) -> bool {
        if self.verses.is_empty() {
            return false;
        }
        match expected {
            Some(expected) => self.verses.len() as f64 >= threshold * f64::from(expected),
            None => true,
        }
    }
}

macro_rules! diag {
    ($loud:expr, $($arg:tt)+) => {
        if $loud {
            tracing::info!($($arg)+)
        } else {
            tracing::debug!($($arg)+)
        }
    };
}

/// Tiered verse parser; `debug` raises diagnostics from debug to info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerseParser {
    debug: bool,
}

impl VerseParser {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    /// Parse chapter text. `book` and `chapter` only feed the diagnostics.
    pub fn parse(&self, text: &str, book: &str, chapter: u32) -> ParsedChapter {
        if text.trim().is_empty() {
            diag!(self.debug, book, chapter, "no chapter text to parse");
            return ParsedChapter::default();
        }

        for (tier, run) in TIERS {
            let verses = admit(run(text));
            diag!(self.debug, book, chapter, %tier, admitted = verses.len(), "parse tier attempted");
            if verses.is_empty() {
                continue;
            }

            if let Some(expected) = expected_verse_count(book, chapter) {
                diag!(
                    self.debug,
                    book,
                    chapter,
                    %tier,
                    parsed = verses.len(),
                    expected,
                    "verse count compared with reference"
                );
            }
            return ParsedChapter {
                tier: Some(*tier),
                verses,
            };
        }

        diag!(self.debug, book, chapter, "no parse tier produced verses");
        ParsedChapter::default()
    }
}

/// Parse text without book context.
pub fn parse_verses(text: &str) -> Verses {
    VerseParser::default().parse(text, "", 0).verses
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(verses: &Verses) -> Vec<(u32, &str)> {
        verses.iter().map(|(n, t)| (*n, t.as_str())).collect()
    }

    #[test]
    fn numbered_runs_split_on_markers() {
        let parsed = VerseParser::default().parse(
            "1 I begynnelsen skapade Gud himlen och jorden.\n2 Jorden var öde och tom.\n3 Och Gud sade: \"Varde ljus!\"",
            "GEN",
            1,
        );
        assert_eq!(parsed.tier, Some(ParseTier::NumberedRuns));
        assert_eq!(
            texts(&parsed.verses),
            vec![
                (1, "I begynnelsen skapade Gud himlen och jorden."),
                (2, "Jorden var öde och tom."),
                (3, "Och Gud sade: \"Varde ljus!\""),
            ]
        );
    }

    #[test]
    fn numbered_runs_accept_opening_quote() {
        let verses = parse_verses("4 «Se, jag kommer snart.» 5 Salig är den som håller orden.");
        assert_eq!(verses.get(&4).map(String::as_str), Some("«Se, jag kommer snart.»"));
        assert_eq!(verses.len(), 2);
    }

    #[test]
    fn punctuated_runs_used_when_numbers_carry_separators() {
        let parsed = VerseParser::default().parse(
            "1. Paulus, Jesu Kristi apostel. 2) Nåd vare med er. 3: Välsignad vare Gud.",
            "EPH",
            1,
        );
        assert_eq!(parsed.tier, Some(ParseTier::PunctuatedRuns));
        assert_eq!(parsed.verses.len(), 3);
        assert_eq!(parsed.verses[&2], "Nåd vare med er.");
    }

    #[test]
    fn glued_numbers_fall_through_to_line_runs() {
        let parsed = VerseParser::default().parse(
            "Kapitel ett\n1In the beginning God created.\nAnd the earth was void.\n2And God said.",
            "GEN",
            1,
        );
        assert_eq!(parsed.tier, Some(ParseTier::LineRuns));
        assert_eq!(
            texts(&parsed.verses),
            vec![
                (1, "In the beginning God created. And the earth was void."),
                (2, "And God said."),
            ]
        );
    }

    #[test]
    fn boundary_split_is_last_resort() {
        let parsed = VerseParser::default().parse("Rubrik - 1 - första 2 - andra", "", 0);
        assert_eq!(parsed.tier, Some(ParseTier::BoundarySplit));
        assert_eq!(parsed.verses[&1], "- första");
        assert_eq!(parsed.verses[&2], "- andra");
    }

    #[test]
    fn out_of_range_numbers_are_dropped() {
        let verses = parse_verses("0 Noll vers här. 1 Första versen här. 1000 Tusen vers här.");
        assert_eq!(verses.keys().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn cross_references_removed_from_verse_text() {
        let verses = parse_verses("5 In the beginning #Gen 1:1. *Alt. övers. something else");
        let text = &verses[&5];
        assert!(!text.contains('#'));
        assert!(!text.contains('*'));
        assert_eq!(text, "In the beginning");
    }

    #[test]
    fn boilerplate_is_never_admitted() {
        let verses = parse_verses("1 YouVersion uses cookies 2 Riktig vers text.");
        assert_eq!(verses.keys().copied().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn last_duplicate_wins() {
        let verses = parse_verses("1 Första lydelsen. 1 Andra lydelsen.");
        assert_eq!(verses[&1], "Andra lydelsen.");
    }

    #[test]
    fn empty_input_yields_nothing() {
        let parsed = VerseParser::new(true).parse("   ", "JHN", 3);
        assert_eq!(parsed, ParsedChapter::default());
        assert!(parse_verses("bara text utan nummer").is_empty());
    }

    #[test]
    fn confidence_uses_expected_count() {
        let mut parsed = ParsedChapter::default();
        assert!(!parsed.meets_confidence(None, 0.8));
        parsed.tier = Some(ParseTier::NumberedRuns);
        for n in 1..=8 {
            parsed.verses.insert(n, format!("Vers nummer {}", n));
        }
        assert!(parsed.meets_confidence(None, 0.8));
        assert!(parsed.meets_confidence(Some(10), 0.8));
        assert!(!parsed.meets_confidence(Some(11), 0.8));
    }
}
