// ABOUTME: Quality verification for downloaded corpora: per-chapter checks, structure checks and the report.
// ABOUTME: Operates on raw JSON values so files written by older runs can be verified too.

use std::collections::BTreeMap;
use std::fmt;

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::books::{expected_verse_count, find_book, BOOKS};
use crate::corpus::{BibleCorpus, Verses};
use crate::error::{HarvestError, Result};
use crate::patterns::SUSPICIOUS_KEYWORDS;

static SUSPICIOUS: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(SUSPICIOUS_KEYWORDS)
        .unwrap()
});

const REQUIRED_TOP_LEVEL_KEYS: &[&str] = &[
    "version",
    "version_name",
    "version_id",
    "language",
    "language_name",
    "books",
];
const REQUIRED_BOOK_KEYS: &[&str] = &["code", "name", "swedish_name", "chapters"];

const SHORT_VERSE_CHARS: usize = 10;
const FEW_VERSES: usize = 3;
const MANY_VERSES: usize = 180;
const LOW_RATIO: f64 = 0.5;
const HIGH_RATIO: f64 = 1.5;

const GOOD_BELOW: usize = 10;
const FAIR_BELOW: usize = 50;

const LISTED_ISSUES: usize = 10;
const LISTED_BOOKS: usize = 5;

/// Check one chapter's verses, returning human-readable issues in a fixed order.
pub fn verify_chapter_quality(book: &str, chapter: u32, verses: &Verses) -> Vec<String> {
    let mut issues = Vec::new();

    if verses.is_empty() {
        issues.push("No verses found".to_string());
        return issues;
    }

    if !verses.contains_key(&1) {
        issues.push("Missing verse 1".to_string());
    }

    let numbers: Vec<u32> = verses.keys().copied().collect();
    for pair in numbers.windows(2) {
        if pair[1] - pair[0] > 1 {
            issues.push(format!("Missing verses {}-{}", pair[0] + 1, pair[1] - 1));
        }
    }

    let short: Vec<u32> = verses
        .iter()
        .filter(|(_, text)| text.chars().count() < SHORT_VERSE_CHARS)
        .map(|(n, _)| *n)
        .collect();
    if !short.is_empty() {
        issues.push(format!("Very short verses: {:?}", short));
    }

    let suspicious: Vec<u32> = verses
        .iter()
        .filter(|(_, text)| SUSPICIOUS.is_match(text.as_str()))
        .map(|(n, _)| *n)
        .collect();
    if !suspicious.is_empty() {
        issues.push(format!("Verses with suspicious content: {:?}", suspicious));
    }

    let count = verses.len();
    match expected_verse_count(book, chapter) {
        Some(expected) => {
            let expected_f = f64::from(expected);
            if (count as f64) < expected_f * LOW_RATIO {
                issues.push(format!(
                    "Fewer verses than expected ({} of {}) - possible parsing issue",
                    count, expected
                ));
            } else if (count as f64) > expected_f * HIGH_RATIO {
                issues.push(format!(
                    "More verses than expected ({} of {}) - possible parsing issue",
                    count, expected
                ));
            }
        }
        None => {
            if count < FEW_VERSES {
                issues.push(format!("Very few verses ({}) - possible parsing issue", count));
            } else if count > MANY_VERSES {
                issues.push(format!("Too many verses ({}) - possible parsing issue", count));
            }
        }
    }

    issues
}

/// Chapter entries ordered by number, non-numeric keys last.
fn sorted_chapters(chapters: &Map<String, Value>) -> Vec<(&String, &Value)> {
    let mut entries: Vec<(&String, &Value)> = chapters.iter().collect();
    entries.sort_by_key(|(key, _)| (key.parse::<u32>().unwrap_or(u32::MAX), (*key).clone()));
    entries
}

fn verses_from_value(value: &Value) -> Verses {
    value
        .as_object()
        .map(|verses| {
            verses
                .iter()
                .filter_map(|(key, text)| {
                    let number = key.parse::<u32>().ok()?;
                    Some((number, text.as_str().unwrap_or_default().to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn chapters_of(book: &Value) -> Option<&Map<String, Value>> {
    book.get("chapters").and_then(Value::as_object)
}

/// Structural checks on a corpus document.
pub fn verify_json_structure(data: &Value) -> Vec<String> {
    let mut issues = Vec::new();

    for key in REQUIRED_TOP_LEVEL_KEYS {
        if data.get(key).is_none() {
            issues.push(format!("Missing top-level key: {}", key));
        }
    }

    let Some(books) = data.get("books").and_then(Value::as_object) else {
        issues.push("No books data found".to_string());
        return issues;
    };

    for (code, book) in books {
        let Some(meta) = find_book(code).filter(|m| m.code == code.as_str()) else {
            issues.push(format!("Unknown book code: {}", code));
            continue;
        };

        for key in REQUIRED_BOOK_KEYS {
            if book.get(key).is_none() {
                issues.push(format!("Book {} missing key: {}", code, key));
            }
        }

        let empty = Map::new();
        let chapters = chapters_of(book).unwrap_or(&empty);
        if chapters.len() != meta.chapters as usize {
            issues.push(format!(
                "Book {}: expected {} chapters, got {}",
                code,
                meta.chapters,
                chapters.len()
            ));
        }

        for (key, _) in sorted_chapters(chapters) {
            match key.parse::<u32>() {
                Ok(n) if (1..=meta.chapters).contains(&n) => {}
                Ok(n) => issues.push(format!("Book {}: invalid chapter number {}", code, n)),
                Err(_) => issues.push(format!(
                    "Book {}: invalid chapter number format '{}'",
                    code, key
                )),
            }
        }
    }

    issues
}

/// Overall verdict of a verification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportStatus {
    Excellent,
    Good,
    Fair,
    Poor,
    Failed,
}

impl ReportStatus {
    /// Status for a total issue count.
    pub fn from_issue_count(total: usize) -> Self {
        if total == 0 {
            ReportStatus::Excellent
        } else if total < GOOD_BELOW {
            ReportStatus::Good
        } else if total < FAIR_BELOW {
            ReportStatus::Fair
        } else {
            ReportStatus::Poor
        }
    }

    fn message(self, total: usize) -> String {
        match self {
            ReportStatus::Excellent => "No issues found - high quality download".to_string(),
            ReportStatus::Good => format!("{} minor issues found", total),
            ReportStatus::Fair => format!("{} issues found - may need attention", total),
            ReportStatus::Poor => format!("{} issues found - significant problems", total),
            ReportStatus::Failed => "No books data found".to_string(),
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReportStatus::Excellent => "EXCELLENT",
            ReportStatus::Good => "GOOD",
            ReportStatus::Fair => "FAIR",
            ReportStatus::Poor => "POOR",
            ReportStatus::Failed => "FAILED",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub status: ReportStatus,
    pub message: String,
}

/// Per-book figures in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookStatistics {
    pub name: String,
    pub expected_chapters: u32,
    pub actual_chapters: usize,
    pub total_verses: usize,
    pub chapter_issues: BTreeMap<String, Vec<String>>,
    pub missing_chapters: Vec<u32>,
}

impl BookStatistics {
    fn issue_count(&self) -> usize {
        self.chapter_issues.len() + self.missing_chapters.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub timestamp: String,
    pub version: String,
    pub total_books: usize,
    pub total_chapters: usize,
    pub total_verses: usize,
    pub structural_issues: Vec<String>,
    pub quality_issues: Vec<String>,
    pub missing_data: Vec<String>,
    pub book_statistics: BTreeMap<String, BookStatistics>,
    pub summary: ReportSummary,
}

impl VerificationReport {
    pub fn total_issues(&self) -> usize {
        self.structural_issues.len() + self.quality_issues.len() + self.missing_data.len()
    }

    /// EXCELLENT and GOOD reports count as a successful verification.
    pub fn is_acceptable(&self) -> bool {
        matches!(
            self.summary.status,
            ReportStatus::Excellent | ReportStatus::Good
        )
    }

    /// Console summary of the report.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

fn write_issue_list(f: &mut fmt::Formatter<'_>, title: &str, issues: &[String]) -> fmt::Result {
    if issues.is_empty() {
        return Ok(());
    }
    writeln!(f, "\n{}:", title)?;
    for issue in issues.iter().take(LISTED_ISSUES) {
        writeln!(f, "    - {}", issue)?;
    }
    if issues.len() > LISTED_ISSUES {
        writeln!(f, "    ... and {} more", issues.len() - LISTED_ISSUES)?;
    }
    Ok(())
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(70);
        writeln!(f, "{}", rule)?;
        writeln!(f, "VERIFICATION REPORT")?;
        writeln!(f, "{}", rule)?;

        writeln!(f, "\nSTATUS: {}", self.summary.status)?;
        writeln!(f, "{}", self.summary.message)?;
        writeln!(f, "Generated: {}", self.timestamp)?;

        writeln!(f, "\nSTATISTICS:")?;
        writeln!(f, "  Books: {}", self.total_books)?;
        writeln!(f, "  Chapters: {}", self.total_chapters)?;
        writeln!(f, "  Verses: {}", self.total_verses)?;

        writeln!(f, "\nISSUES FOUND: {}", self.total_issues())?;
        writeln!(f, "  Structural: {}", self.structural_issues.len())?;
        writeln!(f, "  Quality: {}", self.quality_issues.len())?;
        writeln!(f, "  Missing: {}", self.missing_data.len())?;

        write_issue_list(f, "STRUCTURAL ISSUES", &self.structural_issues)?;
        write_issue_list(f, "QUALITY ISSUES", &self.quality_issues)?;
        write_issue_list(f, "MISSING DATA", &self.missing_data)?;

        let mut ranked: Vec<(&String, &BookStatistics)> = self
            .book_statistics
            .iter()
            .filter(|(_, stats)| stats.issue_count() > 0)
            .collect();
        ranked.sort_by(|a, b| b.1.issue_count().cmp(&a.1.issue_count()));
        if !ranked.is_empty() {
            writeln!(f, "\nBOOKS WITH MOST ISSUES:")?;
            for (code, stats) in ranked.into_iter().take(LISTED_BOOKS) {
                writeln!(
                    f,
                    "    - {} ({}): {} issues",
                    code,
                    stats.name,
                    stats.issue_count()
                )?;
            }
        }

        write!(f, "\n{}", rule)
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Full verification report for a corpus document.
pub fn generate_verification_report(data: &Value) -> VerificationReport {
    let books = data.get("books").and_then(Value::as_object);
    let mut report = VerificationReport {
        timestamp: timestamp(),
        version: data
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string(),
        total_books: books.map_or(0, Map::len),
        total_chapters: 0,
        total_verses: 0,
        structural_issues: verify_json_structure(data),
        quality_issues: Vec::new(),
        missing_data: Vec::new(),
        book_statistics: BTreeMap::new(),
        summary: ReportSummary {
            status: ReportStatus::Failed,
            message: ReportStatus::Failed.message(0),
        },
    };

    let Some(books) = books else {
        return report;
    };

    for meta in BOOKS {
        let Some(book) = books.get(meta.code) else {
            continue;
        };
        let empty = Map::new();
        let chapters = chapters_of(book).unwrap_or(&empty);

        let mut stats = BookStatistics {
            name: book
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string(),
            expected_chapters: meta.chapters,
            actual_chapters: chapters.len(),
            total_verses: 0,
            chapter_issues: BTreeMap::new(),
            missing_chapters: Vec::new(),
        };

        for n in 1..=meta.chapters {
            if !chapters.contains_key(&n.to_string()) {
                stats.missing_chapters.push(n);
                report.missing_data.push(format!("{} chapter {}", meta.code, n));
            }
        }

        for (key, verses) in sorted_chapters(chapters) {
            stats.total_verses += verses.as_object().map_or(0, Map::len);
            let Ok(number) = key.parse::<u32>() else {
                report
                    .quality_issues
                    .push(format!("{}: invalid chapter number '{}'", meta.code, key));
                continue;
            };
            let issues = verify_chapter_quality(meta.code, number, &verses_from_value(verses));
            if issues.is_empty() {
                continue;
            }
            for issue in &issues {
                report
                    .quality_issues
                    .push(format!("{} {}: {}", meta.code, key, issue));
            }
            stats.chapter_issues.insert(key.clone(), issues);
        }

        report.total_chapters += stats.actual_chapters;
        report.total_verses += stats.total_verses;
        report.book_statistics.insert(meta.code.to_string(), stats);
    }

    let total = report.total_issues();
    let status = ReportStatus::from_issue_count(total);
    report.summary = ReportSummary {
        status,
        message: status.message(total),
    };
    report
}

/// Verification report for an in-memory corpus.
pub fn generate_corpus_report(corpus: &BibleCorpus) -> Result<VerificationReport> {
    let value = serde_json::to_value(corpus)
        .map_err(|e| HarvestError::json(&corpus.version, "Verify", e))?;
    Ok(generate_verification_report(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn verses(numbers: &[u32]) -> Verses {
        numbers
            .iter()
            .map(|n| (*n, format!("Detta är vers nummer {}.", n)))
            .collect()
    }

    fn full_chapter(count: u32) -> Value {
        let map: Map<String, Value> = (1..=count)
            .map(|n| (n.to_string(), json!(format!("Detta är vers nummer {}.", n))))
            .collect();
        Value::Object(map)
    }

    fn corpus_with(books: Value) -> Value {
        json!({
            "version": "SRB16",
            "version_name": "Svenska Reformationsbibeln",
            "version_id": 3413,
            "language": "sv",
            "language_name": "Svenska",
            "books": books,
        })
    }

    #[test]
    fn gap_reported_without_missing_first_verse() {
        let issues = verify_chapter_quality("OBA", 1, &verses(&[1, 2, 5]));
        assert_eq!(issues, vec!["Missing verses 3-4".to_string()]);
    }

    #[test]
    fn empty_chapter_stops_early() {
        let issues = verify_chapter_quality("OBA", 1, &Verses::new());
        assert_eq!(issues, vec!["No verses found".to_string()]);
    }

    #[test]
    fn checks_run_in_order() {
        let mut v = verses(&[2, 3]);
        v.insert(4, "kort".into());
        v.insert(5, "Follow us on Facebook today".into());
        let issues = verify_chapter_quality("OBA", 1, &v);
        assert_eq!(
            issues,
            vec![
                "Missing verse 1".to_string(),
                "Very short verses: [4]".to_string(),
                "Verses with suspicious content: [5]".to_string(),
            ]
        );
    }

    #[test]
    fn count_band_uses_expected_when_known() {
        // JHN 3 has 36 verses.
        let few: Vec<u32> = (1..=17).collect();
        let issues = verify_chapter_quality("JHN", 3, &verses(&few));
        assert_eq!(
            issues,
            vec!["Fewer verses than expected (17 of 36) - possible parsing issue".to_string()]
        );

        let enough: Vec<u32> = (1..=18).collect();
        assert!(verify_chapter_quality("JHN", 3, &verses(&enough)).is_empty());

        let issues = verify_chapter_quality("OBA", 1, &verses(&[1, 2]));
        assert_eq!(
            issues,
            vec!["Very few verses (2) - possible parsing issue".to_string()]
        );
    }

    #[test]
    fn count_band_flags_too_many_verses() {
        let many: Vec<u32> = (1..=60).collect();
        assert_eq!(
            verify_chapter_quality("JHN", 3, &verses(&many)),
            vec!["More verses than expected (60 of 36) - possible parsing issue".to_string()]
        );

        let upper: Vec<u32> = (1..=54).collect();
        assert!(verify_chapter_quality("JHN", 3, &verses(&upper)).is_empty());

        let psalm: Vec<u32> = (1..=181).collect();
        assert_eq!(
            verify_chapter_quality("PSA", 119, &verses(&psalm)),
            vec!["Too many verses (181) - possible parsing issue".to_string()]
        );
        let psalm: Vec<u32> = (1..=176).collect();
        assert!(verify_chapter_quality("PSA", 119, &verses(&psalm)).is_empty());
    }

    #[test]
    fn status_thresholds() {
        assert_eq!(ReportStatus::from_issue_count(0), ReportStatus::Excellent);
        assert_eq!(ReportStatus::from_issue_count(9), ReportStatus::Good);
        assert_eq!(ReportStatus::from_issue_count(10), ReportStatus::Fair);
        assert_eq!(ReportStatus::from_issue_count(49), ReportStatus::Fair);
        assert_eq!(ReportStatus::from_issue_count(50), ReportStatus::Poor);
    }

    #[test]
    fn missing_chapter_lands_in_missing_data() {
        let mut chapters = Map::new();
        for n in (1..=10).filter(|n| *n != 7) {
            chapters.insert(n.to_string(), full_chapter(12));
        }
        let data = corpus_with(json!({
            "EZR": {"code": "EZR", "name": "Ezra", "swedish_name": "Esra", "chapters": chapters}
        }));

        let report = generate_verification_report(&data);
        assert_eq!(report.missing_data, vec!["EZR chapter 7".to_string()]);
        assert_eq!(
            report.structural_issues,
            vec!["Book EZR: expected 10 chapters, got 9".to_string()]
        );
        assert_eq!(report.book_statistics["EZR"].missing_chapters, vec![7]);
        assert_eq!(report.total_chapters, 9);
        assert_eq!(report.total_verses, 9 * 12);
        assert_eq!(report.summary.status, ReportStatus::Good);
        assert!(report.is_acceptable());
    }

    #[test]
    fn structure_flags_unknown_books_and_bad_keys() {
        let data = json!({
            "version": "SRB16",
            "books": {
                "XYZ": {},
                "OBA": {"code": "OBA", "chapters": {"1": {}, "x": {}, "3": {}}}
            }
        });
        let issues = verify_json_structure(&data);
        assert_eq!(
            issues,
            vec![
                "Missing top-level key: version_name".to_string(),
                "Missing top-level key: version_id".to_string(),
                "Missing top-level key: language".to_string(),
                "Missing top-level key: language_name".to_string(),
                "Book OBA missing key: name".to_string(),
                "Book OBA missing key: swedish_name".to_string(),
                "Book OBA: expected 1 chapters, got 3".to_string(),
                "Book OBA: invalid chapter number 3".to_string(),
                "Book OBA: invalid chapter number format 'x'".to_string(),
                "Unknown book code: XYZ".to_string(),
            ]
        );
    }

    #[test]
    fn missing_books_fails_report() {
        let report = generate_verification_report(&json!({"version": "SRB16"}));
        assert_eq!(report.summary.status, ReportStatus::Failed);
        assert!(report.structural_issues.contains(&"No books data found".to_string()));
        assert!(!report.is_acceptable());
        assert!(report.render().contains("STATUS: FAILED"));
    }

    #[test]
    fn report_is_deterministic() {
        let data = corpus_with(json!({
            "OBA": {"code": "OBA", "name": "Obadiah", "swedish_name": "Obadja",
                    "chapters": {"1": {"1": "kort", "3": "Detta är en vers."}}}
        }));
        let first = generate_verification_report(&data);
        let second = generate_verification_report(&data);
        assert_eq!(first.structural_issues, second.structural_issues);
        assert_eq!(first.quality_issues, second.quality_issues);
        assert_eq!(first.missing_data, second.missing_data);
        assert_eq!(
            first.quality_issues,
            vec![
                "OBA 1: Missing verses 2-2".to_string(),
                "OBA 1: Very short verses: [1]".to_string(),
                "OBA 1: Very few verses (2) - possible parsing issue".to_string(),
            ]
        );
    }

    #[test]
    fn render_lists_top_books() {
        let data = corpus_with(json!({
            "RUT": {"code": "RUT", "name": "Ruth", "swedish_name": "Rut",
                    "chapters": {"1": full_chapter(22)}}
        }));
        let report = generate_verification_report(&data);
        let text = report.render();
        assert!(text.contains("STATUS: GOOD"));
        assert!(text.contains("RUT chapter 4"));
        assert!(text.contains("- RUT (Ruth): 3 issues"));
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["summary"]["status"], "GOOD");
    }

    #[test]
    fn corpus_report_matches_value_report() {
        let corpus = BibleCorpus::new(&crate::options::BibleVersion::default());
        let report = generate_corpus_report(&corpus).unwrap();
        assert_eq!(report.total_books, 0);
        assert_eq!(report.summary.status, ReportStatus::Excellent);
    }
}
