// ABOUTME: Sequential chapter-by-chapter download of a Bible translation into a corpus file.
// ABOUTME: Retries low-confidence chapters, saves a temp file after every book and writes the final report.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use scraper::Html;
use tracing::{info, warn};

use crate::books::{expected_verse_count, BookMetadata, BOOKS};
use crate::client::Client;
use crate::corpus::{BibleCorpus, BookData, Chapter};
use crate::dom::{extract_text, ContentLocator};
use crate::error::Result;
use crate::extractors::{ParsedChapter, VerseParser};
use crate::store::{load_json, remove_if_exists, report_path, save_json, temp_path};
use crate::verify::{generate_corpus_report, VerificationReport};

/// What to download and where to write it.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadPlan {
    pub books: Vec<&'static BookMetadata>,
    pub output: PathBuf,
}

impl DownloadPlan {
    pub fn new(books: Vec<&'static BookMetadata>, output: impl Into<PathBuf>) -> Self {
        Self {
            books,
            output: output.into(),
        }
    }

    /// Every book in canonical order.
    pub fn all(output: impl Into<PathBuf>) -> Self {
        Self::new(BOOKS.iter().collect(), output)
    }
}

/// Outcome of a finished download.
#[derive(Debug, Clone)]
pub struct DownloadSummary {
    pub output: PathBuf,
    /// `None` when the report could not be written.
    pub report_path: Option<PathBuf>,
    pub books_downloaded: usize,
    /// Books taken over from a previous run's temp file.
    pub books_resumed: usize,
    pub chapters: usize,
    pub verses: usize,
    /// `"<BOOK> <chapter>"` for every chapter that yielded no verses.
    pub failed_chapters: Vec<String>,
    pub report: VerificationReport,
}

/// Locate, flatten and parse one chapter page. Kept synchronous so the
/// parsed document never lives across an await.
fn parse_chapter_page(
    html: &str,
    locator: &ContentLocator,
    parser: &VerseParser,
    book: &str,
    chapter: u32,
) -> ParsedChapter {
    let doc = Html::parse_document(html);
    let area = locator.locate(&doc);
    let text = extract_text(area);
    parser.parse(&text, book, chapter)
}

/// Drives the chapter downloads for one client.
#[derive(Debug)]
pub struct Downloader<'a> {
    client: &'a Client,
    locator: ContentLocator,
    parser: VerseParser,
}

impl<'a> Downloader<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            locator: ContentLocator::chapter_page(),
            parser: VerseParser::new(client.options().debug),
        }
    }

    async fn attempt_chapter(&self, book: &str, chapter: u32) -> Result<ParsedChapter> {
        let url = self.client.chapter_url(book, chapter);
        let html = self.client.fetch_html(&url).await?;
        Ok(parse_chapter_page(
            &html,
            &self.locator,
            &self.parser,
            book,
            chapter,
        ))
    }

    /// Fetch one chapter, retrying while the result looks incomplete.
    ///
    /// The attempt with the most verses is returned; an empty result means
    /// every attempt failed or found nothing.
    pub async fn fetch_chapter(&self, book: &BookMetadata, chapter: u32) -> ParsedChapter {
        let opts = self.client.options();
        let expected = expected_verse_count(book.code, chapter);
        let attempts = opts.retry_attempts.max(1);
        let mut best = ParsedChapter::default();

        for attempt in 1..=attempts {
            match self.attempt_chapter(book.code, chapter).await {
                Ok(parsed) => {
                    if parsed.verses.len() > best.verses.len() {
                        best = parsed;
                    }
                    if best.meets_confidence(expected, opts.confidence_threshold) {
                        return best;
                    }
                    warn!(
                        book = book.code,
                        chapter,
                        attempt,
                        attempts,
                        verses = best.verses.len(),
                        ?expected,
                        "low-confidence chapter parse"
                    );
                }
                Err(e) => {
                    warn!(book = book.code, chapter, attempt, attempts, error = %e, "chapter fetch failed");
                    if !e.is_retryable() {
                        break;
                    }
                }
            }

            if attempt < attempts {
                tokio::time::sleep(opts.retry_pause).await;
            }
        }

        best
    }

    fn resume_from(&self, temp: &Path) -> Option<BibleCorpus> {
        if !self.client.options().resume || !temp.exists() {
            return None;
        }
        match load_json::<BibleCorpus>(temp) {
            Ok(corpus) => {
                info!(path = %temp.display(), books = corpus.books.len(), "resuming from temp file");
                Some(corpus)
            }
            Err(e) => {
                warn!(path = %temp.display(), error = %e, "ignoring unreadable temp file");
                None
            }
        }
    }

    /// Download every book of the plan and write the corpus and its report.
    ///
    /// The partial corpus is written to `temp_<output>` after each book so an
    /// interrupted run leaves every finished book on disk. Only the final
    /// corpus save is fatal.
    pub async fn download(&self, plan: &DownloadPlan) -> Result<DownloadSummary> {
        let opts = self.client.options();
        let temp = temp_path(&plan.output);

        let mut corpus = self
            .resume_from(&temp)
            .unwrap_or_else(|| BibleCorpus::new(&opts.version));
        // Only books of this plan carry over from an earlier run.
        corpus
            .books
            .retain(|code, _| plan.books.iter().any(|meta| meta.code == code.as_str()));
        let mut planned = HashSet::new();
        let mut failed_chapters = Vec::new();
        let mut books_downloaded = 0;
        let mut books_resumed = 0;

        info!(
            books = plan.books.len(),
            output = %plan.output.display(),
            version = %opts.version.code,
            "starting download"
        );

        for (index, meta) in plan.books.iter().enumerate() {
            if !planned.insert(meta.code) {
                continue;
            }
            if corpus.has_book(meta.code) {
                info!(book = meta.code, "already downloaded, skipping");
                books_resumed += 1;
                continue;
            }

            info!(
                book = meta.code,
                name = meta.swedish_name,
                chapters = meta.chapters,
                position = index + 1,
                total = plan.books.len(),
                "downloading book"
            );

            let mut book = BookData::from_metadata(meta);
            for number in 1..=meta.chapters {
                let parsed = self.fetch_chapter(meta, number).await;
                let verses = parsed.verses.len();
                let recorded = book.record_chapter(Chapter {
                    book: meta.code.to_string(),
                    number,
                    verses: parsed.verses,
                });
                if recorded {
                    info!(book = meta.code, chapter = number, verses, tier = ?parsed.tier, "chapter downloaded");
                } else {
                    warn!(book = meta.code, chapter = number, "no verses found");
                    failed_chapters.push(format!("{} {}", meta.code, number));
                }
                tokio::time::sleep(opts.request_delay).await;
            }

            info!(
                book = meta.code,
                chapters = book.chapters.len(),
                verses = book.verse_count(),
                "book complete"
            );
            corpus.insert_book(book);
            books_downloaded += 1;

            if let Err(e) = save_json(&temp, &corpus) {
                warn!(path = %temp.display(), error = %e, "could not save progress");
            }
        }

        save_json(&plan.output, &corpus)?;
        info!(path = %plan.output.display(), "corpus saved");

        let report = generate_corpus_report(&corpus)?;
        let report_file = report_path(&plan.output);
        let saved_report = match save_json(&report_file, &report) {
            Ok(()) => {
                info!(path = %report_file.display(), status = %report.summary.status, "verification report saved");
                Some(report_file)
            }
            Err(e) => {
                warn!(path = %report_file.display(), error = %e, "could not save verification report");
                None
            }
        };

        if let Err(e) = remove_if_exists(&temp) {
            warn!(path = %temp.display(), error = %e, "could not remove temp file");
        }

        Ok(DownloadSummary {
            output: plan.output.clone(),
            report_path: saved_report,
            books_downloaded,
            books_resumed,
            chapters: corpus.total_chapters(),
            verses: corpus.total_verses(),
            failed_chapters,
            report,
        })
    }
}
