// ABOUTME: Main library entry point for the Bible corpus harvester and the Q&A scraper.
// ABOUTME: Re-exports the public API: Client, ClientBuilder, Downloader, QnaScraper, the corpus model and the verifier.

//! bibel-harvest - best-effort scrapers for a Bible translation and a Q&A site.
//!
//! The Bible downloader fetches a translation chapter by chapter, locates the
//! verse area of each page, parses verses through a chain of fallback tiers
//! and writes the corpus as JSON together with a verification report. The
//! Q&A scraper follows every question link of the Q&A index and exports the
//! question and answer texts as JSON and Markdown.
//!
//! # Example
//!
//! ```no_run
//! use bibel_harvest::{books, Client, DownloadPlan, Downloader, HarvestError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), HarvestError> {
//!     let client = Client::builder().build();
//!     let plan = DownloadPlan::new(books::resolve_books(&["JHN"]), "srb16_john.json");
//!     let summary = Downloader::new(&client).download(&plan).await?;
//!     println!("{}", summary.report.render());
//!     Ok(())
//! }
//! ```

pub mod books;
pub mod cleaner;
pub mod client;
pub mod corpus;
pub mod dom;
pub mod download;
pub mod error;
pub mod extractors;
pub mod options;
pub mod patterns;
pub mod qna;
pub mod resource;
pub mod store;
pub mod verify;

pub use crate::books::{BookMetadata, Testament, BOOKS, SAMPLE_BOOKS};
pub use crate::client::Client;
pub use crate::corpus::{BibleCorpus, BookData, Chapter, Verses};
pub use crate::download::{DownloadPlan, DownloadSummary, Downloader};
pub use crate::error::{ErrorCode, HarvestError, Result};
pub use crate::extractors::{ParseTier, ParsedChapter, VerseParser};
pub use crate::options::{BibleVersion, ClientBuilder, Options};
pub use crate::qna::{QnaEntry, QnaScraper};
pub use crate::verify::{
    generate_corpus_report, generate_verification_report, ReportStatus, VerificationReport,
};
