// ABOUTME: Page-specific extraction: verses from chapter text, questions and answers from Q&A pages.
// ABOUTME: Pure functions over text and parsed documents; no I/O.

//! Content extraction module.
//!
//! Submodules:
//! - `verses`: tiered verse parser for flattened chapter text.
//! - `qna`: index-link, question and answer extraction for the Q&A site.

pub mod qna;
pub mod verses;

pub use qna::{extract_qna_content, extract_question_links, QnaContent, QuestionLink};
pub use verses::{parse_verses, ParseTier, ParsedChapter, VerseParser};
