// ABOUTME: Typed corpus model: verses, chapters, books and the whole downloaded translation.
// ABOUTME: Serializes to the persisted JSON shape with chapter and verse numbers as string keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::books::BookMetadata;
use crate::options::BibleVersion;

/// Verse number to verse text, ordered by number.
pub type Verses = BTreeMap<u32, String>;

/// One fetched chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub book: String,
    pub number: u32,
    pub verses: Verses,
}

/// One book as stored in the corpus file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookData {
    pub code: String,
    pub name: String,
    pub swedish_name: String,
    #[serde(default)]
    pub chapters: BTreeMap<u32, Verses>,
}

impl BookData {
    /// Empty book built from its reference row.
    pub fn from_metadata(meta: &BookMetadata) -> Self {
        Self {
            code: meta.code.to_string(),
            name: meta.name.to_string(),
            swedish_name: meta.swedish_name.to_string(),
            chapters: BTreeMap::new(),
        }
    }

    /// Store a chapter. Chapters without verses or from another book are
    /// never recorded.
    pub fn record_chapter(&mut self, chapter: Chapter) -> bool {
        if chapter.verses.is_empty() || !chapter.book.eq_ignore_ascii_case(&self.code) {
            return false;
        }
        self.chapters.insert(chapter.number, chapter.verses);
        true
    }

    pub fn verse_count(&self) -> usize {
        self.chapters.values().map(BTreeMap::len).sum()
    }
}

/// A (possibly partial) downloaded translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibleCorpus {
    pub version: String,
    pub version_name: String,
    pub version_id: u32,
    pub language: String,
    pub language_name: String,
    #[serde(default)]
    pub books: BTreeMap<String, BookData>,
}

impl BibleCorpus {
    /// Empty corpus for the given translation.
    pub fn new(version: &BibleVersion) -> Self {
        Self {
            version: version.code.clone(),
            version_name: version.name.clone(),
            version_id: version.id,
            language: version.language.clone(),
            language_name: version.language_name.clone(),
            books: BTreeMap::new(),
        }
    }

    /// Add a completed book, replacing any earlier copy.
    pub fn insert_book(&mut self, book: BookData) {
        self.books.insert(book.code.clone(), book);
    }

    pub fn has_book(&self, code: &str) -> bool {
        self.books.contains_key(code)
    }

    pub fn total_chapters(&self) -> usize {
        self.books.values().map(|b| b.chapters.len()).sum()
    }

    pub fn total_verses(&self) -> usize {
        self.books.values().map(BookData::verse_count).sum()
    }
}
