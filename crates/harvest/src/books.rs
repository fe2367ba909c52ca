// ABOUTME: Immutable reference data: the 66 books with chapter counts, categories, and expected verse counts.
// ABOUTME: Used by the downloader to plan work and by the verifier to judge completeness.

use std::fmt;

/// Which half of the canon a book belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Testament {
    Old,
    New,
}

impl fmt::Display for Testament {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Testament::Old => "Old Testament",
            Testament::New => "New Testament",
        };
        write!(f, "{}", s)
    }
}

/// One row of the reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookMetadata {
    pub code: &'static str,
    pub name: &'static str,
    pub swedish_name: &'static str,
    pub chapters: u32,
    pub testament: Testament,
}

const fn ot(
    code: &'static str,
    name: &'static str,
    swedish_name: &'static str,
    chapters: u32,
) -> BookMetadata {
    BookMetadata {
        code,
        name,
        swedish_name,
        chapters,
        testament: Testament::Old,
    }
}

const fn nt(
    code: &'static str,
    name: &'static str,
    swedish_name: &'static str,
    chapters: u32,
) -> BookMetadata {
    BookMetadata {
        code,
        name,
        swedish_name,
        chapters,
        testament: Testament::New,
    }
}

/// All books in canonical order.
pub const BOOKS: &[BookMetadata] = &[
    ot("GEN", "Genesis", "Första Mosebok", 50),
    ot("EXO", "Exodus", "Andra Mosebok", 40),
    ot("LEV", "Leviticus", "Tredje Mosebok", 27),
    ot("NUM", "Numbers", "Fjärde Mosebok", 36),
    ot("DEU", "Deuteronomy", "Femte Mosebok", 34),
    ot("JOS", "Joshua", "Josua", 24),
    ot("JDG", "Judges", "Domarboken", 21),
    ot("RUT", "Ruth", "Rut", 4),
    ot("1SA", "1 Samuel", "Första Samuelsboken", 31),
    ot("2SA", "2 Samuel", "Andra Samuelsboken", 24),
    ot("1KI", "1 Kings", "Första Kungaboken", 22),
    ot("2KI", "2 Kings", "Andra Kungaboken", 25),
    ot("1CH", "1 Chronicles", "Första Krönikeboken", 29),
    ot("2CH", "2 Chronicles", "Andra Krönikeboken", 36),
    ot("EZR", "Ezra", "Esra", 10),
    ot("NEH", "Nehemiah", "Nehemja", 13),
    ot("EST", "Esther", "Ester", 10),
    ot("JOB", "Job", "Job", 42),
    ot("PSA", "Psalms", "Psaltaren", 150),
    ot("PRO", "Proverbs", "Ordspråksboken", 31),
    ot("ECC", "Ecclesiastes", "Predikaren", 12),
    ot("SNG", "Song of Songs", "Höga visan", 8),
    ot("ISA", "Isaiah", "Jesaja", 66),
    ot("JER", "Jeremiah", "Jeremia", 52),
    ot("LAM", "Lamentations", "Klagovisorna", 5),
    ot("EZK", "Ezekiel", "Hesekiel", 48),
    ot("DAN", "Daniel", "Daniel", 12),
    ot("HOS", "Hosea", "Hosea", 14),
    ot("JOL", "Joel", "Joel", 3),
    ot("AMO", "Amos", "Amos", 9),
    ot("OBA", "Obadiah", "Obadja", 1),
    ot("JON", "Jonah", "Jona", 4),
    ot("MIC", "Micah", "Mika", 7),
    ot("NAM", "Nahum", "Nahum", 3),
    ot("HAB", "Habakkuk", "Habackuk", 3),
    ot("ZEP", "Zephaniah", "Sefanja", 3),
    ot("HAG", "Haggai", "Haggai", 2),
    ot("ZEC", "Zechariah", "Sakarja", 14),
    ot("MAL", "Malachi", "Malaki", 4),
    nt("MAT", "Matthew", "Matteus", 28),
    nt("MRK", "Mark", "Markus", 16),
    nt("LUK", "Luke", "Lukas", 24),
    nt("JHN", "John", "Johannes", 21),
    nt("ACT", "Acts", "Apostlagärningarna", 28),
    nt("ROM", "Romans", "Romarbrevet", 16),
    nt("1CO", "1 Corinthians", "Första Korinthierbrevet", 16),
    nt("2CO", "2 Corinthians", "Andra Korinthierbrevet", 13),
    nt("GAL", "Galatians", "Galaterbrevet", 6),
    nt("EPH", "Ephesians", "Efesierbrevet", 6),
    nt("PHP", "Philippians", "Filipperbrevet", 4),
    nt("COL", "Colossians", "Kolosserbrevet", 4),
    nt("1TH", "1 Thessalonians", "Första Thessalonikerbrevet", 5),
    nt("2TH", "2 Thessalonians", "Andra Thessalonikerbrevet", 3),
    nt("1TI", "1 Timothy", "Första Timotheosbrevet", 6),
    nt("2TI", "2 Timothy", "Andra Timotheosbrevet", 4),
    nt("TIT", "Titus", "Titusbrevet", 3),
    nt("PHM", "Philemon", "Filemonbrevet", 1),
    nt("HEB", "Hebrews", "Hebreerbrevet", 13),
    nt("JAS", "James", "Jakobs brev", 5),
    nt("1PE", "1 Peter", "Första Petrusbrevet", 5),
    nt("2PE", "2 Peter", "Andra Petrusbrevet", 3),
    nt("1JN", "1 John", "Första Johannesbrevet", 5),
    nt("2JN", "2 John", "Andra Johannesbrevet", 1),
    nt("3JN", "3 John", "Tredje Johannesbrevet", 1),
    nt("JUD", "Jude", "Judas brev", 1),
    nt("REV", "Revelation", "Uppenbarelseboken", 22),
];

/// Books downloaded by the sample and debug-sample menu entries.
pub const SAMPLE_BOOKS: &[&str] = &["MAT", "JHN", "ROM", "EPH", "REV"];

/// Known verse counts per chapter, index 0 is chapter 1.
///
/// Only a handful of books are listed; chapters outside this table fall back
/// to the fixed sanity band in the verifier.
const EXPECTED_VERSE_COUNTS: &[(&str, &[u32])] = &[
    (
        "GEN",
        &[
            31, 25, 24, 26, 32, 22, 24, 22, 29, 32, 32, 20, 18, 24, 21, 16, 27, 33, 38, 18, 34,
            24, 20, 67, 34, 35, 46, 22, 35, 43, 55, 32, 20, 31, 29, 43, 36, 30, 23, 23, 57, 38,
            34, 34, 28, 34, 31, 22, 33, 26,
        ],
    ),
    (
        "MAT",
        &[
            25, 23, 17, 25, 48, 34, 29, 34, 38, 42, 30, 50, 58, 36, 39, 28, 27, 35, 30, 34, 46,
            46, 39, 51, 46, 75, 66, 20,
        ],
    ),
    (
        "MRK",
        &[45, 28, 35, 41, 43, 56, 37, 38, 50, 52, 33, 44, 37, 72, 47, 20],
    ),
    (
        "JHN",
        &[
            51, 25, 36, 54, 47, 71, 53, 59, 41, 42, 57, 50, 38, 31, 27, 33, 26, 40, 42, 31, 25,
        ],
    ),
    (
        "ROM",
        &[32, 29, 31, 25, 21, 23, 25, 39, 33, 21, 36, 21, 14, 23, 33, 27],
    ),
    ("EPH", &[23, 22, 21, 32, 33, 24]),
    (
        "REV",
        &[
            20, 29, 22, 11, 14, 17, 17, 13, 21, 11, 19, 17, 18, 20, 8, 21, 18, 24, 21, 15, 27, 21,
        ],
    ),
];

/// Look up a book by its code (case-insensitive).
pub fn find_book(code: &str) -> Option<&'static BookMetadata> {
    BOOKS.iter().find(|b| b.code.eq_ignore_ascii_case(code))
}

/// All books of one testament, in canonical order.
pub fn books_in(testament: Testament) -> Vec<&'static BookMetadata> {
    BOOKS.iter().filter(|b| b.testament == testament).collect()
}

/// Resolve a list of codes, skipping unknown ones.
pub fn resolve_books(codes: &[&str]) -> Vec<&'static BookMetadata> {
    codes.iter().filter_map(|code| find_book(code)).collect()
}

/// Expected verse count for one chapter, when the table knows it.
pub fn expected_verse_count(book_code: &str, chapter: u32) -> Option<u32> {
    let index = usize::try_from(chapter.checked_sub(1)?).ok()?;
    EXPECTED_VERSE_COUNTS
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(book_code))
        .and_then(|(_, counts)| counts.get(index).copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_66_books_split_39_27() {
        assert_eq!(BOOKS.len(), 66);
        assert_eq!(books_in(Testament::Old).len(), 39);
        assert_eq!(books_in(Testament::New).len(), 27);
        assert_eq!(Testament::New.to_string(), "New Testament");
        let total: u32 = BOOKS.iter().map(|b| b.chapters).sum();
        assert_eq!(total, 1189);
    }

    #[test]
    fn expected_counts_cover_every_chapter_of_listed_books() {
        for (code, counts) in EXPECTED_VERSE_COUNTS {
            let book = find_book(code).expect("listed book exists");
            assert_eq!(counts.len() as u32, book.chapters, "{}", code);
        }
    }

    #[test]
    fn lookups() {
        assert_eq!(find_book("jhn").map(|b| b.chapters), Some(21));
        assert_eq!(expected_verse_count("JHN", 3), Some(36));
        assert_eq!(expected_verse_count("JHN", 0), None);
        assert_eq!(expected_verse_count("JHN", 22), None);
        assert_eq!(expected_verse_count("OBA", 1), None);
        assert_eq!(resolve_books(&["MAT", "XXX", "REV"]).len(), 2);
    }
}
