// ABOUTME: Picks the element holding the main content of a page from ordered strategies.
// ABOUTME: Selector probes, a verse-marker ancestor walk and a longest-text fallback; never fails.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

use super::text::stripped_text;

static MARKER_START_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\s").unwrap());
static MARKER_ANY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d+\s").unwrap());

/// Text nodes inspected by [`Strategy::VerseMarkers`].
const VERSE_MARKER_PROBES: usize = 3;
/// Markers an ancestor needs before it counts as the verse container.
const VERSE_MARKER_MIN: usize = 3;

/// One way of finding the content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// First element matching the selector that has non-blank text.
    Selector(&'static str),
    /// Walk up from the first numbered text nodes to a container with several numbers.
    VerseMarkers,
    /// Longest element among `(selector, minimum stripped length)` groups.
    LongestText(&'static [(&'static str, usize)]),
}

impl Strategy {
    /// Run this strategy against a document.
    pub fn attempt<'a>(&self, doc: &'a Html) -> Option<ElementRef<'a>> {
        match self {
            Strategy::Selector(css) => {
                let selector = Selector::parse(css).ok()?;
                doc.select(&selector)
                    .find(|el| el.text().any(|t| !t.trim().is_empty()))
            }
            Strategy::VerseMarkers => find_by_verse_markers(doc),
            Strategy::LongestText(groups) => find_longest(doc, groups),
        }
    }
}

fn find_by_verse_markers(doc: &Html) -> Option<ElementRef<'_>> {
    let probes = doc
        .tree
        .root()
        .descendants()
        .filter(|node| match node.value() {
            Node::Text(t) => MARKER_START_RE.is_match(t),
            _ => false,
        })
        .take(VERSE_MARKER_PROBES);

    for probe in probes {
        let mut current = probe.parent().and_then(ElementRef::wrap);
        while let Some(el) = current {
            let name = el.value().name();
            if name == "body" || name == "html" {
                break;
            }
            let text = el.text().collect::<String>();
            if MARKER_ANY_RE.find_iter(&text).count() >= VERSE_MARKER_MIN {
                return Some(el);
            }
            current = el.parent().and_then(ElementRef::wrap);
        }
    }
    None
}

fn find_longest<'a>(doc: &'a Html, groups: &[(&str, usize)]) -> Option<ElementRef<'a>> {
    let mut best: Option<(ElementRef<'a>, usize)> = None;

    for (css, min_len) in groups {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        for el in doc.select(&selector) {
            let len = stripped_text(&el).chars().count();
            if len <= *min_len {
                continue;
            }
            if best.map_or(true, |(_, top)| len > top) {
                best = Some((el, len));
            }
        }
    }

    best.map(|(el, _)| el)
}

const CHAPTER_PAGE_STRATEGIES: &[Strategy] = &[
    Strategy::Selector(r#"div[class*="ChapterContent_reader"]"#),
    Strategy::Selector("div[data-usfm]"),
    Strategy::Selector(".chapter-content"),
    Strategy::Selector(".reader"),
    Strategy::Selector(".verse-content"),
    Strategy::Selector("main"),
    Strategy::Selector("article"),
    Strategy::Selector("section"),
    Strategy::VerseMarkers,
    Strategy::LongestText(&[("div, td, table", 300)]),
];

const QNA_PAGE_STRATEGIES: &[Strategy] = &[Strategy::LongestText(&[
    ("table", 300),
    (
        r#"div[class*="content"], div[class*="main"], div[class*="body"], div[class*="newspaper"]"#,
        100,
    ),
    ("article, section, main, td", 300),
])];

/// Ordered list of strategies; the first that finds something wins.
#[derive(Debug, Clone)]
pub struct ContentLocator {
    strategies: Vec<Strategy>,
}

impl ContentLocator {
    pub fn new(strategies: Vec<Strategy>) -> Self {
        Self { strategies }
    }

    /// Strategies tuned for chapter pages of the Bible service.
    pub fn chapter_page() -> Self {
        Self::new(CHAPTER_PAGE_STRATEGIES.to_vec())
    }

    /// Strategies tuned for question pages of the Q&A site.
    pub fn qna_page() -> Self {
        Self::new(QNA_PAGE_STRATEGIES.to_vec())
    }

    /// Element holding the main content.
    ///
    /// Falls back to `<body>`, then to the root element, so a result is
    /// always returned even for empty or malformed markup.
    pub fn locate<'a>(&self, doc: &'a Html) -> ElementRef<'a> {
        for strategy in &self.strategies {
            if let Some(found) = strategy.attempt(doc) {
                tracing::trace!(?strategy, tag = found.value().name(), "content located");
                return found;
            }
        }

        Selector::parse("body")
            .ok()
            .and_then(|body| doc.select(&body).next())
            .unwrap_or_else(|| doc.root_element())
    }
}
