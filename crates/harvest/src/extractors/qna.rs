// ABOUTME: Extraction for the Q&A site: question links on the index page, question and answer on each page.
// ABOUTME: Works on parsed documents only; fetching and pacing live in the scraper.

use std::collections::HashSet;

use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::cleaner::{beautify_text, normalize_spaces};
use crate::dom::{extract_text, extract_text_skipping, ContentLocator};

/// Question used when a page has a single block of text and no heading.
pub const UNIDENTIFIED_QUESTION: &str = "Fråga inte tydligt identifierad";

const MIN_LINK_TEXT_CHARS: usize = 10;
const MIN_QUESTION_CHARS: usize = 20;
const ITALIC_PROBES: usize = 3;
const MIN_SECTION_CHARS: usize = 10;
const MIN_ANSWER_CHARS: usize = 100;

const HEADING_SELECTORS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];
const SECTION_SELECTOR: &str = "p, li, blockquote, div, td, h1, h2, h3, h4, h5, h6";
const NESTED_BLOCK_SELECTOR: &str = "p, div, li, blockquote, td, table, ul, ol, h1, h2, h3, h4, h5, h6";

/// One entry of the Q&A index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionLink {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub question: String,
    pub href: String,
    pub full_url: String,
}

/// Question and answer text extracted from one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QnaContent {
    pub question: String,
    pub answer: String,
}

/// Collect question links from the index page.
///
/// Keeps anchors whose href mentions `QandA.php`, whose text has at least
/// ten characters and whose `sel` parameter is present and not `0`.
pub fn extract_question_links(doc: &Html, base: &Url) -> Vec<QuestionLink> {
    let Ok(anchors) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    doc.select(&anchors)
        .filter_map(|a| {
            let href = a.value().attr("href")?.trim();
            if !href.contains("QandA.php") {
                return None;
            }
            let text = normalize_spaces(&a.text().collect::<String>());
            if text.chars().count() < MIN_LINK_TEXT_CHARS {
                return None;
            }

            let full = base.join(href).ok()?;
            let param = |key: &str| {
                full.query_pairs()
                    .find(|(k, _)| k == key)
                    .map(|(_, v)| v.into_owned())
            };
            let id = param("sel").unwrap_or_else(|| "0".to_string());
            if id == "0" {
                return None;
            }

            Some(QuestionLink {
                id,
                kind: param("qtype").unwrap_or_else(|| "other".to_string()),
                question: text,
                href: href.to_string(),
                full_url: full.to_string(),
            })
        })
        .collect()
}

fn select_all<'a>(root: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(sel) => root.select(&sel).collect(),
        Err(_) => Vec::new(),
    }
}

fn longest_first(candidates: Vec<String>) -> Option<String> {
    candidates.into_iter().fold(None, |best, candidate| match best {
        Some(b) if b.chars().count() >= candidate.chars().count() => Some(b),
        _ => Some(candidate),
    })
}

/// The question of a page: the longest long heading, else the longest of the
/// first few italic runs. Empty when neither qualifies.
pub fn extract_question(area: ElementRef) -> String {
    let long_enough = |text: &String| text.chars().count() > MIN_QUESTION_CHARS;

    let headings: Vec<String> = HEADING_SELECTORS
        .iter()
        .flat_map(|css| select_all(area, css))
        .map(|h| beautify_text(&extract_text(h)))
        .filter(long_enough)
        .collect();
    if let Some(question) = longest_first(headings) {
        return question;
    }

    let italics: Vec<String> = select_all(area, "i, em")
        .into_iter()
        .take(ITALIC_PROBES)
        .map(|el| beautify_text(&extract_text(el)))
        .filter(long_enough)
        .collect();
    longest_first(italics).unwrap_or_default()
}

fn is_leaf_block(el: &ElementRef) -> bool {
    select_all(*el, NESTED_BLOCK_SELECTOR)
        .iter()
        .all(|inner| inner.id() == el.id())
}

/// Headings repeating the question, skipped from the answer.
fn question_headings(area: ElementRef, question: &str) -> HashSet<NodeId> {
    let question = question.trim();
    if question.chars().count() <= MIN_QUESTION_CHARS {
        return HashSet::new();
    }
    HEADING_SELECTORS
        .iter()
        .flat_map(|css| select_all(area, css))
        .filter(|h| beautify_text(&extract_text(*h)).contains(question))
        .map(|h| h.id())
        .collect()
}

/// The answer text of a page, paragraphs separated by blank lines.
///
/// Sections are taken in document order, de-duplicated case-insensitively
/// and very short ones dropped. When the sections hold too little text the
/// whole area is used instead.
pub fn extract_answer(area: ElementRef, question: &str) -> String {
    let skip = question_headings(area, question);
    let is_skipped = |el: &ElementRef| {
        el.ancestors()
            .chain(std::iter::once(**el))
            .any(|node| skip.contains(&node.id()))
    };

    let mut sections: Vec<String> = select_all(area, SECTION_SELECTOR)
        .into_iter()
        .filter(|el| !is_skipped(el))
        .filter(|el| match el.value().name() {
            "div" | "td" => is_leaf_block(el),
            _ => true,
        })
        .map(extract_text)
        .filter(|text| !text.trim().is_empty())
        .collect();

    if sections.join(" ").trim().chars().count() < MIN_ANSWER_CHARS {
        let whole = extract_text_skipping(area, &skip);
        sections = if whole.trim().is_empty() {
            Vec::new()
        } else {
            vec![whole]
        };
    }

    let mut seen = HashSet::new();
    let unique: Vec<String> = sections
        .into_iter()
        .filter(|section| {
            let key = normalize_spaces(&section.to_lowercase());
            key.chars().count() > MIN_SECTION_CHARS && seen.insert(key)
        })
        .map(|section| section.trim().to_string())
        .collect();

    beautify_text(&unique.join("\n\n"))
}

/// Question and answer of a question page, `None` when nothing usable was found.
pub fn extract_qna_content(doc: &Html) -> Option<QnaContent> {
    let area = ContentLocator::qna_page().locate(doc);
    let question = extract_question(area);

    if !question.is_empty() {
        let answer = extract_answer(area, &question);
        if answer.is_empty() {
            return None;
        }
        return Some(QnaContent { question, answer });
    }

    let all = extract_answer(area, "");
    if all.is_empty() {
        return None;
    }
    match all.split_once("\n\n") {
        Some((first, rest)) => Some(QnaContent {
            question: first.trim().to_string(),
            answer: rest.trim().to_string(),
        }),
        None => Some(QnaContent {
            question: UNIDENTIFIED_QUESTION.to_string(),
            answer: all,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base() -> Url {
        Url::parse("https://bibel.se").unwrap()
    }

    #[test]
    fn links_skip_index_and_short_text() {
        let doc = Html::parse_document(
            r#"<body>
            <a href="QandA.php?sel=0&qtype=other">Alla frågor och svar</a>
            <a href="QandA.php?sel=12&qtype=bibeln">Varför finns det olika översättningar?</a>
            <a href="/QandA.php?sel=13">Kort</a>
            <a href="/QandA.php?sel=14">Vem skrev Hebreerbrevet egentligen?</a>
            <a href="/om.php?sel=15">Om oss och vår verksamhet</a>
            </body>"#,
        );
        let links = extract_question_links(&doc, &base());
        assert_eq!(links.len(), 2);

        assert_eq!(links[0].id, "12");
        assert_eq!(links[0].kind, "bibeln");
        assert_eq!(
            links[0].full_url,
            "https://bibel.se/QandA.php?sel=12&qtype=bibeln"
        );
        assert_eq!(links[1].id, "14");
        assert_eq!(links[1].kind, "other");
        assert_eq!(links[1].question, "Vem skrev Hebreerbrevet egentligen?");
    }

    #[test]
    fn question_from_heading_and_answer_without_it() {
        let answer_para = "Bibeln har översatts många gånger eftersom språket förändras över tid.";
        let html = format!(
            "<body><div class='content'>\
             <h2>Varför finns det så många bibelöversättningar?</h2>\
             <p>{a}</p><p>{a}</p>\
             <p>Olika översättningar har också olika syften och målgrupper.</p>\
             <p>Kort.</p></div></body>",
            a = answer_para
        );
        let doc = Html::parse_document(&html);
        let content = extract_qna_content(&doc).expect("content");

        assert_eq!(
            content.question,
            "Varför finns det så många bibelöversättningar?"
        );
        assert!(!content.answer.contains("Varför finns det"));
        assert!(!content.answer.contains("Kort."));
        assert_eq!(content.answer.matches(answer_para).count(), 1);
        assert!(content
            .answer
            .ends_with("Olika översättningar har också olika syften och målgrupper."));
    }

    #[test]
    fn question_from_italics_when_no_heading() {
        let doc = Html::parse_document(
            "<body><div class='main'><p><i>Hur ska man läsa Uppenbarelseboken?</i></p>\
             <p>Uppenbarelseboken är skriven i en apokalyptisk stil med många bilder.</p>\
             <p>Den bör läsas i ljuset av resten av Bibeln och dess historia.</p></div></body>",
        );
        let area = ContentLocator::qna_page().locate(&doc);
        assert_eq!(extract_question(area), "Hur ska man läsa Uppenbarelseboken?");
    }

    #[test]
    fn single_block_without_question() {
        let doc = Html::parse_document(
            "<body><p>Ett enda stycke utan någon tydlig fråga men med tillräckligt mycket text.</p></body>",
        );
        let content = extract_qna_content(&doc).expect("content");
        assert_eq!(content.question, UNIDENTIFIED_QUESTION);
        assert!(content.answer.starts_with("Ett enda stycke"));
    }

    #[test]
    fn blank_page_has_no_content() {
        let doc = Html::parse_document("<body><p>  </p></body>");
        assert_eq!(extract_qna_content(&doc), None);
    }
}
