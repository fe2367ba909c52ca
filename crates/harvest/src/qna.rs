// ABOUTME: Q&A site scraper: reads the index, fetches each question page and exports JSON and Markdown.
// ABOUTME: Per-question failures are recorded in the entry; only an unreachable index fails the run.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use crate::client::Client;
use crate::error::{HarvestError, Result};
use crate::extractors::{extract_qna_content, extract_question_links, QnaContent, QuestionLink};
use crate::store::{save_json, save_text};

/// Answer stored when a page was fetched but nothing usable was found.
pub const UNEXTRACTED_ANSWER: &str = "Innehållet kunde inte extraheras korrekt.";

pub const QNA_JSON_FILE: &str = "bibel_qa_formatted.json";
pub const QNA_MARKDOWN_FILE: &str = "bibel_qa.md";

/// One scraped question with its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QnaEntry {
    #[serde(flatten)]
    pub link: QuestionLink,
    pub question_content: String,
    pub answer_content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QnaEntry {
    fn failed(link: QuestionLink, error: &HarvestError) -> Self {
        let message = error.to_string();
        Self {
            question_content: link.question.clone(),
            answer_content: format!("Fel vid hämtning: {}", message),
            error: Some(message),
            link,
        }
    }

    fn unextracted(link: QuestionLink) -> Self {
        Self {
            question_content: link.question.clone(),
            answer_content: UNEXTRACTED_ANSWER.to_string(),
            error: None,
            link,
        }
    }

    /// True when the page yielded a real question and answer.
    pub fn is_extracted(&self) -> bool {
        self.error.is_none()
            && !self.question_content.is_empty()
            && !self.answer_content.is_empty()
            && self.answer_content != UNEXTRACTED_ANSWER
    }
}

/// Paths written by [`save_outputs`].
#[derive(Debug, Clone)]
pub struct QnaOutputs {
    pub json: PathBuf,
    pub markdown: PathBuf,
}

fn parse_index(html: &str, base: &Url) -> Vec<QuestionLink> {
    let doc = Html::parse_document(html);
    extract_question_links(&doc, base)
}

fn parse_question_page(html: &str) -> Option<QnaContent> {
    let doc = Html::parse_document(html);
    extract_qna_content(&doc)
}

/// Sequential scraper over the Q&A site.
#[derive(Debug)]
pub struct QnaScraper<'a> {
    client: &'a Client,
}

impl<'a> QnaScraper<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Question links listed on the index page.
    pub async fn fetch_index(&self) -> Result<Vec<QuestionLink>> {
        let opts = self.client.options();
        let base = Url::parse(&opts.qna_base_url).map_err(|e| {
            HarvestError::invalid_url(&opts.qna_base_url, "QnaIndex", Some(e.into()))
        })?;
        let index_url = self.client.qna_index_url();
        info!(url = %index_url, "fetching Q&A index");

        let html = self.client.fetch_html(&index_url).await?;
        let links = parse_index(&html, &base);
        info!(count = links.len(), "question links found");
        Ok(links)
    }

    /// Fetch and extract one question page. Never fails; problems are
    /// recorded in the returned entry.
    pub async fn fetch_entry(&self, link: QuestionLink) -> QnaEntry {
        match self.client.fetch_html(&link.full_url).await {
            Ok(html) => match parse_question_page(&html) {
                Some(content) => QnaEntry {
                    link,
                    question_content: content.question,
                    answer_content: content.answer,
                    error: None,
                },
                None => {
                    warn!(id = %link.id, "could not extract question content");
                    QnaEntry::unextracted(link)
                }
            },
            Err(e) => {
                warn!(id = %link.id, error = %e, "question fetch failed");
                QnaEntry::failed(link, &e)
            }
        }
    }

    /// Scrape every question, or the first `max_questions` of them.
    pub async fn scrape_all(&self, max_questions: Option<usize>) -> Result<Vec<QnaEntry>> {
        let mut links = self.fetch_index().await?;
        if let Some(max) = max_questions {
            links.truncate(max);
        }

        let total = links.len();
        let mut entries = Vec::with_capacity(total);
        for (index, link) in links.into_iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.client.options().qna_delay).await;
            }
            info!(position = index + 1, total, id = %link.id, "processing question");
            let entry = self.fetch_entry(link).await;
            if entry.is_extracted() {
                info!(id = %entry.link.id, "content extracted");
            }
            entries.push(entry);
        }
        Ok(entries)
    }
}

/// Markdown export of scraped entries; entries without content are left out.
pub fn render_markdown(entries: &[QnaEntry]) -> String {
    let mut out = String::new();
    out.push_str("# Bibel.se Frågor och Svar\n\n");
    out.push_str("*Extraherat innehåll från bibel.se*\n\n");
    out.push_str("---\n\n");

    for (i, entry) in entries.iter().enumerate() {
        if entry.question_content.is_empty() || entry.answer_content.is_empty() {
            continue;
        }
        let _ = write!(
            out,
            "## Fråga {} (ID: {})\n\n**Kategori:** {}\n\n### Fråga:\n{}\n\n### Svar:\n{}\n\n---\n\n",
            i + 1,
            entry.link.id,
            entry.link.kind,
            entry.question_content,
            entry.answer_content
        );
    }
    out
}

/// Console preview of one entry.
pub fn render_preview(entry: &QnaEntry) -> String {
    let rule = "=".repeat(80);
    let thin = "-".repeat(40);
    format!(
        "{rule}\nPREVIEW - Question ID: {id}\n{rule}\n\nKATEGORI: {kind}\nURL: {url}\n\nFRÅGA:\n{thin}\n{question}\n\nSVAR:\n{thin}\n{answer}\n\n{rule}",
        id = entry.link.id,
        kind = entry.link.kind,
        url = entry.link.full_url,
        question = entry.question_content,
        answer = entry.answer_content,
    )
}

/// Write the JSON and Markdown exports into `dir`.
pub fn save_outputs(entries: &[QnaEntry], dir: &Path) -> Result<QnaOutputs> {
    let json = dir.join(QNA_JSON_FILE);
    let markdown = dir.join(QNA_MARKDOWN_FILE);
    save_json(&json, entries)?;
    save_text(&markdown, &render_markdown(entries))?;
    Ok(QnaOutputs { json, markdown })
}
