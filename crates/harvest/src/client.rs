// ABOUTME: The main Client struct that owns the HTTP session and harvest options.
// ABOUTME: Provides page fetching plus the URL templates for chapter pages and the Q&A index.

use crate::error::HarvestError;
use crate::options::{ClientBuilder, Options};
use crate::resource::fetch_page;

/// Path and query of the Q&A index page on the Q&A site.
const QNA_INDEX_PATH: &str = "/QandA.php?sel=0&qtype=other&origin=homepage";

/// HTTP session shared by the Bible downloader and the Q&A scraper.
#[derive(Debug, Clone)]
pub struct Client {
    opts: Options,
    http_client: reqwest::Client,
}

impl Client {
    /// Create a new ClientBuilder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new Client with the given options.
    pub fn new(opts: Options) -> Self {
        let http_client = opts.http_client.clone().unwrap_or_else(|| {
            reqwest::Client::builder()
                .user_agent(&opts.user_agent)
                .timeout(opts.timeout)
                .cookie_store(true)
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .expect("failed to build HTTP client")
        });

        Self { opts, http_client }
    }

    /// The options this client was built with.
    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Fetch a page and decode it to a string.
    pub async fn fetch_html(&self, url: &str) -> Result<String, HarvestError> {
        let page = fetch_page(&self.http_client, url, &self.opts.headers).await?;
        Ok(page.text())
    }

    /// URL of one chapter on the chapter service.
    ///
    /// Shape: `{base}/bible/{version_id}/{BOOK}.{chapter}.{version_code}`.
    pub fn chapter_url(&self, book_code: &str, chapter: u32) -> String {
        let version = &self.opts.version;
        format!(
            "{}/bible/{}/{}.{}.{}",
            self.opts.bible_base_url.trim_end_matches('/'),
            version.id,
            book_code,
            chapter,
            version.code
        )
    }

    /// URL of the Q&A index page listing every question.
    pub fn qna_index_url(&self) -> String {
        format!(
            "{}{}",
            self.opts.qna_base_url.trim_end_matches('/'),
            QNA_INDEX_PATH
        )
    }
}
