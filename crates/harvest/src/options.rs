// ABOUTME: Configuration options for the harvester including BibleVersion, Options, and ClientBuilder.
// ABOUTME: ClientBuilder provides a fluent API for constructing Client instances with custom settings.

use std::collections::HashMap;
use std::time::Duration;

use crate::client::Client;

/// Identity of the translation being downloaded.
///
/// The numeric id and the code are both part of the chapter URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibleVersion {
    pub id: u32,
    pub code: String,
    pub name: String,
    pub language: String,
    pub language_name: String,
}

impl Default for BibleVersion {
    fn default() -> Self {
        Self {
            id: 3413,
            code: "SRB16".to_string(),
            name: "Svenska Reformationsbibeln".to_string(),
            language: "sv".to_string(),
            language_name: "Svenska".to_string(),
        }
    }
}

/// Configuration options for the harvest client.
#[derive(Debug, Clone)]
pub struct Options {
    pub timeout: Duration,
    pub user_agent: String,
    pub http_client: Option<reqwest::Client>,
    pub headers: HashMap<String, String>,
    /// Pause after every chapter request, whatever the outcome.
    pub request_delay: Duration,
    /// Total attempts per chapter, the first one included.
    pub retry_attempts: u32,
    pub retry_pause: Duration,
    /// Share of the expected verse count a chapter needs before it is accepted
    /// without a retry.
    pub confidence_threshold: f64,
    pub debug: bool,
    pub resume: bool,
    pub version: BibleVersion,
    pub bible_base_url: String,
    pub qna_base_url: String,
    pub qna_delay: Duration,
}

impl Default for Options {
    fn default() -> Self {
        let mut headers = HashMap::new();
        headers.insert(
            "Accept".to_string(),
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
        );
        headers.insert(
            "Accept-Language".to_string(),
            "sv-SE,sv;q=0.9,en;q=0.8".to_string(),
        );

        Self {
            timeout: Duration::from_secs(30),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            http_client: None,
            headers,
            request_delay: Duration::from_millis(800),
            retry_attempts: 3,
            retry_pause: Duration::from_secs(2),
            confidence_threshold: 0.8,
            debug: false,
            resume: false,
            version: BibleVersion::default(),
            bible_base_url: "https://www.bible.com".to_string(),
            qna_base_url: "https://bibel.se".to_string(),
            qna_delay: Duration::from_secs(2),
        }
    }
}

/// Builder for constructing Client instances with custom configuration.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    opts: Options,
}

impl ClientBuilder {
    /// Create a new ClientBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Use a custom HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Add a custom header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Set the fixed delay between chapter requests.
    pub fn request_delay(mut self, delay: Duration) -> Self {
        self.opts.request_delay = delay;
        self
    }

    /// Set the number of attempts per chapter (at least one).
    pub fn retry_attempts(mut self, attempts: u32) -> Self {
        self.opts.retry_attempts = attempts.max(1);
        self
    }

    /// Set the pause between attempts on the same chapter.
    pub fn retry_pause(mut self, pause: Duration) -> Self {
        self.opts.retry_pause = pause;
        self
    }

    /// Set the accepted share of the expected verse count (clamped to 0..=1).
    pub fn confidence_threshold(mut self, threshold: f64) -> Self {
        self.opts.confidence_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Enable verbose parser diagnostics.
    pub fn debug(mut self, debug: bool) -> Self {
        self.opts.debug = debug;
        self
    }

    /// Continue from an existing temp file instead of starting over.
    pub fn resume(mut self, resume: bool) -> Self {
        self.opts.resume = resume;
        self
    }

    /// Set the translation to download.
    pub fn version(mut self, version: BibleVersion) -> Self {
        self.opts.version = version;
        self
    }

    /// Set the base URL of the chapter service.
    pub fn bible_base_url(mut self, url: impl Into<String>) -> Self {
        self.opts.bible_base_url = url.into();
        self
    }

    /// Set the base URL of the Q&A site.
    pub fn qna_base_url(mut self, url: impl Into<String>) -> Self {
        self.opts.qna_base_url = url.into();
        self
    }

    /// Set the delay between Q&A page requests.
    pub fn qna_delay(mut self, delay: Duration) -> Self {
        self.opts.qna_delay = delay;
        self
    }

    /// Build the Client with the configured options.
    pub fn build(self) -> Client {
        Client::new(self.opts)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
