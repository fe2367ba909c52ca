// ABOUTME: Page fetching for the chapter service and the Q&A site.
// ABOUTME: One GET per call with size limits, status checks and charset-aware decoding to text.

use std::collections::HashMap;

use bytes::Bytes;
use tracing::debug;

use crate::error::HarvestError;

/// Pages larger than this are refused (10 MB).
pub const MAX_PAGE_BYTES: usize = 10 * 1024 * 1024;

/// A fetched page before decoding.
#[derive(Debug, Clone)]
pub struct Page {
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl Page {
    /// Body as text. The charset comes from the content-type header when it
    /// names one, otherwise it is sniffed from the bytes.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    let declared = content_type
        .and_then(charset_of)
        .and_then(|label| encoding_rs::Encoding::for_label(label.as_bytes()));

    let encoding = declared.unwrap_or_else(|| {
        // Older Swedish pages are frequently Latin-1 without saying so.
        let mut detector = chardetng::EncodingDetector::new();
        detector.feed(body, true);
        detector.guess(None, true)
    });
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

fn charset_of(content_type: &str) -> Option<String> {
    content_type
        .to_lowercase()
        .split(';')
        .find_map(|part| part.trim().strip_prefix("charset=").map(str::to_string))
        .map(|charset| charset.trim_matches(|c| c == '"' || c == '\'').to_string())
}

fn transport_error(url: &str, e: reqwest::Error) -> HarvestError {
    if e.is_timeout() {
        HarvestError::timeout(url, "Fetch", Some(e.into()))
    } else {
        HarvestError::fetch(url, "Fetch", Some(e.into()))
    }
}

fn too_large(url: &str) -> HarvestError {
    HarvestError::fetch(url, "Fetch", Some(anyhow::anyhow!("page larger than {} bytes", MAX_PAGE_BYTES)))
}

/// GET one page. Anything but a 2xx answer is a fetch error.
pub async fn fetch_page(
    client: &reqwest::Client,
    url: &str,
    headers: &HashMap<String, String>,
) -> Result<Page, HarvestError> {
    let parsed = url::Url::parse(url)
        .map_err(|e| HarvestError::invalid_url(url, "Fetch", Some(e.into())))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(HarvestError::invalid_url(
            url,
            "Fetch",
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }

    let mut request = client.get(parsed);
    for (key, value) in headers {
        request = request.header(key, value);
    }
    let response = request.send().await.map_err(|e| transport_error(url, e))?;

    let status = response.status();
    debug!(url, status = status.as_u16(), "page response");
    if !status.is_success() {
        return Err(HarvestError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("HTTP status {}", status.as_u16())),
        ));
    }
    if response
        .content_length()
        .is_some_and(|len| len as usize > MAX_PAGE_BYTES)
    {
        return Err(too_large(url));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_lowercase);
    let body = response.bytes().await.map_err(|e| transport_error(url, e))?;
    if body.len() > MAX_PAGE_BYTES {
        return Err(too_large(url));
    }

    Ok(Page {
        content_type,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn http() -> reqwest::Client {
        reqwest::Client::builder()
            .user_agent("test-agent")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn fetches_page_with_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/bible/3413/JHN.3.SRB16")
                .header("accept-language", "sv-SE");
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body("<p>Ty så älskade Gud världen</p>");
        });

        let mut headers = HashMap::new();
        headers.insert("Accept-Language".to_string(), "sv-SE".to_string());
        let page = fetch_page(&http(), &server.url("/bible/3413/JHN.3.SRB16"), &headers)
            .await
            .unwrap();

        mock.assert();
        assert_eq!(page.text(), "<p>Ty så älskade Gud världen</p>");
        assert_eq!(page.content_type.as_deref(), Some("text/html; charset=utf-8"));
    }

    #[tokio::test]
    async fn error_status_is_a_fetch_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404).body("not found");
        });

        let err = fetch_page(&http(), &server.url("/missing"), &HashMap::new())
            .await
            .unwrap_err();
        assert!(err.is_fetch());
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn rejects_non_http_urls() {
        let err = fetch_page(&http(), "ftp://bibel.se/fil", &HashMap::new())
            .await
            .unwrap_err();
        assert!(err.is_invalid_url());

        let err = fetch_page(&http(), "", &HashMap::new()).await.unwrap_err();
        assert!(err.is_invalid_url());
    }

    #[test]
    fn decodes_declared_latin1() {
        // "Första" in ISO-8859-1
        let bytes: &[u8] = &[0x46, 0xf6, 0x72, 0x73, 0x74, 0x61];
        assert_eq!(decode_body(bytes, Some("text/html; charset=ISO-8859-1")), "Första");
    }

    #[test]
    fn charset_parsing() {
        assert_eq!(charset_of("text/html; charset=utf-8").as_deref(), Some("utf-8"));
        assert_eq!(charset_of("text/html; charset=\"utf-8\"").as_deref(), Some("utf-8"));
        assert_eq!(charset_of("text/html"), None);
    }
}
