// ABOUTME: Integration tests for the Q&A scraper against a mock Q&A site.
// ABOUTME: Covers index parsing, per-question failures, the question limit and the exported files.

use std::fs;
use std::time::Duration;

use bibel_harvest::qna::{save_outputs, UNEXTRACTED_ANSWER};
use bibel_harvest::{Client, QnaEntry, QnaScraper};
use httpmock::prelude::*;
use tempfile::TempDir;

const INDEX: &str = r#"<html><body>
<h1>Frågor och svar</h1>
<ul>
  <li><a href="QandA.php?sel=12&qtype=tro">Vad säger Bibeln om förlåtelse?</a></li>
  <li><a href="QandA.php?sel=13&qtype=historia">Vem skrev Hebreerbrevet?</a></li>
  <li><a href="QandA.php?sel=14">Varför finns det lidande?</a></li>
  <li><a href="QandA.php?sel=0">Alla frågor och svar</a></li>
  <li><a href="QandA.php?sel=15">Kort</a></li>
  <li><a href="/om.php">Om oss och vår verksamhet</a></li>
</ul>
</body></html>"#;

const FORGIVENESS: &str = r#"<html><body>
<div class="menu">Start | Frågor | Kontakt</div>
<table><tr><td>
  <h2>Vad säger Bibeln om förlåtelse och nåd?</h2>
  <p>Bibeln beskriver förlåtelsen som en gåva från Gud som ges av nåd och inte förtjänas genom goda gärningar. Den som bekänner sina synder blir förlåten.</p>
  <p>Jesus lär också sina lärjungar att förlåta varandra, inte bara sju gånger utan sjuttio gånger sju, eftersom de själva har blivit förlåtna så mycket.</p>
</td></tr></table>
</body></html>"#;

fn mock_index(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(GET).path("/QandA.php").query_param("sel", "0");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(INDEX);
    })
}

fn mock_question<'a>(server: &'a MockServer, sel: &str, status: u16, body: &str) -> httpmock::Mock<'a> {
    server.mock(|when, then| {
        when.method(GET).path("/QandA.php").query_param("sel", sel);
        then.status(status)
            .header("content-type", "text/html; charset=utf-8")
            .body(body);
    })
}

fn fast_client(server: &MockServer) -> Client {
    Client::builder()
        .qna_base_url(server.base_url())
        .qna_delay(Duration::ZERO)
        .build()
}

#[tokio::test]
async fn index_keeps_only_real_question_links() {
    let server = MockServer::start();
    let index = mock_index(&server);
    let client = fast_client(&server);

    let links = QnaScraper::new(&client).fetch_index().await.unwrap();

    index.assert_hits(1);
    let ids: Vec<&str> = links.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["12", "13", "14"]);
    assert_eq!(links[0].kind, "tro");
    assert_eq!(links[2].kind, "other");
    assert_eq!(
        links[0].full_url,
        format!("{}/QandA.php?sel=12&qtype=tro", server.base_url())
    );
}

#[tokio::test]
async fn scrape_records_failures_without_stopping() {
    let server = MockServer::start();
    mock_index(&server);
    let ok = mock_question(&server, "12", 200, FORGIVENESS);
    let broken = mock_question(&server, "13", 500, "internal error");
    let empty = mock_question(&server, "14", 200, "<html><body></body></html>");
    let client = fast_client(&server);

    let entries = QnaScraper::new(&client).scrape_all(None).await.unwrap();

    ok.assert_hits(1);
    broken.assert_hits(1);
    empty.assert_hits(1);
    assert_eq!(entries.len(), 3);

    let first = &entries[0];
    assert!(first.is_extracted());
    assert_eq!(first.question_content, "Vad säger Bibeln om förlåtelse och nåd?");
    assert!(first.answer_content.starts_with("Bibeln beskriver förlåtelsen"));
    assert!(first.answer_content.contains("\n\nJesus lär också"));
    assert!(!first.answer_content.contains("Start | Frågor"));

    let second = &entries[1];
    assert_eq!(second.question_content, "Vem skrev Hebreerbrevet?");
    assert!(second.answer_content.starts_with("Fel vid hämtning: "));
    assert!(second.error.is_some());

    let third = &entries[2];
    assert_eq!(third.question_content, "Varför finns det lidande?");
    assert_eq!(third.answer_content, UNEXTRACTED_ANSWER);
    assert!(third.error.is_none());
}

#[tokio::test]
async fn question_limit_stops_early() {
    let server = MockServer::start();
    mock_index(&server);
    let first = mock_question(&server, "12", 200, FORGIVENESS);
    let second = mock_question(&server, "13", 200, FORGIVENESS);
    let client = fast_client(&server);

    let entries = QnaScraper::new(&client).scrape_all(Some(1)).await.unwrap();

    assert_eq!(entries.len(), 1);
    first.assert_hits(1);
    second.assert_hits(0);
}

#[tokio::test]
async fn unreachable_index_fails_the_run() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/QandA.php");
        then.status(503);
    });
    let client = fast_client(&server);

    let err = QnaScraper::new(&client).scrape_all(None).await.unwrap_err();
    assert!(err.is_fetch());
}

#[tokio::test]
async fn exports_json_and_markdown() {
    let server = MockServer::start();
    mock_index(&server);
    mock_question(&server, "12", 200, FORGIVENESS);
    let client = fast_client(&server);
    let entries = QnaScraper::new(&client).scrape_all(Some(1)).await.unwrap();

    let dir = TempDir::new().unwrap();
    let outputs = save_outputs(&entries, dir.path()).unwrap();

    let saved: Vec<QnaEntry> = serde_json::from_str(&fs::read_to_string(&outputs.json).unwrap()).unwrap();
    assert_eq!(saved, entries);
    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&outputs.json).unwrap()).unwrap();
    assert_eq!(raw[0]["type"], "tro");
    assert_eq!(raw[0]["id"], "12");

    let markdown = fs::read_to_string(&outputs.markdown).unwrap();
    assert!(markdown.contains("## Fråga 1 (ID: 12)\n\n**Kategori:** tro"));
    assert!(markdown.contains("### Fråga:\nVad säger Bibeln om förlåtelse och nåd?"));
}
