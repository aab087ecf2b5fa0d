//! Scraper tests against a real Chrome/Chromium.
//!
//! Ignored by default; run with `cargo test -- --ignored` on a machine with a
//! browser in PATH (set `CHROME` to point at a specific binary).

use std::sync::Arc;
use std::time::Duration;

use feedscout::app::ScoutError;
use feedscout::scraper::{BrowserSession, ChromeScraper, Extraction, FieldSource, Scraper, ScraperConfig};
use pretty_assertions::assert_eq;
use serde::Deserialize;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING: &str = r#"<!DOCTYPE html><html><head>
<meta property="og:image" content="/cover.jpg">
</head><body>
  <table>
    <tr class="athing" id="101"><td class="titleline"><a href="/a">Alpha</a></td></tr>
    <tr class="athing" id="102"><td class="titleline"><a href="/b">Beta</a></td></tr>
    <tr class="athing" id="103"><td class="titleline"><a href="/c">Gamma</a></td></tr>
  </table>
</body></html>"#;

fn session() -> Arc<BrowserSession> {
    let config = ScraperConfig {
        executable: std::env::var_os("CHROME").map(Into::into),
        sandbox: false,
        navigation_timeout_secs: 15,
        selector_timeout_secs: 2,
        ..Default::default()
    };
    Arc::new(BrowserSession::new(config))
}

async fn listing_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(LISTING)
                .insert_header("Content-Type", "text/html"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/archived"))
        .respond_with(
            ResponseTemplate::new(410)
                .set_body_string(LISTING)
                .insert_header("Content-Type", "text/html"),
        )
        .mount(&server)
        .await;
    server
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn scrape_ids_in_document_order() {
    let server = listing_server().await;
    let session = session();
    let scraper = ChromeScraper::new(session.clone());

    let ids: Vec<String> = scraper
        .scrape(
            &server.uri(),
            ".athing",
            &Extraction::script("els => els.map(el => el.id)"),
        )
        .await
        .unwrap();

    assert_eq!(ids, vec!["101", "102", "103"]);
    assert_eq!(session.open_pages(), 0);
    assert!(session.is_active().await);
    session.cleanup().await;
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn scrape_with_field_descriptor() {
    #[derive(Deserialize)]
    struct Row {
        id: String,
        title: String,
    }

    let server = listing_server().await;
    let session = session();
    let scraper = ChromeScraper::new(session.clone());

    let rows: Vec<Row> = scraper
        .scrape(
            &server.uri(),
            ".athing",
            &Extraction::fields([
                ("id", FieldSource::Attribute("id".into())),
                (
                    "title",
                    FieldSource::Nested {
                        selector: ".titleline > a".into(),
                        attribute: None,
                    },
                ),
            ]),
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1].id, "102");
    assert_eq!(rows[1].title, "Beta");
    session.cleanup().await;
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn pages_closed_after_mixed_outcomes() {
    let server = listing_server().await;
    let session = session();
    let scraper = ChromeScraper::new(session.clone());
    let url = server.uri();

    let ok = scraper.scrape_articles(&url, ".athing", &Extraction::text()).await;
    let missing = scraper.scrape_articles(&url, ".nope", &Extraction::text()).await;
    let thrown = scraper
        .scrape_articles(&url, ".athing", &Extraction::script("els => { throw new Error('x') }"))
        .await;
    let unreachable = scraper
        .scrape_articles("http://127.0.0.1:9/", ".athing", &Extraction::text())
        .await;
    let not_found = scraper
        .scrape_articles(&format!("{}/missing", url), ".athing", &Extraction::text())
        .await;

    assert!(ok.is_ok());
    assert!(matches!(missing, Err(ScoutError::SelectorTimeout { .. })));
    assert!(matches!(thrown, Err(ScoutError::Extraction(_))));
    assert!(matches!(unreachable, Err(ScoutError::Navigation { .. })));
    match not_found {
        Err(ScoutError::Navigation { reason, .. }) => assert!(reason.contains("404")),
        other => panic!("expected a navigation error, got {:?}", other),
    }

    assert_eq!(session.open_pages(), 0);
    assert!(session.is_active().await);
    assert_eq!(session.launch_count(), 1);
    session.cleanup().await;
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn error_status_with_matching_content_is_scraped() {
    let server = listing_server().await;
    let session = session();
    let scraper = ChromeScraper::new(session.clone());

    let ids: Vec<String> = scraper
        .scrape(
            &format!("{}/archived", server.uri()),
            ".athing",
            &Extraction::attribute("id"),
        )
        .await
        .unwrap();

    assert_eq!(ids, vec!["101", "102", "103"]);
    session.cleanup().await;
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn cancelled_scrape_releases_its_page() {
    let server = listing_server().await;
    let session = session();
    let scraper = ChromeScraper::new(session.clone());

    let cancelled = tokio::time::timeout(
        Duration::from_millis(500),
        scraper.scrape_articles(&server.uri(), ".never", &Extraction::text()),
    )
    .await;

    assert!(cancelled.is_err());
    assert_eq!(session.open_pages(), 0);

    // The session is still usable afterwards
    let ids: Vec<String> = scraper
        .scrape(&server.uri(), ".athing", &Extraction::attribute("id"))
        .await
        .unwrap();
    assert_eq!(ids.len(), 3);
    assert_eq!(session.launch_count(), 1);
    session.cleanup().await;
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn concurrent_first_use_launches_once() {
    let server = listing_server().await;
    let session = session();
    let scraper = Arc::new(ChromeScraper::new(session.clone()));

    let mut handles = Vec::new();
    for _ in 0..4 {
        let scraper = scraper.clone();
        let url = server.uri();
        handles.push(tokio::spawn(async move {
            scraper
                .scrape_articles(&url, ".athing", &Extraction::attribute("id"))
                .await
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    assert_eq!(session.launch_count(), 1);
    assert_eq!(session.open_pages(), 0);
    session.cleanup().await;
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn cleanup_then_scrape_relaunches() {
    let server = listing_server().await;
    let session = session();
    let scraper = ChromeScraper::new(session.clone());

    scraper
        .scrape_articles(&server.uri(), ".athing", &Extraction::text())
        .await
        .unwrap();
    session.cleanup().await;
    session.cleanup().await;
    assert!(!session.is_active().await);

    scraper
        .scrape_articles(&server.uri(), ".athing", &Extraction::text())
        .await
        .unwrap();
    assert_eq!(session.launch_count(), 2);
    session.cleanup().await;
}

#[tokio::test]
#[ignore = "requires Chrome and network access"]
async fn hacker_news_front_page_ids() {
    let session = session();
    let scraper = ChromeScraper::new(session.clone());

    let ids: Vec<String> = scraper
        .scrape(
            "https://news.ycombinator.com",
            ".athing",
            &Extraction::script("els => els.map(el => el.id)"),
        )
        .await
        .unwrap();

    assert!(!ids.is_empty());
    assert!(ids.iter().all(|id| !id.is_empty()));
    session.cleanup().await;
}
