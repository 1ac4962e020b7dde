//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small statute site and run the
//! full index → category → law → full act traversal against it.

use statute_harvester::config::{Config, FetchErrorPolicy, SupplementEntry};
use statute_harvester::crawler::{crawl, harvest, Fetcher};
use statute_harvester::output::read_corpus;
use statute_harvester::{CrawlPhase, FetchError, HarvestError};
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a configuration pointing the crawler at the mock server
fn create_test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.crawler.statutes_url = format!("{}/legislation/ilcs/ilcs.asp", server.uri());
    config.crawler.base_url = format!("{}/legislation/ilcs/", server.uri());
    config
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, page_path: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Statutes index: category links inside a centered table
fn index_page(categories: &[(&str, &str)]) -> String {
    let cells: String = categories
        .iter()
        .map(|(text, href)| format!(r#"<td><a href="{}">{}</a></td>"#, href, text))
        .collect();
    format!(
        r#"<html><body><a href="/legislation/ilcs/help.html">Help</a><center><table><tr>{}</tr></table></center></body></html>"#,
        cells
    )
}

/// Category page: law links inside a list inside a table
fn category_page(laws: &[(&str, &str)]) -> String {
    let items: String = laws
        .iter()
        .map(|(text, href)| format!(r#"<li><a href="{}">{}</a></li>"#, href, text))
        .collect();
    format!(
        "<html><body><table><tr><td><ul>{}</ul></td></tr></table></body></html>",
        items
    )
}

/// Law page with inline sections (tables inside paragraphs, quirks mode)
fn law_page(sections: &[&str]) -> String {
    let body: String = sections
        .iter()
        .map(|section| format!("<p><table><tr><td>{}</td></tr></table></p>", section))
        .collect();
    format!("<html><body><h1>Act</h1>{}</body></html>", body)
}

/// Law page without inline content, optionally linking to the full act
fn summary_page(full_act_href: Option<&str>) -> String {
    let link = full_act_href
        .map(|href| format!(r#"<a href="{}">View Entire Act</a>"#, href))
        .unwrap_or_default();
    format!(
        "<html><body><p>This Act is organized into articles.</p>{}</body></html>",
        link
    )
}

/// Two categories, three laws: one inline, one via full act, one empty
async fn mount_statute_site(server: &MockServer) {
    mount_page(
        server,
        "/legislation/ilcs/ilcs.asp",
        index_page(&[
            ("GOVERNMENT", "/legislation/ilcs/ch1.html"),
            ("CIVIL LIABILITIES", "/legislation/ilcs/ch2.html"),
        ]),
    )
    .await;

    mount_page(
        server,
        "/legislation/ilcs/ch1.html",
        category_page(&[
            ("5 ILCS 100/ Act A", "/legislation/ilcs/law_a.html"),
            ("5 ILCS 120/ Act B", "/legislation/ilcs/law_b.html"),
        ]),
    )
    .await;

    mount_page(
        server,
        "/legislation/ilcs/ch2.html",
        category_page(&[("740 ILCS 10/ Act C", "/legislation/ilcs/law_c.html")]),
    )
    .await;

    mount_page(
        server,
        "/legislation/ilcs/law_a.html",
        law_page(&["Sec. 1. Short title.", "Sec. 2. Definitions."]),
    )
    .await;

    mount_page(
        server,
        "/legislation/ilcs/law_b.html",
        summary_page(Some("/legislation/ilcs/full_b.html")),
    )
    .await;

    mount_page(
        server,
        "/legislation/ilcs/full_b.html",
        law_page(&["Article 1. Full text of Act B."]),
    )
    .await;

    mount_page(server, "/legislation/ilcs/law_c.html", summary_page(None)).await;
}

#[tokio::test]
async fn test_full_crawl_collects_every_law_in_order() {
    let mock_server = MockServer::start().await;
    mount_statute_site(&mock_server).await;

    let state = crawl(&create_test_config(&mock_server))
        .await
        .expect("crawl should succeed");

    let entries: Vec<_> = state.corpus.iter().collect();
    assert_eq!(
        entries,
        vec![
            (
                "5 ILCS 100/ Act A",
                "Sec. 1. Short title.\nSec. 2. Definitions."
            ),
            ("5 ILCS 120/ Act B", "Article 1. Full text of Act B."),
            ("740 ILCS 10/ Act C", ""),
        ]
    );

    assert_eq!(state.categories_visited, 2);
    assert_eq!(state.laws_visited, 3);
    assert_eq!(state.fallbacks_followed, 1);
    assert!(state.skipped.is_empty());
    assert!(state.phase().is_done());
}

#[tokio::test]
async fn test_law_without_content_or_fallback_is_recorded_as_failure() {
    let mock_server = MockServer::start().await;
    mount_statute_site(&mock_server).await;

    let state = crawl(&create_test_config(&mock_server)).await.unwrap();

    assert_eq!(
        state.failure_lines(),
        vec!["CIVIL LIABILITIES: 740 ILCS 10/ Act C"]
    );
    assert_eq!(state.corpus.get("740 ILCS 10/ Act C"), Some(""));
}

#[tokio::test]
async fn test_fallback_content_comes_from_full_act_page() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/legislation/ilcs/ilcs.asp",
        index_page(&[("GOVERNMENT", "/legislation/ilcs/ch1.html")]),
    )
    .await;
    mount_page(
        &mock_server,
        "/legislation/ilcs/ch1.html",
        category_page(&[("5 ILCS 140/ Open Records", "/legislation/ilcs/law.html")]),
    )
    .await;
    // The summary page has a stray table outside any paragraph; it must not leak in
    mount_page(
        &mock_server,
        "/legislation/ilcs/law.html",
        r#"<html><body><table><tr><td>Table of contents</td></tr></table><a href="/legislation/ilcs/full.html">View Entire Act</a></body></html>"#.to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/legislation/ilcs/full.html",
        law_page(&["Sec. 1.", "Sec. 1.5.", "Sec. 2."]),
    )
    .await;

    let state = crawl(&create_test_config(&mock_server)).await.unwrap();

    assert_eq!(
        state.corpus.get("5 ILCS 140/ Open Records"),
        Some("Sec. 1.\nSec. 1.5.\nSec. 2.")
    );
    assert!(state.failures.is_empty());
}

#[tokio::test]
async fn test_empty_full_act_page_is_not_a_failure() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/legislation/ilcs/ilcs.asp",
        index_page(&[("GOVERNMENT", "/legislation/ilcs/ch1.html")]),
    )
    .await;
    mount_page(
        &mock_server,
        "/legislation/ilcs/ch1.html",
        category_page(&[("5 ILCS 5/ Repealed", "/legislation/ilcs/law.html")]),
    )
    .await;
    mount_page(
        &mock_server,
        "/legislation/ilcs/law.html",
        summary_page(Some("/legislation/ilcs/full.html")),
    )
    .await;
    mount_page(&mock_server, "/legislation/ilcs/full.html", law_page(&[])).await;

    let state = crawl(&create_test_config(&mock_server)).await.unwrap();

    assert_eq!(state.corpus.get("5 ILCS 5/ Repealed"), Some(""));
    assert!(state.failures.is_empty());
    assert_eq!(state.fallbacks_followed, 1);
}

#[tokio::test]
async fn test_all_empty_content_counts_as_no_content() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/legislation/ilcs/ilcs.asp",
        index_page(&[("GOVERNMENT", "/legislation/ilcs/ch1.html")]),
    )
    .await;
    mount_page(
        &mock_server,
        "/legislation/ilcs/ch1.html",
        category_page(&[
            ("5 ILCS 10/ Hollow Act", "/legislation/ilcs/hollow.html"),
            ("5 ILCS 20/ Linked Act", "/legislation/ilcs/linked.html"),
        ]),
    )
    .await;
    // Content tables are matched but hold no text at all
    mount_page(
        &mock_server,
        "/legislation/ilcs/hollow.html",
        "<html><body><p><table></table></p><p><table></table></p></body></html>".to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/legislation/ilcs/linked.html",
        r#"<html><body><p><table></table></p><a href="/legislation/ilcs/linked_full.html">View Entire Act</a></body></html>"#.to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/legislation/ilcs/linked_full.html",
        law_page(&["Sec. 1. Linked text."]),
    )
    .await;

    let state = crawl(&create_test_config(&mock_server)).await.unwrap();

    assert_eq!(state.corpus.get("5 ILCS 10/ Hollow Act"), Some(""));
    assert_eq!(
        state.corpus.get("5 ILCS 20/ Linked Act"),
        Some("Sec. 1. Linked text.")
    );
    assert_eq!(
        state.failure_lines(),
        vec!["GOVERNMENT: 5 ILCS 10/ Hollow Act"]
    );
    assert_eq!(state.fallbacks_followed, 1);
}

#[tokio::test]
async fn test_law_page_charset_from_meta_tag() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/legislation/ilcs/ilcs.asp",
        index_page(&[("GOVERNMENT", "/legislation/ilcs/ch1.html")]),
    )
    .await;
    mount_page(
        &mock_server,
        "/legislation/ilcs/ch1.html",
        category_page(&[("5 ILCS 70/ Statute on Statutes", "/legislation/ilcs/law.html")]),
    )
    .await;

    // Served as plain text/html; only the meta tag names the charset
    let mut body = b"<html><head><meta http-equiv=\"Content-Type\" \
        content=\"text/html; charset=windows-1252\"></head>\
        <body><p><table><tr><td>Sec. 1. The "
        .to_vec();
    body.extend_from_slice(b"\x93Act\x94 \xa7 5.");
    body.extend_from_slice(b"</td></tr></table></p></body></html>");
    Mock::given(method("GET"))
        .and(path("/legislation/ilcs/law.html"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(&mock_server)
        .await;

    let state = crawl(&create_test_config(&mock_server)).await.unwrap();

    assert_eq!(
        state.corpus.get("5 ILCS 70/ Statute on Statutes"),
        Some("Sec. 1. The \u{201c}Act\u{201d} \u{a7} 5.")
    );
}

#[tokio::test]
async fn test_corpus_keys_are_anchor_texts() {
    let mock_server = MockServer::start().await;
    mount_statute_site(&mock_server).await;

    let state = crawl(&create_test_config(&mock_server)).await.unwrap();

    let anchor_texts = [
        "5 ILCS 100/ Act A",
        "5 ILCS 120/ Act B",
        "740 ILCS 10/ Act C",
    ];
    for name in state.corpus.names() {
        assert_eq!(
            anchor_texts.iter().filter(|text| **text == name).count(),
            1,
            "unexpected corpus key {:?}",
            name
        );
    }
}

#[tokio::test]
async fn test_duplicate_law_names_last_write_wins() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/legislation/ilcs/ilcs.asp",
        index_page(&[
            ("GOVERNMENT", "/legislation/ilcs/ch1.html"),
            ("REVENUE", "/legislation/ilcs/ch2.html"),
        ]),
    )
    .await;
    mount_page(
        &mock_server,
        "/legislation/ilcs/ch1.html",
        category_page(&[
            ("General Provisions", "/legislation/ilcs/gov.html"),
            ("Other Act", "/legislation/ilcs/other.html"),
        ]),
    )
    .await;
    mount_page(
        &mock_server,
        "/legislation/ilcs/ch2.html",
        category_page(&[("General Provisions", "/legislation/ilcs/rev.html")]),
    )
    .await;
    mount_page(&mock_server, "/legislation/ilcs/gov.html", law_page(&["Government text"])).await;
    mount_page(&mock_server, "/legislation/ilcs/other.html", law_page(&["Other text"])).await;
    mount_page(&mock_server, "/legislation/ilcs/rev.html", law_page(&["Revenue text"])).await;

    let state = crawl(&create_test_config(&mock_server)).await.unwrap();

    assert_eq!(state.corpus.len(), 2);
    assert_eq!(state.corpus.get("General Provisions"), Some("Revenue text"));
    assert_eq!(state.laws_visited, 3);
}

#[tokio::test]
async fn test_category_404_aborts_before_any_law() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/legislation/ilcs/ilcs.asp",
        index_page(&[
            ("GOVERNMENT", "/legislation/ilcs/ch1.html"),
            ("CIVIL LIABILITIES", "/legislation/ilcs/ch2.html"),
        ]),
    )
    .await;
    mount_status(&mock_server, "/legislation/ilcs/ch1.html", 404).await;

    // Nothing past the failing category may be requested
    Mock::given(method("GET"))
        .and(path("/legislation/ilcs/ch2.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(category_page(&[(
            "Act",
            "/legislation/ilcs/law.html",
        )])))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/legislation/ilcs/law.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(law_page(&["text"])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    let corpus_path = dir.path().join("laws.json");
    let mut config = create_test_config(&mock_server);
    config.output.corpus_path = corpus_path.display().to_string();

    let err = harvest(&config).await.unwrap_err();

    assert_eq!(err.phase(), Some(CrawlPhase::Category(0)));
    assert!(matches!(
        err,
        HarvestError::Fetch {
            source: FetchError::Status { status: 404, .. },
            ..
        }
    ));
    assert!(!corpus_path.exists());
}

#[tokio::test]
async fn test_category_transport_failure_aborts_without_artifact() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/legislation/ilcs/ilcs.asp",
        index_page(&[("GOVERNMENT", "/legislation/ilcs/ch1.html")]),
    )
    .await;

    // Bind and drop a listener so the port is known to refuse connections
    let closed_port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let dir = tempdir().unwrap();
    let corpus_path = dir.path().join("laws.json");
    let mut config = create_test_config(&mock_server);
    config.crawler.base_url = format!("http://127.0.0.1:{}/legislation/ilcs/", closed_port);
    config.output.corpus_path = corpus_path.display().to_string();

    let err = harvest(&config).await.unwrap_err();

    assert_eq!(err.phase(), Some(CrawlPhase::Category(0)));
    match err {
        HarvestError::Fetch {
            source: source @ FetchError::Transport { .. },
            ..
        } => {
            assert_eq!(
                source.url(),
                format!("http://127.0.0.1:{}/legislation/ilcs/ch1.html", closed_port)
            );
            assert_eq!(source.status(), None);
        }
        other => panic!("expected a transport failure, got {:?}", other),
    }
    assert!(!corpus_path.exists());
}

#[tokio::test]
async fn test_fallback_failure_aborts_under_default_policy() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/legislation/ilcs/ilcs.asp",
        index_page(&[("GOVERNMENT", "/legislation/ilcs/ch1.html")]),
    )
    .await;
    mount_page(
        &mock_server,
        "/legislation/ilcs/ch1.html",
        category_page(&[
            ("5 ILCS 100/ Act A", "/legislation/ilcs/law_a.html"),
            ("5 ILCS 120/ Act B", "/legislation/ilcs/law_b.html"),
        ]),
    )
    .await;
    mount_page(&mock_server, "/legislation/ilcs/law_a.html", law_page(&["A"])).await;
    mount_page(
        &mock_server,
        "/legislation/ilcs/law_b.html",
        summary_page(Some("/legislation/ilcs/full_b.html")),
    )
    .await;
    mount_status(&mock_server, "/legislation/ilcs/full_b.html", 500).await;

    let err = crawl(&create_test_config(&mock_server)).await.unwrap_err();

    assert_eq!(err.phase(), Some(CrawlPhase::Fallback(0, 1)));
}

#[tokio::test]
async fn test_index_failure_is_fatal_even_when_skipping() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "/legislation/ilcs/ilcs.asp", 503).await;

    let mut config = create_test_config(&mock_server);
    config.crawler.on_fetch_error = FetchErrorPolicy::Skip;

    let err = crawl(&config).await.unwrap_err();
    assert_eq!(err.phase(), Some(CrawlPhase::Index));
}

#[tokio::test]
async fn test_skip_policy_records_failed_fetches_and_continues() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/legislation/ilcs/ilcs.asp",
        index_page(&[
            ("GOVERNMENT", "/legislation/ilcs/ch1.html"),
            ("REVENUE", "/legislation/ilcs/ch2.html"),
        ]),
    )
    .await;
    mount_status(&mock_server, "/legislation/ilcs/ch1.html", 404).await;
    mount_page(
        &mock_server,
        "/legislation/ilcs/ch2.html",
        category_page(&[
            ("35 ILCS 5/ Income Tax Act", "/legislation/ilcs/income.html"),
            ("35 ILCS 120/ Retailers Act", "/legislation/ilcs/retail.html"),
        ]),
    )
    .await;
    mount_status(&mock_server, "/legislation/ilcs/income.html", 500).await;
    mount_page(
        &mock_server,
        "/legislation/ilcs/retail.html",
        law_page(&["Sec. 1. Retailers tax."]),
    )
    .await;

    let mut config = create_test_config(&mock_server);
    config.crawler.on_fetch_error = FetchErrorPolicy::Skip;

    let state = crawl(&config).await.expect("skip policy should not abort");

    assert_eq!(state.corpus.len(), 1);
    assert_eq!(
        state.corpus.get("35 ILCS 120/ Retailers Act"),
        Some("Sec. 1. Retailers tax.")
    );
    assert!(!state.corpus.contains("35 ILCS 5/ Income Tax Act"));

    let phases: Vec<_> = state.skipped.iter().map(|skip| skip.phase).collect();
    assert_eq!(phases, vec![CrawlPhase::Category(0), CrawlPhase::Law(1, 0)]);
    assert!(state.skipped[1].error.contains("error 500"));
    assert_eq!(state.categories_visited, 1);
}

#[tokio::test]
async fn test_supplements_are_stored_whole_before_statutes() {
    let mock_server = MockServer::start().await;
    mount_statute_site(&mock_server).await;
    mount_page(
        &mock_server,
        "/commission/lrb/conent.htm",
        "<html><body><h1>Constitution</h1><p>Preamble</p></body></html>".to_string(),
    )
    .await;

    let mut config = create_test_config(&mock_server);
    config.supplements.push(SupplementEntry {
        name: "Illinois Constitution".to_string(),
        url: format!("{}/commission/lrb/conent.htm", mock_server.uri()),
    });

    let state = crawl(&config).await.unwrap();

    assert_eq!(state.corpus.names().next(), Some("Illinois Constitution"));
    assert_eq!(
        state.corpus.get("Illinois Constitution"),
        Some("ConstitutionPreamble")
    );
    assert_eq!(state.corpus.len(), 4);
}

#[tokio::test]
async fn test_repeated_harvest_writes_identical_corpus() {
    let mock_server = MockServer::start().await;
    mount_statute_site(&mock_server).await;

    let dir = tempdir().unwrap();
    let first_path = dir.path().join("first.json");
    let second_path = dir.path().join("second.json");

    let mut config = create_test_config(&mock_server);
    config.output.corpus_path = first_path.display().to_string();
    harvest(&config).await.unwrap();
    config.output.corpus_path = second_path.display().to_string();
    harvest(&config).await.unwrap();

    let first = std::fs::read(&first_path).unwrap();
    let second = std::fs::read(&second_path).unwrap();
    assert_eq!(first, second);

    let corpus = read_corpus(&first_path).unwrap();
    assert_eq!(corpus.len(), 3);
    assert_eq!(corpus.get("740 ILCS 10/ Act C"), Some(""));
}

#[tokio::test]
async fn test_fetcher_accepts_only_200() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/ok", "<p>fine</p>".to_string()).await;
    mount_status(&mock_server, "/no-content", 204).await;
    mount_status(&mock_server, "/missing", 404).await;

    let fetcher = Fetcher::from_config(&Config::default()).unwrap();

    let page = fetcher
        .fetch(&format!("{}/ok", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(page.status, 200);
    assert_eq!(page.text(), "<p>fine</p>");

    let err = fetcher
        .fetch(&format!("{}/no-content", mock_server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(204));

    let missing_url = format!("{}/missing", mock_server.uri());
    let err = fetcher.fetch(&missing_url).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(
        err.to_string(),
        format!("error 404: could not fetch {}", missing_url)
    );
}

#[tokio::test]
async fn test_fetcher_follows_redirects() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/new", mock_server.uri()).as_str()),
        )
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/new", "moved".to_string()).await;

    let fetcher = Fetcher::from_config(&Config::default()).unwrap();
    let page = fetcher
        .fetch(&format!("{}/old", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(page.text(), "moved");
    assert!(page.url.ends_with("/new"));
}
