//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, from the seed request to the JSON file.

use std::collections::BTreeMap;
use std::path::Path;
use sumi_glean::config::{build_config, Config, ConfigOverrides, Protocol};
use sumi_glean::crawler::{run_crawl, Coordinator};
use sumi_glean::output::{save_results, FsSink};
use sumi_glean::state::{ExtractedRecord, PageState};
use sumi_glean::url::normalize_url;
use tempfile::TempDir;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a validated test configuration crawling the mock server
fn create_test_config(mock_server: &MockServer, max_depth: u32, output_dir: &Path) -> Config {
    // e.g. "127.0.0.1:12345" from "http://127.0.0.1:12345"
    let domain = mock_server
        .uri()
        .trim_start_matches("http://")
        .to_string();

    build_config(
        None,
        ConfigOverrides {
            domain: Some(domain),
            protocol: Some(Protocol::Http),
            max_exploration_depth: Some(max_depth),
            tags: Some("p".to_string()),
            output_folder_path: Some(output_dir.to_path_buf()),
            concurrency: Some(4),
            request_timeout_secs: Some(5),
        },
    )
    .expect("test configuration should be valid")
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>Test</title></head><body>{}</body></html>", body),
        "text/html",
    )
}

async fn requested_paths(mock_server: &MockServer) -> Vec<String> {
    mock_server
        .received_requests()
        .await
        .expect("request recording is enabled")
        .iter()
        .map(|request| request.url.path().to_string())
        .collect()
}

#[tokio::test]
async fn test_full_crawl_writes_json_export() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("outputs");

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<p>Hello</p><p>World</p><a href="/about">About</a>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html_page(r#"<p>About Us</p><a href="/">Home</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, 1, &output_dir);
    let outcome = run_crawl(&config).await.expect("crawl should succeed");

    let path = save_results(
        &FsSink::new(),
        &outcome.state,
        &config.output_folder_path,
        &config.domain,
        1700000000,
    )
    .expect("export should be written");

    let expected_name = format!("{}_1700000000.json", config.domain.replace(':', "_"));
    assert_eq!(path, output_dir.join(expected_name));

    let content = std::fs::read_to_string(&path).unwrap();
    let exported: BTreeMap<String, Vec<ExtractedRecord>> =
        serde_json::from_str(&content).unwrap();

    let seed_url = format!("{}/", mock_server.uri());
    let about_url = format!("{}/about", mock_server.uri());

    assert_eq!(exported.len(), 2);
    assert_eq!(
        exported[&seed_url],
        vec![
            ExtractedRecord::new("p", "hello"),
            ExtractedRecord::new("p", "world"),
        ]
    );
    assert_eq!(
        exported[&about_url],
        vec![ExtractedRecord::new("p", "about us")]
    );

    // Raw JSON uses the external field names
    assert!(content.contains("\"elementTag\""));
    assert!(content.contains("\"innerText\""));
}

#[tokio::test]
async fn test_crawl_with_depth_limit() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    // Chain: / -> /level1 -> /level2 -> /level3
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<p>Root</p><a href="/level1">Next</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/level1"))
        .respond_with(html_page(r#"<p>One</p><a href="/level2">Next</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/level2"))
        .respond_with(html_page(r#"<p>Two</p><a href="/level3">Next</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/level3"))
        .respond_with(html_page("<p>Three</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, 2, temp_dir.path());
    let outcome = run_crawl(&config).await.unwrap();

    let mut paths = requested_paths(&mock_server).await;
    paths.sort();
    assert_eq!(paths, vec!["/", "/level1", "/level2"]);

    let level2 = normalize_url(&format!("{}/level2", mock_server.uri()));
    assert_eq!(outcome.state.depth_of(&level2), Some(2));
    assert_eq!(outcome.state.results().len(), 3);
}

#[tokio::test]
async fn test_off_domain_links_are_not_followed() {
    let mock_server = MockServer::start().await;
    let other_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            r#"<p>Home</p><a href="http://localhost:{}/elsewhere">Elsewhere</a>"#,
            other_server.address().port()
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(html_page("<p>Should not be fetched</p>"))
        .expect(0)
        .mount(&other_server)
        .await;

    let config = create_test_config(&mock_server, 3, temp_dir.path());
    let outcome = run_crawl(&config).await.unwrap();

    assert_eq!(outcome.state.visited_count(), 1);
    assert_eq!(outcome.state.results().len(), 1);
}

#[tokio::test]
async fn test_content_type_handling() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<p>Home</p><a href="/doc.pdf">PDF</a><a href="/data.json">JSON</a>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/doc.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"%PDF-1.4 <p>Not HTML</p>".to_vec(), "application/pdf"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"html": "<a href='/trap'>x</a>"}"#, "application/json"),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, 2, temp_dir.path());
    let outcome = run_crawl(&config).await.unwrap();

    // Non-HTML pages are visited but produce neither records nor links
    let pdf = normalize_url(&format!("{}/doc.pdf", mock_server.uri()));
    let json = normalize_url(&format!("{}/data.json", mock_server.uri()));
    assert!(outcome.state.is_visited(&pdf));
    assert!(outcome.state.is_visited(&json));
    assert!(outcome.state.records_for(&pdf).is_none());
    assert!(outcome.state.records_for(&json).is_none());

    assert!(!requested_paths(&mock_server)
        .await
        .contains(&"/trap".to_string()));
}

#[tokio::test]
async fn test_failed_pages_are_not_visited() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<p>Home</p><a href="/missing">Missing</a><a href="/broken">Broken</a>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, 2, temp_dir.path());
    let outcome = run_crawl(&config).await.expect("failed pages do not abort the crawl");

    for page in ["/missing", "/broken"] {
        let url = normalize_url(&format!("{}{}", mock_server.uri(), page));
        assert!(outcome.state.is_reserved(&url));
        assert!(!outcome.state.is_visited(&url));
        assert_eq!(outcome.state.page_state(&url), Some(PageState::Failed));
    }

    assert_eq!(outcome.stats.pages_visited, 1);
    assert_eq!(outcome.stats.pages_failed, 2);
}

#[tokio::test]
async fn test_requests_carry_user_agent_and_referer() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let seed_url = format!("{}/", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header_exists("user-agent"))
        .respond_with(html_page(r#"<p>Home</p><a href="/about">About</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .and(header_exists("user-agent"))
        .and(header("referer", seed_url.as_str()))
        .respond_with(html_page("<p>About</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, 1, temp_dir.path());
    let outcome = run_crawl(&config).await.unwrap();

    assert_eq!(outcome.state.results().len(), 2);
}

#[tokio::test]
async fn test_redirected_page_is_recorded_under_request_url() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<p>Home</p><a href="/old">Old</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/docs/new"))
        .mount(&mock_server)
        .await;

    // Relative links resolve against the final URL
    Mock::given(method("GET"))
        .and(path("/docs/new"))
        .respond_with(html_page(r#"<p>Moved</p><a href="sibling">Sibling</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/sibling"))
        .respond_with(html_page("<p>Sibling</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, 2, temp_dir.path());
    let outcome = run_crawl(&config).await.unwrap();

    let old = normalize_url(&format!("{}/old", mock_server.uri()));
    let new = normalize_url(&format!("{}/docs/new", mock_server.uri()));
    assert_eq!(
        outcome.state.records_for(&old).unwrap(),
        &[ExtractedRecord::new("p", "moved")]
    );
    assert!(outcome.state.records_for(&new).is_none());
}

#[tokio::test]
async fn test_redirect_target_linked_directly_is_fetched_once() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<p>Home</p><a href="/old">Old</a><a href="/new">New</a>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(html_page("<p>New home</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, 2, temp_dir.path());
    let outcome = run_crawl(&config).await.unwrap();

    // Both links were admitted before either fetch, so the redirect is refused
    let old = normalize_url(&format!("{}/old", mock_server.uri()));
    let new = normalize_url(&format!("{}/new", mock_server.uri()));
    assert_eq!(outcome.state.page_state(&old), Some(PageState::Failed));
    assert!(outcome.state.records_for(&old).is_none());
    assert_eq!(
        outcome.state.records_for(&new).unwrap(),
        &[ExtractedRecord::new("p", "new home")]
    );
    assert_eq!(
        requested_paths(&mock_server)
            .await
            .iter()
            .filter(|p| p.as_str() == "/new")
            .count(),
        1
    );
}

#[tokio::test]
async fn test_page_reached_by_redirect_is_not_fetched_again_through_a_link() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<p>Home</p><a href="/old">Old</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/new"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(html_page(r#"<p>New</p><a href="/new">Permalink</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, 3, temp_dir.path());
    let outcome = run_crawl(&config).await.unwrap();

    let old = normalize_url(&format!("{}/old", mock_server.uri()));
    let new = normalize_url(&format!("{}/new", mock_server.uri()));
    assert!(outcome.state.is_visited(&old));
    assert!(outcome.state.is_reserved(&new));
    assert!(outcome.state.records_for(&new).is_none());
    assert_eq!(outcome.stats.pages_failed, 0);
}

#[tokio::test]
async fn test_off_domain_redirect_is_not_followed() {
    let mock_server = MockServer::start().await;
    let other_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<p>Home</p><a href="/away">Away</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/away"))
        .respond_with(ResponseTemplate::new(301).insert_header(
            "location",
            format!("http://localhost:{}/landing", other_server.address().port()).as_str(),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(html_page("<p>Should not be fetched</p>"))
        .expect(0)
        .mount(&other_server)
        .await;

    let config = create_test_config(&mock_server, 2, temp_dir.path());
    let outcome = run_crawl(&config).await.unwrap();

    let away = normalize_url(&format!("{}/away", mock_server.uri()));
    assert_eq!(outcome.state.page_state(&away), Some(PageState::Failed));
    assert_eq!(outcome.stats.pages_failed, 1);
}

#[tokio::test]
async fn test_coordinator_exposes_live_state() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("<p>Only page</p>"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, 0, temp_dir.path());
    let coordinator = Coordinator::new(&config).unwrap();
    let live = coordinator.state();
    let outcome = coordinator.run().await.unwrap();

    // The handle outlives the run and sees the same pages
    let seed = normalize_url(&format!("{}/", mock_server.uri()));
    assert!(live.lock().is_visited(&seed));
    assert_eq!(outcome.state.visited_count(), 1);
}
