//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end over real HTTP.

use spindel::config::Config;
use spindel::crawler::{fetch_page, run_crawl, CrawlReport, HttpFetcher, RetryPolicy};
use spindel::url::{LinkBase, NormalizedUrl};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration for the given seed with fast retries
fn create_test_config(seed: &str) -> Config {
    let mut config = Config::for_seed(seed);
    config.crawler.fetch_workers = 3;
    config.crawler.parse_workers = 2;
    config.crawler.max_attempts = 3;
    config.crawler.retry_delay_ms = 0;
    config.http.timeout_secs = 5;
    config.http.connect_timeout_secs = 2;
    config
}

async fn crawl(config: &Config) -> CrawlReport {
    tokio::time::timeout(Duration::from_secs(30), run_crawl(config))
        .await
        .expect("crawl should terminate")
        .expect("crawl should succeed")
}

/// Mounts an HTML page that must be requested exactly once
async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    // Start a mock server
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<html><head><link rel="stylesheet" href="/style.css"></head><body>
            <a href="/a.html">A</a>
            <a href="{}/a.html">A again, absolute</a>
            <a href="/b/">B</a>
            <a href="http://other.invalid/x.html">Elsewhere</a>
            <img src="/logo.png"><a href="/logo.png">Logo</a>
            <a href="/missing.html">Gone</a>
            </body></html>"#,
            base_url
        ),
    )
    .await;

    mount_page(
        &mock_server,
        "/a.html",
        r#"<a href="/">Home</a> <a href="/c.php#section">C</a>"#.to_string(),
    )
    .await;

    mount_page(&mock_server, "/b/", "<p>no links</p>".to_string()).await;
    mount_page(&mock_server, "/style.css", "body { color: black; }".to_string()).await;
    mount_page(&mock_server, "/c.php", r#"<a href="/a.html">A</a>"#.to_string()).await;

    Mock::given(method("GET"))
        .and(path("/missing.html"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&format!("{}/", base_url));
    let report = crawl(&config).await;

    let mut expected: Vec<String> = ["/", "/a.html", "/b/", "/c.php", "/missing.html", "/style.css"]
        .iter()
        .map(|p| format!("{}{}", base_url, p))
        .collect();
    expected.sort();

    assert_eq!(report.visited, expected);
    assert!(!report.cancelled);
    assert_eq!(report.stats.pages_fetched, 5);
    assert_eq!(report.stats.fetch_failures, 1);
    assert_eq!(report.stats.links_queued, 5);
    // other.invalid and logo.png
    assert_eq!(report.stats.links_rejected, 2);

    // Mock expectations (each page exactly once) are verified on drop
}

#[tokio::test]
async fn test_server_error_not_retried() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/flaky.html">x</a>"#.to_string()).await;

    Mock::given(method("GET"))
        .and(path("/flaky.html"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&format!("{}/", mock_server.uri()));
    let report = crawl(&config).await;

    assert_eq!(report.visited.len(), 2);
    assert_eq!(report.stats.fetch_failures, 1);
    assert_eq!(report.stats.fetch_attempts, 2);
}

#[tokio::test]
async fn test_other_port_is_another_site() {
    let site = MockServer::start().await;
    let neighbour = MockServer::start().await;

    mount_page(
        &site,
        "/",
        format!(r#"<a href="{}/index.html">neighbour</a>"#, neighbour.uri()),
    )
    .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>hi</p>"))
        .expect(0)
        .mount(&neighbour)
        .await;

    let config = create_test_config(&format!("{}/", site.uri()));
    let report = crawl(&config).await;

    assert_eq!(report.visited, vec![format!("{}/", site.uri())]);
    assert_eq!(report.stats.links_rejected, 1);
}

#[tokio::test]
async fn test_page_link_base_over_http() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/docs/index.html",
        r#"<a href="guide.html">Guide</a>"#.to_string(),
    )
    .await;
    mount_page(&mock_server, "/docs/guide.html", "<p>guide</p>".to_string()).await;

    let mut config = create_test_config(&format!("{}/docs/index.html", mock_server.uri()));
    config.crawler.link_base = LinkBase::Page;
    let report = crawl(&config).await;

    assert!(report
        .visited
        .contains(&format!("{}/docs/guide.html", mock_server.uri())));
}

#[tokio::test]
async fn test_unreachable_seed_gives_up_after_attempts() {
    // Reserve a port, then free it so nothing is listening there
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let config = create_test_config(&format!("http://127.0.0.1:{}/", port));
    let report = crawl(&config).await;

    assert_eq!(report.visited.len(), 1);
    assert_eq!(report.stats.pages_fetched, 0);
    assert_eq!(report.stats.fetch_failures, 1);
    assert_eq!(report.stats.fetch_attempts, 3);
}

#[tokio::test]
async fn test_redirect_loop_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/loop"))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&format!("{}/", mock_server.uri()));
    config.http.max_redirects = 3;
    let fetcher = HttpFetcher::from_config(&config.http).unwrap();
    let retry = RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::ZERO,
        max_delay: Duration::ZERO,
    };

    let url = NormalizedUrl::parse(&format!("{}/loop", mock_server.uri())).unwrap();
    let content = fetch_page(&fetcher, url, &retry).await;

    assert!(content.is_empty());
    assert_eq!(content.status, None);
    assert_eq!(content.attempts, 1);

    // One attempt follows at most max_redirects hops
    let requests = mock_server.received_requests().await.unwrap();
    assert!(
        requests.len() <= 4,
        "expected a single attempt, saw {} requests",
        requests.len()
    );
}
