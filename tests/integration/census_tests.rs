use binscout::census::Census;
use binscout::config::Config;
use binscout::headers::HeaderSource;
use binscout::output::read_report;
use binscout::{FetchError, ScoutError};
use reqwest::header::{HeaderMap, HeaderValue};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock directory
fn create_test_config(base_url: &str, report_path: &Path) -> Config {
    let mut config = Config::default();
    config.directory.url = format!("{}/directory/", base_url);
    config.probe.concurrency = 3;
    config.probe.request_timeout_ms = 500;
    config.output.report_path = report_path.display().to_string();
    config.output.progress_every = 2;
    config
}

fn directory_page(version: &str, rows: &[(String, &str)]) -> String {
    let rows: String = rows
        .iter()
        .map(|(address, uptime)| {
            format!(
                "<tr><td>{}</td><td>yes</td><td>yes</td><td>DE</td><td>A</td><td>yes</td><td>no</td><td>{}</td></tr>",
                address, uptime
            )
        })
        .collect();

    format!(
        r#"<html><body><h2>Directory</h2>
        <h5>Version {}</h5>
        <table><thead><tr><th>Address</th></tr></thead><tbody>{}</tbody></table>
        </body></html>"#,
        version, rows
    )
}

fn instance_page(expirations: &[&str], alert: Option<&str>) -> String {
    let options: String = expirations
        .iter()
        .map(|value| format!(r#"<option value="{0}">{0}</option>"#, value))
        .collect();
    let alert = alert
        .map(|text| format!(r#"<div class="alert alert-info" role="alert">{}</div>"#, text))
        .unwrap_or_default();

    format!(
        r#"<html><head><title>PrivateBin</title></head><body>{}
        <select id="pasteExpiration" name="pasteExpiration">{}</select></body></html>"#,
        alert, options
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_two_row_directory() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();
    let report_path = dir.path().join("instances.json");

    let a = format!("{}/a", base);
    let b = format!("{}/b", base);
    mount_page(
        &server,
        "/directory/",
        directory_page("1.7.1", &[(a.clone(), "99.50%"), (b.clone(), "42.00%")]),
    )
    .await;
    mount_page(&server, "/a", instance_page(&["1day", "never"], None)).await;
    mount_page(&server, "/b", instance_page(&["1day", "never"], None)).await;

    let census = Census::new(create_test_config(&base, &report_path)).unwrap();
    let summary = census.run().await.expect("Census failed");

    assert_eq!(summary.candidates, 2);
    assert_eq!(summary.reliable, 1);
    assert_eq!(summary.low_uptime, 1);
    assert!(summary.errors.is_empty());

    let report = read_report(&report_path).unwrap();
    assert_eq!(report.reliable.len(), 1);
    assert_eq!(report.reliable[0].address, a);
    assert_eq!(report.reliable[0].version, "1.7.1");
    assert_eq!(report.reliable[0].uptime, 99.5);
    assert_eq!(report.low_uptime.len(), 1);
    assert_eq!(report.low_uptime[0].address, b);
    assert!(report.unreliable.is_empty());
}

#[tokio::test]
async fn test_every_candidate_accounted_for() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();
    let report_path = dir.path().join("instances.json");

    let rows = vec![
        (format!("{}/reliable", base), "99.9%"),
        (format!("{}/low", base), "80%"),
        (format!("{}/warned", base), "100%"),
        (format!("{}/expiring", base), "100%"),
        (format!("{}/slow", base), "100%"),
        (format!("{}/gone", base), "100%"),
        (format!("{}/placeholder", base), "n/a"),
        (format!("{}/unmeasured", base), "NaN%"),
    ];
    mount_page(&server, "/directory/", directory_page("1.7.1", &rows)).await;

    mount_page(&server, "/reliable", instance_page(&["never"], None)).await;
    mount_page(&server, "/low", instance_page(&["never"], None)).await;
    mount_page(
        &server,
        "/warned",
        instance_page(&["never"], Some("This is a TEST SERVICE, data may be removed.")),
    )
    .await;
    mount_page(
        &server,
        "/expiring",
        instance_page(&["5min", "1week"], Some("test service")),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(instance_page(&["never"], None))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let census = Census::new(create_test_config(&base, &report_path)).unwrap();
    let summary = census.run().await.expect("Census failed");

    // Placeholder and NaN rows never become candidates
    assert_eq!(summary.candidates, 6);
    assert_eq!(summary.reliable, 1);
    assert_eq!(summary.low_uptime, 1);
    assert_eq!(summary.unreliable, 1);
    assert_eq!(summary.discarded, 1);
    assert_eq!(summary.errors.len(), 2);
    assert_eq!(
        summary.reported() + summary.discarded + summary.errors.len(),
        summary.candidates
    );

    let slow = format!("{}/slow", base);
    let gone = format!("{}/gone", base);
    assert!(summary.errors[&slow].is_timeout());
    assert!(matches!(
        summary.errors[&gone],
        FetchError::Status { status: 404, .. }
    ));

    let report = read_report(&report_path).unwrap();
    let all_reported: Vec<&str> = report
        .reliable
        .iter()
        .chain(&report.low_uptime)
        .chain(&report.unreliable)
        .map(|instance| instance.address.as_str())
        .collect();
    assert!(!all_reported.contains(&slow.as_str()));
    assert!(!all_reported.contains(&gone.as_str()));
    assert!(!all_reported.contains(&format!("{}/expiring", base).as_str()));
    assert_eq!(report.unreliable[0].address, format!("{}/warned", base));
}

#[tokio::test]
async fn test_redirects_are_followed() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();
    let report_path = dir.path().join("instances.json");

    mount_page(
        &server,
        "/directory/",
        directory_page("1.7", &[(format!("{}/old", base), "99.9%")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/new", base).as_str()),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/new", instance_page(&["never"], None)).await;

    let census = Census::new(create_test_config(&base, &report_path)).unwrap();
    let summary = census.run().await.unwrap();

    assert_eq!(summary.reliable, 1);
    let report = read_report(&report_path).unwrap();
    // The directory address is reported, not the redirect target
    assert_eq!(report.reliable[0].address, format!("{}/old", base));
}

#[tokio::test]
async fn test_probes_send_browser_headers() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();
    let report_path = dir.path().join("instances.json");

    mount_page(
        &server,
        "/directory/",
        directory_page("1.7", &[(format!("{}/a", base), "99.9%")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .and(header_exists("user-agent"))
        .and(header_exists("accept-language"))
        .respond_with(ResponseTemplate::new(200).set_body_string(instance_page(&["never"], None)))
        .mount(&server)
        .await;

    let census = Census::new(create_test_config(&base, &report_path)).unwrap();
    let summary = census.run().await.unwrap();
    assert_eq!(summary.reliable, 1);
}

struct MarkedHeaders;

impl HeaderSource for MarkedHeaders {
    fn headers_for(&self, url: &Url) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-probe-path", HeaderValue::from_str(url.path()).unwrap());
        headers
    }
}

#[tokio::test]
async fn test_custom_header_source() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();
    let report_path = dir.path().join("instances.json");

    Mock::given(method("GET"))
        .and(path("/directory/"))
        .and(header("x-probe-path", "/directory/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(directory_page(
            "1.7",
            &[(format!("{}/a", base), "50%")],
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .and(header("x-probe-path", "/a"))
        .respond_with(ResponseTemplate::new(200).set_body_string(instance_page(&["never"], None)))
        .mount(&server)
        .await;

    let config = create_test_config(&base, &report_path);
    let census = Census::with_headers(config, Arc::new(MarkedHeaders)).unwrap();
    let summary = census.run().await.unwrap();

    assert_eq!(summary.low_uptime, 1);
    assert!(summary.errors.is_empty());
}

#[tokio::test]
async fn test_directory_failure_is_fatal() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let report_path = dir.path().join("instances.json");

    Mock::given(method("GET"))
        .and(path("/directory/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let census = Census::new(create_test_config(&server.uri(), &report_path)).unwrap();
    let result = census.run().await;

    assert!(matches!(
        result,
        Err(ScoutError::Directory(FetchError::Status { status: 503, .. }))
    ));
    assert!(!report_path.exists());
}

#[tokio::test]
async fn test_report_write_failure_is_fatal() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();
    let report_path = dir.path().join("no-such-dir").join("instances.json");

    mount_page(
        &server,
        "/directory/",
        directory_page("1.7", &[(format!("{}/a", base), "99.9%")]),
    )
    .await;
    mount_page(&server, "/a", instance_page(&["never"], None)).await;

    let census = Census::new(create_test_config(&base, &report_path)).unwrap();
    let result = census.run().await;

    assert!(matches!(result, Err(ScoutError::Output(_))));
}

#[tokio::test]
async fn test_empty_directory_writes_empty_report() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let report_path = dir.path().join("instances.json");

    mount_page(
        &server,
        "/directory/",
        "<html><body><h5>Version 1.7</h5><p>None yet</p></body></html>".to_string(),
    )
    .await;

    let census = Census::new(create_test_config(&server.uri(), &report_path)).unwrap();
    let summary = census.run().await.unwrap();

    assert_eq!(summary.candidates, 0);
    assert!(read_report(&report_path).unwrap().is_empty());
}

#[tokio::test]
async fn test_discover_only() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();
    let report_path = dir.path().join("instances.json");

    mount_page(
        &server,
        "/directory/",
        directory_page(
            "1.7",
            &[
                (format!("{}/a", base), "99.9%"),
                (format!("{}/b", base), "12%"),
            ],
        ),
    )
    .await;

    let census = Census::new(create_test_config(&base, &report_path)).unwrap();
    let candidates = census.discover().await.unwrap();

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[1].uptime, 12.0);
    assert!(!report_path.exists());
}

#[tokio::test]
async fn test_oversized_page_is_a_failure() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();
    let report_path = dir.path().join("instances.json");

    let huge = format!("{}/huge", base);
    mount_page(
        &server,
        "/directory/",
        directory_page(
            "1.7",
            &[(huge.clone(), "99.9%"), (format!("{}/a", base), "99.9%")],
        ),
    )
    .await;
    let padding = format!("<!-- {} -->", "x".repeat(8 * 1024));
    mount_page(
        &server,
        "/huge",
        format!("{}{}", padding, instance_page(&["never"], None)),
    )
    .await;
    mount_page(&server, "/a", instance_page(&["never"], None)).await;

    let mut config = create_test_config(&base, &report_path);
    config.probe.max_body_bytes = 4 * 1024;
    let summary = Census::new(config).unwrap().run().await.unwrap();

    assert_eq!(summary.reliable, 1);
    assert!(matches!(
        summary.errors[&huge],
        FetchError::TooLarge { limit: 4096, .. }
    ));
}

#[tokio::test]
async fn test_invalid_header_profile_aborts_before_any_request() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let report_path = dir.path().join("instances.json");

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server.uri(), &report_path);
    config.headers.user_agents = vec!["broken\nagent".to_string()];

    let result = Census::new(config);

    assert!(matches!(result, Err(ScoutError::Headers(_))));
    assert!(!report_path.exists());
    server.verify().await;
}
