//! End-to-end retry and classification behavior against a mock server.

use std::time::{Duration, Instant};

use rentahuman_client::{blocking, Client, Config, Error};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> Config {
    Config::default().with_base_url(server.uri())
}

fn human_body() -> serde_json::Value {
    json!({
        "human": {
            "id": "h1",
            "name": "Ada",
            "location": "Lisbon",
            "rate": 45.0,
            "skills": ["Photography"]
        }
    })
}

#[tokio::test]
async fn rate_limited_requests_retry_until_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/humans/h1"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0.05"))
        .up_to_n_times(3)
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/humans/h1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(human_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::with_config(config_for(&server)).expect("client builds");
    let started = Instant::now();
    let human = client.get_human("h1").await.expect("fourth attempt succeeds");

    assert_eq!(human.id, "h1");
    assert_eq!(human.name, "Ada");
    // Three advisory waits of 50ms each sit between the four attempts.
    assert!(started.elapsed() >= Duration::from_millis(150));
}

#[tokio::test]
async fn not_found_is_fatal_on_the_first_attempt() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/humans/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "no such human"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::with_config(config_for(&server)).expect("client builds");
    let error = client.get_human("ghost").await.expect_err("404 is fatal");

    assert!(matches!(error, Error::NotFound { .. }), "got {error}");
    assert_eq!(error.status(), Some(404));
    assert!(error.to_string().contains("no such human"));
}

#[tokio::test]
async fn retries_exhaust_after_the_configured_budget() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/humans/h1"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0.01"))
        .expect(4)
        .mount(&server)
        .await;

    let client =
        Client::with_config(config_for(&server).with_max_retries(3)).expect("client builds");
    let error = client.get_human("h1").await.expect_err("budget runs out");

    match &error {
        Error::RetriesExhausted { attempts, source } => {
            assert_eq!(*attempts, 4);
            assert!(matches!(**source, Error::RateLimit { .. }));
        }
        other => panic!("expected retries-exhausted, got {other}"),
    }
    // The advisory wait stays readable through the wrapper.
    assert_eq!(error.retry_after(), Some(Duration::from_millis(10)));
    assert_eq!(error.status(), Some(429));
}

#[tokio::test]
async fn server_errors_are_retried_with_backoff() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bounties"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/bounties"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"bounties": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        Client::with_config(config_for(&server).with_max_retries(1)).expect("client builds");
    let started = Instant::now();
    let bounties = client.list_bounties(10).await.expect("retry succeeds");

    assert!(bounties.is_empty());
    // No Retry-After on a 503, so the first backoff step applies.
    assert!(started.elapsed() >= Duration::from_millis(500));
}

#[tokio::test]
async fn connection_failures_surface_as_exhausted_after_the_budget() {
    // Nothing listens on port 1, so every attempt fails at the transport.
    let config = Config::default()
        .with_base_url("http://127.0.0.1:1")
        .with_max_retries(0);
    let client = Client::with_config(config).expect("client builds");

    let error = client.list_skills().await.expect_err("nothing listening");
    match error {
        Error::RetriesExhausted { attempts, source } => {
            assert_eq!(attempts, 1);
            assert!(matches!(*source, Error::Connection(_)));
        }
        other => panic!("expected retries-exhausted, got {other}"),
    }
}

#[tokio::test]
async fn api_key_travels_only_in_the_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/humans"))
        .and(header("x-api-key", "sk-test-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"humans": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::with_config(config_for(&server).with_api_key("sk-test-1"))
        .expect("client builds");
    client
        .search_humans(&Default::default())
        .await
        .expect("matched by the header expectation");

    let requests = server.received_requests().await.expect("requests recorded");
    assert_eq!(requests.len(), 1);
    let url = &requests[0].url;
    assert!(!url.as_str().contains("sk-test-1"), "key leaked into {url}");
}

#[tokio::test]
async fn rejected_path_parameters_never_reach_the_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(human_body()))
        .expect(0)
        .mount(&server)
        .await;

    let client = Client::with_config(config_for(&server)).expect("client builds");
    for id in ["../admin", "a/b", "a\\b", "x..y"] {
        let error = client.get_human(id).await.expect_err("rejected locally");
        assert!(matches!(error, Error::Validation(_)), "{id:?} gave {error}");
    }
}

#[tokio::test]
async fn pagination_values_are_clamped_in_the_outgoing_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/humans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"humans": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::with_config(config_for(&server)).expect("client builds");
    let search = rentahuman_client::types::HumanSearch {
        limit: 9000,
        offset: -5,
        ..Default::default()
    };
    client.search_humans(&search).await.expect("request sent");

    let requests = server.received_requests().await.expect("requests recorded");
    let query = requests[0].url.query().unwrap_or_default();
    assert!(query.contains("limit=500"), "query was {query}");
    assert!(query.contains("offset=0"), "query was {query}");
}

#[tokio::test]
async fn long_advisory_backoffs_are_cancellable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/humans/h1"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "3600"))
        .mount(&server)
        .await;

    let client = Client::with_config(config_for(&server)).expect("client builds");
    let started = Instant::now();
    let outcome =
        tokio::time::timeout(Duration::from_millis(200), client.get_human("h1")).await;

    assert!(outcome.is_err(), "operation should have been cancelled");
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[test]
fn blocking_facade_resolves_the_full_retry_sequence() {
    // The mock server runs on its own multi-threaded runtime so it stays
    // responsive while the blocking client occupies this thread.
    let server_runtime = tokio::runtime::Runtime::new().expect("runtime starts");
    let server = server_runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/humans/h1"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0.05"))
            .up_to_n_times(3)
            .expect(3)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/humans/h1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(human_body()))
            .expect(1)
            .mount(&server)
            .await;
        server
    });

    let client = blocking::Client::with_config(config_for(&server)).expect("client builds");
    let human = client.get_human("h1").expect("fourth attempt succeeds");
    assert_eq!(human.name, "Ada");
    client.shutdown();
}
