mod common;

use std::sync::Arc;
use std::time::Duration;

use contact_crawler::crawler::types::FetchStatus;
use contact_crawler::crawler::Fetcher;

use common::{ScriptedTransport, TransientTransport};

#[tokio::test]
async fn dns_failure_is_terminal_with_zero_attempts() {
    let transport = Arc::new(ScriptedTransport::new());
    let fetcher = Fetcher::new(transport.clone(), 10, 3);

    let result = fetcher
        .fetch("http://no-such-host-d41d8cd98f.invalid/")
        .await;

    assert_eq!(result.status, FetchStatus::DnsError);
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn http_error_is_terminal_without_retry() {
    let transport =
        Arc::new(ScriptedTransport::new().status("http://127.0.0.1/missing", 404));
    let fetcher = Fetcher::new(transport.clone(), 10, 3);

    let result = fetcher.fetch("http://127.0.0.1/missing").await;

    assert_eq!(result.status, FetchStatus::HttpError(404));
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn successful_fetch_returns_the_body() {
    let transport =
        Arc::new(ScriptedTransport::new().page("http://127.0.0.1/", "<html>hello</html>"));
    let fetcher = Fetcher::new(transport.clone(), 10, 3);

    let result = fetcher.fetch("http://127.0.0.1/").await;

    assert_eq!(
        result.status,
        FetchStatus::Ok("<html>hello</html>".to_string())
    );
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn transient_failures_retry_with_exponential_backoff() {
    let transport = Arc::new(TransientTransport::new(2, "<html>late</html>"));
    let fetcher = Fetcher::new(transport.clone(), 10, 3);

    let result = fetcher.fetch("http://127.0.0.1/flaky").await;

    assert!(matches!(result.status, FetchStatus::Ok(_)));
    let times = transport.attempt_times();
    assert_eq!(times.len(), 3);

    // Waits follow 2^attempt seconds (plus up to a second of jitter), so the
    // intervals are strictly increasing.
    let first_gap = times[1] - times[0];
    let second_gap = times[2] - times[1];
    assert!(first_gap >= Duration::from_secs(2));
    assert!(first_gap < Duration::from_secs(4));
    assert!(second_gap >= Duration::from_secs(4));
    assert!(second_gap > first_gap);
}

#[tokio::test(start_paused = true)]
async fn retry_exhaustion_yields_the_transient_status() {
    let transport = Arc::new(TransientTransport::always_failing());
    let fetcher = Fetcher::new(transport.clone(), 10, 3);

    let result = fetcher.fetch("http://127.0.0.1/down").await;

    assert_eq!(result.status, FetchStatus::ConnectionError);
    assert_eq!(transport.attempt_count(), 3);
}

#[tokio::test]
async fn reqwest_transport_round_trip() {
    use contact_crawler::crawler::ReqwestTransport;

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/contact")
        .with_status(200)
        .with_body("<html>contact page</html>")
        .create_async()
        .await;

    let transport = Arc::new(ReqwestTransport::new("test-agent/1.0").unwrap());
    let fetcher = Fetcher::new(transport, 10, 3);

    let result = fetcher.fetch(&format!("{}/contact", server.url())).await;

    assert_eq!(
        result.status,
        FetchStatus::Ok("<html>contact page</html>".to_string())
    );
    mock.assert_async().await;
}
