use bugscan_engine::{CancelToken, EndpointProbe, ProbeSettings};
use bugscan_testing::StubServer;
use bugscan_testing::server::closed_port_url;
use bugscan_types::{Endpoint, EndpointIssue, EndpointIssueKind};
use std::time::{Duration, Instant};

fn probe_with_timeout(timeout: Duration) -> EndpointProbe {
    EndpointProbe::new(ProbeSettings {
        timeout,
        concurrency: 4,
    })
    .unwrap()
}

fn endpoints(urls: &[String]) -> Vec<Endpoint> {
    Endpoint::parse_all(urls)
}

#[tokio::test]
async fn test_healthy_endpoint_produces_no_issue() {
    let server = StubServer::with_status(200);
    let probe = probe_with_timeout(Duration::from_secs(5));

    let issues = probe.check(&endpoints(&[server.url("/health")])).await;
    assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
}

#[tokio::test]
async fn test_non_200_is_status_mismatch() {
    let server = StubServer::with_status(503);
    let probe = probe_with_timeout(Duration::from_secs(5));
    let url = server.url("/health");

    let issues = probe.check(&endpoints(std::slice::from_ref(&url))).await;
    assert_eq!(issues, vec![EndpointIssue::status_mismatch(url, 503)]);
}

#[tokio::test]
async fn test_other_2xx_is_still_a_mismatch() {
    let server = StubServer::with_status(204);
    let probe = probe_with_timeout(Duration::from_secs(5));

    let issues = probe.check(&endpoints(&[server.url("/")])).await;
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, EndpointIssueKind::StatusMismatch { code: 204 });
}

#[tokio::test]
async fn test_timeout_is_unreachable_and_later_endpoints_still_checked() {
    let hanging = StubServer::hanging();
    let failing = StubServer::with_status(500);
    let probe = probe_with_timeout(Duration::from_millis(300));

    let urls = [hanging.url("/slow"), failing.url("/health")];
    let issues = probe.check(&endpoints(&urls)).await;

    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].url, urls[0]);
    match &issues[0].kind {
        EndpointIssueKind::Unreachable { detail } => {
            assert!(detail.contains("timed out"), "detail was: {}", detail)
        }
        other => panic!("expected unreachable, got {:?}", other),
    }
    assert_eq!(issues[1], EndpointIssue::status_mismatch(urls[1].clone(), 500));
}

#[tokio::test]
async fn test_connection_refused_is_unreachable() {
    let probe = probe_with_timeout(Duration::from_secs(5));
    let url = closed_port_url("/health");

    let issues = probe.check(&endpoints(std::slice::from_ref(&url))).await;
    assert_eq!(issues.len(), 1);
    assert!(matches!(
        issues[0].kind,
        EndpointIssueKind::Unreachable { .. }
    ));
}

#[tokio::test]
async fn test_output_follows_input_order() {
    let servers: Vec<StubServer> = [500, 200, 404, 503]
        .into_iter()
        .map(StubServer::with_status)
        .collect();
    let urls: Vec<String> = servers.iter().map(|s| s.url("/")).collect();
    let probe = probe_with_timeout(Duration::from_secs(5));

    let issues = probe.check(&endpoints(&urls)).await;
    let codes: Vec<_> = issues
        .iter()
        .map(|issue| match issue.kind {
            EndpointIssueKind::StatusMismatch { code } => code,
            _ => 0,
        })
        .collect();
    assert_eq!(codes, vec![500, 404, 503]);
}

#[tokio::test]
async fn test_cancellation_keeps_finished_verdicts() {
    let failing = StubServer::with_status(502);
    let hanging = StubServer::hanging();
    let probe = EndpointProbe::new(ProbeSettings {
        timeout: Duration::from_secs(30),
        concurrency: 1,
    })
    .unwrap();

    let cancel = CancelToken::new();
    cancel.cancel_after(Duration::from_millis(300));

    let started = Instant::now();
    let urls = [failing.url("/"), hanging.url("/"), failing.url("/again")];
    let outcome = probe.check_until(&endpoints(&urls), &cancel).await;

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(outcome.checked, 1);
    assert_eq!(outcome.skipped, 2);
    assert_eq!(
        outcome.issues,
        vec![EndpointIssue::status_mismatch(urls[0].clone(), 502)]
    );
}
