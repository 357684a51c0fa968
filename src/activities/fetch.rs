use reqwest::StatusCode;
use serde_json::Value;

use crate::http::{ApiClient, PageStatus};

/// Records requested per page.
pub const PAGE_SIZE: usize = 25;

/// Hard cap on the aggregated result set; arrival order is kept and
/// everything past the cap is dropped.
pub const RESULT_CAP: usize = 1000;

/// Why paging stopped before the result set was complete.
#[derive(Debug)]
pub enum FetchAbort {
    Http(StatusCode),
    Network(anyhow::Error),
}

impl std::fmt::Display for FetchAbort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchAbort::Http(status) => write!(f, "server returned HTTP {status}"),
            FetchAbort::Network(err) => write!(f, "network error: {err:#}"),
        }
    }
}

/// Terminal result of one search invocation.
///
/// The asymmetry is deliberate: an expired session discards everything
/// already aggregated (stale credentials must not look like a short
/// result set), while HTTP and transport failures keep the pages
/// fetched before the abort.
#[derive(Debug)]
pub enum SearchOutcome {
    /// Last page reached or the cap was hit.
    Complete(Vec<Value>),
    /// Paging aborted mid-search; earlier pages are retained.
    Partial {
        activities: Vec<Value>,
        abort: FetchAbort,
    },
    /// 401 with the session-invalid code; the aggregate is discarded.
    SessionExpired,
}

enum FetchState {
    Fetching(u32),
    Finished(Terminal),
}

enum Terminal {
    Done,
    Expired,
    Aborted(FetchAbort),
}

/// Drive the sequential page loop for an assembled query fragment.
/// Page numbering starts at 1. Requests are strictly sequential; each
/// page is awaited before the next is issued.
pub async fn fetch_all(client: &ApiClient, query: &str) -> SearchOutcome {
    let mut activities: Vec<Value> = Vec::new();
    let mut state = FetchState::Fetching(1);

    let terminal = loop {
        match state {
            FetchState::Finished(terminal) => break terminal,
            FetchState::Fetching(page_num) => {
                state = match client.get_activity_page(query, PAGE_SIZE, page_num).await {
                    Ok(PageStatus::Page(body)) => {
                        let page = page_records(&body);
                        let last_page = page.len() < PAGE_SIZE;
                        activities.extend(page);
                        if last_page || activities.len() >= RESULT_CAP {
                            FetchState::Finished(Terminal::Done)
                        } else {
                            FetchState::Fetching(page_num + 1)
                        }
                    }
                    Ok(PageStatus::SessionExpired) => FetchState::Finished(Terminal::Expired),
                    Ok(PageStatus::Failed(status)) => {
                        FetchState::Finished(Terminal::Aborted(FetchAbort::Http(status)))
                    }
                    Err(err) => FetchState::Finished(Terminal::Aborted(FetchAbort::Network(err))),
                };
            }
        }
    };

    activities.truncate(RESULT_CAP);
    match terminal {
        Terminal::Done => SearchOutcome::Complete(activities),
        Terminal::Expired => SearchOutcome::SessionExpired,
        Terminal::Aborted(abort) => SearchOutcome::Partial { activities, abort },
    }
}

/// The `activity` array from a page body; absent or non-array is an
/// empty page.
fn page_records(body: &Value) -> Vec<Value> {
    match body.get("activity") {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SearchContext;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&SearchContext {
            base_url: server.uri(),
            session: "test-session".into(),
        })
        .unwrap()
    }

    fn page_body(count: usize, start_id: usize) -> serde_json::Value {
        let records: Vec<_> = (0..count)
            .map(|i| json!({ "id": start_id + i, "subject": "s" }))
            .collect();
        json!({ "activity": records })
    }

    #[tokio::test]
    async fn single_short_page_completes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/activity"))
            .and(header("x-egain-session", "test-session"))
            .and(query_param("$pagesize", "25"))
            .and(query_param("$pagenum", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(10, 0)))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = fetch_all(&client_for(&server), "case=1").await;
        match outcome {
            SearchOutcome::Complete(activities) => assert_eq!(activities.len(), 10),
            other => panic!("expected Complete, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn full_pages_stop_at_the_cap() {
        let server = MockServer::start().await;
        // Every page is full, so paging only stops at the cap: 40
        // pages of 25, and page 41 is never requested.
        Mock::given(method("GET"))
            .and(path("/activity"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(25, 0)))
            .expect(40)
            .mount(&server)
            .await;

        let outcome = fetch_all(&client_for(&server), "").await;
        match outcome {
            SearchOutcome::Complete(activities) => assert_eq!(activities.len(), RESULT_CAP),
            other => panic!("expected Complete, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn overdelivering_final_page_is_truncated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/activity"))
            .and(query_param("$pagenum", "40"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(40, 975)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/activity"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(25, 0)))
            .mount(&server)
            .await;

        let outcome = fetch_all(&client_for(&server), "").await;
        match outcome {
            SearchOutcome::Complete(activities) => assert_eq!(activities.len(), RESULT_CAP),
            other => panic!("expected Complete, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn session_expiry_discards_fetched_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/activity"))
            .and(query_param("$pagenum", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(25, 0)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/activity"))
            .and(query_param("$pagenum", "2"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "code": "401-101" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let outcome = fetch_all(&client_for(&server), "").await;
        assert!(matches!(outcome, SearchOutcome::SessionExpired));
    }

    #[tokio::test]
    async fn unauthorized_without_session_code_keeps_partial() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/activity"))
            .and(query_param("$pagenum", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(25, 0)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/activity"))
            .and(query_param("$pagenum", "2"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "code": "401-999" })),
            )
            .mount(&server)
            .await;

        let outcome = fetch_all(&client_for(&server), "").await;
        match outcome {
            SearchOutcome::Partial { activities, abort } => {
                assert_eq!(activities.len(), 25);
                assert!(matches!(abort, FetchAbort::Http(status) if status.as_u16() == 401));
            }
            other => panic!("expected Partial, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_keeps_pages_fetched_so_far() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/activity"))
            .and(query_param("$pagenum", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(25, 0)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/activity"))
            .and(query_param("$pagenum", "2"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = fetch_all(&client_for(&server), "").await;
        match outcome {
            SearchOutcome::Partial { activities, abort } => {
                assert_eq!(activities.len(), 25);
                assert!(matches!(abort, FetchAbort::Http(status) if status.as_u16() == 500));
            }
            other => panic!("expected Partial, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_failure_aborts_with_network_error() {
        // A non-pooled server: dropping it actually frees the port, so
        // the request below hits a dead socket. A pooled server from
        // `MockServer::start()` keeps listening after drop.
        let server = MockServer::builder().start().await;
        let client = client_for(&server);
        drop(server);

        let outcome = fetch_all(&client, "").await;
        match outcome {
            SearchOutcome::Partial { activities, abort } => {
                assert!(activities.is_empty());
                assert!(matches!(abort, FetchAbort::Network(_)));
            }
            other => panic!("expected Partial, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_activity_field_is_an_empty_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/activity"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 0 })))
            .mount(&server)
            .await;

        let outcome = fetch_all(&client_for(&server), "").await;
        match outcome {
            SearchOutcome::Complete(activities) => assert!(activities.is_empty()),
            other => panic!("expected Complete, got {other:?}"),
        }
    }
}
