use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::session::SearchContext;

/// Session header the eGain interaction API authenticates on.
const SESSION_HEADER: &str = "x-egain-session";

/// Application-level error code carried in a 401 body when the session
/// token is missing, invalid, or expired.
const SESSION_INVALID_CODE: &str = "401-101";

/// Outcome of a single page request. Transport failures surface as the
/// `Err` branch of the method instead.
#[derive(Debug)]
pub enum PageStatus {
    /// 2xx with a parsed JSON body.
    Page(Value),
    /// 401 carrying the distinguished session-invalid code.
    SessionExpired,
    /// Any other non-2xx status.
    Failed(StatusCode),
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: String,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// The session token is attached as a default header; an absent
    /// token is sent as an empty header value, never omitted.
    pub fn new(ctx: &SearchContext) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US"));
        headers.insert(
            SESSION_HEADER,
            HeaderValue::from_str(&ctx.session)
                .context("session token contains invalid header characters")?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: ctx.base_url.clone(),
        })
    }

    /// Full request URL for one activity page. The sort/attribute
    /// directives are fixed and sit outside the conditional filter set.
    pub fn activity_page_url(&self, query: &str, page_size: usize, page_num: u32) -> String {
        let filters = if query.is_empty() {
            String::new()
        } else {
            format!("{query}&")
        };
        format!(
            "{}/activity?{filters}$sort=createdDate&$attribute=created&$pagesize={page_size}&$pagenum={page_num}",
            self.base_url
        )
    }

    /// Fetch one page and classify the response. `Err` means the
    /// request never produced a usable response (transport failure).
    pub async fn get_activity_page(
        &self,
        query: &str,
        page_size: usize,
        page_num: u32,
    ) -> Result<PageStatus> {
        let url = self.activity_page_url(query, page_size, page_num);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request failed for page {page_num}"))?;

        let status = response.status();
        if status.is_success() {
            let body: Value = response
                .json()
                .await
                .with_context(|| format!("invalid JSON body for page {page_num}"))?;
            return Ok(PageStatus::Page(body));
        }

        if status == StatusCode::UNAUTHORIZED {
            let body: ApiErrorBody = response.json().await.unwrap_or_default();
            if body.code == SESSION_INVALID_CODE {
                return Ok(PageStatus::SessionExpired);
            }
        }

        Ok(PageStatus::Failed(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(&SearchContext {
            base_url: base_url.to_string(),
            session: String::new(),
        })
        .unwrap()
    }

    #[test]
    fn page_url_appends_fixed_directives_after_filters() {
        let client = client("https://example.test/ws/v12/interaction");
        assert_eq!(
            client.activity_page_url("case=1042", 25, 3),
            "https://example.test/ws/v12/interaction/activity?case=1042\
             &$sort=createdDate&$attribute=created&$pagesize=25&$pagenum=3"
        );
    }

    #[test]
    fn empty_query_has_no_stray_separator() {
        let client = client("https://example.test/api");
        assert_eq!(
            client.activity_page_url("", 25, 1),
            "https://example.test/api/activity?$sort=createdDate&$attribute=created\
             &$pagesize=25&$pagenum=1"
        );
    }

    #[test]
    fn empty_session_token_builds_a_client() {
        // Absent session is an empty header value, not an error.
        assert!(ApiClient::new(&SearchContext {
            base_url: "https://example.test".into(),
            session: String::new(),
        })
        .is_ok());
    }
}
