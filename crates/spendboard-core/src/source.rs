//! Upstream page sources
//!
//! [`SpendingSource`] is the single seam between the dashboard and the
//! paginated upstream APIs. Each upstream gets one implementation; the
//! HTTP one is [`HttpSpendingSource`], parameterized by [`SourceKind`].

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{CoreError, CoreResult};
use crate::models::{lenient_count, Page, PageRequest, Record};

/// Shared source reference
pub type SourceRef = Arc<dyn SpendingSource>;

/// A paginated upstream of spending records
#[async_trait]
pub trait SpendingSource: Send + Sync {
    /// Fetch one page. One upstream call per invocation, no retry, no cache.
    async fn fetch(&self, request: &PageRequest) -> CoreResult<Page>;

    /// Short label used in logs
    fn name(&self) -> &str;
}

/// Which upstream response dialect a source speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Spending feed reporting `totalPages`
    Spending,
    /// Table feed reporting `totalCount`, filterable by `AccountName`
    Table,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Spending => write!(f, "spending"),
            SourceKind::Table => write!(f, "table"),
        }
    }
}

/// Response body shared by both upstream dialects
#[derive(Debug, Deserialize)]
struct PageBody {
    data: Vec<Record>,
    #[serde(rename = "totalPages", default, deserialize_with = "lenient_count")]
    total_pages: Option<u64>,
    #[serde(rename = "totalCount", default, deserialize_with = "lenient_count")]
    total_count: Option<u64>,
}

impl PageBody {
    fn into_page(self, kind: SourceKind, request: &PageRequest) -> CoreResult<Page> {
        let page_size = u64::from(request.page_size);
        let (total_pages, total_count) = match kind {
            SourceKind::Spending => {
                let total_pages = match (self.total_pages, self.total_count) {
                    (Some(pages), _) => pages,
                    (None, Some(count)) => count.div_ceil(page_size),
                    (None, None) => {
                        return Err(CoreError::UpstreamBody {
                            message: "missing totalPages".to_string(),
                        })
                    }
                };
                (total_pages, self.total_count)
            }
            SourceKind::Table => {
                let count = self.total_count.ok_or_else(|| CoreError::UpstreamBody {
                    message: "missing totalCount".to_string(),
                })?;
                (count.div_ceil(page_size), Some(count))
            }
        };

        let total_pages = u32::try_from(total_pages).map_err(|_| CoreError::UpstreamBody {
            message: format!("page count out of range: {}", total_pages),
        })?;

        Ok(Page {
            records: self.data,
            page: request.page,
            page_size: request.page_size,
            total_pages,
            total_count,
        })
    }
}

/// Decode a raw upstream body for the given dialect
pub fn decode_page(body: &[u8], kind: SourceKind, request: &PageRequest) -> CoreResult<Page> {
    request.validate()?;
    let body: PageBody = serde_json::from_slice(body).map_err(|e| CoreError::UpstreamBody {
        message: e.to_string(),
    })?;
    body.into_page(kind, request)
}

/// reqwest-backed source
pub struct HttpSpendingSource {
    client: reqwest::Client,
    base_url: String,
    kind: SourceKind,
    label: String,
}

impl HttpSpendingSource {
    /// Create a source for `base_url` with a per-request timeout
    pub fn new(base_url: &str, kind: SourceKind, timeout: Duration) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::ValidationError {
                message: format!("cannot build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            kind,
            label: format!("{} ({})", kind, base_url),
        })
    }
}

#[async_trait]
impl SpendingSource for HttpSpendingSource {
    async fn fetch(&self, request: &PageRequest) -> CoreResult<Page> {
        request.validate()?;

        let mut query = vec![
            ("page", request.page.to_string()),
            ("pageSize", request.page_size.to_string()),
        ];
        if self.kind == SourceKind::Table {
            query.push(("AccountName", request.account.clone().unwrap_or_default()));
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| CoreError::UpstreamUnreachable { message: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::UpstreamStatus { status: status.as_u16() });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CoreError::UpstreamUnreachable { message: e.to_string() })?;

        decode_page(&body, self.kind, request)
    }

    fn name(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn source(server: &MockServer, kind: SourceKind) -> HttpSpendingSource {
        HttpSpendingSource::new(&server.url("/spending/index"), kind, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_decode_string_total_pages() {
        let body = br#"{"data": [], "totalPages": "3", "page": 1, "pageSize": 10}"#;
        let page = decode_page(body, SourceKind::Spending, &PageRequest::new(1, 10)).unwrap();
        assert_eq!(page.total_pages, 3);
        assert!(page.records.is_empty());
    }

    #[test]
    fn test_decode_whole_number_counts_agree() {
        let request = PageRequest::new(1, 10);
        let from_string = decode_page(br#"{"data": [], "totalPages": "3.0"}"#, SourceKind::Spending, &request).unwrap();
        let from_number = decode_page(br#"{"data": [], "totalPages": 3.0}"#, SourceKind::Spending, &request).unwrap();
        assert_eq!(from_string.total_pages, 3);
        assert_eq!(from_number.total_pages, 3);

        assert!(matches!(
            decode_page(br#"{"data": [], "totalPages": "2.5"}"#, SourceKind::Spending, &request),
            Err(CoreError::UpstreamBody { .. })
        ));
        assert!(matches!(
            decode_page(br#"{"data": [], "totalPages": 2.5}"#, SourceKind::Spending, &request),
            Err(CoreError::UpstreamBody { .. })
        ));
    }

    #[test]
    fn test_decode_table_total_count() {
        let body = br#"{"data": [{"SpendingID": "1"}], "totalCount": "51"}"#;
        let page = decode_page(body, SourceKind::Table, &PageRequest::new(1, 25)).unwrap();
        assert_eq!(page.total_count, Some(51));
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.records.len(), 1);
    }

    #[test]
    fn test_decode_spending_falls_back_to_count() {
        let body = br#"{"data": [], "totalCount": 20}"#;
        let page = decode_page(body, SourceKind::Spending, &PageRequest::new(1, 10)).unwrap();
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_decode_rejects_bad_bodies() {
        let request = PageRequest::new(1, 10);
        assert!(matches!(
            decode_page(b"<html>oops</html>", SourceKind::Spending, &request),
            Err(CoreError::UpstreamBody { .. })
        ));
        assert!(matches!(
            decode_page(br#"{"data": [], "totalPages": "many"}"#, SourceKind::Spending, &request),
            Err(CoreError::UpstreamBody { .. })
        ));
        assert!(matches!(
            decode_page(br#"{"data": []}"#, SourceKind::Spending, &request),
            Err(CoreError::UpstreamBody { .. })
        ));
        assert!(matches!(
            decode_page(br#"{"totalPages": 1}"#, SourceKind::Spending, &request),
            Err(CoreError::UpstreamBody { .. })
        ));
    }

    #[tokio::test]
    async fn test_http_fetch_sends_page_params() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/spending/index")
                    .query_param("page", "2")
                    .query_param("pageSize", "10000")
                    .query_param_missing("AccountName");
                then.status(200).json_body(json!({
                    "page": 2,
                    "pageSize": 10000,
                    "totalPages": 2,
                    "data": [{ "SpendingID": "S-9", "Amount": "4.20" }]
                }));
            })
            .await;

        let page = source(&server, SourceKind::Spending)
            .fetch(&PageRequest::new(2, 10000))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.records[0].amount, "4.20");
    }

    #[tokio::test]
    async fn test_http_fetch_table_forwards_account() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/spending/index")
                    .query_param("AccountName", "Meals");
                then.status(200).json_body(json!({ "data": [], "totalCount": 0 }));
            })
            .await;

        let request = PageRequest::new(1, 25).with_account(Some("Meals".to_string()));
        let page = source(&server, SourceKind::Table).fetch(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(page.total_count, Some(0));
        assert_eq!(page.total_pages, 0);
    }

    #[tokio::test]
    async fn test_http_fetch_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/spending/index");
                then.status(500).body("boom");
            })
            .await;

        let err = source(&server, SourceKind::Spending)
            .fetch(&PageRequest::new(1, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::UpstreamStatus { status: 500 }));
    }

    #[tokio::test]
    async fn test_http_fetch_unreachable() {
        let source = HttpSpendingSource::new(
            "http://127.0.0.1:9/spending/index",
            SourceKind::Spending,
            Duration::from_secs(2),
        )
        .unwrap();
        let err = source.fetch(&PageRequest::new(1, 10)).await.unwrap_err();
        assert!(matches!(err, CoreError::UpstreamUnreachable { .. }));
    }

    #[tokio::test]
    async fn test_http_fetch_rejects_zero_page_without_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200).json_body(json!({ "data": [], "totalPages": 0 }));
            })
            .await;

        let err = source(&server, SourceKind::Spending)
            .fetch(&PageRequest::new(0, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationError { .. }));
        mock.assert_calls_async(0).await;
    }
}
