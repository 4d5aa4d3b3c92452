use async_trait::async_trait;
use rfimatch_core::error::{Result, RfiMatchError};
use rfimatch_core::models::{PageRequest, QueryFilter, RawObservationPage, RawRecord, SortSpec};
use rfimatch_core::ports::{ArchiveClient, CredentialProvider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Capture-block query with a fixed field selection
const CAPTURE_BLOCKS_QUERY: &str = r#"
query ($limit: Int, $cursor: String, $search: String, $filters: [SolrFilterInput!], $sort: [SortColumnInput!]) {
  captureBlocks(limit: $limit, cursor: $cursor, search: $search, filters: $filters, sort: $sort) {
    pageInfo {
      totalCount
      endCursor
      hasNextPage
    }
    records {
      id
      CaptureBlockId
      Description
      StartTime
      MinFreq
      MaxFreq
      Bandwidth
      Targets
      TargetCoordinates
      ScanLog
      rdb(internal: false)
    }
  }
}
"#;

/// Archive client speaking the capture-block GraphQL API over HTTP
pub struct HttpArchiveClient {
    /// Base URL of the archive (e.g., "https://archive.sarao.ac.za")
    base_url: String,

    credentials: Arc<dyn CredentialProvider>,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpArchiveClient {
    pub fn new(base_url: impl Into<String>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/graphql", self.base_url)
    }
}

#[async_trait]
impl ArchiveClient for HttpArchiveClient {
    async fn execute_page(&self, request: &PageRequest) -> Result<RawObservationPage> {
        let token = self.credentials.bearer_token().await?;

        let body = GraphQlRequest {
            query: CAPTURE_BLOCKS_QUERY,
            variables: PageVariables {
                limit: request.limit,
                cursor: request.cursor.as_deref(),
                search: &request.search,
                filters: &request.filters,
                sort: &request.sort,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| RfiMatchError::TransportQuery {
                message: format!("Failed to reach archive at {}: {}", self.base_url, e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &error_text).unwrap_or_else(|| {
                RfiMatchError::TransportQuery {
                    message: format!("Archive API error ({}): {}", status, error_text),
                }
            }));
        }

        let payload: GraphQlResponse =
            response.json().await.map_err(|e| RfiMatchError::TransportQuery {
                message: format!("Failed to parse archive response: {}", e),
            })?;

        payload.into_page()
    }
}

/// Map a non-success HTTP status to an error; rejected tokens are credential failures
fn status_error(status: reqwest::StatusCode, body: &str) -> Option<RfiMatchError> {
    if status.is_success() {
        return None;
    }

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Some(RfiMatchError::Credential {
            reason: format!("Archive rejected the bearer token ({})", status),
        });
    }

    Some(RfiMatchError::TransportQuery {
        message: format!("Archive API error ({}): {}", status, body),
    })
}

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'static str,
    variables: PageVariables<'a>,
}

#[derive(Debug, Serialize)]
struct PageVariables<'a> {
    limit: usize,
    cursor: Option<&'a str>,
    search: &'a str,
    filters: &'a [QueryFilter],
    sort: &'a [SortSpec],
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<CaptureBlocksData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptureBlocksData {
    capture_blocks: CaptureBlocksPage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptureBlocksPage {
    page_info: PageInfo,
    #[serde(default)]
    records: Vec<RawRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    #[serde(default)]
    total_count: u64,
    end_cursor: Option<String>,
    has_next_page: bool,
}

impl GraphQlResponse {
    fn into_page(self) -> Result<RawObservationPage> {
        if !self.errors.is_empty() {
            let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(RfiMatchError::TransportQuery { message: messages.join("; ") });
        }

        let page = self
            .data
            .ok_or_else(|| RfiMatchError::TransportQuery {
                message: "Archive response carried neither data nor errors".to_string(),
            })?
            .capture_blocks;

        Ok(RawObservationPage {
            records: page.records,
            next_cursor: page.page_info.end_cursor,
            has_more: page.page_info.has_next_page,
            total_count: page.page_info.total_count,
        })
    }
}
