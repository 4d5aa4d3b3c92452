use async_trait::async_trait;
use rfimatch_core::error::{Result, RfiMatchError};
use rfimatch_core::models::{PageRequest, RawObservationPage, RawRecord};
use rfimatch_core::ports::ArchiveClient;
use std::sync::Mutex;

enum Layout {
    /// Offset-addressed: each request returns up to `limit` records
    Records(Vec<RawRecord>),
    /// Fixed page boundaries addressed by page index
    Pages(Vec<Vec<RawRecord>>),
}

/// In-memory archive client serving fixed data by cursor
///
/// Every request is recorded so callers can inspect the exact pagination
/// traffic.
pub struct MemoryArchive {
    layout: Layout,
    honor_limit: bool,
    failure: Option<(usize, String)>,
    requests: Mutex<Vec<PageRequest>>,
}

impl MemoryArchive {
    pub fn from_records(records: Vec<RawRecord>) -> Self {
        Self::with_layout(Layout::Records(records))
    }

    pub fn from_pages(pages: Vec<Vec<RawRecord>>) -> Self {
        Self::with_layout(Layout::Pages(pages))
    }

    fn with_layout(layout: Layout) -> Self {
        Self {
            layout,
            honor_limit: true,
            failure: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Serve whole pages regardless of the requested limit
    pub fn ignoring_limit(mut self) -> Self {
        self.honor_limit = false;
        self
    }

    /// Fail the `call`-th request (zero-based) with a transport error
    pub fn failing_on_call(mut self, call: usize, message: impl Into<String>) -> Self {
        self.failure = Some((call, message.into()));
        self
    }

    /// Requests served so far, in order
    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    fn total_count(&self) -> usize {
        match &self.layout {
            Layout::Records(records) => records.len(),
            Layout::Pages(pages) => pages.iter().map(Vec::len).sum(),
        }
    }

    fn parse_cursor(cursor: Option<&str>) -> Result<usize> {
        cursor.map_or(Ok(0), |c| {
            c.parse().map_err(|_| RfiMatchError::TransportQuery {
                message: format!("unknown cursor '{}'", c),
            })
        })
    }
}

#[async_trait]
impl ArchiveClient for MemoryArchive {
    async fn execute_page(&self, request: &PageRequest) -> Result<RawObservationPage> {
        let call = {
            let mut requests = self.requests.lock().map_err(|_| RfiMatchError::TransportQuery {
                message: "request log poisoned".to_string(),
            })?;
            requests.push(request.clone());
            requests.len() - 1
        };

        if let Some((failing_call, message)) = &self.failure {
            if *failing_call == call {
                return Err(RfiMatchError::TransportQuery { message: message.clone() });
            }
        }

        let position = Self::parse_cursor(request.cursor.as_deref())?;
        let (mut records, next) = match &self.layout {
            Layout::Records(all) => {
                let start = position.min(all.len());
                let end = (start + request.limit).min(all.len());
                (all[start..end].to_vec(), (end < all.len()).then_some(end))
            }
            Layout::Pages(pages) => {
                let page = pages.get(position).cloned().unwrap_or_default();
                (page, (position + 1 < pages.len()).then_some(position + 1))
            }
        };

        if self.honor_limit {
            records.truncate(request.limit);
        }

        Ok(RawObservationPage {
            records,
            next_cursor: next.map(|n| n.to_string()),
            has_more: next.is_some(),
            total_count: self.total_count() as u64,
        })
    }
}
