use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use rfimatch_core::error::{Result, RfiMatchError};
use rfimatch_core::models::{PageRequest, QueryFilter, RawRecord, SortSpec};
use rfimatch_core::ports::ArchiveClient;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Drives cursor pagination against an archive client
pub struct ArchiveQueryEngine<C> {
    client: C,
    page_size: usize,
    search: String,
    cancel: CancellationToken,
}

struct PageState {
    filters: Vec<QueryFilter>,
    sort: Vec<SortSpec>,
    cursor: Option<String>,
    fetched: usize,
    exhausted: bool,
}

impl<C: ArchiveClient> ArchiveQueryEngine<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            page_size: DEFAULT_PAGE_SIZE,
            search: "*".to_string(),
            cancel: CancellationToken::new(),
        }
    }

    /// Records requested per round trip (at least 1)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Free-text search sent with every page
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Stop between pages once `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Lazily fetch up to `limit` records
    ///
    /// Each page asks for `min(page_size, limit - fetched)` records; fetching
    /// stops when the archive reports no further pages, when `limit` is
    /// reached, or on an empty page. A failed page ends the stream with that
    /// error.
    pub fn fetch_all(
        &self,
        filters: Vec<QueryFilter>,
        sort: Vec<SortSpec>,
        limit: usize,
    ) -> impl Stream<Item = Result<RawRecord>> + '_ {
        let initial = PageState {
            filters,
            sort,
            cursor: None,
            fetched: 0,
            exhausted: limit == 0,
        };

        stream::try_unfold(initial, move |state| self.next_page(state, limit))
            .map_ok(|records| stream::iter(records.into_iter().map(Ok)))
            .try_flatten()
    }

    /// Fetch up to `limit` records into memory
    pub async fn collect(
        &self,
        filters: Vec<QueryFilter>,
        sort: Vec<SortSpec>,
        limit: usize,
    ) -> Result<Vec<RawRecord>> {
        self.fetch_all(filters, sort, limit).try_collect().await
    }

    async fn next_page(
        &self,
        mut state: PageState,
        limit: usize,
    ) -> Result<Option<(Vec<RawRecord>, PageState)>> {
        if state.exhausted || state.fetched >= limit {
            return Ok(None);
        }
        if self.cancel.is_cancelled() {
            return Err(RfiMatchError::Cancelled);
        }

        let request = PageRequest {
            filters: state.filters,
            sort: state.sort,
            search: self.search.clone(),
            cursor: state.cursor.take(),
            limit: self.page_size.min(limit - state.fetched),
        };

        debug!(cursor = ?request.cursor, limit = request.limit, "Requesting archive page");
        let page = self.client.execute_page(&request).await?;

        let mut records = page.records;
        records.truncate(limit - state.fetched);
        state.fetched += records.len();
        state.filters = request.filters;
        state.sort = request.sort;

        state.exhausted = !page.has_more || state.fetched >= limit || records.is_empty();
        if !state.exhausted {
            match page.next_cursor {
                Some(cursor) => state.cursor = Some(cursor),
                None => {
                    warn!("Archive reported more pages without a cursor; stopping");
                    state.exhausted = true;
                }
            }
        }

        debug!(
            fetched = state.fetched,
            total = page.total_count,
            done = state.exhausted,
            "Archive page received"
        );

        Ok(Some((records, state)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryArchive;
    use serde_json::json;

    fn records(range: std::ops::Range<usize>) -> Vec<RawRecord> {
        range.map(|i| json!({ "CaptureBlockId": i.to_string() })).collect()
    }

    #[tokio::test]
    async fn test_three_pages_reach_limit() {
        let archive = MemoryArchive::from_pages(vec![records(0..10), records(10..20), records(20..25)]);
        let engine = ArchiveQueryEngine::new(archive).with_page_size(10);

        let fetched = engine.collect(Vec::new(), Vec::new(), 25).await.unwrap();

        assert_eq!(fetched.len(), 25);
        assert_eq!(engine.client().call_count(), 3);
        let limits: Vec<usize> = engine.client().requests().iter().map(|r| r.limit).collect();
        assert_eq!(limits, vec![10, 10, 5]);
    }

    #[tokio::test]
    async fn test_limit_shrinks_last_request() {
        let archive = MemoryArchive::from_records(records(0..100));
        let engine = ArchiveQueryEngine::new(archive).with_page_size(25);

        let fetched = engine.collect(Vec::new(), Vec::new(), 60).await.unwrap();

        assert_eq!(fetched.len(), 60);
        let requests = engine.client().requests();
        assert_eq!(requests.iter().map(|r| r.limit).collect::<Vec<_>>(), vec![25, 25, 10]);
        assert_eq!(requests[0].cursor, None);
        assert!(requests[1].cursor.is_some());
        assert_eq!(fetched[59]["CaptureBlockId"], "59");
    }

    #[tokio::test]
    async fn test_stops_when_archive_is_exhausted() {
        let archive = MemoryArchive::from_records(records(0..7));
        let engine = ArchiveQueryEngine::new(archive).with_page_size(5);

        let fetched = engine.collect(Vec::new(), Vec::new(), 1000).await.unwrap();

        assert_eq!(fetched.len(), 7);
        assert_eq!(engine.client().call_count(), 2);
    }

    #[tokio::test]
    async fn test_zero_limit_makes_no_calls() {
        let engine = ArchiveQueryEngine::new(MemoryArchive::from_records(records(0..3)));
        assert!(engine.collect(Vec::new(), Vec::new(), 0).await.unwrap().is_empty());
        assert_eq!(engine.client().call_count(), 0);
    }

    #[tokio::test]
    async fn test_oversized_page_is_truncated() {
        // Archive ignores the requested limit
        let archive = MemoryArchive::from_pages(vec![records(0..30)]).ignoring_limit();
        let engine = ArchiveQueryEngine::new(archive).with_page_size(10);

        let fetched = engine.collect(Vec::new(), Vec::new(), 10).await.unwrap();
        assert_eq!(fetched.len(), 10);
    }

    #[tokio::test]
    async fn test_transport_error_aborts_fetch() {
        let archive = MemoryArchive::from_records(records(0..50)).failing_on_call(1, "boom");
        let engine = ArchiveQueryEngine::new(archive).with_page_size(10);

        let err = engine.collect(Vec::new(), Vec::new(), 50).await.unwrap_err();
        assert!(matches!(err, RfiMatchError::TransportQuery { .. }));
        // No retry after the failing call
        assert_eq!(engine.client().call_count(), 2);
    }

    #[tokio::test]
    async fn test_stream_yields_records_lazily() {
        let archive = MemoryArchive::from_records(records(0..40));
        let engine = ArchiveQueryEngine::new(archive).with_page_size(10);

        let first: Vec<_> = engine
            .fetch_all(Vec::new(), Vec::new(), 40)
            .take(3)
            .try_collect()
            .await
            .unwrap();

        assert_eq!(first.len(), 3);
        assert_eq!(engine.client().call_count(), 1);
    }

    #[tokio::test]
    async fn test_cancellation_between_pages() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let engine = ArchiveQueryEngine::new(MemoryArchive::from_records(records(0..5)))
            .with_cancellation(cancel);

        let err = engine.collect(Vec::new(), Vec::new(), 5).await.unwrap_err();
        assert!(matches!(err, RfiMatchError::Cancelled));
        assert_eq!(engine.client().call_count(), 0);
    }

    #[tokio::test]
    async fn test_filters_and_search_are_forwarded() {
        let engine = ArchiveQueryEngine::new(MemoryArchive::from_records(records(0..3)))
            .with_search("3C286");
        let filters = vec![QueryFilter::text("TransferStatus", "AVAILABLE")];

        engine.collect(filters.clone(), Vec::new(), 3).await.unwrap();

        let request = &engine.client().requests()[0];
        assert_eq!(request.filters, filters);
        assert_eq!(request.search, "3C286");
    }
}
