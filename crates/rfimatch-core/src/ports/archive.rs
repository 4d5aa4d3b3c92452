use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CaptureBlock, FilterSpec, PageRequest, RawObservationPage};

/// Port for a cursor-paginated remote archive
#[async_trait]
pub trait ArchiveClient: Send + Sync {
    /// Fetch one page of records
    ///
    /// A transport or query failure is returned as-is; callers do not retry.
    async fn execute_page(&self, request: &PageRequest) -> Result<RawObservationPage>;
}

/// Port for one institution's observation archive
#[async_trait]
pub trait ArchiveSource: Send + Sync {
    /// Observatory name this source serves (registry key)
    fn name(&self) -> &str;

    /// Fetch up to `num` capture sessions matching the filter
    async fn get_observations(&self, filter: &FilterSpec, num: usize)
        -> Result<Vec<CaptureBlock>>;
}
