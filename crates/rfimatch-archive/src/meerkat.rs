use async_trait::async_trait;
use rfimatch_core::error::Result;
use rfimatch_core::models::{CaptureBlock, FilterSpec};
use rfimatch_core::ports::{ArchiveClient, ArchiveSource};
use tracing::{info, warn};

use crate::bands::freq_to_bands;
use crate::pagination::ArchiveQueryEngine;
use crate::query::FilterGrammar;

pub const MEERKAT: &str = "MEERKAT";

/// MeerKAT capture-block archive
///
/// The archive filters by band name and calendar date, so the requested
/// frequency range is mapped to overlapping bands and the time window to
/// whole days.
pub struct MeerkatArchive<C> {
    name: String,
    engine: ArchiveQueryEngine<C>,
    grammar: FilterGrammar,
}

impl<C: ArchiveClient> MeerkatArchive<C> {
    pub fn new(engine: ArchiveQueryEngine<C>) -> Self {
        Self {
            name: MEERKAT.to_string(),
            engine,
            grammar: FilterGrammar::default(),
        }
    }

    pub fn engine(&self) -> &ArchiveQueryEngine<C> {
        &self.engine
    }

    /// Filter tokens sent to the archive for a filter spec
    pub fn filter_tokens(filter: &FilterSpec) -> Vec<String> {
        let [min_mhz, max_mhz] = filter.freq_range_mhz();
        let bands = freq_to_bands(min_mhz, max_mhz).join(",");

        vec![
            format!("Band={}", bands),
            format!("from={}", filter.start_date()),
            format!("to={}", filter.end_date()),
        ]
    }
}

#[async_trait]
impl<C: ArchiveClient> ArchiveSource for MeerkatArchive<C> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_observations(&self, filter: &FilterSpec, num: usize) -> Result<Vec<CaptureBlock>> {
        let tokens = Self::filter_tokens(filter);
        let filters = self.grammar.parse_filters(&tokens)?;
        info!(observatory = %self.name, filters = ?tokens, limit = num, "Querying archive");

        let records = self.engine.collect(filters, Vec::new(), num).await?;

        let blocks: Vec<CaptureBlock> = records
            .iter()
            .filter_map(|record| match CaptureBlock::from_record(&self.name, record) {
                Ok(block) => Some(block),
                Err(e) => {
                    warn!(observatory = %self.name, error = %e, "Skipping unreadable capture block");
                    None
                }
            })
            .collect();

        info!(
            observatory = %self.name,
            records = records.len(),
            capture_blocks = blocks.len(),
            "Archive query complete"
        );
        Ok(blocks)
    }
}
