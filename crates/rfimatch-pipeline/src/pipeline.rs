use futures::stream::{self, StreamExt, TryStreamExt};
use rfimatch_core::config::LayeredConfig;
use rfimatch_core::error::{Result, RfiMatchError};
use rfimatch_core::models::{
    CandidateRequest, CandidateScope, CaptureBlock, FilterSpec, Observation, RfiMatch, Satellite,
};
use rfimatch_core::ports::{EphemerisSource, RfiCandidateSource};
use rfimatch_geo::{closest_approach, evenly_spaced_timestamps};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::observatory_filter::ObservatoryFilter;
use crate::registry::ArchiveRegistry;
use crate::track::TrackExtractor;

/// Tunables for one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    /// Capture sessions fetched per observatory
    pub record_limit: usize,
    /// Ephemeris samples per (observation, candidate) pair
    pub sample_count: usize,
    pub beamwidth_deg: f64,
    pub concurrency: usize,
    pub candidate_scope: CandidateScope,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            record_limit: 25,
            sample_count: 20,
            beamwidth_deg: 3.0,
            concurrency: 8,
            candidate_scope: CandidateScope::MainBeam,
        }
    }
}

impl PipelineSettings {
    pub fn from_config(config: &LayeredConfig) -> Self {
        Self {
            record_limit: config.record_limit.value,
            sample_count: config.sample_count.value,
            beamwidth_deg: config.beamwidth_deg.value,
            concurrency: config.concurrency.value.max(1),
            candidate_scope: config.candidate_scope.value,
        }
    }
}

/// An observation paired with the satellites that may interfere with it
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSet {
    pub observation: Observation,
    pub candidates: Vec<Satellite>,
}

/// Observation/RFI correlation pipeline
///
/// Stages run top-down: observatory selection, archive collection, track
/// expansion, candidate lookup, then closest-approach resolution. Output
/// order always follows input order.
pub struct CorrelationPipeline<R, E>
where
    R: RfiCandidateSource,
    E: EphemerisSource,
{
    observatories: ObservatoryFilter,
    archives: ArchiveRegistry,
    candidates: R,
    ephemeris: E,
    extractor: TrackExtractor,
    settings: PipelineSettings,
    cancel: CancellationToken,
}

impl<R, E> CorrelationPipeline<R, E>
where
    R: RfiCandidateSource,
    E: EphemerisSource,
{
    /// Create a new correlation pipeline
    pub fn new(
        observatories: ObservatoryFilter,
        archives: ArchiveRegistry,
        candidates: R,
        ephemeris: E,
    ) -> Self {
        Self {
            observatories,
            archives,
            candidates,
            ephemeris,
            extractor: TrackExtractor::new(),
            settings: PipelineSettings::default(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Abort with `Cancelled` at the next observatory, observation or candidate
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Run every stage for a filter spec
    pub async fn run(&self, filter: &FilterSpec) -> Result<Vec<Observation>> {
        let observatories = self.select(filter)?;
        info!(observatories = ?observatories, "Selected observatories");

        let blocks = self.collect(filter, &observatories).await?;
        let observations = self.expand(&blocks);
        info!(
            capture_blocks = blocks.len(),
            observations = observations.len(),
            "Expanded capture blocks into tracks"
        );

        let candidate_sets = self.extend_observations_with_rfi(observations).await?;
        let resolved = self.resolve_proximity(candidate_sets).await?;

        let matches: usize = resolved.iter().map(|o| o.candidate_rfi.len()).sum();
        info!(observations = resolved.len(), matches, "Correlation complete");
        Ok(resolved)
    }

    pub fn select(&self, filter: &FilterSpec) -> Result<Vec<String>> {
        self.observatories.select(filter)
    }

    /// Fetch capture sessions from each observatory's archive, concatenated in
    /// observatory order
    ///
    /// Observatories without a registered archive are skipped. An archive
    /// failure aborts the collection.
    pub async fn collect(
        &self,
        filter: &FilterSpec,
        observatories: &[String],
    ) -> Result<Vec<CaptureBlock>> {
        let per_observatory: Vec<Vec<CaptureBlock>> = stream::iter(observatories)
            .map(|name| self.collect_one(filter, name))
            .buffered(self.settings.concurrency.max(1))
            .try_collect()
            .await?;

        Ok(per_observatory.into_iter().flatten().collect())
    }

    async fn collect_one(&self, filter: &FilterSpec, name: &str) -> Result<Vec<CaptureBlock>> {
        self.check_cancelled()?;

        let source = match self.archives.get(name) {
            Ok(source) => source,
            Err(e) => {
                warn!(observatory = %name, error = %e, "Skipping observatory");
                return Ok(Vec::new());
            }
        };

        info!(observatory = %name, "Fetching observations");
        source.get_observations(filter, self.settings.record_limit).await
    }

    /// Expand capture sessions into one observation per track
    ///
    /// Sessions with no tracks or an unreadable start time contribute nothing.
    pub fn expand(&self, blocks: &[CaptureBlock]) -> Vec<Observation> {
        blocks
            .iter()
            .flat_map(|block| match self.extractor.observations(block) {
                Ok(observations) => observations,
                Err(e) => {
                    warn!(observation = %block.observation_id, error = %e, "Skipping capture block");
                    Vec::new()
                }
            })
            .collect()
    }

    /// Ask the candidate capability which satellites may interfere with each
    /// observation
    ///
    /// Degenerate windows get no candidates without a lookup. A failed lookup
    /// is logged and yields no candidates for that observation only.
    pub async fn extend_observations_with_rfi(
        &self,
        observations: Vec<Observation>,
    ) -> Result<Vec<CandidateSet>> {
        stream::iter(observations)
            .map(|observation| self.fetch_candidates(observation))
            .buffered(self.settings.concurrency.max(1))
            .try_collect()
            .await
    }

    async fn fetch_candidates(&self, observation: Observation) -> Result<CandidateSet> {
        self.check_cancelled()?;

        if observation.is_degenerate() {
            debug!(
                observation = %observation.observation_id,
                begin = %observation.begin,
                end = %observation.end,
                "Degenerate window, no candidate lookup"
            );
            return Ok(CandidateSet { observation, candidates: Vec::new() });
        }

        let candidates = match self.candidate_request(&observation) {
            Ok(request) => match self.candidates.candidates(&request).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!(observation = %observation.observation_id, error = %e, "Candidate lookup failed");
                    Vec::new()
                }
            },
            Err(e) => {
                warn!(observation = %observation.observation_id, error = %e, "Cannot build candidate request");
                Vec::new()
            }
        };

        debug!(
            observation = %observation.observation_id,
            candidates = candidates.len(),
            "Candidates fetched"
        );
        Ok(CandidateSet { observation, candidates })
    }

    fn candidate_request(&self, observation: &Observation) -> Result<CandidateRequest> {
        let site = self.observatories.lookup(&observation.name)?;
        Ok(CandidateRequest {
            observatory: site.clone(),
            beamwidth_deg: self.settings.beamwidth_deg,
            frequency_mhz: observation.frequency_mhz,
            bandwidth_mhz: observation.bandwidth_mhz,
            begin: observation.begin,
            end: observation.end,
            target_ra_deg: observation.right_ascension,
            target_dec_deg: observation.declination,
            scope: self.settings.candidate_scope,
        })
    }

    /// Attach the closest sampled approach of every candidate to its observation
    ///
    /// Matches keep candidate order. A candidate whose positions cannot be
    /// sampled is logged and left out.
    pub async fn resolve_proximity(&self, sets: Vec<CandidateSet>) -> Result<Vec<Observation>> {
        stream::iter(sets)
            .map(|set| self.resolve_one(set))
            .buffered(self.settings.concurrency.max(1))
            .try_collect()
            .await
    }

    async fn resolve_one(&self, set: CandidateSet) -> Result<Observation> {
        let CandidateSet { mut observation, candidates } = set;
        if candidates.is_empty() {
            return Ok(observation);
        }

        let timestamps = match evenly_spaced_timestamps(
            observation.begin,
            observation.end,
            self.settings.sample_count,
        ) {
            Ok(timestamps) => timestamps,
            Err(e) => {
                warn!(observation = %observation.observation_id, error = %e, "Cannot sample window");
                return Ok(observation);
            }
        };

        for satellite in &candidates {
            self.check_cancelled()?;
            match self.closest_match(&observation, satellite, &timestamps).await {
                Ok(found) => observation.candidate_rfi.push(found),
                Err(e) => warn!(
                    observation = %observation.observation_id,
                    satellite = %satellite.name,
                    error = %e,
                    "Proximity search failed"
                ),
            }
        }

        Ok(observation)
    }

    async fn closest_match(
        &self,
        observation: &Observation,
        satellite: &Satellite,
        timestamps: &[chrono::DateTime<chrono::Utc>],
    ) -> Result<RfiMatch> {
        let positions = self.ephemeris.positions(satellite, timestamps).await?;
        let closest =
            closest_approach(&positions, observation.right_ascension, observation.declination)?;

        Ok(RfiMatch {
            source_id: satellite.name.clone(),
            closest_timestamp: closest.timestamp,
            ra_deg: closest.ra_deg,
            dec_deg: closest.dec_deg,
            angular_distance_deg: closest.angular_distance_deg,
        })
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(RfiMatchError::Cancelled)
        } else {
            Ok(())
        }
    }
}
