//! rfimatch Pipeline - Observation/RFI correlation
//!
//! Selects observatories, collects capture sessions from their archives,
//! expands scan logs into per-track observations and resolves each
//! candidate satellite's closest approach to the observed target.

pub mod observatory_filter;
pub mod pipeline;
pub mod registry;
pub mod satellite_service;
pub mod tle;
pub mod track;

pub use observatory_filter::ObservatoryFilter;
pub use pipeline::{CandidateSet, CorrelationPipeline, PipelineSettings};
pub use registry::ArchiveRegistry;
pub use satellite_service::HttpSatelliteService;
pub use tle::TleFileSource;
pub use track::{TargetLookup, TrackExtractor};
