use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::Result;
use crate::models::{CandidateRequest, Satellite, SkyPosition};

/// Port for looking up satellites that may interfere with an observation
#[async_trait]
pub trait RfiCandidateSource: Send + Sync {
    /// Satellites whose predicted geometry intersects the requested footprint,
    /// in the order the capability ranks them
    async fn candidates(&self, request: &CandidateRequest) -> Result<Vec<Satellite>>;
}

/// Port for computing geocentric sky positions of a satellite
#[async_trait]
pub trait EphemerisSource: Send + Sync {
    /// One position per timestamp, in timestamp order
    async fn positions(
        &self,
        satellite: &Satellite,
        timestamps: &[DateTime<Utc>],
    ) -> Result<Vec<SkyPosition>>;
}

/// Port for retrieving orbital elements valid over a date range
#[async_trait]
pub trait OrbitalElementSource: Send + Sync {
    async fn satellites(&self, begin: NaiveDate, end: NaiveDate) -> Result<Vec<Satellite>>;
}
