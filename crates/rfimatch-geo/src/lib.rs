//! rfimatch Geo - Sky geometry and site containment
//!
//! Pure functions with no I/O: RA/Dec unit vectors, angular separation,
//! closest-approach search over sampled trajectories, sexagesimal
//! formatting, and latitude/longitude box tests for observatory sites.

pub mod region;
pub mod sexagesimal;
pub mod sky;

pub use region::LatLonBox;
pub use sexagesimal::{format_dec_dms, format_ra_hms, normalize_ra_deg, parse_dec_dms, parse_ra_hms};
pub use sky::{
    angular_distance_deg, closest_approach, evenly_spaced_timestamps, to_unit_vector,
    to_unit_vectors, ClosestApproach,
};
