pub mod filter;
pub mod observation;
pub mod observatory;
pub mod query;
pub mod satellite;

pub use filter::{FilterSpec, FilterSpecBuilder};
pub use observation::{normalize_ra_deg, CaptureBlock, Observation, RfiMatch, SkyPosition, Track};
pub use observatory::{ObservatoryRecord, ObservatoryRegistry};
pub use query::{
    FilterValue, PageRequest, QueryFilter, RawObservationPage, RawRecord, SortDirection,
    SortSpec,
};
pub use satellite::{parse_three_line_elements, CandidateRequest, CandidateScope, Satellite};
