//! Port trait definitions
//!
//! These traits define the external capabilities the pipeline consumes.
//! Adapters in the archive and pipeline crates implement them.

pub mod archive;
pub mod credentials;
pub mod satellite;

pub use archive::{ArchiveClient, ArchiveSource};
pub use credentials::CredentialProvider;
pub use satellite::{EphemerisSource, OrbitalElementSource, RfiCandidateSource};
