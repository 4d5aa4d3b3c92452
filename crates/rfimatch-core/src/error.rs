//! Error types for rfimatch

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RfiMatchError {
    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    #[error("Observatory registry unavailable: {reason}")]
    RegistryUnavailable { reason: String },

    // Query grammar errors
    #[error("Invalid filter '{token}': {reason}")]
    FilterSyntax { token: String, reason: String },

    #[error("Invalid sort '{token}': {reason}")]
    SortSyntax { token: String, reason: String },

    // Archive errors
    #[error("Archive query failed: {message}")]
    TransportQuery { message: String },

    #[error("Credential rejected: {reason}")]
    Credential { reason: String },

    #[error("No archive registered for observatory {name}")]
    UnknownArchive { name: String },

    #[error("Observatory not found in registry: {name}")]
    UnknownObservatory { name: String },

    #[error("Invalid archive record: {reason}")]
    InvalidRecord { reason: String },

    // Geometry errors
    #[error("Invalid range: {reason}")]
    InvalidRange { reason: String },

    #[error("Closest approach requested over an empty sample list")]
    EmptySamples,

    // Satellite capability errors
    #[error("RFI candidate lookup failed: {reason}")]
    CandidateLookup { reason: String },

    #[error("Ephemeris lookup failed: {reason}")]
    Ephemeris { reason: String },

    #[error("Operation cancelled")]
    Cancelled,

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RfiMatchError {
    /// Configuration-class errors are fatal at build time
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RfiMatchError::ConfigMissing { .. }
                | RfiMatchError::ConfigInvalid { .. }
                | RfiMatchError::RegistryUnavailable { .. }
        )
    }
}

impl From<serde_json::Error> for RfiMatchError {
    fn from(err: serde_json::Error) -> Self {
        RfiMatchError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RfiMatchError>;
