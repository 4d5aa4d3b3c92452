use async_trait::async_trait;
use chrono::NaiveDate;
use rfimatch_core::error::{Result, RfiMatchError};
use rfimatch_core::models::{parse_three_line_elements, Satellite};
use rfimatch_core::ports::OrbitalElementSource;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Orbital elements read from a local three-line-element file
///
/// The file is treated as valid for any date range; epoch filtering is left
/// to whoever produced the file.
#[derive(Debug, Clone)]
pub struct TleFileSource {
    path: PathBuf,
}

impl TleFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Vec<Satellite>> {
        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            RfiMatchError::InvalidRecord {
                reason: format!("Failed to read element file {}: {}", self.path.display(), e),
            }
        })?;
        let satellites = parse_three_line_elements(&text)?;
        debug!(path = %self.path.display(), satellites = satellites.len(), "Loaded orbital elements");
        Ok(satellites)
    }
}

#[async_trait]
impl OrbitalElementSource for TleFileSource {
    async fn satellites(&self, begin: NaiveDate, end: NaiveDate) -> Result<Vec<Satellite>> {
        if begin > end {
            return Err(RfiMatchError::InvalidRange {
                reason: format!("element range begins {begin} after it ends {end}"),
            });
        }
        self.load().await
    }
}
