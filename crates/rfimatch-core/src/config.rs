use crate::error::{Result, RfiMatchError};
use crate::models::CandidateScope;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has at least the current precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() >= self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for rfimatch
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// Records requested per archive round trip
    pub page_size: ConfigValue<usize>,
    /// Records fetched per observatory
    pub record_limit: ConfigValue<usize>,
    /// Ephemeris samples per (observation, candidate) pair
    pub sample_count: ConfigValue<usize>,
    pub beamwidth_deg: ConfigValue<f64>,
    /// Parallel observatory queries and per-observation proximity searches
    pub concurrency: ConfigValue<usize>,
    pub candidate_scope: ConfigValue<CandidateScope>,
    pub archive_url: ConfigValue<String>,
    pub satellite_service_url: ConfigValue<String>,
    pub token_path: ConfigValue<PathBuf>,
    /// Observatory registry CSV; the built-in registry is used when unset
    pub registry_path: ConfigValue<Option<PathBuf>>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            page_size: ConfigValue::new(25, ConfigSource::Default),
            record_limit: ConfigValue::new(25, ConfigSource::Default),
            sample_count: ConfigValue::new(20, ConfigSource::Default),
            beamwidth_deg: ConfigValue::new(3.0, ConfigSource::Default),
            concurrency: ConfigValue::new(8, ConfigSource::Default),
            candidate_scope: ConfigValue::new(CandidateScope::MainBeam, ConfigSource::Default),
            archive_url: ConfigValue::new(
                "https://archive.sarao.ac.za".to_string(),
                ConfigSource::Default,
            ),
            satellite_service_url: ConfigValue::new(
                "http://localhost:8080".to_string(),
                ConfigSource::Default,
            ),
            token_path: ConfigValue::new(PathBuf::from("tokens.json"), ConfigSource::Default),
            registry_path: ConfigValue::new(None, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| RfiMatchError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| RfiMatchError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(page_size) = file_config.page_size {
            self.page_size.update(page_size, ConfigSource::File);
        }
        if let Some(record_limit) = file_config.record_limit {
            self.record_limit.update(record_limit, ConfigSource::File);
        }
        if let Some(sample_count) = file_config.sample_count {
            self.sample_count.update(sample_count, ConfigSource::File);
        }
        if let Some(beamwidth) = file_config.beamwidth_deg {
            self.beamwidth_deg.update(beamwidth, ConfigSource::File);
        }
        if let Some(concurrency) = file_config.concurrency {
            self.concurrency.update(concurrency, ConfigSource::File);
        }
        if let Some(scope) = file_config.candidate_scope {
            self.candidate_scope.update(scope, ConfigSource::File);
        }
        if let Some(url) = file_config.archive_url {
            self.archive_url.update(url, ConfigSource::File);
        }
        if let Some(url) = file_config.satellite_service_url {
            self.satellite_service_url.update(url, ConfigSource::File);
        }
        if let Some(path) = file_config.token_path {
            self.token_path.update(path, ConfigSource::File);
        }
        if let Some(path) = file_config.registry_path {
            self.registry_path.update(Some(path), ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from `RFIMATCH_*` environment variables
    ///
    /// Unparseable values are logged and ignored.
    pub fn load_from_env(mut self) -> Self {
        if let Some(v) = env_value("RFIMATCH_PAGE_SIZE", "positive integer") {
            self.page_size.update(v, ConfigSource::Environment);
        }
        if let Some(v) = env_value("RFIMATCH_RECORD_LIMIT", "positive integer") {
            self.record_limit.update(v, ConfigSource::Environment);
        }
        if let Some(v) = env_value("RFIMATCH_SAMPLE_COUNT", "integer >= 2") {
            self.sample_count.update(v, ConfigSource::Environment);
        }
        if let Some(v) = env_value("RFIMATCH_BEAMWIDTH_DEG", "angle in degrees") {
            self.beamwidth_deg.update(v, ConfigSource::Environment);
        }
        if let Some(v) = env_value("RFIMATCH_CONCURRENCY", "positive integer") {
            self.concurrency.update(v, ConfigSource::Environment);
        }
        if let Some(v) = env_value("RFIMATCH_CANDIDATE_SCOPE", "main_beam or above_horizon") {
            self.candidate_scope.update(v, ConfigSource::Environment);
        }
        if let Ok(url) = env::var("RFIMATCH_ARCHIVE_URL") {
            self.archive_url.update(url, ConfigSource::Environment);
        }
        if let Ok(url) = env::var("RFIMATCH_SATELLITE_SERVICE_URL") {
            self.satellite_service_url.update(url, ConfigSource::Environment);
        }
        if let Ok(path) = env::var("RFIMATCH_TOKEN_PATH") {
            self.token_path.update(PathBuf::from(path), ConfigSource::Environment);
        }
        if let Ok(path) = env::var("RFIMATCH_REGISTRY_PATH") {
            self.registry_path.update(Some(PathBuf::from(path)), ConfigSource::Environment);
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(page_size) = overrides.page_size {
            self.page_size.update(page_size, ConfigSource::Cli);
        }
        if let Some(record_limit) = overrides.record_limit {
            self.record_limit.update(record_limit, ConfigSource::Cli);
        }
        if let Some(sample_count) = overrides.sample_count {
            self.sample_count.update(sample_count, ConfigSource::Cli);
        }
        if let Some(beamwidth) = overrides.beamwidth_deg {
            self.beamwidth_deg.update(beamwidth, ConfigSource::Cli);
        }
        if let Some(concurrency) = overrides.concurrency {
            self.concurrency.update(concurrency, ConfigSource::Cli);
        }
        if let Some(scope) = overrides.candidate_scope {
            self.candidate_scope.update(scope, ConfigSource::Cli);
        }
        if let Some(url) = overrides.archive_url {
            self.archive_url.update(url, ConfigSource::Cli);
        }
        if let Some(url) = overrides.satellite_service_url {
            self.satellite_service_url.update(url, ConfigSource::Cli);
        }
        if let Some(path) = overrides.token_path {
            self.token_path.update(path, ConfigSource::Cli);
        }
        if let Some(path) = overrides.registry_path {
            self.registry_path.update(Some(path), ConfigSource::Cli);
        }
    }

    /// Reject values no pipeline stage can run with
    pub fn validate(&self) -> Result<()> {
        let invalid = |key: &str, reason: &str| RfiMatchError::ConfigInvalid {
            key: key.to_string(),
            reason: reason.to_string(),
        };

        if self.page_size.value == 0 {
            return Err(invalid("page_size", "must be at least 1"));
        }
        if self.record_limit.value == 0 {
            return Err(invalid("record_limit", "must be at least 1"));
        }
        if self.sample_count.value < 2 {
            return Err(invalid("sample_count", "must be at least 2"));
        }
        if self.concurrency.value == 0 {
            return Err(invalid("concurrency", "must be at least 1"));
        }
        if self.beamwidth_deg.value.is_nan() || self.beamwidth_deg.value <= 0.0 {
            return Err(invalid("beamwidth_deg", "must be a positive angle"));
        }
        if self.archive_url.value.trim().is_empty() {
            return Err(RfiMatchError::ConfigMissing { key: "archive_url".to_string() });
        }

        Ok(())
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "page_size".to_string(),
            (self.page_size.value.to_string(), self.page_size.source),
        );
        map.insert(
            "record_limit".to_string(),
            (self.record_limit.value.to_string(), self.record_limit.source),
        );
        map.insert(
            "sample_count".to_string(),
            (self.sample_count.value.to_string(), self.sample_count.source),
        );
        map.insert(
            "beamwidth_deg".to_string(),
            (self.beamwidth_deg.value.to_string(), self.beamwidth_deg.source),
        );
        map.insert(
            "concurrency".to_string(),
            (self.concurrency.value.to_string(), self.concurrency.source),
        );
        map.insert(
            "candidate_scope".to_string(),
            (self.candidate_scope.value.to_string(), self.candidate_scope.source),
        );
        map.insert(
            "archive_url".to_string(),
            (self.archive_url.value.clone(), self.archive_url.source),
        );
        map.insert(
            "satellite_service_url".to_string(),
            (self.satellite_service_url.value.clone(), self.satellite_service_url.source),
        );
        map.insert(
            "token_path".to_string(),
            (self.token_path.value.display().to_string(), self.token_path.source),
        );
        map.insert(
            "registry_path".to_string(),
            (
                self.registry_path
                    .value
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<built-in>".to_string()),
                self.registry_path.source,
            ),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    page_size: Option<usize>,
    record_limit: Option<usize>,
    sample_count: Option<usize>,
    beamwidth_deg: Option<f64>,
    concurrency: Option<usize>,
    candidate_scope: Option<CandidateScope>,
    archive_url: Option<String>,
    satellite_service_url: Option<String>,
    token_path: Option<PathBuf>,
    registry_path: Option<PathBuf>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub page_size: Option<usize>,
    pub record_limit: Option<usize>,
    pub sample_count: Option<usize>,
    pub beamwidth_deg: Option<f64>,
    pub concurrency: Option<usize>,
    pub candidate_scope: Option<CandidateScope>,
    pub archive_url: Option<String>,
    pub satellite_service_url: Option<String>,
    pub token_path: Option<PathBuf>,
    pub registry_path: Option<PathBuf>,
}

fn env_value<T: FromStr>(key: &str, expected: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Invalid {} value '{}': expected {}", key, raw, expected);
            None
        }
    }
}
