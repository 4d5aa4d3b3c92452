//! Config command implementation

use crate::cli::ServiceArgs;
use crate::config_loader::{config_file, load_config};
use crate::output::OutputWriter;
use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

/// Display order of configuration keys
const KEYS: [&str; 10] = [
    "archive_url",
    "token_path",
    "satellite_service_url",
    "registry_path",
    "page_size",
    "record_limit",
    "sample_count",
    "beamwidth_deg",
    "candidate_scope",
    "concurrency",
];

#[derive(Debug, Serialize, Tabled)]
struct ConfigRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Source")]
    source: String,
}

pub fn execute(service: &ServiceArgs, config_path: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let config = load_config(config_path, super::service_overrides(service))?;
    let inspection_map = config.to_inspection_map();

    if let Some(path) = config_file(config_path)? {
        output.info(format!("Config file: {}", path.display()));
    }
    output.section("Configuration Values");

    let rows: Vec<ConfigRow> = KEYS
        .iter()
        .filter_map(|key| {
            inspection_map.get(*key).map(|(value, source)| ConfigRow {
                key: key.to_string(),
                value: value.clone(),
                source: format!("{:?}", source),
            })
        })
        .collect();

    output.table(rows)
}
