//! Observatories command implementation

use crate::cli::{ObservatoriesArgs, ServiceArgs};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

#[derive(Debug, Serialize, Tabled)]
struct ObservatoryRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Latitude")]
    latitude: f64,
    #[tabled(rename = "Longitude")]
    longitude: f64,
    #[tabled(rename = "Elevation (m)")]
    elevation: f64,
    #[tabled(rename = "Min freq (MHz)")]
    min_freq: f64,
    #[tabled(rename = "Max freq (MHz)")]
    max_freq: f64,
}

pub fn execute(
    args: ObservatoriesArgs,
    service: &ServiceArgs,
    config_path: Option<&Path>,
    output: &OutputWriter,
) -> Result<()> {
    let config = load_config(config_path, super::service_overrides(service))?;
    let filter = super::filter_spec(&args.filter)?;
    let observatories = super::observatory_filter(&config);

    let names = observatories.select(&filter)?;
    let mut rows = Vec::with_capacity(names.len());
    for name in &names {
        let site = observatories.lookup(name)?;
        rows.push(ObservatoryRow {
            name: site.name.clone(),
            latitude: site.latitude,
            longitude: site.longitude,
            elevation: site.elevation,
            min_freq: site.min_freq,
            max_freq: site.max_freq,
        });
    }

    if rows.is_empty() {
        output.info("No observatories match the selection");
    }
    output.table(rows)
}
