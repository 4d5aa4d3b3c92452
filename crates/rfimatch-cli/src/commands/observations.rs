//! Observations command implementation

use crate::cli::{ObservationsArgs, ServiceArgs};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use rfimatch_core::config::CliConfigOverrides;
use std::path::Path;
use tokio_util::sync::CancellationToken;

pub async fn execute(
    args: ObservationsArgs,
    service: &ServiceArgs,
    config_path: Option<&Path>,
    output: &OutputWriter,
    cancel: CancellationToken,
) -> Result<()> {
    let overrides = CliConfigOverrides {
        record_limit: args.limit,
        page_size: args.page_size,
        ..super::service_overrides(service)
    };
    let config = load_config(config_path, overrides)?;
    let filter = super::filter_spec(&args.filter)?;
    let pipeline = super::build_pipeline(&config, &cancel);

    let names = pipeline.select(&filter)?;
    if names.is_empty() {
        output.info("No observatories match the selection");
        return output.table(Vec::<super::correlate::ObservationRow>::new());
    }

    let blocks = pipeline
        .collect(&filter, &names)
        .await
        .context("Failed to collect capture sessions")?;
    let observations = pipeline.expand(&blocks);

    output.info(format!(
        "{} capture sessions expanded into {} observations",
        blocks.len(),
        observations.len()
    ));

    if output.is_json() {
        output.result(&observations)
    } else {
        output.table(observations.iter().map(super::correlate::ObservationRow::from).collect())
    }
}
