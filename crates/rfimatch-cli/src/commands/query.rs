//! Query command implementation

use crate::cli::{QueryArgs, ServiceArgs};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use futures::TryStreamExt;
use rfimatch_archive::{parse_filters, parse_sort, ArchiveQueryEngine};
use rfimatch_core::config::CliConfigOverrides;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub async fn execute(
    args: QueryArgs,
    service: &ServiceArgs,
    config_path: Option<&Path>,
    output: &OutputWriter,
    cancel: CancellationToken,
) -> Result<()> {
    let overrides = CliConfigOverrides {
        page_size: args.page_size,
        ..super::service_overrides(service)
    };
    let config = load_config(config_path, overrides)?;

    let filters = parse_filters(&args.filters)?;
    let sort = parse_sort(&args.sort)?;

    let engine = ArchiveQueryEngine::new(super::archive_client(&config))
        .with_page_size(config.page_size.value)
        .with_search(args.search)
        .with_cancellation(cancel);

    let records = engine.fetch_all(filters, sort, args.limit);
    let mut records = std::pin::pin!(records);

    let mut count = 0usize;
    while let Some(record) = records.try_next().await.context("Archive query failed")? {
        output.ndjson(&record)?;
        count += 1;
    }

    info!(records = count, "Query complete");
    Ok(())
}
