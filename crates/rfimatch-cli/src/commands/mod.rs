//! Command implementations

mod catalog;
mod config;
mod correlate;
mod observations;
mod observatories;
mod query;

use crate::cli::{Cli, Commands, FilterArgs, ServiceArgs};
use crate::output::OutputWriter;
use anyhow::Result;
use rfimatch_archive::{ArchiveQueryEngine, HttpArchiveClient, MeerkatArchive, TokenFile};
use rfimatch_core::config::{CliConfigOverrides, LayeredConfig};
use rfimatch_core::models::{FilterSpec, ObservatoryRegistry};
use rfimatch_pipeline::{
    ArchiveRegistry, CorrelationPipeline, HttpSatelliteService, ObservatoryFilter,
    PipelineSettings,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Execute a CLI command
pub async fn execute(cli: Cli, cancel: CancellationToken) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Observatories(args) => {
            observatories::execute(args, &cli.service, config_path, &output)
        }
        Commands::Query(args) => {
            query::execute(args, &cli.service, config_path, &output, cancel).await
        }
        Commands::Observations(args) => {
            observations::execute(args, &cli.service, config_path, &output, cancel).await
        }
        Commands::Correlate(args) => {
            correlate::execute(args, &cli.service, config_path, &output, cancel).await
        }
        Commands::Catalog(args) => catalog::execute(args, &output).await,
        Commands::Config => config::execute(&cli.service, config_path, &output),
    }
}

/// Overrides shared by every command
fn service_overrides(service: &ServiceArgs) -> CliConfigOverrides {
    CliConfigOverrides {
        archive_url: service.archive_url.clone(),
        satellite_service_url: service.satellite_service.clone(),
        token_path: service.token_path.clone(),
        registry_path: service.registry.clone(),
        concurrency: service.concurrency,
        ..CliConfigOverrides::default()
    }
}

/// Build a validated filter spec from command-line criteria
fn filter_spec(args: &FilterArgs) -> Result<FilterSpec> {
    let mut builder = FilterSpec::builder();

    if let Some(lat) = range(args.lat.as_deref()) {
        builder = builder.latitude(lat)?;
    }
    if let Some(lon) = range(args.lon.as_deref()) {
        builder = builder.longitude(lon)?;
    }
    if let Some(freq) = range(args.freq.as_deref()) {
        builder = builder.frequencies(freq)?;
    }
    if let Some(start) = &args.start {
        builder = builder.start_time(start)?;
    }
    if let Some(end) = &args.end {
        builder = builder.end_time(end)?;
    }

    Ok(builder.observatories(&args.observatories).build()?)
}

fn range(values: Option<&[f64]>) -> Option<[f64; 2]> {
    match values {
        Some([min, max]) => Some([*min, *max]),
        _ => None,
    }
}

fn observatory_filter(config: &LayeredConfig) -> ObservatoryFilter {
    let loaded = match &config.registry_path.value {
        Some(path) => ObservatoryRegistry::from_path(path),
        None => ObservatoryRegistry::builtin(),
    };
    ObservatoryFilter::from_load(loaded)
}

fn archive_client(config: &LayeredConfig) -> HttpArchiveClient {
    let credentials = Arc::new(TokenFile::new(config.token_path.value.clone()));
    HttpArchiveClient::new(config.archive_url.value.clone(), credentials)
}

/// Every archive the CLI knows how to query, keyed by observatory
fn archive_registry(config: &LayeredConfig, cancel: &CancellationToken) -> ArchiveRegistry {
    let engine = ArchiveQueryEngine::new(archive_client(config))
        .with_page_size(config.page_size.value)
        .with_cancellation(cancel.clone());

    ArchiveRegistry::new().with_source(Arc::new(MeerkatArchive::new(engine)))
}

type ServicePipeline = CorrelationPipeline<HttpSatelliteService, HttpSatelliteService>;

fn build_pipeline(config: &LayeredConfig, cancel: &CancellationToken) -> ServicePipeline {
    let service_url = &config.satellite_service_url.value;

    CorrelationPipeline::new(
        observatory_filter(config),
        archive_registry(config, cancel),
        HttpSatelliteService::new(service_url.clone()),
        HttpSatelliteService::new(service_url.clone()),
    )
    .with_settings(PipelineSettings::from_config(config))
    .with_cancellation(cancel.clone())
}
