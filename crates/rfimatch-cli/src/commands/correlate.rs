//! Correlate command implementation

use crate::cli::{CorrelateArgs, ServiceArgs};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use rfimatch_core::config::CliConfigOverrides;
use rfimatch_core::models::Observation;
use rfimatch_core::time::format_iso_millis;
use rfimatch_geo::{format_dec_dms, format_ra_hms};
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;
use tokio_util::sync::CancellationToken;

/// One rendered observation, columns in result-set order
#[derive(Debug, Serialize, Tabled)]
pub struct ObservationRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Observation")]
    observation_id: String,
    #[tabled(rename = "Freq (MHz)")]
    frequency: String,
    #[tabled(rename = "BW (MHz)")]
    bandwidth: String,
    #[tabled(rename = "Dec")]
    declination: String,
    #[tabled(rename = "RA")]
    right_ascension: String,
    #[tabled(rename = "Begin")]
    begin: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Candidate RFI")]
    candidate_rfi: String,
}

impl From<&Observation> for ObservationRow {
    fn from(observation: &Observation) -> Self {
        let candidate_rfi = if observation.candidate_rfi.is_empty() {
            "-".to_string()
        } else {
            observation
                .candidate_rfi
                .iter()
                .map(|m| format!("{} ({:.3}°)", m.source_id, m.angular_distance_deg))
                .collect::<Vec<_>>()
                .join("\n")
        };

        Self {
            name: observation.name.clone(),
            observation_id: observation.observation_id.clone(),
            frequency: format!("{:.1}", observation.frequency_mhz),
            bandwidth: format!("{:.1}", observation.bandwidth_mhz),
            declination: format_dec_dms(observation.declination),
            right_ascension: format_ra_hms(observation.right_ascension),
            begin: format_iso_millis(&observation.begin),
            end: format_iso_millis(&observation.end),
            url: observation.url.clone(),
            candidate_rfi,
        }
    }
}

pub async fn execute(
    args: CorrelateArgs,
    service: &ServiceArgs,
    config_path: Option<&Path>,
    output: &OutputWriter,
    cancel: CancellationToken,
) -> Result<()> {
    let overrides = CliConfigOverrides {
        record_limit: args.limit,
        page_size: args.page_size,
        sample_count: args.samples,
        beamwidth_deg: args.beamwidth,
        candidate_scope: args.scope,
        ..super::service_overrides(service)
    };
    let config = load_config(config_path, overrides)?;
    let filter = super::filter_spec(&args.filter)?;
    let pipeline = super::build_pipeline(&config, &cancel);

    let observations = pipeline.run(&filter).await.context("Correlation failed")?;

    let flagged = observations.iter().filter(|o| !o.candidate_rfi.is_empty()).count();
    output.info(format!(
        "{} observations, {} with candidate RFI",
        observations.len(),
        flagged
    ));

    if output.is_json() {
        output.result(&observations)
    } else {
        output.table(observations.iter().map(ObservationRow::from).collect())
    }
}
