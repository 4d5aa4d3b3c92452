use clap::{Args, Parser, Subcommand};
use rfimatch_core::models::CandidateScope;
use std::path::PathBuf;

/// rfimatch - Flag radio observations at risk of satellite interference
#[derive(Parser, Debug)]
#[command(name = "rfimatch")]
#[command(about = "Correlate radio-telescope observations with passing satellites", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (TOML); defaults to ./rfimatch.toml when present
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub service: ServiceArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List observatories matching the selection criteria
    Observatories(ObservatoriesArgs),

    /// Run a raw archive query and print the records as NDJSON
    Query(QueryArgs),

    /// Fetch capture sessions and expand them into per-track observations
    Observations(ObservationsArgs),

    /// Run the full correlation pipeline
    Correlate(CorrelateArgs),

    /// List satellites in a three-line element file
    Catalog(CatalogArgs),

    /// Show the effective configuration and where each value came from
    Config,
}

/// Endpoints and files shared by every command
#[derive(Args, Debug, Default)]
pub struct ServiceArgs {
    /// Observation archive base URL
    #[arg(long, global = true, value_name = "URL")]
    pub archive_url: Option<String>,

    /// Satellite candidate/ephemeris service base URL
    #[arg(long, global = true, value_name = "URL")]
    pub satellite_service: Option<String>,

    /// JSON file holding the archive bearer token
    #[arg(long, global = true, value_name = "PATH")]
    pub token_path: Option<PathBuf>,

    /// Observatory registry CSV (built-in registry when omitted)
    #[arg(long, global = true, value_name = "PATH")]
    pub registry: Option<PathBuf>,

    /// Parallel observatory queries and proximity searches
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,
}

/// Observation selection criteria
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Latitude range in degrees
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true)]
    pub lat: Option<Vec<f64>>,

    /// Longitude range in degrees
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true)]
    pub lon: Option<Vec<f64>>,

    /// Frequency range in MHz
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
    pub freq: Option<Vec<f64>>,

    /// Window start (e.g., 2024-04-15T08:48:54.0)
    #[arg(long)]
    pub start: Option<String>,

    /// Window end (e.g., 2025-07-15T08:49:54.0)
    #[arg(long)]
    pub end: Option<String>,

    /// Query these observatories only (repeatable)
    #[arg(long = "observatory", short = 'o', value_name = "NAME")]
    pub observatories: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ObservatoriesArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Filter token `key=value` or `key:value` (repeatable)
    #[arg(long = "filter", short = 'f', value_name = "TOKEN")]
    pub filters: Vec<String>,

    /// Sort token `field:asc` or `field:desc` (repeatable)
    #[arg(long = "sort", short = 's', value_name = "TOKEN")]
    pub sort: Vec<String>,

    /// Free-text search expression
    #[arg(long, default_value = "*")]
    pub search: String,

    /// Maximum records to fetch
    #[arg(long, short = 'n', default_value = "25")]
    pub limit: usize,

    /// Records per page
    #[arg(long)]
    pub page_size: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ObservationsArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Capture sessions fetched per observatory
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Records per page
    #[arg(long)]
    pub page_size: Option<usize>,
}

#[derive(Args, Debug)]
pub struct CorrelateArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Capture sessions fetched per observatory
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Records per page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Ephemeris samples per observation window
    #[arg(long)]
    pub samples: Option<usize>,

    /// Telescope beamwidth in degrees
    #[arg(long)]
    pub beamwidth: Option<f64>,

    /// Candidate scope (main_beam or above_horizon)
    #[arg(long)]
    pub scope: Option<CandidateScope>,
}

#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Three-line element file
    pub path: PathBuf,

    /// Only list satellites whose name contains this text (case-insensitive)
    #[arg(long)]
    pub name: Option<String>,
}
