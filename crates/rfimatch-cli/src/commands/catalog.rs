//! Catalog command implementation

use crate::cli::CatalogArgs;
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use rfimatch_core::models::Satellite;
use rfimatch_pipeline::TleFileSource;
use serde::Serialize;
use tabled::Tabled;

#[derive(Debug, Serialize, Tabled)]
struct SatelliteRow {
    #[tabled(rename = "NORAD")]
    norad_id: u32,
    #[tabled(rename = "Name")]
    name: String,
}

pub async fn execute(args: CatalogArgs, output: &OutputWriter) -> Result<()> {
    let source = TleFileSource::new(&args.path);
    let satellites = source
        .load()
        .await
        .with_context(|| format!("Failed to read element file {}", args.path.display()))?;
    let total = satellites.len();

    let selected = select(satellites, args.name.as_deref());
    output.info(format!("{} of {} satellites", selected.len(), total));

    if output.is_json() {
        output.result(&selected)
    } else {
        output.table(
            selected
                .into_iter()
                .map(|s| SatelliteRow { norad_id: s.norad_id, name: s.name })
                .collect(),
        )
    }
}

fn select(satellites: Vec<Satellite>, name: Option<&str>) -> Vec<Satellite> {
    let Some(name) = name.map(str::to_lowercase) else {
        return satellites;
    };
    satellites
        .into_iter()
        .filter(|s| s.name.to_lowercase().contains(&name))
        .collect()
}
