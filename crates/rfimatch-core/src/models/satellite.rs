use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::observatory::ObservatoryRecord;
use crate::error::{Result, RfiMatchError};

/// Orbital-element record of one satellite (two-line element set plus name)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Satellite {
    pub name: String,
    pub norad_id: u32,
    pub line1: String,
    pub line2: String,
}

/// Parse three-line element text: a name line followed by the two element lines
///
/// Name lines may carry the `0 ` prefix used by some catalogs. Blank lines
/// between records are ignored.
pub fn parse_three_line_elements(text: &str) -> Result<Vec<Satellite>> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect();

    if lines.len() % 3 != 0 {
        return Err(RfiMatchError::InvalidRecord {
            reason: format!(
                "three-line element text has {} non-empty lines, expected a multiple of 3",
                lines.len()
            ),
        });
    }

    lines
        .chunks(3)
        .map(|chunk| {
            let name = chunk[0].trim();
            let name = name.strip_prefix("0 ").unwrap_or(name).trim().to_string();
            let line1 = chunk[1].trim();
            let line2 = chunk[2].trim();

            if !line1.starts_with("1 ") || !line2.starts_with("2 ") {
                return Err(RfiMatchError::InvalidRecord {
                    reason: format!("malformed element lines for satellite '{name}'"),
                });
            }

            let norad_id = line1
                .get(2..7)
                .and_then(|id| id.trim().parse::<u32>().ok())
                .ok_or_else(|| RfiMatchError::InvalidRecord {
                    reason: format!("missing catalog number for satellite '{name}'"),
                })?;

            Ok(Satellite {
                name,
                norad_id,
                line1: line1.to_string(),
                line2: line2.to_string(),
            })
        })
        .collect()
}

/// Which satellites the candidate lookup returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateScope {
    /// Satellites crossing the telescope's main beam
    #[default]
    MainBeam,

    /// Every satellite above the horizon during the window
    AboveHorizon,
}

impl std::str::FromStr for CandidateScope {
    type Err = RfiMatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "main_beam" | "mainbeam" => Ok(Self::MainBeam),
            "above_horizon" | "horizon" => Ok(Self::AboveHorizon),
            other => Err(RfiMatchError::ConfigInvalid {
                key: "candidate_scope".to_string(),
                reason: format!("unknown scope '{other}' (expected main_beam or above_horizon)"),
            }),
        }
    }
}

impl std::fmt::Display for CandidateScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MainBeam => write!(f, "main_beam"),
            Self::AboveHorizon => write!(f, "above_horizon"),
        }
    }
}

/// Parameters of one RFI-candidate lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRequest {
    pub observatory: ObservatoryRecord,
    pub beamwidth_deg: f64,
    pub frequency_mhz: f64,
    pub bandwidth_mhz: f64,
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub target_ra_deg: f64,
    pub target_dec_deg: f64,
    pub scope: CandidateScope,
}
