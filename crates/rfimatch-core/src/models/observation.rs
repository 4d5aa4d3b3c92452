use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::query::RawRecord;
use crate::error::{Result, RfiMatchError};
use crate::time::parse_utc;

/// Typed view of one archived capture session
///
/// Field names follow the archive's record schema so a raw JSON record can
/// be deserialized directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureBlock {
    /// Observatory the record was fetched for (set by the archive source)
    #[serde(default)]
    pub observatory: String,

    #[serde(rename = "CaptureBlockId", deserialize_with = "de_string_or_number")]
    pub observation_id: String,

    #[serde(rename = "StartTime")]
    pub start_time: String,

    #[serde(rename = "MinFreq", default, deserialize_with = "de_lenient_f64")]
    pub min_freq_hz: f64,

    #[serde(rename = "MaxFreq", default, deserialize_with = "de_lenient_f64")]
    pub max_freq_hz: f64,

    #[serde(rename = "Bandwidth", default, deserialize_with = "de_lenient_f64")]
    pub bandwidth_hz: f64,

    #[serde(rename = "Targets", default)]
    pub targets: Vec<String>,

    /// Parallel to `targets`; each entry is a `"dec,ra"` string in degrees
    #[serde(rename = "TargetCoordinates", default)]
    pub target_coordinates: Vec<String>,

    #[serde(rename = "ScanLog", default)]
    pub scan_log: String,

    #[serde(rename = "rdb", default)]
    pub url: String,

    #[serde(rename = "Description", default)]
    pub description: Option<String>,
}

impl CaptureBlock {
    /// Convert a raw archive record, tagging it with its observatory
    ///
    /// Records that only carry the archive's internal `id` use it as the
    /// observation id.
    pub fn from_record(observatory: &str, record: &RawRecord) -> Result<Self> {
        let mut record = record.clone();
        if let Some(fields) = record.as_object_mut() {
            if !fields.contains_key("CaptureBlockId") {
                if let Some(id) = fields.get("id").cloned() {
                    fields.insert("CaptureBlockId".to_string(), id);
                }
            }
        }

        let mut block: CaptureBlock =
            serde_json::from_value(record).map_err(|e| RfiMatchError::InvalidRecord {
                reason: e.to_string(),
            })?;
        block.observatory = observatory.to_string();
        Ok(block)
    }

    /// Session start as a UTC instant
    pub fn start_time_utc(&self) -> Result<DateTime<Utc>> {
        parse_utc(&self.start_time).ok_or_else(|| RfiMatchError::InvalidRecord {
            reason: format!(
                "capture block {} has an unreadable StartTime '{}'",
                self.observation_id, self.start_time
            ),
        })
    }

    /// Centre of the recorded band in MHz
    pub fn frequency_mhz(&self) -> f64 {
        (self.min_freq_hz + self.max_freq_hz) / 2.0 / 1e6
    }

    pub fn bandwidth_mhz(&self) -> f64 {
        self.bandwidth_hz / 1e6
    }
}

/// One fixed-pointing interval of a capture session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub track_index: u32,
    pub target_id: String,
    pub declination_deg: f64,
    pub right_ascension_deg: f64,
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Sampled sky position of a moving source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyPosition {
    pub timestamp: DateTime<Utc>,
    pub ra_deg: f64,
    pub dec_deg: f64,
}

/// Closest sampled approach of one candidate source to an observation target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RfiMatch {
    pub source_id: String,
    pub closest_timestamp: DateTime<Utc>,
    pub ra_deg: f64,
    pub dec_deg: f64,
    pub angular_distance_deg: f64,
}

/// Canonical observation row: archive metadata merged with one track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub name: String,
    pub observation_id: String,
    pub frequency_mhz: f64,
    pub bandwidth_mhz: f64,
    pub declination: f64,

    /// Always within [0, 360)
    pub right_ascension: f64,
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub url: String,
    pub target_id: String,
    pub candidate_rfi: Vec<RfiMatch>,
}

impl Observation {
    pub fn from_track(block: &CaptureBlock, track: &Track) -> Self {
        Self {
            name: block.observatory.clone(),
            observation_id: block.observation_id.clone(),
            frequency_mhz: block.frequency_mhz(),
            bandwidth_mhz: block.bandwidth_mhz(),
            declination: track.declination_deg,
            right_ascension: normalize_ra_deg(track.right_ascension_deg),
            begin: track.begin,
            end: track.end,
            url: block.url.clone(),
            target_id: track.target_id.clone(),
            candidate_rfi: Vec::new(),
        }
    }

    /// Window with no positive duration; never sent to the candidate lookup
    pub fn is_degenerate(&self) -> bool {
        self.begin >= self.end
    }
}

/// Wrap a right ascension into [0, 360)
pub fn normalize_ra_deg(ra_deg: f64) -> f64 {
    let wrapped = ra_deg.rem_euclid(360.0);
    // rem_euclid of a tiny negative value rounds up to 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

fn de_lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn de_string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn record() -> RawRecord {
        json!({
            "CaptureBlockId": "1719478194",
            "StartTime": "2024-06-27T08:49:54Z",
            "MinFreq": 856000000.0,
            "MaxFreq": "1712000000",
            "Bandwidth": 856000000,
            "Targets": ["J1939-6342", "PKS 1934-63"],
            "TargetCoordinates": ["-63.71,294.85", "-63.71,294.85"],
            "ScanLog": "",
            "rdb": "https://archive.example/1719478194/1719478194_sdp_l0.full.rdb"
        })
    }

    #[test]
    fn test_capture_block_from_record() {
        let block = CaptureBlock::from_record("MEERKAT", &record()).unwrap();
        assert_eq!(block.observatory, "MEERKAT");
        assert_eq!(block.observation_id, "1719478194");
        assert_eq!(block.targets.len(), 2);
        assert!((block.frequency_mhz() - 1284.0).abs() < 1e-9);
        assert!((block.bandwidth_mhz() - 856.0).abs() < 1e-9);
        assert_eq!(
            block.start_time_utc().unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 27, 8, 49, 54).unwrap()
        );
    }

    #[test]
    fn test_numeric_id_is_accepted() {
        let block = CaptureBlock::from_record("MEERKAT", &json!({
            "id": 42,
            "StartTime": "2024-06-27T08:49:54Z"
        }))
        .unwrap();
        assert_eq!(block.observation_id, "42");
        assert!(block.targets.is_empty());
    }

    #[test]
    fn test_record_without_start_time_is_rejected() {
        let err = CaptureBlock::from_record("MEERKAT", &json!({"CaptureBlockId": "1"}))
            .unwrap_err();
        assert!(matches!(err, RfiMatchError::InvalidRecord { .. }));
    }

    #[test]
    fn test_observation_from_track_normalizes_ra() {
        let block = CaptureBlock::from_record("MEERKAT", &record()).unwrap();
        let begin = Utc.with_ymd_and_hms(2024, 6, 27, 9, 0, 0).unwrap();
        let track = Track {
            track_index: 3,
            target_id: "J1939-6342".into(),
            declination_deg: -63.71,
            right_ascension_deg: -65.15,
            begin,
            end: begin,
        };

        let obs = Observation::from_track(&block, &track);
        assert!((obs.right_ascension - 294.85).abs() < 1e-9);
        assert_eq!(obs.name, "MEERKAT");
        assert!(obs.candidate_rfi.is_empty());
        assert!(obs.is_degenerate());
    }

    #[test]
    fn test_tiny_negative_ra_wraps_to_zero() {
        let block = CaptureBlock::from_record("MEERKAT", &record()).unwrap();
        let begin = Utc.with_ymd_and_hms(2024, 6, 27, 9, 0, 0).unwrap();
        let track = Track {
            track_index: 0,
            target_id: "3C286".into(),
            declination_deg: 30.5,
            right_ascension_deg: -1e-14,
            begin,
            end: begin,
        };

        let obs = Observation::from_track(&block, &track);
        assert_eq!(obs.right_ascension, 0.0);
        assert_eq!(normalize_ra_deg(-1e-14), 0.0);
        assert_eq!(normalize_ra_deg(-90.0), 270.0);
    }
}
