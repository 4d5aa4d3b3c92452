use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rfimatch_core::error::{Result, RfiMatchError};
use rfimatch_core::models::{CandidateRequest, Satellite, SkyPosition};
use rfimatch_core::ports::{EphemerisSource, RfiCandidateSource};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Satellite service reached over HTTP
///
/// One service answers both questions the pipeline asks: which satellites may
/// cross an observation (`POST /candidates`) and where a satellite sits on the
/// sky at given instants (`POST /ephemeris`).
pub struct HttpSatelliteService {
    /// Base URL of the service (e.g., "http://localhost:8080")
    base_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpSatelliteService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Create with default localhost URL
    pub fn localhost() -> Self {
        Self::new("http://localhost:8080")
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> std::result::Result<T, String>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| format!("Failed to reach satellite service at {}: {}", self.base_url, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(format!("Satellite service error ({}): {}", status, error_text));
        }

        response
            .json()
            .await
            .map_err(|e| format!("Failed to parse satellite service response: {}", e))
    }
}

#[async_trait]
impl RfiCandidateSource for HttpSatelliteService {
    async fn candidates(&self, request: &CandidateRequest) -> Result<Vec<Satellite>> {
        let response: CandidatesResponse = self
            .post("candidates", request)
            .await
            .map_err(|reason| RfiMatchError::CandidateLookup { reason })?;
        Ok(response.satellites)
    }
}

#[async_trait]
impl EphemerisSource for HttpSatelliteService {
    async fn positions(
        &self,
        satellite: &Satellite,
        timestamps: &[DateTime<Utc>],
    ) -> Result<Vec<SkyPosition>> {
        let body = EphemerisRequest { satellite, timestamps };
        let response: EphemerisResponse = self
            .post("ephemeris", &body)
            .await
            .map_err(|reason| RfiMatchError::Ephemeris { reason })?;

        if response.positions.len() != timestamps.len() {
            return Err(RfiMatchError::Ephemeris {
                reason: format!(
                    "expected {} positions for {}, got {}",
                    timestamps.len(),
                    satellite.name,
                    response.positions.len()
                ),
            });
        }
        Ok(response.positions)
    }
}

/// Response body of `POST /candidates`
#[derive(Debug, Deserialize)]
struct CandidatesResponse {
    #[serde(default)]
    satellites: Vec<Satellite>,
}

/// Request body of `POST /ephemeris`
#[derive(Debug, Serialize)]
struct EphemerisRequest<'a> {
    satellite: &'a Satellite,
    timestamps: &'a [DateTime<Utc>],
}

/// Response body of `POST /ephemeris`
#[derive(Debug, Deserialize)]
struct EphemerisResponse {
    positions: Vec<SkyPosition>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn satellite() -> Satellite {
        Satellite {
            name: "STARLINK-1007".to_string(),
            norad_id: 44713,
            line1: "1 44713U 19074A   24106.50000000  .00001000  00000-0  80000-4 0  9991".to_string(),
            line2: "2 44713  53.0540 120.0000 0001400  90.0000 270.0000 15.06400000 99991".to_string(),
        }
    }

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let service = HttpSatelliteService::new("http://sats.example.org/");
        assert_eq!(service.base_url(), "http://sats.example.org");
        assert_eq!(HttpSatelliteService::localhost().base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_ephemeris_request_wire_shape() {
        let sat = satellite();
        let timestamps = [Utc.with_ymd_and_hms(2024, 4, 20, 10, 0, 0).unwrap()];
        let body = EphemerisRequest { satellite: &sat, timestamps: &timestamps };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["satellite"]["name"], "STARLINK-1007");
        assert_eq!(value["satellite"]["norad_id"], 44713);
        assert_eq!(value["timestamps"], json!(["2024-04-20T10:00:00Z"]));
    }

    #[test]
    fn test_candidates_response_defaults_to_empty() {
        let response: CandidatesResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.satellites.is_empty());
    }

    #[test]
    fn test_ephemeris_response_parses_positions() {
        let response: EphemerisResponse = serde_json::from_value(json!({
            "positions": [
                {"timestamp": "2024-04-20T10:00:00Z", "ra_deg": 294.85, "dec_deg": -63.71}
            ]
        }))
        .unwrap();
        assert_eq!(response.positions.len(), 1);
        assert_eq!(response.positions[0].ra_deg, 294.85);
    }

    #[tokio::test]
    async fn test_unreachable_service_is_ephemeris_error() {
        let service = HttpSatelliteService::new("http://127.0.0.1:1");
        let sat = satellite();
        let err = service.positions(&sat, &[Utc::now()]).await.unwrap_err();
        assert!(matches!(err, RfiMatchError::Ephemeris { .. }));
    }
}
