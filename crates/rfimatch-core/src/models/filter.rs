use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RfiMatchError};
use crate::time::parse_naive_timestamp;

const DEFAULT_START: &str = "2024-04-15T08:48:54.0";
const DEFAULT_END: &str = "2025-07-15T08:49:54.0";

/// Immutable selection criteria for observatories and observation windows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    lat_range: [f64; 2],
    lon_range: [f64; 2],
    freq_range_mhz: [f64; 2],
    start_utc: DateTime<Utc>,
    end_utc: DateTime<Utc>,
    observatory_names: Vec<String>,
}

impl FilterSpec {
    /// Start a builder populated with the default (unrestricted) criteria
    pub fn builder() -> FilterSpecBuilder {
        FilterSpecBuilder::default()
    }

    pub fn lat_range(&self) -> [f64; 2] {
        self.lat_range
    }

    pub fn lon_range(&self) -> [f64; 2] {
        self.lon_range
    }

    pub fn freq_range_mhz(&self) -> [f64; 2] {
        self.freq_range_mhz
    }

    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start_utc
    }

    pub fn end_utc(&self) -> DateTime<Utc> {
        self.end_utc
    }

    /// Calendar date of the window start
    pub fn start_date(&self) -> NaiveDate {
        self.start_utc.date_naive()
    }

    /// Calendar date of the window end
    pub fn end_date(&self) -> NaiveDate {
        self.end_utc.date_naive()
    }

    /// Explicit observatory names, in the order given, without duplicates
    pub fn observatory_names(&self) -> &[String] {
        &self.observatory_names
    }

    pub fn has_explicit_observatories(&self) -> bool {
        !self.observatory_names.is_empty()
    }
}

impl Default for FilterSpec {
    fn default() -> Self {
        let builder = FilterSpecBuilder::default();
        FilterSpec {
            lat_range: builder.lat_range,
            lon_range: builder.lon_range,
            freq_range_mhz: builder.freq_range_mhz,
            start_utc: builder.start_utc,
            end_utc: builder.end_utc,
            observatory_names: Vec::new(),
        }
    }
}

/// Builder with validated setters for [`FilterSpec`]
///
/// Every setter checks its input and returns the builder on success, so
/// criteria chain with `?`:
///
/// ```
/// use rfimatch_core::models::FilterSpec;
///
/// let spec = FilterSpec::builder()
///     .latitude([-40.0, 40.0])?
///     .frequencies([500.0, 1100.0])?
///     .start_time("2024-06-27T08:49:54.0")?
///     .end_time("2024-06-29T10:32:48.0")?
///     .build()?;
/// assert_eq!(spec.lat_range(), [-40.0, 40.0]);
/// # Ok::<(), rfimatch_core::RfiMatchError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FilterSpecBuilder {
    lat_range: [f64; 2],
    lon_range: [f64; 2],
    freq_range_mhz: [f64; 2],
    start_utc: DateTime<Utc>,
    end_utc: DateTime<Utc>,
    observatory_names: Vec<String>,
}

impl Default for FilterSpecBuilder {
    fn default() -> Self {
        Self {
            lat_range: [-90.0, 90.0],
            lon_range: [-180.0, 180.0],
            freq_range_mhz: [10.0, 1e6],
            start_utc: parse_naive_timestamp(DEFAULT_START).unwrap_or_default(),
            end_utc: parse_naive_timestamp(DEFAULT_END).unwrap_or_default(),
            observatory_names: Vec::new(),
        }
    }
}

impl FilterSpecBuilder {
    /// Set the latitude range `[min_lat, max_lat]` in degrees
    pub fn latitude(mut self, range: [f64; 2]) -> Result<Self> {
        check_bounded_range("lat_range", "Latitude", range, -90.0, 90.0)?;
        self.lat_range = range;
        Ok(self)
    }

    /// Set the longitude range `[min_lon, max_lon]` in degrees
    pub fn longitude(mut self, range: [f64; 2]) -> Result<Self> {
        check_bounded_range("lon_range", "Longitude", range, -180.0, 180.0)?;
        self.lon_range = range;
        Ok(self)
    }

    /// Set the frequency range `[min, max]` in MHz
    pub fn frequencies(mut self, range: [f64; 2]) -> Result<Self> {
        if range.iter().any(|f| !f.is_finite() || *f <= 0.0) {
            return Err(invalid("freq_range", "Frequencies must be positive values (MHz)."));
        }
        if range[0] > range[1] {
            return Err(invalid(
                "freq_range",
                "Minimum frequency must be less than or equal to maximum frequency.",
            ));
        }
        self.freq_range_mhz = range;
        Ok(self)
    }

    /// Set the window start (`YYYY-MM-DDTHH:MM:SS[.fff]`, UTC)
    pub fn start_time(mut self, value: &str) -> Result<Self> {
        self.start_utc = parse_filter_time("start_time", value)?;
        Ok(self)
    }

    /// Set the window end (`YYYY-MM-DDTHH:MM:SS[.fff]`, UTC)
    pub fn end_time(mut self, value: &str) -> Result<Self> {
        self.end_utc = parse_filter_time("end_time", value)?;
        Ok(self)
    }

    /// Restrict the selection to specific observatories
    ///
    /// Names are trimmed; blanks and repeats are dropped, first occurrence wins.
    pub fn observatories<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cleaned: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if !name.is_empty() && !cleaned.iter().any(|n| n == name) {
                cleaned.push(name.to_string());
            }
        }
        self.observatory_names = cleaned;
        self
    }

    /// Validate cross-field constraints and freeze the criteria
    pub fn build(self) -> Result<FilterSpec> {
        if self.start_utc > self.end_utc {
            return Err(invalid("time_window", "Start time must not be after end time."));
        }

        Ok(FilterSpec {
            lat_range: self.lat_range,
            lon_range: self.lon_range,
            freq_range_mhz: self.freq_range_mhz,
            start_utc: self.start_utc,
            end_utc: self.end_utc,
            observatory_names: self.observatory_names,
        })
    }
}

fn check_bounded_range(key: &str, label: &str, range: [f64; 2], lo: f64, hi: f64) -> Result<()> {
    if range.iter().any(|v| !v.is_finite() || *v < lo || *v > hi) {
        return Err(invalid(key, &format!("{} values must be between {} and {}.", label, lo, hi)));
    }
    if range[0] > range[1] {
        return Err(invalid(
            key,
            &format!(
                "Minimum {} must be less than or equal to maximum {}.",
                label.to_lowercase(),
                label.to_lowercase()
            ),
        ));
    }
    Ok(())
}

fn parse_filter_time(key: &str, value: &str) -> Result<DateTime<Utc>> {
    parse_naive_timestamp(value).ok_or_else(|| {
        invalid(key, &format!("Time must be in ISO 8601 format: YYYY-MM-DDTHH:MM:SS.sss (got '{}')", value))
    })
}

fn invalid(key: &str, reason: &str) -> RfiMatchError {
    RfiMatchError::ConfigInvalid { key: key.to_string(), reason: reason.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_defaults() {
        let spec = FilterSpec::builder().build().unwrap();
        assert_eq!(spec.lat_range(), [-90.0, 90.0]);
        assert_eq!(spec.lon_range(), [-180.0, 180.0]);
        assert_eq!(spec.freq_range_mhz(), [10.0, 1e6]);
        assert_eq!(spec.start_utc(), Utc.with_ymd_and_hms(2024, 4, 15, 8, 48, 54).unwrap());
        assert_eq!(spec.end_utc(), Utc.with_ymd_and_hms(2025, 7, 15, 8, 49, 54).unwrap());
        assert!(!spec.has_explicit_observatories());
        assert_eq!(spec, FilterSpec::default());
    }

    #[test]
    fn test_latitude() {
        let spec = FilterSpec::builder().latitude([-45.0, 45.0]).unwrap().build().unwrap();
        assert_eq!(spec.lat_range(), [-45.0, 45.0]);

        let err = FilterSpec::builder().latitude([-120.0, 50.0]).unwrap_err();
        assert!(err.to_string().contains("Latitude values must be between -90 and 90"));

        let err = FilterSpec::builder().latitude([10.0, -10.0]).unwrap_err();
        assert!(err.to_string().contains("Minimum latitude must be less"));
    }

    #[test]
    fn test_longitude() {
        assert!(FilterSpec::builder().longitude([10.0, 100.0]).is_ok());
        assert!(FilterSpec::builder().longitude([-200.0, 100.0]).is_err());
        assert!(FilterSpec::builder().longitude([50.0, -10.0]).is_err());
        assert!(FilterSpec::builder().longitude([f64::NAN, 10.0]).is_err());
    }

    #[test]
    fn test_frequencies() {
        assert!(FilterSpec::builder().frequencies([50.0, 500.0]).is_ok());

        let err = FilterSpec::builder().frequencies([-10.0, 100.0]).unwrap_err();
        assert!(err.to_string().contains("must be positive"));

        let err = FilterSpec::builder().frequencies([1000.0, 100.0]).unwrap_err();
        assert!(err.to_string().contains("Minimum frequency must be less"));
    }

    #[test]
    fn test_times() {
        let spec = FilterSpec::builder()
            .start_time("2025-10-13T09:00:00.0")
            .unwrap()
            .end_time("2025-10-13T10:00:00.0")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(spec.start_date(), NaiveDate::from_ymd_opt(2025, 10, 13).unwrap());

        let err = FilterSpec::builder().start_time("2025/10/13 09:00:00").unwrap_err();
        assert!(err.to_string().contains("Time must be in ISO 8601 format"));
        assert!(FilterSpec::builder().end_time("13-10-2025T09:00:00").is_err());
    }

    #[test]
    fn test_reversed_window_rejected_at_build() {
        let err = FilterSpec::builder()
            .start_time("2025-10-14T00:00:00")
            .unwrap()
            .end_time("2025-10-13T00:00:00")
            .unwrap()
            .build()
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_observatory_names_are_cleaned() {
        let spec =
            FilterSpec::builder().observatories([" MEERKAT ", "ALMA", "", "MEERKAT"]).build().unwrap();
        assert_eq!(spec.observatory_names(), ["MEERKAT".to_string(), "ALMA".to_string()]);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_latitude_accepts_exactly_ordered_in_bounds(a in -120.0f64..120.0, b in -120.0f64..120.0) {
                let in_bounds = (-90.0..=90.0).contains(&a) && (-90.0..=90.0).contains(&b);
                match FilterSpec::builder().latitude([a, b]) {
                    Ok(builder) => {
                        prop_assert!(in_bounds && a <= b);
                        prop_assert_eq!(builder.build().unwrap().lat_range(), [a, b]);
                    }
                    Err(err) => {
                        prop_assert!(!in_bounds || a > b);
                        prop_assert!(err.is_configuration());
                    }
                }
            }

            #[test]
            fn prop_longitude_accepts_exactly_ordered_in_bounds(a in -240.0f64..240.0, b in -240.0f64..240.0) {
                let in_bounds = (-180.0..=180.0).contains(&a) && (-180.0..=180.0).contains(&b);
                let accepted = FilterSpec::builder().longitude([a, b]).is_ok();
                prop_assert_eq!(accepted, in_bounds && a <= b);
            }

            #[test]
            fn prop_frequencies_accepts_exactly_positive_ordered(a in -100.0f64..1e6, b in -100.0f64..1e6) {
                let accepted = FilterSpec::builder().frequencies([a, b]).is_ok();
                prop_assert_eq!(accepted, a > 0.0 && b > 0.0 && a <= b);
            }
        }
    }
}
