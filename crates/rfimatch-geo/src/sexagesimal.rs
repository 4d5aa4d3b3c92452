//! Sexagesimal rendering of equatorial coordinates
//!
//! Right ascension is written as `HhMMmSS.sssS` and declination as
//! `[-]DdMMmSS.sssS`; parsing accepts any number of digits per field and an
//! optional leading sign on either.

use rfimatch_core::error::{Result, RfiMatchError};
pub use rfimatch_core::models::normalize_ra_deg;

const MILLIS_PER_HOUR: i64 = 3_600_000;
const MILLIS_PER_MINUTE: i64 = 60_000;

/// Format a right ascension in degrees as hours, minutes and seconds
pub fn format_ra_hms(ra_deg: f64) -> String {
    let hours = normalize_ra_deg(ra_deg) / 15.0;
    let mut millis = (hours * MILLIS_PER_HOUR as f64).round() as i64;
    if millis >= 24 * MILLIS_PER_HOUR {
        millis -= 24 * MILLIS_PER_HOUR;
    }

    let (h, m, s) = split_millis(millis);
    format!("{}h{:02}m{:06.3}s", h, m, s)
}

/// Format a declination in degrees as degrees, arcminutes and arcseconds
pub fn format_dec_dms(dec_deg: f64) -> String {
    let millis = (dec_deg.abs() * MILLIS_PER_HOUR as f64).round() as i64;
    let sign = if dec_deg < 0.0 && millis > 0 { "-" } else { "" };

    let (d, m, s) = split_millis(millis);
    format!("{}{}d{:02}m{:06.3}s", sign, d, m, s)
}

/// Parse `[-]HhMmSs` into degrees (1h = 15°)
pub fn parse_ra_hms(value: &str) -> Result<f64> {
    parse_sexagesimal(value, 'h').map(|hours| hours * 15.0)
}

/// Parse `[-]DdMmSs` into degrees
pub fn parse_dec_dms(value: &str) -> Result<f64> {
    parse_sexagesimal(value, 'd')
}

fn split_millis(millis: i64) -> (i64, i64, f64) {
    let major = millis / MILLIS_PER_HOUR;
    let minutes = (millis % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE;
    let seconds = (millis % MILLIS_PER_MINUTE) as f64 / 1000.0;
    (major, minutes, seconds)
}

fn parse_sexagesimal(value: &str, unit: char) -> Result<f64> {
    let invalid = || RfiMatchError::InvalidRecord {
        reason: format!("'{}' is not a {}ms angle", value, unit),
    };

    let trimmed = value.trim();
    let sign = if trimmed.starts_with('-') { -1.0 } else { 1.0 };
    let unsigned = trimmed.trim_start_matches(['+', '-']);

    let (major, rest) = unsigned.split_once(unit).ok_or_else(invalid)?;
    let (minutes, seconds) = rest.split_once('m').ok_or_else(invalid)?;
    let seconds = seconds.strip_suffix('s').unwrap_or(seconds);

    let field = |s: &str| s.trim().parse::<f64>().map_err(|_| invalid());
    let magnitude = field(major)? + field(minutes)? / 60.0 + field(seconds)? / 3600.0;

    Ok(sign * magnitude)
}
