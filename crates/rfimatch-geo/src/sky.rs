use chrono::{DateTime, TimeDelta, Utc};
use nalgebra::Vector3;
use rfimatch_core::error::{Result, RfiMatchError};
use rfimatch_core::models::SkyPosition;
use serde::{Deserialize, Serialize};

/// Direction cosines of an equatorial position given in degrees
pub fn to_unit_vector(ra_deg: f64, dec_deg: f64) -> Vector3<f64> {
    let ra = ra_deg.to_radians();
    let dec = dec_deg.to_radians();
    let cos_dec = dec.cos();

    Vector3::new(ra.cos() * cos_dec, ra.sin() * cos_dec, dec.sin())
}

/// Batched [`to_unit_vector`] over `(ra_deg, dec_deg)` pairs
pub fn to_unit_vectors(positions: &[(f64, f64)]) -> Vec<Vector3<f64>> {
    positions.iter().map(|&(ra, dec)| to_unit_vector(ra, dec)).collect()
}

/// Angle between two unit vectors in degrees
///
/// The cosine (dot product) is clamped to [-1, 1] so rounding overshoot
/// never yields NaN. The angle is recovered with `atan2` against the cross
/// product norm, which equals `acos` of the clamped cosine for unit vectors
/// and is exactly zero for identical directions.
pub fn angular_distance_deg(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let cos_theta = a.dot(b).clamp(-1.0, 1.0);
    let sin_theta = a.cross(b).norm();
    sin_theta.atan2(cos_theta).to_degrees()
}

/// The sample closest to a fixed target direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosestApproach {
    /// Position of the winning sample in the input slice
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub ra_deg: f64,
    pub dec_deg: f64,
    pub angular_distance_deg: f64,
}

/// Find the sample with minimum angular distance to the target
///
/// Ties go to the earliest sample. Fails with `EmptySamples` when there is
/// nothing to search.
pub fn closest_approach(
    samples: &[SkyPosition],
    target_ra_deg: f64,
    target_dec_deg: f64,
) -> Result<ClosestApproach> {
    let target = to_unit_vector(target_ra_deg, target_dec_deg);

    let mut best: Option<ClosestApproach> = None;
    for (index, sample) in samples.iter().enumerate() {
        let distance = angular_distance_deg(&to_unit_vector(sample.ra_deg, sample.dec_deg), &target);

        let better = match &best {
            None => true,
            Some(current) => {
                distance < current.angular_distance_deg
                    || (current.angular_distance_deg.is_nan() && !distance.is_nan())
            }
        };

        if better {
            best = Some(ClosestApproach {
                index,
                timestamp: sample.timestamp,
                ra_deg: sample.ra_deg,
                dec_deg: sample.dec_deg,
                angular_distance_deg: distance,
            });
        }
    }

    best.ok_or(RfiMatchError::EmptySamples)
}

/// `n` instants from `start` to `end` inclusive, linearly spaced
///
/// The last instant is exactly `end`. `start == end` is allowed and yields
/// `n` copies of the same instant.
pub fn evenly_spaced_timestamps(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    n: usize,
) -> Result<Vec<DateTime<Utc>>> {
    if n < 2 {
        return Err(RfiMatchError::InvalidRange {
            reason: format!("at least 2 samples are required, got {}", n),
        });
    }
    if start > end {
        return Err(RfiMatchError::InvalidRange {
            reason: format!("start {} is after end {}", start, end),
        });
    }

    let span = end - start;
    let total_nanos = i128::from(span.num_seconds()) * 1_000_000_000 + i128::from(span.subsec_nanos());
    let intervals = (n - 1) as i128;

    let mut timestamps = Vec::with_capacity(n);
    for i in 0..n - 1 {
        let offset = total_nanos * i as i128 / intervals;
        timestamps.push(start + nanos_to_delta(offset)?);
    }
    timestamps.push(end);

    Ok(timestamps)
}

fn nanos_to_delta(nanos: i128) -> Result<TimeDelta> {
    let secs = i64::try_from(nanos.div_euclid(1_000_000_000));
    let subsec = nanos.rem_euclid(1_000_000_000) as u32;

    secs.ok()
        .and_then(|secs| TimeDelta::new(secs, subsec))
        .ok_or_else(|| RfiMatchError::InvalidRange {
            reason: "time span is too large to sample".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap() + TimeDelta::seconds(seconds)
    }

    fn sample(seconds: i64, ra_deg: f64, dec_deg: f64) -> SkyPosition {
        SkyPosition { timestamp: at(seconds), ra_deg, dec_deg }
    }

    #[test]
    fn test_unit_vector_axes() {
        let x = to_unit_vector(0.0, 0.0);
        assert!((x - Vector3::new(1.0, 0.0, 0.0)).norm() < 1e-12);

        let y = to_unit_vector(90.0, 0.0);
        assert!((y - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-12);

        let pole = to_unit_vector(123.0, 90.0);
        assert!((pole - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn test_batched_conversion_matches_scalar() {
        let batch = to_unit_vectors(&[(10.0, 20.0), (300.0, -45.0)]);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1], to_unit_vector(300.0, -45.0));
    }

    #[test]
    fn test_angular_distance_known_values() {
        let a = to_unit_vector(0.0, 0.0);
        assert!((angular_distance_deg(&a, &to_unit_vector(90.0, 0.0)) - 90.0).abs() < 1e-9);
        assert!((angular_distance_deg(&a, &to_unit_vector(180.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((angular_distance_deg(&a, &to_unit_vector(0.0, 30.0)) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_angular_distance_clamps_overshoot() {
        // Slightly longer than unit length: unclamped acos would be NaN
        let a = Vector3::new(1.0 + 1e-12, 0.0, 0.0);
        let d = angular_distance_deg(&a, &a);
        assert!(!d.is_nan());
        assert_eq!(d, 0.0);

        let b = -a;
        assert!((angular_distance_deg(&a, &b) - 180.0).abs() < 1e-12);
    }

    #[test]
    fn test_closest_approach_picks_minimum() {
        let samples = vec![
            sample(0, 10.0, 10.0),
            sample(60, 20.0, -30.0),
            sample(120, 40.0, 10.0),
        ];

        let closest = closest_approach(&samples, 21.0, -30.0).unwrap();
        assert_eq!(closest.index, 1);
        assert_eq!(closest.timestamp, at(60));
        assert_eq!(closest.ra_deg, 20.0);
        assert!(closest.angular_distance_deg < 1.0);
    }

    #[test]
    fn test_closest_approach_ties_go_to_first() {
        let samples = vec![
            sample(0, 5.0, 0.0),
            sample(60, 0.0, 5.0),
            sample(120, 5.0, 0.0),
        ];

        let closest = closest_approach(&samples, 0.0, 0.0).unwrap();
        assert_eq!(closest.index, 0);
        assert_eq!(closest.timestamp, at(0));
    }

    #[test]
    fn test_closest_approach_empty() {
        assert!(matches!(closest_approach(&[], 0.0, 0.0), Err(RfiMatchError::EmptySamples)));
    }

    #[test]
    fn test_evenly_spaced_timestamps() {
        let stamps = evenly_spaced_timestamps(at(0), at(90), 4).unwrap();
        assert_eq!(stamps, vec![at(0), at(30), at(60), at(90)]);
    }

    #[test]
    fn test_evenly_spaced_subsecond_steps() {
        let stamps = evenly_spaced_timestamps(at(0), at(1), 3).unwrap();
        assert_eq!(stamps[1], at(0) + TimeDelta::milliseconds(500));
        assert_eq!(stamps[2], at(1));
    }

    #[test]
    fn test_evenly_spaced_degenerate_window() {
        let stamps = evenly_spaced_timestamps(at(0), at(0), 3).unwrap();
        assert_eq!(stamps, vec![at(0); 3]);
    }

    #[test]
    fn test_evenly_spaced_rejects_bad_input() {
        assert!(matches!(
            evenly_spaced_timestamps(at(10), at(0), 5),
            Err(RfiMatchError::InvalidRange { .. })
        ));
        assert!(matches!(
            evenly_spaced_timestamps(at(0), at(10), 1),
            Err(RfiMatchError::InvalidRange { .. })
        ));
    }
}
