//! Decomposition of a capture session's scan log into pointing tracks
//!
//! Scan log lines look like
//!
//! ```text
//! 08:51:10 - 08:56:10   1:track    0:J1939-6342
//! ```
//!
//! Only lines in the `track` state become tracks. The target is the last
//! `index:name` token on the line; its coordinates come from the session's
//! parallel target-name and `"dec,ra"` coordinate lists.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use regex::Regex;
use rfimatch_core::error::Result;
use rfimatch_core::models::{CaptureBlock, Observation, Track};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::{debug, warn};

static SCAN_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?P<start>\d{1,2}:\d{2}:\d{2}(?:\.\d+)?)\s*-\s*(?P<end>\d{1,2}:\d{2}:\d{2}(?:\.\d+)?)\s+(?P<rest>.*)$",
    )
    .expect("scan line pattern is valid")
});

static TRACK_SCAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?P<index>\d+):track\b.*\s\d+:(?P<target>\S(?:.*\S)?)\s*$")
        .expect("track scan pattern is valid")
});

/// A scan clock more than this many hours behind the previous one has crossed midnight
const ROLLOVER_THRESHOLD_HOURS: i64 = 12;

/// Target name to `(declination_deg, right_ascension_deg)` for one session
#[derive(Debug, Clone, Default)]
pub struct TargetLookup {
    entries: HashMap<String, (f64, f64)>,
}

impl TargetLookup {
    /// Zip the session's target names with their `"dec,ra"` strings
    ///
    /// Unreadable coordinates and unmatched list tails are logged and left out.
    pub fn from_block(block: &CaptureBlock) -> Self {
        if block.targets.len() != block.target_coordinates.len() {
            warn!(
                observation = %block.observation_id,
                targets = block.targets.len(),
                coordinates = block.target_coordinates.len(),
                "Target and coordinate lists differ in length"
            );
        }

        let mut entries = HashMap::new();
        for (name, coordinates) in block.targets.iter().zip(&block.target_coordinates) {
            match parse_dec_ra(coordinates) {
                Some(position) => {
                    entries.insert(name.trim().to_string(), position);
                }
                None => warn!(
                    observation = %block.observation_id,
                    target = %name,
                    coordinates = %coordinates,
                    "Skipping target with unreadable coordinates"
                ),
            }
        }

        Self { entries }
    }

    pub fn get(&self, target: &str) -> Option<(f64, f64)> {
        self.entries.get(target).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Extracts fixed-pointing tracks from capture sessions
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackExtractor;

impl TrackExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Tracks of one capture session, in log order
    ///
    /// Fails only when the session start time is unreadable; individual bad
    /// lines are skipped.
    pub fn extract(&self, block: &CaptureBlock) -> Result<Vec<Track>> {
        let session_start = block.start_time_utc()?;
        let lookup = TargetLookup::from_block(block);
        Ok(self.extract_from_log(&block.scan_log, session_start, &lookup))
    }

    /// One observation row per track of the session
    pub fn observations(&self, block: &CaptureBlock) -> Result<Vec<Observation>> {
        Ok(self
            .extract(block)?
            .iter()
            .map(|track| Observation::from_track(block, track))
            .collect())
    }

    pub fn extract_from_log(
        &self,
        log: &str,
        session_start: DateTime<Utc>,
        lookup: &TargetLookup,
    ) -> Vec<Track> {
        let mut tracks = Vec::new();
        let mut clock = SessionClock::new(session_start);

        for line in log.lines() {
            let Some(scan) = SCAN_LINE.captures(line) else {
                continue;
            };

            let (Some(start), Some(end)) = (parse_clock(&scan["start"]), parse_clock(&scan["end"]))
            else {
                warn!(line = %line.trim(), "Skipping scan with unreadable clock times");
                continue;
            };
            let (begin, end) = clock.place(start, end);

            let Some(track) = TRACK_SCAN.captures(&scan["rest"]) else {
                continue;
            };

            let target = &track["target"];
            let Some((declination_deg, right_ascension_deg)) = lookup.get(target) else {
                warn!(target = %target, line = %line.trim(), "Skipping track with unknown target");
                continue;
            };

            let Ok(track_index) = track["index"].parse::<u32>() else {
                warn!(line = %line.trim(), "Skipping track with oversized index");
                continue;
            };

            tracks.push(Track {
                track_index,
                target_id: target.to_string(),
                declination_deg,
                right_ascension_deg,
                begin,
                end,
            });
        }

        debug!(tracks = tracks.len(), "Extracted tracks from scan log");
        tracks
    }
}

/// Places clock-only scan times on calendar days
struct SessionClock {
    date: NaiveDate,
    previous: NaiveTime,
}

impl SessionClock {
    fn new(session_start: DateTime<Utc>) -> Self {
        Self {
            date: session_start.date_naive(),
            previous: session_start.time(),
        }
    }

    fn place(&mut self, start: NaiveTime, end: NaiveTime) -> (DateTime<Utc>, DateTime<Utc>) {
        if self.previous - start > TimeDelta::hours(ROLLOVER_THRESHOLD_HOURS) {
            self.date = next_day(self.date);
        }
        self.previous = start;

        let begin = Utc.from_utc_datetime(&self.date.and_time(start));
        let end_date = if end < start { next_day(self.date) } else { self.date };
        let end = Utc.from_utc_datetime(&end_date.and_time(end));

        (begin, end)
    }
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}

fn parse_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S%.f").ok()
}

fn parse_dec_ra(value: &str) -> Option<(f64, f64)> {
    let (dec, ra) = value.split_once(',')?;
    let dec = dec.trim().parse::<f64>().ok()?;
    let ra = ra.trim().parse::<f64>().ok()?;
    (dec.is_finite() && ra.is_finite()).then_some((dec, ra))
}
