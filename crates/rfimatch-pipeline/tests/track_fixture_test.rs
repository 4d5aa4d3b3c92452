//! Track extraction over a full session log

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use proptest::prelude::*;
use rfimatch_core::models::CaptureBlock;
use rfimatch_pipeline::{TargetLookup, TrackExtractor};
use serde_json::json;

const SESSION_LOG: &str = "\
Observation log for 1713650000
Scan summary:
23:40:12.5 - 23:41:10.1    0:slew      0:3C286
23:41:10.1 - 23:51:10.1    1:track     0:3C286
23:51:10.1 - 23:52:00.0    2:slew      1:J1331+3030
23:52:00.0 - 00:02:00.0    3:track     1:J1331+3030
00:02:00.0 - 00:02:40.0    4:slew      2:PKS 1934-63
00:02:40.0 - 00:12:40.0    5:track     2:PKS 1934-63
00:12:40.0 - 00:22:40.0    6:track     3:UNLISTED
00:22:40.0 - 00:32:40.0    7:scan      0:3C286
";

fn session_block() -> CaptureBlock {
    CaptureBlock::from_record(
        "MEERKAT",
        &json!({
            "CaptureBlockId": 1713650000,
            "StartTime": "2024-04-20T23:40:00.000Z",
            "MinFreq": "856000000",
            "MaxFreq": "1712000000",
            "Bandwidth": 856000000,
            "Targets": ["3C286", "J1331+3030", "PKS 1934-63"],
            "TargetCoordinates": ["30.509,202.785", "30.509,202.785", "-63.7127,294.8542"],
            "ScanLog": SESSION_LOG,
            "rdb": "https://archive.example.org/1713650000/1713650000_sdp_l0.full.rdb"
        }),
    )
    .unwrap()
}

fn utc(day: u32, h: u32, m: u32, s: u32, ms: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, day, h, m, s).unwrap() + TimeDelta::milliseconds(ms as i64)
}

#[test]
fn test_session_log_fixture() {
    let tracks = TrackExtractor::new().extract(&session_block()).unwrap();

    let summary: Vec<(u32, &str)> =
        tracks.iter().map(|t| (t.track_index, t.target_id.as_str())).collect();
    assert_eq!(summary, vec![(1, "3C286"), (3, "J1331+3030"), (5, "PKS 1934-63")]);

    assert_eq!(tracks[0].begin, utc(20, 23, 41, 10, 100));
    assert_eq!(tracks[0].end, utc(20, 23, 51, 10, 100));

    // Crosses midnight within the scan
    assert_eq!(tracks[1].begin, utc(20, 23, 52, 0, 0));
    assert_eq!(tracks[1].end, utc(21, 0, 2, 0, 0));

    // Starts after midnight
    assert_eq!(tracks[2].begin, utc(21, 0, 2, 40, 0));
    assert_eq!(tracks[2].end, utc(21, 0, 12, 40, 0));
    assert_eq!(tracks[2].declination_deg, -63.7127);
    assert_eq!(tracks[2].right_ascension_deg, 294.8542);
}

#[test]
fn test_session_fixture_observations() {
    let block = session_block();
    let observations = TrackExtractor::new().observations(&block).unwrap();

    assert_eq!(observations.len(), 3);
    assert!(observations.iter().all(|o| o.name == "MEERKAT"));
    assert!(observations.iter().all(|o| o.observation_id == "1713650000"));
    assert!(observations.iter().all(|o| (o.frequency_mhz - 1284.0).abs() < 1e-9));
    assert!(observations.iter().all(|o| o.candidate_rfi.is_empty()));
    assert!(observations.windows(2).all(|w| w[0].begin <= w[1].begin));
}

fn clock(seconds: u32) -> String {
    format!("{:02}:{:02}:{:02}", seconds / 3600, (seconds / 60) % 60, seconds % 60)
}

proptest! {
    #[test]
    fn prop_tracks_are_ordered_windows(
        session_seconds in 0u32..86_400,
        scans in prop::collection::vec((0u32..86_400, 0u32..86_400), 1..12),
    ) {
        let session_start = Utc.with_ymd_and_hms(2024, 4, 20, 0, 0, 0).unwrap()
            + TimeDelta::seconds(session_seconds as i64);
        let log: String = scans
            .iter()
            .enumerate()
            .map(|(i, (start, end))| format!("{} - {}  {}:track  0:SRC\n", clock(*start), clock(*end), i))
            .collect();

        let block = CaptureBlock::from_record("MEERKAT", &json!({
            "CaptureBlockId": "1",
            "StartTime": session_start.to_rfc3339(),
            "Targets": ["SRC"],
            "TargetCoordinates": ["-30.0,120.0"],
        }))
        .unwrap();
        let lookup = TargetLookup::from_block(&block);

        let tracks = TrackExtractor::new().extract_from_log(&log, session_start, &lookup);

        prop_assert_eq!(tracks.len(), scans.len());
        for track in &tracks {
            prop_assert!(track.begin <= track.end);
            prop_assert!(track.end - track.begin < TimeDelta::hours(24));
            prop_assert!(track.begin >= session_start.date_naive().and_hms_opt(0, 0, 0).unwrap().and_utc());
        }
    }
}
