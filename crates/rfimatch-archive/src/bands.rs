/// Standard radio bands as `(name, low_mhz, high_mhz)`, in archive order
pub const RADIO_BANDS: &[(&str, f64, f64)] = &[
    ("HF", 3.0, 30.0),
    ("VHF", 30.0, 300.0),
    ("ULF", 300.0, 1000.0),
    ("L", 1000.0, 2000.0),
    ("S", 2000.0, 4000.0),
    ("C", 4000.0, 8000.0),
    ("X", 8000.0, 12000.0),
    ("Ku", 12000.0, 18000.0),
    ("K", 18000.0, 27000.0),
    ("Ka", 27000.0, 40000.0),
    ("Q", 33000.0, 50000.0),
    ("V", 50000.0, 75000.0),
    ("W", 75000.0, 110000.0),
];

/// Names of the bands overlapping `[min_mhz, max_mhz]` (edges inclusive)
pub fn freq_to_bands(min_mhz: f64, max_mhz: f64) -> Vec<&'static str> {
    RADIO_BANDS
        .iter()
        .filter(|(_, low, high)| min_mhz <= *high && max_mhz >= *low)
        .map(|(name, _, _)| *name)
        .collect()
}
