//! Nearest-time sample selection
//!
//! Picks the hourly sample whose timestamp is closest to the current instant.

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};

/// Formats accepted for offset-less timestamps (Open-Meteo uses the first)
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Parses a forecast timestamp into a UTC instant.
///
/// RFC 3339 timestamps carry their own offset. Offset-less timestamps are read in
/// `utc_offset` when the payload reported one, otherwise in the local timezone.
/// Returns `None` for anything that does not parse.
pub fn parse_timestamp(raw: &str, utc_offset: Option<FixedOffset>) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())?;

    match utc_offset {
        Some(offset) => offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc)),
        None => Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

/// Returns the index of the timestamp nearest to `now`.
///
/// Linear scan keeping the first index with the smallest absolute difference.
/// Entries that fail to parse never become the best match. An empty slice, or
/// one where nothing parses, yields 0.
pub fn select_index<S: AsRef<str>>(
    timestamps: &[S],
    utc_offset: Option<FixedOffset>,
    now: DateTime<Utc>,
) -> usize {
    let mut best = 0;
    let mut best_diff: Option<Duration> = None;

    for (i, raw) in timestamps.iter().enumerate() {
        let Some(at) = parse_timestamp(raw.as_ref(), utc_offset) else {
            continue;
        };
        let diff = (at - now).abs();
        if best_diff.map_or(true, |current| diff < current) {
            best = i;
            best_diff = Some(diff);
        }
    }

    best
}

/// Same as [`select_index`], reading the clock once at call time
pub fn nearest_index<S: AsRef<str>>(timestamps: &[S], utc_offset: Option<FixedOffset>) -> usize {
    select_index(timestamps, utc_offset, Utc::now())
}
