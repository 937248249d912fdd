//! Dive session extraction: start time and start GPS fix.
//!
//! Two-tier contract. The primary strategy scans the decoded rows for the
//! first summary record carrying a numeric `start_time`, taking the GPS
//! fields from that same record. Some decoder runs omit the structured
//! summary record while the fields still appear as literal text, so a
//! textual fallback scan covers that case. Only when both tiers fail is the
//! dive unrecoverable.

use log::{debug, warn};
use nom::bytes::complete::{tag, take_until};
use nom::character::complete::digit1;
use nom::sequence::{preceded, terminated};
use nom::{IResult, Parser};

use crate::config::CorrelateConfig;
use crate::coords::semicircles_to_fix;
use crate::error::CorrelateError;
use crate::models::{
    sensor_to_unix, unix_to_zoned, ParsedRow, RecordKind, SessionSummary, START_POSITION_LAT_FIELD,
    START_POSITION_LONG_FIELD, START_TIME_FIELD,
};

/// Extract the session summary for one sensor log.
///
/// `raw_text` is the undecoded table text, used by the fallback scan when
/// the structured pass finds no usable summary record.
pub fn extract_session<'r>(
    rows: impl IntoIterator<Item = &'r ParsedRow>,
    raw_text: Option<&str>,
    config: &CorrelateConfig,
) -> Result<SessionSummary, CorrelateError> {
    if let Some(summary) = scan_rows(rows, config) {
        return Ok(summary);
    }
    if let Some(content) = raw_text {
        warn!("no structured summary record, falling back to text scan");
        if let Some(summary) = scan_text(content, config) {
            return Ok(summary);
        }
    }
    Err(CorrelateError::NoStartTime)
}

fn scan_rows<'r>(
    rows: impl IntoIterator<Item = &'r ParsedRow>,
    config: &CorrelateConfig,
) -> Option<SessionSummary> {
    for row in rows {
        if row.kind != RecordKind::Session {
            continue;
        }

        let mut start_raw: Option<i64> = None;
        let mut lat: Option<i32> = None;
        let mut lon: Option<i32> = None;
        for triple in &row.fields {
            match triple.name.as_str() {
                START_TIME_FIELD => {
                    if let Ok(v) = triple.value.parse() {
                        start_raw = Some(v);
                    }
                }
                START_POSITION_LAT_FIELD => {
                    if let Ok(v) = triple.value.parse() {
                        lat = Some(v);
                    }
                }
                START_POSITION_LONG_FIELD => {
                    if let Ok(v) = triple.value.parse() {
                        lon = Some(v);
                    }
                }
                _ => {}
            }
        }

        // a summary record without a usable start time does not end the scan
        let Some(raw) = start_raw else {
            continue;
        };
        let start_time = unix_to_zoned(sensor_to_unix(raw), config.utc_offset)?;
        let gps = match (lat, lon) {
            (Some(lat), Some(lon)) => Some(semicircles_to_fix(lat, lon)),
            _ => None,
        };
        debug!("summary record found: dive starts at {start_time}");
        return Some(SessionSummary { start_time, gps });
    }
    None
}

fn scan_text(content: &str, config: &CorrelateConfig) -> Option<SessionSummary> {
    let raw = quoted_digits(content, START_TIME_FIELD)?;
    let start_time = unix_to_zoned(sensor_to_unix(raw), config.utc_offset)?;

    let gps = match (
        quoted_value(content, START_POSITION_LAT_FIELD).and_then(|v| v.parse::<i32>().ok()),
        quoted_value(content, START_POSITION_LONG_FIELD).and_then(|v| v.parse::<i32>().ok()),
    ) {
        (Some(lat), Some(lon)) => Some(semicircles_to_fix(lat, lon)),
        _ => None,
    };
    debug!("text scan recovered dive start {start_time}");
    Some(SessionSummary { start_time, gps })
}

/// Scan forward to `field,"` and return the digits inside the quotes.
///
/// Occurrences whose quoted value is not all digits are skipped, the way a
/// pattern scan would keep searching.
fn quoted_digits(content: &str, field: &str) -> Option<i64> {
    let marker = format!("{field},\"");
    let mut rest = content;
    loop {
        let parsed: IResult<&str, &str> = preceded(
            (take_until(marker.as_str()), tag(marker.as_str())),
            terminated(digit1, tag("\"")),
        )
        .parse(rest);
        if let Ok((_, digits)) = parsed {
            return digits.parse().ok();
        }
        let found = rest.find(&marker)?;
        rest = &rest[found + marker.len()..];
    }
}

/// Scan forward to `field,"` and return whatever sits inside the quotes.
fn quoted_value<'a>(content: &'a str, field: &str) -> Option<&'a str> {
    let marker = format!("{field},\"");
    let parsed: IResult<&str, &str> = preceded(
        (take_until(marker.as_str()), tag(marker.as_str())),
        take_until("\""),
    )
    .parse(content);
    parsed.ok().map(|(_, value)| value)
}
