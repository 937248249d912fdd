//! Photo-to-dive matching.
//!
//! Windowing picks the first dive, in input order, whose inclusive
//! [start, end] interval contains the photo instant; overlapping dives have
//! no further resolution policy. Within the matched dive a single
//! parameterized binary search finds the sample to read. The photo path
//! prefers the sample at or before the photo time: depth is treated as
//! holding constant from a sample until the next one, so the question "how
//! deep were we when this photo was taken" looks backward.

use chrono::{DateTime, FixedOffset};
use log::debug;

use crate::config::CorrelateConfig;
use crate::error::CorrelateError;
use crate::models::{Dive, Match};

/// Tie-break policy for [`closest_timestamp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreak {
    /// True nearest key in either direction; equidistant picks the earlier.
    NearestEitherSide,
    /// Latest key at or before the target.
    NearestAtOrBefore,
}

/// Locate the series key closest to `target` under the given policy.
///
/// `keys` must be sorted ascending. Whichever the policy, a target before
/// the first key yields the first key and a target past the last key yields
/// the last. Returns `None` only for an empty slice.
pub fn closest_timestamp(keys: &[i64], target: i64, policy: TieBreak) -> Option<i64> {
    let first = *keys.first()?;
    let last = *keys.last()?;
    if first > target {
        return Some(first);
    }
    if last < target {
        return Some(last);
    }

    // first <= target <= last, so the partition point is at least 1
    let idx = keys.partition_point(|&k| k <= target);
    let before = keys[idx - 1];
    match policy {
        TieBreak::NearestAtOrBefore => Some(before),
        TieBreak::NearestEitherSide => {
            if idx == keys.len() {
                return Some(before);
            }
            let after = keys[idx];
            if target - before <= after - target {
                Some(before)
            } else {
                Some(after)
            }
        }
    }
}

/// Correlate one photo against the assembled dive collection.
///
/// Returns `Ok(None)` when the photo falls outside every dive window; that
/// is a classification, not an error. A matched sample missing the depth
/// field is a hard failure for this photo only.
pub fn match_photo<'a>(
    photo_time: DateTime<FixedOffset>,
    dives: &'a [Dive],
    config: &CorrelateConfig,
) -> Result<Option<Match<'a>>, CorrelateError> {
    let Some(dive) = dives.iter().find(|d| d.contains(photo_time)) else {
        debug!("photo at {photo_time} is outside every dive window");
        return Ok(None);
    };

    let target = photo_time.timestamp();
    let Some(sample_timestamp) =
        closest_timestamp(dive.series.timestamps(), target, TieBreak::NearestAtOrBefore)
    else {
        return Ok(None);
    };
    let offset_sec = (sample_timestamp - target).abs();

    let missing = |field: &str| CorrelateError::MissingMeasurement {
        timestamp: sample_timestamp,
        field: field.to_string(),
    };
    let row = dive
        .series
        .get(sample_timestamp)
        .ok_or_else(|| missing(&config.depth_field))?;

    let legend = dive.series.legend();
    let depth = legend
        .key_for(&config.depth_field)
        .and_then(|key| row.get(&key).copied())
        .ok_or_else(|| missing(&config.depth_field))?;
    let temperature = legend
        .key_for(&config.temperature_field)
        .and_then(|key| row.get(&key).copied());

    debug!(
        "photo at {photo_time} matched {} at {sample_timestamp} ({offset_sec}s away)",
        dive.source_file
    );
    Ok(Some(Match {
        dive,
        sample_timestamp,
        offset_sec,
        depth,
        temperature,
    }))
}
