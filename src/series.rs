//! Time series construction from decoded table rows.
//!
//! Streams rows from the external decoder, converts raw sensor timestamps to
//! Unix time, enforces a minimum spacing between retained samples and stores
//! allow-listed fields under compact legend keys. Rows sharing a timestamp
//! (two record kinds can log the same second) merge with insert-if-absent
//! semantics: on key collision the value already present wins.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use log::debug;

use crate::config::CorrelateConfig;
use crate::models::{
    sensor_to_unix, MeasurementRow, ParsedRow, TimeSeries, UnitsLegend, TIMESTAMP_FIELD,
    UNKNOWN_FIELD,
};

/// Incremental builder for one dive's [`TimeSeries`].
///
/// The legend is mutable only while the builder lives; [`finish`] freezes it
/// together with the sorted samples.
///
/// [`finish`]: SeriesBuilder::finish
pub struct SeriesBuilder<'a> {
    config: &'a CorrelateConfig,
    samples: BTreeMap<i64, MeasurementRow>,
    legend: UnitsLegend,
    last_retained: Option<i64>,
    dropped: u64,
}

impl<'a> SeriesBuilder<'a> {
    pub fn new(config: &'a CorrelateConfig) -> Self {
        SeriesBuilder {
            config,
            samples: BTreeMap::new(),
            legend: UnitsLegend::default(),
            last_retained: None,
            dropped: 0,
        }
    }

    /// Consume one decoded row.
    pub fn push(&mut self, row: &ParsedRow) {
        if !row.kind.is_data_bearing() {
            return;
        }

        let Some(timestamp) = row
            .field(TIMESTAMP_FIELD)
            .and_then(|f| f.value.parse::<i64>().ok())
            .map(sensor_to_unix)
        else {
            return;
        };

        // frequency gate: the whole row is dropped and the retained pointer
        // does not advance
        if self.config.sample_spacing_sec > 0 {
            if let Some(prev) = self.last_retained {
                if timestamp - prev < self.config.sample_spacing_sec {
                    self.dropped += 1;
                    return;
                }
            }
        }
        self.last_retained = Some(timestamp);

        let mut this_row = MeasurementRow::new();
        for triple in &row.fields {
            if triple.name == TIMESTAMP_FIELD || triple.name == UNKNOWN_FIELD {
                continue;
            }
            let Some(value) = triple.numeric() else {
                continue;
            };
            if !self.config.is_allowed(&triple.name) {
                continue;
            }
            let key = self.legend.assign(&triple.name, &triple.unit);
            this_row.insert(key, value);
        }
        if this_row.is_empty() {
            return;
        }

        match self.samples.entry(timestamp) {
            Entry::Vacant(slot) => {
                slot.insert(this_row);
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                for (key, value) in this_row {
                    existing.entry(key).or_insert(value);
                }
            }
        }
    }

    /// Freeze the accumulated samples and legend into a [`TimeSeries`].
    pub fn finish(self) -> TimeSeries {
        debug!(
            "series built: {} samples retained, {} rows dropped by frequency gate",
            self.samples.len(),
            self.dropped
        );
        TimeSeries::new(self.samples, self.legend)
    }
}

/// Build a [`TimeSeries`] from a row stream in one call.
///
/// An empty or entirely unparsable stream yields an empty series; the caller
/// treats that as "no data for this dive".
pub fn build_series<'r>(
    rows: impl IntoIterator<Item = &'r ParsedRow>,
    config: &CorrelateConfig,
) -> TimeSeries {
    let mut builder = SeriesBuilder::new(config);
    for row in rows {
        builder.push(row);
    }
    builder.finish()
}
