use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// Seconds between the sensor epoch (1989-12-31T00:00:00Z) and the Unix
/// epoch. Added to every raw sensor timestamp; bit-exact by contract.
pub const SENSOR_EPOCH_OFFSET: i64 = 631_065_600;

pub const TIMESTAMP_FIELD: &str = "timestamp";
pub const START_TIME_FIELD: &str = "start_time";
pub const START_POSITION_LAT_FIELD: &str = "start_position_lat";
pub const START_POSITION_LONG_FIELD: &str = "start_position_long";
pub const UNKNOWN_FIELD: &str = "unknown";

/// Convert a raw sensor timestamp to Unix seconds.
pub fn sensor_to_unix(raw: i64) -> i64 {
    raw + SENSOR_EPOCH_OFFSET
}

/// Express a Unix timestamp as an instant in the given target zone.
///
/// Returns `None` only for timestamps outside chrono's representable range.
pub fn unix_to_zoned(unix: i64, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    DateTime::from_timestamp(unix, 0).map(|utc| utc.with_timezone(&offset))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Record,
    TankUpdate,
    Session,
    Other(String),
}

impl RecordKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "record" => RecordKind::Record,
            "tank_update" => RecordKind::TankUpdate,
            "session" => RecordKind::Session,
            other => RecordKind::Other(other.to_string()),
        }
    }

    /// Only `record` and `tank_update` rows carry measurement samples.
    pub fn is_data_bearing(&self) -> bool {
        matches!(self, RecordKind::Record | RecordKind::TankUpdate)
    }
}

#[derive(Clone, Debug)]
pub struct FieldTriple {
    pub name: String,
    pub value: String,
    pub unit: String,
}

impl FieldTriple {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        FieldTriple {
            name: name.into(),
            value: value.into(),
            unit: unit.into(),
        }
    }

    pub fn numeric(&self) -> Option<f64> {
        self.value.parse().ok()
    }
}

/// One decoded table row as handed over by the external decoder.
#[derive(Clone, Debug)]
pub struct ParsedRow {
    pub kind: RecordKind,
    pub fields: Vec<FieldTriple>,
}

impl ParsedRow {
    pub fn field(&self, name: &str) -> Option<&FieldTriple> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Everything the decoder produced for one sensor log: the structured rows
/// plus, when available, the raw delimited text for the fallback scan.
#[derive(Clone, Debug)]
pub struct SensorLog {
    pub rows: Vec<ParsedRow>,
    pub raw_text: Option<String>,
    pub source_file: String,
}

/// Samples keyed by their compact one-letter legend key.
pub type MeasurementRow = BTreeMap<char, f64>;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LegendEntry {
    pub field: String,
    pub unit: String,
    pub key: char,
}

/// Maps logical field names to their physical unit and compact row key.
///
/// Keys are assigned in first-seen order, cycling `a..=z` and wrapping back
/// to `a`. More than 26 distinct fields therefore collide on their row key;
/// the field name recorded here stays unambiguous.
#[derive(Clone, Debug, Default, Serialize)]
pub struct UnitsLegend {
    entries: Vec<LegendEntry>,
}

impl UnitsLegend {
    pub fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }

    pub fn key_for(&self, field: &str) -> Option<char> {
        self.entries.iter().find(|e| e.field == field).map(|e| e.key)
    }

    pub fn unit_for(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.unit.as_str())
    }

    /// Return the key already assigned to `field`, or assign the next one.
    pub(crate) fn assign(&mut self, field: &str, unit: &str) -> char {
        if let Some(entry) = self.entries.iter().find(|e| e.field == field) {
            return entry.key;
        }
        let key = (b'a' + (self.entries.len() % 26) as u8) as char;
        self.entries.push(LegendEntry {
            field: field.to_string(),
            unit: unit.to_string(),
            key,
        });
        key
    }
}

/// Downsampled measurement series for one dive, sorted ascending by Unix
/// timestamp. The legend is a side field, never a sentinel key in the map.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TimeSeries {
    samples: BTreeMap<i64, MeasurementRow>,
    legend: UnitsLegend,
    #[serde(skip)]
    keys: Vec<i64>,
}

impl TimeSeries {
    pub(crate) fn new(samples: BTreeMap<i64, MeasurementRow>, legend: UnitsLegend) -> Self {
        let keys = samples.keys().copied().collect();
        TimeSeries {
            samples,
            legend,
            keys,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Ascending sample timestamps, for bisection.
    pub fn timestamps(&self) -> &[i64] {
        &self.keys
    }

    pub fn first_timestamp(&self) -> Option<i64> {
        self.keys.first().copied()
    }

    pub fn last_timestamp(&self) -> Option<i64> {
        self.keys.last().copied()
    }

    pub fn get(&self, timestamp: i64) -> Option<&MeasurementRow> {
        self.samples.get(&timestamp)
    }

    pub fn legend(&self) -> &UnitsLegend {
        &self.legend
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GpsFix {
    pub latitude: String,
    pub longitude: String,
    pub lat_decimal: f64,
    pub lon_decimal: f64,
}

/// Start-of-dive summary recovered from the sensor log.
#[derive(Clone, Debug)]
pub struct SessionSummary {
    pub start_time: DateTime<FixedOffset>,
    pub gps: Option<GpsFix>,
}

/// One complete dive record. End time is always the last series timestamp.
#[derive(Clone, Debug, Serialize)]
pub struct Dive {
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub series: TimeSeries,
    pub gps: Option<GpsFix>,
    pub source_file: String,
}

impl Dive {
    /// Inclusive dive-window containment, compared as instants.
    pub fn contains(&self, instant: DateTime<FixedOffset>) -> bool {
        self.start_time <= instant && instant <= self.end_time
    }

    /// Render the dive as the pretty JSON document the persistence
    /// collaborator writes to disk.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&serde_json::json!({ "data": self }))
    }
}

/// Per-photo correlation result; consumed immediately, never persisted.
#[derive(Clone, Debug)]
pub struct Match<'a> {
    pub dive: &'a Dive,
    pub sample_timestamp: i64,
    /// Magnitude of the distance between photo time and sample time.
    pub offset_sec: i64,
    pub depth: f64,
    pub temperature: Option<f64>,
}
