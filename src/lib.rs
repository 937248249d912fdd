//! Telemetry ingestion and time-correlation core for dive photography.
//!
//! Consumes decoded sensor-log rows from an external decoder, builds a
//! frequency-downsampled time series per dive, recovers the dive's start
//! time and GPS fix, and matches photo timestamps to the nearest-at-or-before
//! sample inside a dive window. File traversal, metadata patching and report
//! output belong to external collaborators; this crate is plain data in,
//! plain data out.
//!
//! # Example
//!
//! ```
//! use divephoto_correlate::{
//!     assemble_dive, match_photo, CorrelateConfig, FieldTriple, ParsedRow, RecordKind,
//! };
//!
//! let config = CorrelateConfig {
//!     sample_spacing_sec: 0,
//!     ..CorrelateConfig::default()
//! };
//! let rows = vec![
//!     ParsedRow {
//!         kind: RecordKind::Session,
//!         fields: vec![FieldTriple::new("start_time", "100", "s")],
//!     },
//!     ParsedRow {
//!         kind: RecordKind::Record,
//!         fields: vec![
//!             FieldTriple::new("timestamp", "100", "s"),
//!             FieldTriple::new("depth", "12.5", "m"),
//!         ],
//!     },
//! ];
//!
//! let dive = assemble_dive(&rows, None, "2024-06-01.log", &config).expect("dive");
//! let dives = std::slice::from_ref(&dive);
//! let matched = match_photo(dive.start_time, dives, &config)
//!     .expect("photo")
//!     .expect("inside the dive window");
//! assert_eq!(matched.depth, 12.5);
//! assert_eq!(matched.offset_sec, 0);
//! ```

pub mod assemble;
pub mod config;
pub mod coords;
pub mod error;
pub mod matching;
pub mod models;
pub mod series;
pub mod session;

pub use assemble::{assemble_all, assemble_dive};
pub use config::CorrelateConfig;
pub use coords::{degrees_to_sexagesimal, semicircles_to_degrees, semicircles_to_fix, Axis};
pub use error::CorrelateError;
pub use matching::{closest_timestamp, match_photo, TieBreak};
pub use models::{
    sensor_to_unix, unix_to_zoned, Dive, FieldTriple, GpsFix, LegendEntry, Match, MeasurementRow,
    ParsedRow, RecordKind, SensorLog, SessionSummary, TimeSeries, UnitsLegend,
    SENSOR_EPOCH_OFFSET,
};
pub use series::{build_series, SeriesBuilder};
pub use session::extract_session;
