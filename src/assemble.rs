//! Per-log orchestration: session summary plus time series become one dive.

use log::{info, warn};

use crate::config::CorrelateConfig;
use crate::error::CorrelateError;
use crate::models::{unix_to_zoned, Dive, ParsedRow, SensorLog};
use crate::series::build_series;
use crate::session::extract_session;

/// Assemble one [`Dive`] from a decoded sensor log.
///
/// The extractor runs first; without a start time the dive cannot be
/// windowed and processing aborts. The series is built second and must
/// contain at least one sample. End time is the last series timestamp,
/// never supplied independently.
pub fn assemble_dive(
    rows: &[ParsedRow],
    raw_text: Option<&str>,
    source_file: &str,
    config: &CorrelateConfig,
) -> Result<Dive, CorrelateError> {
    let summary = extract_session(rows.iter(), raw_text, config)?;

    let series = build_series(rows.iter(), config);
    let Some(last) = series.last_timestamp() else {
        return Err(CorrelateError::EmptySeries);
    };
    let end_time = unix_to_zoned(last, config.utc_offset).ok_or(CorrelateError::EmptySeries)?;

    info!(
        "{source_file}: dive from {} to {end_time}, {} samples",
        summary.start_time,
        series.len()
    );

    Ok(Dive {
        start_time: summary.start_time,
        end_time,
        series,
        gps: summary.gps,
        source_file: source_file.to_string(),
    })
}

/// Assemble every log in the batch, skipping unrecoverable dives.
///
/// A failed dive is logged and dropped; it never aborts the run. The
/// returned collection preserves input order and is read-only from here on.
pub fn assemble_all(logs: &[SensorLog], config: &CorrelateConfig) -> Vec<Dive> {
    let mut dives = Vec::with_capacity(logs.len());
    for log in logs {
        match assemble_dive(&log.rows, log.raw_text.as_deref(), &log.source_file, config) {
            Ok(dive) => dives.push(dive),
            Err(err) => warn!("{}: dive skipped: {err}", log.source_file),
        }
    }
    dives
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{sensor_to_unix, FieldTriple, RecordKind};

    fn row(kind: RecordKind, fields: &[(&str, &str, &str)]) -> ParsedRow {
        ParsedRow {
            kind,
            fields: fields
                .iter()
                .map(|(n, v, u)| FieldTriple::new(*n, *v, *u))
                .collect(),
        }
    }

    fn dive_rows() -> Vec<ParsedRow> {
        vec![
            row(RecordKind::Session, &[("start_time", "100", "s")]),
            row(
                RecordKind::Record,
                &[("timestamp", "100", "s"), ("depth", "5.0", "m")],
            ),
            row(
                RecordKind::Record,
                &[("timestamp", "120", "s"), ("depth", "8.0", "m")],
            ),
        ]
    }

    #[test]
    fn test_assembles_one_dive() {
        let config = CorrelateConfig::default();
        let dive = assemble_dive(&dive_rows(), None, "dive-01.log", &config).unwrap();

        assert_eq!(dive.start_time.timestamp(), sensor_to_unix(100));
        assert_eq!(dive.end_time.timestamp(), sensor_to_unix(120));
        assert_eq!(dive.series.len(), 2);
        assert_eq!(dive.source_file, "dive-01.log");
        assert!(dive.gps.is_none());
    }

    #[test]
    fn test_no_start_time_aborts_dive() {
        let config = CorrelateConfig::default();
        let rows = vec![row(
            RecordKind::Record,
            &[("timestamp", "100", "s"), ("depth", "5.0", "m")],
        )];
        let err = assemble_dive(&rows, None, "dive-02.log", &config).unwrap_err();
        assert_eq!(err, CorrelateError::NoStartTime);
    }

    #[test]
    fn test_empty_series_aborts_dive() {
        let config = CorrelateConfig::default();
        let rows = vec![row(RecordKind::Session, &[("start_time", "100", "s")])];
        let err = assemble_dive(&rows, None, "dive-03.log", &config).unwrap_err();
        assert_eq!(err, CorrelateError::EmptySeries);
    }

    #[test]
    fn test_batch_continues_past_failed_dives() {
        let config = CorrelateConfig::default();
        let logs = vec![
            SensorLog {
                rows: dive_rows(),
                raw_text: None,
                source_file: "dive-01.log".to_string(),
            },
            SensorLog {
                rows: Vec::new(),
                raw_text: None,
                source_file: "broken.log".to_string(),
            },
            SensorLog {
                rows: dive_rows(),
                raw_text: None,
                source_file: "dive-02.log".to_string(),
            },
        ];
        let dives = assemble_all(&logs, &config);

        assert_eq!(dives.len(), 2);
        assert_eq!(dives[0].source_file, "dive-01.log");
        assert_eq!(dives[1].source_file, "dive-02.log");
    }

    #[test]
    fn test_fallback_text_feeds_assembly() {
        let config = CorrelateConfig::default();
        let rows = vec![row(
            RecordKind::Record,
            &[("timestamp", "100", "s"), ("depth", "5.0", "m")],
        )];
        let dive = assemble_dive(
            &rows,
            Some("Data,1,session,start_time,\"90\",s\n"),
            "dive-04.log",
            &config,
        )
        .unwrap();
        assert_eq!(dive.start_time.timestamp(), sensor_to_unix(90));
    }
}
