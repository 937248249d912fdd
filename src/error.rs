use thiserror::Error;

/// Error type for telemetry ingestion and photo correlation.
///
/// Nothing here is process-fatal: per-dive errors abort only that dive and
/// per-photo errors abort only that photo's match. A photo falling outside
/// every dive window is a classification, not an error, and does not appear
/// here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorrelateError {
    #[error("decoder did not produce a table: {0}")]
    DecodeUnavailable(String),

    #[error("no dive start time found by either extraction strategy")]
    NoStartTime,

    #[error("no usable measurement rows in sensor log")]
    EmptySeries,

    #[error("sample at {timestamp} is missing the '{field}' field")]
    MissingMeasurement { timestamp: i64, field: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlate_error_display() {
        let err = CorrelateError::DecodeUnavailable("exit code 1".to_string());
        assert_eq!(err.to_string(), "decoder did not produce a table: exit code 1");

        let err = CorrelateError::NoStartTime;
        assert_eq!(
            err.to_string(),
            "no dive start time found by either extraction strategy"
        );

        let err = CorrelateError::MissingMeasurement {
            timestamp: 731_065_600,
            field: "depth".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "sample at 731065600 is missing the 'depth' field"
        );
    }
}
