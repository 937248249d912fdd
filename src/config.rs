use chrono::{FixedOffset, Offset, Utc};

/// Runtime knobs for one correlation run.
///
/// `allowed_fields` is an ordered set: legend keys are handed out in the
/// order fields are first seen in the data, so with the default list depth
/// ends up on key `a` and temperature on key `b`.
#[derive(Clone, Debug)]
pub struct CorrelateConfig {
    /// Minimum seconds between retained samples. 0 disables downsampling.
    pub sample_spacing_sec: i64,
    /// Field names extracted into the series, in legend order.
    pub allowed_fields: Vec<String>,
    /// Field read as the depth measurement when matching photos.
    pub depth_field: String,
    /// Field read as the temperature measurement, when present.
    pub temperature_field: String,
    /// Target zone for all instants surfaced to callers.
    pub utc_offset: FixedOffset,
}

impl Default for CorrelateConfig {
    fn default() -> Self {
        CorrelateConfig {
            sample_spacing_sec: 10,
            allowed_fields: vec!["depth".to_string(), "temperature".to_string()],
            depth_field: "depth".to_string(),
            temperature_field: "temperature".to_string(),
            utc_offset: Utc.fix(),
        }
    }
}

impl CorrelateConfig {
    pub fn is_allowed(&self, field: &str) -> bool {
        self.allowed_fields.iter().any(|f| f == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CorrelateConfig::default();
        assert_eq!(config.sample_spacing_sec, 10);
        assert!(config.is_allowed("depth"));
        assert!(config.is_allowed("temperature"));
        assert!(!config.is_allowed("heart_rate"));
        assert_eq!(config.utc_offset.local_minus_utc(), 0);
    }
}
