//! GPS coordinate conversion from fixed-point semicircle units.
//!
//! Dive computers report positions as signed 32-bit "semicircles" where the
//! full ±2^31 range spans ±180°. Conversion produces decimal degrees and a
//! compact sexagesimal display string consumed downstream as-is.

use crate::models::GpsFix;

/// Semicircles in a half turn: 2^31.
const SEMICIRCLES_PER_HALF_TURN: f64 = 2_147_483_648.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn direction(&self, decimal: f64) -> char {
        match self {
            Axis::Latitude => {
                if decimal >= 0.0 {
                    'N'
                } else {
                    'S'
                }
            }
            Axis::Longitude => {
                if decimal >= 0.0 {
                    'E'
                } else {
                    'W'
                }
            }
        }
    }
}

/// Convert semicircle units to decimal degrees.
pub fn semicircles_to_degrees(value: i32) -> f64 {
    value as f64 * 180.0 / SEMICIRCLES_PER_HALF_TURN
}

/// Convert a latitude/longitude semicircle pair into a [`GpsFix`].
pub fn semicircles_to_fix(lat: i32, lon: i32) -> GpsFix {
    let lat_decimal = semicircles_to_degrees(lat);
    let lon_decimal = semicircles_to_degrees(lon);
    GpsFix {
        latitude: degrees_to_sexagesimal(lat_decimal, Axis::Latitude),
        longitude: degrees_to_sexagesimal(lon_decimal, Axis::Longitude),
        lat_decimal,
        lon_decimal,
    }
}

/// Format decimal degrees as `"<deg>,<min>.<sec*10000><dir>"`.
///
/// Seconds are rounded to 5 decimal places, scaled by 10 000 and zero-padded
/// to 5 digits: 8°30'5.8056" S renders as `"8,30.58056S"`. The scaling is a
/// display convention expected by downstream metadata writers, not a unit.
pub fn degrees_to_sexagesimal(decimal: f64, axis: Axis) -> String {
    let direction = axis.direction(decimal);
    let abs = decimal.abs();
    let degrees = abs.floor();
    let minutes_decimal = (abs - degrees) * 60.0;
    let minutes = minutes_decimal.floor();
    let seconds = (minutes_decimal - minutes) * 60.0;
    // round to 5 decimals, keep the first four scaled digits
    let scaled = ((seconds * 100_000.0).round() as i64) / 10;
    format!(
        "{},{:02}.{:05}{}",
        degrees as i64, minutes as i64, scaled, direction
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_north_and_east() {
        let fix = semicircles_to_fix(0, 0);
        assert_eq!(fix.latitude, "0,00.00000N");
        assert_eq!(fix.longitude, "0,00.00000E");
        assert_eq!(fix.lat_decimal, 0.0);
        assert_eq!(fix.lon_decimal, 0.0);
    }

    #[test]
    fn test_sign_selects_hemisphere() {
        let fix = semicircles_to_fix(-120_000_000, 120_000_000);
        assert!(fix.latitude.ends_with('S'));
        assert!(fix.longitude.ends_with('E'));
        assert!(fix.lat_decimal < 0.0);
        assert!(fix.lon_decimal > 0.0);
    }

    #[test]
    fn test_semicircles_to_degrees() {
        assert_eq!(semicircles_to_degrees(0), 0.0);
        assert_eq!(semicircles_to_degrees(1 << 30), 90.0);
        assert_eq!(semicircles_to_degrees(-(1 << 30)), -90.0);
    }

    #[test]
    fn test_display_convention() {
        // 8°30'5.8056" south of the equator
        let decimal = -(8.0 + 30.0 / 60.0 + 5.8056 / 3600.0);
        assert_eq!(
            degrees_to_sexagesimal(decimal, Axis::Latitude),
            "8,30.58056S"
        );
    }

    #[test]
    fn test_minutes_and_seconds_zero_padding() {
        // 10°02'0.09" east
        let decimal = 10.0 + 2.0 / 60.0 + 0.09 / 3600.0;
        assert_eq!(
            degrees_to_sexagesimal(decimal, Axis::Longitude),
            "10,02.00900E"
        );
    }
}
