//! Apparent temperature from dry-bulb temperature and relative humidity, using
//! the NOAA Rothfusz regression.

/// Below this temperature (°F) no heat-index correction applies.
pub const HEAT_INDEX_MIN_TEMPERATURE_F: f64 = 80.0;

/// Returns the heat index in °F.
///
/// Humidity is clamped to `[0, 100]`. For temperatures below 80°F the input
/// temperature is returned unchanged. Otherwise the Rothfusz regression is applied,
/// followed by NOAA's low-humidity (RH < 13%, 80–112°F) and high-humidity
/// (RH > 85%, 80–87°F) adjustments.
pub fn heat_index(temperature_f: f64, humidity_pct: f64) -> f64 {
    if temperature_f < HEAT_INDEX_MIN_TEMPERATURE_F {
        return temperature_f;
    }

    let t = temperature_f;
    let rh = humidity_pct.clamp(0.0, 100.0);
    let mut hi = rothfusz(t, rh);

    if rh < 13.0 && (80.0..=112.0).contains(&t) {
        hi -= ((13.0 - rh) / 4.0) * ((17.0 - (t - 95.0).abs()) / 17.0).sqrt();
    } else if rh > 85.0 && (80.0..=87.0).contains(&t) {
        hi += ((rh - 85.0) / 10.0) * ((87.0 - t) / 5.0);
    }

    hi
}

fn rothfusz(t: f64, rh: f64) -> f64 {
    -42.379 + 2.04901523 * t + 10.14333127 * rh
        - 0.22475541 * t * rh
        - 6.83783e-3 * t * t
        - 5.481717e-2 * rh * rh
        + 1.22874e-3 * t * t * rh
        + 8.5282e-4 * t * rh * rh
        - 1.99e-6 * t * t * rh * rh
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(-10.0)]
    #[case(32.0)]
    #[case(70.0)]
    #[case(79.9)]
    fn test_below_threshold_returns_temperature(#[case] temperature: f64) {
        for humidity in (0..=100).step_by(5) {
            assert_eq!(heat_index(temperature, humidity as f64), temperature);
        }
    }

    #[test]
    fn test_regression_dominates_in_hot_humid_air() {
        let hi = heat_index(95.0, 50.0);
        assert!(hi > 95.0, "expected heat index above 95, got {}", hi);
        // NOAA chart reads 105°F for 95°F / 50%.
        assert!((hi - 105.0).abs() < 1.0, "got {}", hi);
    }

    #[test]
    fn test_matches_noaa_chart_at_high_temperature() {
        // NOAA chart: 90°F / 70% -> 106°F.
        let hi = heat_index(90.0, 70.0);
        assert!((hi - 106.0).abs() < 1.5, "got {}", hi);
    }

    #[test]
    fn test_low_humidity_adjustment_is_subtracted() {
        let hi = heat_index(100.0, 5.0);
        let raw = rothfusz(100.0, 5.0);
        let expected = raw - (8.0 / 4.0) * ((17.0 - 5.0) / 17.0_f64).sqrt();
        assert!((hi - expected).abs() < 1e-9);
        assert!(hi < raw);
    }

    #[test]
    fn test_low_humidity_adjustment_skipped_above_112() {
        assert_eq!(heat_index(115.0, 5.0), rothfusz(115.0, 5.0));
    }

    #[test]
    fn test_high_humidity_adjustment_is_added() {
        let hi = heat_index(82.0, 95.0);
        let raw = rothfusz(82.0, 95.0);
        let expected = raw + (10.0 / 10.0) * (5.0 / 5.0);
        assert!((hi - expected).abs() < 1e-9);
    }

    #[test]
    fn test_high_humidity_adjustment_skipped_above_87() {
        assert_eq!(heat_index(90.0, 95.0), rothfusz(90.0, 95.0));
    }

    #[test]
    fn test_humidity_is_clamped() {
        assert_eq!(heat_index(95.0, 140.0), heat_index(95.0, 100.0));
        assert_eq!(heat_index(95.0, -20.0), heat_index(95.0, 0.0));
    }
}
