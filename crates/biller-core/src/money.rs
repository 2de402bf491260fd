//! Rendering of money values with floating-point drift removed.
//!
//! Dividing a bill by share units leaves representation noise in the low
//! digits (`120.57000000000049`). A value that agrees with its 8-digit
//! rounding down to the 12th digit is shown as that rounding; anything else
//! carries real precision and is shown as-is.

/// Digits kept when a value is considered equal to its rounding.
const EQUALITY_DIGITS: usize = 8;

/// Digits used to decide whether the rounding discarded anything real.
const COERCION_DIGITS: usize = 12;

/// Unit of the coercion precision.
const COERCION_TOLERANCE: f64 = 1e-12;

/// Rounds to `digits` decimal places using exact decimal rounding.
fn round_to(value: f64, digits: usize) -> f64 {
    format!("{value:.digits$}").parse().unwrap_or(value)
}

/// Renders a money value, snapping it to 8 decimal places when the
/// difference is only floating-point drift.
pub fn coerce_to_nearest(value: f64) -> String {
    let tolerant = round_to(value, EQUALITY_DIGITS);
    let strict = round_to(value, COERCION_DIGITS);
    tracing::trace!(value, tolerant, strict, "coercing money value");

    let shown = if (tolerant - strict).abs() < COERCION_TOLERANCE / 10.0 {
        tolerant
    } else {
        value
    };
    if shown == 0.0 {
        // Avoids rendering "-0".
        return "0".to_string();
    }
    shown.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snaps_drift_around_two_decimals() {
        assert_eq!(coerce_to_nearest(120.57), "120.57");
        assert_eq!(coerce_to_nearest(120.570_000_000_000_49), "120.57");
        assert_eq!(coerce_to_nearest(120.569_999_999_999_51), "120.57");
        // 120.56999999999950 is stored as 120.569999999999495... so it stays.
        assert_eq!(coerce_to_nearest(120.569_999_999_999_50), "120.5699999999995");
    }

    #[test]
    fn snaps_drift_around_three_decimals() {
        assert_eq!(coerce_to_nearest(23.456), "23.456");
        assert_eq!(coerce_to_nearest(23.456_000_000_000_05), "23.456");
        assert_eq!(coerce_to_nearest(23.455_999_999_999_95), "23.456");
    }

    #[test]
    fn keeps_genuine_precision() {
        // 0.1234567899995000 is stored as 0.123456789999499993...
        assert_eq!(coerce_to_nearest(0.123_456_789_999_500_0), "0.1234567899995");
        assert_eq!(coerce_to_nearest(-0.123_456_780_000_499_9), "-0.12345678");
        assert_eq!(coerce_to_nearest(0.123_456_789_998_999_9), "0.1234567899989999");
        assert_eq!(coerce_to_nearest(0.123_456_780_001_000_0), "0.123456780001");
        assert_eq!(coerce_to_nearest(123_456.123_456_789_99), "123456.12345679");
        assert_eq!(coerce_to_nearest(-123_456.123_456_780_00), "-123456.12345678");
        assert_eq!(coerce_to_nearest(123_456.123_456_789_98), "123456.12345678998");
        assert_eq!(coerce_to_nearest(123_456.123_456_780_01), "123456.12345678001");
        assert_eq!(coerce_to_nearest(1_234_567_890.123_499_9), "1234567890.1234999");
        assert_eq!(coerce_to_nearest(-1_234_567_890.123_400_0), "-1234567890.1234");
        // Stored as 1234567890.12349963188171386719.
        assert_eq!(coerce_to_nearest(1_234_567_890.123_499_7), "1234567890.1234996");
        // Stored as 1234567890.12340021133422851563.
        assert_eq!(coerce_to_nearest(1_234_567_890.123_400_1), "1234567890.1234002");
    }

    #[test]
    fn integers_render_without_fraction() {
        assert_eq!(coerce_to_nearest(9.0), "9");
        assert_eq!(coerce_to_nearest(3292.0), "3292");
        assert_eq!(coerce_to_nearest(-0.0), "0");
    }
}
