//! Currency amounts cross the API boundary as integer micros (millionths of a unit).

use crate::constants::MICROS_PER_UNIT;

/// Convert a currency amount to micros, flooring any fractional micro
///
/// Products that land within floating-point noise of a whole micro (`0.29 * 1e6`) snap to it
/// instead of flooring one micro short.
#[allow(clippy::cast_possible_truncation)]
pub fn to_micros(amount: f64) -> i64 {
    let scaled = amount * MICROS_PER_UNIT;
    let nearest = scaled.round();
    if (scaled - nearest).abs() < 1e-6 {
        nearest as i64
    } else {
        scaled.floor() as i64
    }
}

/// Convert micros back to a currency amount
#[allow(clippy::cast_precision_loss)]
pub fn from_micros(micros: i64) -> f64 {
    micros as f64 / MICROS_PER_UNIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_micros_exact_values() {
        assert_eq!(to_micros(12.50), 12_500_000);
        assert_eq!(to_micros(0.0), 0);
        assert_eq!(to_micros(1.0), 1_000_000);
        assert_eq!(to_micros(0.29), 290_000);
    }

    #[test]
    fn test_to_micros_floors_fractional_micros() {
        assert_eq!(to_micros(1.000_000_7), 1_000_000);
        assert_eq!(to_micros(0.000_001_9), 1);
    }

    #[test]
    fn test_from_micros() {
        assert!((from_micros(2_500_000) - 2.5).abs() < f64::EPSILON);
        assert!(from_micros(0).abs() < f64::EPSILON);
    }
}
