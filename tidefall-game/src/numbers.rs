//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 and clamp it to the i32 range, returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_i32(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let min = cast::<i32, f64>(i32::MIN).unwrap_or(f64::MIN);
    let max = cast::<i32, f64>(i32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).round();
    cast::<f64, i32>(clamped).unwrap_or(0)
}

/// Saturate an i64 into the i32 range.
#[must_use]
pub fn saturate_i64_to_i32(value: i64) -> i32 {
    let min = i64::from(i32::MIN);
    let max = i64::from(i32::MAX);
    cast::<i64, i32>(value.clamp(min, max)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_handles_nan_and_range() {
        assert_eq!(round_f64_to_i32(f64::NAN), 0);
        assert_eq!(round_f64_to_i32(2.6), 3);
        assert_eq!(round_f64_to_i32(-2.6), -3);
        assert_eq!(round_f64_to_i32(1e18), i32::MAX);
        assert_eq!(round_f64_to_i32(-1e18), i32::MIN);
    }

    #[test]
    fn saturate_clamps_out_of_range() {
        assert_eq!(saturate_i64_to_i32(7), 7);
        assert_eq!(saturate_i64_to_i32(i64::MAX), i32::MAX);
        assert_eq!(saturate_i64_to_i32(i64::MIN), i32::MIN);
    }
}
