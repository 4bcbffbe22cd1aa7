//! Numeric conversion helpers centralizing safe numeric casts for statistics.

use num_traits::cast::cast;

/// Convert a count to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Convert a score to f64.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Arithmetic mean, 0.0 for an empty slice.
#[must_use]
pub fn mean(values: &[i32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: i64 = values.iter().map(|v| i64::from(*v)).sum();
    i64_to_f64(sum) / usize_to_f64(values.len())
}

/// Population standard deviation, 0.0 for an empty slice.
#[must_use]
pub fn std_dev(values: &[i32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values
        .iter()
        .map(|v| {
            let diff = f64::from(*v) - avg;
            diff * diff
        })
        .sum::<f64>()
        / usize_to_f64(values.len());
    variance.sqrt()
}

/// `part / whole`, or 0.0 when `whole` is zero.
#[must_use]
pub fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    usize_to_f64(part) / usize_to_f64(whole)
}
