//! Descriptive statistics shared by every metric in the workspace.
//!
//! Standard deviation uses the sample convention (denominator `n - 1`)
//! everywhere.

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation.
///
/// Fewer than two observations carry no dispersion information; the result
/// is `0.0` in that case.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let Some(mean) = mean(values) else {
        return 0.0;
    };
    let sum_sq: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    (sum_sq / (n - 1) as f64).sqrt()
}
