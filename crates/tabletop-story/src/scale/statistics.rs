//! Descriptive statistics over numeric columns.
//!
//! NaN marks a missing value and is excluded from every computation.

use crate::utils::defined;

/// Mean of the defined values, `None` if there are none.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    let (sum, n) = defined(values).fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Sample standard deviation (n - 1) of the defined values.
pub(crate) fn calculate_std(values: &[f64]) -> f64 {
    let n = defined(values).count();
    if n <= 1 {
        return 0.0;
    }
    let mean = mean(values).unwrap_or(0.0);

    let variance: f64 = defined(values).map(|v| (v - mean).powi(2)).sum::<f64>() / (n as f64 - 1.0);

    variance.sqrt()
}

/// Third standardized moment: mean of `((x - mean) / std)^3`.
pub(crate) fn calculate_skewness(values: &[f64]) -> f64 {
    let std = calculate_std(values);
    if std == 0.0 {
        return 0.0;
    }
    let mean = mean(values).unwrap_or(0.0);
    let n = defined(values).count() as f64;

    let skew_sum: f64 = defined(values).map(|v| ((v - mean) / std).powi(3)).sum();

    skew_sum / n
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== calculate_std tests ====================

    #[test]
    fn test_calculate_std_basic() {
        // Mean = 3, sample variance = 10 / 4 = 2.5
        let std = calculate_std(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!((std - 2.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_calculate_std_single_value() {
        assert_eq!(calculate_std(&[5.0]), 0.0);
    }

    #[test]
    fn test_calculate_std_identical_values() {
        assert_eq!(calculate_std(&[5.0, 5.0, 5.0, 5.0]), 0.0);
    }

    #[test]
    fn test_calculate_std_ignores_nan() {
        let with_nan = calculate_std(&[1.0, f64::NAN, 2.0, 3.0, 4.0, 5.0]);
        let without = calculate_std(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(with_nan, without);
    }

    // ==================== calculate_skewness tests ====================

    #[test]
    fn test_calculate_skewness_symmetric() {
        let skew = calculate_skewness(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(skew.abs() < 1e-12);
    }

    #[test]
    fn test_calculate_skewness_positive() {
        let skew = calculate_skewness(&[1.0, 2.0, 3.0, 4.0, 1000.0]);
        assert!(skew >= 1.0, "expected strong right skew, got {skew}");
    }

    #[test]
    fn test_calculate_skewness_negative() {
        let skew = calculate_skewness(&[-1000.0, 1.0, 2.0, 3.0, 4.0]);
        assert!(skew <= -1.0, "expected strong left skew, got {skew}");
    }

    #[test]
    fn test_calculate_skewness_zero_std() {
        assert_eq!(calculate_skewness(&[5.0, 5.0, 5.0, 5.0]), 0.0);
    }

    #[test]
    fn test_mean_of_nothing() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[f64::NAN]), None);
    }
}
