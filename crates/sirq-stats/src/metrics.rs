//! Scalar summaries over samples.

/// Two-sided 95% normal quantile.
pub const Z_95: f64 = 1.96;

/// Mean, spread and 95% normal confidence interval of a sample.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricSummary {
    pub n:         usize,
    pub mean:      f64,
    /// Sample standard deviation (n − 1 denominator); 0 when n < 2.
    pub std_dev:   f64,
    pub std_error: f64,
    pub ci_low:    f64,
    pub ci_high:   f64,
}

impl MetricSummary {
    /// Summarize `samples`.  An empty sample gives all zeros with `n == 0`.
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self::default();
        }
        let mean = mean(samples);
        let std_dev = if n > 1 {
            let ss: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        } else {
            0.0
        };
        let std_error = std_dev / (n as f64).sqrt();
        Self {
            n,
            mean,
            std_dev,
            std_error,
            ci_low:  mean - Z_95 * std_error,
            ci_high: mean + Z_95 * std_error,
        }
    }

    #[inline]
    pub fn ci_half_width(&self) -> f64 {
        (self.ci_high - self.ci_low) / 2.0
    }
}

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median; 0 for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Gini coefficient of non-negative values: mean absolute pairwise
/// difference over twice the mean.
///
/// Computed on sorted values as `Σ (2i − n − 1)·x_i / (n²·mean)`, i from 1.
/// Returns 0 for an empty slice or a zero mean.
pub fn gini(values: &[f64]) -> f64 {
    let n = values.len();
    let m = mean(values);
    if n == 0 || m <= 0.0 {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n_f = n as f64;
    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, x)| (2.0 * (i as f64 + 1.0) - n_f - 1.0) * x)
        .sum();
    weighted / (n_f * n_f * m)
}
