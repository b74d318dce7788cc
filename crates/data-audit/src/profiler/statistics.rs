//! Statistical helpers shared by the column profilers.
//!
//! Everything here works on already-extracted, non-missing values so the
//! profilers stay in charge of deciding what "missing" means for their kind.

use std::collections::HashMap;
use std::hash::Hash;

/// Quantile of sorted values using linear interpolation between closest ranks.
///
/// Returns `NaN` for an empty slice.
pub(crate) fn quantile_linear(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;

    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Outlier bounds `[Q1 - k*IQR, Q3 + k*IQR]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TukeyFence {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl TukeyFence {
    /// Build the fence from non-missing values. Empty input yields a `NaN`
    /// fence that flags nothing.
    pub fn from_values(values: &[f64], multiplier: f64) -> Self {
        let sorted = sorted_copy(values);
        let q1 = quantile_linear(&sorted, 0.25);
        let q3 = quantile_linear(&sorted, 0.75);
        let iqr = q3 - q1;

        Self {
            q1,
            q3,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        }
    }

    /// Strictly outside the fence. Comparisons against a `NaN` fence are false.
    #[inline]
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

pub(crate) fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn median(values: &[f64]) -> f64 {
    quantile_linear(&sorted_copy(values), 0.5)
}

/// Sample standard deviation (N - 1). `NaN` for fewer than two values.
pub(crate) fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }

    let mean = mean(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    variance.sqrt()
}

pub(crate) fn min(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::min).unwrap_or(f64::NAN)
}

pub(crate) fn max(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(f64::NAN)
}

/// Distinct values with their counts, most frequent first.
///
/// Ties keep the order in which values first appear. `Series::value_counts`
/// gives no order among equal counts, hence the manual count.
pub(crate) fn value_counts<T, I>(values: I) -> Vec<(T, usize)>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut order: Vec<T> = Vec::new();
    let mut counts: HashMap<T, usize> = HashMap::new();

    for value in values {
        let count = counts.entry(value.clone()).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }

    let mut result: Vec<(T, usize)> = order
        .into_iter()
        .map(|v| {
            let c = counts[&v];
            (v, c)
        })
        .collect();
    // stable sort keeps first-appearance order among equal counts
    result.sort_by(|a, b| b.1.cmp(&a.1));
    result
}

/// Most frequent value, ties broken toward the smallest value.
pub(crate) fn mode_smallest<T>(values: &[T]) -> Option<T>
where
    T: Ord + Hash + Clone,
{
    let counts = value_counts(values.iter().cloned());
    let top = counts.first()?.1;
    counts
        .into_iter()
        .filter(|(_, c)| *c == top)
        .map(|(v, _)| v)
        .min()
}
