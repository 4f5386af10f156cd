//! Anomalous-period detection over an IoC series.
//!
//! A period is flagged when its IoC sits more than `z_threshold` sample
//! standard deviations above the series mean. Only the upper tail matters:
//! a key length shows up as an IoC spike, never a dip.

use serde::Serialize;

use super::ioc::PeriodSample;

/// Standard deviations at or below this are treated as zero.
const STDDEV_EPSILON: f64 = 1e-9;

/// Mean and Bessel-corrected standard deviation of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesStats {
    pub mean: f64,
    pub stddev: f64,
}

impl SeriesStats {
    /// Compute stats over `values`. Standard deviation is 0 for fewer than two values.
    pub fn from_values(values: &[f64]) -> Self {
        let n = values.len();
        if n == 0 {
            return Self {
                mean: 0.0,
                stddev: 0.0,
            };
        }

        let mean = values.iter().sum::<f64>() / n as f64;
        let stddev = if n > 1 {
            let sum_sq: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
            (sum_sq / (n - 1) as f64).sqrt()
        } else {
            0.0
        };

        Self { mean, stddev }
    }

    /// Z-score of `value`, or `None` when the spread is degenerate.
    pub fn z_score(&self, value: f64) -> Option<f64> {
        (self.stddev > STDDEV_EPSILON).then(|| (value - self.mean) / self.stddev)
    }
}

/// Flag every sample whose z-score exceeds `z_threshold`.
///
/// Returns one flag per sample; all false when the series has no spread.
pub fn flag_outliers(samples: &[PeriodSample], z_threshold: f64) -> Vec<bool> {
    let values: Vec<f64> = samples.iter().map(|s| s.ioc).collect();
    let stats = SeriesStats::from_values(&values);
    values
        .iter()
        .map(|&v| stats.z_score(v).is_some_and(|z| z > z_threshold))
        .collect()
}

/// Collapse runs of adjacent flagged samples to their highest point.
///
/// Flagged indices no more than one position apart form a cluster; each
/// cluster contributes the index of its maximum IoC (earliest on ties).
pub fn peak_indices(samples: &[PeriodSample], flags: &[bool]) -> Vec<usize> {
    let mut peaks = Vec::new();
    let mut best: Option<usize> = None;
    let mut last_flagged: Option<usize> = None;

    for idx in flags.iter().enumerate().filter_map(|(i, &f)| f.then_some(i)) {
        if idx >= samples.len() {
            break;
        }
        let adjacent = last_flagged.is_some_and(|last| idx - last <= 1);
        if !adjacent {
            peaks.extend(best.take());
        }
        best = match best {
            Some(b) if samples[b].ioc >= samples[idx].ioc => Some(b),
            _ => Some(idx),
        };
        last_flagged = Some(idx);
    }
    peaks.extend(best);
    peaks
}
