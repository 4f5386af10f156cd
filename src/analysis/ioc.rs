//! Index of Coincidence across candidate transposition periods.
//!
//! For each period `p` the input is split into `p` interleaved blocks
//! (block `i` holds the bytes at positions congruent to `i` mod `p`) and the
//! IoC of every block is averaged. Periods matching the key length of a
//! polyalphabetic cipher stand out as peaks.
//!
//! Optimizations:
//! - Strided histogram counting, no per-block allocation
//! - Periods computed in parallel with rayon

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{AnalysisError, Result};

/// Smallest period the engine ever reports.
pub const MIN_PERIOD: usize = 2;

/// Half-width added around a degenerate (single-valued) IoC domain.
const DEGENERATE_DOMAIN_PAD: f64 = 0.5;

/// Averaged IoC for one candidate period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodSample {
    /// Candidate key length.
    pub period: usize,
    /// Mean IoC over the period's blocks.
    pub ioc: f64,
}

/// Inclusive value range of the series, widened when degenerate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IocDomain {
    pub min: f64,
    pub max: f64,
}

impl IocDomain {
    /// Domain covering `values`, widened by 0.5 each side when all values are equal.
    fn spanning(values: impl IntoIterator<Item = f64>) -> Self {
        let (mut min, mut max) = values
            .into_iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if min == max {
            min -= DEGENERATE_DOMAIN_PAD;
            max += DEGENERATE_DOMAIN_PAD;
        }
        Self { min, max }
    }

    /// Width of the domain.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// IoC curve over periods `2..=max_period`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// One sample per period, ascending, gap-free from 2.
    pub samples: Vec<PeriodSample>,
    /// Possibly widened min/max of the sample values.
    pub domain: IocDomain,
    /// Effective upper period bound `r`.
    pub max_period: usize,
}

impl Series {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the series has no samples (never true for an analyzed series).
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterate over the IoC values in period order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.ioc)
    }

    /// Sample for a given period, if inside the analyzed range.
    pub fn sample_for(&self, period: usize) -> Option<&PeriodSample> {
        period
            .checked_sub(MIN_PERIOD)
            .and_then(|idx| self.samples.get(idx))
    }
}

/// Index of Coincidence of a single block.
///
/// `IoC = sum(f * (f - 1)) / (N * (N - 1))`, defined as 0 when `N < 2`.
pub fn index_of_coincidence(block: &[u8]) -> f64 {
    let mut counts = [0u64; 256];
    for &byte in block {
        counts[byte as usize] += 1;
    }
    ioc_from_counts(&counts, block.len() as u64)
}

#[inline]
fn ioc_from_counts(counts: &[u64; 256], n: u64) -> f64 {
    if n < 2 {
        return 0.0;
    }
    let numerator: u64 = counts.iter().map(|&f| f * f.saturating_sub(1)).sum();
    numerator as f64 / (n * (n - 1)) as f64
}

/// Average IoC over the `period` interleaved blocks of `data`.
pub fn average_ioc(data: &[u8], period: usize) -> f64 {
    debug_assert!(period > 0);
    let mut counts = [0u64; 256];
    let mut total = 0.0;

    for residue in 0..period {
        counts.fill(0);
        let mut n = 0u64;
        for &byte in data.iter().skip(residue).step_by(period) {
            counts[byte as usize] += 1;
            n += 1;
        }
        total += ioc_from_counts(&counts, n);
    }

    total / period as f64
}

/// Effective upper period bound for a buffer of `len` bytes.
///
/// `max(2, min(requested, max(2, len / 2 - 1)))`: each block keeps enough
/// bytes for a meaningful estimate and the bound never drops below 2.
pub fn effective_max_period(len: usize, requested: usize) -> usize {
    let by_length = (len / 2).saturating_sub(1).max(MIN_PERIOD);
    requested.min(by_length).max(MIN_PERIOD)
}

/// Compute the averaged IoC for every period in `2..=r`.
///
/// Fails with [`AnalysisError::InsufficientData`] when fewer than two bytes
/// are supplied.
pub fn analyze(data: &[u8], max_period_requested: usize) -> Result<Series> {
    if data.len() < 2 {
        return Err(AnalysisError::InsufficientData { len: data.len() });
    }

    let max_period = effective_max_period(data.len(), max_period_requested);
    debug!(
        len = data.len(),
        requested = max_period_requested,
        max_period,
        "computing IoC series"
    );

    let samples: Vec<PeriodSample> = (MIN_PERIOD..=max_period)
        .into_par_iter()
        .map(|period| PeriodSample {
            period,
            ioc: average_ioc(data, period),
        })
        .collect();

    for sample in &samples {
        trace!(period = sample.period, ioc = sample.ioc);
    }

    let domain = IocDomain::spanning(samples.iter().map(|s| s.ioc));
    Ok(Series {
        samples,
        domain,
        max_period,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ioc_identical_bytes() {
        assert_eq!(index_of_coincidence(&[7u8; 2]), 1.0);
        assert_eq!(index_of_coincidence(&[0xAA; 1000]), 1.0);
    }

    #[test]
    fn test_ioc_short_blocks() {
        assert_eq!(index_of_coincidence(&[]), 0.0);
        assert_eq!(index_of_coincidence(&[42]), 0.0);
    }

    #[test]
    fn test_ioc_all_distinct() {
        let data: Vec<u8> = (0..=255).collect();
        assert_eq!(index_of_coincidence(&data), 0.0);
    }

    #[test]
    fn test_ioc_known_value() {
        // counts a=2, b=1, c=1: 2*1 / (4*3)
        let ioc = index_of_coincidence(b"abac");
        assert!((ioc - 2.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_average_ioc_matches_explicit_blocks() {
        let data = b"the quick brown fox jumps over the lazy dog";
        for period in 1..8 {
            let expected: f64 = (0..period)
                .map(|i| {
                    let block: Vec<u8> = data.iter().skip(i).step_by(period).copied().collect();
                    index_of_coincidence(&block)
                })
                .sum::<f64>()
                / period as f64;
            assert!((average_ioc(data, period) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_effective_max_period() {
        assert_eq!(effective_max_period(2, 40), 2);
        assert_eq!(effective_max_period(10, 40), 4);
        assert_eq!(effective_max_period(100, 40), 40);
        assert_eq!(effective_max_period(100, 0), 2);
        assert_eq!(effective_max_period(7, 1), 2);
    }

    #[test]
    fn test_analyze_insufficient_data() {
        assert!(matches!(
            analyze(b"x", 10),
            Err(AnalysisError::InsufficientData { len: 1 })
        ));
        assert!(matches!(
            analyze(b"", 10),
            Err(AnalysisError::InsufficientData { len: 0 })
        ));
    }

    #[test]
    fn test_analyze_periods_are_gap_free() {
        let data = b"xyzxyzxyzxyzxyzxyzxyzxyzxyz";
        let series = analyze(data, 100).unwrap();
        assert_eq!(series.max_period, 12);
        let periods: Vec<usize> = series.samples.iter().map(|s| s.period).collect();
        assert_eq!(periods, (2..=12).collect::<Vec<_>>());
    }

    #[test]
    fn test_analyze_detects_key_length() {
        let data = b"xyzxyzxyzxyzxyzxyzxyzxyzxyz";
        let series = analyze(data, 100).unwrap();
        // Every multiple of 3 splits the text into constant blocks
        for sample in &series.samples {
            if sample.period % 3 == 0 {
                assert_eq!(sample.ioc, 1.0, "period {}", sample.period);
            } else {
                assert!(sample.ioc < 0.5, "period {}", sample.period);
            }
        }
        assert_eq!(series.sample_for(3).map(|s| s.ioc), Some(1.0));
        assert_eq!(series.sample_for(1), None);
    }

    #[test]
    fn test_degenerate_domain_is_widened() {
        let series = analyze(&[9u8; 50], 10).unwrap();
        assert!(series.values().all(|v| v == 1.0));
        assert_eq!(series.domain, IocDomain { min: 0.5, max: 1.5 });
    }

    #[test]
    fn test_minimal_input() {
        let series = analyze(b"ab", 10).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.samples[0], PeriodSample { period: 2, ioc: 0.0 });
        assert_eq!(series.domain.span(), 1.0);
    }
}
