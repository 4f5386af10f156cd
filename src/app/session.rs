//! Analysis session: the cached result of the last run.
//!
//! A run builds a complete [`Snapshot`] first and then publishes it with a
//! single pointer swap, so a reader sees either the previous result, the new
//! one, or nothing. A failed run publishes nothing and leaves the session
//! invalid.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use super::config::AnalysisConfig;
use crate::analysis::{analyze, flag_outliers, peak_indices, IocDomain, PeriodSample, Series};
use crate::decode::{decode, Encoding};
use crate::error::Result;
use crate::plot::{hit_test, CoordinateMapper, HitRadii, HitResult, PlotFrame, Point};
use crate::util::format_bytes;

// =============================================================================
// Request
// =============================================================================

/// Everything one analysis run needs.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisRequest<'a> {
    /// Encoded input.
    pub input: &'a [u8],
    /// Declared encoding of `input`.
    pub encoding: Encoding,
    /// Declared input length; bytes past it are ignored.
    pub input_len: usize,
    /// Thresholds, bounds and display geometry.
    pub config: &'a AnalysisConfig,
}

impl<'a> AnalysisRequest<'a> {
    /// Request covering the whole of `input`.
    pub fn new(input: &'a [u8], encoding: Encoding, config: &'a AnalysisConfig) -> Self {
        Self {
            input,
            encoding,
            input_len: input.len(),
            config,
        }
    }

    /// Override the declared input length.
    pub fn with_len(mut self, input_len: usize) -> Self {
        self.input_len = input_len;
        self
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Immutable result of a successful run.
///
/// `series`, `points` and `outliers` always have the same, non-zero length.
#[derive(Debug, Clone)]
pub struct Snapshot {
    series: Series,
    points: Vec<Point>,
    outliers: Vec<bool>,
    mapper: CoordinateMapper,
    radii: HitRadii,
}

impl Snapshot {
    /// Decode, analyze, flag and scale in one go.
    pub fn build(request: &AnalysisRequest<'_>) -> Result<Self> {
        let config = request.config;
        config.validate()?;
        let bytes = decode(
            request.input,
            request.encoding,
            request.input_len,
            config.lenient,
        )?;
        debug!(
            encoding = %request.encoding,
            decoded = %format_bytes(bytes.len() as u64),
            "decoded input"
        );

        let series = analyze(&bytes, config.max_period)?;

        let outliers = if config.detect_outliers {
            flag_outliers(&series.samples, config.outlier_threshold)
        } else {
            vec![false; series.len()]
        };

        let mapper =
            CoordinateMapper::for_domain(config.viewport(), series.max_period, series.domain);
        let points = series.samples.iter().map(|s| mapper.map(s)).collect();

        Ok(Self {
            series,
            points,
            outliers,
            mapper,
            radii: config.hit_radii,
        })
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn samples(&self) -> &[PeriodSample] {
        &self.series.samples
    }

    /// Display-space position of every sample.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Outlier flag for every sample.
    pub fn outliers(&self) -> &[bool] {
        &self.outliers
    }

    pub fn domain(&self) -> IocDomain {
        self.series.domain
    }

    pub fn max_period(&self) -> usize {
        self.series.max_period
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// Sample indices of the highest point in each run of flagged periods.
    pub fn peaks(&self) -> Vec<usize> {
        peak_indices(&self.series.samples, &self.outliers)
    }

    /// Hit-test a cursor with the radii configured for this run.
    pub fn query(&self, x: f64, y: f64) -> HitResult {
        self.query_with(x, y, self.radii)
    }

    pub fn query_with(&self, x: f64, y: f64, radii: HitRadii) -> HitResult {
        hit_test(&self.points, Point::new(x, y), radii)
    }

    /// Everything a renderer needs to draw this snapshot with `hit` highlighted.
    pub fn frame(&self, hit: HitResult) -> PlotFrame {
        PlotFrame::build(self, hit)
    }
}

// =============================================================================
// AnalysisSession
// =============================================================================

/// Single-owner session.
#[derive(Debug, Clone, Default)]
pub struct AnalysisSession {
    current: Option<Arc<Snapshot>>,
}

impl AnalysisSession {
    /// Create an empty, invalid session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run an analysis and replace the session contents.
    ///
    /// On failure the session is left invalid and empty.
    pub fn run_analysis(&mut self, request: &AnalysisRequest<'_>) -> Result<()> {
        let next = publish(request);
        self.current = next.as_ref().ok().cloned();
        next.map(|_| ())
    }

    /// Drop the current result.
    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn is_valid(&self) -> bool {
        self.current.is_some()
    }

    /// Shared handle to the current result.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.current.clone()
    }

    /// Current series samples, empty when invalid.
    pub fn series(&self) -> &[PeriodSample] {
        self.current.as_deref().map_or(&[] as &[_], Snapshot::samples)
    }

    /// Current scaled points, empty when invalid.
    pub fn points(&self) -> &[Point] {
        self.current.as_deref().map_or(&[] as &[_], Snapshot::points)
    }

    /// Current outlier flags, empty when invalid.
    pub fn outliers(&self) -> &[bool] {
        self.current.as_deref().map_or(&[] as &[_], Snapshot::outliers)
    }

    pub fn domain(&self) -> Option<IocDomain> {
        self.current.as_deref().map(Snapshot::domain)
    }

    pub fn max_period(&self) -> Option<usize> {
        self.current.as_deref().map(Snapshot::max_period)
    }

    /// Hit-test a cursor; `HitResult::None` when the session is invalid.
    pub fn query(&self, x: f64, y: f64) -> HitResult {
        self.current
            .as_deref()
            .map_or(HitResult::None, |snap| snap.query(x, y))
    }

    /// Render model for the current result with `hit` highlighted.
    pub fn frame(&self, hit: HitResult) -> Option<PlotFrame> {
        self.current.as_deref().map(|snap| snap.frame(hit))
    }
}

// =============================================================================
// SharedSession
// =============================================================================

/// Session shared between threads.
///
/// Runs do their work outside the lock; the lock only guards the pointer swap.
#[derive(Debug, Default)]
pub struct SharedSession {
    current: RwLock<Option<Arc<Snapshot>>>,
}

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run an analysis and publish the result (or invalidate on failure).
    pub fn run_analysis(&self, request: &AnalysisRequest<'_>) -> Result<()> {
        let next = publish(request);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) =
            next.as_ref().ok().cloned();
        next.map(|_| ())
    }

    pub fn clear(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Current result; stays consistent even if another run publishes meanwhile.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_valid(&self) -> bool {
        self.snapshot().is_some()
    }

    pub fn query(&self, x: f64, y: f64) -> HitResult {
        self.snapshot()
            .map_or(HitResult::None, |snap| snap.query(x, y))
    }
}

fn publish(request: &AnalysisRequest<'_>) -> Result<Arc<Snapshot>> {
    let snapshot = Snapshot::build(request)?;
    info!(
        periods = snapshot.series.len(),
        max_period = snapshot.max_period(),
        flagged = snapshot.outliers.iter().filter(|&&f| f).count(),
        "analysis complete"
    );
    Ok(Arc::new(snapshot))
}
