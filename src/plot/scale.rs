//! Linear mapping of (period, IoC) samples into display space.
//!
//! The plot area is the display rectangle minus fixed margins. Display Y
//! grows downward, so the IoC axis is inverted: larger IoC means a smaller Y.

use serde::{Deserialize, Serialize};

use crate::analysis::{IocDomain, PeriodSample};

pub const MARGIN_LEFT: f64 = 40.0;
pub const MARGIN_RIGHT: f64 = 20.0;
pub const MARGIN_TOP: f64 = 20.0;
pub const MARGIN_BOTTOM: f64 = 40.0;

/// Domains narrower than this are replaced by a unit domain.
const MIN_DOMAIN_SIZE: f64 = 1e-12;

/// A position in display space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Target display rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Display Y of the horizontal (period) axis.
    pub fn x_axis_y(&self) -> f64 {
        self.height - MARGIN_BOTTOM
    }

    /// Rightmost display X of the plot area.
    pub fn plot_right(&self) -> f64 {
        self.width - MARGIN_RIGHT
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 400.0)
    }
}

#[inline]
fn safe_size(min: f64, max: f64) -> f64 {
    let size = max - min;
    if size < MIN_DOMAIN_SIZE {
        1.0
    } else {
        size
    }
}

/// Maps abstract sample values onto a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    viewport: Viewport,
    x_min: f64,
    x_size: f64,
    y_min: f64,
    y_size: f64,
}

impl CoordinateMapper {
    /// Build a mapper for a series bounded by `max_period` with IoC in `[min_y, max_y]`.
    ///
    /// The X domain is `[1, max_period - 1]`, one below the first period,
    /// which downstream renderers rely on for tick placement.
    pub fn new(viewport: Viewport, max_period: usize, min_y: f64, max_y: f64) -> Self {
        let x_min = 1.0;
        let x_max = max_period as f64 - 1.0;
        Self {
            viewport,
            x_min,
            x_size: safe_size(x_min, x_max),
            y_min: min_y,
            y_size: safe_size(min_y, max_y),
        }
    }

    /// Mapper for a series domain.
    pub fn for_domain(viewport: Viewport, max_period: usize, domain: IocDomain) -> Self {
        Self::new(viewport, max_period, domain.min, domain.max)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Display X for a period value.
    pub fn map_x(&self, period: f64) -> f64 {
        let t = (period - self.x_min) / self.x_size;
        MARGIN_LEFT + t * (self.viewport.plot_right() - MARGIN_LEFT)
    }

    /// Display Y for an IoC value.
    pub fn map_y(&self, ioc: f64) -> f64 {
        let bottom = self.viewport.x_axis_y();
        let t = (ioc - self.y_min) / self.y_size;
        bottom - t * (bottom - MARGIN_TOP)
    }

    /// Display position of a sample.
    pub fn map(&self, sample: &PeriodSample) -> Point {
        Point::new(self.map_x(sample.period as f64), self.map_y(sample.ioc))
    }
}

/// Scale every sample into the viewport.
pub fn scale(
    samples: &[PeriodSample],
    max_period: usize,
    viewport: Viewport,
    min_y: f64,
    max_y: f64,
) -> Vec<Point> {
    let mapper = CoordinateMapper::new(viewport, max_period, min_y, max_y);
    samples.iter().map(|s| mapper.map(s)).collect()
}
