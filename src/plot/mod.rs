//! Display-space model of the IoC curve.
//!
//! This module provides:
//! - Linear scaling of samples into a margined viewport
//! - Point and segment hit-testing for cursor highlighting
//! - The resolved render model and the presenter seam

pub mod frame;
pub mod hit;
pub mod scale;

pub use frame::{present, Label, Line, PlotFrame, Presenter, Tick};
pub use hit::{
    distance_to_segment, hit_test, nearest_point, nearest_segment, HitRadii, HitResult,
    DEFAULT_HIT_RADIUS,
};
pub use scale::{
    scale, CoordinateMapper, Point, Viewport, MARGIN_BOTTOM, MARGIN_LEFT, MARGIN_RIGHT, MARGIN_TOP,
};
