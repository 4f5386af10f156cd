//! Statistics over decoded byte buffers.
//!
//! This module provides:
//! - Index of Coincidence per candidate transposition period
//! - Z-score outlier flagging over the resulting series
//! - Clustering of adjacent flagged periods into peaks

pub mod ioc;
pub mod outliers;

// Re-export commonly used items
pub use ioc::{
    analyze, average_ioc, effective_max_period, index_of_coincidence, IocDomain, PeriodSample,
    Series, MIN_PERIOD,
};
pub use outliers::{flag_outliers, peak_indices, SeriesStats};
