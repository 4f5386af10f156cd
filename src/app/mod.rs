//! Session state and configuration.
//!
//! This module contains:
//! - `AnalysisConfig` - Thresholds, bounds and display geometry
//! - `AnalysisRequest` - Input plus config for one run
//! - `Snapshot` - Immutable result of a successful run
//! - `AnalysisSession` / `SharedSession` - Owners of the current snapshot

mod config;
mod session;

pub use config::{AnalysisConfig, DEFAULT_MAX_PERIOD, DEFAULT_OUTLIER_THRESHOLD};
pub use session::{AnalysisRequest, AnalysisSession, SharedSession, Snapshot};
