//! Kullback - index-of-coincidence triage for periodic ciphertext.
//!
//! Given a byte sequence, computes the average Index of Coincidence for every
//! candidate key length and flags the periods that stand out. Peaks in the
//! curve point at the key length of a polyalphabetic cipher.
//!
//! The pipeline:
//! - Decode the input (UTF-8, hex, base64, binary text or raw bytes)
//! - Average IoC over the interleaved blocks of each period
//! - Flag anomalous periods by z-score
//! - Scale the curve into a display rectangle and answer cursor queries
//!
//! ```
//! use kullback::{AnalysisConfig, AnalysisRequest, AnalysisSession, Encoding};
//!
//! let config = AnalysisConfig::default();
//! let mut session = AnalysisSession::new();
//! session
//!     .run_analysis(&AnalysisRequest::new(b"xyzxyzxyzxyzxyzxyz", Encoding::Utf8, &config))
//!     .unwrap();
//! assert_eq!(session.series()[1].period, 3);
//! assert_eq!(session.series()[1].ioc, 1.0);
//! ```

pub mod analysis;
pub mod app;
pub mod decode;
pub mod error;
pub mod plot;
pub mod util;

pub use analysis::{analyze, flag_outliers, IocDomain, PeriodSample, Series};
pub use app::{AnalysisConfig, AnalysisRequest, AnalysisSession, SharedSession, Snapshot};
pub use decode::{decode, Encoding};
pub use error::{AnalysisError, Result};
pub use plot::{HitRadii, HitResult, PlotFrame, Point, Presenter, Viewport};
