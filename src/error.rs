//! Error types shared by the decoder, the statistics engine and the session.

use std::path::PathBuf;

use thiserror::Error;

use crate::decode::Encoding;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Everything that can stop an analysis run.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The input violates the declared encoding's syntax (strict mode only).
    #[error("invalid {encoding} input at offset {offset}: {reason}")]
    InvalidInput {
        encoding: Encoding,
        offset: usize,
        reason: &'static str,
    },

    /// Fewer than two bytes survived decoding.
    #[error("insufficient data: {len} byte(s) decoded, at least 2 required")]
    InsufficientData { len: usize },

    /// An encoding name that none of the decoders recognize.
    #[error("unknown encoding {0:?} (expected utf-8, hex, base64, binary, file or raw)")]
    UnknownEncoding(String),

    /// Configuration values that cannot produce a usable plot.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A configuration file could not be read or parsed.
    #[error("could not load config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl AnalysisError {
    /// Whether the presentation layer should show an "invalid input" banner.
    ///
    /// Insufficient data is an expected edge case and only clears the plot.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}
