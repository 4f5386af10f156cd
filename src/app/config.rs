//! Analysis configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes. The command line applies its flags on top.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::plot::{HitRadii, Viewport, MARGIN_BOTTOM, MARGIN_LEFT, MARGIN_RIGHT, MARGIN_TOP};

/// Z-score above which a period is labeled as anomalous.
pub const DEFAULT_OUTLIER_THRESHOLD: f64 = 0.85;

/// Upper bound on the candidate key length.
pub const DEFAULT_MAX_PERIOD: usize = 64;

/// Tunables for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Z-score threshold for outlier flags.
    pub outlier_threshold: f64,
    /// Requested maximum period (further capped by input length).
    pub max_period: usize,
    /// Whether to compute outlier flags at all.
    pub detect_outliers: bool,
    /// Display width in display units.
    pub display_width: f64,
    /// Display height in display units.
    pub display_height: f64,
    /// Skip malformed input instead of rejecting it.
    pub lenient: bool,
    /// Hit radii for proximity queries.
    pub hit_radii: HitRadii,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self {
            outlier_threshold: DEFAULT_OUTLIER_THRESHOLD,
            max_period: DEFAULT_MAX_PERIOD,
            detect_outliers: true,
            display_width: viewport.width,
            display_height: viewport.height,
            lenient: false,
            hit_radii: HitRadii::default(),
        }
    }
}

impl AnalysisConfig {
    /// Target display rectangle.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.display_width, self.display_height)
    }

    /// Reject display sizes that leave no finite, non-empty plot area.
    pub fn validate(&self) -> Result<()> {
        let (w, h) = (self.display_width, self.display_height);
        if !(w.is_finite() && h.is_finite()) {
            return Err(AnalysisError::InvalidConfig(format!(
                "display size must be finite, got {w}x{h}"
            )));
        }
        if w <= MARGIN_LEFT + MARGIN_RIGHT || h <= MARGIN_TOP + MARGIN_BOTTOM {
            return Err(AnalysisError::InvalidConfig(format!(
                "display size {w}x{h} leaves no room inside the margins"
            )));
        }
        Ok(())
    }

    /// Parse a JSON config document.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Load a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let config_err = |source: Box<dyn std::error::Error + Send + Sync>| AnalysisError::Config {
            path: path.to_path_buf(),
            source,
        };
        let text = fs::read_to_string(path).map_err(|e| config_err(e.into()))?;
        Self::from_json_str(&text).map_err(|e| config_err(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config =
            AnalysisConfig::from_json_str(r#"{"max_period": 12, "hit_radii": {"point": 4.0}}"#)
                .unwrap();
        assert_eq!(config.max_period, 12);
        assert_eq!(config.outlier_threshold, DEFAULT_OUTLIER_THRESHOLD);
        assert_eq!(config.hit_radii.point, 4.0);
        assert_eq!(config.hit_radii.segment, 15.0);
        assert_eq!(config.viewport(), Viewport::new(800.0, 400.0));
    }

    #[test]
    fn test_validate_display_size() {
        assert!(AnalysisConfig::default().validate().is_ok());

        let bad = [
            (f64::NAN, 400.0),
            (800.0, f64::INFINITY),
            (800.0, 0.0),
            (-800.0, 400.0),
            (60.0, 400.0),
            (800.0, 60.0),
        ];
        for (display_width, display_height) in bad {
            let config = AnalysisConfig {
                display_width,
                display_height,
                ..AnalysisConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(AnalysisError::InvalidConfig(_))),
                "{display_width}x{display_height} accepted"
            );
        }
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = AnalysisConfig::from_json_file(Path::new("/nonexistent/kullback.json"))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Config { .. }));
    }
}
