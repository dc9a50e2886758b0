//! Browser settings

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::CoordinateError;
use crate::expansion::RegionExpander;
use crate::track::TrackModel;

/// Errors loading configuration files
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid setting: {0}")]
    Invalid(#[from] CoordinateError),
}

/// Settings for view expansion and alignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Padding on each side of the visible region, as a multiple of its width
    pub expansion_multiplier: f64,

    /// Lower bound on the drawing width handed to the expander
    pub min_visualization_width: f64,

    /// Track types (or file types) that denote cross-genome alignments
    pub alignment_track_types: Vec<String>,

    /// Track types that take the full container width when shown alone
    pub full_width_track_types: Vec<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            expansion_multiplier: 1.0,
            min_visualization_width: 100.0,
            alignment_track_types: vec!["genomealign".to_string()],
            full_width_track_types: vec!["g3d".to_string()],
        }
    }
}

impl BrowserSettings {
    /// Load settings from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let settings: BrowserSettings = serde_json::from_str(text)?;
        settings.region_expander()?;
        Ok(settings)
    }

    pub fn region_expander(&self) -> Result<RegionExpander, CoordinateError> {
        RegionExpander::new(self.expansion_multiplier)
    }

    /// Width available for drawing track data.
    ///
    /// The legend column is subtracted unless the only track is a full-width
    /// one; the result never drops below `min_visualization_width`.
    /// Non-finite or negative widths fail with `InvalidWidth`.
    pub fn visualization_width(
        &self,
        container_width: f64,
        legend_width: f64,
        tracks: &[TrackModel],
    ) -> Result<f64, CoordinateError> {
        for width in [container_width, legend_width] {
            if !(width.is_finite() && width >= 0.0) {
                return Err(CoordinateError::InvalidWidth(width));
            }
        }

        let full_width = matches!(
            tracks,
            [only] if self.full_width_track_types.iter().any(|t| *t == only.track_type)
        );
        let width = if full_width {
            container_width
        } else {
            container_width - legend_width
        };
        Ok(width.max(self.min_visualization_width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = BrowserSettings::from_json(r#"{"expansion_multiplier": 2.0}"#).unwrap();
        assert_eq!(settings.expansion_multiplier, 2.0);
        assert_eq!(settings.min_visualization_width, 100.0);
        assert_eq!(settings.alignment_track_types, vec!["genomealign".to_string()]);
    }

    #[test]
    fn test_negative_multiplier_rejected() {
        let err = BrowserSettings::from_json(r#"{"expansion_multiplier": -1.0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(CoordinateError::InvalidMultiplier(_))));
    }

    #[test]
    fn test_visualization_width() {
        let settings = BrowserSettings::default();
        let bigwig = vec![TrackModel::new("signal", "bigwig")];
        assert_eq!(settings.visualization_width(1200.0, 120.0, &bigwig), Ok(1080.0));
        assert_eq!(settings.visualization_width(150.0, 120.0, &bigwig), Ok(100.0));

        let g3d = vec![TrackModel::new("structure", "g3d")];
        assert_eq!(settings.visualization_width(1200.0, 120.0, &g3d), Ok(1200.0));

        let mixed = vec![TrackModel::new("structure", "g3d"), TrackModel::new("signal", "bigwig")];
        assert_eq!(settings.visualization_width(1200.0, 120.0, &mixed), Ok(1080.0));
    }

    #[test]
    fn test_malformed_widths_rejected() {
        let settings = BrowserSettings::default();
        let bigwig = vec![TrackModel::new("signal", "bigwig")];
        assert!(matches!(
            settings.visualization_width(f64::NAN, 120.0, &bigwig),
            Err(CoordinateError::InvalidWidth(w)) if w.is_nan()
        ));
        assert_eq!(
            settings.visualization_width(1200.0, f64::INFINITY, &bigwig),
            Err(CoordinateError::InvalidWidth(f64::INFINITY))
        );
        assert_eq!(
            settings.visualization_width(-5.0, 0.0, &bigwig),
            Err(CoordinateError::InvalidWidth(-5.0))
        );
    }
}
