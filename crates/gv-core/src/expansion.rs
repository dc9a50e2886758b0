//! Region expansion for smooth panning
//!
//! A requested region is padded on both sides so that data just off screen
//! is already fetched when the user drags the view.

use tracing::trace;

use crate::drawing::{LinearDrawingModel, PixelSpan};
use crate::error::CoordinateError;
use crate::interval::DisplayedRegion;

/// Result of one expansion: the region on screen, the padded region and
/// the pixel scale relating them.
///
/// Never mutated; a newer expansion supersedes it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewExpansion {
    /// Region as requested
    pub visible_region: DisplayedRegion,

    /// Visible region padded on both sides and clipped to the genome
    pub expanded_region: DisplayedRegion,

    /// Pixels per base, shared by the visible and expanded regions
    pub pixels_per_base: f64,

    /// Width in pixels available for the visible region
    pub visible_width: f64,

    /// Width in pixels the expanded region occupies at the same scale
    pub expanded_width: f64,

    /// Where the visible region sits inside the expanded drawing
    pub view_window: PixelSpan,
}

impl ViewExpansion {
    fn build(
        visible_region: DisplayedRegion,
        expanded_region: DisplayedRegion,
        pixels_per_base: f64,
        visible_width: f64,
    ) -> Self {
        let expanded_width = expanded_region.width() as f64 * pixels_per_base;
        let left = (visible_region.start() - expanded_region.start()) as f64 * pixels_per_base;

        Self {
            visible_region,
            expanded_region,
            pixels_per_base,
            visible_width,
            expanded_width,
            view_window: PixelSpan::new(left, left + visible_width),
        }
    }

    pub fn bases_per_pixel(&self) -> f64 {
        1.0 / self.pixels_per_base
    }

    /// Drawing model over the expanded region
    pub fn drawing_model(&self) -> LinearDrawingModel {
        LinearDrawingModel::new(self.expanded_region.interval(), self.expanded_width)
    }

    /// Same visible region and scale, different expanded region.
    ///
    /// The new expanded region must still contain the visible region.
    pub fn with_expanded_region(&self, expanded_region: DisplayedRegion) -> Result<ViewExpansion, CoordinateError> {
        if !expanded_region.interval().contains(&self.visible_region.interval()) {
            return Err(CoordinateError::InvalidRange {
                start: expanded_region.start(),
                end: expanded_region.end(),
                reason: "expanded region does not contain the visible region",
            });
        }
        Ok(Self::build(
            self.visible_region.clone(),
            expanded_region,
            self.pixels_per_base,
            self.visible_width,
        ))
    }
}

/// Pads requested regions by a fixed multiple of their width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionExpander {
    multiplier: f64,
}

impl RegionExpander {
    /// Create an expander. `multiplier = 1` pads by the full region width on each side.
    pub fn new(multiplier: f64) -> Result<Self, CoordinateError> {
        if !multiplier.is_finite() || multiplier < 0.0 {
            return Err(CoordinateError::InvalidMultiplier(multiplier));
        }
        Ok(Self { multiplier })
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Expand `region` for a drawing `visible_width` pixels wide.
    ///
    /// Pure: the same inputs always produce the same result.
    pub fn calculate_expansion(
        &self,
        region: &DisplayedRegion,
        visible_width: f64,
    ) -> Result<ViewExpansion, CoordinateError> {
        if !(visible_width.is_finite() && visible_width > 0.0) {
            return Err(CoordinateError::InvalidWidth(visible_width));
        }
        if region.width() == 0 {
            return Err(CoordinateError::InvalidRange {
                start: region.start(),
                end: region.end(),
                reason: "cannot expand an empty region",
            });
        }

        let width = region.width() as f64;
        let pixels_per_base = visible_width / width;
        let pad = (self.multiplier * width).round() as u64;
        let expanded = region.pad(pad);

        trace!(
            region = %region,
            expanded = %expanded,
            pixels_per_base,
            "calculated view expansion"
        );

        Ok(ViewExpansion::build(region.clone(), expanded, pixels_per_base, visible_width))
    }
}

impl Default for RegionExpander {
    fn default() -> Self {
        Self { multiplier: 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::{GenomeConfig, NavigationContext};
    use std::sync::Arc;

    fn context() -> Arc<NavigationContext> {
        let genome = GenomeConfig::single("toy", "chr1", 1_000_000);
        Arc::new(NavigationContext::from_genome(&genome).unwrap())
    }

    #[test]
    fn test_expansion_clipped_at_start() {
        let region = DisplayedRegion::new(context(), 100_000, 200_000).unwrap();
        let view = RegionExpander::new(1.0).unwrap().calculate_expansion(&region, 1000.0).unwrap();

        assert_eq!(view.visible_region, region);
        assert_eq!((view.expanded_region.start(), view.expanded_region.end()), (0, 300_000));
        assert!((view.pixels_per_base - 0.01).abs() < 1e-12);
        assert_eq!(view.visible_width, 1000.0);
        assert_eq!(view.expanded_width, 3000.0);
        assert_eq!(view.view_window, PixelSpan::new(1000.0, 2000.0));
    }

    #[test]
    fn test_expansion_clipped_at_end() {
        let region = DisplayedRegion::new(context(), 999_900, 1_000_000).unwrap();
        let view = RegionExpander::new(1.0).unwrap().calculate_expansion(&region, 500.0).unwrap();

        assert_eq!(view.expanded_region.start(), 999_800);
        assert_eq!(view.expanded_region.end(), 1_000_000);
        assert_eq!(view.view_window, PixelSpan::new(500.0, 1000.0));
    }

    #[test]
    fn test_expanded_contains_visible_for_any_multiplier() {
        let ctx = context();
        for multiplier in [0.0, 0.25, 1.0, 3.0, 50.0] {
            let expander = RegionExpander::new(multiplier).unwrap();
            for (start, end) in [(0, 10), (5_000, 7_500), (999_000, 1_000_000), (0, 1_000_000)] {
                let region = DisplayedRegion::new(ctx.clone(), start, end).unwrap();
                let view = expander.calculate_expansion(&region, 640.0).unwrap();
                assert_eq!(view.visible_region, region);
                assert!(view.expanded_region.interval().contains(&view.visible_region.interval()));
                assert!(view.pixels_per_base > 0.0);
            }
        }
    }

    #[test]
    fn test_expansion_is_deterministic() {
        let region = DisplayedRegion::new(context(), 12_345, 67_890).unwrap();
        let expander = RegionExpander::new(1.5).unwrap();
        let first = expander.calculate_expansion(&region, 777.0).unwrap();
        let second = expander.calculate_expansion(&region, 777.0).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.pixels_per_base.to_bits(), second.pixels_per_base.to_bits());
    }

    #[test]
    fn test_invalid_inputs() {
        let region = DisplayedRegion::new(context(), 0, 100).unwrap();
        let expander = RegionExpander::default();
        assert_eq!(
            expander.calculate_expansion(&region, 0.0).unwrap_err(),
            CoordinateError::InvalidWidth(0.0)
        );
        assert!(expander.calculate_expansion(&region, -5.0).is_err());
        assert!(expander.calculate_expansion(&region, f64::NAN).is_err());

        let empty = DisplayedRegion::new(context(), 50, 50).unwrap();
        assert!(matches!(
            expander.calculate_expansion(&empty, 100.0),
            Err(CoordinateError::InvalidRange { .. })
        ));
        assert!(RegionExpander::new(-1.0).is_err());
    }

    #[test]
    fn test_drawing_model_spans_expanded_region() {
        let region = DisplayedRegion::new(context(), 100_000, 200_000).unwrap();
        let view = RegionExpander::default().calculate_expansion(&region, 1000.0).unwrap();
        let model = view.drawing_model();
        assert_eq!(model.base_to_x(100_000.0), 1000.0);
        assert_eq!(model.x_to_base(3000.0), 300_000.0);
    }
}
