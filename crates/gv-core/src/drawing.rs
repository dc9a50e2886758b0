//! Conversion between base pairs and pixels

use serde::{Deserialize, Serialize};

use crate::interval::GenomicInterval;

/// A horizontal span in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelSpan {
    pub start: f64,
    pub end: f64,
}

impl PixelSpan {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Linear mapping of a genomic interval onto `[0, draw_width)` pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearDrawingModel {
    region: GenomicInterval,
    draw_width: f64,
}

impl LinearDrawingModel {
    /// Create a drawing model. `region` must be non-empty.
    pub fn new(region: GenomicInterval, draw_width: f64) -> Self {
        Self { region, draw_width }
    }

    pub fn region(&self) -> GenomicInterval {
        self.region
    }

    pub fn draw_width(&self) -> f64 {
        self.draw_width
    }

    pub fn pixels_per_base(&self) -> f64 {
        self.draw_width / self.region.width() as f64
    }

    pub fn bases_per_pixel(&self) -> f64 {
        self.region.width() as f64 / self.draw_width
    }

    pub fn bases_to_pixels(&self, bases: f64) -> f64 {
        bases * self.pixels_per_base()
    }

    pub fn pixels_to_bases(&self, pixels: f64) -> f64 {
        pixels * self.bases_per_pixel()
    }

    /// X coordinate of an absolute base
    pub fn base_to_x(&self, base: f64) -> f64 {
        self.bases_to_pixels(base - self.region.start() as f64)
    }

    /// Absolute base under an x coordinate
    pub fn x_to_base(&self, x: f64) -> f64 {
        self.pixels_to_bases(x) + self.region.start() as f64
    }

    /// Pixel span covered by an interval
    pub fn interval_to_span(&self, interval: &GenomicInterval) -> PixelSpan {
        PixelSpan::new(
            self.base_to_x(interval.start() as f64),
            self.base_to_x(interval.end() as f64),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_pixel_conversion() {
        let model = LinearDrawingModel::new(GenomicInterval::new(1000, 2000).unwrap(), 500.0);
        assert_eq!(model.pixels_per_base(), 0.5);
        assert_eq!(model.base_to_x(1000.0), 0.0);
        assert_eq!(model.base_to_x(1500.0), 250.0);
        assert_eq!(model.x_to_base(500.0), 2000.0);
        assert_eq!(model.pixels_to_bases(10.0), 20.0);

        let span = model.interval_to_span(&GenomicInterval::new(1200, 1400).unwrap());
        assert_eq!(span, PixelSpan::new(100.0, 200.0));
        assert_eq!(span.width(), 100.0);
    }
}
