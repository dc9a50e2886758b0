//! Intervals over a genome's linear coordinate space
//!
//! All coordinates are 0-based and half-open: `[start, end)`. The linear
//! space is the genome's chromosomes laid end to end in configured order.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CoordinateError;
use crate::genome::{ChromosomeSpan, NavigationContext};

/// A half-open interval of absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenomicInterval {
    start: u64,
    end: u64,
}

impl GenomicInterval {
    /// Create an interval, rejecting `start > end`
    pub fn new(start: u64, end: u64) -> Result<Self, CoordinateError> {
        if start > end {
            return Err(CoordinateError::range(start, end, "start is after end"));
        }
        Ok(Self { start, end })
    }

    /// Create an interval that must also fit inside `[0, total_length]`
    pub fn within(start: u64, end: u64, total_length: u64) -> Result<Self, CoordinateError> {
        let interval = Self::new(start, end)?;
        if end > total_length {
            return Err(CoordinateError::range(
                start,
                end,
                "end is past the end of the coordinate space",
            ));
        }
        Ok(interval)
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of bases covered
    pub fn width(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `other` lies entirely inside this interval
    pub fn contains(&self, other: &GenomicInterval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn contains_base(&self, base: u64) -> bool {
        self.start <= base && base < self.end
    }

    pub fn overlaps(&self, other: &GenomicInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The overlapping part of two intervals, if they overlap at all
    pub fn intersect(&self, other: &GenomicInterval) -> Option<GenomicInterval> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start < end {
            Some(GenomicInterval { start, end })
        } else {
            None
        }
    }

    /// Grow by `amount` on each side, clipped to `[0, total_length]`.
    pub fn pad(&self, amount: u64, total_length: u64) -> GenomicInterval {
        GenomicInterval {
            start: self.start.saturating_sub(amount),
            end: self.end.saturating_add(amount).min(total_length),
        }
    }
}

impl fmt::Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// An interval bound to the coordinate space it was validated against.
///
/// Construction never clamps; only [`DisplayedRegion::pad`] clips.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayedRegion {
    context: Arc<NavigationContext>,
    interval: GenomicInterval,
}

impl DisplayedRegion {
    /// Create a region, failing with `InvalidRange` if it is not inside the context
    pub fn new(context: Arc<NavigationContext>, start: u64, end: u64) -> Result<Self, CoordinateError> {
        let interval = GenomicInterval::within(start, end, context.total_length())?;
        Ok(Self { context, interval })
    }

    /// Create a region from a 1-based locus string such as `chr1:100-200`
    pub fn parse(context: Arc<NavigationContext>, locus: &str) -> Result<Self, CoordinateError> {
        let interval = context.parse_region(locus)?;
        Ok(Self { context, interval })
    }

    /// The region spanning the whole genome
    pub fn whole(context: Arc<NavigationContext>) -> Self {
        let interval = GenomicInterval {
            start: 0,
            end: context.total_length(),
        };
        Self { context, interval }
    }

    pub fn context(&self) -> &Arc<NavigationContext> {
        &self.context
    }

    pub fn interval(&self) -> GenomicInterval {
        self.interval
    }

    pub fn start(&self) -> u64 {
        self.interval.start
    }

    pub fn end(&self) -> u64 {
        self.interval.end
    }

    pub fn width(&self) -> u64 {
        self.interval.width()
    }

    /// A new region grown by `amount` on both sides, clipped to the genome
    pub fn pad(&self, amount: u64) -> DisplayedRegion {
        DisplayedRegion {
            context: self.context.clone(),
            interval: self.interval.pad(amount, self.context.total_length()),
        }
    }

    /// Same coordinate space, different interval
    pub fn with_interval(&self, interval: GenomicInterval) -> Result<DisplayedRegion, CoordinateError> {
        DisplayedRegion::new(self.context.clone(), interval.start, interval.end)
    }

    /// Split into chromosome-relative pieces
    pub fn loci(&self) -> Vec<ChromosomeSpan> {
        self.context.loci_in(&self.interval)
    }
}

impl fmt::Display for DisplayedRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.context.format_interval(&self.interval))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::GenomeConfig;

    fn context() -> Arc<NavigationContext> {
        let genome = GenomeConfig::single("toy", "chr1", 1_000_000);
        Arc::new(NavigationContext::from_genome(&genome).unwrap())
    }

    #[test]
    fn test_construction_rejects_reversed_and_out_of_bounds() {
        let ctx = context();
        assert!(matches!(
            DisplayedRegion::new(ctx.clone(), 200, 100),
            Err(CoordinateError::InvalidRange { start: 200, end: 100, .. })
        ));
        assert!(DisplayedRegion::new(ctx.clone(), 0, 1_000_001).is_err());
        assert!(DisplayedRegion::new(ctx, 0, 1_000_000).is_ok());
    }

    #[test]
    fn test_pad_clips_to_genome() {
        let region = DisplayedRegion::new(context(), 100, 500).unwrap();
        let padded = region.pad(200);
        assert_eq!(padded.start(), 0);
        assert_eq!(padded.end(), 700);

        let tail = DisplayedRegion::new(context(), 999_900, 1_000_000).unwrap();
        assert_eq!(tail.pad(100).interval(), GenomicInterval::new(999_800, 1_000_000).unwrap());
    }

    #[test]
    fn test_intersect_and_contains() {
        let a = GenomicInterval::new(10, 50).unwrap();
        let b = GenomicInterval::new(40, 90).unwrap();
        assert_eq!(a.intersect(&b), Some(GenomicInterval::new(40, 50).unwrap()));
        assert_eq!(a.intersect(&GenomicInterval::new(50, 60).unwrap()), None);
        assert!(a.contains(&GenomicInterval::new(10, 50).unwrap()));
        assert!(!a.contains(&b));
        assert!(a.contains_base(49));
        assert!(!a.contains_base(50));
    }

    #[test]
    fn test_display_uses_user_coordinates() {
        let region = DisplayedRegion::new(context(), 99, 200).unwrap();
        assert_eq!(region.to_string(), "chr1:100-200");
    }
}
