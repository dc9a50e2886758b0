//! Cross-genome alignment for the genome view
//!
//! Given a primary view, asks an [`AlignmentService`] for the corresponding
//! region of every secondary genome referenced by the track list and lays
//! the results out on the primary view's pixel axis.

pub mod block_service;
pub mod calculator;
pub mod genomes;
mod inflight;
pub mod service;

use thiserror::Error;

// Re-exports
pub use block_service::{AlignmentBlock, BlockAlignmentService, SpanRecord};
pub use calculator::{AlignmentRecord, GenomeAlignment, MultiAlignment, MultiAlignmentCalculator, PlacedSegment};
pub use genomes::secondary_genomes;
pub use service::{AlignedSegment, AlignmentSegments, AlignmentService, Strand};

/// Errors produced while aligning a view.
///
/// `Clone` so one failed query can be reported to every caller sharing it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlignmentError {
    /// One secondary genome's query failed; siblings are unaffected
    #[error("alignment query for '{genome}' failed: {reason}")]
    QueryFailed { genome: String, reason: String },

    /// Every secondary genome's query failed; callers fall back to the unaligned view
    #[error("alignment unavailable: all {attempted} queries failed ({reasons})")]
    Unavailable { attempted: usize, reasons: String },
}
