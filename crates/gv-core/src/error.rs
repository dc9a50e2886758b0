//! Error types for coordinate and expansion operations

use thiserror::Error;

/// Errors raised by malformed coordinate input.
///
/// These are contract violations by the caller: they are returned
/// synchronously and never silently corrected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinateError {
    #[error("invalid range [{start}, {end}): {reason}")]
    InvalidRange {
        start: u64,
        end: u64,
        reason: &'static str,
    },

    #[error("invalid drawing width {0}: must be positive")]
    InvalidWidth(f64),

    #[error("invalid expansion multiplier {0}: must be a finite non-negative number")]
    InvalidMultiplier(f64),

    #[error("unknown chromosome '{0}'")]
    UnknownChromosome(String),

    #[error("duplicate chromosome '{0}' in genome configuration")]
    DuplicateChromosome(String),

    #[error("genome '{0}' is longer than the coordinate space can hold")]
    GenomeTooLarge(String),

    #[error("malformed locus '{0}'")]
    MalformedLocus(String),
}

impl CoordinateError {
    pub(crate) fn range(start: u64, end: u64, reason: &'static str) -> Self {
        CoordinateError::InvalidRange { start, end, reason }
    }
}
