//! Core coordinate model for the genome view
//!
//! This crate provides genome coordinate spaces, intervals, the region
//! expander and base/pixel conversion. It performs no I/O beyond loading
//! configuration files.

pub mod config;
pub mod drawing;
pub mod error;
pub mod expansion;
pub mod genome;
pub mod interval;
pub mod track;

// Re-export commonly used types
pub use config::{BrowserSettings, ConfigError};
pub use drawing::{LinearDrawingModel, PixelSpan};
pub use error::CoordinateError;
pub use expansion::{RegionExpander, ViewExpansion};
pub use genome::{Chromosome, ChromosomeSpan, GenomeConfig, Locus, NavigationContext};
pub use interval::{DisplayedRegion, GenomicInterval};
pub use track::{TrackList, TrackModel};
