//! View coordination for the genome view
//!
//! Bridges the pure expansion and alignment computations to a view whose
//! inputs change over time. The [`ViewCoordinator`] owns the resolved
//! primary view, deduplicates repeated requests and makes sure a late
//! result never overwrites a newer one.

pub mod coordinator;
pub mod inputs;
pub mod liveness;
mod memo;
pub mod subscriber;

use gv_core::CoordinateError;
use thiserror::Error;

// Re-exports
pub use coordinator::{CyclePhase, SharedAlignment, SharedPrimaryView, ViewCoordinator, ViewFrame};
pub use inputs::ViewInputs;
pub use liveness::LivenessToken;
pub use subscriber::ViewSubscriber;

/// Errors returned synchronously by the coordinator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    #[error(transparent)]
    Coordinate(#[from] CoordinateError),

    #[error("view coordinator has been torn down")]
    TornDown,
}
