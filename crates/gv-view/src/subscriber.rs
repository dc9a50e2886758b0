//! View subscriber trait

use gv_core::ViewExpansion;

use crate::coordinator::CyclePhase;

/// Trait for rendering collaborators that react to newly resolved views
pub trait ViewSubscriber: Send + Sync {
    /// Called after a resolved primary view has been applied.
    ///
    /// `phase` is `Resolved` or `FallbackResolved`.
    fn on_view_resolved(&self, view: &ViewExpansion, phase: CyclePhase);
}
