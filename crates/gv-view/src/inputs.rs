//! Input snapshot driving one coordination cycle

use std::sync::Arc;

use gv_core::{DisplayedRegion, TrackList};

/// Everything the coordinator needs to compute a view.
///
/// Change detection is by identity for the region and track list and by
/// value for the widths. Callers must hand in a new `Arc` when the region or
/// tracks change; an equal-valued new instance also counts as a change.
#[derive(Debug, Clone)]
pub struct ViewInputs {
    pub region: Arc<DisplayedRegion>,
    pub tracks: TrackList,
    pub container_width: f64,
    pub legend_width: f64,
}

impl ViewInputs {
    pub fn new(region: DisplayedRegion, tracks: TrackList, container_width: f64, legend_width: f64) -> Self {
        Self {
            region: Arc::new(region),
            tracks,
            container_width,
            legend_width,
        }
    }

    /// Same inputs with a different region
    pub fn with_region(&self, region: DisplayedRegion) -> Self {
        Self {
            region: Arc::new(region),
            ..self.clone()
        }
    }

    /// Same inputs with a different track list
    pub fn with_tracks(&self, tracks: TrackList) -> Self {
        Self {
            tracks,
            ..self.clone()
        }
    }

    /// Same inputs with a different container width
    pub fn with_container_width(&self, container_width: f64) -> Self {
        Self {
            container_width,
            ..self.clone()
        }
    }

    /// Whether `other` is the same input tuple
    pub fn is_same_as(&self, other: &ViewInputs) -> bool {
        Arc::ptr_eq(&self.region, &other.region)
            && Arc::ptr_eq(&self.tracks, &other.tracks)
            && self.container_width == other.container_width
            && self.legend_width == other.legend_width
    }
}
