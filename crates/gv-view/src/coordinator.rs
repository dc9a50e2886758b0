//! Coordination of expansion and alignment across changing inputs

use std::fmt;
use std::sync::{Arc, Weak};

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tracing::{debug, info, trace, warn};

use gv_align::{AlignmentError, AlignmentService, MultiAlignment, MultiAlignmentCalculator};
use gv_core::{BrowserSettings, RegionExpander, ViewExpansion};

use crate::inputs::ViewInputs;
use crate::liveness::LivenessToken;
use crate::memo::SingleSlot;
use crate::subscriber::ViewSubscriber;
use crate::ViewError;

/// Alignment result shared by every consumer of one cycle
pub type SharedAlignment = Shared<BoxFuture<'static, Result<Arc<MultiAlignment>, AlignmentError>>>;

/// Resolved primary view shared by every consumer of one cycle
pub type SharedPrimaryView = Shared<BoxFuture<'static, ViewExpansion>>;

/// Where the latest coordination cycle stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    Expanding,
    Aligning,
    /// Alignment succeeded for at least one genome, or there was nothing to align
    Resolved,
    /// Every alignment failed and the unaligned view was used
    FallbackResolved,
}

/// What the renderer gets for one input tuple
#[derive(Clone)]
pub struct ViewFrame {
    /// Last applied primary view, available immediately
    pub primary_view: ViewExpansion,

    /// Primary view this cycle resolves to
    pub primary_view_future: SharedPrimaryView,

    pub alignments: SharedAlignment,

    /// Bases per pixel of the visible region
    pub bases_per_pixel: f64,

    pub visualization_width: f64,

    /// Cycle number; equal for memoized frames
    pub generation: u64,
}

impl fmt::Debug for ViewFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewFrame")
            .field("primary_view", &self.primary_view)
            .field("bases_per_pixel", &self.bases_per_pixel)
            .field("visualization_width", &self.visualization_width)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
struct Cycle {
    generation: u64,
    visualization_width: f64,
    bases_per_pixel: f64,
    alignments: SharedAlignment,
    primary_view_future: SharedPrimaryView,
}

impl Cycle {
    fn frame(&self, primary_view: ViewExpansion) -> ViewFrame {
        ViewFrame {
            primary_view,
            primary_view_future: self.primary_view_future.clone(),
            alignments: self.alignments.clone(),
            bases_per_pixel: self.bases_per_pixel,
            visualization_width: self.visualization_width,
            generation: self.generation,
        }
    }
}

struct CoordinationState {
    primary_view: ViewExpansion,
    phase: CyclePhase,
    generation: u64,
    memo: SingleSlot<ViewInputs, Cycle>,
}

impl CoordinationState {
    fn enter(&mut self, phase: CyclePhase) {
        debug!(generation = self.generation, from = ?self.phase, to = ?phase, "cycle phase");
        self.phase = phase;
    }
}

/// Result of trying to publish a resolved view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApplyOutcome {
    Applied,
    StaleResultDiscarded,
    Inactive,
}

/// Applies completed cycles. Held by spawned tasks and by the memoized
/// cycle inside the state, so it only refers to the state weakly.
#[derive(Clone)]
struct Publisher {
    state: Weak<Mutex<CoordinationState>>,
    liveness: LivenessToken,
    subscribers: Arc<RwLock<Vec<Weak<dyn ViewSubscriber>>>>,
}

impl Publisher {
    async fn resolve(self, generation: u64, expansion: ViewExpansion, alignments: SharedAlignment) -> ViewExpansion {
        let (view, phase) = match alignments.await {
            Ok(alignment) => {
                let view = alignment.primary_view().cloned().unwrap_or_else(|| expansion.clone());
                (view, CyclePhase::Resolved)
            }
            Err(error) => {
                warn!(%error, "falling back to the unaligned primary view");
                (expansion, CyclePhase::FallbackResolved)
            }
        };

        match self.apply(generation, &view, phase) {
            ApplyOutcome::Applied => info!(generation, region = %view.expanded_region, ?phase, "primary view applied"),
            ApplyOutcome::StaleResultDiscarded => debug!(generation, "stale result discarded"),
            ApplyOutcome::Inactive => trace!(generation, "coordinator gone, result dropped"),
        }
        view
    }

    fn apply(&self, generation: u64, view: &ViewExpansion, phase: CyclePhase) -> ApplyOutcome {
        let Some(state) = self.state.upgrade() else {
            return ApplyOutcome::Inactive;
        };
        {
            let mut state = state.lock();
            if !self.liveness.is_alive() {
                return ApplyOutcome::Inactive;
            }
            if state.generation != generation {
                return ApplyOutcome::StaleResultDiscarded;
            }
            state.primary_view = view.clone();
            state.enter(phase);
        }
        self.notify_subscribers(&state, generation, view, phase);
        ApplyOutcome::Applied
    }

    fn notify_subscribers(
        &self,
        state: &Mutex<CoordinationState>,
        generation: u64,
        view: &ViewExpansion,
        phase: CyclePhase,
    ) {
        // Lock order is subscribers, then state. Checking the generation
        // while holding the subscriber lock keeps a newer cycle's
        // notification from being followed by an older one.
        let mut subscribers = self.subscribers.write();
        if state.lock().generation != generation || !self.liveness.is_alive() {
            trace!(generation, "newer cycle applied first, notification skipped");
            return;
        }

        // Remove any dead weak references
        subscribers.retain(|weak| weak.strong_count() > 0);

        for weak in subscribers.iter() {
            if let Some(subscriber) = weak.upgrade() {
                subscriber.on_view_resolved(view, phase);
            }
        }
    }
}

/// Owns the primary view of a genome view and keeps it in step with the
/// view's inputs.
///
/// Each distinct input tuple starts one cycle: expand the region, align it
/// against every secondary genome, then apply the resolved primary view.
/// Repeating the last tuple reuses its cycle. A cycle's result is applied
/// only while it is the newest cycle and the coordinator is alive.
pub struct ViewCoordinator {
    settings: BrowserSettings,
    expander: RegionExpander,
    calculator: MultiAlignmentCalculator,
    runtime: Handle,
    state: Arc<Mutex<CoordinationState>>,
    liveness: LivenessToken,
    subscribers: Arc<RwLock<Vec<Weak<dyn ViewSubscriber>>>>,
}

impl ViewCoordinator {
    /// Create a coordinator whose initial primary view is the plain
    /// expansion of `inputs`. No alignment starts until [`Self::frame`].
    pub fn new(
        runtime: Handle,
        settings: BrowserSettings,
        primary_genome: impl Into<String>,
        inputs: &ViewInputs,
        service: Arc<dyn AlignmentService>,
    ) -> Result<Self, ViewError> {
        let expander = settings.region_expander()?;
        let width = settings.visualization_width(inputs.container_width, inputs.legend_width, &inputs.tracks)?;
        let primary_view = expander.calculate_expansion(&inputs.region, width)?;
        let calculator = MultiAlignmentCalculator::new(
            primary_genome,
            inputs.tracks.clone(),
            settings.alignment_track_types.clone(),
            service,
        );

        info!(
            genome = %calculator.primary_genome(),
            region = %inputs.region,
            "view coordinator created"
        );

        Ok(Self {
            settings,
            expander,
            calculator,
            runtime,
            state: Arc::new(Mutex::new(CoordinationState {
                primary_view,
                phase: CyclePhase::Idle,
                generation: 0,
                memo: SingleSlot::new(),
            })),
            liveness: LivenessToken::new(),
            subscribers: Arc::new(RwLock::new(Vec::new())),
        })
    }

    /// Frame for `inputs`, starting a new cycle unless `inputs` repeats the
    /// last tuple.
    ///
    /// Invalid inputs fail here and leave every piece of state untouched.
    pub fn frame(&self, inputs: &ViewInputs) -> Result<ViewFrame, ViewError> {
        if !self.liveness.is_alive() {
            return Err(ViewError::TornDown);
        }

        let mut state = self.state.lock();
        if let Some(cycle) = state.memo.get(inputs, ViewInputs::is_same_as) {
            debug!(generation = cycle.generation, "inputs unchanged, reusing cycle");
            return Ok(cycle.frame(state.primary_view.clone()));
        }

        let visualization_width =
            self.settings
                .visualization_width(inputs.container_width, inputs.legend_width, &inputs.tracks)?;
        let expansion = self.expander.calculate_expansion(&inputs.region, visualization_width)?;

        state.generation += 1;
        let generation = state.generation;
        state.enter(CyclePhase::Expanding);

        self.calculator.set_tracks(inputs.tracks.clone());
        let alignments = self
            .calculator
            .align(&expansion)
            .map(|result| result.map(Arc::new))
            .boxed()
            .shared();
        let primary_view_future = self
            .publisher()
            .resolve(generation, expansion, alignments.clone())
            .boxed()
            .shared();

        let cycle = Cycle {
            generation,
            visualization_width,
            bases_per_pixel: inputs.region.width() as f64 / visualization_width,
            alignments,
            primary_view_future,
        };
        state.enter(CyclePhase::Aligning);
        state.memo.put(inputs.clone(), cycle.clone());
        let frame = cycle.frame(state.primary_view.clone());
        drop(state);

        debug!(generation, region = %inputs.region, width = visualization_width, "cycle started");

        // Drive the cycle even if nobody awaits the frame's futures
        self.runtime.spawn(cycle.primary_view_future.map(|_| ()));

        Ok(frame)
    }

    /// Switch the primary genome. In-flight results become stale and the
    /// next frame recomputes from scratch.
    pub fn set_genome(&self, genome: impl Into<String>) {
        let genome = genome.into();
        let mut state = self.state.lock();
        if self.calculator.primary_genome() == genome {
            return;
        }

        state.generation += 1;
        state.memo.clear();
        state.enter(CyclePhase::Idle);
        self.calculator.set_primary_genome(genome.clone());

        info!(genome = %genome, "primary genome changed");
    }

    /// Stop publishing. Results that complete afterwards are dropped.
    pub fn teardown(&self) {
        let mut state = self.state.lock();
        if !self.liveness.is_alive() {
            return;
        }
        self.liveness.cancel();
        state.memo.clear();
        state.enter(CyclePhase::Idle);
        debug!("view coordinator torn down");
    }

    pub fn is_active(&self) -> bool {
        self.liveness.is_alive()
    }

    /// Last applied primary view
    pub fn primary_view(&self) -> ViewExpansion {
        self.state.lock().primary_view.clone()
    }

    pub fn phase(&self) -> CyclePhase {
        self.state.lock().phase
    }

    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    pub fn primary_genome(&self) -> String {
        self.calculator.primary_genome()
    }

    pub fn secondary_genomes(&self) -> Vec<String> {
        self.calculator.secondary_genomes().iter().cloned().collect()
    }

    /// Add a subscriber
    pub fn add_subscriber(&self, subscriber: Arc<dyn ViewSubscriber>) {
        let mut subscribers = self.subscribers.write();
        subscribers.push(Arc::downgrade(&subscriber));
    }

    fn publisher(&self) -> Publisher {
        Publisher {
            state: Arc::downgrade(&self.state),
            liveness: self.liveness.clone(),
            subscribers: self.subscribers.clone(),
        }
    }
}

impl Drop for ViewCoordinator {
    fn drop(&mut self) {
        self.teardown();
    }
}
