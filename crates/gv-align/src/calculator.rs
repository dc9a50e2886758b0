//! Multi-genome alignment of a primary view
//!
//! One query per secondary genome is issued concurrently. Every outcome is
//! collected before the aggregate is built, so one failing genome never
//! hides the others. Only when all of them fail does the whole operation
//! fail, and callers are expected to fall back to the unaligned view.

use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use indexmap::{IndexMap, IndexSet};
use parking_lot::RwLock;
use tracing::{debug, warn};

use gv_core::{ChromosomeSpan, PixelSpan, TrackList, ViewExpansion};

use crate::genomes::secondary_genomes;
use crate::inflight::{InFlightQueries, QueryOutcome};
use crate::service::{AlignedSegment, AlignmentSegments, AlignmentService};
use crate::AlignmentError;

/// A segment positioned on the shared pixel axis
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedSegment {
    pub segment: AlignedSegment,
    pub x_span: PixelSpan,
}

/// Successful alignment of the primary view against one secondary genome
#[derive(Debug, Clone, PartialEq)]
pub struct GenomeAlignment {
    pub query_genome: String,

    /// Primary view every record of the same call agrees on
    pub primary_view: ViewExpansion,

    /// Query-genome regions covered, merged per chromosome in first-seen order
    pub query_loci: Vec<ChromosomeSpan>,

    /// Segments overlapping the primary view, with their pixel positions
    pub placements: Vec<PlacedSegment>,
}

impl GenomeAlignment {
    fn build(query_genome: String, primary_view: &ViewExpansion, segments: &AlignmentSegments) -> Self {
        let model = primary_view.drawing_model();
        let expanded = primary_view.expanded_region.interval();

        let placements: Vec<PlacedSegment> = segments
            .segments
            .iter()
            .filter(|segment| segment.primary.overlaps(&expanded))
            .map(|segment| PlacedSegment {
                segment: segment.clone(),
                x_span: model.interval_to_span(&segment.primary),
            })
            .collect();

        let mut merged: IndexMap<&str, (u64, u64)> = IndexMap::new();
        for placed in &placements {
            let query = &placed.segment.query;
            merged
                .entry(query.chromosome.as_str())
                .and_modify(|(start, end)| {
                    *start = (*start).min(query.start);
                    *end = (*end).max(query.end);
                })
                .or_insert((query.start, query.end));
        }
        let query_loci = merged
            .into_iter()
            .map(|(chromosome, (start, end))| ChromosomeSpan::new(chromosome, start, end))
            .collect();

        Self {
            query_genome,
            primary_view: primary_view.clone(),
            query_loci,
            placements,
        }
    }
}

/// Outcome for one secondary genome
#[derive(Debug, Clone, PartialEq)]
pub enum AlignmentRecord {
    Aligned(GenomeAlignment),
    Failed(AlignmentError),
}

impl AlignmentRecord {
    pub fn as_aligned(&self) -> Option<&GenomeAlignment> {
        match self {
            AlignmentRecord::Aligned(alignment) => Some(alignment),
            AlignmentRecord::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, AlignmentRecord::Failed(_))
    }
}

/// Aggregate alignment of one primary view against every secondary genome.
///
/// Empty when no secondary genomes are referenced, meaning the primary view
/// should be used unmodified.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiAlignment {
    records: IndexMap<String, AlignmentRecord>,
    primary_view: Option<ViewExpansion>,
    divergent: bool,
}

impl MultiAlignment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn get(&self, genome: &str) -> Option<&AlignmentRecord> {
        self.records.get(genome)
    }

    /// Records in secondary-genome declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AlignmentRecord)> {
        self.records.iter().map(|(genome, record)| (genome.as_str(), record))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &AlignmentError)> {
        self.iter().filter_map(|(genome, record)| match record {
            AlignmentRecord::Failed(error) => Some((genome, error)),
            AlignmentRecord::Aligned(_) => None,
        })
    }

    /// The primary view shared by every successful record
    pub fn primary_view(&self) -> Option<&ViewExpansion> {
        self.primary_view.as_ref()
    }

    /// Whether the service reported different primary spans for different genomes
    pub fn has_divergent_primary_views(&self) -> bool {
        self.divergent
    }
}

struct CalculatorState {
    primary_genome: String,
    tracks: TrackList,
    secondary: Arc<IndexSet<String>>,
}

struct CalculatorInner {
    service: Arc<dyn AlignmentService>,
    alignment_types: Vec<String>,
    state: RwLock<CalculatorState>,
    in_flight: InFlightQueries,
}

/// Aligns primary views against the secondary genomes of a track list.
///
/// Cheap to clone; clones share state and in-flight queries.
#[derive(Clone)]
pub struct MultiAlignmentCalculator {
    inner: Arc<CalculatorInner>,
}

impl MultiAlignmentCalculator {
    /// Create a calculator for `primary_genome` and the given tracks
    pub fn new(
        primary_genome: impl Into<String>,
        tracks: TrackList,
        alignment_types: Vec<String>,
        service: Arc<dyn AlignmentService>,
    ) -> Self {
        let primary_genome = primary_genome.into();
        let secondary = Arc::new(secondary_genomes(&primary_genome, &tracks, &alignment_types));

        Self {
            inner: Arc::new(CalculatorInner {
                service,
                alignment_types,
                state: RwLock::new(CalculatorState {
                    primary_genome,
                    tracks,
                    secondary,
                }),
                in_flight: InFlightQueries::default(),
            }),
        }
    }

    pub fn primary_genome(&self) -> String {
        self.inner.state.read().primary_genome.clone()
    }

    /// Secondary genomes derived from the current track list
    pub fn secondary_genomes(&self) -> Arc<IndexSet<String>> {
        self.inner.state.read().secondary.clone()
    }

    /// Replace the track list and re-derive the secondary genomes
    pub fn set_tracks(&self, tracks: TrackList) {
        let mut state = self.inner.state.write();
        if Arc::ptr_eq(&state.tracks, &tracks) {
            return;
        }
        state.secondary = Arc::new(secondary_genomes(
            &state.primary_genome,
            &tracks,
            &self.inner.alignment_types,
        ));
        state.tracks = tracks;
        debug!(secondary = ?state.secondary, "track list changed");
    }

    /// Switch primary genome and re-derive the secondary genomes
    pub fn set_primary_genome(&self, primary_genome: impl Into<String>) {
        let mut state = self.inner.state.write();
        state.primary_genome = primary_genome.into();
        state.secondary = Arc::new(secondary_genomes(
            &state.primary_genome,
            &state.tracks,
            &self.inner.alignment_types,
        ));
        debug!(primary = %state.primary_genome, secondary = ?state.secondary, "primary genome changed");
    }

    /// Align `view` against every secondary genome.
    ///
    /// Queries are registered immediately, so identical concurrent calls
    /// share one query per genome.
    pub fn align(&self, view: &ViewExpansion) -> BoxFuture<'static, Result<MultiAlignment, AlignmentError>> {
        let (primary_genome, genomes) = {
            let state = self.inner.state.read();
            (state.primary_genome.clone(), state.secondary.clone())
        };

        if genomes.is_empty() {
            debug!("no secondary genomes, nothing to align");
            return future::ready(Ok(MultiAlignment::empty())).boxed();
        }

        debug!(
            service = self.inner.service.service_name(),
            region = %view.expanded_region,
            genomes = genomes.len(),
            "issuing alignment queries"
        );

        let queries: Vec<_> = genomes
            .iter()
            .map(|genome| {
                self.inner
                    .in_flight
                    .query(&self.inner.service, &primary_genome, genome, &view.expanded_region)
            })
            .collect();

        let view = view.clone();
        async move {
            let outcomes = future::join_all(queries).await;
            assemble(view, &genomes, outcomes)
        }
        .boxed()
    }
}

fn assemble(
    view: ViewExpansion,
    genomes: &IndexSet<String>,
    outcomes: Vec<QueryOutcome>,
) -> Result<MultiAlignment, AlignmentError> {
    let mut resolved = Vec::with_capacity(genomes.len());
    for (genome, outcome) in genomes.iter().zip(outcomes) {
        let entry = outcome.and_then(|segments| {
            let candidate = primary_view_for(&view, genome, &segments)?;
            Ok((candidate, segments))
        });
        if let Err(error) = &entry {
            warn!(genome = %genome, %error, "alignment failed for genome");
        }
        resolved.push((genome.clone(), entry));
    }

    // First successful genome in declaration order is authoritative
    let Some(authoritative) = resolved
        .iter()
        .find_map(|(_, entry)| entry.as_ref().ok().map(|(view, _)| view.clone()))
    else {
        let reasons = resolved
            .iter()
            .filter_map(|(_, entry)| entry.as_ref().err().map(ToString::to_string))
            .collect::<Vec<_>>()
            .join("; ");
        return Err(AlignmentError::Unavailable {
            attempted: resolved.len(),
            reasons,
        });
    };

    let divergent = resolved
        .iter()
        .any(|(_, entry)| matches!(entry, Ok((candidate, _)) if *candidate != authoritative));
    if divergent {
        warn!(
            region = %authoritative.expanded_region,
            "alignment results disagree on the primary view, using the first genome's"
        );
    }

    let records = resolved
        .into_iter()
        .map(|(genome, entry)| {
            let record = match entry {
                Ok((_, segments)) => {
                    AlignmentRecord::Aligned(GenomeAlignment::build(genome.clone(), &authoritative, &segments))
                }
                Err(error) => AlignmentRecord::Failed(error),
            };
            (genome, record)
        })
        .collect();

    Ok(MultiAlignment {
        records,
        primary_view: Some(authoritative),
        divergent,
    })
}

/// The primary view implied by a service's reported span
fn primary_view_for(
    view: &ViewExpansion,
    genome: &str,
    segments: &AlignmentSegments,
) -> Result<ViewExpansion, AlignmentError> {
    if segments.primary_span == view.expanded_region.interval() {
        return Ok(view.clone());
    }
    view.expanded_region
        .with_interval(segments.primary_span)
        .and_then(|region| view.with_expanded_region(region))
        .map_err(|e| AlignmentError::QueryFailed {
            genome: genome.to_string(),
            reason: format!("unusable primary span: {e}"),
        })
}
