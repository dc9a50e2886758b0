//! Alignment data service interface

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use gv_core::{ChromosomeSpan, DisplayedRegion, GenomicInterval};

/// Orientation of the query sequence relative to the primary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    #[default]
    #[serde(rename = "+")]
    Forward,
    #[serde(rename = "-")]
    Reverse,
}

/// One gapless correspondence between the primary and a query genome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedSegment {
    /// Absolute coordinates in the primary genome
    pub primary: GenomicInterval,

    /// Chromosome coordinates in the query genome
    pub query: ChromosomeSpan,

    pub strand: Strand,
}

/// What a service returns for one (primary, query, region) request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentSegments {
    /// Primary interval the service actually aligned. Usually the
    /// requested interval; services may snap it to their own block edges.
    pub primary_span: GenomicInterval,

    pub segments: Vec<AlignedSegment>,
}

/// External source of cross-genome alignments.
///
/// Must tolerate concurrent calls for different query genomes.
#[async_trait]
pub trait AlignmentService: Send + Sync {
    /// Map `region` of `primary_genome` into `query_genome` coordinates
    async fn query_alignment(
        &self,
        primary_genome: &str,
        query_genome: &str,
        region: &DisplayedRegion,
    ) -> anyhow::Result<AlignmentSegments>;

    /// Name used in logs
    fn service_name(&self) -> &str {
        "alignment service"
    }
}
