//! In-memory alignment service over pre-computed aligned blocks

use std::path::Path;

use ahash::AHashMap;
use anyhow::{bail, Context};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::trace;

use gv_core::{ChromosomeSpan, DisplayedRegion, GenomicInterval, NavigationContext};

use crate::service::{AlignedSegment, AlignmentSegments, AlignmentService, Strand};

/// A gapless block aligning a primary span to a query span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentBlock {
    pub primary: SpanRecord,
    pub query: SpanRecord,
    #[serde(default)]
    pub strand: Strand,
}

/// Chromosome span as written in block files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanRecord {
    pub chr: String,
    pub start: u64,
    pub end: u64,
}

impl From<&SpanRecord> for ChromosomeSpan {
    fn from(record: &SpanRecord) -> Self {
        ChromosomeSpan::new(record.chr.clone(), record.start, record.end)
    }
}

/// Serves alignments from blocks loaded up front, keyed by query genome
#[derive(Debug, Clone)]
pub struct BlockAlignmentService {
    primary_genome: String,
    blocks: AHashMap<String, Vec<AlignmentBlock>>,
}

impl BlockAlignmentService {
    pub fn new(primary_genome: impl Into<String>) -> Self {
        Self {
            primary_genome: primary_genome.into(),
            blocks: AHashMap::new(),
        }
    }

    /// Add blocks aligning the primary genome to `query_genome`
    pub fn add_blocks(&mut self, query_genome: impl Into<String>, blocks: impl IntoIterator<Item = AlignmentBlock>) {
        self.blocks.entry(query_genome.into()).or_default().extend(blocks);
    }

    /// Load `{ "<query genome>": [block, ...], ... }` from JSON
    pub fn from_json(primary_genome: impl Into<String>, text: &str) -> anyhow::Result<Self> {
        let by_genome: AHashMap<String, Vec<AlignmentBlock>> =
            serde_json::from_str(text).context("parsing alignment blocks")?;
        let mut service = Self::new(primary_genome);
        for (genome, blocks) in by_genome {
            service.add_blocks(genome, blocks);
        }
        Ok(service)
    }

    pub fn load(primary_genome: impl Into<String>, path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(primary_genome, &text)
    }

    pub fn query_genomes(&self) -> impl Iterator<Item = &str> {
        self.blocks.keys().map(String::as_str)
    }

    fn segments_in(
        &self,
        context: &NavigationContext,
        blocks: &[AlignmentBlock],
        window: &GenomicInterval,
    ) -> anyhow::Result<Vec<AlignedSegment>> {
        let mut segments = Vec::new();
        for block in blocks {
            let start = context.locus_to_absolute(&block.primary.chr, block.primary.start)?;
            let end = context.locus_to_absolute(&block.primary.chr, block.primary.end)?;
            let primary = GenomicInterval::new(start, end)?;
            let Some(clipped) = primary.intersect(window) else {
                continue;
            };
            segments.push(AlignedSegment {
                primary: clipped,
                query: project(&primary, &clipped, block),
                strand: block.strand,
            });
        }
        segments.sort_by_key(|segment| segment.primary.start());
        Ok(segments)
    }
}

/// Map the clipped part of a block onto its query span proportionally
fn project(primary: &GenomicInterval, clipped: &GenomicInterval, block: &AlignmentBlock) -> ChromosomeSpan {
    let query: ChromosomeSpan = (&block.query).into();
    let primary_width = primary.width().max(1) as u128;
    let query_width = query.width() as u128;
    let scale = |offset: u64| (offset as u128 * query_width / primary_width) as u64;

    let lead = scale(clipped.start() - primary.start());
    let tail = scale(clipped.end() - primary.start());
    match block.strand {
        Strand::Forward => ChromosomeSpan::new(query.chromosome, query.start + lead, query.start + tail),
        Strand::Reverse => ChromosomeSpan::new(query.chromosome, query.end - tail, query.end - lead),
    }
}

#[async_trait]
impl AlignmentService for BlockAlignmentService {
    async fn query_alignment(
        &self,
        primary_genome: &str,
        query_genome: &str,
        region: &DisplayedRegion,
    ) -> anyhow::Result<AlignmentSegments> {
        if primary_genome != self.primary_genome {
            bail!(
                "blocks are aligned to {}, not {}",
                self.primary_genome,
                primary_genome
            );
        }
        let Some(blocks) = self.blocks.get(query_genome) else {
            bail!("no alignment blocks for {query_genome}");
        };

        let window = region.interval();
        let segments = self.segments_in(region.context(), blocks, &window)?;
        trace!(genome = query_genome, region = %region, segments = segments.len(), "served alignment blocks");

        Ok(AlignmentSegments {
            primary_span: window,
            segments,
        })
    }

    fn service_name(&self) -> &str {
        "block alignment service"
    }
}
