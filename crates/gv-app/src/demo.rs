//! Built-in demo genome, tracks and alignment blocks

use std::sync::Arc;

use gv_align::{AlignmentBlock, BlockAlignmentService, SpanRecord, Strand};
use gv_core::{Chromosome, GenomeConfig, TrackList, TrackModel};

pub const PRIMARY_GENOME: &str = "hg19";

pub fn genome() -> GenomeConfig {
    GenomeConfig::new(
        PRIMARY_GENOME,
        vec![
            Chromosome::new("chr1", 200_000),
            Chromosome::new("chr2", 150_000),
            Chromosome::new("chrX", 90_000),
        ],
    )
}

/// One data track plus alignments against three genomes; `rheMac8` has no
/// blocks and always fails
pub fn tracks() -> TrackList {
    Arc::new(vec![
        TrackModel::new("RefSeq genes", "refbed"),
        TrackModel::new("H3K27ac", "bigwig"),
        TrackModel::new("hg19 to mm10", "genomealign").with_query_genome("mm10"),
        TrackModel::new("hg19 to panTro5", "genomealign").with_query_genome("panTro5"),
        TrackModel::new("hg19 to rheMac8", "bigchain")
            .with_file_type("genomealign")
            .with_metadata("genome", "rheMac8"),
    ])
}

fn block(chr: &str, start: u64, end: u64, query_chr: &str, query_start: u64, query_end: u64, strand: Strand) -> AlignmentBlock {
    AlignmentBlock {
        primary: SpanRecord {
            chr: chr.to_string(),
            start,
            end,
        },
        query: SpanRecord {
            chr: query_chr.to_string(),
            start: query_start,
            end: query_end,
        },
        strand,
    }
}

pub fn alignment_service() -> BlockAlignmentService {
    let mut service = BlockAlignmentService::new(PRIMARY_GENOME);
    service.add_blocks(
        "mm10",
        [
            block("chr1", 8_000, 14_000, "chr4", 120_000, 126_500, Strand::Forward),
            block("chr1", 48_000, 53_000, "chr4", 180_000, 184_000, Strand::Reverse),
            block("chr2", 0, 20_000, "chr11", 3_000, 22_000, Strand::Forward),
        ],
    );
    service.add_blocks(
        "panTro5",
        [
            block("chr1", 0, 100_000, "chr1", 1_000, 101_000, Strand::Forward),
            block("chr1", 100_000, 200_000, "chr1", 101_000, 201_200, Strand::Forward),
        ],
    );
    service
}
