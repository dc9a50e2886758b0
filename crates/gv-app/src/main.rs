//! Genome view driver
//!
//! Runs a view coordinator through a sequence of regions and logs each
//! resolved primary view and its alignments. Without arguments it uses a
//! built-in demo genome.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::runtime::Handle;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gv_align::{AlignmentError, AlignmentRecord, AlignmentService, BlockAlignmentService, MultiAlignment};
use gv_core::{BrowserSettings, DisplayedRegion, GenomeConfig, NavigationContext, TrackList, TrackModel, ViewExpansion};
use gv_view::{CyclePhase, ViewCoordinator, ViewInputs, ViewSubscriber};

mod demo;

const CONTAINER_WIDTH: f64 = 1_200.0;
const LEGEND_WIDTH: f64 = 120.0;

/// Regions visited when none are given
const DEMO_LOCI: &[&str] = &["chr1:10,001-12,000", "chr1:49,001-51,000", "chr1:198,001-chr2:4,000"];

#[derive(Parser, Debug, Default, PartialEq)]
#[command(name = "genome-view")]
#[command(about = "Drive a genome view through a sequence of regions.", long_about = None)]
struct Options {
    /// Browser settings JSON; defaults apply when omitted.
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Genome configuration JSON (name and ordered chromosomes).
    #[arg(long, value_name = "FILE")]
    genome: Option<PathBuf>,

    /// Track list JSON.
    #[arg(long, value_name = "FILE")]
    tracks: Option<PathBuf>,

    /// Alignment blocks JSON, keyed by query genome.
    #[arg(long, value_name = "FILE")]
    blocks: Option<PathBuf>,

    /// Loci to visit in order, e.g. chr1:10,001-12,000.
    #[arg(value_name = "LOCUS")]
    loci: Vec<String>,
}

/// Logs every view the coordinator applies
struct LogSubscriber;

impl ViewSubscriber for LogSubscriber {
    fn on_view_resolved(&self, view: &ViewExpansion, phase: CyclePhase) {
        info!(
            visible = %view.visible_region,
            expanded = %view.expanded_region,
            ?phase,
            "view applied"
        );
    }
}

fn load_tracks(path: &Path) -> Result<TrackList> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let tracks: Vec<TrackModel> = serde_json::from_str(&text).context("parsing track list")?;
    Ok(Arc::new(tracks))
}

fn report(view: &ViewExpansion, alignments: &Result<Arc<MultiAlignment>, AlignmentError>) {
    info!(
        visible = %view.visible_region,
        expanded = %view.expanded_region,
        bases_per_pixel = view.bases_per_pixel(),
        "primary view resolved"
    );

    let alignment = match alignments {
        Ok(alignment) => alignment,
        Err(error) => {
            warn!(%error, "showing unaligned view");
            return;
        }
    };
    if alignment.has_divergent_primary_views() {
        warn!("genomes disagreed on the primary view");
    }
    for (genome, record) in alignment.iter() {
        match record {
            AlignmentRecord::Aligned(aligned) => {
                let loci = aligned
                    .query_loci
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                info!(genome, segments = aligned.placements.len(), loci = %loci, "aligned");
            }
            AlignmentRecord::Failed(error) => warn!(genome, %error, "alignment failed"),
        }
    }
}

async fn run(runtime: Handle, options: Options) -> Result<()> {
    let settings = match &options.settings {
        Some(path) => BrowserSettings::load(path)?,
        None => BrowserSettings::default(),
    };
    let genome = match &options.genome {
        Some(path) => GenomeConfig::load(path)?,
        None => demo::genome(),
    };
    let tracks = match &options.tracks {
        Some(path) => load_tracks(path)?,
        None => demo::tracks(),
    };
    let service: Arc<dyn AlignmentService> = match &options.blocks {
        Some(path) => Arc::new(BlockAlignmentService::load(genome.name.clone(), path)?),
        None => Arc::new(demo::alignment_service()),
    };

    let context = Arc::new(NavigationContext::from_genome(&genome)?);
    let loci: Vec<String> = if options.loci.is_empty() {
        DEMO_LOCI.iter().map(|l| l.to_string()).collect()
    } else {
        options.loci.clone()
    };

    let first = DisplayedRegion::parse(context.clone(), &loci[0])?;
    let mut inputs = ViewInputs::new(first, tracks, CONTAINER_WIDTH, LEGEND_WIDTH);
    let coordinator = ViewCoordinator::new(runtime, settings, genome.name.clone(), &inputs, service)?;
    let subscriber: Arc<dyn ViewSubscriber> = Arc::new(LogSubscriber);
    coordinator.add_subscriber(subscriber.clone());

    info!(
        genome = %coordinator.primary_genome(),
        secondary = ?coordinator.secondary_genomes(),
        "starting"
    );

    for (i, locus) in loci.iter().enumerate() {
        if i > 0 {
            inputs = inputs.with_region(DisplayedRegion::parse(context.clone(), locus)?);
        }
        let frame = coordinator.frame(&inputs)?;

        // A second render with unchanged inputs joins the same cycle
        let repeat = coordinator.frame(&inputs)?;
        info!(locus = %locus, generation = frame.generation, reused = repeat.generation == frame.generation, "rendering");

        let view = frame.primary_view_future.clone().await;
        report(&view, &frame.alignments.clone().await);
    }

    // Narrow the window: same region, new drawing width
    inputs = inputs.with_container_width(CONTAINER_WIDTH / 2.0);
    let frame = coordinator.frame(&inputs)?;
    info!(bases_per_pixel = frame.bases_per_pixel, "resized");
    report(&frame.primary_view_future.clone().await, &frame.alignments.clone().await);

    // Switch the primary genome to the first secondary one. Block data is
    // keyed to the starting primary, so every query fails and the view
    // falls back to the plain expansion.
    if let Some(next) = coordinator.secondary_genomes().into_iter().next() {
        coordinator.set_genome(next);
        let frame = coordinator.frame(&inputs)?;
        report(&frame.primary_view_future.clone().await, &frame.alignments.clone().await);
        info!(phase = ?coordinator.phase(), "after genome switch");
    }

    coordinator.teardown();
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let options = Options::parse();

    let runtime = tokio::runtime::Runtime::new()?;
    let handle = runtime.handle().clone();
    runtime.block_on(run(handle, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options() {
        let options =
            Options::try_parse_from(["genome-view", "--genome", "hg19.json", "chr1:1-100", "--blocks", "b.json"]).unwrap();
        assert_eq!(options.genome, Some(PathBuf::from("hg19.json")));
        assert_eq!(options.blocks, Some(PathBuf::from("b.json")));
        assert_eq!(options.loci, vec!["chr1:1-100".to_string()]);
        assert!(options.settings.is_none());

        assert_eq!(Options::try_parse_from(["genome-view"]).unwrap(), Options::default());
    }

    #[test]
    fn test_parse_rejects_bad_flags() {
        assert!(Options::try_parse_from(["genome-view", "--verbose"]).is_err());
        assert!(Options::try_parse_from(["genome-view", "--genome"]).is_err());
    }

    #[tokio::test]
    async fn test_demo_runs_end_to_end() {
        run(Handle::current(), Options::default()).await.unwrap();
    }
}
