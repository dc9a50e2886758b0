//! Secondary genome derivation from the track list

use indexmap::IndexSet;

use gv_core::TrackModel;

/// Distinct genomes referenced by alignment tracks, in track order.
///
/// The primary genome and tracks with no associated genome are skipped.
/// Order matters: the first genome is the tie-break when alignment results
/// disagree.
pub fn secondary_genomes(primary_genome: &str, tracks: &[TrackModel], alignment_types: &[String]) -> IndexSet<String> {
    tracks
        .iter()
        .filter(|track| track.is_any_of(alignment_types))
        .filter_map(|track| track.associated_genome())
        .filter(|genome| *genome != primary_genome)
        .map(str::to_string)
        .collect()
}
