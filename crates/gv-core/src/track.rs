//! Track metadata as read by the view core

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Track list shared with the surrounding application.
///
/// Identity matters: a new list must be a new `Arc`, which is how the
/// coordinator detects that tracks changed.
pub type TrackList = Arc<Vec<TrackModel>>;

/// Metadata key consulted when a track has no explicit query genome
pub const GENOME_METADATA_KEY: &str = "genome";

/// Description of one data track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackModel {
    pub name: String,

    /// Declared track type, e.g. `bigwig` or `genomealign`
    #[serde(rename = "type")]
    pub track_type: String,

    /// File format, when it differs from the track type
    #[serde(default, rename = "filetype")]
    pub file_type: Option<String>,

    /// Genome a comparative track is drawn against
    #[serde(default, rename = "querygenome")]
    pub query_genome: Option<String>,

    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl TrackModel {
    pub fn new(name: impl Into<String>, track_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            track_type: track_type.into(),
            file_type: None,
            query_genome: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_file_type(mut self, file_type: impl Into<String>) -> Self {
        self.file_type = Some(file_type.into());
        self
    }

    pub fn with_query_genome(mut self, genome: impl Into<String>) -> Self {
        self.query_genome = Some(genome.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Whether the declared type or file type is one of `types`
    pub fn is_any_of(&self, types: &[String]) -> bool {
        types
            .iter()
            .any(|t| *t == self.track_type || self.file_type.as_deref() == Some(t.as_str()))
    }

    /// The genome this track references: `query_genome`, else `metadata["genome"]`
    pub fn associated_genome(&self) -> Option<&str> {
        self.query_genome
            .as_deref()
            .or_else(|| self.metadata.get(GENOME_METADATA_KEY).map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_associated_genome_falls_back_to_metadata() {
        let explicit = TrackModel::new("a", "genomealign").with_query_genome("mm10");
        assert_eq!(explicit.associated_genome(), Some("mm10"));

        let from_metadata = TrackModel::new("b", "genomealign").with_metadata("genome", "panTro6");
        assert_eq!(from_metadata.associated_genome(), Some("panTro6"));

        assert_eq!(TrackModel::new("c", "bigwig").associated_genome(), None);
    }

    #[test]
    fn test_type_matching_uses_file_type_too() {
        let types = vec!["genomealign".to_string()];
        assert!(TrackModel::new("a", "genomealign").is_any_of(&types));
        assert!(TrackModel::new("b", "custom").with_file_type("genomealign").is_any_of(&types));
        assert!(!TrackModel::new("c", "bigwig").is_any_of(&types));
    }

    #[test]
    fn test_deserialize_hub_style_fields() {
        let json = r#"{"name": "hg38 to mm10", "type": "genomealign", "querygenome": "mm10"}"#;
        let track: TrackModel = serde_json::from_str(json).unwrap();
        assert_eq!(track.track_type, "genomealign");
        assert_eq!(track.query_genome.as_deref(), Some("mm10"));
        assert!(track.metadata.is_empty());
    }
}
