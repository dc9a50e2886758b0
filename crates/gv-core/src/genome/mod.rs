//! Genome assemblies and their linear coordinate space

use std::path::Path;

use serde::{Deserialize, Serialize};

mod context;

pub use context::{ChromosomeSpan, Locus, NavigationContext};

/// A named sequence inside an assembly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chromosome {
    pub name: String,
    pub length: u64,
}

impl Chromosome {
    pub fn new(name: impl Into<String>, length: u64) -> Self {
        Self {
            name: name.into(),
            length,
        }
    }
}

/// Configuration of one genome assembly.
///
/// Chromosome order is significant: it defines the layout of the
/// absolute coordinate space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomeConfig {
    /// Assembly name, e.g. `hg38`
    pub name: String,

    /// Chromosomes in display order
    pub chromosomes: Vec<Chromosome>,
}

impl GenomeConfig {
    /// Create a genome configuration
    pub fn new(name: impl Into<String>, chromosomes: Vec<Chromosome>) -> Self {
        Self {
            name: name.into(),
            chromosomes,
        }
    }

    /// Genome with a single chromosome
    pub fn single(name: impl Into<String>, chromosome: impl Into<String>, length: u64) -> Self {
        Self::new(name, vec![Chromosome::new(chromosome, length)])
    }

    /// Load a genome configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, crate::config::ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Sum of all chromosome lengths, saturating
    pub fn total_length(&self) -> u64 {
        self.chromosomes.iter().fold(0u64, |total, c| total.saturating_add(c.length))
    }
}
