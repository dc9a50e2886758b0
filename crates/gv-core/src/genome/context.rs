//! Navigation context: chromosomes concatenated into one absolute axis

use std::fmt;

use ahash::AHashMap;

use super::{Chromosome, GenomeConfig};
use crate::error::CoordinateError;
use crate::interval::GenomicInterval;

/// A single position on a named chromosome (0-based)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locus {
    pub chromosome: String,
    pub position: u64,
}

/// A chromosome-relative half-open span
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChromosomeSpan {
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
}

impl ChromosomeSpan {
    pub fn new(chromosome: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            chromosome: chromosome.into(),
            start,
            end,
        }
    }

    pub fn width(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }
}

impl fmt::Display for ChromosomeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chromosome, self.start + 1, self.end)
    }
}

/// The coordinate space of one genome.
///
/// Absolute coordinate `x` belongs to the chromosome whose offset is the
/// largest one not greater than `x`.
#[derive(Debug, Clone)]
pub struct NavigationContext {
    name: String,
    chromosomes: Vec<Chromosome>,
    offsets: Vec<u64>,
    by_name: AHashMap<String, usize>,
    total_length: u64,
}

impl NavigationContext {
    /// Build the coordinate space for a genome
    pub fn from_genome(genome: &GenomeConfig) -> Result<Self, CoordinateError> {
        let mut offsets = Vec::with_capacity(genome.chromosomes.len());
        let mut by_name = AHashMap::with_capacity(genome.chromosomes.len());
        let mut total_length = 0u64;

        for (idx, chromosome) in genome.chromosomes.iter().enumerate() {
            if by_name.insert(chromosome.name.clone(), idx).is_some() {
                return Err(CoordinateError::DuplicateChromosome(chromosome.name.clone()));
            }
            offsets.push(total_length);
            total_length = total_length
                .checked_add(chromosome.length)
                .ok_or_else(|| CoordinateError::GenomeTooLarge(genome.name.clone()))?;
        }

        Ok(Self {
            name: genome.name.clone(),
            chromosomes: genome.chromosomes.clone(),
            offsets,
            by_name,
            total_length,
        })
    }

    /// Genome name this context was built from
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chromosomes(&self) -> &[Chromosome] {
        &self.chromosomes
    }

    pub fn total_length(&self) -> u64 {
        self.total_length
    }

    pub fn chromosome_length(&self, chromosome: &str) -> Result<u64, CoordinateError> {
        self.by_name
            .get(chromosome)
            .map(|&idx| self.chromosomes[idx].length)
            .ok_or_else(|| CoordinateError::UnknownChromosome(chromosome.to_string()))
    }

    /// Absolute coordinate of a 0-based chromosome position
    pub fn locus_to_absolute(&self, chromosome: &str, position: u64) -> Result<u64, CoordinateError> {
        let idx = *self
            .by_name
            .get(chromosome)
            .ok_or_else(|| CoordinateError::UnknownChromosome(chromosome.to_string()))?;
        if position > self.chromosomes[idx].length {
            return Err(CoordinateError::range(
                position,
                position,
                "position is past the end of the chromosome",
            ));
        }
        Ok(self.offsets[idx] + position)
    }

    /// Chromosome position of an absolute coordinate
    pub fn absolute_to_locus(&self, absolute: u64) -> Result<Locus, CoordinateError> {
        if absolute > self.total_length || self.chromosomes.is_empty() {
            return Err(CoordinateError::range(
                absolute,
                absolute,
                "coordinate is outside the genome",
            ));
        }
        let idx = self.offsets.partition_point(|&offset| offset <= absolute) - 1;
        Ok(Locus {
            chromosome: self.chromosomes[idx].name.clone(),
            position: absolute - self.offsets[idx],
        })
    }

    /// Split an absolute interval into the chromosome pieces it covers
    pub fn loci_in(&self, interval: &GenomicInterval) -> Vec<ChromosomeSpan> {
        self.chromosomes
            .iter()
            .zip(&self.offsets)
            .filter_map(|(chromosome, &offset)| {
                let span = GenomicInterval::new(offset, offset + chromosome.length).ok()?;
                let overlap = span.intersect(interval)?;
                Some(ChromosomeSpan::new(
                    chromosome.name.clone(),
                    overlap.start() - offset,
                    overlap.end() - offset,
                ))
            })
            .collect()
    }

    /// Parse a user locus into an absolute interval.
    ///
    /// Accepts `chr1:100-200` (1-based, inclusive; commas allowed in numbers),
    /// `chr1:900-chr2:100` for a region spanning chromosomes, or a bare
    /// chromosome name for the whole chromosome.
    pub fn parse_region(&self, text: &str) -> Result<GenomicInterval, CoordinateError> {
        let text = text.trim();
        let malformed = || CoordinateError::MalformedLocus(text.to_string());

        let Some((chromosome, range)) = text.split_once(':') else {
            let length = self.chromosome_length(text)?;
            let start = self.locus_to_absolute(text, 0)?;
            return GenomicInterval::new(start, start + length);
        };

        let (start, end) = range.split_once('-').ok_or_else(malformed)?;
        let (end_chromosome, end) = end.split_once(':').unwrap_or((chromosome, end));
        let parse = |s: &str| s.trim().replace(',', "").parse::<u64>().map_err(|_| malformed());
        let start_one_based = parse(start)?;
        let end_one_based = parse(end)?;

        if start_one_based == 0 || (end_chromosome == chromosome && start_one_based > end_one_based) {
            return Err(CoordinateError::range(
                start_one_based,
                end_one_based,
                "locus must satisfy 1 <= start <= end",
            ));
        }

        let abs_start = self.locus_to_absolute(chromosome, start_one_based - 1)?;
        let abs_end = self.locus_to_absolute(end_chromosome, end_one_based)?;
        GenomicInterval::new(abs_start, abs_end)
    }

    /// Render an absolute interval as a 1-based locus string
    pub fn format_interval(&self, interval: &GenomicInterval) -> String {
        let pieces = self.loci_in(interval);
        match (pieces.first(), pieces.last()) {
            (Some(first), Some(last)) if first.chromosome == last.chromosome => first.to_string(),
            (Some(first), Some(last)) => format!(
                "{}:{}-{}:{}",
                first.chromosome,
                first.start + 1,
                last.chromosome,
                last.end
            ),
            _ => match self.absolute_to_locus(interval.start()) {
                Ok(locus) => format!("{}:{}", locus.chromosome, locus.position),
                Err(_) => interval.to_string(),
            },
        }
    }
}

impl PartialEq for NavigationContext {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.chromosomes == other.chromosomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_chromosomes() -> NavigationContext {
        let genome = GenomeConfig::new(
            "toy",
            vec![Chromosome::new("chr1", 1000), Chromosome::new("chr2", 500)],
        );
        NavigationContext::from_genome(&genome).unwrap()
    }

    #[test]
    fn test_offsets_and_total_length() {
        let ctx = two_chromosomes();
        assert_eq!(ctx.total_length(), 1500);
        assert_eq!(ctx.locus_to_absolute("chr2", 10).unwrap(), 1010);
        assert_eq!(
            ctx.absolute_to_locus(1010).unwrap(),
            Locus { chromosome: "chr2".to_string(), position: 10 }
        );
        assert_eq!(ctx.absolute_to_locus(999).unwrap().chromosome, "chr1");
        assert!(ctx.absolute_to_locus(1501).is_err());
    }

    #[test]
    fn test_duplicate_chromosome_rejected() {
        let genome = GenomeConfig::new(
            "bad",
            vec![Chromosome::new("chr1", 10), Chromosome::new("chr1", 20)],
        );
        assert_eq!(
            NavigationContext::from_genome(&genome).unwrap_err(),
            CoordinateError::DuplicateChromosome("chr1".to_string())
        );
    }

    #[test]
    fn test_oversized_genome_rejected() {
        let genome = GenomeConfig::new(
            "huge",
            vec![Chromosome::new("chr1", u64::MAX), Chromosome::new("chr2", 1)],
        );
        assert_eq!(
            NavigationContext::from_genome(&genome).unwrap_err(),
            CoordinateError::GenomeTooLarge("huge".to_string())
        );
    }

    #[test]
    fn test_parse_region() {
        let ctx = two_chromosomes();
        let interval = ctx.parse_region("chr2:1-100").unwrap();
        assert_eq!((interval.start(), interval.end()), (1000, 1100));

        let whole = ctx.parse_region("chr1").unwrap();
        assert_eq!((whole.start(), whole.end()), (0, 1000));

        let commas = ctx.parse_region("chr1:1,00-2,00").unwrap();
        assert_eq!((commas.start(), commas.end()), (99, 200));

        assert!(matches!(ctx.parse_region("chr1:abc"), Err(CoordinateError::MalformedLocus(_))));
        assert!(matches!(ctx.parse_region("chrX:1-2"), Err(CoordinateError::UnknownChromosome(_))));
        assert!(matches!(ctx.parse_region("chr1:0-10"), Err(CoordinateError::InvalidRange { .. })));
        assert!(ctx.parse_region("chr2:1-501").is_err());
    }

    #[test]
    fn test_loci_split_across_chromosomes() {
        let ctx = two_chromosomes();
        let interval = GenomicInterval::new(900, 1100).unwrap();
        assert_eq!(
            ctx.loci_in(&interval),
            vec![ChromosomeSpan::new("chr1", 900, 1000), ChromosomeSpan::new("chr2", 0, 100)]
        );
        assert_eq!(ctx.format_interval(&interval), "chr1:901-chr2:100");
        assert_eq!(ctx.parse_region("chr1:901-chr2:100").unwrap(), interval);
        assert!(ctx.parse_region("chr2:1-chr1:10").is_err());
    }
}
