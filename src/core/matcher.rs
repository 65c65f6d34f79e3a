//! Probe matching and emission
//!
//! For every resolved (gene probeset, exon probeset) pair, probes with
//! identical sequences are paired up and their intensity rows are written
//! to three streams:
//!
//! - gene stream: the gene intensity row, unmodified
//! - exon stream: the exon intensity row relabeled with the gene probe id
//!   and gene probeset id
//! - manifest: the exon probe id
//!
//! Missing details or intensities skip the affected pair only.

use crate::core::probe::{Probe, ProbeIntensity};
use crate::core::resolver::ResolvedProbesets;
use crate::formats::detail::ProbeDetailIndex;
use crate::formats::intensity::ProbeIntensityIndex;
use std::io::{self, Write};

/// Header of the exon probe manifest
pub const MANIFEST_HEADER: &str = "probe_id";

/// Detail and intensity indices of one platform
#[derive(Clone, Copy)]
pub struct PlatformIndices<'a> {
    pub details: &'a ProbeDetailIndex,
    pub intensities: &'a ProbeIntensityIndex,
}

impl<'a> PlatformIndices<'a> {
    pub fn new(details: &'a ProbeDetailIndex, intensities: &'a ProbeIntensityIndex) -> Self {
        Self {
            details,
            intensities,
        }
    }
}

/// Two sequence-identical probes, one per platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbePair<'a> {
    pub gene: &'a Probe,
    pub exon: &'a Probe,
}

/// All (gene, exon) probe combinations with equal sequences
///
/// Pairs come out in gene-probe order, then exon-probe order.
pub fn matching_pairs<'a>(gene: &'a [Probe], exon: &'a [Probe]) -> Vec<ProbePair<'a>> {
    let mut pairs = Vec::new();
    for gene_probe in gene {
        for exon_probe in exon {
            if gene_probe.is_equivalent(exon_probe) {
                pairs.push(ProbePair {
                    gene: gene_probe,
                    exon: exon_probe,
                });
            }
        }
    }
    pairs
}

/// Counters collected while matching
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub gene_probesets: usize,
    pub probeset_pairs: usize,
    pub missing_details: usize,
    pub no_shared_sequence: usize,
    pub matched_pairs: usize,
    pub missing_intensity: usize,
    pub rows_written: usize,
}

/// Writes matched rows to the gene, exon and manifest streams
pub struct MatchEmitter<W: Write> {
    gene_out: W,
    exon_out: W,
    manifest: W,
    rows: usize,
}

impl<W: Write> MatchEmitter<W> {
    /// Create the emitter and write each stream's header
    pub fn new(
        mut gene_out: W,
        mut exon_out: W,
        mut manifest: W,
        gene_header: Option<&str>,
        exon_header: Option<&str>,
    ) -> io::Result<Self> {
        if let Some(header) = gene_header {
            writeln!(gene_out, "{}", header)?;
        }
        if let Some(header) = exon_header {
            writeln!(exon_out, "{}", header)?;
        }
        writeln!(manifest, "{}", MANIFEST_HEADER)?;
        Ok(Self {
            gene_out,
            exon_out,
            manifest,
            rows: 0,
        })
    }

    /// Write one matched probe pair
    pub fn emit(
        &mut self,
        gene_row: &ProbeIntensity,
        exon_row: &ProbeIntensity,
        gene_probeset_id: &str,
        exon_probe_id: &str,
    ) -> io::Result<()> {
        writeln!(self.gene_out, "{}", gene_row)?;
        writeln!(
            self.exon_out,
            "{}",
            exon_row.relabeled(&gene_row.probe_id, gene_probeset_id)
        )?;
        writeln!(self.manifest, "{}", exon_probe_id)?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written so far (per stream, excluding headers)
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush all streams and hand them back
    pub fn finish(mut self) -> io::Result<(W, W, W)> {
        self.gene_out.flush()?;
        self.exon_out.flush()?;
        self.manifest.flush()?;
        Ok((self.gene_out, self.exon_out, self.manifest))
    }
}

/// Pairs probes across platforms and emits their intensities
pub struct ProbeMatcher<'a> {
    gene: PlatformIndices<'a>,
    exon: PlatformIndices<'a>,
    limit: Option<usize>,
}

impl<'a> ProbeMatcher<'a> {
    pub fn new(gene: PlatformIndices<'a>, exon: PlatformIndices<'a>) -> Self {
        Self {
            gene,
            exon,
            limit: None,
        }
    }

    /// Stop after this many gene probesets
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Match every resolved probeset pair and write the results
    pub fn run<W: Write>(
        &self,
        resolved: &ResolvedProbesets,
        emitter: &mut MatchEmitter<W>,
    ) -> io::Result<MatchStats> {
        let mut stats = MatchStats::default();

        for (gene_ps, exon_candidates) in resolved.iter() {
            if self.limit.is_some_and(|limit| stats.gene_probesets >= limit) {
                log::info!("Stopping after {} gene probesets", stats.gene_probesets);
                break;
            }
            stats.gene_probesets += 1;

            for exon_ps in exon_candidates {
                stats.probeset_pairs += 1;
                self.match_probesets(gene_ps, exon_ps, emitter, &mut stats)?;
            }
        }

        stats.rows_written = emitter.rows();
        Ok(stats)
    }

    fn match_probesets<W: Write>(
        &self,
        gene_ps: &str,
        exon_ps: &str,
        emitter: &mut MatchEmitter<W>,
        stats: &mut MatchStats,
    ) -> io::Result<()> {
        let (Some(gene_probes), Some(exon_probes)) = (
            self.gene.details.probes(gene_ps),
            self.exon.details.probes(exon_ps),
        ) else {
            log::debug!("No probe details for pair {} / {}", gene_ps, exon_ps);
            stats.missing_details += 1;
            return Ok(());
        };

        let pairs = matching_pairs(gene_probes, exon_probes);
        if pairs.is_empty() {
            stats.no_shared_sequence += 1;
            return Ok(());
        }

        for pair in pairs {
            stats.matched_pairs += 1;
            let (Some(gene_row), Some(exon_row)) = (
                self.gene.intensities.get(&pair.gene.probe_id),
                self.exon.intensities.get(&pair.exon.probe_id),
            ) else {
                log::debug!(
                    "No intensities for probe pair {} / {}",
                    pair.gene.probe_id,
                    pair.exon.probe_id
                );
                stats.missing_intensity += 1;
                continue;
            };
            emitter.emit(gene_row, exon_row, gene_ps, &pair.exon.probe_id)?;
        }
        Ok(())
    }
}
