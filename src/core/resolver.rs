//! Probeset resolution
//!
//! Composes the metaprobeset cross-map with the two membership indices to
//! map each gene-array probeset onto candidate exon-array probesets:
//!
//! 1. pick one exon metaprobeset per gene metaprobeset (tie-break if several)
//! 2. skip the gene metaprobeset if either side has no membership entry
//! 3. map every gene probeset of it to the exon metaprobeset's probesets

use crate::core::choice::CandidateChooser;
use crate::core::record::RecordIndex;
use crate::formats::comparison::MetaprobesetCrossMap;
use crate::formats::membership::MembershipIndex;

/// How repeated gene probesets combine their candidate lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// A later metaprobeset replaces the earlier candidate list
    #[default]
    LastWriteWins,
    /// Candidate lists are concatenated, dropping repeats
    Union,
}

/// Counters collected while resolving
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub gene_metaprobesets: usize,
    pub resolved: usize,
    pub ambiguous: usize,
    pub missing_gene_membership: usize,
    pub missing_exon_membership: usize,
}

/// Gene probeset -> candidate exon probesets, in resolution order
#[derive(Debug, Clone, Default)]
pub struct ResolvedProbesets {
    map: RecordIndex<Vec<String>>,
}

impl ResolvedProbesets {
    pub fn candidates(&self, gene_probeset: &str) -> Option<&[String]> {
        self.map.get(gene_probeset).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.map.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn record(&mut self, gene_probeset: &str, exon_probesets: &[String], policy: MergePolicy) {
        if policy == MergePolicy::Union {
            if let Some(existing) = self.map.get_mut(gene_probeset) {
                for ps in exon_probesets {
                    if !existing.contains(ps) {
                        existing.push(ps.clone());
                    }
                }
                return;
            }
        }
        self.map.insert(gene_probeset, exon_probesets.to_vec());
    }
}

/// Resolves gene probesets to exon probesets
pub struct ProbesetResolver<'a> {
    cross_map: &'a MetaprobesetCrossMap,
    gene_membership: &'a MembershipIndex,
    exon_membership: &'a MembershipIndex,
    policy: MergePolicy,
}

impl<'a> ProbesetResolver<'a> {
    pub fn new(
        cross_map: &'a MetaprobesetCrossMap,
        gene_membership: &'a MembershipIndex,
        exon_membership: &'a MembershipIndex,
    ) -> Self {
        Self {
            cross_map,
            gene_membership,
            exon_membership,
            policy: MergePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Resolve every gene metaprobeset of the cross-map
    pub fn resolve<C: CandidateChooser + ?Sized>(
        &self,
        chooser: &mut C,
    ) -> (ResolvedProbesets, ResolveStats) {
        let mut resolved = ResolvedProbesets::default();
        let mut stats = ResolveStats::default();

        for (gene_mps, candidates) in self.cross_map.iter() {
            stats.gene_metaprobesets += 1;

            let exon_mps = match candidates {
                [] => continue,
                [only] => only,
                many => {
                    stats.ambiguous += 1;
                    let pick = chooser.choose(many).min(many.len() - 1);
                    log::debug!(
                        "Gene metaprobeset {} has {} exon candidates, picked {}",
                        gene_mps,
                        many.len(),
                        many[pick]
                    );
                    &many[pick]
                }
            };

            let Some(gene_probesets) = self.gene_membership.probesets(gene_mps) else {
                log::debug!("No gene probesets for metaprobeset {}", gene_mps);
                stats.missing_gene_membership += 1;
                continue;
            };

            let Some(exon_probesets) = self.exon_membership.probesets(exon_mps) else {
                log::debug!("No exon probesets for metaprobeset {}", exon_mps);
                stats.missing_exon_membership += 1;
                continue;
            };

            for gene_ps in gene_probesets {
                resolved.record(gene_ps, exon_probesets, self.policy);
            }
            stats.resolved += 1;
        }

        (resolved, stats)
    }
}
