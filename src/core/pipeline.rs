//! End-to-end transform
//!
//! Loads every index fully, resolves probesets, then matches and emits.
//! Output streams are written as pairs are found; if a run fails part way,
//! whatever was written stays on disk and must be treated as incomplete.

use crate::core::choice::{CandidateChooser, RandomChooser};
use crate::core::error::{ProbeMapError, Result};
use crate::core::io::create_writer;
use crate::core::matcher::{MatchEmitter, MatchStats, PlatformIndices, ProbeMatcher};
use crate::core::record::LineMarkers;
use crate::core::resolver::{MergePolicy, ProbesetResolver, ResolveStats};
use crate::formats::comparison::MetaprobesetCrossMap;
use crate::formats::detail::ProbeDetailIndex;
use crate::formats::intensity::ProbeIntensityIndex;
use crate::formats::membership::MembershipIndex;
use std::path::PathBuf;

/// Default name of the exon probe manifest
pub const DEFAULT_MANIFEST: &str = "huex_probes.txt";

/// Input and output locations plus run options
#[derive(Debug, Clone)]
pub struct TransformConfig {
    /// Exon-array (HuEx) probe intensities
    pub huex_intensities: PathBuf,
    /// Gene-array (HuGe) probe intensities
    pub huge_intensities: PathBuf,
    /// Comparison map between the two platforms' metaprobesets
    pub comparison_map: PathBuf,
    /// Exon-array probeset details
    pub huex_details: PathBuf,
    /// Gene-array probeset details
    pub huge_details: PathBuf,
    /// Exon-array metaprobeset-to-probeset map
    pub huex_mps_map: PathBuf,
    /// Gene-array metaprobeset-to-probeset map
    pub huge_mps_map: PathBuf,
    pub huex_out: PathBuf,
    pub huge_out: PathBuf,
    pub manifest_out: PathBuf,
    /// Seed for the metaprobeset tie-break; entropy when unset
    pub seed: Option<u64>,
    pub merge_policy: MergePolicy,
    /// Process at most this many resolved gene probesets
    pub limit: Option<usize>,
    pub markers: LineMarkers,
}

impl TransformConfig {
    /// Config with default options and the manifest in the working directory
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        huex_intensities: impl Into<PathBuf>,
        huge_intensities: impl Into<PathBuf>,
        comparison_map: impl Into<PathBuf>,
        huex_details: impl Into<PathBuf>,
        huge_details: impl Into<PathBuf>,
        huex_mps_map: impl Into<PathBuf>,
        huge_mps_map: impl Into<PathBuf>,
        huex_out: impl Into<PathBuf>,
        huge_out: impl Into<PathBuf>,
    ) -> Self {
        Self {
            huex_intensities: huex_intensities.into(),
            huge_intensities: huge_intensities.into(),
            comparison_map: comparison_map.into(),
            huex_details: huex_details.into(),
            huge_details: huge_details.into(),
            huex_mps_map: huex_mps_map.into(),
            huge_mps_map: huge_mps_map.into(),
            huex_out: huex_out.into(),
            huge_out: huge_out.into(),
            manifest_out: PathBuf::from(DEFAULT_MANIFEST),
            seed: None,
            merge_policy: MergePolicy::default(),
            limit: None,
            markers: LineMarkers::default(),
        }
    }
}

/// Statistics of one transform run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformStats {
    pub resolve: ResolveStats,
    pub resolved_probesets: usize,
    pub matching: MatchStats,
}

/// Run the transform with the configured tie-break seed
pub fn run_transform(config: &TransformConfig) -> Result<TransformStats> {
    let mut chooser = RandomChooser::from_seed_option(config.seed);
    run_transform_with(config, &mut chooser)
}

/// Run the transform with a caller-supplied tie-break
pub fn run_transform_with<C: CandidateChooser + ?Sized>(
    config: &TransformConfig,
    chooser: &mut C,
) -> Result<TransformStats> {
    let markers = &config.markers;

    let cross_map = MetaprobesetCrossMap::from_path(&config.comparison_map, markers)
        .map_err(|e| ProbeMapError::load(&config.comparison_map, e))?;
    let huex_mps = MembershipIndex::from_path(&config.huex_mps_map, markers)
        .map_err(|e| ProbeMapError::load(&config.huex_mps_map, e))?;
    let huge_mps = MembershipIndex::from_path(&config.huge_mps_map, markers)
        .map_err(|e| ProbeMapError::load(&config.huge_mps_map, e))?;

    log::info!("Building map of HuGe probesets to HuEx probesets");
    let (resolved, resolve_stats) = ProbesetResolver::new(&cross_map, &huge_mps, &huex_mps)
        .with_policy(config.merge_policy)
        .resolve(chooser);
    log::info!(
        "Resolved {} of {} gene metaprobesets into {} gene probesets",
        resolve_stats.resolved,
        resolve_stats.gene_metaprobesets,
        resolved.len()
    );

    let huex_int = ProbeIntensityIndex::from_path(&config.huex_intensities, markers)
        .map_err(|e| ProbeMapError::load(&config.huex_intensities, e))?;
    let huge_int = ProbeIntensityIndex::from_path(&config.huge_intensities, markers)
        .map_err(|e| ProbeMapError::load(&config.huge_intensities, e))?;
    let huex_det = ProbeDetailIndex::from_path(&config.huex_details, markers)
        .map_err(|e| ProbeMapError::load(&config.huex_details, e))?;
    let huge_det = ProbeDetailIndex::from_path(&config.huge_details, markers)
        .map_err(|e| ProbeMapError::load(&config.huge_details, e))?;

    let mut emitter = MatchEmitter::new(
        create_writer(&config.huge_out)?,
        create_writer(&config.huex_out)?,
        create_writer(&config.manifest_out)?,
        huge_int.header(),
        huex_int.header(),
    )?;

    log::info!("Writing new probe intensity files");
    let matcher = ProbeMatcher::new(
        PlatformIndices::new(&huge_det, &huge_int),
        PlatformIndices::new(&huex_det, &huex_int),
    )
    .with_limit(config.limit);
    let match_stats = matcher.run(&resolved, &mut emitter)?;
    emitter.finish()?;

    Ok(TransformStats {
        resolve: resolve_stats,
        resolved_probesets: resolved.len(),
        matching: match_stats,
    })
}
