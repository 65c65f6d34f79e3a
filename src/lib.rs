//! ProbeCrossMap - cross-platform microarray probe reconciliation
//!
//! Re-expresses probe-level intensities of an Affymetrix exon array (HuEx)
//! under the identifiers of a gene array (HuGe) by resolving metaprobesets
//! to probesets and pairing probes with identical sequences.
//!
//! # Pipeline
//!
//! 1. comparison map: gene metaprobeset -> exon metaprobesets
//! 2. metaprobeset maps: metaprobeset -> probesets (per platform)
//! 3. resolver: gene probeset -> exon probesets (random tie-break)
//! 4. probeset details: probeset -> probes (per platform)
//! 5. probe intensities: probe -> intensity row (per platform)
//! 6. matcher: sequence-identical probe pairs -> three output streams
//!
//! # Example
//!
//! ```ignore
//! use probe_crossmap::{run_transform, TransformConfig};
//!
//! let mut config = TransformConfig::new(
//!     "huex.txt", "huge.txt", "comparison.txt",
//!     "huex.pgf.txt", "huge.pgf.txt", "huex.mps", "huge.mps",
//!     "huex_out.txt", "huge_out.txt",
//! );
//! config.seed = Some(42);
//! let stats = run_transform(&config)?;
//! ```

pub mod core;
pub mod formats;
pub mod samples;

// Re-export commonly used types
pub use crate::core::{
    run_transform, run_transform_with, CandidateChooser, MergePolicy, ParseError, Probe,
    ProbeIntensity, ProbeMapError, Probeset, RandomChooser, SampleError, TransformConfig,
    TransformStats,
};
pub use crate::formats::{MembershipIndex, MetaprobesetCrossMap, ProbeDetailIndex, ProbeIntensityIndex};
