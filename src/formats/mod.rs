//! File format adapters
//!
//! One adapter per input table (comparison map, metaprobeset map, probeset
//! details, probe intensities); each builds its lookup index.

pub mod comparison;
pub mod detail;
pub mod intensity;
pub mod membership;

pub use comparison::MetaprobesetCrossMap;
pub use detail::ProbeDetailIndex;
pub use intensity::ProbeIntensityIndex;
pub use membership::MembershipIndex;
