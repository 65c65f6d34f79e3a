//! samples.txt producers
//!
//! Builds the two-column `hts\tma` sample pairing file consumed by the
//! downstream classifier. Training rows pair an RNA-seq (hts) sample with a
//! microarray (ma) sample; test rows carry a `*` sentinel in the first
//! column, followed by the sample name or `NA` when there is none.
//!
//! - [`template`]: pick random training/test pairs from ready-made pair lists
//! - [`split`]: partition a tissue's RNA-seq samples into training and test

pub mod split;
pub mod template;

use std::io::{self, Write};

/// Header of a samples.txt file
pub const SAMPLES_HEADER: &str = "hts\tma";

/// First-column prefix of test rows
pub const TEST_MARKER: char = '*';

/// Stand-in for a missing test sample name
pub const NO_NAME: &str = "NA";

/// Which set a row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleRole {
    Training,
    Test,
}

/// Format one samples.txt row
///
/// Test rows without an hts name get the `*NA` sentinel.
pub fn format_row(role: SampleRole, hts: Option<&str>, ma: &str) -> String {
    let hts = hts.filter(|s| !s.is_empty());
    match (role, hts) {
        (SampleRole::Training, Some(name)) => format!("{}\t{}", name, ma),
        (SampleRole::Training, None) => format!("\t{}", ma),
        (SampleRole::Test, Some(name)) => format!("{}{}\t{}", TEST_MARKER, name, ma),
        (SampleRole::Test, None) => format!("{}{}\t{}", TEST_MARKER, NO_NAME, ma),
    }
}

/// Write header and rows
pub fn write_samples<W: Write, S: AsRef<str>>(mut out: W, rows: &[S]) -> io::Result<()> {
    writeln!(out, "{}", SAMPLES_HEADER)?;
    for row in rows {
        writeln!(out, "{}", row.as_ref())?;
    }
    out.flush()
}
