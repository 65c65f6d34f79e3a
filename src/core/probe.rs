//! Probe-level data model
//!
//! Records parsed from the probeset detail files ([`Probe`], [`Probeset`])
//! and from the probe intensity files ([`ProbeIntensity`]).

use std::fmt;

/// One probe descriptor from a probeset detail file
///
/// Probes from different platforms are equivalent when their sequences are
/// identical; platform-specific identifiers play no part in that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub probe_id: String,
    pub probe_type: String,
    pub gc_count: u32,
    pub probe_length: u32,
    pub interrogation_position: u32,
    pub sequence: String,
}

impl Probe {
    /// Same nucleotide sequence, regardless of identifiers
    #[inline]
    pub fn is_equivalent(&self, other: &Probe) -> bool {
        self.sequence == other.sequence
    }
}

/// A named group of probes, in detail-file order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probeset {
    pub probeset_id: String,
    pub probes: Vec<Probe>,
}

impl Probeset {
    pub fn new(probeset_id: impl Into<String>) -> Self {
        Self {
            probeset_id: probeset_id.into(),
            probes: Vec::new(),
        }
    }

    pub fn add_probe(&mut self, probe: Probe) {
        self.probes.push(probe);
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}

/// A single measured intensity, kept with its source text
///
/// The text is what gets written back out, so emitted rows carry exactly
/// the digits of the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Intensity {
    raw: String,
    value: f64,
}

impl Intensity {
    /// Parse an intensity column; `None` if it is not numeric
    pub fn parse(raw: &str) -> Option<Self> {
        let value = raw.trim().parse::<f64>().ok()?;
        Some(Self {
            raw: raw.to_string(),
            value,
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// One row of a probe intensity file
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeIntensity {
    pub probe_id: String,
    /// Array coordinates, kept as written in the source file
    pub x: String,
    pub y: String,
    pub probe_type: String,
    pub probeset_id: String,
    pub probeset_type: String,
    pub block: String,
    /// One value per sample column, in header order
    pub intensities: Vec<Intensity>,
}

impl ProbeIntensity {
    /// Number of sample columns
    pub fn sample_count(&self) -> usize {
        self.intensities.len()
    }

    /// Numeric intensity values in sample order
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.intensities.iter().map(Intensity::value)
    }

    /// View this row under another probe id and probeset id
    pub fn relabeled<'a>(&'a self, probe_id: &'a str, probeset_id: &'a str) -> RelabeledIntensity<'a> {
        RelabeledIntensity {
            record: self,
            probe_id,
            probeset_id,
        }
    }

    fn write_row(
        &self,
        f: &mut fmt::Formatter<'_>,
        probe_id: &str,
        probeset_id: &str,
    ) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            probe_id, self.x, self.y, self.probe_type, probeset_id, self.probeset_type, self.block
        )?;
        for intensity in &self.intensities {
            write!(f, "\t{}", intensity.as_str())?;
        }
        Ok(())
    }
}

/// Displays the row unmodified
impl fmt::Display for ProbeIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_row(f, &self.probe_id, &self.probeset_id)
    }
}

/// An intensity row displayed under borrowed identifiers
pub struct RelabeledIntensity<'a> {
    record: &'a ProbeIntensity,
    probe_id: &'a str,
    probeset_id: &'a str,
}

impl fmt::Display for RelabeledIntensity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.record.write_row(f, self.probe_id, self.probeset_id)
    }
}
