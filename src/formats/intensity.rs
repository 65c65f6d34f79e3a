//! Probe intensity adapter
//!
//! Reads a per-platform probe intensity table:
//!
//! ```text
//! probe_id  x  y  probe_type  probeset_id  probeset_type  block  <sample 1> ... <sample n>
//! ```
//!
//! The header row is kept verbatim so output files can repeat it.

use crate::core::error::{ParseError, ParseResult};
use crate::core::io::open_input;
use crate::core::probe::{Intensity, ProbeIntensity};
use crate::core::record::{read_records, HeaderPolicy, LineMarkers, RecordIndex, RecordView};
use std::io::BufRead;
use std::path::Path;

/// Columns before the first sample column
pub const FIXED_COLUMNS: usize = 7;

/// Probe id -> intensity row
#[derive(Debug, Clone, Default)]
pub struct ProbeIntensityIndex {
    index: RecordIndex<ProbeIntensity>,
}

impl ProbeIntensityIndex {
    pub fn from_path<P: AsRef<Path>>(path: P, markers: &LineMarkers) -> ParseResult<Self> {
        let path = path.as_ref();
        log::info!("Reading intensities from {}", path.display());
        let index = Self::from_reader(open_input(path)?, markers)?;
        log::info!("Loaded intensities for {} probes", index.len());
        if index.header().is_none() {
            log::warn!("No header row found in {}", path.display());
        }
        Ok(index)
    }

    pub fn from_reader<R: BufRead>(reader: R, markers: &LineMarkers) -> ParseResult<Self> {
        let mut index = RecordIndex::new();
        let header = read_records(reader, markers, HeaderPolicy::Capture, |view| {
            let record = parse_intensity(view)?;
            index.insert(record.probe_id.clone(), record);
            Ok(())
        })?;
        index.set_header(header);
        Ok(Self { index })
    }

    /// Intensity row of a probe
    pub fn get(&self, probe_id: &str) -> Option<&ProbeIntensity> {
        self.index.get(probe_id)
    }

    /// Header row as it appeared in the source file
    pub fn header(&self) -> Option<&str> {
        self.index.header()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl FromIterator<ProbeIntensity> for ProbeIntensityIndex {
    fn from_iter<I: IntoIterator<Item = ProbeIntensity>>(iter: I) -> Self {
        let mut index = RecordIndex::new();
        for record in iter {
            index.insert(record.probe_id.clone(), record);
        }
        Self { index }
    }
}

fn parse_intensity(view: &RecordView<'_>) -> ParseResult<ProbeIntensity> {
    view.expect_fields(FIXED_COLUMNS)?;

    let intensities = view
        .fields_from(FIXED_COLUMNS)
        .map(|raw| {
            Intensity::parse(raw)
                .ok_or_else(|| ParseError::invalid_number("intensity", raw, view.line_number()))
        })
        .collect::<ParseResult<Vec<_>>>()?;

    Ok(ProbeIntensity {
        probe_id: view.require(0)?.to_string(),
        x: view.require(1)?.to_string(),
        y: view.require(2)?.to_string(),
        probe_type: view.require(3)?.to_string(),
        probeset_id: view.require(4)?.to_string(),
        probeset_type: view.require(5)?.to_string(),
        block: view.require(6)?.to_string(),
        intensities,
    })
}
