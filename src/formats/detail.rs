//! Probeset detail adapter
//!
//! Reads `apt-dump-pgf` style probeset details:
//!
//! ```text
//! probeset_id  probe_id  type  gc_count  probe_length  interrogation_position  probe_sequence
//! ```
//!
//! Probes are grouped under their owning probeset in file order.

use crate::core::error::ParseResult;
use crate::core::io::open_input;
use crate::core::probe::{Probe, Probeset};
use crate::core::record::{read_records, HeaderPolicy, LineMarkers, RecordIndex, RecordView};
use std::io::BufRead;
use std::path::Path;

/// Number of columns a detail row must have
pub const DETAIL_COLUMNS: usize = 7;

/// Probeset id -> probeset with its probes
#[derive(Debug, Clone, Default)]
pub struct ProbeDetailIndex {
    index: RecordIndex<Probeset>,
    probe_count: usize,
}

impl ProbeDetailIndex {
    pub fn from_path<P: AsRef<Path>>(path: P, markers: &LineMarkers) -> ParseResult<Self> {
        log::info!("Reading probe details from {}", path.as_ref().display());
        let index = Self::from_reader(open_input(path)?, markers)?;
        log::info!(
            "Loaded {} probes in {} probesets",
            index.probe_count(),
            index.len()
        );
        Ok(index)
    }

    pub fn from_reader<R: BufRead>(reader: R, markers: &LineMarkers) -> ParseResult<Self> {
        let mut details = Self::default();
        read_records(reader, markers, HeaderPolicy::Skip, |view| {
            let probe = parse_probe(view)?;
            details.add(view.require(0)?, probe);
            Ok(())
        })?;
        Ok(details)
    }

    /// Append a probe, creating its probeset on first sight
    pub fn add(&mut self, probeset_id: &str, probe: Probe) {
        match self.index.get_mut(probeset_id) {
            Some(probeset) => probeset.add_probe(probe),
            None => {
                let mut probeset = Probeset::new(probeset_id);
                probeset.add_probe(probe);
                self.index.insert(probeset_id, probeset);
            }
        }
        self.probe_count += 1;
    }

    /// Probes of a probeset
    pub fn probes(&self, probeset_id: &str) -> Option<&[Probe]> {
        self.index.get(probeset_id).map(|ps| ps.probes.as_slice())
    }

    pub fn probeset(&self, probeset_id: &str) -> Option<&Probeset> {
        self.index.get(probeset_id)
    }

    /// Number of probesets
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn probe_count(&self) -> usize {
        self.probe_count
    }
}

fn parse_probe(view: &RecordView<'_>) -> ParseResult<Probe> {
    view.expect_fields(DETAIL_COLUMNS)?;
    Ok(Probe {
        probe_id: view.require(1)?.to_string(),
        probe_type: view.require(2)?.to_string(),
        gc_count: view.parse_field(3, "gc_count")?,
        probe_length: view.parse_field(4, "probe_length")?,
        interrogation_position: view.parse_field(5, "interrogation_position")?,
        sequence: view.require(6)?.to_string(),
    })
}
