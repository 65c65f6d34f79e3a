//! Comparison map adapter
//!
//! Builds the metaprobeset cross-map: gene-array metaprobeset id (column 5)
//! to the exon-array metaprobeset ids (column 2) it was compared with.
//! Candidates keep file order and duplicates are not collapsed.

use crate::core::error::ParseResult;
use crate::core::io::open_input;
use crate::core::record::{read_records, HeaderPolicy, LineMarkers, RecordIndex};
use std::io::BufRead;
use std::path::Path;

/// Column holding the exon-array metaprobeset id
pub const EXON_MPS_COLUMN: usize = 2;

/// Column holding the gene-array metaprobeset id
pub const GENE_MPS_COLUMN: usize = 5;

/// Gene metaprobeset -> exon metaprobeset candidates
#[derive(Debug, Clone, Default)]
pub struct MetaprobesetCrossMap {
    index: RecordIndex<Vec<String>>,
}

impl MetaprobesetCrossMap {
    pub fn from_path<P: AsRef<Path>>(path: P, markers: &LineMarkers) -> ParseResult<Self> {
        log::info!("Reading comparison map from {}", path.as_ref().display());
        let map = Self::from_reader(open_input(path)?, markers)?;
        log::info!("Mapped {} gene metaprobesets", map.len());
        Ok(map)
    }

    pub fn from_reader<R: BufRead>(reader: R, markers: &LineMarkers) -> ParseResult<Self> {
        let mut index = RecordIndex::new();
        read_records(reader, markers, HeaderPolicy::Skip, |view| {
            view.expect_fields(GENE_MPS_COLUMN + 1)?;
            let gene_mps = view.require(GENE_MPS_COLUMN)?;
            let exon_mps = view.require(EXON_MPS_COLUMN)?;
            index.push(gene_mps, exon_mps.to_string());
            Ok(())
        })?;
        Ok(Self { index })
    }

    /// Exon candidates for a gene metaprobeset
    pub fn candidates(&self, gene_mps: &str) -> Option<&[String]> {
        self.index.get(gene_mps).map(Vec::as_slice)
    }

    /// Entries in file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.index.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl FromIterator<(String, String)> for MetaprobesetCrossMap {
    /// Build from `(gene_mps, exon_mps)` pairs
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut index = RecordIndex::new();
        for (gene_mps, exon_mps) in iter {
            index.push(&gene_mps, exon_mps);
        }
        Self { index }
    }
}
