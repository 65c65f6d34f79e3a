//! Metaprobeset-to-probeset map adapter
//!
//! One index per platform: metaprobeset id (column 0) to the space-separated
//! probeset ids of column 2, in listed order.

use crate::core::error::ParseResult;
use crate::core::io::open_input;
use crate::core::record::{read_records, HeaderPolicy, LineMarkers, RecordIndex};
use std::io::BufRead;
use std::path::Path;

pub const METAPROBESET_COLUMN: usize = 0;
pub const PROBESET_LIST_COLUMN: usize = 2;

/// Metaprobeset -> member probesets
#[derive(Debug, Clone, Default)]
pub struct MembershipIndex {
    index: RecordIndex<Vec<String>>,
}

impl MembershipIndex {
    pub fn from_path<P: AsRef<Path>>(path: P, markers: &LineMarkers) -> ParseResult<Self> {
        log::info!("Reading metaprobeset map from {}", path.as_ref().display());
        let index = Self::from_reader(open_input(path)?, markers)?;
        log::info!("Loaded {} metaprobesets", index.len());
        Ok(index)
    }

    pub fn from_reader<R: BufRead>(reader: R, markers: &LineMarkers) -> ParseResult<Self> {
        let mut index = RecordIndex::new();
        read_records(reader, markers, HeaderPolicy::Skip, |view| {
            let mps = view.require(METAPROBESET_COLUMN)?;
            let members = view.require(PROBESET_LIST_COLUMN)?;
            index.insert(mps, split_members(members));
            Ok(())
        })?;
        Ok(Self { index })
    }

    /// Probesets of a metaprobeset
    pub fn probesets(&self, mps: &str) -> Option<&[String]> {
        self.index.get(mps).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl FromIterator<(String, Vec<String>)> for MembershipIndex {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut index = RecordIndex::new();
        for (mps, members) in iter {
            index.insert(mps, members);
        }
        Self { index }
    }
}

fn split_members(field: &str) -> Vec<String> {
    field
        .split(' ')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
