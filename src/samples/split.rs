//! Tissue-specific samples.txt from a random training/test split
//!
//! Sample names come from the header of the tissue's RNA-seq expression
//! table. Each name is translated to its microarray sample through two
//! maps: tissue map (RNA-seq name -> intermediate id) and Affymetrix map
//! (intermediate id -> microarray sample name).

use crate::core::error::{SampleError, SampleResult};
use crate::core::io::{open_input, LineIterator};
use crate::samples::{format_row, SampleRole};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::io::BufRead;
use std::path::PathBuf;

/// Options of the split producer
#[derive(Debug, Clone)]
pub struct SplitConfig {
    pub tissue_map: PathBuf,
    pub affy_ids: PathBuf,
    pub rnaseq_genes: PathBuf,
    pub no_train: usize,
    pub no_test: usize,
    /// Write test rows as `*NA` instead of `*<name>`
    pub blind_test: bool,
}

/// Two-column name map (column 0 -> column 1)
pub fn read_name_map<R: BufRead>(reader: R) -> SampleResult<HashMap<String, String>> {
    let mut lines = LineIterator::new(reader);
    let mut map = HashMap::new();
    let mut line_number = 0usize;
    while let Some(line) = lines.next_line() {
        let line = line?;
        line_number += 1;
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split('\t');
        match (fields.next(), fields.next()) {
            (Some(key), Some(value)) => {
                map.insert(key.trim().to_string(), value.trim().to_string());
            }
            _ => return Err(SampleError::MalformedRow { line: line_number }),
        }
    }
    Ok(map)
}

/// Sample names from the header of an expression table (columns 1..)
pub fn read_header_names<R: BufRead>(reader: R) -> SampleResult<Vec<String>> {
    let mut lines = LineIterator::new(reader);
    let header = match lines.next_line() {
        Some(line) => line?.to_string(),
        None => return Err(SampleError::MissingHeader),
    };
    Ok(header
        .trim()
        .split('\t')
        .skip(1)
        .map(str::to_string)
        .collect())
}

/// Randomly partition `names` into disjoint training and test sets
///
/// Assignment order is random; names beyond `no_train + no_test` are left out.
pub fn split_samples<R: Rng + ?Sized>(
    names: &[String],
    no_train: usize,
    no_test: usize,
    rng: &mut R,
) -> SampleResult<(Vec<String>, Vec<String>)> {
    let requested = match no_train.checked_add(no_test) {
        Some(requested) if requested <= names.len() => requested,
        requested => {
            return Err(SampleError::TooManyRequested {
                kind: "training and test",
                requested: requested.unwrap_or(usize::MAX),
                available: names.len(),
            })
        }
    };

    let mut pool: Vec<&String> = names.iter().collect();
    pool.shuffle(rng);

    let train = pool[..no_train].iter().map(|s| s.to_string()).collect();
    let test = pool[no_train..requested].iter().map(|s| s.to_string()).collect();
    Ok((train, test))
}

/// Names present in both sets
pub fn shared_samples<'a>(train: &'a [String], test: &'a [String]) -> Vec<&'a str> {
    let train: HashSet<&str> = train.iter().map(String::as_str).collect();
    test.iter()
        .map(String::as_str)
        .filter(|name| train.contains(name))
        .collect()
}

/// Resolves RNA-seq sample names to microarray sample names
pub struct SampleNameResolver {
    names: HashMap<String, String>,
    affy_ids: HashMap<String, String>,
}

impl SampleNameResolver {
    pub fn new(names: HashMap<String, String>, affy_ids: HashMap<String, String>) -> Self {
        Self { names, affy_ids }
    }

    /// Microarray sample of an RNA-seq sample
    pub fn microarray_name(&self, name: &str) -> SampleResult<&str> {
        let intermediate = self
            .names
            .get(name)
            .ok_or_else(|| SampleError::UnknownSample {
                map: "tissue",
                name: name.to_string(),
            })?;
        self.affy_ids
            .get(intermediate)
            .map(String::as_str)
            .ok_or_else(|| SampleError::UnknownSample {
                map: "Affymetrix",
                name: intermediate.clone(),
            })
    }

    /// Format one samples.txt row for `name`
    pub fn row(&self, name: &str, role: SampleRole, blind: bool) -> SampleResult<String> {
        let ma = self.microarray_name(name)?;
        let hts = if blind && role == SampleRole::Test {
            None
        } else {
            Some(name)
        };
        Ok(format_row(role, hts, ma))
    }
}

/// Read the inputs, split, and return the samples.txt rows
pub fn build_split<R: Rng + ?Sized>(config: &SplitConfig, rng: &mut R) -> SampleResult<Vec<String>> {
    let names = read_name_map(open_input(&config.tissue_map)?)?;
    let affy_ids = read_name_map(open_input(&config.affy_ids)?)?;
    let rnaseq_names = read_header_names(open_input(&config.rnaseq_genes)?)?;
    log::info!("Found {} RNA-seq samples", rnaseq_names.len());

    let (train, test) = split_samples(&rnaseq_names, config.no_train, config.no_test, rng)?;

    let shared = shared_samples(&train, &test);
    if shared.is_empty() {
        log::info!("Correctly formed samples file; no duplicates found");
    } else {
        log::warn!(
            "Corrupt samples file; {} samples in both training and test sets",
            shared.len()
        );
    }

    let resolver = SampleNameResolver::new(names, affy_ids);
    let mut rows = Vec::with_capacity(train.len() + test.len());
    for name in &train {
        rows.push(resolver.row(name, SampleRole::Training, config.blind_test)?);
    }
    for name in &test {
        rows.push(resolver.row(name, SampleRole::Test, config.blind_test)?);
    }
    Ok(rows)
}
