//! samples.txt template from training/test pair lists
//!
//! Training pairs are copied verbatim; test pairs (whose hts column may be
//! blank) get the test sentinel. Counts are validated before the output
//! file is created.

use crate::core::error::{SampleError, SampleResult};
use crate::core::io::{create_writer, open_input, LineIterator};
use crate::samples::{format_row, write_samples, SampleRole};
use rand::seq::SliceRandom;
use rand::Rng;
use std::io::BufRead;
use std::path::PathBuf;

pub const DEFAULT_TRAIN_FILE: &str = "training_samples.txt";
pub const DEFAULT_OUTFILE: &str = "samples.txt";
pub const DEFAULT_NO_TRAIN: usize = 150;

/// Options of the template producer
#[derive(Debug, Clone)]
pub struct TemplateConfig {
    pub train: PathBuf,
    pub test: Option<PathBuf>,
    pub no_train: usize,
    pub no_test: usize,
    pub outfile: PathBuf,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            train: PathBuf::from(DEFAULT_TRAIN_FILE),
            test: None,
            no_train: DEFAULT_NO_TRAIN,
            no_test: 0,
            outfile: PathBuf::from(DEFAULT_OUTFILE),
        }
    }
}

/// Non-blank lines of a pair list, without line terminators
pub fn read_pairs<R: BufRead>(reader: R) -> SampleResult<Vec<String>> {
    let mut lines = LineIterator::new(reader);
    let mut pairs = Vec::new();
    while let Some(line) = lines.next_line() {
        let line = line?;
        if !line.trim().is_empty() {
            pairs.push(line.to_string());
        }
    }
    Ok(pairs)
}

/// Pick `count` distinct entries at random
pub fn pick_random<'a, T, R: Rng + ?Sized>(
    pool: &'a [T],
    count: usize,
    kind: &'static str,
    rng: &mut R,
) -> SampleResult<Vec<&'a T>> {
    if count > pool.len() {
        return Err(SampleError::TooManyRequested {
            kind,
            requested: count,
            available: pool.len(),
        });
    }
    Ok(pool.choose_multiple(rng, count).collect())
}

/// Turn a test pair line into a sentinel row
pub fn test_row(pair: &str) -> String {
    match pair.split_once('\t') {
        Some((hts, ma)) => format_row(SampleRole::Test, Some(hts.trim()), ma),
        None => format_row(SampleRole::Test, None, pair.trim()),
    }
}

/// Rows of the template: chosen training pairs, then chosen test rows
pub fn build_template<R: Rng + ?Sized>(
    train_pairs: &[String],
    test_pairs: Option<&[String]>,
    no_train: usize,
    no_test: usize,
    rng: &mut R,
) -> SampleResult<Vec<String>> {
    if no_train > train_pairs.len() {
        return Err(SampleError::TooManyRequested {
            kind: "training",
            requested: no_train,
            available: train_pairs.len(),
        });
    }
    if let Some(test_pairs) = test_pairs {
        if no_test > test_pairs.len() {
            return Err(SampleError::TooManyRequested {
                kind: "test",
                requested: no_test,
                available: test_pairs.len(),
            });
        }
    }

    let mut rows: Vec<String> = pick_random(train_pairs, no_train, "training", rng)?
        .into_iter()
        .cloned()
        .collect();

    if let Some(test_pairs) = test_pairs {
        rows.extend(
            pick_random(test_pairs, no_test, "test", rng)?
                .into_iter()
                .map(|pair| test_row(pair)),
        );
    }
    Ok(rows)
}

/// Read the pair lists and write the template file
///
/// Returns the number of rows written below the header.
pub fn create_template<R: Rng + ?Sized>(config: &TemplateConfig, rng: &mut R) -> SampleResult<usize> {
    let train_pairs = read_pairs(open_input(&config.train)?)?;
    let test_pairs = match &config.test {
        Some(path) => Some(read_pairs(open_input(path)?)?),
        None => None,
    };
    log::info!(
        "Read {} training pairs{}",
        train_pairs.len(),
        test_pairs
            .as_ref()
            .map(|t| format!(" and {} test pairs", t.len()))
            .unwrap_or_default()
    );

    let rows = build_template(
        &train_pairs,
        test_pairs.as_deref(),
        config.no_train,
        config.no_test,
        rng,
    )?;

    write_samples(create_writer(&config.outfile)?, &rows)?;
    Ok(rows.len())
}
