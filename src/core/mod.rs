//! Core probe reconciliation functionality
//!
//! This module contains the record index, the probe data model, the
//! probeset resolver, the probe matcher and the pipeline driver.

pub mod choice;
pub mod error;
pub mod io;
pub mod matcher;
pub mod pipeline;
pub mod probe;
pub mod record;
pub mod resolver;

pub use choice::{CandidateChooser, FixedChooser, RandomChooser};
pub use error::{
    ParseError, ParseResult, ProbeMapError, Result, SampleError, SampleResult,
};
pub use io::{
    create_writer, detect_compression, open_input, ByteLineIterator, CompressionFormat,
    IoStrategy, LineIterator, SmartReader, DEFAULT_BUFFER_SIZE, LARGE_BUFFER_SIZE,
    MMAP_THRESHOLD,
};
pub use matcher::{
    matching_pairs, MatchEmitter, MatchStats, PlatformIndices, ProbeMatcher, ProbePair,
    MANIFEST_HEADER,
};
pub use pipeline::{run_transform, run_transform_with, TransformConfig, TransformStats, DEFAULT_MANIFEST};
pub use probe::{Intensity, Probe, ProbeIntensity, Probeset};
pub use record::{read_records, HeaderPolicy, LineKind, LineMarkers, RecordIndex, RecordView};
pub use resolver::{MergePolicy, ProbesetResolver, ResolveStats, ResolvedProbesets};
