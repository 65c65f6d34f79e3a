//! Error types for ProbeCrossMap
//!
//! Defines all error types used throughout the library. Index misses are
//! not errors: lookups return `Option` and callers skip the unit of work.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ProbeCrossMap operations
#[derive(Debug, Error)]
pub enum ProbeMapError {
    /// An input table could not be read or parsed
    #[error("Failed to load {}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// Input parsing errors without a known file
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Sample selection errors
    #[error(transparent)]
    Sample(#[from] SampleError),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ProbeMapError {
    /// Attach the path of the table being loaded
    pub fn load(path: impl Into<PathBuf>, source: ParseError) -> Self {
        ProbeMapError::Load {
            path: path.into(),
            source,
        }
    }
}

/// Errors that can occur while reading a tab-separated input file
#[derive(Debug, Error)]
pub enum ParseError {
    /// Data row is shorter than its format requires
    #[error("Too few fields at line {line}: expected at least {expected}, found {found}")]
    TooFewFields {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Numeric column holds something that is not a number
    #[error("Invalid {field} value '{value}' at line {line}")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// Row is not valid UTF-8
    #[error("Invalid UTF-8 at line {line}")]
    InvalidUtf8 { line: usize },

    /// I/O error during parsing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// Create an invalid number error
    pub fn invalid_number(field: &'static str, value: &str, line: usize) -> Self {
        ParseError::InvalidNumber {
            line,
            field,
            value: value.chars().take(100).collect(),
        }
    }
}

/// Errors raised by the samples.txt producers
#[derive(Debug, Error)]
pub enum SampleError {
    /// More samples were requested than the input provides
    #[error("Invalid number of {kind} samples: requested {requested}, only {available} available")]
    TooManyRequested {
        kind: &'static str,
        requested: usize,
        available: usize,
    },

    /// A sample name could not be resolved through the name maps
    #[error("No {map} entry for sample '{name}'")]
    UnknownSample { map: &'static str, name: String },

    /// The expression file has no header row to take sample names from
    #[error("Expression file has no header row")]
    MissingHeader,

    /// A name map row without a second column
    #[error("Expected two tab-separated columns at line {line}")]
    MalformedRow { line: usize },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for ProbeCrossMap operations
pub type Result<T> = std::result::Result<T, ProbeMapError>;

/// Result type alias for parsing operations
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Result type alias for sample selection
pub type SampleResult<T> = std::result::Result<T, SampleError>;
