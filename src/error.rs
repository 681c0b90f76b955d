//! Error types for the csv2mongo import pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`ConfigError`] - Action table construction errors
//! - [`ConvertError`] - Per-field type conversion errors
//! - [`SinkError`] - Document store errors
//! - [`ImportError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while building the action table from command-line input.
///
/// These are always fatal and are detected before any input row is read.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The requested action name is not one of `float`, `int`, `date`.
    #[error("invalid action '{0}' (expected 'float', 'int' or 'date')")]
    InvalidAction(String),

    /// A `date` action was declared but no format string was left for it.
    #[error("not enough date format strings (field '{field}' has no format)")]
    MissingDateFormat { field: String },
}

// =============================================================================
// Conversion Errors
// =============================================================================

/// Errors while converting one field value to its target type.
///
/// Fatal only in strict mode; in lenient mode the field keeps its raw
/// string value and the failure is recorded as a diagnostic.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Value could not be parsed as a floating point number.
    #[error("could not convert '{value}' to a floating point value")]
    Float {
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// Value could not be parsed as a base-10 integer.
    #[error("could not convert '{value}' to an integer value")]
    Int {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Value could not be parsed with the configured date format.
    #[error("could not convert '{value}' to a datetime object with format '{format}'")]
    Date {
        value: String,
        format: String,
        #[source]
        source: chrono::format::ParseError,
    },
}

impl ConvertError {
    /// The original, unconverted field value.
    pub fn value(&self) -> &str {
        match self {
            Self::Float { value, .. } | Self::Int { value, .. } | Self::Date { value, .. } => value,
        }
    }
}

// =============================================================================
// Sink Errors
// =============================================================================

/// Errors from the document store collaborator.
///
/// No retry policy is defined, so all sink errors are fatal.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Could not reach the server.
    #[error("cannot connect to '{uri}': {message}")]
    Connect { uri: String, message: String },

    /// Could not drop the target collection.
    #[error("cannot drop collection: {0}")]
    Drop(String),

    /// A record insert failed.
    #[error("insert failed: {0}")]
    Insert(String),
}

// =============================================================================
// Import Errors (top-level)
// =============================================================================

/// Top-level errors returned by [`crate::pipeline::ImportPipeline::run`].
///
/// Wraps all lower-level errors and adds pipeline-specific variants.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Action table construction error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The input contained no header row.
    #[error("input is empty")]
    EmptyInput,

    /// The underlying CSV reader failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Strict mode: action fields missing from the header row.
    #[error("the following action fields were missing from the data file: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Strict mode: a field conversion failed.
    #[error("line {row}, field '{field}': {source}")]
    Conversion {
        row: u64,
        field: String,
        #[source]
        source: ConvertError,
    },

    /// The document store failed.
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    /// IO error while reading the input.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for action table construction.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for field conversion.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Result type for sink operations.
pub type SinkResult<T> = Result<T, SinkError>;

/// Result type for pipeline operations.
pub type ImportResult<T> = Result<T, ImportError>;
