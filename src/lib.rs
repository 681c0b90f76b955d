//! # csv2mongo - CSV cleaning and upload to MongoDB
//!
//! csv2mongo reads CSV data, applies per-column type coercion rules
//! (`float`, `int`, `date`), and inserts the resulting records into a
//! MongoDB collection.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV input  │────▶│   Builder   │────▶│  Converter  │────▶│    Sink     │
//! │ (file/stdin)│     │ (pad/trunc) │     │ (rule table)│     │  (MongoDB)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use csv2mongo::{csv_reader, ActionTable, ImportPipeline, MemorySink};
//!
//! #[tokio::main]
//! async fn main() {
//!     let pairs = vec![("age".to_string(), "int".to_string())];
//!     let table = ActionTable::build(&pairs, &[]).unwrap();
//!
//!     let mut sink = MemorySink::default();
//!     let reader = csv_reader("name,age\nAlice,30\n", ',');
//!     let report = ImportPipeline::new(table, false)
//!         .run(reader, &mut sink)
//!         .await
//!         .unwrap();
//!     println!("inserted {} records", report.inserted);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`actions`] - The per-column rule table
//! - [`record`] - Row materialization (padding, truncation)
//! - [`convert`] - Typed field conversion
//! - [`input`] - Encoding/delimiter detection and CSV reading
//! - [`pipeline`] - The import orchestrator
//! - [`sink`] - MongoDB, JSON-lines and in-memory sinks

// Core modules
pub mod actions;
pub mod error;

// Materialization and conversion
pub mod convert;
pub mod record;

// Input handling
pub mod input;

// Orchestration
pub mod pipeline;

// Sinks
pub mod sink;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError, ConfigResult, ConvertError, ConvertResult, ImportError, ImportResult, SinkError,
    SinkResult,
};

// =============================================================================
// Re-exports - Actions
// =============================================================================

pub use actions::{Action, ActionTable};

// =============================================================================
// Re-exports - Records and conversion
// =============================================================================

pub use convert::{convert, FieldValue};
pub use record::{Record, RecordBuilder};

// =============================================================================
// Re-exports - Input
// =============================================================================

pub use input::{csv_reader, decode, detect_delimiter, read_bytes};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{Diagnostic, ImportPipeline, ImportReport};

// =============================================================================
// Re-exports - Sinks
// =============================================================================

pub use sink::{JsonSink, MemorySink, MongoSink, Sink};
