//! Record sinks: where finished records end up.
//!
//! The pipeline only knows the [`Sink`] trait; the MongoDB collection
//! behind `--host`/`--database`/`--collection` lives in [`mongo`], while
//! [`JsonSink`] backs `--dry-run` and [`MemorySink`] backs tests.

use std::io::Write;

use async_trait::async_trait;

use crate::error::{SinkError, SinkResult};
use crate::record::Record;

pub mod mongo;

pub use mongo::MongoSink;

// =============================================================================
// Sink trait
// =============================================================================

/// A destination accepting finished records, one at a time.
///
/// Insertion failures are fatal to the run; no retry policy is defined.
#[async_trait]
pub trait Sink {
    async fn insert(&mut self, record: Record) -> SinkResult<()>;
}

// =============================================================================
// MemorySink
// =============================================================================

/// Buffers records in memory, in insertion order.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<Record>,
}

#[async_trait]
impl Sink for MemorySink {
    async fn insert(&mut self, record: Record) -> SinkResult<()> {
        self.records.push(record);
        Ok(())
    }
}

// =============================================================================
// JsonSink
// =============================================================================

/// Writes each record as one JSON object per line.
pub struct JsonSink<W> {
    out: W,
}

impl<W: Write + Send> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[async_trait]
impl<W: Write + Send> Sink for JsonSink<W> {
    async fn insert(&mut self, record: Record) -> SinkResult<()> {
        let line = serde_json::to_string(&record)
            .map_err(|e| SinkError::Insert(e.to_string()))?;
        writeln!(self.out, "{line}").map_err(|e| SinkError::Insert(e.to_string()))
    }
}
