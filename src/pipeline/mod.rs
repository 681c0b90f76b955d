//! The import pipeline: header validation, row loop, sink handoff.
//!
//! Rows are read, materialized, converted and inserted in strict
//! sequential order. A pipeline instance is single-use: [`ImportPipeline::run`]
//! consumes it, so one instance drives exactly one import.

use std::io::Read;

use tracing::{debug, info, warn};

use crate::actions::ActionTable;
use crate::convert::{convert, FieldValue};
use crate::error::{ImportError, ImportResult};
use crate::record::RecordBuilder;
use crate::sink::Sink;

// =============================================================================
// Diagnostics
// =============================================================================

/// A recorded, non-fatal conversion failure (lenient mode).
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// 1-based input line number of the offending row.
    pub row: u64,
    /// Column the failed action was attached to.
    pub field: String,
    /// Human-readable failure description, including the raw value.
    pub message: String,
}

/// Summary of a completed (non-aborted) run.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Data rows read from the input.
    pub rows: usize,
    /// Records handed to the sink.
    pub inserted: usize,
    /// Fields left unconverted, in row order.
    pub diagnostics: Vec<Diagnostic>,
}

// =============================================================================
// ImportPipeline
// =============================================================================

/// Drives one import: reads the header row, checks strict-mode coverage,
/// then converts and inserts every data row.
pub struct ImportPipeline {
    table: ActionTable,
    strict: bool,
}

impl ImportPipeline {
    pub fn new(table: ActionTable, strict: bool) -> Self {
        Self { table, strict }
    }

    /// Run the import to completion.
    ///
    /// In strict mode the first missing action column or failed
    /// conversion aborts the run; rows inserted before the abort stay in
    /// the sink (no rollback is attempted). In lenient mode a failed
    /// conversion leaves the field as its raw string, records a
    /// [`Diagnostic`], and processing continues.
    pub async fn run<R: Read>(
        self,
        mut reader: csv::Reader<R>,
        sink: &mut dyn Sink,
    ) -> ImportResult<ImportReport> {
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            return Err(ImportError::EmptyInput);
        }
        info!(columns = headers.len(), "header row read");

        if self.strict {
            let mut missing = Vec::new();
            for field in self.table.fields() {
                if !headers.iter().any(|h| h.as_str() == field) {
                    missing.push(field.to_string());
                }
            }
            if !missing.is_empty() {
                return Err(ImportError::MissingColumns(missing));
            }
        }

        let builder = RecordBuilder::new(headers);
        let mut report = ImportReport::default();

        for (idx, row) in reader.records().enumerate() {
            let row = row?;
            let line = row.position().map_or((idx + 2) as u64, |p| p.line());
            report.rows += 1;

            let mut record = builder.build(row.iter());

            for (field, value) in record.iter_mut() {
                let Some(action) = self.table.get(field) else {
                    continue;
                };
                // Null padding from a short row is never converted.
                let raw = match value {
                    FieldValue::Text(s) => s.clone(),
                    _ => continue,
                };

                match convert(&raw, action) {
                    Ok(converted) => *value = converted,
                    Err(err) => {
                        warn!(line, field = %field, "{err}");
                        report.diagnostics.push(Diagnostic {
                            row: line,
                            field: field.clone(),
                            message: err.to_string(),
                        });
                        if self.strict {
                            return Err(ImportError::Conversion {
                                row: line,
                                field: field.clone(),
                                source: err,
                            });
                        }
                    }
                }
            }

            debug!(line, record = ?record, "record ready");
            sink.insert(record).await?;
            report.inserted += 1;
        }

        info!(
            rows = report.rows,
            inserted = report.inserted,
            unconverted = report.diagnostics.len(),
            "input exhausted"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SinkError, SinkResult};
    use crate::input::csv_reader;
    use crate::record::Record;
    use crate::sink::MemorySink;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    fn pipeline(actions: &[(&str, &str)], formats: &[&str], strict: bool) -> ImportPipeline {
        let pairs: Vec<(String, String)> = actions
            .iter()
            .map(|(f, a)| (f.to_string(), a.to_string()))
            .collect();
        let formats: Vec<String> = formats.iter().map(|f| f.to_string()).collect();
        ImportPipeline::new(ActionTable::build(&pairs, &formats).unwrap(), strict)
    }

    #[tokio::test]
    async fn test_basic_import() {
        let mut sink = MemorySink::default();
        let report = pipeline(&[("age", "int")], &[], false)
            .run(csv_reader("name,age\nAlice,30\nBob,25\n", ','), &mut sink)
            .await
            .unwrap();

        assert_eq!(report.rows, 2);
        assert_eq!(report.inserted, 2);
        assert!(report.diagnostics.is_empty());
        assert_eq!(
            sink.records[0].get("name"),
            Some(&FieldValue::Text("Alice".into()))
        );
        assert_eq!(sink.records[0].get("age"), Some(&FieldValue::Int(30)));
    }

    #[tokio::test]
    async fn test_short_row_padded_and_not_converted() {
        let mut sink = MemorySink::default();
        let report = pipeline(&[("age", "int")], &[], false)
            .run(csv_reader("name,age\nAlice,30\nBob\n", ','), &mut sink)
            .await
            .unwrap();

        // The padded null never reaches the converter, so no diagnostic.
        assert!(report.diagnostics.is_empty());
        assert_eq!(sink.records[1].get("age"), Some(&FieldValue::Null));
        assert_eq!(
            sink.records[1].get("name"),
            Some(&FieldValue::Text("Bob".into()))
        );
    }

    #[tokio::test]
    async fn test_lenient_conversion_failure_keeps_raw_value() {
        let mut sink = MemorySink::default();
        let report = pipeline(&[("x", "int")], &[], false)
            .run(csv_reader("x\nnotanumber\n7\n", ','), &mut sink)
            .await
            .unwrap();

        assert_eq!(report.inserted, 2);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].field, "x");
        assert_eq!(report.diagnostics[0].row, 2);
        assert_eq!(
            sink.records[0].get("x"),
            Some(&FieldValue::Text("notanumber".into()))
        );
        assert_eq!(sink.records[1].get("x"), Some(&FieldValue::Int(7)));
    }

    #[tokio::test]
    async fn test_strict_conversion_failure_aborts() {
        let mut sink = MemorySink::default();
        let err = pipeline(&[("x", "int")], &[], true)
            .run(csv_reader("x\n1\nbad\n3\n", ','), &mut sink)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ImportError::Conversion { row: 3, ref field, .. } if field == "x"
        ));
        // The row before the failure is already in the sink; the
        // offending row and everything after it never arrive.
        assert_eq!(sink.records.len(), 1);
        assert_eq!(sink.records[0].get("x"), Some(&FieldValue::Int(1)));
    }

    #[tokio::test]
    async fn test_strict_missing_columns_aborts_before_rows() {
        let mut sink = MemorySink::default();
        let err = pipeline(&[("c", "float")], &[], true)
            .run(csv_reader("a,b\n1,2\n", ','), &mut sink)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ImportError::MissingColumns(ref names) if names == &vec!["c".to_string()]
        ));
        assert!(sink.records.is_empty());
    }

    #[tokio::test]
    async fn test_missing_columns_reported_sorted() {
        let mut sink = MemorySink::default();
        let err = pipeline(&[("zeta", "int"), ("alpha", "int")], &[], true)
            .run(csv_reader("a,b\n1,2\n", ','), &mut sink)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ImportError::MissingColumns(ref names)
                if names == &vec!["alpha".to_string(), "zeta".to_string()]
        ));
    }

    #[tokio::test]
    async fn test_lenient_missing_columns_ignored() {
        let mut sink = MemorySink::default();
        let report = pipeline(&[("c", "float")], &[], false)
            .run(csv_reader("a,b\n1,2\n", ','), &mut sink)
            .await
            .unwrap();

        // The action field never triggers; the row loads untouched.
        assert_eq!(report.inserted, 1);
        assert!(report.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_empty_input() {
        let mut sink = MemorySink::default();
        let err = pipeline(&[], &[], false)
            .run(csv_reader("", ','), &mut sink)
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::EmptyInput));
    }

    #[tokio::test]
    async fn test_header_only_input_is_a_valid_empty_run() {
        let mut sink = MemorySink::default();
        let report = pipeline(&[("age", "int")], &[], true)
            .run(csv_reader("name,age\n", ','), &mut sink)
            .await
            .unwrap();
        assert_eq!(report.rows, 0);
        assert!(sink.records.is_empty());
    }

    #[tokio::test]
    async fn test_date_conversion_through_pipeline() {
        let mut sink = MemorySink::default();
        pipeline(&[("born", "date")], &["%Y-%m-%d"], true)
            .run(csv_reader("name,born\nAlice,1990-02-01\n", ','), &mut sink)
            .await
            .unwrap();

        let expected = NaiveDate::from_ymd_opt(1990, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(
            sink.records[0].get("born"),
            Some(&FieldValue::Date(expected))
        );
    }

    struct FailingSink;

    #[async_trait]
    impl Sink for FailingSink {
        async fn insert(&mut self, _record: Record) -> SinkResult<()> {
            Err(SinkError::Insert("collection is read-only".into()))
        }
    }

    #[tokio::test]
    async fn test_sink_failure_is_fatal() {
        let mut sink = FailingSink;
        let err = pipeline(&[], &[], false)
            .run(csv_reader("a\n1\n2\n", ','), &mut sink)
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Sink(_)));
    }
}
