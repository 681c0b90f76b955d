//! MongoDB sink: the collection receiving imported records.

use async_trait::async_trait;
use mongodb::bson::{doc, Bson, Document};
use mongodb::{Client, Collection};

use crate::convert::FieldValue;
use crate::error::{SinkError, SinkResult};
use crate::record::Record;
use crate::sink::Sink;

// =============================================================================
// BSON conversion
// =============================================================================

impl From<FieldValue> for Bson {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Null => Bson::Null,
            FieldValue::Text(s) => Bson::String(s),
            FieldValue::Float(f) => Bson::Double(f),
            FieldValue::Int(i) => Bson::Int64(i),
            FieldValue::Date(dt) => {
                Bson::DateTime(mongodb::bson::DateTime::from_millis(
                    dt.and_utc().timestamp_millis(),
                ))
            }
        }
    }
}

impl From<Record> for Document {
    fn from(record: Record) -> Self {
        record
            .into_iter()
            .map(|(field, value)| (field, Bson::from(value)))
            .collect()
    }
}

// =============================================================================
// MongoSink
// =============================================================================

/// A handle to the target MongoDB collection.
pub struct MongoSink {
    collection: Collection<Document>,
}

impl MongoSink {
    /// Connect to the server and resolve the target collection.
    ///
    /// `host` may be a bare hostname or a full `mongodb://` URI. The
    /// driver connects lazily, so a `ping` is issued here to surface an
    /// unreachable server before any row is read.
    pub async fn connect(host: &str, database: &str, collection: &str) -> SinkResult<Self> {
        let uri = if host.contains("://") {
            host.to_string()
        } else {
            format!("mongodb://{host}")
        };

        let client = Client::with_uri_str(&uri)
            .await
            .map_err(|e| SinkError::Connect {
                uri: uri.clone(),
                message: e.to_string(),
            })?;

        let db = client.database(database);
        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| SinkError::Connect {
                uri,
                message: e.to_string(),
            })?;

        Ok(Self {
            collection: db.collection(collection),
        })
    }

    /// Drop the target collection (the `--drop` flag).
    pub async fn drop_collection(&self) -> SinkResult<()> {
        self.collection
            .drop()
            .await
            .map_err(|e| SinkError::Drop(e.to_string()))
    }
}

#[async_trait]
impl Sink for MongoSink {
    async fn insert(&mut self, record: Record) -> SinkResult<()> {
        self.collection
            .insert_one(Document::from(record))
            .await
            .map(|_| ())
            .map_err(|e| SinkError::Insert(e.to_string()))
    }
}
