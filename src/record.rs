//! Row codec and the emitted record type.
//!
//! Converts one dataset row into the opaque JSON payload handed to the emit
//! sink. Encoding is pure and deterministic; the codec holds only the
//! queried column paths so values can be keyed by path.

use bytes::Bytes;
use snafu::prelude::*;

use crate::dataset::Row;
use crate::error::{ColumnCountMismatchSnafu, EncodeError, JsonSnafu};

/// A record emitted downstream: a one-field wrapper over the serialized
/// payload.
#[derive(Debug, Clone)]
pub struct SourceRecord {
    /// The serialized row, as JSON bytes.
    pub payload: Bytes,
}

/// Encodes rows into [`SourceRecord`]s.
#[derive(Debug, Clone)]
pub struct RowCodec {
    paths: Vec<String>,
}

impl RowCodec {
    /// Create a codec for rows queried over the given column paths.
    pub fn new(paths: Vec<String>) -> Self {
        Self { paths }
    }

    /// Encode one row as a JSON record:
    /// `{"timestamp": ..., "columns": {"<path>": <value>, ...}}`.
    ///
    /// Total over any row a conforming dataset produces; the error paths
    /// (value the encoder cannot represent, arity mismatch with the queried
    /// paths) must never occur for contracted inputs.
    pub fn encode(&self, row: &Row) -> Result<SourceRecord, EncodeError> {
        ensure!(
            row.values.len() == self.paths.len(),
            ColumnCountMismatchSnafu {
                values: row.values.len(),
                paths: self.paths.len(),
            }
        );

        let mut columns = serde_json::Map::with_capacity(self.paths.len());
        for (path, value) in self.paths.iter().zip(&row.values) {
            columns.insert(path.clone(), serde_json::to_value(value).context(JsonSnafu)?);
        }

        let payload = serde_json::json!({
            "timestamp": row.timestamp,
            "columns": columns,
        });

        let bytes = serde_json::to_vec(&payload).context(JsonSnafu)?;
        Ok(SourceRecord {
            payload: Bytes::from(bytes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ColumnValue;

    fn codec() -> RowCodec {
        RowCodec::new(vec![
            "device1.temperature".to_string(),
            "device1.status".to_string(),
        ])
    }

    #[test]
    fn test_round_trip() {
        let row = Row {
            timestamp: 1700000000000,
            values: vec![
                ColumnValue::Double(21.5),
                ColumnValue::Text("ok".to_string()),
            ],
        };

        let record = codec().encode(&row).unwrap();
        let decoded: serde_json::Value = serde_json::from_slice(&record.payload).unwrap();

        assert_eq!(decoded["timestamp"], 1700000000000i64);
        assert_eq!(decoded["columns"]["device1.temperature"], 21.5);
        assert_eq!(decoded["columns"]["device1.status"], "ok");
    }

    #[test]
    fn test_null_and_integer_values() {
        let row = Row {
            timestamp: 5,
            values: vec![ColumnValue::Null, ColumnValue::Int64(-7)],
        };

        let record = codec().encode(&row).unwrap();
        let decoded: serde_json::Value = serde_json::from_slice(&record.payload).unwrap();

        assert!(decoded["columns"]["device1.temperature"].is_null());
        assert_eq!(decoded["columns"]["device1.status"], -7);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let row = Row {
            timestamp: 1,
            values: vec![ColumnValue::Boolean(true), ColumnValue::Int32(3)],
        };

        let first = codec().encode(&row).unwrap();
        let second = codec().encode(&row).unwrap();
        assert_eq!(first.payload, second.payload);
    }

    #[test]
    fn test_column_count_mismatch() {
        let row = Row {
            timestamp: 1,
            values: vec![ColumnValue::Int64(1)],
        };

        let err = codec().encode(&row).unwrap_err();
        assert!(matches!(err, EncodeError::ColumnCountMismatch { .. }));
    }
}
