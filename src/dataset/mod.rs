//! Time-series dataset boundary.
//!
//! Defines the row/value data model and the [`Dataset`] trait the connector
//! drives. The trait is the seam to the time-series container library; the
//! crate ships one file-backed implementation in [`ndjson`].

pub mod ndjson;

use serde::Serialize;
use std::path::Path;

use crate::error::DatasetError;

pub use ndjson::NdjsonDataset;

/// A single typed column value within a row.
///
/// Covers the value types a columnar time-series container produces. A
/// `Null` marks a column with no datapoint at the row's timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnValue {
    Null,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    Text(String),
}

/// One timestamped tuple of values across the queried column paths.
///
/// Values align positionally with the paths of the query that produced the
/// row. Rows are transient: they are encoded and emitted, never retained.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Timestamp in milliseconds.
    pub timestamp: i64,
    /// Column values, one per queried path.
    pub values: Vec<ColumnValue>,
}

/// Inclusive timestamp bound for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

impl TimeRange {
    /// Whether the given timestamp falls inside this range.
    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }
}

/// A query over a set of column paths with an optional time bound.
///
/// The ingestion loop always builds this without a time bound (full rescan);
/// the `time_range` field is the seam where an incremental/watermark query
/// will plug in.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDescriptor {
    pub paths: Vec<String>,
    pub time_range: Option<TimeRange>,
}

impl QueryDescriptor {
    /// Build a full-rescan query over the given column paths.
    pub fn new(paths: Vec<String>) -> Self {
        Self {
            paths,
            time_range: None,
        }
    }

    /// Build a time-bounded query over the given column paths.
    pub fn bounded(paths: Vec<String>, range: TimeRange) -> Self {
        Self {
            paths,
            time_range: Some(range),
        }
    }
}

/// An openable, queryable time-series container.
///
/// Implementations own the file's read state; closing releases it and
/// invalidates further queries. The connector holds exactly one dataset for
/// its lifetime and reconstructs it on restart.
pub trait Dataset: Sized + Send {
    /// Iterator over the rows of one query result, in storage order.
    type Rows: Iterator<Item = Result<Row, DatasetError>> + Send + 'static;

    /// Open the container at `path`.
    ///
    /// Fails if the file cannot be opened or is not a valid container.
    fn open(path: &Path) -> Result<Self, DatasetError>;

    /// Execute a query, yielding rows in the container's storage order.
    ///
    /// Fails on malformed or unknown column paths, or after `close`.
    fn query(&mut self, query: &QueryDescriptor) -> Result<Self::Rows, DatasetError>;

    /// Release the container's resources. Idempotent.
    fn close(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_range_inclusive() {
        let range = TimeRange { start: 10, end: 20 };
        assert!(range.contains(10));
        assert!(range.contains(20));
        assert!(!range.contains(9));
        assert!(!range.contains(21));
    }

    #[test]
    fn test_query_descriptor_full_rescan() {
        let query = QueryDescriptor::new(vec!["device1.temperature".to_string()]);
        assert!(query.time_range.is_none());
        assert_eq!(query.paths.len(), 1);
    }
}
