//! NDJSON time-series container reader.
//!
//! Reads a newline-delimited JSON file (optionally gzip-compressed) where
//! each line is one timestamped row:
//!
//! ```text
//! {"timestamp": 1700000000000, "device1.temperature": 21.5, "device1.humidity": 40}
//! ```
//!
//! The whole container is loaded and validated at open time; queries then
//! select column paths (and optionally a time range) over the in-memory
//! rows, preserving file storage order. This implementation stands in for a
//! real columnar container library behind the [`Dataset`] trait.

use flate2::read::GzDecoder;
use snafu::prelude::*;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use crate::dataset::{ColumnValue, Dataset, QueryDescriptor, Row};
use crate::error::{
    ClosedHandleSnafu, DatasetError, EmptyColumnPathSnafu, InvalidContainerSnafu, OpenSnafu,
    UnknownColumnSnafu,
};

/// One stored row: timestamp plus the raw column values of its line.
#[derive(Debug)]
struct StoredRow {
    timestamp: i64,
    columns: serde_json::Map<String, serde_json::Value>,
}

/// File-backed NDJSON time-series dataset.
#[derive(Debug)]
pub struct NdjsonDataset {
    path: String,
    rows: Vec<StoredRow>,
    columns: HashSet<String>,
    closed: bool,
}

impl NdjsonDataset {
    fn read_contents(path: &Path) -> Result<String, std::io::Error> {
        let mut file = std::fs::File::open(path)?;
        let mut contents = String::new();
        if path.extension().is_some_and(|ext| ext == "gz") {
            GzDecoder::new(file).read_to_string(&mut contents)?;
        } else {
            file.read_to_string(&mut contents)?;
        }
        Ok(contents)
    }

    fn parse_line(
        path: &str,
        line_no: usize,
        line: &str,
    ) -> Result<StoredRow, DatasetError> {
        let value: serde_json::Value =
            serde_json::from_str(line).map_err(|e| {
                InvalidContainerSnafu {
                    path,
                    line: line_no,
                    message: e.to_string(),
                }
                .build()
            })?;

        let serde_json::Value::Object(mut object) = value else {
            return InvalidContainerSnafu {
                path,
                line: line_no,
                message: "expected a JSON object",
            }
            .fail();
        };

        let timestamp = object
            .remove("timestamp")
            .and_then(|v| v.as_i64())
            .context(InvalidContainerSnafu {
                path,
                line: line_no,
                message: "missing integer timestamp field",
            })?;

        for value in object.values() {
            ensure!(
                !value.is_array() && !value.is_object(),
                InvalidContainerSnafu {
                    path,
                    line: line_no,
                    message: "nested values are not supported",
                }
            );
        }

        Ok(StoredRow {
            timestamp,
            columns: object,
        })
    }
}

impl Dataset for NdjsonDataset {
    type Rows = std::vec::IntoIter<Result<Row, DatasetError>>;

    fn open(path: &Path) -> Result<Self, DatasetError> {
        let display = path.display().to_string();
        let contents = Self::read_contents(path).context(OpenSnafu { path: display.clone() })?;

        let mut rows = Vec::new();
        let mut columns = HashSet::new();
        for (idx, line) in contents.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let row = Self::parse_line(&display, idx + 1, trimmed)?;
            columns.extend(row.columns.keys().cloned());
            rows.push(row);
        }

        Ok(Self {
            path: display,
            rows,
            columns,
            closed: false,
        })
    }

    fn query(&mut self, query: &QueryDescriptor) -> Result<Self::Rows, DatasetError> {
        ensure!(!self.closed, ClosedHandleSnafu);

        for path in &query.paths {
            ensure!(!path.trim().is_empty(), EmptyColumnPathSnafu);
            ensure!(
                self.columns.contains(path.as_str()),
                UnknownColumnSnafu { path: path.clone() }
            );
        }

        let results: Vec<Result<Row, DatasetError>> = self
            .rows
            .iter()
            .filter(|row| {
                query
                    .time_range
                    .map_or(true, |range| range.contains(row.timestamp))
            })
            .filter(|row| query.paths.iter().any(|p| row.columns.contains_key(p)))
            .map(|row| {
                let values = query
                    .paths
                    .iter()
                    .map(|p| row.columns.get(p).map_or(ColumnValue::Null, to_column_value))
                    .collect();
                Ok(Row {
                    timestamp: row.timestamp,
                    values,
                })
            })
            .collect();

        Ok(results.into_iter())
    }

    fn close(&mut self) {
        if !self.closed {
            tracing::debug!(path = %self.path, "Closing dataset");
            self.closed = true;
            self.rows = Vec::new();
            self.columns = HashSet::new();
        }
    }
}

fn to_column_value(value: &serde_json::Value) -> ColumnValue {
    match value {
        serde_json::Value::Null => ColumnValue::Null,
        serde_json::Value::Bool(b) => ColumnValue::Boolean(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => ColumnValue::Int64(i),
            None => ColumnValue::Double(n.as_f64().unwrap_or_default()),
        },
        serde_json::Value::String(s) => ColumnValue::Text(s.clone()),
        // Arrays and objects are rejected at open time.
        _ => ColumnValue::Null,
    }
}
