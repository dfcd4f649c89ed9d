//! Error types for drift using snafu.
//!
//! This module defines structured error types with context selectors for
//! all error conditions in the codebase.

use snafu::prelude::*;

// ============ Config Errors ============

/// Errors that can occur during configuration parsing and validation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[snafu(display("Failed to read configuration file"))]
    ReadFile { source: std::io::Error },

    /// Failed to parse YAML configuration.
    #[snafu(display("Failed to parse YAML configuration"))]
    YamlParse { source: serde_yaml::Error },

    /// Failed to parse a key/value configuration map.
    #[snafu(display("Failed to parse configuration map"))]
    MapParse { source: serde_yaml::Error },

    /// Required `tsfile` property is blank.
    #[snafu(display("Required property tsfile not set"))]
    EmptyFilePath,

    /// The configured time-series file does not exist.
    #[snafu(display("Time-series file does not exist: {path}"))]
    FileNotFound { path: String },

    /// The configured time-series file is not readable.
    #[snafu(display("Time-series file is not readable: {path}"))]
    FileNotReadable { path: String },

    /// Required `paths` property is blank.
    #[snafu(display("Required property paths not set"))]
    EmptyColumnPaths,
}

// ============ Dataset Errors ============

/// Errors that can occur while opening or querying a time-series container.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DatasetError {
    /// The container file could not be opened.
    #[snafu(display("Failed to open time-series container: {path}"))]
    Open {
        source: std::io::Error,
        path: String,
    },

    /// The file is not a valid time-series container.
    #[snafu(display("Not a valid time-series container: {path} (line {line}: {message})"))]
    InvalidContainer {
        path: String,
        line: usize,
        message: String,
    },

    /// A query referenced a blank column path.
    #[snafu(display("Query contains a blank column path"))]
    EmptyColumnPath,

    /// A query referenced a column path the container does not hold.
    #[snafu(display("Unknown column path: {path}"))]
    UnknownColumn { path: String },

    /// Operation attempted on a closed dataset handle.
    #[snafu(display("Dataset handle is closed"))]
    ClosedHandle,
}

// ============ Encode Errors ============

/// Errors that can occur while encoding a row into a record payload.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum EncodeError {
    /// JSON serialization failed for a row value.
    #[snafu(display("Failed to encode row as JSON"))]
    Json { source: serde_json::Error },

    /// The row's value count does not match the queried column paths.
    #[snafu(display("Row has {values} values but {paths} column paths were queried"))]
    ColumnCountMismatch { values: usize, paths: usize },
}

// ============ Source Error (top-level) ============

/// Top-level connector errors surfaced to the caller of `open`/`start`.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SourceError {
    /// Configuration error.
    #[snafu(display("Configuration error"))]
    Config { source: ConfigError },

    /// Failed to open the time-series container at startup.
    #[snafu(display("Dataset error"))]
    Dataset { source: DatasetError },

    /// The connector is already running.
    #[snafu(display("Connector is already running"))]
    AlreadyRunning,
}
