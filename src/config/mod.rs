//! Configuration parsing and validation.
//!
//! Handles loading the connector configuration from YAML files or from a
//! generic key/value map, and validates it before the connector starts.

use serde::{Deserialize, Serialize};
use snafu::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::error::{
    ConfigError, EmptyColumnPathsSnafu, EmptyFilePathSnafu, FileNotFoundSnafu,
    FileNotReadableSnafu, MapParseSnafu, ReadFileSnafu, YamlParseSnafu,
};

/// Connector configuration.
///
/// Immutable once validated; created when the connector is opened and lives
/// for its entire lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path of the time-series container file to read.
    pub tsfile: String,

    /// Comma-separated list of column paths to query.
    pub paths: String,

    /// Fixed delay between query execution and result draining, in
    /// milliseconds (default: 3000).
    ///
    /// This throttle is a placeholder for a future incremental/watermark
    /// query; it avoids a busy-spin and carries no ordering guarantee.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    3000
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).context(ReadFileSnafu)?;
        serde_yaml::from_str(&content).context(YamlParseSnafu)
    }

    /// Load configuration from a generic key/value map.
    ///
    /// This is the inbound form a managed-connector runtime hands over.
    pub fn from_map(map: HashMap<String, serde_yaml::Value>) -> Result<Self, ConfigError> {
        let mapping: serde_yaml::Mapping = map
            .into_iter()
            .map(|(key, value)| (serde_yaml::Value::String(key), value))
            .collect();
        serde_yaml::from_value(serde_yaml::Value::Mapping(mapping)).context(MapParseSnafu)
    }

    /// Validate the configuration.
    ///
    /// Checks short-circuit on the first failing condition, in a fixed
    /// order: blank file path, missing file, unreadable file, blank column
    /// paths.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure!(!self.tsfile.trim().is_empty(), EmptyFilePathSnafu);
        ensure!(
            Path::new(&self.tsfile).exists(),
            FileNotFoundSnafu { path: self.tsfile.clone() }
        );
        ensure!(
            std::fs::File::open(&self.tsfile).is_ok(),
            FileNotReadableSnafu { path: self.tsfile.clone() }
        );
        ensure!(!self.paths.trim().is_empty(), EmptyColumnPathsSnafu);
        Ok(())
    }

    /// The configured column paths, split and trimmed, in order.
    pub fn column_paths(&self) -> Vec<String> {
        self.paths
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The inter-cycle delay as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn base_config(tsfile: &str, paths: &str) -> Config {
        Config {
            tsfile: tsfile.to_string(),
            paths: paths.to_string(),
            poll_interval_ms: 3000,
        }
    }

    #[test]
    fn test_yaml_parsing_with_defaults() {
        let yaml = r#"
tsfile: "/data/measurements.tsq"
paths: "device1.temperature,device1.humidity"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.tsfile, "/data/measurements.tsq");
        assert_eq!(config.poll_interval_ms, 3000);
        assert_eq!(
            config.column_paths(),
            vec!["device1.temperature", "device1.humidity"]
        );
    }

    #[test]
    fn test_from_map() {
        let mut map = HashMap::new();
        map.insert(
            "tsfile".to_string(),
            serde_yaml::Value::String("/data/measurements.tsq".to_string()),
        );
        map.insert(
            "paths".to_string(),
            serde_yaml::Value::String("device1.temperature".to_string()),
        );
        map.insert("poll_interval_ms".to_string(), serde_yaml::Value::from(250));

        let config = Config::from_map(map).unwrap();
        assert_eq!(config.tsfile, "/data/measurements.tsq");
        assert_eq!(config.poll_interval_ms, 250);
    }

    #[test]
    fn test_from_map_missing_required_key() {
        let mut map = HashMap::new();
        map.insert(
            "tsfile".to_string(),
            serde_yaml::Value::String("/data/measurements.tsq".to_string()),
        );

        let err = Config::from_map(map).unwrap_err();
        assert!(matches!(err, ConfigError::MapParse { .. }));
    }

    #[test]
    fn test_validate_blank_tsfile_wins_over_blank_paths() {
        let config = base_config("", "");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::EmptyFilePath));
    }

    #[test]
    fn test_validate_missing_file_wins_over_blank_paths() {
        let config = base_config("/no/such/file", "");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_validate_blank_paths() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "{{\"timestamp\": 1}}").unwrap();

        let config = base_config(tmp.path().to_str().unwrap(), "  ");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::EmptyColumnPaths));
    }

    #[test]
    fn test_validate_ok() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "{{\"timestamp\": 1}}").unwrap();

        let config = base_config(tmp.path().to_str().unwrap(), "device1.temperature");
        config.validate().unwrap();
    }

    #[test]
    fn test_column_paths_trimming() {
        let config = base_config("/data/f.tsq", " a.b , c.d ,");
        assert_eq!(config.column_paths(), vec!["a.b", "c.d"]);
    }
}
