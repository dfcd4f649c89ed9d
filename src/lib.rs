//! drift: a polling source connector for time-series container files.
//!
//! This library opens a columnar time-series file, repeatedly queries the
//! configured column paths on a dedicated background task, encodes each row
//! as a JSON record, and hands the records to a downstream sink until the
//! connector is stopped.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use drift::{ChannelSink, Config, Connector, NdjsonDataset};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), drift::error::SourceError> {
//!     let config = Config::from_file("connector.yaml").unwrap();
//!     let (sink, mut records) = ChannelSink::unbounded();
//!
//!     let mut connector = Connector::<NdjsonDataset>::open(config, Arc::new(sink))?;
//!     while let Some(record) = records.recv().await {
//!         println!("{}", String::from_utf8_lossy(&record.payload));
//!     }
//!     connector.close().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod connector;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod record;
pub mod sink;

// Re-export main types
pub use config::Config;
pub use connector::{Connector, LifecycleState};
pub use dataset::{ColumnValue, Dataset, NdjsonDataset, QueryDescriptor, Row, TimeRange};
pub use record::{RowCodec, SourceRecord};
pub use sink::{ChannelSink, EmitSink};
