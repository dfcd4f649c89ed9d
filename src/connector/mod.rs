//! Connector lifecycle controller.
//!
//! Owns the state machine governing the ingestion worker: `start` validates
//! the configuration, opens the dataset, and launches the loop on a
//! dedicated task; `stop` cancels the loop, waits for the worker to exit
//! (the worker closes the dataset on its way out), and returns the
//! connector to `Stopped`. A stopped connector can be started again; the
//! dataset handle is reconstructed each time.

mod poll;

use snafu::prelude::*;
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::Config;
use crate::dataset::Dataset;
use crate::error::{AlreadyRunningSnafu, ConfigSnafu, DatasetSnafu, SourceError};
use crate::record::RowCodec;
use crate::sink::EmitSink;

/// Lifecycle state of the connector.
///
/// The dataset handle is open exactly while the state is `Running` or
/// `Closing`; the worker task exists exactly while the state is not
/// `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Stopped,
    Running,
    Closing,
}

/// Polling source connector over a time-series container file.
///
/// Generic over the [`Dataset`] implementation so embedders (and tests) can
/// supply their own container library behind the trait.
pub struct Connector<D: Dataset> {
    config: Config,
    sink: Arc<dyn EmitSink>,
    state: LifecycleState,
    shutdown: CancellationToken,
    worker: Option<JoinHandle<()>>,
    _dataset: PhantomData<D>,
}

impl<D: Dataset + 'static> Connector<D> {
    /// Create a stopped connector. Nothing is validated or opened yet.
    pub fn new(config: Config, sink: Arc<dyn EmitSink>) -> Self {
        Self {
            config,
            sink,
            state: LifecycleState::Stopped,
            shutdown: CancellationToken::new(),
            worker: None,
            _dataset: PhantomData,
        }
    }

    /// Validate the configuration and start the connector in one call.
    ///
    /// This is the managed-component entry point; must be called from
    /// within a Tokio runtime.
    pub fn open(config: Config, sink: Arc<dyn EmitSink>) -> Result<Self, SourceError> {
        let mut connector = Self::new(config, sink);
        connector.start()?;
        Ok(connector)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Validate the configuration, open the dataset, and launch the
    /// ingestion loop on a dedicated background task.
    ///
    /// On failure the state remains `Stopped` and no task is created.
    /// Must be called from within a Tokio runtime.
    pub fn start(&mut self) -> Result<(), SourceError> {
        ensure!(self.state == LifecycleState::Stopped, AlreadyRunningSnafu);

        self.config.validate().context(ConfigSnafu)?;
        let dataset = D::open(Path::new(&self.config.tsfile)).context(DatasetSnafu)?;

        let paths = self.config.column_paths();
        let codec = RowCodec::new(paths.clone());
        let shutdown = CancellationToken::new();

        let worker = tokio::spawn(poll::run_ingestion_loop(
            dataset,
            paths,
            codec,
            self.sink.clone(),
            self.config.poll_interval(),
            shutdown.clone(),
        ));

        self.shutdown = shutdown;
        self.worker = Some(worker);
        self.state = LifecycleState::Running;
        info!(tsfile = %self.config.tsfile, "Connector started");
        Ok(())
    }

    /// Stop the connector: cancel the loop, then wait for the worker to
    /// exit and release the dataset.
    ///
    /// No-op when already stopped; safe to call repeatedly and while a
    /// cycle is in flight. Shutdown latency is bounded because every wait
    /// in the worker is cancellable.
    pub async fn stop(&mut self) {
        if self.state == LifecycleState::Stopped {
            return;
        }

        self.state = LifecycleState::Closing;
        info!("Stopping connector");
        self.shutdown.cancel();

        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.await {
                // The worker is supervised: a panic is contained here and
                // logged, never propagated to the caller.
                error!("Ingestion worker terminated abnormally: {e}");
            }
        }

        self.state = LifecycleState::Stopped;
        info!("Connector stopped");
    }

    /// Stop and release. Mirrors [`Connector::open`].
    pub async fn close(&mut self) {
        self.stop().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{QueryDescriptor, Row};
    use crate::error::{ConfigError, DatasetError};
    use crate::record::SourceRecord;

    struct NullSink;

    impl EmitSink for NullSink {
        fn emit(&self, _record: SourceRecord) {}
    }

    struct EmptyDataset;

    impl Dataset for EmptyDataset {
        type Rows = std::vec::IntoIter<Result<Row, DatasetError>>;

        fn open(_path: &Path) -> Result<Self, DatasetError> {
            Ok(Self)
        }

        fn query(&mut self, _query: &QueryDescriptor) -> Result<Self::Rows, DatasetError> {
            Ok(Vec::new().into_iter())
        }

        fn close(&mut self) {}
    }

    fn config(tsfile: &str) -> Config {
        Config {
            tsfile: tsfile.to_string(),
            paths: "device1.temperature".to_string(),
            poll_interval_ms: 10,
        }
    }

    #[test]
    fn test_new_connector_is_stopped() {
        let connector = Connector::<EmptyDataset>::new(config("/tmp/x"), Arc::new(NullSink));
        assert_eq!(connector.state(), LifecycleState::Stopped);
    }

    #[test]
    fn test_start_with_invalid_config_stays_stopped() {
        let mut connector =
            Connector::<EmptyDataset>::new(config("/no/such/file"), Arc::new(NullSink));

        let err = connector.start().unwrap_err();
        assert!(matches!(
            err,
            SourceError::Config {
                source: ConfigError::FileNotFound { .. }
            }
        ));
        assert_eq!(connector.state(), LifecycleState::Stopped);
    }

    #[tokio::test]
    async fn test_start_twice_fails() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut connector = Connector::<EmptyDataset>::new(
            config(tmp.path().to_str().unwrap()),
            Arc::new(NullSink),
        );

        connector.start().unwrap();
        assert!(matches!(
            connector.start(),
            Err(SourceError::AlreadyRunning)
        ));

        connector.stop().await;
        assert_eq!(connector.state(), LifecycleState::Stopped);
    }
}
