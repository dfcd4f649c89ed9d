//! Ingestion loop: repeated query-drain-emit cycles.
//!
//! One dedicated worker runs this loop for the connector's lifetime. Each
//! cycle performs a full rescan of the configured column paths; a fixed,
//! cancellable delay sits between query execution and result draining as a
//! placeholder for a future incremental/watermark query. Errors inside a
//! cycle never terminate the loop.

use snafu::prelude::*;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::dataset::{Dataset, QueryDescriptor};
use crate::emit;
use crate::error::{DatasetError, EncodeError};
use crate::metrics::events::{
    CycleCompleted, CycleDuration, CycleFailed, CycleResult, CycleStage, RecordsEmitted,
};
use crate::record::RowCodec;
use crate::sink::EmitSink;

/// Error raised inside a single cycle, tagged with the failing stage.
#[derive(Debug, Snafu)]
enum CycleError {
    #[snafu(display("query failed: {source}"))]
    Query { source: DatasetError },

    #[snafu(display("row iteration failed: {source}"))]
    Iterate { source: DatasetError },

    #[snafu(display("row encoding failed: {source}"))]
    Encode { source: EncodeError },
}

impl CycleError {
    fn stage(&self) -> CycleStage {
        match self {
            CycleError::Query { .. } => CycleStage::Query,
            CycleError::Iterate { .. } => CycleStage::Iterate,
            CycleError::Encode { .. } => CycleStage::Encode,
        }
    }
}

/// Outcome of a single extraction cycle.
enum CycleOutcome {
    /// The cycle drained its result set, emitting this many records.
    Emitted(usize),
    /// Shutdown was observed during the inter-cycle delay.
    Shutdown,
}

/// Run the ingestion loop until cancelled, then close the dataset.
///
/// Cycle errors are contained here: logged, counted, and followed
/// immediately by the next cycle, with no backoff. Only cancellation ends
/// the loop.
pub(crate) async fn run_ingestion_loop<D: Dataset>(
    mut dataset: D,
    paths: Vec<String>,
    codec: RowCodec,
    sink: Arc<dyn EmitSink>,
    poll_interval: Duration,
    shutdown: CancellationToken,
) {
    info!(paths = paths.len(), "Ingestion loop started");
    let mut cycle: u64 = 0;

    while !shutdown.is_cancelled() {
        cycle += 1;
        let start = Instant::now();

        match run_cycle(&mut dataset, &paths, &codec, sink.as_ref(), poll_interval, &shutdown).await
        {
            Ok(CycleOutcome::Shutdown) => break,
            Ok(CycleOutcome::Emitted(count)) => {
                emit!(RecordsEmitted { count: count as u64 });
                emit!(CycleCompleted {
                    result: CycleResult::Processed
                });
                debug!(cycle, records = count, "Cycle complete");
            }
            Err(e) => {
                // Never-die policy: the failed cycle is logged and the next
                // one starts immediately.
                error!(cycle, "Cycle failed: {e}");
                emit!(CycleFailed { stage: e.stage() });
                emit!(CycleCompleted {
                    result: CycleResult::Failed
                });
            }
        }

        emit!(CycleDuration {
            duration: start.elapsed()
        });
    }

    dataset.close();
    info!(cycles = cycle, "Ingestion loop stopped");
}

/// Execute one extraction cycle: query, delay, drain.
async fn run_cycle<D: Dataset>(
    dataset: &mut D,
    paths: &[String],
    codec: &RowCodec,
    sink: &dyn EmitSink,
    poll_interval: Duration,
    shutdown: &CancellationToken,
) -> Result<CycleOutcome, CycleError> {
    // Full rescan: no time bound until an incremental query replaces the
    // delay below. The same rows are re-emitted every cycle; deduplication
    // is downstream responsibility.
    let query = QueryDescriptor::new(paths.to_vec());
    let rows = dataset.query(&query).context(QuerySnafu)?;

    // Fixed throttle standing in for the future incremental query. A
    // cancellation here ends the cycle before its rows are drained.
    if shutdown
        .run_until_cancelled(tokio::time::sleep(poll_interval))
        .await
        .is_none()
    {
        debug!("Shutdown requested during inter-cycle delay");
        return Ok(CycleOutcome::Shutdown);
    }

    let mut emitted = 0usize;
    for row in rows {
        let row = row.context(IterateSnafu)?;
        let record = codec.encode(&row).context(EncodeSnafu)?;
        sink.emit(record);
        emitted += 1;
    }

    Ok(CycleOutcome::Emitted(emitted))
}
