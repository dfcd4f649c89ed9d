//! Internal events for metrics emission.
//!
//! Each event struct represents a measurable occurrence in the connector.
//! Events implement the `InternalEvent` trait which emits the corresponding
//! metric.

use metrics::{counter, histogram};
use std::time::Duration;
use tracing::trace;

/// Trait for internal events that can be emitted as metrics.
pub trait InternalEvent {
    /// Emit this event as a metric.
    fn emit(self);
}

/// Event emitted when records are handed to the sink.
pub struct RecordsEmitted {
    pub count: u64,
}

impl InternalEvent for RecordsEmitted {
    fn emit(self) {
        trace!(count = self.count, "Records emitted");
        counter!("drift_records_emitted_total").increment(self.count);
    }
}

/// Result of one extraction cycle.
#[derive(Debug, Clone, Copy)]
pub enum CycleResult {
    Processed,
    Failed,
}

impl CycleResult {
    fn as_str(&self) -> &'static str {
        match self {
            CycleResult::Processed => "processed",
            CycleResult::Failed => "failed",
        }
    }
}

/// Event emitted when an extraction cycle finishes.
pub struct CycleCompleted {
    pub result: CycleResult,
}

impl InternalEvent for CycleCompleted {
    fn emit(self) {
        trace!(result = self.result.as_str(), "Cycle completed");
        counter!("drift_cycles_completed_total", "result" => self.result.as_str()).increment(1);
    }
}

/// Stage at which a cycle failure occurred.
#[derive(Debug, Clone, Copy)]
pub enum CycleStage {
    Query,
    Iterate,
    Encode,
}

impl CycleStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleStage::Query => "query",
            CycleStage::Iterate => "iterate",
            CycleStage::Encode => "encode",
        }
    }
}

/// Event emitted when a cycle fails.
pub struct CycleFailed {
    pub stage: CycleStage,
}

impl InternalEvent for CycleFailed {
    fn emit(self) {
        trace!(stage = self.stage.as_str(), "Cycle failed");
        counter!("drift_cycle_failures_total", "stage" => self.stage.as_str()).increment(1);
    }
}

/// Event emitted with the wall-clock duration of a cycle.
pub struct CycleDuration {
    pub duration: Duration,
}

impl InternalEvent for CycleDuration {
    fn emit(self) {
        histogram!("drift_cycle_duration_seconds").record(self.duration.as_secs_f64());
    }
}
