//! Metrics and observability infrastructure for drift.
//!
//! Internal events are emitted through the [`emit!`] macro onto `metrics`
//! counters and histograms. The crate installs no recorder and serves no
//! endpoint; the embedder wires the `metrics` facade to its own exporter.

pub mod events;

/// Emit an internal event as a metric.
///
/// This macro calls the `InternalEvent::emit()` method on the given event,
/// which records the corresponding metric.
///
/// # Example
///
/// ```ignore
/// use drift::metrics::events::RecordsEmitted;
///
/// emit!(RecordsEmitted { count: 100 });
/// ```
#[macro_export]
macro_rules! emit {
    ($event:expr) => {
        $crate::metrics::events::InternalEvent::emit($event)
    };
}
