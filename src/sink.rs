//! Downstream emit boundary.
//!
//! The connector hands every decoded record to an [`EmitSink`], one call per
//! row, in row-iteration order. The sink is assumed cheap enough to call
//! synchronously from the ingestion loop.

use tokio::sync::mpsc;
use tracing::debug;

use crate::record::SourceRecord;

/// The downstream consumer callback.
///
/// Implementations must tolerate rapid repeated calls; emission carries no
/// return value and must not block the ingestion loop.
pub trait EmitSink: Send + Sync {
    /// Accept one record.
    fn emit(&self, record: SourceRecord);
}

/// An [`EmitSink`] backed by an unbounded channel, for embedders that want
/// to consume records as a stream.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SourceRecord>,
}

impl ChannelSink {
    /// Create a sink and the receiving half the embedder reads from.
    pub fn unbounded() -> (Self, mpsc::UnboundedReceiver<SourceRecord>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EmitSink for ChannelSink {
    fn emit(&self, record: SourceRecord) {
        if self.tx.send(record).is_err() {
            debug!("Record receiver dropped, discarding record");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[tokio::test]
    async fn test_channel_sink_preserves_emit_order() {
        let (sink, mut rx) = ChannelSink::unbounded();

        for i in 0..3u8 {
            sink.emit(SourceRecord {
                payload: Bytes::from(vec![i]),
            });
        }

        for i in 0..3u8 {
            let record = rx.recv().await.unwrap();
            assert_eq!(record.payload.as_ref(), &[i]);
        }
    }

    #[test]
    fn test_emit_after_receiver_dropped_is_silent() {
        let (sink, rx) = ChannelSink::unbounded();
        drop(rx);
        sink.emit(SourceRecord {
            payload: Bytes::new(),
        });
    }
}
