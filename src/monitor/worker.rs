//! Background collection worker.
//!
//! One blocking task owns the collector (and with it the provider) and
//! serves requests strictly in order, so two collection cycles never
//! overlap. The UI thread only ever touches the channels.

use tokio::sync::mpsc;
use tracing::debug;

use crate::models::{ProcessRecord, SortKey, SystemSnapshot, TerminateOutcome};

use super::collector::SnapshotCollector;
use super::provider::MetricsProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectRequest {
    Processes(SortKey),
    System,
    Detail(u32),
    Terminate { pid: u32, force: bool },
}

#[derive(Debug, Clone)]
pub enum CollectEvent {
    Processes(Vec<ProcessRecord>),
    System(SystemSnapshot),
    Detail(ProcessRecord),
    Terminated { pid: u32, outcome: TerminateOutcome },
}

/// UI-side ends of the worker channels.
pub struct CollectorHandle {
    tx: mpsc::UnboundedSender<CollectRequest>,
    rx: mpsc::UnboundedReceiver<CollectEvent>,
}

impl CollectorHandle {
    /// Queue a request. Returns false once the worker has gone away.
    pub fn send(&self, request: CollectRequest) -> bool {
        self.tx.send(request).is_ok()
    }

    pub fn try_recv(&mut self) -> Option<CollectEvent> {
        self.rx.try_recv().ok()
    }

    #[cfg(test)]
    pub async fn recv(&mut self) -> Option<CollectEvent> {
        self.rx.recv().await
    }
}

/// Move `collector` onto a blocking worker task. The worker exits when the
/// handle is dropped.
pub fn spawn<P>(mut collector: SnapshotCollector<P>) -> CollectorHandle
where
    P: MetricsProvider + 'static,
{
    let (req_tx, mut req_rx) = mpsc::unbounded_channel::<CollectRequest>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<CollectEvent>();

    tokio::task::spawn_blocking(move || {
        while let Some(request) = req_rx.blocking_recv() {
            debug!(?request, "collect request");
            let event = collector.run(request);
            if event_tx.send(event).is_err() {
                break;
            }
        }
        debug!("collector worker stopped");
    });

    CollectorHandle {
        tx: req_tx,
        rx: event_rx,
    }
}
