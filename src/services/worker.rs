//! Background jobs whose results are drained by the UI loop
//!
//! Blocking work (CSV retrieval, the health probe) runs on a plain thread and
//! reports back over an unbounded channel. The UI polls with [`Worker::drain`]
//! on every tick and never blocks on a job.

use crate::core::SeatDataset;
use crate::error::LoadError;
use crate::services::ingest_service::IngestService;
use crate::services::status_service::{HealthReport, StatusService};
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error};

/// Message from a background job
#[derive(Debug)]
pub enum WorkerEvent {
    /// A load is about to try this candidate
    Attempting { generation: u64, candidate: String },
    /// A load finished, one way or the other
    Loaded {
        generation: u64,
        result: Result<SeatDataset, LoadError>,
    },
    Health(HealthReport),
}

pub struct Worker {
    tx: UnboundedSender<WorkerEvent>,
    rx: UnboundedReceiver<WorkerEvent>,
}

impl Default for Worker {
    fn default() -> Self {
        Self::new()
    }
}

impl Worker {
    pub fn new() -> Self {
        let (tx, rx) = unbounded_channel();
        Self { tx, rx }
    }

    /// Run the candidate sequence for load `generation` off the UI thread
    pub fn spawn_load(&self, service: IngestService, candidates: Vec<String>, generation: u64) {
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let result = service.load_with_progress(&candidates, |candidate| {
                let _ = tx.send(WorkerEvent::Attempting {
                    generation,
                    candidate: candidate.to_string(),
                });
            });
            if let Err(e) = &result {
                error!("Load {} failed: {}", generation, e);
            }
            // The receiver is gone when the app is shutting down
            if tx.send(WorkerEvent::Loaded { generation, result }).is_err() {
                debug!("Dropping result of load {}: receiver closed", generation);
            }
        });
    }

    pub fn spawn_health(&self, api_url: String, timeout: Option<Duration>) {
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let report = StatusService::check_health(&api_url, timeout);
            let _ = tx.send(WorkerEvent::Health(report));
        });
    }

    /// Everything that has arrived since the last call
    pub fn drain(&mut self) -> Vec<WorkerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}
