//! Thread-per-request fetch runtime.
//!
//! Each posted message runs on its own thread so a slow request never holds up a newer
//! one. Responses come back over a channel in completion order, not issue order; the
//! navigator's ticket check sorts that out.

use crate::domain::error::{RanktrailError, Result};
use crate::service::RankingService;
use crate::worker::{RankingWorker, WorkerMessage, WorkerResponse};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;

/// Runs worker messages in the background and collects their responses.
pub struct WorkerPool {
    worker: RankingWorker,
    sender: Sender<WorkerResponse>,
    receiver: Receiver<WorkerResponse>,
}

impl WorkerPool {
    #[must_use]
    pub fn new(service: Arc<dyn RankingService>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            worker: RankingWorker::new(service),
            sender,
            receiver,
        }
    }

    /// Starts `message` on a new thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn post(&self, message: WorkerMessage) -> Result<()> {
        let worker = self.worker.clone();
        let sender = self.sender.clone();
        let ticket = message.ticket();

        std::thread::Builder::new()
            .name(format!("ranktrail-fetch-{}", ticket.0))
            .spawn(move || {
                let response = worker.handle_message(message);
                if sender.send(response).is_err() {
                    tracing::debug!(ticket = ticket.0, "response receiver dropped");
                }
            })
            .map_err(|e| RanktrailError::Worker(format!("failed to spawn fetch thread: {e}")))?;

        tracing::debug!(ticket = ticket.0, "fetch posted to worker thread");
        Ok(())
    }

    /// Returns a response if one has already arrived.
    #[must_use]
    pub fn try_recv(&self) -> Option<WorkerResponse> {
        self.receiver.try_recv().ok()
    }

    /// Waits up to `timeout` for the next response.
    #[must_use]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<WorkerResponse> {
        match self.receiver.recv_timeout(timeout) {
            Ok(response) => Some(response),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool").finish_non_exhaustive()
    }
}
