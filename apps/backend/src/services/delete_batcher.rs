//! Background task that turns logical deletes into batched purges.
//!
//! Every successful `delete_book` sends one signal. The batcher counts
//! signals and, when the count reaches `threshold`, asks the book store to
//! physically remove every logically deleted row in one call. States:
//!
//! `Idle` -> `Accumulating(n)` -> `Flushing` -> `Idle`
//!
//! A purge failure is not retried: the task publishes its final status and
//! returns the error through its join handle, and the binary shuts down.
//!
//! Without `flush_interval`, fewer than `threshold` deletes stay logically
//! deleted until more deletes arrive.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::errors::domain::DomainError;
use crate::repos::BookStore;

pub const DEFAULT_PURGE_THRESHOLD: usize = 5;

/// Configuration for the delete batcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatcherConfig {
    /// Number of delete signals that triggers a purge (>= 1).
    pub threshold: usize,
    /// Flush an accumulating batch this long after its first signal.
    pub flush_interval: Option<Duration>,
}

impl Default for BatcherConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_PURGE_THRESHOLD,
            flush_interval: None,
        }
    }
}

impl BatcherConfig {
    pub fn with_threshold(threshold: usize) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.threshold == 0 {
            return Err("purge threshold must be at least 1".to_string());
        }
        if self.flush_interval.is_some_and(|d| d.is_zero()) {
            return Err("purge interval must be greater than zero".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatcherState {
    Idle,
    /// Signals counted since the last purge (always below the threshold).
    Accumulating(usize),
    /// A purge is in flight.
    Flushing,
}

/// Snapshot published on every state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatcherStatus {
    pub state: BatcherState,
    /// Successful purges since start.
    pub purges: u64,
    /// False once the task has exited.
    pub running: bool,
}

#[derive(Debug, Error)]
pub enum BatcherError {
    #[error("purge of deleted books failed: {0}")]
    PurgeFailed(#[source] DomainError),
    #[error("delete batcher task ended abnormally: {0}")]
    Aborted(String),
}

/// Cheap, cloneable handle used by request handlers.
#[derive(Debug, Clone)]
pub struct DeleteSignaller {
    tx: mpsc::UnboundedSender<()>,
}

impl DeleteSignaller {
    /// Record one logical delete. Never blocks.
    pub fn signal(&self) {
        if self.tx.send(()).is_err() {
            warn!("delete batcher is not running; signal dropped");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Owner of the background task.
pub struct DeleteBatcher {
    signaller: DeleteSignaller,
    status: watch::Receiver<BatcherStatus>,
    task: JoinHandle<Result<(), BatcherError>>,
}

impl DeleteBatcher {
    /// Spawn the batcher onto the current tokio runtime.
    pub fn spawn<S>(store: Arc<S>, config: BatcherConfig, cancel: CancellationToken) -> Self
    where
        S: BookStore + ?Sized,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(BatcherStatus {
            state: BatcherState::Idle,
            purges: 0,
            running: true,
        });

        let worker = Worker {
            store,
            threshold: config.threshold.max(1),
            flush_interval: config.flush_interval,
            rx,
            status_tx,
            cancel,
            pending: 0,
            purges: 0,
            deadline: None,
        };

        Self {
            signaller: DeleteSignaller { tx },
            status: status_rx,
            task: tokio::spawn(worker.run()),
        }
    }

    pub fn signaller(&self) -> DeleteSignaller {
        self.signaller.clone()
    }

    pub fn status(&self) -> watch::Receiver<BatcherStatus> {
        self.status.clone()
    }

    /// Wait for the task to exit. `Err` carries the fatal purge error.
    pub async fn join(self) -> Result<(), BatcherError> {
        match self.task.await {
            Ok(result) => result,
            Err(join_err) if join_err.is_panic() => {
                Err(BatcherError::Aborted("task panicked".to_string()))
            }
            Err(_) => Err(BatcherError::Aborted("task was cancelled".to_string())),
        }
    }
}

struct Worker<S: ?Sized> {
    store: Arc<S>,
    threshold: usize,
    flush_interval: Option<Duration>,
    rx: mpsc::UnboundedReceiver<()>,
    status_tx: watch::Sender<BatcherStatus>,
    cancel: CancellationToken,
    pending: usize,
    purges: u64,
    deadline: Option<Instant>,
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

impl<S: BookStore + ?Sized> Worker<S> {
    async fn run(mut self) -> Result<(), BatcherError> {
        info!(
            threshold = self.threshold,
            flush_interval_ms = self.flush_interval.map(|d| d.as_millis() as u64),
            "delete batcher started"
        );

        let outcome = loop {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => {
                    info!(pending = self.pending, "delete batcher stopping on shutdown");
                    break Ok(());
                }
                msg = self.rx.recv() => match msg {
                    Some(()) => {
                        if let Err(e) = self.on_signal().await {
                            break Err(e);
                        }
                    }
                    None => {
                        info!(pending = self.pending, "all delete signallers dropped");
                        break Ok(());
                    }
                },
                _ = wait_until(self.deadline) => {
                    debug!(pending = self.pending, "flush interval elapsed");
                    if let Err(e) = self.flush().await {
                        break Err(e);
                    }
                }
            }
        };

        self.rx.close();
        let state = match self.pending {
            0 => BatcherState::Idle,
            n => BatcherState::Accumulating(n),
        };
        self.publish(state, false);
        outcome
    }

    async fn on_signal(&mut self) -> Result<(), BatcherError> {
        self.pending += 1;
        debug!(pending = self.pending, threshold = self.threshold, "delete signal");

        if self.pending >= self.threshold {
            return self.flush().await;
        }

        if self.pending == 1 {
            self.deadline = self.flush_interval.map(|d| Instant::now() + d);
        }
        self.publish(BatcherState::Accumulating(self.pending), true);
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), BatcherError> {
        let drained = std::mem::take(&mut self.pending);
        self.deadline = None;
        self.publish(BatcherState::Flushing, true);

        match self.store.purge_deleted().await {
            Ok(()) => {
                self.purges += 1;
                info!(signals = drained, purges = self.purges, "purged deleted books");
                self.publish(BatcherState::Idle, true);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, signals = drained, "purge failed; delete batcher exiting");
                Err(BatcherError::PurgeFailed(e))
            }
        }
    }

    fn publish(&self, state: BatcherState, running: bool) {
        self.status_tx.send_replace(BatcherStatus {
            state,
            purges: self.purges,
            running,
        });
    }
}
