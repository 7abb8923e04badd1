//! Cancellation of running tools.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Handle used to cancel in-flight tool runs.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    notify: Arc<watch::Sender<bool>>,
}

impl CancellationToken {
    /// Create a token and the watcher handed to the executor.
    pub fn new() -> (Self, CancellationWatcher) {
        let (tx, rx) = watch::channel(false);
        let cancelled = Arc::new(AtomicBool::new(false));

        let token = Self {
            cancelled: Arc::clone(&cancelled),
            notify: Arc::new(tx),
        };
        let watcher = CancellationWatcher {
            cancelled,
            notify: rx,
        };

        (token, watcher)
    }

    /// Cancel every run watching this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        let _ = self.notify.send(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Receiving side of a [`CancellationToken`].
#[derive(Debug, Clone)]
pub struct CancellationWatcher {
    cancelled: Arc<AtomicBool>,
    notify: watch::Receiver<bool>,
}

impl CancellationWatcher {
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Resolve once cancelled.
    ///
    /// Never resolves if every token is dropped without cancelling.
    pub async fn cancelled(&mut self) {
        while !*self.notify.borrow_and_update() {
            if self.notify.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
