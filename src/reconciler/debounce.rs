//! Delayed search dispatch with explicit cancellation.
//!
//! Scheduling a new task aborts the one still waiting (or still running), so
//! only the most recent input ever reaches the catalog.

use super::{ListEvent, Reconciler};
use crate::domain::SearchQuery;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

/// Handle to at most one pending delayed task.
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `task` after the delay, cancelling whatever was scheduled before.
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            if !handle.is_finished() {
                debug!("Cancelling superseded debounced task");
            }
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Search box wiring: typing is debounced, the clear button is immediate.
pub struct DebouncedSearch {
    reconciler: Arc<Mutex<Reconciler>>,
    debouncer: Debouncer,
}

impl DebouncedSearch {
    pub fn new(reconciler: Arc<Mutex<Reconciler>>, delay: Duration) -> Self {
        Self {
            reconciler,
            debouncer: Debouncer::new(delay),
        }
    }

    pub fn reconciler(&self) -> Arc<Mutex<Reconciler>> {
        self.reconciler.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Text changed. Empty input clears the search once the delay passes.
    pub fn on_input(&mut self, term: &str) {
        let reconciler = self.reconciler.clone();
        let query = SearchQuery::new(term);
        self.debouncer.schedule(async move {
            reconciler.lock().await.handle(ListEvent::SearchChanged(query)).await;
        });
    }

    /// Clear button: drop any pending search and reset right away.
    pub async fn on_clear(&mut self) {
        self.debouncer.cancel();
        self.reconciler.lock().await.clear_search().await;
    }
}
