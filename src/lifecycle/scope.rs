//! Task scopes with explicit cancellation.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Owner of a group of spawned tasks.
///
/// Every task spawned through the scope races a broadcast cancel signal.
/// Cloning the scope shares it; when the last clone is dropped the channel
/// closes, which cancels the remaining tasks as well.
#[derive(Clone)]
pub struct TaskScope {
    inner: Arc<ScopeInner>,
}

struct ScopeInner {
    name: Arc<str>,
    tx: broadcast::Sender<()>,
    cancelled: AtomicBool,
}

impl TaskScope {
    /// Create a new scope. The name only shows up in logs.
    pub fn new(name: &str) -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            inner: Arc::new(ScopeInner {
                name: Arc::from(name),
                tx,
                cancelled: AtomicBool::new(false),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Spawn a task on the current tokio runtime, bound to this scope.
    ///
    /// Returns `None` if the scope was already cancelled or there is no
    /// runtime to run on.
    pub fn spawn<F>(&self, task: F) -> Option<JoinHandle<()>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let runtime = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(scope = %self.inner.name, error = %e, "No tokio runtime, task not started");
                return None;
            }
        };

        // Subscribe before checking the flag so a concurrent cancel is never missed.
        let mut cancel_rx = self.inner.tx.subscribe();
        if self.is_cancelled() {
            tracing::debug!(scope = %self.inner.name, "Scope cancelled, task not started");
            return None;
        }

        let scope = Arc::clone(&self.inner.name);
        Some(runtime.spawn(async move {
            tokio::select! {
                biased;
                _ = cancel_rx.recv() => {
                    tracing::debug!(scope = %scope, "Task cancelled");
                }
                _ = task => {}
            }
        }))
    }

    /// Cancel every task in the scope. Idempotent.
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::SeqCst) {
            tracing::debug!(
                scope = %self.inner.name,
                tasks = self.active_tasks(),
                "Cancelling scope"
            );
            let _ = self.inner.tx.send(());
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Number of spawned tasks that have not finished yet.
    pub fn active_tasks(&self) -> usize {
        self.inner.tx.receiver_count()
    }
}

impl std::fmt::Debug for TaskScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskScope")
            .field("name", &self.inner.name)
            .field("cancelled", &self.is_cancelled())
            .field("active_tasks", &self.active_tasks())
            .finish()
    }
}
