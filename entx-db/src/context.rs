use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use entx_api::error::{QueryError, QueryResult};
use tokio::sync::Notify;
use tokio::time::Instant;

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Per-request context threaded through every query call.
///
/// Clones share the same cancellation state, so cancelling any clone
/// cancels the whole paginated fetch. The context also carries the
/// soft-delete switch that lets a query include trashed rows.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use entx_db::context::QueryContext;
///
/// let ctx = QueryContext::with_timeout(Duration::from_secs(5));
/// assert!(ctx.check().is_ok());
///
/// let trashed = QueryContext::for_trashed(Some(true));
/// assert!(trashed.includes_trashed());
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    state: Arc<CancelState>,
    deadline: Option<Instant>,
    include_trashed: bool,
}

impl QueryContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            ..Self::default()
        }
    }

    /// Context including trashed rows only when `with_trashed` is `Some(true)`.
    pub fn for_trashed(with_trashed: Option<bool>) -> Self {
        let ctx = Self::new();
        if with_trashed == Some(true) {
            ctx.include_trashed()
        } else {
            ctx
        }
    }

    /// Returns a context that skips soft-delete filtering. Cancellation is
    /// still shared with `self`.
    pub fn include_trashed(&self) -> Self {
        Self {
            include_trashed: true,
            ..self.clone()
        }
    }

    pub fn includes_trashed(&self) -> bool {
        self.include_trashed
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
        self.state.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once the context has been cancelled.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.state.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// Fails with `Cancelled` or `DeadlineExceeded` when the context can no
    /// longer be used for a query.
    pub fn check(&self) -> QueryResult<()> {
        if self.is_cancelled() {
            return Err(QueryError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(QueryError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}
