use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use super::error::ApiError;

/// How a scoped request ended.
#[derive(Debug)]
pub enum FetchOutcome<T> {
    Loaded(T),
    Failed(ApiError),
    /// The owning scope was cancelled or dropped first
    Cancelled,
    /// A newer request on the same scope started before this one finished
    Superseded,
}

impl<T> FetchOutcome<T> {
    pub fn is_current(&self) -> bool {
        matches!(self, FetchOutcome::Loaded(_) | FetchOutcome::Failed(_))
    }
}

struct ScopeInner {
    cancelled: watch::Sender<bool>,
    generation: AtomicU64,
}

/// Lifetime of the view that issued requests. Dropping it cancels every
/// request started through its handles.
pub struct RequestScope {
    inner: Arc<ScopeInner>,
}

/// Cloneable handle used to start requests inside a scope.
#[derive(Clone)]
pub struct ScopeHandle {
    inner: Arc<ScopeInner>,
}

impl RequestScope {
    pub fn new() -> Self {
        let (cancelled, _) = watch::channel(false);
        Self {
            inner: Arc::new(ScopeInner {
                cancelled,
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn handle(&self) -> ScopeHandle {
        ScopeHandle {
            inner: self.inner.clone(),
        }
    }

    pub fn cancel(&self) {
        self.inner.cancelled.send_replace(true);
    }
}

impl Default for RequestScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl ScopeHandle {
    pub fn is_cancelled(&self) -> bool {
        *self.inner.cancelled.borrow()
    }

    /// Drive `request` to completion unless the scope is cancelled first.
    /// Only the most recently started request on a scope resolves as
    /// `Loaded`/`Failed`; earlier ones come back `Superseded`.
    pub async fn run<T, F>(&self, request: F) -> FetchOutcome<T>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        if self.is_cancelled() {
            return FetchOutcome::Cancelled;
        }

        let ticket = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let mut cancelled = self.inner.cancelled.subscribe();

        let result = tokio::select! {
            result = request => result,
            _ = cancelled.wait_for(|c| *c) => return FetchOutcome::Cancelled,
        };

        if self.is_cancelled() {
            return FetchOutcome::Cancelled;
        }
        if self.inner.generation.load(Ordering::SeqCst) != ticket {
            return FetchOutcome::Superseded;
        }

        match result {
            Ok(value) => FetchOutcome::Loaded(value),
            Err(e) => FetchOutcome::Failed(e),
        }
    }
}
