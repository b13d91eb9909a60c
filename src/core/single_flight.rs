use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Cancellation signal shared between a running search and whoever may
/// supersede it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<TokenState>,
}

#[derive(Debug, Default)]
struct TokenState {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Keeps at most one search active: starting a new one cancels the
/// previous.
#[derive(Debug, Default)]
pub struct SingleFlight {
    current: Mutex<Option<CancelToken>>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new active operation and cancels the prior one.
    pub fn begin(&self) -> CancelToken {
        let token = CancelToken::new();
        let mut current = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(previous) = current.replace(token.clone()) {
            if !previous.is_cancelled() {
                tracing::debug!("Superseding in-flight search");
            }
            previous.cancel();
        }
        token
    }

    /// Runs `fut` unless a later call supersedes it; superseded runs
    /// yield `None`.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        let token = self.begin();
        tokio::select! {
            biased;
            _ = token.cancelled() => None,
            output = fut => Some(output),
        }
    }
}
