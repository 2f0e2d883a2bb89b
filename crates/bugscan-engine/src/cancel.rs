use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

/// Run-level cancellation signal shared by the scanner and the probe.
///
/// Cheap to clone; every clone observes the same flag. Once cancelled it stays
/// cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
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

    /// Resolves once [`CancelToken::cancel`] has been called
    pub async fn cancelled(&self) {
        loop {
            // Register before checking the flag so a concurrent cancel() is not missed.
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// Cancel this token once `deadline` has elapsed.
    ///
    /// Must be called from within a tokio runtime.
    pub fn cancel_after(&self, deadline: Duration) -> tokio::task::JoinHandle<()> {
        let token = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            tracing::info!(?deadline, "run deadline reached, cancelling");
            token.cancel();
        })
    }
}
