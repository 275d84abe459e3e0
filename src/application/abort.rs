//! Cooperative cancellation for in-flight requests.
//!
//! An [`AbortHandle`] owns the sending side of a `watch` channel; every
//! [`AbortSignal`] cloned from it observes the same flag. Work races the
//! signal with `tokio::select!` and reports cancellation as an outcome
//! rather than an error.

use tokio::sync::watch;

/// Owner side: fires the abort.
#[derive(Debug)]
pub struct AbortHandle {
    tx: watch::Sender<bool>,
}

impl AbortHandle {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Signal observed by work that should stop when [`abort`](Self::abort)
    /// is called.
    #[must_use]
    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            rx: Some(self.tx.subscribe()),
        }
    }

    /// Abort every signal derived from this handle. Idempotent.
    pub fn abort(&self) {
        self.tx.send_replace(true);
    }

    #[must_use]
    pub fn is_aborted(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for AbortHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer side, handed to the work being guarded.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal {
    rx: Option<watch::Receiver<bool>>,
}

impl AbortSignal {
    /// A signal that never fires.
    #[must_use]
    pub fn never() -> Self {
        Self { rx: None }
    }

    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolves once the abort fires. Pends forever for [`never`](Self::never)
    /// signals and for handles dropped without aborting.
    pub async fn aborted(&self) {
        let Some(rx) = &self.rx else {
            return std::future::pending().await;
        };
        let mut rx = rx.clone();
        if rx.wait_for(|aborted| *aborted).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn abort_wakes_waiters() {
        let handle = AbortHandle::new();
        let signal = handle.signal();
        let waiter = tokio::spawn(async move { signal.aborted().await });
        handle.abort();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn signal_taken_after_abort_is_already_fired() {
        let handle = AbortHandle::new();
        handle.abort();
        let signal = handle.signal();
        assert!(signal.is_aborted());
        tokio::time::timeout(Duration::from_millis(100), signal.aborted())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn never_and_dropped_handles_do_not_fire() {
        let signal = AbortSignal::never();
        assert!(!signal.is_aborted());
        assert!(tokio::time::timeout(Duration::from_millis(20), signal.aborted())
            .await
            .is_err());

        let dropped = AbortHandle::new().signal();
        assert!(tokio::time::timeout(Duration::from_millis(20), dropped.aborted())
            .await
            .is_err());
    }
}
