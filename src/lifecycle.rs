//! Boot/shutdown state machine shared by the façade and every backend service.
//!
//! Transitions are serialised on an async mutex held while the transition body
//! runs, so a caller racing the winner returns only once the winner is done.

use std::future::Future;
use tokio::sync::{watch, Mutex};

/// Where a service is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Unstarted,
    Running,
    Stopped,
}

pub(crate) struct Lifecycle {
    name: &'static str,
    state: Mutex<LifecycleState>,
    closer: watch::Sender<bool>,
}

impl Lifecycle {
    // ---
    pub(crate) fn new(name: &'static str) -> Self {
        // ---
        let (closer, _) = watch::channel(false);
        Self {
            name,
            state: Mutex::new(LifecycleState::Unstarted),
            closer,
        }
    }

    /// Unstarted -> Running, running `body` first. Returns whether the body ran.
    pub(crate) async fn boot_with<F, Fut>(&self, body: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut state = self.state.lock().await;
        match *state {
            LifecycleState::Unstarted => {
                body().await;
                *state = LifecycleState::Running;
                tracing::debug!("{} booted", self.name);
                true
            }
            LifecycleState::Running => false,
            LifecycleState::Stopped => {
                tracing::warn!("{} cannot boot after shutdown", self.name);
                false
            }
        }
    }

    /// Unstarted|Running -> Stopped, running `body` and then raising the
    /// shutdown signal. Returns whether the body ran.
    pub(crate) async fn shutdown_with<F, Fut>(&self, body: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut state = self.state.lock().await;
        if *state == LifecycleState::Stopped {
            return false;
        }

        body().await;
        *state = LifecycleState::Stopped;
        self.closer.send_replace(true);
        tracing::debug!("{} shut down", self.name);
        true
    }

    pub(crate) async fn boot(&self) -> bool {
        self.boot_with(|| async {}).await
    }

    pub(crate) async fn shutdown(&self) -> bool {
        self.shutdown_with(|| async {}).await
    }

    pub(crate) async fn state(&self) -> LifecycleState {
        *self.state.lock().await
    }

    /// Receiver observing `true` once shutdown has completed.
    #[cfg(test)]
    pub(crate) fn closed(&self) -> watch::Receiver<bool> {
        self.closer.subscribe()
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn boot_runs_once() {
        // ---
        let lifecycle = Lifecycle::new("test");
        let runs = AtomicUsize::new(0);
        let counter = &runs;

        let bump = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
        };
        assert!(lifecycle.boot_with(bump).await);
        assert!(!lifecycle.boot_with(bump).await);

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(lifecycle.state().await, LifecycleState::Running);
    }

    #[tokio::test]
    async fn shutdown_raises_signal_once() {
        // ---
        let lifecycle = Lifecycle::new("test");
        let closed = lifecycle.closed();
        assert!(!*closed.borrow());

        assert!(lifecycle.boot().await);
        assert!(lifecycle.shutdown().await);
        assert!(!lifecycle.shutdown().await);

        assert!(*closed.borrow());
        assert_eq!(lifecycle.state().await, LifecycleState::Stopped);
    }

    #[tokio::test]
    async fn shutdown_without_boot_is_allowed() {
        // ---
        let lifecycle = Lifecycle::new("test");
        assert!(lifecycle.shutdown().await);
        assert_eq!(lifecycle.state().await, LifecycleState::Stopped);
    }

    #[tokio::test]
    async fn boot_after_shutdown_is_ignored() {
        // ---
        let lifecycle = Lifecycle::new("test");
        lifecycle.shutdown().await;

        assert!(!lifecycle.boot().await);
        assert_eq!(lifecycle.state().await, LifecycleState::Stopped);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_boot_waits_for_winner() {
        // ---
        let lifecycle = Arc::new(Lifecycle::new("test"));
        let runs = Arc::new(AtomicUsize::new(0));

        let tasks = (0..2).map(|_| {
            let lifecycle = Arc::clone(&lifecycle);
            let runs = Arc::clone(&runs);
            tokio::spawn(async move {
                let counter = Arc::clone(&runs);
                lifecycle
                    .boot_with(move || async move {
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        counter.fetch_add(1, Ordering::SeqCst);
                    })
                    .await;
                // Whichever caller returns, the body must already have finished.
                runs.load(Ordering::SeqCst)
            })
        });

        for seen in futures::future::join_all(tasks).await {
            assert_eq!(seen.unwrap(), 1);
        }
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }
}
