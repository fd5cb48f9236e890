//! Cancellable, resettable background tasks.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::trace;

/// A single-slot background task that cancels its predecessor when re-armed.
///
/// Arming replaces (aborts) whatever was previously armed, so re-triggering
/// a debounce or restarting a focus timer can never stack two timers.
/// Dropping the slot aborts the task, which is the teardown path: a
/// component that owns its `ResettableTask`s cannot leak timers.
#[derive(Debug, Default)]
pub struct ResettableTask {
    handle: Option<JoinHandle<()>>,
}

impl ResettableTask {
    /// Empty slot, nothing armed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `fut` after `delay`, cancelling any previously armed task.
    pub fn arm_after<F>(&mut self, delay: Duration, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fut.await;
        }));
    }

    /// Run `fut` immediately as the armed task, cancelling any predecessor.
    pub fn arm<F>(&mut self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(fut));
    }

    /// Abort the armed task, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                trace!("aborting armed task");
            }
            handle.abort();
        }
    }

    /// Whether a task is currently armed and not yet finished.
    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for ResettableTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn armed_task_fires_after_delay() {
        let fired = Arc::new(AtomicU32::new(0));
        let mut task = ResettableTask::new();

        let counter = Arc::clone(&fired);
        task.arm_after(Duration::from_millis(100), async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_cancels_predecessor() {
        let fired = Arc::new(AtomicU32::new(0));
        let mut task = ResettableTask::new();

        for _ in 0..3 {
            let counter = Arc::clone(&fired);
            task.arm_after(Duration::from_millis(100), async move {
                counter.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        tokio::time::sleep(Duration::from_millis(200)).await;
        // Only the last armed task survives to fire.
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_firing() {
        let fired = Arc::new(AtomicU32::new(0));
        let mut task = ResettableTask::new();

        let counter = Arc::clone(&fired);
        task.arm_after(Duration::from_millis(100), async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        task.cancel();

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(!task.is_armed());
    }
}
