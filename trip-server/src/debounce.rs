//! Last-call-wins task scheduling.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Default quiet period before a search-as-you-type lookup runs.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Runs a task after a quiet period, cancelling the previously scheduled one.
///
/// Scheduling aborts whatever is pending, including a task that has already
/// started waiting on I/O.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `task` after the quiet period unless another call supersedes it.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });

        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }

    /// Abort the pending task, if any.
    pub fn cancel(&self) {
        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = pending.take() {
            previous.abort();
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn only_last_call_runs() {
        let debouncer = Debouncer::default();
        let ran = Arc::new(Mutex::new(Vec::new()));

        for query in ["g", "ga", "gal", "gall"] {
            let ran = ran.clone();
            debouncer.schedule(async move {
                ran.lock().unwrap().push(query);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(*ran.lock().unwrap(), ["gall"]);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_quiet_period() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let ran = Arc::new(Mutex::new(false));

        let flag = ran.clone();
        debouncer.schedule(async move {
            *flag.lock().unwrap() = true;
        });

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(!*ran.lock().unwrap());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(*ran.lock().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_task() {
        let debouncer = Debouncer::default();
        let ran = Arc::new(Mutex::new(false));

        let flag = ran.clone();
        debouncer.schedule(async move {
            *flag.lock().unwrap() = true;
        });
        debouncer.cancel();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!*ran.lock().unwrap());
    }
}
