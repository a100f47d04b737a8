//! Search debouncing.
//!
//! Each keystroke submits the current query. The callback runs only once the
//! input has been quiet for the debounce window; a newer submission cancels
//! the pending one, so the last query wins.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::ClientConfig;

/// Default quiet period before a search runs.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Delays a search until typing pauses.
#[derive(Debug)]
pub struct SearchDebouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE)
    }
}

impl SearchDebouncer {
    /// Create a debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Create a debouncer using the configured quiet period.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.search_debounce())
    }

    /// The quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `search(query)` after the quiet period, cancelling any
    /// search still waiting.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit<F, Fut>(&self, query: impl Into<String>, search: F)
    where
        F: FnOnce(String) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let query = query.into();
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            search(query).await;
        });

        let previous = self.lock().replace(handle);
        if let Some(previous) = previous {
            debug!("Superseded pending search");
            previous.abort();
        }
    }

    /// Cancel the pending search, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.lock().take() {
            previous.abort();
        }
    }

    /// Whether a search is waiting to run.
    pub fn is_pending(&self) -> bool {
        self.lock().as_ref().is_some_and(|h| !h.is_finished())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        // A panic while holding the lock leaves only a stale handle behind.
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn debouncer_with_channel() -> (SearchDebouncer, mpsc::UnboundedSender<String>, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (SearchDebouncer::default(), tx, rx)
    }

    fn submit(debouncer: &SearchDebouncer, tx: &mpsc::UnboundedSender<String>, query: &str) {
        let tx = tx.clone();
        debouncer.submit(query, move |q| async move {
            let _ = tx.send(q);
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_query_wins() {
        let (debouncer, tx, mut rx) = debouncer_with_channel();

        submit(&debouncer, &tx, "a");
        tokio::time::sleep(Duration::from_millis(100)).await;
        submit(&debouncer, &tx, "ab");
        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(rx.try_recv().is_err());
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(rx.recv().await.as_deref(), Some("ab"));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_quiet_input_runs_each_query() {
        let (debouncer, tx, mut rx) = debouncer_with_channel();

        submit(&debouncer, &tx, "ali");
        tokio::time::sleep(Duration::from_millis(400)).await;
        submit(&debouncer, &tx, "bob");
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(rx.recv().await.as_deref(), Some("ali"));
        assert_eq!(rx.recv().await.as_deref(), Some("bob"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let (debouncer, tx, mut rx) = debouncer_with_channel();

        submit(&debouncer, &tx, "a");
        debouncer.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_from_config() {
        let config = ClientConfig {
            search_debounce_ms: 150,
            ..Default::default()
        };
        assert_eq!(
            SearchDebouncer::from_config(&config).delay(),
            Duration::from_millis(150)
        );
        assert_eq!(SearchDebouncer::default().delay(), DEFAULT_SEARCH_DEBOUNCE);
    }
}
