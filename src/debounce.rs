use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

/// Quiet period after the last keystroke before a search is issued.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// A search text that stayed unchanged for the whole debounce window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledSearch {
    pub generation: u64,
    pub text: String,
}

/// Cancellable scheduled search.
///
/// At most one timer task is alive. Scheduling aborts the previous one, and
/// the generation counter lets the receiver drop a message that was already
/// sent before the abort landed. Dropping the debouncer aborts the pending
/// task.
pub struct SearchDebouncer {
    delay: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<SettledSearch>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<SettledSearch>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            delay,
            generation: 0,
            pending: None,
            tx,
        };
        (debouncer, rx)
    }

    /// Restart the timer for `text`. Must be called inside a tokio runtime.
    pub fn schedule(&mut self, text: String) {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        let delay = self.delay;
        let tx = self.tx.clone();
        trace!(generation, "search debounce scheduled");
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(SettledSearch { generation, text });
        }));
    }

    /// Abort the pending timer, if any. Anything it already sent becomes stale.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
            self.generation += 1;
            trace!("search debounce cancelled");
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Accept a settled search only if it belongs to the latest schedule.
    pub fn take_if_current(&mut self, settled: SettledSearch) -> Option<String> {
        if settled.generation != self.generation {
            trace!(got = settled.generation, want = self.generation, "stale settled search dropped");
            return None;
        }
        self.pending = None;
        Some(settled.text)
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Instant, sleep};

    #[tokio::test(start_paused = true)]
    async fn test_single_fetch_after_last_keystroke() {
        let (mut debouncer, mut rx) = SearchDebouncer::new(SEARCH_DEBOUNCE);
        let start = Instant::now();

        debouncer.schedule("h".to_string());
        sleep(Duration::from_millis(100)).await;
        debouncer.schedule("ha".to_string());
        sleep(Duration::from_millis(100)).await;
        debouncer.schedule("hal".to_string());
        sleep(Duration::from_millis(400)).await;
        assert!(rx.try_recv().is_err());
        debouncer.schedule("halo".to_string());

        let settled = rx.recv().await.unwrap();
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(1100), "fired early: {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(1110), "fired late: {:?}", elapsed);
        assert_eq!(debouncer.take_if_current(settled), Some("halo".to_string()));

        sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_fire() {
        let (mut debouncer, mut rx) = SearchDebouncer::new(SEARCH_DEBOUNCE);
        debouncer.schedule("doom".to_string());
        assert!(debouncer.is_pending());
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        sleep(Duration::from_secs(2)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_task() {
        let (mut debouncer, mut rx) = SearchDebouncer::new(SEARCH_DEBOUNCE);
        debouncer.schedule("quake".to_string());
        drop(debouncer);

        sleep(Duration::from_secs(2)).await;
        // Sender side is gone and nothing was sent.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_message_sent_before_reschedule_is_stale() {
        let (mut debouncer, mut rx) = SearchDebouncer::new(SEARCH_DEBOUNCE);
        debouncer.schedule("old".to_string());
        let settled = rx.recv().await.unwrap();

        debouncer.schedule("new".to_string());
        assert_eq!(debouncer.take_if_current(settled), None);

        let settled = rx.recv().await.unwrap();
        assert_eq!(debouncer.take_if_current(settled), Some("new".to_string()));
    }
}
