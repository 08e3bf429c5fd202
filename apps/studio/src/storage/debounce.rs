//! Debounced persistence: coalesces rapid edits into one write after a quiet period.
//!
//! # Architecture
//! - `schedule` pushes the latest snapshot onto an unbounded queue and returns immediately.
//! - A single worker task holds the newest pending snapshot. Every new snapshot restarts
//!   the quiet-period timer; when the timer fires, only the newest snapshot is written.
//! - Closing the queue (`flush`) writes whatever is pending right away and ends the task.
//! - Save failures never stop editing. They are logged and published on a `watch`
//!   channel as an advisory, which the next successful save clears.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::models::ResumeDocument;
use crate::storage::DocumentStore;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

pub struct DebouncedSaver {
    tx: mpsc::UnboundedSender<ResumeDocument>,
    advisory: watch::Receiver<Option<String>>,
    worker: JoinHandle<()>,
}

impl DebouncedSaver {
    /// Starts the worker task. Must be called from within a tokio runtime.
    pub fn spawn(store: Arc<dyn DocumentStore>, quiet_period: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (advisory_tx, advisory) = watch::channel(None);
        let worker = tokio::spawn(run_worker(store, quiet_period, rx, advisory_tx));
        Self {
            tx,
            advisory,
            worker,
        }
    }

    /// Queues a snapshot for saving. Fire-and-forget.
    pub fn schedule(&self, doc: ResumeDocument) {
        if self.tx.send(doc).is_err() {
            warn!("Debounced saver is no longer running; snapshot dropped");
        }
    }

    /// The current persistence advisory, if the last save failed.
    pub fn advisory(&self) -> Option<String> {
        self.advisory.borrow().clone()
    }

    /// Writes any pending snapshot immediately and stops the worker.
    pub async fn flush(self) -> Option<String> {
        let DebouncedSaver {
            tx,
            advisory,
            worker,
        } = self;
        drop(tx);
        if let Err(e) = worker.await {
            warn!("Debounced saver task failed: {e}");
        }
        let last = advisory.borrow().clone();
        last
    }
}

async fn run_worker(
    store: Arc<dyn DocumentStore>,
    quiet_period: Duration,
    mut rx: mpsc::UnboundedReceiver<ResumeDocument>,
    advisory: watch::Sender<Option<String>>,
) {
    while let Some(mut pending) = rx.recv().await {
        let mut coalesced = 0usize;
        loop {
            tokio::select! {
                next = rx.recv() => match next {
                    Some(doc) => {
                        pending = doc;
                        coalesced += 1;
                    }
                    None => {
                        save(store.as_ref(), &pending, &advisory);
                        return;
                    }
                },
                _ = tokio::time::sleep(quiet_period) => {
                    debug!(coalesced, "quiet period elapsed; saving snapshot");
                    save(store.as_ref(), &pending, &advisory);
                    break;
                }
            }
        }
    }
}

fn save(store: &dyn DocumentStore, doc: &ResumeDocument, advisory: &watch::Sender<Option<String>>) {
    match store.save(doc) {
        Ok(()) => {
            advisory.send_replace(None);
        }
        Err(e) => {
            let (_, message) = e.advisory();
            warn!("Failed to persist resume: {e}");
            advisory.send_replace(Some(message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_template;
    use crate::storage::MemoryStore;

    fn doc_with_summary(summary: &str) -> ResumeDocument {
        let mut doc = default_template();
        doc.summary = summary.to_string();
        doc
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_edits_coalesce_into_one_save() {
        let store = Arc::new(MemoryStore::default());
        let saver = DebouncedSaver::spawn(store.clone(), DEFAULT_QUIET_PERIOD);

        for i in 0..5 {
            saver.schedule(doc_with_summary(&format!("Edit {i}.")));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(store.save_count(), 0, "still inside the quiet period");

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load().unwrap().unwrap().summary, "Edit 4.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_separated_edits_save_separately() {
        let store = Arc::new(MemoryStore::default());
        let saver = DebouncedSaver::spawn(store.clone(), DEFAULT_QUIET_PERIOD);

        saver.schedule(doc_with_summary("First."));
        tokio::time::sleep(Duration::from_millis(700)).await;
        saver.schedule(doc_with_summary("Second."));
        tokio::time::sleep(Duration::from_millis(700)).await;

        assert_eq!(store.save_count(), 2);
        assert_eq!(store.load().unwrap().unwrap().summary, "Second.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_writes_pending_snapshot_immediately() {
        let store = Arc::new(MemoryStore::default());
        let saver = DebouncedSaver::spawn(store.clone(), Duration::from_secs(60));

        saver.schedule(doc_with_summary("Pending."));
        let advisory = saver.flush().await;

        assert!(advisory.is_none());
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load().unwrap().unwrap().summary, "Pending.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_with_nothing_pending_does_not_save() {
        let store = Arc::new(MemoryStore::default());
        let saver = DebouncedSaver::spawn(store.clone(), DEFAULT_QUIET_PERIOD);
        saver.flush().await;
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_failure_becomes_advisory_and_recovers() {
        let store = Arc::new(MemoryStore::default());
        store.set_fail_saves(true);
        let saver = DebouncedSaver::spawn(store.clone(), DEFAULT_QUIET_PERIOD);

        saver.schedule(doc_with_summary("Lost."));
        tokio::time::sleep(Duration::from_millis(600)).await;
        let advisory = saver.advisory().unwrap();
        assert!(advisory.contains("Failed to save data"), "{advisory}");

        store.set_fail_saves(false);
        saver.schedule(doc_with_summary("Kept."));
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(saver.advisory().is_none());
        assert_eq!(store.save_count(), 1);
    }
}
