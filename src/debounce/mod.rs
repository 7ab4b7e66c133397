use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1500);

/// Delays a value until `delay` passes without a newer one.
///
/// Every `push` cancels the pending timer and starts a new one, so at most one
/// commit is outstanding. Timer messages carry the generation they were armed
/// for; one that lost the race against a cancel is dropped on receipt.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<(u64, T)>,
    rx: mpsc::UnboundedReceiver<(u64, T)>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            delay,
            generation: 0,
            pending: None,
            tx,
            rx,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Restarts the timer with `value` as the candidate commit.
    pub fn push(&mut self, value: T) {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        let delay = self.delay;
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send((generation, value));
        }));
    }

    /// Drops the pending commit, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Resolves with the next value that survived its quiet period.
    ///
    /// Cancel safe: a value is only taken off the channel when it is returned
    /// or discarded as stale.
    pub async fn next_commit(&mut self) -> Option<T> {
        loop {
            let (generation, value) = self.rx.recv().await?;
            if generation == self.generation && self.pending.is_some() {
                self.pending = None;
                return Some(value);
            }
        }
    }
}
