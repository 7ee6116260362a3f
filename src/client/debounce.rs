//! Coalesces bursts of calls, e.g. keystrokes, into the last one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Debug, Default)]
pub struct Debouncer {
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait `delay`; true if no later call to `settle` started in the meantime.
    pub async fn settle(&self, delay: Duration) -> bool {
        let mine = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(delay).await;
        self.generation.load(Ordering::SeqCst) == mine
    }
}
