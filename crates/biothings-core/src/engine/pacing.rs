//! Inter-batch pacing
//!
//! The pause owed after a live batch is recorded and only paid before the next
//! batch goes out, so the last batch of a call never incurs a trailing wait.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Pacer {
    delay: Duration,
    owed: bool,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, owed: false }
    }

    /// Record the outcome of a finished batch
    pub fn record(&mut self, from_cache: bool) {
        self.owed = !from_cache && !self.delay.is_zero();
    }

    /// Pause owed before the next batch, if any
    pub fn pending(&self) -> Option<Duration> {
        self.owed.then_some(self.delay)
    }

    fn take(&mut self) -> Option<Duration> {
        let pending = self.pending();
        self.owed = false;
        pending
    }

    /// Blocking wait for any owed pause
    pub fn wait(&mut self) {
        if let Some(delay) = self.take() {
            std::thread::sleep(delay);
        }
    }

    /// Cooperative wait for any owed pause
    pub async fn wait_async(&mut self) {
        if let Some(delay) = self.take() {
            tokio::time::sleep(delay).await;
        }
    }
}
