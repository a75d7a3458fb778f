// src/menu/timer.rs

use std::time::Duration;

use tokio::task::JoinHandle;

/// A single cancellable pending timer.
///
/// Scheduling always cancels whatever was pending first, so at most one
/// timer per slot exists. Each schedule gets a new generation number; a
/// firing is only honoured by [`TimerSlot::complete`] if its generation is
/// still the current one, which discards firings that raced a cancel.
#[derive(Debug, Default)]
pub struct TimerSlot {
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `fire(generation)` after `delay` unless cancelled or rescheduled.
    pub fn schedule<F>(&mut self, delay: Duration, fire: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fire(generation);
        }));
        generation
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.handle.is_some()
    }

    /// Consumes a firing. Returns false for a stale generation.
    pub fn complete(&mut self, generation: u64) -> bool {
        if self.handle.is_some() && self.generation == generation {
            self.handle = None;
            true
        } else {
            false
        }
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}
