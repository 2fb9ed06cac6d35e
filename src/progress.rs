use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Locally simulated progress: a timer that ramps a percentage toward a
/// ceiling while a request is outstanding. Purely cosmetic; it has no causal
/// relationship to the request it decorates. Completion (100%) is only ever
/// signaled externally, once the real response has arrived.
pub struct ProgressSimulator {
    percent: Arc<AtomicU8>,
    task: Option<JoinHandle<()>>,
}

impl ProgressSimulator {
    /// Spawns the timer task. Each tick adds `step_percent`, saturating at
    /// `ceiling` (clamped to 99 so the simulator can never claim completion).
    /// `on_tick` receives every published value.
    pub fn start<F>(step_percent: u8, tick_interval: Duration, ceiling: u8, on_tick: F) -> Self
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        let percent = Arc::new(AtomicU8::new(0));
        let ceiling = ceiling.min(99);
        let step = step_percent.max(1);

        let task = tokio::spawn({
            let percent = percent.clone();
            async move {
                let mut ticker = tokio::time::interval(tick_interval);
                // The first interval tick fires immediately; skip it so the
                // display starts from zero.
                ticker.tick().await;
                on_tick(0);
                loop {
                    ticker.tick().await;
                    let current = percent.load(Ordering::Relaxed);
                    let next = current.saturating_add(step).min(ceiling);
                    percent.store(next, Ordering::Relaxed);
                    on_tick(next);
                    if next >= ceiling {
                        // Hold at the ceiling; no further timer work needed.
                        break;
                    }
                }
            }
        });

        Self {
            percent,
            task: Some(task),
        }
    }

    pub fn percent(&self) -> u8 {
        self.percent.load(Ordering::Relaxed)
    }

    /// Cancels the timer and waits for the task to wind down, so no tick can
    /// land after settlement is displayed. Consuming the handle makes
    /// "stopped exactly once" structural. Returns the last published value.
    pub async fn stop(mut self) -> u8 {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
        self.percent.load(Ordering::Relaxed)
    }
}

impl Drop for ProgressSimulator {
    // A dropped simulator must not leave its timer running.
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
