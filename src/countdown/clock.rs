use chrono::Utc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Ticks buffered per subscriber before it starts lagging
const TICK_BUFFER: usize = 16;

/// Current wall-clock time in epoch milliseconds
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// One ticking clock shared by every countdown on the page.
///
/// Each tick carries the wall-clock time in epoch milliseconds. Subscribers
/// get a broadcast receiver; the background task stops when the clock is
/// dropped.
pub struct SharedClock {
    tx: broadcast::Sender<i64>,
    task: JoinHandle<()>,
}

impl SharedClock {
    pub fn spawn(period: Duration) -> Self {
        Self::spawn_with_source(period, now_ms)
    }

    /// Same as `spawn`, reading time from `source` instead of the system clock.
    pub fn spawn_with_source(period: Duration, source: fn() -> i64) -> Self {
        let (tx, _) = broadcast::channel(TICK_BUFFER);
        let sender = tx.clone();

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                // No subscribers is fine; keep ticking for the next one
                let _ = sender.send(source());
            }
        });

        debug!("[clock] Started with period {:?}", period);
        Self { tx, task }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<i64> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Drop for SharedClock {
    fn drop(&mut self) {
        self.task.abort();
        debug!("[clock] Stopped");
    }
}
