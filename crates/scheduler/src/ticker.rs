use deck_core::Tick;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

/// Spawn a background Tokio task that emits a [`Tick`] every `period`.
///
/// The channel holds a single tick, and a late tick is delayed rather than
/// bunched up: while the consumer is still busy the ticker waits, so a slow
/// tick pushes the next one back instead of overlapping it.
///
/// The task stops automatically when the receiver is dropped.
pub fn spawn_ticker(period: Duration) -> mpsc::Receiver<Tick> {
    let (tx, rx) = mpsc::channel(1);

    tokio::spawn(async move {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first `tick()` resolves immediately; consume it so the first
        // refresh lands one full period after start.
        interval.tick().await;

        let mut seq = 0;
        loop {
            interval.tick().await;
            seq += 1;
            if tx.send(Tick { seq }).await.is_err() {
                debug!("ticker stopped after {seq} ticks");
                break; // scheduler gone
            }
        }
    });

    rx
}
