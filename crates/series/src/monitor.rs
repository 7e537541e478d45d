use crate::latest::LatestValueSource;
use sysinfo::System;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, info};

/// Live system signals published by [`spawn_monitor`].
#[derive(Debug, Clone)]
pub struct SystemFeeds {
    /// Average CPU load across all cores, `0.0 ..= 1.0`.
    pub cpu:    LatestValueSource,
    /// Fraction of RAM in use, `0.0 ..= 1.0`.
    pub memory: LatestValueSource,
}

/// Spawn a background Tokio task that samples the system every
/// `interval_ms` milliseconds and publishes the results into [`SystemFeeds`].
///
/// Sampling never runs on the scheduler's tick path.  The task stops once
/// every clone of both feeds has been dropped.
pub fn spawn_monitor(interval_ms: u64) -> SystemFeeds {
    let (cpu_tx, cpu_rx) = watch::channel(None);
    let (mem_tx, mem_rx) = watch::channel(None);
    let interval = Duration::from_millis(interval_ms.max(1));

    tokio::spawn(async move {
        let mut sys    = System::new_all();
        let mut ticker = time::interval(interval);
        info!("System monitor sampling every {interval:?}");

        loop {
            ticker.tick().await;
            sys.refresh_all();

            let cpu = cpu_fraction(&sys);
            let mem = fraction(sys.used_memory(), sys.total_memory());
            debug!(cpu, mem, "system sample");

            let cpu_gone = cpu_tx.send(Some(cpu)).is_err();
            let mem_gone = mem_tx.send(Some(mem)).is_err();
            if cpu_gone && mem_gone {
                info!("System monitor stopped: no readers left");
                break;
            }
        }
    });

    SystemFeeds {
        cpu:    LatestValueSource::new("cpu", cpu_rx),
        memory: LatestValueSource::new("memory", mem_rx),
    }
}

fn cpu_fraction(sys: &System) -> f64 {
    let cores: Vec<f32> = sys.cpus().iter().map(|c| c.cpu_usage()).collect();
    if cores.is_empty() {
        return 0.0;
    }
    let average = cores.iter().sum::<f32>() / cores.len() as f32;
    (f64::from(average) / 100.0).clamp(0.0, 1.0)
}

/// `used / total` in `[0, 1]`; an unknown total reads as idle.
fn fraction(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (used as f64 / total as f64).clamp(0.0, 1.0)
}
