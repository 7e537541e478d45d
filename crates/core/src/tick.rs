use crate::handle::ChartHandle;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One scheduled invocation of the refresh cycle.
///
/// Produced by a ticker (or a test) and consumed by the scheduler runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Monotonic count assigned by the ticker, starting at 1.
    pub seq: u64,
}

/// A chart that failed to update during a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartFault {
    pub handle: ChartHandle,
    /// Chart title, for log lines.
    pub chart:  String,
    pub reason: String,
}

/// Summary of one completed tick, reported to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    /// Number of ticks this scheduler has completed, including this one.
    pub seq:        u64,
    pub started_at: DateTime<Utc>,
    /// Frames forwarded to the render sink.
    pub rendered:   usize,
    pub faults:     Vec<ChartFault>,
}

impl TickReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }
}

/// Result of asking the scheduler to run a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Completed(TickReport),
    /// Another tick was still in flight; this one did nothing.
    Skipped,
}
