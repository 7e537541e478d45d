use serde::Serialize;
use std::fmt;

/// Opaque identifier issued by the chart registry.
///
/// Handles increase monotonically and are never reused, so a chart that is
/// removed and registered again always comes back under a new handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ChartHandle(u64);

impl ChartHandle {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChartHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chart#{}", self.0)
    }
}
