use crate::handle::ChartHandle;
use thiserror::Error;

/// Top-level error type used across every `deck-*` crate.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid capacity {0}: a rolling buffer needs at least one slot")]
    InvalidCapacity(usize),

    #[error("invalid category count for {chart}: {reason}")]
    InvalidCategoryCount { chart: String, reason: String },

    #[error("invalid value range [{min}, {max}]")]
    InvalidRange { min: f64, max: f64 },

    #[error("source '{0}' has no value for this tick")]
    SourceUnavailable(String),

    #[error("scheduler is already running")]
    SchedulerAlreadyRunning,

    #[error("scheduler is not running")]
    SchedulerNotRunning,

    #[error("no chart registered under {0}")]
    UnknownChart(ChartHandle),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ChartError {
    /// Shorthand for [`ChartError::InvalidCategoryCount`].
    pub fn category_count(chart: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCategoryCount {
            chart:  chart.into(),
            reason: reason.into(),
        }
    }

    /// `true` for faults that only affect a single tick of a single chart.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::SourceUnavailable(_))
    }
}

pub type Result<T, E = ChartError> = std::result::Result<T, E>;
