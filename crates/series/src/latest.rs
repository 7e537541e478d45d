use crate::source::SeriesSource;
use deck_core::{ChartError, Result};
use tokio::sync::watch;

/// Reads whatever sample a background producer published last.
///
/// This is the hand-off for producers that cannot answer within a tick:
/// they run on their own task and `send` into the paired [`watch::Sender`],
/// while the tick path only ever reads the most recent value.
#[derive(Debug, Clone)]
pub struct LatestValueSource {
    name: String,
    rx:   watch::Receiver<Option<f64>>,
}

impl LatestValueSource {
    pub fn new(name: impl Into<String>, rx: watch::Receiver<Option<f64>>) -> Self {
        Self { name: name.into(), rx }
    }

    /// Create a connected producer / source pair with no initial value.
    pub fn channel(name: impl Into<String>) -> (watch::Sender<Option<f64>>, Self) {
        let (tx, rx) = watch::channel(None);
        (tx, Self::new(name, rx))
    }

    fn unavailable(&self) -> ChartError {
        ChartError::SourceUnavailable(self.name.clone())
    }
}

impl SeriesSource for LatestValueSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_value(&mut self) -> Result<f64> {
        // `has_changed` only errors once the producer is gone.
        if self.rx.has_changed().is_err() {
            return Err(self.unavailable());
        }
        let latest = *self.rx.borrow_and_update();
        latest.ok_or_else(|| self.unavailable())
    }
}
