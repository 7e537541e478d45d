use deck_core::{ChartError, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::VecDeque;
use std::fmt;

/// Produces the next sample for one named signal.
///
/// Called once per scheduler tick per line chart, on the tick path, so
/// implementations must answer promptly.  Slow producers belong behind a
/// [`LatestValueSource`](crate::LatestValueSource).
pub trait SeriesSource: Send + fmt::Debug {
    /// Signal name used in logs and fault reports.
    fn name(&self) -> &str;

    /// Next sample, or [`ChartError::SourceUnavailable`] if there is none
    /// for this tick.
    fn next_value(&mut self) -> Result<f64>;
}

pub type BoxedSource = Box<dyn SeriesSource>;

/// Demo source: independent uniform samples in `[0, 1)`.
#[derive(Debug)]
pub struct UniformSource {
    name: String,
    rng:  StdRng,
}

impl UniformSource {
    /// Seeded from OS entropy.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), rng: StdRng::from_entropy() }
    }

    /// Reproducible sequence for a given `seed`.
    pub fn seeded(name: impl Into<String>, seed: u64) -> Self {
        Self { name: name.into(), rng: StdRng::seed_from_u64(seed) }
    }
}

impl SeriesSource for UniformSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_value(&mut self) -> Result<f64> {
        Ok(self.rng.gen::<f64>())
    }
}

/// Replays a fixed script.  `None` entries are outages; once the script is
/// used up every call reports the source as unavailable.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    name:   String,
    script: VecDeque<Option<f64>>,
}

impl ScriptedSource {
    pub fn new(name: impl Into<String>, script: impl IntoIterator<Item = Option<f64>>) -> Self {
        Self {
            name:   name.into(),
            script: script.into_iter().collect(),
        }
    }

    /// Script with no outages.
    pub fn from_values(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self::new(name, values.into_iter().map(Some))
    }

    /// Entries not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl SeriesSource for ScriptedSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_value(&mut self) -> Result<f64> {
        self.script
            .pop_front()
            .flatten()
            .ok_or_else(|| ChartError::SourceUnavailable(self.name.clone()))
    }
}
