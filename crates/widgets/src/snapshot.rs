use deck_core::{ChartError, Result};
use rand::Rng;

/// Labelled values of a static chart, one per category, with a staged
/// replacement that only lands on the next `update`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SnapshotVector {
    chart:   String,
    labels:  Vec<String>,
    values:  Vec<f64>,
    pending: Option<Vec<f64>>,
}

impl SnapshotVector {
    pub(crate) fn new(chart: &str, labels: Vec<String>, values: Vec<f64>) -> Result<Self> {
        check_len(chart, labels.len(), &values)?;
        Ok(Self {
            chart: chart.to_string(),
            labels,
            values,
            pending: None,
        })
    }

    pub(crate) fn labels(&self) -> &[String] {
        &self.labels
    }

    pub(crate) fn values(&self) -> &[f64] {
        &self.values
    }

    pub(crate) fn pairs(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.labels.iter().map(String::as_str).zip(self.values.iter().copied())
    }

    /// Stage `values` for the next `apply`.  A later call replaces an
    /// earlier one that has not been applied yet.
    pub(crate) fn supply(&mut self, values: Vec<f64>) -> Result<()> {
        check_len(&self.chart, self.labels.len(), &values)?;
        self.pending = Some(values);
        Ok(())
    }

    /// Swap in staged values.  Returns `false` when nothing was staged.
    pub(crate) fn apply(&mut self) -> bool {
        match self.pending.take() {
            Some(values) => {
                self.values = values;
                true
            }
            None => false,
        }
    }

    pub(crate) fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

fn check_len(chart: &str, categories: usize, values: &[f64]) -> Result<()> {
    if values.len() != categories {
        return Err(ChartError::category_count(
            chart,
            format!("{} values for {categories} categories", values.len()),
        ));
    }
    Ok(())
}

/// `count` random whole numbers in `lo..=hi`, as placeholder chart data.
pub(crate) fn random_whole(count: usize, lo: u32, hi: u32) -> Vec<f64> {
    let mut rng = rand::thread_rng();
    (0..count).map(|_| f64::from(rng.gen_range(lo..=hi))).collect()
}
