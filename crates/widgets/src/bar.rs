use crate::snapshot::{random_whole, SnapshotVector};
use deck_core::{Axis, BarFrame, BarSegment, BarSpec, Frame, Result};

/// Horizontal bar chart, one bar per category.
///
/// Not tick-driven: values change only when a new set is supplied and the
/// chart is updated.  Bars longer than the value axis are clipped to it.
#[derive(Debug, Clone)]
pub struct BarChart {
    spec: BarSpec,
    data: SnapshotVector,
}

impl BarChart {
    /// Placeholder data range used when no values are configured.
    pub const RANDOM_RANGE: (u32, u32) = (1, 10);

    pub fn new(spec: BarSpec, values: Vec<f64>) -> Result<Self> {
        spec.validate()?;
        let data = SnapshotVector::new(&spec.title, spec.categories.clone(), values)?;
        Ok(Self { spec, data })
    }

    /// Chart filled with random whole numbers in [`Self::RANDOM_RANGE`].
    pub fn random(spec: BarSpec) -> Result<Self> {
        let (lo, hi) = Self::RANDOM_RANGE;
        let values = random_whole(spec.categories.len(), lo, hi);
        Self::new(spec, values)
    }

    pub fn spec(&self) -> &BarSpec {
        &self.spec
    }

    pub fn title(&self) -> &str {
        &self.spec.title
    }

    pub fn values(&self) -> &[f64] {
        self.data.values()
    }

    pub fn has_pending(&self) -> bool {
        self.data.has_pending()
    }

    /// Stage new values; they show up after the next [`update`](Self::update).
    pub fn supply(&mut self, values: Vec<f64>) -> Result<()> {
        self.data.supply(values)
    }

    /// Apply staged values, if any.  A no-op otherwise.
    pub fn update(&mut self) -> Result<()> {
        self.data.apply();
        Ok(())
    }

    /// Replace the values immediately.
    pub fn refresh(&mut self, values: Vec<f64>) -> Result<()> {
        self.supply(values)?;
        self.update()
    }

    pub fn render(&self) -> Frame {
        let range = self.spec.value_range;
        let bars = self
            .data
            .pairs()
            .map(|(label, value)| {
                let length = range.clamp(value);
                BarSegment {
                    label: label.to_string(),
                    value,
                    length,
                    clipped: length != value,
                }
            })
            .collect();

        Frame::Bar(BarFrame {
            title: self.spec.title.clone(),
            value_axis: Axis {
                label: Some(self.spec.value_label.clone()),
                range,
                ticks: Vec::new(),
                grid:  self.spec.grid,
            },
            bars,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{ChartError, ValueRange};

    fn bars(frame: Frame) -> BarFrame {
        match frame {
            Frame::Bar(f) => f,
            other => panic!("expected a bar frame, got {:?}", other.kind()),
        }
    }

    #[test]
    fn in_range_values_render_unclipped() {
        let chart = BarChart::new(BarSpec::default(), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let f = bars(chart.render());

        assert_eq!(f.title, "Disease Bar Chart");
        assert_eq!(f.value_axis.range, ValueRange::new(0.0, 12.0).unwrap());
        assert_eq!(f.bars.len(), 4);
        assert_eq!(f.bars[2].label, "Disease 3");
        assert!(f.bars.iter().all(|b| b.length <= 12.0 && !b.clipped));
    }

    #[test]
    fn long_bar_is_clipped_to_axis_max() {
        let chart = BarChart::new(BarSpec::default(), vec![15.0, -2.0, f64::NAN, 12.0]).unwrap();
        let f = bars(chart.render());

        assert_eq!(f.bars[0].value, 15.0);
        assert_eq!(f.bars[0].length, 12.0);
        assert!(f.bars[0].clipped);
        assert_eq!(f.bars[1].length, 0.0);
        assert_eq!(f.bars[2].length, 0.0);
        assert!(f.bars[2].clipped);
        assert!(!f.bars[3].clipped);
    }

    #[test]
    fn mismatched_values_are_rejected() {
        let err = BarChart::new(BarSpec::default(), vec![1.0]).unwrap_err();
        assert!(matches!(err, ChartError::InvalidCategoryCount { .. }));

        let empty = BarSpec { categories: Vec::new(), ..BarSpec::default() };
        assert!(BarChart::new(empty, Vec::new()).is_err());
    }

    #[test]
    fn update_without_supply_is_a_no_op() {
        let mut chart = BarChart::new(BarSpec::default(), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let before = chart.render();
        chart.update().unwrap();
        assert_eq!(chart.render(), before);
    }

    #[test]
    fn supplied_values_land_on_update() {
        let mut chart = BarChart::new(BarSpec::default(), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        chart.supply(vec![4.0, 3.0, 2.0, 1.0]).unwrap();
        assert_eq!(chart.values(), &[1.0, 2.0, 3.0, 4.0]);

        chart.update().unwrap();
        assert_eq!(chart.values(), &[4.0, 3.0, 2.0, 1.0]);

        assert!(chart.refresh(vec![0.0; 3]).is_err());
        assert_eq!(chart.values(), &[4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn random_data_matches_categories() {
        let chart = BarChart::random(BarSpec::default()).unwrap();
        assert_eq!(chart.values().len(), 4);
        assert!(chart.values().iter().all(|v| (1.0..=10.0).contains(v)));
    }
}
