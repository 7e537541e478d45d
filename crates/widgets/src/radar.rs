use crate::snapshot::{random_whole, SnapshotVector};
use deck_core::{Frame, PolarPoint, RadarAxis, RadarFrame, RadarSpec, Result};
use std::f64::consts::TAU;

/// Multi-axis radar (spider) chart.
///
/// Axis `i` of `n` sits at angle `2π·i/n`.  The outline is closed by
/// repeating the first vertex after the last, so a frame always carries
/// `n + 1` vertices.
#[derive(Debug, Clone)]
pub struct RadarChart {
    spec: RadarSpec,
    data: SnapshotVector,
}

impl RadarChart {
    /// Placeholder data range used when no values are configured.
    pub const RANDOM_RANGE: (u32, u32) = (50, 100);

    pub fn new(spec: RadarSpec, values: Vec<f64>) -> Result<Self> {
        spec.validate()?;
        let data = SnapshotVector::new(&spec.title, spec.categories.clone(), values)?;
        Ok(Self { spec, data })
    }

    /// Chart filled with random whole numbers in [`Self::RANDOM_RANGE`].
    pub fn random(spec: RadarSpec) -> Result<Self> {
        let (lo, hi) = Self::RANDOM_RANGE;
        let values = random_whole(spec.categories.len(), lo, hi);
        Self::new(spec, values)
    }

    pub fn spec(&self) -> &RadarSpec {
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
        let n = self.data.labels().len();
        let angle = |i: usize| TAU * i as f64 / n as f64;

        let axes: Vec<RadarAxis> = self
            .data
            .labels()
            .iter()
            .enumerate()
            .map(|(i, label)| RadarAxis { label: label.clone(), angle: angle(i) })
            .collect();

        // Negative and non-finite values collapse onto the pole.
        let mut polygon: Vec<PolarPoint> = self
            .data
            .values()
            .iter()
            .enumerate()
            .map(|(i, &v)| PolarPoint {
                angle:  angle(i),
                radius: if v.is_finite() { v.max(0.0) } else { 0.0 },
            })
            .collect();
        if let Some(&first) = polygon.first() {
            polygon.push(first);
        }

        let peak = self
            .spec
            .radial_ticks
            .iter()
            .chain(polygon.iter().map(|p| &p.radius))
            .copied()
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);

        Frame::Radar(RadarFrame {
            title: self.spec.title.clone(),
            axes,
            polygon,
            fill_opacity: self.spec.fill_opacity,
            radial_ticks: self.spec.radial_ticks.clone(),
            radial_max: if peak > 0.0 { peak } else { 1.0 },
            radial_label_angle: self.spec.radial_label_angle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::ChartError;

    fn radar(frame: Frame) -> RadarFrame {
        match frame {
            Frame::Radar(f) => f,
            other => panic!("expected a radar frame, got {:?}", other.kind()),
        }
    }

    fn five() -> RadarChart {
        RadarChart::new(RadarSpec::default(), vec![60.0, 70.0, 80.0, 90.0, 100.0]).unwrap()
    }

    #[test]
    fn five_axes_give_six_vertices() {
        let f = radar(five().render());
        assert_eq!(f.axes.len(), 5);
        assert_eq!(f.polygon.len(), 6);

        for i in 0..5 {
            let expected = TAU * i as f64 / 5.0;
            assert!((f.polygon[i].angle - expected).abs() < 1e-12);
            assert!((f.axes[i].angle - expected).abs() < 1e-12);
        }
        assert_eq!(f.polygon[5], f.polygon[0]);
        assert_eq!(f.axes[0].label, "Peak Value");
        assert_eq!(f.axes[4].label, "AUC");
    }

    #[test]
    fn defaults_carry_through_to_frame() {
        let f = radar(five().render());
        assert_eq!(f.title, "Radar Plot");
        assert_eq!(f.fill_opacity, 0.25);
        assert_eq!(f.radial_ticks, vec![25.0, 50.0, 75.0, 100.0]);
        assert_eq!(f.radial_label_angle, 90.0);
        assert_eq!(f.radial_max, 100.0);
    }

    #[test]
    fn radial_max_grows_with_data() {
        let chart = RadarChart::new(RadarSpec::default(), vec![10.0, 20.0, 140.0, 0.0, -5.0]).unwrap();
        let f = radar(chart.render());
        assert_eq!(f.radial_max, 140.0);
        assert_eq!(f.polygon[4].radius, 0.0);
    }

    #[test]
    fn degenerate_axis_counts_fail() {
        for n in 0..3 {
            let spec = RadarSpec {
                categories: (0..n).map(|i| format!("axis {i}")).collect(),
                ..RadarSpec::default()
            };
            let err = RadarChart::new(spec, vec![50.0; n]).unwrap_err();
            assert!(matches!(err, ChartError::InvalidCategoryCount { .. }));
        }
    }

    #[test]
    fn render_twice_is_identical() {
        let chart = RadarChart::random(RadarSpec::default()).unwrap();
        assert_eq!(chart.render(), chart.render());
    }

    #[test]
    fn refresh_replaces_values() {
        let mut chart = five();
        chart.supply(vec![1.0; 5]).unwrap();
        assert!(chart.has_pending());
        chart.update().unwrap();
        assert_eq!(chart.values(), &[1.0; 5]);
        assert!(chart.refresh(vec![1.0; 4]).is_err());
    }
}
