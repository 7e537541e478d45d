use deck_core::{
    Axis, AxisLabelMode, ChartError, Frame, LineFrame, LineSpec, Point, Result, SeedMode,
    ValueRange,
};
use deck_series::{BoxedSource, RollingBuffer};
use tracing::debug;

/// Live time-series chart over a fixed rolling window.
///
/// Each [`update`](Self::update) pulls one sample from the chart's source
/// and pushes it into the window; [`render`](Self::render) reads the window
/// without touching it.
#[derive(Debug)]
pub struct LineChart {
    spec:   LineSpec,
    source: BoxedSource,
    buffer: RollingBuffer<f64>,
}

impl LineChart {
    /// Build a chart and pre-fill its window according to `spec.seed`.
    pub fn new(spec: LineSpec, mut source: BoxedSource) -> Result<Self> {
        spec.validate()?;

        let buffer = match spec.seed {
            SeedMode::Zeros => RollingBuffer::new(spec.capacity, || 0.0)?,
            SeedMode::Source => RollingBuffer::new(spec.capacity, || {
                source.next_value().ok().filter(|v| v.is_finite()).unwrap_or(0.0)
            })?,
        };
        debug!(chart = %spec.name, capacity = spec.capacity, "line chart created");

        Ok(Self { spec, source, buffer })
    }

    pub fn spec(&self) -> &LineSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Name of the signal feeding this chart.
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Current window, oldest first.
    pub fn snapshot(&self) -> Vec<f64> {
        self.buffer.snapshot()
    }

    /// Advance the window by one sample.
    ///
    /// When the source has nothing (or yields a non-finite value) the window
    /// is left exactly as it was and the error is returned.
    pub fn update(&mut self) -> Result<()> {
        let value = self.source.next_value()?;
        if !value.is_finite() {
            return Err(ChartError::SourceUnavailable(self.source.name().to_string()));
        }
        self.buffer.push(value);
        Ok(())
    }

    pub fn render(&self) -> Frame {
        let spec = &self.spec;
        let (title, y_label) = match spec.label_mode {
            AxisLabelMode::AsTitle  => (Some(spec.name.clone()), spec.value_label.clone()),
            AxisLabelMode::AsYLabel => (None, spec.name.clone()),
        };

        let points = self
            .buffer
            .iter()
            .enumerate()
            .map(|(i, &y)| Point { x: i as f64, y })
            .collect();

        Frame::Line(LineFrame {
            title,
            x_axis: Axis {
                label: Some(spec.x_label.clone()),
                range: ValueRange::positions(self.buffer.capacity()),
                ticks: Vec::new(),
                grid:  spec.grid,
            },
            y_axis: Axis {
                label: Some(y_label),
                range: spec.value_range,
                ticks: spec.y_ticks.clone(),
                grid:  spec.grid,
            },
            points,
        })
    }
}
