use crate::{bar::BarChart, line::LineChart, radar::RadarChart};
use deck_core::{ChartKind, Frame, Result};

/// Any chart the registry can hold.
///
/// Only line charts are live: the scheduler drives them every tick.  Bar and
/// radar charts render from their snapshot and change only when new values
/// are supplied.
#[derive(Debug)]
pub enum ChartView {
    Line(LineChart),
    Bar(BarChart),
    Radar(RadarChart),
}

impl ChartView {
    pub fn kind(&self) -> ChartKind {
        match self {
            Self::Line(_)  => ChartKind::Line,
            Self::Bar(_)   => ChartKind::Bar,
            Self::Radar(_) => ChartKind::Radar,
        }
    }

    /// Display name: the series name for line charts, the title otherwise.
    pub fn title(&self) -> &str {
        match self {
            Self::Line(c)  => c.name(),
            Self::Bar(c)   => c.title(),
            Self::Radar(c) => c.title(),
        }
    }

    /// `true` when the chart should be updated on every tick.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Line(_))
    }

    pub fn update(&mut self) -> Result<()> {
        match self {
            Self::Line(c)  => c.update(),
            Self::Bar(c)   => c.update(),
            Self::Radar(c) => c.update(),
        }
    }

    /// Pure: no I/O, and equal state gives an equal frame.
    pub fn render(&self) -> Frame {
        match self {
            Self::Line(c)  => c.render(),
            Self::Bar(c)   => c.render(),
            Self::Radar(c) => c.render(),
        }
    }

    pub fn as_line(&self) -> Option<&LineChart> {
        match self {
            Self::Line(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_bar_mut(&mut self) -> Option<&mut BarChart> {
        match self {
            Self::Bar(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_radar_mut(&mut self) -> Option<&mut RadarChart> {
        match self {
            Self::Radar(c) => Some(c),
            _ => None,
        }
    }
}

impl From<LineChart> for ChartView {
    fn from(chart: LineChart) -> Self {
        Self::Line(chart)
    }
}

impl From<BarChart> for ChartView {
    fn from(chart: BarChart) -> Self {
        Self::Bar(chart)
    }
}

impl From<RadarChart> for ChartView {
    fn from(chart: RadarChart) -> Self {
        Self::Radar(chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{BarSpec, LineSpec, RadarSpec, SeedMode};
    use deck_series::ScriptedSource;

    #[test]
    fn only_line_charts_are_live() {
        let spec = LineSpec { seed: SeedMode::Zeros, ..LineSpec::named("Model Confidence") };
        let line: ChartView =
            LineChart::new(spec, Box::new(ScriptedSource::new("conf", []))).unwrap().into();
        let bar: ChartView = BarChart::random(BarSpec::default()).unwrap().into();
        let radar: ChartView = RadarChart::random(RadarSpec::default()).unwrap().into();

        assert!(line.is_live());
        assert!(!bar.is_live());
        assert!(!radar.is_live());
        assert_eq!(line.title(), "Model Confidence");
        assert_eq!(bar.kind(), ChartKind::Bar);
        assert_eq!(radar.render().kind(), ChartKind::Radar);
    }

    #[test]
    fn static_update_goes_through_staged_values() {
        let mut view: ChartView =
            BarChart::new(BarSpec::default(), vec![1.0, 2.0, 3.0, 4.0]).unwrap().into();
        let before = view.render();
        view.update().unwrap();
        assert_eq!(view.render(), before);

        view.as_bar_mut().unwrap().supply(vec![9.0; 4]).unwrap();
        view.update().unwrap();
        assert_ne!(view.render(), before);
    }
}
