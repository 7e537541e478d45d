use crate::chart_spec::ValueRange;
use serde::Serialize;
use std::fmt;

/// Renderer-agnostic description of what a chart should currently display.
///
/// Frames are plain data: producing one never performs I/O, and two frames
/// built from the same chart state compare equal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Frame {
    Line(LineFrame),
    Bar(BarFrame),
    Radar(RadarFrame),
}

impl Frame {
    pub fn kind(&self) -> ChartKind {
        match self {
            Self::Line(_)  => ChartKind::Line,
            Self::Bar(_)   => ChartKind::Bar,
            Self::Radar(_) => ChartKind::Radar,
        }
    }

    /// Plot title, if the frame carries one.
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Line(f)  => f.title.as_deref(),
            Self::Bar(f)   => Some(&f.title),
            Self::Radar(f) => Some(&f.title),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Radar,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Line  => "line",
            Self::Bar   => "bar",
            Self::Radar => "radar",
        })
    }
}

/// A cartesian axis with a fixed range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub label: Option<String>,
    pub range: ValueRange,
    /// Labelled tick positions.  Empty = let the host decide.
    pub ticks: Vec<f64>,
    /// Draw grid lines at the ticks.
    pub grid:  bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Time-series plot: x is the buffer position (oldest = 0).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineFrame {
    pub title:  Option<String>,
    pub x_axis: Axis,
    pub y_axis: Axis,
    /// One point per buffer slot, oldest first.  Values outside `y_axis.range`
    /// are passed through untouched; the host clips them.
    pub points: Vec<Point>,
}

/// Horizontal bars, one per category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarFrame {
    pub title:      String,
    pub value_axis: Axis,
    pub bars:       Vec<BarSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSegment {
    pub label:   String,
    /// Raw data value.
    pub value:   f64,
    /// Drawn length, clamped into the value axis range.
    pub length:  f64,
    /// `true` when `length != value`.
    pub clipped: bool,
}

/// Polar chart with one spoke per category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarFrame {
    pub title:   String,
    /// One entry per spoke, angles in radians.
    pub axes:    Vec<RadarAxis>,
    /// Closed outline: `axes.len() + 1` vertices, the last repeating the first.
    pub polygon: Vec<PolarPoint>,
    pub fill_opacity: f64,
    pub radial_ticks: Vec<f64>,
    /// Outer edge of the radial scale.
    pub radial_max:   f64,
    /// Where radial tick labels sit, in degrees.
    pub radial_label_angle: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarAxis {
    pub label: String,
    pub angle: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PolarPoint {
    pub angle:  f64,
    pub radius: f64,
}

impl PolarPoint {
    /// Cartesian position with the pole at the origin.
    pub fn to_cartesian(self) -> Point {
        Point {
            x: self.radius * self.angle.cos(),
            y: self.radius * self.angle.sin(),
        }
    }
}
