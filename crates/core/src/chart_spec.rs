//! Construction-time chart configuration.
//!
//! Every spec type deserializes straight out of the dashboard TOML file and
//! is read-only once a chart has been built from it.

use crate::error::{ChartError, Result};
use serde::{Deserialize, Serialize};

/// A fixed `[min, max]` axis range.  Serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct ValueRange {
    min: f64,
    max: f64,
}

impl ValueRange {
    /// Build a range, rejecting non-finite bounds and `min >= max`.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(ChartError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Axis covering buffer positions `0 ..= len - 1`.  A single position
    /// gets a unit-wide span centred on it.
    pub fn positions(len: usize) -> Self {
        if len <= 1 {
            return Self { min: -0.5, max: 0.5 };
        }
        Self { min: 0.0, max: (len - 1) as f64 }
    }

    pub const fn min(self) -> f64 {
        self.min
    }

    pub const fn max(self) -> f64 {
        self.max
    }

    /// Clamp `value` into the range.  Non-finite values land on `min`.
    #[must_use]
    pub fn clamp(self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl TryFrom<[f64; 2]> for ValueRange {
    type Error = ChartError;

    fn try_from([min, max]: [f64; 2]) -> Result<Self> {
        Self::new(min, max)
    }
}

impl From<ValueRange> for [f64; 2] {
    fn from(range: ValueRange) -> Self {
        [range.min, range.max]
    }
}

/// Where a line chart shows its series name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AxisLabelMode {
    /// Name as the plot title; the y-axis reads "Value".
    #[serde(rename = "title")]
    AsTitle,
    /// No plot title; the name labels the y-axis.
    #[default]
    #[serde(rename = "y-label")]
    AsYLabel,
}

/// How a line chart's rolling buffer is pre-filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SeedMode {
    /// Every slot starts at `0.0`.
    Zeros,
    /// Every slot is pulled from the chart's own source.
    #[default]
    Source,
}

/// Configuration for a live line chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineSpec {
    /// Series name, e.g. `"Camera FPS"`.
    pub name: String,
    /// Number of samples kept in the rolling window.
    pub capacity: usize,
    /// Fixed y-axis range.
    pub value_range: ValueRange,
    /// Labelled y-axis ticks.
    pub y_ticks: Vec<f64>,
    pub label_mode: AxisLabelMode,
    pub x_label: String,
    /// y-axis label used when the name goes in the title.
    pub value_label: String,
    pub grid: bool,
    pub seed: SeedMode,
}

impl Default for LineSpec {
    fn default() -> Self {
        Self {
            name:        String::new(),
            capacity:    100,
            value_range: ValueRange { min: 0.0, max: 1.5 },
            y_ticks:     vec![0.5, 1.0, 1.5],
            label_mode:  AxisLabelMode::default(),
            x_label:     "Time".to_string(),
            value_label: "Value".to_string(),
            grid:        true,
            seed:        SeedMode::default(),
        }
    }
}

impl LineSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(ChartError::InvalidCapacity(self.capacity));
        }
        if self.y_ticks.iter().any(|t| !t.is_finite()) {
            return Err(ChartError::Config(format!(
                "line chart '{}' has a non-finite y tick",
                self.name
            )));
        }
        Ok(())
    }
}

/// Configuration for the horizontal categorical bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarSpec {
    pub title: String,
    /// One bar per label, top to bottom.
    pub categories: Vec<String>,
    /// Fixed value-axis range; longer bars are clipped to it.
    pub value_range: ValueRange,
    pub value_label: String,
    pub grid: bool,
}

impl Default for BarSpec {
    fn default() -> Self {
        Self {
            title:       "Disease Bar Chart".to_string(),
            categories:  (1..=4).map(|i| format!("Disease {i}")).collect(),
            value_range: ValueRange { min: 0.0, max: 12.0 },
            value_label: "Value".to_string(),
            grid:        true,
        }
    }
}

impl BarSpec {
    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(ChartError::category_count(
                &self.title,
                "a bar chart needs at least one category",
            ));
        }
        Ok(())
    }
}

/// Configuration for the multi-axis radar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarSpec {
    pub title: String,
    /// One axis per label, counter-clockwise from angle 0.
    pub categories: Vec<String>,
    /// Opacity of the filled polygon, `0.0 ..= 1.0`.
    pub fill_opacity: f64,
    /// Radial grid gradations.
    pub radial_ticks: Vec<f64>,
    /// Angle (degrees) where radial tick labels are drawn.
    pub radial_label_angle: f64,
}

impl Default for RadarSpec {
    fn default() -> Self {
        Self {
            title: "Radar Plot".to_string(),
            categories: ["Peak Value", "Valley Time", "Baseline", "Recovery Time (s)", "AUC"]
                .into_iter()
                .map(String::from)
                .collect(),
            fill_opacity:       0.25,
            radial_ticks:       vec![25.0, 50.0, 75.0, 100.0],
            radial_label_angle: 90.0,
        }
    }
}

impl RadarSpec {
    /// Fewest axes that still enclose an area.
    pub const MIN_AXES: usize = 3;

    pub fn validate(&self) -> Result<()> {
        if self.categories.len() < Self::MIN_AXES {
            return Err(ChartError::category_count(
                &self.title,
                format!(
                    "a radar chart needs at least {} axes, got {}",
                    Self::MIN_AXES,
                    self.categories.len()
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.fill_opacity) {
            return Err(ChartError::Config(format!(
                "radar '{}' fill_opacity {} is outside 0..=1",
                self.title, self.fill_opacity
            )));
        }
        Ok(())
    }
}
