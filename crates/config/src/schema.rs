use deck_core::{AxisLabelMode, BarSpec, ChartError, LineSpec, RadarSpec, Result};
use serde::{Deserialize, Serialize};

/// Root configuration structure parsed from `deck.toml`.
///
/// ```toml
/// [global]
/// refresh_interval_ms = 100
///
/// [[line]]
/// name   = "CPU"
/// source = "cpu"
///
/// [bar]
/// values = [3, 7, 2, 11]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub global: GlobalConfig,
    /// Live charts, drawn top to bottom.
    pub line: Vec<LineChartConfig>,
    pub bar: BarChartConfig,
    pub radar: RadarChartConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            global: GlobalConfig::default(),
            line: ["Camera FPS", "Model Confidence", "Pupil Size"]
                .into_iter()
                .map(|name| LineChartConfig::new(name, SourceKind::Random))
                .collect(),
            bar: BarChartConfig::default(),
            radar: RadarChartConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Check everything that would otherwise fail at chart construction.
    pub fn validate(&self) -> Result<()> {
        if self.global.refresh_interval_ms == 0 {
            return Err(ChartError::Config("refresh_interval_ms must be positive".into()));
        }
        if self.global.monitor_interval_ms == 0 {
            return Err(ChartError::Config("monitor_interval_ms must be positive".into()));
        }
        for chart in &self.line {
            chart.spec.validate()?;
        }
        if self.bar.enabled {
            self.bar.spec.validate()?;
            check_len(&self.bar.spec.title, self.bar.spec.categories.len(), self.bar.values.as_deref())?;
        }
        if self.radar.enabled {
            self.radar.spec.validate()?;
            check_len(&self.radar.spec.title, self.radar.spec.categories.len(), self.radar.values.as_deref())?;
        }
        Ok(())
    }

    /// `true` when the dashboard would render nothing at all.
    pub fn is_empty(&self) -> bool {
        self.line.is_empty() && !self.bar.enabled && !self.radar.enabled
    }
}

fn check_len(chart: &str, categories: usize, values: Option<&[f64]>) -> Result<()> {
    match values {
        Some(v) if v.len() != categories => Err(ChartError::category_count(
            chart,
            format!("{} values for {categories} categories", v.len()),
        )),
        _ => Ok(()),
    }
}

/// Dashboard-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Period of the live chart refresh, in milliseconds.
    pub refresh_interval_ms: u64,
    /// How often the system monitor samples CPU and memory.
    pub monitor_interval_ms: u64,
    pub output: OutputFormat,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 100,
            monitor_interval_ms: 1000,
            output:              OutputFormat::Text,
        }
    }
}

/// How the demo host prints frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON object per frame.
    Json,
}

/// Where a line chart's samples come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Uniform noise in `[0, 1)`.
    #[default]
    Random,
    /// Average CPU load.
    Cpu,
    /// Fraction of RAM in use.
    Memory,
}

/// One `[[line]]` entry: the chart spec plus its sample source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineChartConfig {
    #[serde(flatten)]
    pub spec: LineSpec,
    #[serde(default)]
    pub source: SourceKind,
}

impl LineChartConfig {
    pub fn new(name: impl Into<String>, source: SourceKind) -> Self {
        Self {
            spec: LineSpec {
                label_mode: AxisLabelMode::AsTitle,
                ..LineSpec::named(name)
            },
            source,
        }
    }
}

/// The `[bar]` table.  Without `values` the chart shows random placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChartConfig {
    #[serde(default = "enabled")]
    pub enabled: bool,
    #[serde(flatten)]
    pub spec: BarSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f64>>,
}

impl Default for BarChartConfig {
    fn default() -> Self {
        Self { enabled: true, spec: BarSpec::default(), values: None }
    }
}

/// The `[radar]` table.  Without `values` the chart shows random placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarChartConfig {
    #[serde(default = "enabled")]
    pub enabled: bool,
    #[serde(flatten)]
    pub spec: RadarSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f64>>,
}

impl Default for RadarChartConfig {
    fn default() -> Self {
        Self { enabled: true, spec: RadarSpec::default(), values: None }
    }
}

fn enabled() -> bool {
    true
}
