pub mod schema;
pub mod watcher;

pub use schema::{
    BarChartConfig, DashboardConfig, GlobalConfig, LineChartConfig, OutputFormat,
    RadarChartConfig, SourceKind,
};
pub use watcher::ConfigWatcher;

use deck_core::{ChartError, Result};
use std::path::{Path, PathBuf};

/// Load and validate the dashboard from a TOML file.  Returns
/// `DashboardConfig::default()` if the file doesn't exist, so the dashboard
/// always has something to show.
pub fn load(path: impl AsRef<Path>) -> Result<DashboardConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(DashboardConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| ChartError::Config(format!("cannot read '{}': {e}", path.display())))?;

    let config = parse(&raw)?;
    tracing::info!(
        "Loaded '{}': {} line chart(s), refresh every {}ms",
        path.display(),
        config.line.len(),
        config.global.refresh_interval_ms
    );
    Ok(config)
}

/// Parse and validate a dashboard from TOML text.
pub fn parse(raw: &str) -> Result<DashboardConfig> {
    let config: DashboardConfig =
        toml::from_str(raw).map_err(|e| ChartError::Config(format!("TOML parse error: {e}")))?;
    config.validate()?;
    Ok(config)
}

/// Render a dashboard back to TOML, e.g. to write out a starter file.
pub fn to_toml(config: &DashboardConfig) -> Result<String> {
    toml::to_string_pretty(config).map_err(|e| ChartError::Config(format!("TOML encode error: {e}")))
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("telemetry-deck").join("deck.toml")
}
