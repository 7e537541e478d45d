//! Wires the configured charts to the scheduler and keeps them running until
//! Ctrl-C, rebuilding the chart set whenever the config file changes.

use anyhow::Result;
use deck_config::{ConfigWatcher, DashboardConfig, OutputFormat, SourceKind};
use deck_core::{ChartHandle, ChartKind, Frame, RenderSink, TickReport};
use deck_renderer::{JsonSink, TextSink};
use deck_scheduler::{RefreshScheduler, RegistryHandle};
use deck_series::{spawn_monitor, BoxedSource, SystemFeeds, UniformSource};
use deck_widgets::{BarChart, ChartView, LineChart, RadarChart};
use std::io::{self, Stdout};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Stdout in the configured format.
enum Output {
    Text(TextSink<Stdout>),
    Json(JsonSink<Stdout>),
}

impl Output {
    fn new(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Self::Text(TextSink::new(io::stdout())),
            OutputFormat::Json => Self::Json(JsonSink::new(io::stdout())),
        }
    }
}

impl RenderSink for Output {
    fn present(&mut self, handle: ChartHandle, frame: &Frame) {
        match self {
            Self::Text(sink) => sink.present(handle, frame),
            Self::Json(sink) => sink.present(handle, frame),
        }
    }
}

struct Dashboard {
    registry: RegistryHandle,
    /// Started on first use by a `cpu` or `memory` chart, keyed by its
    /// sampling interval.
    feeds:    Option<(u64, SystemFeeds)>,
}

impl Dashboard {
    fn source(&mut self, kind: SourceKind, name: &str, monitor_interval_ms: u64) -> BoxedSource {
        match kind {
            SourceKind::Random => Box::new(UniformSource::new(name)),
            SourceKind::Cpu | SourceKind::Memory => {
                let feeds = self.monitor(monitor_interval_ms);
                if kind == SourceKind::Cpu {
                    Box::new(feeds.cpu.clone())
                } else {
                    Box::new(feeds.memory.clone())
                }
            }
        }
    }

    /// The running monitor, restarted if `interval_ms` changed.  The old
    /// one stops by itself once the charts reading it are dropped.
    fn monitor(&mut self, interval_ms: u64) -> &SystemFeeds {
        if self.feeds.as_ref().is_some_and(|(ms, _)| *ms != interval_ms) {
            info!("system monitor interval changed to {interval_ms}ms; restarting it");
            self.feeds = None;
        }
        let (_, feeds) = self
            .feeds
            .get_or_insert_with(|| (interval_ms, spawn_monitor(interval_ms)));
        feeds
    }

    /// Build every configured chart.  Nothing is registered unless all of
    /// them construct.
    fn build(&mut self, config: &DashboardConfig) -> Result<Vec<ChartView>> {
        let monitor_ms = config.global.monitor_interval_ms;
        let mut charts = Vec::new();

        for line in &config.line {
            let source = self.source(line.source, &line.spec.name, monitor_ms);
            charts.push(LineChart::new(line.spec.clone(), source)?.into());
        }
        if config.bar.enabled {
            let spec = config.bar.spec.clone();
            let chart = match &config.bar.values {
                Some(values) => BarChart::new(spec, values.clone())?,
                None => BarChart::random(spec)?,
            };
            charts.push(chart.into());
        }
        if config.radar.enabled {
            let spec = config.radar.spec.clone();
            let chart = match &config.radar.values {
                Some(values) => RadarChart::new(spec, values.clone())?,
                None => RadarChart::random(spec)?,
            };
            charts.push(chart.into());
        }
        Ok(charts)
    }

    /// Replace the registered charts with those from `config`, draw the
    /// static ones once, and start a scheduler for the live ones.
    fn install(
        &mut self,
        config: &DashboardConfig,
    ) -> Result<(RefreshScheduler, mpsc::Receiver<TickReport>)> {
        let charts = self.build(config)?;

        let removed = self.registry.lock().drain();
        if !removed.is_empty() {
            debug!("removed {} chart(s)", removed.len());
        }
        for chart in charts {
            self.registry.register(chart);
        }

        let mut statics = Output::new(config.global.output);
        for (handle, frame) in self.registry.lock().render_all() {
            if frame.kind() != ChartKind::Line {
                statics.present(handle, &frame);
            }
        }

        let mut scheduler = RefreshScheduler::new(
            self.registry.clone(),
            Output::new(config.global.output),
            config.global.refresh_interval_ms,
        )?;
        let reports = scheduler.start()?;
        info!("dashboard running with {} chart(s)", self.registry.len());
        Ok((scheduler, reports))
    }
}

pub async fn run(path: PathBuf, config: DashboardConfig) -> Result<()> {
    let mut dashboard = Dashboard { registry: RegistryHandle::default(), feeds: None };
    if config.is_empty() {
        warn!("no charts configured; waiting for '{}' to change", path.display());
    }
    let (mut scheduler, mut reports) = dashboard.install(&config)?;
    let (_watcher, mut changes) = ConfigWatcher::spawn(&path);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, shutting down");
                break;
            }

            Some(()) = changes.recv() => {
                let next = match deck_config::load(&path) {
                    Ok(next) => next,
                    Err(e) => {
                        warn!("keeping the current dashboard: {e}");
                        continue;
                    }
                };
                scheduler.stop().await?;
                (scheduler, reports) = dashboard.install(&next)?;
                info!("config reloaded from '{}'", path.display());
            }

            Some(report) = reports.recv() => {
                for fault in &report.faults {
                    debug!(tick = report.seq, chart = %fault.chart, "{}", fault.reason);
                }
            }
        }
    }

    scheduler.stop().await?;
    Ok(())
}
