use crate::registry::RegistryHandle;
use crate::ticker::spawn_ticker;
use chrono::Utc;
use deck_core::{
    ChartError, ChartFault, ChartHandle, RenderSink, Result, Tick, TickOutcome, TickReport,
};
use deck_widgets::ChartView;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

/// Refresh period used when none is configured.
pub const DEFAULT_INTERVAL_MS: u64 = 100;

/// Reports buffered for the host before new ones are dropped.
const REPORT_BUFFER: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
}

/// Drives every live chart in a registry on a uniform tick.
///
/// Each tick updates and renders the live charts in registry order and hands
/// the frames to the render sink.  At most one tick runs at a time: the
/// runner processes ticks sequentially, and a [`tick`](Self::tick) call that
/// arrives while another is in flight is skipped.
///
/// ```no_run
/// # async fn demo(registry: deck_scheduler::RegistryHandle) -> deck_core::Result<()> {
/// let sink = |_handle, frame: &deck_core::Frame| println!("{:?}", frame.kind());
/// let mut scheduler = deck_scheduler::RefreshScheduler::new(registry, sink, 100)?;
/// let mut reports = scheduler.start()?;
/// while let Some(report) = reports.recv().await {
///     if report.seq == 50 { break; }
/// }
/// scheduler.stop().await?;
/// # Ok(()) }
/// ```
pub struct RefreshScheduler {
    engine:   Arc<TickEngine>,
    interval: Duration,
    runner:   Option<Runner>,
}

struct Runner {
    shutdown: oneshot::Sender<()>,
    task:     JoinHandle<()>,
    /// Cleared by the runner task as it exits, for whatever reason.
    active:   Arc<AtomicBool>,
}

impl Runner {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl RefreshScheduler {
    /// Build an idle scheduler.  Fails if `interval_ms` is zero.
    pub fn new(
        registry: RegistryHandle,
        sink: impl RenderSink + 'static,
        interval_ms: u64,
    ) -> Result<Self> {
        if interval_ms == 0 {
            return Err(ChartError::Config(
                "refresh_interval_ms must be positive".to_string(),
            ));
        }
        Ok(Self {
            engine: Arc::new(TickEngine {
                registry,
                sink:      Mutex::new(Box::new(sink)),
                in_flight: AtomicBool::new(false),
                completed: AtomicU64::new(0),
            }),
            interval: Duration::from_millis(interval_ms),
            runner: None,
        })
    }

    pub fn registry(&self) -> &RegistryHandle {
        &self.engine.registry
    }

    /// Add a chart.  While running, it joins from the next tick on.
    pub fn register(&self, chart: impl Into<ChartView>) -> ChartHandle {
        self.engine.registry.register(chart)
    }

    /// Remove a chart.  It receives no update after this returns.
    pub fn deregister(&self, handle: ChartHandle) -> Result<ChartView> {
        self.engine.registry.deregister(handle)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// `Running` while a runner is ticking.  A runner whose tick stream has
    /// ended counts as `Idle`.
    pub fn state(&self) -> SchedulerState {
        if self.runner.as_ref().is_some_and(Runner::is_active) {
            SchedulerState::Running
        } else {
            SchedulerState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == SchedulerState::Running
    }

    /// Ticks completed so far, across every start/stop cycle.
    pub fn ticks_completed(&self) -> u64 {
        self.engine.completed.load(Ordering::Acquire)
    }

    /// Run one tick right now, on the calling thread.
    pub fn tick(&self) -> TickOutcome {
        self.engine.tick()
    }

    /// Arm the built-in interval ticker and start ticking.
    ///
    /// Must be called from within a Tokio runtime.  Returns a receiver of
    /// per-tick reports; reports are dropped if the host falls behind.
    pub fn start(&mut self) -> Result<mpsc::Receiver<TickReport>> {
        if self.is_running() {
            return Err(ChartError::SchedulerAlreadyRunning);
        }
        let ticks = spawn_ticker(self.interval);
        self.start_with(ticks)
    }

    /// Start ticking from an arbitrary tick stream (a test clock, a vsync
    /// signal, ...).  The scheduler returns to `Idle` on its own if the
    /// stream ends.
    pub fn start_with(&mut self, ticks: mpsc::Receiver<Tick>) -> Result<mpsc::Receiver<TickReport>> {
        if self.is_running() {
            return Err(ChartError::SchedulerAlreadyRunning);
        }
        // A runner left over from an ended tick stream has already exited.
        self.runner = None;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let (report_tx, report_rx) = mpsc::channel(REPORT_BUFFER);
        let active = Arc::new(AtomicBool::new(true));
        let task = tokio::spawn(run(
            self.engine.clone(),
            ticks,
            shutdown_rx,
            report_tx,
            active.clone(),
        ));

        self.runner = Some(Runner { shutdown: shutdown_tx, task, active });
        info!(interval = ?self.interval, "scheduler started");
        Ok(report_rx)
    }

    /// Stop ticking.  A tick already in progress finishes first; no tick
    /// starts afterwards.  Calling this while idle changes nothing and
    /// reports [`ChartError::SchedulerNotRunning`].
    pub async fn stop(&mut self) -> Result<()> {
        let Some(runner) = self.runner.take().filter(Runner::is_active) else {
            return Err(ChartError::SchedulerNotRunning);
        };

        // The tick stream may end between the check above and this send.
        let _ = runner.shutdown.send(());
        if let Err(e) = runner.task.await {
            error!("scheduler runner ended abnormally: {e}");
        }

        info!(ticks = self.ticks_completed(), "scheduler stopped");
        Ok(())
    }
}

/// State shared between the scheduler and its runner task.
struct TickEngine {
    registry:  RegistryHandle,
    sink:      Mutex<Box<dyn RenderSink>>,
    in_flight: AtomicBool,
    completed: AtomicU64,
}

/// Clears the in-flight flag even if a chart or the sink panics.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl TickEngine {
    fn tick(&self) -> TickOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return TickOutcome::Skipped;
        }
        let _in_flight = InFlight(&self.in_flight);

        let started_at = Utc::now();
        let mut registry = self.registry.lock();
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);

        let mut rendered = 0;
        let mut faults = Vec::new();

        for (handle, chart) in registry.iter_mut().filter(|(_, c)| c.is_live()) {
            // A failed update leaves the chart as it was; it is still drawn.
            if let Err(e) = chart.update() {
                if e.is_transient() {
                    warn!(%handle, chart = chart.title(), "update skipped: {e}");
                } else {
                    error!(%handle, chart = chart.title(), "update failed: {e}");
                }
                faults.push(ChartFault {
                    handle,
                    chart:  chart.title().to_string(),
                    reason: e.to_string(),
                });
            }
            let frame = chart.render();
            sink.present(handle, &frame);
            rendered += 1;
        }

        let seq = self.completed.fetch_add(1, Ordering::AcqRel) + 1;
        trace!(seq, rendered, faults = faults.len(), "tick complete");

        TickOutcome::Completed(TickReport { seq, started_at, rendered, faults })
    }
}

async fn run(
    engine: Arc<TickEngine>,
    mut ticks: mpsc::Receiver<Tick>,
    mut shutdown: oneshot::Receiver<()>,
    reports: mpsc::Sender<TickReport>,
    active: Arc<AtomicBool>,
) {
    loop {
        tokio::select! {
            // Shutdown wins over a pending tick.
            biased;

            _ = &mut shutdown => break,

            tick = ticks.recv() => {
                let Some(tick) = tick else {
                    info!("tick source closed; scheduler runner exiting");
                    break;
                };

                // Synchronous: once started, a tick always runs to the end.
                match engine.tick() {
                    TickOutcome::Completed(report) => {
                        if reports.try_send(report).is_err() {
                            trace!(tick = tick.seq, "tick report dropped");
                        }
                    }
                    TickOutcome::Skipped => {
                        debug!(tick = tick.seq, "tick deferred: previous tick still in flight");
                    }
                }
            }
        }
    }
    // Before `reports` drops, so a host that sees the report channel close
    // also sees the scheduler as idle.
    active.store(false, Ordering::Release);
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{BarSpec, Frame, LineSpec, SeedMode};
    use deck_series::ScriptedSource;
    use deck_widgets::{BarChart, LineChart};

    type Presented = Arc<Mutex<Vec<(ChartHandle, Frame)>>>;

    fn recording_sink() -> (Presented, impl RenderSink + 'static) {
        let seen: Presented = Arc::default();
        let log = seen.clone();
        let sink = move |handle: ChartHandle, frame: &Frame| {
            log.lock().unwrap().push((handle, frame.clone()));
        };
        (seen, sink)
    }

    fn line(name: &str, capacity: usize, script: Vec<Option<f64>>) -> LineChart {
        let spec = LineSpec {
            capacity,
            seed: SeedMode::Zeros,
            ..LineSpec::named(name)
        };
        LineChart::new(spec, Box::new(ScriptedSource::new(name, script))).unwrap()
    }

    fn snapshot(scheduler: &RefreshScheduler, handle: ChartHandle) -> Vec<f64> {
        scheduler
            .registry()
            .lock()
            .get(handle)
            .and_then(ChartView::as_line)
            .map(LineChart::snapshot)
            .unwrap()
    }

    fn completed(outcome: TickOutcome) -> TickReport {
        match outcome {
            TickOutcome::Completed(report) => report,
            TickOutcome::Skipped => panic!("tick was skipped"),
        }
    }

    #[test]
    fn zero_interval_is_rejected() {
        let (_, sink) = recording_sink();
        assert!(RefreshScheduler::new(RegistryHandle::default(), sink, 0).is_err());
    }

    #[test]
    fn three_ticks_fill_the_tail_of_the_window() {
        let (seen, sink) = recording_sink();
        let scheduler = RefreshScheduler::new(RegistryHandle::default(), sink, 100).unwrap();
        let h = scheduler.register(line("pupil", 5, vec![Some(0.1), Some(0.2), Some(0.3)]));

        for _ in 0..3 {
            assert!(completed(scheduler.tick()).is_clean());
        }

        assert_eq!(snapshot(&scheduler, h), vec![0.0, 0.0, 0.1, 0.2, 0.3]);
        assert_eq!(seen.lock().unwrap().len(), 3);
        assert_eq!(scheduler.ticks_completed(), 3);
    }

    #[test]
    fn outage_on_tick_two_inserts_nothing() {
        let (_, sink) = recording_sink();
        let scheduler = RefreshScheduler::new(RegistryHandle::default(), sink, 100).unwrap();
        let h = scheduler.register(line("pupil", 5, vec![Some(0.1), None, Some(0.3)]));

        assert!(completed(scheduler.tick()).is_clean());
        let second = completed(scheduler.tick());
        assert_eq!(second.faults.len(), 1);
        assert_eq!(second.faults[0].handle, h);
        assert_eq!(second.rendered, 1);
        assert!(completed(scheduler.tick()).is_clean());

        assert_eq!(snapshot(&scheduler, h), vec![0.0, 0.0, 0.0, 0.1, 0.3]);
    }

    #[test]
    fn one_faulty_chart_does_not_block_its_siblings() {
        let (seen, sink) = recording_sink();
        let scheduler = RefreshScheduler::new(RegistryHandle::default(), sink, 100).unwrap();
        let broken = scheduler.register(line("camera", 3, vec![None]));
        let healthy = scheduler.register(line("confidence", 3, vec![Some(0.7)]));

        let report = completed(scheduler.tick());
        assert_eq!(report.rendered, 2);
        assert_eq!(report.faults.len(), 1);
        assert_eq!(report.faults[0].chart, "camera");
        assert_eq!(snapshot(&scheduler, healthy), vec![0.0, 0.0, 0.7]);
        assert_eq!(snapshot(&scheduler, broken), vec![0.0, 0.0, 0.0]);

        let order: Vec<ChartHandle> = seen.lock().unwrap().iter().map(|(h, _)| *h).collect();
        assert_eq!(order, vec![broken, healthy]);
    }

    #[test]
    fn static_charts_are_not_tick_driven() {
        let (seen, sink) = recording_sink();
        let scheduler = RefreshScheduler::new(RegistryHandle::default(), sink, 100).unwrap();
        scheduler.register(BarChart::new(BarSpec::default(), vec![1.0, 2.0, 3.0, 4.0]).unwrap());

        let report = completed(scheduler.tick());
        assert_eq!(report.rendered, 0);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn deregistered_chart_gets_no_more_updates() {
        let (seen, sink) = recording_sink();
        let scheduler = RefreshScheduler::new(RegistryHandle::default(), sink, 100).unwrap();
        let h = scheduler.register(line("fps", 3, vec![Some(0.5), Some(0.6), Some(0.7)]));

        scheduler.tick();
        let removed = scheduler.deregister(h).unwrap();
        scheduler.tick();
        scheduler.tick();

        assert_eq!(removed.as_line().unwrap().snapshot(), vec![0.0, 0.0, 0.5]);
        assert_eq!(seen.lock().unwrap().iter().filter(|(x, _)| *x == h).count(), 1);

        // A fresh chart with the same spec starts from its seed, under a new handle.
        let again = scheduler.register(line("fps", 3, vec![]));
        assert_ne!(again, h);
        assert_eq!(snapshot(&scheduler, again), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn tick_during_tick_is_skipped() {
        let (_, sink) = recording_sink();
        let scheduler = RefreshScheduler::new(RegistryHandle::default(), sink, 100).unwrap();
        let h = scheduler.register(line("pupil", 2, vec![Some(1.0)]));

        scheduler.engine.in_flight.store(true, Ordering::Release);
        assert_eq!(scheduler.tick(), TickOutcome::Skipped);
        assert_eq!(snapshot(&scheduler, h), vec![0.0, 0.0]);

        scheduler.engine.in_flight.store(false, Ordering::Release);
        assert!(matches!(scheduler.tick(), TickOutcome::Completed(_)));
        assert_eq!(snapshot(&scheduler, h), vec![0.0, 1.0]);
    }

    #[tokio::test]
    async fn stop_when_idle_is_reported_and_harmless() {
        let (_, sink) = recording_sink();
        let mut scheduler = RefreshScheduler::new(RegistryHandle::default(), sink, 100).unwrap();
        assert!(matches!(scheduler.stop().await, Err(ChartError::SchedulerNotRunning)));
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[tokio::test]
    async fn runner_drives_charts_from_injected_ticks() {
        let (_, sink) = recording_sink();
        let mut scheduler = RefreshScheduler::new(RegistryHandle::default(), sink, 100).unwrap();
        let h = scheduler.register(line("pupil", 5, vec![Some(0.1), None, Some(0.3)]));

        let (tick_tx, tick_rx) = mpsc::channel(4);
        let mut reports = scheduler.start_with(tick_rx).unwrap();
        assert!(scheduler.is_running());
        assert!(matches!(scheduler.start(), Err(ChartError::SchedulerAlreadyRunning)));

        for seq in 1..=3 {
            tick_tx.send(Tick { seq }).await.unwrap();
            let report = reports.recv().await.unwrap();
            assert_eq!(report.seq, seq);
            assert_eq!(report.faults.len(), usize::from(seq == 2));
        }

        scheduler.stop().await.unwrap();
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(snapshot(&scheduler, h), vec![0.0, 0.0, 0.0, 0.1, 0.3]);

        // Ticks sent after stop are never processed.
        let _ = tick_tx.send(Tick { seq: 4 }).await;
        assert_eq!(scheduler.ticks_completed(), 3);
        assert!(matches!(scheduler.stop().await, Err(ChartError::SchedulerNotRunning)));
    }

    #[tokio::test]
    async fn registration_while_running_joins_next_tick() {
        let (_, sink) = recording_sink();
        let mut scheduler = RefreshScheduler::new(RegistryHandle::default(), sink, 100).unwrap();
        let (tick_tx, tick_rx) = mpsc::channel(4);
        let mut reports = scheduler.start_with(tick_rx).unwrap();

        tick_tx.send(Tick { seq: 1 }).await.unwrap();
        assert_eq!(reports.recv().await.unwrap().rendered, 0);

        let h = scheduler.register(line("late", 2, vec![Some(0.9)]));
        tick_tx.send(Tick { seq: 2 }).await.unwrap();
        assert_eq!(reports.recv().await.unwrap().rendered, 1);

        scheduler.stop().await.unwrap();
        assert_eq!(snapshot(&scheduler, h), vec![0.0, 0.9]);
    }

    #[tokio::test]
    async fn closed_tick_source_ends_the_runner() {
        let (_, sink) = recording_sink();
        let mut scheduler = RefreshScheduler::new(RegistryHandle::default(), sink, 100).unwrap();
        let (tick_tx, tick_rx) = mpsc::channel(1);
        let mut reports = scheduler.start_with(tick_rx).unwrap();

        drop(tick_tx);
        assert!(reports.recv().await.is_none());
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert!(matches!(scheduler.stop().await, Err(ChartError::SchedulerNotRunning)));
    }

    #[tokio::test]
    async fn scheduler_restarts_after_its_tick_source_closed() {
        let (_, sink) = recording_sink();
        let mut scheduler = RefreshScheduler::new(RegistryHandle::default(), sink, 100).unwrap();
        let h = scheduler.register(line("pupil", 3, vec![Some(0.4), Some(0.8)]));

        let (tick_tx, tick_rx) = mpsc::channel(1);
        let mut reports = scheduler.start_with(tick_rx).unwrap();
        tick_tx.send(Tick { seq: 1 }).await.unwrap();
        assert_eq!(reports.recv().await.unwrap().seq, 1);
        drop(tick_tx);
        assert!(reports.recv().await.is_none());
        assert!(!scheduler.is_running());

        let (tick_tx, tick_rx) = mpsc::channel(1);
        let mut reports = scheduler.start_with(tick_rx).unwrap();
        assert_eq!(scheduler.state(), SchedulerState::Running);
        tick_tx.send(Tick { seq: 1 }).await.unwrap();
        assert_eq!(reports.recv().await.unwrap().seq, 2);

        scheduler.stop().await.unwrap();
        assert_eq!(snapshot(&scheduler, h), vec![0.0, 0.4, 0.8]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn stop_waits_for_the_tick_in_progress() {
        let (entered_tx, mut entered) = mpsc::unbounded_channel::<ChartHandle>();
        let (release, release_rx) = std::sync::mpsc::channel::<()>();
        let sink = move |handle: ChartHandle, _: &Frame| {
            let _ = entered_tx.send(handle);
            let _ = release_rx.recv();
        };

        let mut scheduler = RefreshScheduler::new(RegistryHandle::default(), sink, 100).unwrap();
        let h = scheduler.register(line("pupil", 3, vec![Some(0.5), Some(0.6)]));
        let (tick_tx, tick_rx) = mpsc::channel(2);
        let _reports = scheduler.start_with(tick_rx).unwrap();

        tick_tx.send(Tick { seq: 1 }).await.unwrap();
        assert_eq!(entered.recv().await, Some(h));

        // The runner is parked inside the sink: a second tick cannot start.
        assert_eq!(scheduler.tick(), TickOutcome::Skipped);
        tick_tx.send(Tick { seq: 2 }).await.unwrap();

        let stopping = tokio::spawn(async move {
            let stopped = scheduler.stop().await;
            (scheduler, stopped)
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!stopping.is_finished());

        release.send(()).unwrap();
        let (scheduler, stopped) =
            tokio::time::timeout(Duration::from_secs(5), stopping).await.unwrap().unwrap();
        stopped.unwrap();

        assert_eq!(scheduler.ticks_completed(), 1);
        assert_eq!(snapshot(&scheduler, h), vec![0.0, 0.0, 0.5]);
        assert!(entered.try_recv().is_err());
    }

    #[tokio::test]
    async fn interval_ticker_keeps_ticking_until_stopped() {
        let (_, sink) = recording_sink();
        let mut scheduler = RefreshScheduler::new(RegistryHandle::default(), sink, 5).unwrap();
        let h = scheduler.register(line("cpu", 4, vec![Some(0.1), Some(0.2)]));
        let mut reports = scheduler.start().unwrap();

        let first = tokio::time::timeout(Duration::from_secs(5), reports.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.seq, 1);

        scheduler.stop().await.unwrap();
        let done = scheduler.ticks_completed();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(scheduler.ticks_completed(), done);
        assert_eq!(snapshot(&scheduler, h).len(), 4);
    }
}
