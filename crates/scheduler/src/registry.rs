use deck_core::{ChartError, ChartHandle, Frame, Result};
use deck_widgets::ChartView;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// The set of active charts, in registration order.
///
/// Order decides which chart is updated and drawn first within a tick.
#[derive(Debug, Default)]
pub struct ChartRegistry {
    entries: Vec<Entry>,
    next_id: u64,
}

#[derive(Debug)]
struct Entry {
    handle: ChartHandle,
    chart:  ChartView,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chart; it takes part in every tick from now on.
    pub fn register(&mut self, chart: impl Into<ChartView>) -> ChartHandle {
        self.next_id += 1;
        let handle = ChartHandle::new(self.next_id);
        let chart = chart.into();
        debug!(%handle, chart = chart.title(), kind = %chart.kind(), "chart registered");
        self.entries.push(Entry { handle, chart });
        handle
    }

    /// Remove a chart and hand it back to the caller.
    pub fn deregister(&mut self, handle: ChartHandle) -> Result<ChartView> {
        let index = self
            .entries
            .iter()
            .position(|e| e.handle == handle)
            .ok_or(ChartError::UnknownChart(handle))?;
        let entry = self.entries.remove(index);
        debug!(%handle, chart = entry.chart.title(), "chart deregistered");
        Ok(entry.chart)
    }

    /// Remove every chart, returning them in registration order.
    pub fn drain(&mut self) -> Vec<(ChartHandle, ChartView)> {
        self.entries.drain(..).map(|e| (e.handle, e.chart)).collect()
    }

    pub fn get(&self, handle: ChartHandle) -> Option<&ChartView> {
        self.entries.iter().find(|e| e.handle == handle).map(|e| &e.chart)
    }

    pub fn get_mut(&mut self, handle: ChartHandle) -> Option<&mut ChartView> {
        self.entries
            .iter_mut()
            .find(|e| e.handle == handle)
            .map(|e| &mut e.chart)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn handles(&self) -> Vec<ChartHandle> {
        self.entries.iter().map(|e| e.handle).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChartHandle, &ChartView)> + '_ {
        self.entries.iter().map(|e| (e.handle, &e.chart))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ChartHandle, &mut ChartView)> + '_ {
        self.entries.iter_mut().map(|e| (e.handle, &mut e.chart))
    }

    /// One-shot render of a single chart, e.g. a static chart after refresh.
    pub fn render(&self, handle: ChartHandle) -> Result<Frame> {
        self.get(handle)
            .map(ChartView::render)
            .ok_or(ChartError::UnknownChart(handle))
    }

    /// Frames for every chart, live or static, in registry order.
    pub fn render_all(&self) -> Vec<(ChartHandle, Frame)> {
        self.iter().map(|(h, c)| (h, c.render())).collect()
    }
}

/// Shared, thread-safe access to a [`ChartRegistry`].
///
/// Ticks hold the lock for their whole pass, so membership changes made
/// through this handle always land between ticks, never inside one.
#[derive(Debug, Clone, Default)]
pub struct RegistryHandle(Arc<Mutex<ChartRegistry>>);

impl RegistryHandle {
    pub fn new(registry: ChartRegistry) -> Self {
        Self(Arc::new(Mutex::new(registry)))
    }

    /// Lock the registry.  A panic in an earlier holder cannot leave a chart
    /// half-updated, so a poisoned lock is simply taken over.
    pub fn lock(&self) -> MutexGuard<'_, ChartRegistry> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(&self, chart: impl Into<ChartView>) -> ChartHandle {
        self.lock().register(chart)
    }

    pub fn deregister(&self, handle: ChartHandle) -> Result<ChartView> {
        self.lock().deregister(handle)
    }

    pub fn render(&self, handle: ChartHandle) -> Result<Frame> {
        self.lock().render(handle)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
