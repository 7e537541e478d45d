use deck_core::{ChartHandle, Frame, RenderSink};
use tokio::sync::mpsc;
use tracing::trace;

/// Forwards frames to another task, typically a UI thread.
///
/// Never blocks the tick: when the receiver falls behind the frame is
/// dropped, since the next tick supersedes it anyway.
pub struct ChannelSink {
    tx: mpsc::Sender<(ChartHandle, Frame)>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<(ChartHandle, Frame)>) -> Self {
        Self { tx }
    }

    /// A sink and the receiving end, holding up to `capacity` frames.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<(ChartHandle, Frame)>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

impl RenderSink for ChannelSink {
    fn present(&mut self, handle: ChartHandle, frame: &Frame) {
        if let Err(e) = self.tx.try_send((handle, frame.clone())) {
            trace!(%handle, "frame dropped: {e}");
        }
    }
}
