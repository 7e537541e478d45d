use crate::{frame::Frame, handle::ChartHandle};

/// Host capability that turns [`Frame`]s into something visible.
///
/// The scheduler calls `present` once per rendered chart per tick, in
/// registry order.  Implementations must return promptly: they run inside
/// the tick and delay every chart after them.
pub trait RenderSink: Send {
    fn present(&mut self, handle: ChartHandle, frame: &Frame);
}

impl<F> RenderSink for F
where
    F: FnMut(ChartHandle, &Frame) + Send,
{
    fn present(&mut self, handle: ChartHandle, frame: &Frame) {
        self(handle, frame)
    }
}
