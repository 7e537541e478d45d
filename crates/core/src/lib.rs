//! Shared types for the telemetry deck: errors, chart specs, frames, ticks,
//! and the render-sink capability every host implements.

pub mod chart_spec;
pub mod error;
pub mod frame;
pub mod handle;
pub mod sink;
pub mod tick;

pub use chart_spec::{AxisLabelMode, BarSpec, LineSpec, RadarSpec, SeedMode, ValueRange};
pub use error::{ChartError, Result};
pub use frame::{
    Axis, BarFrame, BarSegment, ChartKind, Frame, LineFrame, Point, PolarPoint, RadarAxis,
    RadarFrame,
};
pub use handle::ChartHandle;
pub use sink::RenderSink;
pub use tick::{ChartFault, Tick, TickOutcome, TickReport};
