//! Sample plumbing for live charts: the rolling window every line chart
//! owns, and the sources that feed it.

pub mod buffer;
pub mod latest;
pub mod monitor;
pub mod source;

pub use buffer::RollingBuffer;
pub use latest::LatestValueSource;
pub use monitor::{spawn_monitor, SystemFeeds};
pub use source::{BoxedSource, ScriptedSource, SeriesSource, UniformSource};
