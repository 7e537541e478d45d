//! Chart widgets: the live line chart and the static bar / radar charts,
//! unified under [`ChartView`].  Every chart renders to a
//! [`Frame`](deck_core::Frame); none of them draws anything itself.

pub mod bar;
pub mod line;
pub mod radar;
mod snapshot;
pub mod view;

pub use bar::BarChart;
pub use line::LineChart;
pub use radar::RadarChart;
pub use view::ChartView;
