//! Chart registry and the periodic refresh scheduler that drives it.

pub mod registry;
pub mod scheduler;
pub mod ticker;

pub use registry::{ChartRegistry, RegistryHandle};
pub use scheduler::{RefreshScheduler, SchedulerState, DEFAULT_INTERVAL_MS};
pub use ticker::spawn_ticker;
