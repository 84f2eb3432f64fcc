//! On-demand container resource metrics.

pub mod collector;
pub mod percent;
pub mod report;

pub use collector::MetricsCollector;
pub use report::{ContainerMetrics, MetricsReport};
