//! Container runtime facade.
//!
//! The observers only need a small slice of the engine API: the lifecycle
//! event stream, the set of running containers, and per-container state and
//! resource counters. [`ContainerRuntime`] captures that slice so the
//! monitor and the metrics collector stay independent of the concrete
//! client; [`DockerRuntime`] is the production implementation.

pub mod docker;
#[cfg(test)]
pub mod fake;
pub mod types;

use async_trait::async_trait;
use futures_util::stream::BoxStream;

pub use docker::DockerRuntime;
pub use types::{ContainerAction, ContainerRef, ContainerState, LifecycleEvent, StatsSnapshot};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error("container not found")]
    NotFound,
    #[error("container runtime call timed out")]
    Timeout,
    #[error("container runtime unavailable: {0}")]
    Unavailable(String),
    #[error("event stream interrupted: {0}")]
    StreamInterrupted(String),
}

/// Infinite stream of container lifecycle events. Errors surface as items
/// so the consumer can react without the stream owning a retry policy.
pub type EventStream = BoxStream<'static, Result<LifecycleEvent, RuntimeError>>;

/// Capabilities the observers require from a container engine. The handle
/// must be safe to share across the event monitor and concurrent pollers.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Opens a fresh subscription to container lifecycle events. The
    /// returned stream is not restartable; callers resubscribe after an
    /// interruption.
    fn subscribe_events(&self) -> EventStream;

    /// Names of the containers currently running on the host.
    async fn list_running_containers(&self) -> Result<Vec<String>, RuntimeError>;

    async fn container_state(&self, name: &str) -> Result<ContainerState, RuntimeError>;

    async fn container_stats(&self, name: &str) -> Result<StatsSnapshot, RuntimeError>;
}
