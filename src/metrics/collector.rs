use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::percent::{cpu_percent, mem_percent};
use super::report::{ContainerMetrics, MetricsOutcome, MetricsReport};
use crate::runtime::{ContainerRuntime, RuntimeError};

/// Polls container metrics through the runtime facade. Bulk polls fan out
/// one task per container, gated to at most `max_concurrency` containers in
/// flight at once.
pub struct MetricsCollector<R> {
    runtime: Arc<R>,
    max_concurrency: usize,
}

impl<R> Clone for MetricsCollector<R> {
    fn clone(&self) -> Self {
        Self {
            runtime: Arc::clone(&self.runtime),
            max_concurrency: self.max_concurrency,
        }
    }
}

impl<R: ContainerRuntime + 'static> MetricsCollector<R> {
    pub fn new(runtime: Arc<R>, max_concurrency: usize) -> Self {
        Self {
            runtime,
            max_concurrency,
        }
    }

    /// Metrics for one named container. Resource percentages are derived
    /// from a fresh snapshot, and only while the container is running.
    pub async fn container_metrics(&self, name: &str) -> Result<ContainerMetrics, RuntimeError> {
        let status = self.runtime.container_state(name).await?;

        if !status.is_running() {
            return Ok(ContainerMetrics {
                status,
                cpu_percent: None,
                mem_percent: None,
            });
        }

        let snapshot = self.runtime.container_stats(name).await?;

        Ok(ContainerMetrics {
            status,
            cpu_percent: Some(cpu_percent(&snapshot)),
            mem_percent: Some(mem_percent(&snapshot)),
        })
    }

    /// Metrics for every container running when the poll starts. A failure
    /// while listing aborts the call; a failure on one container only marks
    /// that container's entry.
    pub async fn all_container_metrics(&self) -> Result<MetricsReport, RuntimeError> {
        let names = self.runtime.list_running_containers().await?;
        if names.is_empty() {
            return Ok(MetricsReport::new());
        }

        // Never more workers than containers to poll.
        let permits = self.max_concurrency.min(names.len()).max(1);
        let semaphore = Arc::new(Semaphore::new(permits));
        let mut join_set = JoinSet::new();

        for name in names {
            let collector = self.clone();
            let semaphore = Arc::clone(&semaphore);

            join_set.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("semaphore closed while polling");

                let outcome = match collector.container_metrics(&name).await {
                    Ok(metrics) => MetricsOutcome::Collected(metrics),
                    Err(error) => {
                        log::error!("Failed to poll metrics for {}: {}", name, error);
                        MetricsOutcome::Failed {
                            error: error.to_string(),
                        }
                    }
                };

                (name, outcome)
            });
        }

        let mut report = MetricsReport::new();
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((name, outcome)) => {
                    report.insert(name, outcome);
                }
                Err(e) => {
                    log::error!("Metrics poll task failed: {}", e);
                }
            }
        }

        Ok(report)
    }
}
