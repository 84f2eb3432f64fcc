use std::collections::HashMap;

use serde::Serialize;

use crate::runtime::ContainerState;

/// Freshly computed metrics for one container. Percentages are present
/// only while the container is running.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerMetrics {
    pub status: ContainerState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mem_percent: Option<f64>,
}

/// Per-container result of a bulk poll. A failure on one container is
/// recorded here instead of aborting the rest of the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricsOutcome {
    Collected(ContainerMetrics),
    Failed { error: String },
}

/// Bulk poll result, keyed by container name. Covers exactly the container
/// set observed when the poll started.
pub type MetricsReport = HashMap<String, MetricsOutcome>;
