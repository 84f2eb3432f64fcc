use crate::runtime::StatsSnapshot;

/// CPU usage over the snapshot's sampling window, normalized to a single
/// core and scaled by the core count. Exceeds 100 when a container keeps
/// more than one core busy. Counter resets saturate to zero instead of
/// going negative.
pub fn cpu_percent(snapshot: &StatsSnapshot) -> f64 {
    let cpu_delta = snapshot
        .cpu
        .total_usage
        .saturating_sub(snapshot.precpu.total_usage);
    let system_delta = snapshot
        .cpu
        .system_usage
        .saturating_sub(snapshot.precpu.system_usage);

    if system_delta == 0 {
        return 0.0;
    }

    cpu_delta as f64 / system_delta as f64 * 100.0 * snapshot.core_count as f64
}

/// Memory usage as a percentage of the container's limit. Zero when the
/// engine reports no limit.
pub fn mem_percent(snapshot: &StatsSnapshot) -> f64 {
    if snapshot.memory.limit == 0 {
        return 0.0;
    }

    snapshot.memory.usage as f64 / snapshot.memory.limit as f64 * 100.0
}
